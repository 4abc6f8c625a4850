//! zbook - 笔记本文档模型与求值编排库
//!
//! 模块结构：
//! - core: 核心框架（Emitter）
//! - models: 数据模型（Notebook, Cell, 文档格式）
//! - kernel: 编排层（NotebookEditor, 引擎协议, 服务端口与适配器）

pub mod core;
pub mod kernel;
pub mod models;
