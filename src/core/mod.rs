//! 核心框架模块
//!
//! - Event: 类型化事件发射器

pub mod event;

pub use event::{Emitter, Subscription};
