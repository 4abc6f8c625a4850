//! Services layer (ports + adapters).
//!
//! - `ports`: contracts the editor depends on (storage, evaluator, prompter, settings).
//! - `adapters`: OS/runtime specific implementations (IO/async).

pub mod adapters;
pub mod ports;
