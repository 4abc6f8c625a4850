//! Headless notebook orchestration: editor, engine protocol, services.

pub mod editor;
pub mod protocol;
pub mod services;
pub mod working;

pub use editor::{CommandOutcome, EditorEvents, NotebookEditor};
pub use protocol::{DisplayItem, EngineMessage, EvalEvent, EvalRequest};
pub use working::{WorkingCounter, WorkingGuard};
