//! Block editor engine for blade styles: tree ↔ text sync, undo/redo and
//! clipboard.

pub mod clipboard;
pub mod commands;
pub mod sync;

pub use clipboard::{Clipboard, duplicate};
pub use commands::{Command, CommandStack};
pub use sync::{EditError, EditorEngine, StyleMutation, StylePath};
