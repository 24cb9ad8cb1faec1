pub mod catalog;
pub mod emitter;
pub mod format;
pub mod kind;
pub mod lexer;
pub mod lint;
pub mod model;
pub mod parser;
pub mod registry;

pub use emitter::{EmitError, emit_style, emit_style_compact};
pub use format::{FormatConfig, FormatError, format_style};
pub use kind::{Category, CategorySet, StyleKind};
pub use lexer::LexError;
pub use lint::{LintDiagnostic, LintSeverity, lint_style};
pub use model::*;
pub use parser::{ParseError, Parser, parse_style};
pub use registry::{Factory, Registry, Section};
