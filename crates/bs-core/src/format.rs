//! Formatting pipeline: parse → optional passes → emit.
//!
//! Single idempotent entry point used by the `bs-fmt` binary and by editors
//! that reformat a style on save.

use crate::emitter::{EmitError, emit_style, emit_style_compact};
use crate::lint::{LintDiagnostic, has_errors, lint_style};
use crate::model::Style;
use crate::parser::{ParseError, parse_style};

// ─── Config ───────────────────────────────────────────────────────────────

/// Configuration for [`format_style`].
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// Keep comments attached to nodes and literals. Default: **true**.
    pub keep_comments: bool,

    /// Refuse to emit a tree with lint errors. Default: **true**.
    pub require_complete: bool,

    /// Break nodes with composite children over several lines. When false
    /// the whole style is written on one line. Default: **true**.
    pub multiline: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            keep_comments: true,
            require_complete: true,
            multiline: true,
        }
    }
}

/// Why a style could not be formatted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("style is incomplete ({} lint error(s))", .0.len())]
    Incomplete(Vec<LintDiagnostic>),
    #[error(transparent)]
    Emit(#[from] EmitError),
}

// ─── Pipeline ─────────────────────────────────────────────────────────────

/// Parse a style, apply configured passes, and re-emit canonical text.
///
/// The output is idempotent: `format_style(format_style(s, c), c) == format_style(s, c)`.
pub fn format_style(text: &str, config: &FormatConfig) -> Result<String, FormatError> {
    let mut style = parse_style(text)?;
    if !config.keep_comments {
        strip_comments(&mut style);
    }
    format_tree(&style, config)
}

/// Emit an already parsed tree according to `config`.
pub fn format_tree(style: &Style, config: &FormatConfig) -> Result<String, FormatError> {
    if config.require_complete {
        let diags = lint_style(style);
        if has_errors(&diags) {
            log::error!("refusing to format {} with {} lint finding(s)", style.os_name(), diags.len());
            return Err(FormatError::Incomplete(diags));
        }
    }
    let text = if config.multiline {
        emit_style(style)?
    } else {
        emit_style_compact(style)?
    };
    Ok(text)
}

/// Remove every node and literal comment in the tree.
pub fn strip_comments(style: &mut Style) {
    style.comment.clear();
    let len = style.params().len();
    for idx in 0..len {
        let Some(param) = style.param_mut(idx) else { continue };
        param.set_comment(String::new());
        if let Some(child) = param.as_style_mut() {
            strip_comments(child);
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
