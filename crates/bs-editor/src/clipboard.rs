//! Copy, paste and duplicate for block subtrees.
//!
//! Copied subtrees are held as style text, so a paste goes back through the
//! parser and may come from any source (another editor, a config file). Each
//! operation produces a [`StyleMutation`] to run through the command stack so
//! it can be undone like any other edit.

use crate::sync::{EditError, EditorEngine, StyleMutation, StylePath};
use bs_core::emitter::emit_style;
use bs_core::parser::parse_style;

#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    content: Option<String>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The copied text, if any.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Replace the clipboard with text copied from outside the editor.
    pub fn set_content(&mut self, text: impl Into<String>) {
        self.content = Some(text.into());
    }

    /// Copy the subtree at `path` as text.
    pub fn copy(&mut self, engine: &EditorEngine, path: &StylePath) -> Result<(), EditError> {
        let node = engine
            .node(path)
            .ok_or_else(|| EditError::NoNode { path: path.clone() })?;
        let text = emit_style(node)?;
        log::debug!("copied {} from {path}", node.os_name());
        self.content = Some(text);
        Ok(())
    }

    /// Parse the clipboard into a mutation filling parameter `index` of the
    /// node at `path`.
    pub fn paste(&self, path: &StylePath, index: usize) -> Result<StyleMutation, EditError> {
        let text = self.content.as_deref().ok_or(EditError::EmptyClipboard)?;
        let style = parse_style(text)?;
        Ok(StyleMutation::SetStyle {
            path: path.clone(),
            index,
            style: Box::new(style),
        })
    }
}

/// A mutation filling parameter `index` of the node at `to` with a deep
/// copy of the subtree at `from`.
pub fn duplicate(
    engine: &EditorEngine,
    from: &StylePath,
    to: &StylePath,
    index: usize,
) -> Result<StyleMutation, EditError> {
    let node = engine
        .node(from)
        .ok_or_else(|| EditError::NoNode { path: from.clone() })?;
    Ok(StyleMutation::SetStyle {
        path: to.clone(),
        index,
        style: Box::new(node.clone()),
    })
}
