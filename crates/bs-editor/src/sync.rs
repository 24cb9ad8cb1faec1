//! Editor engine: block tree ↔ style text.
//!
//! The engine owns the authoritative [`Style`] tree behind a block editor and
//! keeps a text rendering of it in sync:
//!
//! - **Blocks → Text**: mutations edit the tree in place and mark the text
//!   dirty. The text is re-emitted lazily on the next [`EditorEngine::current_text`].
//!   While the tree has an empty slot there is no text.
//!
//! - **Text → Blocks**: [`EditorEngine::set_text`] re-parses the whole style
//!   and replaces the tree. A failed parse leaves the engine untouched.

use bs_core::emitter::{EmitError, emit_style};
use bs_core::model::{Param, ParamError, ParamValue, Style};
use bs_core::parser::{ParseError, parse_style};
use smallvec::SmallVec;
use std::fmt;

// ─── Paths ───────────────────────────────────────────────────────────────

/// Parameter indices leading from the root to a node. Empty for the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StylePath(SmallVec<[usize; 8]>);

impl StylePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// The path of the child in parameter `index` of this node.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.0.push(index);
        path
    }

    /// The parent's path and the parameter index this node sits in.
    pub fn parent(&self) -> Option<(Self, usize)> {
        let (last, rest) = self.0.split_last()?;
        Some((Self(rest.iter().copied().collect()), *last))
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<usize> for StylePath {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<&[usize]> for StylePath {
    fn from(indices: &[usize]) -> Self {
        indices.iter().copied().collect()
    }
}

impl<const N: usize> From<[usize; N]> for StylePath {
    fn from(indices: [usize; N]) -> Self {
        indices.into_iter().collect()
    }
}

impl fmt::Display for StylePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for index in &self.0 {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

// ─── Errors ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Emit(#[from] EmitError),
    #[error("no style at {path}")]
    NoNode { path: StylePath },
    #[error("cannot edit {style} at {path}: {source}")]
    Param {
        path: StylePath,
        style: &'static str,
        #[source]
        source: ParamError,
    },
    #[error("clipboard is empty")]
    EmptyClipboard,
}

// ─── Mutations ───────────────────────────────────────────────────────────

/// An edit made through the block editor.
///
/// `path` names the node being edited; `index` names one of its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleMutation {
    SetNumber {
        path: StylePath,
        index: usize,
        value: i32,
    },
    SetBits {
        path: StylePath,
        index: usize,
        value: u16,
    },
    SetBool {
        path: StylePath,
        index: usize,
        value: bool,
    },
    /// Attach a child, dropping the one it replaces.
    SetStyle {
        path: StylePath,
        index: usize,
        style: Box<Style>,
    },
    /// Empty a composite slot.
    DetachStyle { path: StylePath, index: usize },
    /// Insert a variadic repeat at `index`.
    AddParam {
        path: StylePath,
        index: usize,
        value: ParamValue,
    },
    /// Remove a variadic repeat.
    RemoveParam { path: StylePath, index: usize },
    SetComment { path: StylePath, comment: String },
}

impl StyleMutation {
    /// The node the mutation edits.
    pub fn path(&self) -> &StylePath {
        match self {
            StyleMutation::SetNumber { path, .. }
            | StyleMutation::SetBits { path, .. }
            | StyleMutation::SetBool { path, .. }
            | StyleMutation::SetStyle { path, .. }
            | StyleMutation::DetachStyle { path, .. }
            | StyleMutation::AddParam { path, .. }
            | StyleMutation::RemoveParam { path, .. }
            | StyleMutation::SetComment { path, .. } => path,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StyleMutation::SetNumber { .. } => "set number",
            StyleMutation::SetBits { .. } => "set bits",
            StyleMutation::SetBool { .. } => "set bool",
            StyleMutation::SetStyle { .. } => "set style",
            StyleMutation::DetachStyle { .. } => "detach style",
            StyleMutation::AddParam { .. } => "add parameter",
            StyleMutation::RemoveParam { .. } => "remove parameter",
            StyleMutation::SetComment { .. } => "set comment",
        }
    }
}

// ─── Engine ──────────────────────────────────────────────────────────────

/// Holds the authoritative style tree and keeps its text in sync.
#[derive(Debug, Clone)]
pub struct EditorEngine {
    root: Style,
    /// Last emitted (or user supplied) text. `None` while the tree is incomplete.
    text: Option<String>,
    /// Set when the tree changed and the text needs re-emit.
    text_dirty: bool,
}

impl EditorEngine {
    /// Parse `text` and render it canonically.
    pub fn from_text(text: &str) -> Result<Self, EditError> {
        let root = parse_style(text)?;
        let canonical = emit_style(&root)?;
        Ok(Self {
            root,
            text: Some(canonical),
            text_dirty: false,
        })
    }

    /// Wrap an existing tree. Its text is emitted on first request.
    pub fn new(root: Style) -> Self {
        Self {
            root,
            text: None,
            text_dirty: true,
        }
    }

    pub fn root(&self) -> &Style {
        &self.root
    }

    /// The node at `path`, if every index along it names a filled slot.
    pub fn node(&self, path: &StylePath) -> Option<&Style> {
        path.indices()
            .iter()
            .try_fold(&self.root, |node, &index| node.param_style(index))
    }

    fn node_mut(&mut self, path: &StylePath) -> Option<&mut Style> {
        let mut node = &mut self.root;
        for &index in path.indices() {
            node = node.param_mut(index)?.as_style_mut()?;
        }
        Some(node)
    }

    /// Replace the whole tree (used by snapshot undo/redo).
    pub fn replace_root(&mut self, root: Style) {
        self.root = root;
        self.text_dirty = true;
    }

    // ─── Blocks → Text direction ─────────────────────────────────────────

    /// Apply a block-editor mutation. On failure the tree is unchanged.
    pub fn apply_mutation(&mut self, mutation: StyleMutation) -> Result<(), EditError> {
        log::trace!("apply {} at {}", mutation.name(), mutation.path());
        let path = mutation.path().clone();
        let Some(node) = self.node_mut(&path) else {
            log::warn!("no style at {path}");
            return Err(EditError::NoNode { path });
        };
        let style = node.os_name();

        let outcome = match mutation {
            StyleMutation::SetNumber { index, value, .. } => {
                param_at(node, index).and_then(|p| p.set_number(value))
            }
            StyleMutation::SetBits { index, value, .. } => {
                param_at(node, index).and_then(|p| p.set_bits(i32::from(value)))
            }
            StyleMutation::SetBool { index, value, .. } => {
                param_at(node, index).and_then(|p| p.set_bool(value))
            }
            StyleMutation::SetStyle { index, style, .. } => {
                param_at(node, index).and_then(|p| p.set_style(style))
            }
            StyleMutation::DetachStyle { index, .. } => param_at(node, index).and_then(|p| {
                if p.is_literal() {
                    return Err(ParamError::ExpectedStyle { param: p.name() });
                }
                drop(p.detach_style());
                Ok(())
            }),
            StyleMutation::AddParam { index, value, .. } => node.insert_param(index, value),
            StyleMutation::RemoveParam { index, .. } => node.remove_param(index).map(drop),
            StyleMutation::SetComment { comment, .. } => {
                node.comment = comment;
                Ok(())
            }
        };

        outcome.map_err(|source| {
            log::warn!("cannot edit {style} at {path}: {source}");
            EditError::Param { path, style, source }
        })?;
        self.text_dirty = true;
        Ok(())
    }

    /// Re-emit the text from the current tree if it changed.
    pub fn flush_to_text(&mut self) {
        if !self.text_dirty {
            return;
        }
        self.text = match emit_style(&self.root) {
            Ok(text) => Some(text),
            Err(err) => {
                log::debug!("no text while the tree is incomplete: {err}");
                None
            }
        };
        self.text_dirty = false;
    }

    // ─── Text → Blocks direction ─────────────────────────────────────────

    /// Replace the tree by parsing `new_text`. The text is kept verbatim.
    ///
    /// Commands recorded against the old tree no longer apply; callers
    /// holding a [`CommandStack`](crate::commands::CommandStack) should clear it.
    pub fn set_text(&mut self, new_text: &str) -> Result<(), EditError> {
        let root = parse_style(new_text)?;
        self.root = root;
        self.text = Some(new_text.to_string());
        self.text_dirty = false;
        Ok(())
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Current text, or `None` while some slot is empty.
    pub fn current_text(&mut self) -> Option<&str> {
        self.flush_to_text();
        self.text.as_deref()
    }

    /// Whether every composite slot in the tree is filled.
    pub fn is_complete(&self) -> bool {
        fn complete(style: &Style) -> bool {
            style.validate_params().is_ok()
                && style
                    .params()
                    .iter()
                    .filter_map(|p| p.as_style())
                    .all(complete)
        }
        complete(&self.root)
    }
}

fn param_at(node: &mut Style, index: usize) -> Result<&mut Param, ParamError> {
    let len = node.params().len();
    let style = node.os_name();
    node.param_mut(index)
        .ok_or(ParamError::IndexOutOfRange { style, index, len })
}
