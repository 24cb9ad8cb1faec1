//! Undo/Redo command stack.
//!
//! Every mutation is wrapped in a reversible `Command` that can be undone.
//! Commands are pushed to a stack; undo pops and applies the inverse.
//!
//! Mutations without a computable inverse (removing a parameter that carries
//! a comment, for instance) and batches fall back to **tree snapshots**: a
//! deep clone of the root before and after, so undo/redo swaps the whole tree
//! in a single step.

use crate::sync::{EditError, EditorEngine, StyleMutation};
use bs_core::model::Style;

/// A command that captures both a forward mutation and its inverse.
#[derive(Debug, Clone)]
pub enum Command {
    /// Single mutation with its inverse.
    Single {
        forward: Box<StyleMutation>,
        inverse: Box<StyleMutation>,
        description: String,
    },
    /// Whole tree before and after.
    Snapshot {
        before: Box<Style>,
        after: Box<Style>,
        description: String,
    },
}

impl Command {
    pub fn description(&self) -> &str {
        match self {
            Command::Single { description, .. } | Command::Snapshot { description, .. } => description,
        }
    }
}

/// Manages undo/redo stacks with batch grouping.
#[derive(Debug)]
pub struct CommandStack {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    /// Maximum undo depth.
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Tree captured at the start of a batch.
    batch_snapshot: Option<Box<Style>>,
    /// Whether any mutations occurred during the current batch.
    batch_dirty: bool,
}

impl CommandStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth.min(64)),
            redo_stack: Vec::new(),
            max_depth,
            batch_depth: 0,
            batch_snapshot: None,
            batch_dirty: false,
        }
    }

    /// Start a batch group. All mutations until the matching `end_batch()`
    /// are applied live but undone as one step.
    pub fn begin_batch(&mut self, engine: &EditorEngine) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(Box::new(engine.root().clone()));
            self.batch_dirty = false;
        }
        self.batch_depth += 1;
    }

    /// End a batch group. When the outermost batch closes and the tree
    /// changed, push one snapshot command.
    pub fn end_batch(&mut self, engine: &EditorEngine, description: &str) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return;
        }

        let before = self.batch_snapshot.take();
        if self.batch_dirty
            && let Some(before) = before
            && *before != *engine.root()
        {
            self.push(Command::Snapshot {
                before,
                after: Box::new(engine.root().clone()),
                description: description.to_string(),
            });
        }
        self.batch_dirty = false;
    }

    /// Apply a mutation through the engine and record it. Nothing is recorded
    /// when the engine rejects the mutation.
    pub fn execute(
        &mut self,
        engine: &mut EditorEngine,
        mutation: StyleMutation,
        description: &str,
    ) -> Result<(), EditError> {
        if self.batch_depth > 0 {
            // The snapshot at end_batch() captures the cumulative effect.
            engine.apply_mutation(mutation)?;
            self.batch_dirty = true;
            return Ok(());
        }

        let cmd = match compute_inverse(engine, &mutation) {
            Some(inverse) => {
                engine.apply_mutation(mutation.clone())?;
                Command::Single {
                    forward: Box::new(mutation),
                    inverse: Box::new(inverse),
                    description: description.to_string(),
                }
            }
            None => {
                let before = Box::new(engine.root().clone());
                engine.apply_mutation(mutation)?;
                Command::Snapshot {
                    before,
                    after: Box::new(engine.root().clone()),
                    description: description.to_string(),
                }
            }
        };
        self.push(cmd);
        Ok(())
    }

    /// Undo the last command (or batch snapshot). `Ok(None)` when there is
    /// nothing to undo.
    ///
    /// If the inverse no longer applies (the tree was replaced under the
    /// recorded paths), the history is cleared and the error returned.
    pub fn undo(&mut self, engine: &mut EditorEngine) -> Result<Option<String>, EditError> {
        let Some(cmd) = self.undo_stack.pop() else {
            return Ok(None);
        };
        match &cmd {
            Command::Single { inverse, .. } => {
                if let Err(err) = engine.apply_mutation((**inverse).clone()) {
                    log::error!("undo of \"{}\" failed, dropping history: {err}", cmd.description());
                    self.clear();
                    return Err(err);
                }
            }
            Command::Snapshot { before, .. } => engine.replace_root((**before).clone()),
        }
        let desc = cmd.description().to_string();
        self.redo_stack.push(cmd);
        Ok(Some(desc))
    }

    /// Redo the last undone command (or batch snapshot). Fails like
    /// [`CommandStack::undo`].
    pub fn redo(&mut self, engine: &mut EditorEngine) -> Result<Option<String>, EditError> {
        let Some(cmd) = self.redo_stack.pop() else {
            return Ok(None);
        };
        match &cmd {
            Command::Single { forward, .. } => {
                if let Err(err) = engine.apply_mutation((**forward).clone()) {
                    log::error!("redo of \"{}\" failed, dropping history: {err}", cmd.description());
                    self.clear();
                    return Err(err);
                }
            }
            Command::Snapshot { after, .. } => engine.replace_root((**after).clone()),
        }
        let desc = cmd.description().to_string();
        self.undo_stack.push(cmd);
        Ok(Some(desc))
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn push(&mut self, cmd: Command) {
        self.undo_stack.push(cmd);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        // Clear redo stack on new action
        self.redo_stack.clear();
    }
}

/// Compute the mutation that undoes `mutation`, captured before it runs.
/// `None` when the old state cannot be expressed as a single mutation.
fn compute_inverse(engine: &EditorEngine, mutation: &StyleMutation) -> Option<StyleMutation> {
    let node = engine.node(mutation.path())?;
    match mutation {
        StyleMutation::SetNumber { path, index, .. } => {
            node.param_number(*index).map(|value| StyleMutation::SetNumber {
                path: path.clone(),
                index: *index,
                value,
            })
        }
        StyleMutation::SetBits { path, index, .. } => {
            node.param_bits(*index).map(|value| StyleMutation::SetBits {
                path: path.clone(),
                index: *index,
                value,
            })
        }
        StyleMutation::SetBool { path, index, .. } => {
            node.param_bool(*index).map(|value| StyleMutation::SetBool {
                path: path.clone(),
                index: *index,
                value,
            })
        }
        StyleMutation::SetStyle { path, index, .. } | StyleMutation::DetachStyle { path, index } => {
            let param = node.param(*index)?;
            if param.is_literal() {
                return None;
            }
            Some(match param.as_style() {
                Some(old) => StyleMutation::SetStyle {
                    path: path.clone(),
                    index: *index,
                    style: Box::new(old.clone()),
                },
                None => StyleMutation::DetachStyle {
                    path: path.clone(),
                    index: *index,
                },
            })
        }
        StyleMutation::AddParam { path, index, .. } => Some(StyleMutation::RemoveParam {
            path: path.clone(),
            index: *index,
        }),
        StyleMutation::RemoveParam { path, index } => {
            let param = node.param(*index)?;
            if !param.comment().is_empty() {
                return None;
            }
            param.to_value().map(|value| StyleMutation::AddParam {
                path: path.clone(),
                index: *index,
                value,
            })
        }
        StyleMutation::SetComment { path, .. } => Some(StyleMutation::SetComment {
            path: path.clone(),
            comment: node.comment.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::StylePath;
    use bs_core::parser::parse_style;
    use pretty_assertions::assert_eq;

    fn engine() -> EditorEngine {
        EditorEngine::from_text("StylePtr<Layers<Red, TransitionEffectL<TrFade<300>, EFFECT_BLAST>>>()")
            .unwrap()
    }

    fn fade_path() -> StylePath {
        StylePath::from([0, 1, 0])
    }

    fn set_fade(value: i32) -> StyleMutation {
        StyleMutation::SetNumber {
            path: fade_path(),
            index: 0,
            value,
        }
    }

    #[test]
    fn undo_redo_number() {
        let mut engine = engine();
        let mut stack = CommandStack::new(100);

        stack.execute(&mut engine, set_fade(800), "Fade 800").unwrap();
        assert_eq!(engine.node(&fade_path()).unwrap().param_number(0), Some(800));

        let desc = stack.undo(&mut engine).unwrap();
        assert_eq!(desc, Some("Fade 800".to_string()));
        assert_eq!(engine.node(&fade_path()).unwrap().param_number(0), Some(300));

        let desc = stack.redo(&mut engine).unwrap();
        assert_eq!(desc, Some("Fade 800".to_string()));
        assert_eq!(engine.node(&fade_path()).unwrap().param_number(0), Some(800));
    }

    #[test]
    fn stale_history_is_dropped_when_undo_fails() {
        let mut engine = engine();
        let mut stack = CommandStack::new(100);

        stack.execute(&mut engine, set_fade(800), "Fade 800").unwrap();
        stack.execute(&mut engine, set_fade(900), "Fade 900").unwrap();
        engine.set_text("StylePtr<Red>()").unwrap();

        let err = stack.undo(&mut engine).unwrap_err();
        assert!(matches!(err, EditError::NoNode { .. }));
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
        assert_eq!(engine.current_text(), Some("StylePtr<Red>()"));
    }

    #[test]
    fn redo_clears_on_new_action() {
        let mut engine = engine();
        let mut stack = CommandStack::new(100);

        stack.execute(&mut engine, set_fade(1), "first").unwrap();
        stack.undo(&mut engine).unwrap();
        assert!(stack.can_redo());

        // New action clears redo
        stack.execute(&mut engine, set_fade(2), "second").unwrap();
        assert!(!stack.can_redo());
    }

    #[test]
    fn max_depth_trims_oldest() {
        let mut engine = engine();
        let mut stack = CommandStack::new(3);

        for value in 1..=5 {
            stack.execute(&mut engine, set_fade(value), &format!("set {value}")).unwrap();
        }
        assert_eq!(stack.undo_len(), 3);
        assert_eq!(stack.undo(&mut engine).unwrap(), Some("set 5".to_string()));
        assert_eq!(stack.undo(&mut engine).unwrap(), Some("set 4".to_string()));
        assert_eq!(stack.undo(&mut engine).unwrap(), Some("set 3".to_string()));
        assert_eq!(stack.undo(&mut engine).unwrap(), None);
        assert_eq!(engine.node(&fade_path()).unwrap().param_number(0), Some(2));
    }

    #[test]
    fn rejected_mutation_is_not_recorded() {
        let mut engine = engine();
        let mut stack = CommandStack::new(100);

        let err = stack.execute(
            &mut engine,
            StyleMutation::SetBool {
                path: fade_path(),
                index: 0,
                value: true,
            },
            "bad",
        );
        assert!(err.is_err());
        assert!(!stack.can_undo());
    }

    #[test]
    fn batch_is_one_step() {
        let mut engine = engine();
        let mut stack = CommandStack::new(100);
        let original = engine.root().clone();

        stack.begin_batch(&engine);
        stack.execute(&mut engine, set_fade(400), "drag").unwrap();
        stack.begin_batch(&engine);
        stack.execute(&mut engine, set_fade(500), "drag").unwrap();
        stack.end_batch(&engine, "inner");
        stack.execute(&mut engine, set_fade(600), "drag").unwrap();
        stack.end_batch(&engine, "slide fade time");

        assert_eq!(stack.undo_len(), 1);
        assert_eq!(stack.undo(&mut engine).unwrap(), Some("slide fade time".to_string()));
        assert_eq!(engine.root(), &original);
        stack.redo(&mut engine).unwrap();
        assert_eq!(engine.node(&fade_path()).unwrap().param_number(0), Some(600));
    }

    #[test]
    fn unchanged_batch_pushes_nothing() {
        let mut engine = engine();
        let mut stack = CommandStack::new(100);

        stack.begin_batch(&engine);
        stack.execute(&mut engine, set_fade(300), "same").unwrap();
        stack.end_batch(&engine, "noop");
        assert!(!stack.can_undo());
    }

    #[test]
    fn remove_with_comment_uses_snapshot() {
        let mut engine = EditorEngine::from_text("Sequence<Red, Black, 100, 16, 0b1, /* tail */ 0b11>").unwrap();
        let mut stack = CommandStack::new(100);
        let original = engine.root().clone();

        stack
            .execute(
                &mut engine,
                StyleMutation::RemoveParam {
                    path: StylePath::root(),
                    index: 5,
                },
                "remove pattern",
            )
            .unwrap();
        assert_eq!(engine.root().params().len(), 5);

        stack.undo(&mut engine).unwrap();
        assert_eq!(engine.root(), &original);
        assert_eq!(engine.root().param(5).map(|p| p.comment()), Some("tail"));
    }

    #[test]
    fn set_and_detach_style_undo() {
        let mut engine = engine();
        let mut stack = CommandStack::new(100);
        let original = engine.root().clone();

        stack
            .execute(
                &mut engine,
                StyleMutation::SetStyle {
                    path: StylePath::from([0]),
                    index: 0,
                    style: Box::new(parse_style("Blue").unwrap()),
                },
                "base blue",
            )
            .unwrap();
        stack
            .execute(
                &mut engine,
                StyleMutation::DetachStyle {
                    path: StylePath::from([0]),
                    index: 0,
                },
                "clear base",
            )
            .unwrap();
        assert_eq!(engine.current_text(), None);

        stack.undo(&mut engine).unwrap();
        assert_eq!(engine.node(&StylePath::from([0, 0])).map(Style::os_name), Some("Blue"));
        stack.undo(&mut engine).unwrap();
        assert_eq!(engine.root(), &original);
        assert!(engine.current_text().is_some());
    }
}
