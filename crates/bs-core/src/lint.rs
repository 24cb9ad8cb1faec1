//! Lint diagnostics for style trees.
//!
//! Reports structural issues without modifying the tree. Every diagnostic
//! carries the path of parameter indices from the root to the offending node
//! so an editor can highlight it.

use crate::model::{Slot, Style};
use serde::Serialize;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LintSeverity {
    /// The tree cannot be emitted or would not compile on the board.
    Error,
    /// Suspicious but emittable.
    Warning,
}

/// A single lint diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintDiagnostic {
    /// Parameter indices from the root to the node the finding is about.
    pub path: Vec<usize>,
    /// Name of that node.
    pub style: &'static str,
    /// Human-readable message.
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "empty-parameter").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the tree rooted at `style`.
#[must_use]
pub fn lint_style(style: &Style) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    let mut path = Vec::new();
    walk(style, &mut path, &mut diags);
    diags
}

/// Whether any diagnostic is an error.
pub fn has_errors(diags: &[LintDiagnostic]) -> bool {
    diags.iter().any(|d| d.severity == LintSeverity::Error)
}

fn walk(style: &Style, path: &mut Vec<usize>, diags: &mut Vec<LintDiagnostic>) {
    lint_empty_params(style, path, diags);
    lint_category_mismatch(style, path, diags);
    lint_dangling_references(style, path, diags);

    for (idx, param) in style.params().iter().enumerate() {
        if let Some(child) = param.as_style() {
            path.push(idx);
            walk(child, path, diags);
            path.pop();
        }
    }
}

// ─── Rules ────────────────────────────────────────────────────────────────

/// Composite slots without a child.
fn lint_empty_params(style: &Style, path: &[usize], diags: &mut Vec<LintDiagnostic>) {
    for param in style.params() {
        if matches!(param.slot(), Slot::Style(None)) {
            diags.push(LintDiagnostic {
                path: path.to_vec(),
                style: style.os_name(),
                message: format!("Parameter `{}` of `{}` is empty.", param.name(), style.os_name()),
                severity: LintSeverity::Error,
                rule: "empty-parameter",
            });
        }
    }
}

/// Children whose category their slot does not accept. Only reachable
/// through direct `style_mut` edits; binding checks the category.
fn lint_category_mismatch(style: &Style, path: &[usize], diags: &mut Vec<LintDiagnostic>) {
    for param in style.params() {
        let Some(child) = param.as_style() else { continue };
        let accepts = param.kind().categories;
        if !accepts.accepts(child.category()) {
            diags.push(LintDiagnostic {
                path: path.to_vec(),
                style: style.os_name(),
                message: format!(
                    "`{}` is a {} but parameter `{}` of `{}` accepts {}.",
                    child.os_name(),
                    child.category(),
                    param.name(),
                    style.os_name(),
                    accepts
                ),
                severity: LintSeverity::Error,
                rule: "category-mismatch",
            });
        }
    }
}

/// Back-references to a parameter the node does not have.
fn lint_dangling_references(style: &Style, path: &[usize], diags: &mut Vec<LintDiagnostic>) {
    for param in style.params() {
        let Some(reference) = param.reference() else { continue };
        if reference > style.params().len() {
            diags.push(LintDiagnostic {
                path: path.to_vec(),
                style: style.os_name(),
                message: format!(
                    "Parameter `{}` of `{}` refers to parameter {reference}, which does not exist.",
                    param.name(),
                    style.os_name()
                ),
                severity: LintSeverity::Warning,
                rule: "dangling-reference",
            });
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{Category, CategorySet};
    use crate::model::Param;
    use crate::parser::parse_style;
    use pretty_assertions::assert_eq;

    #[test]
    fn clean_tree_has_no_diags() {
        let style = parse_style("StylePtr<Layers<Red, BlastL<White>>>()").unwrap();
        assert!(lint_style(&style).is_empty());
    }

    #[test]
    fn empty_parameter_reports_path() {
        let mut style = parse_style("StylePtr<Layers<Red, BlastL<White>>>()").unwrap();
        let blast = style
            .param_mut(0)
            .and_then(|p| p.as_style_mut())
            .and_then(|layers| layers.param_mut(1))
            .and_then(|p| p.as_style_mut())
            .unwrap();
        let _ = blast.param_mut(0).unwrap().detach_style();

        let diags = lint_style(&style);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, "empty-parameter");
        assert_eq!(diags[0].path, vec![0, 1]);
        assert_eq!(diags[0].style, "BlastL");
        assert!(has_errors(&diags));
    }

    #[test]
    fn category_mismatch_after_direct_edit() {
        let mut style = parse_style("BlastL<White>").unwrap();
        let child = style.param_mut(0).and_then(|p| p.as_style_mut()).unwrap();
        *child = parse_style("TrFade<300>").unwrap();

        let diags = lint_style(&style);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, "category-mismatch");
        assert!(diags[0].path.is_empty());
    }

    #[test]
    fn dangling_reference_is_a_warning() {
        let style = Style::new(
            "Bent",
            "Bent",
            Category::Function,
            [Param::number("Power", 0).referencing(4)],
        );
        let diags = lint_style(&style);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, "dangling-reference");
        assert_eq!(diags[0].severity, LintSeverity::Warning);
        assert!(!has_errors(&diags));

        let fine = Style::new(
            "Bent",
            "Bent",
            Category::Function,
            [
                Param::style("Time", CategorySet::FUNCTION, None),
                Param::number("Power", 0).referencing(1),
            ],
        );
        assert!(lint_style(&fine).iter().all(|d| d.rule != "dangling-reference"));
    }
}
