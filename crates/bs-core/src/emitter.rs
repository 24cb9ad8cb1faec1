//! Emitter: [`Style`] tree → blade style text.
//!
//! Output parses back into an equal tree. A node whose parameters include at
//! least one non-fixed-form child is broken over several lines, one parameter
//! per line, with nested lines indented by one tab per level.

use crate::kind::Category;
use crate::model::{Slot, Style};
use std::fmt::Write;

/// A node could not be written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmitError {
    #[error("empty parameter \"{param}\" in {style}")]
    MissingChild {
        style: &'static str,
        param: &'static str,
    },
}

/// Emit `style` as multi-line text.
#[must_use = "emitted text should be used"]
pub fn emit_style(style: &Style) -> Result<String, EmitError> {
    Emitter { multiline: true }.emit(style)
}

/// Emit `style` on a single line. Comments become inline `/* */` blocks.
#[must_use = "emitted text should be used"]
pub fn emit_style_compact(style: &Style) -> Result<String, EmitError> {
    Emitter { multiline: false }.emit(style)
}

#[derive(Debug, Clone, Copy)]
struct Emitter {
    multiline: bool,
}

impl Emitter {
    fn emit(self, style: &Style) -> Result<String, EmitError> {
        let mut out = String::with_capacity(64);
        self.comment(&mut out, &style.comment);

        if style.category() == Category::Builtin {
            out.push('&');
            out.push_str(style.os_name());
            return Ok(out);
        }

        out.push_str(style.os_name());

        let indent = self.multiline
            && style
                .params()
                .iter()
                .any(|p| p.as_style().is_some_and(|child| !child.is_fixed_form()));

        if !style.is_fixed_form() {
            out.push('<');
        }
        for (idx, param) in style.params().iter().enumerate() {
            if idx > 0 {
                out.push_str(if indent { "," } else { ", " });
            }
            if indent {
                out.push_str("\n\t");
            }
            if param.is_literal() && !param.comment().is_empty() {
                let comment = neutralize(param.comment());
                if self.multiline {
                    let _ = write!(out, "/* {comment} */ ");
                } else {
                    let _ = write!(out, "/* {} */ ", comment.replace('\n', " "));
                }
            }
            match param.slot() {
                Slot::Number(n) => {
                    let _ = write!(out, "{n}");
                }
                Slot::Bits(bits) => out.push_str(&format_bits(*bits)),
                Slot::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
                Slot::Style(Some(child)) => {
                    let text = self.emit(child)?;
                    if indent {
                        out.push_str(&text.replace('\n', "\n\t"));
                    } else {
                        out.push_str(&text);
                    }
                }
                Slot::Style(None) => {
                    log::error!("empty parameter \"{}\" in {}", param.name(), style.os_name());
                    return Err(EmitError::MissingChild {
                        style: style.os_name(),
                        param: param.name(),
                    });
                }
            }
        }
        if indent {
            out.push('\n');
        }
        if !style.is_fixed_form() {
            out.push('>');
        }
        if style.category() == Category::Wrapper {
            out.push_str("()");
        }

        Ok(out)
    }

    fn comment(self, out: &mut String, comment: &str) {
        if comment.is_empty() {
            return;
        }
        if self.multiline {
            out.push_str("/*\n");
            out.push_str(&neutralize(comment));
            out.push_str("\n*/\n");
        } else {
            let _ = write!(out, "/* {} */ ", neutralize(comment).replace('\n', " "));
        }
    }
}

/// `0b` followed by 16 digits, least significant bit first.
pub fn format_bits(bits: u16) -> String {
    let mut out = String::with_capacity(18);
    out.push_str("0b");
    for i in 0..16 {
        out.push(if (bits >> i) & 1 == 1 { '1' } else { '0' });
    }
    out
}

/// A comment must not close its own block early.
fn neutralize(comment: &str) -> String {
    comment.replace("*/", "* /")
}
