//! Style tree data model.
//!
//! A [`Style`] is one node of a blade style expression (a color, a layer, a
//! transition, ...). It owns an ordered list of [`Param`] slots. Literal slots
//! hold a Number, Bits or Bool value; composite slots own at most one child
//! `Style`. Ownership is strictly tree-shaped: replacing a child drops the old
//! one, [`Param::detach_style`] hands it to the caller.

use crate::kind::{Category, CategorySet, StyleKind};
use serde::Serialize;
use smallvec::SmallVec;
use std::num::NonZeroU8;

/// Smallest value a Number slot stores.
pub const NUMBER_MIN: i32 = i16::MIN as i32;
/// Largest value a Number slot stores.
pub const NUMBER_MAX: i32 = i16::MAX as i32;

/// Highest 1-based parameter a back-reference may name.
pub const MAX_REFERENCE: u8 = 8;

// ─── Errors ──────────────────────────────────────────────────────────────

/// Why a value could not be bound to a node or slot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("{style} has no parameter {index} (it has {len})")]
    IndexOutOfRange {
        style: &'static str,
        index: usize,
        len: usize,
    },
    #[error("{style} does not take a variable number of parameters")]
    NotVariadic { style: &'static str },
    #[error("too many parameters for {style} (expected {declared}, got {given})")]
    TooManyValues {
        style: &'static str,
        declared: usize,
        given: usize,
    },
    #[error("parameter \"{param}\" is required and cannot be removed from {style}")]
    Required {
        style: &'static str,
        param: &'static str,
    },
    #[error("parameter \"{param}\" expects a {expected} literal, got a style")]
    ExpectedLiteral {
        param: &'static str,
        expected: Category,
    },
    #[error("parameter \"{param}\" expects a style, got a literal")]
    ExpectedStyle { param: &'static str },
    #[error("parameter \"{param}\" accepts {expected}, got {found}")]
    CategoryMismatch {
        param: &'static str,
        expected: CategorySet,
        found: Category,
    },
    #[error("empty parameter \"{param}\" in {style}")]
    EmptyParam {
        style: &'static str,
        param: &'static str,
    },
}

// ─── Values ──────────────────────────────────────────────────────────────

/// A value handed to a factory or bound to a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Number, Bits or Bool literal.
    Int(i32),
    /// Owned child node.
    Style(Box<Style>),
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Int(i32::from(value))
    }
}

impl From<Style> for ParamValue {
    fn from(style: Style) -> Self {
        ParamValue::Style(Box::new(style))
    }
}

impl From<Box<Style>> for ParamValue {
    fn from(style: Box<Style>) -> Self {
        ParamValue::Style(style)
    }
}

/// What a slot currently holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Slot {
    Number(i32),
    Bits(u16),
    Bool(bool),
    Style(Option<Box<Style>>),
}

impl Slot {
    /// Same variant, default contents.
    fn emptied(&self) -> Self {
        match self {
            Slot::Number(_) => Slot::Number(0),
            Slot::Bits(_) => Slot::Bits(0),
            Slot::Bool(_) => Slot::Bool(false),
            Slot::Style(_) => Slot::Style(None),
        }
    }
}

// ─── Parameters ──────────────────────────────────────────────────────────

/// A positional parameter of a [`Style`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    name: &'static str,
    kind: StyleKind,
    slot: Slot,
    /// Comment written before a literal value. Child styles keep their own.
    comment: String,
}

impl Param {
    pub fn number(name: &'static str, initial: i32) -> Self {
        Self::with_slot(name, StyleKind::of(Category::Number), Slot::Number(clamp_number(initial)))
    }

    pub fn bits(name: &'static str, initial: i32) -> Self {
        Self::with_slot(name, StyleKind::of(Category::Bits), Slot::Bits(mask_bits(initial)))
    }

    pub fn boolean(name: &'static str, initial: bool) -> Self {
        Self::with_slot(name, StyleKind::of(Category::Bool), Slot::Bool(initial))
    }

    /// A composite slot accepting any of `accepts`, optionally pre-filled.
    pub fn style(name: &'static str, accepts: CategorySet, default: Option<Style>) -> Self {
        Self::with_slot(
            name,
            StyleKind::accepting(accepts & CategorySet::STYLE),
            Slot::Style(default.map(Box::new)),
        )
    }

    fn with_slot(name: &'static str, kind: StyleKind, slot: Slot) -> Self {
        Self {
            name,
            kind,
            slot,
            comment: String::new(),
        }
    }

    /// Mark as the repeatable tail of a parameter list.
    pub fn variadic(mut self) -> Self {
        self.kind.variadic = true;
        self
    }

    /// Refer back to the parameter at 1-based `index`, at most [`MAX_REFERENCE`].
    pub fn referencing(mut self, index: u8) -> Self {
        self.kind.reference = NonZeroU8::new(index.min(MAX_REFERENCE));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> StyleKind {
        self.kind
    }

    pub fn slot(&self) -> &Slot {
        &self.slot
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    pub fn is_literal(&self) -> bool {
        !matches!(self.slot, Slot::Style(_))
    }

    pub fn is_variadic(&self) -> bool {
        self.kind.variadic
    }

    /// 1-based index of the parameter this one refers to.
    pub fn reference(&self) -> Option<usize> {
        self.kind.reference.map(|r| usize::from(r.get()))
    }

    /// Category of the literal this slot holds, if it is a literal slot.
    pub fn literal_category(&self) -> Option<Category> {
        match self.slot {
            Slot::Number(_) => Some(Category::Number),
            Slot::Bits(_) => Some(Category::Bits),
            Slot::Bool(_) => Some(Category::Bool),
            Slot::Style(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<i32> {
        match self.slot {
            Slot::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bits(&self) -> Option<u16> {
        match self.slot {
            Slot::Bits(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.slot {
            Slot::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_style(&self) -> Option<&Style> {
        match &self.slot {
            Slot::Style(style) => style.as_deref(),
            _ => None,
        }
    }

    pub fn as_style_mut(&mut self) -> Option<&mut Style> {
        match &mut self.slot {
            Slot::Style(style) => style.as_deref_mut(),
            _ => None,
        }
    }

    /// Store a Number, clamped to [`NUMBER_MIN`]..=[`NUMBER_MAX`].
    pub fn set_number(&mut self, value: i32) -> Result<(), ParamError> {
        if let Slot::Number(n) = &mut self.slot {
            *n = clamp_number(value);
            return Ok(());
        }
        Err(self.literal_mismatch())
    }

    /// Store the low 16 bits of `value`.
    pub fn set_bits(&mut self, value: i32) -> Result<(), ParamError> {
        if let Slot::Bits(b) = &mut self.slot {
            *b = mask_bits(value);
            return Ok(());
        }
        Err(self.literal_mismatch())
    }

    pub fn set_bool(&mut self, value: bool) -> Result<(), ParamError> {
        if let Slot::Bool(b) = &mut self.slot {
            *b = value;
            return Ok(());
        }
        Err(self.literal_mismatch())
    }

    /// Attach `style` as this slot's child, dropping any previous child.
    pub fn set_style(&mut self, style: impl Into<Box<Style>>) -> Result<(), ParamError> {
        let style = style.into();
        if self.is_literal() {
            return Err(self.literal_mismatch());
        }
        if !self.kind.categories.accepts(style.category()) {
            return Err(ParamError::CategoryMismatch {
                param: self.name,
                expected: self.kind.categories,
                found: style.category(),
            });
        }
        if let Slot::Style(child) = &mut self.slot {
            *child = Some(style);
        }
        Ok(())
    }

    /// Take the child out, leaving the slot empty.
    #[must_use = "the detached style is dropped if not used"]
    pub fn detach_style(&mut self) -> Option<Box<Style>> {
        match &mut self.slot {
            Slot::Style(child) => child.take(),
            _ => None,
        }
    }

    /// Bind a factory/parser value according to this slot's type.
    pub fn set_value(&mut self, value: ParamValue) -> Result<(), ParamError> {
        let value = match value {
            ParamValue::Style(style) => return self.set_style(style),
            ParamValue::Int(value) => value,
        };
        match self.slot {
            Slot::Number(_) => self.set_number(value),
            Slot::Bits(_) => self.set_bits(value),
            Slot::Bool(_) => self.set_bool(value != 0),
            Slot::Style(_) => Err(ParamError::ExpectedStyle { param: self.name }),
        }
    }

    /// Current contents as a value, `None` for an empty composite slot.
    pub fn to_value(&self) -> Option<ParamValue> {
        match &self.slot {
            Slot::Number(n) => Some(ParamValue::Int(*n)),
            Slot::Bits(b) => Some(ParamValue::Int(i32::from(*b))),
            Slot::Bool(b) => Some(ParamValue::from(*b)),
            Slot::Style(style) => style.clone().map(ParamValue::Style),
        }
    }

    /// A fresh slot with this slot's name and kind, holding `value`.
    fn repeat_with(&self, value: ParamValue) -> Result<Self, ParamError> {
        let mut param = Self::with_slot(self.name, self.kind, self.slot.emptied());
        param.set_value(value)?;
        Ok(param)
    }

    fn literal_mismatch(&self) -> ParamError {
        match self.literal_category() {
            Some(expected) => ParamError::ExpectedLiteral {
                param: self.name,
                expected,
            },
            None => ParamError::ExpectedStyle { param: self.name },
        }
    }
}

fn clamp_number(value: i32) -> i32 {
    value.clamp(NUMBER_MIN, NUMBER_MAX)
}

fn mask_bits(value: i32) -> u16 {
    (value & 0xFFFF) as u16
}

// ─── Styles ──────────────────────────────────────────────────────────────

/// One node of a style expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Style {
    os_name: &'static str,
    human_name: &'static str,
    category: Category,
    fixed_form: bool,
    params: SmallVec<[Param; 4]>,
    /// Length of the declared parameter list, excluding variadic repeats.
    declared: usize,
    /// Free text attached above the node.
    pub comment: String,
}

impl Style {
    pub fn new(
        os_name: &'static str,
        human_name: &'static str,
        category: Category,
        params: impl IntoIterator<Item = Param>,
    ) -> Self {
        let params: SmallVec<[Param; 4]> = params.into_iter().collect();
        debug_assert!(
            params.iter().rev().skip(1).all(|p| !p.is_variadic()),
            "only the last parameter of {os_name} may be variadic"
        );
        Self {
            os_name,
            human_name,
            category,
            fixed_form: false,
            declared: params.len(),
            params,
            comment: String::new(),
        }
    }

    /// Render without a `<...>` parameter list.
    pub fn fixed_form(mut self) -> Self {
        self.fixed_form = true;
        self
    }

    pub fn os_name(&self) -> &'static str {
        self.os_name
    }

    pub fn human_name(&self) -> &'static str {
        self.human_name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn kind(&self) -> StyleKind {
        StyleKind {
            fixed_form: self.fixed_form,
            ..StyleKind::of(self.category)
        }
    }

    pub fn is_fixed_form(&self) -> bool {
        self.fixed_form
    }

    /// Whether the last declared parameter may repeat.
    pub fn is_variadic(&self) -> bool {
        self.params.last().is_some_and(Param::is_variadic)
    }

    pub fn declared_len(&self) -> usize {
        self.declared
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn param(&self, idx: usize) -> Option<&Param> {
        self.params.get(idx)
    }

    pub fn param_mut(&mut self, idx: usize) -> Option<&mut Param> {
        self.params.get_mut(idx)
    }

    pub fn param_style(&self, idx: usize) -> Option<&Style> {
        self.param(idx).and_then(Param::as_style)
    }

    pub fn param_number(&self, idx: usize) -> Option<i32> {
        self.param(idx).and_then(Param::as_number)
    }

    pub fn param_bits(&self, idx: usize) -> Option<u16> {
        self.param(idx).and_then(Param::as_bits)
    }

    pub fn param_bool(&self, idx: usize) -> Option<bool> {
        self.param(idx).and_then(Param::as_bool)
    }

    /// Bind `values` in order, appending variadic repeats past the end.
    pub fn set_params(&mut self, values: impl IntoIterator<Item = ParamValue>) -> Result<(), ParamError> {
        let values: Vec<ParamValue> = values.into_iter().collect();
        if values.len() > self.params.len() && !self.is_variadic() {
            return Err(ParamError::TooManyValues {
                style: self.os_name,
                declared: self.params.len(),
                given: values.len(),
            });
        }
        for (idx, value) in values.into_iter().enumerate() {
            if idx < self.params.len() {
                self.set_param(idx, value)?;
            } else {
                self.add_param(value)?;
            }
        }
        Ok(())
    }

    pub fn set_param(&mut self, idx: usize, value: ParamValue) -> Result<(), ParamError> {
        let len = self.params.len();
        let style = self.os_name;
        self.params
            .get_mut(idx)
            .ok_or(ParamError::IndexOutOfRange { style, index: idx, len })?
            .set_value(value)
    }

    /// Append a repeat of the variadic tail.
    pub fn add_param(&mut self, value: ParamValue) -> Result<(), ParamError> {
        let param = self.repeat_tail(value)?;
        self.params.push(param);
        Ok(())
    }

    /// Insert a repeat of the variadic tail at `idx`. Only positions inside
    /// the variadic region are allowed.
    pub fn insert_param(&mut self, idx: usize, value: ParamValue) -> Result<(), ParamError> {
        let first_variadic = self.declared.saturating_sub(1);
        if idx < first_variadic || idx > self.params.len() {
            return Err(ParamError::IndexOutOfRange {
                style: self.os_name,
                index: idx,
                len: self.params.len(),
            });
        }
        let param = self.repeat_tail(value)?;
        self.params.insert(idx, param);
        Ok(())
    }

    /// Remove a variadic repeat. The declared parameters always stay.
    pub fn remove_param(&mut self, idx: usize) -> Result<Param, ParamError> {
        let param = self.params.get(idx).ok_or(ParamError::IndexOutOfRange {
            style: self.os_name,
            index: idx,
            len: self.params.len(),
        })?;
        if !param.is_variadic() {
            return Err(ParamError::NotVariadic { style: self.os_name });
        }
        if self.params.len() <= self.declared {
            return Err(ParamError::Required {
                style: self.os_name,
                param: param.name,
            });
        }
        Ok(self.params.remove(idx))
    }

    /// Every composite slot has a child.
    pub fn validate_params(&self) -> Result<(), ParamError> {
        match self.params.iter().find(|p| matches!(p.slot, Slot::Style(None))) {
            Some(param) => Err(ParamError::EmptyParam {
                style: self.os_name,
                param: param.name,
            }),
            None => Ok(()),
        }
    }

    fn repeat_tail(&self, value: ParamValue) -> Result<Param, ParamError> {
        match self.params.last() {
            Some(last) if last.is_variadic() => last.repeat_with(value),
            _ => Err(ParamError::NotVariadic { style: self.os_name }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn red() -> Style {
        Style::new("Red", "Red", Category::Color, []).fixed_form()
    }

    fn gradient() -> Style {
        Style::new(
            "Gradient",
            "Gradient",
            Category::Color,
            [Param::style("Color", CategorySet::COLOR, None).variadic()],
        )
    }

    fn fade() -> Style {
        Style::new("TrFade", "Fade", Category::Transition, [Param::number("Millis", 300)])
    }

    #[test]
    fn number_is_clamped_to_i16_range() {
        let mut param = Param::number("Value", 0);
        param.set_number(100_000).unwrap();
        assert_eq!(param.as_number(), Some(32767));
        param.set_number(-100_000).unwrap();
        assert_eq!(param.as_number(), Some(-32768));
        assert_eq!(Param::number("Power", 65536).as_number(), Some(32767));
    }

    #[test]
    fn reference_is_capped() {
        assert_eq!(Param::number("Power", 0).referencing(3).reference(), Some(3));
        assert_eq!(Param::number("Power", 0).referencing(12).reference(), Some(8));
        assert_eq!(Param::number("Power", 0).referencing(0).reference(), None);
    }

    #[test]
    fn bits_keep_low_sixteen() {
        let mut param = Param::bits("Pattern", 0);
        param.set_bits(0x1_0005).unwrap();
        assert_eq!(param.as_bits(), Some(5));
    }

    #[test]
    fn literal_slot_rejects_style() {
        let mut style = fade();
        let err = style.set_param(0, red().into()).unwrap_err();
        assert!(matches!(err, ParamError::ExpectedLiteral { param: "Millis", .. }));
    }

    #[test]
    fn composite_slot_checks_category() {
        let mut style = gradient();
        let err = style.set_param(0, fade().into()).unwrap_err();
        assert_eq!(
            err,
            ParamError::CategoryMismatch {
                param: "Color",
                expected: CategorySet::COLOR,
                found: Category::Transition,
            }
        );
        style.set_param(0, red().into()).unwrap();
        assert_eq!(style.param_style(0).map(Style::os_name), Some("Red"));
    }

    #[test]
    fn detach_leaves_slot_empty() {
        let mut style = gradient();
        style.set_param(0, red().into()).unwrap();
        let child = style.param_mut(0).unwrap().detach_style();
        assert_eq!(child.map(|c| c.os_name()), Some("Red"));
        assert!(style.param_style(0).is_none());
        assert!(style.validate_params().is_err());
    }

    #[test]
    fn variadic_tail_grows_and_shrinks() {
        let mut style = gradient();
        style
            .set_params([ParamValue::from(red()), red().into(), red().into()])
            .unwrap();
        assert_eq!(style.params().len(), 3);
        assert!(style.params().iter().all(|p| p.name() == "Color"));

        style.remove_param(1).unwrap();
        style.remove_param(1).unwrap();
        let err = style.remove_param(0).unwrap_err();
        assert!(matches!(err, ParamError::Required { .. }));
    }

    #[test]
    fn fixed_arity_rejects_extra_values() {
        let mut style = fade();
        let err = style.set_params([ParamValue::Int(1), ParamValue::Int(2)]).unwrap_err();
        assert_eq!(
            err,
            ParamError::TooManyValues {
                style: "TrFade",
                declared: 1,
                given: 2,
            }
        );
        assert!(matches!(style.add_param(1.into()), Err(ParamError::NotVariadic { .. })));
        assert!(matches!(style.remove_param(0), Err(ParamError::NotVariadic { .. })));
    }

    #[test]
    fn insert_only_inside_variadic_region() {
        let mut style = Style::new(
            "Mix",
            "Mix",
            Category::Color,
            [
                Param::number("Position", 0),
                Param::style("Color", CategorySet::COLOR, None).variadic(),
            ],
        );
        assert!(style.insert_param(0, red().into()).is_err());
        style.insert_param(1, red().into()).unwrap();
        assert_eq!(style.params().len(), 3);
        assert!(style.param_style(1).is_some());
        assert!(style.param_style(2).is_none());
    }

    #[test]
    fn clone_is_deep() {
        let mut original = gradient();
        original.set_param(0, red().into()).unwrap();
        let mut copy = original.clone();
        let _ = copy.param_mut(0).unwrap().detach_style();

        assert!(original.param_style(0).is_some());
        assert!(copy.param_style(0).is_none());
    }

    #[test]
    fn validate_names_first_empty_param() {
        let style = gradient();
        assert_eq!(
            style.validate_params(),
            Err(ParamError::EmptyParam {
                style: "Gradient",
                param: "Color",
            })
        );
        assert!(fade().validate_params().is_ok());
    }
}
