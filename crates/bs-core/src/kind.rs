//! Type tags for style nodes and parameter slots.
//!
//! Every node has exactly one [`Category`]. Parameter slots accept a
//! [`CategorySet`] and carry the `variadic` flag and an optional back-reference
//! to an earlier parameter. The packed 32-bit representation used by saved
//! configurations is still available through [`StyleKind::to_raw`] and the
//! free functions in [`raw`].

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU8;

// ─── Categories ──────────────────────────────────────────────────────────

/// The concrete category of a node or literal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Number,
    Bits,
    Bool,
    Wrapper,
    Builtin,
    Function,
    Function3D,
    Color,
    Layer,
    Transition,
    TimeFunction,
    Effect,
    LockupType,
    Argument,
}

impl Category {
    pub const ALL: [Category; 14] = [
        Category::Number,
        Category::Bits,
        Category::Bool,
        Category::Wrapper,
        Category::Builtin,
        Category::Function,
        Category::Function3D,
        Category::Color,
        Category::Layer,
        Category::Transition,
        Category::TimeFunction,
        Category::Effect,
        Category::LockupType,
        Category::Argument,
    ];

    /// The single-bit set for this category.
    pub const fn bit(self) -> CategorySet {
        match self {
            Category::Number => CategorySet::NUMBER,
            Category::Bits => CategorySet::BITS,
            Category::Bool => CategorySet::BOOL,
            Category::Wrapper => CategorySet::WRAPPER,
            Category::Builtin => CategorySet::BUILTIN,
            Category::Function => CategorySet::FUNCTION,
            Category::Function3D => CategorySet::FUNCTION_3D,
            Category::Color => CategorySet::COLOR,
            Category::Layer => CategorySet::LAYER,
            Category::Transition => CategorySet::TRANSITION,
            Category::TimeFunction => CategorySet::TIME_FUNCTION,
            Category::Effect => CategorySet::EFFECT,
            Category::LockupType => CategorySet::LOCKUP_TYPE,
            Category::Argument => CategorySet::ARGUMENT,
        }
    }

    /// Inverse of [`Category::bit`]. `None` unless exactly one bit is set.
    pub fn from_bit(set: CategorySet) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.bit() == set)
    }

    /// Number, Bits and Bool hold a literal instead of a child node.
    pub const fn is_literal(self) -> bool {
        matches!(self, Category::Number | Category::Bits | Category::Bool)
    }

    /// Identifier used in diagnostics and `Display`.
    pub const fn name(self) -> &'static str {
        match self {
            Category::Number => "Number",
            Category::Bits => "Bits",
            Category::Bool => "Bool",
            Category::Wrapper => "Wrapper",
            Category::Builtin => "Builtin",
            Category::Function => "Function",
            Category::Function3D => "Function3D",
            Category::Color => "Color",
            Category::Layer => "Layer",
            Category::Transition => "Transition",
            Category::TimeFunction => "TimeFunction",
            Category::Effect => "Effect",
            Category::LockupType => "LockupType",
            Category::Argument => "Argument",
        }
    }

    /// Label shown to users in the block editor.
    pub const fn label(self) -> &'static str {
        match self {
            Category::Number => "Number",
            Category::Bits => "Bits",
            Category::Bool => "Boolean",
            Category::Wrapper => "Wrapper",
            Category::Builtin => "BuiltIn",
            Category::Function => "Int",
            Category::Function3D => "3D Function",
            Category::Color => "Color",
            Category::Layer => "Layer (Transparent Color)",
            Category::Transition => "Transition",
            Category::TimeFunction => "Time Function",
            Category::Effect => "Effect",
            Category::LockupType => "LockupType",
            Category::Argument => "Argument",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// A set of categories. Used as the acceptance set of a parameter slot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CategorySet: u16 {
        const NUMBER        = 1 << 0;
        const BITS          = 1 << 1;
        const BOOL          = 1 << 2;
        const WRAPPER       = 1 << 3;
        const BUILTIN       = 1 << 4;
        const FUNCTION      = 1 << 5;
        const FUNCTION_3D   = 1 << 6;
        const COLOR         = 1 << 7;
        const LAYER         = 1 << 8;
        const TRANSITION    = 1 << 9;
        const TIME_FUNCTION = 1 << 10;
        const EFFECT        = 1 << 11;
        const LOCKUP_TYPE   = 1 << 12;
        const ARGUMENT      = 1 << 13;

        const LITERAL = Self::NUMBER.bits() | Self::BITS.bits() | Self::BOOL.bits();
        const STYLE = Self::WRAPPER.bits()
            | Self::BUILTIN.bits()
            | Self::FUNCTION.bits()
            | Self::FUNCTION_3D.bits()
            | Self::COLOR.bits()
            | Self::LAYER.bits()
            | Self::TRANSITION.bits()
            | Self::TIME_FUNCTION.bits()
            | Self::EFFECT.bits()
            | Self::LOCKUP_TYPE.bits()
            | Self::ARGUMENT.bits();
    }
}

impl CategorySet {
    pub fn accepts(self, category: Category) -> bool {
        self.contains(category.bit())
    }

    pub fn categories(self) -> impl Iterator<Item = Category> {
        Category::ALL.into_iter().filter(move |c| self.accepts(*c))
    }
}

impl From<Category> for CategorySet {
    fn from(category: Category) -> Self {
        category.bit()
    }
}

impl fmt::Display for CategorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for category in self.categories() {
            if !first {
                f.write_str(" | ")?;
            }
            f.write_str(category.name())?;
            first = false;
        }
        if first {
            f.write_str("()")?;
        }
        Ok(())
    }
}

// ─── Kinds ───────────────────────────────────────────────────────────────

/// Full type tag of a node or slot: categories plus flags.
///
/// For a node's own kind `categories` holds exactly one bit. For a slot it is
/// the acceptance set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleKind {
    pub categories: CategorySet,
    pub variadic: bool,
    pub fixed_form: bool,
    /// 1-based index of the parameter this slot refers back to.
    pub reference: Option<NonZeroU8>,
}

impl StyleKind {
    pub const fn of(category: Category) -> Self {
        Self::accepting(category.bit())
    }

    pub const fn accepting(categories: CategorySet) -> Self {
        Self {
            categories,
            variadic: false,
            fixed_form: false,
            reference: None,
        }
    }

    /// The concrete category, if exactly one is set.
    pub fn category(&self) -> Option<Category> {
        Category::from_bit(self.categories)
    }

    pub fn is_literal(&self) -> bool {
        self.categories.intersects(CategorySet::LITERAL)
    }

    /// Pack into the 32-bit layout: categories in bits 0–15, flags in
    /// 16–27, reference index in 28–31.
    pub fn to_raw(&self) -> u32 {
        let mut bits = u32::from(self.categories.bits());
        if self.variadic {
            bits |= raw::VARIADIC;
        }
        if self.fixed_form {
            bits |= raw::FIXED_FORM;
        }
        if let Some(reference) = self.reference {
            bits |= (u32::from(reference.get()) & raw::REF_FIELD) << raw::REF_OFFSET;
        }
        bits
    }

    /// Unpack a 32-bit kind. Unknown category and flag bits are dropped.
    pub fn from_raw(bits: u32) -> Self {
        let reference = raw::reference_index(bits);
        Self {
            categories: CategorySet::from_bits_truncate((raw::category(bits) & 0xFFFF) as u16),
            variadic: raw::is_variadic(bits),
            fixed_form: raw::is_fixed_form(bits),
            reference: NonZeroU8::new(reference),
        }
    }
}

impl From<Category> for StyleKind {
    fn from(category: Category) -> Self {
        Self::of(category)
    }
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.categories)?;
        if self.variadic {
            f.write_str("...")?;
        }
        Ok(())
    }
}

/// Operations on the packed 32-bit representation.
pub mod raw {
    pub const FLAG_OFFSET: u32 = 16;
    pub const REF_OFFSET: u32 = 28;
    pub const REF_FIELD: u32 = 0b1111;

    pub const VARIADIC: u32 = 0b1000_0000_0000 << FLAG_OFFSET;
    pub const FIXED_FORM: u32 = 0b0100_0000_0000 << FLAG_OFFSET;
    pub const REF_MASK: u32 = REF_FIELD << REF_OFFSET;

    /// Everything except the flag and reference bits.
    pub const FLAG_MASK: u32 = !(VARIADIC | FIXED_FORM | REF_MASK);
    /// Union of the node categories (excludes Number, Bits and Bool).
    pub const STYLE_CATEGORY_MASK: u32 = super::CategorySet::STYLE.bits() as u32;

    pub const fn category(kind: u32) -> u32 {
        kind & FLAG_MASK
    }

    pub const fn is_variadic(kind: u32) -> bool {
        kind & VARIADIC != 0
    }

    pub const fn is_fixed_form(kind: u32) -> bool {
        kind & FIXED_FORM != 0
    }

    /// 0 means "no reference".
    pub const fn reference_index(kind: u32) -> u8 {
        ((kind >> REF_OFFSET) & REF_FIELD) as u8
    }
}
