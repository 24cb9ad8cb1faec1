//! Name → factory lookup.
//!
//! Factories are grouped into sections. [`Registry::lookup`] probes the
//! sections in [`Section::PROBE_ORDER`] and returns the first hit, so when two
//! sections register the same name the earlier section wins.

use crate::catalog;
use crate::model::{ParamError, ParamValue, Style};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Registry section. Declaration order is the probe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Function,
    TimeFunction,
    Color,
    FixedColor,
    Builtin,
    Argument,
    LockupType,
    Effect,
    Transition,
    Layer,
    Wrapper,
}

impl Section {
    pub const PROBE_ORDER: [Section; 11] = [
        Section::Function,
        Section::TimeFunction,
        Section::Color,
        Section::FixedColor,
        Section::Builtin,
        Section::Argument,
        Section::LockupType,
        Section::Effect,
        Section::Transition,
        Section::Layer,
        Section::Wrapper,
    ];

    fn position(self) -> usize {
        self as usize
    }
}

/// Builds one kind of style.
#[derive(Debug, Clone, Copy)]
pub struct Factory {
    os_name: &'static str,
    construct: fn() -> Style,
}

impl Factory {
    pub fn new(construct: fn() -> Style) -> Self {
        Self {
            os_name: construct().os_name(),
            construct,
        }
    }

    pub fn os_name(&self) -> &'static str {
        self.os_name
    }

    /// The style with its declared defaults.
    pub fn construct(&self) -> Style {
        (self.construct)()
    }

    /// The style with `values` bound over its defaults.
    pub fn create(&self, values: Vec<ParamValue>) -> Result<Style, ParamError> {
        let mut style = self.construct();
        style.set_params(values)?;
        Ok(style)
    }
}

/// Sections of factories, probed in a fixed order.
#[derive(Debug, Clone)]
pub struct Registry {
    sections: [HashMap<&'static str, Factory>; 11],
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sections: Default::default(),
        }
    }

    /// Register `construct` under the name of the style it builds. Returns the
    /// factory it replaced in the same section, if any.
    pub fn register(&mut self, section: Section, construct: fn() -> Style) -> Option<Factory> {
        let factory = Factory::new(construct);
        self.sections[section.position()].insert(factory.os_name, factory)
    }

    pub fn lookup(&self, name: &str) -> Option<&Factory> {
        self.locate(name).map(|(_, factory)| factory)
    }

    /// The section that answers for `name`.
    pub fn section_of(&self, name: &str) -> Option<Section> {
        self.locate(name).map(|(section, _)| section)
    }

    pub fn lookup_in(&self, section: Section, name: &str) -> Option<&Factory> {
        self.sections[section.position()].get(name)
    }

    /// Names in one section, sorted.
    pub fn names(&self, section: Section) -> Vec<&'static str> {
        let mut names: Vec<_> = self.sections[section.position()].keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Names registered in more than one section, sorted.
    pub fn shadowed_names(&self) -> Vec<&'static str> {
        let mut seen: HashMap<&'static str, usize> = HashMap::new();
        for section in &self.sections {
            for name in section.keys() {
                *seen.entry(*name).or_default() += 1;
            }
        }
        let mut names: Vec<_> = seen
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name)
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn locate(&self, name: &str) -> Option<(Section, &Factory)> {
        Section::PROBE_ORDER
            .into_iter()
            .find_map(|section| self.lookup_in(section, name).map(|f| (section, f)))
    }
}

/// The registry of built-in style kinds, built on first use.
static BUILTIN: LazyLock<Registry> = LazyLock::new(|| {
    let registry = catalog::registry();
    log::debug!("built-in style registry ready ({} kinds)", registry.len());
    registry
});

pub fn builtin() -> &'static Registry {
    &BUILTIN
}

/// Look up `name` in the built-in registry.
pub fn lookup(name: &str) -> Option<&'static Factory> {
    BUILTIN.lookup(name)
}
