//! Built-in style kinds.
//!
//! A representative subset of the ProffieOS style templates, enough to write
//! and round-trip real blade styles. Each constructor returns the kind with
//! its declared defaults.

use crate::kind::{Category, CategorySet};
use crate::model::{Param, Style};
use crate::registry::{Registry, Section};

const FUNC: CategorySet = CategorySet::FUNCTION;
const COLOR: CategorySet = CategorySet::COLOR;
const LAYER: CategorySet = CategorySet::LAYER;
const TRANSITION: CategorySet = CategorySet::TRANSITION;

/// Build a registry holding every built-in kind.
pub fn registry() -> Registry {
    let mut registry = Registry::new();

    for construct in FUNCTIONS {
        registry.register(Section::Function, *construct);
    }
    for construct in TIME_FUNCTIONS {
        registry.register(Section::TimeFunction, *construct);
    }
    for construct in COLORS {
        registry.register(Section::Color, *construct);
    }
    for construct in FIXED_COLORS {
        registry.register(Section::FixedColor, *construct);
    }
    for construct in BUILTINS {
        registry.register(Section::Builtin, *construct);
    }
    for construct in ARGUMENTS {
        registry.register(Section::Argument, *construct);
    }
    for construct in LOCKUP_TYPES {
        registry.register(Section::LockupType, *construct);
    }
    for construct in EFFECTS {
        registry.register(Section::Effect, *construct);
    }
    for construct in TRANSITIONS {
        registry.register(Section::Transition, *construct);
    }
    for construct in LAYERS {
        registry.register(Section::Layer, *construct);
    }
    for construct in WRAPPERS {
        registry.register(Section::Wrapper, *construct);
    }

    registry
}

/// A bare name rendered without a parameter list.
fn constant(name: &'static str, category: Category) -> Style {
    Style::new(name, name, category, []).fixed_form()
}

/// `Int<value>`, the usual default for function slots.
pub fn int(value: i32) -> Style {
    let mut style = Style::new("Int", "Integer", Category::Function, [Param::number("Value", 0)]);
    if let Some(param) = style.param_mut(0) {
        let _ = param.set_number(value);
    }
    style
}

// ─── Functions ───────────────────────────────────────────────────────────

const FUNCTIONS: &[fn() -> Style] = &[
    || int(0),
    || {
        Style::new(
            "Scale",
            "Scale",
            Category::Function,
            [
                Param::style("Input", FUNC, None),
                Param::style("Low", FUNC, Some(int(0))),
                Param::style("High", FUNC, Some(int(32768))),
            ],
        )
    },
    || {
        Style::new(
            "Sum",
            "Sum",
            Category::Function,
            [Param::style("Value", FUNC, None).variadic()],
        )
    },
    || {
        Style::new(
            "Bump",
            "Bump",
            Category::Function,
            [
                Param::style("Position", FUNC, Some(int(16384))),
                Param::style("Width", FUNC, Some(int(16384))),
            ],
        )
    },
    || {
        Style::new(
            "SwingSpeed",
            "Swing Speed",
            Category::Function,
            [Param::number("Max", 600)],
        )
    },
    || {
        Style::new(
            "IntArg",
            "Argument Integer",
            Category::Function,
            [
                Param::style("Argument", CategorySet::ARGUMENT, None),
                Param::number("Default", 0),
            ],
        )
    },
    || constant("BatteryLevel", Category::Function),
];

// ─── Time functions ──────────────────────────────────────────────────────

const TIME_FUNCTIONS: &[fn() -> Style] = &[
    || {
        Style::new(
            "BendTimePowX",
            "Exponential Time Bend",
            Category::TimeFunction,
            [
                Param::style("Time (ms)", FUNC | CategorySet::TIME_FUNCTION, Some(int(1000))),
                Param::style("Power", FUNC, Some(int(65536))),
            ],
        )
    },
    || {
        Style::new(
            "BendTimePowInvX",
            "Inverse Exponential Time Bend",
            Category::TimeFunction,
            [
                Param::style("Time (ms)", FUNC | CategorySet::TIME_FUNCTION, Some(int(1000))),
                Param::style("Power", FUNC, Some(int(65536))).referencing(1),
            ],
        )
    },
    || {
        Style::new(
            "ReverseTimeX",
            "Reverse Time",
            Category::TimeFunction,
            [Param::style("Time (ms)", FUNC | CategorySet::TIME_FUNCTION, Some(int(1000)))],
        )
    },
    || {
        Style::new(
            "BendTimePow",
            "Time Bend",
            Category::TimeFunction,
            [Param::number("Millis", 1000), Param::number("Power", 65536)],
        )
    },
    || {
        Style::new(
            "BendTimePowInv",
            "Inverse Time Bend",
            Category::TimeFunction,
            [
                Param::number("Millis", 1000),
                Param::number("Power", 65536).referencing(1),
            ],
        )
    },
    || {
        Style::new(
            "ReverseTime",
            "Reverse Time",
            Category::TimeFunction,
            [Param::number("Millis", 1000)],
        )
    },
];

// ─── Colors ──────────────────────────────────────────────────────────────

const COLORS: &[fn() -> Style] = &[
    || {
        Style::new(
            "Rgb",
            "RGB Color",
            Category::Color,
            [
                Param::number("Red", 0),
                Param::number("Green", 0),
                Param::number("Blue", 0),
            ],
        )
    },
    || {
        Style::new(
            "Mix",
            "Mix",
            Category::Color,
            [
                Param::style("Position", FUNC, None),
                Param::style("Color", COLOR, None).variadic(),
            ],
        )
    },
    || {
        Style::new(
            "Gradient",
            "Gradient",
            Category::Color,
            [Param::style("Color", COLOR, None).variadic()],
        )
    },
    || {
        Style::new(
            "AudioFlicker",
            "Audio Flicker",
            Category::Color,
            [
                Param::style("Color A", COLOR, None),
                Param::style("Color B", COLOR, None),
            ],
        )
    },
    || {
        Style::new(
            "RandomFlicker",
            "Random Flicker",
            Category::Color,
            [
                Param::style("Color A", COLOR, None),
                Param::style("Color B", COLOR, None),
            ],
        )
    },
    || {
        Style::new(
            "Pulsing",
            "Pulsing",
            Category::Color,
            [
                Param::style("Color A", COLOR, None),
                Param::style("Color B", COLOR, None),
                Param::number("Pulse Millis", 1200),
            ],
        )
    },
    || {
        Style::new(
            "Stripes",
            "Stripes",
            Category::Color,
            [
                Param::number("Width", 1000),
                Param::number("Speed", 1000),
                Param::style("Color", COLOR, None).variadic(),
            ],
        )
    },
    || {
        Style::new(
            "Sequence",
            "Sequence",
            Category::Color,
            [
                Param::style("On Color", COLOR, None),
                Param::style("Off Color", COLOR, Some(constant("Black", Category::Color))),
                Param::number("Millis per Bit", 100),
                Param::number("Bits", 16),
                Param::bits("Pattern", 0).variadic(),
            ],
        )
    },
    || {
        Style::new(
            "RgbArg",
            "Argument Color",
            Category::Color,
            [
                Param::style("Argument", CategorySet::ARGUMENT, None),
                Param::style("Default", COLOR, None),
            ],
        )
    },
    || {
        Style::new(
            "Layers",
            "Layers",
            Category::Color,
            [
                Param::style("Base", COLOR, None),
                Param::style("Layer", LAYER, None).variadic(),
            ],
        )
    },
];

const FIXED_COLORS: &[fn() -> Style] = &[
    || constant("Red", Category::Color),
    || constant("Green", Category::Color),
    || constant("Blue", Category::Color),
    || constant("White", Category::Color),
    || constant("Black", Category::Color),
    || constant("Yellow", Category::Color),
    || constant("Cyan", Category::Color),
    || constant("Magenta", Category::Color),
    || constant("Orange", Category::Color),
    || constant("DeepSkyBlue", Category::Color),
];

// ─── Builtins, arguments, lockups, effects ──────────────────────────────

const BUILTINS: &[fn() -> Style] = &[
    || Style::new("style_pov", "POV", Category::Builtin, []),
    || Style::new("style_charging", "Charging", Category::Builtin, []),
];

const ARGUMENTS: &[fn() -> Style] = &[
    || constant("BASE_COLOR_ARG", Category::Argument),
    || constant("ALT_COLOR_ARG", Category::Argument),
    || constant("BLAST_COLOR_ARG", Category::Argument),
    || constant("CLASH_COLOR_ARG", Category::Argument),
    || constant("LOCKUP_COLOR_ARG", Category::Argument),
    || constant("IGNITION_TIME_ARG", Category::Argument),
    || constant("RETRACTION_TIME_ARG", Category::Argument),
    || constant("STYLE_OPTION_ARG", Category::Argument),
];

const LOCKUP_TYPES: &[fn() -> Style] = &[
    || constant("LOCKUP_NORMAL", Category::LockupType),
    || constant("LOCKUP_DRAG", Category::LockupType),
    || constant("LOCKUP_MELT", Category::LockupType),
    || constant("LOCKUP_LIGHTNING_BLOCK", Category::LockupType),
];

const EFFECTS: &[fn() -> Style] = &[
    || constant("EFFECT_CLASH", Category::Effect),
    || constant("EFFECT_BLAST", Category::Effect),
    || constant("EFFECT_STAB", Category::Effect),
    || constant("EFFECT_FORCE", Category::Effect),
    || constant("EFFECT_IGNITION", Category::Effect),
    || constant("EFFECT_RETRACTION", Category::Effect),
    || constant("EFFECT_BOOT", Category::Effect),
];

// ─── Transitions ─────────────────────────────────────────────────────────

const TRANSITIONS: &[fn() -> Style] = &[
    || Style::new("TrFade", "Fade", Category::Transition, [Param::number("Millis", 300)]),
    || Style::new("TrWipe", "Wipe", Category::Transition, [Param::number("Millis", 300)]),
    || Style::new("TrWipeIn", "Wipe In", Category::Transition, [Param::number("Millis", 300)]),
    || Style::new("TrDelay", "Delay", Category::Transition, [Param::number("Millis", 300)]),
    || {
        Style::new(
            "TrFadeX",
            "Fade (Function)",
            Category::Transition,
            [Param::style("Millis", FUNC | CategorySet::TIME_FUNCTION, Some(int(300)))],
        )
    },
    || constant("TrInstant", Category::Transition),
    || {
        Style::new(
            "TrConcat",
            "Concatenate",
            Category::Transition,
            [Param::style("Step", TRANSITION | COLOR, None).variadic()],
        )
    },
];

// ─── Layers ──────────────────────────────────────────────────────────────

const LAYERS: &[fn() -> Style] = &[
    || {
        Style::new(
            "AlphaL",
            "Alpha Layer",
            Category::Layer,
            [
                Param::style("Color", COLOR, None),
                Param::style("Alpha", FUNC, None),
            ],
        )
    },
    || Style::new("BlastL", "Blast", Category::Layer, [Param::style("Color", COLOR, None)]),
    || {
        Style::new(
            "SimpleClashL",
            "Simple Clash",
            Category::Layer,
            [Param::style("Color", COLOR, None)],
        )
    },
    || {
        Style::new(
            "LockupTrL",
            "Lockup",
            Category::Layer,
            [
                Param::style("Color", COLOR, None),
                Param::style("Begin", TRANSITION, None),
                Param::style("End", TRANSITION, None),
                Param::style("Lockup Type", CategorySet::LOCKUP_TYPE, None),
            ],
        )
    },
    || {
        Style::new(
            "TransitionEffectL",
            "Transition Effect",
            Category::Layer,
            [
                Param::style("Transition", TRANSITION, None),
                Param::style("Effect", CategorySet::EFFECT, None),
            ],
        )
    },
    || {
        Style::new(
            "InOutTrL",
            "Ignition/Retraction",
            Category::Layer,
            [
                Param::style("Ignition", TRANSITION, None),
                Param::style("Retraction", TRANSITION, None),
                Param::style("Off Color", COLOR, Some(constant("Black", Category::Color))),
                Param::boolean("Allow Disable", false),
            ],
        )
    },
];

// ─── Wrappers ────────────────────────────────────────────────────────────

const WRAPPERS: &[fn() -> Style] = &[
    || Style::new("StylePtr", "Style", Category::Wrapper, [Param::style("Style", COLOR, None)]),
    || {
        Style::new(
            "ChargingStylePtr",
            "Charging Style",
            Category::Wrapper,
            [Param::style("Style", COLOR, None)],
        )
    },
    || {
        Style::new(
            "StyleFirePtr",
            "Fire Style",
            Category::Wrapper,
            [
                Param::style("Hot Color", COLOR, None),
                Param::style("Cold Color", COLOR, None),
            ],
        )
    },
];
