//! Built-in remap rule tables, one per historical recoloring of the
//! robot's expressions, plus loading of custom tables from TOML.
//!
//! Every preset leads with Keep guards pinning its own output colors,
//! so applying a preset to its own output changes nothing.

use lib_gif::remap::{Action, ChannelRange, Matcher, Pass, Pipeline, Rule, RuleSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PresetError {
    #[error("Unknown preset {0:?}; available: {}", PRESET_NAMES.join(", "))]
    UnknownPreset(String),
    #[error("Failed to read rule file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse rule file: {0}")]
    Parse(#[from] toml::de::Error),
}

pub const PRESET_NAMES: [&str; 3] = ["eye-yellow", "sad-blue", "anger-red"];

pub fn by_name(name: &str) -> Result<Pipeline, PresetError> {
    match name {
        "eye-yellow" => Ok(single_pass("eye-yellow", eye_yellow())),
        "sad-blue" => Ok(single_pass("sad-blue", sad_blue())),
        "anger-red" => Ok(single_pass("anger-red", anger_red())),
        other => Err(PresetError::UnknownPreset(other.to_string())),
    }
}

pub fn load_rules(path: &Path) -> Result<Pipeline, PresetError> {
    let text = fs::read_to_string(path)?;
    Ok(toml::from_str(&text)?)
}

fn single_pass(name: &str, rules: RuleSet) -> Pipeline {
    Pipeline {
        passes: vec![Pass {
            name: name.to_string(),
            rules,
        }],
    }
}

fn range(min: u8, max: u8) -> ChannelRange {
    ChannelRange { min, max }
}

/// White eyes on black become bright yellow; near-black noise collapses
/// to pure black; mid grays turn into a darker yellow ramp.
fn eye_yellow() -> RuleSet {
    RuleSet::new(vec![
        Rule {
            matcher: Matcher::Exact([0, 0, 0]),
            action: Action::Keep,
        },
        Rule {
            matcher: Matcher::Channels {
                r: range(0, 9),
                g: range(0, 9),
                b: range(0, 9),
            },
            action: Action::Fixed([0, 0, 0]),
        },
        Rule {
            matcher: Matcher::Channels {
                r: range(201, 255),
                g: range(201, 255),
                b: range(201, 255),
            },
            action: Action::Fixed([255, 215, 0]),
        },
        Rule {
            matcher: Matcher::Gray {
                tolerance: 20,
                min: 51,
                max: 199,
            },
            action: Action::Ramp {
                scale: [1.2, 1.008, 0.0],
                clamp: [255, 200, 0],
            },
        },
    ])
}

/// Yellow eyes become a blue tear gradient: the brightest yellows turn
/// dodger blue, highlights sky blue, mid tones cyan, shadows a deep
/// cyan ramp. Pure black background is untouched.
fn sad_blue() -> RuleSet {
    let yellowish = || Matcher::Channels {
        r: range(51, 255),
        g: range(41, 255),
        b: range(0, 49),
    };
    RuleSet::new(vec![
        Rule {
            matcher: Matcher::Exact([0, 0, 0]),
            action: Action::Keep,
        },
        Rule {
            matcher: Matcher::All(vec![yellowish(), Matcher::Luma { min: 134, max: 255 }]),
            action: Action::Fixed([30, 144, 255]),
        },
        Rule {
            matcher: Matcher::All(vec![yellowish(), Matcher::Luma { min: 101, max: 133 }]),
            action: Action::Fixed([135, 206, 235]),
        },
        Rule {
            matcher: Matcher::All(vec![yellowish(), Matcher::Luma { min: 68, max: 100 }]),
            action: Action::Fixed([0, 206, 209]),
        },
        Rule {
            matcher: yellowish(),
            action: Action::Ramp {
                scale: [0.2, 1.2, 1.8],
                clamp: [255, 180, 220],
            },
        },
    ])
}

/// Luminance classes map onto a red gradient: highlights to pure red,
/// the main body to crimson, shadows to dark red, anything else that
/// is not background to a plain red ramp.
fn anger_red() -> RuleSet {
    RuleSet::new(vec![
        Rule {
            matcher: Matcher::Exact([0, 0, 0]),
            action: Action::Keep,
        },
        Rule {
            matcher: Matcher::Exact([220, 20, 60]),
            action: Action::Keep,
        },
        // Anything already in the pure red family is a fixed point.
        Rule {
            matcher: Matcher::Channels {
                r: range(0, 255),
                g: range(0, 0),
                b: range(0, 0),
            },
            action: Action::Keep,
        },
        Rule {
            matcher: Matcher::Channels {
                r: range(201, 255),
                g: range(151, 255),
                b: range(0, 255),
            },
            action: Action::Fixed([255, 0, 0]),
        },
        Rule {
            matcher: Matcher::Channels {
                r: range(151, 255),
                g: range(101, 255),
                b: range(0, 99),
            },
            action: Action::Fixed([220, 20, 60]),
        },
        Rule {
            matcher: Matcher::Channels {
                r: range(101, 255),
                g: range(51, 255),
                b: range(0, 79),
            },
            action: Action::Fixed([139, 0, 0]),
        },
        Rule {
            matcher: Matcher::Luma { min: 11, max: 255 },
            action: Action::Ramp {
                scale: [2.0, 0.0, 0.0],
                clamp: [255, 0, 0],
            },
        },
    ])
}
