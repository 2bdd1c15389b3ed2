//! Parametric palette remapping. A rule table classifies each color
//! table entry by its own channel values and rewrites it in place;
//! entries matching no rule are left unchanged.

use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Inclusive channel bounds. Defaults to the full 0..=255 range so a
/// TOML rule only has to name the channels it constrains.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelRange {
    #[serde(default)]
    pub min: u8,
    #[serde(default = "ChannelRange::max_default")]
    pub max: u8,
}

impl ChannelRange {
    fn max_default() -> u8 {
        255
    }

    pub fn contains(&self, value: u8) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for ChannelRange {
    fn default() -> Self {
        ChannelRange { min: 0, max: 255 }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Matcher {
    /// Matches one color exactly. Exact matchers take precedence over
    /// every range matcher in the table.
    Exact([u8; 3]),
    /// Per-channel range test; unnamed channels default to 0..=255.
    Channels {
        #[serde(default)]
        r: ChannelRange,
        #[serde(default)]
        g: ChannelRange,
        #[serde(default)]
        b: ChannelRange,
    },
    /// Mean of the three channels within `min..=max`.
    Luma { min: u8, max: u8 },
    /// Near-gray: max pairwise channel difference within `tolerance`,
    /// luma within `min..=max`.
    Gray { tolerance: u8, min: u8, max: u8 },
    /// Conjunction of matchers.
    All(Vec<Matcher>),
}

impl Matcher {
    pub fn matches(&self, color: [u8; 3]) -> bool {
        let [r, g, b] = color;
        match self {
            Matcher::Exact(target) => *target == color,
            Matcher::Channels { r: rr, g: gr, b: br } => {
                rr.contains(r) && gr.contains(g) && br.contains(b)
            }
            Matcher::Luma { min, max } => {
                let luma = luma(color);
                luma >= *min && luma <= *max
            }
            Matcher::Gray { tolerance, min, max } => {
                let spread = r.max(g).max(b) - r.min(g).min(b);
                let luma = luma(color);
                spread <= *tolerance && luma >= *min && luma <= *max
            }
            Matcher::All(parts) => parts.iter().all(|m| m.matches(color)),
        }
    }

    fn is_exact(&self) -> bool {
        match self {
            Matcher::Exact(_) => true,
            Matcher::All(parts) => parts.iter().any(Matcher::is_exact),
            _ => false,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Replace with a fixed color.
    Fixed([u8; 3]),
    /// Gradient replacement: each output channel is the entry's luma
    /// scaled by `scale`, clamped to `clamp`.
    Ramp { scale: [f32; 3], clamp: [u8; 3] },
    /// Leave the entry untouched. Lets a rule table pin its own output
    /// colors as fixed points, which makes re-running it idempotent.
    Keep,
}

impl Action {
    pub fn resolve(&self, color: [u8; 3]) -> [u8; 3] {
        match self {
            Action::Fixed(replacement) => *replacement,
            Action::Ramp { scale, clamp } => {
                let luma = f32::from(luma(color));
                let channel = |i: usize| {
                    let scaled = (luma * scale[i]).round().max(0.0) as u32;
                    scaled.min(u32::from(clamp[i])) as u8
                };
                [channel(0), channel(1), channel(2)]
            }
            Action::Keep => color,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Rule {
    pub matcher: Matcher,
    pub action: Action,
}

/// An ordered rule table. Per entry, exact rules are evaluated first
/// (in table order), then range rules (in table order); the first
/// matching rule wins.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        RuleSet { rules }
    }

    /// Remaps a single color through the table. Depends only on the
    /// channel values, never on table position.
    pub fn remap(&self, color: [u8; 3]) -> [u8; 3] {
        for rule in self.rules.iter().filter(|r| r.matcher.is_exact()) {
            if rule.matcher.matches(color) {
                return rule.action.resolve(color);
            }
        }
        for rule in self.rules.iter().filter(|r| !r.matcher.is_exact()) {
            if rule.matcher.matches(color) {
                return rule.action.resolve(color);
            }
        }
        color
    }

    /// Visits every palette entry exactly once, in table order, and
    /// rewrites it in place. Returns the number of entries changed.
    pub fn apply(&self, palette: &mut [[u8; 3]]) -> usize {
        let mut changed = 0;
        for (index, entry) in palette.iter_mut().enumerate() {
            let replacement = self.remap(*entry);
            if replacement != *entry {
                debug!(
                    "Entry {}: ({},{},{}) -> ({},{},{})",
                    index, entry[0], entry[1], entry[2], replacement[0], replacement[1],
                    replacement[2]
                );
                *entry = replacement;
                changed += 1;
            }
        }
        info!("Remapped {} of {} entries", changed, palette.len());
        changed
    }
}

/// A fixed composition of remap passes, run once each in declaration
/// order. Replaces the ad hoc layering of successive hand-run scripts.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Pipeline {
    pub passes: Vec<Pass>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Pass {
    pub name: String,
    pub rules: RuleSet,
}

impl Pipeline {
    pub fn apply(&self, palette: &mut [[u8; 3]]) -> usize {
        let mut changed = 0;
        for pass in &self.passes {
            debug!("Running pass {:?}", pass.name);
            changed += pass.rules.apply(palette);
        }
        changed
    }
}

pub fn luma(color: [u8; 3]) -> u8 {
    ((u16::from(color[0]) + u16::from(color[1]) + u16::from(color[2])) / 3) as u8
}
