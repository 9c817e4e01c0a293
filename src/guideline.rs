//! Heat-stress guideline banding
//!
//! Wet-bulb temperatures are grouped into six risk bands following the Japanese
//! Ministry of the Environment heat-illness guidelines
//! (<https://www.wbgt.env.go.jp/en/wbgt.php>), plus a top band for 35°C and
//! above, the theoretical limit of human survivability.
//!
//! Each band owns a half-open range `[lower, upper)`. The ranges partition the
//! real line: the lowest band starts at negative infinity and the highest band
//! is unbounded above (it also contains positive infinity).

use serde::{Deserialize, Serialize};

use crate::error::WetBulbError;
use crate::types::Conditions;

/// Risk band for a wet-bulb temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Guideline {
    Safe,
    Caution,
    Warning,
    Severe,
    Danger,
    Death,
}

/// Range and display metadata for one band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub guideline: Guideline,
    /// Inclusive lower bound (°C)
    pub lower: f64,
    /// Exclusive upper bound (°C); `INFINITY` for the top band
    pub upper: f64,
    /// ARGB color
    pub color: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
}

impl Band {
    /// Whether `wet_bulb` falls in this band
    pub fn contains(&self, wet_bulb: f64) -> bool {
        wet_bulb >= self.lower && (wet_bulb < self.upper || self.upper == f64::INFINITY)
    }
}

/// Band table, sorted ascending by range
pub static BANDS: [Band; 6] = [
    Band {
        guideline: Guideline::Safe,
        lower: f64::NEG_INFINITY,
        upper: 21.0,
        color: 0xff6b_a833,
        title: "Almost safe",
        description: "Low risk of heat illness. Stay hydrated during heavy exercise.",
        emoji: "\u{2705}",
    },
    Band {
        guideline: Guideline::Caution,
        lower: 21.0,
        upper: 25.0,
        color: 0xffa0_d2ff,
        title: "Caution",
        description: "Heat illness is possible during heavy exercise or labor. Drink water regularly.",
        emoji: "\u{2600}\u{fe0f}",
    },
    Band {
        guideline: Guideline::Warning,
        lower: 25.0,
        upper: 28.0,
        color: 0xfffa_f500,
        title: "Warning",
        description: "Take frequent breaks during activity and avoid exertion in direct sun.",
        emoji: "\u{26a0}\u{fe0f}",
    },
    Band {
        guideline: Guideline::Severe,
        lower: 28.0,
        upper: 31.0,
        color: 0xffff_9600,
        title: "Severe warning",
        description: "Avoid strenuous exercise outdoors. Heat illness can occur even at rest.",
        emoji: "\u{203c}\u{fe0f}",
    },
    Band {
        guideline: Guideline::Danger,
        lower: 31.0,
        upper: 35.0,
        color: 0xffff_2800,
        title: "Danger",
        description: "Stop outdoor activity. Stay in a cooled space wherever possible.",
        emoji: "\u{2620}\u{fe0f}",
    },
    Band {
        guideline: Guideline::Death,
        lower: 35.0,
        upper: f64::INFINITY,
        color: 0xff00_0000,
        title: "Beyond survivable",
        description: "The body can no longer shed heat by sweating. Prolonged exposure is fatal.",
        emoji: "\u{1faa6}",
    },
];

impl Guideline {
    /// All bands in ascending order
    pub const ALL: [Guideline; 6] = [
        Guideline::Safe,
        Guideline::Caution,
        Guideline::Warning,
        Guideline::Severe,
        Guideline::Danger,
        Guideline::Death,
    ];

    /// Classify a wet-bulb temperature (°C) into its band.
    ///
    /// Returns [`WetBulbError::InvalidInput`] for NaN, which no band contains.
    pub fn classify(wet_bulb: f64) -> Result<Guideline, WetBulbError> {
        BANDS
            .iter()
            .find(|band| band.contains(wet_bulb))
            .map(|band| band.guideline)
            .ok_or_else(|| {
                WetBulbError::InvalidInput(format!("wet-bulb temperature {wet_bulb} has no band"))
            })
    }

    /// Classify the wet-bulb estimate of a set of conditions
    pub fn for_conditions(conditions: &Conditions) -> Result<Guideline, WetBulbError> {
        Self::classify(conditions.wet_bulb_estimate())
    }

    /// Position in the ascending band order (0 = safe)
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Look up a band by its position in the ascending order
    pub fn from_index(index: usize) -> Option<Guideline> {
        Self::ALL.get(index).copied()
    }

    pub fn band(&self) -> &'static Band {
        &BANDS[self.index()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Guideline::Safe => "safe",
            Guideline::Caution => "caution",
            Guideline::Warning => "warning",
            Guideline::Severe => "severe",
            Guideline::Danger => "danger",
            Guideline::Death => "death",
        }
    }

    pub fn color(&self) -> u32 {
        self.band().color
    }

    /// Color as `#rrggbb` (alpha dropped)
    pub fn color_hex(&self) -> String {
        format!("#{:06x}", self.color() & 0x00ff_ffff)
    }

    pub fn title(&self) -> &'static str {
        self.band().title
    }

    pub fn description(&self) -> &'static str {
        self.band().description
    }

    pub fn emoji(&self) -> &'static str {
        self.band().emoji
    }
}

/// Classify a wet-bulb temperature (°C)
pub fn classify(wet_bulb: f64) -> Result<Guideline, WetBulbError> {
    Guideline::classify(wet_bulb)
}
