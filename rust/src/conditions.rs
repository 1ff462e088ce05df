//! Metabolic conditions.
//!
//! A condition rescales the synthesis and decay rate constants of a model.
//! Reduced metabolism slows transcription and translation; carbon limitation
//! also slows turnover.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GramError;

/// One of the four fixed physiological states.
///
/// Variant order is the panel order used everywhere results are listed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Normal,
    Diabetic,
    Minute,
    CarbonLimited,
}

/// Multiplicative rate adjustments imposed by a condition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateScaling {
    /// Applied to transcription (`k0`).
    pub transcription: f64,
    /// Applied to translation (`k1`).
    pub translation: f64,
    /// Applied to every first-order decay constant.
    pub decay: f64,
}

impl RateScaling {
    /// Repressors are themselves expressed, so both synthesis steps apply.
    pub fn repressor_synthesis(&self) -> f64 {
        self.transcription * self.translation
    }
}

impl Condition {
    /// All conditions in panel order.
    pub const ALL: [Condition; 4] = [
        Condition::Normal,
        Condition::Diabetic,
        Condition::Minute,
        Condition::CarbonLimited,
    ];

    /// Key used in results files and figure captions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Normal => "normal",
            Condition::Diabetic => "diabetic",
            Condition::Minute => "minute",
            Condition::CarbonLimited => "carbon_limited",
        }
    }

    pub fn scaling(&self) -> RateScaling {
        match self {
            Condition::Normal => RateScaling {
                transcription: 1.0,
                translation: 1.0,
                decay: 1.0,
            },
            Condition::Diabetic => RateScaling {
                transcription: 0.5,
                translation: 0.5,
                decay: 1.0,
            },
            Condition::Minute => RateScaling {
                transcription: 1.0,
                translation: 0.5,
                decay: 1.0,
            },
            Condition::CarbonLimited => RateScaling {
                transcription: 0.5,
                translation: 0.5,
                decay: 0.5,
            },
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = GramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| GramError::UnknownCondition(s.to_string()))
    }
}
