//! Maps forecast condition text to an animation identifier.
//!
//! Rules are checked top to bottom and the first hit wins, so the specific
//! "partly cloudy" rule must stay above the generic "cloud" one.

use serde::{Deserialize, Serialize};

/// Symbolic weather animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationId {
    ClearDay,
    ClearNight,
    PartlyCloudyDay,
    PartlyCloudyNight,
    Rain,
    Snow,
    Cloudy,
}

impl AnimationId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClearDay => "clear-day",
            Self::ClearNight => "clear-night",
            Self::PartlyCloudyDay => "partly-cloudy-day",
            Self::PartlyCloudyNight => "partly-cloudy-night",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Cloudy => "cloudy",
        }
    }

    /// Single-glyph rendering for terminals
    pub fn glyph(self) -> &'static str {
        match self {
            Self::ClearDay => "☀",
            Self::ClearNight => "☾",
            Self::PartlyCloudyDay => "⛅",
            Self::PartlyCloudyNight => "☁",
            Self::Rain => "☂",
            Self::Snow => "❄",
            Self::Cloudy => "☁",
        }
    }
}

impl std::fmt::Display for AnimationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

struct IconRule {
    keywords: &'static [&'static str],
    day: AnimationId,
    night: AnimationId,
}

impl IconRule {
    fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k))
    }
}

const RULES: &[IconRule] = &[
    IconRule {
        keywords: &["clear"],
        day: AnimationId::ClearDay,
        night: AnimationId::ClearNight,
    },
    IconRule {
        keywords: &["partly cloudy", "partly-cloudy", "few clouds"],
        day: AnimationId::PartlyCloudyDay,
        night: AnimationId::PartlyCloudyNight,
    },
    IconRule {
        keywords: &["rain", "shower"],
        day: AnimationId::Rain,
        night: AnimationId::Rain,
    },
    IconRule {
        keywords: &["snow", "sleet"],
        day: AnimationId::Snow,
        night: AnimationId::Snow,
    },
    IconRule {
        keywords: &["cloud"],
        day: AnimationId::Cloudy,
        night: AnimationId::Cloudy,
    },
];

/// Resolve a condition descriptor (e.g. "Partly Cloudy") to an animation.
/// Unmatched text falls back to the clear variant for the time of day.
pub fn resolve_icon(condition_text: &str, is_daytime: bool) -> AnimationId {
    let text = condition_text.to_lowercase();
    let pick = |rule: &IconRule| if is_daytime { rule.day } else { rule.night };

    RULES
        .iter()
        .find(|rule| rule.matches(&text))
        .map(pick)
        .unwrap_or(if is_daytime {
            AnimationId::ClearDay
        } else {
            AnimationId::ClearNight
        })
}
