//! Priority value object.

use serde::{Deserialize, Serialize};

/// Severity of a notification.
///
/// Ordering follows severity and only drives presentation: embed colors,
/// title glyphs and the log level used by the stdout channel.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PriorityLevel {
    /// Informational only.
    Low,
    /// Standard notifications.
    #[default]
    Normal,
    /// Important events.
    High,
    /// Requires immediate attention.
    Critical,
}

impl PriorityLevel {
    /// All priorities, least severe first.
    pub const ALL: [PriorityLevel; 4] = [Self::Low, Self::Normal, Self::High, Self::Critical];

    /// Wire and storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Upper-cased label used in titles, subjects and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Normal => "NORMAL",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}
