//! Priority labels for advisor recommendations

use serde::{Deserialize, Serialize};

/// Severity label leading an advisor recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLabel {
    Low,
    Medium,
    High,
}

/// Display emphasis for a priority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    /// Needs attention now
    Alert,
    Secondary,
    Outline,
}

impl PriorityLabel {
    /// Parse the leading word of a free-text priority
    ///
    /// Tolerates trailing punctuation ("High:", "Medium,") and any case.
    pub fn from_leading_word(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        word.trim_matches(|c: char| !c.is_alphanumeric()).parse().ok()
    }

    /// Badge for this label
    pub fn badge(&self) -> Badge {
        match self {
            Self::High => Badge::Alert,
            Self::Medium => Badge::Secondary,
            Self::Low => Badge::Outline,
        }
    }
}

impl std::fmt::Display for PriorityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for PriorityLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}
