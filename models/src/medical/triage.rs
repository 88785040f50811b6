// models/src/medical/triage.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};

/// Triage class assigned at intake. A lower numeric level is more urgent, and
/// the derived ordering follows it: `Critical < Urgent < Standard`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PriorityLevel {
    Critical = 1,
    Urgent = 2,
    #[default]
    Standard = 3,
}

impl PriorityLevel {
    pub const ALL: [PriorityLevel; 3] = [
        PriorityLevel::Critical,
        PriorityLevel::Urgent,
        PriorityLevel::Standard,
    ];

    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            PriorityLevel::Critical => "Critical",
            PriorityLevel::Urgent => "Urgent",
            PriorityLevel::Standard => "Standard",
        }
    }
}

impl TryFrom<u8> for PriorityLevel {
    type Error = ValidationError;

    fn try_from(value: u8) -> ValidationResult<Self> {
        match value {
            1 => Ok(PriorityLevel::Critical),
            2 => Ok(PriorityLevel::Urgent),
            3 => Ok(PriorityLevel::Standard),
            other => Err(ValidationError::InvalidPriority(other.to_string())),
        }
    }
}

impl From<PriorityLevel> for u8 {
    fn from(value: PriorityLevel) -> Self {
        value.level()
    }
}

/// Accepts either the numeric level or the label, ignoring case.
impl FromStr for PriorityLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> ValidationResult<Self> {
        let trimmed = s.trim();
        if let Ok(level) = trimmed.parse::<u8>() {
            return PriorityLevel::try_from(level);
        }
        PriorityLevel::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::InvalidPriority(trimmed.to_string()))
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::PriorityLevel;
    use crate::errors::ValidationError;

    #[test]
    fn should_order_critical_first() {
        assert!(PriorityLevel::Critical < PriorityLevel::Urgent);
        assert!(PriorityLevel::Urgent < PriorityLevel::Standard);
        let mut levels = vec![PriorityLevel::Standard, PriorityLevel::Critical, PriorityLevel::Urgent];
        levels.sort();
        assert_eq!(levels, PriorityLevel::ALL.to_vec());
    }

    #[test]
    fn should_convert_from_numeric_level() {
        assert_eq!(PriorityLevel::try_from(1), Ok(PriorityLevel::Critical));
        assert_eq!(PriorityLevel::try_from(3), Ok(PriorityLevel::Standard));
        assert_eq!(
            PriorityLevel::try_from(4),
            Err(ValidationError::InvalidPriority("4".to_string()))
        );
        assert!(PriorityLevel::try_from(0).is_err());
    }

    #[test]
    fn should_parse_level_or_label() {
        assert_eq!("2".parse::<PriorityLevel>(), Ok(PriorityLevel::Urgent));
        assert_eq!(" critical ".parse::<PriorityLevel>(), Ok(PriorityLevel::Critical));
        assert_eq!("STANDARD".parse::<PriorityLevel>(), Ok(PriorityLevel::Standard));
        assert!("emergent".parse::<PriorityLevel>().is_err());
        assert!("-1".parse::<PriorityLevel>().is_err());
    }

    #[test]
    fn should_serialize_as_numeric_level() {
        let json = serde_json::to_string(&PriorityLevel::Urgent).unwrap();
        assert_eq!(json, "2");
        let back: PriorityLevel = serde_json::from_str("1").unwrap();
        assert_eq!(back, PriorityLevel::Critical);
        assert!(serde_json::from_str::<PriorityLevel>("7").is_err());
    }

    #[test]
    fn should_default_to_standard() {
        assert_eq!(PriorityLevel::default(), PriorityLevel::Standard);
    }
}
