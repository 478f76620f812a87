//! Court types served by the upstream.

use crate::Error;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Upstream deployment a session belongs to.
///
/// Each court type has its own base URL and its own session; tokens are not shared.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum CourtType {
    /// District and taluka courts ("DC").
    #[default]
    #[serde(rename = "DC", alias = "DistrictCourt")]
    DistrictCourt,
    /// High courts ("HC").
    #[serde(rename = "HC", alias = "HighCourt")]
    HighCourt,
}

impl CourtType {
    /// Every court type.
    pub const ALL: [CourtType; 2] = [CourtType::DistrictCourt, CourtType::HighCourt];

    /// Short code used by the upstream and by callers ("DC" / "HC").
    pub fn code(self) -> &'static str {
        match self {
            Self::DistrictCourt => "DC",
            Self::HighCourt => "HC",
        }
    }
}

impl fmt::Display for CourtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CourtType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DC" | "DistrictCourt" => Ok(Self::DistrictCourt),
            "HC" | "HighCourt" => Ok(Self::HighCourt),
            other => Err(Error::UnknownCourtType(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for court in CourtType::ALL {
            assert_eq!(court.code().parse::<CourtType>().unwrap(), court);
            assert_eq!(court.to_string(), court.code());
        }
    }

    #[test]
    fn test_long_names_parse() {
        assert_eq!(
            "DistrictCourt".parse::<CourtType>().unwrap(),
            CourtType::DistrictCourt
        );
        assert_eq!("HighCourt".parse::<CourtType>().unwrap(), CourtType::HighCourt);
    }

    #[test]
    fn test_unknown_rejected() {
        let err = "SC".parse::<CourtType>().unwrap_err();
        assert!(matches!(err, Error::UnknownCourtType(ref s) if s == "SC"));
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(
            serde_json::to_string(&CourtType::HighCourt).unwrap(),
            "\"HC\""
        );
        let parsed: CourtType = serde_json::from_str("\"DistrictCourt\"").unwrap();
        assert_eq!(parsed, CourtType::DistrictCourt);
    }

    #[test]
    fn test_default_is_district() {
        assert_eq!(CourtType::default(), CourtType::DistrictCourt);
    }
}
