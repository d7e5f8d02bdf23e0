use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity label attached to a post.
///
/// Purely cosmetic: none of the alert kinds contact anyone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostKind {
    #[default]
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "help")]
    Help,
    /// Simulated 911-style alert.
    #[serde(rename = "911")]
    Emergency911,
    /// Simulated "emergency at my address" alert.
    #[serde(rename = "emergency_address")]
    EmergencyAddress,
}

impl PostKind {
    pub const ALL: [PostKind; 4] = [
        PostKind::Normal,
        PostKind::Help,
        PostKind::Emergency911,
        PostKind::EmergencyAddress,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PostKind::Normal => "normal",
            PostKind::Help => "help",
            PostKind::Emergency911 => "911",
            PostKind::EmergencyAddress => "emergency_address",
        }
    }

    /// Resolve client input to a kind. Absent, blank or unknown values fall
    /// back to `Normal`; surrounding whitespace is ignored.
    pub fn parse_or_default(raw: Option<&str>) -> PostKind {
        raw.and_then(|s| s.trim().parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPostKind(pub String);

impl fmt::Display for UnknownPostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown post kind: {:?}", self.0)
    }
}

impl std::error::Error for UnknownPostKind {}

/// Exact match only; use [`PostKind::parse_or_default`] for client input.
impl FromStr for PostKind {
    type Err = UnknownPostKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownPostKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_kind() {
        for kind in PostKind::ALL {
            assert_eq!(kind.as_str().parse::<PostKind>().unwrap(), kind);
        }
    }

    #[test]
    fn exact_parse_rejects_unknown_and_padded() {
        assert!("bogus".parse::<PostKind>().is_err());
        assert!(" help".parse::<PostKind>().is_err());
        assert!("HELP".parse::<PostKind>().is_err());
    }

    #[test]
    fn lenient_parse_defaults_to_normal() {
        assert_eq!(PostKind::parse_or_default(None), PostKind::Normal);
        assert_eq!(PostKind::parse_or_default(Some("")), PostKind::Normal);
        assert_eq!(PostKind::parse_or_default(Some("bogus-kind")), PostKind::Normal);
        assert_eq!(PostKind::parse_or_default(Some("  help \n")), PostKind::Help);
        assert_eq!(PostKind::parse_or_default(Some("911")), PostKind::Emergency911);
        assert_eq!(
            PostKind::parse_or_default(Some("emergency_address")),
            PostKind::EmergencyAddress
        );
    }

    #[test]
    fn serializes_to_wire_names() {
        assert_eq!(serde_json::to_string(&PostKind::Emergency911).unwrap(), "\"911\"");
        assert_eq!(
            serde_json::to_string(&PostKind::EmergencyAddress).unwrap(),
            "\"emergency_address\""
        );
        let kind: PostKind = serde_json::from_str("\"help\"").unwrap();
        assert_eq!(kind, PostKind::Help);
    }
}
