//! Resource manager selection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Resource manager policy driving a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagerKind {
    /// Grant any request that fits; recover from deadlock by abort-and-replay
    #[default]
    #[serde(rename = "fifo", alias = "opportunistic")]
    Opportunistic,
}

impl ManagerKind {
    /// Heading printed above the report table
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Opportunistic => "FIFO",
        }
    }

    /// Canonical lower-case name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Opportunistic => "fifo",
        }
    }
}

impl fmt::Display for ManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name that does not match any supported manager
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown resource manager `{0}` (supported: fifo, opportunistic)")]
pub struct UnknownManager(pub String);

impl FromStr for ManagerKind {
    type Err = UnknownManager;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "fifo" | "opportunistic" => Ok(Self::Opportunistic),
            _ => Err(UnknownManager(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("FIFO".parse(), Ok(ManagerKind::Opportunistic));
        assert_eq!("Opportunistic".parse(), Ok(ManagerKind::Opportunistic));
    }

    #[test]
    fn test_banker_is_not_selectable() {
        assert_eq!(
            "banker".parse::<ManagerKind>(),
            Err(UnknownManager("banker".to_string()))
        );
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&ManagerKind::Opportunistic).unwrap(),
            "\"fifo\""
        );
        let parsed: ManagerKind = serde_json::from_str("\"opportunistic\"").unwrap();
        assert_eq!(parsed, ManagerKind::Opportunistic);
    }
}
