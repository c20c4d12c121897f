//! Runtime mode configuration for Cheongyak.

use serde::{Deserialize, Serialize};

/// Runtime mode for Cheongyak services.
///
/// Production talks to the real 청약홈 API; development serves fixed demo
/// records so the stack runs offline and without a service key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuntimeMode {
    /// Real upstream provider
    Production,
    /// In-memory demo provider
    #[default]
    Development,
}

impl RuntimeMode {
    pub fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => write!(f, "PRODUCTION"),
            Self::Development => write!(f, "DEVELOPMENT"),
        }
    }
}

impl std::str::FromStr for RuntimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            _ => Err(format!(
                "Invalid runtime mode: '{s}'. Valid options are: production, development"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_mode_parsing() {
        assert_eq!("prod".parse::<RuntimeMode>(), Ok(RuntimeMode::Production));
        assert_eq!("Development".parse::<RuntimeMode>(), Ok(RuntimeMode::Development));
        assert!("staging".parse::<RuntimeMode>().is_err());
    }

    #[test]
    fn test_default_is_development() {
        let mode = RuntimeMode::default();
        assert!(mode.is_development());
        assert!(!mode.is_production());
        assert_eq!(mode.to_string(), "DEVELOPMENT");
    }
}
