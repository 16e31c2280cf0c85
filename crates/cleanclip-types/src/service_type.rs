//! Service type (content category) types

use serde::{Deserialize, Serialize};

use crate::ParseEnumError;

/// Content category a user subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    /// Deep cleaning
    #[default]
    DeepClean,
    /// Short-term rental turnovers
    Airbnb,
    /// Move-out cleaning
    MoveOut,
}

impl ServiceType {
    /// All service types
    pub const ALL: [ServiceType; 3] = [Self::DeepClean, Self::Airbnb, Self::MoveOut];

    /// Storage / wire representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DeepClean => "deep_clean",
            Self::Airbnb => "airbnb",
            Self::MoveOut => "move_out",
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ServiceType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deep_clean" => Ok(Self::DeepClean),
            "airbnb" => Ok(Self::Airbnb),
            "move_out" => Ok(Self::MoveOut),
            _ => Err(ParseEnumError::new("service type", s)),
        }
    }
}
