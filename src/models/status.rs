// src/models/status.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

// Status de versionamento de Part, BOM, Routing e Workcentre.
// Os dados legados usam tanto "NA" quanto "inactive" para o estado terminal;
// ambos são o mesmo `Superseded`. Gravamos sempre "inactive".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String")]
pub enum RecordStatus {
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "inactive")]
    Superseded,
}

impl RecordStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Active => "active",
            RecordStatus::Superseded => "inactive",
        }
    }

    pub fn is_active(self) -> bool {
        self == RecordStatus::Active
    }

    /// Valores gravados (em minúsculas) que correspondem a este status.
    /// Usado nos filtros `LOWER(status) = ANY($n)`.
    pub fn stored_values(self) -> &'static [&'static str] {
        match self {
            RecordStatus::Active => &["active"],
            RecordStatus::Superseded => &["inactive", "na", "superseded"],
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("status de registro desconhecido '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for RecordStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(RecordStatus::Active),
            "inactive" | "na" | "superseded" => Ok(RecordStatus::Superseded),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

// Usado por `#[sqlx(try_from = "String")]` nos modelos.
impl TryFrom<String> for RecordStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_terminal_values_are_one_state() {
        for raw in ["NA", "inactive", "Inactive", "superseded", " na "] {
            assert_eq!(raw.parse::<RecordStatus>().unwrap(), RecordStatus::Superseded, "{raw}");
        }
        assert_eq!("ACTIVE".parse::<RecordStatus>().unwrap(), RecordStatus::Active);
        assert!("archived".parse::<RecordStatus>().is_err());
    }

    #[test]
    fn stored_values_round_trip_through_parse() {
        for status in [RecordStatus::Active, RecordStatus::Superseded] {
            for raw in status.stored_values() {
                assert_eq!(raw.parse::<RecordStatus>().unwrap(), status);
            }
        }
    }

    #[test]
    fn serializes_canonical_names() {
        assert_eq!(serde_json::to_string(&RecordStatus::Active).unwrap(), "\"active\"");
        assert_eq!(serde_json::to_string(&RecordStatus::Superseded).unwrap(), "\"inactive\"");
        let legacy: RecordStatus = serde_json::from_str("\"NA\"").unwrap();
        assert_eq!(legacy, RecordStatus::Superseded);
        assert!(serde_json::from_str::<RecordStatus>("\"archived\"").is_err());
    }
}
