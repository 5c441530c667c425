//! Experimental units - the entities that get assigned to variants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of entity being assigned or observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    User,
    Household,
    Session,
}

impl UnitType {
    pub const ALL: [UnitType; 3] = [UnitType::User, UnitType::Household, UnitType::Session];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Household => "household",
            Self::Session => "session",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "household" => Ok(Self::Household),
            "session" => Ok(Self::Session),
            other => Err(format!(
                "unit_type must be one of user, household, session (got '{}')",
                other
            )),
        }
    }
}

/// A unit supplied with a request; never stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    pub id: String,
}

impl Unit {
    pub fn new(unit_type: UnitType, id: impl Into<String>) -> Self {
        Self {
            unit_type,
            id: id.into(),
        }
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self::new(UnitType::User, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_type_parse() {
        assert_eq!("user".parse::<UnitType>(), Ok(UnitType::User));
        assert_eq!("household".parse::<UnitType>(), Ok(UnitType::Household));
        assert_eq!("session".parse::<UnitType>(), Ok(UnitType::Session));
        assert!("device".parse::<UnitType>().is_err());
        assert!("User".parse::<UnitType>().is_err());
    }

    #[test]
    fn test_unit_type_round_trips_display() {
        for unit_type in UnitType::ALL {
            assert_eq!(unit_type.to_string().parse::<UnitType>(), Ok(unit_type));
        }
    }

    #[test]
    fn test_unit_serialization() {
        let unit = Unit::new(UnitType::Household, "h-1");
        let json = serde_json::to_value(&unit).unwrap();
        assert_eq!(json, serde_json::json!({"type": "household", "id": "h-1"}));
    }
}
