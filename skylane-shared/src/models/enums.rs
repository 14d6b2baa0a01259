use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed symbol sets received from the API.
///
/// Values the crate does not know about are kept as `Unknown` so callers can
/// decide whether to pass them through or reject them.
pub trait WireEnum {
    fn wire_value(&self) -> &str;

    fn is_known(&self) -> bool;
}

// ============================================================================
// Cabin class
// ============================================================================

/// Cabin filter for an offer request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CabinClass {
    First,
    Business,
    PremiumEconomy,
    Economy,
    Unknown(String),
}

impl WireEnum for CabinClass {
    fn wire_value(&self) -> &str {
        match self {
            CabinClass::First => "first",
            CabinClass::Business => "business",
            CabinClass::PremiumEconomy => "premium_economy",
            CabinClass::Economy => "economy",
            CabinClass::Unknown(value) => value,
        }
    }

    fn is_known(&self) -> bool {
        !matches!(self, CabinClass::Unknown(_))
    }
}

impl From<String> for CabinClass {
    fn from(value: String) -> Self {
        match value.as_str() {
            "first" => CabinClass::First,
            "business" => CabinClass::Business,
            "premium_economy" => CabinClass::PremiumEconomy,
            "economy" => CabinClass::Economy,
            _ => CabinClass::Unknown(value),
        }
    }
}

impl From<CabinClass> for String {
    fn from(value: CabinClass) -> Self {
        match value {
            CabinClass::Unknown(raw) => raw,
            known => known.wire_value().to_string(),
        }
    }
}

impl fmt::Display for CabinClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_value())
    }
}

// ============================================================================
// Place type
// ============================================================================

/// Whether a location identifier names an airport or a city
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlaceType {
    Airport,
    City,
    Unknown(String),
}

impl WireEnum for PlaceType {
    fn wire_value(&self) -> &str {
        match self {
            PlaceType::Airport => "airport",
            PlaceType::City => "city",
            PlaceType::Unknown(value) => value,
        }
    }

    fn is_known(&self) -> bool {
        !matches!(self, PlaceType::Unknown(_))
    }
}

impl From<String> for PlaceType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "airport" => PlaceType::Airport,
            "city" => PlaceType::City,
            _ => PlaceType::Unknown(value),
        }
    }
}

impl From<PlaceType> for String {
    fn from(value: PlaceType) -> Self {
        match value {
            PlaceType::Unknown(raw) => raw,
            known => known.wire_value().to_string(),
        }
    }
}

impl fmt::Display for PlaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_value())
    }
}

// ============================================================================
// Passenger type
// ============================================================================

/// Passenger type. The API currently only accepts `adult`; everyone else is
/// described by age.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PassengerType {
    Adult,
    Unknown(String),
}

impl WireEnum for PassengerType {
    fn wire_value(&self) -> &str {
        match self {
            PassengerType::Adult => "adult",
            PassengerType::Unknown(value) => value,
        }
    }

    fn is_known(&self) -> bool {
        !matches!(self, PassengerType::Unknown(_))
    }
}

impl From<String> for PassengerType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "adult" => PassengerType::Adult,
            _ => PassengerType::Unknown(value),
        }
    }
}

impl From<PassengerType> for String {
    fn from(value: PassengerType) -> Self {
        match value {
            PassengerType::Unknown(raw) => raw,
            known => known.wire_value().to_string(),
        }
    }
}

impl fmt::Display for PassengerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_value())
    }
}
