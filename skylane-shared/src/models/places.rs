use serde::{Deserialize, Serialize};

use super::enums::PlaceType;

/// A structured airport or city reference.
///
/// Only `type` and `iata_code` are guaranteed; the API fills in the rest on
/// resources it returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(rename = "type")]
    pub place_type: PlaceType,
    pub iata_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iata_city_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iata_country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icao_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl Place {
    pub fn airport(iata_code: impl Into<String>) -> Self {
        Self::bare(PlaceType::Airport, iata_code.into())
    }

    pub fn city(iata_code: impl Into<String>) -> Self {
        Self::bare(PlaceType::City, iata_code.into())
    }

    fn bare(place_type: PlaceType, iata_code: String) -> Self {
        Self {
            place_type,
            iata_code,
            id: None,
            name: None,
            city_name: None,
            iata_city_code: None,
            iata_country_code: None,
            icao_code: None,
            latitude: None,
            longitude: None,
            time_zone: None,
        }
    }
}
