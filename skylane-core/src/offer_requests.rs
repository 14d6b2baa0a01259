//! Offer request shapes: the search resource returned by the API and the
//! narrower payloads used to create one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use skylane_shared::{CabinClass, OfferRequestOffer, PassengerType, Place, PlaceType};

// ============================================================================
// Places
// ============================================================================

/// Origin or destination of a slice.
///
/// Objects are read as a structured [`Place`], so a malformed place reports
/// the offending field; strings become `Raw`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlaceRef {
    Structured(Place),
    Raw(String),
}

impl<'de> Deserialize<'de> for PlaceRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            object @ Value::Object(_) => Place::deserialize(object)
                .map(PlaceRef::Structured)
                .map_err(de::Error::custom),
            Value::String(code) => Ok(PlaceRef::Raw(code)),
            other => Err(de::Error::custom(format!(
                "expected an IATA code or a place object, found {other}"
            ))),
        }
    }
}

impl PlaceRef {
    /// IATA code of the place, whichever form it was given in
    pub fn iata_code(&self) -> &str {
        match self {
            PlaceRef::Structured(place) => &place.iata_code,
            PlaceRef::Raw(code) => code,
        }
    }

    pub fn same_place(&self, other: &PlaceRef) -> bool {
        self.iata_code().eq_ignore_ascii_case(other.iata_code())
    }
}

impl From<&str> for PlaceRef {
    fn from(code: &str) -> Self {
        PlaceRef::Raw(code.to_string())
    }
}

impl From<String> for PlaceRef {
    fn from(code: String) -> Self {
        PlaceRef::Raw(code)
    }
}

impl From<Place> for PlaceRef {
    fn from(place: Place) -> Self {
        PlaceRef::Structured(place)
    }
}

// ============================================================================
// Resource shapes
// ============================================================================

/// One leg of the requested itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferRequestSlice {
    /// Local departure date, `YYYY-MM-DD`
    pub departure_date: NaiveDate,
    pub destination: PlaceRef,
    pub origin: PlaceRef,
    pub origin_type: PlaceType,
    pub destination_type: PlaceType,
}

/// A traveller in the search.
///
/// The API expects either `age` or `type`, but both are optional here and may
/// be set together; see [`crate::validation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferRequestPassenger {
    /// Age on the departure date of the final slice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub passenger_type: Option<PassengerType>,
    /// Unique within this offer request and across all offer requests
    pub id: String,
}

/// A flight search as stored by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferRequest {
    pub id: String,
    pub live_mode: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cabin_class: Option<CabinClass>,
    /// One slice for a one-way journey, two for a return trip
    pub slices: Vec<OfferRequestSlice>,
    pub passengers: Vec<OfferRequestPassenger>,
    /// Only present when the request was created with `return_offers=true`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offers: Option<Vec<OfferRequestOffer>>,
}

impl OfferRequestSlice {
    /// The slice as it would be sent when searching again
    pub fn to_create_slice(&self) -> CreateOfferRequestSlice {
        CreateOfferRequestSlice {
            departure_date: self.departure_date,
            destination: self.destination.clone(),
            origin: self.origin.clone(),
        }
    }
}

impl OfferRequestPassenger {
    pub fn to_create_passenger(&self) -> CreateOfferRequestPassenger {
        CreateOfferRequestPassenger {
            age: self.age,
            passenger_type: self.passenger_type.clone(),
        }
    }
}

impl OfferRequest {
    /// Build a payload repeating this search.
    ///
    /// `fallback_cabin` is used when the original request had no cabin filter.
    pub fn to_create_request(&self, fallback_cabin: CabinClass) -> CreateOfferRequest {
        CreateOfferRequest {
            cabin_class: self.cabin_class.clone().unwrap_or(fallback_cabin),
            passengers: self
                .passengers
                .iter()
                .map(OfferRequestPassenger::to_create_passenger)
                .collect(),
            slices: self
                .slices
                .iter()
                .map(OfferRequestSlice::to_create_slice)
                .collect(),
        }
    }

    pub fn offers_included(&self) -> bool {
        self.offers.is_some()
    }

    /// Two slices where the second flies the first one back
    pub fn is_round_trip(&self) -> bool {
        match self.slices.as_slice() {
            [outbound, inbound] => {
                outbound.origin.same_place(&inbound.destination)
                    && outbound.destination.same_place(&inbound.origin)
            }
            _ => false,
        }
    }

    pub fn passenger(&self, id: &str) -> Option<&OfferRequestPassenger> {
        self.passengers.iter().find(|p| p.id == id)
    }
}

// ============================================================================
// Creation payloads
// ============================================================================

/// Slice as sent on creation. Place kinds are inferred by the API, so
/// `origin_type` and `destination_type` are rejected here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateOfferRequestSlice {
    pub departure_date: NaiveDate,
    pub destination: PlaceRef,
    pub origin: PlaceRef,
}

/// Passenger as sent on creation. Ids are assigned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateOfferRequestPassenger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub passenger_type: Option<PassengerType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateOfferRequest {
    pub cabin_class: CabinClass,
    pub passengers: Vec<CreateOfferRequestPassenger>,
    pub slices: Vec<CreateOfferRequestSlice>,
}

impl CreateOfferRequestSlice {
    pub fn new(
        origin: impl Into<PlaceRef>,
        destination: impl Into<PlaceRef>,
        departure_date: NaiveDate,
    ) -> Self {
        Self {
            departure_date,
            destination: destination.into(),
            origin: origin.into(),
        }
    }
}

impl CreateOfferRequestPassenger {
    pub fn adult() -> Self {
        Self {
            age: None,
            passenger_type: Some(PassengerType::Adult),
        }
    }

    pub fn aged(age: u32) -> Self {
        Self {
            age: Some(age),
            passenger_type: None,
        }
    }
}

impl CreateOfferRequest {
    pub fn new(cabin_class: CabinClass) -> Self {
        Self {
            cabin_class,
            passengers: Vec::new(),
            slices: Vec::new(),
        }
    }

    pub fn with_slice(mut self, slice: CreateOfferRequestSlice) -> Self {
        self.slices.push(slice);
        self
    }

    pub fn with_passenger(mut self, passenger: CreateOfferRequestPassenger) -> Self {
        self.passengers.push(passenger);
        self
    }
}

// ============================================================================
// Legacy payloads
// ============================================================================

/// Passenger with a caller-supplied id. Older integrations sent these; they
/// are still read, never produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegacyCreateOfferRequestPassenger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub passenger_type: Option<PassengerType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegacyCreateOfferRequest {
    pub cabin_class: CabinClass,
    pub passengers: Vec<LegacyCreateOfferRequestPassenger>,
    pub slices: Vec<CreateOfferRequestSlice>,
}

impl LegacyCreateOfferRequest {
    /// Ids the caller supplied, in passenger order
    pub fn supplied_ids(&self) -> Vec<&str> {
        self.passengers
            .iter()
            .filter_map(|p| p.id.as_deref())
            .collect()
    }

    /// Drop caller-supplied ids and let the API assign them
    pub fn into_current(self) -> CreateOfferRequest {
        CreateOfferRequest {
            cabin_class: self.cabin_class,
            passengers: self
                .passengers
                .into_iter()
                .map(|p| CreateOfferRequestPassenger {
                    age: p.age,
                    passenger_type: p.passenger_type,
                })
                .collect(),
            slices: self.slices,
        }
    }
}

// ============================================================================
// Query parameters
// ============================================================================

/// Query string of the create call.
///
/// With `return_offers` false the response has no `offers`; list them
/// separately by `offer_request_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOfferRequestQueryParameters {
    pub return_offers: bool,
}

impl CreateOfferRequestQueryParameters {
    pub fn new(return_offers: bool) -> Self {
        Self { return_offers }
    }

    /// Always contains `return_offers`, `false` included. The API treats an
    /// absent parameter differently.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        vec![("return_offers".to_string(), self.return_offers.to_string())]
    }
}
