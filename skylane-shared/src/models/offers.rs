use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{PassengerType, PlaceType};
use super::places::Place;

/// Airline that owns, markets or operates a flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iata_code: Option<String>,
}

/// A passenger as echoed back on an offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferPassenger {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub passenger_type: Option<PassengerType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

/// One flight within an offer slice. Times are local to the airport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferSegment {
    pub id: String,
    pub origin: Place,
    pub destination: Place,
    pub departing_at: NaiveDateTime,
    pub arriving_at: NaiveDateTime,
    pub marketing_carrier: Airline,
    pub marketing_carrier_flight_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_carrier: Option<Airline>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// A priced leg of an offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferSlice {
    pub id: String,
    pub origin: Place,
    pub destination: Place,
    pub origin_type: PlaceType,
    pub destination_type: PlaceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fare_brand_name: Option<String>,
    #[serde(default)]
    pub segments: Vec<OfferSegment>,
}

/// Extra service (bags, seats...) that can be bought with an offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableService {
    pub id: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub total_amount: String,
    pub total_currency: String,
    pub maximum_quantity: u32,
    #[serde(default)]
    pub passenger_ids: Vec<String>,
    #[serde(default)]
    pub segment_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// A bookable flight option, as returned by the offers endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: String,
    pub live_mode: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub total_amount: String,
    pub total_currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_emissions_kg: Option<String>,
    pub owner: Airline,
    pub slices: Vec<OfferSlice>,
    pub passengers: Vec<OfferPassenger>,
    #[serde(default)]
    pub passenger_identity_documents_required: bool,
    #[serde(default)]
    pub available_services: Vec<AvailableService>,
}

/// An offer embedded in an offer request.
///
/// Same shape as [`Offer`] minus `available_services`, which offer requests
/// never carry. The key is absent on the wire, not `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferRequestOffer {
    pub id: String,
    pub live_mode: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub total_amount: String,
    pub total_currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_emissions_kg: Option<String>,
    pub owner: Airline,
    pub slices: Vec<OfferSlice>,
    pub passengers: Vec<OfferPassenger>,
    #[serde(default)]
    pub passenger_identity_documents_required: bool,
}

impl Offer {
    /// Drop the service catalogue, giving the shape embedded in offer requests
    pub fn without_available_services(self) -> OfferRequestOffer {
        OfferRequestOffer {
            id: self.id,
            live_mode: self.live_mode,
            created_at: self.created_at,
            updated_at: self.updated_at,
            expires_at: self.expires_at,
            total_amount: self.total_amount,
            total_currency: self.total_currency,
            base_amount: self.base_amount,
            base_currency: self.base_currency,
            tax_amount: self.tax_amount,
            tax_currency: self.tax_currency,
            total_emissions_kg: self.total_emissions_kg,
            owner: self.owner,
            slices: self.slices,
            passengers: self.passengers,
            passenger_identity_documents_required: self.passenger_identity_documents_required,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Check if offer is expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl OfferRequestOffer {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_offer_json() -> serde_json::Value {
        serde_json::json!({
            "id": "off_00009htYpSCXrwaB9DnUm0",
            "live_mode": false,
            "created_at": "2020-01-17T10:12:14.545Z",
            "updated_at": "2020-01-17T10:12:14.545Z",
            "expires_at": "2020-01-17T10:42:14.545Z",
            "total_amount": "45.00",
            "total_currency": "GBP",
            "tax_amount": "40.80",
            "tax_currency": "GBP",
            "owner": { "id": "arl_00001876aqC8c5umZmrRds", "name": "British Airways", "iata_code": "BA" },
            "slices": [],
            "passengers": [{ "id": "pas_00009hj8USM7Ncg31cBCLL", "type": "adult" }],
            "passenger_identity_documents_required": false,
            "available_services": [{
                "id": "ase_00009UhD4ongolulWd9123",
                "type": "baggage",
                "total_amount": "15.00",
                "total_currency": "GBP",
                "maximum_quantity": 1,
                "passenger_ids": ["pas_00009hj8USM7Ncg31cBCLL"],
                "segment_ids": ["seg_00009htYpSCXrwaB9Dn456"],
                "metadata": { "type": "checked", "maximum_weight_kg": 23 }
            }]
        })
    }

    #[test]
    fn test_projection_drops_available_services() {
        let offer: Offer = serde_json::from_value(sample_offer_json()).unwrap();
        assert_eq!(offer.available_services.len(), 1);

        let projected = offer.without_available_services();
        let value = serde_json::to_value(&projected).unwrap();
        let object = value.as_object().unwrap();

        assert!(!object.contains_key("available_services"));
        assert_eq!(object["total_amount"], "45.00");
    }

    #[test]
    fn test_offer_expiry() {
        let offer: Offer = serde_json::from_value(sample_offer_json()).unwrap();
        let before = Utc.with_ymd_and_hms(2020, 1, 17, 10, 30, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2020, 1, 17, 11, 0, 0).unwrap();

        assert!(!offer.is_expired_at(before));
        assert!(offer.is_expired_at(after));
        assert!(offer.without_available_services().is_expired_at(after));
    }
}
