use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use skylane_shared::{Offer, OfferPassenger, OfferSlice, WireEnum};

use crate::offer_requests::{CreateOfferRequest, LegacyCreateOfferRequest, OfferRequest, PlaceRef};
use crate::{CoreError, CoreResult};

/// What to do with unrecognised enum values and with keys a shape leaves out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicy {
    /// Keep unknown values as `Unknown(..)` and skip omitted projection keys
    /// such as `available_services`, logging a warning. Shapes that deny
    /// unknown fields still reject them.
    #[default]
    Lenient,
    /// Fail the decode
    Strict,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CodecConfig {
    #[serde(default)]
    pub policy: DecodePolicy,
    /// Refuse bodies that are not wrapped in `{"data": ...}`
    #[serde(default)]
    pub require_envelope: bool,
}

/// An enum value outside the known set, with the path it was found at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue {
    pub field: String,
    pub value: String,
}

/// A shape the codec knows how to read off the wire
pub trait WireEntity: DeserializeOwned {
    const ENTITY: &'static str;

    fn unknown_enum_values(&self) -> Vec<UnknownValue>;

    /// Paths of keys in `raw` that this shape deliberately leaves out
    fn omitted_keys_present(_raw: &Value) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Serialize)]
struct RequestEnvelope<'a, T> {
    data: &'a T,
}

/// Cursor metadata of a list response
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct PageMeta {
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.meta.after.is_some()
    }
}

/// Serialization boundary between typed shapes and API bodies
#[derive(Debug, Clone, Default)]
pub struct WireCodec {
    config: CodecConfig,
}

impl WireCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Request body for the create call, wrapped in `{"data": ...}`
    pub fn encode_create(&self, request: &CreateOfferRequest) -> CoreResult<String> {
        self.check_enums(CreateOfferRequest::ENTITY, request.unknown_enum_values())?;

        let body = serde_json::to_string(&RequestEnvelope { data: request }).map_err(|source| {
            CoreError::Serialize {
                entity: CreateOfferRequest::ENTITY,
                source,
            }
        })?;

        tracing::debug!(
            slices = request.slices.len(),
            passengers = request.passengers.len(),
            "Encoded offer request payload"
        );
        Ok(body)
    }

    pub fn decode_offer_request(&self, body: &str) -> CoreResult<OfferRequest> {
        self.decode(body)
    }

    pub fn decode_create_request(&self, body: &str) -> CoreResult<CreateOfferRequest> {
        self.decode(body)
    }

    pub fn decode_legacy_create_request(&self, body: &str) -> CoreResult<LegacyCreateOfferRequest> {
        let legacy: LegacyCreateOfferRequest = self.decode(body)?;
        let supplied = legacy.supplied_ids();
        if !supplied.is_empty() {
            tracing::warn!(
                ids = ?supplied,
                "Payload supplies passenger ids; this is deprecated and ids will be assigned by the API"
            );
        }
        Ok(legacy)
    }

    pub fn decode_offer(&self, body: &str) -> CoreResult<Offer> {
        self.decode(body)
    }

    /// Decode a single entity, enveloped or bare depending on configuration
    pub fn decode<T: WireEntity>(&self, body: &str) -> CoreResult<T> {
        let raw = parse_body(T::ENTITY, body)?;
        let raw = self.unwrap_envelope(T::ENTITY, raw)?;
        self.decode_value(raw)
    }

    /// Decode a list response: `{"data": [...], "meta": {...}}`
    pub fn decode_page<T: WireEntity>(&self, body: &str) -> CoreResult<Page<T>> {
        let raw = parse_body(T::ENTITY, body)?;
        let Value::Object(mut object) = raw else {
            return Err(CoreError::MissingEnvelope { entity: T::ENTITY });
        };

        let items = match object.remove("data") {
            Some(Value::Array(items)) => items,
            _ => return Err(CoreError::MissingEnvelope { entity: T::ENTITY }),
        };
        let meta = match object.remove("meta") {
            Some(meta) => serde_json::from_value(meta).map_err(|source| CoreError::Deserialize {
                entity: "PageMeta",
                source,
            })?,
            None => PageMeta::default(),
        };

        let data = items
            .into_iter()
            .map(|item| self.decode_value(item))
            .collect::<CoreResult<Vec<T>>>()?;

        tracing::debug!(entity = T::ENTITY, count = data.len(), "Decoded page");
        Ok(Page { data, meta })
    }

    fn decode_value<T: WireEntity>(&self, raw: Value) -> CoreResult<T> {
        for field in T::omitted_keys_present(&raw) {
            match self.config.policy {
                DecodePolicy::Strict => {
                    return Err(CoreError::ProjectionViolation {
                        entity: T::ENTITY,
                        field,
                    })
                }
                DecodePolicy::Lenient => {
                    tracing::warn!(entity = T::ENTITY, %field, "Ignoring key this shape omits");
                }
            }
        }

        let value: T = serde_json::from_value(raw).map_err(|source| CoreError::Deserialize {
            entity: T::ENTITY,
            source,
        })?;
        self.check_enums(T::ENTITY, value.unknown_enum_values())?;
        Ok(value)
    }

    fn unwrap_envelope(&self, entity: &'static str, raw: Value) -> CoreResult<Value> {
        match raw {
            Value::Object(mut object) if object.contains_key("data") => {
                Ok(object.remove("data").unwrap_or(Value::Null))
            }
            _ if self.config.require_envelope => Err(CoreError::MissingEnvelope { entity }),
            bare => Ok(bare),
        }
    }

    fn check_enums(&self, entity: &'static str, unknown: Vec<UnknownValue>) -> CoreResult<()> {
        for UnknownValue { field, value } in unknown {
            match self.config.policy {
                DecodePolicy::Strict => {
                    return Err(CoreError::UnknownEnumValue {
                        entity,
                        field,
                        value,
                    })
                }
                DecodePolicy::Lenient => {
                    tracing::warn!(entity, %field, %value, "Passing through unknown enum value");
                }
            }
        }
        Ok(())
    }
}

fn parse_body(entity: &'static str, body: &str) -> CoreResult<Value> {
    serde_json::from_str(body).map_err(|source| CoreError::Deserialize { entity, source })
}

// ============================================================================
// Enum audits
// ============================================================================

fn push_unknown<E: WireEnum>(found: &mut Vec<UnknownValue>, field: String, value: &E) {
    if !value.is_known() {
        found.push(UnknownValue {
            field,
            value: value.wire_value().to_string(),
        });
    }
}

fn audit_place_ref(found: &mut Vec<UnknownValue>, field: String, place: &PlaceRef) {
    if let PlaceRef::Structured(place) = place {
        push_unknown(found, format!("{field}.type"), &place.place_type);
    }
}

fn audit_offer_parts(
    found: &mut Vec<UnknownValue>,
    prefix: &str,
    slices: &[OfferSlice],
    passengers: &[OfferPassenger],
) {
    for (i, slice) in slices.iter().enumerate() {
        let at = format!("{prefix}slices[{i}]");
        push_unknown(found, format!("{at}.origin_type"), &slice.origin_type);
        push_unknown(found, format!("{at}.destination_type"), &slice.destination_type);
        push_unknown(found, format!("{at}.origin.type"), &slice.origin.place_type);
        push_unknown(found, format!("{at}.destination.type"), &slice.destination.place_type);

        for (k, segment) in slice.segments.iter().enumerate() {
            let at = format!("{at}.segments[{k}]");
            push_unknown(found, format!("{at}.origin.type"), &segment.origin.place_type);
            push_unknown(
                found,
                format!("{at}.destination.type"),
                &segment.destination.place_type,
            );
        }
    }
    for (i, passenger) in passengers.iter().enumerate() {
        if let Some(passenger_type) = &passenger.passenger_type {
            push_unknown(found, format!("{prefix}passengers[{i}].type"), passenger_type);
        }
    }
}

impl WireEntity for CreateOfferRequest {
    const ENTITY: &'static str = "CreateOfferRequest";

    fn unknown_enum_values(&self) -> Vec<UnknownValue> {
        let mut found = Vec::new();
        push_unknown(&mut found, "cabin_class".to_string(), &self.cabin_class);
        for (i, slice) in self.slices.iter().enumerate() {
            audit_place_ref(&mut found, format!("slices[{i}].origin"), &slice.origin);
            audit_place_ref(&mut found, format!("slices[{i}].destination"), &slice.destination);
        }
        for (i, passenger) in self.passengers.iter().enumerate() {
            if let Some(passenger_type) = &passenger.passenger_type {
                push_unknown(&mut found, format!("passengers[{i}].type"), passenger_type);
            }
        }
        found
    }
}

impl WireEntity for LegacyCreateOfferRequest {
    const ENTITY: &'static str = "CreateOfferRequest";

    fn unknown_enum_values(&self) -> Vec<UnknownValue> {
        self.clone().into_current().unknown_enum_values()
    }
}

impl WireEntity for OfferRequest {
    const ENTITY: &'static str = "OfferRequest";

    fn unknown_enum_values(&self) -> Vec<UnknownValue> {
        let mut found = Vec::new();
        if let Some(cabin_class) = &self.cabin_class {
            push_unknown(&mut found, "cabin_class".to_string(), cabin_class);
        }
        for (i, slice) in self.slices.iter().enumerate() {
            push_unknown(&mut found, format!("slices[{i}].origin_type"), &slice.origin_type);
            push_unknown(
                &mut found,
                format!("slices[{i}].destination_type"),
                &slice.destination_type,
            );
            audit_place_ref(&mut found, format!("slices[{i}].origin"), &slice.origin);
            audit_place_ref(&mut found, format!("slices[{i}].destination"), &slice.destination);
        }
        for (i, passenger) in self.passengers.iter().enumerate() {
            if let Some(passenger_type) = &passenger.passenger_type {
                push_unknown(&mut found, format!("passengers[{i}].type"), passenger_type);
            }
        }
        for (i, offer) in self.offers.iter().flatten().enumerate() {
            audit_offer_parts(
                &mut found,
                &format!("offers[{i}]."),
                &offer.slices,
                &offer.passengers,
            );
        }
        found
    }

    fn omitted_keys_present(raw: &Value) -> Vec<String> {
        let Some(offers) = raw.get("offers").and_then(Value::as_array) else {
            return Vec::new();
        };
        offers
            .iter()
            .enumerate()
            .filter(|(_, offer)| offer.get("available_services").is_some())
            .map(|(i, _)| format!("offers[{i}].available_services"))
            .collect()
    }
}

impl WireEntity for Offer {
    const ENTITY: &'static str = "Offer";

    fn unknown_enum_values(&self) -> Vec<UnknownValue> {
        let mut found = Vec::new();
        audit_offer_parts(&mut found, "", &self.slices, &self.passengers);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use skylane_shared::CabinClass;

    use crate::offer_requests::{CreateOfferRequestPassenger, CreateOfferRequestSlice};

    fn strict() -> WireCodec {
        WireCodec::new(CodecConfig {
            policy: DecodePolicy::Strict,
            require_envelope: false,
        })
    }

    fn sample_request() -> CreateOfferRequest {
        CreateOfferRequest::new(CabinClass::Economy)
            .with_slice(CreateOfferRequestSlice::new(
                "LHR",
                "JFK",
                NaiveDate::from_ymd_opt(2020, 4, 24).unwrap(),
            ))
            .with_passenger(CreateOfferRequestPassenger::adult())
    }

    #[test]
    fn test_encode_wraps_in_data_envelope() {
        let body = WireCodec::default().encode_create(&sample_request()).unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();

        assert_eq!(value["data"]["cabin_class"], "economy");
        assert_eq!(value["data"]["slices"][0]["origin"], "LHR");
    }

    #[test]
    fn test_strict_policy_rejects_unknown_cabin() {
        let mut request = sample_request();
        request.cabin_class = CabinClass::Unknown("steerage".to_string());

        match strict().encode_create(&request) {
            Err(CoreError::UnknownEnumValue { field, value, .. }) => {
                assert_eq!(field, "cabin_class");
                assert_eq!(value, "steerage");
            }
            other => panic!("expected unknown enum error, got {other:?}"),
        }

        // Lenient passes it through verbatim
        let body = WireCodec::default().encode_create(&request).unwrap();
        assert!(body.contains("\"steerage\""));
    }

    #[test]
    fn test_envelope_requirement() {
        let bare = r#"{ "cabin_class": "economy", "passengers": [], "slices": [] }"#;
        assert!(WireCodec::default().decode_create_request(bare).is_ok());

        let codec = WireCodec::new(CodecConfig {
            policy: DecodePolicy::Lenient,
            require_envelope: true,
        });
        assert!(matches!(
            codec.decode_create_request(bare),
            Err(CoreError::MissingEnvelope { entity: "CreateOfferRequest" })
        ));

        let wrapped = format!("{{ \"data\": {bare} }}");
        assert!(codec.decode_create_request(&wrapped).is_ok());
    }

    #[test]
    fn test_missing_field_names_entity_and_field() {
        let err = WireCodec::default()
            .decode_create_request(r#"{ "passengers": [], "slices": [] }"#)
            .unwrap_err();
        let message = err.to_string();

        assert!(message.contains("CreateOfferRequest"));
        assert!(message.contains("cabin_class"));
    }

    #[test]
    fn test_full_offer_keeps_available_services() {
        let body = serde_json::json!({
            "data": {
                "id": "off_1",
                "live_mode": false,
                "created_at": "2020-01-17T10:12:14.545Z",
                "updated_at": "2020-01-17T10:12:14.545Z",
                "expires_at": "2020-01-17T10:42:14.545Z",
                "total_amount": "45.00",
                "total_currency": "GBP",
                "owner": { "name": "British Airways", "iata_code": "BA" },
                "slices": [],
                "passengers": [{ "id": "pas_1", "type": "adult" }],
                "available_services": [{
                    "id": "ase_1",
                    "type": "baggage",
                    "total_amount": "15.00",
                    "total_currency": "GBP",
                    "maximum_quantity": 1
                }]
            }
        })
        .to_string();

        let offer = strict().decode_offer(&body).unwrap();
        assert_eq!(offer.available_services.len(), 1);
        assert_eq!(offer.available_services[0].service_type, "baggage");

        let unknown = body.replace("\"adult\"", "\"infant_without_seat\"");
        assert!(matches!(
            strict().decode_offer(&unknown),
            Err(CoreError::UnknownEnumValue { .. })
        ));
    }

    #[test]
    fn test_page_decoding() {
        let body = r#"
            {
                "meta": { "limit": 1, "before": null, "after": "g2wAAAACbQ" },
                "data": [{
                    "id": "orq_1",
                    "live_mode": false,
                    "created_at": "2020-02-12T15:21:01.927Z",
                    "slices": [],
                    "passengers": []
                }]
            }
        "#;
        let page: Page<OfferRequest> = WireCodec::default().decode_page(body).unwrap();

        assert_eq!(page.data.len(), 1);
        assert!(page.has_next());
        assert_eq!(page.meta.limit, Some(1));
    }
}
