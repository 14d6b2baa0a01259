pub mod app_config;
pub mod codec;
pub mod endpoint;
pub mod offer_requests;
pub mod validation;

pub use codec::{CodecConfig, DecodePolicy, Page, PageMeta, UnknownValue, WireCodec, WireEntity};
pub use endpoint::{ApiRequest, ListParams, OfferRequestsEndpoint, OffersEndpoint};
pub use offer_requests::{
    CreateOfferRequest, CreateOfferRequestPassenger, CreateOfferRequestQueryParameters,
    CreateOfferRequestSlice, LegacyCreateOfferRequest, LegacyCreateOfferRequestPassenger,
    OfferRequest, OfferRequestPassenger, OfferRequestSlice, PlaceRef,
};
pub use validation::{Validate, ValidationIssue, ValidationReport};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Failed to decode {entity}: {source}")]
    Deserialize {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode {entity}: {source}")]
    Serialize {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{entity} body is not wrapped in a `data` envelope")]
    MissingEnvelope { entity: &'static str },
    #[error("Unknown value '{value}' for {entity}.{field}")]
    UnknownEnumValue {
        entity: &'static str,
        field: String,
        value: String,
    },
    #[error("{entity} carries `{field}`, which this shape omits")]
    ProjectionViolation { entity: &'static str, field: String },
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type CoreResult<T> = Result<T, CoreError>;
