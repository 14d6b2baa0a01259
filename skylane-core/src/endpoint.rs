//! Transport-free descriptions of the offer request and offer calls. An HTTP
//! client executes them; nothing here opens a connection.

use http::Method;
use url::Url;

use crate::codec::WireCodec;
use crate::offer_requests::{CreateOfferRequest, CreateOfferRequestQueryParameters};
use crate::{CoreError, CoreResult};

const OFFER_REQUESTS_PATH: &str = "/air/offer_requests";
const OFFERS_PATH: &str = "/air/offers";

pub const MAX_PAGE_LIMIT: u32 = 200;

/// A call ready to be handed to an HTTP client
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    fn new(method: Method, path: String) -> Self {
        Self {
            method,
            path,
            query: Vec::new(),
            body: None,
        }
    }

    /// Absolute URL of this call under `base`, keeping any path prefix of `base`
    pub fn url_for(&self, base: &Url) -> CoreResult<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| CoreError::InvalidParameter(format!("{base} cannot be a base URL")))?
            .pop_if_empty()
            .extend(self.path.split('/').filter(|segment| !segment.is_empty()));

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

/// Cursor pagination for list calls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub after: Option<String>,
    pub before: Option<String>,
    pub limit: Option<u32>,
}

impl ListParams {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    pub fn before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }

    pub fn validate(&self) -> CoreResult<()> {
        if let Some(limit) = self.limit {
            if limit == 0 || limit > MAX_PAGE_LIMIT {
                return Err(CoreError::InvalidParameter(format!(
                    "limit must be between 1 and {MAX_PAGE_LIMIT}, got {limit}"
                )));
            }
        }
        if self.after.is_some() && self.before.is_some() {
            return Err(CoreError::InvalidParameter(
                "after and before cannot be combined".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(after) = &self.after {
            pairs.push(("after".to_string(), after.clone()));
        }
        if let Some(before) = &self.before {
            pairs.push(("before".to_string(), before.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

/// Ids end up as a single path segment
fn require_id(kind: &str, id: &str) -> CoreResult<()> {
    if id.trim().is_empty() {
        return Err(CoreError::InvalidParameter(format!("{kind} id cannot be empty")));
    }
    if id.contains(['/', '\\']) || id == "." || id == ".." {
        return Err(CoreError::InvalidParameter(format!(
            "{kind} id '{id}' is not a single path segment"
        )));
    }
    Ok(())
}

/// `/air/offer_requests`
pub struct OfferRequestsEndpoint<'a> {
    codec: &'a WireCodec,
}

impl<'a> OfferRequestsEndpoint<'a> {
    pub fn new(codec: &'a WireCodec) -> Self {
        Self { codec }
    }

    /// `POST /air/offer_requests?return_offers=...`
    pub fn create(
        &self,
        payload: &CreateOfferRequest,
        params: &CreateOfferRequestQueryParameters,
    ) -> CoreResult<ApiRequest> {
        let mut request = ApiRequest::new(Method::POST, OFFER_REQUESTS_PATH.to_string());
        request.query = params.to_query_pairs();
        request.body = Some(self.codec.encode_create(payload)?);

        tracing::debug!(return_offers = params.return_offers, "Prepared offer request creation");
        Ok(request)
    }

    /// `GET /air/offer_requests/{id}`
    pub fn get(&self, id: &str) -> CoreResult<ApiRequest> {
        require_id("offer request", id)?;
        Ok(ApiRequest::new(
            Method::GET,
            format!("{OFFER_REQUESTS_PATH}/{id}"),
        ))
    }

    /// `GET /air/offer_requests`
    pub fn list(&self, params: &ListParams) -> CoreResult<ApiRequest> {
        params.validate()?;
        let mut request = ApiRequest::new(Method::GET, OFFER_REQUESTS_PATH.to_string());
        request.query = params.to_query_pairs();
        Ok(request)
    }
}

/// `/air/offers`, used to fetch the offers of a request created with
/// `return_offers=false`
pub struct OffersEndpoint;

impl OffersEndpoint {
    /// `GET /air/offers?offer_request_id=...`
    pub fn list_for_request(offer_request_id: &str, params: &ListParams) -> CoreResult<ApiRequest> {
        require_id("offer request", offer_request_id)?;
        params.validate()?;

        let mut request = ApiRequest::new(Method::GET, OFFERS_PATH.to_string());
        request
            .query
            .push(("offer_request_id".to_string(), offer_request_id.to_string()));
        request.query.extend(params.to_query_pairs());
        Ok(request)
    }

    /// `GET /air/offers/{id}`
    pub fn get(id: &str) -> CoreResult<ApiRequest> {
        require_id("offer", id)?;
        Ok(ApiRequest::new(Method::GET, format!("{OFFERS_PATH}/{id}")))
    }
}
