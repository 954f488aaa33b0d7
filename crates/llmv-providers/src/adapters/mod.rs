//! Provider Dialect Adapters
//!
//! An adapter translates a [`ProbeKind`] into one HTTP request and decides
//! whether a successful (2xx) response body demonstrates the probed
//! behaviour. Status classification happens before the adapter sees the
//! body and is shared by every dialect.
//!
//! | Dialect | Adapter |
//! |---------|---------|
//! | `openai` | [`OpenAiAdapter`] |
//! | `anthropic` | [`AnthropicAdapter`] |

pub mod anthropic;
pub mod openai;

pub use anthropic::AnthropicAdapter;
pub use openai::OpenAiAdapter;

use crate::constants::{API_KEY_HEADER, CONTENT_TYPE_JSON};
use crate::utils::JsonExt;
use llmv_domain::{AuthScheme, ModelRef, ProbeError, ProbeKind, Provider, ProviderDialect};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

/// Request builder and response judge for one provider dialect
pub trait ProviderAdapter: Send + Sync {
    /// Dialect handled by this adapter
    fn dialect(&self) -> ProviderDialect;

    /// Build the request for a probe
    ///
    /// Probes the dialect cannot express return
    /// [`ProbeErrorKind::Unsupported`](llmv_domain::ProbeErrorKind::Unsupported)
    /// and no request is sent.
    fn build_request(
        &self,
        client: &Client,
        provider: &Provider,
        target: &ModelRef,
        kind: &ProbeKind,
    ) -> Result<RequestBuilder, ProbeError>;

    /// Judge a successful response body
    fn parse_response(&self, target: &ModelRef, kind: &ProbeKind, body: &str)
    -> Result<(), ProbeError>;

    /// Build the request listing every model the provider serves
    fn build_list_request(&self, client: &Client, provider: &Provider) -> RequestBuilder;

    /// Model ids from a successful listing body
    fn parse_model_list(&self, body: &str) -> Result<Vec<String>, ProbeError> {
        model_ids(body)
    }
}

static OPENAI: OpenAiAdapter = OpenAiAdapter;
static ANTHROPIC: AnthropicAdapter = AnthropicAdapter;

/// Adapter for a dialect
pub fn adapter_for(dialect: ProviderDialect) -> &'static dyn ProviderAdapter {
    match dialect {
        ProviderDialect::OpenAiCompatible => &OPENAI,
        ProviderDialect::Anthropic => &ANTHROPIC,
    }
}

/// Attach the provider's credential according to its auth scheme
///
/// An empty credential sends no auth header at all.
pub(crate) fn authorize(builder: RequestBuilder, provider: &Provider) -> RequestBuilder {
    if provider.credential.is_empty() {
        return builder;
    }
    let secret = provider.credential.expose();
    match provider.auth_scheme {
        AuthScheme::Bearer => builder.header(AUTHORIZATION, format!("Bearer {secret}")),
        AuthScheme::ApiKeyHeader => builder.header(API_KEY_HEADER, secret),
        AuthScheme::None => builder,
    }
}

/// POST a JSON payload with the provider's auth attached
pub(crate) fn post_json(client: &Client, provider: &Provider, path: &str, payload: &Value) -> RequestBuilder {
    authorize(client.post(provider.endpoint(path)), provider)
        .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
        .json(payload)
}

/// Parse a body as JSON, classifying garbage as a malformed response
pub(crate) fn parse_json(body: &str) -> Result<Value, ProbeError> {
    serde_json::from_str(body)
        .map_err(|e| ProbeError::malformed(format!("response is not valid JSON: {e}")))
}

/// Whether a body carries at least one server-sent event with a payload
pub(crate) fn has_stream_chunks(body: &str, terminator: Option<&str>) -> bool {
    body.lines()
        .filter_map(|line| line.trim().strip_prefix(crate::constants::SSE_DATA_PREFIX))
        .map(str::trim)
        .any(|data| !data.is_empty() && Some(data) != terminator)
}

/// Ids of a `{"data": [{"id": ...}]}` model listing, in listing order
pub(crate) fn model_ids(body: &str) -> Result<Vec<String>, ProbeError> {
    let response = parse_json(body)?;
    let models = response
        .opt_array("data")
        .ok_or_else(|| ProbeError::malformed("model list has no data array"))?;
    Ok(models
        .iter()
        .filter_map(|model| model.opt_str("id"))
        .map(str::to_string)
        .collect())
}
