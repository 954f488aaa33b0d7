//! HTTP Probe Executor
//!
//! Implements the [`ProbeExecutor`] port over reqwest. Every call sends at
//! most one request and always comes back with a classified
//! [`ProbeOutcome`]; only contract violations surface as `Err`.

use crate::adapters::adapter_for;
use crate::http::{HttpClientConfig, build_client};
use crate::utils::HttpResponseUtils;
use async_trait::async_trait;
use dashmap::DashMap;
use llmv_domain::error::{Error, Result};
use llmv_domain::ports::ProbeExecutor;
use llmv_domain::{ModelRef, ProbeError, ProbeErrorKind, ProbeKind, ProbeOutcome, Provider, ProviderId};
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

/// Probe executor over HTTP
///
/// Keeps one pooled client per provider, built on first use with the
/// provider's connect timeout.
pub struct HttpProbeExecutor {
    config: HttpClientConfig,
    clients: DashMap<ProviderId, Client>,
}

impl HttpProbeExecutor {
    /// Create an executor
    pub fn new(config: HttpClientConfig) -> Self {
        Self {
            config,
            clients: DashMap::new(),
        }
    }

    /// Pool settings
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    fn client_for(&self, provider: &Provider) -> Result<Client> {
        if let Some(client) = self.clients.get(&provider.id) {
            return Ok(client.clone());
        }
        let config = self.config.clone().with_connect_timeout(provider.timeouts.connect);
        let client = build_client(&config)?;
        Ok(self
            .clients
            .entry(provider.id.clone())
            .or_insert(client)
            .clone())
    }

    async fn exchange(
        request: RequestBuilder,
    ) -> std::result::Result<(StatusCode, HeaderMap, String), ProbeError> {
        let response = request.send().await.map_err(Self::classify_reqwest)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| Self::classify_reqwest(e).with_status(status.as_u16()))?;
        Ok((status, headers, body))
    }

    /// Map a client-side failure; the URL is stripped so query-string
    /// credentials never reach messages
    fn classify_reqwest(error: reqwest::Error) -> ProbeError {
        let error = error.without_url();
        if error.is_timeout() {
            ProbeError::timeout(error.to_string())
        } else if error.is_decode() {
            ProbeError::malformed(error.to_string())
        } else {
            ProbeError::transport(error.to_string())
        }
    }
}

impl Default for HttpProbeExecutor {
    fn default() -> Self {
        Self::new(HttpClientConfig::default())
    }
}

#[async_trait]
impl ProbeExecutor for HttpProbeExecutor {
    #[instrument(skip_all, fields(provider = %provider.id, model = %target.model_id, kind = %kind))]
    async fn probe(
        &self,
        provider: &Provider,
        target: &ModelRef,
        kind: &ProbeKind,
        deadline: Duration,
    ) -> Result<ProbeOutcome> {
        target.validate()?;
        if target.provider_id != provider.id {
            return Err(Error::invalid_argument(format!(
                "target '{target}' does not belong to provider '{}'",
                provider.id
            )));
        }
        if deadline.is_zero() {
            return Err(Error::invalid_argument("probe deadline must be positive"));
        }

        let adapter = adapter_for(provider.dialect);
        let client = match self.client_for(provider) {
            Ok(client) => client,
            Err(e) => {
                return Ok(ProbeOutcome::failed(
                    target.clone(),
                    kind.clone(),
                    Duration::ZERO,
                    ProbeError::transport(e.to_string()),
                ));
            }
        };
        let request = match adapter.build_request(&client, provider, target, kind) {
            Ok(request) => request.timeout(deadline),
            Err(error) => {
                debug!(reason = %error, "Probe not expressible in dialect");
                return Ok(ProbeOutcome::failed(target.clone(), kind.clone(), Duration::ZERO, error));
            }
        };

        let started = Instant::now();
        let exchanged = tokio::time::timeout(deadline, Self::exchange(request)).await;
        let latency = started.elapsed();

        let outcome = match exchanged {
            Err(_) => ProbeOutcome::failed(
                target.clone(),
                kind.clone(),
                latency,
                ProbeError::timeout(format!("no response within {}ms", deadline.as_millis())),
            ),
            Ok(Err(error)) => ProbeOutcome::failed(target.clone(), kind.clone(), latency, error),
            Ok(Ok((status, headers, body))) if !status.is_success() => ProbeOutcome::failed(
                target.clone(),
                kind.clone(),
                latency,
                HttpResponseUtils::classify(status, &headers, &body, &provider.credential),
            ),
            Ok(Ok((status, _, body))) => match adapter.parse_response(target, kind, &body) {
                Ok(()) => ProbeOutcome::succeeded(target.clone(), kind.clone(), latency, Some(status.as_u16())),
                Err(error) => {
                    if error.kind == ProbeErrorKind::MalformedResponse {
                        warn!(
                            status = status.as_u16(),
                            body = %HttpResponseUtils::excerpt(&provider.credential.scrub(&body)),
                            "Provider returned an unexpected response shape"
                        );
                    }
                    ProbeOutcome::failed(target.clone(), kind.clone(), latency, error.with_status(status.as_u16()))
                }
            },
        };
        debug!(
            success = outcome.success,
            latency_ms = u64::try_from(outcome.latency.as_millis()).unwrap_or(u64::MAX),
            error = outcome.error_kind().map(ProbeErrorKind::as_str),
            "Probe finished"
        );
        Ok(outcome)
    }

    #[instrument(skip_all, fields(provider = %provider.id))]
    async fn list_models(&self, provider: &Provider, deadline: Duration) -> Result<Vec<String>> {
        if deadline.is_zero() {
            return Err(Error::invalid_argument("listing deadline must be positive"));
        }
        let adapter = adapter_for(provider.dialect);
        let client = self
            .client_for(provider)
            .map_err(|e| ProbeError::transport(e.to_string()))?;
        let request = adapter.build_list_request(&client, provider).timeout(deadline);

        let (status, headers, body) = tokio::time::timeout(deadline, Self::exchange(request))
            .await
            .map_err(|_| ProbeError::timeout(format!("no model list within {}ms", deadline.as_millis())))??;
        if !status.is_success() {
            return Err(HttpResponseUtils::classify(status, &headers, &body, &provider.credential).into());
        }
        let mut models = adapter
            .parse_model_list(&body)
            .map_err(|error| error.with_status(status.as_u16()))?;
        models.dedup();
        debug!(models = models.len(), "Model list received");
        Ok(models)
    }
}
