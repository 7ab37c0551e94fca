use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::TransportError;
use crate::metrics::{ANALYZER_REQUESTS_TOTAL, ANALYZER_REQUEST_LATENCY_SECONDS};
use crate::types::AnalysisRequest;

/// The single outbound call. Implementations return the decoded JSON body; interpreting it is
/// the normalizer's job.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn fetch(&self, request: &AnalysisRequest) -> Result<Value, TransportError>;
}

pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(settings: &Settings) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|source| TransportError::Request {
                endpoint: settings.endpoint.clone(),
                source,
            })?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
        })
    }
}

#[async_trait]
impl AnalysisTransport for HttpTransport {
    async fn fetch(&self, request: &AnalysisRequest) -> Result<Value, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        // The backend reports failures in-band through `status`, so the body is read whatever
        // the HTTP status code.
        let status = response.status();
        if !status.is_success() {
            debug!(endpoint = %self.endpoint, %status, "Analysis endpoint returned non-success status");
        }

        response
            .json::<Value>()
            .await
            .map_err(|source| TransportError::Decode {
                endpoint: self.endpoint.clone(),
                source,
            })
    }
}

pub struct InstrumentedTransport {
    delegate: Arc<dyn AnalysisTransport>,
    client_id: String,
}

impl InstrumentedTransport {
    pub fn new(delegate: Arc<dyn AnalysisTransport>, client_id: String) -> Self {
        Self { delegate, client_id }
    }
}

#[async_trait]
impl AnalysisTransport for InstrumentedTransport {
    async fn fetch(&self, request: &AnalysisRequest) -> Result<Value, TransportError> {
        ANALYZER_REQUESTS_TOTAL
            .with_label_values(&[&self.client_id])
            .inc();

        let start = Instant::now();
        let result = self.delegate.fetch(request).await;
        let duration = start.elapsed();
        ANALYZER_REQUEST_LATENCY_SECONDS
            .with_label_values(&[&self.client_id])
            .observe(duration.as_secs_f64());

        match &result {
            Ok(_) => info!(
                client_id = %self.client_id,
                video = %request.video_url_or_id,
                latency_ms = duration.as_secs_f64() * 1000.0,
                "Analysis response received"
            ),
            Err(err) => warn!(
                client_id = %self.client_id,
                video = %request.video_url_or_id,
                latency_ms = duration.as_secs_f64() * 1000.0,
                error = %err,
                "Analysis request failed"
            ),
        }
        result
    }
}

pub fn build_transport(settings: &Settings) -> Result<InstrumentedTransport, TransportError> {
    let delegate: Arc<dyn AnalysisTransport> = Arc::new(HttpTransport::new(settings)?);
    Ok(InstrumentedTransport::new(delegate, settings.client_id.clone()))
}
