use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::error::AnalysisError;
use crate::metrics::{ANALYZER_OUTCOMES_TOTAL, ANALYZER_STALE_RESPONSES_TOTAL};
use crate::normalizer::normalize;
use crate::transport::AnalysisTransport;
use crate::types::{AnalysisRequest, AnalysisResult, ResponseStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Loading,
    Success(Arc<AnalysisResult>),
    Failure(String),
}

/// Snapshot of the one request the user cares about. Replaced wholesale on every transition.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState {
    pub phase: Phase,
    pub input_value: String,
    /// Sequence number of the submission that produced this state; 0 before any submission.
    pub request_seq: u64,
}

impl RequestState {
    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            input_value: String::new(),
            request_seq: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.phase {
            Phase::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failure(message) => Some(message),
            _ => None,
        }
    }
}

impl Default for RequestState {
    fn default() -> Self {
        Self::idle()
    }
}

pub struct Controller {
    transport: Arc<dyn AnalysisTransport>,
    client_id: String,
    max_comments: u32,
    latest_seq: Mutex<u64>,
    state: watch::Sender<Arc<RequestState>>,
}

impl Controller {
    pub fn new(transport: Arc<dyn AnalysisTransport>, client_id: String, max_comments: u32) -> Self {
        let (state, _) = watch::channel(Arc::new(RequestState::idle()));
        Self {
            transport,
            client_id,
            max_comments,
            latest_seq: Mutex::new(0),
            state,
        }
    }

    pub fn state(&self) -> Arc<RequestState> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<RequestState>> {
        self.state.subscribe()
    }

    /// Runs one submission to completion and returns the state current afterwards. A newer
    /// submission made while this one is in flight wins; this call's response is then dropped.
    pub async fn submit(&self, raw_input: &str) -> Arc<RequestState> {
        let input = raw_input.trim();

        let seq = {
            let mut latest = self.latest_seq.lock().await;
            *latest += 1;
            let seq = *latest;

            if input.is_empty() {
                self.settle(seq, raw_input, Err(AnalysisError::Validation));
                return self.state();
            }

            self.publish(RequestState {
                phase: Phase::Loading,
                input_value: raw_input.to_string(),
                request_seq: seq,
            });
            seq
        };

        let request = AnalysisRequest {
            video_url_or_id: input.to_string(),
            max_comments: self.max_comments,
        };
        debug!(client_id = %self.client_id, request_seq = seq, video = %input, "Submitting analysis request");

        let outcome = match self.transport.fetch(&request).await {
            Ok(body) => interpret(&body),
            Err(err) => Err(AnalysisError::from(err)),
        };

        let latest = self.latest_seq.lock().await;
        if *latest != seq {
            ANALYZER_STALE_RESPONSES_TOTAL
                .with_label_values(&[&self.client_id])
                .inc();
            info!(
                client_id = %self.client_id,
                request_seq = seq,
                latest_seq = *latest,
                "Discarding stale analysis response"
            );
            return self.state();
        }
        self.settle(seq, raw_input, outcome);
        drop(latest);

        self.state()
    }

    fn settle(&self, seq: u64, raw_input: &str, outcome: Result<AnalysisResult, AnalysisError>) {
        let phase = match outcome {
            Ok(result) => {
                ANALYZER_OUTCOMES_TOTAL
                    .with_label_values(&[&self.client_id, "success"])
                    .inc();
                Phase::Success(Arc::new(result))
            }
            Err(err) => {
                ANALYZER_OUTCOMES_TOTAL
                    .with_label_values(&[&self.client_id, err.outcome_label()])
                    .inc();
                match &err {
                    AnalysisError::Validation => debug!(request_seq = seq, "Rejected empty input"),
                    _ => warn!(client_id = %self.client_id, request_seq = seq, error = %err, "Analysis failed"),
                }
                Phase::Failure(err.user_message())
            }
        };

        self.publish(RequestState {
            phase,
            input_value: raw_input.to_string(),
            request_seq: seq,
        });
    }

    fn publish(&self, state: RequestState) {
        self.state.send_replace(Arc::new(state));
    }
}

fn interpret(body: &Value) -> Result<AnalysisResult, AnalysisError> {
    let result = normalize(body);
    match result.status {
        ResponseStatus::Error => Err(AnalysisError::Service(result.error)),
        ResponseStatus::Ok => Ok(result),
    }
}
