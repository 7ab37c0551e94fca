use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::config::Settings;
use crate::controller::{Controller, Phase, RequestState};
use crate::metrics::gather_metrics;
use crate::render::render_state;
use crate::transport::build_transport;
use crate::types::AnalysisResult;
use crate::views::{build_views, AnalyticsViews};

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Submit this once and exit; otherwise read one submission per stdin line.
    pub video: Option<String>,
    pub json: bool,
    pub dump_metrics: bool,
}

pub async fn run(settings: Settings, options: RunOptions) -> Result<()> {
    let transport = build_transport(&settings).context("build HTTP transport")?;
    let controller = Arc::new(Controller::new(
        Arc::new(transport),
        settings.client_id.clone(),
        settings.max_comments,
    ));

    info!(
        client_id = %settings.client_id,
        endpoint = %settings.endpoint,
        max_comments = settings.max_comments,
        "Comment analyzer started"
    );

    let mut stdout = io::stdout();
    let outcome = match options.video.as_deref() {
        Some(video) => run_once(&controller, video, &mut stdout, options.json).await,
        None => {
            let stdin = BufReader::new(tokio::io::stdin());
            run_interactive(controller, stdin, &mut stdout, options.json).await
        }
    };

    if options.dump_metrics {
        eprint!("{}", gather_metrics());
    }
    outcome
}

async fn run_once<W: Write>(controller: &Controller, video: &str, out: &mut W, json: bool) -> Result<()> {
    let state = tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
            return Ok(());
        }
        state = controller.submit(video) => state,
    };

    if json {
        emit(out, &state, json)?;
    }
    match &state.phase {
        Phase::Failure(message) => Err(anyhow!("{message}")),
        _ if json => Ok(()),
        _ => emit(out, &state, json),
    }
}

/// Reads one submission per line. At end of input, waits for every submission still in flight
/// and prints the last state before returning.
async fn run_interactive<R, W>(controller: Arc<Controller>, input: R, out: &mut W, json: bool) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut updates = controller.subscribe();
    let mut lines = input.lines();
    let mut in_flight = JoinSet::new();
    let mut stdin_open = true;

    emit(out, &RequestState::idle(), json)?;

    loop {
        if !stdin_open && in_flight.is_empty() {
            break;
        }
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
            line = lines.next_line(), if stdin_open => {
                match line.context("read stdin")? {
                    Some(line) => {
                        let controller = controller.clone();
                        in_flight.spawn(async move {
                            controller.submit(&line).await;
                        });
                    }
                    None => stdin_open = false,
                }
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(err) = joined {
                    warn!(error = %err, "Submission task failed");
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                emit(out, &state, json)?;
            }
        }
    }

    if updates.has_changed().unwrap_or(false) {
        let state = updates.borrow_and_update().clone();
        emit(out, &state, json)?;
    }

    info!("Comment analyzer stopped");
    Ok(())
}

fn emit<W: Write>(out: &mut W, state: &RequestState, json: bool) -> Result<()> {
    out.write_all(format_state(state, json)?.as_bytes())
        .and_then(|()| out.flush())
        .context("write output")
}

/// One JSON object per line in `--json` mode, tagged by `phase`.
#[derive(Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
enum JsonState<'a> {
    Idle,
    Loading {
        input: &'a str,
    },
    Failure {
        error: &'a str,
    },
    Success {
        result: &'a AnalysisResult,
        #[serde(skip_serializing_if = "Option::is_none")]
        views: Option<AnalyticsViews>,
    },
}

impl<'a> JsonState<'a> {
    fn from_state(state: &'a RequestState) -> Self {
        match &state.phase {
            Phase::Idle => Self::Idle,
            Phase::Loading => Self::Loading {
                input: state.input_value.trim(),
            },
            Phase::Failure(message) => Self::Failure { error: message },
            Phase::Success(result) => Self::Success {
                result,
                views: build_views(result.analysis.as_ref()),
            },
        }
    }
}

fn format_state(state: &RequestState, json: bool) -> Result<String> {
    if !json {
        return Ok(render_state(state));
    }
    let line = serde_json::to_string(&JsonState::from_state(state)).context("serialise state")?;
    Ok(format!("{line}\n"))
}
