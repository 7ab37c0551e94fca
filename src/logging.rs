use std::io::{self, IsTerminal};
use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Stdout carries the rendered report, so logs go to stderr. `RUST_LOG` overrides `LOG_LEVEL`.
pub fn init(level: &str) {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(fallback_directive(level)));
        fmt()
            .with_env_filter(env_filter)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .with_target(false)
            .init();
    });
}

/// Our own spans at the configured level; dependencies (reqwest, hyper) stay at info.
fn fallback_directive(level: &str) -> String {
    format!("comment_insights={},info", level_name(level))
}

fn level_name(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" => "error",
        "off" | "quiet" => "off",
        _ => "info",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_parse_loosely() {
        assert_eq!(level_name("WARNING"), "warn");
        assert_eq!(level_name(" debug "), "debug");
        assert_eq!(level_name("verbose"), "info");
        assert_eq!(level_name("quiet"), "off");
    }

    #[test]
    fn fallback_scopes_level_to_this_crate() {
        assert_eq!(fallback_directive("WARNING"), "comment_insights=warn,info");
        assert_eq!(fallback_directive("nonsense"), "comment_insights=info,info");
        assert!(EnvFilter::try_new(fallback_directive("trace")).is_ok());
    }
}
