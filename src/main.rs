use anyhow::Result;
use clap::Parser;

use comment_insights::app::RunOptions;

/// Analyze the comment section of a YouTube video.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// YouTube URL or video ID; omit to read one per line from stdin
    video: Option<String>,

    /// Print successful results as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Dump prometheus metrics to stderr on exit
    #[arg(long)]
    metrics: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let settings = comment_insights::config::Settings::from_env()?;
    comment_insights::logging::init(&settings.log_level);

    let options = RunOptions {
        video: args.video,
        json: args.json,
        dump_metrics: args.metrics,
    };
    comment_insights::app::run(settings, options).await
}
