//! deep-report CLI - stream a staged research report and write it as a PDF

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use futures::StreamExt;
use log::info;

use deep_report::{
    Error, LayoutEngine, PipelineConfig, ReportCollector, ReportPipeline, ReportRequest, ReportService,
    Result, suggested_filename, to_frame,
};

#[derive(Parser)]
#[command(name = "deep-report")]
#[command(version)]
#[command(about = "Generate a multi-perspective research report as a PDF", long_about = None)]
struct Cli {
    /// Research topic
    #[arg(value_name = "TOPIC")]
    topic: String,

    /// Output file (derived from the topic if not specified)
    #[arg(short, long, value_name = "FILE", env = "DEEP_REPORT_OUTPUT")]
    output: Option<PathBuf>,

    /// Skip the delay between stages
    #[arg(long, env = "DEEP_REPORT_NO_PACING")]
    no_pacing: bool,

    /// Do not call the search service
    #[arg(long, env = "DEEP_REPORT_OFFLINE")]
    offline: bool,

    /// Do not print event frames
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", error_line(&e));
            ExitCode::FAILURE
        }
    }
}

fn error_line(e: &Error) -> String {
    format!("Error: {}", e)
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = PipelineConfig::new().retrieval(!cli.offline);
    if cli.no_pacing {
        config = config.no_pacing();
    }
    let service = ReportService::new(ReportPipeline::new(config), LayoutEngine::default());

    let body = serde_json::to_string(&ReportRequest {
        topic: Some(cli.topic.clone()),
    })?;
    let mut stream = service.submit_report(&body)?;
    let collector = ReportCollector::new();

    let stdout = std::io::stdout();
    while let Some(event) = stream.next().await {
        collector.record(&event);
        if !cli.quiet {
            let mut out = stdout.lock();
            out.write_all(to_frame(&event)?.as_bytes())?;
            out.flush()?;
        }
    }

    let blocks = collector.finish()?;

    let topic = cli.topic.trim();
    let artifact = service.build_document(topic, &blocks)?;
    let path = cli
        .output
        .unwrap_or_else(|| PathBuf::from(suggested_filename(topic)));
    std::fs::write(&path, &artifact.bytes)?;
    info!("wrote {} ({} bytes)", path.display(), artifact.bytes.len());

    Ok(())
}
