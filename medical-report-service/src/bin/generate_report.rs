use anyhow::bail;
use clap::Parser;
use medical_report_service::{
    prompt_templates::{SAMPLE_DOCUMENT_TEXT, SYSTEM_INSTRUCTION},
    render_report,
};
use report_flow::{
    Event, GeminiConfig, GenerationClient, InMemoryLifecycleStorage, LifecycleRunner,
};
use std::sync::Arc;
use tracing::info;

/// Runs one report through the whole lifecycle against the live Gemini API.
#[derive(Debug, Parser)]
#[command(name = "generate_report", version, about = "Generate a consultation report from the sample document")]
struct Args {
    /// Name recorded for the attached document.
    #[arg(long, default_value = "outpatient_record.pdf")]
    document: String,
    /// Doctor's notes appended to the prompt.
    #[arg(long, default_value = "")]
    notes: String,
    /// Print the report as JSON instead of rendered sections.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let config = GeminiConfig::from_env()?;
    let client = GenerationClient::gemini(config, SYSTEM_INSTRUCTION)?;
    let runner = LifecycleRunner::new(
        client,
        Arc::new(InMemoryLifecycleStorage::new()),
        SAMPLE_DOCUMENT_TEXT,
    );

    let session = runner.storage().create().await?;
    runner
        .begin(&session.id, Event::AttachDocument(args.document))
        .await?;
    runner.begin(&session.id, Event::EditNotes(args.notes)).await?;

    info!("Generating report for session {}", session.id);
    let state = runner.submit(&session.id).await?;

    let Some(report) = state.report() else {
        bail!(
            "{}",
            state
                .error
                .as_deref()
                .unwrap_or("generation did not produce a report")
        );
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", render_report(report));
    }

    Ok(())
}
