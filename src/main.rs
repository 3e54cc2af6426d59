use eventproc::{
    config::AppConfig,
    pipeline::{
        create_pipeline_channel,
        executor::PipelineExecutor,
        io::{read_events, write_events},
        registry::ProcessorRegistry,
    },
};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let use_ansi = atty::is(atty::Stream::Stderr);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("eventproc={}", log_level).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr) // stdout carries the events
                .with_ansi(use_ansi),
        )
        .init();

    let config = AppConfig::from_env()?;
    let registry = ProcessorRegistry::with_defaults();
    let executor = PipelineExecutor::new(&config, &registry)?;
    if executor.is_empty() {
        tracing::warn!("No processors configured, events pass through unchanged");
    }

    let (input_tx, input_rx) = create_pipeline_channel(config.channel_buffer);
    let (output_tx, output_rx) = create_pipeline_channel(config.channel_buffer);

    let worker = tokio::spawn(executor.run(input_rx, output_tx));
    let writer = tokio::spawn(write_events(output_rx, tokio::io::stdout()));

    let read_result = read_events(BufReader::new(tokio::io::stdin()), &input_tx).await;
    drop(input_tx);

    // Drain what is in flight first so a writer failure is reported over a read failure.
    worker.await?;
    writer.await??;
    let forwarded = read_result?;
    tracing::info!("Processed {} events", forwarded);

    Ok(())
}
