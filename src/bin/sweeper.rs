use std::time::Duration;
use tracing::{error, info, Level};
use lms_circulation::circulation::factory::create_circulation_engine;
use lms_circulation::circulation::seed::load_sample_data;
use lms_circulation::gateway::GatewayPublisherVia;
use lms_circulation::utils::logs::setup_tracing;
use lms_circulation::{CirculationEngine, Configuration, LibraryResult};

// Runs the due-soon and overdue sweeps against a seeded branch until interrupted.
// Settings come from LMS_* environment variables, e.g. LMS_SWEEP_INTERVAL_SECS=60.

async fn sweep(engine: &CirculationEngine) {
    match engine.send_due_reminders().await {
        Ok(sent) => info!(sent, "due reminders sent"),
        Err(err) => error!(error = %err, "due reminder sweep failed"),
    }
    match engine.send_overdue_notifications().await {
        Ok(flagged) => info!(flagged, "overdue notifications sent"),
        Err(err) => error!(error = %err, "overdue sweep failed"),
    }
}

#[tokio::main]
async fn main() -> LibraryResult<()> {
    setup_tracing(Level::INFO);

    let config = Configuration::load()?;
    let engine = create_circulation_engine(&config, GatewayPublisherVia::Logs);
    let (books, members) = load_sample_data(&engine).await?;
    info!(branch = %config.branch_id, books, members, interval_secs = config.sweep_interval_secs, "sweeper started");

    let mut ticker = tokio::time::interval(Duration::from_secs(config.sweep_interval_secs.max(1)));
    loop {
        tokio::select! {
            _ = ticker.tick() => sweep(&engine).await,
            _ = tokio::signal::ctrl_c() => {
                info!(branch = %config.branch_id, "sweeper stopped");
                break;
            }
        }
    }
    Ok(())
}
