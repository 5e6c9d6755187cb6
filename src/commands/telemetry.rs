//! Telemetry inspection command handlers

use crate::cli::TelemetryCommand;
use crate::config::Config;
use crate::error::Result;
use crate::telemetry::{
    poller, SimulatedTelemetry, TelemetryCache, TelemetryPoller, TelemetryProvider,
    TelemetrySnapshot,
};
use colored::Colorize;
use prettytable::{format, Table};
use std::sync::Arc;
use std::time::Duration;

/// Handle telemetry commands
pub async fn handle_telemetry(config: &Config, command: TelemetryCommand) -> Result<()> {
    let provider: Arc<dyn TelemetryProvider> =
        Arc::new(SimulatedTelemetry::new(config.telemetry.seed));

    match command {
        TelemetryCommand::Topics => {
            for topic in provider.topics() {
                println!("{}", topic);
            }
        }
        TelemetryCommand::Show { topic: Some(topic) } => {
            let poller = TelemetryPoller::new(
                Arc::clone(&provider),
                Arc::new(TelemetryCache::new()),
                Duration::from_millis(config.telemetry.poll_interval_ms),
            );
            match poller.latest(&topic).await {
                Some(snapshot) => print_snapshots(&[snapshot]),
                None => println!("{}", format!("No data for topic {}", topic).yellow()),
            }
        }
        TelemetryCommand::Show { topic: None } => {
            let cache = TelemetryCache::new();
            poller::poll_once(&provider, &cache).await;

            let snapshots: Vec<TelemetrySnapshot> = cache
                .topics()
                .iter()
                .filter_map(|topic| cache.latest(topic))
                .collect();
            print_snapshots(&snapshots);
        }
    }

    Ok(())
}

pub(crate) fn print_snapshots(snapshots: &[TelemetrySnapshot]) {
    if snapshots.is_empty() {
        println!("{}", "No telemetry available.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "Topic".bold(),
        "Status".bold(),
        "Coherence".bold(),
        "Load".bold(),
        "Confidence".bold(),
        "Drift".bold()
    ]);

    for snapshot in snapshots {
        let reading = |name: &str| {
            snapshot
                .metrics
                .get(name)
                .map(|v| format!("{:.3}", v))
                .unwrap_or_else(|| "-".to_string())
        };
        table.add_row(prettytable::row![
            snapshot.topic.cyan(),
            snapshot.status,
            reading("coherence"),
            reading("load"),
            reading("confidence"),
            reading("drift")
        ]);
    }

    println!();
    table.printstd();
    println!();
}
