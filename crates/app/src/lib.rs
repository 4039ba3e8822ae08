//! `gearlog-app` — wires configuration, id generation and the demo inventory
//! into a [`Catalog`] and renders its read views.

pub mod config;

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;

use gearlog_core::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
use gearlog_inventory::seed::demo_inventory;
use gearlog_inventory::{Catalog, CategorySummary, InventoryStore, LogEntry, SharedInventory};

use crate::config::{AppConfig, IdStrategy};

/// Build the catalog described by `config`.
pub fn build_catalog(config: &AppConfig) -> Catalog {
    let ids: Arc<dyn IdGenerator> = match config.id_strategy {
        IdStrategy::Uuid => Arc::new(UuidIdGenerator),
        // The demo inventory uses ids "1" through "4".
        IdStrategy::Sequential => Arc::new(SequentialIdGenerator::starting_at(100)),
    };

    let store = if config.seed_demo {
        demo_inventory(Utc::now())
    } else {
        InventoryStore::new()
    };

    Catalog::new(SharedInventory::new(store), ids, config.catalog.clone())
}

/// One line of the report.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ReportLine<'a> {
    Category(&'a CategorySummary),
    Log(&'a LogEntry),
}

/// Write the category summary followed by the inventory log, one JSON object
/// per line.
pub fn write_report(catalog: &Catalog, mut out: impl Write) -> anyhow::Result<()> {
    let summaries = catalog.category_summaries();
    let log = catalog.inventory_log();

    let lines = summaries
        .iter()
        .map(ReportLine::Category)
        .chain(log.iter().map(ReportLine::Log));
    for line in lines {
        serde_json::to_writer(&mut out, &line).context("failed to serialize report line")?;
        out.write_all(b"\n").context("failed to write report")?;
    }
    out.flush().context("failed to flush report")?;

    tracing::info!(
        categories = summaries.len(),
        items = log.len(),
        "report written"
    );
    Ok(())
}
