//! Terminal output helpers

use owo_colors::OwoColorize;
use pharmloc_geo::{GeoRecord, Ranked};

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Display name of a backend row: `name`, then `id`, then a placeholder.
pub fn record_name(record: &GeoRecord) -> String {
    match (record.get("name"), record.get("id")) {
        (Some(serde_json::Value::String(name)), _) => name.clone(),
        (_, Some(id)) => format!("#{}", id),
        _ => "(unnamed)".to_string(),
    }
}

/// Print a ranked list as a numbered table
pub fn print_ranking(ranked: &[Ranked<GeoRecord>]) {
    let width = ranked
        .iter()
        .map(|r| record_name(&r.entity).chars().count())
        .max()
        .unwrap_or(0);

    for (i, r) in ranked.iter().enumerate() {
        let name = record_name(&r.entity);
        let label = r.distance_label();
        let index = format!("{:>3}.", i + 1);
        if r.distance_km.is_some() {
            println!("{} {:<width$}  {}", index.dimmed(), name, label.green(), width = width);
        } else {
            println!("{} {:<width$}  {}", index.dimmed(), name, label.dimmed(), width = width);
        }
    }
}
