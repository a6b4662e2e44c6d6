use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::{FakerConfig, Tile, TileStatus};

pub trait Formatter {
    fn write(&self, tile: &Tile) -> String;
}

pub struct HumanFormatter;

pub struct JsonFormatter;

impl Formatter for HumanFormatter {
    fn write(&self, tile: &Tile) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "Type: {}", tile.tile_type);
        let _ = writeln!(output, "Label: {}", tile.label.replace('\n', " "));
        let _ = writeln!(output, "Status: {}", tile.status);
        if tile.previous_status != TileStatus::Unknown {
            let _ = writeln!(output, "Previous status: {}", tile.previous_status);
        }
        if let Some(message) = &tile.message {
            let _ = writeln!(output, "Message: {}", message);
        }
        if let Some(author) = &tile.author {
            let _ = writeln!(output, "Author: {} <{}>", author.name, author.avatar_url);
        }
        if let Some(duration) = tile.duration {
            let _ = writeln!(output, "Duration: {}s", duration);
        }
        if let Some(estimated) = tile.estimated_duration {
            let _ = writeln!(output, "Estimated duration: {}s", estimated);
        }
        if let Some(started_at) = tile.started_at {
            let _ = writeln!(output, "Started at: {}", timestamp(started_at));
        }
        if let Some(finished_at) = tile.finished_at {
            let _ = writeln!(output, "Finished at: {}", timestamp(finished_at));
        }
        if !tile.values.is_empty() {
            let values: Vec<String> = tile.values.iter().map(|value| value.to_string()).collect();
            let _ = writeln!(output, "Values: {}", values.join(", "));
        }
        output
    }
}

impl Formatter for JsonFormatter {
    fn write(&self, tile: &Tile) -> String {
        match serde_json::to_string_pretty(tile) {
            Ok(json) => format!("{}\n", json),
            Err(err) => json_error(&err.to_string()),
        }
    }
}

fn json_error(message: &str) -> String {
    format!("{}\n", serde_json::json!({ "error": message }))
}

pub fn describe_config(config: &FakerConfig) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Reference: {}", config.reference);
    let _ = writeln!(output, "Finish span: {}s", config.finish_span_secs);
    let _ = writeln!(output, "Start fallback: {}s", config.start_fallback_secs);
    let _ = writeln!(
        output,
        "Estimated duration: {}s",
        config.estimated_duration_secs
    );
    let _ = writeln!(
        output,
        "Unstable probability: {}",
        config.unstable_probability
    );
    match config.seed {
        Some(seed) => {
            let _ = writeln!(output, "Seed: {}", seed);
        }
        None => {
            let _ = writeln!(output, "Seed: none");
        }
    }
    let _ = writeln!(output, "Statuses:");
    for weight in &config.statuses {
        let _ = writeln!(output, "- {} (hold: {}s)", weight.status, weight.hold_secs);
    }
    output
}

fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}
