use std::time::Duration;

use owo_colors::OwoColorize;
use perusal_core::models::{PipelineResult, ReadingResource};
use serde_json::{Value, json};

/// Human-readable report for the terminal.
pub fn render_text(result: &PipelineResult, words_per_minute: u32) -> String {
    let mut lines = Vec::new();

    for resource in &result.resources {
        match resource.read_time {
            Some(read_time) => lines.push(format!(
                "It will take approximately {} to read {}",
                format_read_time(read_time).bold().green(),
                resource.raw_url
            )),
            None if !resource.kind.is_scored() && resource.is_extracted() => lines.push(format!(
                "{} {}",
                "Fetched (not scored):".dimmed(),
                resource.raw_url
            )),
            None => {}
        }
    }

    lines.push(format!(
        "{} {}",
        "Reading speed:".dimmed(),
        format!("{words_per_minute} words per minute").cyan()
    ));

    if result.errors.is_empty() {
        lines.push(format!("{} {}", "✓".green(), "No errors".bright_green()));
    } else {
        lines.push(format!(
            "{} {}",
            "✗".red(),
            format!("{} error(s)", result.errors.len()).bright_red()
        ));
        for error in &result.errors {
            lines.push(format!("  {}", error.to_string().red()));
        }
    }

    lines.join("\n")
}

/// The whole result as a JSON document.
pub fn render_json(result: &PipelineResult, words_per_minute: u32) -> Value {
    json!({
        "words_per_minute": words_per_minute,
        "resources": result.resources.iter().map(resource_json).collect::<Vec<_>>(),
        "errors": result.errors,
    })
}

fn resource_json(resource: &ReadingResource) -> Value {
    json!({
        "url": resource.raw_url,
        "kind": resource.kind,
        "title": (!resource.title.is_empty()).then_some(&resource.title),
        "word_count": resource.word_count,
        "complexity": resource.complexity.map(|c| c.factor()),
        "read_time_seconds": resource.read_time.map(|d| d.as_secs()),
    })
}

/// "45 seconds", "1 minute", "12 minutes 5 seconds".
pub fn format_read_time(read_time: Duration) -> String {
    let total = read_time.as_secs();
    let (minutes, seconds) = (total / 60, total % 60);

    let plural = |n: u64, unit: &str| {
        if n == 1 {
            format!("1 {unit}")
        } else {
            format!("{n} {unit}s")
        }
    };

    match (minutes, seconds) {
        (0, s) => plural(s, "second"),
        (m, 0) => plural(m, "minute"),
        (m, s) => format!("{} {}", plural(m, "minute"), plural(s, "second")),
    }
}
