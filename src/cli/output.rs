//! Output formatting for CLI commands.
//!
//! Every formatter prints either pretty JSON or a human-readable text
//! rendering, selected by the global `--json` flag.

use bookline::feed::CalendarEntry;
use bookline::model::{ItemKind, Resource, ScheduledItem};
use bookline::service::SeriesOutcome;
use bookline::session::Session;

use super::types::{CheckResult, ExpandResult};

fn item_label(item: &ScheduledItem) -> String {
    match &item.kind {
        ItemKind::Appointment(details) => {
            let client = if details.client_name.is_empty() {
                "Customer"
            } else {
                details.client_name.as_str()
            };
            format!("{} [{}]", client, details.status)
        }
        ItemKind::Blocker(details) => {
            format!("BLOCKED: {}", details.reason.as_deref().unwrap_or("-"))
        }
    }
}

/// Print an expansion preview.
pub fn print_expand(result: &ExpandResult, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(result).unwrap());
    } else {
        println!(
            "{} occurrence(s) ({} pattern){}",
            result.occurrences.len(),
            result.pattern,
            if result.truncated { ", preview truncated" } else { "" }
        );
        for occurrence in &result.occurrences {
            println!("  {}", occurrence);
        }
        if result.occurrences.is_empty() {
            println!("  (empty range)");
        }
    }
}

/// Print a conflict-check result.
pub fn print_check(result: &CheckResult, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(result).unwrap());
    } else if result.is_free() {
        println!("Free: {} has no conflicts", result.interval);
    } else {
        println!(
            "{} conflict(s) with {}:",
            result.conflicts.len(),
            result.interval
        );
        for item in &result.conflicts {
            println!("  {}  {}  {}", item.id, item.interval, item_label(item));
        }
    }
}

/// Print an item list.
pub fn print_items(items: &[ScheduledItem], json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(items).unwrap());
        return;
    }
    if items.is_empty() {
        println!("No scheduled items.");
        return;
    }

    println!("{:<38} {:<42} {:<10} ITEM", "ID", "INTERVAL", "STAFF");
    println!("{}", "-".repeat(110));
    for item in items {
        println!(
            "{:<38} {:<42} {:<10} {}",
            item.id,
            item.interval.to_string(),
            item.owner.as_deref().unwrap_or("-"),
            item_label(item)
        );
    }
    println!("\nTotal: {} item(s)", items.len());
}

/// Print one item.
pub fn print_item(item: &ScheduledItem, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(item).unwrap());
        return;
    }
    println!("{}  {}  {}", item.id, item.interval, item_label(item));
    if let Some(owner) = &item.owner {
        println!("  staff: {}", owner);
    }
    if let Some(resource) = &item.resource {
        println!("  resource: {}", resource);
    }
    if let Some(series) = &item.series {
        println!("  series: {}", series);
    }
    if let ItemKind::Appointment(details) = &item.kind {
        if !details.services.is_empty() {
            let names: Vec<_> = details.services.iter().map(|s| s.name.as_str()).collect();
            println!("  services: {}", names.join(", "));
        }
        if let Some(notes) = &details.notes {
            println!("  notes: {}", notes);
        }
    }
}

/// Print the outcome of committing a series.
pub fn print_series_outcome(outcome: &SeriesOutcome, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome).unwrap());
        return;
    }
    println!("Series {} created", outcome.series.id);
    println!(
        "  {} occurrence(s) committed, {} skipped",
        outcome.created.len(),
        outcome.skipped.len()
    );
    for item in &outcome.created {
        println!("  + {}", item.interval);
    }
    for skipped in &outcome.skipped {
        println!(
            "  - {} skipped ({} conflict(s))",
            skipped.interval,
            skipped.conflicts.len()
        );
    }
}

/// Print the resource list.
pub fn print_resources(resources: &[Resource], json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(resources).unwrap());
        return;
    }
    if resources.is_empty() {
        println!("No resources.");
        return;
    }
    println!("{:<38} {:<12} {:<8} NAME", "ID", "TYPE", "ACTIVE");
    println!("{}", "-".repeat(80));
    for resource in resources {
        println!(
            "{:<38} {:<12} {:<8} {}",
            resource.id,
            resource.kind.to_string(),
            if resource.active { "yes" } else { "no" },
            resource.name
        );
    }
}

/// Print the calendar widget feed.
pub fn print_feed(entries: &[CalendarEntry], json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(entries).unwrap());
        return;
    }
    for entry in entries {
        println!(
            "{}  {} - {}  {}  ({})",
            entry.id, entry.start, entry.end, entry.title, entry.background_color
        );
    }
    if entries.is_empty() {
        println!("Empty calendar.");
    }
}

/// Print session state.
pub fn print_session(session: &Session, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(session).unwrap());
        return;
    }
    match &session.user {
        Some(user) => println!("Signed in: {} ({}, id {})", user.name, user.role, user.id),
        None => println!("Signed out."),
    }
    if session.demo_mode {
        println!("Demo mode is on.");
    }
}

/// Print a bare confirmation line.
pub fn print_done(message: &str, json: bool) {
    if json {
        println!("{}", serde_json::json!({ "ok": true, "message": message }));
    } else {
        println!("{}", message);
    }
}
