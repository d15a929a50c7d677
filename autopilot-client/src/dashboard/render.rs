//! Plain-text rendering of the dashboard

use std::fmt::Write;

use super::Dashboard;
use super::stats::{REVENUE_PER_NIGHT_USD, Summary, format_usd};

/// Render summary cards, the status line and all three tables
pub fn render(dashboard: &Dashboard, today: &str) -> String {
    let summary = dashboard.summary(today);
    let mut out = String::new();

    let _ = writeln!(out, "Hotel Autopilot Dashboard");
    let _ = writeln!(out);
    render_summary(&mut out, &summary);

    if !dashboard.message().is_empty() {
        let _ = writeln!(out, "> {}", dashboard.message());
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Reservations (Realtime)");
    let rows: Vec<Vec<String>> = dashboard
        .reservations()
        .iter()
        .map(|r| {
            vec![
                r.guest.clone(),
                dashboard.room_name(&r.room_id),
                r.checkin.clone(),
                r.checkout.clone(),
                r.status.as_db().to_string(),
            ]
        })
        .collect();
    render_table(
        &mut out,
        &["Guest", "Room", "Check-in", "Check-out", "Status"],
        &rows,
        "No reservations yet.",
    );

    let _ = writeln!(out, "Housekeeping Tasks");
    let rows: Vec<Vec<String>> = dashboard
        .housekeeping()
        .iter()
        .map(|t| {
            vec![
                dashboard.room_name(&t.room_id),
                t.task_type.as_db().to_string(),
                t.assigned.clone(),
                t.status.as_db().to_string(),
            ]
        })
        .collect();
    render_table(
        &mut out,
        &["Room", "Type", "Assigned", "Status"],
        &rows,
        "No housekeeping tasks yet.",
    );

    let _ = writeln!(out, "Rooms");
    let rows: Vec<Vec<String>> = dashboard
        .rooms()
        .iter()
        .map(|room| {
            vec![
                room.name.clone(),
                room.status.as_db().to_string(),
                room.capacity.to_string(),
            ]
        })
        .collect();
    render_table(
        &mut out,
        &["Room", "Status", "Capacity"],
        &rows,
        "No rooms available.",
    );

    out
}

fn render_summary(out: &mut String, summary: &Summary) {
    let _ = writeln!(out, "Total Rooms:       {}", summary.total_rooms);
    let _ = writeln!(out, "Occupancy Today:   {}%", summary.occupancy_percent);
    let _ = writeln!(
        out,
        "Estimated Revenue: {} (based on {}/night)",
        format_usd(summary.estimated_revenue_usd),
        format_usd(REVENUE_PER_NIGHT_USD)
    );
    let _ = writeln!(out);
}

fn render_table(out: &mut String, headers: &[&str], rows: &[Vec<String>], empty: &str) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let _ = writeln!(out, "{}", format_row(headers.iter().copied(), &widths));
    if rows.is_empty() {
        let _ = writeln!(out, "{empty}");
    }
    for row in rows {
        let _ = writeln!(out, "{}", format_row(row.iter().map(String::as_str), &widths));
    }
    let _ = writeln!(out);
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
