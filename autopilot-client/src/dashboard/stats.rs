//! Summary metrics shown above the dashboard tables

use chrono::NaiveDate;
use shared::models::{Reservation, ReservationStatus};

/// Flat nightly rate used for the revenue estimate
pub const REVENUE_PER_NIGHT_USD: i64 = 120;

/// Summary card values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total_rooms: usize,
    pub active_today: usize,
    pub occupancy_percent: u32,
    pub estimated_revenue_usd: i64,
}

impl Summary {
    pub fn compute(room_count: usize, reservations: &[Reservation], today: &str) -> Self {
        let active_today = active_on(reservations, today);
        Self {
            total_rooms: room_count,
            active_today,
            occupancy_percent: occupancy_percent(active_today, room_count),
            estimated_revenue_usd: estimated_revenue(reservations),
        }
    }
}

/// Billable nights for a stay, never less than one
///
/// Dates that do not parse as `YYYY-MM-DD` count as a single night.
pub fn nights(checkin: &str, checkout: &str) -> i64 {
    let parse = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
    match (parse(checkin), parse(checkout)) {
        (Some(start), Some(end)) => (end - start).num_days().max(1),
        _ => 1,
    }
}

pub fn estimated_revenue(reservations: &[Reservation]) -> i64 {
    reservations
        .iter()
        .filter(|r| r.status.is_billable())
        .map(|r| nights(&r.checkin, &r.checkout) * REVENUE_PER_NIGHT_USD)
        .sum()
}

/// Reservations in house on `today` (inclusive on both ends)
pub fn active_on(reservations: &[Reservation], today: &str) -> usize {
    reservations
        .iter()
        .filter(|r| {
            r.status != ReservationStatus::Cancelled
                && r.checkin.as_str() <= today
                && r.checkout.as_str() >= today
        })
        .count()
}

pub fn occupancy_percent(active: usize, rooms: usize) -> u32 {
    if rooms == 0 {
        return 0;
    }
    (active as f64 / rooms as f64 * 100.0).round() as u32
}

/// Whole-dollar USD with thousands separators (`$1,440`)
pub fn format_usd(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}
