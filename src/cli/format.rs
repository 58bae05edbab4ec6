//! Output formatting for CLI display.

use crate::costing::JobFinancials;
use crate::interval::Interval;
use crate::ledger::{Availability, BookingKind};
use crate::model::{InventoryItem, Job};
use crate::rest::RestReport;
use crate::storage::Admission;

fn format_interval(interval: &Interval) -> String {
    if interval.start() == interval.end() {
        interval.start().to_string()
    } else {
        format!("{} to {}", interval.start(), interval.end())
    }
}

fn format_kind(kind: BookingKind) -> &'static str {
    match kind {
        BookingKind::Job => "job",
        BookingKind::Rental => "rental",
    }
}

pub(super) fn describe_availability(
    item: &InventoryItem,
    interval: &Interval,
    availability: &Availability,
) -> String {
    let mut out = format!(
        "{}: {} of {} free, {}",
        item.name,
        availability.available,
        item.total_owned,
        format_interval(interval)
    );
    let demand = availability.demand();
    if demand > u64::from(item.total_owned) {
        out.push_str(&format!(" (over by {})", demand - u64::from(item.total_owned)));
    }
    for c in &availability.conflicts {
        out.push_str(&format!(
            "\n  {} x{}  [{}] {}",
            &c.booking_id.to_string()[..8],
            c.quantity,
            format_kind(c.kind),
            c.label
        ));
    }
    out
}

pub(super) fn describe_financials(job: &Job, f: &JobFinancials) -> String {
    let place = if job.location.is_empty() {
        String::new()
    } else {
        format!(" at {}", job.location)
    };
    format!(
        "{}{place} ({} day(s)): revenue {}, direct costs {}, margin {} ({}%)",
        job.name,
        f.days,
        f.revenue.round_dp(2),
        f.direct_costs.round_dp(2),
        f.margin.round_dp(2),
        f.margin_percent.round_dp(1)
    )
}

pub(super) fn describe_rest(name: &str, report: &RestReport) -> String {
    format!(
        "{name}: {} day(s) worked in {}-{:02}, {} rest day(s) missed",
        report.total_worked, report.year, report.month, report.missed_rest
    )
}

pub(super) fn describe_admission(label: &str, admission: &Admission) -> String {
    match admission {
        Admission::Committed => format!("Reserved {label}"),
        Admission::Rejected { shortfalls } => {
            let mut out = format!("Rejected {label}:");
            for s in shortfalls {
                out.push_str(&format!(
                    "\n  item {} short by {} (wanted {}, {} free)",
                    &s.availability.item_id.to_string()[..8],
                    s.shortfall,
                    s.requested,
                    s.availability.available
                ));
            }
            out
        }
    }
}
