//! Rest-day compliance per crew member and month.
//!
//! Worked days are the calendar days of every active job the member is
//! assigned to, deduplicated across overlapping jobs and limited to the
//! queried month. They are grouped into ISO-8601 weeks (Monday start,
//! week 1 holds the year's first Thursday), keyed by ISO year so late
//! December days that belong to next year's week 1 stay separate.
//! Every day over the weekly limit is a missed rest day.

use std::collections::{BTreeMap, BTreeSet};

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Settings;
use crate::interval::Interval;
use crate::model::{CrewMember, Job};

/// Days worked in one ISO week, counting only days inside the queried month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestWindow {
    pub iso_year: i16,
    pub week: i8,
    pub days_worked: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestReport {
    pub crew_id: Uuid,
    pub year: i16,
    pub month: i8,
    pub total_worked: u32,
    pub missed_rest: u32,

    /// Weeks with at least one worked day, in calendar order.
    pub weeks: Vec<RestWindow>,
}

/// A roster member's rest report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewRest {
    pub name: String,
    #[serde(flatten)]
    pub report: RestReport,
}

/// The month as an interval, or `None` if `year`/`month` is not a real month.
fn month_interval(year: i16, month: i8) -> Option<Interval> {
    let first = Date::new(year, month, 1).ok()?;
    Some(Interval::new(first, first.last_of_month()))
}

/// Counts `crew_id`'s worked days in the month and the rest days they missed.
///
/// A month that doesn't exist yields an empty report.
pub fn evaluate_rest(
    jobs: &[Job],
    crew_id: Uuid,
    year: i16,
    month: i8,
    settings: &Settings,
) -> RestReport {
    let mut worked = BTreeSet::new();
    let mut weeks: BTreeMap<(i16, i8), u32> = BTreeMap::new();

    if let Some(window) = month_interval(year, month) {
        for job in jobs.iter().filter(|j| j.is_active() && j.has_crew(crew_id)) {
            if !job.interval.overlaps(&window) {
                continue;
            }
            let span = Interval::new(
                job.interval.start().max(window.start()),
                job.interval.end().min(window.end()),
            );
            for day in span.days() {
                if worked.insert(day) {
                    let iso = day.iso_week_date();
                    *weeks.entry((iso.year(), iso.week())).or_default() += 1;
                }
            }
        }
    }

    let limit = settings.weekly_work_limit;
    let mut missed_rest = 0;
    for (&(iso_year, week), &days) in &weeks {
        if days > limit {
            tracing::trace!(%crew_id, iso_year, week, days, "week over the work limit");
            missed_rest += days - limit;
        }
    }

    RestReport {
        crew_id,
        year,
        month,
        total_worked: u32::try_from(worked.len()).unwrap_or(u32::MAX),
        missed_rest,
        weeks: weeks
            .into_iter()
            .map(|((iso_year, week), days_worked)| RestWindow {
                iso_year,
                week,
                days_worked,
            })
            .collect(),
    }
}

/// Evaluates every roster member, worst offenders first.
///
/// Ties are broken by name.
pub fn evaluate_roster(
    jobs: &[Job],
    roster: &[CrewMember],
    year: i16,
    month: i8,
    settings: &Settings,
) -> Vec<CrewRest> {
    let mut reports: Vec<CrewRest> = roster
        .iter()
        .map(|m| CrewRest {
            name: m.name.clone(),
            report: evaluate_rest(jobs, m.id, year, month, settings),
        })
        .collect();
    reports.sort_by(|a, b| {
        b.report
            .missed_rest
            .cmp(&a.report.missed_rest)
            .then_with(|| a.name.cmp(&b.name))
    });
    reports
}
