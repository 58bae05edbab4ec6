//! Job cost composition: what a job costs to run and what it leaves.
//!
//! Direct cost is rebuilt from the job, the crew roster, and settings on
//! every call. Nothing is cached and nothing is rounded; amounts keep full
//! decimal precision until display. Arithmetic saturates at the `Decimal`
//! range instead of panicking.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Settings;
use crate::model::{CrewMember, Employment, Job, MaterialSource, VehicleSource};

/// One contributor to a job's direct cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CostLine {
    /// A freelancer's day rate for every job day.
    #[serde(rename_all = "camelCase")]
    FreelanceCrew {
        member_id: Uuid,
        days: i64,
        daily_rate: Decimal,
    },

    /// Travel allowance for an internal staff member.
    #[serde(rename_all = "camelCase")]
    InternalPerDiem {
        member_id: Uuid,
        days: i64,
        rate: Decimal,
    },

    /// Gear hired or bought from a third party.
    ExternalMaterial { amount: Decimal },

    /// A hired vehicle.
    RentalVehicle { amount: Decimal },

    /// An approved or reimbursed crew expense filed against the job.
    #[serde(rename_all = "camelCase")]
    ApprovedExpense { expense_id: Uuid, amount: Decimal },

    /// Flat fee for working inside a fee zone.
    ZoneSurcharge { zone: String, amount: Decimal },
}

impl CostLine {
    pub fn amount(&self) -> Decimal {
        match self {
            Self::FreelanceCrew {
                days, daily_rate, ..
            } => daily_rate.saturating_mul(Decimal::from(*days)),
            Self::InternalPerDiem { days, rate, .. } => rate.saturating_mul(Decimal::from(*days)),
            Self::ExternalMaterial { amount }
            | Self::RentalVehicle { amount }
            | Self::ApprovedExpense { amount, .. }
            | Self::ZoneSurcharge { amount, .. } => *amount,
        }
    }
}

/// Direct cost totals per source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectCostSummary {
    pub freelance_crew: Decimal,
    pub per_diem: Decimal,
    pub external_material: Decimal,
    pub rental_vehicles: Decimal,
    pub approved_expenses: Decimal,
    pub zone_surcharge: Decimal,
}

impl DirectCostSummary {
    fn add(&mut self, line: &CostLine) {
        let amount = line.amount();
        let slot = match line {
            CostLine::FreelanceCrew { .. } => &mut self.freelance_crew,
            CostLine::InternalPerDiem { .. } => &mut self.per_diem,
            CostLine::ExternalMaterial { .. } => &mut self.external_material,
            CostLine::RentalVehicle { .. } => &mut self.rental_vehicles,
            CostLine::ApprovedExpense { .. } => &mut self.approved_expenses,
            CostLine::ZoneSurcharge { .. } => &mut self.zone_surcharge,
        };
        *slot = slot.saturating_add(amount);
    }

    pub fn total(&self) -> Decimal {
        [
            self.freelance_crew,
            self.per_diem,
            self.external_material,
            self.rental_vehicles,
            self.approved_expenses,
            self.zone_surcharge,
        ]
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}

/// A job's cost and margin, as of one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFinancials {
    pub job_id: Uuid,

    /// Inclusive day count, at least 1.
    pub days: i64,

    pub lines: Vec<CostLine>,
    pub summary: DirectCostSummary,
    pub direct_costs: Decimal,

    /// Invoiced revenue, net of VAT.
    pub revenue: Decimal,

    /// Revenue with VAT added. Informational; margin uses net revenue.
    pub gross_revenue: Decimal,

    pub margin: Decimal,

    /// `margin / revenue * 100`, or zero when there is no revenue.
    pub margin_percent: Decimal,
}

/// Derives the cost lines of a job from its crew, gear, vehicles, and expenses.
///
/// Crew ids missing from the roster contribute nothing. A crew id listed
/// twice on the job is paid once.
pub fn cost_lines(job: &Job, roster: &[CrewMember], settings: &Settings) -> Vec<CostLine> {
    let days = job.interval.day_count();
    let mut lines = Vec::new();

    let per_diem_rate = job.per_diem_rate.unwrap_or(settings.per_diem_rate);
    let mut seen = HashSet::new();
    for crew_id in &job.crew {
        if !seen.insert(*crew_id) {
            continue;
        }
        let Some(member) = roster.iter().find(|m| m.id == *crew_id) else {
            tracing::debug!(job = %job.name, %crew_id, "crew member not on roster, skipped");
            continue;
        };
        match member.employment {
            Employment::External => lines.push(CostLine::FreelanceCrew {
                member_id: member.id,
                days,
                daily_rate: member.daily_rate,
            }),
            Employment::Internal if job.requires_travel => {
                lines.push(CostLine::InternalPerDiem {
                    member_id: member.id,
                    days,
                    rate: per_diem_rate,
                });
            }
            Employment::Internal => {}
        }
    }

    lines.extend(
        job.materials
            .iter()
            .filter(|m| m.source == MaterialSource::External)
            .map(|m| CostLine::ExternalMaterial {
                amount: m.unit_cost.saturating_mul(Decimal::from(m.quantity)),
            }),
    );

    lines.extend(
        job.vehicles
            .iter()
            .filter(|v| v.source == VehicleSource::Rented)
            .map(|v| CostLine::RentalVehicle { amount: v.cost }),
    );

    // Expenses are linked from the member's side, so assignment doesn't matter.
    for member in roster {
        lines.extend(
            member
                .expenses
                .iter()
                .filter(|e| e.job_id == Some(job.id) && e.status.counts_as_cost())
                .map(|e| CostLine::ApprovedExpense {
                    expense_id: e.id,
                    amount: e.amount,
                }),
        );
    }

    if let Some(zone) = &job.fee_zone {
        let fee = settings.zone_fee(zone);
        if fee.is_zero() {
            tracing::debug!(job = %job.name, %zone, "no fee configured for zone");
        } else {
            lines.push(CostLine::ZoneSurcharge {
                zone: zone.clone(),
                amount: fee,
            });
        }
    }

    lines
}

/// Computes a job's direct costs, revenue, and margin.
pub fn compute_job_financials(
    job: &Job,
    roster: &[CrewMember],
    settings: &Settings,
) -> JobFinancials {
    let lines = cost_lines(job, roster, settings);

    let mut summary = DirectCostSummary::default();
    for line in &lines {
        summary.add(line);
    }
    let direct_costs = summary.total();

    let revenue = job.revenue;
    let margin = revenue.saturating_sub(direct_costs);
    let margin_percent = if revenue > Decimal::ZERO {
        match margin.checked_div(revenue) {
            Some(ratio) => ratio.saturating_mul(Decimal::ONE_HUNDRED),
            None if margin.is_sign_negative() => Decimal::MIN,
            None => Decimal::MAX,
        }
    } else {
        Decimal::ZERO
    };
    let vat = revenue.saturating_mul(settings.vat_rate) / Decimal::ONE_HUNDRED;
    let gross_revenue = revenue.saturating_add(vat);

    JobFinancials {
        job_id: job.id,
        days: job.interval.day_count(),
        lines,
        summary,
        direct_costs,
        revenue,
        gross_revenue,
        margin,
        margin_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::civil::date;

    use crate::interval::Interval;
    use crate::model::{ApprovalStatus, CrewExpense, JobStatus, MaterialLine, VehicleLine};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn member(employment: Employment, daily_rate: &str) -> CrewMember {
        CrewMember {
            id: Uuid::new_v4(),
            name: "Crew".into(),
            employment,
            daily_rate: dec(daily_rate),
            expenses: vec![],
        }
    }

    fn job(start: i8, end: i8, crew: Vec<Uuid>) -> Job {
        Job {
            id: Uuid::new_v4(),
            name: "Product launch".into(),
            location: "Convention centre".into(),
            fee_zone: None,
            interval: Interval::new(date(2025, 1, start), date(2025, 1, end)),
            status: JobStatus::Confirmed,
            crew,
            materials: vec![],
            vehicles: vec![],
            revenue: Decimal::ZERO,
            requires_travel: false,
            per_diem_rate: None,
        }
    }

    fn expense(job_id: Uuid, amount: &str, status: ApprovalStatus) -> CrewExpense {
        CrewExpense {
            id: Uuid::new_v4(),
            job_id: Some(job_id),
            date: date(2025, 1, 2),
            amount: dec(amount),
            status,
        }
    }

    #[test]
    fn freelancer_is_paid_per_inclusive_day() {
        let freelancer = member(Employment::External, "100");
        let j = job(1, 5, vec![freelancer.id]);

        let f = compute_job_financials(&j, &[freelancer], &Settings::default());
        assert_eq!(f.days, 5);
        assert_eq!(f.summary.freelance_crew, dec("500"));
        assert_eq!(f.summary.per_diem, Decimal::ZERO);
        assert_eq!(f.direct_costs, dec("500"));
    }

    #[test]
    fn per_diem_only_on_travel_jobs() {
        let staff = member(Employment::Internal, "0");
        let other = member(Employment::Internal, "0");
        let mut j = job(1, 3, vec![staff.id, other.id]);
        let roster = [staff, other];

        let home = compute_job_financials(&j, &roster, &Settings::default());
        assert_eq!(home.direct_costs, Decimal::ZERO);

        j.requires_travel = true;
        let away = compute_job_financials(&j, &roster, &Settings::default());
        // 2 staff * 3 days * 50 default rate.
        assert_eq!(away.summary.per_diem, dec("300"));

        j.per_diem_rate = Some(dec("42.50"));
        let custom = compute_job_financials(&j, &roster, &Settings::default());
        assert_eq!(custom.summary.per_diem, dec("255"));
    }

    #[test]
    fn freelancers_get_no_per_diem() {
        let freelancer = member(Employment::External, "200");
        let mut j = job(1, 2, vec![freelancer.id]);
        j.requires_travel = true;

        let f = compute_job_financials(&j, &[freelancer], &Settings::default());
        assert_eq!(f.summary.per_diem, Decimal::ZERO);
        assert_eq!(f.direct_costs, dec("400"));
    }

    #[test]
    fn external_materials_and_rented_vehicles_count() {
        let mut j = job(1, 1, vec![]);
        j.materials = vec![
            MaterialLine {
                item_id: None,
                name: "Hired LED wall".into(),
                quantity: 12,
                unit_cost: dec("85.25"),
                source: MaterialSource::External,
            },
            MaterialLine {
                item_id: Some(Uuid::new_v4()),
                name: "Own cable".into(),
                quantity: 40,
                unit_cost: dec("3"),
                source: MaterialSource::Internal,
            },
        ];
        j.vehicles = vec![
            VehicleLine {
                name: "Luton van".into(),
                source: VehicleSource::Rented,
                cost: dec("180"),
            },
            VehicleLine {
                name: "Company truck".into(),
                source: VehicleSource::Owned,
                cost: dec("999"),
            },
        ];

        let f = compute_job_financials(&j, &[], &Settings::default());
        assert_eq!(f.summary.external_material, dec("1023.00"));
        assert_eq!(f.summary.rental_vehicles, dec("180"));
        assert_eq!(f.direct_costs, dec("1203"));
    }

    #[test]
    fn only_approved_or_completed_expenses_count() {
        let mut tech = member(Employment::Internal, "0");
        let j = job(1, 2, vec![tech.id]);
        tech.expenses = vec![
            expense(j.id, "10", ApprovalStatus::Approved),
            expense(j.id, "20", ApprovalStatus::Completed),
            expense(j.id, "40", ApprovalStatus::Pending),
            expense(j.id, "80", ApprovalStatus::Rejected),
            expense(Uuid::new_v4(), "160", ApprovalStatus::Approved),
        ];

        let f = compute_job_financials(&j, &[tech], &Settings::default());
        assert_eq!(f.summary.approved_expenses, dec("30"));
        assert_eq!(f.direct_costs, dec("30"));
    }

    #[test]
    fn zone_fee_comes_from_the_table() {
        let mut settings = Settings::default();
        settings.zone_fees.insert("ztl".into(), dec("35"));
        let mut j = job(1, 1, vec![]);
        j.location = "Piazza del Duomo".into();

        j.fee_zone = Some("ztl".into());
        assert_eq!(compute_job_financials(&j, &[], &settings).direct_costs, dec("35"));

        j.fee_zone = Some("ZTL-north".into());
        assert_eq!(compute_job_financials(&j, &[], &settings).direct_costs, Decimal::ZERO);
    }

    #[test]
    fn missing_crew_is_skipped_and_duplicates_paid_once() {
        let freelancer = member(Employment::External, "100");
        let j = job(1, 1, vec![Uuid::new_v4(), freelancer.id, freelancer.id]);

        let f = compute_job_financials(&j, &[freelancer], &Settings::default());
        assert_eq!(f.lines.len(), 1);
        assert_eq!(f.direct_costs, dec("100"));
    }

    #[test]
    fn inverted_dates_cost_one_day() {
        let freelancer = member(Employment::External, "100");
        let j = job(5, 1, vec![freelancer.id]);

        let f = compute_job_financials(&j, &[freelancer], &Settings::default());
        assert_eq!(f.days, 1);
        assert_eq!(f.direct_costs, dec("100"));
    }

    #[test]
    fn margin_identity_holds() {
        let freelancer = member(Employment::External, "250");
        let mut j = job(1, 4, vec![freelancer.id]);
        j.revenue = dec("4000");

        let f = compute_job_financials(&j, &[freelancer], &Settings::default());
        assert_eq!(f.direct_costs, dec("1000"));
        assert_eq!(f.margin, dec("3000"));
        assert_eq!(f.margin_percent, dec("75"));
        assert_eq!(f.margin, f.revenue - f.direct_costs);
        assert_eq!(f.gross_revenue, dec("4880"));
    }

    #[test]
    fn zero_revenue_has_zero_margin_percent() {
        let freelancer = member(Employment::External, "250");
        let j = job(1, 1, vec![freelancer.id]);

        let f = compute_job_financials(&j, &[freelancer], &Settings::default());
        assert_eq!(f.margin, dec("-250"));
        assert_eq!(f.margin_percent, Decimal::ZERO);
    }

    #[test]
    fn huge_amounts_saturate_instead_of_overflowing() {
        let freelancer = member(Employment::External, "0");
        let mut j = job(1, 3, vec![freelancer.id]);
        j.materials.push(MaterialLine {
            item_id: None,
            name: "Absurd quote".into(),
            quantity: 4,
            unit_cost: Decimal::MAX / Decimal::TWO,
            source: MaterialSource::External,
        });
        j.vehicles.push(VehicleLine {
            name: "Gold van".into(),
            source: VehicleSource::Rented,
            cost: Decimal::MAX,
        });
        j.revenue = dec("0.0000000000000000000000000001");

        let f = compute_job_financials(&j, &[freelancer], &Settings::default());
        assert_eq!(f.summary.external_material, Decimal::MAX);
        assert_eq!(f.direct_costs, Decimal::MAX);
        assert_eq!(f.margin_percent, Decimal::MIN);
        assert!(f.margin.is_sign_negative());
    }
}
