//! Company-wide yearly rollup.
//!
//! Revenue and cost are bucketed by calendar month. Each cost is placed in
//! exactly one bucket and one category, and every total is summed from the
//! buckets, so the series, the totals, and the category breakdown always
//! agree. Sums saturate at the `Decimal` range.

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::costing::compute_job_financials;
use crate::model::{PaymentFrequency, Snapshot};

/// Costs grouped for a composition chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    /// Overhead: standalone company expenses and recurring payments.
    pub general: Decimal,
    pub personnel: Decimal,
    pub job_direct: Decimal,
}

impl CostBreakdown {
    pub fn total(&self) -> Decimal {
        sum([self.general, self.personnel, self.job_direct])
    }

    fn absorb(&mut self, other: &Self) {
        self.general = self.general.saturating_add(other.general);
        self.personnel = self.personnel.saturating_add(other.personnel);
        self.job_direct = self.job_direct.saturating_add(other.job_direct);
    }
}

/// One calendar month of the year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBucket {
    /// 1 = January.
    pub month: i8,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub breakdown: CostBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyReport {
    pub year: i16,

    /// Always twelve buckets, January first.
    pub months: Vec<MonthlyBucket>,

    pub total_revenue: Decimal,
    pub total_cost: Decimal,
    pub net_profit: Decimal,
    pub cost_breakdown: CostBreakdown,
}

fn sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

fn add(slot: &mut Decimal, amount: Decimal) {
    *slot = slot.saturating_add(amount);
}

fn month_index(day: Date) -> usize {
    usize::from(day.month().unsigned_abs()) - 1
}

/// Builds the revenue and cost picture for `year`.
///
/// - Confirmed and completed jobs land in the month they end, revenue and
///   direct cost together.
/// - Company expenses and personnel costs land in the month they are dated.
/// - Active monthly payments land in every month; active yearly payments
///   land once, in the month they next fall due, if that is in `year`.
pub fn build_yearly_report(year: i16, snapshot: &Snapshot, settings: &Settings) -> YearlyReport {
    let mut revenue = [Decimal::ZERO; 12];
    let mut costs: [CostBreakdown; 12] = Default::default();

    for job in &snapshot.jobs {
        let end = job.interval.end();
        if !job.is_billable() || end.year() != year {
            continue;
        }
        let financials = compute_job_financials(job, &snapshot.crew, settings);
        let m = month_index(end);
        add(&mut revenue[m], financials.revenue);
        add(&mut costs[m].job_direct, financials.direct_costs);
    }

    for expense in snapshot
        .company_expenses
        .iter()
        .filter(|e| e.date.year() == year)
    {
        add(&mut costs[month_index(expense.date)].general, expense.amount);
    }

    for cost in snapshot
        .personnel_costs
        .iter()
        .filter(|c| c.date.year() == year)
    {
        add(&mut costs[month_index(cost.date)].personnel, cost.amount);
    }

    for payment in snapshot.recurring_payments.iter().filter(|p| p.active) {
        match payment.frequency {
            PaymentFrequency::Monthly => {
                for bucket in &mut costs {
                    add(&mut bucket.general, payment.amount);
                }
            }
            PaymentFrequency::Yearly if payment.next_due.year() == year => {
                add(&mut costs[month_index(payment.next_due)].general, payment.amount);
            }
            PaymentFrequency::Yearly => {}
        }
    }

    let months: Vec<MonthlyBucket> = (1..=12)
        .zip(revenue)
        .zip(costs)
        .map(|((month, revenue), breakdown)| MonthlyBucket {
            month,
            revenue,
            cost: breakdown.total(),
            breakdown,
        })
        .collect();

    let mut cost_breakdown = CostBreakdown::default();
    for bucket in &months {
        cost_breakdown.absorb(&bucket.breakdown);
    }
    let total_revenue = sum(months.iter().map(|b| b.revenue));
    let total_cost = sum(months.iter().map(|b| b.cost));

    tracing::debug!(year, %total_revenue, %total_cost, "yearly report built");

    YearlyReport {
        year,
        months,
        total_revenue,
        total_cost,
        net_profit: total_revenue.saturating_sub(total_cost),
        cost_breakdown,
    }
}
