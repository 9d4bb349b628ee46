use chrono::NaiveDate;
use scolara_db::models::FeeStatus;
use serde::Serialize;

use crate::dao::base::DaoResult;
use crate::dao::fee::FeeDao;
use crate::reporting::aggregate::{date_of, group_by_category, rate, round2};
use crate::reporting::filter::ReportFilter;

use super::generated_at;

#[derive(Debug, Serialize)]
pub struct FeeReport {
    pub title: String,
    pub generated_at: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_collected: f64,
    pub total_pending: f64,
    pub total_overdue: f64,
    /// collected / (collected + pending + overdue), 0 on an empty window.
    pub collection_rate: f64,
    pub counts: FeeCounts,
    pub by_date: Vec<CollectionEntry>,
}

#[derive(Debug, Serialize, Default)]
pub struct FeeCounts {
    pub paid: u64,
    pub pending: u64,
    pub overdue: u64,
}

#[derive(Debug, Serialize)]
pub struct CollectionEntry {
    pub date: NaiveDate,
    pub amount: f64,
    pub payments: u64,
}

/// Fee collection summary over payments due inside the filter window.
pub async fn fee_report(filter: &ReportFilter, fees: &FeeDao) -> DaoResult<FeeReport> {
    let payments = fees
        .find_in_window(filter.window.start, filter.window.end_exclusive())
        .await?;

    let mut total_collected = 0.0;
    let mut total_pending = 0.0;
    let mut total_overdue = 0.0;
    let mut counts = FeeCounts::default();
    for payment in &payments {
        match payment.status {
            FeeStatus::Paid => {
                total_collected += payment.amount;
                counts.paid += 1;
            }
            FeeStatus::Pending => {
                total_pending += payment.amount;
                counts.pending += 1;
            }
            FeeStatus::Overdue => {
                total_overdue += payment.amount;
                counts.overdue += 1;
            }
        }
    }

    // Collected amounts bucketed by payment day.
    let paid: Vec<(NaiveDate, f64)> = payments
        .iter()
        .filter(|p| p.status == FeeStatus::Paid)
        .filter_map(|p| p.paid_at.map(|at| (date_of(at), p.amount)))
        .collect();
    let by_date = group_by_category(&paid, |p| p.0, |p| p.1)
        .into_iter()
        .map(|(date, acc)| CollectionEntry {
            date,
            amount: round2(acc.sum),
            payments: acc.count,
        })
        .collect();

    Ok(FeeReport {
        title: "Fee Collection Report".to_string(),
        generated_at: generated_at(),
        start_date: filter.window.start,
        end_date: filter.window.end,
        total_collected: round2(total_collected),
        total_pending: round2(total_pending),
        total_overdue: round2(total_overdue),
        collection_rate: rate(
            total_collected,
            total_collected + total_pending + total_overdue,
        ),
        counts,
        by_date,
    })
}
