//! Aggregation folds over the report list
//!
//! Derived collections are never patched in place. Each fold walks the
//! full report list and rebuilds its output from scratch, so running a
//! fold twice over the same input yields identical results.

use bigdecimal::BigDecimal;
use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::reconcile::round_money;
use crate::types::*;

/// Fold submitted reports into per-date deposit aggregates
///
/// Output order is the order in which dates first appear in the input.
/// Draft reports contribute nothing.
pub fn fold_daily_aggregates(reports: &[ShiftReport]) -> Vec<DailyAggregate> {
    let mut aggregates: Vec<DailyAggregate> = Vec::new();

    for report in reports {
        if !report.is_submitted() {
            continue;
        }

        let index = match aggregates
            .iter()
            .position(|aggregate| aggregate.date == report.date)
        {
            Some(index) => index,
            None => {
                aggregates.push(DailyAggregate::empty(report.date));
                aggregates.len() - 1
            }
        };
        let aggregate = &mut aggregates[index];

        if let Some(pos) = &report.pos_shift_data {
            aggregate.total_pos_deposit += &pos.expected_deposit;
        }
        if let Some(lottery) = &report.lottery_shift_data {
            aggregate.total_video_cash_in += &lottery.video_cash_in;
            aggregate.total_lottery_deposit += &lottery.transfer_bank;
        }
    }

    for aggregate in &mut aggregates {
        aggregate.total_video_cash_in = round_money(&aggregate.total_video_cash_in);
        aggregate.total_pos_deposit = round_money(&aggregate.total_pos_deposit);
        aggregate.total_lottery_deposit = round_money(&aggregate.total_lottery_deposit);
    }

    aggregates
}

/// Fold submitted reports into per-employee over/short totals
///
/// Employees appear in the order they are first encountered and IDs
/// are assigned from that order, so a rebuild over the same report
/// list reproduces the same IDs. Shortages accumulate magnitudes of
/// negative over/short figures, overages accumulate positive ones,
/// and a zero figure touches neither side.
pub fn fold_employee_totals(reports: &[ShiftReport]) -> Vec<EmployeeTotals> {
    let mut totals: Vec<EmployeeTotals> = Vec::new();

    for report in reports {
        if !report.is_submitted() {
            continue;
        }
        let submitted_at = match report.submitted_at {
            Some(submitted_at) => submitted_at,
            None => continue,
        };

        let index = match totals
            .iter()
            .position(|entry| entry.employee_name == report.employee_name)
        {
            Some(index) => index,
            None => {
                let id = format!("emp-{:04}", totals.len() + 1);
                totals.push(EmployeeTotals::new(
                    id,
                    report.employee_name.clone(),
                    submitted_at,
                ));
                totals.len() - 1
            }
        };
        let entry = &mut totals[index];

        if let Some(pos) = &report.pos_shift_data {
            entry.apply_over_short(&pos.over_short);
        }
        if let Some(lottery) = &report.lottery_shift_data {
            entry.apply_over_short(&lottery.over_short);
        }
        if submitted_at > entry.last_updated {
            entry.last_updated = submitted_at;
        }
    }

    for entry in &mut totals {
        entry.total_shortage = round_money(&entry.total_shortage);
        entry.total_overage = round_money(&entry.total_overage);
    }

    totals
}

/// Calendar-month roll-up of the daily aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAggregate {
    pub year: i32,
    pub month: u32,
    pub total_video_cash_in: BigDecimal,
    pub total_pos_deposit: BigDecimal,
    pub total_lottery_deposit: BigDecimal,
    /// Number of dates that contributed
    pub day_count: usize,
}

impl MonthlyAggregate {
    fn empty(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            total_video_cash_in: BigDecimal::from(0),
            total_pos_deposit: BigDecimal::from(0),
            total_lottery_deposit: BigDecimal::from(0),
            day_count: 0,
        }
    }
}

/// Sum the daily aggregates falling inside one calendar month
pub fn monthly_aggregate(
    aggregates: &[DailyAggregate],
    year: i32,
    month: u32,
) -> MonthlyAggregate {
    let mut totals = MonthlyAggregate::empty(year, month);

    for aggregate in aggregates {
        if aggregate.date.year() == year && aggregate.date.month() == month {
            totals.total_video_cash_in += &aggregate.total_video_cash_in;
            totals.total_pos_deposit += &aggregate.total_pos_deposit;
            totals.total_lottery_deposit += &aggregate.total_lottery_deposit;
            totals.day_count += 1;
        }
    }

    totals.total_video_cash_in = round_money(&totals.total_video_cash_in);
    totals.total_pos_deposit = round_money(&totals.total_pos_deposit);
    totals.total_lottery_deposit = round_money(&totals.total_lottery_deposit);

    totals
}
