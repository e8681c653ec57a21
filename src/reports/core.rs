//! Main shift book orchestrator that coordinates reports and derived data

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::reconcile::{round_money, total_cash_deposit};
use crate::reports::aggregate::{
    fold_daily_aggregates, fold_employee_totals, monthly_aggregate, MonthlyAggregate,
};
use crate::reports::report::{Editor, ReportManager};
use crate::traits::*;
use crate::types::*;

/// How many recent submissions the dashboard overview carries
pub const DASHBOARD_RECENT_LIMIT: usize = 5;

/// Main reconciliation system that orchestrates all shift operations
pub struct ShiftBook<S: ReportStorage> {
    report_manager: ReportManager<S>,
}

impl<S: ReportStorage> ShiftBook<S> {
    /// Create a new shift book with the given storage backend
    pub fn new(storage: S) -> Self {
        Self {
            report_manager: ReportManager::new(storage),
        }
    }

    /// Create a new shift book with a custom validator
    pub fn with_validator(storage: S, validator: Box<dyn ReportValidator>) -> Self {
        Self {
            report_manager: ReportManager::with_validator(storage, validator),
        }
    }

    // Report operations
    /// Record a report, upserting on its (date, shift, employee) slot
    pub async fn record_report(&mut self, report: ShiftReport) -> ReportResult<ShiftReport> {
        self.report_manager.record_report(report).await
    }

    /// Record a batch of reports in order
    pub async fn append_reports(
        &mut self,
        reports: Vec<ShiftReport>,
    ) -> ReportResult<Vec<ShiftReport>> {
        let mut stored = Vec::with_capacity(reports.len());
        for report in reports {
            stored.push(self.report_manager.record_report(report).await?);
        }
        Ok(stored)
    }

    /// Get a report by ID
    pub async fn get_report(&self, report_id: &str) -> ReportResult<Option<ShiftReport>> {
        self.report_manager.get_report(report_id).await
    }

    /// List reports within an inclusive date range
    pub async fn get_reports(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ReportResult<Vec<ShiftReport>> {
        self.report_manager.get_reports(start_date, end_date).await
    }

    /// List one employee's reports
    pub async fn get_employee_reports(
        &self,
        employee_name: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ReportResult<Vec<ShiftReport>> {
        self.report_manager
            .get_employee_reports(employee_name, start_date, end_date)
            .await
    }

    /// Submit a draft report
    pub async fn submit_report(&mut self, report_id: &str) -> ReportResult<ShiftReport> {
        self.report_manager.submit_report(report_id).await
    }

    /// Amend a stored report under the edit policy
    pub async fn amend_report(
        &mut self,
        updated: ShiftReport,
        editor: &Editor,
        reason: Option<String>,
    ) -> ReportResult<ShiftReport> {
        self.report_manager.amend_report(updated, editor, reason).await
    }

    /// Delete a report
    pub async fn delete_report(&mut self, report_id: &str) -> ReportResult<()> {
        self.report_manager.delete_report(report_id).await
    }

    // Derived collections
    /// Recompute both derived collections from the full report list and
    /// overwrite the stored copies
    pub async fn rebuild_derived(&mut self) -> ReportResult<DerivedCollections> {
        let reports = self.report_manager.storage.get_reports(None, None).await?;

        let daily_aggregates = fold_daily_aggregates(&reports);
        let employee_totals = fold_employee_totals(&reports);

        self.report_manager
            .storage
            .save_daily_aggregates(&daily_aggregates)
            .await?;
        self.report_manager
            .storage
            .save_employee_totals(&employee_totals)
            .await?;

        Ok(DerivedCollections {
            daily_aggregates,
            employee_totals,
        })
    }

    /// Get the stored aggregate for a date, zeroed when absent
    pub async fn daily_aggregate(&self, date: NaiveDate) -> ReportResult<DailyAggregate> {
        let aggregates = self.report_manager.storage.load_daily_aggregates().await?;
        Ok(aggregates
            .into_iter()
            .find(|aggregate| aggregate.date == date)
            .unwrap_or_else(|| DailyAggregate::empty(date)))
    }

    /// Roll the stored daily aggregates up into one calendar month
    pub async fn monthly_aggregate(&self, year: i32, month: u32) -> ReportResult<MonthlyAggregate> {
        let aggregates = self.report_manager.storage.load_daily_aggregates().await?;
        Ok(monthly_aggregate(&aggregates, year, month))
    }

    /// Get the stored totals for one employee
    pub async fn employee_total(
        &self,
        employee_name: &str,
    ) -> ReportResult<Option<EmployeeTotals>> {
        let totals = self.report_manager.storage.load_employee_totals().await?;
        Ok(totals
            .into_iter()
            .find(|entry| entry.employee_name == employee_name))
    }

    /// Get the stored employee totals, sorted by employee name
    pub async fn employee_totals(&self) -> ReportResult<Vec<EmployeeTotals>> {
        let mut totals = self.report_manager.storage.load_employee_totals().await?;
        totals.sort_by(|a, b| a.employee_name.cmp(&b.employee_name));
        Ok(totals)
    }

    // Dashboard operations
    /// The most recently submitted reports, newest first
    pub async fn recent_submissions(&self, limit: usize) -> ReportResult<Vec<ShiftReport>> {
        let mut reports: Vec<ShiftReport> = self
            .report_manager
            .storage
            .get_reports(None, None)
            .await?
            .into_iter()
            .filter(|report| report.is_submitted())
            .collect();

        reports.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        reports.truncate(limit);
        Ok(reports)
    }

    /// Which (employee, shift) slots have no submitted report for a date
    ///
    /// The roster is every employee name appearing anywhere in the
    /// report list, so a brand new store reports nothing missing.
    pub async fn find_missing_reports(&self, date: NaiveDate) -> ReportResult<Vec<MissingReport>> {
        let reports = self.report_manager.storage.get_reports(None, None).await?;

        let mut roster: Vec<&str> = Vec::new();
        for report in &reports {
            if !roster.contains(&report.employee_name.as_str()) {
                roster.push(&report.employee_name);
            }
        }

        let mut missing = Vec::new();
        for employee_name in roster {
            for shift_type in ShiftType::ALL {
                let covered = reports.iter().any(|report| {
                    report.is_submitted() && report.same_slot(date, shift_type, employee_name)
                });
                if !covered {
                    missing.push(MissingReport {
                        employee_name: employee_name.to_string(),
                        shift_type,
                    });
                }
            }
        }

        Ok(missing)
    }

    /// One-call overview backing the daily dashboard
    pub async fn dashboard_overview(&self, date: NaiveDate) -> ReportResult<DashboardOverview> {
        Ok(DashboardOverview {
            date,
            aggregate: self.daily_aggregate(date).await?,
            missing_reports: self.find_missing_reports(date).await?,
            recent_submissions: self.recent_submissions(DASHBOARD_RECENT_LIMIT).await?,
        })
    }

    /// Summarize the live report list
    pub async fn run_summary(&self) -> ReportResult<RunSummary> {
        let reports = self.report_manager.storage.get_reports(None, None).await?;
        let totals = fold_employee_totals(&reports);

        let submitted_count = reports.iter().filter(|report| report.is_submitted()).count();
        let first_date = reports.iter().map(|report| report.date).min();
        let last_date = reports.iter().map(|report| report.date).max();

        let total_shortage: BigDecimal =
            totals.iter().map(|entry| &entry.total_shortage).sum();
        let total_overage: BigDecimal = totals.iter().map(|entry| &entry.total_overage).sum();

        Ok(RunSummary {
            report_count: reports.len(),
            submitted_count,
            draft_count: reports.len() - submitted_count,
            first_date,
            last_date,
            employee_count: totals.len(),
            total_shortage: round_money(&total_shortage),
            total_overage: round_money(&total_overage),
        })
    }

    /// Check the stored derived collections and every stored derived
    /// figure against a fresh recomputation
    pub async fn audit_derived(&self) -> ReportResult<AuditReport> {
        let reports = self.report_manager.storage.get_reports(None, None).await?;
        let stored_daily = self.report_manager.storage.load_daily_aggregates().await?;
        let stored_totals = self.report_manager.storage.load_employee_totals().await?;

        let mut issues = Vec::new();

        let daily_aggregates_match = stored_daily == fold_daily_aggregates(&reports);
        if !daily_aggregates_match {
            issues.push("Stored daily aggregates do not match a fresh fold".to_string());
        }

        let employee_totals_match = stored_totals == fold_employee_totals(&reports);
        if !employee_totals_match {
            issues.push("Stored employee totals do not match a fresh fold".to_string());
        }

        for report in &reports {
            audit_report_figures(report, &mut issues);
        }

        Ok(AuditReport {
            is_valid: issues.is_empty(),
            report_count: reports.len(),
            daily_aggregates_match,
            employee_totals_match,
            issues,
        })
    }
}

/// Recheck one report's stored derived figures from its raw figures
fn audit_report_figures(report: &ShiftReport, issues: &mut Vec<String>) {
    if report.is_submitted() && report.submitted_at.is_none() {
        issues.push(format!(
            "Report '{}' is submitted but has no submission time",
            report.id
        ));
    }

    if let Some(pos) = &report.pos_shift_data {
        let sales = round_money(&(&pos.expected_deposit - &pos.am_start_till - &pos.lottery_till_added));
        if sales != pos.total_pos_sales {
            issues.push(format!(
                "Report '{}': stored POS sales {} differ from recomputed {}",
                report.id, pos.total_pos_sales, sales
            ));
        }
        if pos.transfer_bank_should_have != pos.expected_deposit {
            issues.push(format!(
                "Report '{}': transfer bank should-have {} is not the expected deposit {}",
                report.id, pos.transfer_bank_should_have, pos.expected_deposit
            ));
        }
        let over_short =
            round_money(&(&pos.transfer_bank_actually_have - &pos.transfer_bank_should_have));
        if over_short != pos.over_short {
            issues.push(format!(
                "Report '{}': stored POS over/short {} differs from recomputed {}",
                report.id, pos.over_short, over_short
            ));
        }
    }

    if let Some(lottery) = &report.lottery_shift_data {
        let misc: BigDecimal = [
            &lottery.misc_payout,
            &lottery.misc_payout_dayshift,
            &lottery.misc_payout_nightshift,
        ]
        .into_iter()
        .filter_map(|value| value.as_ref())
        .sum();
        let money_given = round_money(
            &(&lottery.online_validate + &lottery.free_tickets + &lottery.scratch_it_validate + misc),
        );
        if money_given != lottery.money_given_to_pos {
            issues.push(format!(
                "Report '{}': stored money-given-to-POS {} differs from recomputed {}",
                report.id, lottery.money_given_to_pos, money_given
            ));
        }

        if lottery.video_validate != lottery.video_cash_in {
            issues.push(format!(
                "Report '{}': video validate {} is not the video cash-in {}",
                report.id, lottery.video_validate, lottery.video_cash_in
            ));
        }

        let extra: BigDecimal = [
            &lottery.extra_money_added,
            &lottery.extra_money_added_dayshift,
            &lottery.extra_money_added_nightshift,
        ]
        .into_iter()
        .filter_map(|value| value.as_ref())
        .sum();
        let total_lottery = round_money(
            &(&lottery.am_start_till + &lottery.video_cash_in + &lottery.online_sales + extra
                - &lottery.money_given_to_pos),
        );
        if total_lottery != lottery.total_lottery {
            issues.push(format!(
                "Report '{}': stored lottery total {} differs from recomputed {}",
                report.id, lottery.total_lottery, total_lottery
            ));
        }

        let over_short = round_money(&(&lottery.total_lottery - &lottery.transfer_bank));
        if over_short != lottery.over_short {
            issues.push(format!(
                "Report '{}': stored lottery over/short {} differs from recomputed {}",
                report.id, lottery.over_short, over_short
            ));
        }
    }

    if let (Some(details), Some(deposits)) =
        (&report.transfer_bank_details, &report.transfer_bank_deposits)
    {
        let total = total_cash_deposit(deposits);
        if total != details.total_cash_deposit {
            issues.push(format!(
                "Report '{}': stored cash deposit total {} differs from the slip lines {}",
                report.id, details.total_cash_deposit, total
            ));
        }
    }
}

/// Both derived collections produced by one rebuild
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedCollections {
    pub daily_aggregates: Vec<DailyAggregate>,
    pub employee_totals: Vec<EmployeeTotals>,
}

/// One (employee, shift) slot with no submitted report for a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingReport {
    pub employee_name: String,
    pub shift_type: ShiftType,
}

/// One-call payload backing the daily dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub date: NaiveDate,
    pub aggregate: DailyAggregate,
    pub missing_reports: Vec<MissingReport>,
    pub recent_submissions: Vec<ShiftReport>,
}

/// Report on derived-data integrity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub is_valid: bool,
    pub report_count: usize,
    pub daily_aggregates_match: bool,
    pub employee_totals_match: bool,
    pub issues: Vec<String>,
}

/// Headline figures for a whole report store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub report_count: usize,
    pub submitted_count: usize,
    pub draft_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub employee_count: usize,
    pub total_shortage: BigDecimal,
    pub total_overage: BigDecimal,
}

impl RunSummary {
    /// Net position: overage minus shortage
    pub fn net(&self) -> BigDecimal {
        &self.total_overage - &self.total_shortage
    }

    /// Three-way classification of the net position
    pub fn standing(&self) -> CashStanding {
        let net = self.net();
        let zero = BigDecimal::from(0);
        if net < zero {
            CashStanding::Short
        } else if net > zero {
            CashStanding::Over
        } else {
            CashStanding::Even
        }
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== DATA SUMMARY ===")?;
        writeln!(
            f,
            "Reports: {} ({} submitted, {} draft)",
            self.report_count, self.submitted_count, self.draft_count
        )?;
        match (self.first_date, self.last_date) {
            (Some(first), Some(last)) => writeln!(f, "Dates: {} to {}", first, last)?,
            _ => writeln!(f, "Dates: none")?,
        }
        writeln!(f, "Employees: {}", self.employee_count)?;
        writeln!(f, "Total shortage: ${}", self.total_shortage)?;
        writeln!(f, "Total overage: ${}", self.total_overage)?;
        write!(f, "Net ${} ({})", self.net(), self.standing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::{LotteryShiftInput, PosShiftInput};
    use crate::reports::report::ShiftReportBuilder;
    use crate::utils::memory_storage::MemoryStorage;
    use std::str::FromStr;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::from_str(raw).unwrap()
    }

    fn money(raw: &str) -> BigDecimal {
        BigDecimal::from_str(raw).unwrap()
    }

    fn shift_report(id: &str, day: &str, shift_type: ShiftType, employee: &str) -> ShiftReport {
        ShiftReportBuilder::new(id.to_string(), date(day), shift_type, employee.to_string())
            .pos_shift(PosShiftInput {
                am_start_till: Some(500.0.into()),
                expected_deposit: Some(2000.0.into()),
                lottery_till_added: Some(100.0.into()),
                transfer_bank_actually_have: Some(1995.0.into()),
                comments: None,
            })
            .lottery_shift(LotteryShiftInput {
                am_start_till: Some(300.0.into()),
                video_cash_in: Some(800.0.into()),
                online_sales: Some(400.0.into()),
                online_validate: Some(150.0.into()),
                free_tickets: Some(20.0.into()),
                scratch_it_validate: Some(80.0.into()),
                transfer_bank: Some(1250.0.into()),
                ..Default::default()
            })
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_shift_book_basic_operations() {
        let storage = MemoryStorage::new();
        let mut book = ShiftBook::new(storage);

        book.record_report(shift_report("r1", "2025-05-07", ShiftType::Day, "John Smith"))
            .await
            .unwrap();
        book.record_report(shift_report("r2", "2025-05-07", ShiftType::Night, "Sarah Johnson"))
            .await
            .unwrap();

        book.submit_report("r1").await.unwrap();
        book.submit_report("r2").await.unwrap();

        let derived = book.rebuild_derived().await.unwrap();
        assert_eq!(derived.daily_aggregates.len(), 1);
        assert_eq!(derived.employee_totals.len(), 2);

        let aggregate = book.daily_aggregate(date("2025-05-07")).await.unwrap();
        assert_eq!(aggregate.total_video_cash_in, money("1600.00"));
        assert_eq!(aggregate.total_pos_deposit, money("4000.00"));
        assert_eq!(aggregate.total_lottery_deposit, money("2500.00"));

        // POS over/short is -5.00 per shift, lottery balances exactly
        let totals = book.employee_totals().await.unwrap();
        assert_eq!(totals[0].employee_name, "John Smith");
        assert_eq!(totals[0].total_shortage, money("5.00"));
        assert_eq!(totals[1].employee_name, "Sarah Johnson");

        let audit = book.audit_derived().await.unwrap();
        assert!(audit.is_valid, "unexpected issues: {:?}", audit.issues);
    }

    #[tokio::test]
    async fn test_daily_aggregate_defaults_to_zero() {
        let book = ShiftBook::new(MemoryStorage::new());
        let aggregate = book.daily_aggregate(date("2025-05-07")).await.unwrap();
        assert_eq!(aggregate.total_video_cash_in, money("0"));
        assert_eq!(aggregate.total_pos_deposit, money("0"));
    }

    #[tokio::test]
    async fn test_find_missing_reports() {
        let storage = MemoryStorage::new();
        let mut book = ShiftBook::new(storage);

        book.record_report(shift_report("r1", "2025-05-07", ShiftType::Day, "John Smith"))
            .await
            .unwrap();
        book.record_report(shift_report("r2", "2025-05-07", ShiftType::Night, "Sarah Johnson"))
            .await
            .unwrap();
        book.submit_report("r1").await.unwrap();

        let missing = book.find_missing_reports(date("2025-05-07")).await.unwrap();

        // John's night slot plus both of Sarah's: her night report is
        // still a draft
        assert_eq!(missing.len(), 3);
        assert!(missing.contains(&MissingReport {
            employee_name: "John Smith".to_string(),
            shift_type: ShiftType::Night,
        }));
        assert!(missing.contains(&MissingReport {
            employee_name: "Sarah Johnson".to_string(),
            shift_type: ShiftType::Night,
        }));
    }

    #[tokio::test]
    async fn test_run_summary_display() {
        let storage = MemoryStorage::new();
        let mut book = ShiftBook::new(storage);

        book.record_report(shift_report("r1", "2025-05-06", ShiftType::Day, "John Smith"))
            .await
            .unwrap();
        book.record_report(shift_report("r2", "2025-05-07", ShiftType::Day, "Sarah Johnson"))
            .await
            .unwrap();
        book.submit_report("r1").await.unwrap();

        let summary = book.run_summary().await.unwrap();
        assert_eq!(summary.report_count, 2);
        assert_eq!(summary.submitted_count, 1);
        assert_eq!(summary.draft_count, 1);
        assert_eq!(summary.first_date, Some(date("2025-05-06")));
        assert_eq!(summary.employee_count, 1);
        assert_eq!(summary.standing(), CashStanding::Short);

        let rendered = summary.to_string();
        assert!(rendered.starts_with("=== DATA SUMMARY ==="));
        assert!(rendered.contains("Reports: 2 (1 submitted, 1 draft)"));
        assert!(rendered.ends_with("Net $-5.00 (SHORT)"));
    }

    #[tokio::test]
    async fn test_audit_flags_tampered_figures() {
        let storage = MemoryStorage::new();
        let mut book = ShiftBook::new(storage);

        book.record_report(shift_report("r1", "2025-05-07", ShiftType::Day, "John Smith"))
            .await
            .unwrap();
        book.submit_report("r1").await.unwrap();
        book.rebuild_derived().await.unwrap();

        // Tamper with a stored derived figure behind the book's back
        let mut tampered = book.get_report("r1").await.unwrap().unwrap();
        if let Some(pos) = &mut tampered.pos_shift_data {
            pos.total_pos_sales = money("9999.00");
        }
        book.report_manager
            .storage
            .update_report(&tampered)
            .await
            .unwrap();

        let audit = book.audit_derived().await.unwrap();
        assert!(!audit.is_valid);
        assert!(!audit.daily_aggregates_match || !audit.employee_totals_match || !audit.issues.is_empty());
        assert!(audit
            .issues
            .iter()
            .any(|issue| issue.contains("POS sales")));
    }
}
