//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{NaiveDate, Utc};

use crate::types::*;

/// Storage abstraction for the reconciliation system
///
/// This trait allows the reconciliation core to work with any storage
/// backend (JSON files, in-memory, a database, etc.) by implementing
/// these methods. Implementations must return reports in insertion
/// order; the aggregation folds define their output order in terms
/// of it.
#[async_trait]
pub trait ReportStorage: Send + Sync {
    /// Save a shift report to storage
    async fn save_report(&mut self, report: &ShiftReport) -> ReportResult<()>;

    /// Get a shift report by ID
    async fn get_report(&self, report_id: &str) -> ReportResult<Option<ShiftReport>>;

    /// List all reports within an inclusive date range
    async fn get_reports(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ReportResult<Vec<ShiftReport>>;

    /// List one employee's reports, optionally bounded by inclusive dates
    async fn get_employee_reports(
        &self,
        employee_name: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ReportResult<Vec<ShiftReport>>;

    /// Update a shift report
    async fn update_report(&mut self, report: &ShiftReport) -> ReportResult<()>;

    /// Delete a shift report
    async fn delete_report(&mut self, report_id: &str) -> ReportResult<()>;

    /// Replace the entire report list in one step
    async fn replace_reports(&mut self, reports: &[ShiftReport]) -> ReportResult<()>;

    /// Overwrite the stored daily aggregates
    async fn save_daily_aggregates(&mut self, aggregates: &[DailyAggregate]) -> ReportResult<()>;

    /// Load the stored daily aggregates
    async fn load_daily_aggregates(&self) -> ReportResult<Vec<DailyAggregate>>;

    /// Overwrite the stored employee totals
    async fn save_employee_totals(&mut self, totals: &[EmployeeTotals]) -> ReportResult<()>;

    /// Load the stored employee totals
    async fn load_employee_totals(&self) -> ReportResult<Vec<EmployeeTotals>>;
}

/// Trait for implementing custom report validation rules
pub trait ReportValidator: Send + Sync {
    /// Validate a report before saving
    fn validate_report(&self, report: &ShiftReport) -> ReportResult<()>;

    /// Validate report deletion (e.g., check retention rules)
    fn validate_report_deletion(&self, report_id: &str) -> ReportResult<()>;
}

/// Default report validator with basic rules
///
/// Enforces the structural rules plus the slot conventions: no
/// future-dated reports, and lottery draws limited to the eight
/// scheduled slots with positive payouts.
pub struct DefaultReportValidator;

impl ReportValidator for DefaultReportValidator {
    fn validate_report(&self, report: &ShiftReport) -> ReportResult<()> {
        report.validate()?;

        let today = Utc::now().date_naive();
        if report.date > today {
            return Err(ReportError::Validation(format!(
                "Report date {} is in the future",
                report.date
            )));
        }

        if let Some(draws) = &report.lottery_draws {
            for draw in draws {
                if !(1..=8).contains(&draw.draw_number) {
                    return Err(ReportError::Validation(format!(
                        "Draw number {} is outside slots 1-8",
                        draw.draw_number
                    )));
                }
                if draw.draw_amount <= BigDecimal::from(0) {
                    return Err(ReportError::Validation(format!(
                        "Draw {} must have a positive payout",
                        draw.draw_number
                    )));
                }
            }
        }

        Ok(())
    }

    fn validate_report_deletion(&self, _report_id: &str) -> ReportResult<()> {
        // Basic implementation - a site with retention rules would check them here
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::PosShiftInput;
    use chrono::Duration;

    fn draft(date: NaiveDate) -> ShiftReport {
        let mut report = ShiftReport::new(
            "r1".to_string(),
            date,
            ShiftType::Day,
            "John Smith".to_string(),
        );
        report.pos_shift_data = Some(PosShiftInput::default().calculate());
        report
    }

    #[test]
    fn test_rejects_future_dated_report() {
        let tomorrow = Utc::now().date_naive() + Duration::days(1);
        let result = DefaultReportValidator.validate_report(&draft(tomorrow));
        assert!(matches!(result, Err(ReportError::Validation(_))));
    }

    #[test]
    fn test_rejects_out_of_range_draw() {
        let mut report = draft(Utc::now().date_naive());
        report.lottery_draws = Some(vec![LotteryDraw {
            draw_amount: BigDecimal::from(120),
            draw_number: 9,
        }]);
        assert!(DefaultReportValidator.validate_report(&report).is_err());

        report.lottery_draws = Some(vec![LotteryDraw {
            draw_amount: BigDecimal::from(120),
            draw_number: 3,
        }]);
        assert!(DefaultReportValidator.validate_report(&report).is_ok());
    }

    #[test]
    fn test_rejects_zero_payout_draw() {
        let mut report = draft(Utc::now().date_naive());
        report.lottery_draws = Some(vec![LotteryDraw {
            draw_amount: BigDecimal::from(0),
            draw_number: 1,
        }]);
        assert!(DefaultReportValidator.validate_report(&report).is_err());
    }
}
