//! Shift report lifecycle and management

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::reconcile::{
    round_money, LotteryShiftInput, PosShiftInput, RawAmount, TransferBankDepositInput,
    TransferBankDetailsInput,
};
use crate::traits::*;
use crate::types::*;

/// Minutes after submission during which the submitting employee may
/// still correct their own report
pub const GRACE_PERIOD_MINUTES: i64 = 10;

/// Identity attached to an edit or amendment request
#[derive(Debug, Clone)]
pub struct Editor {
    pub id: String,
    pub name: String,
    pub role: EditorRole,
}

impl Editor {
    pub fn new(id: &str, name: &str, role: EditorRole) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            role,
        }
    }
}

/// Whether an editor may modify the given report at `now`
///
/// Managers and admins may always edit. Employees may edit only their
/// own report, only on the day it covers, and once submitted only
/// within the grace window.
pub fn edit_permitted(report: &ShiftReport, editor: &Editor, now: DateTime<Utc>) -> bool {
    match editor.role {
        EditorRole::Manager | EditorRole::Admin => true,
        EditorRole::Employee => {
            if report.employee_name != editor.name {
                return false;
            }
            if report.date != now.date_naive() {
                return false;
            }
            match report.submitted_at {
                None => true,
                Some(submitted_at) => {
                    now.signed_duration_since(submitted_at)
                        <= Duration::minutes(GRACE_PERIOD_MINUTES)
                }
            }
        }
    }
}

/// Sequential report ID source for batch imports
///
/// Interactive flows use random UUIDs; imports thread one of these
/// through so a rerun produces the same IDs.
#[derive(Debug, Clone)]
pub struct IdSequence {
    prefix: String,
    next: u32,
}

impl IdSequence {
    /// Create a sequence starting at 1
    pub fn new(prefix: &str) -> Self {
        Self::starting_at(prefix, 1)
    }

    /// Create a sequence starting at an arbitrary counter
    pub fn starting_at(prefix: &str, next: u32) -> Self {
        Self {
            prefix: prefix.to_string(),
            next,
        }
    }

    /// Take the next ID, e.g. `report-0042`
    pub fn next_id(&mut self) -> String {
        let id = format!("{}-{:04}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Report manager for handling shift report operations
pub struct ReportManager<S: ReportStorage> {
    pub(crate) storage: S,
    validator: Box<dyn ReportValidator>,
}

impl<S: ReportStorage> ReportManager<S> {
    /// Create a new report manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultReportValidator),
        }
    }

    /// Create a new report manager with custom validator
    pub fn with_validator(storage: S, validator: Box<dyn ReportValidator>) -> Self {
        Self { storage, validator }
    }

    /// Record a report, upserting on its (date, shift, employee) slot
    ///
    /// A second recording against the same slot replaces the stored
    /// sections but keeps the original ID so external references stay
    /// valid. Once the slot is submitted it can only change through
    /// [`amend_report`](Self::amend_report).
    pub async fn record_report(&mut self, mut report: ShiftReport) -> ReportResult<ShiftReport> {
        self.validator.validate_report(&report)?;

        let existing = self
            .find_slot(report.date, report.shift_type, &report.employee_name)
            .await?;

        match existing {
            Some(previous) => {
                if previous.is_submitted() {
                    return Err(ReportError::Validation(format!(
                        "Report for {} {} shift by '{}' is already submitted",
                        previous.date,
                        shift_label(previous.shift_type),
                        previous.employee_name
                    )));
                }

                report.id = previous.id;
                report.edit_history = previous.edit_history;
                self.storage.update_report(&report).await?;
            }
            None => {
                if self.storage.get_report(&report.id).await?.is_some() {
                    return Err(ReportError::Validation(format!(
                        "Report with ID '{}' already exists",
                        report.id
                    )));
                }
                self.storage.save_report(&report).await?;
            }
        }

        Ok(report)
    }

    /// Get a report by ID
    pub async fn get_report(&self, report_id: &str) -> ReportResult<Option<ShiftReport>> {
        self.storage.get_report(report_id).await
    }

    /// Get a report by ID, returning an error if not found
    pub async fn get_report_required(&self, report_id: &str) -> ReportResult<ShiftReport> {
        self.storage
            .get_report(report_id)
            .await?
            .ok_or_else(|| ReportError::ReportNotFound(report_id.to_string()))
    }

    /// List reports within an inclusive date range
    pub async fn get_reports(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ReportResult<Vec<ShiftReport>> {
        self.storage.get_reports(start_date, end_date).await
    }

    /// List one employee's reports
    pub async fn get_employee_reports(
        &self,
        employee_name: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ReportResult<Vec<ShiftReport>> {
        self.storage
            .get_employee_reports(employee_name, start_date, end_date)
            .await
    }

    /// Submit a draft report, stamping the submission time
    pub async fn submit_report(&mut self, report_id: &str) -> ReportResult<ShiftReport> {
        let mut report = self.get_report_required(report_id).await?;

        if report.is_submitted() {
            return Err(ReportError::Validation(format!(
                "Report '{}' is already submitted",
                report_id
            )));
        }

        report.status = ReportStatus::Submitted;
        report.submitted_at = Some(Utc::now());

        self.validator.validate_report(&report)?;
        self.storage.update_report(&report).await?;

        Ok(report)
    }

    /// Amend a stored report with a full replacement
    ///
    /// The stored ID, status, submission time and prior edit history
    /// survive the amendment; when the report was already submitted an
    /// edit record naming the editor is appended.
    pub async fn amend_report(
        &mut self,
        updated: ShiftReport,
        editor: &Editor,
        reason: Option<String>,
    ) -> ReportResult<ShiftReport> {
        let previous = self.get_report_required(&updated.id).await?;

        let now = Utc::now();
        if !edit_permitted(&previous, editor, now) {
            return Err(ReportError::Validation(format!(
                "'{}' is not allowed to edit report '{}'",
                editor.name, previous.id
            )));
        }

        let mut report = updated;
        report.id = previous.id.clone();
        report.status = previous.status;
        report.submitted_at = previous.submitted_at;
        report.edit_history = previous.edit_history.clone();

        if previous.is_submitted() {
            report.edit_history.push(EditRecord {
                edited_at: now,
                edited_by: editor.id.clone(),
                edited_by_name: editor.name.clone(),
                edited_by_role: editor.role,
                reason,
            });
        }

        self.validator.validate_report(&report)?;
        self.storage.update_report(&report).await?;

        Ok(report)
    }

    /// Delete a report
    pub async fn delete_report(&mut self, report_id: &str) -> ReportResult<()> {
        self.validator.validate_report_deletion(report_id)?;

        if self.storage.get_report(report_id).await?.is_none() {
            return Err(ReportError::ReportNotFound(report_id.to_string()));
        }

        self.storage.delete_report(report_id).await
    }

    async fn find_slot(
        &self,
        date: NaiveDate,
        shift_type: ShiftType,
        employee_name: &str,
    ) -> ReportResult<Option<ShiftReport>> {
        let reports = self.storage.get_reports(Some(date), Some(date)).await?;
        Ok(reports
            .into_iter()
            .find(|report| report.same_slot(date, shift_type, employee_name)))
    }
}

fn shift_label(shift_type: ShiftType) -> &'static str {
    match shift_type {
        ShiftType::Day => "day",
        ShiftType::Night => "night",
    }
}

/// Shift report builder for assembling complete reports
#[derive(Debug)]
pub struct ShiftReportBuilder {
    report: ShiftReport,
    draws: Option<Vec<(u8, RawAmount)>>,
    deposits: Option<Vec<TransferBankDepositInput>>,
    transfer_details: Option<TransferBankDetailsInput>,
}

impl ShiftReportBuilder {
    /// Create a new report builder
    pub fn new(id: String, date: NaiveDate, shift_type: ShiftType, employee_name: String) -> Self {
        Self {
            report: ShiftReport::new(id, date, shift_type, employee_name),
            draws: None,
            deposits: None,
            transfer_details: None,
        }
    }

    /// Create a builder with a random UUID for interactive entry
    pub fn with_generated_id(
        date: NaiveDate,
        shift_type: ShiftType,
        employee_name: String,
    ) -> Self {
        Self::new(Uuid::new_v4().to_string(), date, shift_type, employee_name)
    }

    /// Attach the POS drawer section, deriving its figures
    pub fn pos_shift(mut self, input: PosShiftInput) -> Self {
        self.report.pos_shift_data = Some(input.calculate());
        self
    }

    /// Attach the lottery till section, deriving its figures
    pub fn lottery_shift(mut self, input: LotteryShiftInput) -> Self {
        self.report.lottery_shift_data = Some(input.calculate());
        self
    }

    /// Record one lottery draw payout; zero amounts are dropped at build
    pub fn lottery_draw(mut self, draw_number: u8, amount: impl Into<RawAmount>) -> Self {
        self.draws
            .get_or_insert_with(Vec::new)
            .push((draw_number, amount.into()));
        self
    }

    /// Record one denomination line of the deposit slip
    pub fn deposit_line(mut self, line: TransferBankDepositInput) -> Self {
        self.deposits.get_or_insert_with(Vec::new).push(line);
        self
    }

    /// Attach the bag-level deposit section; its total is derived from
    /// the deposit lines at build time
    pub fn transfer_details(mut self, input: TransferBankDetailsInput) -> Self {
        self.transfer_details = Some(input);
        self
    }

    /// Mark the report as submitted at the given instant
    pub fn submitted(mut self, submitted_at: DateTime<Utc>) -> Self {
        self.report.status = ReportStatus::Submitted;
        self.report.submitted_at = Some(submitted_at);
        self
    }

    /// Build the report
    ///
    /// Zero-amount draws and all-zero deposit lines are dropped; the
    /// bag total is derived from the surviving deposit lines.
    pub fn build(mut self) -> ReportResult<ShiftReport> {
        let zero = bigdecimal::BigDecimal::from(0);

        if let Some(draws) = self.draws {
            let draws: Vec<LotteryDraw> = draws
                .into_iter()
                .filter_map(|(draw_number, raw)| {
                    let draw_amount = round_money(&raw.to_money());
                    if draw_amount == zero {
                        None
                    } else {
                        Some(LotteryDraw {
                            draw_amount,
                            draw_number,
                        })
                    }
                })
                .collect();
            self.report.lottery_draws = Some(draws);
        }

        if let Some(deposits) = self.deposits {
            let resolved: Vec<TransferBankDeposit> = deposits
                .iter()
                .map(TransferBankDepositInput::resolve)
                .filter(|line| line.transfer_bank_amount != zero || line.deposit_amount != zero)
                .collect();
            if let Some(details) = &self.transfer_details {
                self.report.transfer_bank_details = Some(details.calculate(&resolved));
            }
            self.report.transfer_bank_deposits = Some(resolved);
        } else if let Some(details) = &self.transfer_details {
            self.report.transfer_bank_details = Some(details.calculate(&[]));
        }

        self.report.validate()?;
        Ok(self.report)
    }
}

/// Parameters for assembling a day shift report
pub struct DayShiftReportParams {
    pub id: String,
    pub date: NaiveDate,
    pub employee_name: String,
    pub pos: PosShiftInput,
    pub lottery: LotteryShiftInput,
    /// (draw slot, payout) pairs
    pub draws: Vec<(u8, RawAmount)>,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Parameters for assembling a night shift report
pub struct NightShiftReportParams {
    pub id: String,
    pub date: NaiveDate,
    pub employee_name: String,
    pub pos: PosShiftInput,
    pub lottery: LotteryShiftInput,
    pub transfer_details: TransferBankDetailsInput,
    pub deposits: Vec<TransferBankDepositInput>,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Common report patterns
pub mod patterns {
    use super::*;

    /// Assemble a day shift report with both tills and the draw sheet
    pub fn day_shift_report(params: DayShiftReportParams) -> ReportResult<ShiftReport> {
        let mut builder = ShiftReportBuilder::new(
            params.id,
            params.date,
            ShiftType::Day,
            params.employee_name,
        )
        .pos_shift(params.pos)
        .lottery_shift(params.lottery);

        for (draw_number, amount) in params.draws {
            builder = builder.lottery_draw(draw_number, amount);
        }
        if let Some(submitted_at) = params.submitted_at {
            builder = builder.submitted(submitted_at);
        }

        builder.build()
    }

    /// Assemble a night shift report with both tills and the deposit slip
    pub fn night_shift_report(params: NightShiftReportParams) -> ReportResult<ShiftReport> {
        let mut builder = ShiftReportBuilder::new(
            params.id,
            params.date,
            ShiftType::Night,
            params.employee_name,
        )
        .pos_shift(params.pos)
        .lottery_shift(params.lottery)
        .transfer_details(params.transfer_details);

        for line in params.deposits {
            builder = builder.deposit_line(line);
        }
        if let Some(submitted_at) = params.submitted_at {
            builder = builder.submitted(submitted_at);
        }

        builder.build()
    }
}
