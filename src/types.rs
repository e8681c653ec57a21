//! Core types and data structures for the shift reconciliation system

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which half of the business day a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    /// Day shift - opens the tills and records lottery draws
    Day,
    /// Night shift - closes out both shifts and banks the cash
    Night,
}

impl ShiftType {
    /// Both shift slots in schedule order
    pub const ALL: [ShiftType; 2] = [ShiftType::Day, ShiftType::Night];
}

/// Lifecycle state of a shift report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Saved but not yet counted toward any aggregate
    Draft,
    /// Finalized; submission timestamp is set
    Submitted,
}

/// Currency unit bucket used to itemize a physical cash deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DenominationType {
    #[serde(rename = "coin")]
    Coin,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "20")]
    Twenty,
    #[serde(rename = "50")]
    Fifty,
    #[serde(rename = "100")]
    Hundred,
}

impl DenominationType {
    /// All denominations in slip order, smallest first
    pub const ALL: [DenominationType; 8] = [
        DenominationType::Coin,
        DenominationType::One,
        DenominationType::Two,
        DenominationType::Five,
        DenominationType::Ten,
        DenominationType::Twenty,
        DenominationType::Fifty,
        DenominationType::Hundred,
    ];
}

/// One shift report: the reconciled state of the POS drawer and lottery
/// till for a single (date, shift type) slot worked by one employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftReport {
    /// Unique identifier; sequential within a batch run, UUID otherwise
    pub id: String,
    /// Calendar date the shift was worked
    pub date: NaiveDate,
    /// Day or night slot
    pub shift_type: ShiftType,
    /// Free-text employee identity; matched as a raw string, no
    /// normalization ("John Smith" and "john smith" are distinct)
    pub employee_name: String,
    /// Lifecycle marker
    pub status: ReportStatus,
    /// When the report was submitted; absent on drafts
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub submitted_at: Option<DateTime<Utc>>,
    /// Audit trail of post-creation corrections
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edit_history: Vec<EditRecord>,
    /// Cash-drawer reconciliation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_shift_data: Option<PosShiftData>,
    /// Lottery-till reconciliation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lottery_shift_data: Option<LotteryShiftData>,
    /// Nonzero lottery draw payouts (day shift only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lottery_draws: Option<Vec<LotteryDraw>>,
    /// Per-denomination deposit records (night shift only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_bank_deposits: Option<Vec<TransferBankDeposit>>,
    /// Bag-level deposit reconciliation (night shift only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_bank_details: Option<TransferBankDetails>,
}

impl ShiftReport {
    /// Create an empty draft report for the given slot
    pub fn new(
        id: String,
        date: NaiveDate,
        shift_type: ShiftType,
        employee_name: String,
    ) -> Self {
        Self {
            id,
            date,
            shift_type,
            employee_name,
            status: ReportStatus::Draft,
            submitted_at: None,
            edit_history: Vec::new(),
            pos_shift_data: None,
            lottery_shift_data: None,
            lottery_draws: None,
            transfer_bank_deposits: None,
            transfer_bank_details: None,
        }
    }

    /// Whether this report has been submitted
    pub fn is_submitted(&self) -> bool {
        self.status == ReportStatus::Submitted
    }

    /// Whether this report covers the same (date, shift, employee) slot
    pub fn same_slot(&self, date: NaiveDate, shift_type: ShiftType, employee_name: &str) -> bool {
        self.date == date && self.shift_type == shift_type && self.employee_name == employee_name
    }

    /// Validate the structural rules every report must satisfy
    pub fn validate(&self) -> ReportResult<()> {
        if self.id.trim().is_empty() {
            return Err(ReportError::InvalidReport(
                "Report ID cannot be empty".to_string(),
            ));
        }

        if self.employee_name.trim().is_empty() {
            return Err(ReportError::InvalidReport(
                "Employee name cannot be empty".to_string(),
            ));
        }

        if self.pos_shift_data.is_none() && self.lottery_shift_data.is_none() {
            return Err(ReportError::InvalidReport(
                "Report must carry at least one reconciliation section".to_string(),
            ));
        }

        if self.status == ReportStatus::Submitted && self.submitted_at.is_none() {
            return Err(ReportError::InvalidReport(
                "Submitted report must carry a submission timestamp".to_string(),
            ));
        }

        Ok(())
    }
}

/// Cash-drawer reconciliation for one shift
///
/// The stored derived figures must preserve the drawer arithmetic:
/// `totalPosSales = expectedDeposit - amStartTill - lotteryTillAdded`,
/// `transferBankShouldHave = expectedDeposit`, and
/// `overShort = transferBankActuallyHave - transferBankShouldHave`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosShiftData {
    /// Opening drawer balance
    pub am_start_till: BigDecimal,
    /// Cash the drawer should hand to the bank at shift end
    pub expected_deposit: BigDecimal,
    /// Cash moved from the lottery till into the drawer
    pub lottery_till_added: BigDecimal,
    /// Derived: sales taken through the drawer this shift
    pub total_pos_sales: BigDecimal,
    /// Derived: what the transfer bank should receive
    pub transfer_bank_should_have: BigDecimal,
    /// Counted cash actually handed to the transfer bank
    pub transfer_bank_actually_have: BigDecimal,
    /// Derived: signed discrepancy; negative is a shortage
    pub over_short: BigDecimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// Lottery-till reconciliation for one shift
///
/// Day shifts report `extraMoneyAdded`/`miscPayout` as single figures;
/// night shifts split each into a dayshift and nightshift component
/// because the night close covers both shifts' contributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotteryShiftData {
    /// Opening lottery till balance
    pub am_start_till: BigDecimal,
    /// Cash collected from video lottery terminals
    pub video_cash_in: BigDecimal,
    /// Online ticket sales
    pub online_sales: BigDecimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_money_added: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_money_added_dayshift: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_money_added_nightshift: Option<BigDecimal>,
    /// Online ticket validations paid out
    pub online_validate: BigDecimal,
    /// Free ticket redemptions
    pub free_tickets: BigDecimal,
    /// Scratch-it validations paid out
    pub scratch_it_validate: BigDecimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub misc_payout: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub misc_payout_dayshift: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub misc_payout_nightshift: Option<BigDecimal>,
    /// Cash handed to the transfer bank from the lottery till
    pub transfer_bank: BigDecimal,
    /// Derived: validations and payouts covered by the POS drawer
    pub money_given_to_pos: BigDecimal,
    /// Derived: video validations (equals `videoCashIn`)
    pub video_validate: BigDecimal,
    /// Derived: till value after all movements
    pub total_lottery: BigDecimal,
    /// Derived: signed discrepancy; negative is a shortage
    pub over_short: BigDecimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// One scheduled lottery draw payout (day shift)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotteryDraw {
    pub draw_amount: BigDecimal,
    /// Draw slot, 1 through 8
    pub draw_number: u8,
}

/// One per-denomination line of the night deposit slip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferBankDeposit {
    pub denomination_type: DenominationType,
    pub transfer_bank_amount: BigDecimal,
    pub deposit_amount: BigDecimal,
}

/// Bag-level reconciliation of the night deposit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferBankDetails {
    /// Cash in the blue transfer bag
    pub transfer_bank_blue_bag: BigDecimal,
    /// What the deposit should contain
    pub deposit_should_have: BigDecimal,
    /// Counted contents of the black deposit bag
    pub actually_have_black_bag: BigDecimal,
    /// Derived: sum of all denomination deposit amounts
    pub total_cash_deposit: BigDecimal,
}

/// Role of the person asking to change a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorRole {
    /// May edit only their own same-day reports, within the grace window
    Employee,
    /// May amend any report at any time
    Manager,
    /// Same editing rights as a manager
    Admin,
}

/// One post-creation correction to a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRecord {
    #[serde(with = "timestamp")]
    pub edited_at: DateTime<Utc>,
    /// Identifier of the editor
    pub edited_by: String,
    pub edited_by_name: String,
    pub edited_by_role: EditorRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Per-date roll-up of both shifts' deposit figures
///
/// Keyed uniquely by date and always recomputed from the full report
/// set, never patched incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAggregate {
    pub date: NaiveDate,
    /// Sum of `videoCashIn` over every shift that date
    pub total_video_cash_in: BigDecimal,
    /// Sum of POS `expectedDeposit` over every shift that date
    pub total_pos_deposit: BigDecimal,
    /// Sum of lottery `transferBank` over every shift that date
    pub total_lottery_deposit: BigDecimal,
}

impl DailyAggregate {
    /// An aggregate with zeroed totals for a date with no reports
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_video_cash_in: BigDecimal::from(0),
            total_pos_deposit: BigDecimal::from(0),
            total_lottery_deposit: BigDecimal::from(0),
        }
    }
}

/// Running over/short accumulator for one employee-name string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeTotals {
    /// Assigned in first-seen order by the fold (`emp-0001`, ...)
    pub id: String,
    pub employee_name: String,
    /// Sum of magnitudes of every negative over/short figure
    pub total_shortage: BigDecimal,
    /// Sum of every positive over/short figure
    pub total_overage: BigDecimal,
    /// Latest submission timestamp seen for this employee
    #[serde(with = "timestamp")]
    pub last_updated: DateTime<Utc>,
}

impl EmployeeTotals {
    /// Create a zeroed accumulator for an employee
    pub fn new(id: String, employee_name: String, last_updated: DateTime<Utc>) -> Self {
        Self {
            id,
            employee_name,
            total_shortage: BigDecimal::from(0),
            total_overage: BigDecimal::from(0),
            last_updated,
        }
    }

    /// Fold one signed over/short figure into the accumulators
    ///
    /// Negative figures add their magnitude to the shortage total,
    /// positive figures add to the overage total, zero touches neither.
    pub fn apply_over_short(&mut self, over_short: &BigDecimal) {
        let zero = BigDecimal::from(0);
        if *over_short < zero {
            self.total_shortage += over_short.abs();
        } else if *over_short > zero {
            self.total_overage += over_short.clone();
        }
    }

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

/// Net cash standing of an employee across all shifts worked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CashStanding {
    Short,
    Over,
    Even,
}

impl std::fmt::Display for CashStanding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CashStanding::Short => write!(f, "SHORT"),
            CashStanding::Over => write!(f, "OVER"),
            CashStanding::Even => write!(f, "EVEN"),
        }
    }
}

/// Errors that can occur in the reconciliation system
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Invalid report: {0}")]
    InvalidReport(String),
    #[error("Report not found: {0}")]
    ReportNotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for reconciliation operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Serde support for the fixed-width `YYYY-MM-DDTHH:MM:SS.mmmZ` format
///
/// Millisecond precision with the UTC designator, zero-padded, so that
/// lexical string order and chronological order coincide and repeated
/// serialization of the same instant is byte-identical.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

    pub fn serialize<S>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Parse the canonical format, falling back to general RFC 3339
    /// for timestamps written by other tools
    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        NaiveDateTime::parse_from_str(raw, FORMAT)
            .map(|naive| naive.and_utc())
            .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|fixed| fixed.with_timezone(&Utc)))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(
            time: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match time {
                Some(time) => super::serialize(time, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                None => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 7).unwrap()
    }

    #[test]
    fn test_report_requires_a_section() {
        let report = ShiftReport::new(
            "r1".to_string(),
            sample_date(),
            ShiftType::Day,
            "John Smith".to_string(),
        );
        assert!(report.validate().is_err());
    }

    #[test]
    fn test_submitted_report_requires_timestamp() {
        let mut report = ShiftReport::new(
            "r1".to_string(),
            sample_date(),
            ShiftType::Day,
            "John Smith".to_string(),
        );
        report.pos_shift_data = Some(PosShiftData {
            am_start_till: BigDecimal::from(500),
            expected_deposit: BigDecimal::from(2500),
            lottery_till_added: BigDecimal::from(200),
            total_pos_sales: BigDecimal::from(1800),
            transfer_bank_should_have: BigDecimal::from(2500),
            transfer_bank_actually_have: BigDecimal::from(2500),
            over_short: BigDecimal::from(0),
            comments: None,
        });
        report.status = ReportStatus::Submitted;
        assert!(report.validate().is_err());

        report.submitted_at = Some(timestamp::parse("2025-05-07T14:30:00.000Z").unwrap());
        assert!(report.validate().is_ok());
    }

    #[test]
    fn test_employee_totals_accumulation() {
        let mut totals = EmployeeTotals::new(
            "emp-0001".to_string(),
            "John Smith".to_string(),
            timestamp::parse("2025-05-07T14:30:00.000Z").unwrap(),
        );

        totals.apply_over_short(&BigDecimal::from(-10));
        totals.apply_over_short(&BigDecimal::from(5));
        totals.apply_over_short(&BigDecimal::from(-3));
        totals.apply_over_short(&BigDecimal::from(0));

        assert_eq!(totals.total_shortage, BigDecimal::from(13));
        assert_eq!(totals.total_overage, BigDecimal::from(5));
        assert_eq!(totals.net(), BigDecimal::from(-8));
        assert_eq!(totals.standing(), CashStanding::Short);
    }

    #[test]
    fn test_standing_classification() {
        let even = EmployeeTotals::new(
            "emp-0001".to_string(),
            "Sarah Johnson".to_string(),
            timestamp::parse("2025-05-07T23:45:00.000Z").unwrap(),
        );
        assert_eq!(even.standing(), CashStanding::Even);
        assert_eq!(even.standing().to_string(), "EVEN");

        let mut over = even.clone();
        over.apply_over_short(&BigDecimal::from_str("0.01").unwrap());
        assert_eq!(over.standing(), CashStanding::Over);
    }

    #[test]
    fn test_timestamp_round_trip() {
        let parsed = timestamp::parse("2024-12-04T23:45:00.000Z").unwrap();
        assert_eq!(
            parsed.format(timestamp::FORMAT).to_string(),
            "2024-12-04T23:45:00.000Z"
        );

        // Other tools may write plain RFC 3339; still accepted
        assert!(timestamp::parse("2024-12-04T23:45:00Z").is_ok());
        assert!(timestamp::parse("not a time").is_err());
    }

    #[test]
    fn test_denomination_serde_names() {
        let json = serde_json::to_string(&DenominationType::Coin).unwrap();
        assert_eq!(json, "\"coin\"");
        let json = serde_json::to_string(&DenominationType::Twenty).unwrap();
        assert_eq!(json, "\"20\"");

        let parsed: DenominationType = serde_json::from_str("\"100\"").unwrap();
        assert_eq!(parsed, DenominationType::Hundred);

        for denomination in DenominationType::ALL {
            let json = serde_json::to_string(&denomination).unwrap();
            let parsed: DenominationType = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, denomination);
        }
    }
}
