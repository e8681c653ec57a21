//! Validation utilities

use crate::reconcile::total_cash_deposit;
use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;
use std::collections::HashSet;

/// Validate that a report ID is valid
pub fn validate_report_id(report_id: &str) -> ReportResult<()> {
    if report_id.trim().is_empty() {
        return Err(ReportError::Validation(
            "Report ID cannot be empty".to_string(),
        ));
    }

    if report_id.len() > 50 {
        return Err(ReportError::Validation(
            "Report ID cannot exceed 50 characters".to_string(),
        ));
    }

    // Check for valid characters (alphanumeric, dashes, underscores)
    if !report_id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ReportError::Validation(
            "Report ID can only contain alphanumeric characters, dashes, and underscores"
                .to_string(),
        ));
    }

    Ok(())
}

/// Validate that an employee name is valid
pub fn validate_employee_name(name: &str) -> ReportResult<()> {
    if name.trim().is_empty() {
        return Err(ReportError::Validation(
            "Employee name cannot be empty".to_string(),
        ));
    }

    if name.len() > 100 {
        return Err(ReportError::Validation(
            "Employee name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a comment field is valid
pub fn validate_comment(comment: &str) -> ReportResult<()> {
    if comment.len() > 500 {
        return Err(ReportError::Validation(
            "Comment cannot exceed 500 characters".to_string(),
        ));
    }

    Ok(())
}

/// Enhanced report validator with detailed checks
///
/// On top of the default rules this enforces the site conventions:
/// the draw sheet belongs to day shifts, the deposit slip to night
/// shifts, and no slot or denomination may be listed twice.
pub struct EnhancedReportValidator;

impl ReportValidator for EnhancedReportValidator {
    fn validate_report(&self, report: &ShiftReport) -> ReportResult<()> {
        // Basic validation
        DefaultReportValidator.validate_report(report)?;

        // Enhanced validations
        validate_report_id(&report.id)?;
        validate_employee_name(&report.employee_name)?;

        if let Some(pos) = &report.pos_shift_data {
            if let Some(comments) = &pos.comments {
                validate_comment(comments)?;
            }
        }
        if let Some(lottery) = &report.lottery_shift_data {
            if let Some(comments) = &lottery.comments {
                validate_comment(comments)?;
            }
        }

        // Sheet placement follows the shift
        if report.shift_type == ShiftType::Night
            && report.lottery_draws.as_ref().is_some_and(|draws| !draws.is_empty())
        {
            return Err(ReportError::Validation(
                "Night shift reports do not carry the lottery draw sheet".to_string(),
            ));
        }
        if report.shift_type == ShiftType::Day
            && (report.transfer_bank_deposits.is_some() || report.transfer_bank_details.is_some())
        {
            return Err(ReportError::Validation(
                "Day shift reports do not carry the deposit slip".to_string(),
            ));
        }

        // Check for duplicate draw slots
        if let Some(draws) = &report.lottery_draws {
            let mut slots = HashSet::new();
            for draw in draws {
                if !slots.insert(draw.draw_number) {
                    return Err(ReportError::Validation(format!(
                        "Draw slot {} appears multiple times in report",
                        draw.draw_number
                    )));
                }
            }
        }

        // Check for duplicate denomination lines and negative amounts
        if let Some(deposits) = &report.transfer_bank_deposits {
            let zero = BigDecimal::from(0);
            let mut denominations = HashSet::new();
            for deposit in deposits {
                if !denominations.insert(deposit.denomination_type) {
                    return Err(ReportError::Validation(format!(
                        "Denomination {:?} appears multiple times on the deposit slip",
                        deposit.denomination_type
                    )));
                }
                if deposit.transfer_bank_amount < zero || deposit.deposit_amount < zero {
                    return Err(ReportError::Validation(format!(
                        "Denomination {:?} has a negative amount on the deposit slip",
                        deposit.denomination_type
                    )));
                }
            }
        }

        // The bag total must match the slip lines
        if let (Some(details), Some(deposits)) =
            (&report.transfer_bank_details, &report.transfer_bank_deposits)
        {
            let total = total_cash_deposit(deposits);
            if details.total_cash_deposit != total {
                return Err(ReportError::Validation(format!(
                    "Deposit slip total {} does not match its lines ({})",
                    details.total_cash_deposit, total
                )));
            }
        }

        Ok(())
    }

    fn validate_report_deletion(&self, report_id: &str) -> ReportResult<()> {
        validate_report_id(report_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::{PosShiftInput, TransferBankDepositInput, TransferBankDetailsInput};
    use crate::reports::ShiftReportBuilder;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn sample_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 7).unwrap()
    }

    fn base_builder(shift_type: ShiftType) -> ShiftReportBuilder {
        ShiftReportBuilder::new(
            "r1".to_string(),
            sample_date(),
            shift_type,
            "John Smith".to_string(),
        )
        .pos_shift(PosShiftInput::default())
    }

    #[test]
    fn test_report_id_rules() {
        assert!(validate_report_id("report-0001").is_ok());
        assert!(validate_report_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_report_id("").is_err());
        assert!(validate_report_id("bad id with spaces").is_err());
        assert!(validate_report_id(&"x".repeat(51)).is_err());
    }

    #[test]
    fn test_draw_sheet_rejected_on_night_shift() {
        let report = base_builder(ShiftType::Night)
            .lottery_draw(1, 120.0)
            .build()
            .unwrap();
        assert!(EnhancedReportValidator.validate_report(&report).is_err());
        assert!(DefaultReportValidator.validate_report(&report).is_ok());
    }

    #[test]
    fn test_deposit_slip_rejected_on_day_shift() {
        let report = base_builder(ShiftType::Day)
            .transfer_details(TransferBankDetailsInput::default())
            .build()
            .unwrap();
        assert!(EnhancedReportValidator.validate_report(&report).is_err());
    }

    #[test]
    fn test_duplicate_draw_slot_rejected() {
        let report = base_builder(ShiftType::Day)
            .lottery_draw(2, 50.0)
            .lottery_draw(2, 75.0)
            .build()
            .unwrap();
        let result = EnhancedReportValidator.validate_report(&report);
        assert!(matches!(result, Err(ReportError::Validation(_))));
    }

    #[test]
    fn test_duplicate_denomination_rejected() {
        let line = TransferBankDepositInput {
            denomination_type: DenominationType::Twenty,
            transfer_bank_amount: Some(100.0.into()),
            deposit_amount: Some(100.0.into()),
        };
        let report = base_builder(ShiftType::Night)
            .deposit_line(line.clone())
            .deposit_line(line)
            .transfer_details(TransferBankDetailsInput::default())
            .build()
            .unwrap();
        assert!(EnhancedReportValidator.validate_report(&report).is_err());
    }

    #[test]
    fn test_negative_deposit_amount_rejected() {
        let report = base_builder(ShiftType::Night)
            .deposit_line(TransferBankDepositInput {
                denomination_type: DenominationType::Ten,
                transfer_bank_amount: Some(100.0.into()),
                deposit_amount: Some((-20.0).into()),
            })
            .transfer_details(TransferBankDetailsInput::default())
            .build()
            .unwrap();
        let result = EnhancedReportValidator.validate_report(&report);
        assert!(matches!(result, Err(ReportError::Validation(_))));
    }

    #[test]
    fn test_tampered_bag_total_rejected() {
        let mut report = base_builder(ShiftType::Night)
            .deposit_line(TransferBankDepositInput {
                denomination_type: DenominationType::Twenty,
                transfer_bank_amount: Some(400.0.into()),
                deposit_amount: Some(380.0.into()),
            })
            .transfer_details(TransferBankDetailsInput::default())
            .build()
            .unwrap();

        if let Some(details) = &mut report.transfer_bank_details {
            details.total_cash_deposit = BigDecimal::from(999);
        }
        assert!(EnhancedReportValidator.validate_report(&report).is_err());
    }

    #[test]
    fn test_well_formed_night_report_passes() {
        let report = base_builder(ShiftType::Night)
            .deposit_line(TransferBankDepositInput {
                denomination_type: DenominationType::Twenty,
                transfer_bank_amount: Some(400.0.into()),
                deposit_amount: Some(380.0.into()),
            })
            .deposit_line(TransferBankDepositInput {
                denomination_type: DenominationType::Coin,
                transfer_bank_amount: Some(30.0.into()),
                deposit_amount: Some(30.0.into()),
            })
            .transfer_details(TransferBankDetailsInput {
                transfer_bank_blue_bag: Some(430.0.into()),
                deposit_should_have: Some(410.0.into()),
                actually_have_black_bag: Some(410.0.into()),
            })
            .build()
            .unwrap();

        assert!(EnhancedReportValidator.validate_report(&report).is_ok());
        assert_eq!(
            report.transfer_bank_details.as_ref().unwrap().total_cash_deposit,
            BigDecimal::from(410)
        );
    }
}
