use bigdecimal::{BigDecimal, RoundingMode};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::{
    LotteryShiftData, PosShiftData, TransferBankDeposit, TransferBankDetails,
};

/// Round a monetary figure to cents, ties away from zero
pub fn round_money(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfUp)
}

/// A monetary field as it arrives from the outside world
///
/// Shift payloads come from hand-keyed sources, so an amount may be a
/// number, a numeric string, the literal `"even"` (meaning the drawer
/// balanced), or garbage. Coercion never fails; anything unusable
/// becomes zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    /// Coerce to an exact monetary value
    ///
    /// `"even"` (any casing, surrounding whitespace ignored) means a
    /// balanced drawer and maps to zero, as do non-finite numbers and
    /// strings that fail to parse.
    pub fn to_money(&self) -> BigDecimal {
        match self {
            RawAmount::Number(value) => {
                BigDecimal::try_from(*value).unwrap_or_else(|_| BigDecimal::from(0))
            }
            RawAmount::Text(raw) => {
                let trimmed = raw.trim();
                if trimmed.eq_ignore_ascii_case("even") {
                    return BigDecimal::from(0);
                }
                BigDecimal::from_str(trimmed).unwrap_or_else(|_| BigDecimal::from(0))
            }
        }
    }
}

impl From<f64> for RawAmount {
    fn from(value: f64) -> Self {
        RawAmount::Number(value)
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        RawAmount::Text(value.to_string())
    }
}

impl From<String> for RawAmount {
    fn from(value: String) -> Self {
        RawAmount::Text(value)
    }
}

/// Coerce an optional raw field, treating absence as zero
pub fn money_or_zero(raw: Option<&RawAmount>) -> BigDecimal {
    raw.map(RawAmount::to_money)
        .unwrap_or_else(|| BigDecimal::from(0))
}

fn rounded_or_zero(raw: Option<&RawAmount>) -> BigDecimal {
    round_money(&money_or_zero(raw))
}

fn or_zero(value: &Option<BigDecimal>) -> BigDecimal {
    value.clone().unwrap_or_else(|| BigDecimal::from(0))
}

/// Raw POS drawer figures for one shift
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PosShiftInput {
    pub am_start_till: Option<RawAmount>,
    pub expected_deposit: Option<RawAmount>,
    pub lottery_till_added: Option<RawAmount>,
    pub transfer_bank_actually_have: Option<RawAmount>,
    pub comments: Option<String>,
}

impl PosShiftInput {
    /// Derive the full drawer reconciliation from the raw figures
    ///
    /// Sales are what the drawer grew by beyond its opening balance and
    /// the lottery top-up; the transfer bank should receive exactly the
    /// expected deposit, and over/short is counted against that.
    pub fn calculate(&self) -> PosShiftData {
        let am_start_till = rounded_or_zero(self.am_start_till.as_ref());
        let expected_deposit = rounded_or_zero(self.expected_deposit.as_ref());
        let lottery_till_added = rounded_or_zero(self.lottery_till_added.as_ref());
        let transfer_bank_actually_have = rounded_or_zero(self.transfer_bank_actually_have.as_ref());

        let total_pos_sales =
            round_money(&(&expected_deposit - &am_start_till - &lottery_till_added));
        let transfer_bank_should_have = expected_deposit.clone();
        let over_short =
            round_money(&(&transfer_bank_actually_have - &transfer_bank_should_have));

        PosShiftData {
            am_start_till,
            expected_deposit,
            lottery_till_added,
            total_pos_sales,
            transfer_bank_should_have,
            transfer_bank_actually_have,
            over_short,
            comments: self.comments.clone(),
        }
    }
}

/// Raw lottery till figures for one shift
///
/// Day shifts fill the plain `extraMoneyAdded`/`miscPayout` fields;
/// night shifts fill the dayshift/nightshift split pair instead. The
/// derivation sums whichever are present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LotteryShiftInput {
    pub am_start_till: Option<RawAmount>,
    pub video_cash_in: Option<RawAmount>,
    pub online_sales: Option<RawAmount>,
    pub extra_money_added: Option<RawAmount>,
    pub extra_money_added_dayshift: Option<RawAmount>,
    pub extra_money_added_nightshift: Option<RawAmount>,
    pub online_validate: Option<RawAmount>,
    pub free_tickets: Option<RawAmount>,
    pub scratch_it_validate: Option<RawAmount>,
    pub misc_payout: Option<RawAmount>,
    pub misc_payout_dayshift: Option<RawAmount>,
    pub misc_payout_nightshift: Option<RawAmount>,
    pub transfer_bank: Option<RawAmount>,
    pub comments: Option<String>,
}

impl LotteryShiftInput {
    /// Derive the full lottery reconciliation from the raw figures
    pub fn calculate(&self) -> LotteryShiftData {
        let am_start_till = rounded_or_zero(self.am_start_till.as_ref());
        let video_cash_in = rounded_or_zero(self.video_cash_in.as_ref());
        let online_sales = rounded_or_zero(self.online_sales.as_ref());
        let online_validate = rounded_or_zero(self.online_validate.as_ref());
        let free_tickets = rounded_or_zero(self.free_tickets.as_ref());
        let scratch_it_validate = rounded_or_zero(self.scratch_it_validate.as_ref());
        let transfer_bank = rounded_or_zero(self.transfer_bank.as_ref());

        // Optional figures keep their absence so the stored record
        // mirrors which form the shift actually filed
        let extra_money_added = self
            .extra_money_added
            .as_ref()
            .map(|raw| round_money(&raw.to_money()));
        let extra_money_added_dayshift = self
            .extra_money_added_dayshift
            .as_ref()
            .map(|raw| round_money(&raw.to_money()));
        let extra_money_added_nightshift = self
            .extra_money_added_nightshift
            .as_ref()
            .map(|raw| round_money(&raw.to_money()));
        let misc_payout = self
            .misc_payout
            .as_ref()
            .map(|raw| round_money(&raw.to_money()));
        let misc_payout_dayshift = self
            .misc_payout_dayshift
            .as_ref()
            .map(|raw| round_money(&raw.to_money()));
        let misc_payout_nightshift = self
            .misc_payout_nightshift
            .as_ref()
            .map(|raw| round_money(&raw.to_money()));

        let money_given_to_pos = round_money(
            &(&online_validate
                + &free_tickets
                + &scratch_it_validate
                + or_zero(&misc_payout)
                + or_zero(&misc_payout_dayshift)
                + or_zero(&misc_payout_nightshift)),
        );

        let total_lottery = round_money(
            &(&am_start_till + &video_cash_in + &online_sales
                + or_zero(&extra_money_added)
                + or_zero(&extra_money_added_dayshift)
                + or_zero(&extra_money_added_nightshift)
                - &money_given_to_pos),
        );

        let video_validate = video_cash_in.clone();
        let over_short = round_money(&(&total_lottery - &transfer_bank));

        LotteryShiftData {
            am_start_till,
            video_cash_in,
            online_sales,
            extra_money_added,
            extra_money_added_dayshift,
            extra_money_added_nightshift,
            online_validate,
            free_tickets,
            scratch_it_validate,
            misc_payout,
            misc_payout_dayshift,
            misc_payout_nightshift,
            transfer_bank,
            money_given_to_pos,
            video_validate,
            total_lottery,
            over_short,
            comments: self.comments.clone(),
        }
    }
}

/// Raw figures for one denomination line of the deposit slip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferBankDepositInput {
    pub denomination_type: crate::types::DenominationType,
    #[serde(default)]
    pub transfer_bank_amount: Option<RawAmount>,
    #[serde(default)]
    pub deposit_amount: Option<RawAmount>,
}

impl TransferBankDepositInput {
    /// Coerce the line into exact stored figures
    pub fn resolve(&self) -> TransferBankDeposit {
        TransferBankDeposit {
            denomination_type: self.denomination_type,
            transfer_bank_amount: rounded_or_zero(self.transfer_bank_amount.as_ref()),
            deposit_amount: rounded_or_zero(self.deposit_amount.as_ref()),
        }
    }
}

/// Sum of the deposit amounts across every denomination line
pub fn total_cash_deposit(deposits: &[TransferBankDeposit]) -> BigDecimal {
    let total: BigDecimal = deposits.iter().map(|deposit| &deposit.deposit_amount).sum();
    round_money(&total)
}

/// Raw bag-level figures for the night deposit
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransferBankDetailsInput {
    pub transfer_bank_blue_bag: Option<RawAmount>,
    pub deposit_should_have: Option<RawAmount>,
    pub actually_have_black_bag: Option<RawAmount>,
}

impl TransferBankDetailsInput {
    /// Derive the bag reconciliation, totalling the denomination lines
    pub fn calculate(&self, deposits: &[TransferBankDeposit]) -> TransferBankDetails {
        TransferBankDetails {
            transfer_bank_blue_bag: rounded_or_zero(self.transfer_bank_blue_bag.as_ref()),
            deposit_should_have: rounded_or_zero(self.deposit_should_have.as_ref()),
            actually_have_black_bag: rounded_or_zero(self.actually_have_black_bag.as_ref()),
            total_cash_deposit: total_cash_deposit(deposits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DenominationType;

    fn money(raw: &str) -> BigDecimal {
        BigDecimal::from_str(raw).unwrap()
    }

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(&money("0.005")), money("0.01"));
        assert_eq!(round_money(&money("-0.005")), money("-0.01"));
        assert_eq!(round_money(&money("820.004")), money("820.00"));
        assert_eq!(round_money(&money("820.006")), money("820.01"));
        assert_eq!(round_money(&money("12")), money("12.00"));
    }

    #[test]
    fn test_raw_amount_coercion() {
        assert_eq!(RawAmount::from(42.5).to_money(), money("42.5"));
        assert_eq!(RawAmount::from("107.25").to_money(), money("107.25"));
        assert_eq!(RawAmount::from(" even ").to_money(), money("0"));
        assert_eq!(RawAmount::from("EVEN").to_money(), money("0"));
        assert_eq!(RawAmount::from("garbage").to_money(), money("0"));
        assert_eq!(RawAmount::from("").to_money(), money("0"));
        assert_eq!(RawAmount::Number(f64::NAN).to_money(), money("0"));
        assert_eq!(RawAmount::Number(f64::INFINITY).to_money(), money("0"));
    }

    #[test]
    fn test_pos_shift_arithmetic() {
        let input = PosShiftInput {
            am_start_till: Some(500.0.into()),
            expected_deposit: Some(2500.0.into()),
            lottery_till_added: Some(200.0.into()),
            transfer_bank_actually_have: Some(2480.0.into()),
            comments: None,
        };

        let data = input.calculate();
        assert_eq!(data.total_pos_sales, money("1800.00"));
        assert_eq!(data.transfer_bank_should_have, money("2500.00"));
        assert_eq!(data.over_short, money("-20.00"));
    }

    #[test]
    fn test_pos_shift_missing_fields_are_zero() {
        let data = PosShiftInput::default().calculate();
        assert_eq!(data.total_pos_sales, money("0.00"));
        assert_eq!(data.over_short, money("0.00"));
    }

    #[test]
    fn test_pos_shift_even_balances() {
        let input = PosShiftInput {
            am_start_till: Some(500.0.into()),
            expected_deposit: Some(2500.0.into()),
            lottery_till_added: Some("even".into()),
            transfer_bank_actually_have: Some(2500.0.into()),
            comments: None,
        };

        let data = input.calculate();
        assert_eq!(data.lottery_till_added, money("0.00"));
        assert_eq!(data.total_pos_sales, money("2000.00"));
        assert_eq!(data.over_short, money("0.00"));
    }

    #[test]
    fn test_day_lottery_shift() {
        let input = LotteryShiftInput {
            am_start_till: Some(300.0.into()),
            video_cash_in: Some(1200.0.into()),
            online_sales: Some(450.0.into()),
            extra_money_added: Some(100.0.into()),
            online_validate: Some(200.0.into()),
            free_tickets: Some(25.0.into()),
            scratch_it_validate: Some(75.0.into()),
            misc_payout: Some(50.0.into()),
            transfer_bank: Some(1700.0.into()),
            ..Default::default()
        };

        let data = input.calculate();
        assert_eq!(data.money_given_to_pos, money("350.00"));
        assert_eq!(data.video_validate, money("1200.00"));
        // 300 + 1200 + 450 + 100 - 350
        assert_eq!(data.total_lottery, money("1700.00"));
        assert_eq!(data.over_short, money("0.00"));
        assert!(data.extra_money_added_dayshift.is_none());
        assert!(data.misc_payout_nightshift.is_none());
    }

    #[test]
    fn test_night_lottery_shift_sums_split_fields() {
        let input = LotteryShiftInput {
            am_start_till: Some(300.0.into()),
            video_cash_in: Some(900.0.into()),
            online_sales: Some(600.0.into()),
            extra_money_added_dayshift: Some(40.0.into()),
            extra_money_added_nightshift: Some(60.0.into()),
            online_validate: Some(150.0.into()),
            free_tickets: Some(10.0.into()),
            scratch_it_validate: Some(90.0.into()),
            misc_payout_dayshift: Some(20.0.into()),
            misc_payout_nightshift: Some(30.0.into()),
            transfer_bank: Some(1610.0.into()),
            ..Default::default()
        };

        let data = input.calculate();
        assert_eq!(data.money_given_to_pos, money("300.00"));
        // 300 + 900 + 600 + 40 + 60 - 300
        assert_eq!(data.total_lottery, money("1600.00"));
        assert_eq!(data.over_short, money("-10.00"));
        assert_eq!(data.extra_money_added_dayshift, Some(money("40.00")));
        assert!(data.extra_money_added.is_none());
    }

    #[test]
    fn test_total_cash_deposit() {
        let deposits = vec![
            TransferBankDepositInput {
                denomination_type: DenominationType::Twenty,
                transfer_bank_amount: Some(400.0.into()),
                deposit_amount: Some(380.0.into()),
            }
            .resolve(),
            TransferBankDepositInput {
                denomination_type: DenominationType::Coin,
                transfer_bank_amount: Some(35.5.into()),
                deposit_amount: Some("32.75".into()),
            }
            .resolve(),
        ];

        assert_eq!(total_cash_deposit(&deposits), money("412.75"));

        let details = TransferBankDetailsInput {
            transfer_bank_blue_bag: Some(450.0.into()),
            deposit_should_have: Some(412.75.into()),
            actually_have_black_bag: Some(412.75.into()),
        }
        .calculate(&deposits);
        assert_eq!(details.total_cash_deposit, money("412.75"));
    }

    #[test]
    fn test_payload_deserialization_is_tolerant() {
        let payload = r#"{
            "amStartTill": 500,
            "expectedDeposit": "2500.00",
            "lotteryTillAdded": "even",
            "transferBankActuallyHave": "oops"
        }"#;

        let input: PosShiftInput = serde_json::from_str(payload).unwrap();
        let data = input.calculate();
        assert_eq!(data.expected_deposit, money("2500.00"));
        assert_eq!(data.lottery_till_added, money("0.00"));
        assert_eq!(data.transfer_bank_actually_have, money("0.00"));
        assert_eq!(data.over_short, money("-2500.00"));
    }
}
