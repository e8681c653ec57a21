//! Shift reconciliation calculation examples

use bigdecimal::BigDecimal;
use shiftbook_core::reconcile::{
    round_money, total_cash_deposit, LotteryShiftInput, PosShiftInput, RawAmount,
    TransferBankDepositInput, TransferBankDetailsInput,
};
use shiftbook_core::DenominationType;
use std::str::FromStr;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🏪 Shiftbook Core - Shift Calculation Examples\n");

    // 1. POS drawer reconciliation
    println!("📊 POS Drawer Reconciliation:");
    let pos = PosShiftInput {
        am_start_till: Some(500.0.into()),
        expected_deposit: Some(2500.0.into()),
        lottery_till_added: Some(200.0.into()),
        transfer_bank_actually_have: Some(2480.0.into()),
        comments: None,
    }
    .calculate();

    println!("  Opening till:     ${}", pos.am_start_till);
    println!("  Expected deposit: ${}", pos.expected_deposit);
    println!("  Lottery top-up:   ${}", pos.lottery_till_added);
    println!("  POS sales:        ${}", pos.total_pos_sales);
    println!("  Should have:      ${}", pos.transfer_bank_should_have);
    println!("  Actually have:    ${}", pos.transfer_bank_actually_have);
    println!("  Over/short:       ${}", pos.over_short);
    println!();

    // 2. Day shift lottery till
    println!("🎰 Lottery Till Reconciliation (day shift):");
    let day_lottery = LotteryShiftInput {
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
    }
    .calculate();

    println!("  Paid out to POS: ${}", day_lottery.money_given_to_pos);
    println!("  Video validate:  ${}", day_lottery.video_validate);
    println!("  Till total:      ${}", day_lottery.total_lottery);
    println!("  Transfer bank:   ${}", day_lottery.transfer_bank);
    println!("  Over/short:      ${} (balanced exactly)", day_lottery.over_short);
    println!();

    // 3. Night shift with split day/night figures
    println!("🌙 Lottery Till Reconciliation (night shift, split figures):");
    let night_lottery = LotteryShiftInput {
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
    }
    .calculate();

    println!("  Paid out to POS: ${}", night_lottery.money_given_to_pos);
    println!("  Till total:      ${}", night_lottery.total_lottery);
    println!("  Over/short:      ${}", night_lottery.over_short);
    println!();

    // 4. Hand-keyed amounts
    println!("⌨️  Hand-Keyed Amounts:");
    let samples: Vec<RawAmount> = vec![
        RawAmount::from(42.5),
        RawAmount::from("107.25"),
        RawAmount::from("even"),
        RawAmount::from("oops"),
    ];
    for raw in &samples {
        println!("  {:?} -> ${}", raw, raw.to_money());
    }

    // Payloads keyed straight off a paper sheet still reconcile
    let payload = r#"{
        "amStartTill": 500,
        "expectedDeposit": "2500.00",
        "lotteryTillAdded": "even",
        "transferBankActuallyHave": 2500
    }"#;
    let keyed: PosShiftInput = serde_json::from_str(payload)?;
    let data = keyed.calculate();
    println!("  Keyed drawer: sales ${}, over/short ${}", data.total_pos_sales, data.over_short);
    println!();

    // 5. Deposit slip by denomination
    println!("💵 Night Deposit Slip:");
    let lines = vec![
        TransferBankDepositInput {
            denomination_type: DenominationType::Hundred,
            transfer_bank_amount: Some(300.0.into()),
            deposit_amount: Some(300.0.into()),
        },
        TransferBankDepositInput {
            denomination_type: DenominationType::Twenty,
            transfer_bank_amount: Some(400.0.into()),
            deposit_amount: Some(380.0.into()),
        },
        TransferBankDepositInput {
            denomination_type: DenominationType::Five,
            transfer_bank_amount: Some(60.0.into()),
            deposit_amount: Some(55.0.into()),
        },
        TransferBankDepositInput {
            denomination_type: DenominationType::Coin,
            transfer_bank_amount: Some(35.5.into()),
            deposit_amount: Some("32.75".into()),
        },
    ];

    let deposits: Vec<_> = lines.iter().map(TransferBankDepositInput::resolve).collect();
    for deposit in &deposits {
        println!(
            "  {:?}: bank ${} / deposit ${}",
            deposit.denomination_type, deposit.transfer_bank_amount, deposit.deposit_amount
        );
    }
    println!("  Slip total: ${}", total_cash_deposit(&deposits));

    let details = TransferBankDetailsInput {
        transfer_bank_blue_bag: Some(450.0.into()),
        deposit_should_have: Some(767.75.into()),
        actually_have_black_bag: Some(767.75.into()),
    }
    .calculate(&deposits);
    println!("  Blue bag:    ${}", details.transfer_bank_blue_bag);
    println!("  Should have: ${}", details.deposit_should_have);
    println!("  Black bag:   ${}", details.actually_have_black_bag);
    println!();

    // 6. Cent rounding
    println!("🔁 Cent Rounding (ties away from zero):");
    for raw in ["10.005", "-10.005", "7.4449", "820.006"] {
        let value = BigDecimal::from_str(raw)?;
        println!("  {} -> {}", raw, round_money(&value));
    }

    println!("\n🎉 Shift calculation examples completed successfully!");
    Ok(())
}
