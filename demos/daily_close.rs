//! Daily close workflow example

use chrono::NaiveDate;
use shiftbook_core::reconcile::{
    LotteryShiftInput, PosShiftInput, TransferBankDepositInput, TransferBankDetailsInput,
};
use shiftbook_core::utils::MemoryStorage;
use shiftbook_core::{DenominationType, ShiftBook, ShiftReportBuilder, ShiftType};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🏪 Shiftbook Core - Daily Close Example\n");

    // Create a new shift book with in-memory storage
    let storage = MemoryStorage::new();
    let mut book = ShiftBook::new(storage);

    let business_date = NaiveDate::from_ymd_opt(2025, 5, 7).unwrap();

    // 1. Record the day shift
    println!("📋 Recording Day Shift (John Smith)...");
    let day_report = ShiftReportBuilder::new(
        "shift-001".to_string(),
        business_date,
        ShiftType::Day,
        "John Smith".to_string(),
    )
    .pos_shift(PosShiftInput {
        am_start_till: Some(500.0.into()),
        expected_deposit: Some(2500.0.into()),
        lottery_till_added: Some(200.0.into()),
        transfer_bank_actually_have: Some(2480.0.into()),
        comments: Some("Register 2 drawer stuck".to_string()),
    })
    .lottery_shift(LotteryShiftInput {
        am_start_till: Some(300.0.into()),
        video_cash_in: Some(1200.0.into()),
        online_sales: Some(450.0.into()),
        extra_money_added: Some(100.0.into()),
        online_validate: Some(200.0.into()),
        free_tickets: Some(25.0.into()),
        scratch_it_validate: Some(75.0.into()),
        misc_payout: Some(50.0.into()),
        transfer_bank: Some(1705.0.into()),
        ..Default::default()
    })
    .lottery_draw(1, 150.0)
    .lottery_draw(3, "89.50")
    .build()?;

    if let Some(pos) = &day_report.pos_shift_data {
        println!("  POS sales:     ${}", pos.total_pos_sales);
        println!("  Should have:   ${}", pos.transfer_bank_should_have);
        println!("  Actually have: ${}", pos.transfer_bank_actually_have);
        println!("  Over/short:    ${}", pos.over_short);
    }
    if let Some(lottery) = &day_report.lottery_shift_data {
        println!("  Lottery paid out to POS: ${}", lottery.money_given_to_pos);
        println!("  Lottery till total:      ${}", lottery.total_lottery);
        println!("  Lottery over/short:      ${}", lottery.over_short);
    }

    book.record_report(day_report).await?;
    book.submit_report("shift-001").await?;
    println!("  ✓ Recorded and submitted\n");

    // 2. Record the night shift with its deposit slip
    println!("🌙 Recording Night Shift (Sarah Johnson)...");
    let night_report = ShiftReportBuilder::new(
        "shift-002".to_string(),
        business_date,
        ShiftType::Night,
        "Sarah Johnson".to_string(),
    )
    .pos_shift(PosShiftInput {
        am_start_till: Some(500.0.into()),
        expected_deposit: Some(3000.0.into()),
        lottery_till_added: Some(150.0.into()),
        transfer_bank_actually_have: Some(3010.0.into()),
        comments: None,
    })
    .lottery_shift(LotteryShiftInput {
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
        transfer_bank: Some(1595.0.into()),
        ..Default::default()
    })
    .deposit_line(TransferBankDepositInput {
        denomination_type: DenominationType::Twenty,
        transfer_bank_amount: Some(400.0.into()),
        deposit_amount: Some(380.0.into()),
    })
    .deposit_line(TransferBankDepositInput {
        denomination_type: DenominationType::Fifty,
        transfer_bank_amount: Some(200.0.into()),
        deposit_amount: Some(200.0.into()),
    })
    .deposit_line(TransferBankDepositInput {
        denomination_type: DenominationType::Coin,
        transfer_bank_amount: Some(35.5.into()),
        deposit_amount: Some("32.75".into()),
    })
    .transfer_details(TransferBankDetailsInput {
        transfer_bank_blue_bag: Some(450.0.into()),
        deposit_should_have: Some(612.75.into()),
        actually_have_black_bag: Some(612.75.into()),
    })
    .build()?;

    if let Some(details) = &night_report.transfer_bank_details {
        println!("  Deposit slip total: ${}", details.total_cash_deposit);
    }

    book.record_report(night_report).await?;
    book.submit_report("shift-002").await?;
    println!("  ✓ Recorded and submitted\n");

    // 3. Rebuild the derived collections
    println!("🔄 Rebuilding Derived Collections...");
    let derived = book.rebuild_derived().await?;
    println!(
        "  ✓ {} daily aggregate(s), {} employee total(s)\n",
        derived.daily_aggregates.len(),
        derived.employee_totals.len()
    );

    // 4. Daily aggregate for the business date
    let aggregate = book.daily_aggregate(business_date).await?;
    println!("📊 Daily Aggregate for {}:", business_date);
    println!("  Video cash in:   ${}", aggregate.total_video_cash_in);
    println!("  POS deposit:     ${}", aggregate.total_pos_deposit);
    println!("  Lottery deposit: ${}", aggregate.total_lottery_deposit);
    println!();

    // 5. Per-employee over/short standings
    println!("👤 Employee Standings:");
    for totals in book.employee_totals().await? {
        println!(
            "  {} ({}): shortage ${}, overage ${}, net ${} ({})",
            totals.employee_name,
            totals.id,
            totals.total_shortage,
            totals.total_overage,
            totals.net(),
            totals.standing()
        );
    }
    println!();

    // 6. Dashboard overview
    println!("🗓️  Dashboard for {}:", business_date);
    let overview = book.dashboard_overview(business_date).await?;
    if overview.missing_reports.is_empty() {
        println!("  All shift reports are in");
    } else {
        println!("  Missing reports:");
        for missing in &overview.missing_reports {
            println!("    - {} ({:?} shift)", missing.employee_name, missing.shift_type);
        }
    }
    println!("  Recent submissions:");
    for report in &overview.recent_submissions {
        println!("    - {} by {}", report.id, report.employee_name);
    }
    println!();

    // 7. Store-wide summary
    let summary = book.run_summary().await?;
    println!("{}\n", summary);

    // 8. Validate the derived data
    println!("🔍 Validating Derived Data...");
    let audit = book.audit_derived().await?;
    if audit.is_valid {
        println!("  ✅ Audit passed for {} report(s)!", audit.report_count);
    } else {
        println!("  ❌ Audit found issues:");
        for issue in &audit.issues {
            println!("    - {}", issue);
        }
    }

    println!("\n🎉 Example completed successfully!");
    Ok(())
}
