use anyhow::Context;
use chrono::{Local, NaiveDate, NaiveDateTime};
use kbchat_telemetry::{format_amount, DailyLedger};
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn run(amount: &str, date: Option<&str>) -> anyhow::Result<()> {
    let (paths, settings) = super::load_settings()?;
    let ledger = DailyLedger::new(settings.report_paths(&paths).daily_report);

    let delta = parse_amount(amount)?;
    let at = timestamp_for(date, Local::now().naive_local())?;
    ledger.record_cost(delta, at)?;

    println!(
        "✓ Recorded ${} on {} in {}",
        format_amount(delta),
        at.date(),
        ledger.path().display()
    );
    Ok(())
}

fn parse_amount(amount: &str) -> anyhow::Result<Decimal> {
    let trimmed = amount.trim().trim_start_matches('$');
    Decimal::from_str(trimmed).with_context(|| format!("invalid amount {amount:?}"))
}

/// Book on `date` at the current time of day, or at `now` when no date is given
fn timestamp_for(date: Option<&str>, now: NaiveDateTime) -> anyhow::Result<NaiveDateTime> {
    match date {
        Some(d) => {
            let day = NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .with_context(|| format!("invalid date {d:?}, expected YYYY-MM-DD"))?;
            Ok(day.and_time(now.time()))
        }
        None => Ok(now),
    }
}
