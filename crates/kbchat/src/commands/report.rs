use kbchat_telemetry::{format_amount, DailyLedger, LedgerEntry};
use rust_decimal::Decimal;

pub fn run(json: bool) -> anyhow::Result<()> {
    let (paths, settings) = super::load_settings()?;
    let ledger = DailyLedger::new(settings.report_paths(&paths).daily_report);
    let entries = ledger.entries()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("{}", build_report(&entries));
    }
    Ok(())
}

fn build_report(entries: &[LedgerEntry]) -> String {
    if entries.is_empty() {
        return "No costs recorded yet.".to_string();
    }

    let total: Decimal = entries.iter().map(|e| e.total).sum();
    let busiest = entries
        .iter()
        .max_by_key(|e| e.total)
        .map(|e| format!("{} (${})", e.date, format_amount(e.total)))
        .unwrap_or_default();

    let rows = entries
        .iter()
        .map(|e| format!("  {}  ${}", e.date, format_amount(e.total)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Daily Cost Report\n=================\n{}\n\n\
         Days: {}\nTotal: ${}\nHighest day: {}",
        rows,
        entries.len(),
        format_amount(total),
        busiest
    )
}
