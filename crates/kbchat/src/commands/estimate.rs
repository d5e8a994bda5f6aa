use chrono::Local;
use kbchat_core::{CostReports, CostTracker, TokenUsage};
use kbchat_telemetry::format_amount;

pub fn run(
    model: Option<&str>,
    input_tokens: u64,
    output_tokens: u64,
    record: bool,
) -> anyhow::Result<()> {
    let (paths, settings) = super::load_settings()?;
    let model_id = model.unwrap_or(&settings.model_id);

    let mut tracker = CostTracker::new();
    tracker.record(
        model_id,
        TokenUsage {
            prompt_tokens: input_tokens,
            completion_tokens: output_tokens,
        },
    )?;
    let usage = tracker.summary();
    println!("{model_id}\n{usage}");

    if record {
        let reports = CostReports::new(&settings.report_paths(&paths));
        let at = Local::now().naive_local();
        reports.run_log.append(at, &usage)?;
        reports.ledger.record_cost(usage.total_cost, at)?;
        println!(
            "\n✓ Added ${} to {}",
            format_amount(usage.total_cost),
            reports.ledger.path().display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_estimate_records_into_configured_dir() {
        let original_home = std::env::var("HOME").unwrap();
        let temp = TempDir::new().unwrap();
        let reports = temp.path().join("reports");

        unsafe {
            std::env::set_var("HOME", temp.path());
            std::env::set_var("KBCHAT_REPORTS_DIR", &reports);
        }
        let result = run(
            Some("anthropic.claude-3-haiku-20240307-v1:0"),
            1000,
            200,
            true,
        );
        unsafe {
            std::env::set_var("HOME", &original_home);
            std::env::remove_var("KBCHAT_REPORTS_DIR");
        }

        assert!(result.is_ok());
        let daily = std::fs::read_to_string(reports.join("accumulated_daily.txt")).unwrap();
        assert!(daily.ends_with("total costs in USD: $0.0005000"));
        let run_log = std::fs::read_to_string(reports.join("Run_costs.txt")).unwrap();
        assert!(run_log.contains("Total Cost (USD): $0.0005"));
    }

    #[test]
    #[serial]
    fn test_estimate_unknown_model_fails() {
        let original_home = std::env::var("HOME").unwrap();
        let temp = TempDir::new().unwrap();

        unsafe { std::env::set_var("HOME", temp.path()) };
        let result = run(Some("vendor.unpriced"), 10, 10, false);
        unsafe { std::env::set_var("HOME", &original_home) };

        assert!(result.is_err());
    }
}
