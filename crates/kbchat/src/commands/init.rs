use kbchat_core::Settings;
use kbchat_telemetry::Paths;
use serde_json::Value;

pub fn run() -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let settings_path = paths.settings_file();

    // Keep user edits; only fill in keys that are missing
    let mut settings: Value = if settings_path.exists() {
        let content = std::fs::read_to_string(&settings_path)?;
        serde_json::from_str(&content)?
    } else {
        serde_json::json!({})
    };
    let added = fill_missing_keys(&mut settings, &serde_json::to_value(Settings::default())?)?;

    // Validate the merged result before writing it back
    let merged: Settings = serde_json::from_value(settings.clone())?;
    merged.validate()?;

    let json = serde_json::to_string_pretty(&settings)?;
    kbchat_telemetry::atomic_write(&settings_path, json.as_bytes())?;

    let daily_report = merged.report_paths(&paths).daily_report;
    if let Some(dir) = daily_report.parent() {
        std::fs::create_dir_all(dir)?;
    }

    println!("✓ Wrote {}", settings_path.display());
    if added.is_empty() {
        println!("  (no new keys)");
    } else {
        println!("\nKeys added:");
        for key in &added {
            println!("  - {key}");
        }
    }
    if merged.knowledge_base_id.is_empty() {
        println!("\nSet knowledge_base_id, or export KBCHAT_KB_ID / KBCHAT_KB_ID_FILE.");
    }

    Ok(())
}

fn fill_missing_keys(settings: &mut Value, defaults: &Value) -> anyhow::Result<Vec<String>> {
    let target = settings
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("settings file is not a JSON object"))?;
    let defaults = defaults
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("default settings are not a JSON object"))?;

    let mut added = Vec::new();
    for (key, value) in defaults {
        if !target.contains_key(key) {
            target.insert(key.clone(), value.clone());
            added.push(key.clone());
        }
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_init_creates_settings() {
        let original_home = std::env::var("HOME").unwrap();
        let temp = TempDir::new().unwrap();

        // Override HOME for this test
        unsafe { std::env::set_var("HOME", temp.path()) };

        let result = run();

        // Restore HOME
        unsafe { std::env::set_var("HOME", &original_home) };

        assert!(result.is_ok());
        let settings_file = temp.path().join(".kbchat").join("settings.json");
        let content = fs::read_to_string(settings_file).unwrap();
        assert!(content.contains("accumulated_daily.txt"));
        assert!(content.contains("location"));
        assert!(temp.path().join(".kbchat").join("reports").is_dir());
    }

    #[test]
    #[serial]
    fn test_init_preserves_existing_values() {
        let original_home = std::env::var("HOME").unwrap();
        let temp = TempDir::new().unwrap();
        let kbchat_dir = temp.path().join(".kbchat");
        fs::create_dir_all(&kbchat_dir).unwrap();
        fs::write(
            kbchat_dir.join("settings.json"),
            r#"{"knowledge_base_id": "KBEXISTING", "temperature": 0.2}"#,
        )
        .unwrap();

        unsafe { std::env::set_var("HOME", temp.path()) };
        let result = run();
        unsafe { std::env::set_var("HOME", &original_home) };

        assert!(result.is_ok());
        let content = fs::read_to_string(kbchat_dir.join("settings.json")).unwrap();
        let settings: Settings = serde_json::from_str(&content).unwrap();
        assert_eq!(settings.knowledge_base_id, "KBEXISTING");
        assert_eq!(settings.temperature, 0.2);
        assert_eq!(settings.run_log_name, "Run_costs.txt");
    }

    #[test]
    fn test_fill_missing_keys() {
        let mut settings = serde_json::json!({"region": "eu-west-1"});
        let defaults = serde_json::json!({"region": "us-east-1", "top_p": 0.9});

        let added = fill_missing_keys(&mut settings, &defaults).unwrap();

        assert_eq!(added, vec!["top_p".to_string()]);
        assert_eq!(settings["region"], "eu-west-1");
        assert_eq!(settings["top_p"], 0.9);
    }

    #[test]
    fn test_fill_missing_keys_rejects_non_object() {
        let mut settings = serde_json::json!([1, 2]);
        let defaults = serde_json::json!({});
        assert!(fill_missing_keys(&mut settings, &defaults).is_err());
    }
}
