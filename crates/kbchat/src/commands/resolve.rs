use anyhow::Context;
use kbchat_core::{resolve, Resolution};
use serde_json::Value;
use std::io::Read;

pub fn run(metadata: &str, path: Option<&str>) -> anyhow::Result<()> {
    let (_, settings) = super::load_settings()?;

    let content = if metadata == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(metadata).with_context(|| format!("failed to read {metadata}"))?
    };
    let tree: Value = serde_json::from_str(&content).context("metadata is not valid JSON")?;

    let keys = match path {
        Some(p) => split_path(p),
        None => settings.metadata_path.clone(),
    };

    println!("{}", describe(resolve(&tree, &keys), &keys)?);
    Ok(())
}

/// `a.b.c` → `["a", "b", "c"]`; an empty string is the empty path
fn split_path(path: &str) -> Vec<String> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split('.').map(str::to_string).collect()
}

fn describe(resolution: Resolution<'_>, keys: &[String]) -> anyhow::Result<String> {
    Ok(match resolution {
        Resolution::Found(value) => serde_json::to_string_pretty(value)?,
        Resolution::Absent => format!("absent: no value at {}", keys.join(".")),
        Resolution::NotAMapping { depth } => format!(
            "absent: {} is not a mapping, cannot look up {:?}",
            if depth == 0 {
                "<root>".to_string()
            } else {
                keys[..depth].join(".")
            },
            keys[depth]
        ),
    })
}
