pub fn run() -> anyhow::Result<()> {
    println!("kbchat {}", env!("CARGO_PKG_VERSION"));
    println!("Daily cost reporting for knowledge-base chat");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_output() {
        let result = run();
        assert!(result.is_ok());
    }
}
