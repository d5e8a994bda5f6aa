pub mod estimate;
pub mod init;
pub mod record;
pub mod report;
pub mod resolve;
pub mod version;

use kbchat_core::Settings;
use kbchat_telemetry::Paths;

/// Resolve the kbchat home and load settings with env overrides
pub(crate) fn load_settings() -> anyhow::Result<(Paths, Settings)> {
    let paths = Paths::new()?;
    let settings = Settings::load(&paths)?;
    Ok((paths, settings))
}
