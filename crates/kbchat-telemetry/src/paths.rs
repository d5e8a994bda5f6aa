//! Path resolution for settings and report files

use std::path::{Path, PathBuf};

/// Default file name of the accumulated daily cost report
pub const DAILY_REPORT_NAME: &str = "accumulated_daily.txt";

/// Default file name of the per-invocation run log
pub const RUN_LOG_NAME: &str = "Run_costs.txt";

/// Resolves the per-user kbchat home directory
#[derive(Debug, Clone)]
pub struct Paths {
    pub home_kbchat: PathBuf,
}

impl Paths {
    /// Create a new Paths resolver rooted at `~/.kbchat`
    pub fn new() -> std::io::Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;

        Ok(Self {
            home_kbchat: home.join(".kbchat"),
        })
    }

    /// Get settings.json path
    pub fn settings_file(&self) -> PathBuf {
        self.home_kbchat.join("settings.json")
    }

    /// Default reports directory when none is configured
    pub fn default_reports_dir(&self) -> PathBuf {
        self.home_kbchat.join("reports")
    }
}

/// Locations of the report files for one configured reports directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub daily_report: PathBuf,
    pub run_log: PathBuf,
}

impl ReportPaths {
    pub fn new(dir: &Path, daily_report_name: &str, run_log_name: &str) -> Self {
        Self {
            daily_report: dir.join(daily_report_name),
            run_log: dir.join(run_log_name),
        }
    }

    /// Report paths using the default file names
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir, DAILY_REPORT_NAME, RUN_LOG_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_new() {
        let paths = Paths::new().unwrap();
        assert!(paths.home_kbchat.ends_with(".kbchat"));
    }

    #[test]
    fn test_settings_file() {
        let paths = Paths::new().unwrap();
        assert!(paths.settings_file().ends_with(".kbchat/settings.json"));
        assert!(paths.default_reports_dir().ends_with(".kbchat/reports"));
    }

    #[test]
    fn test_report_paths_default_names() {
        let reports = ReportPaths::in_dir(Path::new("/tmp/reports"));
        assert_eq!(
            reports.daily_report,
            PathBuf::from("/tmp/reports/accumulated_daily.txt")
        );
        assert_eq!(reports.run_log, PathBuf::from("/tmp/reports/Run_costs.txt"));
    }

    #[test]
    fn test_report_paths_custom_names() {
        let reports = ReportPaths::new(Path::new("out"), "daily.txt", "runs.txt");
        assert!(reports.daily_report.ends_with("out/daily.txt"));
        assert!(reports.run_log.ends_with("out/runs.txt"));
    }
}
