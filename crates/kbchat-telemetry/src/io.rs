//! Text append, locked open, and atomic file operations

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Append raw text to a file, creating it and its parent directories
pub fn append_text(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}

/// Open a file for read and update under an exclusive advisory lock.
///
/// The file and its parent directories are created when missing. The lock
/// is held until the returned handle is unlocked or dropped.
pub fn open_locked(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;
    file.lock_exclusive()?;
    Ok(file)
}

/// Take the exclusive lock on `<file name>.lock` beside `path`.
///
/// Guards files that are replaced by rename, where a lock on the file
/// itself would be lost with the old inode.
pub fn lock_sidecar(path: &Path) -> std::io::Result<File> {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".lock");
    open_locked(&path.with_file_name(name))
}

/// Write data atomically using temp file + rename
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, data)?;
    std::fs::rename(temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_append_text_creates_parents() {
        let temp = tempfile::TempDir::new().unwrap();
        let log = temp.path().join("nested").join("log.txt");

        append_text(&log, "first\n").unwrap();
        append_text(&log, "second\n").unwrap();

        assert_eq!(std::fs::read_to_string(&log).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_open_locked_keeps_content() {
        let temp = tempfile::TempDir::new().unwrap();
        let file_path = temp.path().join("report.txt");
        std::fs::write(&file_path, "existing").unwrap();

        let mut file = open_locked(&file_path).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        assert_eq!(content, "existing");
    }

    #[test]
    fn test_open_locked_creates_missing() {
        let temp = tempfile::TempDir::new().unwrap();
        let file_path = temp.path().join("a").join("b").join("report.txt");

        let file = open_locked(&file_path).unwrap();
        assert_eq!(file.metadata().unwrap().len(), 0);
        assert!(file_path.exists());
    }

    #[test]
    fn test_lock_sidecar_leaves_target_alone() {
        let temp = tempfile::TempDir::new().unwrap();
        let report = temp.path().join("reports").join("daily.txt");

        let lock = lock_sidecar(&report).unwrap();
        assert!(temp.path().join("reports").join("daily.txt.lock").exists());
        assert!(!report.exists());
        FileExt::unlock(&lock).unwrap();
    }

    #[test]
    fn test_atomic_write() {
        let temp = tempfile::TempDir::new().unwrap();
        let test_file = temp.path().join("settings.json");

        let data = b"{\"reports_dir\": null}";
        atomic_write(&test_file, data).unwrap();

        let read_data = std::fs::read(&test_file).unwrap();
        assert_eq!(data, read_data.as_slice());
        assert!(!temp.path().join("settings.tmp").exists());
    }
}
