//! Log file naming, pruning, ANSI stripping, and time formatting.
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Directory under the application root holding log files.
pub const LOGS_DIR: &str = "logs";

/// Strip ANSI escape sequences from a string.
///
/// Handles SGR sequences (ending in `m`) and other CSI sequences (ending
/// in any letter in the `@`..`~` range), so cursor movement, erase, etc.
/// are also stripped without consuming unrelated text.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if let Some(next) = chars.next()
                && next == '['
            {
                for inner in chars.by_ref() {
                    if ('@'..='~').contains(&inner) {
                        break;
                    }
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Return `<root>/logs/`, creating it if needed.
pub(super) fn log_dir(root: &Path) -> Option<PathBuf> {
    let dir = root.join(LOGS_DIR);
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Return a fresh log file path for `command` under `dir`.
pub(super) fn log_file_path(dir: &Path, command: &str) -> PathBuf {
    let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.6fZ");
    dir.join(format!("{command}-{stamp}.log"))
}

/// Delete the oldest `.log` files in `dir` so at most `keep` remain.
/// A negative `keep` disables pruning.
///
/// Returns how many files were removed.
pub fn prune_logs(dir: &Path, keep: i32) -> usize {
    let Ok(keep) = usize::try_from(keep) else {
        return 0;
    };
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };
    let mut logs: Vec<(SystemTime, PathBuf)> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "log"))
        .map(|p| {
            let modified = fs::metadata(&p)
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, p)
        })
        .collect();
    if logs.len() <= keep {
        return 0;
    }
    logs.sort();
    let excess = logs.len() - keep;
    logs.iter()
        .take(excess)
        .filter(|(_, path)| fs::remove_file(path).is_ok())
        .count()
}

/// Format the current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub(super) fn format_utc_datetime() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format the current UTC time as `HH:MM:SS`.
pub(super) fn format_utc_time() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn strip_ansi_removes_colors() {
        assert_eq!(strip_ansi("\x1b[31mERROR\x1b[0m hello"), "ERROR hello");
        assert_eq!(strip_ansi("no codes here"), "no codes here");
        assert_eq!(
            strip_ansi("\x1b[1;34m==>\x1b[0m \x1b[1mstage\x1b[0m"),
            "==> stage"
        );
    }

    #[test]
    fn strip_ansi_handles_csi_sequences() {
        assert_eq!(strip_ansi("\x1b[2Jhello"), "hello");
        assert_eq!(strip_ansi("\x1b[31m\x1b[2JERROR\x1b[0m"), "ERROR");
        assert_eq!(strip_ansi(""), "");
    }

    #[test]
    fn log_file_path_names_command() {
        let dir = Path::new("logs");
        let path = log_file_path(dir, "set");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("set-"));
        assert!(name.ends_with("Z.log"));
        assert_eq!(path.parent(), Some(dir));
    }

    #[test]
    fn log_dir_is_created_under_root() {
        let root = tempfile::tempdir().unwrap();
        let dir = log_dir(root.path()).unwrap();
        assert_eq!(dir, root.path().join(LOGS_DIR));
        assert!(dir.is_dir());
    }

    #[test]
    fn prune_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..4 {
            let path = dir.path().join(format!("get-{i}.log"));
            fs::write(&path, "x").unwrap();
            let when = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000 + i);
            fs::File::options()
                .write(true)
                .open(&path)
                .unwrap()
                .set_modified(when)
                .unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "keep").unwrap();

        assert_eq!(prune_logs(dir.path(), 2), 2);
        assert!(!dir.path().join("get-0.log").exists());
        assert!(!dir.path().join("get-1.log").exists());
        assert!(dir.path().join("get-3.log").exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn prune_negative_keeps_all() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.log"), "x").unwrap();
        assert_eq!(prune_logs(dir.path(), -1), 0);
        assert_eq!(prune_logs(dir.path(), 0), 1);
    }

    #[test]
    fn prune_missing_dir_is_noop() {
        assert_eq!(prune_logs(Path::new("/nonexistent/bethini/logs"), 1), 0);
    }

    #[test]
    fn format_utc_time_has_correct_format() {
        let s = format_utc_time();
        assert_eq!(s.len(), 8, "HH:MM:SS should be 8 chars");
        assert_eq!(&s[2..3], ":", "colon at position 2");
    }

    #[test]
    fn format_utc_datetime_has_correct_format() {
        let s = format_utc_datetime();
        assert_eq!(s.len(), 19, "YYYY-MM-DD HH:MM:SS should be 19 chars");
        assert_eq!(&s[10..11], " ", "space at position 10");
    }
}
