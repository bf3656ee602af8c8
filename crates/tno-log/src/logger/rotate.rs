//! Rotating file output used in development mode.
//!
//! Target: `<log_dir>/<UTC YYYYMMDD>_<log_file_name>`. The name may contain
//! path separators; the file then lands in the matching subdirectory.
//! `%` is written as `_` on disk, since [`logroller`] reads it as a strftime
//! template. Size rotation and backup count are enforced by [`logroller`];
//! files older than [`MAX_AGE_DAYS`] that belong to the same log are swept
//! when the output is opened.
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use logroller::{LogRoller, LogRollerBuilder, Rotation, RotationSize};
use time::{Date, OffsetDateTime, macros::format_description};
use tracing::warn;

use crate::logger::error::LoggerError;

/// Rotate once the active file reaches this size, in megabytes.
pub const MAX_SIZE_MB: u64 = 50;
/// Rotated files kept next to the active one.
pub const MAX_BACKUPS: u64 = 3;
/// Files older than this are removed.
pub const MAX_AGE_DAYS: u64 = 28;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// `<dir>/<YYYYMMDD>_<name>` for the given UTC date, with `%` replaced by `_`.
pub fn log_file_path(dir: &Path, name: &str, date: Date) -> PathBuf {
    let fmt = format_description!("[year][month][day]");
    let stamp = date.format(&fmt).unwrap_or_default();
    dir.join(format!("{stamp}_{}", name.replace('%', "_")))
}

/// Open the rotating writer for `name` under `dir`, creating directories.
pub(crate) fn open(dir: &Path, name: &str) -> Result<(PathBuf, LogRoller), LoggerError> {
    let path = log_file_path(dir, name, OffsetDateTime::now_utc().date());
    let fail = |reason: String| LoggerError::FileHook {
        path: path.clone(),
        reason,
    };

    let (Some(parent), Some(file_name)) = (path.parent(), path.file_name()) else {
        return Err(fail("log file name resolves to no file".to_string()));
    };

    fs::create_dir_all(parent).map_err(|e| fail(e.to_string()))?;
    sweep_expired(parent, &file_name.to_string_lossy());

    let roller = LogRollerBuilder::new(parent, Path::new(file_name))
        .rotation(Rotation::SizeBased(RotationSize::MB(MAX_SIZE_MB)))
        .max_keep_files(MAX_BACKUPS)
        .build()
        .map_err(|e| fail(e.to_string()))?;

    Ok((path, roller))
}

/// Age sweep for the log whose active file is `active`. Failures are logged,
/// never fatal. Returns the number of removed files.
pub(crate) fn sweep_expired(dir: &Path, active: &str) -> usize {
    match prune_expired(dir, active, DAY * MAX_AGE_DAYS as u32) {
        Ok(removed) => removed,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "failed to sweep expired log files");
            0
        }
    }
}

/// Remove files of the log `active` in `dir` last modified more than `max_age` ago.
pub(crate) fn prune_expired(dir: &Path, active: &str, max_age: Duration) -> io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let meta = entry.metadata()?;
        if !meta.is_file() || !belongs_to(&entry.file_name().to_string_lossy(), active) {
            continue;
        }
        let age = now
            .duration_since(meta.modified()?)
            .unwrap_or(Duration::ZERO);
        if age > max_age {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// `file` is `active` or one of its `.<suffix>` backups. When both carry a
/// `YYYYMMDD_` prefix, any date matches.
fn belongs_to(file: &str, active: &str) -> bool {
    let (file, active) = match (undated(file), undated(active)) {
        (Some(file), Some(active)) => (file, active),
        _ => (file, active),
    };
    match file.strip_prefix(active) {
        Some("") => true,
        Some(suffix) => suffix.starts_with('.'),
        None => false,
    }
}

fn undated(file: &str) -> Option<&str> {
    let (stamp, rest) = file.split_once('_')?;
    (stamp.len() == 8 && stamp.bytes().all(|b| b.is_ascii_digit())).then_some(rest)
}

#[cfg(test)]
mod tests {
    use std::{ffi::OsStr, fs::File, io::Write};

    use time::macros::date;

    use super::*;

    fn scratch(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tno-log-rotate-{}-{tag}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn touch(path: &Path, age: Duration) {
        let f = File::create(path).unwrap();
        f.set_modified(SystemTime::now() - age).unwrap();
    }

    #[test]
    fn path_is_dated_and_suffixed() {
        let p = log_file_path(Path::new("app_logs"), "default", date!(2024 - 03 - 07));
        assert_eq!(p, PathBuf::from("app_logs/20240307_default"));
    }

    #[test]
    fn empty_name_keeps_date_prefix() {
        let p = log_file_path(Path::new("app_logs"), "", date!(2024 - 12 - 31));
        assert_eq!(p, PathBuf::from("app_logs/20241231_"));
    }

    #[test]
    fn percent_is_replaced_on_disk() {
        let p = log_file_path(Path::new("app_logs"), "100%.log", date!(2024 - 03 - 07));
        assert_eq!(p, PathBuf::from("app_logs/20240307_100_.log"));
    }

    #[test]
    fn belongs_to_matches_any_date_and_backups() {
        assert!(belongs_to("20240307_api", "20240401_api"));
        assert!(belongs_to("20240307_api.1", "20240401_api"));
        assert!(belongs_to("20240307_api.2024-03-08-10", "20240401_api"));
        assert!(!belongs_to("20240307_api-v2", "20240401_api"));
        assert!(!belongs_to("2024_api", "20240401_api"));
        assert!(!belongs_to("notes_api", "20240401_api"));
        assert!(!belongs_to("api", "20240401_api"));
    }

    #[test]
    fn belongs_to_undated_active_matches_exact_name_and_backups() {
        assert!(belongs_to("x.log", "x.log"));
        assert!(belongs_to("x.log.1", "x.log"));
        assert!(!belongs_to("x.logger", "x.log"));
        assert!(!belongs_to("20240307_x.log", "x.log"));
    }

    #[test]
    fn prune_removes_only_expired_files_of_this_log() {
        let dir = scratch("prune");
        let max_age = DAY * MAX_AGE_DAYS as u32;

        touch(&dir.join("20240101_api"), DAY * 40);
        touch(&dir.join("20240101_api.1"), DAY * 30);
        touch(&dir.join("20240301_api"), DAY);
        touch(&dir.join("20240101_other"), DAY * 40);

        let removed = prune_expired(&dir, "20240301_api", max_age).unwrap();

        assert_eq!(removed, 2);
        assert!(!dir.join("20240101_api").exists());
        assert!(!dir.join("20240101_api.1").exists());
        assert!(dir.join("20240301_api").exists());
        assert!(dir.join("20240101_other").exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn sweep_of_unreadable_directory_is_not_fatal() {
        let dir = scratch("sweep").join("missing");
        assert_eq!(sweep_expired(&dir, "20240301_api"), 0);
    }

    #[test]
    fn open_creates_missing_directory() {
        let root = scratch("open");
        let dir = root.join("nested").join("app_logs");

        let (path, _roller) = open(&dir, "default").unwrap();

        assert!(dir.is_dir());
        assert_eq!(path.parent(), Some(dir.as_path()));
        assert!(path.to_string_lossy().ends_with("_default"));
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn open_writes_where_reported_for_nested_name() {
        let root = scratch("nested-name");

        let (path, mut roller) = open(&root, "sub/x.log").unwrap();
        writeln!(roller, "line").unwrap();
        roller.flush().unwrap();
        drop(roller);

        assert_eq!(path.file_name(), Some(OsStr::new("x.log")));
        assert!(path.parent().unwrap().to_string_lossy().ends_with("_sub"));
        assert!(path.is_file(), "{}", path.display());
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn open_accepts_percent_in_name() {
        let root = scratch("percent");

        let (path, mut roller) = open(&root, "100%.log").unwrap();
        writeln!(roller, "line").unwrap();
        roller.flush().unwrap();
        drop(roller);

        assert!(path.to_string_lossy().ends_with("_100_.log"));
        assert!(path.is_file(), "{}", path.display());
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn open_fails_when_directory_cannot_be_created() {
        let root = scratch("blocked");
        let blocker = root.join("blocker");
        File::create(&blocker).unwrap();

        let Err(err) = open(&blocker.join("app_logs"), "default") else {
            panic!("log directory under a regular file must not open");
        };

        assert!(matches!(err, LoggerError::FileHook { .. }));
        assert!(err.to_string().contains("Failed to initialize file rotate hook"));
        fs::remove_dir_all(&root).unwrap();
    }
}
