//! Chat log on disk.
//!
//! One file per run. At startup an existing log is moved aside to a
//! timestamped name (`YYYY-M-D-H-Min-S.txt`, unpadded, in the same directory)
//! and an empty file takes its place. Every event is appended as one line
//! ending in [`LINE_TERMINATOR`]; the file is opened and closed per write so
//! each line hits the disk before the next event is read.

use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Written after every log line.
pub const LINE_TERMINATOR: &str = "\r\n\r";

/// Destination for formatted chat events.
pub trait LogSink: Send {
    fn append(&mut self, line: &str) -> io::Result<()>;
}

/// Append-only chat log file.
#[derive(Debug, Clone)]
pub struct ChatLog {
    path: PathBuf,
}

impl ChatLog {
    /// Prepare a fresh log at `path`, archiving any previous one.
    pub fn create(path: &Path) -> io::Result<Self> {
        let path = expand_home(path);
        rotate(&path, Local::now().naive_local())?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for ChatLog {
    fn append(&mut self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(format!("{}{}", line, LINE_TERMINATOR).as_bytes())
    }
}

/// Create the parent directory if needed, move an existing file at `path`
/// to its archive name and leave an empty file behind.
///
/// Returns the archive path when something was moved.
pub fn rotate(path: &Path, now: NaiveDateTime) -> io::Result<Option<PathBuf>> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !dir.is_dir() {
        fs::create_dir_all(&dir)?;
    }

    let archived = if path.is_file() {
        let target = dir.join(archive_name(now));
        fs::rename(path, &target)?;
        info!(from = %path.display(), to = %target.display(), "Archived previous chat log");
        Some(target)
    } else {
        None
    };

    File::create(path)?;
    Ok(archived)
}

fn archive_name(now: NaiveDateTime) -> String {
    format!(
        "{}-{}-{}-{}-{}-{}.txt",
        now.year(),
        now.month(),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_archive_name_is_unpadded() {
        assert_eq!(archive_name(at(7, 8, 9)), "2024-3-5-7-8-9.txt");
        assert_eq!(archive_name(at(17, 45, 30)), "2024-3-5-17-45-30.txt");
    }

    #[test]
    fn test_rotate_archives_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.txt");
        fs::write(&path, "old run\r\n\r").unwrap();

        let archived = rotate(&path, at(7, 8, 9)).unwrap();

        let expected = dir.path().join("2024-3-5-7-8-9.txt");
        assert_eq!(archived.as_deref(), Some(expected.as_path()));
        assert_eq!(fs::read_to_string(&expected).unwrap(), "old run\r\n\r");
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_rotate_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("logs").join("chat.txt");

        assert_eq!(rotate(&path, at(1, 2, 3)).unwrap(), None);
        assert!(path.is_file());
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn test_append_in_arrival_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = ChatLog::create(&dir.path().join("chat.txt")).unwrap();

        let lines = ["u: hi", "bob joined #chan", "* alice  waves"];
        for line in lines {
            log.append(line).unwrap();
        }

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents, "u: hi\r\n\rbob joined #chan\r\n\r* alice  waves\r\n\r");
        assert_eq!(contents.matches(LINE_TERMINATOR).count(), lines.len());
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home(Path::new("logs/chat.txt")), PathBuf::from("logs/chat.txt"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/chat.txt")), home.join("chat.txt"));
        }
    }
}
