//! Size-capped log file with numbered backups.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// A log file that rolls over once it would exceed `max_bytes`.
///
/// Rotated generations are `name.1` (newest) through `name.{backup_count}`
/// (oldest); the oldest is deleted when a new generation would exceed the
/// retention count.
#[derive(Debug)]
pub struct RotatingFileSink {
    path: PathBuf,
    max_bytes: u64,
    backup_count: usize,
    writer: BufWriter<File>,
    size: u64,
}

impl RotatingFileSink {
    /// Open (or create) the file, creating its directory if absent.
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64, backup_count: usize) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = open_append(&path)?;
        let size = file.metadata()?.len();

        Ok(Self {
            path,
            max_bytes,
            backup_count,
            writer: BufWriter::new(file),
            size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes in the active file.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Path of rotated generation `n` (1 = newest).
    pub fn backup_path(&self, n: usize) -> PathBuf {
        backup_path(&self.path, n)
    }

    /// Append one line, rotating first if it would overflow the cap.
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        let len = line.len() as u64 + 1;
        if self.should_rollover(len) {
            self.rollover()?;
        }

        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.size += len;
        Ok(())
    }

    fn should_rollover(&self, incoming: u64) -> bool {
        self.max_bytes > 0 && self.size > 0 && self.size + incoming > self.max_bytes
    }

    /// Shift generations up by one and start a fresh active file.
    pub fn rollover(&mut self) -> io::Result<()> {
        self.writer.flush()?;

        if self.backup_count == 0 {
            self.truncate()?;
            return Ok(());
        }

        let oldest = self.backup_path(self.backup_count);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.backup_count).rev() {
            let from = self.backup_path(n);
            if from.exists() {
                fs::rename(&from, self.backup_path(n + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))?;

        self.writer = BufWriter::new(open_append(&self.path)?);
        self.size = 0;
        Ok(())
    }

    /// Empty the active file in place.
    pub fn truncate(&mut self) -> io::Result<()> {
        self.writer.flush()?;
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&self.path)?;
        drop(file);
        self.writer = BufWriter::new(open_append(&self.path)?);
        self.size = 0;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn backup_path(path: &Path, n: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{n}"));
    PathBuf::from(name)
}

/// Last `n` lines of a file, without line terminators.
pub fn tail_lines(path: &Path, n: usize) -> io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(n);
    Ok(lines[start..].iter().map(|line| line.to_string()).collect())
}
