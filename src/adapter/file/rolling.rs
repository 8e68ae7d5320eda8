// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use flate2::Compression;
use flate2::write::GzEncoder;
use jiff::Timestamp;
use jiff::Zoned;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use serde::Deserialize;

use crate::adapter::file::clock::Clock;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

const MEGABYTE: u64 = 1024 * 1024;
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";
const COMPRESS_SUFFIX: &str = ".gz";

/// The rollover policy of a log file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Rotation {
    /// The file to write logs to. Backups are kept in the same directory.
    pub filename: PathBuf,
    /// The maximum size in megabytes of the log file before it gets rotated.
    pub max_size_mb: u64,
    /// The maximum number of old log files to retain. `0` retains all of them.
    pub max_backups: usize,
    /// The maximum number of days to retain old log files. `0` disables age-based removal.
    pub max_age_days: u64,
    /// Use the local time zone instead of UTC in backup file names.
    pub local_time: bool,
    /// Gzip rotated log files.
    pub compress: bool,
}

impl Default for Rotation {
    fn default() -> Self {
        Self {
            filename: PathBuf::from("logs/logs.log"),
            max_size_mb: 10,
            max_backups: 3,
            max_age_days: 28,
            local_time: false,
            compress: false,
        }
    }
}

/// A writer that appends to one file and moves it aside once it is full.
///
/// When a write would grow the current file over the size limit, the file is renamed to
/// `<stem>-<timestamp>.<ext>` and a fresh file is opened at the original path. Old backups are
/// then pruned by count and age, and optionally compressed.
#[derive(Debug)]
pub struct RollingFileWriter {
    state: State,
    writer: File,
}

impl Drop for RollingFileWriter {
    fn drop(&mut self) {
        if let Err(err) = self.writer.flush() {
            let err = anyhow::Error::new(err).context("failed to flush file writer on dropped");
            self.state.trap.trap(&err);
        }
    }
}

impl RollingFileWriter {
    /// Creates a new [`RollingFileWriterBuilder`].
    #[must_use]
    pub fn builder(filename: impl Into<PathBuf>) -> RollingFileWriterBuilder {
        RollingFileWriterBuilder::new(filename)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.writer.flush()?;

        let now = self.state.clock.now();
        let backup = self.state.backup_filename(now);
        fs::rename(&self.state.filename, &backup)?;
        self.writer = self.state.create_log_writer()?;
        self.state.current_filesize = 0;

        if let Err(err) = self.state.prune(now) {
            self.state.trap.trap(&err);
        }
        Ok(())
    }
}

impl Write for RollingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = buf.len() as u64;
        if len > self.state.max_size {
            return Err(io::Error::other(format!(
                "write length {len} exceeds maximum file size {}",
                self.state.max_size
            )));
        }

        if self.state.current_filesize + len > self.state.max_size {
            self.rotate()?;
        }

        self.writer
            .write(buf)
            .inspect(|&n| self.state.current_filesize += n as u64)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// A builder for configuring [`RollingFileWriter`].
#[derive(Debug)]
pub struct RollingFileWriterBuilder {
    // required
    filename: PathBuf,

    // has default
    max_size: u64,
    max_backups: usize,
    max_age_days: u64,
    local_time: bool,
    compress: bool,
    clock: Clock,
    trap: Arc<dyn Trap>,
}

impl RollingFileWriterBuilder {
    /// Creates a new [`RollingFileWriterBuilder`] with the defaults of [`Rotation`].
    #[must_use]
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        let defaults = Rotation::default();
        Self {
            filename: filename.into(),
            max_size: defaults.max_size_mb * MEGABYTE,
            max_backups: defaults.max_backups,
            max_age_days: defaults.max_age_days,
            local_time: defaults.local_time,
            compress: defaults.compress,
            clock: Clock::DefaultClock,
            trap: Arc::new(DefaultTrap::default()),
        }
    }

    /// Creates a builder from a [`Rotation`] policy.
    #[must_use]
    pub fn from_rotation(rotation: &Rotation) -> Self {
        Self::new(rotation.filename.clone())
            .max_file_size(rotation.max_size_mb.saturating_mul(MEGABYTE))
            .max_backups(rotation.max_backups)
            .max_age_days(rotation.max_age_days)
            .local_time(rotation.local_time)
            .compress(rotation.compress)
    }

    /// Set the maximum size of the log file in bytes.
    #[must_use]
    pub fn max_file_size(mut self, n: u64) -> Self {
        self.max_size = n;
        self
    }

    /// Set the maximum number of backups to keep. `0` keeps all of them.
    #[must_use]
    pub fn max_backups(mut self, n: usize) -> Self {
        self.max_backups = n;
        self
    }

    /// Set the maximum age of backups in days. `0` disables age-based removal.
    #[must_use]
    pub fn max_age_days(mut self, n: u64) -> Self {
        self.max_age_days = n;
        self
    }

    /// Use local time in backup file names.
    #[must_use]
    pub fn local_time(mut self, yes: bool) -> Self {
        self.local_time = yes;
        self
    }

    /// Gzip backups after rotation.
    #[must_use]
    pub fn compress(mut self, yes: bool) -> Self {
        self.compress = yes;
        self
    }

    /// Set the trap for errors that happen while pruning backups.
    #[must_use]
    pub fn trap(mut self, trap: Arc<dyn Trap>) -> Self {
        self.trap = trap;
        self
    }

    #[cfg(test)]
    fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Builds the [`RollingFileWriter`].
    ///
    /// # Errors
    ///
    /// Return an error if either:
    ///
    /// * The filename has no file name component or the size limit is zero.
    /// * The log directory cannot be created.
    /// * The log file cannot be opened.
    pub fn build(self) -> anyhow::Result<RollingFileWriter> {
        let Self {
            filename,
            max_size,
            max_backups,
            max_age_days,
            local_time,
            compress,
            clock,
            trap,
        } = self;

        if max_size == 0 {
            anyhow::bail!("maximum file size must not be zero");
        }

        let file_name = filename
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("malformed log filename: {}", filename.display()))?;
        let (stem, ext) = match file_name.rfind('.') {
            Some(pos) if pos > 0 => (file_name[..pos].to_string(), file_name[pos..].to_string()),
            _ => (file_name.to_string(), String::new()),
        };
        let log_dir = match filename.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&log_dir).context("failed to create log directory")?;

        let mut state = State {
            log_dir,
            filename,
            stem,
            ext,
            current_filesize: 0,
            max_size,
            max_backups,
            max_age_days,
            local_time,
            compress,
            clock,
            trap,
        };

        let current_size = fs::metadata(&state.filename).ok().map(|m| m.len());
        let writer = match current_size {
            Some(size) if size < max_size => {
                state.current_filesize = size;
                OpenOptions::new()
                    .append(true)
                    .open(&state.filename)
                    .context("failed to open current log file")?
            }
            Some(_) => {
                // the existing file is full; move it aside before starting a new one
                let now = state.clock.now();
                fs::rename(&state.filename, state.backup_filename(now))
                    .context("failed to rotate full log file")?;
                let writer = state.create_log_writer()?;
                if let Err(err) = state.prune(now) {
                    state.trap.trap(&err);
                }
                writer
            }
            None => state.create_log_writer()?,
        };

        Ok(RollingFileWriter { state, writer })
    }
}

#[derive(Debug, Clone)]
struct Backup {
    path: PathBuf,
    millis: i64,
    index: u32,
    compressed: bool,
}

#[derive(Debug)]
struct State {
    log_dir: PathBuf,
    filename: PathBuf,
    stem: String,
    ext: String,
    current_filesize: u64,
    max_size: u64,
    max_backups: usize,
    max_age_days: u64,
    local_time: bool,
    compress: bool,
    clock: Clock,
    trap: Arc<dyn Trap>,
}

impl State {
    fn time_zone(&self) -> TimeZone {
        if self.local_time {
            TimeZone::system()
        } else {
            TimeZone::UTC
        }
    }

    fn create_log_writer(&self) -> io::Result<File> {
        OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.filename)
    }

    // backups sharing a timestamp get increasing `-<index>` suffixes, so names never collide
    fn backup_filename(&self, now: Timestamp) -> PathBuf {
        let now = now.to_zoned(self.time_zone());
        let base = format!("{}-{}", self.stem, format_backup_time(&now));

        let next_index = fs::read_dir(&self.log_dir)
            .into_iter()
            .flatten()
            .filter_map(|entry| {
                let filename = entry.ok()?.file_name().into_string().ok()?;
                let rest = filename.strip_suffix(COMPRESS_SUFFIX).unwrap_or(&filename);
                let rest = rest.strip_suffix(self.ext.as_str())?.strip_prefix(&base)?;
                match rest {
                    "" => Some(0),
                    _ => rest.strip_prefix('-')?.parse::<u32>().ok(),
                }
            })
            .max()
            .map(|index| index + 1);

        match next_index {
            None => self.log_dir.join(format!("{base}{}", self.ext)),
            Some(index) => self.log_dir.join(format!("{base}-{index}{}", self.ext)),
        }
    }

    // newest first
    fn list_backups(&self) -> anyhow::Result<Vec<Backup>> {
        let read_dir = fs::read_dir(&self.log_dir)
            .with_context(|| format!("failed to read log dir: {}", self.log_dir.display()))?;
        let prefix = format!("{}-", self.stem);
        let tz = self.time_zone();

        let mut backups = read_dir
            .filter_map(|entry| {
                let entry = entry.ok()?;
                // the writer only creates files, never directories or symlinks
                if !entry.metadata().ok()?.is_file() {
                    return None;
                }

                let filename = entry.file_name();
                let filename = filename.to_str()?;
                let rest = filename.strip_prefix(&prefix)?;
                let (rest, compressed) = match rest.strip_suffix(COMPRESS_SUFFIX) {
                    Some(rest) => (rest, true),
                    None => (rest, false),
                };
                let stamp = rest.strip_suffix(self.ext.as_str())?;
                let (millis, index) = parse_backup_time(stamp, &tz)?;

                Some(Backup {
                    path: entry.path(),
                    millis,
                    index,
                    compressed,
                })
            })
            .collect::<Vec<_>>();

        backups.sort_by(|a, b| b.millis.cmp(&a.millis).then(b.index.cmp(&a.index)));
        Ok(backups)
    }

    fn prune(&self, now: Timestamp) -> anyhow::Result<()> {
        if self.max_backups == 0 && self.max_age_days == 0 && !self.compress {
            return Ok(());
        }

        let mut backups = self.list_backups()?;
        let mut removals = vec![];

        if self.max_backups > 0 && backups.len() > self.max_backups {
            removals.extend(backups.split_off(self.max_backups));
        }

        if self.max_age_days > 0 {
            let max_age = i64::try_from(self.max_age_days)
                .unwrap_or(i64::MAX)
                .saturating_mul(SECONDS_PER_DAY * 1000);
            let cutoff = now.as_millisecond().saturating_sub(max_age);
            let (kept, expired): (Vec<_>, Vec<_>) =
                backups.into_iter().partition(|b| b.millis >= cutoff);
            backups = kept;
            removals.extend(expired);
        }

        for backup in removals.iter() {
            fs::remove_file(&backup.path).with_context(|| {
                format!("failed to remove old log file: {}", backup.path.display())
            })?;
        }

        if self.compress {
            for backup in backups.iter().filter(|b| !b.compressed) {
                compress_log_file(&backup.path)?;
            }
        }

        Ok(())
    }
}

fn format_backup_time(time: &Zoned) -> String {
    format!(
        "{}.{:03}",
        time.strftime(BACKUP_TIME_FORMAT),
        time.millisecond()
    )
}

/// Parse `<datetime>.<mmm>` or `<datetime>.<mmm>-<index>` into the backup time in milliseconds
/// and the index, `0` when absent.
fn parse_backup_time(stamp: &str, tz: &TimeZone) -> Option<(i64, u32)> {
    let (datetime, rest) = stamp.split_once('.')?;
    let (millis, index) = match rest.split_once('-') {
        Some((millis, index)) => (millis, index.parse::<u32>().ok().filter(|&n| n > 0)?),
        None => (rest, 0),
    };
    if millis.len() != 3 || !millis.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let millis = millis.parse::<i64>().ok()?;
    let datetime = DateTime::strptime(BACKUP_TIME_FORMAT, datetime).ok()?;
    let timestamp = datetime.to_zoned(tz.clone()).ok()?.timestamp();
    Some((timestamp.as_millisecond() + millis, index))
}

fn compress_log_file(path: &Path) -> anyhow::Result<()> {
    let mut target = path.as_os_str().to_owned();
    target.push(COMPRESS_SUFFIX);

    let source = fs::read(path)
        .with_context(|| format!("failed to read log file: {}", path.display()))?;
    let file = File::create(&target).context("failed to create compressed log file")?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder
        .write_all(&source)
        .context("failed to compress log file")?;
    encoder.finish().context("failed to finish compressed log file")?;

    fs::remove_file(path)
        .with_context(|| format!("failed to remove compressed log file: {}", path.display()))
}
