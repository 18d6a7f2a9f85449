//! Size-rotated log file

use chrono::NaiveDateTime;
use flate2::write::GzEncoder;
use flate2::Compression;
use parking_lot::Mutex;
use sqlscope_core::RotationPolicy;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::sink::Sink;

const BACKUP_TIMESTAMP: &str = "%Y-%m-%dT%H-%M-%S%.3f";
/// Length of a formatted `BACKUP_TIMESTAMP`, e.g. `2024-01-31T09-05-00.123`.
const BACKUP_TIMESTAMP_LEN: usize = 23;
const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Log file that rotates itself once it would grow past `max_size`.
///
/// The current file keeps its configured name; rotated files are renamed to
/// `<stem>-<timestamp>.<ext>` next to it (gzipped when `compress` is set).
/// Backups beyond `max_backups` or older than `max_age` are removed after
/// each rotation.
pub struct RotatingFile {
    path: PathBuf,
    max_size: u64,
    max_backups: usize,
    max_age: Option<Duration>,
    compress: bool,
    state: Mutex<FileState>,
}

struct FileState {
    file: File,
    size: u64,
}

impl RotatingFile {
    /// Open (or create) the file at `path`, appending to existing content.
    pub fn open(path: &Path, policy: &RotationPolicy) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let size = file.metadata()?.len();

        Ok(Self {
            path: path.to_path_buf(),
            max_size: policy.max_size_bytes(),
            max_backups: policy.max_backups,
            max_age: (policy.max_age > 0)
                .then(|| Duration::from_secs(u64::from(policy.max_age) * SECS_PER_DAY)),
            compress: policy.compress,
            state: Mutex::new(FileState { file, size }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes in the current file.
    pub fn size(&self) -> u64 {
        self.state.lock().size
    }

    /// Force a rotation regardless of size.
    pub fn rotate(&self) -> io::Result<()> {
        let notes = {
            let mut state = self.state.lock();
            self.rotate_locked(&mut state)?
        };
        notes.into_iter().for_each(RotationNote::log);
        Ok(())
    }

    // Runs under the state lock, so nothing here may emit tracing events:
    // a subscriber writing to this file would block on the same lock.
    fn rotate_locked(&self, state: &mut FileState) -> io::Result<Vec<RotationNote>> {
        state.file.flush()?;

        let rotated = self.backup_path(chrono::Local::now());
        fs::rename(&self.path, &rotated)?;

        state.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        state.size = 0;

        let mut notes = vec![RotationNote::Rotated(self.path.clone())];
        if self.compress {
            notes.push(match compress_log_file(&rotated) {
                Ok(gz_path) => RotationNote::Compressed(rotated, gz_path),
                Err(e) => RotationNote::CompressFailed(rotated, e),
            });
        }

        match self.backups_with_time() {
            Ok(backups) => notes.extend(self.cleanup_old_files(backups)),
            Err(e) => notes.push(RotationNote::CleanupFailed(e)),
        }

        Ok(notes)
    }

    fn file_parts(&self) -> (String, String) {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = self
            .path
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        (stem, ext)
    }

    fn backup_path(&self, now: chrono::DateTime<chrono::Local>) -> PathBuf {
        let (stem, ext) = self.file_parts();
        let dir = self.dir();
        let timestamp = now.format(BACKUP_TIMESTAMP).to_string();

        // Continue past the highest counter already used for this timestamp,
        // so a newer backup never sorts before an older one.
        let stamp = NaiveDateTime::parse_from_str(&timestamp, BACKUP_TIMESTAMP).ok();
        let mut attempt = self
            .backups_with_time()
            .unwrap_or_default()
            .into_iter()
            .filter(|backup| Some(backup.timestamp) == stamp)
            .map(|backup| backup.counter + 1)
            .max()
            .unwrap_or(0);
        loop {
            let name = match (attempt, ext.is_empty()) {
                (0, true) => format!("{}-{}", stem, timestamp),
                (0, false) => format!("{}-{}.{}", stem, timestamp, ext),
                (n, true) => format!("{}-{}-{}", stem, timestamp, n),
                (n, false) => format!("{}-{}-{}.{}", stem, timestamp, n, ext),
            };
            let candidate = dir.join(name);
            let gz = PathBuf::from(format!("{}.gz", candidate.display()));
            if !candidate.exists() && !gz.exists() {
                return candidate;
            }
            attempt += 1;
        }
    }

    fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Rotated files belonging to this log, newest first.
    pub fn backups(&self) -> io::Result<Vec<PathBuf>> {
        Ok(self
            .backups_with_time()?
            .into_iter()
            .map(|backup| backup.path)
            .collect())
    }

    fn backups_with_time(&self) -> io::Result<Vec<Backup>> {
        let (stem, ext) = self.file_parts();

        let mut backups = Vec::new();
        for entry in fs::read_dir(self.dir())? {
            let path = entry?.path();
            if path == self.path {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some((timestamp, counter)) = parse_backup_name(name, &stem, &ext) {
                backups.push(Backup {
                    path,
                    timestamp,
                    counter,
                });
            }
        }

        backups.sort_by(|a, b| {
            (b.timestamp, b.counter).cmp(&(a.timestamp, a.counter))
        });
        Ok(backups)
    }

    fn cleanup_old_files(&self, backups: Vec<Backup>) -> Vec<RotationNote> {
        let now = chrono::Local::now().naive_local();
        let mut notes = Vec::new();

        for (index, backup) in backups.into_iter().enumerate() {
            let too_many = self.max_backups > 0 && index >= self.max_backups;
            let too_old = self.max_age.is_some_and(|max_age| {
                (now - backup.timestamp)
                    .to_std()
                    .map(|age| age > max_age)
                    .unwrap_or(false)
            });
            if !(too_many || too_old) {
                continue;
            }
            notes.push(match fs::remove_file(&backup.path) {
                Ok(()) => RotationNote::Removed(backup.path),
                Err(e) => RotationNote::RemoveFailed(backup.path, e),
            });
        }

        notes
    }
}

struct Backup {
    path: PathBuf,
    timestamp: NaiveDateTime,
    counter: u32,
}

/// Match `<stem>-<timestamp>[-n][.<ext>][.gz]`, the names `backup_path`
/// produces, returning the timestamp and collision counter.
fn parse_backup_name(name: &str, stem: &str, ext: &str) -> Option<(NaiveDateTime, u32)> {
    let rest = name.strip_prefix(stem)?.strip_prefix('-')?;
    let rest = rest.strip_suffix(".gz").unwrap_or(rest);
    let rest = if ext.is_empty() {
        rest
    } else {
        rest.strip_suffix(ext)?.strip_suffix('.')?
    };

    let timestamp = rest.get(..BACKUP_TIMESTAMP_LEN)?;
    let timestamp = NaiveDateTime::parse_from_str(timestamp, BACKUP_TIMESTAMP).ok()?;
    let counter = match &rest[BACKUP_TIMESTAMP_LEN..] {
        "" => 0,
        tail => {
            let digits = tail.strip_prefix('-')?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.parse().ok()?
        }
    };
    Some((timestamp, counter))
}

/// Something rotation did, logged once the file lock is released.
enum RotationNote {
    Rotated(PathBuf),
    Compressed(PathBuf, PathBuf),
    CompressFailed(PathBuf, io::Error),
    Removed(PathBuf),
    RemoveFailed(PathBuf, io::Error),
    CleanupFailed(io::Error),
}

impl RotationNote {
    fn log(self) {
        match self {
            Self::Rotated(path) => info!("Rotated log file {:?}", path),
            Self::Compressed(path, gz_path) => {
                debug!("Compressed log file: {:?} -> {:?}", path, gz_path)
            }
            Self::CompressFailed(path, e) => {
                warn!("Failed to compress log file {:?}: {}", path, e)
            }
            Self::Removed(path) => debug!("Removed old log file: {:?}", path),
            Self::RemoveFailed(path, e) => warn!("Failed to remove old log file {:?}: {}", path, e),
            Self::CleanupFailed(e) => warn!("Failed to clean up rotated log files: {}", e),
        }
    }
}

impl Sink for RotatingFile {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        let len = buf.len() as u64;
        if len > self.max_size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "write length {} exceeds maximum file size {}",
                    len, self.max_size
                ),
            ));
        }

        let mut state = self.state.lock();
        let notes = if state.size + len > self.max_size {
            self.rotate_locked(&mut state)?
        } else {
            Vec::new()
        };

        let result = state.file.write_all(buf);
        if result.is_ok() {
            state.size += len;
        }
        drop(state);

        notes.into_iter().for_each(RotationNote::log);
        result
    }

    fn flush(&self) -> io::Result<()> {
        self.state.lock().file.flush()
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.path)
            .field("max_size", &self.max_size)
            .field("max_backups", &self.max_backups)
            .field("max_age", &self.max_age)
            .field("compress", &self.compress)
            .finish()
    }
}

/// Compress a log file using gzip and remove the original, returning the
/// compressed file's path.
fn compress_log_file(path: &Path) -> io::Result<PathBuf> {
    let gz_path = PathBuf::from(format!("{}.gz", path.display()));

    let content = fs::read(path)?;
    let file = File::create(&gz_path)?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(&content)?;
    encoder.finish()?;

    fs::remove_file(path)?;
    Ok(gz_path)
}
