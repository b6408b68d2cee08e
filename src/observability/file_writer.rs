//! Rotating file writer with size-based rotation and backup retention.
//!
//! This module provides a thread-safe log sink that rotates its file when it
//! would grow past a size threshold, keeping a fixed number of numbered
//! backups. On the device the log lives on the card, so unbounded growth would
//! eat into the music library.

use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::MakeWriter;

/// Maximum file size before rotation (1 MiB).
const MAX_FILE_SIZE_BYTES: u64 = 1024 * 1024;

/// Number of backup files to retain after rotation.
const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// # Rotation Strategy
///
/// 1. Before each write, check whether the write would exceed the limit
/// 2. If so, rotate:
///    - `<name>.2` becomes `<name>.3`, `<name>.1` becomes `<name>.2`, ...
///    - The current file becomes `<name>.1`
///    - A new empty file is opened
/// 3. Backups beyond the retention limit are removed
///
/// The file is opened lazily on first write, so construction never fails.
pub struct RotatingFileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    state: Mutex<WriterState>,
}

#[derive(Default)]
struct WriterState {
    file: Option<File>,
    size: u64,
}

impl RotatingFileWriter {
    /// Creates a writer with the default limits (1 MiB, 3 backups).
    #[must_use]
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    #[must_use]
    pub fn with_limits(file_path: impl Into<PathBuf>, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            file_path: file_path.into(),
            max_bytes,
            max_backups,
            state: Mutex::new(WriterState::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Appends `buf`, rotating first if it would overflow the current file.
    ///
    /// # Errors
    ///
    /// Returns an error if rotation, opening or writing fails.
    pub fn write_chunk(&self, buf: &[u8]) -> io::Result<()> {
        let mut state = self.state.lock();

        if state.file.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?;
            state.size = file.metadata()?.len();
            state.file = Some(file);
        }

        let incoming = buf.len() as u64;
        if state.size > 0 && state.size + incoming > self.max_bytes {
            state.file = None;
            self.rotate_files()?;
            state.file = Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.file_path)?,
            );
            state.size = 0;
        }

        let file = state
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No file available"))?;
        file.write_all(buf)?;
        file.flush()?;
        state.size += incoming;

        Ok(())
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.file_path.clone().into_os_string();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    /// Shifts numbered backups up by one and moves the current file to `.1`.
    fn rotate_files(&self) -> io::Result<()> {
        if self.max_backups == 0 {
            return fs::remove_file(&self.file_path).or_else(ignore_missing);
        }

        fs::remove_file(self.backup_path(self.max_backups)).or_else(ignore_missing)?;
        for index in (1..self.max_backups).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }
        if self.file_path.exists() {
            fs::rename(&self.file_path, self.backup_path(1))?;
        }
        Ok(())
    }
}

fn ignore_missing(e: io::Error) -> io::Result<()> {
    if e.kind() == io::ErrorKind::NotFound {
        Ok(())
    } else {
        Err(e)
    }
}

impl std::fmt::Debug for RotatingFileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .field("max_backups", &self.max_backups)
            .finish_non_exhaustive()
    }
}

/// Borrowed handle handed to the fmt layer for one event.
pub struct RotatingHandle<'a> {
    owner: &'a RotatingFileWriter,
}

impl Write for RotatingHandle<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.owner.write_chunk(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingHandle<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingHandle { owner: self }
    }
}
