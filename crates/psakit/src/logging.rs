use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Maximum log file size before rotation (5 MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Size to keep after rotation (1 MB of most recent logs)
const KEEP_SIZE: u64 = 1024 * 1024;

/// Rotate the log file if it exceeds `max_size`, keeping the last `keep` bytes
/// starting at a line boundary.
fn rotate_log_if_needed(log_path: &Path, max_size: u64, keep: u64) -> io::Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let file_size = fs::metadata(log_path)?.len();
    if file_size <= max_size {
        return Ok(());
    }

    let mut file = File::open(log_path)?;
    file.seek(SeekFrom::Start(file_size.saturating_sub(keep)))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    drop(file);

    // Skip to the first newline to avoid partial lines
    let skip = buffer
        .iter()
        .position(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0);

    let mut file = File::create(log_path)?;
    file.write_all(b"--- Log rotated (older entries removed) ---\n")?;
    file.write_all(&buffer[skip..])?;
    Ok(())
}

/// Hands out writers to one shared log file
#[derive(Clone)]
struct LogWriterFactory {
    file: Arc<Mutex<File>>,
}

impl LogWriterFactory {
    fn new(file: File) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }
}

struct LogWriter {
    file: Arc<Mutex<File>>,
}

impl LogWriter {
    fn with_file<T>(&self, f: impl FnOnce(&mut File) -> io::Result<T>) -> io::Result<T> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        f(&mut file)
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_file(|file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_file(|file| file.flush())
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            file: self.file.clone(),
        }
    }
}

/// Initialize logging to stderr, or to `log_file` when given.
///
/// A log file is appended to with size-based rotation: once it exceeds 5MB,
/// older entries are removed keeping only the last 1MB. The level can be
/// overridden with the `RUST_LOG` environment variable.
pub fn init_logging(log_file: Option<&Path>, level: &str) -> color_eyre::Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)?;
            }
            if let Err(e) = rotate_log_if_needed(path, MAX_LOG_SIZE, KEEP_SIZE) {
                eprintln!("Warning: Failed to rotate log file: {}", e);
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_writer(LogWriterFactory::new(file))
                    .with_ansi(false)
                    .with_target(true),
            )
        }
        None => None,
    };
    let stderr_layer = log_file
        .is_none()
        .then(|| fmt::layer().with_writer(io::stderr).with_target(false));

    let default_filter = format!("psakit={level},psakit_core=warn");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    match log_file {
        Some(path) => tracing::debug!(log_path = %path.display(), "logging initialized"),
        None => tracing::debug!("logging initialized"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_small_log_is_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("psakit.log");
        fs::write(&path, "one\ntwo\n").unwrap();

        rotate_log_if_needed(&path, 1024, 4).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_rotation_keeps_whole_recent_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("psakit.log");
        fs::write(&path, "first line\nsecond line\nthird\n").unwrap();

        // Keep the last 10 bytes: "ine\nthird\n" -> drop the partial line
        rotate_log_if_needed(&path, 16, 10).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "--- Log rotated (older entries removed) ---\nthird\n"
        );
    }

    #[test]
    fn test_missing_log_is_fine() {
        let dir = tempdir().unwrap();
        rotate_log_if_needed(&dir.path().join("absent.log"), 16, 10).unwrap();
    }
}
