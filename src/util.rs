use anyhow::{Context, Result};
use std::fs;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::Duration;

static INIT_ONCE: std::sync::Once = std::sync::Once::new();
pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
    });
}

/// Return true for transient/retriable I/O errors often seen on Windows when
/// filter drivers (AV/backup), USB/NAS volumes, or sharing violations occur.
fn is_retriable_io_error(e: &io::Error) -> bool {
    matches!(
        e.raw_os_error(),
        // 5 access denied, 32 sharing violation, 33 lock violation,
        // 225 AV-blocked, 1117 device I/O error, 21 device not ready
        Some(5) | Some(32) | Some(33) | Some(225) | Some(1117) | Some(21)
    )
}

fn with_backoff<T>(
    tries: usize,
    delay_ms: u64,
    what: &str,
    mut op: impl FnMut() -> io::Result<T>,
) -> io::Result<T> {
    let mut last_err: Option<io::Error> = None;
    for i in 0..tries.max(1) {
        match op() {
            Ok(v) => return Ok(v),
            Err(e) if is_retriable_io_error(&e) => {
                last_err = Some(e);
                sleep(Duration::from_millis(delay_ms.saturating_mul((i + 1) as u64)));
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, format!("{what} failed"))))
}

/// Open a file with retries/backoff for transient errors.
pub fn open_with_backoff(path: &Path) -> io::Result<File> {
    with_backoff(16, 50, "open", || File::open(path))
}

/// Create a file with retries/backoff for transient errors.
pub fn create_with_backoff(path: &Path) -> io::Result<File> {
    with_backoff(16, 50, "create", || File::create(path))
}

/// Atomically replace `dest` with `tmp`. If rename keeps failing (e.g., due
/// to sharing), fall back to copy+remove. Later stages and dashboard readers
/// only ever observe complete files.
pub fn replace_file_atomic(tmp: &Path, dest: &Path) -> Result<()> {
    if dest.exists() {
        with_backoff(20, 50, "remove", || match fs::remove_file(dest) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        })
        .with_context(|| format!("remove {}", dest.display()))?;
    }
    let renamed = with_backoff(20, 50, "rename", || fs::rename(tmp, dest));
    if renamed.is_err() {
        with_backoff(20, 50, "copy", || fs::copy(tmp, dest).map(|_| ()))
            .with_context(|| format!("copy {} -> {}", tmp.display(), dest.display()))?;
        with_backoff(20, 50, "remove", || match fs::remove_file(tmp) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        })
        .with_context(|| format!("remove {}", tmp.display()))?;
    }
    Ok(())
}

/// Sibling temp path for an output file ("<name>.tmp" in the same directory).
pub fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "out".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Half-away-from-zero rounding to a fixed number of decimal places, the
/// convention the exported artifacts use for averages and proportions.
pub fn round_places(x: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (x * factor).round() / factor
}
