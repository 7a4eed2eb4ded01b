use crate::util::{create_with_backoff, open_with_backoff, replace_file_atomic};
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use zstd::stream::read::Decoder;

fn is_zst(path: &Path) -> bool {
    path.extension()
        .map_or(false, |e| e.eq_ignore_ascii_case("zst"))
}

/// A `Read` wrapper that counts file bytes consumed (compressed bytes for
/// `.zst` inputs), so progress tracks the on-disk size.
struct CountingReader<R: Read> {
    inner: R,
    counter: Arc<AtomicU64>,
}
impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.counter.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

/// Stream a JSONL file line-by-line, decoding zstd transparently when the
/// path ends in `.zst`. Decode and callback errors abort the run: the inputs
/// here are the whole dataset, not one shard of many, so a bad line is not
/// skippable. Errors carry the path and 1-based line number.
///
/// `window_log_max(31)` is requested up front to avoid "Frame requires too
/// much memory" on dumps compressed with very large windows.
pub fn for_each_line_cfg(
    path: &Path,
    read_buf_bytes: usize,
    on_line: impl FnMut(&str) -> Result<()>,
) -> Result<()> {
    for_each_line_with_progress_cfg(path, read_buf_bytes, |_| {}, on_line)
}

/// Same as `for_each_line_cfg` but calls `on_progress(delta_bytes_read)` as
/// the underlying file is consumed.
pub fn for_each_line_with_progress_cfg(
    path: &Path,
    read_buf_bytes: usize,
    mut on_progress: impl FnMut(u64),
    mut on_line: impl FnMut(&str) -> Result<()>,
) -> Result<()> {
    let file = open_with_backoff(path).with_context(|| format!("open {}", path.display()))?;
    let counter = Arc::new(AtomicU64::new(0));
    let counted = CountingReader { inner: file, counter: counter.clone() };

    let raw: Box<dyn Read> = if is_zst(path) {
        let mut decoder =
            Decoder::new(counted).with_context(|| format!("zstd init {}", path.display()))?;
        decoder.window_log_max(31)?;
        Box::new(decoder)
    } else {
        Box::new(counted)
    };
    let mut reader = BufReader::with_capacity(read_buf_bytes.max(8 * 1024), raw);

    let mut buf = String::with_capacity(16 * 1024);
    let mut last = 0u64;
    let mut line_no = 0u64;
    loop {
        buf.clear();
        let n = reader
            .read_line(&mut buf)
            .with_context(|| format!("read {} line {}", path.display(), line_no + 1))?;
        if n == 0 {
            let cur = counter.load(Ordering::Relaxed);
            if cur > last {
                on_progress(cur - last);
            }
            break;
        }
        line_no += 1;
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        let cur = counter.load(Ordering::Relaxed);
        if cur > last {
            on_progress(cur - last);
            last = cur;
        }
        if buf.trim().is_empty() {
            continue;
        }
        on_line(&buf).with_context(|| format!("{} line {}", path.display(), line_no))?;
    }
    Ok(())
}

/// Buffered JSONL writer. Create it on a temp path and call `finish_atomic`
/// to promote the completed file.
pub struct JsonlWriter {
    path: PathBuf,
    w: Option<BufWriter<File>>,
}

impl JsonlWriter {
    pub fn create(path: &Path, buf_bytes: usize) -> Result<Self> {
        let f = create_with_backoff(path).with_context(|| format!("create {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            w: Some(BufWriter::with_capacity(buf_bytes.max(8 * 1024), f)),
        })
    }

    /// Serialize one value as a single line.
    pub fn write_value(&mut self, value: &Value) -> Result<()> {
        if let Some(w) = &mut self.w {
            serde_json::to_writer(&mut *w, value)
                .with_context(|| format!("serialize row for {}", self.path.display()))?;
            w.write_all(b"\n")
                .with_context(|| format!("write {}", self.path.display()))?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        if let Some(mut w) = self.w.take() {
            w.flush().with_context(|| format!("flush {}", self.path.display()))?;
        }
        Ok(())
    }

    /// Flushes and atomically promotes the temp file to `final_path`.
    pub fn finish_atomic(mut self, final_path: &Path) -> Result<()> {
        if let Some(mut w) = self.w.take() {
            w.flush().with_context(|| format!("flush {}", self.path.display()))?;
        }
        replace_file_atomic(&self.path, final_path)
    }
}
