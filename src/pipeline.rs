use crate::config::PipelineOptions;
use crate::export::ExportReport;
use crate::merge::MergeSummary;
use anyhow::{bail, Result};
use std::fmt;
use std::path::Path;

/// Entry point. Configure with the builder methods, then run the stages
/// one at a time or `run_all` for the whole pipeline. Stages hand data to
/// each other through completed files, so each can also be re-run alone.
#[derive(Clone)]
pub struct SentimentPipeline {
    pub(crate) opts: PipelineOptions,
}

impl Default for SentimentPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentPipeline {
    pub fn new() -> Self {
        Self { opts: PipelineOptions::default() }
    }

    // -------- Builder methods --------
    pub fn data_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_data_dir(dir); self }
    pub fn processed_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_processed_dir(dir); self }
    pub fn posts_file(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_posts_file(path); self }
    pub fn comments_file(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_comments_file(path); self }
    pub fn merged_csv(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_merged_csv(path); self }
    pub fn enriched_jsonl(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_enriched_jsonl(path); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn io_read_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_read_buffer(bytes); self }
    pub fn io_write_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_write_buffer(bytes); self }
    pub fn io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self { self.opts = self.opts.with_io_buffers(read_bytes, write_bytes); self }

    /// Merge, score, and export, in order. Any stage error propagates; a
    /// non-empty artifact failure list is an error too, after the healthy
    /// artifacts have been written.
    pub fn run_all(&self) -> Result<PipelineReport> {
        let merge = self.merge_to_csv()?;
        let scored = self.attach_sentiment()?;
        let export = self.export_artifacts()?;
        if !export.is_success() {
            let detail: Vec<String> = export
                .failed
                .iter()
                .map(|(name, reason)| format!("{name}: {reason}"))
                .collect();
            bail!("{} artifact(s) failed: {}", export.failed.len(), detail.join("; "));
        }
        Ok(PipelineReport { merge, scored, export })
    }
}

/// Everything `run_all` produced, for the binary's closing report.
#[derive(Clone, Debug)]
pub struct PipelineReport {
    pub merge: MergeSummary,
    pub scored: u64,
    pub export: ExportReport,
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "scored {} comments", self.scored)?;
        writeln!(f, "artifacts written:")?;
        for (name, path) in &self.export.written {
            writeln!(f, "  {name}: {}", path.display())?;
        }
        Ok(())
    }
}
