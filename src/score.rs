//! Sentiment stage: re-type the merged CSV rows, score every body, and write
//! the enriched table as JSONL.

use crate::jsonl::JsonlWriter;
use crate::pipeline::SentimentPipeline;
use crate::progress::{file_size, make_progress_bar_labeled};
use crate::sentiment::SentimentIntensityAnalyzer;
use crate::util::{init_tracing_once, tmp_sibling};
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;

/// CSV cells are untyped text; restore JSON types the way a dataframe reader
/// would infer them. Empty cells are nulls; JSON scalars, arrays and objects
/// parse back to themselves; everything else stays a string.
fn retype_cell(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    let looks_structured = matches!(cell.as_bytes()[0], b'[' | b'{');
    let looks_scalar =
        cell == "true" || cell == "false" || cell == "null" || cell.parse::<f64>().is_ok();
    if looks_structured || looks_scalar {
        if let Ok(v) = serde_json::from_str::<Value>(cell) {
            return v;
        }
    }
    Value::String(cell.to_string())
}

impl SentimentPipeline {
    /// Stage 2: attach `neg`/`neu`/`pos`/`compound` to every merged row and
    /// write `processed_dir/merged_with_sentiment.json` (JSON lines).
    /// Returns the number of rows written. A missing body scores neutral;
    /// the row itself is always kept.
    pub fn attach_sentiment(&self) -> Result<u64> {
        init_tracing_once();
        let opts = &self.opts;
        let analyzer = SentimentIntensityAnalyzer::new()?;

        let merged = opts.merged_csv_path();
        let out = opts.enriched_jsonl_path();
        fs::create_dir_all(&opts.processed_dir)
            .with_context(|| format!("create dir {}", opts.processed_dir.display()))?;

        let mut rdr = csv::ReaderBuilder::new()
            .buffer_capacity(opts.read_buffer_bytes.max(8 * 1024))
            .from_path(&merged)
            .with_context(|| format!("open {} (run the merge stage first)", merged.display()))?;
        let headers: Vec<String> = rdr
            .headers()
            .with_context(|| format!("read header of {}", merged.display()))?
            .iter()
            .map(str::to_string)
            .collect();

        let pb = opts
            .progress
            .then(|| make_progress_bar_labeled(file_size(&merged), Some("Scoring sentiment")));

        let tmp = tmp_sibling(&out);
        let mut writer = JsonlWriter::create(&tmp, opts.write_buffer_bytes)?;
        let mut record = csv::StringRecord::new();
        let mut written = 0u64;
        let mut last_pos = 0u64;
        loop {
            let more = rdr
                .read_record(&mut record)
                .with_context(|| format!("read {}", merged.display()))?;
            if !more {
                break;
            }
            let mut row = Map::with_capacity(headers.len() + 4);
            for (name, cell) in headers.iter().zip(record.iter()) {
                row.insert(name.clone(), retype_cell(cell));
            }
            let body = row.get("body").and_then(Value::as_str).unwrap_or("");
            let scores = analyzer.polarity_scores(body);
            if let Value::Object(fields) = serde_json::to_value(scores)? {
                row.extend(fields);
            }
            writer.write_value(&Value::Object(row))?;
            written += 1;
            if let Some(pb) = &pb {
                let pos = rdr.position().byte();
                pb.inc(pos.saturating_sub(last_pos));
                last_pos = pos;
            }
        }
        writer.finish_atomic(&out)?;
        if let Some(pb) = pb {
            pb.finish_with_message("sentiment attached");
        }
        tracing::info!(rows = written, path = %out.display(), "sentiment: table written");
        Ok(written)
    }
}
