//! Merge stage: left-outer join of post metadata onto every comment, written
//! as one flat CSV table. Output rows equal comment rows exactly; a comment
//! whose parent post is absent keeps null post fields.

use crate::config::PipelineOptions;
use crate::json_utils::{epoch_of, key_of};
use crate::jsonl::for_each_line_with_progress_cfg;
use crate::paths::resolve_inputs;
use crate::pipeline::SentimentPipeline;
use crate::progress::{file_size, make_progress_bar_labeled};
use crate::util::{init_tracing_once, replace_file_atomic, tmp_sibling};
use ahash::{AHashMap, AHashSet};
use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Post-side columns attached by the join, in output order.
const POST_COLUMNS: [&str; 5] = ["id", "title", "link_flair_text", "score", "created_utc"];

/// Prefix tagging a comment's parent post in its `link_id` field.
const POST_ID_TAG: &str = "t3_";

static NULL: Value = Value::Null;

/// Post fields carried into the merged table, in `POST_COLUMNS` order.
struct PostFields([Value; 5]);

fn post_fields(record: &Map<String, Value>) -> PostFields {
    PostFields(POST_COLUMNS.map(|name| record.get(name).cloned().unwrap_or(Value::Null)))
}

/// Where each output column's cells come from.
enum ColumnSource {
    Comment(String),
    DerivedPostId,
    Post(usize), // index into POST_COLUMNS
}

/// Output columns: every comment field in first-seen order, the derived
/// `post_id` join key, then the post fields. A post column whose name is
/// already taken gets a `_post` suffix; an existing `post_id` column is
/// overwritten in place by the derived key.
fn column_layout(comments: &[Map<String, Value>]) -> Result<Vec<(String, ColumnSource)>> {
    let mut layout: Vec<(String, ColumnSource)> = Vec::new();
    let mut seen: AHashSet<String> = AHashSet::new();
    for row in comments {
        for name in row.keys() {
            if seen.insert(name.clone()) {
                let source = if name == "post_id" {
                    ColumnSource::DerivedPostId
                } else {
                    ColumnSource::Comment(name.clone())
                };
                layout.push((name.clone(), source));
            }
        }
    }
    if seen.insert("post_id".to_string()) {
        layout.push(("post_id".to_string(), ColumnSource::DerivedPostId));
    }
    for (idx, name) in POST_COLUMNS.iter().enumerate() {
        let out_name = if seen.contains(*name) {
            format!("{name}_post")
        } else {
            (*name).to_string()
        };
        if !seen.insert(out_name.clone()) {
            bail!(
                "cannot attach post column {name:?}: the comments table already has both {name:?} and {out_name:?}"
            );
        }
        layout.push((out_name, ColumnSource::Post(idx)));
    }
    Ok(layout)
}

/// Join key for one comment: `link_id` with the post tag stripped. A
/// `link_id` without the tag is kept verbatim; it simply matches no post.
fn derived_post_id(row: &Map<String, Value>) -> Value {
    match row.get("link_id").and_then(|v| v.as_str()) {
        Some(link) => Value::String(link.strip_prefix(POST_ID_TAG).unwrap_or(link).to_string()),
        None => Value::Null,
    }
}

fn render_cell(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        // numbers and bools print bare; arrays/objects as compact JSON
        other => other.to_string(),
    }
}

#[derive(Clone, Debug, Default)]
struct NumericAccum {
    count: u64,
    sum: f64,
    sum_sq: f64,
    min: f64,
    max: f64,
}

impl NumericAccum {
    fn push(&mut self, x: f64) {
        if self.count == 0 {
            self.min = x;
            self.max = x;
        } else {
            self.min = self.min.min(x);
            self.max = self.max.max(x);
        }
        self.count += 1;
        self.sum += x;
        self.sum_sq += x * x;
    }

    fn stats(&self, column: &str) -> ColumnStats {
        let n = self.count as f64;
        let std = if self.count < 2 {
            None
        } else {
            let var = (self.sum_sq - self.sum * self.sum / n) / (n - 1.0);
            Some(var.max(0.0).sqrt())
        };
        ColumnStats {
            column: column.to_string(),
            count: self.count,
            mean: self.sum / n,
            std,
            min: self.min,
            max: self.max,
        }
    }
}

/// Numeric profile of one output column, over its numeric cells only.
#[derive(Clone, Debug)]
pub struct ColumnStats {
    pub column: String,
    pub count: u64,
    pub mean: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
}

/// Diagnostics for one merge run, printed after the table is written.
#[derive(Clone, Debug)]
pub struct MergeSummary {
    pub comment_rows: u64,
    pub posts_indexed: u64,
    pub matched_rows: u64,
    pub columns: Vec<String>,
    pub null_counts: Vec<(String, u64)>,
    pub numeric: Vec<ColumnStats>,
    /// RFC3339 range of comment `created_utc`, when any was readable.
    pub comment_time_range: Option<(String, String)>,
}

impl fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "merged table: {} rows x {} columns", self.comment_rows, self.columns.len())?;
        writeln!(
            f,
            "matched {} of {} comments against {} indexed posts",
            self.matched_rows, self.comment_rows, self.posts_indexed
        )?;
        if let Some((lo, hi)) = &self.comment_time_range {
            writeln!(f, "comment created_utc range: {lo} .. {hi}")?;
        }
        writeln!(f, "null counts:")?;
        for (name, n) in &self.null_counts {
            writeln!(f, "  {name}: {n}")?;
        }
        if !self.numeric.is_empty() {
            writeln!(f, "numeric columns (count mean std min max):")?;
            for s in &self.numeric {
                let std = s.std.map(|v| format!("{v:.3}")).unwrap_or_else(|| "-".into());
                writeln!(f, "  {}: {} {:.3} {} {} {}", s.column, s.count, s.mean, std, s.min, s.max)?;
            }
        }
        Ok(())
    }
}

fn load_post_index(path: &Path, opts: &PipelineOptions) -> Result<AHashMap<String, PostFields>> {
    let pb = opts
        .progress
        .then(|| make_progress_bar_labeled(file_size(path), Some("Indexing posts")));
    let mut index: AHashMap<String, PostFields> = AHashMap::new();
    let mut skipped = 0u64;
    for_each_line_with_progress_cfg(
        path,
        opts.read_buffer_bytes,
        |delta| {
            if let Some(pb) = &pb {
                pb.inc(delta);
            }
        },
        |line| {
            let record: Map<String, Value> =
                serde_json::from_str(line).context("expected a JSON object")?;
            match record.get("id").and_then(key_of) {
                Some(pid) => {
                    index.insert(pid, post_fields(&record));
                }
                None => skipped += 1,
            }
            Ok(())
        },
    )?;
    if let Some(pb) = pb {
        pb.finish_with_message("posts indexed");
    }
    if skipped > 0 {
        tracing::warn!(skipped, "posts without an id cannot be joined");
    }
    Ok(index)
}

fn load_comments(path: &Path, opts: &PipelineOptions) -> Result<Vec<Map<String, Value>>> {
    let pb = opts
        .progress
        .then(|| make_progress_bar_labeled(file_size(path), Some("Reading comments")));
    let mut rows = Vec::new();
    for_each_line_with_progress_cfg(
        path,
        opts.read_buffer_bytes,
        |delta| {
            if let Some(pb) = &pb {
                pb.inc(delta);
            }
        },
        |line| {
            let record: Map<String, Value> =
                serde_json::from_str(line).context("expected a JSON object")?;
            rows.push(record);
            Ok(())
        },
    )?;
    if let Some(pb) = pb {
        pb.finish_with_message("comments read");
    }
    Ok(rows)
}

fn write_table(
    comments: &[Map<String, Value>],
    posts: &AHashMap<String, PostFields>,
    layout: &[(String, ColumnSource)],
    out_path: &Path,
    write_buf_bytes: usize,
) -> Result<(u64, Vec<(String, u64)>, Vec<ColumnStats>)> {
    if let Some(dir) = out_path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).with_context(|| format!("create dir {}", dir.display()))?;
        }
    }
    let tmp = tmp_sibling(out_path);
    let mut wtr = csv::WriterBuilder::new()
        .buffer_capacity(write_buf_bytes.max(8 * 1024))
        .from_path(&tmp)
        .with_context(|| format!("create {}", tmp.display()))?;
    wtr.write_record(layout.iter().map(|(name, _)| name.as_str()))?;

    let mut nulls = vec![0u64; layout.len()];
    let mut numeric = vec![NumericAccum::default(); layout.len()];
    let mut matched = 0u64;
    let mut cells: Vec<String> = Vec::with_capacity(layout.len());

    for row in comments {
        let post_id = derived_post_id(row);
        let hit = post_id.as_str().and_then(|pid| posts.get(pid));
        if hit.is_some() {
            matched += 1;
        }
        cells.clear();
        for (i, (_, source)) in layout.iter().enumerate() {
            let value: &Value = match source {
                ColumnSource::Comment(name) => row.get(name).unwrap_or(&NULL),
                ColumnSource::DerivedPostId => &post_id,
                ColumnSource::Post(idx) => hit.map(|p| &p.0[*idx]).unwrap_or(&NULL),
            };
            if value.is_null() {
                nulls[i] += 1;
            }
            if let Some(x) = value.as_f64() {
                numeric[i].push(x);
            }
            cells.push(render_cell(value));
        }
        wtr.write_record(&cells)?;
    }
    wtr.flush()?;
    drop(wtr);
    replace_file_atomic(&tmp, out_path)?;

    let null_counts = layout
        .iter()
        .zip(&nulls)
        .map(|((name, _), n)| (name.clone(), *n))
        .collect();
    let stats = layout
        .iter()
        .zip(&numeric)
        .filter(|(_, acc)| acc.count > 0)
        .map(|((name, _), acc)| acc.stats(name))
        .collect();
    Ok((matched, null_counts, stats))
}

impl SentimentPipeline {
    /// Stage 1: resolve the two dumps, index posts by bare id, and write the
    /// left-joined comments table to `data_dir/merged.csv`.
    pub fn merge_to_csv(&self) -> Result<MergeSummary> {
        init_tracing_once();
        let opts = &self.opts;
        let inputs = resolve_inputs(opts)?;
        tracing::info!(
            posts = %inputs.posts.display(),
            comments = %inputs.comments.display(),
            "merge: inputs resolved"
        );

        let posts = load_post_index(&inputs.posts, opts)?;
        let comments = load_comments(&inputs.comments, opts)?;
        let layout = column_layout(&comments)?;

        let out_path = opts.merged_csv_path();
        let (matched, null_counts, numeric) =
            write_table(&comments, &posts, &layout, &out_path, opts.write_buffer_bytes)?;

        let mut ts_range: Option<(i64, i64)> = None;
        for row in &comments {
            if let Some(ts) = row.get("created_utc").and_then(epoch_of) {
                ts_range = Some(match ts_range {
                    None => (ts, ts),
                    Some((lo, hi)) => (lo.min(ts), hi.max(ts)),
                });
            }
        }
        let comment_time_range = ts_range.and_then(|(lo, hi)| {
            let fmt = |t: i64| {
                OffsetDateTime::from_unix_timestamp(t)
                    .ok()
                    .and_then(|dt| dt.format(&Rfc3339).ok())
            };
            Some((fmt(lo)?, fmt(hi)?))
        });

        let summary = MergeSummary {
            comment_rows: comments.len() as u64,
            posts_indexed: posts.len() as u64,
            matched_rows: matched,
            columns: layout.iter().map(|(name, _)| name.clone()).collect(),
            null_counts,
            numeric,
            comment_time_range,
        };
        tracing::info!(
            rows = summary.comment_rows,
            matched = summary.matched_rows,
            path = %out_path.display(),
            "merge: table written"
        );
        print!("{summary}");
        Ok(summary)
    }
}
