//! Export stage: the dashboard artifacts, each computed independently from
//! the enriched table and promoted into `processed_dir` atomically.

use crate::config::PipelineOptions;
use crate::date::{
    day_from_epoch, format_day, hour_from_epoch, iter_days, weekday_from_epoch, WEEKDAY_NAMES,
};
use crate::json_utils::{epoch_of, int_of, key_of, string_of};
use crate::jsonl::for_each_line_with_progress_cfg;
use crate::pipeline::SentimentPipeline;
use crate::progress::{file_size, make_count_progress, make_progress_bar_labeled};
use crate::tokenize::Tokenizer;
use crate::util::{create_with_backoff, init_tracing_once, replace_file_atomic, round_places, tmp_sibling};
use ahash::AHashMap;
use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use time::Date;

/// Comments count toward the positive token sets above this compound score.
const POSITIVE_CUTOFF: f64 = 0.1;
/// And toward the negative sets below this one.
const NEGATIVE_CUTOFF: f64 = -0.1;

const TOP_THREADS_KEEP: usize = 10;
const WORDS_KEEP: usize = 50;
const BIGRAMS_KEEP: usize = 25;
const TRIGRAMS_KEEP: usize = 20;
const AUTHOR_MIN_COMMENTS: u64 = 5;
const AUTHOR_KEEP: usize = 20;

/// The fields the artifacts read, pulled out of one enriched record.
#[derive(Clone, Debug, Default)]
pub struct EnrichedRow {
    pub created_utc: Option<i64>,
    pub compound: Option<f64>,
    pub score: Option<i64>,
    pub author: Option<String>,
    pub body: Option<String>,
    pub post_id: Option<String>,
    pub title: Option<String>,
    pub link_flair_text: Option<String>,
}

impl EnrichedRow {
    /// Ids and labels go through `key_of`, so a value the CSV round trip
    /// re-typed to a number (`"id": 1` vs `"id": "1"`) still lands in the
    /// same group as its string form.
    pub fn from_record(record: &Map<String, Value>) -> Self {
        Self {
            created_utc: record.get("created_utc").and_then(epoch_of),
            compound: record.get("compound").and_then(Value::as_f64),
            score: record.get("score").and_then(int_of),
            author: record.get("author").and_then(key_of),
            body: record.get("body").and_then(string_of),
            post_id: record.get("post_id").and_then(key_of),
            title: record.get("title").and_then(key_of),
            link_flair_text: record.get("link_flair_text").and_then(key_of),
        }
    }
}

#[derive(Clone, Debug, Default)]
struct MeanAccum {
    sum: f64,
    count: u64,
}

impl MeanAccum {
    fn push(&mut self, x: f64) {
        self.sum += x;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Daily average compound. Every calendar day between the first and last
/// observed day appears; days without comments carry null.
fn avg_sentiment_by_day(rows: &[EnrichedRow]) -> Result<Value> {
    let mut days: BTreeMap<Date, MeanAccum> = BTreeMap::new();
    for row in rows {
        let (Some(ts), Some(c)) = (row.created_utc, row.compound) else {
            continue;
        };
        let Some(day) = day_from_epoch(ts) else {
            continue;
        };
        days.entry(day).or_default().push(c);
    }
    let mut out = Vec::new();
    if let (Some(&first), Some(&last)) = (days.keys().next(), days.keys().next_back()) {
        for day in iter_days(first, last) {
            out.push(json!({
                "created_dt": format_day(day),
                "avg_sentiment": days.get(&day).map(MeanAccum::mean),
            }));
        }
    }
    Ok(Value::Array(out))
}

/// Every compound score, in row order, for the histogram.
fn sentiment_distribution(rows: &[EnrichedRow]) -> Result<Value> {
    Ok(Value::Array(
        rows.iter().filter_map(|r| r.compound).map(Value::from).collect(),
    ))
}

/// (compound, score) pairs; rows missing either side are dropped.
fn engagement_scatter(rows: &[EnrichedRow]) -> Result<Value> {
    let mut out = Vec::new();
    for row in rows {
        if let (Some(c), Some(s)) = (row.compound, row.score) {
            out.push(json!({ "compound": c, "score": s }));
        }
    }
    Ok(Value::Array(out))
}

/// Mean compound per flair, flairs ascending. Unflaired comments are not a
/// group of their own; they are dropped.
fn sentiment_by_flair(rows: &[EnrichedRow]) -> Result<Value> {
    let mut groups: BTreeMap<&str, MeanAccum> = BTreeMap::new();
    for row in rows {
        let (Some(flair), Some(c)) = (row.link_flair_text.as_deref(), row.compound) else {
            continue;
        };
        groups.entry(flair).or_default().push(c);
    }
    Ok(Value::Array(
        groups
            .iter()
            .map(|(flair, acc)| json!({ "link_flair_text": flair, "avg_sentiment": acc.mean() }))
            .collect(),
    ))
}

/// Threads ranked by mean compound, best and worst ten. The title is the
/// first non-null title seen in the group; untitled groups are dropped.
fn top_threads(rows: &[EnrichedRow]) -> Result<Value> {
    struct Thread<'a> {
        title: Option<&'a str>,
        acc: MeanAccum,
    }
    let mut groups: BTreeMap<&str, Thread<'_>> = BTreeMap::new();
    for row in rows {
        let (Some(pid), Some(c)) = (row.post_id.as_deref(), row.compound) else {
            continue;
        };
        let thread = groups
            .entry(pid)
            .or_insert_with(|| Thread { title: None, acc: MeanAccum::default() });
        thread.acc.push(c);
        if thread.title.is_none() {
            thread.title = row.title.as_deref();
        }
    }
    // Groups iterate in post id order and the sorts are stable, so equal
    // means rank by id.
    let titled: Vec<(&str, f64)> = groups
        .values()
        .filter_map(|t| Some((t.title?, t.acc.mean())))
        .collect();
    let mut positive = titled.clone();
    positive.sort_by(|a, b| b.1.total_cmp(&a.1));
    let mut negative = titled;
    negative.sort_by(|a, b| a.1.total_cmp(&b.1));
    let rank = |side: &[(&str, f64)]| -> Vec<Value> {
        side.iter()
            .take(TOP_THREADS_KEEP)
            .map(|(title, mean)| json!({ "title": title, "compound": mean }))
            .collect()
    };
    Ok(json!({ "positive": rank(&positive), "negative": rank(&negative) }))
}

/// Ranked frequency object: count descending, ties by key ascending. Relies
/// on `serde_json/preserve_order` keeping insertion order in the output.
fn top_counts(counts: AHashMap<String, u64>, keep: usize) -> Value {
    let mut ranked: Vec<(String, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(keep);
    let mut out = Map::with_capacity(ranked.len());
    for (gram, n) in ranked {
        out.insert(gram, Value::from(n));
    }
    Value::Object(out)
}

fn ngram_frequencies(rows: &[EnrichedRow], tok: &Tokenizer, keep: usize) -> Result<Value> {
    let mut positive: AHashMap<String, u64> = AHashMap::new();
    let mut negative: AHashMap<String, u64> = AHashMap::new();
    for row in rows {
        let (Some(body), Some(c)) = (row.body.as_deref(), row.compound) else {
            continue;
        };
        let bucket = if c > POSITIVE_CUTOFF {
            &mut positive
        } else if c < NEGATIVE_CUTOFF {
            &mut negative
        } else {
            continue;
        };
        for gram in tok.extract(body) {
            *bucket.entry(gram).or_insert(0) += 1;
        }
    }
    Ok(json!({
        "positive": top_counts(positive, keep),
        "negative": top_counts(negative, keep),
    }))
}

fn word_frequencies(rows: &[EnrichedRow]) -> Result<Value> {
    ngram_frequencies(rows, &Tokenizer::words()?, WORDS_KEEP)
}

fn bigram_frequencies(rows: &[EnrichedRow]) -> Result<Value> {
    ngram_frequencies(rows, &Tokenizer::bigrams()?, BIGRAMS_KEEP)
}

fn trigram_frequencies(rows: &[EnrichedRow]) -> Result<Value> {
    ngram_frequencies(rows, &Tokenizer::trigrams()?, TRIGRAMS_KEEP)
}

/// Mean compound per hour of day actually present, hours ascending.
fn hour_sentiment(rows: &[EnrichedRow]) -> Result<Value> {
    let mut hours: BTreeMap<u8, MeanAccum> = BTreeMap::new();
    for row in rows {
        let (Some(ts), Some(c)) = (row.created_utc, row.compound) else {
            continue;
        };
        let Some(hour) = hour_from_epoch(ts) else {
            continue;
        };
        hours.entry(hour).or_default().push(c);
    }
    Ok(Value::Array(
        hours
            .iter()
            .map(|(hour, acc)| json!({ "hour": hour, "compound": acc.mean() }))
            .collect(),
    ))
}

/// Mean compound per weekday present, Monday first.
fn day_sentiment(rows: &[EnrichedRow]) -> Result<Value> {
    let mut days: BTreeMap<u8, MeanAccum> = BTreeMap::new();
    for row in rows {
        let (Some(ts), Some(c)) = (row.created_utc, row.compound) else {
            continue;
        };
        let Some(weekday) = weekday_from_epoch(ts) else {
            continue;
        };
        days.entry(weekday.number_days_from_monday()).or_default().push(c);
    }
    Ok(Value::Array(
        days.iter()
            .map(|(ord, acc)| {
                json!({ "day_of_week": WEEKDAY_NAMES[*ord as usize], "compound": acc.mean() })
            })
            .collect(),
    ))
}

/// Authors with at least `AUTHOR_MIN_COMMENTS` comments, top twenty by mean
/// compound (rounded to 3 before ranking), ties by author ascending.
fn author_sentiment(rows: &[EnrichedRow]) -> Result<Value> {
    #[derive(Default)]
    struct Author {
        acc: MeanAccum,
        score: i64,
    }
    let mut authors: BTreeMap<&str, Author> = BTreeMap::new();
    for row in rows {
        let (Some(author), Some(c)) = (row.author.as_deref(), row.compound) else {
            continue;
        };
        let a = authors.entry(author).or_default();
        a.acc.push(c);
        a.score += row.score.unwrap_or(0);
    }
    let mut ranked: Vec<(&str, f64, u64, i64)> = authors
        .iter()
        .filter(|(_, a)| a.acc.count >= AUTHOR_MIN_COMMENTS)
        .map(|(name, a)| (*name, round_places(a.acc.mean(), 3), a.acc.count, a.score))
        .collect();
    // Stable sort over the ascending author order.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(AUTHOR_KEEP);
    Ok(Value::Array(
        ranked
            .into_iter()
            .map(|(author, avg, count, total)| {
                json!({
                    "author": author,
                    "avg_sentiment": avg,
                    "comment_count": count,
                    "total_score": total,
                })
            })
            .collect(),
    ))
}

type ArtifactFn = fn(&[EnrichedRow]) -> Result<Value>;

/// Every dashboard artifact, by output name (`processed_dir/<name>.json`).
const ARTIFACTS: &[(&str, ArtifactFn)] = &[
    ("avg_sentiment_by_day", avg_sentiment_by_day),
    ("sentiment_distribution", sentiment_distribution),
    ("engagement_scatter", engagement_scatter),
    ("sentiment_by_flair", sentiment_by_flair),
    ("top_threads", top_threads),
    ("word_frequencies", word_frequencies),
    ("bigram_frequencies", bigram_frequencies),
    ("trigram_frequencies", trigram_frequencies),
    ("hour_sentiment", hour_sentiment),
    ("day_sentiment", day_sentiment),
    ("author_sentiment", author_sentiment),
];

/// What the export stage produced: artifacts written and artifacts that
/// failed, with the failure rendered for the report.
#[derive(Clone, Debug, Default)]
pub struct ExportReport {
    pub written: Vec<(&'static str, PathBuf)>,
    pub failed: Vec<(&'static str, String)>,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

fn load_rows(opts: &PipelineOptions) -> Result<Vec<EnrichedRow>> {
    let path = opts.enriched_jsonl_path();
    let pb = opts
        .progress
        .then(|| make_progress_bar_labeled(file_size(&path), Some("Loading enriched table")));
    let mut rows = Vec::new();
    for_each_line_with_progress_cfg(
        &path,
        opts.read_buffer_bytes,
        |delta| {
            if let Some(pb) = &pb {
                pb.inc(delta);
            }
        },
        |line| {
            let record: Map<String, Value> =
                serde_json::from_str(line).context("expected a JSON object")?;
            rows.push(EnrichedRow::from_record(&record));
            Ok(())
        },
    )
    .with_context(|| format!("load {} (run the sentiment stage first)", path.display()))?;
    if let Some(pb) = pb {
        pb.finish_with_message("enriched table loaded");
    }
    Ok(rows)
}

fn write_artifact(opts: &PipelineOptions, name: &str, value: &Value) -> Result<PathBuf> {
    let path = opts.processed_dir.join(format!("{name}.json"));
    let tmp = tmp_sibling(&path);
    let file = create_with_backoff(&tmp).with_context(|| format!("create {}", tmp.display()))?;
    let mut w = BufWriter::with_capacity(opts.write_buffer_bytes.max(8 * 1024), file);
    serde_json::to_writer(&mut w, value).with_context(|| format!("serialize {name}"))?;
    w.flush().with_context(|| format!("flush {}", tmp.display()))?;
    drop(w);
    replace_file_atomic(&tmp, &path)?;
    Ok(path)
}

impl SentimentPipeline {
    /// Stage 3: compute each dashboard artifact from the enriched table and
    /// write it under `processed_dir`. Artifacts are independent; a failure
    /// is recorded in the report and the rest still run.
    pub fn export_artifacts(&self) -> Result<ExportReport> {
        init_tracing_once();
        let opts = &self.opts;
        fs::create_dir_all(&opts.processed_dir)
            .with_context(|| format!("create dir {}", opts.processed_dir.display()))?;
        let rows = load_rows(opts)?;
        tracing::info!(rows = rows.len(), "export: enriched table loaded");

        let pb = opts
            .progress
            .then(|| make_count_progress(ARTIFACTS.len() as u64, "Exporting artifacts"));
        let mut report = ExportReport::default();
        for &(name, compute) in ARTIFACTS {
            match compute(&rows).and_then(|value| write_artifact(opts, name, &value)) {
                Ok(path) => {
                    tracing::info!(artifact = name, path = %path.display(), "export: written");
                    report.written.push((name, path));
                }
                Err(e) => {
                    let reason = format!("{e:#}");
                    tracing::error!(artifact = name, reason = %reason, "export: failed");
                    report.failed.push((name, reason));
                }
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }
        if let Some(pb) = pb {
            pb.finish_with_message("artifacts exported");
        }
        Ok(report)
    }
}
