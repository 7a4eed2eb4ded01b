#[path = "common/mod.rs"]
mod common;

use common::*;
use std::fs;

#[test]
fn run_all_produces_dashboard_inputs() {
    let base = make_corpus_basic();
    let report = pipeline_at(&base).run_all().unwrap();

    assert_eq!(report.merge.comment_rows, 3);
    assert_eq!(report.scored, 3);
    assert!(report.export.is_success());
    assert_eq!(report.export.written.len(), 11);

    assert!(base.join("data").join("merged.csv").is_file());
    assert!(base.join("processed").join("merged_with_sentiment.json").is_file());

    let dist = read_json_value(&base.join("processed").join("sentiment_distribution.json"));
    let dist = dist.as_array().unwrap();
    assert_eq!(dist.len(), 3);
    assert!(dist[0].as_f64().unwrap() > 0.0);
    assert!(dist[1].as_f64().unwrap() < 0.0);
    assert_eq!(dist[2], 0.0);

    let scatter = read_json_value(&base.join("processed").join("engagement_scatter.json"));
    let scatter = scatter.as_array().unwrap();
    assert_eq!(scatter.len(), 3);
    assert_eq!(scatter[0]["score"], 42);
    assert_eq!(scatter[1]["score"], -3);

    let text = report.to_string();
    assert!(text.contains("scored 3 comments"), "{text}");
    assert!(text.contains("author_sentiment"), "{text}");
}

#[test]
fn missing_dumps_fail_the_run() {
    let base = tempfile::tempdir().unwrap().into_path();
    assert!(pipeline_at(&base).run_all().is_err());
}

#[test]
fn rerun_reproduces_identical_outputs() {
    let base = make_corpus_basic();
    let pipeline = pipeline_at(&base);
    pipeline.run_all().unwrap();

    let merged = fs::read(base.join("data").join("merged.csv")).unwrap();
    let enriched = fs::read(base.join("processed").join("merged_with_sentiment.json")).unwrap();
    let daily = fs::read(base.join("processed").join("avg_sentiment_by_day.json")).unwrap();

    pipeline.run_all().unwrap();
    assert_eq!(fs::read(base.join("data").join("merged.csv")).unwrap(), merged);
    assert_eq!(
        fs::read(base.join("processed").join("merged_with_sentiment.json")).unwrap(),
        enriched
    );
    assert_eq!(fs::read(base.join("processed").join("avg_sentiment_by_day.json")).unwrap(), daily);
}
