#[path = "common/mod.rs"]
mod common;

use common::*;
use std::collections::HashMap;

#[test]
fn merged_table_joins_posts_onto_comments() {
    let base = make_corpus_basic();
    let summary = pipeline_at(&base).merge_to_csv().unwrap();

    assert_eq!(summary.comment_rows, 3);
    assert_eq!(summary.posts_indexed, 2);
    assert_eq!(summary.matched_rows, 3);
    assert_eq!(
        summary.columns,
        vec![
            "id", "link_id", "author", "body", "score", "created_utc", "post_id", "id_post",
            "title", "link_flair_text", "score_post", "created_utc_post"
        ]
    );
    assert_eq!(
        summary.comment_time_range,
        Some(("2024-06-01T01:00:00Z".into(), "2024-06-02T02:40:00Z".into()))
    );
    let nulls: HashMap<_, _> = summary.null_counts.iter().cloned().collect();
    assert_eq!(nulls["link_flair_text"], 1);
    assert_eq!(nulls["body"], 0);
    assert!(summary.numeric.iter().any(|s| s.column == "score" && s.count == 3));

    let (headers, rows) = read_csv_table(&base.join("data").join("merged.csv"));
    assert_eq!(headers, summary.columns);
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows[0],
        vec![
            "c1",
            "t3_1",
            "alice",
            "great episode!",
            "42",
            "1717203600",
            "1",
            "1",
            "Season finale discussion",
            "Discussion",
            "183",
            "1717196400"
        ]
    );
    // the unflaired post joins with an empty flair cell, not a missing row
    assert_eq!(rows[2][8], "Weekly free talk");
    assert_eq!(rows[2][9], "");
}

#[test]
fn unmatched_comments_keep_empty_post_cells() {
    let base = make_corpus_with_orphan();
    let summary = pipeline_at(&base).merge_to_csv().unwrap();
    assert_eq!(summary.comment_rows, 4);
    assert_eq!(summary.matched_rows, 3);

    let (headers, rows) = read_csv_table(&base.join("data").join("merged.csv"));
    let col = |name: &str| headers.iter().position(|h| h == name).unwrap();
    let orphan = &rows[3];
    assert_eq!(orphan[col("post_id")], "zzz");
    for post_col in ["id_post", "title", "link_flair_text", "score_post", "created_utc_post"] {
        assert_eq!(orphan[col(post_col)], "", "{post_col} should be empty");
    }
}

#[test]
fn explicit_paths_override_discovery() {
    let base = tempfile::tempdir().unwrap().into_path();
    let posts = base.join("inputs").join("dump_a.jsonl");
    let comments = base.join("inputs").join("dump_b.jsonl");
    write_jsonl_lines(&posts, &basic_posts());
    write_jsonl_lines(&comments, &basic_comments());

    let summary = pipeline_at(&base)
        .posts_file(&posts)
        .comments_file(&comments)
        .merge_to_csv()
        .unwrap();
    assert_eq!(summary.comment_rows, 3);
    assert_eq!(summary.matched_rows, 3);
}

#[test]
fn discovery_demands_exactly_one_dump_per_kind() {
    let base = tempfile::tempdir().unwrap().into_path();
    std::fs::create_dir_all(base.join("data")).unwrap();
    let err = pipeline_at(&base).merge_to_csv().unwrap_err();
    assert!(err.to_string().contains("no posts dump"), "{err}");

    let base = make_corpus_basic();
    write_jsonl_lines(&base.join("data").join("extra_comments.jsonl"), &basic_comments());
    let err = pipeline_at(&base).merge_to_csv().unwrap_err();
    assert!(err.to_string().contains("ambiguous comments dumps"), "{err}");
}

#[test]
fn zst_dumps_decode_transparently() {
    let base = make_corpus_zst();
    let summary = pipeline_at(&base).merge_to_csv().unwrap();
    assert_eq!(summary.comment_rows, 3);
    assert_eq!(summary.matched_rows, 3);
}

#[test]
fn numeric_post_ids_still_join() {
    let base = make_corpus_numeric_ids();
    let summary = pipeline_at(&base).merge_to_csv().unwrap();
    assert_eq!(summary.matched_rows, 3);

    let (headers, rows) = read_csv_table(&base.join("data").join("merged.csv"));
    let col = |name: &str| headers.iter().position(|h| h == name).unwrap();
    assert_eq!(rows[0][col("post_id")], "1");
    assert_eq!(rows[0][col("id_post")], "1");
    assert_eq!(rows[0][col("title")], "Season finale discussion");
}

#[test]
fn malformed_dump_lines_are_fatal() {
    let base = make_corpus_basic();
    let mut lines = basic_comments();
    lines.insert(1, "{not json".to_string());
    write_jsonl_lines(&base.join("data").join("r_testsub_comments.jsonl"), &lines);

    let err = pipeline_at(&base).merge_to_csv().unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("line 2"), "{chain}");
}
