use serde_json::json;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use subpulse::SentimentPipeline;

// 2024-06-01 00:00:00 UTC, a Saturday.
pub const JUNE_FIRST: i64 = 1_717_200_000;

/// Write a plain JSONL dump with the provided lines.
pub fn write_jsonl_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    for l in lines {
        writeln!(&mut f, "{}", l).unwrap();
    }
}

/// Write a zstd-compressed `.jsonl.zst` dump with the provided lines.
pub fn write_zst_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// Read a JSONL file into a vector of `serde_json::Value` (skips empty lines).
pub fn read_jsonl_values(path: &Path) -> Vec<serde_json::Value> {
    let f = File::open(path).unwrap();
    let r = BufReader::new(f);
    r.lines()
        .map(|l| l.unwrap())
        .filter(|s| !s.is_empty())
        .map(|s| serde_json::from_str(&s).unwrap())
        .collect()
}

/// Parse one whole-file JSON artifact.
pub fn read_json_value(path: &Path) -> serde_json::Value {
    let f = File::open(path).unwrap();
    serde_json::from_reader(BufReader::new(f)).unwrap()
}

/// Read a CSV file into its header and rows of cells.
pub fn read_csv_table(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut rdr = csv::ReaderBuilder::new().from_path(path).unwrap();
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(str::to_string).collect();
    let rows: Vec<Vec<String>> = rdr
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (headers, rows)
}

/// Pipeline wired to the corpus layout under `base`, progress off so test
/// output stays clean.
pub fn pipeline_at(base: &Path) -> SentimentPipeline {
    SentimentPipeline::new()
        .data_dir(base.join("data"))
        .processed_dir(base.join("processed"))
        .progress(false)
}

/// Posts for the basic corpus: id "1" flaired Discussion, id "2" unflaired.
/// Extra fields (`author`, `num_comments`, `subreddit`) ride along the way
/// real dumps carry them; the merge only attaches its fixed post columns.
pub fn basic_posts() -> Vec<String> {
    vec![
        json!({
            "id": "1", "title": "Season finale discussion", "link_flair_text": "Discussion",
            "score": 183, "created_utc": JUNE_FIRST - 3_600, "author": "op_one",
            "num_comments": 2, "subreddit": "testsub"
        })
        .to_string(),
        json!({
            "id": "2", "title": "Weekly free talk", "link_flair_text": null,
            "score": 12, "created_utc": JUNE_FIRST - 1_800, "author": "op_two",
            "num_comments": 1, "subreddit": "testsub"
        })
        .to_string(),
    ]
}

/// Comments for the basic corpus: a positive and a negative one on post 1
/// (Saturday, hours 1 and 2) and a neutral one on post 2 (Sunday 02:40).
pub fn basic_comments() -> Vec<String> {
    vec![
        json!({
            "id": "c1", "link_id": "t3_1", "author": "alice", "body": "great episode!",
            "score": 42, "created_utc": JUNE_FIRST + 3_600
        })
        .to_string(),
        json!({
            "id": "c2", "link_id": "t3_1", "author": "bob", "body": "terrible writing",
            "score": -3, "created_utc": JUNE_FIRST + 7_200
        })
        .to_string(),
        json!({
            "id": "c3", "link_id": "t3_2", "author": "charlie", "body": "ok i guess",
            "score": 1, "created_utc": JUNE_FIRST + 96_000
        })
        .to_string(),
    ]
}

/// Build the basic corpus in a fresh temp dir and return its base. Dumps
/// land under `<base>/data` as `r_testsub_posts.jsonl` and
/// `r_testsub_comments.jsonl`; stage outputs go to `<base>/processed`.
pub fn make_corpus_basic() -> PathBuf {
    let base = tempfile::tempdir().unwrap().into_path();
    write_jsonl_lines(&base.join("data").join("r_testsub_posts.jsonl"), &basic_posts());
    write_jsonl_lines(&base.join("data").join("r_testsub_comments.jsonl"), &basic_comments());
    base
}

/// Basic corpus plus an orphan comment: c4 references post "zzz", which the
/// posts dump does not contain, and carries an empty body.
pub fn make_corpus_with_orphan() -> PathBuf {
    let base = tempfile::tempdir().unwrap().into_path();
    let mut comments = basic_comments();
    comments.push(
        json!({
            "id": "c4", "link_id": "t3_zzz", "author": "dana", "body": "",
            "score": 0, "created_utc": JUNE_FIRST + 10_000
        })
        .to_string(),
    );
    write_jsonl_lines(&base.join("data").join("r_testsub_posts.jsonl"), &basic_posts());
    write_jsonl_lines(&base.join("data").join("r_testsub_comments.jsonl"), &comments);
    base
}

/// Basic corpus with the post ids exported as JSON numbers (`"id": 1`), the
/// way some dump tools write them. Comments still reference "t3_1"/"t3_2".
pub fn make_corpus_numeric_ids() -> PathBuf {
    let base = tempfile::tempdir().unwrap().into_path();
    let posts = vec![
        json!({
            "id": 1, "title": "Season finale discussion", "link_flair_text": "Discussion",
            "score": 183, "created_utc": JUNE_FIRST - 3_600
        })
        .to_string(),
        json!({
            "id": 2, "title": "Weekly free talk", "link_flair_text": null,
            "score": 12, "created_utc": JUNE_FIRST - 1_800
        })
        .to_string(),
    ];
    write_jsonl_lines(&base.join("data").join("r_testsub_posts.jsonl"), &posts);
    write_jsonl_lines(&base.join("data").join("r_testsub_comments.jsonl"), &basic_comments());
    base
}

/// The basic corpus compressed as `.jsonl.zst` dumps.
pub fn make_corpus_zst() -> PathBuf {
    let base = tempfile::tempdir().unwrap().into_path();
    write_zst_lines(&base.join("data").join("r_testsub_posts.jsonl.zst"), &basic_posts());
    write_zst_lines(&base.join("data").join("r_testsub_comments.jsonl.zst"), &basic_comments());
    base
}

/// Comments on June 1 and June 3 only, so the daily series must bridge
/// June 2 with a null.
pub fn make_corpus_gap_day() -> PathBuf {
    let base = tempfile::tempdir().unwrap().into_path();
    let posts = vec![json!({
        "id": "p1", "title": "Megathread", "link_flair_text": "Meta",
        "score": 10, "created_utc": JUNE_FIRST - 3_600
    })
    .to_string()];
    let comments = vec![
        json!({
            "id": "g1", "link_id": "t3_p1", "author": "alice", "body": "love this show",
            "score": 5, "created_utc": JUNE_FIRST + 3_600
        })
        .to_string(),
        json!({
            "id": "g2", "link_id": "t3_p1", "author": "bob", "body": "hate this show",
            "score": 2, "created_utc": JUNE_FIRST + 2 * 86_400 + 3_600
        })
        .to_string(),
    ];
    write_jsonl_lines(&base.join("data").join("r_testsub_posts.jsonl"), &posts);
    write_jsonl_lines(&base.join("data").join("r_testsub_comments.jsonl"), &comments);
    base
}

/// Corpus where "dave" clears the author threshold with five positive
/// comments while "eve" stays below it with four.
pub fn make_corpus_authors() -> PathBuf {
    let base = tempfile::tempdir().unwrap().into_path();
    let posts = vec![json!({
        "id": "p1", "title": "Megathread", "link_flair_text": "Meta",
        "score": 10, "created_utc": JUNE_FIRST - 3_600
    })
    .to_string()];
    let mut comments = Vec::new();
    for i in 0..5i64 {
        comments.push(
            json!({
                "id": format!("d{i}"), "link_id": "t3_p1", "author": "dave",
                "body": "great stuff", "score": 2, "created_utc": JUNE_FIRST + 60 * i
            })
            .to_string(),
        );
    }
    for i in 0..4i64 {
        comments.push(
            json!({
                "id": format!("e{i}"), "link_id": "t3_p1", "author": "eve",
                "body": "awesome work", "score": 1, "created_utc": JUNE_FIRST + 60 * i
            })
            .to_string(),
        );
    }
    write_jsonl_lines(&base.join("data").join("r_testsub_posts.jsonl"), &posts);
    write_jsonl_lines(&base.join("data").join("r_testsub_comments.jsonl"), &comments);
    base
}
