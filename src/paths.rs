use crate::config::PipelineOptions;
use anyhow::{bail, ensure, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Which dump a discovered file holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DumpKind {
    Posts,    // *_posts.jsonl or *_posts.jsonl.zst
    Comments, // *_comments.jsonl or *_comments.jsonl.zst
}

impl DumpKind {
    fn noun(self) -> &'static str {
        match self {
            DumpKind::Posts => "posts",
            DumpKind::Comments => "comments",
        }
    }
}

fn dump_pattern(kind: DumpKind) -> Regex {
    match kind {
        DumpKind::Posts => Regex::new(r"(?i)(^|_)posts\.jsonl(\.zst)?$").unwrap(),
        DumpKind::Comments => Regex::new(r"(?i)(^|_)comments\.jsonl(\.zst)?$").unwrap(),
    }
}

/// Non-recursive scan of `dir` for dumps of one kind, sorted by path.
pub fn discover_dumps(dir: &Path, kind: DumpKind) -> Vec<PathBuf> {
    let re = dump_pattern(kind);
    let mut found = Vec::new();
    if !dir.exists() {
        return found;
    }
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        if let Ok(ent) = entry {
            if let Some(name) = ent.file_name().to_str() {
                if ent.file_type().is_file() && re.is_match(name) {
                    found.push(ent.path().to_path_buf());
                }
            }
        }
    }
    found.sort();
    found
}

/// The resolved pair of input dumps for one run.
#[derive(Clone, Debug)]
pub struct InputFiles {
    pub posts: PathBuf,
    pub comments: PathBuf,
}

/// Resolve both input dumps, preferring explicit overrides over discovery.
/// Discovery demands exactly one candidate per kind; zero or several is an
/// error rather than a guess.
pub fn resolve_inputs(opts: &PipelineOptions) -> Result<InputFiles> {
    let posts = resolve_one(opts.posts_file.as_deref(), &opts.data_dir, DumpKind::Posts)?;
    let comments = resolve_one(opts.comments_file.as_deref(), &opts.data_dir, DumpKind::Comments)?;
    Ok(InputFiles { posts, comments })
}

fn resolve_one(explicit: Option<&Path>, dir: &Path, kind: DumpKind) -> Result<PathBuf> {
    if let Some(path) = explicit {
        ensure!(path.is_file(), "{} file not found: {}", kind.noun(), path.display());
        return Ok(path.to_path_buf());
    }
    let mut found = discover_dumps(dir, kind);
    match found.len() {
        0 => bail!(
            "no {} dump (*_{}.jsonl or *_{}.jsonl.zst) in {}",
            kind.noun(),
            kind.noun(),
            kind.noun(),
            dir.display()
        ),
        1 => Ok(found.remove(0)),
        _ => {
            let names: Vec<String> = found
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect();
            bail!(
                "ambiguous {} dumps in {}: {} (pass one explicitly)",
                kind.noun(),
                dir.display(),
                names.join(", ")
            )
        }
    }
}
