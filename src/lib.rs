mod config;
mod date;
mod paths;
mod json_utils;
mod jsonl;
mod progress;
mod util;

mod lexicon;
mod sentiment;
mod tokenize;

mod merge;
mod score;
mod export;
mod pipeline;

pub use crate::config::PipelineOptions;
pub use crate::pipeline::{PipelineReport, SentimentPipeline};

pub use crate::export::{EnrichedRow, ExportReport};
pub use crate::merge::{ColumnStats, MergeSummary};

// Expose the analyzer and tokenizer for application code.
pub use crate::sentiment::{SentimentIntensityAnalyzer, SentimentScores};
pub use crate::tokenize::{Tokenizer, TokenizerCfg, STOPWORDS_BASIC, STOPWORDS_EXTENDED};

// Expose JSONL streaming so binaries can read the enriched table directly.
pub use crate::jsonl::{for_each_line_cfg, JsonlWriter};
