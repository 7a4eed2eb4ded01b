use std::path::{Path, PathBuf};

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct PipelineOptions {
    pub data_dir: PathBuf,              // raw dumps + merged table
    pub processed_dir: PathBuf,         // enriched table + exported artifacts
    pub posts_file: Option<PathBuf>,    // explicit posts dump, skips discovery
    pub comments_file: Option<PathBuf>, // explicit comments dump, skips discovery
    pub merged_csv: Option<PathBuf>,    // override for data_dir/merged.csv
    pub enriched_jsonl: Option<PathBuf>, // override for processed_dir/merged_with_sentiment.json
    pub progress: bool,                 // show progress bars

    // IO tuning
    pub read_buffer_bytes: usize,  // BufReader capacity
    pub write_buffer_bytes: usize, // BufWriter capacity
}

impl Default for PipelineOptions {
    fn default() -> Self {
        // Defaults chosen to be safe but noticeably faster than std defaults.
        // Adjust at runtime via io_* builder methods.
        let default_read = 256 * 1024;
        let default_write = 256 * 1024;

        Self {
            data_dir: PathBuf::from("data"),
            processed_dir: PathBuf::from("processed"),
            posts_file: None,
            comments_file: None,
            merged_csv: None,
            enriched_jsonl: None,
            progress: true,

            read_buffer_bytes: default_read,
            write_buffer_bytes: default_write,
        }
    }
}

impl PipelineOptions {
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_processed_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.processed_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_posts_file(mut self, path: impl AsRef<Path>) -> Self {
        self.posts_file = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn with_comments_file(mut self, path: impl AsRef<Path>) -> Self {
        self.comments_file = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn with_merged_csv(mut self, path: impl AsRef<Path>) -> Self {
        self.merged_csv = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn with_enriched_jsonl(mut self, path: impl AsRef<Path>) -> Self {
        self.enriched_jsonl = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }

    // IO buffers tuning
    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }
    pub fn with_io_write_buffer(mut self, bytes: usize) -> Self {
        self.write_buffer_bytes = bytes.max(8 * 1024);
        self
    }
    pub fn with_io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self {
        self.read_buffer_bytes = read_bytes.max(8 * 1024);
        self.write_buffer_bytes = write_bytes.max(8 * 1024);
        self
    }

    /// Merged table path: the override when set, else `data_dir/merged.csv`.
    pub fn merged_csv_path(&self) -> PathBuf {
        self.merged_csv
            .clone()
            .unwrap_or_else(|| self.data_dir.join("merged.csv"))
    }

    /// Enriched table path: the override when set, else
    /// `processed_dir/merged_with_sentiment.json`.
    pub fn enriched_jsonl_path(&self) -> PathBuf {
        self.enriched_jsonl
            .clone()
            .unwrap_or_else(|| self.processed_dir.join("merged_with_sentiment.json"))
    }
}
