use anyhow::Result;
use subpulse::SentimentPipeline;

const DATA_ROOT: &str = "./data";
const PROCESSED_ROOT: &str = "./processed";

fn main() -> Result<()> {
    let pipeline = SentimentPipeline::new()
        .data_dir(DATA_ROOT)
        .processed_dir(PROCESSED_ROOT)
        .progress(true);

    let report = pipeline.run_all()?;
    println!("{report}");

    Ok(())
}
