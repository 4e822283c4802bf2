use anyhow::{Context, Result};
use chili_hybrid_db::config::AppConfig;
use chili_hybrid_db::store::{HybridStore, SqliteStore};
use chili_hybrid_db::{load_model, read_records, score_record};
use std::fs::File;

/// Append every row of a CSV table to the persisted hybrids table.
///
/// Usage: import-hybrids <file.csv>
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args()
        .nth(1)
        .context("Usage: import-hybrids <file.csv>")?;

    let config = AppConfig::load()?;
    let store = SqliteStore::new(&config.database_url(), config.max_connections()).await?;
    store.migrate().await?;

    let file = File::open(&path).with_context(|| format!("Failed to open {}", path))?;
    let records = read_records(file).with_context(|| format!("Failed to parse {}", path))?;

    let model = load_model(&config.model_path());

    let total = records.len();
    println!("Importing {} hybrids from {}", total, path);

    for (i, mut record) in records.into_iter().enumerate() {
        if record.ai_success_score.is_none() {
            record.ai_success_score = Some(score_record(&record, model.as_deref()));
        }
        let id = store.insert_hybrid(&record).await?;

        if (i + 1) % 100 == 0 || i + 1 == total {
            println!("Imported {}/{} (last id {})", i + 1, total, id);
        }
    }

    println!("Import completed!");
    Ok(())
}
