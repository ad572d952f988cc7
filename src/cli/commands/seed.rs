//! Seed reference data command handler

use std::path::Path;

use crate::config::Config;
use crate::db::Store;
use crate::models::seed::SeedData;

pub async fn cmd_seed(config: &Config, file: &Path) -> anyhow::Result<()> {
    let seed = SeedData::load_from_path(file)?;
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let report = store.apply_seed(&seed).await?;

    if report.total() == 0 {
        println!("Nothing to add; all entries from {} already exist.", file.display());
        return Ok(());
    }

    println!("Seeded from {}", file.display());
    println!("{:-<40}", "");
    println!("  Genres:    {}", report.genres);
    println!("  Countries: {}", report.countries);
    println!("  Languages: {}", report.languages);
    println!("  People:    {}", report.people);

    Ok(())
}
