//! Seed command implementation

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use svf_db::Database;

use crate::cli::{GlobalArgs, SeedArgs};
use crate::commands::connect;

/// Represents a discovered seed file
struct SeedFile {
    /// Name of the seed (filename without .csv extension)
    name: String,
    /// Path to the CSV file
    path: PathBuf,
}

/// Recursively discover CSV files in a directory
fn discover_seeds(dir: &Path, seeds: &mut Vec<SeedFile>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if path.is_dir() {
            discover_seeds(&path, seeds);
        } else if path.extension().is_some_and(|e| e == "csv") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                seeds.push(SeedFile {
                    name: stem.to_string(),
                    path,
                });
            }
        }
    }
}

/// Execute the seed command: load each CSV into bronze.<name>,
/// replacing any previous load of the same file.
pub async fn execute(args: &SeedArgs, global: &GlobalArgs) -> Result<()> {
    let dir = Path::new(&args.dir);
    let mut all_seeds = Vec::new();
    discover_seeds(dir, &mut all_seeds);
    // Sort seeds by name for consistent ordering
    all_seeds.sort_by(|a, b| a.name.cmp(&b.name));

    if all_seeds.is_empty() {
        println!("No CSV files found under {}.", args.dir);
        return Ok(());
    }

    let seeds_to_load: Vec<&SeedFile> = if let Some(filter) = &args.seeds {
        let filter_names: std::collections::HashSet<&str> =
            filter.split(',').map(|s| s.trim()).collect();
        all_seeds
            .iter()
            .filter(|s| filter_names.contains(s.name.as_str()))
            .collect()
    } else {
        all_seeds.iter().collect()
    };

    if seeds_to_load.is_empty() {
        println!("No matching seed files found.");
        return Ok(());
    }

    let db = connect(global)?;
    db.create_schema_if_not_exists("bronze")
        .await
        .context("Failed to create bronze schema")?;

    if global.verbose {
        eprintln!(
            "[verbose] Loading {} seeds from {} into {}",
            seeds_to_load.len(),
            args.dir,
            global.target
        );
    }

    println!("Loading {} seeds...\n", seeds_to_load.len());

    let mut success_count = 0;
    let mut failure_count = 0;
    let mut total_rows: usize = 0;

    for seed in &seeds_to_load {
        let table = format!("bronze.{}", seed.name);
        let path_str = seed.path.display().to_string();

        match db.load_csv(&table, &path_str).await {
            Ok(()) => {
                let row_count = db
                    .query_count(&format!("SELECT * FROM bronze.\"{}\"", seed.name))
                    .await
                    .unwrap_or(0);

                success_count += 1;
                total_rows += row_count;
                println!("  ✓ {} ({} rows)", table, row_count);
            }
            Err(e) => {
                failure_count += 1;
                println!("  ✗ {} - {}", table, e);
            }
        }
    }

    println!();
    println!("Loaded {} seeds ({} total rows)", success_count, total_rows);

    if failure_count > 0 {
        std::process::exit(1);
    }

    Ok(())
}
