//! Run command implementation

use anyhow::{Context, Result};
use svf_core::TableStatus;
use svf_db::Database;
use svf_engine::Pipeline;

use crate::cli::{GlobalArgs, RunArgs, RunOutput};
use crate::commands::{connect, load_pipeline};

/// Execute the run command
pub async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let pipeline = load_pipeline(global)?;
    let db = connect(global)?;

    if global.verbose {
        eprintln!(
            "[verbose] Running pipeline '{}' ({} tables) against {} ({})",
            pipeline.name,
            pipeline.tables.len(),
            global.target,
            db.db_type()
        );
    }

    let summary = Pipeline::new(&db)
        .run(&pipeline)
        .await
        .context("Pipeline run aborted")?;

    match args.output {
        RunOutput::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        RunOutput::Table => {
            println!("Run {} - pipeline '{}'\n", summary.run_id, summary.pipeline);
            for outcome in &summary.outcomes {
                match &outcome.status {
                    TableStatus::Succeeded { report } => {
                        println!(
                            "  ✓ {} ({} loaded, {} quarantined, {} deduplicated, {} final, {}ms)",
                            outcome.table,
                            report.rows_loaded,
                            report.rows_quarantined(),
                            report.duplicates_removed,
                            report.final_rows,
                            report.duration_ms
                        );
                        for rejection in &report.rejections {
                            if rejection.rows > 0 || global.verbose {
                                println!("      {} × {}", rejection.rows, rejection.reason);
                            }
                        }
                        if report.null_key_rows > 0 {
                            println!(
                                "      ! {} rows with NULL primary key retained",
                                report.null_key_rows
                            );
                        }
                    }
                    TableStatus::Failed { stage, error } => {
                        println!("  ✗ {} failed at {}: {}", outcome.table, stage, error);
                    }
                }
            }
            println!();
            println!(
                "{} succeeded, {} failed, {} rows quarantined",
                summary.succeeded(),
                summary.failed(),
                summary.total_quarantined()
            );
        }
    }

    if !summary.all_succeeded() {
        std::process::exit(1);
    }

    Ok(())
}
