//! Rejections command implementation

use anyhow::{Context, Result};
use svf_db::Database;
use svf_engine::audit::AUDIT_TABLE;
use svf_engine::AuditStore;

use crate::cli::{GlobalArgs, RejectionsArgs};
use crate::commands::connect;

/// Execute the rejections command
pub async fn execute(args: &RejectionsArgs, global: &GlobalArgs) -> Result<()> {
    let db = connect(global)?;

    if !db
        .relation_exists(AUDIT_TABLE)
        .await
        .context("Failed to inspect the audit store")?
    {
        println!("No rejections recorded (the audit store does not exist yet).");
        return Ok(());
    }

    let store = AuditStore::new(&db);
    let entries = store
        .recent(args.limit)
        .await
        .context("Failed to read the audit store")?;

    let entries: Vec<_> = match &args.table {
        Some(table) => entries
            .into_iter()
            .filter(|e| &e.table_name == table)
            .collect(),
        None => entries,
    };

    if entries.is_empty() {
        println!("No rejections recorded.");
        return Ok(());
    }

    if args.json {
        for entry in &entries {
            println!("{}", serde_json::to_string(entry)?);
        }
        return Ok(());
    }

    for entry in &entries {
        println!(
            "{}  {}  [{}]  {}",
            entry.rejected_at, entry.table_name, entry.reason, entry.payload
        );
    }
    println!();
    println!("{} entries shown (newest first)", entries.len());

    Ok(())
}
