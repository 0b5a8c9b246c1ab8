//! Copy every table from one store into another

use crate::db::schema::ALL_TABLES;
use crate::db::store::Store;
use crate::Result;
use tracing::info;

/// Per-table row counts written by a backup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupSummary {
    pub tables: Vec<(&'static str, usize)>,
}

impl BackupSummary {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|(_, n)| n).sum()
    }
}

/// Replace the contents of every table in `target` with the rows of `source`
///
/// Ids are preserved so foreign keys stay valid in the copy.
pub async fn backup_tables(source: &Store, target: &Store) -> Result<BackupSummary> {
    let mut summary = BackupSummary::default();

    // Read everything first so a failing source leaves the target untouched
    let mut snapshot = Vec::with_capacity(ALL_TABLES.len());
    for table in ALL_TABLES {
        snapshot.push((table, source.read_table(table).await?));
    }

    for (table, rows) in snapshot {
        target.clear_table(table).await?;
        for row in &rows {
            target.insert_row_with_id(table, row).await?;
        }
        info!("Backed up {} rows of {}", rows.len(), table.name);
        summary.tables.push((table.name, rows.len()));
    }

    Ok(summary)
}
