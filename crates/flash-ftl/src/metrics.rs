//! Performance counters table for disk size sweeps.

use std::fmt;

use comfy_table::Table;
use serde::Serialize;

use crate::disk::FtlDisk;

/// Display names of the reported metrics, in report column order.
pub const METRIC_NAMES: [&str; 5] = [
    "Disk Reads",
    "Disk Writes",
    "Flash Reads",
    "Flash Writes",
    "Flash Erases",
];

/// Performance counters measured for one disk size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsRow {
    /// Number of disk blocks this row was measured for.
    pub disk_blocks: u64,
    /// Number of disk block reads.
    pub disk_reads: u64,
    /// Number of disk block writes.
    pub disk_writes: u64,
    /// Number of flash page reads.
    pub flash_reads: u64,
    /// Number of flash page writes.
    pub flash_writes: u64,
    /// Number of flash block erases.
    pub flash_erases: u64,
}

impl MetricsRow {
    /// Snapshots the counters of a disk into a row for the given disk size.
    pub fn from_run(disk_blocks: u64, disk: &FtlDisk) -> Self {
        let disk_stats = disk.stats();
        let flash_stats = disk.flash_stats();
        Self {
            disk_blocks,
            disk_reads: disk_stats.reads,
            disk_writes: disk_stats.writes,
            flash_reads: flash_stats.reads,
            flash_writes: flash_stats.writes,
            flash_erases: flash_stats.erases,
        }
    }

    /// Returns the metric values in [`METRIC_NAMES`] order.
    pub fn values(&self) -> [u64; 5] {
        [
            self.disk_reads,
            self.disk_writes,
            self.flash_reads,
            self.flash_writes,
            self.flash_erases,
        ]
    }
}

/// Ordered collection of [`MetricsRow`], one row per measured disk size.
///
/// Row order matches insertion order. Besides row access, each metric column can be read as a
/// sequence aligned by row index.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsTable {
    rows: Vec<MetricsRow>,
}

impl MetricsTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row.
    pub fn push(&mut self, row: MetricsRow) {
        self.rows.push(row);
    }

    /// Returns number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the rows in insertion order.
    pub fn rows(&self) -> &[MetricsRow] {
        &self.rows
    }

    /// Returns the disk size column.
    pub fn disk_blocks(&self) -> Vec<u64> {
        self.rows.iter().map(|row| row.disk_blocks).collect()
    }

    /// Returns one metric column by its index in [`METRIC_NAMES`].
    pub fn column(&self, metric: usize) -> Vec<u64> {
        self.rows.iter().map(|row| row.values()[metric]).collect()
    }

    /// Returns the row measured for the given disk size, if any.
    pub fn row_for(&self, disk_blocks: u64) -> Option<&MetricsRow> {
        self.rows.iter().find(|row| row.disk_blocks == disk_blocks)
    }
}

impl fmt::Display for MetricsTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut table = Table::new();
        let mut header = vec!["Disk Blocks"];
        header.extend(METRIC_NAMES);
        table.set_header(header);
        for row in &self.rows {
            let mut cells = vec![row.disk_blocks.to_string()];
            cells.extend(row.values().iter().map(|v| v.to_string()));
            table.add_row(cells);
        }
        write!(f, "{}", table)
    }
}
