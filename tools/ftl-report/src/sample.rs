//! Sample performance counters reported for the fixed sweep of disk sizes.

use flash_ftl::metrics::{MetricsRow, MetricsTable};

/// Disk block counts covered by the sample sweep.
pub const SAMPLE_DISK_BLOCKS: [u64; 6] = [8, 16, 32, 64, 128, 256];

const DISK_READS: u64 = 7968;
const DISK_WRITES: u64 = 2096;
const PAGES_PER_BLOCK: u64 = 4;

/// Builds the sample metrics table, one row per entry of [`SAMPLE_DISK_BLOCKS`].
///
/// Read and write counts in this sample do not depend on the disk size, while erases grow with
/// the number of overwritten blocks amortized over the pages of a flash block.
pub fn sample_table() -> MetricsTable {
    let mut table = MetricsTable::new();
    for blocks in SAMPLE_DISK_BLOCKS {
        table.push(MetricsRow {
            disk_blocks: blocks,
            disk_reads: DISK_READS,
            disk_writes: DISK_WRITES,
            flash_reads: DISK_READS,
            flash_writes: DISK_WRITES,
            flash_erases: DISK_WRITES + 2 * blocks / PAGES_PER_BLOCK,
        });
    }
    table
}
