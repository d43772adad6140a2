//! Deterministic read/write workload for measuring FTL behavior across disk sizes.

use log::info;
use rand::prelude::*;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::disk::FtlDisk;
use crate::flash::{FlashDrive, FlashSpec};
use crate::metrics::{MetricsRow, MetricsTable};

/// Workload parameters.
///
/// The same request mix is replayed against a fresh disk for every entry of `disk_blocks`,
/// producing one metrics row per disk size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Disk sizes to measure, in report order.
    pub disk_blocks: Vec<usize>,
    /// Number of pages per flash block.
    pub pages_per_block: usize,
    /// Page size in bytes.
    pub page_size: usize,
    /// Number of spare flash blocks beyond the disk capacity, available for cleaning.
    pub spare_blocks: usize,
    /// Number of read/write requests issued after priming.
    pub requests: u64,
    /// Fraction of requests that are reads.
    pub read_fraction: f64,
    /// Seed for the request generator.
    pub seed: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            disk_blocks: vec![8, 16, 32, 64, 128, 256],
            pages_per_block: 4,
            page_size: 4096,
            spare_blocks: 2,
            requests: 10000,
            read_fraction: 0.8,
            seed: 16,
        }
    }
}

struct DiskRequest {
    block: usize,
    is_read: bool,
}

fn generate_requests(disk_blocks: usize, config: &WorkloadConfig) -> Vec<DiskRequest> {
    let mut rnd = Pcg64::seed_from_u64(config.seed);
    let mut requests = Vec::with_capacity(config.requests as usize);
    for _ in 0..config.requests {
        requests.push(DiskRequest {
            block: rnd.gen_range(0..disk_blocks),
            is_read: rnd.gen_bool(config.read_fraction),
        });
    }
    requests
}

/// Runs the workload for every configured disk size and collects the resulting counters.
pub fn run(config: &WorkloadConfig) -> Result<MetricsTable, String> {
    if !(0.0..=1.0).contains(&config.read_fraction) {
        return Err(format!(
            "read fraction {} is not within [0, 1]",
            config.read_fraction
        ));
    }
    if config.pages_per_block == 0 {
        return Err("pages per block must be positive".to_string());
    }
    let mut table = MetricsTable::new();
    for &disk_blocks in &config.disk_blocks {
        let disk = run_single(disk_blocks, config)?;
        table.push(MetricsRow::from_run(disk_blocks as u64, &disk));
        info!("measured {} disk blocks", disk_blocks);
    }
    Ok(table)
}

fn run_single(disk_blocks: usize, config: &WorkloadConfig) -> Result<FtlDisk, String> {
    let disk_flash_blocks = disk_blocks.div_ceil(config.pages_per_block);
    let npages = (disk_flash_blocks + config.spare_blocks) * config.pages_per_block;
    let mut spec = FlashSpec::default();
    spec.set_npages(npages)
        .set_pages_per_block(config.pages_per_block)
        .set_page_size(config.page_size);
    let flash = FlashDrive::new(spec).map_err(|e| e.error)?;
    let mut disk = FtlDisk::new(flash, disk_blocks).map_err(|e| e.error)?;

    // Prime every block so that reads never hit an unmapped block.
    for block in 0..disk_blocks {
        disk.write(block, &page_data(block, config.page_size))?;
    }

    let mut buf = vec![0; config.page_size];
    for request in generate_requests(disk_blocks, config) {
        if request.is_read {
            disk.read(request.block, &mut buf)?;
        } else {
            disk.write(request.block, &page_data(request.block, config.page_size))?;
        }
    }
    Ok(disk)
}

fn page_data(block: usize, page_size: usize) -> Vec<u8> {
    vec![(block % 251) as u8; page_size]
}
