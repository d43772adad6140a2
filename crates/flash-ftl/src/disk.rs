//! Page-mapped flash translation layer.
//!
//! [`FtlDisk`] presents a block-addressed disk on top of a [`FlashDrive`]. Each disk block is
//! mapped to one flash page. Overwriting a block programs a fresh page and leaves the old one
//! stale; when the drive runs out of free pages, stale pages are reclaimed by erasing the block
//! that holds the most of them, relocating its still-valid pages first. Ties between candidate
//! blocks are broken towards the lowest erase count to level wear.

use log::debug;

use crate::flash::{FlashDrive, FlashStats};

/// Counters of disk operations performed since the disk was created.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiskStats {
    /// Number of completed disk block reads.
    pub reads: u64,
    /// Number of completed disk block writes.
    pub writes: u64,
}

/// Information about the disk and the flash drive underneath it.
#[derive(Debug, PartialEq, Eq)]
pub struct FtlInfo {
    /// Number of addressable disk blocks.
    pub disk_blocks: usize,
    /// Total number of flash pages.
    pub flash_pages: usize,
    /// Number of pages per flash block.
    pub pages_per_block: usize,
    /// Number of flash pages holding no data.
    pub free_pages: usize,
    /// Number of flash pages holding current data of some disk block.
    pub valid_pages: usize,
    /// Number of flash pages holding outdated data awaiting reclamation.
    pub stale_pages: usize,
}

/// An error type to be returned on invalid disk layout.
#[derive(Debug, Clone)]
pub struct InvalidFtlLayoutError {
    /// Reason of failure.
    pub error: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageState {
    Free,
    Valid,
    Stale,
}

///////////////////////////////////////////////////////////////////////////////

/// A disk backed by flash through a page-level translation table.
///
/// Disk state includes the forward and reverse block-to-page mappings, per-page states,
/// per-flash-block erase counts and operation counters.
pub struct FtlDisk {
    flash: FlashDrive,
    disk_blocks: usize,
    disk_to_flash: Vec<Option<usize>>,
    flash_to_disk: Vec<Option<usize>>,
    erase_count: Vec<u64>,
    page_state: Vec<PageState>,
    stats: DiskStats,
}

impl FtlDisk {
    /// Creates new disk with `disk_blocks` addressable blocks on top of the given flash drive.
    ///
    /// Returns [`InvalidFtlLayoutError`] if the block count is zero or exceeds the number of
    /// flash pages.
    pub fn new(flash: FlashDrive, disk_blocks: usize) -> Result<Self, InvalidFtlLayoutError> {
        if disk_blocks == 0 {
            return Err(InvalidFtlLayoutError {
                error: "disk must have at least one block".to_string(),
            });
        }
        if disk_blocks > flash.npages() {
            return Err(InvalidFtlLayoutError {
                error: format!(
                    "disk of {} blocks does not fit on flash with {} pages",
                    disk_blocks,
                    flash.npages()
                ),
            });
        }
        let npages = flash.npages();
        let nblocks = flash.nblocks();
        Ok(Self {
            flash,
            disk_blocks,
            disk_to_flash: vec![None; disk_blocks],
            flash_to_disk: vec![None; npages],
            erase_count: vec![0; nblocks],
            page_state: vec![PageState::Free; npages],
            stats: DiskStats::default(),
        })
    }

    /// Returns number of addressable disk blocks.
    pub fn disk_blocks(&self) -> usize {
        self.disk_blocks
    }

    /// Returns page size in bytes, which is also the disk block size.
    pub fn page_size(&self) -> usize {
        self.flash.page_size()
    }

    /// Returns counters of performed disk operations.
    pub fn stats(&self) -> DiskStats {
        self.stats
    }

    /// Returns counters of flash operations, including those issued during cleaning.
    pub fn flash_stats(&self) -> FlashStats {
        self.flash.stats()
    }

    /// Returns how many times the given flash block has been erased.
    ///
    /// The block index must be less than the number of flash blocks.
    pub fn erase_count(&self, block: usize) -> u64 {
        self.erase_count[block]
    }

    /// Returns struct with information about the disk.
    pub fn info(&self) -> FtlInfo {
        let mut free_pages = 0;
        let mut valid_pages = 0;
        let mut stale_pages = 0;
        for state in &self.page_state {
            match state {
                PageState::Free => free_pages += 1,
                PageState::Valid => valid_pages += 1,
                PageState::Stale => stale_pages += 1,
            }
        }
        FtlInfo {
            disk_blocks: self.disk_blocks,
            flash_pages: self.flash.npages(),
            pages_per_block: self.flash.pages_per_block(),
            free_pages,
            valid_pages,
            stale_pages,
        }
    }

    /// Reads the current contents of a disk block into `buf`, which must be one page long.
    ///
    /// Reading a block that has never been written is an error.
    pub fn read(&mut self, block: usize, buf: &mut [u8]) -> Result<(), String> {
        self.check_block(block)?;
        let page = self.disk_to_flash[block]
            .ok_or_else(|| format!("block {} is unmapped", block))?;
        self.flash.read(page, buf)?;
        self.stats.reads += 1;
        Ok(())
    }

    /// Writes new contents of a disk block from `data`, which must be one page long.
    ///
    /// The data is programmed into a free flash page and the previously mapped page, if any, is
    /// marked stale. When no free page is left, cleaning runs first; the write fails if it cannot
    /// reclaim any space.
    pub fn write(&mut self, block: usize, data: &[u8]) -> Result<(), String> {
        self.check_block(block)?;
        let page = match self.find_free_page() {
            Some(page) => page,
            None => {
                self.clean()?;
                self.find_free_page()
                    .ok_or_else(|| "no free flash pages after cleaning".to_string())?
            }
        };

        if let Some(old_page) = self.disk_to_flash[block] {
            self.page_state[old_page] = PageState::Stale;
            self.flash_to_disk[old_page] = None;
        }

        self.flash.write(page, data)?;
        self.disk_to_flash[block] = Some(page);
        self.flash_to_disk[page] = Some(block);
        self.page_state[page] = PageState::Valid;
        self.stats.writes += 1;
        Ok(())
    }

    fn check_block(&self, block: usize) -> Result<(), String> {
        if block >= self.disk_blocks {
            return Err(format!(
                "block {} is out of range, disk has {} blocks",
                block, self.disk_blocks
            ));
        }
        Ok(())
    }

    fn find_free_page(&self) -> Option<usize> {
        self.page_state.iter().position(|&s| s == PageState::Free)
    }

    /// Reclaims stale pages by erasing one flash block.
    ///
    /// The victim is the block with the most stale pages, ties broken by the lowest erase count.
    /// Valid pages of the victim are relocated to free pages before the erase.
    fn clean(&mut self) -> Result<(), String> {
        let ppb = self.flash.pages_per_block();
        let mut victim = None;
        let mut max_stale = 0;
        let mut min_erase = u64::MAX;
        for block in 0..self.flash.nblocks() {
            let base = block * ppb;
            let stale = (base..base + ppb)
                .filter(|&page| self.page_state[page] == PageState::Stale)
                .count();
            if stale > 0 && (stale > max_stale || (stale == max_stale && self.erase_count[block] < min_erase)) {
                victim = Some(block);
                max_stale = stale;
                min_erase = self.erase_count[block];
            }
        }
        let victim = victim.ok_or_else(|| "no flash block with stale pages to clean".to_string())?;
        debug!("cleaning: erasing flash block {}", victim);

        let base = victim * ppb;
        let mut relocated = Vec::new();
        for page in base..base + ppb {
            if self.page_state[page] == PageState::Valid {
                let mut data = vec![0; self.flash.page_size()];
                self.flash.read(page, &mut data)?;
                let disk_block = self.flash_to_disk[page]
                    .ok_or_else(|| format!("valid page {} has no reverse mapping", page))?;
                relocated.push((disk_block, data));
                self.page_state[page] = PageState::Stale;
                self.flash_to_disk[page] = None;
            }
        }

        self.flash.erase(victim)?;
        self.erase_count[victim] += 1;
        for page in base..base + ppb {
            self.page_state[page] = PageState::Free;
            self.flash_to_disk[page] = None;
        }

        for (disk_block, data) in relocated {
            let page = self
                .find_free_page()
                .ok_or_else(|| "no free flash pages after erase".to_string())?;
            self.flash.write(page, &data)?;
            self.disk_to_flash[disk_block] = Some(page);
            self.flash_to_disk[page] = Some(disk_block);
            self.page_state[page] = PageState::Valid;
        }
        Ok(())
    }
}
