//! In-memory model of a NAND flash drive.
//!
//! The drive is a flat array of fixed-size pages grouped into blocks. Pages are read and written
//! individually, while erasing clears a whole block at once. Every operation is counted, so the
//! drive doubles as a measurement probe for the translation layer built on top of it.

/// Counters of flash operations performed since the drive was created.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlashStats {
    /// Number of completed page reads.
    pub reads: u64,
    /// Number of completed page writes.
    pub writes: u64,
    /// Number of completed block erases.
    pub erases: u64,
}

///////////////////////////////////////////////////////////////////////////////

/// Represents flash drive specification.
///
/// Is filled by user and then passed to [`FlashDrive`] when it is created.
pub struct FlashSpec {
    pub(in crate::flash) npages: usize,
    pub(in crate::flash) pages_per_block: usize,
    pub(in crate::flash) page_size: usize,
}

/// An error type to be returned on invalid [`FlashSpec`].
#[derive(Debug, Clone)]
pub struct InvalidFlashSpecError {
    /// Reason of failure.
    pub error: String,
}

const DEFAULT_FLASH_NPAGES: usize = 1;
const DEFAULT_PAGES_PER_BLOCK: usize = 1;
const DEFAULT_PAGE_SIZE: usize = 1;

impl Default for FlashSpec {
    /// Creates default flash drive specification.
    ///
    /// Number of pages, pages per block and page size are all set to 1.
    ///
    /// After editing spec is passed to [`FlashDrive`].
    fn default() -> Self {
        Self {
            npages: DEFAULT_FLASH_NPAGES,
            pages_per_block: DEFAULT_PAGES_PER_BLOCK,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FlashSpec {
    /// Sets total number of pages.
    pub fn set_npages(&mut self, npages: usize) -> &mut Self {
        self.npages = npages;
        self
    }

    /// Sets number of pages per flash block.
    pub fn set_pages_per_block(&mut self, pages_per_block: usize) -> &mut Self {
        self.pages_per_block = pages_per_block;
        self
    }

    /// Sets page size in bytes.
    pub fn set_page_size(&mut self, page_size: usize) -> &mut Self {
        self.page_size = page_size;
        self
    }
}

///////////////////////////////////////////////////////////////////////////////

/// Represents a flash drive.
///
/// The drive stores page contents and keeps counters of performed operations.
/// It does not track page or block states, this is left to the layer above.
pub struct FlashDrive {
    npages: usize,
    pages_per_block: usize,
    page_size: usize,
    data: Vec<u8>,
    stats: FlashStats,
}

impl FlashDrive {
    /// Creates new flash drive from given spec.
    ///
    /// Returns [`InvalidFlashSpecError`] if any dimension is zero or the page count is not
    /// divisible by the number of pages per block.
    pub fn new(spec: FlashSpec) -> Result<Self, InvalidFlashSpecError> {
        if spec.npages == 0 || spec.pages_per_block == 0 || spec.page_size == 0 {
            return Err(InvalidFlashSpecError {
                error: "flash dimensions must be positive".to_string(),
            });
        }
        if spec.npages % spec.pages_per_block != 0 {
            return Err(InvalidFlashSpecError {
                error: format!(
                    "page count {} is not divisible by pages per block {}",
                    spec.npages, spec.pages_per_block
                ),
            });
        }
        Ok(Self {
            npages: spec.npages,
            pages_per_block: spec.pages_per_block,
            page_size: spec.page_size,
            data: vec![0; spec.npages * spec.page_size],
            stats: FlashStats::default(),
        })
    }

    /// Returns total number of pages.
    pub fn npages(&self) -> usize {
        self.npages
    }

    /// Returns number of pages per flash block.
    pub fn pages_per_block(&self) -> usize {
        self.pages_per_block
    }

    /// Returns number of flash blocks.
    pub fn nblocks(&self) -> usize {
        self.npages / self.pages_per_block
    }

    /// Returns page size in bytes.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns counters of performed operations.
    pub fn stats(&self) -> FlashStats {
        self.stats
    }

    /// Reads one page into `buf`, which must be exactly one page long.
    pub fn read(&mut self, page: usize, buf: &mut [u8]) -> Result<(), String> {
        self.check_page(page)?;
        if buf.len() != self.page_size {
            return Err(format!(
                "buffer size is {} but page size is {}",
                buf.len(),
                self.page_size
            ));
        }
        let offset = page * self.page_size;
        buf.copy_from_slice(&self.data[offset..offset + self.page_size]);
        self.stats.reads += 1;
        Ok(())
    }

    /// Writes one page from `data`, which must be exactly one page long.
    pub fn write(&mut self, page: usize, data: &[u8]) -> Result<(), String> {
        self.check_page(page)?;
        if data.len() != self.page_size {
            return Err(format!(
                "data size is {} but page size is {}",
                data.len(),
                self.page_size
            ));
        }
        let offset = page * self.page_size;
        self.data[offset..offset + self.page_size].copy_from_slice(data);
        self.stats.writes += 1;
        Ok(())
    }

    /// Erases one flash block, zeroing the contents of all its pages.
    pub fn erase(&mut self, block: usize) -> Result<(), String> {
        if block >= self.nblocks() {
            return Err(format!(
                "block {} is out of range, drive has {} blocks",
                block,
                self.nblocks()
            ));
        }
        let offset = block * self.pages_per_block * self.page_size;
        let len = self.pages_per_block * self.page_size;
        self.data[offset..offset + len].fill(0);
        self.stats.erases += 1;
        Ok(())
    }

    fn check_page(&self, page: usize) -> Result<(), String> {
        if page >= self.npages {
            return Err(format!(
                "page {} is out of range, drive has {} pages",
                page, self.npages
            ));
        }
        Ok(())
    }
}
