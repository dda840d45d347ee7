//! Fixed-size pages, the unit of overwrite precedence when merging.
//!
//! Blocks are cut into pages aligned to the page size. The one exception is the
//! device configuration register window (UICR on nRF parts), where every block must
//! be a single 4-byte register and is keyed by its own address.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use thiserror::Error;

use crate::Block;

pub const SPECIAL_REGION_MASK: u32 = 0xFFFF_F000;
pub const SPECIAL_REGION_BASE: u32 = 0x1000_1000;
pub const SPECIAL_REGION_SIZE: u32 = !SPECIAL_REGION_MASK + 1;
pub const SPECIAL_REGISTER_LEN: usize = 4;

pub const DEFAULT_PAGE_SIZE: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignmentError {
    #[error(
        "page should be aligned to the page size ({page_size:#X}), but is at address {address:#X}"
    )]
    Unaligned { address: u32, page_size: u32 },

    #[error(
        "configuration register at {address:#X} must be exactly 4 bytes at a 4-byte aligned address, got {len} bytes"
    )]
    SpecialRegister { address: u32, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("page size must be non-zero")]
    ZeroPageSize,

    #[error("invalid page size {0:?}")]
    InvalidPageSize(String),
}

/// Page size in bytes. Expected to be a power of two, but only non-zero is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(NonZeroU32);

impl PageSize {
    pub fn new(size: u32) -> Result<Self, ConfigError> {
        NonZeroU32::new(size)
            .map(Self)
            .ok_or(ConfigError::ZeroPageSize)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub fn is_power_of_two(self) -> bool {
        self.0.is_power_of_two()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(NonZeroU32::MIN.saturating_add(DEFAULT_PAGE_SIZE - 1))
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#X}", self.get())
    }
}

impl FromStr for PageSize {
    type Err = ConfigError;

    /// Accepts decimal or `0x`-prefixed hex.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => s.parse(),
        };
        let size = parsed.map_err(|_| ConfigError::InvalidPageSize(s.to_string()))?;
        Self::new(size)
    }
}

pub fn is_special_register(address: u32) -> bool {
    address & SPECIAL_REGION_MASK == SPECIAL_REGION_BASE
}

/// Where a page sits in the merged image.
///
/// Ordinary pages sort before configuration registers, each group by its own number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PageKind {
    Ordinary(u32),
    SpecialRegister(u32),
}

impl PageKind {
    /// Classify a run of `len` bytes at `address`, checking its alignment.
    pub fn classify(address: u32, len: usize, page_size: PageSize) -> Result<Self, AlignmentError> {
        if is_special_register(address) {
            if len != SPECIAL_REGISTER_LEN || address % 4 != 0 {
                return Err(AlignmentError::SpecialRegister { address, len });
            }
            return Ok(Self::SpecialRegister(address));
        }
        if address % page_size.get() != 0 {
            return Err(AlignmentError::Unaligned {
                address,
                page_size: page_size.get(),
            });
        }
        Ok(Self::Ordinary(address / page_size.get()))
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ordinary(number) => write!(f, "page {number}"),
            Self::SpecialRegister(address) => write!(f, "register {address:#010X}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    kind: PageKind,
    block: Block,
}

impl Page {
    pub fn new(block: Block, page_size: PageSize) -> Result<Self, AlignmentError> {
        let kind = PageKind::classify(block.address, block.len(), page_size)?;
        Ok(Self { kind, block })
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn address(&self) -> u32 {
        self.block.address
    }

    pub fn data(&self) -> &[u8] {
        &self.block.data
    }

    pub fn len(&self) -> usize {
        self.block.len()
    }

    pub fn is_empty(&self) -> bool {
        self.block.is_empty()
    }

    pub fn into_block(self) -> Block {
        self.block
    }
}

/// Cut a block into page-aligned pages. A block that already fits one page is kept whole.
pub fn split_pages(block: Block, page_size: PageSize) -> Result<Vec<Page>, AlignmentError> {
    PageKind::classify(block.address, block.len(), page_size)?;

    let size = page_size.get() as usize;
    if block.len() <= size {
        return Ok(vec![Page::new(block, page_size)?]);
    }

    block
        .data
        .chunks(size)
        .enumerate()
        .map(|(i, chunk)| {
            let address = block.address + (i * size) as u32;
            Page::new(Block::new(address, chunk.to_vec()), page_size)
        })
        .collect()
}
