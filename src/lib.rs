//! Merge Intel HEX firmware images into one page-aligned image.
//!
//! Inputs are decoded into contiguous [`Block`]s, cut into [`Page`]s and collected
//! in a [`PageMap`] where later inputs replace earlier ones a whole page at a time.
//! The map is then written back out as Intel HEX with 16-byte data records.

pub mod block;
pub mod error;
pub mod io;
pub mod ops;
pub mod page;

pub use block::Block;
pub use error::Error;
pub use io::{
    AddressError, BaseAddress, BlockReader, Blocks, ParseError, Record, RecordError, RecordType,
    parse_blocks, read_blocks, write_intel_hex,
};
pub use ops::{MergeError, MergeSummary, PageMap, merge_files, merge_inputs};
pub use page::{
    AlignmentError, ConfigError, DEFAULT_PAGE_SIZE, Page, PageKind, PageSize, is_special_register,
    split_pages,
};
