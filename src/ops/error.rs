use thiserror::Error;

use crate::{AlignmentError, PageKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error(transparent)]
    Alignment(#[from] AlignmentError),

    #[error(
        "{kind} at {address:#X} ({len} bytes) overlaps the configuration register window {window_start:#X}..{window_end:#X}"
    )]
    SpecialRegionOverlap {
        kind: PageKind,
        address: u32,
        len: usize,
        window_start: u32,
        window_end: u64,
    },
}
