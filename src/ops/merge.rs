use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::ops::AddAssign;
use std::path::Path;

use super::MergeError;
use crate::io::{RecordError, read_hex_file, write_atomically, write_intel_hex};
use crate::page::{SPECIAL_REGION_BASE, SPECIAL_REGION_SIZE};
use crate::{Block, Error, Page, PageKind, PageSize, split_pages};

/// Counters reported by a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub inputs: usize,
    pub blocks: usize,
    pub pages_read: usize,
    /// Pages that replaced an existing page, from an earlier input or the same one.
    pub pages_replaced: usize,
}

impl AddAssign for MergeSummary {
    fn add_assign(&mut self, other: Self) {
        self.inputs += other.inputs;
        self.blocks += other.blocks;
        self.pages_read += other.pages_read;
        self.pages_replaced += other.pages_replaced;
    }
}

/// Pages of the merged image, keyed by [`PageKind`] and iterated in ascending order.
///
/// Inserting a page with an existing key replaces the old page whole; bytes are never
/// merged across inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMap {
    page_size: PageSize,
    pages: BTreeMap<PageKind, Page>,
}

impl PageMap {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            pages: BTreeMap::new(),
        }
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, kind: PageKind) -> Option<&Page> {
        self.pages.get(&kind)
    }

    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    /// Insert `page`, returning the page it replaced.
    ///
    /// Fails if an ordinary page would cover any part of the configuration register
    /// window, since those bytes are tracked under separate keys.
    pub fn insert(&mut self, page: Page) -> Result<Option<Page>, MergeError> {
        let kind = page.kind();
        if let PageKind::Ordinary(_) = kind {
            let start = page.address() as u64;
            let end = start + page.len() as u64;
            let window_start = SPECIAL_REGION_BASE as u64;
            let window_end = window_start + SPECIAL_REGION_SIZE as u64;
            if start < window_end && end > window_start {
                return Err(MergeError::SpecialRegionOverlap {
                    kind,
                    address: page.address(),
                    len: page.len(),
                    window_start: SPECIAL_REGION_BASE,
                    window_end,
                });
            }
        }

        match self.pages.entry(kind) {
            Entry::Occupied(mut slot) => {
                tracing::debug!(%kind, address = page.address(), "replaced an existing page");
                Ok(Some(slot.insert(page)))
            }
            Entry::Vacant(slot) => {
                slot.insert(page);
                Ok(None)
            }
        }
    }

    /// Split every block of one input into pages and insert them in order.
    pub fn merge_blocks<I>(&mut self, blocks: I) -> Result<MergeSummary, MergeError>
    where
        I: IntoIterator<Item = Block>,
    {
        let mut summary = MergeSummary {
            inputs: 1,
            ..Default::default()
        };
        for block in blocks {
            summary.blocks += 1;
            for page in split_pages(block, self.page_size)? {
                summary.pages_read += 1;
                if self.insert(page)?.is_some() {
                    summary.pages_replaced += 1;
                }
            }
        }
        Ok(summary)
    }

    /// Render the map as an Intel HEX image.
    pub fn to_intel_hex(&self) -> Result<Vec<u8>, RecordError> {
        write_intel_hex(self.pages())
    }
}

/// Read each input in order and merge its pages; later inputs win.
pub fn merge_inputs<P: AsRef<Path>>(
    inputs: &[P],
    page_size: PageSize,
) -> Result<(PageMap, MergeSummary), Error> {
    let mut pages = PageMap::new(page_size);
    let mut summary = MergeSummary::default();

    for input in inputs {
        let path = input.as_ref();
        let blocks = read_hex_file(path)?;
        let merged = pages.merge_blocks(blocks).map_err(|source| Error::Merge {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            input = %path.display(),
            blocks = merged.blocks,
            pages = merged.pages_read,
            replaced = merged.pages_replaced,
            "merged input"
        );
        summary += merged;
    }

    Ok((pages, summary))
}

/// Merge `inputs` in order and write the result to `output`.
///
/// Nothing is written unless every input merges cleanly; an existing `output` is
/// replaced in one step.
pub fn merge_files<P: AsRef<Path>>(
    inputs: &[P],
    output: &Path,
    page_size: PageSize,
) -> Result<MergeSummary, Error> {
    let (pages, summary) = merge_inputs(inputs, page_size)?;
    let image = pages.to_intel_hex()?;
    write_atomically(output, &image)?;

    tracing::info!(
        output = %output.display(),
        inputs = summary.inputs,
        pages = pages.len(),
        replaced = summary.pages_replaced,
        "wrote merged image"
    );
    Ok(summary)
}
