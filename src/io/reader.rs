use std::str::Lines;

use super::{AddressError, ParseError, Record, RecordType};
use crate::Block;

/// Base applied to the 16-bit offset of every Data record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseAddress {
    Offset(u32),
    /// A Start Segment Address record was seen; no further data may follow.
    Poisoned,
}

impl Default for BaseAddress {
    fn default() -> Self {
        Self::Offset(0)
    }
}

/// Coalesces decoded records into contiguous [`Block`]s.
///
/// Each call to [`feed`](Self::feed) applies one record and returns the block it
/// completed, if any. Call [`finish`](Self::finish) at end of input to collect the
/// block still being built.
#[derive(Debug, Default)]
pub struct BlockReader {
    current: Option<Block>,
    base: BaseAddress,
}

impl BlockReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_address(&self) -> BaseAddress {
        self.base
    }

    pub fn current_block(&self) -> Option<&Block> {
        self.current.as_ref()
    }

    pub fn feed(&mut self, record: Record) -> Result<Option<Block>, AddressError> {
        match record.record_type {
            RecordType::Data => self.feed_data(record.address, record.data),
            RecordType::EndOfFile => Ok(None),
            RecordType::ExtendedSegmentAddress => {
                let segment = record.address_value()?;
                self.base = BaseAddress::Offset((segment as u32) << 4);
                Ok(self.current.take())
            }
            RecordType::StartSegmentAddress => {
                self.base = BaseAddress::Poisoned;
                Ok(None)
            }
            RecordType::ExtendedLinearAddress => {
                let upper = record.address_value()?;
                self.base = BaseAddress::Offset((upper as u32) << 16);
                Ok(self.current.take())
            }
        }
    }

    pub fn finish(self) -> Option<Block> {
        self.current
    }

    fn feed_data(&mut self, offset: u16, data: Vec<u8>) -> Result<Option<Block>, AddressError> {
        let BaseAddress::Offset(base) = self.base else {
            return Err(AddressError::BasePoisoned);
        };
        if data.is_empty() {
            return Ok(None);
        }

        let overflow = || AddressError::Overflow {
            base,
            offset,
            len: data.len(),
        };
        let address = base.checked_add(offset as u32).ok_or_else(overflow)?;
        if address as u64 + data.len() as u64 > 1 << 32 {
            return Err(overflow());
        }

        match &mut self.current {
            Some(block) if block.is_followed_by(address) => {
                block.extend(&data);
                Ok(None)
            }
            Some(block) => Ok(Some(std::mem::replace(block, Block::new(address, data)))),
            None => {
                self.current = Some(Block::new(address, data));
                Ok(None)
            }
        }
    }
}

/// Lazily decodes Intel HEX text into blocks. Stops after the first error.
#[derive(Debug)]
pub struct Blocks<'a> {
    lines: std::iter::Enumerate<Lines<'a>>,
    reader: Option<BlockReader>,
}

impl<'a> Blocks<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            reader: Some(BlockReader::new()),
        }
    }
}

impl Iterator for Blocks<'_> {
    type Item = Result<Block, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;

        for (index, line) in self.lines.by_ref() {
            let line_num = index + 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let step = Record::decode(line)
                .map_err(|source| ParseError::Record {
                    line: line_num,
                    source,
                })
                .and_then(|record| {
                    reader.feed(record).map_err(|source| ParseError::Address {
                        line: line_num,
                        source,
                    })
                });

            match step {
                Ok(Some(block)) => return Some(Ok(block)),
                Ok(None) => {}
                Err(e) => {
                    self.reader = None;
                    return Some(Err(e));
                }
            }
        }

        self.reader.take().and_then(BlockReader::finish).map(Ok)
    }
}

impl std::iter::FusedIterator for Blocks<'_> {}

pub fn read_blocks(text: &str) -> Blocks<'_> {
    Blocks::new(text)
}

/// Parse a whole Intel HEX image into its blocks, in file order.
pub fn parse_blocks(input: &[u8]) -> Result<Vec<Block>, ParseError> {
    let text = std::str::from_utf8(input).map_err(|e| ParseError::InvalidUtf8 {
        offset: e.valid_up_to(),
    })?;
    read_blocks(text).collect()
}
