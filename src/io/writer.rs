use super::{Record, RecordError};
use crate::Page;

pub const BYTES_PER_LINE: usize = 16;

const WINDOW: u64 = 0x1_0000;

/// Render pages, in the order given, as an Intel HEX image ending in one EOF record.
///
/// An Extended Linear Address record is emitted whenever the next data line falls
/// outside the current 64 KiB window. Lines never straddle a window boundary.
pub fn write_intel_hex<'a, I>(pages: I) -> Result<Vec<u8>, RecordError>
where
    I: IntoIterator<Item = &'a Page>,
{
    let mut output = Vec::new();
    let mut base: u64 = 0;

    for page in pages {
        let mut address = page.address() as u64;
        let mut remaining = page.data();

        while !remaining.is_empty() {
            if address < base || address - base >= WINDOW {
                let upper = (address >> 16) as u16;
                base = (upper as u64) << 16;
                tracing::trace!("extended linear address {upper:#06X}");
                Record::extended_linear_address(upper).encode_into(&mut output)?;
            }

            let offset = address - base;
            let room = (WINDOW - offset) as usize;
            let len = BYTES_PER_LINE.min(room).min(remaining.len());
            let (chunk, rest) = remaining.split_at(len);
            Record::data(offset as u16, chunk).encode_into(&mut output)?;

            address += chunk.len() as u64;
            remaining = rest;
        }
    }

    Record::end_of_file().encode_into(&mut output)?;
    Ok(output)
}
