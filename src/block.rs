/// A contiguous run of bytes starting at `address`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub address: u32,
    pub data: Vec<u8>,
}

impl Block {
    pub fn new(address: u32, data: Vec<u8>) -> Self {
        debug_assert!(
            data.len() <= u32::MAX as usize,
            "block data exceeds u32::MAX bytes"
        );
        Self { address, data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Address one past the last byte, or `None` if that would leave the 32-bit space.
    pub fn next_address(&self) -> Option<u64> {
        let end = self.address as u64 + self.data.len() as u64;
        (end <= 1 << 32).then_some(end)
    }

    /// True if a run starting at `address` continues this block without a gap.
    pub fn is_followed_by(&self, address: u32) -> bool {
        self.next_address() == Some(address as u64)
    }

    pub fn extend(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data);
    }
}
