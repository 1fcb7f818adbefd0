use std::fmt;

use crate::token::Pos;

/// Bytes emitted contiguously from `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub start: u32,
    pub bytes: Vec<u8>,
    /// The `.pos` that opened the block; `None` for the implicit block at 0.
    pub origin: Option<Pos>,
}

impl Block {
    pub fn new(start: u32, origin: Option<Pos>) -> Self {
        Block {
            start,
            bytes: Vec::new(),
            origin,
        }
    }

    /// One past the last address covered, widened so it cannot overflow.
    pub fn end(&self) -> u64 {
        self.start as u64 + self.bytes.len() as u64
    }

    fn overlaps(&self, other: &Block) -> bool {
        !self.bytes.is_empty()
            && !other.bytes.is_empty()
            && (self.start as u64) < other.end()
            && (other.start as u64) < self.end()
    }
}

/// A later block writing over bytes of an earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlap {
    pub earlier: (u64, u64, Option<Pos>),
    pub later: (u64, u64, Option<Pos>),
}

impl fmt::Display for Overlap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (from, to, _) = self.earlier;
        let (start, end, _) = self.later;
        write!(
            f,
            "block 0x{:X}..0x{:X} overwrites some bytes in block from 0x{:X} to 0x{:X}",
            start, end, from, to
        )
    }
}

/// Every pair of non-empty blocks whose address ranges intersect, in emission order.
pub fn overlaps(blocks: &[Block]) -> Vec<Overlap> {
    let mut found = vec![];
    for (idx, later) in blocks.iter().enumerate() {
        for earlier in &blocks[..idx] {
            if earlier.overlaps(later) {
                found.push(Overlap {
                    earlier: (earlier.start as u64, earlier.end(), earlier.origin),
                    later: (later.start as u64, later.end(), later.origin),
                });
            }
        }
    }
    found
}

/// Lay the blocks out into one zero-filled image. Later blocks win where they overlap.
pub fn flatten(blocks: &[Block]) -> Vec<u8> {
    let size = blocks.iter().map(Block::end).max().unwrap_or(0);
    let mut image = vec![0u8; size as usize];
    for block in blocks {
        let start = block.start as usize;
        image[start..start + block.bytes.len()].copy_from_slice(&block.bytes);
    }
    image
}
