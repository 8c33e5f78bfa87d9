use std::fmt;

use serde::Serialize;

use crate::{Error, Result, OFFSET_BITS, PAGE_COUNT, PAGE_SIZE};

const OFFSET_MASK: usize = PAGE_SIZE - 1;
const ADDRESS_MASK: usize = (PAGE_COUNT << OFFSET_BITS) - 1;

/// A 12-bit virtual address split into page number and offset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Address {
    pub vpn: usize,
    pub offset: usize,
    pub full: usize,
}

impl Address {
    pub fn new(vpn: usize, offset: usize) -> Result<Self> {
        if vpn >= PAGE_COUNT {
            return Err(Error::PageOutOfRange(vpn));
        }
        if offset >= PAGE_SIZE {
            return Err(Error::OffsetOutOfRange(offset));
        }

        Ok(Address {
            vpn,
            offset,
            full: (vpn << OFFSET_BITS) | offset,
        })
    }

    /// Splits a raw address, dropping anything above the low 12 bits.
    pub fn from_full(full: usize) -> Self {
        let full = full & ADDRESS_MASK;

        Address {
            vpn: full >> OFFSET_BITS,
            offset: full & OFFSET_MASK,
            full,
        }
    }

    /// Physical address of this access once the page lives in `frame`.
    pub fn physical(&self, frame: usize) -> usize {
        (frame << OFFSET_BITS) | self.offset
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#05X} (vpn {}, offset {})", self.full, self.vpn, self.offset)
    }
}
