//! Toy address translation simulator.
//!
//! Models a tiny MMU (a 4-entry TLB, a 64-entry page table, 8 RAM frames and a
//! simulated disk) and replays each memory access as a queue of small steps,
//! so a presentation layer can animate how a virtual address becomes a
//! physical one.

pub mod address;
pub mod config;
pub mod error;
pub mod mmu;
pub mod page_loader;
pub mod page_replacer;
pub mod page_table;
pub mod player;
pub mod ram;
pub mod snapshot;
pub mod stats;
pub mod step;
pub mod tlb;
pub mod trace;

pub use address::Address;
pub use error::{Error, Result};
pub use mmu::Mmu;
pub use snapshot::Snapshot;
pub use step::{Component, Step, StepReport};

/// Width of the page offset, in bits.
pub const OFFSET_BITS: usize = 6;
/// Bytes per page (and per frame).
pub const PAGE_SIZE: usize = 1 << OFFSET_BITS;
/// Number of virtual pages, i.e. page table entries.
pub const PAGE_COUNT: usize = 64;
/// Number of physical frames.
pub const FRAME_COUNT: usize = 8;
/// Number of TLB entries.
pub const TLB_CAPACITY: usize = 4;
/// Number of log lines kept around.
pub const LOG_CAPACITY: usize = 50;
