//! Read-only copy of the simulator state, for whatever draws it.

use serde::Serialize;

use crate::{
    page_table::PageTableEntry, ram::Frame, stats::Stats, step::Component, tlb::TlbEntry,
    trace::LogEntry, Address,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DiskView {
    /// Page being read from disk, if any.
    pub active: Option<usize>,
    pub address: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    /// Least recently used first.
    pub tlb: Vec<TlbEntry>,
    /// Indexed by virtual page number.
    pub page_table: Vec<PageTableEntry>,
    pub frames: Vec<Frame>,
    pub disk: DiskView,
    /// Newest first.
    pub log: Vec<LogEntry>,
    pub stats: Stats,
    pub highlight: Option<Component>,
    pub current_address: Option<Address>,
    pub pending_steps: usize,
    pub busy: bool,
    pub tick: u64,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn resident_pages(&self) -> impl Iterator<Item = usize> + '_ {
        self.frames.iter().filter_map(|f| f.occupant)
    }
}
