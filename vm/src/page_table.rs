use serde::Serialize;

use crate::page_loader::PageLoader;

#[derive(Clone, Default, Debug, PartialEq, Eq, Serialize)]
pub struct PageTableEntry {
    pub valid: bool,
    pub frame: Option<usize>,
    pub disk_address: String,
}

impl PageTableEntry {
    /// Frame holding the page, if it is resident.
    pub fn resident_frame(&self) -> Option<usize> {
        if self.valid {
            self.frame
        } else {
            None
        }
    }
}

#[derive(Clone, Debug)]
pub struct PageTable<const PAGE_TABLE_SIZE: usize> {
    table: [PageTableEntry; PAGE_TABLE_SIZE],
}

impl<const PAGE_TABLE_SIZE: usize> PageTable<PAGE_TABLE_SIZE> {
    /// Builds an all-invalid table, asking `loader` where each page lives on disk.
    pub fn new<L: PageLoader>(loader: &L) -> Self {
        PageTable {
            table: std::array::from_fn(|page_number| PageTableEntry {
                valid: false,
                frame: None,
                disk_address: loader.disk_address(page_number),
            }),
        }
    }

    pub fn get(&self, page_number: usize) -> Option<&PageTableEntry> {
        self.table.get(page_number)
    }

    pub fn map(&mut self, page_number: usize, frame_index: usize) {
        if let Some(entry) = self.table.get_mut(page_number) {
            entry.valid = true;
            entry.frame = Some(frame_index);
        }
    }

    /// Marks the page as not resident. Returns the frame it used to occupy.
    pub fn invalidate(&mut self, page_number: usize) -> Option<usize> {
        let entry = self.table.get_mut(page_number)?;

        entry.valid = false;
        entry.frame.take()
    }

    pub fn entries(&self) -> &[PageTableEntry] {
        &self.table
    }

    /// Page numbers currently mapped to a frame, paired with that frame.
    pub fn resident_pages(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.table
            .iter()
            .enumerate()
            .filter_map(|(page_number, entry)| entry.resident_frame().map(|f| (page_number, f)))
    }
}
