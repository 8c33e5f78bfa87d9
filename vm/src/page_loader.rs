use crate::PAGE_SIZE;

/// Backing store the simulator pages from.
pub trait PageLoader {
    /// Where `page_number` lives on disk, as shown in the page table.
    fn disk_address(&self, page_number: usize) -> String;

    /// Reads the page in and returns a label for the data now in the frame.
    fn load_page(&mut self, page_number: usize) -> String;
}

/// Base sector of the swap area.
const SWAP_BASE: usize = 0x1000;

/// Disk with one page-sized sector per virtual page, starting at `0x1000`.
#[derive(Debug, Default, Clone)]
pub struct SimulatedDisk {
    reads: usize,
}

impl SimulatedDisk {
    pub fn new() -> Self {
        SimulatedDisk::default()
    }

    /// Number of pages read since creation.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl PageLoader for SimulatedDisk {
    fn disk_address(&self, page_number: usize) -> String {
        let sector = (SWAP_BASE + page_number * PAGE_SIZE) as u16;

        format!("0x{}", hex::encode_upper(sector.to_be_bytes()))
    }

    fn load_page(&mut self, page_number: usize) -> String {
        self.reads += 1;

        format!("Page-{}", page_number)
    }
}
