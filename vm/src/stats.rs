use serde::Serialize;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub tlb_hits: u64,
    pub tlb_misses: u64,
    pub page_faults: u64,
    pub ram_accesses: u64,
}

impl Stats {
    pub fn new() -> Self {
        Stats::default()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Number of TLB lookups so far.
    pub fn lookups(&self) -> u64 {
        self.tlb_hits + self.tlb_misses
    }

    pub fn tlb_hit_ratio(&self) -> f64 {
        ratio(self.tlb_hits, self.lookups())
    }

    /// Page faults per TLB lookup.
    pub fn fault_ratio(&self) -> f64 {
        ratio(self.page_faults, self.lookups())
    }
}

fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios_are_zero_without_lookups() {
        let stats = Stats::new();
        assert_eq!(stats.tlb_hit_ratio(), 0.0);
        assert_eq!(stats.fault_ratio(), 0.0);
    }

    #[test]
    fn ratios_follow_counters() {
        let mut stats = Stats {
            tlb_hits: 3,
            tlb_misses: 1,
            page_faults: 1,
            ram_accesses: 4,
        };
        assert_eq!(stats.tlb_hit_ratio(), 0.75);
        assert_eq!(stats.fault_ratio(), 0.25);

        stats.reset();
        assert_eq!(stats, Stats::default());
    }
}
