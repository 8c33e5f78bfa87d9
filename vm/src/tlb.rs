//! Fully associative TLB with LRU ordering.
//!
//! Entries are kept in recency order: the head of the queue is the least
//! recently used mapping and the tail the most recently used one.

use std::collections::VecDeque;

use serde::Serialize;

use crate::TLB_CAPACITY;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TlbEntry {
    pub vpn: usize,
    pub frame: usize,
}

#[derive(Clone, Debug)]
pub struct Tlb {
    entries: VecDeque<TlbEntry>,
    capacity: usize,
}

impl Default for Tlb {
    fn default() -> Self {
        Tlb::new(TLB_CAPACITY)
    }
}

impl Tlb {
    pub fn new(capacity: usize) -> Self {
        Tlb {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn position(&self, vpn: usize) -> Option<usize> {
        self.entries.iter().position(|e| e.vpn == vpn)
    }

    /// Looks a page up without touching the recency order.
    pub fn lookup(&self, vpn: usize) -> Option<usize> {
        self.position(vpn).map(|idx| self.entries[idx].frame)
    }

    /// Looks a page up and, on a hit, makes it the most recently used entry.
    pub fn touch(&mut self, vpn: usize) -> Option<usize> {
        let idx = self.position(vpn)?;
        let entry = self.entries.remove(idx)?;

        self.entries.push_back(entry);

        Some(entry.frame)
    }

    /// Inserts a mapping as the most recently used entry.
    ///
    /// An existing mapping for the same page is replaced in place; otherwise a
    /// full TLB gives up its least recently used entry, which is returned.
    pub fn insert(&mut self, vpn: usize, frame: usize) -> Option<TlbEntry> {
        let evicted = match self.position(vpn) {
            Some(idx) => {
                self.entries.remove(idx);
                None
            }
            None if self.entries.len() >= self.capacity => self.entries.pop_front(),
            None => None,
        };

        self.entries.push_back(TlbEntry { vpn, frame });

        evicted
    }

    /// Drops the mapping for `vpn`, if any.
    pub fn invalidate(&mut self, vpn: usize) -> bool {
        match self.position(vpn) {
            Some(idx) => self.entries.remove(idx).is_some(),
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries from least to most recently used.
    pub fn entries(&self) -> impl Iterator<Item = &TlbEntry> {
        self.entries.iter()
    }

    pub fn most_recent(&self) -> Option<&TlbEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vpns(tlb: &Tlb) -> Vec<usize> {
        tlb.entries().map(|e| e.vpn).collect()
    }

    #[test]
    fn lookup_miss_on_empty() {
        let tlb = Tlb::default();
        assert_eq!(tlb.lookup(3), None);
        assert!(tlb.is_empty());
    }

    #[test]
    fn touch_moves_hit_to_most_recent() {
        let mut tlb = Tlb::default();
        tlb.insert(1, 10);
        tlb.insert(2, 20);
        tlb.insert(3, 30);

        assert_eq!(tlb.touch(1), Some(10));
        assert_eq!(vpns(&tlb), vec![2, 3, 1]);
        assert_eq!(tlb.touch(9), None);
        assert_eq!(vpns(&tlb), vec![2, 3, 1]);
    }

    #[test]
    fn lookup_does_not_reorder() {
        let mut tlb = Tlb::default();
        tlb.insert(1, 10);
        tlb.insert(2, 20);

        assert_eq!(tlb.lookup(1), Some(10));
        assert_eq!(vpns(&tlb), vec![1, 2]);
    }

    #[test]
    fn full_tlb_evicts_least_recently_used() {
        let mut tlb = Tlb::default();
        for vpn in 0..4 {
            assert_eq!(tlb.insert(vpn, vpn + 100), None);
        }
        tlb.touch(0);

        let evicted = tlb.insert(7, 107);

        assert_eq!(evicted, Some(TlbEntry { vpn: 1, frame: 101 }));
        assert_eq!(tlb.len(), 4);
        assert_eq!(tlb.most_recent(), Some(&TlbEntry { vpn: 7, frame: 107 }));
    }

    #[test]
    fn reinserting_same_page_keeps_vpns_unique() {
        let mut tlb = Tlb::default();
        tlb.insert(5, 0);
        tlb.insert(6, 1);

        assert_eq!(tlb.insert(5, 2), None);
        assert_eq!(vpns(&tlb), vec![6, 5]);
        assert_eq!(tlb.lookup(5), Some(2));
    }

    #[test]
    fn invalidate_removes_only_that_page() {
        let mut tlb = Tlb::default();
        tlb.insert(1, 1);
        tlb.insert(2, 2);

        assert!(tlb.invalidate(1));
        assert!(!tlb.invalidate(1));
        assert_eq!(vpns(&tlb), vec![2]);
    }
}
