use std::collections::VecDeque;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PageEvent {
    Touched(usize),
    Loaded(usize),
    Evicted(usize),
}

/// Chooses which frame gives up its page when RAM is full.
///
/// Events and victims are frame indices.
pub trait PageReplacer {
    fn page_event(&mut self, _event: PageEvent) {}

    fn pick_victim(&mut self, frame_count: usize, rng: &mut dyn RngCore) -> Option<usize>;

    /// Forgets everything; RAM has just been wiped.
    fn reset(&mut self) {}
}

impl PageReplacer for Box<dyn PageReplacer> {
    fn page_event(&mut self, event: PageEvent) {
        (**self).page_event(event)
    }

    fn pick_victim(&mut self, frame_count: usize, rng: &mut dyn RngCore) -> Option<usize> {
        (**self).pick_victim(frame_count, rng)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Any frame, uniformly at random. Deliberately not LRU.
#[derive(Debug, Default)]
pub struct RandomPageReplacer;

impl PageReplacer for RandomPageReplacer {
    fn pick_victim(&mut self, frame_count: usize, rng: &mut dyn RngCore) -> Option<usize> {
        if frame_count == 0 {
            return None;
        }

        Some(rng.gen_range(0..frame_count))
    }
}

/// Oldest loaded frame first.
#[derive(Debug, Default)]
pub struct FifoPageReplacer {
    fifo: VecDeque<usize>,
}

impl FifoPageReplacer {
    pub fn new() -> Self {
        FifoPageReplacer {
            fifo: VecDeque::new(),
        }
    }
}

impl PageReplacer for FifoPageReplacer {
    fn page_event(&mut self, event: PageEvent) {
        match event {
            PageEvent::Loaded(idx) => self.fifo.push_back(idx),
            PageEvent::Evicted(idx) => self.fifo.retain(|&f| f != idx),
            PageEvent::Touched(_) => {}
        }
    }

    fn pick_victim(&mut self, _frame_count: usize, _rng: &mut dyn RngCore) -> Option<usize> {
        self.fifo.front().copied()
    }

    fn reset(&mut self) {
        self.fifo.clear();
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacementPolicy {
    #[default]
    Random,
    Fifo,
}

impl ReplacementPolicy {
    pub fn replacer(self) -> Box<dyn PageReplacer> {
        match self {
            ReplacementPolicy::Random => Box::new(RandomPageReplacer),
            ReplacementPolicy::Fifo => Box::new(FifoPageReplacer::new()),
        }
    }
}
