use std::collections::VecDeque;

use log::{debug, info, trace};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

use crate::{
    page_loader::{PageLoader, SimulatedDisk},
    page_replacer::{PageEvent, PageReplacer, ReplacementPolicy},
    page_table::{PageTable, PageTableEntry},
    ram::Ram,
    snapshot::{DiskView, Snapshot},
    stats::Stats,
    step::{Component, Step, StepReport},
    tlb::Tlb,
    trace::EventLog,
    Address, Error, Result, FRAME_COUNT, PAGE_COUNT, PAGE_SIZE,
};

/// The access currently being replayed.
#[derive(Copy, Clone, Debug)]
struct InFlight {
    address: Address,
    frame: Option<usize>,
}

/// Step-by-step address translation simulator.
///
/// One access at a time: [`Mmu::request_access`] plans the steps for an
/// address against the current state, and each [`Mmu::advance_one_step`]
/// applies exactly one of them. A new request is only accepted once the
/// previous one has been drained.
pub struct Mmu<REPLACER = Box<dyn PageReplacer>, LOADER = SimulatedDisk, RNG = StdRng> {
    tlb: Tlb,
    page_table: PageTable<PAGE_COUNT>,
    ram: Ram<FRAME_COUNT>,
    stats: Stats,
    log: EventLog,
    queue: VecDeque<Step>,
    current: Option<InFlight>,
    highlight: Option<Component>,
    disk_active: Option<usize>,
    tick: u64,
    replacer: REPLACER,
    loader: LOADER,
    rng: RNG,
}

impl Mmu {
    /// Default disk and random replacement, seeded for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Mmu::with_policy(ReplacementPolicy::Random, StdRng::seed_from_u64(seed))
    }

    pub fn with_policy(policy: ReplacementPolicy, rng: StdRng) -> Self {
        Mmu::new(policy.replacer(), SimulatedDisk::new(), rng)
    }
}

impl<REPLACER, LOADER, RNG> Mmu<REPLACER, LOADER, RNG>
where
    REPLACER: PageReplacer,
    LOADER: PageLoader,
    RNG: RngCore,
{
    pub fn new(replacer: REPLACER, loader: LOADER, rng: RNG) -> Self {
        let page_table = PageTable::new(&loader);

        Mmu {
            tlb: Tlb::default(),
            page_table,
            ram: Ram::new(),
            stats: Stats::new(),
            log: EventLog::default(),
            queue: VecDeque::new(),
            current: None,
            highlight: None,
            disk_active: None,
            tick: 0,
            replacer,
            loader,
            rng,
        }
    }

    /// Wipes all simulated hardware. Any in-flight request is dropped on the floor.
    pub fn reset(&mut self) {
        if !self.queue.is_empty() {
            info!("mmu: reset abandons {} pending steps", self.queue.len());
        }

        self.tlb.clear();
        self.page_table = PageTable::new(&self.loader);
        self.ram = Ram::new();
        self.stats.reset();
        self.log.clear();
        self.queue.clear();
        self.current = None;
        self.highlight = None;
        self.disk_active = None;
        self.tick = 0;
        self.replacer.reset();

        info!("mmu: reset");
    }

    /// Queues the steps for one access to `vpn`, or to a random page.
    ///
    /// Returns `Ok(false)` without touching anything while a request is
    /// still in flight.
    pub fn request_access(&mut self, vpn: Option<usize>) -> Result<bool> {
        if self.is_busy() {
            trace!("mmu: request ignored, {} steps still pending", self.queue.len());
            return Ok(false);
        }

        let vpn = match vpn {
            Some(vpn) if vpn >= PAGE_COUNT => return Err(Error::PageOutOfRange(vpn)),
            Some(vpn) => vpn,
            None => self.rng.gen_range(0..PAGE_COUNT),
        };
        let offset = self.rng.gen_range(0..PAGE_SIZE);

        let address = Address::new(vpn, offset)?;

        self.queue = self.plan(address);

        debug!("mmu: planned {} steps for {}", self.queue.len(), address);

        Ok(true)
    }

    /// Decides the path an access will take. Reads state only.
    fn plan(&self, address: Address) -> VecDeque<Step> {
        let vpn = address.vpn;
        let mut steps = VecDeque::new();

        steps.push_back(Step::Generate { address });

        match self.tlb.lookup(vpn) {
            Some(frame) => steps.push_back(Step::TlbHit { vpn, frame }),
            None => {
                steps.push_back(Step::TlbMiss { vpn });

                match self.page_table.get(vpn).and_then(PageTableEntry::resident_frame) {
                    Some(frame) => steps.push_back(Step::PageTableHit { vpn, frame }),
                    None => {
                        steps.push_back(Step::PageFault { vpn });
                        steps.push_back(Step::DiskRead { vpn });

                        if self.ram.is_full() {
                            steps.push_back(Step::RamFull);
                            steps.push_back(Step::Evict);
                        }

                        steps.push_back(Step::LoadPage { vpn });
                    }
                }

                steps.push_back(Step::TlbUpdate { vpn });
            }
        }

        steps.push_back(Step::Access { address });
        steps.push_back(Step::Complete);

        steps
    }

    /// Executes the next pending step. `Ok(None)` when idle.
    pub fn advance_one_step(&mut self) -> Result<Option<StepReport>> {
        let step = match self.queue.pop_front() {
            Some(step) => step,
            None => return Ok(None),
        };

        self.tick += 1;
        self.highlight = step.component();

        debug!("mmu: [{}] {}", self.tick, step.label());

        self.execute(step)?;

        Ok(Some(step.into()))
    }

    /// Drains the current request.
    pub fn run_to_completion(&mut self) -> Result<Vec<StepReport>> {
        let mut reports = Vec::with_capacity(self.queue.len());

        while let Some(report) = self.advance_one_step()? {
            reports.push(report);
        }

        Ok(reports)
    }

    fn execute(&mut self, step: Step) -> Result<()> {
        match step {
            Step::Generate { address } => {
                self.current = Some(InFlight { address, frame: None });
                self.note(format!("CPU generated virtual address {}", address));
            }
            Step::TlbHit { vpn, frame } => {
                // The plan already saw the hit; this only refreshes recency.
                let frame = self.tlb.touch(vpn).unwrap_or(frame);

                self.stats.tlb_hits += 1;
                self.resolve(frame);
                self.note(format!("TLB hit: page {} is in frame {}", vpn, frame));
            }
            Step::TlbMiss { vpn } => {
                self.stats.tlb_misses += 1;
                self.note(format!("TLB miss for page {}", vpn));
            }
            Step::PageTableHit { vpn, frame } => {
                self.resolve(frame);
                self.note(format!("Page table hit: page {} is in frame {}", vpn, frame));
            }
            Step::PageFault { vpn } => {
                self.stats.page_faults += 1;
                self.note(format!("Page fault: page {} is not in RAM", vpn));
            }
            Step::DiskRead { vpn } => {
                self.disk_active = Some(vpn);

                let disk_address = self
                    .page_table
                    .get(vpn)
                    .map(|e| e.disk_address.clone())
                    .ok_or(Error::PageOutOfRange(vpn))?;

                self.note(format!("Reading page {} from disk at {}", vpn, disk_address));
            }
            Step::RamFull => {
                self.note("RAM is full, picking a victim frame".to_string());
            }
            Step::Evict => self.evict()?,
            Step::LoadPage { vpn } => {
                let frame = self.ram.first_free().ok_or(Error::NoFreeFrame(vpn))?;
                let label = self.loader.load_page(vpn);

                self.note(format!("Loaded {} into frame {}", label, frame));

                self.ram.load(frame, vpn, label);
                self.page_table.map(vpn, frame);
                self.replacer.page_event(PageEvent::Loaded(frame));
                self.resolve(frame);
            }
            Step::TlbUpdate { vpn } => {
                let frame = self.resolved_frame(vpn)?;

                match self.tlb.insert(vpn, frame) {
                    Some(old) => self.note(format!(
                        "TLB updated: page {} -> frame {} (dropped page {})",
                        vpn, frame, old.vpn
                    )),
                    None => self.note(format!("TLB updated: page {} -> frame {}", vpn, frame)),
                }
            }
            Step::Access { address } => {
                let frame = self.resolved_frame(address.vpn)?;
                let physical = address.physical(frame);

                self.stats.ram_accesses += 1;
                self.replacer.page_event(PageEvent::Touched(frame));
                self.note(format!(
                    "Accessed physical address {:#05X} (frame {}, offset {})",
                    physical, frame, address.offset
                ));
            }
            Step::Complete => {
                self.current = None;
                self.disk_active = None;
                self.highlight = None;
            }
        }

        Ok(())
    }

    fn evict(&mut self) -> Result<()> {
        let victim = self
            .replacer
            .pick_victim(FRAME_COUNT, &mut self.rng)
            .ok_or(Error::NoVictim)?;
        let evicted = self.ram.evict(victim).ok_or(Error::NoVictim)?;

        self.page_table.invalidate(evicted);
        let dropped = self.tlb.invalidate(evicted);
        self.replacer.page_event(PageEvent::Evicted(victim));

        if dropped {
            self.note(format!(
                "Evicted page {} from frame {} and its TLB entry",
                evicted, victim
            ));
        } else {
            self.note(format!("Evicted page {} from frame {}", evicted, victim));
        }

        Ok(())
    }

    fn note(&mut self, message: String) {
        self.log.push(self.tick, message);
    }

    fn resolve(&mut self, frame: usize) {
        if let Some(current) = self.current.as_mut() {
            current.frame = Some(frame);
        }
    }

    fn resolved_frame(&self, vpn: usize) -> Result<usize> {
        self.current
            .and_then(|c| c.frame)
            .ok_or(Error::Unresolved(vpn))
    }

    pub fn snapshot(&self) -> Snapshot {
        let disk = DiskView {
            active: self.disk_active,
            address: self
                .disk_active
                .and_then(|vpn| self.page_table.get(vpn))
                .map(|e| e.disk_address.clone()),
        };

        Snapshot {
            tlb: self.tlb.entries().copied().collect(),
            page_table: self.page_table.entries().to_vec(),
            frames: self.ram.frames().to_vec(),
            disk,
            log: self.log.entries().cloned().collect(),
            stats: self.stats,
            highlight: self.highlight,
            current_address: self.current_address(),
            pending_steps: self.queue.len(),
            busy: self.is_busy(),
            tick: self.tick,
        }
    }

    pub fn is_busy(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Step> {
        self.queue.iter()
    }

    pub fn current_address(&self) -> Option<Address> {
        self.current.map(|c| c.address)
    }

    pub fn highlight(&self) -> Option<Component> {
        self.highlight
    }

    pub fn disk_active(&self) -> Option<usize> {
        self.disk_active
    }

    pub fn tlb(&self) -> &Tlb {
        &self.tlb
    }

    pub fn page_table(&self) -> &PageTable<PAGE_COUNT> {
        &self.page_table
    }

    pub fn ram(&self) -> &Ram<FRAME_COUNT> {
        &self.ram
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn loader(&self) -> &LOADER {
        &self.loader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn mmu() -> Mmu<Box<dyn PageReplacer>, SimulatedDisk, StepRng> {
        Mmu::new(
            ReplacementPolicy::Random.replacer(),
            SimulatedDisk::new(),
            StepRng::new(0, 0),
        )
    }

    #[test]
    fn idle_advance_is_a_no_op() {
        let mut mmu = mmu();

        assert_eq!(mmu.advance_one_step(), Ok(None));
        assert_eq!(mmu.tick(), 0);
        assert!(mmu.log().is_empty());
    }

    #[test]
    fn plans_full_fault_path_on_cold_start() {
        let mut mmu = mmu();
        assert_eq!(mmu.request_access(Some(5)), Ok(true));

        let kinds: Vec<Step> = mmu.pending().copied().collect();
        let address = Address::new(5, 0).unwrap();

        assert_eq!(
            kinds,
            vec![
                Step::Generate { address },
                Step::TlbMiss { vpn: 5 },
                Step::PageFault { vpn: 5 },
                Step::DiskRead { vpn: 5 },
                Step::LoadPage { vpn: 5 },
                Step::TlbUpdate { vpn: 5 },
                Step::Access { address },
                Step::Complete,
            ]
        );
    }

    #[test]
    fn planning_does_not_mutate() {
        let mut mmu = mmu();
        mmu.request_access(Some(3)).unwrap();

        assert_eq!(mmu.stats(), &Stats::default());
        assert!(mmu.tlb().is_empty());
        assert!(mmu.log().is_empty());
        assert_eq!(mmu.current_address(), None);
    }

    #[test]
    fn random_request_uses_rng() {
        let mut mmu = mmu();
        mmu.request_access(None).unwrap();
        mmu.advance_one_step().unwrap();

        assert_eq!(mmu.current_address(), Address::new(0, 0).ok());
    }

    #[test]
    fn out_of_range_override_is_rejected() {
        let mut mmu = mmu();

        assert_eq!(mmu.request_access(Some(64)), Err(Error::PageOutOfRange(64)));
        assert!(!mmu.is_busy());
    }

    #[test]
    fn highlight_follows_each_step() {
        let mut mmu = mmu();
        mmu.request_access(Some(1)).unwrap();

        let tags: Vec<Option<&str>> = mmu
            .run_to_completion()
            .unwrap()
            .iter()
            .map(|r| r.component.map(Component::tag))
            .collect();

        assert_eq!(
            tags,
            vec![
                Some("cpu"),
                Some("tlb"),
                Some("pt"),
                Some("disk"),
                Some("ram"),
                Some("tlb"),
                Some("ram"),
                None
            ]
        );
        assert_eq!(mmu.highlight(), None);
    }

    #[test]
    fn disk_indicator_lights_during_fault() {
        let mut mmu = mmu();
        mmu.request_access(Some(5)).unwrap();

        for _ in 0..4 {
            mmu.advance_one_step().unwrap();
        }
        assert_eq!(mmu.disk_active(), Some(5));
        assert_eq!(mmu.snapshot().disk.address.as_deref(), Some("0x1140"));

        mmu.run_to_completion().unwrap();
        assert_eq!(mmu.disk_active(), None);
        assert_eq!(mmu.loader().reads(), 1);
    }
}
