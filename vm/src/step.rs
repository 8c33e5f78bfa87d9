//! Step descriptors for one simulated memory access.
//!
//! A request is planned up front as a list of [`Step`]s; the MMU interprets
//! them one at a time so a viewer can follow each stage.

use serde::Serialize;

use crate::Address;

/// Hardware component a step is working on, for highlighting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Cpu,
    Tlb,
    PageTable,
    Disk,
    Ram,
}

impl Component {
    pub fn tag(self) -> &'static str {
        match self {
            Component::Cpu => "cpu",
            Component::Tlb => "tlb",
            Component::PageTable => "pt",
            Component::Disk => "disk",
            Component::Ram => "ram",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    Generate { address: Address },
    TlbHit { vpn: usize, frame: usize },
    TlbMiss { vpn: usize },
    PageTableHit { vpn: usize, frame: usize },
    PageFault { vpn: usize },
    DiskRead { vpn: usize },
    /// All frames are occupied; the next step evicts one.
    RamFull,
    Evict,
    LoadPage { vpn: usize },
    TlbUpdate { vpn: usize },
    Access { address: Address },
    Complete,
}

impl Step {
    pub fn label(&self) -> String {
        match self {
            Step::Generate { address } => format!("CPU generates virtual address {}", address),
            Step::TlbHit { vpn, .. } => format!("TLB lookup for page {}: hit", vpn),
            Step::TlbMiss { vpn } => format!("TLB lookup for page {}: miss", vpn),
            Step::PageTableHit { vpn, .. } => format!("Page table entry {} is valid", vpn),
            Step::PageFault { vpn } => format!("Page table entry {} is invalid: page fault", vpn),
            Step::DiskRead { vpn } => format!("Reading page {} from disk", vpn),
            Step::RamFull => "RAM is full, a frame must be evicted".to_string(),
            Step::Evict => "Evicting a victim frame".to_string(),
            Step::LoadPage { vpn } => format!("Loading page {} into RAM", vpn),
            Step::TlbUpdate { vpn } => format!("Caching page {} in the TLB", vpn),
            Step::Access { address } => format!("Accessing physical memory for {}", address),
            Step::Complete => "Access complete".to_string(),
        }
    }

    pub fn component(&self) -> Option<Component> {
        match self {
            Step::Generate { .. } => Some(Component::Cpu),
            Step::TlbHit { .. } | Step::TlbMiss { .. } | Step::TlbUpdate { .. } => {
                Some(Component::Tlb)
            }
            Step::PageTableHit { .. } | Step::PageFault { .. } => Some(Component::PageTable),
            Step::DiskRead { .. } => Some(Component::Disk),
            Step::RamFull | Step::Evict | Step::LoadPage { .. } | Step::Access { .. } => {
                Some(Component::Ram)
            }
            Step::Complete => None,
        }
    }
}

/// What the MMU did when it executed one step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: Step,
    pub label: String,
    pub component: Option<Component>,
}

impl From<Step> for StepReport {
    fn from(step: Step) -> Self {
        StepReport {
            label: step.label(),
            component: step.component(),
            step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_highlights_nothing() {
        assert_eq!(Step::Complete.component(), None);
        assert_eq!(Step::DiskRead { vpn: 1 }.component(), Some(Component::Disk));
        assert_eq!(Step::PageFault { vpn: 1 }.component().map(Component::tag), Some("pt"));
    }

    #[test]
    fn report_carries_label_and_component() {
        let report = StepReport::from(Step::TlbMiss { vpn: 5 });

        assert_eq!(report.label, "TLB lookup for page 5: miss");
        assert_eq!(report.component, Some(Component::Tlb));
    }

    #[test]
    fn steps_serialize_with_kind_tag() {
        let json = serde_json::to_string(&Step::TlbHit { vpn: 5, frame: 0 }).unwrap();
        assert_eq!(json, r#"{"kind":"tlb_hit","vpn":5,"frame":0}"#);
    }
}
