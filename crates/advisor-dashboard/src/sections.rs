//! Section visibility gating
//!
//! Each detail section is shown with data, shown as loading, or hidden. When
//! every section is hidden the whole area collapses into a single empty-state
//! message instead of a row of blank panels.

use advisor_core::{DashboardSnapshot, SectionKind};
use std::collections::BTreeSet;

/// Shown when no section has data and none is loading
pub const EMPTY_SECTIONS_MESSAGE: &str = "No additional market data available for this selection.";

/// How a single section renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionView {
    /// Render the section with this many records
    Data(usize),
    /// Render a loading indicator
    Loading,
    Hidden,
}

/// Per-section inputs to the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionFlags {
    pub kind: SectionKind,
    pub has_data: bool,
    pub is_loading: bool,
}

impl SectionFlags {
    pub fn view(&self, len: usize) -> SectionView {
        if self.has_data {
            SectionView::Data(len)
        } else if self.is_loading {
            SectionView::Loading
        } else {
            SectionView::Hidden
        }
    }
}

/// What the section area renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutput {
    /// Visible sections in display order
    Panels(Vec<(SectionKind, SectionView)>),
    /// Nothing to show
    Empty(&'static str),
}

/// Tracks which sections are loading and evaluates visibility
#[derive(Debug, Clone, Default)]
pub struct SectionGate {
    loading: BTreeSet<SectionKind>,
}

impl SectionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_loading(&mut self, kind: SectionKind, loading: bool) {
        if loading {
            self.loading.insert(kind);
        } else {
            self.loading.remove(&kind);
        }
    }

    pub fn set_all_loading(&mut self, loading: bool) {
        for kind in SectionKind::ALL {
            self.set_loading(kind, loading);
        }
    }

    pub fn is_loading(&self, kind: SectionKind) -> bool {
        self.loading.contains(&kind)
    }

    pub fn flags(&self, snapshot: Option<&DashboardSnapshot>) -> Vec<SectionFlags> {
        SectionKind::ALL
            .iter()
            .map(|&kind| SectionFlags {
                kind,
                has_data: snapshot.is_some_and(|s| s.section_len(kind) > 0),
                is_loading: self.is_loading(kind),
            })
            .collect()
    }

    pub fn evaluate(&self, snapshot: Option<&DashboardSnapshot>) -> GateOutput {
        let panels: Vec<_> = self
            .flags(snapshot)
            .into_iter()
            .map(|flags| {
                let len = snapshot.map_or(0, |s| s.section_len(flags.kind));
                (flags.kind, flags.view(len))
            })
            .filter(|(_, view)| *view != SectionView::Hidden)
            .collect();

        if panels.is_empty() {
            GateOutput::Empty(EMPTY_SECTIONS_MESSAGE)
        } else {
            GateOutput::Panels(panels)
        }
    }
}
