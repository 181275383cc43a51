use super::domain::Member;
use serde::Serialize;

/// Per-call snapshot of cumulative weeks per roster member, in roster order.
///
/// Built from the members' committed work and threaded explicitly through the
/// assignment pipeline; the caller's `Member` values are never touched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadLedger {
    entries: Vec<LedgerEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub member: String,
    pub weeks: f64,
}

impl LoadLedger {
    pub fn from_roster(members: &[Member]) -> Self {
        let entries = members
            .iter()
            .map(|member| LedgerEntry {
                member: member.name().to_string(),
                weeks: member.committed_weeks(),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load for the member at roster position `index`.
    pub fn load(&self, index: usize) -> f64 {
        self.entries[index].weeks
    }

    pub fn load_of(&self, member: &str) -> Option<f64> {
        self.index_of(member).map(|index| self.load(index))
    }

    pub fn index_of(&self, member: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.member == member)
    }

    pub(crate) fn add(&mut self, index: usize, weeks: f64) {
        self.entries[index].weeks += weeks;
    }

    pub(crate) fn transfer(&mut self, from: usize, to: usize, weeks: f64) {
        self.entries[from].weeks -= weeks;
        self.entries[to].weeks += weeks;
    }

    /// First roster position holding the highest load.
    pub fn most_loaded(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, entry) in self.entries.iter().enumerate() {
            if best.map_or(true, |(_, weeks)| entry.weeks > weeks) {
                best = Some((index, entry.weeks));
            }
        }
        best.map(|(index, _)| index)
    }

    /// First roster position holding the lowest load.
    pub fn least_loaded(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, entry) in self.entries.iter().enumerate() {
            if best.map_or(true, |(_, weeks)| entry.weeks < weeks) {
                best = Some((index, entry.weeks));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Difference between the highest and lowest load, or 0 for an empty roster.
    pub fn spread(&self) -> f64 {
        match (self.most_loaded(), self.least_loaded()) {
            (Some(max), Some(min)) => self.load(max) - self.load(min),
            _ => 0.0,
        }
    }
}
