use serde::{Deserialize, Serialize};

use crate::probe::ProbeOutcome;

/// One accessible collection as written to the report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FoundCollection {
    pub name: String,
    pub documents: u64,
}

/// Outcome tallies for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub completed: usize,
    pub found: usize,
    pub not_found: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Found collections in wordlist order.
    pub found: Vec<FoundCollection>,
    pub stats: RunStats,
}

impl RunResult {
    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }
}

/// Append-only collector of probe outcomes. Keeps `Found` entries (tagged with
/// their wordlist index) and only counts the rest.
///
/// Not synchronized itself; the dispatcher owns it behind its run lock.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    found: Vec<(usize, FoundCollection)>,
    not_found: usize,
    errored: Vec<String>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, index: usize, candidate: String, outcome: ProbeOutcome) {
        match outcome {
            ProbeOutcome::Found { item_count } => self.found.push((
                index,
                FoundCollection {
                    name: candidate,
                    documents: item_count,
                },
            )),
            ProbeOutcome::NotFound => self.not_found += 1,
            ProbeOutcome::Error { .. } => self.errored.push(candidate),
        }
    }

    fn len(&self) -> usize {
        self.found.len() + self.not_found + self.errored.len()
    }

    /// Candidates whose probe failed, in completion order.
    pub fn errored(&self) -> &[String] {
        &self.errored
    }

    /// Freeze into the final result.
    pub fn finish(mut self, total: usize) -> RunResult {
        self.found.sort_by_key(|(index, _)| *index);
        let stats = RunStats {
            total,
            completed: self.len(),
            found: self.found.len(),
            not_found: self.not_found,
            errors: self.errored.len(),
        };
        RunResult {
            found: self.found.into_iter().map(|(_, f)| f).collect(),
            stats,
        }
    }
}
