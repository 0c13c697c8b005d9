//! Per-step result storage

use std::collections::BTreeMap;

use shared::StepResult;

/// Results keyed by step index; absence means "not yet run"
///
/// Lives only as long as the run session. Writing a step never touches
/// the entries of other steps.
#[derive(Debug, Clone, Default)]
pub struct ResultCache {
    results: BTreeMap<usize, StepResult>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a result, replacing any earlier one for the same step
    pub fn put(&mut self, index: usize, result: StepResult) -> Option<StepResult> {
        self.results.insert(index, result)
    }

    pub fn get(&self, index: usize) -> Option<&StepResult> {
        self.results.get(&index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.results.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }

    /// Entries in step order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &StepResult)> {
        self.results.iter().map(|(index, result)| (*index, result))
    }
}
