//! Execution results.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// Measurement outcome counts, keyed by bitstring.
///
/// Classical bit 0 is the rightmost character of each key. Serializes as a
/// flat JSON object: `{"101": 1000, "001": 24}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build counts from `(bitstring, count)` pairs. Repeated keys accumulate.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, u64)>) -> Self {
        let mut counts = Self::new();
        for (bitstring, count) in pairs {
            counts.insert(bitstring, count);
        }
        counts
    }

    /// Add `count` observations of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Number of times `bitstring` was observed.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of observations.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether nothing was observed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(bitstring, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Outcomes sorted by descending count, ties broken by bitstring.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        sorted
    }

    /// The most frequent outcome. Ties go to the lexicographically smallest
    /// bitstring so the answer does not depend on hash order.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.sorted().into_iter().next()
    }

    /// Observed frequency of `bitstring`, or 0.0 when nothing was observed.
    pub fn probability(&self, bitstring: &str) -> f64 {
        let total = self.total_shots();
        if total == 0 {
            return 0.0;
        }
        self.get(bitstring) as f64 / total as f64
    }

    /// The common width of all bitstrings, if they agree.
    pub fn bit_width(&self) -> Option<usize> {
        let mut widths = self.counts.keys().map(String::len);
        let first = widths.next()?;
        widths.all(|w| w == first).then_some(first)
    }

    /// Check that every key is a binary string of exactly `width` bits.
    pub fn validate(&self, width: usize) -> HalResult<()> {
        for key in self.counts.keys() {
            if key.len() != width || !key.bytes().all(|b| b == b'0' || b == b'1') {
                return Err(HalError::InvalidCounts(format!(
                    "outcome '{key}' is not a {width}-bit binary string"
                )));
            }
        }
        Ok(())
    }
}

/// Result of executing a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Outcome counts.
    pub counts: Counts,
    /// Number of shots the counts were gathered over.
    pub shots: u32,
    /// Wall-clock execution time reported by the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create a new result.
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self {
            counts,
            shots,
            execution_time_ms: None,
        }
    }

    /// Attach the execution time.
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_accumulates() {
        let mut counts = Counts::new();
        counts.insert("01", 3);
        counts.insert("01", 2);
        counts.insert("10", 1);
        assert_eq!(counts.get("01"), 5);
        assert_eq!(counts.get("11"), 0);
        assert_eq!(counts.total_shots(), 6);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_most_frequent_tie_break() {
        let counts = Counts::from_pairs([("11", 5), ("00", 5), ("01", 1)]);
        assert_eq!(counts.most_frequent(), Some(("00", 5)));
        assert_eq!(
            counts.sorted(),
            vec![("00", 5), ("11", 5), ("01", 1)]
        );
        assert_eq!(Counts::new().most_frequent(), None);
    }

    #[test]
    fn test_probability() {
        let counts = Counts::from_pairs([("0", 1), ("1", 3)]);
        assert!((counts.probability("1") - 0.75).abs() < 1e-12);
        assert_eq!(Counts::new().probability("1"), 0.0);
    }

    #[test]
    fn test_bit_width_and_validate() {
        let counts = Counts::from_pairs([("101", 1), ("001", 1)]);
        assert_eq!(counts.bit_width(), Some(3));
        assert!(counts.validate(3).is_ok());
        assert!(counts.validate(2).is_err());

        let ragged = Counts::from_pairs([("1", 1), ("01", 1)]);
        assert_eq!(ragged.bit_width(), None);

        let garbage = Counts::from_pairs([("1x", 1)]);
        assert!(matches!(garbage.validate(2), Err(HalError::InvalidCounts(_))));
    }

    #[test]
    fn test_serde_flat_object() {
        let counts: Counts = serde_json::from_str(r#"{"00": 510, "11": 514}"#).unwrap();
        assert_eq!(counts.total_shots(), 1024);
        let value = serde_json::to_value(&counts).unwrap();
        assert_eq!(value["11"], 514);
    }
}
