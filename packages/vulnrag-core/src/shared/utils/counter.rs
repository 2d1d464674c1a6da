//! Insertion-ordered frequency counter
//!
//! Ranking ties are broken by first occurrence, so the same input always
//! yields the same top-N list regardless of hash seeds.

use std::collections::HashMap;

use super::math::shannon_entropy;

/// Counts string occurrences while remembering first-seen order.
#[derive(Debug, Clone, Default)]
pub struct FrequencyCounter {
    slots: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
    total: usize,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence
    pub fn add(&mut self, name: &str) {
        self.total += 1;
        match self.slots.get(name) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.slots.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), 1));
            }
        }
    }

    /// Total occurrences recorded
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct names
    #[inline]
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, name: &str) -> usize {
        self.slots.get(name).map_or(0, |&slot| self.entries[slot].1)
    }

    /// Distinct names in first-seen order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Up to `n` names by descending count, ties by first occurrence
    pub fn most_common(&self, n: usize) -> Vec<String> {
        let mut ranked: Vec<&(String, usize)> = self.entries.iter().collect();
        // stable sort keeps first-seen order among equal counts
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(n)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Shannon entropy of the distribution (0 for ≤ 1 distinct name)
    pub fn entropy(&self) -> f64 {
        shannon_entropy(self.entries.iter().map(|(_, c)| *c))
    }
}

impl<'a> FromIterator<&'a str> for FrequencyCounter {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut counter = Self::new();
        for name in iter {
            counter.add(name);
        }
        counter
    }
}
