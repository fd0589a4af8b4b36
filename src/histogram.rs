//! Fixed-width histogram accumulating a scalar per bin.
//!
//! Bins are created lazily on the first `add_data` that lands in them and
//! stay in insertion order until `sort_bins` is called.

use std::collections::HashMap;
use std::fmt;

/// A single histogram bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    key: i64,
    width: f64,
    /// Accumulated scalar.
    pub value: f64,
    count: usize,
}

impl Bin {
    /// Quantized bin index, `floor(position / width)`.
    pub fn key(&self) -> i64 {
        self.key
    }

    /// Lower edge of the bin.
    pub fn position(&self) -> f64 {
        self.key as f64 * self.width
    }

    /// Number of observations added to this bin.
    pub fn count(&self) -> usize {
        self.count
    }
}

#[derive(Debug, Clone)]
pub struct Histogram {
    bin_width: f64,
    bins: Vec<Bin>,
    lookup: HashMap<i64, usize>,
}

impl Histogram {
    /// Create an empty histogram. `bin_width` must be positive.
    pub fn new(bin_width: f64) -> Self {
        assert!(bin_width > 0.0, "bin width must be positive, got {bin_width}");
        Self {
            bin_width,
            bins: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    #[inline]
    fn key_for(&self, position: f64) -> i64 {
        (position / self.bin_width).floor() as i64
    }

    /// Accumulate `value` into the bin containing `position`.
    pub fn add_data(&mut self, position: f64, value: f64) {
        let key = self.key_for(position);
        let idx = match self.lookup.get(&key) {
            Some(&idx) => idx,
            None => {
                self.bins.push(Bin {
                    key,
                    width: self.bin_width,
                    value: 0.0,
                    count: 0,
                });
                self.lookup.insert(key, self.bins.len() - 1);
                self.bins.len() - 1
            }
        };
        let bin = &mut self.bins[idx];
        bin.value += value;
        bin.count += 1;
    }

    /// Record one observation at `position` (value 1).
    pub fn add_count(&mut self, position: f64) {
        self.add_data(position, 1.0);
    }

    /// Accumulated value of the bin containing `position`, 0 if empty.
    pub fn get_data(&self, position: f64) -> f64 {
        self.get_by_key(self.key_for(position))
    }

    /// Accumulated value of the bin with the given key, 0 if empty.
    pub fn get_by_key(&self, key: i64) -> f64 {
        self.lookup
            .get(&key)
            .map(|&idx| self.bins[idx].value)
            .unwrap_or(0.0)
    }

    /// Subtract `c` from every bin value. Counts are untouched.
    pub fn shift(&mut self, c: f64) {
        for bin in &mut self.bins {
            bin.value -= c;
        }
    }

    /// Order bins by ascending position.
    pub fn sort_bins(&mut self) {
        self.bins.sort_by_key(|b| b.key);
        self.lookup = self
            .bins
            .iter()
            .enumerate()
            .map(|(idx, b)| (b.key, idx))
            .collect();
    }

    pub fn is_sorted(&self) -> bool {
        self.bins.windows(2).all(|w| w[0].key < w[1].key)
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bin> {
        self.bins.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Bin> {
        self.bins.iter_mut()
    }
}

impl<'a> IntoIterator for &'a Histogram {
    type Item = &'a Bin;
    type IntoIter = std::slice::Iter<'a, Bin>;

    fn into_iter(self) -> Self::IntoIter {
        self.bins.iter()
    }
}

/// Two columns per line: bin position and accumulated value.
impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bin in &self.bins {
            writeln!(f, "{:>12.4} {:>18.10}", bin.position(), bin.value)?;
        }
        Ok(())
    }
}
