//! Character frequency statistics
use crate::*;

pub trait CountFreq<K: Ord> {
    fn count_freq(&mut self, key: K);
}

/// Occurrence counts of each character, in first-seen order
///
/// The order is part of the contract: it decides how the tree builder breaks
/// ties between characters of equal weight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightTable {
    entries: Vec<(char, usize)>,
    index: BTreeMap<char, usize>,
}

impl CountFreq<char> for WeightTable {
    #[inline]
    fn count_freq(&mut self, key: char) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }
}

impl WeightTable {
    /// Counts every character of `text`.
    ///
    /// Fails with [`HuffmanError::Configuration`] unless at least two
    /// distinct characters are present.
    pub fn from_text(text: &str) -> Result<Self> {
        let table = Self::count(text.chars());
        table.ensure_buildable()?;
        Ok(table)
    }

    /// Counts every item of `iter` without any validation
    pub fn count(iter: impl IntoIterator<Item = char>) -> Self {
        let mut table = Self::default();
        for ch in iter {
            table.count_freq(ch);
        }
        table
    }

    /// Builds a table from explicit weights, merging repeated characters
    pub fn with_weights(iter: impl IntoIterator<Item = (char, usize)>) -> Self {
        let mut table = Self::default();
        for (ch, weight) in iter {
            match table.index.get(&ch) {
                Some(&slot) => table.entries[slot].1 += weight,
                None => {
                    table.index.insert(ch, table.entries.len());
                    table.entries.push((ch, weight));
                }
            }
        }
        table
    }

    pub(crate) fn ensure_buildable(&self) -> Result<()> {
        if self.len() < 2 {
            return Err(HuffmanError::Configuration {
                distinct: self.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, ch: char) -> Option<usize> {
        self.index.get(&ch).map(|&slot| self.entries[slot].1)
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.entries.iter().fold(0, |a, v| a + v.1)
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (char, usize)> + '_ {
        self.entries.iter().copied()
    }

    /// Shannon entropy in bits per character
    #[cfg(feature = "std")]
    pub fn entropy(&self) -> f64 {
        let total_size = self.total() as f64;
        let mut entropy = 0.0;
        for (_, count) in self.iter() {
            let p = count as f64 / total_size;
            if p > 0.0 {
                entropy -= p * p.log2();
            }
        }
        entropy
    }
}

impl<'a> IntoIterator for &'a WeightTable {
    type Item = (char, usize);
    type IntoIter = core::iter::Copied<core::slice::Iter<'a, (char, usize)>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_seen_order() {
        let table = WeightTable::from_text("STREETTEST").unwrap();
        assert_eq!(
            table.iter().collect::<Vec<_>>(),
            [('S', 2), ('T', 4), ('R', 1), ('E', 3)]
        );
        assert_eq!(table.len(), 4);
        assert_eq!(table.total(), 10);
        assert_eq!(table.get('E'), Some(3));
        assert_eq!(table.get('Z'), None);
    }

    #[test]
    fn needs_two_distinct() {
        assert_eq!(
            WeightTable::from_text("aaaa"),
            Err(HuffmanError::Configuration { distinct: 1 })
        );
        assert_eq!(
            WeightTable::from_text(""),
            Err(HuffmanError::Configuration { distinct: 0 })
        );
        assert!(WeightTable::from_text("ab").is_ok());
    }

    #[test]
    #[cfg(feature = "std")]
    fn entropy() {
        let table = WeightTable::from_text("STREETTEST").unwrap();
        assert!((table.entropy() - 1.846_439_344_671_015).abs() < 1e-9);
        assert_eq!(WeightTable::from_text("abab").unwrap().entropy(), 1.0);
        assert_eq!(WeightTable::default().entropy(), 0.0);
    }

    #[test]
    fn unicode() {
        let table = WeightTable::from_text("ñaña–ñ").unwrap();
        assert_eq!(
            table.iter().collect::<Vec<_>>(),
            [('ñ', 3), ('a', 2), ('–', 1)]
        );
    }
}
