//! Small sets of family indices.

use std::fmt;

use smallvec::SmallVec;

const WORD_BITS: usize = u64::BITS as usize;

/// A set of family indices, stored as a bit-set.
///
/// Families are small, so the first 64 indices live inline. Trailing zero
/// words are never stored, which keeps equality and hashing structural.
///
/// # Examples
///
/// ```rust
/// use datafix::family::IndexSet;
///
/// let reads: IndexSet = [0, 3].into_iter().collect();
/// let writes = IndexSet::singleton(3);
///
/// assert!(reads.intersects(&writes));
/// assert_eq!(reads.to_string(), "{0, 3}");
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexSet {
    words: SmallVec<[u64; 1]>,
}

impl IndexSet {
    /// The empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The set holding only `index`.
    #[must_use]
    pub fn singleton(index: usize) -> Self {
        let mut set = Self::new();
        set.insert(index);
        set
    }

    /// Adds `index`. Returns `true` if it was absent.
    pub fn insert(&mut self, index: usize) -> bool {
        let (word, bit) = (index / WORD_BITS, index % WORD_BITS);
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
        let mask = 1 << bit;
        let absent = self.words[word] & mask == 0;
        self.words[word] |= mask;
        absent
    }

    /// Returns `true` if `index` is in the set.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.words
            .get(index / WORD_BITS)
            .is_some_and(|word| word & (1 << (index % WORD_BITS)) != 0)
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of indices in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// The union of both sets.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let (long, short) = if self.words.len() >= other.words.len() {
            (self, other)
        } else {
            (other, self)
        };
        let mut words = long.words.clone();
        for (word, extra) in words.iter_mut().zip(short.words.iter()) {
            *word |= extra;
        }
        Self { words }
    }

    /// The intersection of both sets.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut words: SmallVec<[u64; 1]> = self
            .words
            .iter()
            .zip(other.words.iter())
            .map(|(left, right)| left & right)
            .collect();
        while words.last() == Some(&0) {
            words.pop();
        }
        Self { words }
    }

    /// Returns `true` if the sets share an index.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .any(|(left, right)| left & right != 0)
    }

    /// Iterates over the indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(position, word)| {
            (0..WORD_BITS)
                .filter(move |bit| word & (1 << bit) != 0)
                .map(move |bit| position * WORD_BITS + bit)
        })
    }
}

impl FromIterator<usize> for IndexSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = Self::new();
        for index in iter {
            set.insert(index);
        }
        set
    }
}

impl fmt::Display for IndexSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        for (position, index) in self.iter().enumerate() {
            if position > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{index}")?;
        }
        write!(formatter, "}}")
    }
}

impl fmt::Debug for IndexSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "IndexSet{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_insert_reports_novelty() {
        let mut set = IndexSet::new();

        assert!(set.insert(70));
        assert!(!set.insert(70));
        assert!(set.contains(70));
        assert!(!set.contains(6));
        assert_eq!(set.len(), 1);
    }

    #[rstest]
    fn test_intersection_normalizes_trailing_words() {
        let high: IndexSet = [1, 100].into_iter().collect();
        let low: IndexSet = [1, 2].into_iter().collect();

        assert_eq!(high.intersection(&low), IndexSet::singleton(1));
        assert_eq!(IndexSet::singleton(100).intersection(&low), IndexSet::new());
    }

    #[rstest]
    #[case(&[0, 1], &[2], false)]
    #[case(&[0, 65], &[65], true)]
    #[case(&[], &[], false)]
    fn test_intersects(#[case] left: &[usize], #[case] right: &[usize], #[case] expected: bool) {
        let left: IndexSet = left.iter().copied().collect();
        let right: IndexSet = right.iter().copied().collect();

        assert_eq!(left.intersects(&right), expected);
    }

    #[rstest]
    fn test_union_and_iteration_order() {
        let union = IndexSet::singleton(64).union(&[3, 0].into_iter().collect());

        assert_eq!(union.iter().collect::<Vec<_>>(), vec![0, 3, 64]);
        assert_eq!(union.to_string(), "{0, 3, 64}");
    }
}
