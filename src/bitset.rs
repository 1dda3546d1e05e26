//! Compact bit sets for choice masks, state masks and target sets.
//!
//! Every model in this crate addresses its states and choices by dense indices,
//! so "which choices does this family enable" or "which states are targets" is
//! most naturally a set of small integers.

/// A simple bit set backed by a vector of u64 words.
///
/// The bit set automatically grows as needed when setting bits beyond the
/// current capacity. Equality compares the set contents, not the capacity.
#[derive(Debug, Clone)]
pub struct BitSet {
    /// Storage: each u64 holds 64 bits
    words: Vec<u64>,
    /// Number of set bits (cached for O(1) len())
    count: usize,
}

impl BitSet {
    /// Number of bits per word.
    const BITS_PER_WORD: usize = 64;

    /// Creates a new empty bit set with the given capacity (in bits).
    pub fn new(capacity: usize) -> Self {
        let num_words = capacity.div_ceil(Self::BITS_PER_WORD);
        Self {
            words: vec![0; num_words],
            count: 0,
        }
    }

    /// Creates an empty bit set with no pre-allocated capacity.
    pub fn empty() -> Self {
        Self {
            words: Vec::new(),
            count: 0,
        }
    }

    /// Creates a bit set with all bits in `0..size` set.
    pub fn full(size: usize) -> Self {
        let mut bs = Self::new(size);
        bs.extend(0..size);
        bs
    }

    /// Returns the number of set bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if no bits are set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the capacity in bits.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.words.len() * Self::BITS_PER_WORD
    }

    /// Gets the word index and bit position for a given bit index.
    #[inline]
    fn word_and_bit(index: usize) -> (usize, usize) {
        let word = index / Self::BITS_PER_WORD;
        let bit = index % Self::BITS_PER_WORD;
        (word, bit)
    }

    /// Returns true if the bit at the given index is set.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        if word_idx >= self.words.len() {
            return false;
        }
        let mask = 1u64 << bit_idx;
        (self.words[word_idx] & mask) != 0
    }

    /// Sets the bit at the given index. Returns true if the bit was not previously set.
    #[inline]
    pub fn insert(&mut self, index: usize) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(index);

        // Grow if necessary
        if word_idx >= self.words.len() {
            self.words.resize(word_idx + 1, 0);
        }

        let mask = 1u64 << bit_idx;
        let was_clear = (self.words[word_idx] & mask) == 0;

        if was_clear {
            self.words[word_idx] |= mask;
            self.count += 1;
        }

        was_clear
    }

    /// Clears the bit at the given index. Returns true if the bit was previously set.
    #[inline]
    pub fn remove(&mut self, index: usize) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(index);

        if word_idx >= self.words.len() {
            return false;
        }

        let mask = 1u64 << bit_idx;
        let was_set = (self.words[word_idx] & mask) != 0;

        if was_set {
            self.words[word_idx] &= !mask;
            self.count -= 1;
        }

        was_set
    }

    /// Clears all bits.
    pub fn clear(&mut self) {
        for word in &mut self.words {
            *word = 0;
        }
        self.count = 0;
    }

    /// Extends the bit set by setting all bits from an iterator.
    pub fn extend(&mut self, iter: impl IntoIterator<Item = usize>) {
        for index in iter {
            self.insert(index);
        }
    }

    /// Sets every bit that is set in `other`.
    pub fn union_with(&mut self, other: &BitSet) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w |= *o;
        }
        self.recount();
    }

    /// Keeps only the bits that are also set in `other`.
    pub fn intersect_with(&mut self, other: &BitSet) {
        for (i, w) in self.words.iter_mut().enumerate() {
            *w &= other.words.get(i).copied().unwrap_or(0);
        }
        self.recount();
    }

    /// Returns true if every bit set in `self` is also set in `other`.
    pub fn is_subset(&self, other: &BitSet) -> bool {
        self.words
            .iter()
            .enumerate()
            .all(|(i, w)| w & !other.words.get(i).copied().unwrap_or(0) == 0)
    }

    fn recount(&mut self) {
        self.count = self.words.iter().map(|w| w.count_ones() as usize).sum();
    }

    /// Returns an iterator over all set bit indices.
    pub fn iter(&self) -> BitSetIter<'_> {
        BitSetIter {
            bitset: self,
            word_idx: 0,
            current_word: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl Default for BitSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for BitSet {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.is_subset(other)
    }
}

impl Eq for BitSet {}

impl FromIterator<usize> for BitSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut bs = BitSet::empty();
        bs.extend(iter);
        bs
    }
}

impl<'a> IntoIterator for &'a BitSet {
    type Item = usize;
    type IntoIter = BitSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over set bits in a BitSet.
pub struct BitSetIter<'a> {
    bitset: &'a BitSet,
    word_idx: usize,
    current_word: u64,
}

impl Iterator for BitSetIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let bit_idx = self.current_word.trailing_zeros() as usize;
                self.current_word &= self.current_word - 1; // Clear lowest set bit
                return Some(self.word_idx * BitSet::BITS_PER_WORD + bit_idx);
            }

            self.word_idx += 1;
            if self.word_idx >= self.bitset.words.len() {
                return None;
            }
            self.current_word = self.bitset.words[self.word_idx];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let bs = BitSet::empty();
        assert!(bs.is_empty());
        assert_eq!(bs.len(), 0);
        assert!(!bs.contains(0));
        assert!(!bs.contains(100));
    }

    #[test]
    fn test_insert_remove() {
        let mut bs = BitSet::new(100);
        assert!(bs.insert(42));
        assert!(!bs.insert(42));
        assert!(bs.contains(42));
        assert!(bs.remove(42));
        assert!(!bs.remove(42));
        assert_eq!(bs.len(), 0);
    }

    #[test]
    fn test_full() {
        let bs = BitSet::full(70);
        assert_eq!(bs.len(), 70);
        assert!(bs.contains(0));
        assert!(bs.contains(69));
        assert!(!bs.contains(70));
    }

    #[test]
    fn test_iter_across_words() {
        let bs: BitSet = [5, 10, 3, 64, 65].into_iter().collect();
        let indices: Vec<_> = bs.iter().collect();
        assert_eq!(indices, vec![3, 5, 10, 64, 65]);
    }

    #[test]
    fn test_union_intersect() {
        let mut a: BitSet = [1, 2, 100].into_iter().collect();
        let b: BitSet = [2, 3].into_iter().collect();

        let mut c = a.clone();
        c.union_with(&b);
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![1, 2, 3, 100]);
        assert_eq!(c.len(), 4);

        a.intersect_with(&b);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![2]);
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_subset_and_eq_ignore_capacity() {
        let a: BitSet = [1, 2].into_iter().collect();
        let mut b = BitSet::new(1000);
        b.extend([1, 2]);
        assert_eq!(a, b);
        assert!(a.is_subset(&b));

        b.insert(500);
        assert_ne!(a, b);
        assert!(a.is_subset(&b));
        assert!(!b.is_subset(&a));
    }

    #[test]
    fn test_clear() {
        let mut bs = BitSet::full(10);
        bs.clear();
        assert!(bs.is_empty());
        assert!(!bs.contains(3));
    }
}
