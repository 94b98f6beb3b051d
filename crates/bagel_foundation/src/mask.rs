//! Fixed-capacity component bitsets.
//!
//! Every entity owns one [`Mask`] with one bit per registered component type.
//! Query loops test masks for hundreds of entities every frame, so the mask is
//! a small `Copy` array of words and every operation is branch-light and
//! allocation-free.

use std::fmt;

const WORD_BITS: usize = u64::BITS as usize;
const WORDS: usize = 2;

/// Maximum number of distinct component types a world can register.
pub const MASK_BITS: usize = WORD_BITS * WORDS;

/// Bit index assigned to a component type at registration.
///
/// Always less than [`MASK_BITS`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ComponentBit(u8);

impl ComponentBit {
    /// Creates a component bit.
    ///
    /// # Panics
    ///
    /// Panics if `index >= MASK_BITS`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(index: usize) -> Self {
        assert!(index < MASK_BITS, "component bit out of range");
        Self(index as u8)
    }

    /// Creates a component bit, returning `None` if `index` is out of range.
    #[must_use]
    pub const fn try_new(index: usize) -> Option<Self> {
        if index < MASK_BITS {
            Some(Self::new(index))
        } else {
            None
        }
    }

    /// Returns the bit index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    const fn word(self) -> usize {
        self.index() / WORD_BITS
    }

    const fn flag(self) -> u64 {
        1 << (self.index() % WORD_BITS)
    }
}

impl fmt::Debug for ComponentBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentBit({})", self.0)
    }
}

/// Bitset of component types.
///
/// Used both as the per-entity membership record and as the "required
/// components" argument of a query. `contains` is the subset test the scan
/// protocol relies on.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Mask {
    words: [u64; WORDS],
}

impl Mask {
    /// The empty mask.
    pub const EMPTY: Self = Self { words: [0; WORDS] };

    /// Creates an empty mask.
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Returns a copy of this mask with `bit` set.
    ///
    /// Handy for building query masks inline.
    #[must_use]
    pub const fn with(mut self, bit: ComponentBit) -> Self {
        self.words[bit.word()] |= bit.flag();
        self
    }

    /// Sets a single bit.
    pub fn set(&mut self, bit: ComponentBit) {
        self.words[bit.word()] |= bit.flag();
    }

    /// Clears a single bit.
    pub fn clear(&mut self, bit: ComponentBit) {
        self.words[bit.word()] &= !bit.flag();
    }

    /// Clears every bit.
    pub fn clear_all(&mut self) {
        self.words = [0; WORDS];
    }

    /// Tests a single bit.
    #[inline]
    #[must_use]
    pub const fn test(&self, bit: ComponentBit) -> bool {
        self.words[bit.word()] & bit.flag() != 0
    }

    /// Returns true if every bit of `other` is also set in `self`.
    ///
    /// An empty `other` is contained in every mask.
    #[inline]
    #[must_use]
    pub fn contains(&self, other: &Mask) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .all(|(mine, theirs)| mine & theirs == *theirs)
    }

    /// Returns true if `self` and `other` share at least one bit.
    #[must_use]
    pub fn intersects(&self, other: &Mask) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .any(|(mine, theirs)| mine & theirs != 0)
    }

    /// Returns the union of two masks.
    #[must_use]
    pub fn union(&self, other: &Mask) -> Mask {
        let mut words = self.words;
        for (word, theirs) in words.iter_mut().zip(other.words.iter()) {
            *word |= theirs;
        }
        Mask { words }
    }

    /// Returns the bits of `self` that are not in `other`.
    #[must_use]
    pub fn difference(&self, other: &Mask) -> Mask {
        let mut words = self.words;
        for (word, theirs) in words.iter_mut().zip(other.words.iter()) {
            *word &= !theirs;
        }
        Mask { words }
    }

    /// Returns true if no bit is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Returns the number of set bits.
    #[must_use]
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns the lowest set bit, or `None` if the mask is empty.
    ///
    /// `None` means "no components attached". It says nothing about whether
    /// the owning entity is alive.
    #[must_use]
    pub fn lowest_set_bit(&self) -> Option<ComponentBit> {
        self.words.iter().enumerate().find_map(|(i, w)| {
            (*w != 0).then(|| ComponentBit::new(i * WORD_BITS + w.trailing_zeros() as usize))
        })
    }

    /// Iterates over the set bits in ascending order.
    #[must_use]
    pub fn iter(&self) -> MaskBits {
        MaskBits {
            words: self.words,
            word: 0,
        }
    }
}

impl FromIterator<ComponentBit> for Mask {
    fn from_iter<I: IntoIterator<Item = ComponentBit>>(iter: I) -> Self {
        let mut mask = Mask::new();
        for bit in iter {
            mask.set(bit);
        }
        mask
    }
}

impl IntoIterator for &Mask {
    type Item = ComponentBit;
    type IntoIter = MaskBits;

    fn into_iter(self) -> MaskBits {
        self.iter()
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Mask")?;
        f.debug_set().entries(self.iter().map(ComponentBit::index)).finish()
    }
}

/// Iterator over the set bits of a [`Mask`], lowest first.
///
/// Works on a snapshot of the words, so the mask it came from may be
/// modified while iterating.
#[derive(Clone, Debug)]
pub struct MaskBits {
    words: [u64; WORDS],
    word: usize,
}

impl Iterator for MaskBits {
    type Item = ComponentBit;

    fn next(&mut self) -> Option<ComponentBit> {
        while self.word < WORDS {
            let w = self.words[self.word];
            if w != 0 {
                self.words[self.word] = w & (w - 1);
                return Some(ComponentBit::new(
                    self.word * WORD_BITS + w.trailing_zeros() as usize,
                ));
            }
            self.word += 1;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining: usize = self.words[self.word.min(WORDS)..]
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MaskBits {}
