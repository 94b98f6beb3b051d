//! Payload-free storage for marker components.

use bagel_foundation::EntityId;

use super::{ComponentStore, StorageKind};

const WORD_BITS: usize = u64::BITS as usize;

/// Storage for zero-sized marker components.
///
/// Holds one membership bit per entity id and nothing else. Fetching hands
/// out a reference to a single shared marker value, which is sound only
/// because `T` has no state; the zero-size requirement is checked at
/// compile time when the store is instantiated.
#[derive(Clone, Debug)]
pub struct TaggedStore<T> {
    members: Vec<u64>,
    len: usize,
    marker: T,
}

impl<T: Default> Default for TaggedStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default> TaggedStore<T> {
    /// Creates an empty store.
    ///
    /// Fails to compile for a `T` that is not zero-sized.
    #[must_use]
    pub fn new() -> Self {
        const {
            assert!(
                size_of::<T>() == 0,
                "tagged components must be zero-sized"
            );
        }
        Self {
            members: Vec::new(),
            len: 0,
            marker: T::default(),
        }
    }

    /// Iterates member ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.members.iter().enumerate().flat_map(|(w, word)| {
            let mut bits = *word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let bit = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                #[allow(clippy::cast_possible_truncation)]
                let id = EntityId::new((w * WORD_BITS + bit) as u32);
                Some(id)
            })
        })
    }

    fn locate(id: EntityId) -> (usize, u64) {
        (id.slot() / WORD_BITS, 1 << (id.slot() % WORD_BITS))
    }
}

impl<T: Default + 'static> ComponentStore<T> for TaggedStore<T> {
    const KIND: StorageKind = StorageKind::Tagged;

    fn insert(&mut self, id: EntityId, _value: T) -> Option<T> {
        let (word, flag) = Self::locate(id);
        if word >= self.members.len() {
            self.members.resize(word + 1, 0);
        }
        if self.members[word] & flag != 0 {
            return Some(T::default());
        }
        self.members[word] |= flag;
        self.len += 1;
        None
    }

    fn get(&self, id: EntityId) -> Option<&T> {
        self.contains(id).then_some(&self.marker)
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        if self.contains(id) {
            Some(&mut self.marker)
        } else {
            None
        }
    }

    fn remove(&mut self, id: EntityId) -> Option<T> {
        let (word, flag) = Self::locate(id);
        let slot = self.members.get_mut(word)?;
        if *slot & flag == 0 {
            return None;
        }
        *slot &= !flag;
        self.len -= 1;
        Some(T::default())
    }

    fn contains(&self, id: EntityId) -> bool {
        let (word, flag) = Self::locate(id);
        self.members.get(word).is_some_and(|w| w & flag != 0)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        self.members.clear();
        self.len = 0;
    }

    fn reserve(&mut self, additional: usize) {
        self.members.reserve(additional.div_ceil(WORD_BITS));
    }
}
