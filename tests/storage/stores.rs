//! Integration tests for the storage backends
//!
//! Tests the shared store contract against all three backends.

use bagel_foundation::EntityId;
use bagel_storage::{ComponentStore, PackedStore, SparseStore, StorageKind, TaggedStore};

use crate::common::{Collidable, Name, Position};

fn id(i: u32) -> EntityId {
    EntityId::new(i)
}

// =============================================================================
// Packed
// =============================================================================

#[test]
fn packed_swap_remove_keeps_lookup_valid() {
    let mut store = PackedStore::new();
    for i in 0..4 {
        store.insert(id(i), Position { x: i as f32, y: 0.0 });
    }

    assert_eq!(store.remove(id(0)).map(|p| p.x), Some(0.0));
    // The last value moved into slot 0.
    assert_eq!(store.owners()[0], id(3));
    assert_eq!(store.slot_of(id(3)), Some(0));
    assert_eq!(store.get(id(3)).map(|p| p.x), Some(3.0));
    assert_eq!(store.len(), 3);
}

#[test]
fn packed_overwrite_does_not_grow() {
    let mut store = PackedStore::new();
    store.insert(id(2), Position::default());
    let old = store.insert(id(2), Position { x: 1.0, y: 1.0 });

    assert_eq!(old, Some(Position::default()));
    assert_eq!(store.len(), 1);
    assert_eq!(store.as_slice(), &[Position { x: 1.0, y: 1.0 }]);
}

#[test]
fn packed_removing_last_value() {
    let mut store = PackedStore::new();
    store.insert(id(7), Position::default());
    assert!(store.remove(id(7)).is_some());
    assert!(store.is_empty());
    assert!(!store.contains(id(7)));
}

// =============================================================================
// Sparse
// =============================================================================

#[test]
fn sparse_indexes_by_id() {
    let mut store = SparseStore::new();
    store.insert(id(9), Name("far".into()));

    assert!(store.capacity_ids() >= 10);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(id(9)), Some(&Name("far".into())));
    assert_eq!(store.get(id(3)), None);
}

#[test]
fn sparse_remove_absent_is_noop() {
    let mut store: SparseStore<Name> = SparseStore::new();
    assert_eq!(store.remove(id(100)), None);
    assert_eq!(store.len(), 0);
}

// =============================================================================
// Tagged
// =============================================================================

#[test]
fn tagged_tracks_membership_only() {
    let mut store = TaggedStore::new();
    assert_eq!(store.insert(id(65), Collidable), None);
    assert_eq!(store.insert(id(65), Collidable), Some(Collidable));

    assert_eq!(store.len(), 1);
    assert!(store.contains(id(65)));
    assert_eq!(store.iter().collect::<Vec<_>>(), vec![id(65)]);
}

// =============================================================================
// Kinds
// =============================================================================

#[test]
fn backends_report_their_kind() {
    assert_eq!(<PackedStore<Position> as ComponentStore<_>>::KIND, StorageKind::Packed);
    assert_eq!(<SparseStore<Name> as ComponentStore<_>>::KIND, StorageKind::Sparse);
    assert_eq!(<TaggedStore<Collidable> as ComponentStore<_>>::KIND, StorageKind::Tagged);
}
