// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Slot store handing out kind-tagged, generation-checked handles.
//!
//! Every object a session owns lives in an [`ObjectHeap`]. Free slots are threaded into a free
//! list so that allocation, lookup and release are all O(1). The table grows by a fixed number
//! of slots whenever the free list runs dry, and never shrinks until it is destroyed.
//!
//! A handle ([`ObjectId`]) is a plain `u32` so it can cross an FFI-style dispatch boundary:
//!
//! ```text
//!  31 30        24 23        16 15                0
//! +--+------------+------------+-------------------+
//! |  |    kind    | generation |    slot index     |
//! +--+------------+------------+-------------------+
//! ```
//!
//! The kind bits keep handles of different tables apart, the generation rejects handles to a
//! slot that was freed and handed out again.

use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

use static_assertions::const_assert;
use static_assertions::const_assert_eq;

use crate::status::VaError;
use crate::status::VaResult;

/// Number of slots added each time a table runs out of free slots.
pub const OBJECT_HEAP_INCREMENT: usize = 16;

const INDEX_BITS: u32 = 16;
const INDEX_MASK: u32 = (1 << INDEX_BITS) - 1;
const GENERATION_SHIFT: u32 = INDEX_BITS;
const GENERATION_MASK: u32 = 0xff << GENERATION_SHIFT;
const KIND_SHIFT: u32 = 24;
const KIND_MASK: u32 = 0x7f << KIND_SHIFT;

/// Largest number of slots a single table can hold.
pub const MAX_HEAP_OBJECTS: usize = 1 << INDEX_BITS;

const_assert_eq!(INDEX_MASK & GENERATION_MASK, 0);
const_assert_eq!(GENERATION_MASK & KIND_MASK, 0);
const_assert_eq!(INDEX_MASK | GENERATION_MASK | KIND_MASK, 0x7fff_ffff);
const_assert!(OBJECT_HEAP_INCREMENT <= MAX_HEAP_OBJECTS);

/// The four object tables of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Config,
    Context,
    Surface,
    Buffer,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 4] =
        [ObjectKind::Config, ObjectKind::Context, ObjectKind::Surface, ObjectKind::Buffer];

    /// The tag stored in bits 24..30 of every handle of this kind.
    pub const fn tag(self) -> u32 {
        match self {
            ObjectKind::Config => 0x01,
            ObjectKind::Context => 0x02,
            ObjectKind::Surface => 0x04,
            ObjectKind::Buffer => 0x08,
        }
    }

    fn from_tag(tag: u32) -> Option<Self> {
        ObjectKind::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectKind::Config => "config",
            ObjectKind::Context => "context",
            ObjectKind::Surface => "surface",
            ObjectKind::Buffer => "buffer",
        };
        f.write_str(name)
    }
}

/// Handle to an object of type `T` stored in an [`ObjectHeap<T>`].
///
/// The type parameter only exists at compile time; the handle itself is a `u32` and can be
/// rebuilt from the raw value with [`ObjectId::from_raw`]. Lookups validate such handles again.
pub struct ObjectId<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ObjectId<T> {
    /// The handle that never resolves in any table.
    pub const INVALID: Self = Self::from_raw(u32::MAX);

    pub const fn from_raw(raw: u32) -> Self {
        Self { raw, _marker: PhantomData }
    }

    fn new(kind: ObjectKind, generation: u8, index: usize) -> Self {
        debug_assert!(index < MAX_HEAP_OBJECTS);
        Self::from_raw(
            (kind.tag() << KIND_SHIFT)
                | ((generation as u32) << GENERATION_SHIFT)
                | (index as u32 & INDEX_MASK),
        )
    }

    pub const fn raw(self) -> u32 {
        self.raw
    }

    /// The kind encoded in the handle, or `None` if the tag bits match no table.
    pub fn kind(self) -> Option<ObjectKind> {
        ObjectKind::from_tag((self.raw & KIND_MASK) >> KIND_SHIFT)
    }

    pub fn index(self) -> usize {
        (self.raw & INDEX_MASK) as usize
    }

    fn generation(self) -> u8 {
        ((self.raw & GENERATION_MASK) >> GENERATION_SHIFT) as u8
    }

    pub fn is_invalid(self) -> bool {
        self.raw == u32::MAX
    }
}

impl<T> Clone for ObjectId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ObjectId<T> {}

impl<T> PartialEq for ObjectId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for ObjectId<T> {}

impl<T> Hash for ObjectId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for ObjectId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({:#010x})", self.raw)
    }
}

impl<T> fmt::Display for ObjectId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.raw)
    }
}

impl<T> From<ObjectId<T>> for u32 {
    fn from(id: ObjectId<T>) -> Self {
        id.raw
    }
}

enum Slot<T> {
    Free { next_free: Option<usize> },
    Allocated(T),
}

struct Entry<T> {
    // Bumped every time the slot is freed.
    generation: u8,
    slot: Slot<T>,
}

/// Position of a stop-and-resume walk over a heap, see [`ObjectHeap::next_live`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeapCursor {
    next_index: usize,
}

impl HeapCursor {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct ObjectHeap<T> {
    kind: ObjectKind,
    entries: Vec<Entry<T>>,
    next_free: Option<usize>,
    increment: usize,
    max_objects: usize,
    live: usize,
}

impl<T> ObjectHeap<T> {
    pub fn new(kind: ObjectKind) -> Self {
        Self::with_limits(kind, OBJECT_HEAP_INCREMENT, MAX_HEAP_OBJECTS)
    }

    /// Creates an empty table growing by `increment` slots up to `max_objects` slots. The
    /// maximum is clamped to what the handle layout can address.
    pub fn with_limits(kind: ObjectKind, increment: usize, max_objects: usize) -> Self {
        assert!(increment > 0, "{} heap created with a zero growth increment", kind);
        Self {
            kind,
            entries: Vec::new(),
            next_free: None,
            increment,
            max_objects: max_objects.min(MAX_HEAP_OBJECTS),
            live: 0,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots, live or free.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    fn expand(&mut self) -> VaResult<()> {
        let start = self.entries.len();
        let grow = self.increment.min(self.max_objects.saturating_sub(start));
        if grow == 0 {
            log::debug!("{} heap is full ({} slots)", self.kind, start);
            return Err(VaError::AllocationFailed(self.kind));
        }
        self.entries.try_reserve_exact(grow).map_err(|_| VaError::AllocationFailed(self.kind))?;

        // Chain the new block so that its lowest slot is handed out first.
        let end = start + grow;
        for index in start..end {
            let next_free = if index + 1 < end { Some(index + 1) } else { self.next_free };
            self.entries.push(Entry { generation: 0, slot: Slot::Free { next_free } });
        }
        self.next_free = Some(start);

        Ok(())
    }

    /// Stores `value` in a free slot, growing the table if needed, and returns its handle.
    pub fn insert(&mut self, value: T) -> VaResult<ObjectId<T>> {
        if self.next_free.is_none() {
            self.expand()?;
        }
        let index = self.next_free.ok_or(VaError::AllocationFailed(self.kind))?;

        let entry = &mut self.entries[index];
        let next_free = match entry.slot {
            Slot::Free { next_free } => next_free,
            Slot::Allocated(_) => {
                panic!("{} heap free list points at live slot {}", self.kind, index)
            }
        };
        entry.slot = Slot::Allocated(value);
        self.next_free = next_free;
        self.live += 1;

        Ok(ObjectId::new(self.kind, entry.generation, index))
    }

    pub fn allocate(&mut self) -> VaResult<ObjectId<T>>
    where
        T: Default,
    {
        self.insert(T::default())
    }

    pub fn lookup(&self, id: ObjectId<T>) -> Option<&T> {
        if id.kind() != Some(self.kind) {
            return None;
        }
        let entry = self.entries.get(id.index())?;
        match &entry.slot {
            Slot::Allocated(value) if entry.generation == id.generation() => Some(value),
            _ => None,
        }
    }

    pub fn lookup_mut(&mut self, id: ObjectId<T>) -> Option<&mut T> {
        if id.kind() != Some(self.kind) {
            return None;
        }
        let entry = self.entries.get_mut(id.index())?;
        let generation = entry.generation;
        match &mut entry.slot {
            Slot::Allocated(value) if generation == id.generation() => Some(value),
            _ => None,
        }
    }

    pub fn contains(&self, id: ObjectId<T>) -> bool {
        self.lookup(id).is_some()
    }

    /// Releases the object behind `id` and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not denote a live object of this table. Callers are expected to
    /// have resolved the handle first.
    pub fn free(&mut self, id: ObjectId<T>) -> T {
        assert!(self.contains(id), "{} handle {:?} is not allocated", self.kind, id);

        let index = id.index();
        let entry = &mut self.entries[index];
        let slot = std::mem::replace(&mut entry.slot, Slot::Free { next_free: self.next_free });
        entry.generation = entry.generation.wrapping_add(1);
        self.next_free = Some(index);
        self.live -= 1;

        match slot {
            Slot::Allocated(value) => value,
            Slot::Free { .. } => unreachable!(),
        }
    }

    /// Like [`ObjectHeap::free`], with `None` being a no-op.
    pub fn free_opt(&mut self, id: Option<ObjectId<T>>) -> Option<T> {
        id.map(|id| self.free(id))
    }

    /// Live objects in increasing slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId<T>, &T)> + '_ {
        let kind = self.kind;
        self.entries.iter().enumerate().filter_map(move |(index, entry)| match &entry.slot {
            Slot::Allocated(value) => Some((ObjectId::new(kind, entry.generation, index), value)),
            Slot::Free { .. } => None,
        })
    }

    /// Handles of the live objects, in slot order.
    pub fn ids(&self) -> Vec<ObjectId<T>> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// Returns the next live handle at or after `cursor` and advances it. No borrow is held
    /// between calls, so the returned object may be freed before resuming.
    pub fn next_live(&self, cursor: &mut HeapCursor) -> Option<ObjectId<T>> {
        while cursor.next_index < self.entries.len() {
            let index = cursor.next_index;
            cursor.next_index += 1;
            let entry = &self.entries[index];
            if let Slot::Allocated(_) = entry.slot {
                return Some(ObjectId::new(self.kind, entry.generation, index));
            }
        }
        None
    }

    /// Releases the table's storage.
    ///
    /// # Panics
    ///
    /// Panics if any object is still live.
    pub fn destroy(self) {
        assert!(
            self.live == 0,
            "destroying {} heap with {} objects still allocated",
            self.kind,
            self.live
        );
        log::debug!("destroyed {} heap ({} slots)", self.kind, self.entries.len());
    }
}

impl<T> fmt::Debug for ObjectHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHeap")
            .field("kind", &self.kind)
            .field("live", &self.live)
            .field("capacity", &self.entries.len())
            .field("increment", &self.increment)
            .field("max_objects", &self.max_objects)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::rngs::StdRng;
    use rand::Rng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_allocate_lookup_free() {
        let mut heap = ObjectHeap::<u32>::new(ObjectKind::Surface);
        let id = heap.insert(42).unwrap();

        assert_eq!(id.kind(), Some(ObjectKind::Surface));
        assert_eq!(heap.lookup(id), Some(&42));
        *heap.lookup_mut(id).unwrap() = 43;
        assert_eq!(heap.len(), 1);

        assert_eq!(heap.free(id), 43);
        assert_eq!(heap.lookup(id), None);
        assert!(heap.is_empty());
        heap.destroy();
    }

    #[test]
    fn test_handle_layout() {
        let mut heap = ObjectHeap::<u32>::new(ObjectKind::Buffer);
        let id = heap.insert(0).unwrap();
        assert_eq!(id.raw(), 0x0800_0000);

        heap.free(id);
        let reused = heap.insert(0).unwrap();
        assert_eq!(reused.index(), 0);
        assert_eq!(reused.raw(), 0x0801_0000);
        heap.free(reused);
    }

    #[test]
    fn test_stale_handle_rejected() {
        let mut heap = ObjectHeap::<u32>::new(ObjectKind::Config);
        let old = heap.insert(1).unwrap();
        heap.free(old);
        let new = heap.insert(2).unwrap();

        assert_eq!(old.index(), new.index());
        assert_ne!(old, new);
        assert_eq!(heap.lookup(old), None);
        assert!(!heap.contains(old));
        assert_eq!(heap.lookup(new), Some(&2));
    }

    #[test]
    fn test_no_aliasing_across_kinds() {
        let mut configs = ObjectHeap::<u32>::new(ObjectKind::Config);
        let mut surfaces = ObjectHeap::<u32>::new(ObjectKind::Surface);
        let config = configs.insert(1).unwrap();
        let surface = surfaces.insert(2).unwrap();

        assert_eq!(config.index(), surface.index());
        assert_ne!(config.raw(), surface.raw());
        assert_eq!(surfaces.lookup(ObjectId::from_raw(config.raw())), None);
        assert_eq!(configs.lookup(ObjectId::from_raw(surface.raw())), None);
    }

    #[test]
    fn test_invalid_handle() {
        let mut heap = ObjectHeap::<u32>::new(ObjectKind::Context);
        heap.insert(0).unwrap();

        let invalid = ObjectId::<u32>::INVALID;
        assert!(invalid.is_invalid());
        assert_eq!(invalid.kind(), None);
        assert_eq!(heap.lookup(invalid), None);
        assert_eq!(heap.lookup(ObjectId::from_raw(0x0200_0400)), None);
    }

    #[test]
    fn test_growth_and_allocation_order() {
        let mut heap = ObjectHeap::<usize>::new(ObjectKind::Buffer);
        assert_eq!(heap.capacity(), 0);

        let ids: Vec<_> = (0..OBJECT_HEAP_INCREMENT + 1).map(|i| heap.insert(i).unwrap()).collect();
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
        assert_eq!(heap.capacity(), 2 * OBJECT_HEAP_INCREMENT);

        // Freed slots are reused last-in first-out.
        heap.free(ids[3]);
        heap.free(ids[7]);
        assert_eq!(heap.insert(100).unwrap().index(), 7);
        assert_eq!(heap.insert(101).unwrap().index(), 3);
        assert_eq!(heap.insert(102).unwrap().index(), OBJECT_HEAP_INCREMENT + 1);
    }

    #[test]
    fn test_allocation_limit() {
        let mut heap = ObjectHeap::<u32>::with_limits(ObjectKind::Surface, 4, 6);
        for i in 0..6 {
            heap.insert(i).unwrap();
        }
        assert_eq!(heap.capacity(), 6);
        assert_eq!(heap.insert(6), Err(VaError::AllocationFailed(ObjectKind::Surface)));
        assert_eq!(heap.len(), 6);
    }

    #[test]
    fn test_iter_in_slot_order() {
        let mut heap = ObjectHeap::<u32>::new(ObjectKind::Context);
        let ids: Vec<_> = (0..5).map(|i| heap.insert(i * 10).unwrap()).collect();
        heap.free(ids[1]);
        heap.free(ids[3]);

        let live: Vec<_> = heap.iter().map(|(id, value)| (id.index(), *value)).collect();
        assert_eq!(live, vec![(0, 0), (2, 20), (4, 40)]);
        // Restartable.
        assert_eq!(heap.iter().count(), 3);
        assert_eq!(heap.ids(), vec![ids[0], ids[2], ids[4]]);
    }

    #[test]
    fn test_cursor_resume_while_freeing() {
        let mut heap = ObjectHeap::<u32>::new(ObjectKind::Buffer);
        for i in 0..20 {
            heap.insert(i).unwrap();
        }

        let mut cursor = HeapCursor::new();
        let mut visited = 0;
        while let Some(id) = heap.next_live(&mut cursor) {
            heap.free(id);
            visited += 1;
        }
        assert_eq!(visited, 20);
        assert!(heap.is_empty());
        assert_eq!(heap.next_live(&mut cursor), None);
        heap.destroy();
    }

    #[test]
    fn test_allocate_default_and_free_opt() {
        let mut heap = ObjectHeap::<u32>::new(ObjectKind::Config);
        assert_eq!(heap.free_opt(None), None);
        let id = heap.allocate().unwrap();
        assert_eq!(heap.lookup(id), Some(&0));
        assert_eq!(heap.free_opt(Some(id)), Some(0));
        assert_eq!(heap.lookup(id), None);
    }

    #[test]
    #[should_panic(expected = "is not allocated")]
    fn test_double_free_panics() {
        let mut heap = ObjectHeap::<u32>::new(ObjectKind::Surface);
        let id = heap.insert(0).unwrap();
        heap.free(id);
        heap.free(id);
    }

    #[test]
    #[should_panic(expected = "objects still allocated")]
    fn test_destroy_non_empty_panics() {
        let mut heap = ObjectHeap::<u32>::new(ObjectKind::Context);
        heap.insert(0).unwrap();
        heap.destroy();
    }

    #[test]
    #[should_panic(expected = "zero growth increment")]
    fn test_zero_increment_panics() {
        let _ = ObjectHeap::<u32>::with_limits(ObjectKind::Config, 0, 16);
    }

    #[test]
    fn test_random_sequences_match_model() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut heap = ObjectHeap::<u64>::new(ObjectKind::Buffer);
        let mut model: HashMap<ObjectId<u64>, u64> = HashMap::new();
        let mut freed = Vec::new();

        for step in 0..4000u64 {
            if model.is_empty() || rng.gen_bool(0.55) {
                let id = heap.insert(step).unwrap();
                assert!(model.insert(id, step).is_none(), "handle {:?} handed out twice", id);
            } else {
                let victim = *model.keys().nth(rng.gen_range(0..model.len())).unwrap();
                assert_eq!(heap.free(victim), model.remove(&victim).unwrap());
                freed.push(victim);
            }

            assert_eq!(heap.len(), model.len());
        }

        for (id, value) in &model {
            assert_eq!(heap.lookup(*id), Some(value));
        }
        for id in freed.iter().filter(|id| !model.contains_key(id)) {
            assert_eq!(heap.lookup(*id), None);
        }

        let mut cursor = HeapCursor::new();
        while let Some(id) = heap.next_live(&mut cursor) {
            heap.free(id);
        }
        heap.destroy();
    }
}
