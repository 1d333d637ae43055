//! Chunk arena backing the world store.

use std::collections::VecDeque;

use snail_run_core::{ChunkBlueprint, ChunkId, Coin, Enemy, Platform};

/// One generated chunk as stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct ChunkSlot {
    /// Identifier allocated when the chunk was appended.
    pub(crate) id: ChunkId,
    /// Platform anchoring the chunk.
    pub(crate) platform: Platform,
    /// Coins placed above the platform.
    pub(crate) coins: Vec<Coin>,
    /// Enemy spawned with the chunk, retired enemies included.
    pub(crate) enemy: Option<Enemy>,
}

/// Index-addressable store of chunks ordered by identifier.
///
/// Chunks are only ever appended at the back. Pruning removes from the front,
/// so the slot of a chunk is always `id - front_id`.
#[derive(Debug)]
pub(crate) struct ChunkArena {
    slots: VecDeque<ChunkSlot>,
    next_id: ChunkId,
    farthest_edge: f32,
}

impl ChunkArena {
    pub(crate) fn new() -> Self {
        Self {
            slots: VecDeque::new(),
            next_id: ChunkId::new(0),
            farthest_edge: 0.0,
        }
    }

    pub(crate) fn append(&mut self, blueprint: ChunkBlueprint) -> ChunkId {
        let id = self.next_id;
        self.next_id = id.next();
        self.farthest_edge = self.farthest_edge.max(blueprint.platform.right());
        self.slots.push_back(ChunkSlot {
            id,
            platform: blueprint.platform,
            coins: blueprint.coins,
            enemy: blueprint.enemy,
        });
        id
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ChunkSlot> {
        self.slots.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ChunkSlot> {
        self.slots.iter_mut()
    }

    pub(crate) fn get(&self, id: ChunkId) -> Option<&ChunkSlot> {
        self.slots.get(self.index_of(id)?)
    }

    #[cfg(any(test, feature = "scaffolding"))]
    pub(crate) fn get_mut(&mut self, id: ChunkId) -> Option<&mut ChunkSlot> {
        let index = self.index_of(id)?;
        self.slots.get_mut(index)
    }

    pub(crate) fn slot(&self, index: usize) -> Option<&ChunkSlot> {
        self.slots.get(index)
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut ChunkSlot> {
        self.slots.get_mut(index)
    }

    /// Largest platform right edge ever appended, or zero before the first chunk.
    ///
    /// The value survives pruning so refills always land right of every
    /// previously generated chunk.
    pub(crate) fn farthest_edge(&self) -> f32 {
        self.farthest_edge
    }

    /// Drops chunks from the front while their platform ends left of `x`.
    pub(crate) fn prune_behind(&mut self, x: f32) -> usize {
        let mut removed = 0;
        while self
            .slots
            .front()
            .is_some_and(|slot| slot.platform.right() < x)
        {
            let _ = self.slots.pop_front();
            removed += 1;
        }
        removed
    }

    fn index_of(&self, id: ChunkId) -> Option<usize> {
        let front = self.slots.front()?.id;
        let offset = id.get().checked_sub(front.get())?;
        usize::try_from(offset).ok()
    }
}
