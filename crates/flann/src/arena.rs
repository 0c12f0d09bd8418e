//! A pooled, monotonically-growing arena for tree nodes.
//!
//! Builds allocate millions of nodes with uniform lifetime (all freed together when the tree is
//! dropped); a pool avoids the per-node allocator overhead and fragmentation that would come from
//! `Box`-ing each one individually. Rather than the raw "previous-block pointer" chain of a
//! classic bump allocator, blocks are owned in a `Vec<Block<T>>` and a handle is a stable index
//! into it — dropping the arena drops that `Vec` and, transitively, every block, which is exactly
//! "destruction walks the chain" without any `unsafe` pointer-chasing.

/// Default number of nodes per block. Chosen so that a dataset in the tens of thousands of points
/// fits in a handful of blocks without over-allocating for small datasets.
const DEFAULT_BLOCK_LEN: usize = 4096;

/// A stable handle to a node stored in an [`Arena`]. Never invalidated by further allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// The handle's raw index, exposed so the persistence layer can write it as-is.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Reconstructs a handle from a raw index, used when deserializing a persisted tree.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        Self(index as u32)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Block<T> {
    items: Vec<T>,
}

/// A pool of `T` values, handed out as stable [`NodeId`]s and all dropped together.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Arena<T> {
    blocks: Vec<Block<T>>,
    block_len: usize,
    used: usize,
}

impl<T> Arena<T> {
    /// Creates an empty arena that grows in blocks of `block_len` items (or the default if
    /// `block_len == 0`).
    #[must_use]
    pub fn new(block_len: usize) -> Self {
        Self {
            blocks: Vec::new(),
            block_len: if block_len == 0 { DEFAULT_BLOCK_LEN } else { block_len },
            used: 0,
        }
    }

    /// Allocates `value`, returning a stable handle to it.
    pub fn allocate(&mut self, value: T) -> NodeId {
        let needs_new_block = match self.blocks.last() {
            Some(b) => b.items.len() == b.items.capacity(),
            None => true,
        };
        if needs_new_block {
            self.blocks.push(Block {
                items: Vec::with_capacity(self.block_len),
            });
        }
        #[allow(clippy::unwrap_used)]
        let block = self.blocks.last_mut().unwrap();
        let index_in_block = block.items.len();
        block.items.push(value);
        self.used += 1;

        let prior_items: usize = self.blocks[..self.blocks.len() - 1].iter().map(|b| b.items.capacity()).sum();
        NodeId::from_index(prior_items + index_in_block)
    }

    /// Dereferences a handle. Panics if the handle did not come from this arena.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &T {
        let (block, offset) = self.locate(id.index());
        &self.blocks[block].items[offset]
    }

    /// Mutably dereferences a handle. Panics if the handle did not come from this arena.
    pub fn get_mut(&mut self, id: NodeId) -> &mut T {
        let (block, offset) = self.locate(id.index());
        &mut self.blocks[block].items[offset]
    }

    fn locate(&self, mut index: usize) -> (usize, usize) {
        for (b, block) in self.blocks.iter().enumerate() {
            if index < block.items.capacity() {
                return (b, index);
            }
            index -= block.items.capacity();
        }
        unreachable!("NodeId out of range for this arena")
    }

    /// Number of nodes allocated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.used
    }

    /// Whether no node has been allocated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Bytes occupied by allocated nodes (`used`) and by reserved-but-unfilled slots in the
    /// current block (`wasted`), for the memory accounting in §4.1.
    #[must_use]
    pub fn memory_accounting(&self) -> (usize, usize) {
        let elem_size = std::mem::size_of::<T>();
        let used = self.used * elem_size;
        let reserved: usize = self.blocks.iter().map(|b| b.items.capacity()).sum();
        let wasted = (reserved - self.used) * elem_size;
        (used, wasted)
    }
}
