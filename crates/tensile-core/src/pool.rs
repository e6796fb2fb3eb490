use crate::tensor::Tensor;

// TensorPool — a bulk-release arena for intermediate tensors.
//
// A training step (or any bounded computation phase) allocates a crowd of
// short-lived tensors. Instead of tracking each one, the phase enrolls them
// in a pool and drains it once at the end, bounding peak memory to one
// phase's working set.
//
// Enrollment is a move: the pool becomes the sole owner, so enrolling the
// same tensor twice or releasing it while still referenced elsewhere cannot
// be expressed. Long-lived parameters are simply never enrolled.

/// Handle to a tensor enrolled in a [`TensorPool`].
///
/// Valid until the pool is drained; `get` with a stale id panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolId(usize);

/// An append-only arena of tensors released together.
#[derive(Debug, Default)]
pub struct TensorPool {
    slots: Vec<Tensor>,
}

impl TensorPool {
    /// An empty pool.
    pub fn new() -> Self {
        TensorPool { slots: Vec::new() }
    }

    /// An empty pool with room for `capacity` tensors before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        TensorPool {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Enroll a tensor, transferring ownership to the pool.
    pub fn add(&mut self, tensor: Tensor) -> PoolId {
        let id = PoolId(self.slots.len());
        self.slots.push(tensor);
        id
    }

    /// Borrow an enrolled tensor.
    ///
    /// # Panics
    /// Panics if `id` came from before the last `drain`.
    pub fn get(&self, id: PoolId) -> &Tensor {
        &self.slots[id.0]
    }

    /// Number of enrolled tensors.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// How many tensors fit before the pool reallocates.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Release every enrolled tensor's storage and empty the pool without
    /// shrinking its capacity. Outstanding [`PoolId`]s are invalidated.
    pub fn drain(&mut self) {
        self.slots.clear();
    }
}

// Dropping the pool drains it and releases the container itself.
