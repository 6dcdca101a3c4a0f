//! Scoped scratch memory for collision queries
//!
//! A single growable buffer reused every frame. [`ScratchArena::scope`] hands
//! out a guard that owns everything pushed after it was opened and gives it
//! back when dropped, on every exit path. Nested scopes stack.

use glam::Vec2;

/// Stack-like scratch buffer, generic over a plain-data element type
#[derive(Debug, Clone)]
pub struct ScratchArena<T: Copy = Vec2> {
    buf: Vec<T>,
    high_water: usize,
}

impl<T: Copy> Default for ScratchArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> ScratchArena<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            high_water: 0,
        }
    }

    /// Open a scope; everything it allocates is released when it drops
    pub fn scope(&mut self) -> Scope<'_, T> {
        let mark = self.buf.len();
        Scope { arena: self, mark }
    }

    /// Elements currently held by open scopes
    pub fn in_use(&self) -> usize {
        self.buf.len()
    }

    /// Largest number of elements ever held at once
    pub fn high_water(&self) -> usize {
        self.high_water
    }
}

/// Guard over the tail of a [`ScratchArena`]; indices are scope-relative
#[derive(Debug)]
pub struct Scope<'a, T: Copy = Vec2> {
    arena: &'a mut ScratchArena<T>,
    mark: usize,
}

impl<T: Copy> Scope<'_, T> {
    pub fn push(&mut self, value: T) {
        self.arena.buf.push(value);
        self.track();
    }

    /// Insert at a scope-relative index, shifting later elements
    pub fn insert(&mut self, index: usize, value: T) {
        debug_assert!(index <= self.len(), "scratch insert out of bounds");
        self.arena.buf.insert(self.mark + index, value);
        self.track();
    }

    pub fn len(&self) -> usize {
        self.arena.buf.len() - self.mark
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[T] {
        &self.arena.buf[self.mark..]
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.as_slice().get(index).copied()
    }

    /// Open a nested scope above this one's allocations
    pub fn scope(&mut self) -> Scope<'_, T> {
        self.arena.scope()
    }

    fn track(&mut self) {
        self.arena.high_water = self.arena.high_water.max(self.arena.buf.len());
    }
}

impl<T: Copy> Drop for Scope<'_, T> {
    fn drop(&mut self) {
        self.arena.buf.truncate(self.mark);
    }
}
