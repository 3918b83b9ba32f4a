//! Lazily computed, mutation-invalidated derived quantities.

use std::cell::OnceCell;

/// Whether a cached quantity can be read without recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Valid,
    Invalid,
}

/// A derived value computed on first read and dropped on every mutation.
#[derive(Debug, Clone)]
pub(crate) struct Cached<T> {
    cell: OnceCell<T>,
}

impl<T> Cached<T> {
    pub(crate) fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    pub(crate) fn get_or_compute(&self, compute: impl FnOnce() -> T) -> &T {
        self.cell.get_or_init(compute)
    }

    pub(crate) fn invalidate(&mut self) {
        self.cell.take();
    }

    pub(crate) fn state(&self) -> CacheState {
        if self.cell.get().is_some() {
            CacheState::Valid
        } else {
            CacheState::Invalid
        }
    }
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self::new()
    }
}
