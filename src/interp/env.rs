//! Two-tier variable environment
//!
//! The global store lives for the whole session; the local store belongs to
//! the function activation currently running and is swapped wholesale on
//! call entry and exit. Lookups try local first, then global.

use std::mem;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use super::frame::CallFrame;
use super::value::Value;

/// Name-to-value mapping, kept in insertion order
pub type Store = IndexMap<String, Value, FxBuildHasher>;

/// Global and local bindings of one evaluation session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    global: Store,
    local: Store,
}

impl Environment {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `name` in the local store, then the global store
    pub fn resolve(&self, name: &str) -> Option<&Value> {
        self.local.get(name).or_else(|| self.global.get(name))
    }

    /// Look up `name` in the global store only
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.global.get(name)
    }

    /// Bind `name` in the global store, returning the previous binding.
    ///
    /// Always targets the global store, whatever the current call depth.
    pub fn assign_global(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.global.insert(name.into(), value)
    }

    /// Copy of the global store, as captured by a function definition
    pub fn snapshot_globals(&self) -> Store {
        self.global.clone()
    }

    /// Make `local` the active local store and return the one it replaces
    pub fn enter_call(&mut self, local: Store) -> Store {
        mem::replace(&mut self.local, local)
    }

    /// Reinstate a local store previously returned by [`enter_call`](Self::enter_call)
    pub fn exit_call(&mut self, saved: Store) {
        self.local = saved;
    }

    /// Enter a call and get a guard that restores the caller's locals on drop
    pub fn call_frame(&mut self, local: Store) -> CallFrame<'_> {
        CallFrame::enter(self, local)
    }

    pub fn globals(&self) -> &Store {
        &self.global
    }

    pub fn locals(&self) -> &Store {
        &self.local
    }

    /// Drop every binding
    pub fn clear(&mut self) {
        self.global.clear();
        self.local.clear();
    }
}
