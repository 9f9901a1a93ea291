//! RAII call frame for the local store.
//!
//! [`CallFrame`] swaps the callee's locals in when created and puts the
//! caller's locals back when dropped, so the caller's scope survives early
//! error returns and unwinding alike. The guard derefs to [`Environment`],
//! letting the body be evaluated straight through it.

use std::ops::{Deref, DerefMut};

use super::env::{Environment, Store};

/// Guard over one function activation
pub struct CallFrame<'env> {
    env: &'env mut Environment,
    /// Caller's locals; `None` only while dropping
    saved: Option<Store>,
}

impl<'env> CallFrame<'env> {
    pub(crate) fn enter(env: &'env mut Environment, local: Store) -> Self {
        let saved = env.enter_call(local);
        Self {
            env,
            saved: Some(saved),
        }
    }
}

impl Drop for CallFrame<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.env.exit_call(saved);
        }
    }
}

impl Deref for CallFrame<'_> {
    type Target = Environment;

    fn deref(&self) -> &Self::Target {
        self.env
    }
}

impl DerefMut for CallFrame<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.env
    }
}
