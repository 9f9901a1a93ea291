//! Stack headroom for deep evaluation.
//!
//! Calls nest one `eval` frame per level, so a recursive program can
//! exhaust a small thread stack long before `max_call_depth` is reached.
//! Every evaluation step runs through [`ensure_sufficient_stack`], which
//! moves onto a fresh heap-allocated segment when the current one runs low.

/// Headroom kept free before growing
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
