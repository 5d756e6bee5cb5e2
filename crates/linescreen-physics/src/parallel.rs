//! Worker-pool plumbing for the parallel query.
//!
//! The query itself lives in [`crate::collision::query`]; this module
//! only pins worker counts. A dedicated pool is built when the caller
//! asks for an explicit thread count (determinism tests replay the same
//! step under 1, 2, 4, and 8 workers); otherwise the global rayon pool
//! is used.

use linescreen_core::error::{LineScreenError, Result};
use rayon::ThreadPool;

/// Builds a dedicated pool for `num_threads` workers.
///
/// `0` means "use the global pool" and returns `None`.
pub fn build_pool(num_threads: usize) -> Result<Option<ThreadPool>> {
    if num_threads == 0 {
        return Ok(None);
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map(Some)
        .map_err(|e| LineScreenError::ConcurrencyError(format!("Worker pool: {e}")))
}

/// Runs `f` inside the given pool, or inline on the global pool.
pub fn run_in_pool<T: Send>(pool: Option<&ThreadPool>, f: impl FnOnce() -> T + Send) -> T {
    match pool {
        Some(pool) => pool.install(f),
        None => f(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_means_global_pool() {
        assert!(build_pool(0).unwrap().is_none());
    }

    #[test]
    fn test_pinned_pool_runs_closures() {
        let pool = build_pool(2).unwrap().unwrap();
        let result = run_in_pool(Some(&pool), || 21 * 2);
        assert_eq!(result, 42);
    }
}
