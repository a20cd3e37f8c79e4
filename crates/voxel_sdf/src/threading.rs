//! Fixed-size worker pool with phase barriers, built on rayon.
//!
//! Every stage of the distance transform runs as one *phase*:
//!
//! ```text
//!   phase "sweep x"      phase "sweep y"      phase "sweep z"
//!   ┌──┬──┬──┬──┐        ┌──┬──┬──┬──┐        ┌──┬──┬──┬──┐
//!   │w0│w1│w2│w3│ ─────► │w0│w1│w2│w3│ ─────► │w0│w1│w2│w3│
//!   └──┴──┴──┴──┘ barrier└──┴──┴──┴──┘ barrier└──┴──┴──┴──┘
//! ```
//!
//! [`WorkerPool::phase`] returns only after every job spawned inside it has
//! finished, and stages take the grid by `&mut`, so a pass can never observe
//! a half-written predecessor. A panicking worker aborts the phase and comes
//! back as [`GridError::WorkerPanicked`].
//!
//! # Usage
//!
//! ```ignore
//! let pool = WorkerPool::new(4)?;
//! let total: u64 = pool.phase("sum", || (0..1000u64).into_par_iter().sum())?;
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{GridError, Result};

/// Worker pool running stages as barrier-separated phases.
pub struct WorkerPool {
  pool: rayon::ThreadPool,
}

impl WorkerPool {
  /// Create a pool with `num_threads` workers; 0 lets rayon pick one per
  /// logical CPU.
  pub fn new(num_threads: usize) -> Result<Self> {
    let pool = rayon::ThreadPoolBuilder::new()
      .num_threads(num_threads)
      .thread_name(|i| format!("voxel-sdf-{i}"))
      .build()
      .map_err(|e| GridError::ThreadPool(e.to_string()))?;
    Ok(Self { pool })
  }

  /// Create a pool sized by rayon.
  pub fn default_threads() -> Result<Self> {
    Self::new(0)
  }

  pub fn num_threads(&self) -> usize {
    self.pool.current_num_threads()
  }

  /// Run `work` on this pool and wait for all of it, including every
  /// parallel iterator it drives.
  ///
  /// A panic in any worker is caught and returned as
  /// [`GridError::WorkerPanicked`] naming `phase`.
  pub fn phase<R, F>(&self, phase: &str, work: F) -> Result<R>
  where
    F: FnOnce() -> R + Send,
    R: Send,
  {
    let _span = tracing::debug_span!("phase", name = phase).entered();

    panic::catch_unwind(AssertUnwindSafe(|| self.pool.install(work))).map_err(|payload| {
      let message = panic_message(payload.as_ref());
      tracing::error!(phase, %message, "worker failed");
      GridError::WorkerPanicked { phase: phase.to_string(), message }
    })
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(s) = payload.downcast_ref::<&str>() {
    (*s).to_string()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "unknown panic payload".to_string()
  }
}
