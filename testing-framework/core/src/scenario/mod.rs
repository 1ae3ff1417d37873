mod cleanup;

pub use cleanup::{CleanupGuard, run_cleanup};
