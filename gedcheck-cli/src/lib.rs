// All validation lives in gedcheck-core
// This CLI is a thin wrapper: arguments, logging, file I/O, exit status

// CLI-specific modules
pub mod logging;
pub mod stages;

// Re-export core types for convenience
pub use gedcheck_core::*;
