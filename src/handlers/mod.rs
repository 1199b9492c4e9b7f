// Voice Gateway HTTP handlers
//
// This module contains the HTTP handlers of the gateway: the two backend gateways and
// the static front end.

pub mod form;
pub mod routes;
pub mod static_files;

#[cfg(test)]
mod tests;

// Re-export handlers for easier access
pub use self::routes::{method_not_allowed, not_found, summarize, transcribe};
pub use self::static_files::{index, static_asset};
