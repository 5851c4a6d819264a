//! Core derivation engine for pool water chemistry
//!
//! Pure functions only: status classification, alert analysis, dosing
//! calculation, and locale-tolerant decimal handling. All context (current
//! date, measurement history, maintenance log) arrives as explicit
//! parameters; storage and presentation live in the collaborator crates.

pub mod alerts;
pub mod classify;
pub mod decimal;
pub mod dosing;
pub mod ranges;
pub mod types;

pub use alerts::*;
pub use classify::*;
pub use decimal::*;
pub use dosing::*;
pub use ranges::*;
pub use types::*;
