//! Beacon-chain state transition core.
//!
//! Given a parent `(CrystallizedState, ActiveState)` pair, a parent block
//! and an incoming block, [`driver::compute_state_transition`] deterministically
//! computes the successor pair: absorbing attestations, advancing
//! justification/finality over completed cycles, confirming crosslinks,
//! applying rewards and penalties, and rotating committees across dynasty
//! boundaries. Everything here is a pure function of its arguments — no
//! I/O, no clock reads, no shared mutable state between calls.

pub mod attestation_validator;
pub mod block_processor;
pub mod cycle_engine;
pub mod dynasty_engine;
pub mod errors;
pub mod helpers;
pub mod reward_engine;
pub mod driver;

pub use driver::compute_state_transition;
pub use errors::{AttestationValidationError, StateTransitionError};
