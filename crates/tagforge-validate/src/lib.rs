//! Validation and healing for tagforge element trees
//!
//! Four modes, in increasing strictness and cost: `None` (skip), `Static`
//! (local allowlists), `FragmentCheck` (strict reparse probe) and
//! `ServiceCheck` (remote nu validator). Violations are reported and kept by
//! default; `auto_heal` switches to drop-or-repair.

pub mod allowlist;
pub mod service;
mod validator;

pub use service::{DEFAULT_SERVICE_URL, ServiceChecker};
pub use validator::{SIMILARITY_THRESHOLD, Validator, resolve_mode};
