//! Implementation modules for `runtime::authorizer`.
//!
//! `src/runtime/authorizer.rs` remains the stable facade.

pub(crate) mod run;
pub(crate) mod split;
