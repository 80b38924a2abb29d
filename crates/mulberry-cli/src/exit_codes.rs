//! Exit codes for the `mulberry` binary.
//! These codes are part of the public contract; scripts branch on them.

pub const SUCCESS: i32 = 0; // Approved / verified / revoked
pub const DENIED: i32 = 1; // Authorization denied or transition refused
pub const INTERNAL_ERROR: i32 = 2; // Bad input, config or secret
pub const INTEGRITY_FAILURE: i32 = 3; // Signature does not match mandate content
