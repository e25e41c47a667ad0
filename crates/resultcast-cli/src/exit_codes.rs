//! Exit codes of the `resultcast` binary. Scripts rely on these.

pub const SUCCESS: i32 = 0;
pub const DELIVERY_FAILED: i32 = 1; // Listener unreachable or an event was not delivered
pub const CONFIG_ERROR: i32 = 2; // Bad flags, config file or input file
