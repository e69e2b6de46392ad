//! Constant variables.

/// Default bit width of the identifier space, the ring holds `2^m` ids.
pub const DEFAULT_RING_SIZE: u32 = 8;
/// Default successor list length `r`, finger\[0\] included.
pub const DEFAULT_SUCCESSOR_LIST_SIZE: usize = 3;
/// Default stabilize period in ticks.
pub const DEFAULT_STABILIZE_PERIOD: u64 = 10;
/// Default fix finger period in ticks.
pub const DEFAULT_FIX_FINGER_PERIOD: u64 = 10;
/// Default check predecessor period in ticks.
pub const DEFAULT_CHECK_PREDECESSOR_PERIOD: u64 = 20;
/// Default upper bound of the per-node random clock offset.
pub const DEFAULT_MAX_OFFSET: u64 = 10;
/// `2^MAX_RING_SIZE` must still fit a u64 modulus.
pub const MAX_RING_SIZE: u32 = 63;
