//! constants.rs
//! Compression levels and sizing defaults shared by both stream types.

/// Sentinel level: let the engine pick its own default.
pub const DEFAULT_COMPRESSION: i32 = 0;
pub const BEST_SPEED: i32 = 1;
pub const BEST_COMPRESSION: i32 = 20;

/// Input size used for the writer's initial output buffer guess.
pub const INITIAL_BOUND_INPUT: usize = 1024;

/// Buffers retained per pool role; anything released beyond this is dropped.
pub const DEFAULT_POOL_RETAIN: usize = 64;
