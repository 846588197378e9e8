//! compression/codecs/mod.rs
//! Concrete engines implementing `compression::engine::Engine`.

pub mod zstd;

pub use self::zstd::*;
