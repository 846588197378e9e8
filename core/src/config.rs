//! config.rs
//! Engine, sizing and pool wiring for stream construction, plus the
//! construction-time validation both stream types share.
use std::sync::{Arc, OnceLock};

use crate::compression::codecs::ZstdEngine;
use crate::compression::engine::Engine;
use crate::compression::pool::BufferPool;
use crate::compression::sizing::SizeAdvisor;
use crate::constants::DEFAULT_COMPRESSION;
use crate::types::ConfigError;

#[derive(Clone, Debug)]
pub struct StreamConfig {
    pub engine: Arc<dyn Engine>,
    pub sizes: Arc<SizeAdvisor>,
    pub pool: Arc<BufferPool>,
}

static ZSTD_DEFAULTS: OnceLock<StreamConfig> = OnceLock::new();

impl Default for StreamConfig {
    /// Process-scope zstd engine, its advisor and the shared buffer pool.
    fn default() -> Self {
        ZSTD_DEFAULTS
            .get_or_init(|| StreamConfig::with_engine(Arc::new(ZstdEngine::new())))
            .clone()
    }
}

impl StreamConfig {
    /// Fresh advisor and pool around `engine`.
    pub fn with_engine(engine: Arc<dyn Engine>) -> Self {
        let sizes = Arc::new(SizeAdvisor::new(engine.clone()));
        Self { engine, sizes, pool: Arc::new(BufferPool::new()) }
    }

    pub fn with_pool(mut self, pool: Arc<BufferPool>) -> Self {
        self.pool = pool;
        self
    }
}

/// The default sentinel is always accepted; anything else must be in the engine's range.
pub fn validate_level(engine: &dyn Engine, level: i32) -> Result<(), ConfigError> {
    if level == DEFAULT_COMPRESSION {
        return Ok(());
    }
    let range = engine.level_range();
    if range.contains(&level) {
        Ok(())
    } else {
        Err(ConfigError::InvalidLevel { level, min: *range.start(), max: *range.end() })
    }
}

/// `None` and an empty slice both mean "no dictionary".
pub fn normalize_dictionary(dict: Option<&[u8]>) -> Option<&[u8]> {
    match dict {
        Some(d) if d.is_empty() => None,
        other => other,
    }
}
