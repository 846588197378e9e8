//! compression/status.rs
//! The one place raw engine status codes are interpreted.
use crate::compression::engine::{Engine, SessionInitError};
use crate::types::{ConfigError, EngineError, RawStatus};

/// Successful step outcome.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepStatus {
    /// Operation complete, no hint.
    Complete,
    /// More work pending; the value is the suggested size of the next buffer.
    Hint(usize),
}

impl StepStatus {
    pub fn is_complete(self) -> bool {
        matches!(self, StepStatus::Complete)
    }

    pub fn hint(self) -> Option<usize> {
        match self {
            StepStatus::Complete => None,
            StepStatus::Hint(n) => Some(n),
        }
    }
}

/// Summary: decode a raw status.
/// - `code > 0` → `Hint(code)`
/// - `code == 0` → `Complete`
/// - `code < 0` → `EngineError` named by the engine
#[inline]
pub fn translate(engine: &dyn Engine, code: RawStatus) -> Result<StepStatus, EngineError> {
    match code {
        0 => Ok(StepStatus::Complete),
        c if c > 0 => Ok(StepStatus::Hint(c as usize)),
        c => Err(EngineError { code: c, reason: engine.error_name(c) }),
    }
}

/// Decode a raw status where a positive value carries no meaning (releases).
pub fn translate_release(engine: &dyn Engine, code: RawStatus) -> Result<(), EngineError> {
    translate(engine, code).map(|_| ())
}

/// Map a failed session setup to the matching `ConfigError`.
pub fn translate_init(
    engine: &dyn Engine,
    err: SessionInitError,
    level: i32,
    dict_len: usize,
) -> ConfigError {
    let decode = |code: RawStatus| match translate(engine, code) {
        Err(e) => e,
        // A non-negative code here is an engine contract breach; keep it visible.
        Ok(_) => EngineError { code, reason: "session setup failed without an error code" },
    };
    match err {
        SessionInitError::Create(code) => {
            ConfigError::SessionInit { engine: engine.name(), source: decode(code) }
        }
        SessionInitError::Level(code) => ConfigError::Level { level, source: decode(code) },
        SessionInitError::Dictionary(code) => {
            ConfigError::Dictionary { len: dict_len, source: decode(code) }
        }
    }
}
