//! Execution configuration

use serde::Deserialize;

/// How per-area work is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ExecutionConfig {
    /// Fan per-area queries out over the rayon thread pool
    #[serde(default)]
    pub parallel: bool,
}
