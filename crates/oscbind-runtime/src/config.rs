//! Runtime configuration

/// Registry configuration
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Whether update hooks run immediately after construction
    pub start_running: bool,
    /// Remove bindings whose variable was dropped instead of failing the tick
    pub prune_stale_bindings: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            start_running: true,
            prune_stale_bindings: true,
        }
    }
}
