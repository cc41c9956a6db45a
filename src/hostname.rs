//! System hostname lookup, cached at startup: the underlying syscall is
//! cheap but not free, and the value never changes for the life of the
//! process, so every caller shares one lookup.

use std::sync::OnceLock;

static CACHED: OnceLock<String> = OnceLock::new();

/// Returns the local system hostname, or an empty string if it can't be
/// determined or isn't valid UTF-8. Looked up once; later calls are free.
pub fn cached_system_hostname() -> String {
    CACHED
        .get_or_init(|| gethostname::gethostname().to_string_lossy().into_owned())
        .clone()
}
