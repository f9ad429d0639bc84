use std::sync::OnceLock;

static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

// Progress reports are printed only when QRWEAVE_DEBUG is set
pub(crate) fn debug_enabled() -> bool {
    *DEBUG_ENABLED.get_or_init(|| std::env::var("QRWEAVE_DEBUG").is_ok())
}

macro_rules! debug_log {
    ($($arg:tt)*) => {
        if $crate::common::debug::debug_enabled() {
            eprintln!($($arg)*);
        }
    };
}

pub(crate) use debug_log;
