//! Logging utilities and fatal-fault reporting
//!
//! Fatal faults are invariant violations the runtime cannot continue past
//! (wrong-type component tables, "last entity" access on an empty scene).
//! They are logged at error level and then abort the frame loop via panic.

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

/// Log an error and abort with the same message.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => {{
        let message = format!($($arg)+);
        $crate::foundation::logging::error!("{}", message);
        panic!("{}", message)
    }};
}

/// Abort through [`fatal!`] when the condition does not hold.
#[macro_export]
macro_rules! fatal_assert {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::fatal!($($arg)+);
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_init_is_idempotent() {
        super::init();
        super::init();
    }

    #[test]
    #[should_panic(expected = "broken invariant 7")]
    fn test_fatal_panics_with_message() {
        crate::fatal!("broken invariant {}", 7);
    }

    #[test]
    fn test_fatal_assert_passes_when_true() {
        crate::fatal_assert!(1 + 1 == 2, "math is broken");
    }

    #[test]
    #[should_panic(expected = "scene is empty")]
    fn test_fatal_assert_panics_when_false() {
        let entities: Vec<u32> = Vec::new();
        crate::fatal_assert!(!entities.is_empty(), "scene is empty");
    }
}
