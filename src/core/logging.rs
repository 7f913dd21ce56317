//! Logging setup
//!
//! Everything in the engine logs through the `log` facade, so embedders
//! are free to install their own backend. For binaries and the test
//! suite the helpers here install env_logger.

/// Install env_logger, filtering at `info` unless `RUST_LOG` says
/// otherwise. Call once at startup.
///
/// # Example
/// ```
/// terraforge::core::logging::init();
/// log::info!("engine starting");
/// ```
pub fn init() {
    builder().init();
}

/// Like [`init`] but tolerates an already-installed logger, so every
/// test can call it without coordinating which runs first. Output is
/// captured per test.
pub fn try_init() {
    let _ = builder().is_test(true).try_init();
}

fn builder() -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
}
