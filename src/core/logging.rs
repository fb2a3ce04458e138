//! Logger setup, installed by [`crate::init`].
//!
//! On wasm32 records go to the browser console through a small `log`
//! backend. Native builds hand off to `env_logger`, so `RUST_LOG` directives
//! apply on top of the level passed to [`install`].

use log::LevelFilter;

#[cfg(target_arch = "wasm32")]
mod console {
    use log::{Level, LevelFilter, Log, Metadata, Record};

    struct ConsoleLogger;

    static LOGGER: ConsoleLogger = ConsoleLogger;

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let line = format!("[{}] {}: {}", record.level(), record.target(), record.args());
            let msg = wasm_bindgen::JsValue::from_str(&line);
            match record.level() {
                Level::Error => web_sys::console::error_1(&msg),
                Level::Warn => web_sys::console::warn_1(&msg),
                Level::Info => web_sys::console::info_1(&msg),
                Level::Debug | Level::Trace => web_sys::console::debug_1(&msg),
            }
        }

        fn flush(&self) {}
    }

    pub(super) fn install(level: LevelFilter) {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(level);
        }
    }
}

/// Install the platform logger. Safe to call more than once; only the first
/// call takes effect.
pub fn install(level: LevelFilter) {
    #[cfg(target_arch = "wasm32")]
    console::install(level);

    #[cfg(not(target_arch = "wasm32"))]
    {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(level).parse_default_env();
        if let Err(err) = builder.try_init() {
            log::debug!("logger already installed: {err}");
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn repeated_install_keeps_first_logger() {
        install(LevelFilter::Debug);
        install(LevelFilter::Trace);
        assert_ne!(log::max_level(), LevelFilter::Off);
        log::debug!("logger installed");
    }
}
