use core::fmt::Write;

/// A simple logger that writes records to the console.
struct Logger {}

impl log::Log for Logger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let level = match record.level() {
                log::Level::Error => "\x1B[1m\x1b[31m[!]\x1b[0m",
                log::Level::Warn => "\x1B[1m\x1b[33m[-]\x1b[0m",
                log::Level::Info => "\x1B[1m\x1b[32m[*]\x1b[0m",
                log::Level::Debug => "\x1B[1m\x1b[34m[#]\x1b[0m",
                log::Level::Trace => "\x1B[1m\x1b[35m[~]\x1b[0m",
            };
            _ = writeln!(Logger {}, "{} {}", level, record.args());
        }
    }

    fn flush(&self) {}
}

impl core::fmt::Write for Logger {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        crate::arch::console::write(s);
        Ok(())
    }
}

/// The maximum level of the records printed, chosen at build time with the
/// `LOG` environment variable. Defaults to `info`.
#[cfg(feature = "logging")]
fn max_level() -> log::LevelFilter {
    match option_env!("LOG") {
        Some("off") => log::LevelFilter::Off,
        Some("error") => log::LevelFilter::Error,
        Some("warn") => log::LevelFilter::Warn,
        Some("debug") => log::LevelFilter::Debug,
        Some("trace") => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    }
}

/// Setup the logging subsystem. All log submitted to the logging subsystem
/// will be ignored until this function is called.
///
/// # Panics
/// Panics if a logger was already installed.
#[cfg(feature = "logging")]
pub fn setup() {
    log::set_max_level(max_level());
    log::set_logger(&Logger {}).unwrap();
    log::trace!("Logger initialized");
}
