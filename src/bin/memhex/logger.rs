use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(StderrLogger { level })).map(|()| log::set_max_level(level))
}

struct StderrLogger {
    level: LevelFilter,
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.target().starts_with("memhex")
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if record.level() < Level::Info {
            eprintln!("{} - {}", record.level(), record.args());
        } else {
            eprintln!("{}", record.args());
        }
    }

    fn flush(&self) {}
}
