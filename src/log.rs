use std::env;
use std::sync::LazyLock;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
enum Level {
    Error = 0,
    Warn = 1,
    Debug = 2,
}

impl Level {
    fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "error" | "err" => Self::Error,
            "warn" | "warning" => Self::Warn,
            "debug" | "trace" => Self::Debug,
            _ => Self::Error,
        }
    }
}

static PGN_LOG: LazyLock<Level> = LazyLock::new(|| {
    env::var("PGN_LOG")
        .map(|s| Level::from_str(&s))
        .unwrap_or(Level::Error)
});

macro_rules! log {
    ($level:expr, $prefix:expr, $msg:expr) => {
        if *PGN_LOG >= $level {
            eprintln!(concat!("pgnscan ", $prefix, ": {}"), $msg.as_ref());
        }
    };
}

pub fn error(msg: impl AsRef<str>) {
    log!(Level::Error, "ERROR", msg);
}

pub fn warn(msg: impl AsRef<str>) {
    log!(Level::Warn, "WARN", msg);
}

pub fn debug(msg: impl AsRef<str>) {
    log!(Level::Debug, "DEBUG", msg);
}
