use colored::{ColoredString, Colorize, CustomColor};

pub const CENSUS_TEAL: CustomColor = CustomColor {
    r: 0,
    g: 168,
    b: 150,
};

/// Sets up `env_logger` for the library's diagnostics.
///
/// `RUST_LOG` takes precedence over the level picked from `verbosity`.
pub fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn tag() -> ColoredString {
    "param-census".custom_color(CENSUS_TEAL)
}

fn tagged(label: ColoredString, message: &str) -> String {
    format!("[{}] {label}: {message}", tag())
}

pub fn print_err(err_message: &str) {
    eprintln!("{}", tagged("error".red().bold(), err_message));
}

#[macro_export]
macro_rules! print_err {
    ($($arg:tt)*) => {
        $crate::logging::print_err(&format!($($arg)*));
    };
}

pub fn print_warn(warn_message: &str) {
    println!("{}", tagged("warning".yellow().bold(), warn_message));
}

#[macro_export]
macro_rules! print_warn {
    ($($arg:tt)*) => {
        $crate::logging::print_warn(&format!($($arg)*));
    };
}

pub fn print_info(info_message: &str) {
    println!("{}", tagged("info".cyan().bold(), info_message));
}

#[macro_export]
macro_rules! print_info {
    ($($arg:tt)*) => {
        $crate::logging::print_info(&format!($($arg)*));
    };
}
