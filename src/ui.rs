/// Status, warning and error lines on stdout
///
/// Messages share one lock with each other so a warning never lands in the
/// middle of another message. Tags are coloured through `term` only when
/// stdout is a terminal and colours have not been turned off.
use lazy_static::lazy_static;
use std::io::{self, IsTerminal, Write};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

lazy_static! {
    static ref OUTPUT: Mutex<()> = Mutex::new(());
}

static COLORS: AtomicBool = AtomicBool::new(true);

/// Kind of message; decides the tag and its colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Status,
    Warning,
    Error,
}

impl Level {
    pub fn tag(&self) -> &'static str {
        match self {
            Level::Status => "wine-explore",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }

    fn color(&self) -> Option<term::color::Color> {
        match self {
            Level::Status => None,
            Level::Warning => Some(term::color::BRIGHT_YELLOW),
            Level::Error => Some(term::color::BRIGHT_RED),
        }
    }
}

/// Enable or disable coloured tags (`--no-color`, `NO_COLOR`)
pub fn set_colors(enabled: bool) {
    COLORS.store(enabled, Ordering::Relaxed);
}

/// One message as plain text
pub fn format_line(level: Level, msg: &str) -> String {
    format!("{}: {}", level.tag(), msg)
}

fn emit(level: Level, msg: &str) {
    let _guard = OUTPUT.lock();
    if level == Level::Error {
        println!();
    }

    let colored = COLORS.load(Ordering::Relaxed) && io::stdout().is_terminal() && write_colored_line(level, msg);
    if !colored {
        println!("{}", format_line(level, msg));
    }

    if level == Level::Error {
        println!();
    }
}

/// Returns false when nothing was written and the caller should fall back
fn write_colored_line(level: Level, msg: &str) -> bool {
    let Some(color) = level.color() else {
        return false;
    };
    let Some(mut t) = term::stdout() else {
        return false;
    };
    if t.fg(color).is_err() {
        return false;
    }
    let _ = t.attr(term::Attr::Bold);
    let tag_written = write!(t, "{}", level.tag()).is_ok();
    let _ = t.reset();
    if !tag_written {
        return false;
    }
    let _ = writeln!(t, ": {}", msg);
    true
}

pub fn status(msg: &str) {
    emit(Level::Status, msg);
}

pub fn print_warning(msg: &str) {
    emit(Level::Warning, msg);
}

/// Errors are set off by blank lines
pub fn print_error(msg: &str) {
    emit(Level::Error, msg);
}
