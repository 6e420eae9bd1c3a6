use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};

static QUIET: AtomicBool = AtomicBool::new(false);
static VERBOSE: AtomicBool = AtomicBool::new(false);
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Disable colors when stdout is not a terminal (pipes, CI).
pub fn init_colors() {
    if !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }
}

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

pub fn mark_interrupted() {
    INTERRUPTED.store(true, Ordering::Relaxed);
}

pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::Relaxed)
}

fn quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

pub fn header(title: &str) {
    if !quiet() {
        println!("\n{}", title.bold().underline());
    }
}

pub fn success(msg: &str) {
    if !quiet() {
        println!("{} {}", "✓".green().bold(), msg);
    }
}

pub fn info(msg: &str) {
    if !quiet() {
        println!("{} {}", "ℹ".blue().bold(), msg);
    }
}

/// Verbose-only detail line.
pub fn debug(msg: &str) {
    if is_verbose() && !quiet() {
        println!("{} {}", "·".bright_black(), msg.bright_black());
    }
}

pub fn warning(msg: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), msg);
}

pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

pub fn separator() {
    if !quiet() {
        println!("{}", "─".repeat(60).bright_black());
    }
}

pub fn keyval(key: &str, val: &str) {
    if !quiet() {
        println!("{}: {}", key.bold(), val);
    }
}

pub fn indent(msg: &str, level: usize) {
    if !quiet() {
        let spaces = " ".repeat(level * 2);
        println!("{}{}", spaces, msg);
    }
}
