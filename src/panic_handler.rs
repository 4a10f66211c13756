//! Terminal setup and teardown around the viewer
//!
//! The viewer draws in raw mode on the alternate screen. Both a normal exit
//! and a panic have to hand the user's shell back in its original state.

use std::io::{self, Write};
use std::panic;

use crossterm::{
    cursor, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::error;

/// Install the panic hook.
///
/// The hook leaves the alternate screen before anything is printed, so the
/// report lands in the shell scrollback instead of a half-drawn page. Debug
/// builds report through better-panic, release builds write a human-panic
/// crash file.
pub fn initialize_panic_handler() {
    #[cfg(debug_assertions)]
    better_panic::install();
    #[cfg(not(debug_assertions))]
    human_panic::setup_panic!();

    let report = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        error!("Viewer panicked: {info}");
        restore_terminal();
        report(info);
        std::process::exit(1);
    }));
}

/// Leave raw mode and the alternate screen and show the cursor again.
///
/// Errors are ignored: this runs on the way out, often from the panic hook.
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
    let _ = writeln!(io::stderr());
}

/// Raw mode plus alternate screen for as long as the value lives
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal();
    }
}
