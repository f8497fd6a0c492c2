//! Meme - Minimal browser shell
//!
//! Console front end: the address bar reads from stdin, diagnostics go to
//! stderr.

pub mod cli;
pub mod console;
pub mod state;

use state::AppState;

/// Run the shell and return the process exit code
pub fn run() -> i32 {
    // Initialize logging
    meme_core::init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let parsed = match cli::parse_args(&args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{}", message);
            return 2;
        }
    };
    if parsed.help {
        println!("{}", cli::HELP_TEXT);
        return 0;
    }

    let mut state = match AppState::new(&parsed) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start");
            return 1;
        }
    };
    tracing::info!(config = %state.config_path().display(), "Meme started");

    state.open(parsed.uri.as_deref());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let result = console::run(state.browser_mut(), stdin.lock(), &mut stdout.lock());
    state.shutdown();

    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "Console I/O failed");
            1
        }
    }
}
