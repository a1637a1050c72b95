use std::process::ExitCode;

use rebind::cli;
use rebind::config;
use rebind::logging;
use rebind::program::Interpreter;

fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("rebind: {e}");
            eprintln!("{}", cli::USAGE);
            return ExitCode::from(2);
        }
    };

    logging::init_logging(args.debug);

    // ── Load settings ─────────────────────────────────────────────────────────
    let profile = match config::resolve_profile(args.settings.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("rebind: settings: {e}");
            return ExitCode::FAILURE;
        }
    };

    // ── Read program ──────────────────────────────────────────────────────────
    let source = match std::fs::read_to_string(&args.program) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("rebind: {}: {e}", args.program.display());
            return ExitCode::FAILURE;
        }
    };

    // ── Run ───────────────────────────────────────────────────────────────────
    let mut interp = Interpreter::stdio(profile, args.run_settings());
    match interp.execute(&source) {
        Ok(summary) if summary.failed > 0 => {
            eprintln!(
                "rebind: {} of {} statements failed",
                summary.failed, summary.executed
            );
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("rebind: {e}");
            ExitCode::FAILURE
        }
    }
}
