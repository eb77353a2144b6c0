//! BANDCLIP CLI entrypoint.
//!
//! Thin wrapper over the `cli` module: parse args, run the clip job and map
//! the outcome to an exit status (0 on success, help or version; 1 otherwise).
//! For programmatic use, prefer the library API (`bandclip::api`).

use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}
