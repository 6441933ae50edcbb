//! Vela compiler CLI.

use std::process::ExitCode;

use velac::options::{parse_args, Command, USAGE};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match command {
        Command::Help => {
            println!("{USAGE}");
            ExitCode::SUCCESS
        }
        Command::Version => {
            println!("Vela compiler {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Command::Compile(options) => {
            if options.inputs.is_empty() {
                eprintln!("error: no input files");
                eprintln!("{USAGE}");
                return ExitCode::FAILURE;
            }

            velac::tracing_setup::init(options.verbose, options.log_level);

            let mut all_clean = true;
            for input in &options.inputs {
                match velac::compile_file(input, &options) {
                    Ok(clean) => all_clean &= clean,
                    Err(message) => {
                        eprintln!("error: {message}");
                        all_clean = false;
                    }
                }
            }

            if all_clean {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
