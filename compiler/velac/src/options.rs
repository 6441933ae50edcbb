//! Command-line option parsing.
//!
//! A plain argument loop; no parser crate. Unknown flags are errors,
//! everything else is an input path.

/// Parsed command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub inputs: Vec<String>,
    pub verbose: bool,
    pub log_level: Option<u8>,
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub emit_ll: bool,
    pub emit_bc: bool,
    pub emit_obj: bool,
    pub emit_asm: bool,
}

impl Options {
    /// Whether any emit flag needs the LLVM backend.
    pub fn wants_emit(&self) -> bool {
        self.emit_ll || self.emit_bc || self.emit_obj || self.emit_asm
    }
}

/// What the driver should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Version,
    Compile(Options),
}

/// Parse the argument list (without the program name).
pub fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--version" => return Ok(Command::Version),
            "-v" | "--verbose" => options.verbose = true,
            "--log-level" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--log-level needs a value".to_string())?;
                let level: u8 = value
                    .parse()
                    .map_err(|_| format!("invalid log level `{value}`"))?;
                options.log_level = Some(level);
            }
            "--dump-tokens" => options.dump_tokens = true,
            "--dump-ast" => options.dump_ast = true,
            "--emit-ll" => options.emit_ll = true,
            "--emit-bc" => options.emit_bc = true,
            "--emit-obj" => options.emit_obj = true,
            "--emit-asm" => options.emit_asm = true,
            flag if flag.starts_with('-') => {
                return Err(format!("unknown flag `{flag}`"));
            }
            input => options.inputs.push(input.to_string()),
        }
    }

    Ok(Command::Compile(options))
}

pub const USAGE: &str = "\
Usage: vela [options] <inputs...>

Options:
  -h, --help        Print this help and exit
  --version         Print the version and exit
  -v, --verbose     Enable verbose logging
  --log-level N     Set the log level (0=error .. 4=trace)
  --dump-tokens     Write <input>.tokens.json
  --dump-ast        Write <input>.ast.json
  --emit-ll         Write <input>.ll (LLVM IR)
  --emit-bc         Write <input>.bc (LLVM bitcode)
  --emit-obj        Write <input>.obj (object file)
  --emit-asm        Write <input>.asm (native assembly)
";

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn help_and_version_win() {
        assert_eq!(parse_args(&args(&["--help"])), Ok(Command::Help));
        assert_eq!(parse_args(&args(&["-h", "x.vela"])), Ok(Command::Help));
        assert_eq!(parse_args(&args(&["--version"])), Ok(Command::Version));
    }

    #[test]
    fn flags_and_inputs() {
        let Ok(Command::Compile(options)) = parse_args(&args(&[
            "--dump-tokens",
            "main.vela",
            "--emit-ll",
            "lib.vela",
            "-v",
        ])) else {
            panic!("expected compile command");
        };
        assert_eq!(options.inputs, vec!["main.vela", "lib.vela"]);
        assert!(options.dump_tokens);
        assert!(options.emit_ll);
        assert!(options.verbose);
        assert!(options.wants_emit());
    }

    #[test]
    fn log_level_parsing() {
        let Ok(Command::Compile(options)) =
            parse_args(&args(&["--log-level", "3", "main.vela"]))
        else {
            panic!("expected compile command");
        };
        assert_eq!(options.log_level, Some(3));

        assert!(parse_args(&args(&["--log-level"])).is_err());
        assert!(parse_args(&args(&["--log-level", "many"])).is_err());
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(parse_args(&args(&["--frobnicate"])).is_err());
    }
}
