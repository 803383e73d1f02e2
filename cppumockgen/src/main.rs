//! Command line front of the mock generator.
//!
//! Exit status is 0 on success, 2 when the input could not be parsed and 1
//! for any other failure.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use cppumockgen::{Color, Colorizer, Error, JsonFrontEnd, MockGenerator, OutputPaths};

#[derive(Parser, Debug)]
#[command(name = "cppumockgen", version, about = "Mock generator for CppUTest")]
struct Args {
    /// Input file
    #[arg(value_name = "INPUT", conflicts_with = "input")]
    positional: Option<PathBuf>,

    /// Input file
    #[arg(short, long, value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Mock output path; `@` for standard output
    #[arg(short, long, num_args = 0..=1, default_missing_value = "", value_name = "PATH")]
    mock_output: Option<String>,

    /// Expectation output path; `@` for standard output
    #[arg(short, long, num_args = 0..=1, default_missing_value = "", value_name = "PATH")]
    expect_output: Option<String>,

    /// Force interpretation of the input file as C++
    #[arg(short = 'x', long = "cpp")]
    cpp: bool,

    /// Interpret the input file as C++11
    #[arg(short = 'l', long)]
    cpp11: bool,

    /// Use underlying typedef type
    #[arg(short, long)]
    underlying_typedef: bool,

    /// Include path
    #[arg(short = 'I', long = "include-path", value_name = "PATH")]
    include_paths: Vec<PathBuf>,

    /// Extra include file
    #[arg(short = 'y', long = "extra-include", value_name = "PATH")]
    extra_includes: Vec<PathBuf>,

    /// Override parameter type
    #[arg(short, long = "param-override", value_name = "EXPR")]
    param_overrides: Vec<String>,

    /// Override generic type
    #[arg(short, long = "type-override", value_name = "EXPR")]
    type_overrides: Vec<String>,

    /// Declaration tree dumped by the parser; defaults to `<INPUT>.json`
    #[arg(long, value_name = "PATH")]
    ast: Option<PathBuf>,

    /// Never color status messages
    #[arg(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let colorizer = Colorizer::new(!args.no_color && io::stderr().is_terminal());
    let mut stderr = io::stderr().lock();

    match run(&args, colorizer, &mut stderr) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Failure { message, code }) => {
            // Nothing else can be reported if stderr itself is broken.
            let _ = colorizer.report(&mut stderr, Color::Red, "ERROR:", &message);
            ExitCode::from(code)
        }
    }
}

struct Failure {
    message: String,
    code: u8,
}

impl From<Error> for Failure {
    fn from(error: Error) -> Self {
        Self {
            message: error.to_string(),
            code: 1,
        }
    }
}

impl From<io::Error> for Failure {
    fn from(error: io::Error) -> Self {
        Error::Io(error).into()
    }
}

fn run(args: &Args, colorizer: Colorizer, stderr: &mut impl io::Write) -> Result<(), Failure> {
    let Some(input) = args.positional.as_ref().or(args.input.as_ref()) else {
        return Err(Error::Input("No input file specified.".to_string()).into());
    };
    if args.mock_output.is_none() && args.expect_output.is_none() {
        return Err(Error::Input(
            "At least the mock generation option (-m) or the expectation generation option (-e) must be specified."
                .to_string(),
        )
        .into());
    }

    let mut generator = MockGenerator::new();
    generator
        .interpret_as_cpp(args.cpp)
        .cpp11(args.cpp11)
        .underlying_typedef(args.underlying_typedef);
    for path in &args.include_paths {
        generator.include(path);
    }
    for path in &args.extra_includes {
        generator.extra_include(path);
    }
    for rule in &args.param_overrides {
        generator.param_override(rule);
    }
    for rule in &args.type_overrides {
        generator.type_override(rule);
    }

    let frontend = match &args.ast {
        Some(path) => JsonFrontEnd::with_ast_path(path),
        None => JsonFrontEnd::new(),
    };

    let parse_failure = || Failure {
        message: format!(
            "Output could not be generated due to errors parsing the input file '{}'.",
            input.display()
        ),
        code: 2,
    };
    let session = match generator.session(&frontend, input) {
        Ok(session) => session,
        Err(Error::Parse {
            errors, warnings, ..
        }) => {
            colorizer.report_diagnostics(stderr, &warnings)?;
            colorizer.report_diagnostics(stderr, &errors)?;
            return Err(parse_failure());
        }
        Err(e @ Error::NothingToMock { .. }) => {
            colorizer.report(stderr, Color::Red, "INPUT ERROR:", &e.to_string())?;
            return Err(parse_failure());
        }
        Err(e) => return Err(e.into()),
    };
    colorizer.report_diagnostics(stderr, session.warnings())?;

    let paths = OutputPaths::resolve(
        input,
        args.mock_output.as_deref(),
        args.expect_output.as_deref(),
    );
    let written = session.write(&paths, &mut io::stdout().lock())?;

    if let Some(mock) = &written.mock {
        colorizer.report(
            stderr,
            Color::Green,
            "SUCCESS:",
            &format!("Mock generated into '{}'", mock.display()),
        )?;
    }
    if let Some((header, source)) = &written.expectation {
        colorizer.report(
            stderr,
            Color::Green,
            "SUCCESS:",
            &format!(
                "Expectations generated into '{}' and '{}'",
                header.display(),
                source.display()
            ),
        )?;
    }
    Ok(())
}
