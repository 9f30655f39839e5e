//! stopc
//!
//! Compiles programs in the small stop language to C.

mod backend;
mod compiler;
mod feedback;
mod frontend;
mod types;
mod utils;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use compiler::Compilation;
use feedback::CompilationFeedback;
use frontend::printer::{print_tokens, print_tree};

/// stop compiler
#[derive(Parser, Debug)]
#[command(name = "stopc")]
#[command(version = "0.1.0")]
#[command(about = "stopc - compiles stop programs to C")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input source file (.stp)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the token stream
    #[arg(long, global = true)]
    emit_tokens: bool,

    /// Print the parsed tree
    #[arg(long, global = true)]
    emit_ast: bool,

    /// Report diagnostics as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a source file
    Build {
        /// Input source file
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a source file for errors
    Check {
        /// Input source file
        input: PathBuf,
    },
    /// Print version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Build { input, output }) => {
            compile_file(input, output.clone().or_else(|| cli.output.clone()), cli)
        }
        Some(Commands::Check { input }) => check_file(input, cli),
        Some(Commands::Version) => {
            println!("stopc 0.1.0");
            println!("License: Apache-2.0");
            Ok(())
        }
        None => match &cli.input {
            Some(input) => compile_file(input, cli.output.clone(), cli),
            None => bail!("no input file specified\nUsage: stopc <FILE> or stopc build <FILE>"),
        },
    }
}

fn read_source(input: &Path) -> anyhow::Result<String> {
    fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))
}

/// `prog.stp` compiles to `prog.c`; other names get `.c` appended
fn default_output(input: &Path) -> PathBuf {
    match input.extension() {
        Some(ext) if ext == "stp" => input.with_extension("c"),
        _ => {
            let mut path = input.as_os_str().to_owned();
            path.push(".c");
            PathBuf::from(path)
        }
    }
}

/// Print requested dumps and diagnostics. Returns whether the program is clean.
fn report(input: &Path, source: &str, compilation: &Compilation, cli: &Cli) -> anyhow::Result<bool> {
    if cli.emit_tokens {
        println!("---- Tokens ----");
        print!("{}", print_tokens(&compilation.tokens));
    }
    if cli.emit_ast {
        println!("---- Tree ----");
        print!("{}", print_tree(&compilation.program));
    }

    let diagnostics = compilation.diagnostics();
    if cli.json {
        let feedback = CompilationFeedback::new(&input.to_string_lossy(), source, compilation);
        println!("{}", feedback.to_json()?);
    } else if !diagnostics.is_empty() {
        eprintln!("Errors found:");
        for diag in diagnostics {
            match diag.span().location(source) {
                Some((line, column)) => eprintln!(" - {}:{}: {}", line, column, diag),
                None => eprintln!(" - {}", diag),
            }
        }
    }

    Ok(diagnostics.is_empty())
}

/// Compile a source file to C
fn compile_file(input: &Path, output: Option<PathBuf>, cli: &Cli) -> anyhow::Result<()> {
    log::info!("compiling {}", input.display());
    let source = read_source(input)?;

    let compilation = compiler::compile(&source)?;
    if !report(input, &source, &compilation, cli)? {
        // Diagnostics were reported; the compiler itself succeeded
        return Ok(());
    }

    let Some(code) = &compilation.output else {
        bail!("no output was generated for {}", input.display());
    };
    let out_path = output.unwrap_or_else(|| default_output(input));
    fs::write(&out_path, code).with_context(|| format!("writing {}", out_path.display()))?;

    if !cli.json {
        println!("Compiled to {}", out_path.display());
    }
    Ok(())
}

/// Check a source file for errors without generating code
fn check_file(input: &Path, cli: &Cli) -> anyhow::Result<()> {
    log::info!("checking {}", input.display());
    let source = read_source(input)?;

    let compilation = Compilation::analyze(&source);
    if report(input, &source, &compilation, cli)? && !cli.json {
        println!("No errors found");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output() {
        assert_eq!(default_output(Path::new("dir/prog.stp")), PathBuf::from("dir/prog.c"));
        assert_eq!(default_output(Path::new("prog")), PathBuf::from("prog.c"));
        assert_eq!(default_output(Path::new("prog.txt")), PathBuf::from("prog.txt.c"));
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["stopc", "check", "a.stp", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Some(Commands::Check { ref input }) if input == Path::new("a.stp")));

        let cli = Cli::try_parse_from(["stopc", "--emit-ast", "-o", "out.c", "a.stp"]).unwrap();
        assert!(cli.emit_ast);
        assert_eq!(cli.output, Some(PathBuf::from("out.c")));
        assert_eq!(cli.input, Some(PathBuf::from("a.stp")));
    }
}
