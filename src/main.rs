use clap::{Parser as ClapParser, Subcommand};
use gox_analyzer::diagnostics::{self, Diagnostic};
use gox_analyzer::error::InputError;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(ClapParser)]
#[command(version, about = "GOX language analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize a .gox file and print the token stream
    Tokens {
        file: PathBuf,
        /// Print tokens as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Parse a .gox file and print the AST
    Parse {
        file: PathBuf,
        /// Print the AST as JSON instead of an indented tree
        #[arg(long)]
        json: bool,
    },
}

fn read_source(path: &Path) -> Result<String, InputError> {
    if !path.exists() {
        return Err(InputError::FileNotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|e| InputError::Io(path.to_path_buf(), e))
}

fn print_diagnostics(path: &Path, diags: &[Diagnostic]) {
    for diag in diags {
        eprintln!("{}", diag.render(path));
    }
}

fn run(cli: Cli) -> Result<bool, InputError> {
    match cli.command {
        Commands::Tokens { file, json } => {
            let text = read_source(&file)?;
            let (tokens, mut diags) = gox_analyzer::tokenize(&text);
            diagnostics::sort_by_position(&mut diags);
            print_diagnostics(&file, &diags);
            let had_errors = diags.iter().any(|d| d.is_error());
            if !had_errors {
                if json {
                    let out = serde_json::to_string_pretty(&tokens)
                        .expect("token stream serializes to JSON");
                    println!("{}", out);
                } else {
                    for token in &tokens {
                        println!("{}", token);
                    }
                }
            }
            Ok(had_errors)
        }
        Commands::Parse { file, json } => {
            let text = read_source(&file)?;
            let (program, diags) = gox_analyzer::analyze(&text);
            print_diagnostics(&file, &diags);
            let had_errors = diags.iter().any(|d| d.is_error());
            if !had_errors {
                if json {
                    let out =
                        serde_json::to_string_pretty(&program).expect("AST serializes to JSON");
                    println!("{}", out);
                } else {
                    print!("{}", program.dump());
                }
            }
            Ok(had_errors)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(1),
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::from(2)
        }
    }
}
