//! A tokenizer debugging tool: reads a source file, runs it through
//! [`risor_front::lexer::Lexer`], and prints every token with its span.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::{error, info};
use risor_front::lexer::{Lexer, LexerOptions};

/// Tokenize a Risor-style source file and print its tokens.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// The path to the source file.
    #[arg(index = 1)]
    file: PathBuf,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease log verbosity.
    #[arg(short, long)]
    quiet: bool,

    /// Print tokens as a JSON array instead of a plain-text table.
    #[arg(long)]
    json: bool,
}

fn level_for(verbose: u8, quiet: bool) -> log::Level {
    if quiet {
        return log::Level::Error;
    }
    match verbose {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        2 => log::Level::Debug,
        _ => log::Level::Trace,
    }
}

fn main() {
    let args = Cli::parse();
    simple_logger::init_with_level(level_for(args.verbose, args.quiet)).unwrap();

    let source = match fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            error!("could not read {}: {e}", args.file.display());
            std::process::exit(1);
        }
    };

    info!("tokenizing {}", args.file.display());
    let options = LexerOptions {
        file: args.file.to_string_lossy().into_owned(),
    };
    let lexer = Lexer::with_options(&source, options);
    let (tokens, errors) = lexer.tokenize_all();

    if args.json {
        match serde_json::to_string_pretty(&tokens) {
            Ok(json) => println!("{json}"),
            Err(e) => error!("failed to serialize tokens: {e}"),
        }
    } else {
        for tok in &tokens {
            println!("{:<12} {:<20?} {}", tok.start.to_string(), tok.kind, tok.literal);
        }
    }

    if !errors.is_empty() {
        for err in &errors {
            error!("{err}");
        }
        std::process::exit(1);
    }
}
