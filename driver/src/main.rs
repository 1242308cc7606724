use anyhow::Context;
use clap::Parser; // clap crate for CLI argument parsing
use std::{fs, path::PathBuf};

/*
Each stage flag stops the pipeline after that stage. With no flag the whole
pipeline runs and the pseudo-assembly listing is printed, or written to the
file given with -o.

Log output goes to stderr; set RUST_LOG=debug (or trace) to see it.
*/

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the source file
    input_path: PathBuf,

    /// Run the tokenizer only and print the tokens
    #[arg(short, long)]
    lex: bool,

    /// Run tokenizer and parser only and print the syntax tree
    #[arg(short, long)]
    parse: bool,

    /// Run up to semantic analysis, without generating code
    #[arg(short, long)]
    analyze: bool,

    /// Write the listing to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let source = fs::read_to_string(&args.input_path)
        .with_context(|| format!("failed to read {}", args.input_path.display()))?;

    if args.lex {
        for token in &lexer::tokenize(&source) {
            println!("{}:{} {}", token.line, token.column, token);
        }
        return Ok(());
    }

    if args.parse {
        let program = driver::parse(&source)?;
        println!("{:#?}", program);
        return Ok(());
    }

    if args.analyze {
        driver::check(&source)?;
        println!("{}: semantic analysis passed", args.input_path.display());
        return Ok(());
    }

    let listing = driver::compile_to_text(&source)?;
    match &args.output {
        Some(path) => fs::write(path, listing)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", listing),
    }
    Ok(())
}
