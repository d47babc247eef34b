//! SVG Instructions CLI
//!
//! Usage:
//!   svg-instructions [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>    Configuration file (TOML format)
//!   -s, --scale <SCALE>    Document scale; negative values scale by the reciprocal
//!   -n, --name <NAME>      Document name used in diagnostics
//!   -f, --format <FORMAT>  Output format: path or instructions
//!   -h, --help             Print help

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;

use svg_instructions::{serialize, Config, Document, Instruction, OutputFormat, SvgError};

#[derive(Parser)]
#[command(name = "svg-instructions")]
#[command(about = "Flatten SVG documents into absolute drawing instructions")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Document scale; negative values scale by the reciprocal
    #[arg(short, long, allow_negative_numbers = true)]
    scale: Option<f64>,

    /// Document name used in diagnostics
    #[arg(short, long)]
    name: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                process::exit(2);
            }
        },
        None => Config::default(),
    };

    // Command-line values win over the config file
    if let Some(scale) = cli.scale {
        config = config.with_scale(scale);
    }
    if let Some(format) = cli.format {
        config = config.with_format(format);
    }
    match (&cli.name, &cli.input) {
        (Some(name), _) => config = config.with_name(name.clone()),
        (None, Some(path)) if config.document.name.is_none() => {
            config = config.with_name(path.display().to_string());
        }
        _ => {}
    }

    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                process::exit(2);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    process::exit(2);
                }
            }
        }
    };

    let document = match Document::parse_with(&source, &config) {
        Ok(document) => Arc::new(document),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    for diagnostic in document.diagnostics() {
        eprint!("{}", diagnostic.report());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match config.output.format {
        OutputFormat::Path => write_paths(&mut out, &document),
        OutputFormat::Instructions => write_instructions(&mut out, &document),
    };

    match result {
        Ok(errors) if errors.is_empty() => {}
        Ok(errors) => {
            for error in &errors {
                eprint!("{}", error.report());
            }
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error writing output: {}", e);
            process::exit(2);
        }
    }
}

/// One `<path>` element per shape, including the valid prefix of shapes that failed
fn write_paths(out: &mut impl Write, document: &Document) -> io::Result<Vec<SvgError>> {
    let mut errors = Vec::new();
    for id in document.shapes() {
        let mut shape = Vec::new();
        for result in document.shape_instructions(id).into_iter().flatten() {
            match result {
                Ok(instruction) => shape.push(instruction),
                Err(err) => errors.push(err),
            }
        }
        if !shape.is_empty() {
            writeln!(out, "{}", serialize(&shape))?;
        }
    }
    Ok(errors)
}

/// One instruction per line, printed as the background worker produces them
fn write_instructions(out: &mut impl Write, document: &Arc<Document>) -> io::Result<Vec<SvgError>> {
    let stream = document.stream();
    for instruction in stream.instructions.iter() {
        match &instruction {
            Instruction::Paint(paint) if paint.is_empty() => writeln!(out, "paint")?,
            Instruction::Paint(paint) => writeln!(out, "paint {}", paint)?,
            _ => writeln!(out, "{}", instruction)?,
        }
    }
    Ok(stream.errors.iter().collect())
}
