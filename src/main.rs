use anyhow::{Context, Result};
use minutes2md::convert;
use minutes2md::docx::DocxDocument;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::fs;
use std::path::Path;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    // Handle help flag
    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h" || args[1] == "help") {
        minutes2md::cli::print_help();
        return Ok(());
    }

    let mut verbose = false;
    let mut positional: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            other => positional.push(other),
        }
    }

    if positional.len() != 2 {
        minutes2md::cli::print_help();
        std::process::exit(1);
    }

    init_logging(verbose);

    let input = Path::new(positional[0]);
    let output = Path::new(positional[1]);

    log::info!("converting {} -> {}", input.display(), output.display());

    let doc = DocxDocument::open(input)?;
    let markdown = convert::convert_document(&doc);

    fs::write(output, markdown)
        .with_context(|| format!("could not write output: {}", output.display()))?;

    log::info!("done: {}", output.display());
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    // Logging is best-effort; conversion proceeds even if the terminal
    // refuses a logger.
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}
