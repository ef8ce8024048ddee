//! Command-line interface for llmd
//! Compiles Markdown files or directory trees into the LLMD compact format.
//!
//! Usage:
//!   llmd <paths>... [-o out.llmd] [-c 0|1|2] [--scope-mode flat|concat|stacked]
//!        [--keep-urls] [--sentence-split] [--anchor-every N] [--config file.toml]
//!
//! Configuration resolves in layers: embedded defaults, then the first of
//! `llmd.toml` / `config/llmd.toml` (or the `--config` file), then flags.

mod inputs;

use clap::{Arg, ArgAction, Command};
use llmd_config::{Loader, DEFAULT_LOCATIONS};
use std::fs;
use std::path::PathBuf;
use std::process;

fn main() {
    let matches = Command::new("llmd")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile Markdown into the LLMD compact text format")
        .arg(
            Arg::new("inputs")
                .help("Input files or directories")
                .value_name("PATH")
                .num_args(1..)
                .required(true),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Output file (default: stdout)"),
        )
        .arg(
            Arg::new("compression")
                .long("compression")
                .short('c')
                .value_parser(["0", "1", "2"])
                .help("Compression level (default: from config, 2)"),
        )
        .arg(
            Arg::new("scope-mode")
                .long("scope-mode")
                .value_parser(["flat", "concat", "stacked"])
                .help("Scope naming mode"),
        )
        .arg(
            Arg::new("keep-urls")
                .long("keep-urls")
                .action(ArgAction::SetTrue)
                .help("Keep text<url> link forms at compression 2"),
        )
        .arg(
            Arg::new("sentence-split")
                .long("sentence-split")
                .action(ArgAction::SetTrue)
                .help("Emit one line per sentence at compression 2"),
        )
        .arg(
            Arg::new("anchor-every")
                .long("anchor-every")
                .value_name("N")
                .value_parser(clap::value_parser!(usize))
                .help("Re-emit the active @scope every N lines (0 = off)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Configuration file (TOML)"),
        )
        .get_matches();

    let mut loader = match matches.get_one::<String>("config") {
        Some(path) => Loader::new().with_file(path),
        None => {
            let mut loader = Loader::new();
            for location in DEFAULT_LOCATIONS {
                loader = loader.with_optional_file(location);
            }
            loader
        }
    };

    if let Some(level) = matches.get_one::<String>("compression") {
        // The value parser admits "0".."2" only, so this parse cannot fail.
        let level: i64 = level.parse().unwrap_or(2);
        loader = override_or_die(loader, "compile.compression", level);
    }
    if let Some(mode) = matches.get_one::<String>("scope-mode") {
        loader = override_or_die(loader, "compile.scope_mode", mode.as_str());
    }
    if matches.get_flag("keep-urls") {
        loader = override_or_die(loader, "compile.keep_urls", true);
    }
    if matches.get_flag("sentence-split") {
        loader = override_or_die(loader, "compile.sentence_split", true);
    }
    if let Some(n) = matches.get_one::<usize>("anchor-every") {
        loader = override_or_die(loader, "compile.anchor_every", *n as i64);
    }

    let config = loader.build().unwrap_or_else(|e| fail(&format!("invalid configuration: {e}")));

    let raw_inputs: Vec<PathBuf> = matches
        .get_many::<String>("inputs")
        .expect("inputs are required")
        .map(PathBuf::from)
        .collect();

    let files = inputs::collect_files(&raw_inputs)
        .unwrap_or_else(|e| fail(&format!("cannot scan inputs: {e}")));
    if files.is_empty() {
        fail("no input files found");
    }

    let source =
        inputs::assemble(&files).unwrap_or_else(|e| fail(&format!("cannot read inputs: {e}")));

    let result = llmd_compiler::compile_with_diagnostics(&source, &config.compile);
    for diagnostic in &result.diagnostics {
        eprintln!("warning: {diagnostic}");
    }

    match matches.get_one::<String>("output") {
        Some(path) => {
            fs::write(path, &result.text)
                .unwrap_or_else(|e| fail(&format!("cannot write {path}: {e}")));
            let tokens = result.text.split_whitespace().count();
            eprintln!(
                "compiled {} file(s) -> {} (c{}, ~{} tokens)",
                files.len(),
                path,
                config.compile.compression,
                tokens
            );
        }
        None => print!("{}", result.text),
    }
}

fn override_or_die<I>(loader: Loader, key: &str, value: I) -> Loader
where
    I: Into<llmd_config::ValueKind>,
{
    loader
        .set_override(key, value)
        .unwrap_or_else(|e| fail(&format!("cannot apply {key}: {e}")))
}

fn fail(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}
