use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of AVAILABLE_VIEWS from src/inspect.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_VIEWS: &[&str] = &["outline", "json", "math"];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("cornell")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert Cornell-style markdown notes to HTML or PDF")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a cornell.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert notes to HTML or PDF")
                .arg(
                    Arg::new("input")
                        .help("Markdown notes file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Output file path")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Output format")
                        .value_parser(["html", "pdf"]),
                )
                .arg(
                    Arg::new("page-size")
                        .long("page-size")
                        .help("PDF page size")
                        .value_parser(["letter", "a4"]),
                )
                .arg(
                    Arg::new("title")
                        .long("title")
                        .help("Title used when the notes have no level-1 heading"),
                )
                .arg(
                    Arg::new("css")
                        .long("css")
                        .help("Extra stylesheet appended to the HTML output")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show how the notes were classified")
                .arg(
                    Arg::new("path")
                        .help("Markdown notes file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("view")
                        .help("View to print")
                        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_VIEWS))
                        .index(2),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Shorthand for the json view")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("generate-css")
                .about("Print the embedded stylesheet")
                .arg(
                    Arg::new("print")
                        .long("print")
                        .help("Print the PDF print stylesheet instead of the HTML one")
                        .action(ArgAction::SetTrue),
                ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "cornell", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "cornell", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "cornell", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
