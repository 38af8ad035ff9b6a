// Command-line interface for cornell
//
// Converts Cornell-style markdown notes (cue | notes tables, summaries, LaTeX math) into a styled
// HTML page or a paginated PDF. The heavy lifting lives in cornell-babel; this binary only picks
// the target, resolves paths and configuration, and reports errors.
//
// Usage:
//  cornell <input> [-o <output>] [--to html|pdf] [--page-size letter|a4]   - Convert (default)
//  cornell convert <input> ...                                             - Same as above (explicit)
//  cornell inspect <input> [outline|json|math]                             - Show the parsed structure
//  cornell generate-css [--print]                                          - Print the embedded stylesheet
//
// Target selection: --to wins, then the extension of -o, then convert.default_format from the
// configuration. Without -o the output goes next to the input with the target's extension.
//
// Configuration: the embedded defaults, then ./cornell.toml if present, then --config <path>, then
// command-line flags.

use cornell_cli::inspect;

use clap::builder::TypedValueParser;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use cornell_babel::formats::{pdf::PRINT_CSS, CORNELL_CSS};
use cornell_babel::{default_output_path, Converter, ConverterConfig, FormatRegistry, PageSize};
use cornell_config::{ConfigError, CornellConfig, Loader, TargetFormat, LOCAL_CONFIG_FILE};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SUBCOMMANDS: &[&str] = &["convert", "inspect", "generate-css", "help"];

fn build_cli() -> Command {
    Command::new("cornell")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert Cornell-style markdown notes to HTML or PDF")
        .long_about(
            "cornell turns markdown notes written in the Cornell layout into a styled HTML page \
            or a printable PDF, keeping LaTeX math intact.\n\n\
            Commands:\n  \
            - convert: Render notes to HTML or PDF (default command)\n  \
            - inspect: Show how the notes were classified\n  \
            - generate-css: Print the embedded stylesheet\n\n\
            Examples:\n  \
            cornell notes.md                         # Writes notes.html\n  \
            cornell notes.md --to pdf                # Writes notes.pdf (US Letter)\n  \
            cornell notes.md -o out/week1.pdf --page-size a4\n  \
            cornell inspect notes.md                 # Block outline",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
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
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert notes to HTML or PDF (default command)")
                .long_about(
                    "Convert a markdown notes file.\n\n\
                    The target format comes from --to, else from the extension of -o, else\n\
                    from convert.default_format in the configuration (html).\n\
                    Without -o, the output is written next to the input with the target's\n\
                    extension.\n\n\
                    Examples:\n  \
                    cornell convert notes.md\n  \
                    cornell convert notes.md -o notes.pdf\n  \
                    cornell notes.md --to pdf --page-size a4   # 'convert' is optional",
                )
                .arg(
                    Arg::new("input")
                        .help("Input markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_name("PATH")
                        .help("Output file (defaults to the input path with the target extension)")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format")
                        .value_parser(["html", "pdf"])
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("page-size")
                        .long("page-size")
                        .help("PDF page size")
                        .value_parser(clap::builder::PossibleValuesParser::new(["letter", "a4"])
                            .map(|value| value.parse::<PageSize>().unwrap_or_default()))
                        .ignore_case(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("title")
                        .long("title")
                        .help("Title for notes without a level-1 heading")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("css")
                        .long("css")
                        .value_name("PATH")
                        .help("Extra stylesheet appended to the HTML output")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show how a notes file is classified")
                .long_about(
                    "Parse a notes file and print its block structure without rendering it.\n\n\
                    Views:\n  \
                    - outline: One line per block, table rows indented (default)\n  \
                    - json:    Blocks and math spans as JSON\n  \
                    - math:    Every math span with its Unicode approximation",
                )
                .arg(
                    Arg::new("path")
                        .help("Input markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("view")
                        .help("What to print. Defaults to 'outline'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            inspect::AVAILABLE_VIEWS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Shorthand for the 'json' view")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("view"),
                ),
        )
        .subcommand(
            Command::new("generate-css")
                .about("Output the stylesheet embedded in HTML exports")
                .long_about(
                    "Outputs the Cornell stylesheet embedded in every HTML export.\n\n\
                    Use it as a starting point for custom styling and pass the edited file\n\
                    back with --css (or convert.html.custom_css in cornell.toml).\n\n\
                    Examples:\n  \
                    cornell generate-css > notes.css\n  \
                    cornell generate-css --print      # Styles used for the PDF layout",
                )
                .arg(
                    Arg::new("print")
                        .long("print")
                        .help("Print the PDF layout styles instead")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn main() {
    init_tracing();

    // If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&args) {
        Ok(m) => m,
        Err(e) => {
            if args.len() > 1 && !args[1].starts_with('-') && !SUBCOMMANDS.contains(&args[1].as_str())
            {
                let mut new_args = vec![args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let config_path = matches.get_one::<String>("config").map(|s| s.as_str());

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let config = load_cli_config(config_path, sub_matches);
            handle_convert_command(sub_matches, &config);
        }
        Some(("inspect", sub_matches)) => {
            let path = sub_matches
                .get_one::<String>("path")
                .expect("path is required");
            let view = if sub_matches.get_flag("json") {
                "json"
            } else {
                sub_matches
                    .get_one::<String>("view")
                    .map(|s| s.as_str())
                    .unwrap_or("outline")
            };
            handle_inspect_command(path, view);
        }
        Some(("generate-css", sub_matches)) => {
            handle_generate_css_command(sub_matches.get_flag("print"));
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr; `RUST_LOG` replaces the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cornell_cli=info,cornell_babel=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Handle the convert command
fn handle_convert_command(matches: &ArgMatches, config: &CornellConfig) {
    let input = matches
        .get_one::<String>("input")
        .expect("input is required");
    let output = matches.get_one::<String>("output");

    let format = resolve_target_format(
        matches.get_one::<String>("to").map(|s| s.as_str()),
        output.map(|s| s.as_str()),
        config,
    );
    let target = config.convert.target(format).unwrap_or_else(|e| {
        eprintln!(
            "Error reading stylesheet '{}': {e}",
            config
                .convert
                .html
                .custom_css
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        );
        std::process::exit(1);
    });

    let output = output
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_path(input, target.extension()));
    tracing::debug!(input = %input, output = %output.display(), format = format.name(), "converting");

    let converter = Converter::new(ConverterConfig { output, target });
    if let Err(e) = converter.convert_file(input) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn resolve_target_format(
    to: Option<&str>,
    output: Option<&str>,
    config: &CornellConfig,
) -> TargetFormat {
    let detected = output.and_then(|path| FormatRegistry::default().detect_format_from_filename(path));
    match to.map(str::to_string).or(detected).as_deref() {
        Some("pdf") => TargetFormat::Pdf,
        Some("html") => TargetFormat::Html,
        _ => config.convert.default_format,
    }
}

/// Handle the inspect command
fn handle_inspect_command(path: &str, view: &str) {
    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    });

    let output = inspect::execute_view(&source, view).unwrap_or_else(|e| {
        eprintln!("Inspect error: {e}");
        std::process::exit(1);
    });

    print!("{output}");
}

/// Handle the generate-css command
fn handle_generate_css_command(print_styles: bool) {
    if print_styles {
        print!("{PRINT_CSS}");
    } else {
        print!("{CORNELL_CSS}");
    }
}

fn handle_list_formats_command() {
    let registry = FormatRegistry::default();
    println!("Available formats:\n");
    for name in registry.list_formats() {
        if let Ok(format) = registry.get(&name) {
            println!("  {name:<6} {}", format.description());
        }
    }
}

/// Loads configuration and applies convert flags as overrides.
fn load_cli_config(explicit_path: Option<&str>, matches: &ArgMatches) -> CornellConfig {
    let loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    apply_config_overrides(loader, matches)
        .and_then(Loader::build)
        .unwrap_or_else(|err| {
            eprintln!("Failed to load configuration: {err}");
            std::process::exit(1);
        })
}

fn apply_config_overrides(
    mut loader: Loader,
    matches: &ArgMatches,
) -> Result<Loader, ConfigError> {
    if let Some(size) = matches.get_one::<PageSize>("page-size") {
        loader = loader.set_override("convert.pdf.page_size", size.to_string())?;
    }
    if let Some(title) = matches.get_one::<String>("title") {
        loader = loader.set_override("convert.title", title.as_str())?;
    }
    if let Some(css) = matches.get_one::<String>("css") {
        loader = loader.set_override("convert.html.custom_css", css.as_str())?;
    }
    Ok(loader)
}
