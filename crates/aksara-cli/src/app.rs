//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use aksara::{parse, Converter, OutputFormat, Settings};
use aksara_core::settings::SETTINGS_FILE;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Output format for `convert`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Self-contained HTML page
    Html,
    /// PDF through a headless browser
    Pdf,
    /// PowerPoint deck
    Pptx,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Html => OutputFormat::Html,
            FormatArg::Pdf => OutputFormat::Pdf,
            FormatArg::Pptx => OutputFormat::Pptx,
        }
    }
}

#[derive(Parser)]
#[command(name = "aksara")]
#[command(author, version, about = "One source, three layouts", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an annotated markdown file
    Convert(ConvertArgs),

    /// Print directives, metadata and sections as JSON
    Inspect {
        /// Input markdown file
        input: PathBuf,

        /// Settings file (default: nearest aksara.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write a default aksara.toml
    InitConfig {
        /// Where to write the settings
        #[arg(short, long, default_value = SETTINGS_FILE)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Arguments of the `convert` command
#[derive(Debug, Clone, Default, Args)]
pub struct ConvertArgs {
    /// Input markdown file
    pub input: PathBuf,

    /// Output format (default: from settings, else html)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Output file (default: input with the format's extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Built-in theme: default, dark or minimal
    #[arg(long)]
    pub theme: Option<String>,

    /// Locale for date formatting, e.g. id-ID
    #[arg(long)]
    pub locale: Option<String>,

    /// Inline images as data URIs
    #[arg(long)]
    pub embed_images: bool,

    /// Fail when a ${meta.*} field is missing
    #[arg(long)]
    pub strict: bool,

    /// Settings file (default: nearest aksara.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert(args) => {
            convert_command(&args)?;
        }
        Commands::Inspect { input, config } => {
            let json = inspect_command(&input, config.as_deref())?;
            println!("{json}");
        }
        Commands::InitConfig { output, force } => {
            init_config_command(&output, force)?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber
pub fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    // A second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Settings from `config`, else the nearest `aksara.toml` above `input`
pub fn load_settings(config: Option<&Path>, input: &Path) -> Result<Settings> {
    if let Some(path) = config {
        return Settings::load(path)
            .with_context(|| format!("Failed to load settings: {}", path.display()));
    }

    let dir = input_dir(input).unwrap_or_else(|| PathBuf::from("."));
    match Settings::discover(&dir) {
        Some(path) => Settings::load(&path)
            .with_context(|| format!("Failed to load settings: {}", path.display())),
        None => {
            debug!(dir = %dir.display(), "no settings file, using defaults");
            Ok(Settings::default())
        }
    }
}

fn input_dir(input: &Path) -> Option<PathBuf> {
    input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

/// Execute the convert command, returning the written path
pub fn convert_command(args: &ConvertArgs) -> Result<PathBuf> {
    println!("aksara v{}", aksara::VERSION);
    println!("Converting: {}", args.input.display());

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let settings = load_settings(args.config.as_deref(), &args.input)?;
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read input file: {}", args.input.display()))?;

    let mut options = settings.convert_options(args.format.map(Into::into));
    if let Some(theme) = &args.theme {
        options.theme = theme.clone();
    }
    if let Some(locale) = &args.locale {
        options.locale = locale.clone();
    }
    if args.embed_images {
        options.embed_images = Some(true);
    }
    if args.strict {
        options.strict_meta = true;
    }
    options.base_path = input_dir(&args.input);

    let format = options.format;
    let result = Converter::new(settings).convert(&text, &options);

    for warning in result.warnings() {
        warn!("{warning}");
        eprintln!("  warning: {warning}");
    }
    if !result.is_success() {
        anyhow::bail!(
            "Conversion failed: {}",
            result.error().unwrap_or("unknown error")
        );
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension(format.extension()));
    let data = result
        .into_data()
        .context("Conversion succeeded without output")?;
    fs::write(&output, &data)
        .with_context(|| format!("Failed to write output file: {}", output.display()))?;

    println!("  Wrote {} ({} bytes)", output.display(), data.len());
    Ok(output)
}

/// Execute the inspect command, returning the JSON summary
pub fn inspect_command(input: &Path, config: Option<&Path>) -> Result<String> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let settings = load_settings(config, input)?;
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;

    let mut options = settings.convert_options(None);
    options.base_path = input_dir(input);
    let model = parse(&text, &options);

    serde_json::to_string_pretty(&model.summary()).context("Failed to serialize summary")
}

/// Execute the init-config command
pub fn init_config_command(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "Settings file already exists: {} (use --force to overwrite)",
            output.display()
        );
    }

    let toml = Settings::default()
        .to_toml_string()
        .context("Failed to serialize default settings")?;
    fs::write(output, toml)
        .with_context(|| format!("Failed to write settings: {}", output.display()))?;

    println!("Created {}", output.display());
    Ok(())
}
