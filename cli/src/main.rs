//! unslide CLI - PowerPoint to HTML conversion tool
//!
//! A command-line tool for converting PPTX presentations to standalone HTML
//! pages or JSON conversion results.

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use unslide::{ConvertOptions, JsonFormat, ThemeProcessing};

/// PowerPoint presentations to styled HTML
#[derive(Parser)]
#[command(
    name = "unslide",
    author = "iyulab",
    version,
    about = "Convert PowerPoint presentations to HTML",
    long_about = "unslide - PowerPoint (PPTX) to HTML conversion tool.\n\n\
                  Renders every slide as an HTML fragment sharing one generated stylesheet."
)]
struct Cli {
    /// Log conversion details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a presentation to a standalone HTML page
    Html {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        convert: ConvertArgs,
    },

    /// Convert a presentation to JSON
    Json {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        convert: ConvertArgs,
    },

    /// Show presentation information and metadata
    Info {
        /// Input file path
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Conversion flags shared by the output commands
#[derive(Args)]
struct ConvertArgs {
    /// How much of the layout and master is drawn under each slide
    #[arg(long, default_value = "full")]
    theme: ThemeMode,

    /// Embed audio and video instead of their poster images
    #[arg(long)]
    media: bool,

    /// Device units per EMU
    #[arg(long)]
    slide_factor: Option<f64>,

    /// Pixels per point of font size
    #[arg(long)]
    font_size_factor: Option<f64>,
}

/// Theme processing mode
#[derive(Clone, ValueEnum)]
enum ThemeMode {
    /// Backgrounds and decoration shapes of layout and master
    Full,
    /// Inherited backgrounds only
    Colors,
    /// The slide's own content only
    None,
}

impl From<ThemeMode> for ThemeProcessing {
    fn from(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Full => ThemeProcessing::Full,
            ThemeMode::Colors => ThemeProcessing::ColorsAndImageOnly,
            ThemeMode::None => ThemeProcessing::None,
        }
    }
}

impl ConvertArgs {
    fn options(&self) -> ConvertOptions {
        let mut options = ConvertOptions::new()
            .with_theme_processing(self.theme.clone().into())
            .with_media(self.media);
        if let Some(factor) = self.slide_factor {
            options = options.with_slide_factor(factor);
        }
        if let Some(factor) = self.font_size_factor {
            options = options.with_font_size_factor(factor);
        }
        options
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Html {
            input,
            output,
            convert,
        } => {
            let pb = create_spinner("Converting presentation...");

            let conversion = unslide::convert_file(&input, &convert.options())?;
            pb.set_message("Rendering page...");
            let page = unslide::to_html_document(&conversion);

            pb.finish_and_clear();
            write_output(output.as_deref(), &page)?;

            if let Some(path) = output {
                println!(
                    "{} Converted {} slides to HTML: {}",
                    "✓".green().bold(),
                    conversion.len(),
                    path.display()
                );
            }
        }

        Commands::Json {
            input,
            output,
            compact,
            convert,
        } => {
            let pb = create_spinner("Converting presentation...");

            let conversion = unslide::convert_file(&input, &convert.options())?;
            pb.set_message("Rendering to JSON...");

            let format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            let json = unslide::to_json(&conversion, format)?;

            pb.finish_and_clear();
            write_output(output.as_deref(), &json)?;

            if let Some(path) = output {
                println!(
                    "{} Converted to JSON: {}",
                    "✓".green().bold(),
                    path.display()
                );
            }
        }

        Commands::Info { input } => {
            let pb = create_spinner("Analyzing presentation...");

            let conversion = unslide::convert_file(&input, &ConvertOptions::default())?;

            pb.finish_and_clear();

            let info = &conversion.info;
            println!("{}", "Presentation Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Slides".bold(), info.slide_count);
            println!(
                "{}: {:.0} × {:.0} px",
                "Slide size".bold(),
                info.width,
                info.height
            );

            let meta = &info.metadata;
            if let Some(ref title) = meta.title {
                println!("{}: {}", "Title".bold(), title);
            }
            if let Some(ref author) = meta.author {
                println!("{}: {}", "Author".bold(), author);
            }
            if let Some(ref application) = meta.application {
                println!("{}: {}", "Application".bold(), application);
            }
            if let Some(hidden) = meta.hidden_slides {
                println!("{}: {}", "Hidden slides".bold(), hidden);
            }
            if let Some(ref created) = meta.created {
                println!("{}: {}", "Created".bold(), created);
            }
            if let Some(ref modified) = meta.modified {
                println!("{}: {}", "Modified".bold(), modified);
            }

            println!("\n{}", "Output Statistics".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "Style classes".bold(),
                conversion.stylesheet.lines().count()
            );
            println!("{}: {}", "Charts".bold(), conversion.charts.len());
            let markup: usize = conversion.slides.iter().map(|s| s.html.len()).sum();
            println!("{}: {}", "Markup bytes".bold(), markup);
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn print_version() {
    println!("{} {}", "unslide".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("PowerPoint presentations to styled HTML");
    println!();
    println!("Supported formats: PPTX, PPTM, PPSX, POTX");
    println!("Repository: https://github.com/iyulab/unslide");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_convert_flags() {
        let cli = Cli::parse_from([
            "unslide",
            "html",
            "deck.pptx",
            "--theme",
            "colors",
            "--media",
            "--font-size-factor",
            "2",
        ]);
        let Commands::Html { convert, .. } = cli.command else {
            panic!("expected html command");
        };
        let options = convert.options();
        assert_eq!(options.theme_processing, ThemeProcessing::ColorsAndImageOnly);
        assert!(options.media_process);
        assert_eq!(options.font_px(10.0), 20.0);
    }
}
