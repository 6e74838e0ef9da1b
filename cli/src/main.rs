//! mdlex CLI - Markdown to paginated editor state tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use mdlex::convert::DEFAULT_LANGUAGE;
use mdlex::highlight::DEFAULT_THEME;
use mdlex::render::{RenderEvent, StreamingRenderer};
use mdlex::{
    ConvertResult, FileStore, JsonFileStore, JsonFormat, Mdlex, SyntaxHighlighter, WindowConfig,
    WindowManager,
};

#[derive(Parser)]
#[command(name = "mdlex")]
#[command(author = "mdlex contributors")]
#[command(version)]
#[command(about = "Convert Markdown to paginated rich-text editor state JSON", long_about = None)]
struct Cli {
    /// Input Markdown file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert to editor state JSON plus one JSON file per page
    Convert {
        /// Input Markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        #[command(flatten)]
        conversion: ConversionArgs,
    },

    /// Convert to a single editor state JSON document
    Json {
        /// Input Markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        conversion: ConversionArgs,
    },

    /// Print page JSON, one line per page
    Pages {
        /// Input Markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Only print this 0-based page
        #[arg(short, long, value_name = "INDEX")]
        index: Option<usize>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        conversion: ConversionArgs,
    },

    /// Show document statistics
    Info {
        /// Input Markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        conversion: ConversionArgs,
    },

    /// Simulate scrolling and show which pages are materialized
    Window {
        /// Input Markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Pages becoming visible, in order
        #[arg(short, long = "visible", value_name = "INDEX")]
        visible: Vec<usize>,

        /// Pages kept before the visible one
        #[arg(long, default_value = "2")]
        before: usize,

        /// Pages kept after the visible one
        #[arg(long, default_value = "2")]
        after: usize,

        /// Pages materialized before any page is visible
        #[arg(long, default_value = "3")]
        initial: usize,

        #[command(flatten)]
        conversion: ConversionArgs,
    },

    /// Print the stylesheet for highlighted code
    Css {
        /// Theme name
        #[arg(short, long, default_value = DEFAULT_THEME)]
        theme: String,

        /// List available themes
        #[arg(long)]
        list: bool,
    },

    /// Manage stored Markdown files
    Store {
        /// Store file
        #[arg(long, env = "MDLEX_STORE", default_value = "mdlex-store.json")]
        path: PathBuf,

        #[command(subcommand)]
        action: StoreAction,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum StoreAction {
    /// Add a Markdown file
    Add {
        /// Markdown file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List stored files
    List,

    /// Print the editor state JSON of a stored file
    Show {
        /// Record id (selected record if omitted)
        id: Option<u64>,
    },

    /// Select the file the viewer shows
    Select {
        /// Record id
        id: u64,
    },

    /// Delete a stored file
    Delete {
        /// Record id
        id: u64,
    },
}

#[derive(clap::Args)]
struct ConversionArgs {
    /// Top-level blocks per page
    #[arg(long, env = "MDLEX_PAGE_SIZE", default_value = "5")]
    page_size: usize,

    /// Skip syntax highlighting
    #[arg(long)]
    no_highlight: bool,

    /// Language for code blocks that declare none
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    default_language: String,

    /// Highlight code blocks one after another
    #[arg(long)]
    sequential: bool,
}

impl ConversionArgs {
    fn builder(&self) -> Mdlex {
        let builder = Mdlex::new()
            .with_page_size(self.page_size)
            .with_highlight(!self.no_highlight)
            .with_default_language(self.default_language.as_str());
        if self.sequential {
            builder.sequential()
        } else {
            builder
        }
    }

    fn convert_file(&self, input: &Path) -> Result<ConvertResult, Box<dyn std::error::Error>> {
        let markdown = fs::read_to_string(input)?;
        Ok(self.builder().convert_markdown(&markdown))
    }
}

impl Default for ConversionArgs {
    fn default() -> Self {
        Self {
            page_size: mdlex::render::DEFAULT_PAGE_SIZE,
            no_highlight: false,
            default_language: DEFAULT_LANGUAGE.to_string(),
            sequential: false,
        }
    }
}

fn json_format(pretty: bool) -> JsonFormat {
    if pretty {
        JsonFormat::Pretty
    } else {
        JsonFormat::Compact
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            conversion,
        }) => cmd_convert(&input, output.as_deref(), &conversion),
        Some(Commands::Json {
            input,
            output,
            pretty,
            conversion,
        }) => cmd_json(&input, output.as_deref(), pretty, &conversion),
        Some(Commands::Pages {
            input,
            index,
            pretty,
            conversion,
        }) => cmd_pages(&input, index, pretty, &conversion),
        Some(Commands::Info {
            input,
            json,
            conversion,
        }) => cmd_info(&input, json, &conversion),
        Some(Commands::Window {
            input,
            visible,
            before,
            after,
            initial,
            conversion,
        }) => {
            let config = WindowConfig {
                before,
                after,
                initial,
            };
            cmd_window(&input, &visible, config, &conversion)
        }
        Some(Commands::Css { theme, list }) => cmd_css(&theme, list),
        Some(Commands::Store { path, action }) => cmd_store(&path, action),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), &ConversionArgs::default())
            } else {
                println!("{}", "Usage: mdlex <FILE> [OUTPUT]".yellow());
                println!("       mdlex --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    conversion: &ConversionArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });
    let pages_dir = output_dir.join("pages");
    fs::create_dir_all(&pages_dir)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Converting Markdown...");
    let result = conversion.convert_file(input)?;
    spinner.finish_and_clear();

    fs::write(
        output_dir.join("document.json"),
        result.to_json_with(JsonFormat::Pretty)?,
    )?;

    let pages = result.pages();
    let pb = ProgressBar::new(pages.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message("Writing pages...");
    for page in &pages {
        let name = format!("page-{:04}.json", page.index);
        fs::write(pages_dir.join(name), page.to_json(JsonFormat::Compact)?)?;
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    println!("  {} document.json", "├─".dimmed());
    println!("  {} pages/ ({} files)", "└─".dimmed(), pages.len());

    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    pretty: bool,
    conversion: &ConversionArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = conversion.convert_file(input)?;
    let json = result.to_json_with(json_format(pretty))?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_pages(
    input: &Path,
    index: Option<usize>,
    pretty: bool,
    conversion: &ConversionArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = conversion.convert_file(input)?;

    if let Some(index) = index {
        let pages = result.pages();
        let page = pages
            .get(index)
            .ok_or(mdlex::Error::PageOutOfRange(index, pages.len()))?;
        println!("{}", page.to_json(json_format(pretty))?);
        return Ok(());
    }

    let options = result.render.clone().with_json_format(json_format(pretty));
    for event in StreamingRenderer::new(&result.state.root, options) {
        match event? {
            RenderEvent::DocumentStart { page_count, .. } => {
                log::info!("Rendering {} pages", page_count);
            }
            RenderEvent::Page { json, .. } => println!("{}", json),
            RenderEvent::DocumentEnd => {}
        }
    }

    Ok(())
}

fn cmd_info(
    input: &Path,
    json: bool,
    conversion: &ConversionArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = conversion.convert_file(input)?;
    let stats = &result.stats;

    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Blocks".bold(), stats.block_count);
    println!(
        "{}: {} ({} blocks per page)",
        "Pages".bold(),
        result.page_count(),
        result.render.page_size
    );

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!(
        "{}: {} ({} items)",
        "Lists".bold(),
        stats.list_count,
        stats.list_item_count
    );
    println!(
        "{}: {} ({} highlighted, {} plain)",
        "Code blocks".bold(),
        stats.code_block_count,
        stats.highlighted_code_count,
        stats.fallback_code_count
    );
    println!("{}: {}", "Links".bold(), stats.link_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    if stats.unsafe_link_count > 0 {
        println!(
            "{}: {}",
            "Unsafe links removed".yellow().bold(),
            stats.unsafe_link_count
        );
    }
    if stats.skipped_block_count > 0 || stats.skipped_inline_count > 0 {
        println!(
            "{}: {} blocks, {} inline",
            "Skipped".yellow().bold(),
            stats.skipped_block_count,
            stats.skipped_inline_count
        );
    }

    Ok(())
}

fn cmd_window(
    input: &Path,
    visible: &[usize],
    config: WindowConfig,
    conversion: &ConversionArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = conversion.convert_file(input)?;
    let mut manager = WindowManager::new(result.page_count(), config);

    println!(
        "{} {} pages, window of {}",
        "Document:".cyan().bold(),
        manager.page_count(),
        config.capacity()
    );
    print_window("initial", &manager);

    for &index in visible {
        let change = manager.on_visibility(index, true)?;
        if !change.materialize.is_empty() {
            println!("  {} {:?}", "+".green(), change.materialize);
        }
        if !change.dematerialize.is_empty() {
            println!("  {} {:?}", "-".red(), change.dematerialize);
        }
        print_window(&format!("page {} visible", index), &manager);
    }

    Ok(())
}

fn print_window(label: &str, manager: &WindowManager) {
    let window = manager.window();
    let materialized: Vec<usize> = window.collect();
    println!("{:>18}: {:?}", label.bold(), materialized);
}

fn cmd_css(theme: &str, list: bool) -> Result<(), Box<dyn std::error::Error>> {
    if list {
        for name in SyntaxHighlighter::theme_names() {
            if name == DEFAULT_THEME {
                println!("{} {}", name, "(default)".dimmed());
            } else {
                println!("{}", name);
            }
        }
        return Ok(());
    }

    println!("{}", SyntaxHighlighter::stylesheet(theme)?);
    Ok(())
}

fn cmd_store(path: &Path, action: StoreAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = JsonFileStore::open(path)?;

    match action {
        StoreAction::Add { file } => {
            let content = fs::read_to_string(&file)?;
            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let id = store.add(&filename, &content)?;
            println!("{} {} as #{}", "Added".green(), filename, id);
        }
        StoreAction::List => {
            let selected = store.selected();
            let records = store.list();
            if records.is_empty() {
                println!("{}", "No files stored".dimmed());
            }
            for record in records {
                let marker = if Some(record.id) == selected { "*" } else { " " };
                println!(
                    "{} {:>4}  {}  {}",
                    marker.green().bold(),
                    record.id,
                    record.created.format("%Y-%m-%d %H:%M"),
                    record.filename
                );
            }
        }
        StoreAction::Show { id } => {
            let record = match id {
                Some(id) => store.get(id).ok_or(mdlex::Error::RecordNotFound(id))?,
                None => store.selected_record().ok_or("no file selected")?,
            };
            let result = Mdlex::new().convert_markdown(&record.content);
            println!("{}", result.to_json_with(JsonFormat::Pretty)?);
        }
        StoreAction::Select { id } => {
            store.select(id)?;
            println!("{} #{}", "Selected".green(), id);
        }
        StoreAction::Delete { id } => {
            store.delete(id)?;
            println!("{} #{}", "Deleted".green(), id);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "mdlex".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Markdown to rich-text editor state converter");
    println!();
    println!("Themes: {}", SyntaxHighlighter::theme_names().len());
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pages_command() {
        let cli = Cli::try_parse_from([
            "mdlex",
            "pages",
            "doc.md",
            "--index",
            "2",
            "--page-size",
            "3",
            "--no-highlight",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Pages {
                index, conversion, ..
            }) => {
                assert_eq!(index, Some(2));
                assert_eq!(conversion.page_size, 3);
                assert!(conversion.no_highlight);
                assert_eq!(conversion.default_language, DEFAULT_LANGUAGE);
            }
            _ => panic!("expected pages command"),
        }
    }

    #[test]
    fn test_convert_writes_pages() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.md");
        let body: String = (0..7).map(|i| format!("Paragraph {}\n\n", i)).collect();
        fs::write(&input, body).unwrap();

        let output = dir.path().join("out");
        let conversion = ConversionArgs {
            no_highlight: true,
            ..ConversionArgs::default()
        };
        cmd_convert(&input, Some(&output), &conversion).unwrap();

        assert!(output.join("document.json").exists());
        assert!(output.join("pages").join("page-0000.json").exists());
        assert!(output.join("pages").join("page-0001.json").exists());
        assert!(!output.join("pages").join("page-0002.json").exists());
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("store.json");
        let file = dir.path().join("notes.md");
        fs::write(&file, "# Notes").unwrap();

        cmd_store(&store_path, StoreAction::Add { file }).unwrap();
        let store = JsonFileStore::open(&store_path).unwrap();
        assert_eq!(store.list()[0].filename, "notes.md");
        assert_eq!(store.selected(), Some(1));

        cmd_store(&store_path, StoreAction::Delete { id: 1 }).unwrap();
        assert!(cmd_store(&store_path, StoreAction::Delete { id: 1 }).is_err());
    }
}
