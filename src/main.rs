//! ai-share - Turn Markdown into a themed, shareable PNG.
//!
//! # Usage
//!
//! ```bash
//! ai-share                       # editor with the welcome document
//! ai-share notes.md              # edit notes.md, export with Ctrl-s
//! ai-share notes.md --export --theme midnight --brand claude
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use ai_share::app::{App, DEFAULT_TITLE, WELCOME};
use ai_share::brand;
use ai_share::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use ai_share::document::{self, RenderDescriptor};
use ai_share::export::{DEFAULT_SETTLE, DirectorySink, Exporter};
use ai_share::layout::{FontBook, LayoutOptions};
use ai_share::reformat::{GeminiReformatter, reformat_or_original};
use ai_share::theme::{self, ThemeId};

/// Turn Markdown into a themed, shareable PNG
#[derive(Parser, Debug)]
#[command(name = "ai-share", version, about, long_about = None)]
struct Cli {
    /// Markdown (or source code) file to start from
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Render FILE once, write the PNG and exit
    #[arg(long, requires = "file")]
    export: bool,

    /// Theme: light, dark, midnight, nature or sunset
    #[arg(long)]
    theme: Option<String>,

    /// Brand watermark id (see --list-brands)
    #[arg(long)]
    brand: Option<String>,

    /// Title shown in the header band
    #[arg(long)]
    title: Option<String>,

    /// Author shown in the header band
    #[arg(long)]
    author: Option<String>,

    /// Directory exported images are written to
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Canvas width in CSS pixels (the PNG is three times wider)
    #[arg(long)]
    width: Option<f32>,

    /// Delay before rasterizing, in milliseconds
    #[arg(long, value_name = "MS")]
    settle_ms: Option<u64>,

    /// Tidy the Markdown with Gemini before a one-shot export
    #[arg(long, requires = "export")]
    reformat: bool,

    /// Print the available themes and exit
    #[arg(long)]
    list_themes: bool,

    /// Print the available brands and exit
    #[arg(long)]
    list_brands: bool,

    /// Write logs to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn print_themes() {
    for theme in theme::all() {
        println!("{:<10} {}", theme.id.as_str(), theme.name);
    }
}

fn print_brands() {
    for brand in brand::list() {
        let glyph = brand.glyph.unwrap_or(" ");
        println!("{:<10} {glyph} {}", brand.id, brand.name);
    }
}

/// Warn about a brand id that will fall back to no watermark.
fn check_brand(id: &str) {
    if !brand::list().iter().any(|b| b.id.eq_ignore_ascii_case(id.trim())) {
        tracing::warn!(brand = id, "unknown brand, exporting without a watermark");
        eprintln!("[warn] Unknown brand '{id}', using {}", brand::NONE_ID);
    }
}

fn read_source(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(document::prepare_content(path, content))
}

fn build_exporter(flags: &ConfigFlags) -> Exporter {
    let settle = flags
        .settle_ms
        .map_or(DEFAULT_SETTLE, Duration::from_millis);
    let mut options = LayoutOptions::default();
    if let Some(width) = flags.width {
        options = options.with_width(width);
    }
    Exporter::new(Arc::new(FontBook::system()))
        .with_settle(settle)
        .with_options(options)
}

fn export_once(source: String, flags: &ConfigFlags) -> Result<PathBuf> {
    let source = if flags.reformat {
        match GeminiReformatter::from_env() {
            Ok(reformatter) => reformat_or_original(&reformatter, &source),
            Err(err) => {
                eprintln!("[warn] Skipping --reformat: {err}");
                source
            }
        }
    } else {
        source
    };

    let theme = flags.theme.unwrap_or(ThemeId::Light).theme();
    let brand_id = flags.brand.as_deref().unwrap_or(brand::NONE_ID);
    check_brand(brand_id);
    let descriptor = RenderDescriptor::new(&source, theme)
        .with_title(flags.title.as_deref().unwrap_or(DEFAULT_TITLE))
        .with_author(flags.author.as_deref().unwrap_or_default())
        .with_brand(brand::resolve(brand_id));
    let doc = document::render(&descriptor);

    let out_dir = flags.out_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let mut sink = DirectorySink::new(out_dir);
    let (path, _) = build_exporter(flags)
        .export(&doc, &mut sink)
        .context("生成图片失败，请重试。")?;
    Ok(path)
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();

    if cli.list_themes {
        print_themes();
        return Ok(());
    }
    if cli.list_brands {
        print_brands();
        return Ok(());
    }

    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_deref())?;
    if let Some(theme) = cli.theme.as_deref()
        && theme.parse::<ThemeId>().is_err()
    {
        tracing::warn!(theme, "unknown theme ignored");
        eprintln!("[warn] Unknown theme '{theme}', ignoring it");
    }

    let source = match &cli.file {
        Some(path) => read_source(path)?,
        None => WELCOME.to_string(),
    };

    if cli.export {
        let path = export_once(source, &effective)?;
        println!("{}", path.display());
        return Ok(());
    }

    let brand_id = effective.brand.clone().unwrap_or_else(|| brand::NONE_ID.to_string());
    check_brand(&brand_id);
    let app = App::new(source, Arc::new(build_exporter(&effective)))
        .with_theme(effective.theme.unwrap_or(ThemeId::Light))
        .with_brand(brand_id)
        .with_title(effective.title.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string()))
        .with_author(effective.author.clone().unwrap_or_default())
        .with_out_dir(effective.out_dir.clone().unwrap_or_else(|| PathBuf::from(".")))
        .with_config_paths(
            Some(global_path),
            local_path.exists().then_some(local_path),
        );

    app.run().context("Application error")
}
