//! CLI binary for mail2article.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use clap::Parser;
use mail2article::{
    article_meta, beijing_now, clean_greeting, clip, dated_title, ConversionConfig, Converter,
    LocalAssetUploader,
};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (stdout)
  mail2article issue.html

  # Convert to file, rehosting images into a local assets directory
  mail2article issue.html -o article.html --assets-dir data/assets

  # Lead the article with a masthead banner
  mail2article issue.html --banner assets/banner.png --assets-dir data/assets -o article.html

  # Clip + neutralise the greeting only, for an external translation step
  mail2article issue.html --clip-only -o clipped.html

  # Read a Gmail API body (URL-safe base64) from stdin
  mail2article - --base64 -o article.html

  # Structured JSON output (ConversionOutput)
  mail2article issue.html --json > output.json

  # Write the article and print draft metadata for the publishing step
  mail2article issue.html -o article.html --meta > meta.json

WORKFLOW:
  The converter slots into a fetch → clip → translate → convert → publish
  pipeline. Run --clip-only before translation so the translator never sees
  the mailing header or trailer, then run the full conversion on the
  translated HTML. Both stages accept the same flags.

ENVIRONMENT VARIABLES:
  MAIL2ARTICLE_OUTPUT        Default output file
  MAIL2ARTICLE_ASSETS_DIR    Directory for relocated images
  MAIL2ARTICLE_BANNER        Masthead image path
  MAIL2ARTICLE_TITLE_PREFIX  Title template for --meta ({date} placeholder)
"#;

/// Restructure table-layout newsletter emails into clean article HTML.
#[derive(Parser, Debug)]
#[command(
    name = "mail2article",
    version,
    about = "Restructure table-layout newsletter emails into clean article HTML",
    long_about = "Restructure a table-layout newsletter email into clean article HTML for \
republishing. Clips the mailing header and trailer, classifies each top-level row by its \
lead cell's background colour, re-emits every section with inline mobile-template styles, \
and rehosts referenced images through a pluggable uploader.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Newsletter HTML file, or `-` for stdin.
    input: String,

    /// Write article HTML to this file instead of stdout.
    #[arg(short, long, env = "MAIL2ARTICLE_OUTPUT")]
    output: Option<PathBuf>,

    /// Copy referenced images into this directory (without it, images are
    /// dropped from the output).
    #[arg(long, env = "MAIL2ARTICLE_ASSETS_DIR")]
    assets_dir: Option<PathBuf>,

    /// Masthead image to relocate and place before the first section.
    #[arg(long, env = "MAIL2ARTICLE_BANNER")]
    banner: Option<PathBuf>,

    /// Treat the input as URL-safe base64 (the Gmail API body format).
    #[arg(long)]
    base64: bool,

    /// Stop after clipping and greeting cleanup, emitting the clipped HTML.
    #[arg(long)]
    clip_only: bool,

    /// Text landmark marking the start of editorial content.
    #[arg(long)]
    content_anchor: Option<String>,

    /// Text landmark marking the start of the trailer boilerplate.
    #[arg(long)]
    trailer_anchor: Option<String>,

    /// Render generic blocks without the bordered card.
    #[arg(long)]
    no_border: bool,

    /// Output structured JSON (ConversionOutput) instead of HTML.
    #[arg(long)]
    json: bool,

    /// Print draft metadata JSON (title / digest / cover) to stdout.
    #[arg(long)]
    meta: bool,

    /// Title template applied by --meta; `{date}` renders as M月D日.
    #[arg(long, env = "MAIL2ARTICLE_TITLE_PREFIX", default_value = "【{date}AI早报】")]
    title_prefix: String,

    /// Per-image upload timeout in seconds.
    #[arg(long, default_value_t = 60)]
    upload_timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MAIL2ARTICLE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MAIL2ARTICLE_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Read input ───────────────────────────────────────────────────────
    let html = read_input(&cli).await?;
    let config = build_config(&cli)?;

    // ── Clip-only mode ───────────────────────────────────────────────────
    if cli.clip_only {
        let clipped = clean_greeting(&clip(&html, &config));
        match cli.output {
            Some(ref path) => {
                write_file(path, &clipped).await?;
                if !cli.quiet {
                    eprintln!(
                        "{}  clipped {} → {} bytes  →  {}",
                        green("✔"),
                        html.len(),
                        clipped.len(),
                        bold(&path.display().to_string()),
                    );
                }
            }
            None => print_stdout(&clipped)?,
        }
        return Ok(());
    }

    // ── Run conversion ───────────────────────────────────────────────────
    let mut converter = match cli.assets_dir {
        Some(ref dir) => {
            let uploader = LocalAssetUploader::new(dir).with_timeout(cli.upload_timeout);
            Converter::with_uploader(config, Arc::new(uploader))
        }
        None => Converter::new(config),
    };

    let output = converter.convert(&html).await;

    if output.passthrough && !cli.quiet {
        eprintln!(
            "{} Input not recognised as a newsletter; passed through unchanged",
            cyan("⚠")
        );
    }

    // ── Emit results ─────────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        write_file(output_path, &output.html).await?;
        if !cli.quiet {
            eprintln!(
                "{}  {} sections from {} rows  {}ms  →  {}",
                if output.stats.upload_failures == 0 {
                    green("✔")
                } else {
                    cyan("⚠")
                },
                output.stats.sections_rendered,
                output.stats.rows_seen,
                output.stats.duration_ms,
                bold(&output_path.display().to_string()),
            );
            if output.stats.upload_failures > 0 {
                eprintln!(
                    "   {} of {} image uploads failed",
                    output.stats.upload_failures,
                    output.stats.upload_failures + output.stats.images_uploaded,
                );
            }
        }
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if cli.meta {
        let mut meta = article_meta(&output.html);
        meta.title = dated_title(&meta.title, &cli.title_prefix, beijing_now());
        let json = serde_json::to_string_pretty(&meta).context("Failed to serialise metadata")?;
        println!("{json}");
    } else if cli.output.is_none() {
        print_stdout(&output.html)?;
        if !cli.quiet {
            eprintln!(
                "   {} sections from {} rows  /  {} images  —  {}ms",
                dim(&output.stats.sections_rendered.to_string()),
                dim(&output.stats.rows_seen.to_string()),
                dim(&output.stats.images_uploaded.to_string()),
                output.stats.duration_ms,
            );
        }
    }

    Ok(())
}

/// Read the newsletter HTML from a file or stdin, decoding base64 if asked.
async fn read_input(cli: &Cli) -> Result<String> {
    let raw = if cli.input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(&cli.input)
            .await
            .with_context(|| format!("Failed to read {}", cli.input))?
    };

    if cli.base64 {
        decode_gmail_body(&raw)
    } else {
        Ok(raw)
    }
}

/// Gmail delivers message bodies as URL-safe base64, sometimes unpadded.
fn decode_gmail_body(data: &str) -> Result<String> {
    let compact: String = data.split_whitespace().collect();
    let bytes = URL_SAFE
        .decode(compact.as_bytes())
        .or_else(|_| URL_SAFE_NO_PAD.decode(compact.as_bytes()))
        .context("Input is not valid URL-safe base64")?;
    String::from_utf8(bytes).context("Decoded input is not UTF-8")
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder();

    if let Some(ref anchor) = cli.content_anchor {
        builder = builder.content_anchor(anchor.clone());
    }
    if let Some(ref anchor) = cli.trailer_anchor {
        builder = builder.trailer_anchor(anchor.clone());
    }
    if let Some(ref banner) = cli.banner {
        builder = builder.banner_path(banner.clone());
    }
    if cli.no_border {
        builder = builder.border_generic_blocks(false);
    }

    builder.build().context("Invalid configuration")
}

async fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Write to stdout with exactly one trailing newline.
fn print_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle.write_all(b"\n").ok();
    }
    Ok(())
}
