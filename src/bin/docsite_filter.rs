//! Command-line front end for search-hit classification and filtering.
//!
//! Reads hits from stdin, one per line, either as JSON objects with at
//! least a `url` field or as bare URLs, and writes newline-delimited JSON to
//! stdout. All tracing output goes to stderr so stdout stays machine-readable.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use docsite::diagram::{ChartLoader, DiagramFallback};
use docsite::search_bar::FILTER_TITLE;
use docsite::{
    ColorMode, DiagramView, SearchBarState, SearchHit, Selection, SiteConfig, filter_buttons,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Classify and filter documentation search hits by content type.
#[derive(Parser)]
#[command(name = "docsite-filter", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Tag every hit with its content type.
    Classify,

    /// Keep only hits of one content type (empty = all).
    Filter {
        /// Selector value, e.g. `cms`, `cloud`, `api`.
        #[arg(short = 't', long = "type", default_value = "")]
        content_type: String,
    },

    /// List the filter buttons.
    Buttons,

    /// Load a chart source and print the diagram view.
    Diagram {
        /// Chart source (URL or file path).
        #[arg(long)]
        chart: String,
        /// Fallback image for light mode.
        #[arg(long)]
        image: String,
        /// Fallback image for dark mode.
        #[arg(long)]
        dark_image: Option<String>,
        /// Colour mode: `light` or `dark`.
        #[arg(long, default_value = "light")]
        mode: ColorMode,
        /// File holding the rendered container markup. When given, it is
        /// re-read until the chart renders, fails, or the render timeout
        /// elapses.
        #[arg(long)]
        rendered: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docsite=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Classify => run_filter(&config, Selection::All).await,
        Command::Filter { content_type } => {
            run_filter(&config, Selection::parse(&content_type)).await
        }
        Command::Buttons => write_buttons(&mut std::io::stdout().lock()),
        Command::Diagram {
            chart,
            image,
            dark_image,
            mode,
            rendered,
        } => {
            let mut diagram = DiagramFallback::new(chart, image);
            diagram.fallback_image_dark = dark_image;
            let view = diagram_view(&config, &diagram, mode, rendered).await?;
            println!("{}", serde_json::to_string_pretty(&view)?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<SiteConfig> {
    if let Some(path) = path {
        return Ok(SiteConfig::from_file(path)?);
    }
    let default_path = SiteConfig::default_config_path();
    if default_path.exists() {
        info!(path = %default_path.display(), "using default config file");
        return Ok(SiteConfig::from_file(&default_path)?);
    }
    Ok(SiteConfig::default())
}

async fn run_filter(config: &SiteConfig, selection: Selection) -> anyhow::Result<()> {
    let mut hits = Vec::new();
    for line in std::io::stdin().lock().lines() {
        if let Some(hit) = parse_hit_line(&line?)? {
            hits.push(hit);
        }
    }

    let mut state = SearchBarState::new(config.search.rule_set()?);
    state.store_results(hits);
    let view = state
        .select_settled(selection, config.search.settle_delay())
        .await;
    info!(
        visible = view.visible_count(),
        total = view.total,
        "filtered search hits"
    );

    let mut out = std::io::stdout().lock();
    for result in &view.visible {
        serde_json::to_writer(&mut out, result)?;
        out.write_all(b"\n")?;
    }
    if let Some(empty) = &view.empty_state {
        eprintln!("{}", empty.heading);
    }
    Ok(())
}

/// Parse one input line: a JSON hit, a bare URL, or blank (skipped).
fn parse_hit_line(line: &str) -> anyhow::Result<Option<SearchHit>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.starts_with('{') {
        let hit: SearchHit = serde_json::from_str(trimmed)
            .map_err(|e| anyhow::anyhow!("invalid hit JSON `{trimmed}`: {e}"))?;
        return Ok(Some(hit));
    }
    Ok(Some(SearchHit::from_url(trimmed)))
}

fn write_buttons(out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "{FILTER_TITLE}")?;
    for button in filter_buttons() {
        writeln!(out, "{:<14} {}", button.value(), button.text())?;
    }
    Ok(())
}

/// Load the chart and, when `rendered` is given, wait for the render
/// outcome recorded in that file.
async fn diagram_view(
    config: &SiteConfig,
    diagram: &DiagramFallback,
    mode: ColorMode,
    rendered: Option<PathBuf>,
) -> anyhow::Result<DiagramView> {
    let loader = ChartLoader::from_config(&config.diagram)?;
    let view = match rendered {
        Some(path) => {
            let read_markup = || std::fs::read_to_string(&path).ok();
            diagram
                .resolve(&loader, mode, read_markup, config.diagram.poll_options())
                .await
        }
        None => diagram.load(&loader, mode).await,
    };
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_skipped() {
        assert!(parse_hit_line("   ").expect("ok").is_none());
    }

    #[test]
    fn bare_url_line() {
        let hit = parse_hit_line(" /docs/cms/pages \n").expect("ok").expect("hit");
        assert_eq!(hit.url, "/docs/cms/pages");
    }

    #[test]
    fn json_line() {
        let hit = parse_hit_line(r#"{"url":"/docs/api/auth","title":"Auth"}"#)
            .expect("ok")
            .expect("hit");
        assert_eq!(hit.url, "/docs/api/auth");
        assert_eq!(hit.title, "Auth");
    }

    #[test]
    fn invalid_json_line_errors() {
        assert!(parse_hit_line("{not json").is_err());
    }

    #[test]
    fn cli_parses_filter_type() {
        let cli =
            Cli::try_parse_from(["docsite-filter", "filter", "--type", "cloud"]).expect("parse");
        match cli.command {
            Command::Filter { content_type } => assert_eq!(content_type, "cloud"),
            _ => panic!("expected filter command"),
        }
    }

    #[test]
    fn cli_parses_diagram_mode() {
        let cli = Cli::try_parse_from([
            "docsite-filter",
            "diagram",
            "--chart",
            "a.mmd",
            "--image",
            "a.png",
            "--mode",
            "dark",
        ])
        .expect("parse");
        match cli.command {
            Command::Diagram { mode, rendered, .. } => {
                assert_eq!(mode, ColorMode::Dark);
                assert!(rendered.is_none());
            }
            _ => panic!("expected diagram command"),
        }
    }

    #[test]
    fn cli_parses_rendered_markup_path() {
        let cli = Cli::try_parse_from([
            "docsite-filter",
            "diagram",
            "--chart",
            "a.mmd",
            "--image",
            "a.png",
            "--rendered",
            "out.html",
        ])
        .expect("parse");
        match cli.command {
            Command::Diagram { rendered, .. } => {
                assert_eq!(rendered, Some(PathBuf::from("out.html")));
            }
            _ => panic!("expected diagram command"),
        }
    }

    #[test]
    fn buttons_listed_under_filter_title() {
        let mut out = Vec::new();
        write_buttons(&mut out).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("FILTER BY CONTENT TYPE:"));
        assert!(lines.next().expect("all button").ends_with("All content"));
        assert_eq!(text.lines().count(), 8);
    }

    fn chart_fixture(dir: &std::path::Path) -> DiagramFallback {
        let chart = dir.join("flow.mmd");
        std::fs::write(&chart, "graph TD; A-->B").expect("write chart");
        DiagramFallback::new(chart.display().to_string(), "flow.png")
    }

    #[tokio::test]
    async fn diagram_keeps_chart_once_rendered_markup_has_svg() {
        let dir = tempfile::tempdir().expect("tempdir");
        let diagram = chart_fixture(dir.path());
        let rendered = dir.path().join("rendered.html");
        std::fs::write(&rendered, "<div><svg></svg></div>").expect("write markup");

        let view = diagram_view(&SiteConfig::default(), &diagram, ColorMode::Light, Some(rendered))
            .await
            .expect("view");
        assert!(!view.is_fallback());
    }

    #[tokio::test]
    async fn diagram_falls_back_on_render_error_markup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let diagram = chart_fixture(dir.path());
        let rendered = dir.path().join("rendered.html");
        std::fs::write(&rendered, "<p>Syntax error in text</p>").expect("write markup");

        let view = diagram_view(&SiteConfig::default(), &diagram, ColorMode::Light, Some(rendered))
            .await
            .expect("view");
        assert!(view.is_fallback());
    }

    #[tokio::test]
    async fn diagram_without_rendered_markup_only_loads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let diagram = chart_fixture(dir.path());

        let view = diagram_view(&SiteConfig::default(), &diagram, ColorMode::Light, None)
            .await
            .expect("view");
        assert!(!view.is_fallback());
    }
}
