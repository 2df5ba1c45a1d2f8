//! moviex - search and browse OMDb titles from the terminal.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use moviex_api::omdb::{
    DetailParams, MediaType, OmdbClient, PlotLength, ReleaseYear, SearchFilters, SearchParams,
    available, imdb_title_url,
};
use moviex_search::{fetch_details, fetch_page};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, SearchConfig, resolve_config_path};

/// Environment variable holding the OMDb API key.
const API_KEY_ENV: &str = "OMDB_API_KEY";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Search OMDb titles and print one page of results.
    Search(SearchArgs),
    /// Print the full record of a single title.
    Details(DetailsArgs),
    /// Browse search results interactively via TUI.
    Browse(BrowseArgs),
    /// Show or update the config file.
    Config(ConfigCommand),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Title to search for (e.g. "Batman").
    #[arg(long, required = true)]
    query: String,
    /// Restrict to movie, series or episode (default: config, else all).
    #[arg(long = "type")]
    media_type: Option<MediaType>,
    /// Restrict to a four-digit release year (default: config, else all).
    #[arg(long)]
    year: Option<ReleaseYear>,
    /// Result page (10 results per page).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// IMDb identifier (e.g. "tt0372784").
    #[arg(long, required = true)]
    id: String,
    /// Plot length: short or full.
    #[arg(long, default_value = "full")]
    plot: PlotLength,
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Query to search for on startup.
    #[arg(long)]
    query: Option<String>,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the current settings.
    Show,
    /// Update settings and write the config file.
    Set(ConfigSetArgs),
}

/// Arguments for the `config set` subcommand.
#[derive(clap::Args)]
struct ConfigSetArgs {
    /// OMDb API key.
    #[arg(long)]
    api_key: Option<String>,
    /// OMDb base URL.
    #[arg(long)]
    base_url: Option<Url>,
    /// Default type filter.
    #[arg(long = "type")]
    media_type: Option<MediaType>,
    /// Default year filter.
    #[arg(long)]
    year: Option<ReleaseYear>,
    /// Remove the default filters.
    #[arg(long, conflicts_with_all = ["media_type", "year"])]
    clear_filters: bool,
}

/// Builds an `OmdbClient` from the environment and config.
///
/// `OMDB_API_KEY` wins over `omdb.api_key`; with neither the key is sent
/// empty and the API reports the problem on the first request.
///
/// # Errors
///
/// Returns an error if the configured base URL is invalid or the client
/// fails to build.
#[instrument(skip_all)]
fn build_omdb_client(config: &AppConfig) -> Result<OmdbClient> {
    let mut builder = OmdbClient::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));

    if let Some(key) = config.resolve_api_key(std::env::var(API_KEY_ENV).ok()) {
        builder = builder.api_key(key);
    }

    if let Some(base_url) = &config.omdb.base_url {
        let url = Url::parse(base_url)
            .with_context(|| format!("invalid omdb.base_url in config: {base_url}"))?;
        builder = builder.base_url(url);
    }

    builder.build().context("failed to build OMDb client")
}

/// Loads the config file from `dir` or the default location.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let path = resolve_config_path(dir)?;
    AppConfig::load(&path)
}

/// Returns the current local year.
///
/// # Errors
///
/// Returns an error if the clock reports a year outside `u16`.
fn current_year() -> Result<u16> {
    u16::try_from(chrono::Local::now().year()).context("system clock year is out of range")
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the search fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let defaults = config.search.filters();
    let filters = SearchFilters {
        media_type: args.media_type.or(defaults.media_type),
        year: args.year.or(defaults.year),
    };

    if args.query.trim().is_empty() {
        tracing::info!("Nothing to search: the query is blank.");
        return Ok(());
    }

    let client = build_omdb_client(&config)?;
    let params = SearchParams::new(args.query.trim())
        .page(args.page)
        .filters(filters);

    let page = fetch_page(&client, &params)
        .await
        .context("OMDb search failed")?;

    if page.results.is_empty() {
        tracing::info!("No results");
        return Ok(());
    }

    tracing::info!(
        "Showing {} of {} results (page {}/{})",
        page.results.len(),
        page.total_results,
        args.page,
        moviex_search::total_pages(page.total_results),
    );
    tracing::info!("IMDbID\t\tYear\t\tType\tTitle");
    for movie in &page.results {
        tracing::info!(
            "{}\t{}\t\t{}\t{}",
            movie.imdb_id,
            movie.year,
            movie.media_type,
            movie.title,
        );
    }

    Ok(())
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the lookup fails.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_omdb_client(&config)?;
    let params = DetailParams::new(args.id.trim()).plot(args.plot);

    let details = fetch_details(&client, &params)
        .await
        .with_context(|| format!("OMDb lookup of {} failed", args.id))?;

    tracing::info!("{} ({})", details.title, details.year);
    let fields = [
        ("IMDb ID", details.imdb_id.as_str()),
        ("Type", details.media_type.as_str()),
        ("Rated", details.rated.as_str()),
        ("Released", details.released.as_str()),
        ("Runtime", details.runtime.as_str()),
        ("Genre", details.genre.as_str()),
        ("Director", details.director.as_str()),
        ("Writer", details.writer.as_str()),
        ("Actors", details.actors.as_str()),
        ("Language", details.language.as_str()),
        ("Country", details.country.as_str()),
        ("Awards", details.awards.as_str()),
        ("IMDb Rating", details.imdb_rating.as_str()),
        ("IMDb Votes", details.imdb_votes.as_str()),
        ("Metascore", details.metascore.as_str()),
        ("Box Office", details.box_office.as_str()),
        ("Seasons", details.total_seasons.as_str()),
        ("Poster", details.poster.as_str()),
    ];
    for (label, value) in fields {
        if let Some(value) = available(value) {
            tracing::info!("{label}: {value}");
        }
    }
    for rating in &details.ratings {
        tracing::info!("Rating ({}): {}", rating.source, rating.value);
    }
    if let Some(plot) = available(&details.plot) {
        tracing::info!("---");
        tracing::info!("{plot}");
    }
    tracing::info!("IMDb: {}", imdb_title_url(&details.imdb_id));

    Ok(())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(args: BrowseArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_omdb_client(&config)?;
    let year = current_year()?;

    crate::tui::run_browser(client, config.search.filters(), args.query, year)
        .await
        .context("browser TUI failed")
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded.
#[instrument(skip_all)]
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    let config = AppConfig::load(&path)?;

    tracing::info!("Config file: {}", path.display());
    let key_state = match (&config.omdb.api_key, std::env::var(API_KEY_ENV).is_ok()) {
        (_, true) => format!("from {API_KEY_ENV}"),
        (Some(_), false) => String::from("set"),
        (None, false) => String::from("not set"),
    };
    tracing::info!("API key: {key_state}");
    tracing::info!(
        "Base URL: {}",
        config
            .omdb
            .base_url
            .as_deref()
            .unwrap_or(moviex_api::omdb::DEFAULT_BASE_URL)
    );
    tracing::info!(
        "Default filters: {}",
        crate::tui::filter_label(config.search.filters())
    );

    Ok(())
}

/// Runs the `config set` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or saved.
#[instrument(skip_all)]
fn run_config_set(args: ConfigSetArgs, dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    let mut config = AppConfig::load(&path)?;

    if let Some(key) = args.api_key {
        config.omdb.api_key = Some(key);
    }
    if let Some(url) = args.base_url {
        config.omdb.base_url = Some(url.to_string());
    }
    if args.clear_filters {
        config.search = SearchConfig::default();
    }
    if let Some(media_type) = args.media_type {
        config.search.media_type = Some(media_type);
    }
    if let Some(year) = args.year {
        config.search.year = Some(year);
    }

    config.save(&path)?;
    tracing::info!("Saved {}", path.display());

    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Search(args) => run_search(&args, dir).await,
        Commands::Details(args) => run_details(&args, dir).await,
        Commands::Browse(args) => run_browse(args, dir).await,
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Show => run_config_show(dir),
            ConfigSubcommands::Set(args) => run_config_set(args, dir),
        },
    }
}
