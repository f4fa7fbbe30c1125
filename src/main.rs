use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use player_stats::api::routes::ranking::{RankingResponse, SummaryResponse};
use player_stats::api::{build_router, cors_layer, state::AppState};
use player_stats::calculate::{aggregate_totals, top_n_from_i64};
use player_stats::config::AppConfig;
use player_stats::models::{parse_modes, Counter, Dataset, Field, Formula};
use player_stats::storage;
use player_stats::StatsError;

#[derive(Parser)]
#[command(name = "player-stats")]
#[command(about = "Rank players and aggregate per-mode statistics from a CSV export")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// CSV data file (overrides the configured path)
    #[arg(long)]
    data: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the Top-N players
    Rank {
        /// Number of players to keep
        #[arg(long, allow_hyphen_values = true)]
        top_n: Option<i64>,

        /// Column to rank by (e.g. "Solo minutesPlayed")
        #[arg(long)]
        sort_key: Option<String>,

        /// Derived metric (e.g. "wins_per_hour", "kills_per_match:squad")
        #[arg(long)]
        metric: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print per-mode totals over the Top-N players
    Totals {
        #[arg(long, allow_hyphen_values = true)]
        top_n: Option<i64>,

        #[arg(long)]
        sort_key: Option<String>,

        /// Counter to sum (kills, top1, minutesPlayed, ...)
        #[arg(long)]
        counter: Option<String>,

        /// Comma-separated modes (e.g. "solo,duo")
        #[arg(long)]
        modes: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Print headline figures for the Top-N players
    Summary {
        #[arg(long, allow_hyphen_values = true)]
        top_n: Option<i64>,

        #[arg(long)]
        sort_key: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// List the recognised columns of the data source
    Columns,

    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },
}

fn load_config(path: &str) -> Result<Option<AppConfig>> {
    let path = PathBuf::from(path);
    if !path.exists() {
        return Ok(None);
    }
    let config = AppConfig::from_file(&path)
        .with_context(|| format!("Failed to load config {}", path.display()))?;
    Ok(Some(config))
}

fn load_dataset(config: &AppConfig) -> Result<Dataset> {
    storage::load(&config.data_path, &config.ranking.load_options())
        .with_context(|| format!("Failed to load data from {}", config.data_path.display()))
}

/// Request parameters with configured fallbacks.
fn resolve_rank(
    config: &AppConfig,
    top_n: Option<i64>,
    sort_key: Option<&str>,
) -> Result<(Field, usize), StatsError> {
    let sort_key = match sort_key {
        Some(s) => s.parse()?,
        None => config.ranking.sort_key,
    };
    let top_n = match top_n {
        Some(n) => top_n_from_i64(n)?,
        None => config.ranking.default_top_n,
    };
    Ok((sort_key, top_n))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{:.0}", v),
        Some(v) => format!("{:.3}", v),
        None => "-".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_config = load_config(&cli.config)?;
    let config_found = file_config.is_some();
    let mut config = file_config.unwrap_or_default();
    if let Some(data) = &cli.data {
        config.data_path = PathBuf::from(data);
    }
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting player-stats v{}", env!("CARGO_PKG_VERSION"));
    if !config_found {
        tracing::debug!("No config file at {}, using defaults", cli.config);
    }

    let dataset = load_dataset(&config)?;

    match cli.command {
        Commands::Rank {
            top_n,
            sort_key,
            metric,
            json,
        } => {
            let (sort_key, top_n) = resolve_rank(&config, top_n, sort_key.as_deref())?;
            let metric = match metric.as_deref() {
                Some(s) => s.parse::<Formula>()?,
                None => config.ranking.metric,
            };
            let view = dataset.rank(sort_key, top_n)?;
            let response = RankingResponse::build(&view, metric, dataset.schema(), dataset.len())?;
            for field in &response.skipped {
                tracing::warn!("Skipping {}: column '{}' not in data source", metric, field);
            }

            if json {
                return print_json(&response);
            }

            println!(
                "{:>5}  {:<24} {:>20} {:>22}",
                "Rank",
                "Player",
                sort_key.to_string(),
                metric.to_string()
            );
            for row in &response.players {
                println!(
                    "{:>5}  {:<24} {:>20} {:>22}",
                    row.rank,
                    row.player,
                    format_value(row.values.get(&sort_key).copied()),
                    format_value(row.metric)
                );
            }
        }
        Commands::Totals {
            top_n,
            sort_key,
            counter,
            modes,
            json,
        } => {
            let (sort_key, top_n) = resolve_rank(&config, top_n, sort_key.as_deref())?;
            let counter = match counter.as_deref() {
                Some(s) => s.parse::<Counter>()?,
                None => config.ranking.totals_counter,
            };
            let modes = match modes.as_deref() {
                Some(s) => parse_modes(s)?,
                None => config.ranking.modes.clone(),
            };
            let view = dataset.rank(sort_key, top_n)?;
            let totals = aggregate_totals(view.records(), counter, &modes, dataset.schema());

            if json {
                return print_json(&totals);
            }

            println!("=== {} by mode (Top {}) ===", counter, view.len());
            let shares = totals.shares();
            for (mode, total) in &totals.totals {
                println!(
                    "{:<8} {:>12} {:>7.1}%",
                    mode,
                    format_value(Some(*total)),
                    shares.get(mode).copied().unwrap_or_default() * 100.0
                );
            }
            println!("{:<8} {:>12}", "Total", format_value(Some(totals.grand_total)));
            if !totals.omitted.is_empty() {
                let omitted: Vec<String> = totals.omitted.iter().map(|m| m.to_string()).collect();
                println!("\nNot tracked in this data source: {}", omitted.join(", "));
            }
        }
        Commands::Summary {
            top_n,
            sort_key,
            json,
        } => {
            let (sort_key, top_n) = resolve_rank(&config, top_n, sort_key.as_deref())?;
            let view = dataset.rank(sort_key, top_n)?;
            let summary = SummaryResponse::build(&view, config.ranking.kpi_mode, dataset.schema());

            if json {
                return print_json(&summary);
            }

            let kpis = &summary.kpis;
            println!("=== Summary (Top {} by {}) ===", view.len(), sort_key);
            println!("Average minutes:  {}", format_value(kpis.average_minutes));
            println!("Total wins:       {}", format_value(kpis.total_wins));
            println!("Total kills:      {}", format_value(kpis.total_kills));
            println!("Mean {}: {}", sort_key, format_value(summary.sort_key_summary.mean));
            for field in &kpis.skipped {
                println!("  ({} not in data source)", field);
            }
        }
        Commands::Columns => {
            println!("{} players", dataset.len());
            for field in dataset.schema().fields() {
                println!("  {}", field);
            }
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let cors = cors_layer(&config.server.cors_origin);

            let state = AppState::new(dataset, config.ranking.clone());
            let app = build_router(state).layer(cors);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Dashboard API: http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use player_stats::models::Mode;

    #[test]
    fn test_cli_parses_rank() {
        let cli = Cli::try_parse_from([
            "player-stats",
            "--data",
            "stats.csv",
            "rank",
            "--top-n",
            "20",
            "--sort-key",
            "Squad kills",
        ])
        .unwrap();

        assert_eq!(cli.data.as_deref(), Some("stats.csv"));
        match cli.command {
            Commands::Rank { top_n, sort_key, .. } => {
                assert_eq!(top_n, Some(20));
                assert_eq!(sort_key.as_deref(), Some("Squad kills"));
            }
            _ => panic!("expected rank command"),
        }
    }

    #[test]
    fn test_cli_accepts_negative_top_n_for_validation() {
        let cli = Cli::try_parse_from(["player-stats", "summary", "--top-n", "-5"]).unwrap();
        let Commands::Summary { top_n, .. } = cli.command else {
            panic!("expected summary command");
        };
        let err = resolve_rank(&AppConfig::default(), top_n, None).unwrap_err();
        assert!(matches!(err, StatsError::InvalidParameter { .. }));
    }

    #[test]
    fn test_resolve_rank_defaults() {
        let (key, n) = resolve_rank(&AppConfig::default(), None, None).unwrap();
        assert_eq!(key, Field::default());
        assert_eq!(n, 50);
    }

    fn sample_dataset() -> Dataset {
        let csv = "\
Player,Solo minutesPlayed,Solo top1,Solo kills
A,600,3,10
B,0,0,2
";
        storage::load_from_reader(csv.as_bytes(), &storage::LoadOptions::default()).unwrap()
    }

    #[test]
    fn test_rank_json_carries_metric_per_row() {
        let dataset = sample_dataset();
        let view = dataset.rank(Field::default(), 10).unwrap();
        let response = RankingResponse::build(
            &view,
            "wins_per_hour".parse().unwrap(),
            dataset.schema(),
            dataset.len(),
        )
        .unwrap();
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["players"][0]["player"], "A");
        assert_eq!(json["players"][0]["rank"], 1);
        assert_eq!(json["players"][0]["metric"], 0.3);
        assert!(json["players"][1]["metric"].is_null());
        assert_eq!(json["players"][0]["values"]["Solo kills"], 10.0);
        assert!(json["skipped"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_rank_json_lists_skipped_metric() {
        let dataset = sample_dataset();
        let view = dataset.rank(Field::default(), 10).unwrap();
        let response = RankingResponse::build(
            &view,
            "kills_per_match".parse().unwrap(),
            dataset.schema(),
            dataset.len(),
        )
        .unwrap();
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["skipped"][0], "Solo matches");
        assert!(json["players"][0]["metric"].is_null());
    }

    #[test]
    fn test_summary_json_includes_sort_key_mean() {
        let dataset = sample_dataset();
        let view = dataset.rank(Field::default(), 10).unwrap();
        let summary = SummaryResponse::build(&view, Mode::Solo, dataset.schema());
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["kpis"]["total_wins"], 3.0);
        assert_eq!(json["sort_key_summary"]["mean"], 300.0);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Some(42.0)), "42");
        assert_eq!(format_value(Some(0.3)), "0.300");
        assert_eq!(format_value(None), "-");
    }
}
