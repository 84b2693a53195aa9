#[macro_use]
extern crate log;

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use dotenv::dotenv;
use prayerstats::{
    AladhanClient, GeocodingClient, Location, PrayerStats, ResultStore, StoredResults,
    api::API_BASE, export, geocode::GEOCODE_BASE, render::StatisticsReport,
};
use prayerstats_algos::{ChartSeries, PrayerAnalytics, TimeNormalizer, YearType};
use prayerstats_types::CalculationMethod;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
pub struct PrayerStatsCli {
    #[arg(env = "PRAYERSTATS_API_BASE", long, default_value = API_BASE)]
    pub api_base: String,
    #[arg(env = "PRAYERSTATS_GEOCODE_BASE", long, default_value = GEOCODE_BASE)]
    pub geocode_base: String,
    #[arg(env = "PRAYERSTATS_STATE_DIR", long, default_value = ".prayerstats")]
    pub state_dir: PathBuf,
    #[clap(subcommand)]
    pub subcommand: PrayerStatsCommand,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Calendar {
    #[default]
    Gregorian,
    Hijri,
}

impl From<Calendar> for YearType {
    fn from(value: Calendar) -> Self {
        match value {
            Calendar::Gregorian => YearType::Gregorian,
            Calendar::Hijri => YearType::Hijri,
        }
    }
}

#[derive(Subcommand)]
pub enum PrayerStatsCommand {
    ///
    /// Fetch a year of prayer times and print their statistics
    ///
    Calculate {
        #[arg(long, allow_negative_numbers = true, requires = "longitude")]
        latitude: Option<f64>,
        #[arg(long, allow_negative_numbers = true, requires = "latitude")]
        longitude: Option<f64>,
        /// Geocoded when no coordinates are given
        #[arg(long, conflicts_with = "latitude")]
        address: Option<String>,
        #[arg(long, env = "PRAYERSTATS_METHOD", default_value = "auto")]
        method: CalculationMethod,
        #[arg(long, value_enum, default_value_t)]
        calendar: Calendar,
        /// Defaults to the current year
        #[arg(long)]
        year: Option<String>,
        /// Recompute even when the request matches the stored one
        #[arg(long)]
        force: bool,
        /// Directory for the JSON export
        #[arg(long)]
        export: Option<PathBuf>,
        /// File for the chart series
        #[arg(long)]
        chart: Option<PathBuf>,
    },
    ///
    /// Print statistics for a calendar response saved on disk
    ///
    Analyze {
        file: PathBuf,
        #[arg(long)]
        chart: Option<PathBuf>,
    },
    ///
    /// Search for an address
    ///
    Geocode { query: String },
    ///
    /// Print the statistics of the last calculation
    ///
    Last {
        #[arg(long)]
        export: Option<PathBuf>,
    },
    ///
    /// List calculation methods
    ///
    Methods,
    ///
    /// Generate shell completions
    ///
    Completions { shell: Shell },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(error) = dotenv() {
        println!("{}", error);
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("reqwest", log::LevelFilter::Warn)
        .init();

    let cli = PrayerStatsCli::parse();

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        warn!("Received Ctrl-C, cancelling");
        handler_token.cancel();
    })?;

    let app = PrayerStats::new(
        AladhanClient::new(cli.api_base),
        GeocodingClient::new(cli.geocode_base)?,
        ResultStore::new(cli.state_dir),
        PrayerAnalytics::new(TimeNormalizer::new()),
    );

    match cli.subcommand {
        PrayerStatsCommand::Calculate {
            latitude,
            longitude,
            address,
            method,
            calendar,
            year,
            force,
            export: export_dir,
            chart,
        } => {
            let location = match (latitude, longitude, address) {
                (Some(latitude), Some(longitude), _) => Location::Coordinates {
                    latitude,
                    longitude,
                },
                (_, _, Some(address)) => Location::Address(address),
                _ => bail!("either --latitude and --longitude or --address is required"),
            };

            let calculation = app
                .calculate(location, calendar.into(), year, method, force, &cancel)
                .await?;

            print_results(&calculation.results);
            match (chart, calculation.chart) {
                (Some(path), Some(series)) => write_chart(&path, &series)?,
                (Some(_), None) => warn!("Stored results carry no chart series, use --force"),
                _ => {}
            }
            if let Some(dir) = export_dir {
                let path = export(&dir, &calculation.results)?;
                println!("Exported to {}", path.display());
            }
            Ok(())
        }
        PrayerStatsCommand::Analyze { file, chart } => {
            let report = app.analyze_file(&file)?;
            println!("{}", StatisticsReport(&report.statistics));
            if let Some(path) = chart {
                write_chart(&path, &report.chart)?;
            }
            Ok(())
        }
        PrayerStatsCommand::Geocode { query } => {
            let places = app.geocoder.search(&query, &cancel).await?;
            if places.is_empty() {
                println!("No results found for address: {}", query);
            }
            for place in places {
                println!("{:>10.4} {:>10.4}  {}", place.latitude, place.longitude, place.display_name);
            }
            Ok(())
        }
        PrayerStatsCommand::Last { export: export_dir } => {
            let Some(results) = app.store.load_last()? else {
                bail!("No stored results in {}", app.store.dir().display());
            };
            print_results(&results);
            if let Some(dir) = export_dir {
                let path = export(&dir, &results)?;
                println!("Exported to {}", path.display());
            }
            Ok(())
        }
        PrayerStatsCommand::Methods => {
            for method in CalculationMethod::all() {
                println!("{:>5}  {}", method.query_value(), method);
            }
            Ok(())
        }
        PrayerStatsCommand::Completions { shell } => {
            let mut command = PrayerStatsCli::command();
            generate(shell, &mut command, "prayerstats", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn print_results(results: &StoredResults) {
    let metadata = &results.metadata;
    if let Some(address) = &metadata.address {
        println!("{}", address);
    }
    println!(
        "Lat {:.4}, Long {:.4}, method {}, {} year {}\n",
        metadata.latitude,
        metadata.longitude,
        metadata.calculation_method,
        metadata.year_type,
        metadata.year
    );
    println!("{}", StatisticsReport(&results.statistics));
}

fn write_chart(path: &Path, series: &ChartSeries) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(series)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    info!("Chart series written to {}", path.display());
    Ok(())
}
