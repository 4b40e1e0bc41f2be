// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::str::FromStr;
use travelgeo_core::config::Settings;
use travelgeo_core::country::{incompatible_power_plugs, incompatible_power_sockets};
use travelgeo_core::duration::parse_iso8601_duration;
use travelgeo_core::postprocess::{complete_leg, AirportRef, FlightLeg};
use travelgeo_core::{
    CountryId, Database, IataCode, IbnrStationId, PowerPlugTypes, SncfStationId, UicStationId,
};
use travelgeo_text::{normalize, tokenize, transliterate};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file (JSON)
    #[arg(short, long, env = "TRAVELGEO_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show an airport by IATA code
    Airport { code: String },
    /// Resolve free-text airport names to candidate codes
    Resolve {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Timezone at a coordinate, optionally reconciled with a country
    Timezone {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
        #[arg(long)]
        country: Option<String>,
    },
    /// Show a country by ISO 3166-1 alpha-2 code
    Country { code: String },
    /// Show a railway station by one of its identifiers
    Station {
        #[arg(long, conflicts_with_all = ["uic", "sncf"])]
        ibnr: Option<String>,
        #[arg(long, conflicts_with = "sncf")]
        uic: Option<String>,
        #[arg(long)]
        sncf: Option<String>,
    },
    /// Resolve both ends of a flight and prune them using the duration
    Leg {
        /// ISO 8601 duration, e.g. PT1H25M
        #[arg(long)]
        duration: Option<String>,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// Show the fragments a name is split into
    Tokenize { name: String },
    /// Plugs and sockets that won't fit when travelling between two countries
    Plugs { from: String, to: String },
    /// Show the settings in effect
    Config {
        /// Write them to the config file if there is none yet
        #[arg(long)]
        init: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = std::env::var("TRAVELGEO_LOG")
        .ok()
        .and_then(|v| LevelFilter::from_str(&v).ok())
        .unwrap_or(match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        });
    // a second init only fails if a logger is already set
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);
}

fn parse_country(code: &str) -> Result<CountryId> {
    CountryId::parse(&code.to_uppercase())
        .with_context(|| format!("'{}' is not a two letter country code", code))
}

fn format_codes(codes: &[IataCode]) -> String {
    if codes.is_empty() {
        return "(none)".to_string();
    }
    codes
        .iter()
        .map(IataCode::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_plugs(plugs: PowerPlugTypes) -> String {
    if plugs.is_empty() {
        "none".to_string()
    } else {
        plugs.to_string()
    }
}

fn format_tz(tz: Option<chrono_tz::Tz>) -> String {
    tz.map(|tz| tz.name().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn print_endpoint(label: &str, airport: &AirportRef) {
    println!(
        "{}: {} iata={} country={} timezone={}",
        label,
        airport.name,
        airport.iata.map(|c| c.to_string()).unwrap_or_else(|| "?".into()),
        airport.country.map(|c| c.to_string()).unwrap_or_else(|| "?".into()),
        format_tz(airport.timezone)
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::load_or_default(cli.config.as_deref())
        .context("Failed to load settings")?;
    log::debug!("settings loaded: leg={:?}", settings.leg);
    let db = Database::global();

    match &cli.command {
        Commands::Airport { code } => {
            let Some(iata) = IataCode::parse(&code.to_uppercase()) else {
                bail!("'{}' is not a three letter IATA code", code);
            };
            match db.airport_for(iata) {
                Some(airport) => {
                    println!("{} / {}  {}", airport.iata, airport.icao, airport.name);
                    println!("  country:  {}", airport.country);
                    println!(
                        "  position: {:.4}, {:.4}",
                        airport.coordinate.latitude, airport.coordinate.longitude
                    );
                    println!("  timezone: {}", format_tz(db.timezone_for_airport(iata)));
                }
                None => println!("No airport with code {}", iata),
            }
        }
        Commands::Resolve { names } => {
            let results = db.resolve_all(names);
            for (name, codes) in names.iter().zip(results) {
                println!("{}: {}", name, format_codes(&codes));
            }
        }
        Commands::Timezone {
            latitude,
            longitude,
            country,
        } => {
            let lookup = db.timezone_for(*latitude, *longitude);
            println!(
                "cell: {}{}",
                format_tz(lookup.timezone),
                if lookup.ambiguous { " (ambiguous)" } else { "" }
            );
            if let Some(code) = country {
                let id = parse_country(code)?;
                println!(
                    "reconciled for {}: {}",
                    id,
                    format_tz(db.resolve_timezone(*latitude, *longitude, id))
                );
            } else if let Some(id) = db.country_for_coordinate(*latitude, *longitude) {
                println!("country: {}", id);
            }
        }
        Commands::Country { code } => {
            let id = parse_country(code)?;
            match db.country_for(id) {
                Some(country) => {
                    println!("{}", country.id);
                    println!("  driving side: {}", country.driving_side);
                    println!("  power plugs:  {}", format_plugs(country.power_plugs));
                    println!("  timezone:     {}", format_tz(country.timezone));
                    let zones: Vec<&str> = db
                        .timezones_for_country(id)
                        .into_iter()
                        .map(|tz| tz.name())
                        .collect();
                    println!("  zones:        {}", zones.join(", "));
                }
                None => println!("No country with code {}", id),
            }
        }
        Commands::Station { ibnr, uic, sncf } => {
            let station = match (ibnr, uic, sncf) {
                (Some(n), _, _) => IbnrStationId::parse(n).map(|id| db.station_for_ibnr(id)),
                (_, Some(n), _) => UicStationId::parse(n).map(|id| db.station_for_uic(id)),
                (_, _, Some(id)) => {
                    SncfStationId::parse(&id.to_uppercase()).map(|id| db.station_for_sncf(id))
                }
                _ => bail!("one of --ibnr, --uic or --sncf is required"),
            };
            let Some(station) = station else {
                bail!("malformed station identifier");
            };
            match station {
                Some(station) => {
                    println!("{} ({})", station.name, station.country);
                    if let Some(id) = station.ibnr {
                        println!("  IBNR: {}", id);
                    }
                    if let Some(id) = station.uic {
                        println!("  UIC:  {}", id);
                    }
                    if let Some(id) = station.sncf {
                        println!("  SNCF: {}", id);
                    }
                    println!("  timezone: {}", format_tz(station.timezone()));
                }
                None => println!("No station found"),
            }
        }
        Commands::Leg { duration, from, to } => {
            let duration = duration
                .as_deref()
                .map(parse_iso8601_duration)
                .transpose()
                .context("Invalid --duration")?;
            let mut departures = db.resolve(from);
            let mut arrivals = db.resolve(to);
            println!("from: {}", format_codes(&departures));
            println!("to:   {}", format_codes(&arrivals));
            if let Some(secs) = duration.map(|d| d.num_seconds()).filter(|s| *s > 0) {
                db.prune_leg(&settings.leg, secs, &departures, &mut arrivals);
                db.prune_leg(&settings.leg, secs, &arrivals, &mut departures);
                println!("pruned from: {}", format_codes(&departures));
                println!("pruned to:   {}", format_codes(&arrivals));
            }

            let mut leg = FlightLeg {
                departure: AirportRef::named(from.as_str()),
                arrival: AirportRef::named(to.as_str()),
                duration,
            };
            complete_leg(db, &settings.leg, &mut leg);
            print_endpoint("departure", &leg.departure);
            print_endpoint("arrival", &leg.arrival);
        }
        Commands::Tokenize { name } => {
            for fragment in tokenize(name) {
                let norm = normalize(fragment);
                println!("{}\t{}\t{}", fragment, norm, transliterate(&norm));
            }
        }
        Commands::Plugs { from, to } => {
            let (from_id, to_id) = (parse_country(from)?, parse_country(to)?);
            let (Some(home), Some(abroad)) = (db.country_for(from_id), db.country_for(to_id)) else {
                println!("Unknown country");
                return Ok(());
            };
            println!(
                "plugs that won't fit:   {}",
                format_plugs(incompatible_power_plugs(home.power_plugs, abroad.power_plugs))
            );
            println!(
                "sockets you can't use:  {}",
                format_plugs(incompatible_power_sockets(home.power_plugs, abroad.power_plugs))
            );
        }
        Commands::Config { init } => {
            let path = cli.config.clone().unwrap_or_else(Settings::default_path);
            if *init {
                if path.exists() {
                    println!("{} already exists", path.display());
                } else {
                    settings
                        .save(&path)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Wrote {}", path.display());
                }
            }
            println!("config: {}", path.display());
            println!("  leg.min_speed_kmh: {}", settings.leg.min_speed_kmh);
            println!("  leg.max_speed_kmh: {}", settings.leg.max_speed_kmh);
            println!("  leg.short_hop_secs: {}", settings.leg.short_hop_secs);
        }
    }

    Ok(())
}
