use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tidal_astro::{parse_iso8601, JulianDate};
use tidal_harmonics::{load_station, PredictionPoint, Units};

#[derive(Parser)]
#[command(name = "tides")]
#[command(about = "Harmonic tide prediction from local station data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict water levels or tide extrema for a station
    Predict {
        /// Station identifier; must match a <id>.json file in the data directory
        #[arg(long, short = 's')]
        station: String,
        /// Directory containing station data files
        #[arg(long, short = 'd', default_value = "./data")]
        data_dir: PathBuf,
        /// Vertical datum of the output (MTL, MLLW, MHHW, ...)
        #[arg(long, short = 'm', default_value = "MTL")]
        datum: String,
        /// Output units: m or ft
        #[arg(long, short = 'u', default_value = "m")]
        units: String,
        /// Sample spacing, e.g. 30s, 1m, 10m, 1h
        #[arg(long, short = 'i', default_value = "1m")]
        interval: String,
        /// Output the high/low sequence instead of dense levels
        #[arg(long, short = 'e')]
        extrema: bool,
        /// Absolute start, ISO 8601 (e.g. 2023-04-10T00:00:00Z)
        #[arg(long, conflicts_with = "since")]
        from: Option<String>,
        /// Absolute end, ISO 8601
        #[arg(long, conflicts_with = "until")]
        to: Option<String>,
        /// Start relative to now, a signed duration (e.g. -6h, 30m, 2d)
        #[arg(long)]
        since: Option<String>,
        /// End relative to now, a signed duration
        #[arg(long)]
        until: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Predict {
            station,
            data_dir,
            datum,
            units,
            interval,
            extrema,
            from,
            to,
            since,
            until,
        } => {
            let harmonics = load_station(&data_dir, &station)
                .with_context(|| format!("loading station {station}"))?;

            let units: Units = units
                .parse()
                .map_err(|_| anyhow::anyhow!("units must be 'm' or 'ft'"))?;
            let interval = parse_duration(&interval)?;

            let now = now_jd()?;
            let start = resolve_bound(&from, &since, now)?.unwrap_or(now);
            let mut end = resolve_bound(&to, &until, now)?.unwrap_or(start);

            if end.hours_since(&start) <= 0.0 {
                end = if extrema {
                    // a point request for extrema means "the next day"
                    start.add_hours(24.0)
                } else {
                    // emit a single sample for a point request
                    start.add_seconds(interval.as_secs_f64())
                };
            }

            let prediction = harmonics
                .range_prediction(start, end)
                .interval(interval)
                .datum(datum)
                .units(units);

            let results = if extrema {
                prediction.predict_extrema()?
            } else {
                prediction.predict()?
            };
            for point in &results {
                print_point(point, units);
            }
            Ok(())
        }
    }
}

fn print_point(point: &PredictionPoint, units: Units) {
    // half-second shift so truncation in the calendar display rounds
    let time = point.time.add_seconds(0.5).to_calendar();
    println!(
        "{}\t{}\t{:.4}{}",
        time,
        point.kind.code(),
        point.level,
        units.suffix()
    );
}

fn now_jd() -> anyhow::Result<JulianDate> {
    let unix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock before the unix epoch")?;
    Ok(JulianDate::from_unix_seconds(unix.as_secs_f64()))
}

/// An absolute ISO 8601 bound, or a signed duration relative to now.
fn resolve_bound(
    absolute: &Option<String>,
    relative: &Option<String>,
    now: JulianDate,
) -> anyhow::Result<Option<JulianDate>> {
    if let Some(s) = absolute {
        let jd = parse_iso8601(s).with_context(|| format!("cannot parse date '{s}'"))?;
        return Ok(Some(jd));
    }
    if let Some(s) = relative {
        let (sign, body) = match s.strip_prefix('-') {
            Some(rest) => (-1.0, rest),
            None => (1.0, s.strip_prefix('+').unwrap_or(s)),
        };
        let duration = parse_duration(body)?;
        return Ok(Some(now.add_seconds(sign * duration.as_secs_f64())));
    }
    Ok(None)
}

/// Parses durations of the form `30s`, `15m`, `2h`, `1d`.
fn parse_duration(s: &str) -> anyhow::Result<Duration> {
    let s = s.trim();
    let split = s.len() - s.chars().last().map_or(0, |c| c.len_utf8());
    let (number, suffix) = s.split_at(split);
    let value: f64 = number
        .parse()
        .map_err(|_| anyhow::anyhow!("cannot parse duration '{s}'"))?;
    let seconds = match suffix {
        "s" => value,
        "m" => value * 60.0,
        "h" => value * 3600.0,
        "d" => value * 86_400.0,
        _ => bail!("unknown duration suffix in '{s}', expected s/m/h/d"),
    };
    if !(seconds > 0.0) {
        bail!("duration must be positive: '{s}'");
    }
    Ok(Duration::from_secs_f64(seconds))
}
