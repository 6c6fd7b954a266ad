use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use magizh_panchangam::{
    Clock, DietaryPreference, DisplayPreferences, JsonFileSettingsStore, Location, Orchestrator, PanchangamApiClient,
    PanchangamDay, Phase, Provenance, SettingsStore, SystemClock, TimeFormat, TimeWindow, TimezoneDisplayMode, advisory,
    config::AppConfig, fallback, format_instant, format_range, format_remaining, resolver,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    #[value(name = "12h")]
    TwelveHour,
    #[value(name = "24h")]
    TwentyFourHour,
}

impl From<FormatArg> for TimeFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::TwelveHour => TimeFormat::TwelveHour,
            FormatArg::TwentyFourHour => TimeFormat::TwentyFourHour,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "magizh")]
#[command(about = "Tamil Panchangam for a date and city")]
struct Args {
    /// Date to show (YYYY-MM-DD), defaults to today at the location
    #[arg(long)]
    date: Option<NaiveDate>,

    /// City from the built-in catalog, defaults to the saved location
    #[arg(long)]
    city: Option<String>,

    /// Skip the remote service and use offline data
    #[arg(long)]
    offline: bool,

    /// Show dietary guidance for a vegetarian
    #[arg(long)]
    vegetarian: bool,

    /// Clock format
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Show times in this IANA zone instead of the location's
    #[arg(long)]
    device_tz: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
        .parse_lossy("magizh_panchangam=debug");

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let mut prefs = DisplayPreferences::from(&config.display);
    if let Some(format) = args.format {
        prefs.time_format = format.into();
    }
    if args.vegetarian {
        prefs.dietary_preference = DietaryPreference::Vegetarian;
    }
    let device_tz = match &args.device_tz {
        Some(raw) => {
            prefs.timezone_display = TimezoneDisplayMode::Device;
            Some(raw.parse::<Tz>().map_err(|_| anyhow::anyhow!("Unknown timezone '{raw}'"))?)
        }
        None => None,
    };

    let location = match &args.city {
        Some(city) => Location::find_popular(city).with_context(|| format!("Unknown city '{city}'"))?,
        None => saved_location(),
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let date = args.date.unwrap_or_else(|| clock.today_in(location.tz()));

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    let (day, provenance) = if args.offline {
        tracing::info!(%date, "Offline mode, synthesizing panchangam");
        let day = fallback::synthesize(date, &location).context("Failed to synthesize panchangam")?;
        (Arc::new(day), Provenance::Fallback)
    } else {
        rt.block_on(fetch(&config, clock.clone(), location, date))?
    };

    print_day(&day, provenance, prefs, device_tz, clock.now_utc());
    Ok(())
}

fn saved_location() -> Location {
    let store = match JsonFileSettingsStore::in_user_config_dir() {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!("No settings store available: {e:#}");
            return Location::chennai();
        }
    };
    if let Err(e) = store.verify() {
        tracing::warn!("Saved settings are unusable: {e:#}");
    }
    store.default_location().unwrap_or_else(|e| {
        tracing::warn!("Failed to read default location: {e:#}");
        Location::chennai()
    })
}

/// Resolve one day through the orchestrator.
async fn fetch(
    config: &AppConfig,
    clock: Arc<dyn Clock>,
    location: Location,
    date: NaiveDate,
) -> Result<(Arc<PanchangamDay>, Provenance)> {
    let client = PanchangamApiClient::new(&config.api, &config.network)?;
    tracing::info!(base_url = client.base_url(), "API client initialized");

    let orchestrator = Orchestrator::new(client, clock, location, config.orchestrator.clone());
    if orchestrator.select_date(date).is_none() {
        orchestrator.load();
    }

    let snapshot = orchestrator.settled().await;
    if let Some(error) = orchestrator.last_remote_error() {
        tracing::warn!("Remote almanac unavailable, showing offline data: {error}");
    }
    match (snapshot.phase, snapshot.day) {
        (Phase::Ready(provenance), Some(day)) => Ok((day, provenance)),
        _ => match snapshot.last_error {
            Some(error) => Err(error).context("Failed to resolve panchangam"),
            None => anyhow::bail!("No panchangam available for {date}"),
        },
    }
}

fn print_day(
    day: &PanchangamDay,
    provenance: Provenance,
    prefs: DisplayPreferences,
    device_tz: Option<Tz>,
    now: chrono::DateTime<Utc>,
) {
    let location_tz = day.location().tz();
    let zone = prefs.timezone_display.with_device(device_tz.unwrap_or(location_tz));
    let time = |instant| format_instant(instant, zone, location_tz, prefs.time_format);
    let range = |window: &TimeWindow| format_range(window, zone, location_tz, prefs.time_format);

    let source = match provenance {
        Provenance::Remote => "live",
        Provenance::Fallback => "offline",
    };
    println!(
        "{} - {} ({source})",
        day.date().format("%A, %-d %B %Y"),
        day.location().full_display_name()
    );
    println!("Tamil date: {} ({})", day.tamil_date().formatted(), day.vaaram().name());
    println!("Sunrise {}  Sunset {}", time(day.sunrise()), time(day.sunset()));
    if let Some(device) = device_tz {
        if prefs.timezone_display.is_converted(location_tz, device) {
            println!("Times shown in {device}");
        }
    }
    println!();

    let nakshatram = day.nakshatram();
    println!(
        "Nakshatram  {} until {} (lord {})",
        nakshatram.name().name(),
        time(nakshatram.end_time()),
        nakshatram.lord()
    );
    let thithi = day.thithi();
    println!("Thithi      {} until {}", thithi.full_name(), time(thithi.end_time()));
    let yogam = day.yogam();
    println!(
        "Yogam       {} ({}) {} - {}",
        yogam.name().name(),
        yogam.kind().label(),
        time(yogam.start_time()),
        time(yogam.end_time())
    );
    let karanam = day.karanam();
    println!("Karanam     {} until {}", karanam.name().name(), time(karanam.end_time()));
    println!();

    for window in day.auspicious_windows() {
        println!("Nalla Neram {}", range(window));
    }
    println!("Rahukaalam  {}", range(day.rahu_window()));
    println!("Yamagandam  {}", range(day.yama_window()));
    if let Some(kuligai) = day.kuligai_window() {
        println!("Kuligai     {}", range(kuligai));
    }
    for window in day.supplementary_windows() {
        println!("Gowri       {}", range(window));
    }

    if let Some(active) = resolver::resolve_active_window(day, now) {
        let label = active.window.kind().map_or("Window", |k| k.display_name());
        let left = resolver::remaining(active.window, now)
            .map(format_remaining)
            .unwrap_or_default();
        println!();
        println!("Now: {label} {left}");
    }

    let status = advisory::effective_status(day.dietary_status(), prefs.dietary_preference);
    println!();
    println!("Food: {} - {}", status.short_message(), status.reason());
    if let Some(next) = status.next_observance().or(day.upcoming_observance()) {
        println!("Next: {} ({})", next.name(), next.days_until_label());
    }
}
