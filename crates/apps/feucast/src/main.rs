mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use session::{Command, Driver, Session, ViewEvent};
use simulation::{HttpSimulationService, SimulationParams};
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, load_perimeter};

#[derive(Parser, Debug)]
#[command(author, version, about = "FeuCast fire-spread client")]
struct Args {
    /// Simulation service base URL (env: FEUCAST_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Where downloads are written (env: FEUCAST_EXPORT_DIR)
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Per-request timeout in seconds (env: FEUCAST_HTTP_TIMEOUT_S)
    #[arg(long)]
    timeout_s: Option<f64>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Simulate spread from a perimeter and walk the resulting timeline
    Simulate {
        /// GeoJSON file holding the ignition perimeter
        #[arg(long)]
        perimeter: PathBuf,

        #[arg(long, default_value_t = 12)]
        hours: u32,

        /// Wind speed in m/s
        #[arg(long, default_value_t = 6.0)]
        wind_ms: f64,

        /// Direction the wind blows from, in degrees
        #[arg(long, default_value_t = 0.0)]
        wind_deg: f64,

        /// Base rate of spread in m/s
        #[arg(long, default_value_t = 0.02)]
        base_ros_ms: f64,

        #[arg(long, default_value_t = 0.05)]
        slope_tan: f64,

        #[arg(long)]
        accumulate: bool,

        /// Derive slope from the elevation model
        #[arg(long)]
        use_dem: bool,

        /// Use forecast wind instead of the fixed wind
        #[arg(long)]
        use_meteo: bool,

        /// Play the timeline from H+1 once the result is in
        #[arg(long)]
        play: bool,

        /// Playback speed factor (env: FEUCAST_PLAY_SPEED)
        #[arg(long)]
        speed: Option<f64>,

        /// Save the result as isochrones.geojson
        #[arg(long)]
        export_geojson: bool,

        /// Request a PDF report using this PNG as the map image
        #[arg(long)]
        report_snapshot: Option<PathBuf>,
    },

    /// Run the service's geometric self-tests
    Selftest,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = Config::from_env();
    if let Some(url) = args.api_url {
        config.api_url = url;
    }
    if let Some(dir) = args.export_dir {
        config.export_dir = dir;
    }
    if let Some(timeout_s) = args.timeout_s {
        config.http_timeout_s = timeout_s;
    }

    let service = HttpSimulationService::new(&config.api_url, config.http_timeout()?)?;
    info!(api_url = %service.base_url(), "using simulation service");

    match args.command {
        Cmd::Selftest => {
            let mut session = Session::default();
            let outcome = session.self_test(&service).await;
            session.drain_events().into_iter().for_each(print_event);
            outcome?;
        }
        Cmd::Simulate {
            perimeter,
            hours,
            wind_ms,
            wind_deg,
            base_ros_ms,
            slope_tan,
            accumulate,
            use_dem,
            use_meteo,
            play,
            speed,
            export_geojson,
            report_snapshot,
        } => {
            let params = SimulationParams {
                hours,
                wind_ms,
                wind_deg,
                base_ros_ms,
                slope_tan,
                accumulate,
                use_dem,
                use_meteo,
            };
            let mut follow_up = Vec::new();
            if play {
                follow_up.push(Command::First);
                follow_up.push(Command::ChangeSpeed(speed.unwrap_or(config.play_speed)));
                follow_up.push(Command::Play);
            }
            if export_geojson {
                follow_up.push(Command::ExportGeoJson);
            }
            if let Some(path) = report_snapshot {
                follow_up.push(Command::MapSnapshot(tokio::fs::read(&path).await?));
                follow_up.push(Command::ExportReport);
            }

            let perimeter = load_perimeter(&perimeter).await?;
            let opening = vec![
                Command::UpdateParams(params),
                Command::PerimeterCreated(perimeter),
                Command::Simulate,
            ];
            let succeeded = run_session(&config, service, opening, follow_up).await?;
            if !succeeded {
                return Err("simulation failed".into());
            }
        }
    }
    Ok(())
}

/// Drives one session: sends `opening`, then `follow_up` once the simulation
/// has finished successfully. Returns whether it did.
async fn run_session(
    config: &Config,
    service: HttpSimulationService,
    opening: Vec<Command>,
    follow_up: Vec<Command>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let (driver, handle) = Driver::new(Session::default(), Arc::new(service));
    let task = tokio::spawn(driver.run());
    let mut commands: Option<mpsc::Sender<Command>> = Some(handle.commands);
    let mut events = handle.events;

    if let Some(tx) = &commands {
        for command in opening {
            tx.send(command).await?;
        }
    }

    let mut succeeded = false;
    let mut follow_up = Some(follow_up);
    while let Some(event) = events.recv().await {
        match event {
            ViewEvent::SimulationFinished { succeeded: ok } => {
                succeeded = ok;
                let next = follow_up.take().filter(|_| ok).unwrap_or_default();
                if let Some(tx) = commands.take() {
                    for command in next {
                        tx.send(command).await?;
                    }
                }
            }
            ViewEvent::Download(download) => {
                let path = download.save_into(&config.export_dir).await?;
                println!("saved {}", path.display());
            }
            other => print_event(other),
        }
    }

    let session = task.await?;
    debug!(cursor = session.playback().cursor, "session finished");
    Ok(succeeded)
}

fn print_event(event: ViewEvent) {
    match event {
        ViewEvent::Notification(text)
        | ViewEvent::SlopeInfo(text)
        | ViewEvent::WeatherInfo(text)
        | ViewEvent::CursorLabel(text) => println!("{text}"),
        ViewEvent::Legend(legend) => {
            let entries: Vec<String> = legend
                .entries
                .iter()
                .map(|e| format!("{} {}", e.label, e.color))
                .collect();
            println!("{}: {}", legend.title, entries.join(", "));
        }
        other => debug!(?other, "view event"),
    }
}
