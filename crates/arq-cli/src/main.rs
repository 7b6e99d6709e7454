mod server;
mod targeting;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arq_catalog::Catalog;
use arq_core::{
    GeoPoint, SensorEvent, Session, destination_point, encode_trace, parse_trace, snapshot_json,
};
use clap::{Parser, Subcommand};
use rmcp::{ServiceExt, service::ServerInitializeError, transport::stdio};

use crate::targeting::{TargetChoice, parse_point, select_target};

/// Upper bound on fixes one `simulate` run may emit.
const MAX_SIMULATED_STEPS: usize = 100_000;

#[derive(Parser)]
#[command(name = "arq", about = "AR quest proximity engine CLI and MCP server")]
struct Cli {
    /// Catalog/config file (default: $ARQ_DATA_DIR/arquest.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server on stdio transport
    Serve,

    /// Great-circle distance and initial bearing between two points
    Distance {
        /// Start point as LAT,LNG
        #[arg(value_parser = parse_point, allow_hyphen_values = true)]
        from: GeoPoint,
        /// End point as LAT,LNG
        #[arg(value_parser = parse_point, allow_hyphen_values = true)]
        to: GeoPoint,
    },

    /// Project a point a given distance along a bearing
    Project {
        /// Origin as LAT,LNG
        #[arg(value_parser = parse_point, allow_hyphen_values = true)]
        origin: GeoPoint,
        /// Distance in meters
        #[arg(long)]
        distance: f64,
        /// Bearing in degrees clockwise from north
        #[arg(long, allow_hyphen_values = true)]
        bearing: f64,
    },

    /// List quests and their AR links
    Quests,

    /// Run a JSON Lines sensor trace through a session
    Replay {
        /// Trace file, or - for stdin
        trace: PathBuf,
        #[command(flatten)]
        selection: TargetArgs,
    },

    /// Generate a trace walking from one point to another
    Simulate {
        /// Start point as LAT,LNG
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        from: GeoPoint,
        /// Destination as LAT,LNG
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        to: GeoPoint,
        /// Meters between fixes
        #[arg(long, default_value_t = 5.0)]
        step: f64,
        /// Emit headings in the inverted compass convention
        #[arg(long)]
        inverted: bool,
    },

    /// Print the effective engine configuration as TOML
    Config,
}

#[derive(clap::Args)]
struct TargetArgs {
    /// AR deep link, e.g. "/ar?lat=51.1283&lng=71.4305"
    #[arg(long)]
    link: Option<String>,

    /// Quest id from the catalog (requires --task)
    #[arg(long)]
    quest: Option<String>,

    /// Task id within --quest
    #[arg(long)]
    task: Option<String>,

    /// Explicit target as LAT,LNG
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    target: Option<GeoPoint>,
}

impl TargetArgs {
    fn choice(&self) -> TargetChoice<'_> {
        TargetChoice {
            link: self.link.as_deref(),
            quest: self.quest.as_deref(),
            task: self.task.as_deref(),
            point: self.target,
        }
    }
}

fn open_catalog(cli: &Cli) -> Result<Catalog> {
    Catalog::open(cli.config.as_deref()).context("failed to open catalog")
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Serve => cmd_serve(&cli).await,
        Commands::Distance { from, to } => cmd_distance(from, to),
        Commands::Project {
            origin,
            distance,
            bearing,
        } => cmd_project(origin, *distance, *bearing),
        Commands::Quests => cmd_quests(&cli),
        Commands::Replay { trace, selection } => cmd_replay(&cli, trace, selection),
        Commands::Simulate {
            from,
            to,
            step,
            inverted,
        } => cmd_simulate(from, to, *step, *inverted),
        Commands::Config => cmd_config(&cli),
    }
}

async fn cmd_serve(cli: &Cli) -> Result<()> {
    let catalog = open_catalog(cli)?;
    tracing::info!("starting MCP server with {} quests", catalog.quests.len());

    let server = server::ArqServer::new(catalog);
    let service = match server.serve(stdio()).await {
        Ok(service) => service,
        // Host hung up before the handshake finished
        Err(ServerInitializeError::ConnectionClosed(stage)) => {
            tracing::info!(%stage, "stdin closed before initialization, exiting");
            return Ok(());
        }
        Err(e) => return Err(e).context("failed to start MCP server"),
    };
    service.waiting().await?;
    Ok(())
}

fn cmd_distance(from: &GeoPoint, to: &GeoPoint) -> Result<()> {
    println!("distance_m: {:.3}", from.distance_to(to));
    println!("bearing:    {:.3}", from.bearing_to(to));
    Ok(())
}

fn cmd_project(origin: &GeoPoint, distance: f64, bearing: f64) -> Result<()> {
    if !(distance.is_finite() && distance >= 0.0) {
        anyhow::bail!("distance must be a non-negative number, got {distance}");
    }
    if !bearing.is_finite() {
        anyhow::bail!("bearing must be a number, got {bearing}");
    }
    let dest = destination_point(origin, distance, bearing);
    println!("{:.7},{:.7}", dest.latitude, dest.longitude);
    Ok(())
}

fn cmd_quests(cli: &Cli) -> Result<()> {
    let catalog = open_catalog(cli)?;
    for quest in &catalog.quests {
        println!("{}  {}", quest.id, quest.title);
        for task in &quest.tasks {
            match task.ar_link() {
                Some(link) => println!("  {}  {}  {}", task.id, task.text, link),
                None => println!("  {}  {}  (no AR location)", task.id, task.text),
            }
        }
    }
    Ok(())
}

fn read_trace(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read trace from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

fn cmd_replay(cli: &Cli, trace: &Path, selection: &TargetArgs) -> Result<()> {
    let catalog = open_catalog(cli)?;
    let explicit = select_target(&catalog, &selection.choice())?;
    let mut session =
        Session::new(catalog.engine, explicit).context("failed to start session")?;

    let content = read_trace(trace)?;
    let events = parse_trace(&content).context("failed to parse trace")?;

    let mut rejected = 0usize;
    for (idx, event) in events.iter().enumerate() {
        match session.apply(event) {
            Ok(update) => {
                println!("{}", snapshot_json(&update.snapshot)?);
                if let Some(ev) = update.event {
                    println!("{}", serde_json::to_string(&ev)?);
                }
            }
            Err(e) => {
                rejected += 1;
                tracing::warn!("event {}: {e}", idx + 1);
            }
        }
    }

    if cli.verbose {
        let origin = session
            .target()
            .map_or_else(|| "none".to_string(), |t| format!("{:?}", t.origin));
        eprintln!(
            "--- events={}, rejected={}, final={:?}, target={} ---",
            events.len(),
            rejected,
            session.state(),
            origin
        );
    }
    Ok(())
}

fn cmd_simulate(from: &GeoPoint, to: &GeoPoint, step: f64, inverted: bool) -> Result<()> {
    if !(step.is_finite() && step > 0.0) {
        anyhow::bail!("step must be positive, got {step}");
    }
    let total = from.distance_to(to);
    let steps = (total / step).ceil();
    if steps > MAX_SIMULATED_STEPS as f64 {
        anyhow::bail!(
            "step {step} m is too small for a {total:.1} m walk (over {MAX_SIMULATED_STEPS} fixes)"
        );
    }
    let steps = steps as usize;
    let course = from.bearing_to(to);

    let mut events = Vec::with_capacity(2 * (steps + 1));
    for i in 0..=steps {
        let here = if i == steps {
            *to
        } else {
            destination_point(from, total * i as f64 / steps as f64, course)
        };
        let bearing = here.bearing_to(to);
        let degrees = if inverted {
            (360.0 - bearing).rem_euclid(360.0)
        } else {
            bearing
        };
        events.push(SensorEvent::Heading { degrees, inverted });
        events.push(SensorEvent::Position {
            latitude: here.latitude,
            longitude: here.longitude,
        });
    }
    print!("{}", encode_trace(&events)?);
    Ok(())
}

fn cmd_config(cli: &Cli) -> Result<()> {
    let catalog = open_catalog(cli)?;
    print!(
        "{}",
        catalog
            .engine_toml()
            .context("failed to render configuration")?
    );
    Ok(())
}
