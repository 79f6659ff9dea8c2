//! # Hexroute CLI
//!
//! Terminal surface for the hexroute library: loads the cell dataset, draws a
//! route between two cells and prints the render frame as JSON.

use anyhow::Context;
use clap::Parser;
use hexroute::{
    tooltip, Action, Dashboard, DashboardConfig, RouteOutcome, RoutingClient, WebMercatorViewport,
};
use log::error;
use tokio::io::{AsyncBufReadExt, BufReader};

mod cli;

/// Command-line interface for hexroute
#[derive(Parser)]
#[command(name = "hexroute")]
#[command(about = "Hexagon visit/CO2 map engine with driving routes between cells")]
#[command(long_about = "Renders a hexagon cell dataset into map layers and routes between cells:
  hexroute --list                                  # List origin and destination ids
  hexroute --origin A1 --destination B7            # Route and print the frame as JSON
  hexroute --origin A1 --destination B7 --hide-cells
  hexroute --interactive                           # Line-oriented dashboard on stdin

Routing uses an OSRM-compatible service:
  --router http://localhost:5000                   # Local OSRM instead of the public demo")]
#[command(version = env!("HEXROUTE_VERSION"))]
struct Cli {
    /// Dataset file path or http(s) URL
    #[arg(long)]
    dataset: Option<String>,

    /// Base URL of the routing service
    #[arg(long)]
    router: Option<String>,

    /// Routing profile
    #[arg(long)]
    profile: Option<String>,

    /// Origin cell identifier
    #[arg(short, long)]
    origin: Option<String>,

    /// Destination cell identifier
    #[arg(short, long)]
    destination: Option<String>,

    /// Leave the hexagon cells out of the frame
    #[arg(long)]
    hide_cells: bool,

    /// Print origin and destination identifiers and exit
    #[arg(long)]
    list: bool,

    /// Read commands from stdin instead of drawing once
    #[arg(short, long)]
    interactive: bool,

    /// Viewport width in pixels used for bounds fitting
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Viewport height in pixels used for bounds fitting
    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Padding in pixels around a fitted route
    #[arg(long)]
    padding: Option<u32>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Show the resolved configuration without loading anything
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Merge command-line overrides into the defaults
fn resolve_config(cli: &Cli) -> DashboardConfig {
    let defaults = DashboardConfig::default();
    DashboardConfig {
        dataset: cli.dataset.clone().unwrap_or(defaults.dataset),
        routing_url: cli.router.clone().unwrap_or(defaults.routing_url),
        profile: cli.profile.clone().unwrap_or(defaults.profile),
        fit_padding: cli.padding.unwrap_or(defaults.fit_padding),
        initial_view: defaults.initial_view,
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let default_filter = if cli.verbose { "debug" } else { "error" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();

    if cli.verbose {
        eprintln!("🗺️  Hexroute v{} starting...", env!("HEXROUTE_VERSION"));
    }

    let config = resolve_config(&cli);

    if cli.dry_run {
        eprintln!(
            "🔍 [DRY RUN] dataset: {:?} | routing: {}/route/v1/{} | padding: {}px | viewport: {}x{}",
            hexroute::resolve_source(&config.dataset),
            config.routing_url,
            config.profile,
            config.fit_padding,
            cli.width,
            cli.height
        );
        return Ok(());
    }

    let client = RoutingClient::new(&config.routing_url, &config.profile);
    let surface = WebMercatorViewport {
        width: cli.width,
        height: cli.height,
    };

    let spinner = cli::Spinner::new(&format!("📦 Loading cells from {}", config.dataset));
    let mut dashboard = hexroute::open(config).await;
    spinner.clear();

    if !dashboard.index().is_loaded() {
        eprintln!("⚠️  Dataset unavailable, continuing with an empty map");
    } else if cli.verbose {
        eprintln!(
            "📦 {} cells, {} origins, {} destinations",
            dashboard.index().features().len(),
            dashboard.index().origin_options().len(),
            dashboard.index().destination_options().len()
        );
    }

    if cli.hide_cells {
        dashboard.dispatch(Action::ShowCells(false));
    }

    if cli.list {
        print!("{}", cli::report::option_listing(dashboard.index()));
        return Ok(());
    }

    if cli.interactive {
        return interactive(&mut dashboard, &client, &surface, cli.pretty).await;
    }

    dashboard.dispatch(Action::SelectOrigin(cli.origin.clone()));
    dashboard.dispatch(Action::SelectDestination(cli.destination.clone()));

    let mut failure = None;
    if cli.origin.is_some() || cli.destination.is_some() {
        if let Err(e) = draw(&mut dashboard, &client, &surface).await {
            failure = Some(e);
        }
    }

    println!("{}", frame_json(&dashboard, cli.pretty)?);

    match failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Draw a route with a spinner while the request is pending
async fn draw(
    dashboard: &mut Dashboard,
    client: &RoutingClient,
    surface: &WebMercatorViewport,
) -> hexroute::Result<()> {
    let spinner = cli::Spinner::new("🚗 Requesting route");
    let result = dashboard.draw_route(client, surface).await;
    spinner.clear();

    match result {
        Ok(RouteOutcome::Drawn) => {
            if let Some(summary) = cli::report::trip_summary(dashboard) {
                eprintln!("✅ Route drawn: {summary}");
            }
            Ok(())
        }
        Ok(RouteOutcome::Stale) => Ok(()),
        Err(e) => Err(e),
    }
}

fn frame_json(dashboard: &Dashboard, pretty: bool) -> anyhow::Result<String> {
    let frame = dashboard.frame();
    let json = if pretty {
        serde_json::to_string_pretty(&frame)
    } else {
        serde_json::to_string(&frame)
    };
    json.context("failed to serialize frame")
}

/// Line-oriented event loop; errors are reported and the loop goes on
async fn interactive(
    dashboard: &mut Dashboard,
    client: &RoutingClient,
    surface: &WebMercatorViewport,
    pretty: bool,
) -> anyhow::Result<()> {
    eprintln!("Type 'help' for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        eprint!("> ");
        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };

        let command = match cli::parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("❌ {e}");
                continue;
            }
        };

        match command {
            cli::Command::Dispatch(action) => dashboard.dispatch(action),
            cli::Command::Draw => {
                if let Err(e) = draw(dashboard, client, surface).await {
                    eprintln!("❌ {e}");
                }
            }
            cli::Command::View => {
                println!("{}", serde_json::to_string(dashboard.camera())?);
            }
            cli::Command::Layers => println!("{}", frame_json(dashboard, pretty)?),
            cli::Command::Options => print!("{}", cli::report::option_listing(dashboard.index())),
            cli::Command::Pick(id) => {
                let text = dashboard
                    .index()
                    .find_destination(&id)
                    .and_then(|f| tooltip(&f.properties()));
                match text {
                    Some(text) => println!("{text}"),
                    None => eprintln!("❌ No cell with destination '{id}'"),
                }
            }
            cli::Command::Help => eprintln!("{}", cli::HELP),
            cli::Command::Quit => break,
        }
    }

    Ok(())
}
