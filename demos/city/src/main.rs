//! city: multi-waypoint routing over a synthetic grid city.
//!
//! Builds the grid, synthesizes random edge speeds for the chosen travel
//! mode, partitions it into regions, then routes from `--from` through every
//! `--via` to `--to`.  The route is appended to `routes.csv` in the output
//! directory and drawn to `route.geojson`, one LineString per edge coloured
//! by speed tier.
//!
//! ```text
//! city --from 55.731,37.571 --via 55.750,37.620 --to 55.770,37.640 --mode walk --optimize time
//! ```

mod network;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use serde_json::{Value, json};

use rg_core::{GeoPoint, RoutingConfig, SeededRng, TravelMode, Weight};
use rg_output::CsvRouteSink;
use rg_spatial::{CancelToken, ComposedRoute, RandomSpeedModel, RoadNetwork, RoutePlanner, RouteRequest};

use network::build_city;

/// Child-stream offset for speed synthesis, so speeds and k-means seeding
/// never share draws.
const SPEED_STREAM: u64 = 1;

/// Route through a synthetic grid city.
#[derive(Parser)]
#[command(name = "city")]
#[command(about = "Region-partitioned multi-waypoint routing demo")]
struct Cli {
    /// Start point as "lat,lon"
    #[arg(long)]
    from: GeoPoint,

    /// Destination as "lat,lon"
    #[arg(long)]
    to: GeoPoint,

    /// Intermediate stop as "lat,lon"; repeat for more stops, visited in order
    #[arg(long)]
    via: Vec<GeoPoint>,

    /// Travel mode: drive or walk
    #[arg(long)]
    mode: Option<TravelMode>,

    /// Optimisation criterion: length or time
    #[arg(long)]
    optimize: Option<Weight>,

    /// Number of regions the network is partitioned into
    #[arg(long)]
    clusters: Option<usize>,

    /// Seed for clustering and speed synthesis
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with a RoutingConfig; command-line flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for routes.csv and route.geojson
    #[arg(long, default_value = "output/city")]
    out: PathBuf,

    /// Give up on the route after this many seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run(cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    info!(
        "mode {} / optimise {} / {} regions / seed {}",
        config.mode, config.weight, config.cluster_count, config.seed
    );

    // 1. Network.
    let network = build_city();
    info!(
        "grid city: {} nodes, {} edges ({}×{} junctions)",
        network.node_count(),
        network.edge_count(),
        network::ROWS,
        network::COLS
    );

    // 2. Weights and regions.
    let t0 = Instant::now();
    let seed = config.seed;
    let mut planner = RoutePlanner::new(network, config)?;
    let mut speeds = RandomSpeedModel::from_rng(SeededRng::new(seed).child(SPEED_STREAM));
    let partition = planner.prepare(&mut speeds)?;
    info!(
        "prepared in {:.3} s, region sizes {:?}",
        t0.elapsed().as_secs_f64(),
        partition.sizes
    );

    // 3. Waypoints.
    let mut points = Vec::with_capacity(cli.via.len() + 2);
    points.push(cli.from);
    points.extend(cli.via.iter().copied());
    points.push(cli.to);
    let waypoints = planner.snap(&points)?;
    for (p, n) in points.iter().zip(&waypoints) {
        info!("{p} snapped to {n} at {}", planner.network().node_pos[n.index()]);
    }

    // 4. Route.
    fs::create_dir_all(&cli.out)
        .with_context(|| format!("creating {}", cli.out.display()))?;
    let mut history = CsvRouteSink::new(&cli.out)?;

    let request = RouteRequest::new(waypoints)
        .labels(cli.from.to_string(), cli.to.to_string())
        .cancel_token(CancelToken::new().with_timeout(Duration::from_secs(cli.timeout_secs)));
    let t1 = Instant::now();
    let route = planner.route(&request, &mut history)?;
    let elapsed = t1.elapsed();

    // 5. Output.
    let geojson_path = cli.out.join("route.geojson");
    write_geojson(&geojson_path, planner.network(), &route)?;

    println!("Route found in {:.3} s", elapsed.as_secs_f64());
    println!("  nodes      : {}", route.nodes.len());
    println!("  segments   : {}", route.segment_count());
    println!("  distance   : {:.2} km", route.total_distance_km);
    println!("  time       : {:.1} min", route.total_time_min);
    println!("  history    : {}", history.path().display());
    println!("  geojson    : {}", geojson_path.display());

    Ok(())
}

fn load_config(cli: &Cli) -> Result<RoutingConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<RoutingConfig>(&text)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => RoutingConfig::default(),
    };

    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(weight) = cli.optimize {
        config.weight = weight;
    }
    if let Some(k) = cli.clusters {
        config.cluster_count = k;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    Ok(config)
}

/// One LineString feature per route edge plus a Point per waypoint.
fn write_geojson(path: &Path, network: &RoadNetwork, route: &ComposedRoute) -> Result<()> {
    let coord = |p: GeoPoint| json!([p.lon, p.lat]);

    let mut features: Vec<Value> = route
        .edges
        .iter()
        .map(|e| {
            let a = network.node_pos[e.from.index()];
            let b = network.node_pos[e.to.index()];
            json!({
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": [coord(a), coord(b)] },
                "properties": {
                    "from": e.from.0,
                    "to": e.to.0,
                    "length_m": e.length_m,
                    "speed_kph": e.speed_kph,
                    "travel_min": e.travel_min,
                    "tier": e.tier().as_str(),
                },
            })
        })
        .collect();

    let last = route.waypoint_positions.len().saturating_sub(1);
    for (i, &pos) in route.waypoint_positions.iter().enumerate() {
        let node = route.nodes[pos];
        let kind = match i {
            0 => "start",
            _ if i == last => "end",
            _ => "via",
        };
        features.push(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": coord(network.node_pos[node.index()]) },
            "properties": { "waypoint": i, "kind": kind, "node": node.0 },
        }));
    }

    let collection = json!({
        "type": "FeatureCollection",
        "properties": {
            "distance_km": route.total_distance_km,
            "time_min": route.total_time_min,
            "weight": route.weight,
        },
        "features": features,
    });

    fs::write(path, serde_json::to_string_pretty(&collection)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
