use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use tilenav::debug::render_world;
use tilenav::{Movement, NavConfig, NavWorld, ObjectKind, Point, ResourceKind, demo, smooth_path};

#[derive(Parser, Debug)]
#[command(name = "tilenav")]
#[command(about = "Build a random map with a walled compound and route through it")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed (random if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Map width in tiles, overrides the configuration
    #[arg(long)]
    cols: Option<i32>,

    /// Map height in tiles, overrides the configuration
    #[arg(long)]
    rows: Option<i32>,

    /// Lock every door before routing
    #[arg(long)]
    lock_doors: bool,
}

fn main() -> tilenav::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("loading configuration from {}", path.display());
            NavConfig::load(path)?
        }
        None => NavConfig::default(),
    };
    if let Some(cols) = args.cols {
        config.grid.cols = cols;
    }
    if let Some(rows) = args.rows {
        config.grid.rows = rows;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut world = NavWorld::new(config)?;
    let layout = demo::generate(&mut world, &mut rng);
    world.rebuild_regions();
    info!("{}", world.region_stats());

    if args.lock_doors {
        for &door in &layout.doors {
            world.set_door_locked(door, true);
        }
    }

    let (Some(inner), Some(outside)) = (layout.compound, layout.outside) else {
        warn!("map too small for a compound");
        print!("{}", render_world(&world, None));
        return Ok(());
    };
    let inside = Point::new((inner.min.x + inner.max.x) / 2, (inner.min.y + inner.max.y) / 2);

    info!(
        "{} -> {}: reachable = {}",
        inside,
        outside,
        world.is_reachable(inside, outside)
    );
    let path = world.compute_path(inside, outside, Movement::GridAligned);
    match &path {
        Some(p) => info!("grid-aligned path: {} tiles, cost {:.2}", p.len(), p.cost()),
        None => info!("no path"),
    }
    if let Some(p) = world.compute_path(inside, outside, Movement::General) {
        let smoothed = smooth_path(world.grid(), &p);
        info!("general path: {} tiles, {} waypoints after smoothing", p.len(), smoothed.len());
    }

    let berry =
        world.find_nearest(inside, |o| o.kind == ObjectKind::Resource(ResourceKind::BerryBush));
    match berry {
        Some(o) => info!("nearest berry bush from {}: {} at {}", inside, o.entity, o.pos),
        None => info!("no berry bush reachable from {}", inside),
    }

    let stats = world.search_stats();
    info!(
        "searches {}, fast rejects {}, aborted {}, expanded {}",
        stats.searches, stats.fast_rejects, stats.aborted, stats.expanded
    );
    print!("{}", render_world(&world, path.as_ref()));
    Ok(())
}
