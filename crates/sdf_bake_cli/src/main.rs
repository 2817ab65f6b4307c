//! Signed distance field volume baker.
//!
//! Builds a scene from a TOML description, bakes the volume and writes the
//! normalized field through the file asset store:
//! - <name>.sdf.bin: R32 float distances in [-1, 1], x fastest
//! - <name>.sdf.json: bounds, dimensions and the divisor to recover distances

mod config;
mod store;

use anyhow::{Context, Result};
use clap::Parser;
use sdf_bake::{bake_scene, AssetStore, BakeOutcome, CancellationToken, SdfAsset};
use std::path::{Path, PathBuf};

use config::Config;
use store::FileAssetStore;

/// Signed distance field baker for triangle scenes.
#[derive(Parser, Debug)]
#[command(name = "bake_sdf")]
#[command(about = "Bakes triangle geometry into a signed distance field volume")]
struct Args {
	/// Path to configuration TOML file.
	#[arg(short, long)]
	config: PathBuf,

	/// Output directory (default: `output_dir` relative to the config file).
	#[arg(short, long)]
	output_dir: Option<PathBuf>,

	/// Rays per voxel, overriding the config.
	#[arg(long)]
	ray_count: Option<u32>,

	/// Jitter seed, overriding the config.
	#[arg(long)]
	seed: Option<u64>,

	/// Worker threads (default: one per core).
	#[arg(long)]
	threads: Option<usize>,
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	if let Some(threads) = args.threads {
		rayon::ThreadPoolBuilder::new()
			.num_threads(threads)
			.build_global()
			.context("Failed to configure thread pool")?;
	}

	println!("Loading config from: {}", args.config.display());
	let mut config = Config::load(&args.config)?;
	if let Some(ray_count) = args.ray_count {
		config.sampling.ray_count = ray_count;
	}
	if let Some(seed) = args.seed {
		config.sampling.jitter_seed = seed;
	}

	let output_dir = args.output_dir.unwrap_or_else(|| {
		args.config
			.parent()
			.unwrap_or(Path::new("."))
			.join(&config.output_dir)
	});

	let (scene, volume) = config.build_scene()?;
	let dimensions = config.dimensions();
	let bake_config = config.sampling.to_bake_config();
	println!(
		"Baking {:?} at {}x{}x{} with {} rays per voxel ({} objects)",
		config.name,
		dimensions.x,
		dimensions.y,
		dimensions.z,
		bake_config.ray_count,
		config.objects.len()
	);

	let mut bounds = config.volume.bounds();
	let mut baked = None;
	let outcome = bake_scene(
		&scene,
		volume,
		&mut bounds,
		dimensions,
		config.fit_mode(),
		&bake_config,
		&CancellationToken::new(),
		|result| baked = Some(result),
	)
	.context("Bake failed")?;

	let BakeOutcome::Completed(stats) = outcome else {
		anyhow::bail!("Bake was cancelled");
	};
	let result = baked.context("Bake completed without a result")?;
	log::debug!(
		"bounds after collection: center {:?}, extents {:?}",
		bounds.center,
		bounds.extents
	);

	let asset = SdfAsset::from_result(&result)
		.context("Baked field is degenerate (every distance is zero); nothing to store")?;

	let mut store = FileAssetStore::new(&output_dir)?;
	let replaced = store.replace(&config.name, &asset)?;
	let stored = store.load(&config.name).context("Failed to read back baked asset")?;
	if stored != asset {
		anyhow::bail!("Stored asset does not match the bake");
	}

	println!(
		"  ✓ {} voxels, {} triangles, max distance {:.4} in {:.2}s",
		stats.voxel_count,
		stats.triangle_count,
		asset.max_distance,
		stats.elapsed_us as f64 / 1e6
	);
	println!(
		"\nDone! {} {} in: {}",
		if replaced { "Replaced" } else { "Wrote" },
		config.name,
		output_dir.display()
	);

	Ok(())
}
