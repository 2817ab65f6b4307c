//! File-backed asset store.
//!
//! Each asset is two files in the output directory:
//! - `<key>.sdf.bin`: normalized distances, little-endian f32, x fastest
//! - `<key>.sdf.json`: bounds, dimensions and the normalization divisor
//!
//! Files are written to a temporary sibling and renamed into place, so a
//! reader never sees a half-written asset.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glam::Vec3;
use sdf_bake::{AssetStore, Bounds, Dimensions, SdfAsset};
use serde::{Deserialize, Serialize};

/// Format tag written to metadata.
pub const DATA_FORMAT: &str = "r32_float_le";

/// Metadata stored next to the distance data.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AssetMetadata {
	pub format: String,
	pub data_file: String,
	pub dimensions: [u32; 3],
	pub bounds_center: [f32; 3],
	pub bounds_extents: [f32; 3],
	pub voxel_size: [f32; 3],
	pub non_uniform_scale: [f32; 3],
	pub max_distance: f32,
}

impl AssetMetadata {
	fn from_asset(asset: &SdfAsset, data_file: String) -> Self {
		let d = asset.dimensions;
		Self {
			format: DATA_FORMAT.to_string(),
			data_file,
			dimensions: [d.x, d.y, d.z],
			bounds_center: asset.bounds.center.to_array(),
			bounds_extents: asset.bounds.extents.to_array(),
			voxel_size: asset.voxel_size.to_array(),
			non_uniform_scale: asset.non_uniform_scale.to_array(),
			max_distance: asset.max_distance,
		}
	}
}

/// Stores assets as files under one directory.
pub struct FileAssetStore {
	dir: PathBuf,
}

impl FileAssetStore {
	/// Open (creating if needed) a store rooted at `dir`.
	pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
		let dir = dir.into();
		fs::create_dir_all(&dir)
			.with_context(|| format!("Failed to create output dir: {}", dir.display()))?;
		Ok(Self { dir })
	}

	pub fn data_path(&self, key: &str) -> PathBuf {
		self.dir.join(format!("{key}.sdf.bin"))
	}

	pub fn metadata_path(&self, key: &str) -> PathBuf {
		self.dir.join(format!("{key}.sdf.json"))
	}

	/// Read an asset back.
	pub fn load(&self, key: &str) -> Result<SdfAsset> {
		let meta_path = self.metadata_path(key);
		let json = fs::read_to_string(&meta_path)
			.with_context(|| format!("Failed to read: {}", meta_path.display()))?;
		let meta: AssetMetadata = serde_json::from_str(&json)
			.with_context(|| format!("Failed to parse: {}", meta_path.display()))?;
		if meta.format != DATA_FORMAT {
			anyhow::bail!("Unsupported data format {:?}", meta.format);
		}

		let data_path = self.dir.join(&meta.data_file);
		let bytes =
			fs::read(&data_path).with_context(|| format!("Failed to read: {}", data_path.display()))?;
		if bytes.len() % 4 != 0 {
			anyhow::bail!("{} is not a whole number of f32 values", data_path.display());
		}
		let data: Vec<f32> = bytemuck::pod_collect_to_vec::<u8, u32>(&bytes)
			.into_iter()
			.map(|bits| f32::from_bits(u32::from_le(bits)))
			.collect();

		let dimensions = Dimensions::from(meta.dimensions);
		if data.len() != dimensions.voxel_count() {
			anyhow::bail!(
				"{} holds {} values, expected {}",
				data_path.display(),
				data.len(),
				dimensions.voxel_count()
			);
		}

		Ok(SdfAsset {
			bounds: Bounds::new(
				Vec3::from(meta.bounds_center),
				Vec3::from(meta.bounds_extents),
			),
			voxel_size: Vec3::from(meta.voxel_size),
			dimensions,
			non_uniform_scale: Vec3::from(meta.non_uniform_scale),
			max_distance: meta.max_distance,
			data,
		})
	}
}

/// Write `bytes` to `path` through a temporary sibling.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
	let mut tmp = path.as_os_str().to_owned();
	tmp.push(".tmp");
	let tmp = PathBuf::from(tmp);
	fs::write(&tmp, bytes).with_context(|| format!("Failed to write: {}", tmp.display()))?;
	fs::rename(&tmp, path).with_context(|| format!("Failed to replace: {}", path.display()))?;
	Ok(())
}

impl AssetStore for FileAssetStore {
	type Error = anyhow::Error;

	fn replace(&mut self, key: &str, asset: &SdfAsset) -> Result<bool> {
		let data_path = self.data_path(key);
		let meta_path = self.metadata_path(key);
		let existed = meta_path.exists() || data_path.exists();

		let le_bits: Vec<u32> = asset.data.iter().map(|v| v.to_bits().to_le()).collect();
		write_atomic(&data_path, bytemuck::cast_slice(&le_bits))?;

		let data_file = format!("{key}.sdf.bin");
		let meta = AssetMetadata::from_asset(asset, data_file);
		let json = serde_json::to_string_pretty(&meta).context("Failed to encode metadata")?;
		write_atomic(&meta_path, json.as_bytes())?;

		Ok(existed)
	}
}
