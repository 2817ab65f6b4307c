//! Configuration parsing for volume baking.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use glam::{Affine3A, EulerRot, Quat, Vec3};
use sdf_bake::{BakeConfig, Bounds, Dimensions, FitMode, NodeId, Scene, TriangleMesh};
use serde::Deserialize;

/// Name that refers to the bake volume in `parent` fields.
pub const VOLUME_NODE: &str = "volume";

/// Root configuration for one bake.
#[derive(Debug, Deserialize)]
pub struct Config {
	/// Asset key; output files are named after it.
	pub name: String,
	/// Output directory relative to the config file.
	#[serde(default = "default_output_dir")]
	pub output_dir: String,
	/// Voxel counts per axis.
	pub dimensions: [u32; 3],
	/// Refit the bounds to child geometry before baking.
	#[serde(default)]
	pub fit_to_vertices: bool,
	#[serde(default)]
	pub volume: VolumeConfig,
	#[serde(default)]
	pub sampling: SamplingConfig,
	/// Scene objects.
	#[serde(default)]
	pub objects: Vec<ObjectConfig>,
}

/// Placement and bounds of the bake volume.
#[derive(Debug, Deserialize)]
pub struct VolumeConfig {
	/// Bounds center in volume-local space.
	#[serde(default)]
	pub center: [f32; 3],
	/// Bounds half-extents in volume-local space.
	#[serde(default = "default_extents")]
	pub extents: [f32; 3],
	#[serde(flatten)]
	pub transform: TransformConfig,
}

impl Default for VolumeConfig {
	fn default() -> Self {
		Self {
			center: [0.0; 3],
			extents: default_extents(),
			transform: TransformConfig::default(),
		}
	}
}

impl VolumeConfig {
	pub fn bounds(&self) -> Bounds {
		Bounds::new(Vec3::from(self.center), Vec3::from(self.extents))
	}
}

/// Local transform of a node.
#[derive(Debug, Deserialize)]
pub struct TransformConfig {
	#[serde(default)]
	pub position: [f32; 3],
	/// Euler angles in degrees, applied Z, then X, then Y.
	#[serde(default)]
	pub rotation_degrees: [f32; 3],
	#[serde(default = "default_scale")]
	pub scale: [f32; 3],
}

impl Default for TransformConfig {
	fn default() -> Self {
		Self {
			position: [0.0; 3],
			rotation_degrees: [0.0; 3],
			scale: default_scale(),
		}
	}
}

impl TransformConfig {
	pub fn to_affine(&self) -> Affine3A {
		let [x, y, z] = self.rotation_degrees.map(f32::to_radians);
		Affine3A::from_scale_rotation_translation(
			Vec3::from(self.scale),
			Quat::from_euler(EulerRot::YXZ, y, x, z),
			Vec3::from(self.position),
		)
	}
}

/// Ray sampling options.
#[derive(Debug, Deserialize)]
pub struct SamplingConfig {
	#[serde(default = "default_ray_count")]
	pub ray_count: u32,
	#[serde(default = "default_jitter_seed")]
	pub jitter_seed: u64,
	#[serde(default = "default_jitter_scale")]
	pub jitter_scale: f32,
	#[serde(default = "default_max_dimension")]
	pub max_dimension: u32,
}

impl Default for SamplingConfig {
	fn default() -> Self {
		Self {
			ray_count: default_ray_count(),
			jitter_seed: default_jitter_seed(),
			jitter_scale: default_jitter_scale(),
			max_dimension: default_max_dimension(),
		}
	}
}

impl SamplingConfig {
	pub fn to_bake_config(&self) -> BakeConfig {
		BakeConfig::new()
			.with_ray_count(self.ray_count)
			.with_jitter_seed(self.jitter_seed)
			.with_jitter_scale(self.jitter_scale)
			.with_max_dimension(self.max_dimension)
	}
}

/// A renderable scene object.
#[derive(Debug, Deserialize)]
pub struct ObjectConfig {
	pub name: String,
	/// `"volume"` or the name of an earlier object. Top level when absent.
	pub parent: Option<String>,
	#[serde(flatten)]
	pub transform: TransformConfig,
	pub shape: ShapeConfig,
}

/// Mesh source for an object.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeConfig {
	Cuboid {
		half_extents: [f32; 3],
	},
	Sphere {
		radius: f32,
		#[serde(default = "default_sectors")]
		sectors: u32,
		#[serde(default = "default_stacks")]
		stacks: u32,
	},
	Plane {
		half_size: f32,
	},
	Triangles {
		positions: Vec<[f32; 3]>,
		indices: Vec<u32>,
	},
}

impl ShapeConfig {
	pub fn to_mesh(&self) -> Result<TriangleMesh> {
		let mesh = match self {
			ShapeConfig::Cuboid { half_extents } => TriangleMesh::cuboid(Vec3::from(*half_extents)),
			ShapeConfig::Sphere {
				radius,
				sectors,
				stacks,
			} => TriangleMesh::uv_sphere(*radius, *sectors, *stacks)?,
			ShapeConfig::Plane { half_size } => TriangleMesh::plane(*half_size),
			ShapeConfig::Triangles { positions, indices } => TriangleMesh::new(
				positions.iter().copied().map(Vec3::from).collect(),
				indices.clone(),
			)?,
		};
		Ok(mesh)
	}
}

fn default_output_dir() -> String {
	"baked".to_string()
}

fn default_extents() -> [f32; 3] {
	[0.5; 3]
}

fn default_scale() -> [f32; 3] {
	[1.0; 3]
}

fn default_ray_count() -> u32 {
	sdf_bake::constants::DEFAULT_RAY_COUNT
}

fn default_jitter_seed() -> u64 {
	sdf_bake::constants::DEFAULT_JITTER_SEED
}

fn default_jitter_scale() -> f32 {
	sdf_bake::constants::DEFAULT_JITTER_SCALE
}

fn default_max_dimension() -> u32 {
	sdf_bake::MAX_DIMENSION
}

fn default_sectors() -> u32 {
	32
}

fn default_stacks() -> u32 {
	16
}

impl Config {
	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		Self::parse(&content)
	}

	/// Parse and validate configuration TOML.
	pub fn parse(content: &str) -> Result<Self> {
		let config: Config =
			toml::from_str(content).with_context(|| "Failed to parse config TOML")?;

		if config.name.is_empty() {
			anyhow::bail!("name must not be empty");
		}
		if config.name.contains(['/', '\\']) || config.name.starts_with('.') {
			anyhow::bail!("name must be a plain file name, got {:?}", config.name);
		}
		let mut seen = HashSet::new();
		for object in &config.objects {
			if object.name == VOLUME_NODE {
				anyhow::bail!("object name {:?} is reserved", VOLUME_NODE);
			}
			if !seen.insert(object.name.as_str()) {
				anyhow::bail!("duplicate object name {:?}", object.name);
			}
		}

		Ok(config)
	}

	pub fn dimensions(&self) -> Dimensions {
		Dimensions::from(self.dimensions)
	}

	pub fn fit_mode(&self) -> FitMode {
		FitMode::from(self.fit_to_vertices)
	}

	/// Build the scene hierarchy, returning it with the volume node.
	pub fn build_scene(&self) -> Result<(Scene, NodeId)> {
		let mut scene = Scene::new();
		let volume = scene.add_node(VOLUME_NODE, None, self.volume.transform.to_affine());

		let mut ids: HashMap<&str, NodeId> = HashMap::new();
		for object in &self.objects {
			let parent = match object.parent.as_deref() {
				None => None,
				Some(VOLUME_NODE) => Some(volume),
				Some(name) => Some(*ids.get(name).with_context(|| {
					format!(
						"object {:?} has unknown parent {:?} (parents must be listed first)",
						object.name, name
					)
				})?),
			};
			let mesh = object
				.shape
				.to_mesh()
				.with_context(|| format!("Invalid shape for object {:?}", object.name))?;
			let id = scene.add_renderable(
				object.name.clone(),
				parent,
				object.transform.to_affine(),
				Arc::new(mesh),
			);
			ids.insert(object.name.as_str(), id);
		}

		Ok((scene, volume))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use sdf_bake::GeometrySource;

	const SAMPLE: &str = r#"
name = "test_volume"
dimensions = [8, 4, 2]
fit_to_vertices = true

[volume]
extents = [2.0, 1.0, 1.0]
position = [1.0, 0.0, 0.0]

[sampling]
ray_count = 64

[[objects]]
name = "box"
parent = "volume"
shape = { type = "cuboid", half_extents = [0.5, 0.5, 0.5] }

[[objects]]
name = "ball"
parent = "box"
position = [0.0, 2.0, 0.0]
shape = { type = "sphere", radius = 0.25 }

[[objects]]
name = "floor"
shape = { type = "plane", half_size = 10.0 }
"#;

	#[test]
	fn test_parse_sample() {
		let config = Config::parse(SAMPLE).expect("valid config");
		assert_eq!(config.name, "test_volume");
		assert_eq!(config.output_dir, "baked");
		assert_eq!(config.dimensions(), Dimensions::new(8, 4, 2));
		assert_eq!(config.fit_mode(), FitMode::FitToVertices);
		assert_eq!(config.volume.bounds().extents, Vec3::new(2.0, 1.0, 1.0));

		let bake = config.sampling.to_bake_config();
		assert_eq!(bake.ray_count, 64);
		assert_eq!(bake.jitter_seed, 555);
		assert_eq!(bake.jitter_scale, 0.75);
		assert_eq!(bake.max_dimension, 256);

		assert!(matches!(
			config.objects[1].shape,
			ShapeConfig::Sphere {
				sectors: 32,
				stacks: 16,
				..
			}
		));
	}

	#[test]
	fn test_build_scene_hierarchy() {
		let config = Config::parse(SAMPLE).expect("valid config");
		let (scene, volume) = config.build_scene().expect("valid scene");

		assert_eq!(scene.len(), 4);
		// box and its child ball sit under the volume, floor does not.
		assert_eq!(scene.descendant_renderables(volume).len(), 2);
		assert_eq!(scene.all_renderables().len(), 3);

		let ball = scene.find("ball").expect("ball exists");
		let p = scene.world_transform(ball).transform_point3(Vec3::ZERO);
		assert!((p - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);
	}

	#[test]
	fn test_unknown_parent_is_rejected() {
		let toml = r#"
name = "v"
dimensions = [4, 4, 4]

[[objects]]
name = "a"
parent = "missing"
shape = { type = "plane", half_size = 1.0 }
"#;
		let config = Config::parse(toml).expect("parses");
		assert!(config.build_scene().is_err());
	}

	#[test]
	fn test_invalid_names_are_rejected() {
		let reserved = r#"
name = "v"
dimensions = [4, 4, 4]

[[objects]]
name = "volume"
shape = { type = "plane", half_size = 1.0 }
"#;
		assert!(Config::parse(reserved).is_err());

		let path_like = r#"
name = "../escape"
dimensions = [4, 4, 4]
"#;
		assert!(Config::parse(path_like).is_err());
	}

	#[test]
	fn test_bad_triangles_are_rejected() {
		let toml = r#"
name = "v"
dimensions = [4, 4, 4]

[[objects]]
name = "tri"
shape = { type = "triangles", positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]], indices = [0, 1, 2] }
"#;
		let config = Config::parse(toml).expect("parses");
		assert!(config.build_scene().is_err());
	}

	#[test]
	fn test_rotation_is_degrees() {
		let transform = TransformConfig {
			rotation_degrees: [0.0, 90.0, 0.0],
			..Default::default()
		};
		let p = transform.to_affine().transform_point3(Vec3::X);
		assert!((p - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
	}
}
