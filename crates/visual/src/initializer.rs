use std::path::{Path, PathBuf};
use wavevisual_render::{Material, ShaderParam, TextureKind};
use wavevisual_wavefield::WavefieldSource;

use crate::config::ConfigError;
use crate::lookup::FileLookup;

/// Number of wave components the ocean shader's uniform arrays hold.
///
/// The wavefield may carry more; only the first `MAX_SHADER_WAVES`, in the
/// wavefield's canonical order, reach the shader.
pub const MAX_SHADER_WAVES: usize = 3;

/// Uniform names declared by the ocean shader programs.
pub mod uniform {
    // vertex stage
    pub const WAVE_COUNT: &str = "Nwaves";
    pub const RESCALE: &str = "rescale";
    pub const BUMP_SCALE: &str = "bumpScale";
    pub const BUMP_SPEED: &str = "bumpSpeed";
    pub const AMPLITUDE: &str = "amplitude";
    pub const WAVENUMBER: &str = "wavenumber";
    pub const OMEGA: &str = "omega";
    pub const DIRECTIONS: [&str; super::MAX_SHADER_WAVES] = ["dir0", "dir1", "dir2"];
    pub const STEEPNESS: &str = "steepness";
    pub const TAU: &str = "tau";
    pub const CAMERA_POSITION_OBJECT_SPACE: &str = "camera_position_object_space";
    pub const TIME: &str = "t";

    // fragment stage
    pub const HDR_MULTIPLIER: &str = "hdrMultiplier";
    pub const FRESNEL_POWER: &str = "fresnelPower";
    pub const SHALLOW_COLOR: &str = "shallowColor";
    pub const DEEP_COLOR: &str = "deepColor";
    pub const BUMP_MAP: &str = "bumpMap";
    pub const CUBE_MAP: &str = "cubeMap";
}

const RESCALE: f32 = 0.5;
const BUMP_SCALE: [f32; 2] = [25.0, 25.0];
const BUMP_SPEED: [f32; 2] = [0.01, 0.01];
/// Tells the renderer to feed the camera position in object space.
const CAMERA_POSITION_OBJECT_SPACE: i32 = 1;
const HDR_MULTIPLIER: f32 = 0.4;
const FRESNEL_POWER: f32 = 5.0;
const SHALLOW_COLOR: [f32; 4] = [0.0, 0.1, 0.3, 1.0];
const DEEP_COLOR: [f32; 4] = [0.0, 0.05, 0.2, 1.0];
const BUMP_MAP_UNIT: u32 = 0;
const CUBE_MAP_UNIT: u32 = 1;

const BUMP_MAP_FILE: &str = "materials/textures/wave_normals.dds";
const CUBE_MAP_FILE: &str = "materials/textures/skybox_lowres.dds";

/// The wavefield values the shader sees, narrowed to `f32` and truncated to
/// [`MAX_SHADER_WAVES`] components.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderWaves {
    /// Component count of the full wavefield, not of the arrays.
    pub count: i32,
    pub amplitude: [f32; MAX_SHADER_WAVES],
    pub wavenumber: [f32; MAX_SHADER_WAVES],
    pub omega: [f32; MAX_SHADER_WAVES],
    pub directions: [[f32; 2]; MAX_SHADER_WAVES],
    pub steepness: [f32; MAX_SHADER_WAVES],
    pub tau: f32,
}

impl ShaderWaves {
    /// Snapshot the first [`MAX_SHADER_WAVES`] components of `source`.
    ///
    /// Fails if any per-component series is shorter than the shader arrays.
    pub fn from_source<S: WavefieldSource + ?Sized>(source: &S) -> Result<Self, ConfigError> {
        let available = [
            source.amplitudes().len(),
            source.wavenumbers().len(),
            source.angular_frequencies().len(),
            source.directions().len(),
            source.steepness().len(),
        ]
        .into_iter()
        .min()
        .unwrap_or(0);
        if available < MAX_SHADER_WAVES {
            return Err(ConfigError::TooFewWaves {
                available,
                required: MAX_SHADER_WAVES,
            });
        }
        if source.number() > MAX_SHADER_WAVES {
            tracing::debug!(
                components = source.number(),
                exposed = MAX_SHADER_WAVES,
                "wavefield truncated for the shader"
            );
        }

        let directions = source.directions();
        Ok(Self {
            count: i32::try_from(source.number()).unwrap_or(i32::MAX),
            amplitude: narrow(source.amplitudes()),
            wavenumber: narrow(source.wavenumbers()),
            omega: narrow(source.angular_frequencies()),
            directions: std::array::from_fn(|i| [directions[i].x as f32, directions[i].y as f32]),
            steepness: narrow(source.steepness()),
            tau: source.tau() as f32,
        })
    }
}

/// Leading components as `f32`. Callers check the length first.
fn narrow(values: &[f64]) -> [f32; MAX_SHADER_WAVES] {
    std::array::from_fn(|i| values[i] as f32)
}

/// Texture files sampled by the fragment stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TexturePaths {
    pub bump_map: PathBuf,
    pub cube_map: PathBuf,
}

impl TexturePaths {
    /// The fixed texture locations under the asset's directory.
    pub fn resolve(lookup: &FileLookup, asset_path: &Path) -> Self {
        Self {
            bump_map: lookup.resolve(BUMP_MAP_FILE, asset_path),
            cube_map: lookup.resolve(CUBE_MAP_FILE, asset_path),
        }
    }
}

/// Writes the static ocean uniforms onto a bound material.
#[derive(Debug, Clone)]
pub struct ParameterInitializer {
    waves: ShaderWaves,
    textures: TexturePaths,
}

impl ParameterInitializer {
    pub fn new(waves: ShaderWaves, textures: TexturePaths) -> Self {
        Self { waves, textures }
    }

    pub fn waves(&self) -> &ShaderWaves {
        &self.waves
    }

    pub fn textures(&self) -> &TexturePaths {
        &self.textures
    }

    /// Write every static uniform once. The frame updater only calls this on
    /// its transition into the steady phase.
    pub fn initialize_once(&self, material: &Material) {
        let waves = &self.waves;
        let vs = material.vertex_params();
        vs.set(uniform::WAVE_COUNT, waves.count);
        vs.set(uniform::RESCALE, RESCALE);
        vs.set(uniform::BUMP_SCALE, BUMP_SCALE);
        vs.set(uniform::BUMP_SPEED, BUMP_SPEED);
        vs.set(uniform::AMPLITUDE, waves.amplitude);
        vs.set(uniform::WAVENUMBER, waves.wavenumber);
        vs.set(uniform::OMEGA, waves.omega);
        for (name, direction) in uniform::DIRECTIONS.iter().zip(waves.directions) {
            vs.set(name, direction);
        }
        vs.set(uniform::STEEPNESS, waves.steepness);
        vs.set(uniform::TAU, waves.tau);
        vs.set(uniform::CAMERA_POSITION_OBJECT_SPACE, CAMERA_POSITION_OBJECT_SPACE);

        let fs = material.fragment_params();
        fs.set(uniform::HDR_MULTIPLIER, HDR_MULTIPLIER);
        fs.set(uniform::FRESNEL_POWER, FRESNEL_POWER);
        fs.set(uniform::SHALLOW_COLOR, SHALLOW_COLOR);
        fs.set(uniform::DEEP_COLOR, DEEP_COLOR);
        fs.set(
            uniform::BUMP_MAP,
            ShaderParam::texture(&self.textures.bump_map, TextureKind::Texture2d, BUMP_MAP_UNIT),
        );
        fs.set(
            uniform::CUBE_MAP,
            ShaderParam::texture(&self.textures.cube_map, TextureKind::Cube, CUBE_MAP_UNIT),
        );

        tracing::debug!(
            material = material.name(),
            waves = waves.count,
            "static wave uniforms written"
        );
    }
}
