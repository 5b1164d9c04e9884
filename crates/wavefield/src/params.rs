use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Mean sea state the individual wave components are derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveParameters {
    /// Number of wave components.
    pub number: usize,

    /// Geometric ratio between neighbouring components' amplitude and wavelength.
    pub scale: f64,

    /// Angle in radians between neighbouring components' directions.
    pub angle: f64,

    /// Overall steepness, shared out across all components.
    pub steepness: f64,

    /// Mean wave amplitude in meters.
    pub amplitude: f64,

    /// Mean wave period in seconds.
    pub period: f64,

    /// Mean wave phase in radians.
    pub phase: f64,

    /// Mean direction of travel. Normalized on use.
    pub direction: [f64; 2],

    /// Phase-shift constant handed to the shader.
    pub tau: f64,
}

impl Default for WaveParameters {
    fn default() -> Self {
        Self {
            number: 1,
            scale: 2.0,
            angle: 2.0 * PI / 10.0,
            steepness: 1.0,
            amplitude: 0.0,
            period: 1.0,
            phase: 0.0,
            direction: [1.0, 0.0],
            tau: 2.0,
        }
    }
}

/// The `wavefield` configuration block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WavefieldConfig {
    pub wave: WaveParameters,
}
