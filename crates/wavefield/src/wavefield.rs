use std::f64::consts::PI;
use wavevisual_common::DVec2;

use crate::params::WaveParameters;

/// Gravitational acceleration used by the deep-water dispersion relation (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Upper bound on `number`. Component `n` is scaled by `scale^n`, so past a
/// few dozen components the extremes over- or underflow anyway.
pub const MAX_COMPONENTS: usize = 64;

/// Errors from invalid wave parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WavefieldError {
    #[error("wave number must be at least 1")]
    NoComponents,
    #[error("wave number {number} exceeds the maximum of {max}")]
    TooManyComponents { number: usize, max: usize },
    #[error("wave period must be positive, got {0}")]
    NonPositivePeriod(f64),
    #[error("wave scale must be positive, got {0}")]
    NonPositiveScale(f64),
    #[error("wave direction must be non-zero")]
    ZeroDirection,
}

/// Read-only view of per-component wave parameters.
pub trait WavefieldSource {
    /// Number of wave components.
    fn number(&self) -> usize;
    fn amplitudes(&self) -> &[f64];
    fn wavenumbers(&self) -> &[f64];
    fn angular_frequencies(&self) -> &[f64];
    /// Unit direction of travel per component.
    fn directions(&self) -> &[DVec2];
    fn steepness(&self) -> &[f64];
    /// Phase-shift constant.
    fn tau(&self) -> f64;
}

/// Per-component parameters derived once from [`WaveParameters`].
#[derive(Debug, Clone, PartialEq)]
pub struct Wavefield {
    params: WaveParameters,
    amplitudes: Vec<f64>,
    wavenumbers: Vec<f64>,
    angular_frequencies: Vec<f64>,
    phases: Vec<f64>,
    directions: Vec<DVec2>,
    steepness: Vec<f64>,
}

impl Wavefield {
    pub fn new(params: WaveParameters) -> Result<Self, WavefieldError> {
        if params.number == 0 {
            return Err(WavefieldError::NoComponents);
        }
        if params.number > MAX_COMPONENTS {
            return Err(WavefieldError::TooManyComponents {
                number: params.number,
                max: MAX_COMPONENTS,
            });
        }
        if !(params.period > 0.0) {
            return Err(WavefieldError::NonPositivePeriod(params.period));
        }
        if !(params.scale > 0.0) {
            return Err(WavefieldError::NonPositiveScale(params.scale));
        }
        let mean_direction = DVec2::from_array(params.direction)
            .try_normalize()
            .ok_or(WavefieldError::ZeroDirection)?;

        let mean_omega = 2.0 * PI / params.period;
        let mean_k = omega_to_wavenumber(mean_omega);
        let count = params.number;

        let mut field = Self {
            amplitudes: Vec::with_capacity(count),
            wavenumbers: Vec::with_capacity(count),
            angular_frequencies: Vec::with_capacity(count),
            phases: Vec::with_capacity(count),
            directions: Vec::with_capacity(count),
            steepness: Vec::with_capacity(count),
            params,
        };

        // Components are centred on the mean: n runs from -count/2 upwards.
        // `count <= MAX_COMPONENTS`, so the casts below are lossless.
        for i in 0..count {
            let n = i as i32 - (count / 2) as i32;
            let s = field.params.scale.powi(n);
            let a = s * field.params.amplitude;
            let k = mean_k / s;
            let omega = wavenumber_to_omega(k);
            let q = if a != 0.0 {
                (field.params.steepness / (a * k * count as f64)).min(1.0)
            } else {
                0.0
            };
            let direction = DVec2::from_angle(n as f64 * field.params.angle).rotate(mean_direction);

            field.amplitudes.push(a);
            field.wavenumbers.push(k);
            field.angular_frequencies.push(omega);
            field.phases.push(field.params.phase);
            field.directions.push(direction);
            field.steepness.push(q);
        }

        tracing::debug!(
            components = count,
            mean_wavenumber = mean_k,
            mean_omega,
            "wavefield derived"
        );
        Ok(field)
    }

    pub fn params(&self) -> &WaveParameters {
        &self.params
    }

    pub fn phases(&self) -> &[f64] {
        &self.phases
    }

    /// Mean wavelength in meters.
    pub fn wavelength(&self) -> f64 {
        2.0 * PI / omega_to_wavenumber(2.0 * PI / self.params.period)
    }
}

impl WavefieldSource for Wavefield {
    fn number(&self) -> usize {
        self.params.number
    }

    fn amplitudes(&self) -> &[f64] {
        &self.amplitudes
    }

    fn wavenumbers(&self) -> &[f64] {
        &self.wavenumbers
    }

    fn angular_frequencies(&self) -> &[f64] {
        &self.angular_frequencies
    }

    fn directions(&self) -> &[DVec2] {
        &self.directions
    }

    fn steepness(&self) -> &[f64] {
        &self.steepness
    }

    fn tau(&self) -> f64 {
        self.params.tau
    }
}

/// Deep-water dispersion: ω² = g k.
fn omega_to_wavenumber(omega: f64) -> f64 {
    omega * omega / GRAVITY
}

fn wavenumber_to_omega(k: f64) -> f64 {
    (GRAVITY * k).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn single_component_is_the_mean() {
        let field = Wavefield::new(WaveParameters {
            amplitude: 1.5,
            period: 4.0,
            ..WaveParameters::default()
        })
        .unwrap();
        let omega = 2.0 * PI / 4.0;
        assert_eq!(field.number(), 1);
        assert!(approx(field.amplitudes()[0], 1.5));
        assert!(approx(field.angular_frequencies()[0], omega));
        assert!(approx(field.wavenumbers()[0], omega * omega / GRAVITY));
        assert_eq!(field.directions()[0], DVec2::X);
    }

    #[test]
    fn components_scale_around_the_mean() {
        let field = Wavefield::new(WaveParameters {
            number: 3,
            scale: 2.0,
            amplitude: 1.0,
            ..WaveParameters::default()
        })
        .unwrap();
        let a = field.amplitudes();
        assert!(approx(a[0], 0.5));
        assert!(approx(a[1], 1.0));
        assert!(approx(a[2], 2.0));

        let k = field.wavenumbers();
        assert!(approx(k[0], 2.0 * k[1]));
        assert!(approx(k[2], 0.5 * k[1]));
    }

    #[test]
    fn dispersion_holds_per_component() {
        let field = Wavefield::new(WaveParameters {
            number: 5,
            amplitude: 0.3,
            period: 6.0,
            ..WaveParameters::default()
        })
        .unwrap();
        for (k, omega) in field.wavenumbers().iter().zip(field.angular_frequencies()) {
            assert!(approx(omega * omega, GRAVITY * k));
        }
    }

    #[test]
    fn directions_fan_out_by_angle() {
        let angle = 0.25;
        let field = Wavefield::new(WaveParameters {
            number: 3,
            angle,
            direction: [0.0, 2.0],
            ..WaveParameters::default()
        })
        .unwrap();
        let d = field.directions();
        for dir in d {
            assert!(approx(dir.length(), 1.0));
        }
        assert!(approx(d[1].x, 0.0) && approx(d[1].y, 1.0));
        let heading = |v: DVec2| v.y.atan2(v.x);
        assert!(approx(heading(d[1]) - heading(d[0]), angle));
        assert!(approx(heading(d[2]) - heading(d[1]), angle));
    }

    #[test]
    fn steepness_is_capped_at_one() {
        let field = Wavefield::new(WaveParameters {
            number: 3,
            amplitude: 1e-6,
            steepness: 100.0,
            ..WaveParameters::default()
        })
        .unwrap();
        assert!(field.steepness().iter().all(|q| approx(*q, 1.0)));
    }

    #[test]
    fn zero_amplitude_means_zero_steepness() {
        let field = Wavefield::new(WaveParameters {
            number: 3,
            ..WaveParameters::default()
        })
        .unwrap();
        assert!(field.steepness().iter().all(|q| *q == 0.0));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let zero = WaveParameters {
            number: 0,
            ..WaveParameters::default()
        };
        assert_eq!(Wavefield::new(zero), Err(WavefieldError::NoComponents));

        let still = WaveParameters {
            period: 0.0,
            ..WaveParameters::default()
        };
        assert_eq!(Wavefield::new(still), Err(WavefieldError::NonPositivePeriod(0.0)));

        let nowhere = WaveParameters {
            direction: [0.0, 0.0],
            ..WaveParameters::default()
        };
        assert_eq!(Wavefield::new(nowhere), Err(WavefieldError::ZeroDirection));
    }

    #[test]
    fn component_count_is_capped() {
        let huge = WaveParameters {
            number: usize::MAX,
            ..WaveParameters::default()
        };
        assert_eq!(
            Wavefield::new(huge),
            Err(WavefieldError::TooManyComponents {
                number: usize::MAX,
                max: MAX_COMPONENTS,
            })
        );

        let over = WaveParameters {
            number: MAX_COMPONENTS + 1,
            ..WaveParameters::default()
        };
        assert!(matches!(
            Wavefield::new(over),
            Err(WavefieldError::TooManyComponents { .. })
        ));
    }

    #[test]
    fn largest_allowed_count_is_centred() {
        let field = Wavefield::new(WaveParameters {
            number: MAX_COMPONENTS,
            amplitude: 1.0,
            ..WaveParameters::default()
        })
        .unwrap();
        assert_eq!(field.amplitudes().len(), MAX_COMPONENTS);
        // n runs from -32 to 31; the mean component sits at index 32.
        assert!(approx(field.amplitudes()[MAX_COMPONENTS / 2], 1.0));
        assert!(field.wavenumbers().iter().all(|k| k.is_finite() && *k > 0.0));
    }

    #[test]
    fn tau_passes_through() {
        let field = Wavefield::new(WaveParameters {
            tau: 3.5,
            ..WaveParameters::default()
        })
        .unwrap();
        assert_eq!(field.tau(), 3.5);
    }
}
