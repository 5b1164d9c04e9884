use serde::Deserialize;
use wavevisual_common::EntityId;
use wavevisual_kernel::Descriptor;
use wavevisual_wavefield::{WavefieldConfig, WavefieldError};

/// Errors that leave the wave visual permanently inert.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("`wavefield` block is missing")]
    MissingWavefield,
    #[error("`shader` block is missing")]
    MissingShader,
    #[error("descriptor is malformed: {0}")]
    Malformed(#[source] serde_yaml::Error),
    #[error("descriptor must be a mapping of blocks")]
    NotAMapping,
    #[error("`wavefield` block is invalid: {0}")]
    InvalidWavefield(#[source] serde_yaml::Error),
    #[error("`shader` block is invalid: {0}")]
    InvalidShader(#[source] serde_yaml::Error),
    #[error(transparent)]
    Wavefield(#[from] WavefieldError),
    #[error("wavefield has {available} components but the shader needs {required}")]
    TooFewWaves { available: usize, required: usize },
    #[error("entity {0} has no name")]
    MissingName(EntityId),
    #[error("entity {0} is not inside a model with a source file")]
    MissingModelPath(EntityId),
}

/// Shader program URIs as written in the descriptor, before path resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderUris {
    pub vertex: String,
    pub fragment: String,
}

/// Parsed wave visual descriptor.
///
/// ```yaml
/// wavefield:
///   wave:
///     number: 3
///     amplitude: 1.0
///     period: 5.0
/// shader:
///   vertex: materials/programs/GerstnerWaves_vs.glsl
///   fragment: materials/programs/GerstnerWaves_fs.glsl
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WaveVisualConfig {
    pub wavefield: WavefieldConfig,
    /// `None` when the `shader` block lacks `vertex` or `fragment`. That is
    /// reported, but the visual still runs with empty program paths.
    pub shader: Option<ShaderUris>,
}

#[derive(Default, Deserialize)]
struct RawShader {
    vertex: Option<String>,
    fragment: Option<String>,
}

impl WaveVisualConfig {
    /// Parse a descriptor. A block that is present but empty counts as
    /// present and takes defaults.
    pub fn from_descriptor(descriptor: &Descriptor) -> Result<Self, ConfigError> {
        let map = match descriptor {
            // An empty document has no blocks at all.
            Descriptor::Null => return Err(ConfigError::MissingWavefield),
            Descriptor::Mapping(map) => map,
            _ => return Err(ConfigError::NotAMapping),
        };

        let wavefield = map.get("wavefield").ok_or(ConfigError::MissingWavefield)?;
        let shader = map.get("shader").ok_or(ConfigError::MissingShader)?;

        let wavefield: WavefieldConfig = if wavefield.is_null() {
            WavefieldConfig::default()
        } else {
            serde_yaml::from_value(wavefield.clone()).map_err(ConfigError::InvalidWavefield)?
        };
        let shader: RawShader = if shader.is_null() {
            RawShader::default()
        } else {
            serde_yaml::from_value(shader.clone()).map_err(ConfigError::InvalidShader)?
        };

        let shader = match (shader.vertex, shader.fragment) {
            (Some(vertex), Some(fragment)) => Some(ShaderUris { vertex, fragment }),
            _ => None,
        };

        Ok(Self { wavefield, shader })
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Self::from_descriptor(&Descriptor::Null);
        }
        let descriptor: Descriptor = serde_yaml::from_str(text).map_err(ConfigError::Malformed)?;
        Self::from_descriptor(&descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "
wavefield:
  wave:
    number: 3
    amplitude: 1.5
    period: 7.0
shader:
  vertex: materials/programs/waves_vs.glsl
  fragment: materials/programs/waves_fs.glsl
";

    #[test]
    fn parses_full_descriptor() {
        let config = WaveVisualConfig::from_yaml(FULL).unwrap();
        assert_eq!(config.wavefield.wave.number, 3);
        assert_eq!(config.wavefield.wave.amplitude, 1.5);
        assert_eq!(
            config.shader,
            Some(ShaderUris {
                vertex: "materials/programs/waves_vs.glsl".into(),
                fragment: "materials/programs/waves_fs.glsl".into(),
            })
        );
    }

    #[test]
    fn missing_wavefield_is_an_error() {
        let err = WaveVisualConfig::from_yaml("shader:\n  vertex: a\n  fragment: b\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingWavefield));
    }

    #[test]
    fn missing_shader_is_an_error() {
        let err = WaveVisualConfig::from_yaml("wavefield:\n  wave:\n    number: 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingShader));
    }

    #[test]
    fn empty_document_reports_wavefield_first() {
        let err = WaveVisualConfig::from_yaml("").unwrap_err();
        assert!(matches!(err, ConfigError::MissingWavefield));
    }

    #[test]
    fn missing_program_entry_is_not_fatal() {
        let config =
            WaveVisualConfig::from_yaml("wavefield: {}\nshader:\n  vertex: a.glsl\n").unwrap();
        assert!(config.shader.is_none());
    }

    #[test]
    fn empty_wavefield_block_uses_defaults() {
        let config = WaveVisualConfig::from_yaml("wavefield:\nshader: {}\n").unwrap();
        assert_eq!(config.wavefield, WavefieldConfig::default());
        assert!(config.shader.is_none());
    }

    #[test]
    fn bad_wavefield_types_are_reported() {
        let err = WaveVisualConfig::from_yaml(
            "wavefield:\n  wave:\n    number: lots\nshader:\n  vertex: a\n  fragment: b\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWavefield(_)));
    }

    #[test]
    fn non_mapping_descriptor_is_rejected() {
        let err = WaveVisualConfig::from_yaml("- just\n- a list\n").unwrap_err();
        assert!(matches!(err, ConfigError::NotAMapping));
    }

    #[test]
    fn unparsable_yaml_is_malformed() {
        let err = WaveVisualConfig::from_yaml("wavefield: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }
}
