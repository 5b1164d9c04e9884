use std::sync::{Arc, Mutex, PoisonError};
use wavevisual_common::EntityId;
use wavevisual_ecs::ComponentStore;
use wavevisual_kernel::{Connection, Descriptor, EventManager, System, UpdateInfo};
use wavevisual_render::RenderEngine;
use wavevisual_wavefield::Wavefield;

use crate::binder::{MaterialBinder, ShaderPrograms};
use crate::clock::ClockBridge;
use crate::config::{ConfigError, WaveVisualConfig};
use crate::initializer::{ParameterInitializer, ShaderWaves, TexturePaths};
use crate::lookup::FileLookup;
use crate::updater::{FramePhase, FrameUpdater};

/// State reachable from both the simulation and the render thread.
#[derive(Default)]
struct Shared {
    clock: ClockBridge,
    /// Only the render callback locks this; `None` while inert.
    updater: Mutex<Option<FrameUpdater>>,
}

impl Shared {
    fn on_scene_update(&self) {
        let sim_time = self.clock.read_time();
        let mut updater = self.updater.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(updater) = updater.as_mut() {
            updater.step(sim_time);
        }
    }
}

/// Ocean wave visual system.
///
/// Configured against the visual entity of an ocean model. On configure it
/// parses the descriptor, derives the wavefield, resolves shader and texture
/// paths, and subscribes to the render thread's `SceneUpdate` event. Any
/// configuration error is logged and leaves the system inert.
pub struct WaveVisual {
    engine: RenderEngine,
    lookup: FileLookup,
    shared: Arc<Shared>,
    connection: Option<Connection>,
}

impl WaveVisual {
    pub fn new(engine: RenderEngine, lookup: FileLookup) -> Self {
        Self {
            engine,
            lookup,
            shared: Arc::default(),
            connection: None,
        }
    }

    /// Whether configuration succeeded and the render hook is connected.
    pub fn is_active(&self) -> bool {
        self.connection.is_some()
    }

    /// Current frame phase, `None` while inert.
    pub fn phase(&self) -> Option<FramePhase> {
        let updater = self.shared.updater.lock().unwrap_or_else(PoisonError::into_inner);
        updater.as_ref().map(FrameUpdater::phase)
    }

    pub fn clock(&self) -> &ClockBridge {
        &self.shared.clock
    }

    fn build_updater(
        &self,
        entity: EntityId,
        descriptor: &Descriptor,
        ecm: &ComponentStore,
    ) -> Result<FrameUpdater, ConfigError> {
        let config = WaveVisualConfig::from_descriptor(descriptor)?;
        let wavefield = Wavefield::new(config.wavefield.wave)?;
        let waves = ShaderWaves::from_source(&wavefield)?;

        let asset_path = ecm
            .top_level_model(entity)
            .and_then(|model| ecm.get_source_file_path(model))
            .ok_or(ConfigError::MissingModelPath(entity))?;

        let programs = match &config.shader {
            Some(uris) => ShaderPrograms {
                vertex: self.lookup.resolve(&uris.vertex, asset_path),
                fragment: self.lookup.resolve(&uris.fragment, asset_path),
            },
            None => {
                tracing::error!(%entity, "`shader` must have `vertex` and `fragment` entries");
                ShaderPrograms::default()
            }
        };

        match ecm.get_name(entity) {
            Some(name) if !name.0.is_empty() => {
                tracing::debug!(%entity, name = %name.0, "wave visual target");
            }
            _ => return Err(ConfigError::MissingName(entity)),
        }

        let textures = TexturePaths::resolve(&self.lookup, asset_path);
        Ok(FrameUpdater::new(
            entity,
            self.engine.clone(),
            MaterialBinder::new(programs),
            ParameterInitializer::new(waves, textures),
        ))
    }
}

impl System for WaveVisual {
    fn configure(
        &mut self,
        entity: EntityId,
        descriptor: &Descriptor,
        ecm: &ComponentStore,
        events: &EventManager,
    ) {
        let _span = tracing::info_span!("wave_visual_configure", %entity).entered();
        let updater = match self.build_updater(entity, descriptor, ecm) {
            Ok(updater) => updater,
            Err(e) => {
                tracing::error!(%entity, "wave visual disabled: {e}");
                return;
            }
        };

        *self.shared.updater.lock().unwrap_or_else(PoisonError::into_inner) = Some(updater);
        let shared = Arc::clone(&self.shared);
        self.connection = Some(events.connect_scene_update(move || shared.on_scene_update()));
        tracing::info!(%entity, "wave visual configured");
    }

    fn pre_update(&mut self, info: &UpdateInfo, _ecm: &mut ComponentStore) {
        self.shared.clock.set_time(info.sim_time);
    }
}
