use std::sync::Arc;
use std::time::Duration;
use wavevisual_common::EntityId;
use wavevisual_render::{MaterialHandle, NodeHandle, RenderEngine, Scene};

use crate::binder::MaterialBinder;
use crate::initializer::{ParameterInitializer, uniform};
use crate::resolver::EntityResolver;

/// Externally visible progress of a [`FrameUpdater`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FramePhase {
    /// No scene node found for the entity yet.
    Unresolved,
    /// Node found, shader material not attached yet.
    MaterialUnbound,
    /// Material attached, static uniforms not written yet.
    ParametersUnset,
    /// Everything bound; only the time uniform changes from here on.
    Steady,
}

enum FrameState {
    Unresolved,
    MaterialUnbound {
        node: NodeHandle,
    },
    ParametersUnset {
        node: NodeHandle,
        material: MaterialHandle,
    },
    Steady {
        node: NodeHandle,
        material: MaterialHandle,
    },
}

impl FrameState {
    fn phase(&self) -> FramePhase {
        match self {
            Self::Unresolved => FramePhase::Unresolved,
            Self::MaterialUnbound { .. } => FramePhase::MaterialUnbound,
            Self::ParametersUnset { .. } => FramePhase::ParametersUnset,
            Self::Steady { .. } => FramePhase::Steady,
        }
    }
}

enum Transition {
    Advanced(FrameState),
    Stay(FrameState),
}

/// Per-frame driver for one wave visual. Runs on the render thread.
///
/// Each call to [`FrameUpdater::step`] advances through as many phases as
/// the scene allows, so a ready scene reaches `Steady` on the first frame.
/// Phases never go backwards.
pub struct FrameUpdater {
    entity: EntityId,
    engine: RenderEngine,
    scene: Option<Arc<Scene>>,
    binder: MaterialBinder,
    initializer: ParameterInitializer,
    state: FrameState,
}

impl FrameUpdater {
    pub fn new(
        entity: EntityId,
        engine: RenderEngine,
        binder: MaterialBinder,
        initializer: ParameterInitializer,
    ) -> Self {
        Self {
            entity,
            engine,
            scene: None,
            binder,
            initializer,
            state: FrameState::Unresolved,
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn phase(&self) -> FramePhase {
        self.state.phase()
    }

    pub fn node(&self) -> Option<&NodeHandle> {
        match &self.state {
            FrameState::Unresolved => None,
            FrameState::MaterialUnbound { node }
            | FrameState::ParametersUnset { node, .. }
            | FrameState::Steady { node, .. } => Some(node),
        }
    }

    pub fn material(&self) -> Option<&MaterialHandle> {
        match &self.state {
            FrameState::ParametersUnset { material, .. } | FrameState::Steady { material, .. } => {
                Some(material)
            }
            _ => None,
        }
    }

    /// Run one frame with the latest simulation time.
    pub fn step(&mut self, sim_time: Duration) -> FramePhase {
        let _span = tracing::trace_span!("wave_frame", entity = %self.entity).entered();
        let mut state = std::mem::replace(&mut self.state, FrameState::Unresolved);
        loop {
            match self.advance(state) {
                Transition::Advanced(next) => {
                    tracing::debug!(entity = %self.entity, phase = ?next.phase(), "wave visual advanced");
                    state = next;
                }
                Transition::Stay(current) => {
                    state = current;
                    break;
                }
            }
        }

        if let FrameState::Steady { material, .. } = &state {
            // Full-precision seconds; the shader wants the raw value.
            material
                .vertex_params()
                .set(uniform::TIME, sim_time.as_secs_f64() as f32);
        }
        self.state = state;
        self.state.phase()
    }

    fn advance(&mut self, state: FrameState) -> Transition {
        match state {
            FrameState::Unresolved => match self.resolve() {
                Some(node) => Transition::Advanced(FrameState::MaterialUnbound { node }),
                None => Transition::Stay(FrameState::Unresolved),
            },
            FrameState::MaterialUnbound { node } => {
                let bound = self
                    .scene
                    .as_ref()
                    .and_then(|scene| self.binder.bind(scene, &node));
                match bound {
                    Some(material) => {
                        Transition::Advanced(FrameState::ParametersUnset { node, material })
                    }
                    None => Transition::Stay(FrameState::MaterialUnbound { node }),
                }
            }
            FrameState::ParametersUnset { node, material } => {
                self.initializer.initialize_once(&material);
                Transition::Advanced(FrameState::Steady { node, material })
            }
            steady @ FrameState::Steady { .. } => Transition::Stay(steady),
        }
    }

    /// Find the scene (once) and search it for the entity's node.
    fn resolve(&mut self) -> Option<NodeHandle> {
        if self.scene.is_none() {
            self.scene = self.engine.first_scene();
            if self.scene.is_some() {
                tracing::debug!(entity = %self.entity, "scene found");
            }
        }
        let scene = self.scene.as_ref()?;
        let node = EntityResolver::resolve(self.entity, &scene.root());
        if node.is_none() {
            tracing::trace!(entity = %self.entity, "entity node not in scene yet");
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::ShaderPrograms;
    use crate::initializer::{ShaderWaves, TexturePaths};
    use std::path::PathBuf;
    use wavevisual_render::ShaderParam;
    use wavevisual_wavefield::{WaveParameters, Wavefield};

    const ENTITY: EntityId = EntityId(11);

    fn updater(engine: &RenderEngine) -> FrameUpdater {
        let field = Wavefield::new(WaveParameters {
            number: 3,
            amplitude: 1.0,
            ..WaveParameters::default()
        })
        .unwrap();
        let programs = ShaderPrograms {
            vertex: PathBuf::from("/ocean/vs.glsl"),
            fragment: PathBuf::from("/ocean/fs.glsl"),
        };
        FrameUpdater::new(
            ENTITY,
            engine.clone(),
            MaterialBinder::new(programs),
            ParameterInitializer::new(
                ShaderWaves::from_source(&field).unwrap(),
                TexturePaths::default(),
            ),
        )
    }

    fn ocean_scene() -> (Arc<Scene>, NodeHandle) {
        let scene = Arc::new(Scene::new("main"));
        let model = scene.add_node(&scene.root(), "ocean", Some(EntityId(10)));
        let visual = scene.add_node(&model, "ocean_visual", Some(ENTITY));
        (scene, visual)
    }

    #[test]
    fn ready_scene_reaches_steady_on_first_frame() {
        let engine = RenderEngine::new();
        let (scene, visual) = ocean_scene();
        engine.add_scene(scene);

        let mut updater = updater(&engine);
        assert_eq!(updater.step(Duration::ZERO), FramePhase::Steady);
        assert!(Arc::ptr_eq(updater.node().unwrap(), &visual));
        assert!(Arc::ptr_eq(
            updater.material().unwrap(),
            &visual.material().unwrap()
        ));
    }

    #[test]
    fn no_scene_stays_unresolved() {
        let engine = RenderEngine::new();
        let mut updater = updater(&engine);
        for _ in 0..10 {
            assert_eq!(updater.step(Duration::ZERO), FramePhase::Unresolved);
        }
        assert!(updater.node().is_none());
    }

    #[test]
    fn late_scene_is_picked_up() {
        let engine = RenderEngine::new();
        let mut updater = updater(&engine);
        assert_eq!(updater.step(Duration::ZERO), FramePhase::Unresolved);

        let (scene, _) = ocean_scene();
        engine.add_scene(scene);
        assert_eq!(updater.step(Duration::ZERO), FramePhase::Steady);
    }

    #[test]
    fn late_node_is_picked_up() {
        let engine = RenderEngine::new();
        let scene = Arc::new(Scene::new("main"));
        engine.add_scene(scene.clone());
        let mut updater = updater(&engine);
        assert_eq!(updater.step(Duration::ZERO), FramePhase::Unresolved);
        assert_eq!(updater.step(Duration::ZERO), FramePhase::Unresolved);

        scene.add_node(&scene.root(), "ocean_visual", Some(ENTITY));
        assert_eq!(updater.step(Duration::ZERO), FramePhase::Steady);
    }

    #[test]
    fn steady_never_regresses_and_binds_once() {
        let engine = RenderEngine::new();
        let (scene, visual) = ocean_scene();
        engine.add_scene(scene.clone());
        let mut updater = updater(&engine);

        for frame in 0..100u64 {
            let phase = updater.step(Duration::from_millis(frame * 16));
            assert_eq!(phase, FramePhase::Steady);
        }
        assert_eq!(scene.materials_created(), 1);

        let material = visual.material().unwrap();
        let vs = material.vertex_params();
        assert_eq!(vs.write_count(uniform::WAVE_COUNT), 1);
        assert_eq!(vs.write_count(uniform::AMPLITUDE), 1);
        assert_eq!(material.fragment_params().write_count(uniform::CUBE_MAP), 1);
        assert_eq!(vs.write_count(uniform::TIME), 100);
    }

    #[test]
    fn time_uniform_is_seconds() {
        let engine = RenderEngine::new();
        let (scene, visual) = ocean_scene();
        engine.add_scene(scene);
        let mut updater = updater(&engine);

        updater.step(Duration::from_millis(2500));
        let t = visual.material().unwrap().vertex_params().get(uniform::TIME);
        assert_eq!(t, Some(ShaderParam::Float(2.5)));
    }

    #[test]
    fn time_keeps_nanosecond_precision() {
        let engine = RenderEngine::new();
        let (scene, visual) = ocean_scene();
        engine.add_scene(scene);
        let mut updater = updater(&engine);

        updater.step(Duration::new(1, 500_000));
        let t = visual
            .material()
            .unwrap()
            .vertex_params()
            .get(uniform::TIME)
            .and_then(|p| p.as_float())
            .unwrap();
        assert!((t - 1.0005).abs() < 1e-6);
    }

    #[test]
    fn node_added_to_cached_scene_resolves() {
        let engine = RenderEngine::new();
        let first = Arc::new(Scene::new("first"));
        engine.add_scene(first.clone());
        let mut updater = updater(&engine);
        updater.step(Duration::ZERO);

        first.add_node(&first.root(), "ocean_visual", Some(ENTITY));
        assert_eq!(updater.step(Duration::ZERO), FramePhase::Steady);
    }

    #[test]
    fn phases_are_ordered() {
        assert!(FramePhase::Unresolved < FramePhase::MaterialUnbound);
        assert!(FramePhase::MaterialUnbound < FramePhase::ParametersUnset);
        assert!(FramePhase::ParametersUnset < FramePhase::Steady);
    }
}
