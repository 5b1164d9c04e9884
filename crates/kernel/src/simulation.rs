use std::time::Duration;
use wavevisual_common::EntityId;
use wavevisual_ecs::ComponentStore;

use crate::events::EventManager;

/// Plugin configuration block handed to a system at configure time.
pub type Descriptor = serde_yaml::Value;

/// Timing information passed to every system on each simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateInfo {
    /// Total simulated time since the simulation started.
    pub sim_time: Duration,
    /// Step size of the current iteration.
    pub dt: Duration,
    /// Number of unpaused iterations run so far.
    pub iterations: u64,
    pub paused: bool,
}

/// A simulation system. Both hooks run on the simulation thread.
///
/// Systems that need to do rendering work subscribe to the render-side
/// `SceneUpdate` event in `configure` and do that work in the callback.
pub trait System: Send {
    /// Called once when the system is attached to `entity`.
    fn configure(
        &mut self,
        _entity: EntityId,
        _descriptor: &Descriptor,
        _ecm: &ComponentStore,
        _events: &EventManager,
    ) {
    }

    /// Called once per simulation step, before physics.
    fn pre_update(&mut self, _info: &UpdateInfo, _ecm: &mut ComponentStore) {}
}

/// Fixed-step simulation driver owning the component store and systems.
pub struct Simulation {
    ecm: ComponentStore,
    events: EventManager,
    systems: Vec<Box<dyn System>>,
    info: UpdateInfo,
}

impl Simulation {
    pub fn new(ecm: ComponentStore, dt: Duration) -> Self {
        Self {
            ecm,
            events: EventManager::new(),
            systems: Vec::new(),
            info: UpdateInfo {
                dt,
                ..UpdateInfo::default()
            },
        }
    }

    /// Configure `system` against `entity` and add it to the step loop.
    pub fn add_system(
        &mut self,
        entity: EntityId,
        descriptor: &Descriptor,
        mut system: Box<dyn System>,
    ) {
        let _span = tracing::debug_span!("configure_system", %entity).entered();
        system.configure(entity, descriptor, &self.ecm, &self.events);
        self.systems.push(system);
    }

    /// Drop every system. Their event connections are released with them.
    pub fn clear_systems(&mut self) {
        self.systems.clear();
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Advance one step and run every system's `pre_update`.
    pub fn step(&mut self) -> UpdateInfo {
        if !self.info.paused {
            self.info.iterations += 1;
            self.info.sim_time += self.info.dt;
        }
        let info = self.info;
        tracing::trace!(iterations = info.iterations, sim_time = ?info.sim_time, "step");
        for system in &mut self.systems {
            system.pre_update(&info, &mut self.ecm);
        }
        info
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.info.paused = paused;
    }

    pub fn info(&self) -> UpdateInfo {
        self.info
    }

    /// Event manager shared with the render side.
    pub fn events(&self) -> &EventManager {
        &self.events
    }

    pub fn ecm(&self) -> &ComponentStore {
        &self.ecm
    }

    pub fn ecm_mut(&mut self) -> &mut ComponentStore {
        &mut self.ecm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recorder {
        seen: Arc<Mutex<Vec<UpdateInfo>>>,
    }

    impl System for Recorder {
        fn pre_update(&mut self, info: &UpdateInfo, _ecm: &mut ComponentStore) {
            self.seen.lock().unwrap().push(*info);
        }
    }

    #[test]
    fn step_advances_time() {
        let mut sim = Simulation::new(ComponentStore::new(), Duration::from_millis(10));
        sim.step();
        sim.step();
        sim.step();
        assert_eq!(sim.info().iterations, 3);
        assert_eq!(sim.info().sim_time, Duration::from_millis(30));
    }

    #[test]
    fn paused_step_keeps_time() {
        let mut sim = Simulation::new(ComponentStore::new(), Duration::from_millis(10));
        sim.step();
        sim.set_paused(true);
        let info = sim.step();
        assert!(info.paused);
        assert_eq!(info.iterations, 1);
        assert_eq!(info.sim_time, Duration::from_millis(10));
    }

    #[test]
    fn systems_see_every_step() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut sim = Simulation::new(ComponentStore::new(), Duration::from_millis(1));
        let entity = sim.ecm_mut().spawn();
        sim.add_system(
            entity,
            &Descriptor::Null,
            Box::new(Recorder { seen: seen.clone() }),
        );
        for _ in 0..5 {
            sim.step();
        }
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[4].sim_time, Duration::from_millis(5));
    }

    #[test]
    fn clear_systems_releases_connections() {
        struct Subscriber(Option<crate::Connection>);
        impl System for Subscriber {
            fn configure(
                &mut self,
                _entity: EntityId,
                _descriptor: &Descriptor,
                _ecm: &ComponentStore,
                events: &EventManager,
            ) {
                self.0 = Some(events.connect_scene_update(|| {}));
            }
        }

        let mut sim = Simulation::new(ComponentStore::new(), Duration::from_millis(1));
        let entity = sim.ecm_mut().spawn();
        sim.add_system(entity, &Descriptor::Null, Box::new(Subscriber(None)));
        assert_eq!(sim.events().subscriber_count(), 1);
        sim.clear_systems();
        assert_eq!(sim.events().subscriber_count(), 0);
    }
}
