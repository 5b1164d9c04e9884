use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

type Callback = Arc<dyn Fn() + Send + Sync>;

/// A callback plus the switch its [`Connection`] turns off on drop.
#[derive(Clone)]
struct Subscriber {
    callback: Callback,
    enabled: Arc<AtomicBool>,
}

#[derive(Default)]
struct Slots {
    next_id: u64,
    scene_update: BTreeMap<u64, Subscriber>,
}

/// Routes the renderer's per-frame `SceneUpdate` event to subscribed systems.
///
/// Cloning is cheap and every clone shares the same subscriber list, so the
/// simulation side can hand a clone to the render thread.
#[derive(Clone, Default)]
pub struct EventManager {
    slots: Arc<Mutex<Slots>>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to `SceneUpdate`. The callback runs on whichever thread calls
    /// [`EventManager::emit_scene_update`] and stays subscribed until the
    /// returned connection is dropped.
    #[must_use = "dropping the connection unsubscribes the callback"]
    pub fn connect_scene_update<F>(&self, callback: F) -> Connection
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.next_id += 1;
        let id = slots.next_id;
        let enabled = Arc::new(AtomicBool::new(true));
        slots.scene_update.insert(
            id,
            Subscriber {
                callback: Arc::new(callback),
                enabled: Arc::clone(&enabled),
            },
        );
        tracing::debug!(id, "scene update subscriber connected");
        Connection {
            id,
            enabled,
            slots: Arc::downgrade(&self.slots),
        }
    }

    /// Fire `SceneUpdate` once. Returns the number of callbacks invoked.
    ///
    /// Callbacks run outside the lock. A subscriber whose connection is
    /// dropped while the emit is in flight is skipped if it has not started
    /// yet; a callback already running is allowed to finish.
    pub fn emit_scene_update(&self) -> usize {
        let subscribers: Vec<Subscriber> = {
            let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.scene_update.values().cloned().collect()
        };
        let mut invoked = 0;
        for subscriber in &subscribers {
            if subscriber.enabled.load(Ordering::Acquire) {
                (subscriber.callback)();
                invoked += 1;
            }
        }
        invoked
    }

    pub fn subscriber_count(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.scene_update.len()
    }
}

/// Subscription handle. Unsubscribes on drop.
pub struct Connection {
    id: u64,
    enabled: Arc<AtomicBool>,
    slots: Weak<Mutex<Slots>>,
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.enabled.store(false, Ordering::Release);
        if let Some(slots) = self.slots.upgrade() {
            let mut slots = slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.scene_update.remove(&self.id);
            tracing::debug!(id = self.id, "scene update subscriber disconnected");
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection").field("id", &self.id).finish()
    }
}
