use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use wavevisual_common::EntityId;
use wavevisual_render::SceneNode;

/// Finds the scene node that renders a given entity.
pub struct EntityResolver;

impl EntityResolver {
    /// Breadth-first search from `root` for the first node tagged with
    /// `entity`. Shallower matches win; within a depth, earlier children win.
    ///
    /// `None` means the node does not exist yet, not that it never will.
    pub fn resolve<N: SceneNode>(entity: EntityId, root: &Arc<N>) -> Option<Arc<N>> {
        let mut queue = VecDeque::from([Arc::clone(root)]);
        let mut visited = HashSet::new();
        while let Some(node) = queue.pop_front() {
            if !visited.insert(Arc::as_ptr(&node)) {
                continue;
            }
            if node.entity_tag() == Some(entity) {
                return Some(node);
            }
            queue.extend(node.children());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use wavevisual_render::Scene;

    #[test]
    fn finds_single_match() {
        let scene = Scene::new("test");
        let root = scene.root();
        let model = scene.add_node(&root, "model", Some(EntityId(1)));
        let link = scene.add_node(&model, "link", Some(EntityId(2)));
        let visual = scene.add_node(&link, "visual", Some(EntityId(3)));

        let found = EntityResolver::resolve(EntityId(3), &root).unwrap();
        assert!(Arc::ptr_eq(&found, &visual));
    }

    #[test]
    fn no_match_is_none() {
        let scene = Scene::new("test");
        let root = scene.root();
        scene.add_node(&root, "model", Some(EntityId(1)));
        assert!(EntityResolver::resolve(EntityId(99), &root).is_none());
    }

    #[test]
    fn untagged_root_alone_is_none() {
        let scene = Scene::new("empty");
        assert!(EntityResolver::resolve(EntityId(1), &scene.root()).is_none());
    }

    #[test]
    fn shallowest_match_wins() {
        let scene = Scene::new("test");
        let root = scene.root();
        // Depth-first would find the deep node under the first branch.
        let branch = scene.add_node(&root, "branch", None);
        scene.add_node(&branch, "deep", Some(EntityId(7)));
        let shallow = scene.add_node(&root, "shallow", Some(EntityId(7)));

        let found = EntityResolver::resolve(EntityId(7), &root).unwrap();
        assert!(Arc::ptr_eq(&found, &shallow));
    }

    #[test]
    fn leftmost_match_wins_within_depth() {
        let scene = Scene::new("test");
        let root = scene.root();
        let first = scene.add_node(&root, "first", Some(EntityId(7)));
        scene.add_node(&root, "second", Some(EntityId(7)));

        let found = EntityResolver::resolve(EntityId(7), &root).unwrap();
        assert!(Arc::ptr_eq(&found, &first));
    }

    #[test]
    fn deep_chain_is_searched() {
        let scene = Scene::new("deep");
        let mut parent = scene.root();
        for _ in 0..1_000 {
            parent = scene.add_node(&parent, "link", None);
        }
        let target = scene.add_node(&parent, "visual", Some(EntityId(5)));
        let found = EntityResolver::resolve(EntityId(5), &scene.root()).unwrap();
        assert!(Arc::ptr_eq(&found, &target));
    }

    struct CyclicNode {
        tag: Option<EntityId>,
        children: Mutex<Vec<Arc<CyclicNode>>>,
    }

    impl SceneNode for CyclicNode {
        fn entity_tag(&self) -> Option<EntityId> {
            self.tag
        }

        fn children(&self) -> Vec<Arc<Self>> {
            self.children.lock().unwrap().clone()
        }
    }

    #[test]
    fn cycle_terminates() {
        let a = Arc::new(CyclicNode {
            tag: None,
            children: Mutex::new(Vec::new()),
        });
        let b = Arc::new(CyclicNode {
            tag: None,
            children: Mutex::new(vec![a.clone()]),
        });
        a.children.lock().unwrap().push(b.clone());
        assert!(EntityResolver::resolve(EntityId(1), &a).is_none());
        // Break the cycle so the test does not leak.
        a.children.lock().unwrap().clear();
    }
}
