use std::path::PathBuf;
use std::sync::Arc;
use wavevisual_render::{MaterialHandle, NodeHandle, Scene};

/// Resolved vertex and fragment program paths. Either may be empty when the
/// descriptor did not name it or the file could not be found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderPrograms {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

/// Creates the shader material and attaches it to a node.
#[derive(Debug, Clone)]
pub struct MaterialBinder {
    programs: ShaderPrograms,
}

impl MaterialBinder {
    pub fn new(programs: ShaderPrograms) -> Self {
        Self { programs }
    }

    pub fn programs(&self) -> &ShaderPrograms {
        &self.programs
    }

    /// Attach a new shader material to `node` and return the node's
    /// effective material.
    ///
    /// Attaching may copy the material, so the returned handle is read back
    /// from the node. The locally created one is destroyed unless the node
    /// holds that very instance. Shader paths are not checked here, compile
    /// errors surface in the renderer.
    pub fn bind(&self, scene: &Scene, node: &NodeHandle) -> Option<MaterialHandle> {
        let transient = scene.create_material();
        transient.set_vertex_shader(&self.programs.vertex);
        transient.set_fragment_shader(&self.programs.fragment);
        node.set_material(&transient);

        let attached = node.material();
        let shared = attached
            .as_ref()
            .is_some_and(|material| Arc::ptr_eq(material, &transient));
        if !shared {
            scene.destroy_material(&transient);
        }
        if let Some(material) = &attached {
            tracing::debug!(
                node = node.name(),
                material = material.name(),
                vertex = %self.programs.vertex.display(),
                fragment = %self.programs.fragment.display(),
                "shader material bound"
            );
        }
        attached
    }
}
