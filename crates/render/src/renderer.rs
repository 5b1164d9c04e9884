use std::fmt::Write as _;

use crate::material::ShaderParams;
use crate::node::Node;
use crate::scene::Scene;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene graph and produces output. It never mutates
/// nodes or materials; those are owned by the systems that bind them.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene.
    fn render(&self, scene: &Scene) -> Self::Output;
}

/// Debug text renderer.
///
/// Produces an indented listing of the scene graph with every attached
/// material's shaders and uniform values. Used by the CLI and in tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Scene '{}' (materials live={}, created={}) ===",
            scene.name(),
            scene.live_material_count(),
            scene.materials_created()
        );
        // Explicit stack instead of recursion; deep graphs stay off the call stack.
        let mut stack = vec![(scene.root(), 0usize)];
        while let Some((node, depth)) = stack.pop() {
            write_node(&mut out, &node, depth);
            for i in (0..node.child_count()).rev() {
                if let Some(child) = node.child(i) {
                    stack.push((child, depth + 1));
                }
            }
        }
        out
    }
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = write!(out, "{indent}- {}", node.name());
    if let Some(entity) = node.entity() {
        let _ = write!(out, " [entity {entity}]");
    }
    let _ = writeln!(out);

    let Some(material) = node.material() else {
        return;
    };
    let _ = writeln!(
        out,
        "{indent}  material {} vs={} fs={}",
        material.name(),
        material.vertex_shader().display(),
        material.fragment_shader().display()
    );
    write_params(out, &indent, "vs", material.vertex_params());
    write_params(out, &indent, "fs", material.fragment_params());
}

fn write_params(out: &mut String, indent: &str, stage: &str, params: &ShaderParams) {
    for name in params.names() {
        if let Some(value) = params.get(&name) {
            let _ = writeln!(out, "{indent}    {stage}.{name} = {value}");
        }
    }
}
