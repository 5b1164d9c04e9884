use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

static NEXT_MATERIAL_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique material identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u64);

impl MaterialId {
    fn next() -> Self {
        Self(NEXT_MATERIAL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

pub type MaterialHandle = Arc<Material>;

/// Shader stage a parameter set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    Texture2d,
    Cube,
}

/// Value bound to a named shader uniform.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderParam {
    Int(i32),
    Float(f32),
    /// Fixed-length float buffer (vecN or float[N]).
    FloatBuffer(Vec<f32>),
    Texture {
        path: PathBuf,
        kind: TextureKind,
        unit: u32,
    },
}

impl ShaderParam {
    pub fn texture(path: impl Into<PathBuf>, kind: TextureKind, unit: u32) -> Self {
        Self::Texture {
            path: path.into(),
            kind,
            unit,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_floats(&self) -> Option<&[f32]> {
        match self {
            Self::FloatBuffer(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i32> for ShaderParam {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for ShaderParam {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl<const N: usize> From<[f32; N]> for ShaderParam {
    fn from(v: [f32; N]) -> Self {
        Self::FloatBuffer(v.to_vec())
    }
}

impl From<&[f32]> for ShaderParam {
    fn from(v: &[f32]) -> Self {
        Self::FloatBuffer(v.to_vec())
    }
}

impl std::fmt::Display for ShaderParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:.4}"),
            Self::FloatBuffer(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v:.4}")?;
                }
                write!(f, "]")
            }
            Self::Texture { path, kind, unit } => {
                write!(f, "{kind:?}({}) @unit {unit}", path.display())
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    value: ShaderParam,
    writes: u64,
}

/// Named uniform slots for one shader stage.
///
/// Each slot records how many times it was written, so callers can check
/// that one-time parameters really were set once.
#[derive(Debug, Default)]
pub struct ShaderParams {
    slots: Mutex<BTreeMap<String, Slot>>,
}

impl ShaderParams {
    pub fn set(&self, name: &str, value: impl Into<ShaderParam>) {
        let value = value.into();
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        match slots.get_mut(name) {
            Some(slot) => {
                slot.value = value;
                slot.writes = slot.writes.saturating_add(1);
            }
            None => {
                slots.insert(name.to_owned(), Slot { value, writes: 1 });
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<ShaderParam> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(name).map(|s| s.value.clone())
    }

    /// Number of writes to `name` since this parameter set was created.
    pub fn write_count(&self, name: &str) -> u64 {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(name).map_or(0, |s| s.writes)
    }

    /// Slot names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy the current values into a fresh set with zeroed write counters.
    fn duplicate(&self) -> Self {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let copied = slots
            .iter()
            .map(|(name, slot)| {
                (
                    name.clone(),
                    Slot {
                        value: slot.value.clone(),
                        writes: 0,
                    },
                )
            })
            .collect();
        Self {
            slots: Mutex::new(copied),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Programs {
    vertex: PathBuf,
    fragment: PathBuf,
}

/// Shader-backed material with per-stage uniform parameters.
#[derive(Debug)]
pub struct Material {
    id: MaterialId,
    name: String,
    programs: RwLock<Programs>,
    vertex_params: ShaderParams,
    fragment_params: ShaderParams,
    destroyed: AtomicBool,
}

impl Material {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            id: MaterialId::next(),
            name: name.into(),
            programs: RwLock::new(Programs::default()),
            vertex_params: ShaderParams::default(),
            fragment_params: ShaderParams::default(),
            destroyed: AtomicBool::new(false),
        }
    }

    /// Copy shaders and parameters into a new material with a new id.
    pub(crate) fn duplicate(&self) -> Self {
        let programs = self
            .programs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        Self {
            id: MaterialId::next(),
            name: format!("{}_copy", self.name),
            programs: RwLock::new(programs),
            vertex_params: self.vertex_params.duplicate(),
            fragment_params: self.fragment_params.duplicate(),
            destroyed: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> MaterialId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_vertex_shader(&self, path: impl AsRef<Path>) {
        let mut programs = self.programs.write().unwrap_or_else(PoisonError::into_inner);
        programs.vertex = path.as_ref().to_path_buf();
    }

    pub fn set_fragment_shader(&self, path: impl AsRef<Path>) {
        let mut programs = self.programs.write().unwrap_or_else(PoisonError::into_inner);
        programs.fragment = path.as_ref().to_path_buf();
    }

    pub fn vertex_shader(&self) -> PathBuf {
        let programs = self.programs.read().unwrap_or_else(PoisonError::into_inner);
        programs.vertex.clone()
    }

    pub fn fragment_shader(&self) -> PathBuf {
        let programs = self.programs.read().unwrap_or_else(PoisonError::into_inner);
        programs.fragment.clone()
    }

    pub fn vertex_params(&self) -> &ShaderParams {
        &self.vertex_params
    }

    pub fn fragment_params(&self) -> &ShaderParams {
        &self.fragment_params
    }

    pub fn params(&self, stage: ShaderStage) -> &ShaderParams {
        match stage {
            ShaderStage::Vertex => &self.vertex_params,
            ShaderStage::Fragment => &self.fragment_params,
        }
    }

    /// True once the owning scene has destroyed this material.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }

    pub(crate) fn mark_destroyed(&self) {
        self.destroyed.store(true, Ordering::Release);
    }
}
