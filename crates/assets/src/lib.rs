//! Asset store: owns texture, shader and mesh data in slot maps.
//!
//! Assets are identified by a content hash of the key (path or id) they were
//! registered under. Components and the renderer only ever see handles; an
//! explicit unload invalidates every handle to the asset. Nothing is reference
//! counted and nothing is freed implicitly.

mod data;

pub use data::{BlendMode, MeshData, ShaderKind, ShaderSource, TextureData, Vertex};

use lumen_common::{GpuDataHandle, ShaderHandle, TextureHandle};
use sha2::{Digest, Sha256};
use slotmap::{Key, SlotMap};
use std::collections::BTreeMap;

/// Content-addressed asset id computed from the originating key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub u64);

impl AssetId {
    pub fn from_key(key: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let result = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        Self(u64::from_le_bytes(bytes))
    }
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("texture data is {len} bytes, expected {width}x{height} RGBA")]
    InvalidTexture { width: u32, height: u32, len: usize },
}

struct Entry<T> {
    id: AssetId,
    value: T,
}

/// One kind of asset: slot map plus key index.
pub struct Library<H: Key, T> {
    pool: SlotMap<H, Entry<T>>,
    keys: BTreeMap<AssetId, H>,
}

impl<H: Key, T> Default for Library<H, T> {
    fn default() -> Self {
        Self {
            pool: SlotMap::with_key(),
            keys: BTreeMap::new(),
        }
    }
}

impl<H: Key, T> std::fmt::Debug for Library<H, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("len", &self.pool.len())
            .finish_non_exhaustive()
    }
}

impl<H: Key, T> Library<H, T> {
    /// Register `value` under `key`. A key that is already loaded keeps its
    /// asset and returns the existing handle; `value` is dropped.
    pub fn insert(&mut self, key: &str, value: T) -> H {
        let id = AssetId::from_key(key);
        if let Some(handle) = self.keys.get(&id) {
            tracing::debug!(key, "asset already loaded");
            return *handle;
        }
        let handle = self.pool.insert(Entry { id, value });
        self.keys.insert(id, handle);
        tracing::debug!(key, id = id.0, "asset loaded");
        handle
    }

    pub fn get(&self, handle: H) -> Option<&T> {
        self.pool.get(handle).map(|e| &e.value)
    }

    pub fn find(&self, key: &str) -> Option<H> {
        self.find_id(AssetId::from_key(key))
    }

    /// Look up by content hash, for callers that only kept the id.
    pub fn find_id(&self, id: AssetId) -> Option<H> {
        self.keys.get(&id).copied()
    }

    /// Content hash the asset was registered under.
    pub fn id_of(&self, handle: H) -> Option<AssetId> {
        self.pool.get(handle).map(|e| e.id)
    }

    /// Look up `key`, failing with [`AssetError::NotFound`].
    pub fn require(&self, key: &str) -> Result<H, AssetError> {
        self.find(key)
            .ok_or_else(|| AssetError::NotFound(key.to_string()))
    }

    pub fn contains(&self, handle: H) -> bool {
        self.pool.contains_key(handle)
    }

    /// Drop the asset; `handle` and every copy of it stop resolving.
    pub fn unload(&mut self, handle: H) -> Option<T> {
        let entry = self.pool.remove(handle)?;
        self.keys.remove(&entry.id);
        Some(entry.value)
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (H, &T)> + '_ {
        self.pool.iter().map(|(h, e)| (h, &e.value))
    }
}

/// All loaded assets, grouped by kind.
#[derive(Debug, Default)]
pub struct AssetStore {
    pub textures: Library<TextureHandle, TextureData>,
    pub shaders: Library<ShaderHandle, ShaderSource>,
    pub meshes: Library<GpuDataHandle, MeshData>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of loaded assets of every kind.
    pub fn len(&self) -> usize {
        self.textures.len() + self.shaders.len() + self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
