//! Named registry of backend resource handles

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Kind of a registered resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Indexed triangle mesh
    Mesh,
    /// Point cloud (particle systems)
    PointSet,
    /// Linked shader program
    Material,
    /// Sampled 2D texture
    Texture,
}

/// Opaque handle to a backend resource
///
/// `array_buffer` carries the backend object id for every kind (shader program
/// id for materials, texture id for textures). `element_array_buffer` and
/// `size` are only meaningful for geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    name: String,
    kind: ResourceKind,
    array_buffer: u32,
    element_array_buffer: u32,
    size: u32,
}

impl Resource {
    /// Create a geometry resource
    pub fn geometry(
        name: impl Into<String>,
        kind: ResourceKind,
        array_buffer: u32,
        element_array_buffer: u32,
        size: u32,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            array_buffer,
            element_array_buffer,
            size,
        }
    }

    /// Create a single-id resource (material or texture)
    pub fn object(name: impl Into<String>, kind: ResourceKind, id: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            array_buffer: id,
            element_array_buffer: 0,
            size: 0,
        }
    }

    /// Registered name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resource kind
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Vertex buffer id, or the program/texture id for single-id resources
    pub fn array_buffer(&self) -> u32 {
        self.array_buffer
    }

    /// Index buffer id (geometry only)
    pub fn element_array_buffer(&self) -> u32 {
        self.element_array_buffer
    }

    /// Primitive count (geometry only)
    pub fn size(&self) -> u32 {
        self.size
    }
}

/// Resource errors
///
/// Both variants are fatal at setup: a missing or mistyped asset indicates a
/// build or configuration error, so no recovery is attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// Named resource was never registered
    #[error("Could not find resource \"{0}\"")]
    NotFound(String),

    /// Resource exists but has the wrong kind for the requested use
    #[error("Resource \"{name}\" has kind {found:?}, expected {expected}")]
    TypeMismatch {
        /// Resource name
        name: String,
        /// Kind that was found
        found: ResourceKind,
        /// Human readable description of what was expected
        expected: &'static str,
    },
}

/// Registry of resources by name
#[derive(Debug, Default)]
pub struct ResourceManager {
    resources: HashMap<String, Arc<Resource>>,
    next_id: u32,
}

impl ResourceManager {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            resources: HashMap::new(),
            next_id: 1,
        }
    }

    /// Add a resource that was already loaded by the backend
    ///
    /// Re-registering a name replaces the previous handle.
    pub fn add_resource(&mut self, resource: Resource) -> Arc<Resource> {
        let resource = Arc::new(resource);
        if self
            .resources
            .insert(resource.name().to_string(), Arc::clone(&resource))
            .is_some()
        {
            log::warn!("Resource \"{}\" re-registered, previous handle replaced", resource.name());
        } else {
            log::debug!("Registered {:?} resource \"{}\"", resource.kind(), resource.name());
        }
        resource
    }

    /// Register a resource with freshly allocated placeholder ids.
    ///
    /// Used by headless runs where no graphics backend uploads anything.
    pub fn register_placeholder(&mut self, name: &str, kind: ResourceKind) -> Arc<Resource> {
        let id = self.next_id.max(1);
        self.next_id = id + 2;
        let resource = match kind {
            ResourceKind::Mesh | ResourceKind::PointSet => Resource::geometry(name, kind, id, id + 1, 36),
            ResourceKind::Material | ResourceKind::Texture => Resource::object(name, kind, id),
        };
        self.add_resource(resource)
    }

    /// Get the resource with the specified name
    pub fn get(&self, name: &str) -> Result<Arc<Resource>, ResourceError> {
        self.resources
            .get(name)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(name.to_string()))
    }

    /// Get an optional resource; an empty name means "none requested"
    pub fn get_optional(&self, name: &str) -> Result<Option<Arc<Resource>>, ResourceError> {
        if name.is_empty() {
            Ok(None)
        } else {
            self.get(name).map(Some)
        }
    }

    /// Number of registered resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_resource_is_not_found() {
        let manager = ResourceManager::new();
        assert_eq!(
            manager.get("Orb").unwrap_err(),
            ResourceError::NotFound("Orb".to_string())
        );
    }

    #[test]
    fn test_handles_are_shared_not_copied() {
        let mut manager = ResourceManager::new();
        manager.register_placeholder("Orb", ResourceKind::Mesh);

        let a = manager.get("Orb").unwrap();
        let b = manager.get("Orb").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_placeholder_ids_are_distinct() {
        let mut manager = ResourceManager::new();
        let mesh = manager.register_placeholder("Orb", ResourceKind::Mesh);
        let mat = manager.register_placeholder("ObjectMaterial", ResourceKind::Material);
        assert_ne!(mesh.array_buffer(), mat.array_buffer());
        assert_ne!(mesh.element_array_buffer(), mat.array_buffer());
    }

    #[test]
    fn test_empty_optional_name_is_none() {
        let manager = ResourceManager::new();
        assert_eq!(manager.get_optional("").unwrap(), None);
        assert!(manager.get_optional("Texture1").is_err());
    }
}
