pub mod collect;
pub mod description;
pub mod element;
pub mod surface;

pub use collect::{ElementCollector, SurfaceCollector};
pub use description::DetectorDescription;
pub use element::{ElementData, ElementId, Envelope};
pub use surface::{OutlineParams, SurfaceData, SurfaceId, SurfaceKind, SurfacePatch};

use crate::error::DetectorError;
use slotmap::SlotMap;

/// Central arena that owns the detector element tree and its surfaces.
///
/// Entities reference each other via typed IDs (generational indices),
/// avoiding self-referential structures and enabling safe mutation. The
/// store is passed explicitly to extraction and assembly routines; there
/// is no ambient "current detector".
#[derive(Debug)]
pub struct DetectorStore {
    elements: SlotMap<ElementId, ElementData>,
    surfaces: SlotMap<SurfaceId, SurfaceData>,
    world: ElementId,
}

impl DetectorStore {
    /// Creates a store containing only a world element with the given name.
    #[must_use]
    pub fn new(world_name: &str) -> Self {
        let mut elements = SlotMap::with_key();
        let world = elements.insert(ElementData::new(world_name));
        Self {
            elements,
            surfaces: SlotMap::with_key(),
            world,
        }
    }

    /// Returns the ID of the world (root) element.
    #[must_use]
    pub fn world(&self) -> ElementId {
        self.world
    }

    /// Inserts an element as a child of `parent` and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent is not found in the store.
    pub fn add_element(
        &mut self,
        parent: ElementId,
        data: ElementData,
    ) -> Result<ElementId, DetectorError> {
        if !self.elements.contains_key(parent) {
            return Err(DetectorError::EntityNotFound("element".into()));
        }
        let id = self.elements.insert(data);
        if let Some(p) = self.elements.get_mut(parent) {
            p.children.push(id);
        }
        Ok(id)
    }

    /// Returns a reference to the element data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn element(&self, id: ElementId) -> Result<&ElementData, DetectorError> {
        self.elements
            .get(id)
            .ok_or_else(|| DetectorError::EntityNotFound("element".into()))
    }

    /// Returns a mutable reference to the element data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn element_mut(&mut self, id: ElementId) -> Result<&mut ElementData, DetectorError> {
        self.elements
            .get_mut(id)
            .ok_or_else(|| DetectorError::EntityNotFound("element".into()))
    }

    /// Attaches a surface to `element` and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found in the store.
    pub fn add_surface(
        &mut self,
        element: ElementId,
        data: SurfaceData,
    ) -> Result<SurfaceId, DetectorError> {
        if !self.elements.contains_key(element) {
            return Err(DetectorError::EntityNotFound("element".into()));
        }
        let id = self.surfaces.insert(data);
        if let Some(e) = self.elements.get_mut(element) {
            e.surfaces.push(id);
        }
        Ok(id)
    }

    /// Returns a reference to the surface data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn surface(&self, id: SurfaceId) -> Result<&SurfaceData, DetectorError> {
        self.surfaces
            .get(id)
            .ok_or_else(|| DetectorError::EntityNotFound("surface".into()))
    }

    /// Returns a mutable reference to the surface data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn surface_mut(&mut self, id: SurfaceId) -> Result<&mut SurfaceData, DetectorError> {
        self.surfaces
            .get_mut(id)
            .ok_or_else(|| DetectorError::EntityNotFound("surface".into()))
    }

    /// Number of elements in the store, the world included.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Number of surfaces in the store.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }
}
