use crate::error::Result;

use super::{DetectorStore, ElementId, SurfaceId};

/// Collects every surface in the subtree under a root element.
///
/// The list is rebuilt on demand for each extraction; it is not cached
/// across redraws.
pub struct SurfaceCollector {
    root: ElementId,
}

impl SurfaceCollector {
    /// Creates a new `SurfaceCollector` query.
    #[must_use]
    pub fn new(root: ElementId) -> Self {
        Self { root }
    }

    /// Executes the query, returning surface IDs in depth-first order:
    /// an element's own surfaces precede those of its children.
    ///
    /// # Errors
    ///
    /// Returns an error if the root or a referenced child is not found.
    pub fn execute(&self, store: &DetectorStore) -> Result<Vec<SurfaceId>> {
        let mut out = Vec::new();
        visit_surfaces(store, self.root, &mut out)?;
        Ok(out)
    }
}

fn visit_surfaces(
    store: &DetectorStore,
    id: ElementId,
    out: &mut Vec<SurfaceId>,
) -> Result<()> {
    let element = store.element(id)?;
    out.extend_from_slice(&element.surfaces);
    for &child in &element.children {
        visit_surfaces(store, child, out)?;
    }
    Ok(())
}

/// Collects elements for the geometry backdrop.
///
/// The walk descends at most `max_depth` levels below the root (the root
/// itself is depth 0); with `leaves_only`, only elements without children
/// are returned.
pub struct ElementCollector {
    root: ElementId,
    max_depth: i32,
    leaves_only: bool,
}

impl ElementCollector {
    /// Creates a new `ElementCollector` query.
    #[must_use]
    pub fn new(root: ElementId, max_depth: i32, leaves_only: bool) -> Self {
        Self {
            root,
            max_depth,
            leaves_only,
        }
    }

    /// Executes the query, returning element IDs in depth-first order.
    ///
    /// # Errors
    ///
    /// Returns an error if the root or a referenced child is not found.
    pub fn execute(&self, store: &DetectorStore) -> Result<Vec<ElementId>> {
        let mut out = Vec::new();
        self.visit(store, self.root, 0, &mut out)?;
        Ok(out)
    }

    fn visit(
        &self,
        store: &DetectorStore,
        id: ElementId,
        depth: i32,
        out: &mut Vec<ElementId>,
    ) -> Result<()> {
        if depth > self.max_depth {
            return Ok(());
        }
        let element = store.element(id)?;
        if !self.leaves_only || element.is_leaf() {
            out.push(id);
        }
        for &child in &element.children {
            self.visit(store, child, depth + 1, out)?;
        }
        Ok(())
    }
}
