use crate::math::{Frame, Point3, Vector3};

use super::SurfaceId;

slotmap::new_key_type! {
    /// Unique identifier for an element in the detector store.
    pub struct ElementId;
}

/// A box-shaped envelope drawn as the geometry backdrop of an element.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Local frame of the box, origin at the box center.
    pub frame: Frame,
    /// Half-extents along the frame's u, v and normal directions.
    pub half_extents: Vector3,
}

impl Envelope {
    /// Returns the 12 edges of the box as world-space point pairs.
    #[must_use]
    pub fn edges(&self) -> Vec<(Point3, Point3)> {
        let h = &self.half_extents;
        let corner = |a: f64, b: f64, c: f64| self.frame.point_at(a * h.x, b * h.y, c * h.z);

        let mut edges = Vec::with_capacity(12);
        for &a in &[-1.0, 1.0] {
            for &b in &[-1.0, 1.0] {
                edges.push((corner(-1.0, a, b), corner(1.0, a, b)));
                edges.push((corner(a, -1.0, b), corner(a, 1.0, b)));
                edges.push((corner(a, b, -1.0), corner(a, b, 1.0)));
            }
        }
        edges
    }
}

/// Data associated with a detector element.
///
/// Elements form a tree rooted at the world element; each element may
/// carry surfaces and an optional envelope.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Human-readable element name.
    pub name: String,
    /// Optional box envelope for the geometry backdrop.
    pub envelope: Option<Envelope>,
    /// Surfaces attached to this element.
    pub surfaces: Vec<SurfaceId>,
    /// Child elements.
    pub children: Vec<ElementId>,
}

impl ElementData {
    /// Creates an element with the given name and no envelope.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            envelope: None,
            surfaces: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates an element with an envelope.
    #[must_use]
    pub fn with_envelope(name: impl Into<String>, envelope: Envelope) -> Self {
        Self {
            envelope: Some(envelope),
            ..Self::new(name)
        }
    }

    /// `true` if the element has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    #[test]
    fn box_has_twelve_edges() {
        let envelope = Envelope {
            frame: Frame::new(Point3::origin(), Vector3::x(), Vector3::y()).unwrap(),
            half_extents: Vector3::new(1.0, 2.0, 3.0),
        };
        let edges = envelope.edges();
        assert_eq!(edges.len(), 12);

        // Every edge endpoint lies on a corner of the box.
        for (a, b) in &edges {
            for p in [a, b] {
                assert!((p.x.abs() - 1.0).abs() < TOLERANCE);
                assert!((p.y.abs() - 2.0).abs() < TOLERANCE);
                assert!((p.z.abs() - 3.0).abs() < TOLERANCE);
            }
        }
    }

    #[test]
    fn leaf_has_no_children() {
        let e = ElementData::new("module");
        assert!(e.is_leaf());
    }
}
