//! Detector description files.
//!
//! A description is a RON document mirroring the element tree; it is
//! deserialized into plain nodes and then built into a [`DetectorStore`].
//! [`sample`] returns a built-in description so the display is runnable
//! without an input file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DescriptionError, Result};
use crate::math::{Frame, Point3, Vector3};

use super::{
    DetectorStore, ElementData, ElementId, Envelope, SurfaceData, SurfaceKind, SurfacePatch,
};

/// Role of a surface, as written in description files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceRole {
    /// Active detection area.
    Sensitive,
    /// Auxiliary geometric aid.
    Helper,
}

impl SurfaceRole {
    fn kind(self) -> SurfaceKind {
        match self {
            Self::Sensitive => SurfaceKind::SENSITIVE,
            Self::Helper => SurfaceKind::HELPER,
        }
    }
}

/// Serialized form of a surface patch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PatchNode {
    /// Rectangular planar patch.
    Rectangle {
        u_dir: [f64; 3],
        v_dir: [f64; 3],
        half_u: f64,
        half_v: f64,
    },
    /// Cylindrical band around `axis`.
    CylinderBand {
        axis: [f64; 3],
        radius: f64,
        half_length: f64,
    },
}

/// Serialized form of a surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceNode {
    pub role: SurfaceRole,
    #[serde(default = "default_visible")]
    pub visible: bool,
    pub origin: [f64; 3],
    pub patch: PatchNode,
}

fn default_visible() -> bool {
    true
}

/// Serialized form of an element envelope (axis-aligned box).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeNode {
    pub origin: [f64; 3],
    pub half_extents: [f64; 3],
}

/// Serialized form of a detector element and its subtree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementNode {
    pub name: String,
    #[serde(default)]
    pub envelope: Option<EnvelopeNode>,
    #[serde(default)]
    pub surfaces: Vec<SurfaceNode>,
    #[serde(default)]
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            envelope: None,
            surfaces: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// A complete detector description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorDescription {
    pub name: String,
    pub world: ElementNode,
}

impl DetectorDescription {
    /// Loads a description from a RON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(DescriptionError::from)?;
        let description = ron::from_str(&text).map_err(DescriptionError::from)?;
        Ok(description)
    }

    /// Builds a detector store from this description.
    ///
    /// # Errors
    ///
    /// Returns an error if a surface frame is degenerate.
    pub fn build(&self) -> Result<DetectorStore> {
        let mut store = DetectorStore::new(&self.world.name);
        let world = store.world();
        populate(&mut store, world, &self.world)?;
        Ok(store)
    }
}

fn populate(store: &mut DetectorStore, id: ElementId, node: &ElementNode) -> Result<()> {
    if let Some(envelope) = &node.envelope {
        store.element_mut(id)?.envelope = Some(build_envelope(envelope)?);
    }
    for surface in &node.surfaces {
        let data = build_surface(surface)?;
        store.add_surface(id, data)?;
    }
    for child in &node.children {
        let child_id = store.add_element(id, ElementData::new(&child.name))?;
        populate(store, child_id, child)?;
    }
    Ok(())
}

fn build_envelope(node: &EnvelopeNode) -> Result<Envelope> {
    Ok(Envelope {
        frame: Frame::new(point(node.origin), Vector3::x(), Vector3::y())?,
        half_extents: vector(node.half_extents),
    })
}

fn build_surface(node: &SurfaceNode) -> Result<SurfaceData> {
    let origin = point(node.origin);
    let (frame, patch) = match &node.patch {
        PatchNode::Rectangle {
            u_dir,
            v_dir,
            half_u,
            half_v,
        } => (
            Frame::new(origin, vector(*u_dir), vector(*v_dir))?,
            SurfacePatch::Rectangle {
                half_u: *half_u,
                half_v: *half_v,
            },
        ),
        PatchNode::CylinderBand {
            axis,
            radius,
            half_length,
        } => (
            Frame::from_normal(origin, vector(*axis))?,
            SurfacePatch::CylinderBand {
                radius: *radius,
                half_length: *half_length,
            },
        ),
    };

    let mut data = SurfaceData::new(node.role.kind(), frame, patch);
    data.visible = node.visible;
    Ok(data)
}

fn point(a: [f64; 3]) -> Point3 {
    Point3::new(a[0], a[1], a[2])
}

fn vector(a: [f64; 3]) -> Vector3 {
    Vector3::new(a[0], a[1], a[2])
}

/// Returns the built-in sample detector: three barrel layers of
/// rectangular sensitive modules, one helper cylinder per layer.
#[must_use]
pub fn sample() -> DetectorDescription {
    let mut barrel = ElementNode::named("barrel");
    barrel.envelope = Some(EnvelopeNode {
        origin: [0.0, 0.0, 0.0],
        half_extents: [1.0, 1.0, 0.9],
    });

    for layer_index in 0..3u32 {
        let radius = 0.35 + 0.25 * f64::from(layer_index);
        let half_length = 0.5 + 0.15 * f64::from(layer_index);
        let modules = 8 + 4 * layer_index;

        let mut layer = ElementNode::named(format!("layer_{layer_index}"));
        layer.surfaces.push(SurfaceNode {
            role: SurfaceRole::Helper,
            visible: true,
            origin: [0.0, 0.0, 0.0],
            patch: PatchNode::CylinderBand {
                axis: [0.0, 0.0, 1.0],
                radius: radius - 0.03,
                half_length,
            },
        });

        for module_index in 0..modules {
            let phi = std::f64::consts::TAU * f64::from(module_index) / f64::from(modules);
            let (sin, cos) = phi.sin_cos();

            let mut module = ElementNode::named(format!("module_{layer_index}_{module_index}"));
            module.surfaces.push(SurfaceNode {
                role: SurfaceRole::Sensitive,
                visible: true,
                origin: [radius * cos, radius * sin, 0.0],
                patch: PatchNode::Rectangle {
                    u_dir: [-sin, cos, 0.0],
                    v_dir: [0.0, 0.0, 1.0],
                    half_u: 0.1,
                    half_v: half_length,
                },
            });
            layer.children.push(module);
        }
        barrel.children.push(layer);
    }

    let mut world = ElementNode::named("world");
    world.envelope = Some(EnvelopeNode {
        origin: [0.0, 0.0, 0.0],
        half_extents: [1.2, 1.2, 1.1],
    });
    world.children.push(barrel);

    DetectorDescription {
        name: "sample_barrel".into(),
        world,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"(
        name: "test",
        world: (
            name: "world",
            envelope: Some((origin: (0.0, 0.0, 0.0), half_extents: (1.0, 1.0, 1.0))),
            children: [
                (
                    name: "module",
                    surfaces: [
                        (
                            role: Sensitive,
                            origin: (0.5, 0.0, 0.0),
                            patch: Rectangle(
                                u_dir: (0.0, 1.0, 0.0),
                                v_dir: (0.0, 0.0, 1.0),
                                half_u: 0.2,
                                half_v: 0.4,
                            ),
                        ),
                    ],
                ),
            ],
        ),
    )"#;

    #[test]
    fn minimal_description_builds() {
        let description: DetectorDescription = ron::from_str(MINIMAL).unwrap();
        let store = description.build().unwrap();
        assert_eq!(store.element_count(), 2);
        assert_eq!(store.surface_count(), 1);
        assert!(store.element(store.world()).unwrap().envelope.is_some());
    }

    #[test]
    fn visibility_defaults_to_true() {
        let description: DetectorDescription = ron::from_str(MINIMAL).unwrap();
        let store = description.build().unwrap();
        let world = store.element(store.world()).unwrap();
        let module = store.element(world.children[0]).unwrap();
        let surface = store.surface(module.surfaces[0]).unwrap();
        assert!(surface.visible);
        assert!(surface.kind.contains(SurfaceKind::SENSITIVE | SurfaceKind::PLANE));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        assert!(ron::from_str::<DetectorDescription>("(name: oops").is_err());
    }

    #[test]
    fn degenerate_surface_frame_fails_to_build() {
        let description = DetectorDescription {
            name: "bad".into(),
            world: ElementNode {
                surfaces: vec![SurfaceNode {
                    role: SurfaceRole::Sensitive,
                    visible: true,
                    origin: [0.0, 0.0, 0.0],
                    patch: PatchNode::Rectangle {
                        u_dir: [1.0, 0.0, 0.0],
                        v_dir: [2.0, 0.0, 0.0],
                        half_u: 1.0,
                        half_v: 1.0,
                    },
                }],
                ..ElementNode::named("world")
            },
        };
        assert!(description.build().is_err());
    }

    #[test]
    fn sample_detector_builds() {
        let store = sample().build().unwrap();
        // world + barrel + 3 layers + (8 + 12 + 16) modules
        assert_eq!(store.element_count(), 41);
        // one helper per layer + one sensitive per module
        assert_eq!(store.surface_count(), 39);
    }
}
