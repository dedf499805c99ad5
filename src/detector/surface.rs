use bitflags::bitflags;

use crate::math::{Frame, Point3};

slotmap::new_key_type! {
    /// Unique identifier for a surface in the detector store.
    pub struct SurfaceId;
}

bitflags! {
    /// Classification bits for a surface.
    ///
    /// Role bits say what the surface is for, shape bits what it looks
    /// like; a concrete surface usually carries one of each.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SurfaceKind: u32 {
        /// Active detection area.
        const SENSITIVE = 1;
        /// Auxiliary geometric aid.
        const HELPER = 1 << 1;
        /// Planar patch.
        const PLANE = 1 << 2;
        /// Cylindrical band.
        const CYLINDER = 1 << 3;
    }
}

impl SurfaceKind {
    /// Compatibility test used when filtering surfaces for display.
    ///
    /// Holds when every bit set in `requested` is also set in `self`, so
    /// a plain `SENSITIVE` request matches any more specific sensitive
    /// kind, and the empty kind matches everything.
    #[must_use]
    pub fn is_similar(self, requested: Self) -> bool {
        self.contains(requested)
    }
}

/// Parameters controlling boundary polyline resolution.
#[derive(Debug, Clone, Copy)]
pub struct OutlineParams {
    /// Number of chord segments approximating a full circle.
    pub segments: usize,
}

impl Default for OutlineParams {
    fn default() -> Self {
        Self { segments: 100 }
    }
}

/// The bounded extent of a surface within its local frame.
#[derive(Debug, Clone)]
pub enum SurfacePatch {
    /// Rectangular planar patch spanning `±half_u` and `±half_v`.
    Rectangle {
        /// Half-extent along the frame's u direction.
        half_u: f64,
        /// Half-extent along the frame's v direction.
        half_v: f64,
    },
    /// Cylindrical band of the given radius around the frame normal,
    /// spanning `±half_length` along it.
    CylinderBand {
        /// Band radius in the frame's u-v plane.
        radius: f64,
        /// Half-extent along the frame normal.
        half_length: f64,
    },
}

impl SurfacePatch {
    /// The shape bit corresponding to this patch.
    #[must_use]
    pub fn kind_bit(&self) -> SurfaceKind {
        match self {
            Self::Rectangle { .. } => SurfaceKind::PLANE,
            Self::CylinderBand { .. } => SurfaceKind::CYLINDER,
        }
    }
}

/// Data associated with a detector surface.
#[derive(Debug, Clone)]
pub struct SurfaceData {
    /// Classification used when filtering which surfaces are drawn.
    pub kind: SurfaceKind,
    /// Invisible surfaces are never drawn, regardless of kind.
    pub visible: bool,
    /// Local frame: origin and (u, v, normal) basis.
    pub frame: Frame,
    /// Bounded extent within the frame.
    pub patch: SurfacePatch,
}

impl SurfaceData {
    /// Creates a visible surface; the patch's shape bit is added to `kind`.
    #[must_use]
    pub fn new(kind: SurfaceKind, frame: Frame, patch: SurfacePatch) -> Self {
        Self {
            kind: kind | patch.kind_bit(),
            visible: true,
            frame,
            patch,
        }
    }

    /// Returns the boundary polyline as world-space point pairs.
    ///
    /// Rectangles yield their four edges; cylinder bands yield the two
    /// end circles plus four axial connectors. A circle tessellated with
    /// fewer than three segments yields an empty polyline.
    #[must_use]
    pub fn boundary_lines(&self, params: &OutlineParams) -> Vec<(Point3, Point3)> {
        match self.patch {
            SurfacePatch::Rectangle { half_u, half_v } => {
                let corners = [
                    self.frame.point_at(half_u, half_v, 0.0),
                    self.frame.point_at(-half_u, half_v, 0.0),
                    self.frame.point_at(-half_u, -half_v, 0.0),
                    self.frame.point_at(half_u, -half_v, 0.0),
                ];
                (0..4).map(|i| (corners[i], corners[(i + 1) % 4])).collect()
            }
            SurfacePatch::CylinderBand { radius, half_length } => {
                let n = params.segments;
                if n < 3 {
                    return Vec::new();
                }

                let ring = |side: f64| -> Vec<Point3> {
                    (0..n)
                        .map(|i| {
                            #[allow(clippy::cast_precision_loss)]
                            let angle = std::f64::consts::TAU * (i as f64) / (n as f64);
                            self.frame.point_at(
                                radius * angle.cos(),
                                radius * angle.sin(),
                                side * half_length,
                            )
                        })
                        .collect()
                };

                let bottom = ring(-1.0);
                let top = ring(1.0);

                let mut lines = Vec::with_capacity(2 * n + 4);
                for i in 0..n {
                    let j = (i + 1) % n;
                    lines.push((bottom[i], bottom[j]));
                    lines.push((top[i], top[j]));
                }
                // Axial connectors at quarter turns.
                for i in [0, n / 4, n / 2, 3 * n / 4] {
                    lines.push((bottom[i], top[i]));
                }
                lines
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Vector3, TOLERANCE};

    fn xy_frame() -> Frame {
        Frame::new(Point3::origin(), Vector3::x(), Vector3::y()).unwrap()
    }

    #[test]
    fn similar_is_superset_relation() {
        let kind = SurfaceKind::SENSITIVE | SurfaceKind::PLANE;
        assert!(kind.is_similar(SurfaceKind::SENSITIVE));
        assert!(kind.is_similar(SurfaceKind::SENSITIVE | SurfaceKind::PLANE));
        assert!(!kind.is_similar(SurfaceKind::HELPER));
        assert!(!SurfaceKind::SENSITIVE.is_similar(SurfaceKind::SENSITIVE | SurfaceKind::PLANE));
    }

    #[test]
    fn empty_kind_is_similar_to_everything() {
        assert!(SurfaceKind::HELPER.is_similar(SurfaceKind::empty()));
        assert!(SurfaceKind::empty().is_similar(SurfaceKind::empty()));
    }

    #[test]
    fn new_surface_gains_shape_bit() {
        let s = SurfaceData::new(
            SurfaceKind::SENSITIVE,
            xy_frame(),
            SurfacePatch::Rectangle { half_u: 1.0, half_v: 1.0 },
        );
        assert!(s.kind.contains(SurfaceKind::PLANE));
        assert!(s.visible);
    }

    #[test]
    fn rectangle_boundary_has_four_edges() {
        let s = SurfaceData::new(
            SurfaceKind::SENSITIVE,
            xy_frame(),
            SurfacePatch::Rectangle { half_u: 2.0, half_v: 1.0 },
        );
        let lines = s.boundary_lines(&OutlineParams::default());
        assert_eq!(lines.len(), 4);
        let (first, _) = lines[0];
        assert!((first - Point3::new(2.0, 1.0, 0.0)).norm() < TOLERANCE);

        // Closed outline: each edge ends where the next starts.
        for i in 0..4 {
            let (_, end) = lines[i];
            let (start, _) = lines[(i + 1) % 4];
            assert!((end - start).norm() < TOLERANCE);
        }
    }

    #[test]
    fn cylinder_band_boundary_counts() {
        let s = SurfaceData::new(
            SurfaceKind::HELPER,
            Frame::from_normal(Point3::origin(), Vector3::z()).unwrap(),
            SurfacePatch::CylinderBand { radius: 1.0, half_length: 2.0 },
        );
        let params = OutlineParams { segments: 16 };
        let lines = s.boundary_lines(&params);
        assert_eq!(lines.len(), 2 * 16 + 4);

        // All ring points sit at the band radius and at ±half_length.
        for (a, b) in &lines {
            for p in [a, b] {
                assert!((p.x.hypot(p.y) - 1.0).abs() < 1e-9);
                assert!((p.z.abs() - 2.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn degenerate_circle_resolution_yields_empty_boundary() {
        let s = SurfaceData::new(
            SurfaceKind::HELPER,
            Frame::from_normal(Point3::origin(), Vector3::z()).unwrap(),
            SurfacePatch::CylinderBand { radius: 1.0, half_length: 1.0 },
        );
        let lines = s.boundary_lines(&OutlineParams { segments: 2 });
        assert!(lines.is_empty());
    }
}
