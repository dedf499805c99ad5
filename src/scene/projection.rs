use crate::extract::LineSegmentSet;
use crate::math::Point3;

/// A 2D projection of 3D geometry onto a fixed plane, rendered in a
/// secondary view alongside the main 3D scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Azimuthal view looking along the beam axis; z is dropped.
    RPhi,
    /// Longitudinal view: `(z, ±ρ)`, folding the azimuth into the upper
    /// or lower half-plane by the sign of y.
    RhoZ,
}

impl Projection {
    /// Short label used to tag projected set names.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::RPhi => "RPhi",
            Self::RhoZ => "RhoZ",
        }
    }

    /// Projects a single point into the view plane (result z = 0).
    #[must_use]
    pub fn project_point(self, p: &Point3) -> Point3 {
        match self {
            Self::RPhi => Point3::new(p.x, p.y, 0.0),
            Self::RhoZ => {
                let rho = p.x.hypot(p.y);
                let rho = if p.y < 0.0 { -rho } else { rho };
                Point3::new(p.z, rho, 0.0)
            }
        }
    }

    /// Projects a whole set, preserving its colors and marker style.
    #[must_use]
    pub fn project_set(self, set: &LineSegmentSet) -> LineSegmentSet {
        let mut out = LineSegmentSet::new(
            format!("{} [{}]", set.name, self.label()),
            set.color,
        );
        out.marker_color = set.marker_color;
        out.marker_size = set.marker_size;
        out.marker_style = set.marker_style;

        for (start, end) in &set.lines {
            out.add_line(self.project_point(start), self.project_point(end));
        }
        for marker in &set.markers {
            out.add_marker(self.project_point(marker));
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::extract::Color;
    use crate::math::TOLERANCE;

    #[test]
    fn rphi_drops_z() {
        let p = Projection::RPhi.project_point(&Point3::new(1.0, 2.0, 3.0));
        assert!((p - Point3::new(1.0, 2.0, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn rhoz_preserves_radius() {
        let p = Projection::RhoZ.project_point(&Point3::new(3.0, 4.0, 7.0));
        assert!((p - Point3::new(7.0, 5.0, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn rhoz_folds_by_hemisphere() {
        let below = Projection::RhoZ.project_point(&Point3::new(3.0, -4.0, 1.0));
        assert!((below - Point3::new(1.0, -5.0, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn projected_set_keeps_structure_and_style() {
        let mut set = LineSegmentSet::new("SensitiveSurfaces", Color::RED);
        set.add_line(Point3::new(0.0, 0.0, 1.0), Point3::new(1.0, 0.0, 1.0));
        set.add_marker(Point3::new(0.0, 1.0, 2.0));

        let projected = Projection::RPhi.project_set(&set);
        assert_eq!(projected.name, "SensitiveSurfaces [RPhi]");
        assert_eq!(projected.lines.len(), 1);
        assert_eq!(projected.markers.len(), 1);
        assert_eq!(projected.color, Color::RED);
        for (start, end) in &projected.lines {
            assert!(start.z.abs() < TOLERANCE);
            assert!(end.z.abs() < TOLERANCE);
        }
    }
}
