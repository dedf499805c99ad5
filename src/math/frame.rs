use crate::error::{GeometryError, Result};

use super::{Point3, Vector3, TOLERANCE};

/// A local orthonormal frame attached to a surface.
///
/// Consists of an origin point and three unit basis vectors: `u`, `v`
/// and `normal`, with `normal = u × v`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    origin: Point3,
    u: Vector3,
    v: Vector3,
    normal: Vector3,
}

impl Frame {
    /// Creates a frame from an origin and two direction vectors.
    ///
    /// The directions are normalized; the normal is their cross product.
    ///
    /// # Errors
    ///
    /// Returns an error if either direction is zero-length or the
    /// directions are parallel.
    pub fn new(origin: Point3, u: Vector3, v: Vector3) -> Result<Self> {
        let u_len = u.norm();
        if u_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let v_len = v.norm();
        if v_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }

        let u = u / u_len;
        let v = v / v_len;

        let normal = u.cross(&v);
        let normal_len = normal.norm();
        if normal_len < TOLERANCE {
            return Err(
                GeometryError::Degenerate("frame directions are parallel".into()).into(),
            );
        }
        let normal = normal / normal_len;

        Ok(Self { origin, u, v, normal })
    }

    /// Creates a frame from an origin and a normal vector.
    ///
    /// The `u` and `v` directions are computed automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn from_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / len;

        // Choose a reference vector not parallel to the normal
        let reference = if normal.x.abs() < 0.9 {
            Vector3::new(1.0, 0.0, 0.0)
        } else {
            Vector3::new(0.0, 1.0, 0.0)
        };

        let u = normal.cross(&reference).normalize();
        let v = normal.cross(&u);

        Ok(Self { origin, u, v, normal })
    }

    /// Returns the origin point of the frame.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the U basis vector (unit length).
    #[must_use]
    pub fn u(&self) -> &Vector3 {
        &self.u
    }

    /// Returns the V basis vector (unit length).
    #[must_use]
    pub fn v(&self) -> &Vector3 {
        &self.v
    }

    /// Returns the normal vector (unit length).
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Maps local `(a, b, c)` coordinates into world space:
    /// `origin + a·u + b·v + c·normal`.
    #[must_use]
    pub fn point_at(&self, a: f64, b: f64, c: f64) -> Point3 {
        self.origin + self.u * a + self.v * b + self.normal * c
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn basis_is_orthonormal() {
        let f = Frame::new(
            Point3::new(1.0, 2.0, 3.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(0.0, 3.0, 0.0),
        )
        .unwrap();
        assert!((f.u().norm() - 1.0).abs() < TOLERANCE);
        assert!((f.v().norm() - 1.0).abs() < TOLERANCE);
        assert!(f.u().dot(f.v()).abs() < TOLERANCE);
        assert!((f.normal() - Vector3::z()).norm() < TOLERANCE);
    }

    #[test]
    fn zero_direction_is_rejected() {
        let r = Frame::new(Point3::origin(), Vector3::zeros(), Vector3::y());
        assert!(r.is_err());
    }

    #[test]
    fn parallel_directions_are_rejected() {
        let r = Frame::new(Point3::origin(), Vector3::x(), Vector3::x() * 2.0);
        assert!(r.is_err());
    }

    #[test]
    fn from_normal_builds_perpendicular_basis() {
        let f = Frame::from_normal(Point3::origin(), Vector3::new(0.0, 0.0, 5.0)).unwrap();
        assert!(f.u().dot(f.normal()).abs() < TOLERANCE);
        assert!(f.v().dot(f.normal()).abs() < TOLERANCE);
        assert!(f.u().dot(f.v()).abs() < TOLERANCE);
        assert!((f.normal() - Vector3::z()).norm() < TOLERANCE);
    }

    #[test]
    fn point_at_combines_basis() {
        let f = Frame::new(Point3::new(1.0, 0.0, 0.0), Vector3::x(), Vector3::y()).unwrap();
        let p = f.point_at(2.0, 3.0, 4.0);
        assert!((p - Point3::new(3.0, 3.0, 4.0)).norm() < TOLERANCE);
    }
}
