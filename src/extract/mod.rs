use tracing::warn;

use crate::detector::{
    DetectorStore, ElementCollector, ElementId, OutlineParams, SurfaceCollector, SurfaceKind,
};
use crate::error::Result;
use crate::math::Point3;

/// An RGB color tag attached to a line-segment set, components in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const RED: Self = Self::new(0.85, 0.1, 0.1);
    pub const GRAY: Self = Self::new(0.55, 0.55, 0.55);
    pub const LIGHT_GRAY: Self = Self::new(0.75, 0.75, 0.75);
    pub const GREEN: Self = Self::new(0.1, 0.65, 0.1);
    pub const MAGENTA: Self = Self::new(0.8, 0.1, 0.8);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const BLUE: Self = Self::new(0.1, 0.1, 0.85);

    /// Creates a color from RGB components.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Marker glyph used for standalone points in a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerStyle {
    /// Hollow circle.
    #[default]
    OpenCircle,
    /// Filled dot.
    Dot,
}

/// An ordered set of 3D line segments plus optional standalone markers,
/// tagged with a color and marker style.
///
/// A set is fully populated by its extractor before being registered with
/// the display; registration transfers ownership and the set is never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct LineSegmentSet {
    pub name: String,
    pub color: Color,
    pub lines: Vec<(Point3, Point3)>,
    pub markers: Vec<Point3>,
    pub marker_color: Color,
    pub marker_size: f64,
    pub marker_style: MarkerStyle,
}

impl LineSegmentSet {
    /// Creates an empty set with the given name and line color.
    #[must_use]
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            lines: Vec::new(),
            markers: Vec::new(),
            marker_color: color,
            marker_size: 1.0,
            marker_style: MarkerStyle::default(),
        }
    }

    /// Appends one line segment.
    pub fn add_line(&mut self, start: Point3, end: Point3) {
        self.lines.push((start, end));
    }

    /// Appends one standalone marker.
    pub fn add_marker(&mut self, point: Point3) {
        self.markers.push(point);
    }

    /// `true` if the set has neither lines nor markers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.markers.is_empty()
    }
}

/// Selects which per-surface vectors [`ExtractVectors`] emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSelection {
    pub origin: bool,
    pub u: bool,
    pub v: bool,
    pub normal: bool,
}

impl AxisSelection {
    /// Selects nothing.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            origin: false,
            u: false,
            v: false,
            normal: false,
        }
    }

    /// Selects the origin marker and all three basis vectors.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            origin: true,
            u: true,
            v: true,
            normal: true,
        }
    }

    /// Selects the origin marker and the normal vector.
    #[must_use]
    pub const fn origin_and_normal() -> Self {
        Self {
            origin: true,
            normal: true,
            ..Self::none()
        }
    }

    /// Selects the u vector alone.
    #[must_use]
    pub const fn u_only() -> Self {
        Self { u: true, ..Self::none() }
    }

    /// Selects the v vector alone.
    #[must_use]
    pub const fn v_only() -> Self {
        Self { v: true, ..Self::none() }
    }
}

/// Extracts the boundary polylines of all surfaces in a subtree that are
/// visible and similar to a requested kind, as one line-segment set.
pub struct ExtractBoundaries {
    root: ElementId,
    kind: SurfaceKind,
    color: Color,
    name: String,
    params: OutlineParams,
}

impl ExtractBoundaries {
    /// Creates a new `ExtractBoundaries` operation.
    #[must_use]
    pub fn new(root: ElementId, kind: SurfaceKind, color: Color, name: &str) -> Self {
        Self {
            root,
            kind,
            color,
            name: name.into(),
            params: OutlineParams::default(),
        }
    }

    /// Overrides the boundary resolution parameters.
    #[must_use]
    pub fn with_params(mut self, params: OutlineParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the extraction.
    ///
    /// Surfaces that are invisible or whose kind is not similar to the
    /// requested kind are skipped. A surface with an empty boundary
    /// polyline is logged and skipped; it does not fail the extraction.
    /// An empty result set is valid and renders nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if a store lookup fails.
    pub fn execute(&self, store: &DetectorStore) -> Result<LineSegmentSet> {
        let mut set = LineSegmentSet::new(self.name.clone(), self.color);
        set.marker_size = 0.1;

        for id in SurfaceCollector::new(self.root).execute(store)? {
            let surface = store.surface(id)?;
            if !surface.visible || !surface.kind.is_similar(self.kind) {
                continue;
            }

            let lines = surface.boundary_lines(&self.params);
            if lines.is_empty() {
                warn!(set = %self.name, ?id, "empty boundary polyline for surface");
                continue;
            }
            for (start, end) in lines {
                set.add_line(start, end);
            }
        }
        Ok(set)
    }
}

/// Extracts per-surface origin markers and basis-vector segments for all
/// surfaces in a subtree, regardless of kind or visibility.
pub struct ExtractVectors {
    root: ElementId,
    axes: AxisSelection,
    color: Color,
    name: String,
}

impl ExtractVectors {
    /// Creates a new `ExtractVectors` operation.
    #[must_use]
    pub fn new(root: ElementId, axes: AxisSelection, color: Color, name: &str) -> Self {
        Self {
            root,
            axes,
            color,
            name: name.into(),
        }
    }

    /// Executes the extraction.
    ///
    /// For each surface, emits `origin -> origin + u`, `origin -> origin + v`
    /// and `origin -> origin + normal` segments gated by the axis selection,
    /// plus a marker at the origin when selected. Lines share the set color;
    /// markers are always blue open circles.
    ///
    /// # Errors
    ///
    /// Returns an error if a store lookup fails.
    pub fn execute(&self, store: &DetectorStore) -> Result<LineSegmentSet> {
        let mut set = LineSegmentSet::new(self.name.clone(), self.color);
        set.marker_color = Color::BLUE;
        set.marker_style = MarkerStyle::OpenCircle;

        for id in SurfaceCollector::new(self.root).execute(store)? {
            let frame = &store.surface(id)?.frame;
            let origin = *frame.origin();

            if self.axes.u {
                set.add_line(origin, origin + frame.u());
            }
            if self.axes.v {
                set.add_line(origin, origin + frame.v());
            }
            if self.axes.normal {
                set.add_line(origin, origin + frame.normal());
            }
            if self.axes.origin {
                set.add_marker(origin);
            }
        }
        Ok(set)
    }
}

/// Extracts element envelope outlines as the geometry backdrop.
///
/// The walk is bounded by the visualization level; option 1 restricts the
/// outlines to leaf elements.
pub struct ExtractOutlines {
    root: ElementId,
    level: i32,
    visopt: i32,
    color: Color,
}

impl ExtractOutlines {
    /// Creates a new `ExtractOutlines` operation.
    #[must_use]
    pub fn new(root: ElementId, level: i32, visopt: i32) -> Self {
        Self {
            root,
            level,
            visopt,
            color: Color::LIGHT_GRAY,
        }
    }

    /// Executes the extraction; elements without an envelope contribute
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if a store lookup fails.
    pub fn execute(&self, store: &DetectorStore) -> Result<LineSegmentSet> {
        let mut set = LineSegmentSet::new("Geometry", self.color);

        let elements = ElementCollector::new(self.root, self.level, self.visopt == 1)
            .execute(store)?;
        for id in elements {
            if let Some(envelope) = &store.element(id)?.envelope {
                for (start, end) in envelope.edges() {
                    set.add_line(start, end);
                }
            }
        }
        Ok(set)
    }
}
