pub mod projection;

pub use projection::Projection;

use tracing::info;

use crate::config::ViewConfig;
use crate::detector::{DetectorStore, SurfaceKind};
use crate::error::Result;
use crate::extract::{
    AxisSelection, Color, ExtractBoundaries, ExtractOutlines, ExtractVectors, LineSegmentSet,
};

/// Sink for assembled scene content, implemented by the display layer.
///
/// Registering a set transfers ownership to the display, which renders it
/// as-is; registration order determines draw order only.
pub trait SceneSink {
    /// Registers a set as a global element of the main 3D scene.
    fn add_global(&mut self, set: LineSegmentSet);

    /// Imports a set into the azimuthal (R-φ) projected view.
    fn import_rphi(&mut self, set: LineSegmentSet);

    /// Imports a set into the longitudinal (ρ-Z) projected view.
    fn import_rhoz(&mut self, set: LineSegmentSet);
}

/// Extracts all display content from the detector and registers it with
/// the sink.
///
/// The main scene receives the geometry backdrop, the sensitive and helper
/// boundary sets, and three basis-vector overlays; the two projected views
/// receive the boundary sets only. Sets are never merged.
///
/// # Errors
///
/// Returns an error if an extraction fails; failures inside the sink are
/// the display layer's to signal.
pub fn assemble(
    store: &DetectorStore,
    config: &ViewConfig,
    sink: &mut impl SceneSink,
) -> Result<()> {
    let world = store.world();

    let outlines = ExtractOutlines::new(world, config.level, config.visopt).execute(store)?;
    let sensitive =
        ExtractBoundaries::new(world, SurfaceKind::SENSITIVE, Color::RED, "SensitiveSurfaces")
            .execute(store)?;
    let helper = ExtractBoundaries::new(world, SurfaceKind::HELPER, Color::GRAY, "HelperSurfaces")
        .execute(store)?;
    let vectors_n = ExtractVectors::new(
        world,
        AxisSelection::origin_and_normal(),
        Color::GREEN,
        "SurfaceVectorsN",
    )
    .execute(store)?;
    let vectors_u =
        ExtractVectors::new(world, AxisSelection::u_only(), Color::MAGENTA, "SurfaceVectorsU")
            .execute(store)?;
    let vectors_v =
        ExtractVectors::new(world, AxisSelection::v_only(), Color::BLACK, "SurfaceVectorsV")
            .execute(store)?;

    info!(
        outlines = outlines.lines.len(),
        sensitive = sensitive.lines.len(),
        helper = helper.lines.len(),
        "assembled detector scene"
    );

    let sensitive_rphi = Projection::RPhi.project_set(&sensitive);
    let sensitive_rhoz = Projection::RhoZ.project_set(&sensitive);
    let helper_rphi = Projection::RPhi.project_set(&helper);
    let helper_rhoz = Projection::RhoZ.project_set(&helper);

    sink.add_global(outlines);
    sink.add_global(sensitive);
    sink.add_global(helper);
    sink.add_global(vectors_n);
    sink.add_global(vectors_u);
    sink.add_global(vectors_v);

    sink.import_rphi(sensitive_rphi);
    sink.import_rhoz(sensitive_rhoz);
    sink.import_rphi(helper_rphi);
    sink.import_rhoz(helper_rhoz);

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::detector::description;

    /// Test sink that records what was registered where.
    #[derive(Default)]
    struct Recorder {
        global: Vec<LineSegmentSet>,
        rphi: Vec<LineSegmentSet>,
        rhoz: Vec<LineSegmentSet>,
    }

    impl SceneSink for Recorder {
        fn add_global(&mut self, set: LineSegmentSet) {
            self.global.push(set);
        }
        fn import_rphi(&mut self, set: LineSegmentSet) {
            self.rphi.push(set);
        }
        fn import_rhoz(&mut self, set: LineSegmentSet) {
            self.rhoz.push(set);
        }
    }

    #[test]
    fn assembles_six_global_sets_and_two_per_projection() {
        let store = description::sample().build().unwrap();
        let mut sink = Recorder::default();
        assemble(&store, &ViewConfig::default(), &mut sink).unwrap();

        let names: Vec<&str> = sink.global.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Geometry",
                "SensitiveSurfaces",
                "HelperSurfaces",
                "SurfaceVectorsN",
                "SurfaceVectorsU",
                "SurfaceVectorsV",
            ]
        );
        assert_eq!(sink.rphi.len(), 2);
        assert_eq!(sink.rhoz.len(), 2);

        // Only boundary sets are imported into the projections.
        assert_eq!(sink.rphi[0].name, "SensitiveSurfaces [RPhi]");
        assert_eq!(sink.rhoz[1].name, "HelperSurfaces [RhoZ]");
    }

    #[test]
    fn projected_views_are_flat() {
        let store = description::sample().build().unwrap();
        let mut sink = Recorder::default();
        assemble(&store, &ViewConfig::default(), &mut sink).unwrap();

        for set in sink.rphi.iter().chain(&sink.rhoz) {
            for (start, end) in &set.lines {
                assert!(start.z.abs() < 1e-12);
                assert!(end.z.abs() < 1e-12);
            }
        }
    }

    #[test]
    fn empty_detector_assembles_empty_sets() {
        let store = crate::detector::DetectorStore::new("world");
        let mut sink = Recorder::default();
        assemble(&store, &ViewConfig::default(), &mut sink).unwrap();
        assert!(sink.global.iter().all(LineSegmentSet::is_empty));
    }
}
