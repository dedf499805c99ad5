//! Interactive detector-surface display.
//!
//! All extraction and scene assembly run synchronously on the main thread
//! before the event loop starts; the display then owns the registered
//! sets, and further work (button clicks, redraws) is single-threaded
//! callback dispatch.

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use bevy::{
    asset::RenderAssetUsages,
    camera::{visibility::RenderLayers, ClearColorConfig, ScalingMode, Viewport},
    log::LogPlugin,
    prelude::*,
    render::render_resource::PrimitiveTopology,
    window::PresentMode,
    winit::WinitSettings,
};
use bevy_egui::{
    egui, EguiContexts, EguiGlobalSettings, EguiPlugin, EguiPrimaryContextPass, PrimaryEguiContext,
};
use bevy_panorbit_camera::{PanOrbitCamera, PanOrbitCameraPlugin};
use tracing::info;

use surfview::config::{self, ViewConfig};
use surfview::detector::{description, DetectorStore};
use surfview::extract::{Color as SetColor, LineSegmentSet};
use surfview::nav::{EventNavigator, NavState};
use surfview::scene::{assemble, SceneSink};

const MAIN_LAYER: usize = 0;
const RPHI_LAYER: usize = 1;
const RHOZ_LAYER: usize = 2;

/// Which view a registered set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Main,
    RPhi,
    RhoZ,
}

impl View {
    fn layer(self) -> usize {
        match self {
            Self::Main => MAIN_LAYER,
            Self::RPhi => RPHI_LAYER,
            Self::RhoZ => RHOZ_LAYER,
        }
    }
}

/// Scene content staged for display, in registration order.
#[derive(Default)]
struct StagedScene {
    sets: Vec<(View, LineSegmentSet)>,
}

impl SceneSink for StagedScene {
    fn add_global(&mut self, set: LineSegmentSet) {
        self.sets.push((View::Main, set));
    }

    fn import_rphi(&mut self, set: LineSegmentSet) {
        self.sets.push((View::RPhi, set));
    }

    fn import_rhoz(&mut self, set: LineSegmentSet) {
        self.sets.push((View::RhoZ, set));
    }
}

#[derive(Resource)]
struct DisplayState {
    staged: StagedScene,
    navigator: EventNavigator,
    scene_radius: f32,
}

/// Tags mesh entities rebuilt on every redraw.
#[derive(Component)]
struct SetMesh;

#[derive(Component)]
struct MainCamera;

#[derive(Component)]
struct RPhiCamera;

#[derive(Component)]
struct RhoZCamera;

fn main() -> surfview::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Ok(view_config) = config::parse_args(args) else {
        println!("{}", config::USAGE);
        std::process::exit(config::USAGE_EXIT_CODE);
    };

    // Default: WARN for everything, INFO for surfview.
    // Override with the RUST_LOG env var (e.g. RUST_LOG=surfview=debug).
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("surfview=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = load_detector(&view_config)?;
    info!(
        elements = store.element_count(),
        surfaces = store.surface_count(),
        "detector ready"
    );

    let mut staged = StagedScene::default();
    assemble(&store, &view_config, &mut staged)?;

    // One initial draw before the event loop, as if "next" was clicked.
    let mut navigator = EventNavigator::new();
    navigator.request_next();

    let scene_radius = scene_radius(&staged);

    App::new()
        .insert_resource(DisplayState {
            staged,
            navigator,
            scene_radius,
        })
        .insert_resource(WinitSettings::desktop_app())
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Detector Surface Display".into(),
                        present_mode: PresentMode::AutoVsync,
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                .build()
                .disable::<LogPlugin>(),
        )
        .add_plugins(EguiPlugin::default())
        .add_plugins(PanOrbitCameraPlugin)
        .add_systems(Startup, setup_views)
        .add_systems(Update, redraw_scene)
        .add_systems(Update, disable_camera_when_egui_wants_input)
        .add_systems(EguiPrimaryContextPass, ui_system)
        .run();

    Ok(())
}

fn load_detector(view_config: &ViewConfig) -> surfview::Result<DetectorStore> {
    match &view_config.input {
        Some(path) => description::DetectorDescription::load(path)?.build(),
        None => description::sample().build(),
    }
}

/// Largest distance from the origin over the main-view sets; used for
/// camera placement.
fn scene_radius(staged: &StagedScene) -> f32 {
    let mut max_sq = 0.0_f64;
    for (view, set) in &staged.sets {
        if *view != View::Main {
            continue;
        }
        for (start, end) in &set.lines {
            max_sq = max_sq
                .max(start.coords.norm_squared())
                .max(end.coords.norm_squared());
        }
    }
    let radius = max_sq.sqrt() as f32;
    if radius > f32::EPSILON {
        radius
    } else {
        1.0
    }
}

fn setup_views(
    mut commands: Commands,
    mut egui_global_settings: ResMut<EguiGlobalSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    state: Res<DisplayState>,
) {
    // The egui context gets its own camera below.
    egui_global_settings.auto_create_primary_context = false;

    let radius = state.scene_radius;

    commands.spawn((
        MainCamera,
        Camera3d::default(),
        Camera {
            order: 0,
            clear_color: ClearColorConfig::Custom(Color::WHITE),
            ..Default::default()
        },
        Transform::from_xyz(radius * 1.8, radius * 1.2, radius * 1.8)
            .looking_at(Vec3::ZERO, Vec3::Y),
        PanOrbitCamera {
            focus: Vec3::ZERO,
            radius: Some(radius * 2.8),
            ..Default::default()
        },
        RenderLayers::layer(MAIN_LAYER),
    ));

    commands.spawn((
        RPhiCamera,
        Camera3d::default(),
        Camera {
            order: 1,
            clear_color: ClearColorConfig::Custom(Color::WHITE),
            ..Default::default()
        },
        Projection::Orthographic(projection_ortho(radius)),
        Transform::from_xyz(0.0, 0.0, radius * 3.0).looking_at(Vec3::ZERO, Vec3::Y),
        RenderLayers::layer(RPHI_LAYER),
    ));

    commands.spawn((
        RhoZCamera,
        Camera3d::default(),
        Camera {
            order: 2,
            clear_color: ClearColorConfig::Custom(Color::WHITE),
            ..Default::default()
        },
        Projection::Orthographic(projection_ortho(radius)),
        Transform::from_xyz(0.0, 0.0, radius * 3.0).looking_at(Vec3::ZERO, Vec3::Y),
        RenderLayers::layer(RHOZ_LAYER),
    ));

    // Egui-only camera for the UI overlay.
    commands.spawn((
        PrimaryEguiContext,
        Camera3d::default(),
        Camera {
            order: 3,
            clear_color: ClearColorConfig::None,
            ..Default::default()
        },
        RenderLayers::none(),
    ));

    // Axes guides along the main-view edges.
    commands.spawn((
        Mesh3d(meshes.add(axes_mesh(radius * 1.15))),
        MeshMaterial3d(materials.add(unlit_material(SetColor::new(1.0, 1.0, 1.0)))),
        RenderLayers::layer(MAIN_LAYER),
    ));
}

fn projection_ortho(radius: f32) -> OrthographicProjection {
    OrthographicProjection {
        scaling_mode: ScalingMode::FixedVertical {
            viewport_height: radius * 2.4,
        },
        ..OrthographicProjection::default_3d()
    }
}

/// Rebuilds every set mesh while the navigator has a redraw pending.
fn redraw_scene(
    mut commands: Commands,
    mut state: ResMut<DisplayState>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    existing: Query<Entity, With<SetMesh>>,
) {
    if state.navigator.state() != NavState::Redrawing {
        return;
    }

    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    let mut spawned = 0_usize;
    for (view, set) in &state.staged.sets {
        let layer = RenderLayers::layer(view.layer());

        if !set.lines.is_empty() {
            commands.spawn((
                SetMesh,
                Mesh3d(meshes.add(line_mesh(set))),
                MeshMaterial3d(materials.add(unlit_material(set.color))),
                layer.clone(),
            ));
            spawned += 1;
        }
        if !set.markers.is_empty() {
            commands.spawn((
                SetMesh,
                Mesh3d(meshes.add(marker_mesh(set))),
                MeshMaterial3d(materials.add(unlit_material(set.marker_color))),
                layer,
            ));
            spawned += 1;
        }
    }

    state.navigator.finish_redraw();
    info!(meshes = spawned, "redrew all views");
}

fn line_mesh(set: &LineSegmentSet) -> Mesh {
    let mut positions = Vec::with_capacity(set.lines.len() * 2);
    for (start, end) in &set.lines {
        positions.push([start.x as f32, start.y as f32, start.z as f32]);
        positions.push([end.x as f32, end.y as f32, end.z as f32]);
    }

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh
}

fn marker_mesh(set: &LineSegmentSet) -> Mesh {
    let positions: Vec<[f32; 3]> = set
        .markers
        .iter()
        .map(|p| [p.x as f32, p.y as f32, p.z as f32])
        .collect();

    let mut mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh
}

fn axes_mesh(extent: f32) -> Mesh {
    let positions = vec![
        [0.0, 0.0, 0.0],
        [extent, 0.0, 0.0],
        [0.0, 0.0, 0.0],
        [0.0, extent, 0.0],
        [0.0, 0.0, 0.0],
        [0.0, 0.0, extent],
    ];
    let colors: Vec<[f32; 4]> = vec![
        [0.8, 0.2, 0.2, 1.0],
        [0.8, 0.2, 0.2, 1.0],
        [0.2, 0.7, 0.2, 1.0],
        [0.2, 0.7, 0.2, 1.0],
        [0.2, 0.2, 0.8, 1.0],
        [0.2, 0.2, 0.8, 1.0],
    ];

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    mesh
}

fn unlit_material(color: SetColor) -> StandardMaterial {
    StandardMaterial {
        base_color: Color::srgb(color.r, color.g, color.b),
        unlit: true,
        ..Default::default()
    }
}

/// Event-control panel plus per-frame viewport layout.
fn ui_system(
    mut contexts: EguiContexts,
    mut state: ResMut<DisplayState>,
    windows: Query<&Window>,
    mut main_cam: Query<&mut Camera, (With<MainCamera>, Without<RPhiCamera>, Without<RhoZCamera>)>,
    mut rphi_cam: Query<&mut Camera, (With<RPhiCamera>, Without<MainCamera>, Without<RhoZCamera>)>,
    mut rhoz_cam: Query<&mut Camera, (With<RhoZCamera>, Without<MainCamera>, Without<RPhiCamera>)>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let panel = egui::SidePanel::left("event_control")
        .resizable(false)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.heading("Event Control");
            ui.separator();
            ui.horizontal(|ui| {
                let previous = ui
                    .add_enabled(false, egui::Button::new("< Previous"))
                    .on_disabled_hover_text("Go to previous event - not supported.");
                if previous.clicked() {
                    state.navigator.request_previous();
                }

                let next = ui.button("Next >").on_hover_text("Generate new event.");
                if next.clicked() {
                    state.navigator.request_next();
                }
            });
        });

    let panel_width = panel.response.rect.width();

    let Ok(window) = windows.single() else {
        return;
    };
    let scale = window.scale_factor();
    let window_width = window.physical_width();
    let window_height = window.physical_height().max(1);
    let panel_px = (panel_width * scale) as u32;

    // The two projected views share a right-hand column, a third of the
    // space left of the control panel; the 3D view takes the rest.
    let remaining = window_width.saturating_sub(panel_px);
    let column = (remaining / 3).max(1);
    let main_width = remaining.saturating_sub(column).max(1);
    let half_height = (window_height / 2).max(1);

    if let Ok(mut camera) = main_cam.single_mut() {
        camera.viewport = Some(Viewport {
            physical_position: UVec2::new(panel_px, 0),
            physical_size: UVec2::new(main_width, window_height),
            ..Default::default()
        });
    }
    if let Ok(mut camera) = rphi_cam.single_mut() {
        camera.viewport = Some(Viewport {
            physical_position: UVec2::new(panel_px + main_width, 0),
            physical_size: UVec2::new(column, half_height),
            ..Default::default()
        });
    }
    if let Ok(mut camera) = rhoz_cam.single_mut() {
        camera.viewport = Some(Viewport {
            physical_position: UVec2::new(panel_px + main_width, half_height),
            physical_size: UVec2::new(column, window_height.saturating_sub(half_height).max(1)),
            ..Default::default()
        });
    }

    // Captions over the projected panes.
    let column_x = panel_width + (main_width as f32) / scale + 6.0;
    egui::Area::new(egui::Id::new("rphi_label"))
        .fixed_pos(egui::pos2(column_x, 6.0))
        .show(ctx, |ui| {
            ui.colored_label(egui::Color32::DARK_GRAY, "R-Phi");
        });
    egui::Area::new(egui::Id::new("rhoz_label"))
        .fixed_pos(egui::pos2(column_x, (half_height as f32) / scale + 6.0))
        .show(ctx, |ui| {
            ui.colored_label(egui::Color32::DARK_GRAY, "Rho-Z");
        });
}

/// Keep the orbit camera from fighting egui for pointer input.
fn disable_camera_when_egui_wants_input(
    mut contexts: EguiContexts,
    mut cameras: Query<&mut PanOrbitCamera>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    let egui_wants_input = ctx.wants_pointer_input() || ctx.is_pointer_over_area();

    for mut pan_orbit in &mut cameras {
        pan_orbit.enabled = !egui_wants_input;
    }
}
