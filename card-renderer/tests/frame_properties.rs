//! Property tests for frame geometry.

use card_core::constants::{CARD_HEIGHT_MM, CARD_WIDTH_MM, MAX_ZOOM, MIN_ZOOM};
use card_core::{CardProject, DesignState, DesignStore, ViewportState};
use card_renderer::{FrameRenderer, OverlayLayer, Point, Size};
use proptest::prelude::*;

const EPSILON: f64 = 1e-6;

proptest! {
    #[test]
    fn mm_round_trip_at_any_zoom(
        zoom in MIN_ZOOM..=MAX_ZOOM,
        rotation in 0.0f64..360.0,
        x in -10.0f64..(CARD_WIDTH_MM + 10.0),
        y in -10.0f64..(CARD_HEIGHT_MM + 10.0),
        w in 1.0f64..4000.0,
        h in 1.0f64..4000.0,
    ) {
        let viewport = ViewportState { rotation, ..ViewportState::default() }.with_zoom(zoom);
        let layout = FrameRenderer::default().layout(&viewport, Size::new(w, h));
        let p = Point::new(x, y);
        let back = layout.screen_to_mm(layout.mm_to_screen(p));
        prop_assert!(back.distance(&p) < EPSILON, "{p:?} came back as {back:?}");
    }

    #[test]
    fn surface_is_always_the_top_layer(grid in any::<bool>(), zones in any::<bool>()) {
        let viewport = ViewportState {
            show_grid: grid,
            show_safe_zones: zones,
            ..ViewportState::default()
        };
        let frame = FrameRenderer::default().compose(&viewport, Size::new(800.0, 600.0));
        let top = frame.layers.last().expect("non-empty");
        prop_assert!(
            matches!(top, OverlayLayer::Surface { .. }),
            "top layer was {top:?}"
        );
        prop_assert_eq!(frame.has_grid(), grid);
        prop_assert_eq!(frame.has_safe_zones(), zones);
    }
}

#[test]
fn grid_toggled_on_then_off_is_not_drawn() {
    let store = DesignStore::new(CardProject::new("grid"));
    store.toggle_grid();
    let renderer = FrameRenderer::default();
    let container = Size::new(1000.0, 700.0);
    let on = renderer.compose(&store.read(|s| *s.viewport()), container);
    assert!(on.has_grid());

    store.toggle_grid();
    let off = renderer.compose(&store.read(|s| *s.viewport()), container);
    assert!(!off.has_grid());
    assert!(off
        .layers
        .iter()
        .all(|l| !matches!(l, OverlayLayer::Grid { .. })));
}

#[test]
fn frame_follows_the_active_face() {
    let store = DesignStore::new(CardProject::new("faces"));
    store.flip_face();
    let viewport = store.read(|s| *s.viewport());
    let frame = FrameRenderer::default().compose(&viewport, Size::new(1000.0, 700.0));
    assert_eq!(frame.surface_face(), Some(store.read(DesignState::active_face)));
}
