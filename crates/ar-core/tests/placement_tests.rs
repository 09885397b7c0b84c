// Tests for the per-session placement engine: reticle visibility, select
// handling, live property sync, spin, and the hit-test-source guard.

use ar_core::config::{Shape, ViewConfig};
use ar_core::constants::{BASE_COLOR, SPIN_RATE};
use ar_core::placement::{HitSourceStatus, PlacementSession};
use glam::{Mat4, Quat, Vec3};
use std::time::Duration;

const TOL: f32 = 1e-5;

fn pose_at(position: Vec3) -> Mat4 {
    Mat4::from_rotation_translation(Quat::from_rotation_y(0.3), position)
}

#[test]
fn reticle_visible_iff_frame_had_a_resolvable_pose() {
    let mut session = PlacementSession::new();
    assert!(!session.reticle().is_visible());

    session.update_reticle(Some(pose_at(Vec3::new(0.0, -0.5, -1.0))));
    assert!(session.reticle().is_visible());

    // A frame with zero hit-test results hides it again.
    session.update_reticle(None);
    assert!(!session.reticle().is_visible());

    session.update_reticle(Some(pose_at(Vec3::ZERO)));
    assert!(session.reticle().is_visible());
}

#[test]
fn select_with_hidden_reticle_places_nothing() {
    let mut session = PlacementSession::new();
    assert!(session.place(&ViewConfig::default()).is_none());
    assert!(session.objects().is_empty());
    assert!(session.active().is_none());
}

#[test]
fn select_places_exactly_one_object_at_the_reticle_pose() {
    let mut session = PlacementSession::new();
    let position = Vec3::new(0.25, -0.4, -1.2);
    session.update_reticle(Some(pose_at(position)));

    let index = session.place(&ViewConfig::default());
    assert_eq!(index, Some(0));
    assert_eq!(session.objects().len(), 1);

    let placed = session.active().unwrap();
    assert!((placed.position - position).length() < TOL);
    // Orientation captured from the same matrix.
    let (_, rot, _) = pose_at(position).to_scale_rotation_translation();
    assert!(placed.rotation.angle_between(rot) < TOL);
}

#[test]
fn placed_pose_is_frozen_even_when_the_reticle_moves_on() {
    let mut session = PlacementSession::new();
    let first = Vec3::new(0.0, 0.0, -1.0);
    session.update_reticle(Some(pose_at(first)));
    session.place(&ViewConfig::default());

    session.update_reticle(Some(pose_at(Vec3::new(5.0, 0.0, -3.0))));
    assert!((session.objects()[0].position - first).length() < TOL);
}

#[test]
fn later_taps_orphan_earlier_objects_but_keep_them_in_the_scene() {
    let mut session = PlacementSession::new();
    session.update_reticle(Some(pose_at(Vec3::new(0.0, 0.0, -1.0))));
    session.place(&ViewConfig::default());
    session.update_reticle(Some(pose_at(Vec3::new(1.0, 0.0, -1.0))));
    session.place(&ViewConfig::default());

    assert_eq!(session.objects().len(), 2);
    assert_eq!(session.active_index(), Some(1));

    // Live updates only reach the active object.
    let cfg = ViewConfig::default().with_color([0.0, 0.0, 1.0]);
    session.apply_config(&cfg);
    assert_eq!(session.objects()[1].model.parts[1].color, [0.0, 0.0, 1.0]);
    assert_ne!(session.objects()[0].model.parts[1].color, [0.0, 0.0, 1.0]);
}

#[test]
fn live_sync_recolors_the_whole_subtree_and_sets_scale_exactly() {
    let mut session = PlacementSession::new();
    session.update_reticle(Some(pose_at(Vec3::ZERO)));
    session.place(&ViewConfig::default());

    let cfg = ViewConfig::default()
        .with_color([0.2, 0.4, 0.6])
        .with_size(2.5);
    session.apply_config(&cfg);

    let placed = session.active().unwrap();
    for part in &placed.model.parts {
        assert_eq!(part.color, [0.2, 0.4, 0.6]);
    }
    assert_eq!(placed.model.scale, 2.5);
}

#[test]
fn apply_config_is_a_noop_before_the_first_placement() {
    let mut session = PlacementSession::new();
    session.apply_config(&ViewConfig::default().with_size(2.0));
    assert!(session.objects().is_empty());
}

#[test]
fn hit_source_request_is_issued_exactly_once() {
    let mut session = PlacementSession::new();
    assert_eq!(session.hit_source_status(), HitSourceStatus::Idle);

    assert!(session.begin_hit_source_request());
    // Frames keep polling while the async request is in flight; none of them
    // may trigger a second request.
    for _ in 0..10 {
        assert!(!session.begin_hit_source_request());
    }
    assert_eq!(session.hit_source_status(), HitSourceStatus::Pending);

    session.hit_source_ready();
    assert!(!session.begin_hit_source_request());
    assert_eq!(session.hit_source_status(), HitSourceStatus::Ready);
}

#[test]
fn failed_hit_source_request_is_not_retried() {
    let mut session = PlacementSession::new();
    assert!(session.begin_hit_source_request());
    session.hit_source_failed();
    assert_eq!(session.hit_source_status(), HitSourceStatus::Failed);
    assert!(!session.begin_hit_source_request());
}

#[test]
fn spin_integrates_wall_clock_time_on_the_active_object_only() {
    let mut session = PlacementSession::new();
    session.update_reticle(Some(pose_at(Vec3::ZERO)));
    session.place(&ViewConfig::default());
    session.update_reticle(Some(pose_at(Vec3::X)));
    session.place(&ViewConfig::default());

    session.advance(Duration::from_millis(500));
    assert!((session.objects()[1].spin_angle - SPIN_RATE * 0.5).abs() < TOL);
    assert_eq!(session.objects()[0].spin_angle, 0.0);

    // Two 250 ms frames accumulate the same spin as one 500 ms frame.
    session.advance(Duration::from_millis(250));
    session.advance(Duration::from_millis(250));
    assert!((session.objects()[1].spin_angle - SPIN_RATE * 1.0).abs() < TOL);
}

#[test]
fn aborted_session_setup_leaves_state_ready_for_a_fresh_start() {
    let mut session = PlacementSession::new();
    assert!(session.begin_hit_source_request());

    // Session setup failed partway; teardown resets before the next start.
    session.reset();
    assert_eq!(session.hit_source_status(), HitSourceStatus::Idle);

    // The next session gets its own fire-once request.
    assert!(session.begin_hit_source_request());
    assert!(!session.begin_hit_source_request());
}

#[test]
fn reset_clears_all_session_state() {
    let mut session = PlacementSession::new();
    session.begin_hit_source_request();
    session.hit_source_ready();
    session.update_reticle(Some(pose_at(Vec3::ZERO)));
    session.place(&ViewConfig::default());

    session.reset();
    assert_eq!(session.hit_source_status(), HitSourceStatus::Idle);
    assert!(!session.reticle().is_visible());
    assert!(session.objects().is_empty());
    assert!(session.active().is_none());
    // Resetting an already-clean session is harmless.
    session.reset();
}

#[test]
fn end_to_end_green_sphere_at_known_pose() {
    let mut session = PlacementSession::new();
    let cfg = ViewConfig::from_inputs("#00ff00", 1.5, "sphere").unwrap();
    assert_eq!(cfg.shape, Shape::Sphere);

    let pose = Vec3::new(0.3, -0.6, -1.4);
    session.update_reticle(Some(pose_at(pose)));
    assert_eq!(session.place(&cfg), Some(0));

    let placed = session.active().unwrap();
    assert!((placed.position - pose).length() < TOL);
    assert_eq!(placed.model.scale, 1.5);
    assert_eq!(placed.model.parts[1].color, [0.0, 1.0, 0.0]);
    assert_eq!(placed.model.parts[0].color, BASE_COLOR);

    // The base platform's world transform carries the group scale and the
    // local offset below the shape origin.
    let base = &placed.model.parts[0];
    let world = placed.part_matrix(base);
    let (scale, _, translation) = world.to_scale_rotation_translation();
    assert!((scale - Vec3::splat(1.5)).length() < TOL);
    let expected = pose + placed.rotation * (Vec3::new(0.0, base.offset.y, 0.0) * 1.5);
    assert!((translation - expected).length() < 1e-4);
}
