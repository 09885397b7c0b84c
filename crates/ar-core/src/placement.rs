//! Placement state for one AR session.
//!
//! The web frontend feeds this from the XR frame callback: hit-test poses in,
//! placed objects and reticle state out. Everything here is platform-free so
//! the whole flow is testable natively.

use crate::config::ViewConfig;
use crate::constants::SPIN_RATE;
use crate::factory::{self, MeshPart, ObjectModel};
use glam::{Mat4, Quat, Vec3};
use std::time::Duration;

/// Placement indicator tracking the best hit-test result of the current
/// frame. Visible iff the frame produced a resolvable pose.
#[derive(Clone, Debug)]
pub struct Reticle {
    matrix: Mat4,
    visible: bool,
}

impl Default for Reticle {
    fn default() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
            visible: false,
        }
    }
}

impl Reticle {
    pub fn update(&mut self, pose: Option<Mat4>) {
        match pose {
            Some(matrix) => {
                self.matrix = matrix;
                self.visible = true;
            }
            None => self.visible = false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }
}

/// Lifecycle of the session's single hit-test-source request.
///
/// `Pending` keeps the per-frame poll from issuing duplicate in-flight
/// requests while the async space/source chain resolves. `Failed` parks the
/// session permanently; requests are fire-once with no retry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HitSourceStatus {
    #[default]
    Idle,
    Pending,
    Ready,
    Failed,
}

/// A product placed in the scene. Pose is captured exactly once, from the
/// reticle matrix at the placement instant.
#[derive(Clone, Debug)]
pub struct PlacedObject {
    pub model: ObjectModel,
    pub position: Vec3,
    pub rotation: Quat,
    pub spin_angle: f32,
}

impl PlacedObject {
    fn from_reticle(matrix: Mat4, config: &ViewConfig) -> Self {
        let (_, rotation, position) = matrix.to_scale_rotation_translation();
        Self {
            model: factory::build_object(config),
            position,
            rotation,
            spin_angle: 0.0,
        }
    }

    /// World transform for one part of the group: group pose and uniform
    /// scale, idle spin about local Y, then the part's local offset.
    pub fn part_matrix(&self, part: &MeshPart) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.model.scale),
            self.rotation * Quat::from_rotation_y(self.spin_angle),
            self.position,
        ) * Mat4::from_translation(part.offset)
    }
}

/// Per-session placement engine.
///
/// One exists per AR session; `reset` returns it to its initial state when a
/// new session starts. Earlier placements stay in `objects` (still rendered)
/// but only the most recent one receives live updates and spin.
#[derive(Debug, Default)]
pub struct PlacementSession {
    reticle: Reticle,
    hit_source: HitSourceStatus,
    objects: Vec<PlacedObject>,
    active: Option<usize>,
}

impl PlacementSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tear down all per-session state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn reticle(&self) -> &Reticle {
        &self.reticle
    }

    pub fn hit_source_status(&self) -> HitSourceStatus {
        self.hit_source
    }

    /// Ask whether the caller should issue the async hit-test-source request.
    /// Returns true exactly once per session.
    pub fn begin_hit_source_request(&mut self) -> bool {
        if self.hit_source == HitSourceStatus::Idle {
            self.hit_source = HitSourceStatus::Pending;
            true
        } else {
            false
        }
    }

    pub fn hit_source_ready(&mut self) {
        self.hit_source = HitSourceStatus::Ready;
    }

    pub fn hit_source_failed(&mut self) {
        self.hit_source = HitSourceStatus::Failed;
        log::warn!("hit-test source request failed; reticle stays hidden");
    }

    /// Feed the frame's best hit-test pose (or its absence) to the reticle.
    pub fn update_reticle(&mut self, pose: Option<Mat4>) {
        self.reticle.update(pose);
    }

    /// Handle a select (tap). Places a new object at the reticle pose when
    /// the reticle is visible and makes it the active object; returns its
    /// index. With no visible reticle the tap is a no-op.
    pub fn place(&mut self, config: &ViewConfig) -> Option<usize> {
        if !self.reticle.is_visible() {
            return None;
        }
        let object = PlacedObject::from_reticle(self.reticle.matrix(), config);
        self.objects.push(object);
        let index = self.objects.len() - 1;
        self.active = Some(index);
        log::info!(
            "placed {} #{} at ({:.3}, {:.3}, {:.3})",
            config.shape.as_str(),
            index,
            self.objects[index].position.x,
            self.objects[index].position.y,
            self.objects[index].position.z,
        );
        Some(index)
    }

    /// Live property sync: push the current color and size into the active
    /// object. No effect before the first placement.
    pub fn apply_config(&mut self, config: &ViewConfig) {
        if let Some(object) = self.active_mut() {
            object.model.set_color(config.color);
            object.model.set_scale(config.size);
        }
    }

    /// Advance the idle spin of the active object by wall-clock `dt`.
    /// Orphaned objects keep their last orientation.
    pub fn advance(&mut self, dt: Duration) {
        let dt_sec = dt.as_secs_f32();
        if let Some(object) = self.active_mut() {
            object.spin_angle += SPIN_RATE * dt_sec;
        }
    }

    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }

    pub fn active(&self) -> Option<&PlacedObject> {
        self.active.and_then(|i| self.objects.get(i))
    }

    pub fn active_mut(&mut self) -> Option<&mut PlacedObject> {
        self.active.and_then(|i| self.objects.get_mut(i))
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }
}
