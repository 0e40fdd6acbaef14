//! Per-participant reconciliation state machine.
//!
//! A [`RemoteEntityView`] reacts to three inputs:
//!
//! 1. a new authoritative snapshot ([`RemoteEntityView::on_snapshot`]),
//! 2. the renderable asset becoming available ([`RemoteEntityView::on_asset_ready`]),
//! 3. the render tick ([`RemoteEntityView::interpolate`]).
//!
//! Positional state is reconciled regardless of asset readiness. Display
//! state (weapon, healing, aiming, weapon visibility) that arrives before the
//! asset exists is parked in a last-value-wins [`PendingState`] and applied
//! exactly once when the asset becomes ready.

use glam::Vec3;
use tracing::debug;

use crate::interpolation::{ease_out, horizontal_distance, lerp_angle};
use crate::snapshot::{EntityId, EntitySnapshot, Pose, WeaponId};
use crate::tuning::InterpolationTuning;

/// Animation chosen for a participant on the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnimationState {
    #[default]
    Idle,
    Locomotion,
    /// Aim/fire pose (non-looping).
    Aim,
    /// Healing item in use; not interruptible.
    Heal,
    /// Melee swing in progress; not interruptible.
    Melee,
}

/// Display fields received before the asset was ready. Last value wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingState {
    pub weapon: Option<WeaponId>,
    pub is_healing: Option<bool>,
    pub is_aiming: Option<bool>,
    pub weapon_hidden: Option<bool>,
}

impl PendingState {
    /// Overwrites every slot the snapshot carries a value for.
    fn record(&mut self, snapshot: &EntitySnapshot) {
        if snapshot.current_weapon.is_some() {
            self.weapon = snapshot.current_weapon;
        }
        if snapshot.is_healing.is_some() {
            self.is_healing = snapshot.is_healing;
        }
        if snapshot.is_aiming.is_some() {
            self.is_aiming = snapshot.is_aiming;
        }
        if snapshot.weapon_hidden.is_some() {
            self.weapon_hidden = snapshot.weapon_hidden;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Display state currently applied to the renderable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplayState {
    pub weapon: WeaponId,
    pub is_healing: bool,
    pub is_aiming: bool,
    pub weapon_hidden: bool,
}

/// A display change the renderer must act on (swap weapon model, start the
/// heal effect, ...). Emitted only when the applied value actually changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayChange {
    Weapon(WeaponId),
    HealingStarted,
    HealingStopped,
    Aiming(bool),
    WeaponHidden(bool),
}

/// What the renderer draws for one visible participant this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderPose {
    pub id: EntityId,
    pub position: Vec3,
    pub rotation_y: f32,
    pub animation: AnimationState,
    /// Held item, or `None` while the weapon is hidden.
    pub weapon: Option<WeaponId>,
}

/// Client-side reconciliation state for one remote participant.
#[derive(Clone, Debug)]
pub struct RemoteEntityView {
    id: EntityId,
    tuning: InterpolationTuning,
    latest: EntitySnapshot,

    previous_pose: Pose,
    current_pose: Pose,
    alpha: f32,
    speed: f32,
    render: Pose,

    // Rendered position at the previous tick; velocity is measured from it.
    velocity_ref: Vec3,
    measured_velocity: Vec3,
    is_moving: bool,
    moving_cooldown: f32,

    melee_remaining: f32,
    fire_remaining: f32,

    asset_ready: bool,
    pending: PendingState,
    display: DisplayState,
    animation: AnimationState,
    changes: Vec<DisplayChange>,
}

impl RemoteEntityView {
    /// Creates a view from the first snapshot naming this participant. The
    /// pose is adopted directly; display fields wait for the asset.
    pub fn new(snapshot: EntitySnapshot, tuning: InterpolationTuning) -> Self {
        let pose = snapshot.pose();
        let mut pending = PendingState::default();
        pending.record(&snapshot);

        Self {
            id: snapshot.id,
            tuning,
            latest: snapshot,
            previous_pose: pose,
            current_pose: pose,
            alpha: 1.0,
            speed: tuning.normal_speed,
            render: pose,
            velocity_ref: pose.position,
            measured_velocity: Vec3::ZERO,
            is_moving: false,
            moving_cooldown: 0.0,
            melee_remaining: 0.0,
            fire_remaining: 0.0,
            asset_ready: false,
            pending,
            display: DisplayState::default(),
            animation: AnimationState::Idle,
            changes: Vec::new(),
        }
    }

    /// Handles a new authoritative snapshot for this participant.
    pub fn on_snapshot(&mut self, snapshot: &EntitySnapshot) {
        debug_assert_eq!(snapshot.id, self.id, "snapshot routed to wrong view");

        if self.asset_ready {
            self.apply_display(
                snapshot.current_weapon,
                snapshot.is_healing,
                snapshot.is_aiming,
                snapshot.weapon_hidden,
            );
        } else {
            self.pending.record(snapshot);
        }

        // Non-finite components keep their previous value.
        let position = if snapshot.position.is_finite() {
            snapshot.position
        } else {
            self.current_pose.position
        };
        let rotation_y = if snapshot.rotation_y.is_finite() {
            snapshot.rotation_y
        } else {
            self.current_pose.rotation_y
        };
        let target = Pose::new(position, rotation_y);

        if !self.latest.alive && snapshot.alive {
            self.render = target;
            self.alpha = 1.0;
            self.speed = self.tuning.normal_speed;
            self.velocity_ref = target.position;
            debug!(id = %self.id, position = %target.position, "revive, snapping to new pose");
        } else {
            let jump = horizontal_distance(self.current_pose.position, target.position);
            self.alpha = 0.0;
            if jump > self.tuning.teleport_threshold {
                self.speed = self.tuning.dash_speed;
                debug!(id = %self.id, jump, "teleport/dash detected");
            } else {
                self.speed = self.tuning.normal_speed;
            }
        }

        self.previous_pose = self.current_pose;
        self.current_pose = target;
        self.latest = EntitySnapshot {
            position,
            rotation_y,
            ..snapshot.clone()
        };
    }

    /// Marks the renderable as available and applies everything pending.
    /// Returns `false` if the asset was already ready.
    pub fn on_asset_ready(&mut self) -> bool {
        if self.asset_ready {
            return false;
        }
        self.asset_ready = true;

        let pending = std::mem::take(&mut self.pending);
        self.apply_display(
            pending.weapon,
            pending.is_healing,
            pending.is_aiming,
            pending.weapon_hidden,
        );
        debug!(id = %self.id, applied = self.changes.len(), "asset ready, pending state applied");
        true
    }

    /// Advances interpolation by `dt` seconds and recomputes motion and
    /// animation state. Non-positive or non-finite `dt` is ignored.
    pub fn interpolate(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }

        self.alpha = (self.alpha + dt * self.speed).min(1.0);
        let eased = ease_out(self.alpha);

        self.render.position = self
            .previous_pose
            .position
            .lerp(self.current_pose.position, eased);
        self.render.rotation_y = lerp_angle(
            self.previous_pose.rotation_y,
            self.current_pose.rotation_y,
            eased,
        );

        // Measured from what is on screen, interpolation lag included.
        self.measured_velocity = (self.render.position - self.velocity_ref) / dt;
        self.velocity_ref = self.render.position;

        if self.measured_velocity.length() > self.tuning.moving_speed_threshold {
            self.is_moving = true;
            self.moving_cooldown = self.tuning.moving_cooldown;
        } else {
            self.moving_cooldown = (self.moving_cooldown - dt).max(0.0);
            if self.moving_cooldown <= 0.0 {
                self.is_moving = false;
            }
        }

        self.melee_remaining = (self.melee_remaining - dt).max(0.0);
        self.fire_remaining = (self.fire_remaining - dt).max(0.0);

        self.animation = self.select_animation();
    }

    /// Starts a melee swing lasting `duration` seconds.
    pub fn begin_melee(&mut self, duration: f32) {
        if duration.is_finite() && duration > 0.0 {
            self.melee_remaining = duration;
        }
    }

    /// Holds the aim pose briefly after a shot.
    pub fn notify_fired(&mut self) {
        self.fire_remaining = self.tuning.fire_pose_hold;
    }

    /// Takes the display changes accumulated since the last call.
    pub fn drain_changes(&mut self) -> Vec<DisplayChange> {
        std::mem::take(&mut self.changes)
    }

    /// Render output, or `None` while the participant is dead.
    pub fn render_pose(&self) -> Option<RenderPose> {
        if !self.is_visible() {
            return None;
        }
        Some(RenderPose {
            id: self.id,
            position: self.render.position,
            rotation_y: self.render.rotation_y,
            animation: self.animation,
            weapon: (!self.display.weapon_hidden).then_some(self.display.weapon),
        })
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The last snapshot received, with non-finite pose fields replaced.
    pub fn latest_snapshot(&self) -> &EntitySnapshot {
        &self.latest
    }

    pub fn previous_pose(&self) -> Pose {
        self.previous_pose
    }

    pub fn current_pose(&self) -> Pose {
        self.current_pose
    }

    pub fn render(&self) -> Pose {
        self.render
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn interpolation_speed(&self) -> f32 {
        self.speed
    }

    pub fn measured_velocity(&self) -> Vec3 {
        self.measured_velocity
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    pub fn is_attacking(&self) -> bool {
        self.melee_remaining > 0.0
    }

    pub fn is_curing(&self) -> bool {
        self.display.is_healing
    }

    pub fn is_visible(&self) -> bool {
        self.latest.alive
    }

    pub fn asset_ready(&self) -> bool {
        self.asset_ready
    }

    pub fn pending(&self) -> &PendingState {
        &self.pending
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn animation(&self) -> AnimationState {
        self.animation
    }

    /// Applies display fields in the fixed order weapon → healing → aiming →
    /// weapon hidden. Unchanged values are no-ops.
    fn apply_display(
        &mut self,
        weapon: Option<WeaponId>,
        is_healing: Option<bool>,
        is_aiming: Option<bool>,
        weapon_hidden: Option<bool>,
    ) {
        if let Some(weapon) = weapon
            && weapon != self.display.weapon
        {
            self.display.weapon = weapon;
            self.changes.push(DisplayChange::Weapon(weapon));
        }
        if let Some(healing) = is_healing
            && healing != self.display.is_healing
        {
            self.display.is_healing = healing;
            self.changes.push(if healing {
                DisplayChange::HealingStarted
            } else {
                DisplayChange::HealingStopped
            });
        }
        if let Some(aiming) = is_aiming
            && aiming != self.display.is_aiming
        {
            self.display.is_aiming = aiming;
            self.changes.push(DisplayChange::Aiming(aiming));
        }
        if let Some(hidden) = weapon_hidden
            && hidden != self.display.weapon_hidden
        {
            self.display.weapon_hidden = hidden;
            self.changes.push(DisplayChange::WeaponHidden(hidden));
        }
    }

    fn select_animation(&self) -> AnimationState {
        if self.is_curing() {
            AnimationState::Heal
        } else if self.is_attacking() {
            AnimationState::Melee
        } else if self.display.is_aiming || self.fire_remaining > 0.0 {
            AnimationState::Aim
        } else if self.is_moving {
            AnimationState::Locomotion
        } else {
            AnimationState::Idle
        }
    }
}
