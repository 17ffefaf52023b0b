use rapier2d::parry::query;
use rapier2d::prelude::*;

use crate::foundation::core::{Point as PagePoint, Rect, Size, Vec2};

use super::collision::CollisionFilter;

/// Rigid-body description for a tracked block or boundary box.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BoxDesc {
    pub(crate) center: PagePoint,
    pub(crate) size: Size,
    pub(crate) density: f64,
    pub(crate) damping: f64,
    pub(crate) filter: CollisionFilter,
}

/// Rigid-body description for an actor segment.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BallDesc {
    pub(crate) center: PagePoint,
    pub(crate) radius: f64,
    pub(crate) density: f64,
    pub(crate) restitution: f64,
    pub(crate) friction: f64,
    pub(crate) filter: CollisionFilter,
}

/// Spring link between two bodies.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SpringDesc {
    pub(crate) rest_length: f64,
    pub(crate) stiffness: f64,
    pub(crate) damping: f64,
    pub(crate) anchor1: Vec2,
    pub(crate) anchor2: Vec2,
}

/// A body and its single collider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BodyHandles {
    pub(crate) body: RigidBodyHandle,
    pub(crate) collider: ColliderHandle,
}

/// Rapier world in viewport pixel coordinates (y grows downward).
pub(crate) struct SimWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    params: IntegrationParameters,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    bodies: RigidBodySet,
    colliders: ColliderSet,
}

impl SimWorld {
    pub(crate) fn new(gravity: Vec2, dt: f64, pixels_per_meter: f64) -> Self {
        let mut params = IntegrationParameters::default();
        params.dt = dt as Real;
        params.length_unit = pixels_per_meter as Real;
        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vector![gravity.x as Real, gravity.y as Real],
            params,
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
        }
    }

    pub(crate) fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    pub(crate) fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Gravity-free dynamic box that only moves through contacts and explicit velocities.
    pub(crate) fn insert_floating_box(&mut self, desc: BoxDesc) -> BodyHandles {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![desc.center.x as Real, desc.center.y as Real])
            .gravity_scale(0.0)
            .linear_damping(desc.damping as Real)
            .angular_damping(desc.damping as Real)
            .build();
        self.insert_with_cuboid(body, desc)
    }

    pub(crate) fn insert_fixed_box(&mut self, desc: BoxDesc) -> BodyHandles {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![desc.center.x as Real, desc.center.y as Real])
            .build();
        self.insert_with_cuboid(body, desc)
    }

    fn insert_with_cuboid(&mut self, body: RigidBody, desc: BoxDesc) -> BodyHandles {
        let body = self.bodies.insert(body);
        let collider = ColliderBuilder::cuboid(
            (desc.size.width * 0.5).max(0.5) as Real,
            (desc.size.height * 0.5).max(0.5) as Real,
        )
        .density(desc.density as Real)
        .friction(0.8)
        .restitution(0.0)
        .collision_groups(desc.filter.to_groups())
        .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        BodyHandles { body, collider }
    }

    pub(crate) fn insert_ball(&mut self, desc: BallDesc) -> BodyHandles {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![desc.center.x as Real, desc.center.y as Real])
            .build();
        let body = self.bodies.insert(body);
        let collider = ColliderBuilder::ball(desc.radius.max(0.5) as Real)
            .density(desc.density as Real)
            .restitution(desc.restitution as Real)
            .friction(desc.friction as Real)
            .collision_groups(desc.filter.to_groups())
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        BodyHandles { body, collider }
    }

    pub(crate) fn insert_spring(
        &mut self,
        a: RigidBodyHandle,
        b: RigidBodyHandle,
        desc: SpringDesc,
    ) -> ImpulseJointHandle {
        let joint = SpringJointBuilder::new(
            desc.rest_length as Real,
            desc.stiffness as Real,
            desc.damping as Real,
        )
        .local_anchor1(point![desc.anchor1.x as Real, desc.anchor1.y as Real])
        .local_anchor2(point![desc.anchor2.x as Real, desc.anchor2.y as Real])
        .build();
        self.impulse_joints.insert(a, b, joint, true)
    }

    pub(crate) fn remove_joint(&mut self, handle: ImpulseJointHandle) {
        self.impulse_joints.remove(handle, true);
    }

    #[cfg(test)]
    pub(crate) fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }

    pub(crate) fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    pub(crate) fn position(&self, handle: RigidBodyHandle) -> Option<(PagePoint, f64)> {
        let body = self.bodies.get(handle)?;
        let t = body.translation();
        Some((
            PagePoint::new(f64::from(t.x), f64::from(t.y)),
            f64::from(body.rotation().angle()),
        ))
    }

    pub(crate) fn linvel(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        let v = self.bodies.get(handle)?.linvel();
        Some(Vec2::new(f64::from(v.x), f64::from(v.y)))
    }

    /// Move a body, clearing rotation and velocity.
    pub(crate) fn teleport(&mut self, handle: RigidBodyHandle, center: PagePoint) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_position(
                Isometry::translation(center.x as Real, center.y as Real),
                true,
            );
            body.set_linvel(vector![0.0, 0.0], true);
            body.set_angvel(0.0, true);
        }
    }

    pub(crate) fn set_velocity(&mut self, handle: RigidBodyHandle, linvel: Vec2, angvel: f64) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_linvel(vector![linvel.x as Real, linvel.y as Real], true);
            body.set_angvel(angvel as Real, true);
        }
    }

    pub(crate) fn set_linvel(&mut self, handle: RigidBodyHandle, linvel: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_linvel(vector![linvel.x as Real, linvel.y as Real], true);
        }
    }

    pub(crate) fn set_enabled(&mut self, handle: RigidBodyHandle, enabled: bool) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_enabled(enabled);
        }
    }

    #[cfg(test)]
    pub(crate) fn is_enabled(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.get(handle).is_some_and(|b| b.is_enabled())
    }

    pub(crate) fn filter(&self, handle: ColliderHandle) -> Option<CollisionFilter> {
        self.colliders
            .get(handle)
            .map(|c| CollisionFilter::from_groups(c.collision_groups()))
    }

    pub(crate) fn set_filter(&mut self, handle: ColliderHandle, filter: CollisionFilter) {
        if let Some(c) = self.colliders.get_mut(handle) {
            if CollisionFilter::from_groups(c.collision_groups()) != filter {
                c.set_collision_groups(filter.to_groups());
            }
        }
    }

    /// Resize and move a fixed box in place.
    pub(crate) fn reshape_fixed_box(
        &mut self,
        handles: BodyHandles,
        center: PagePoint,
        size: Size,
    ) {
        if let Some(c) = self.colliders.get_mut(handles.collider) {
            c.set_shape(SharedShape::cuboid(
                (size.width * 0.5).max(0.5) as Real,
                (size.height * 0.5).max(0.5) as Real,
            ));
        }
        if let Some(body) = self.bodies.get_mut(handles.body) {
            body.set_translation(vector![center.x as Real, center.y as Real], true);
        }
    }

    /// Axis-aligned extent of a box body; `None` for missing bodies and non-box shapes.
    pub(crate) fn box_rect(&self, handles: BodyHandles) -> Option<Rect> {
        let half = self.colliders.get(handles.collider)?.shape().as_cuboid()?.half_extents;
        let (center, _) = self.position(handles.body)?;
        let (hx, hy) = (f64::from(half.x), f64::from(half.y));
        Some(Rect::new(
            center.x - hx,
            center.y - hy,
            center.x + hx,
            center.y + hy,
        ))
    }

    /// Shape-to-shape distance between two colliders; `None` when either is missing or the
    /// pair is unsupported.
    pub(crate) fn distance(&self, a: ColliderHandle, b: ColliderHandle) -> Option<f64> {
        let ca = self.colliders.get(a)?;
        let cb = self.colliders.get(b)?;
        query::distance(ca.position(), ca.shape(), cb.position(), cb.shape())
            .ok()
            .map(f64::from)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/physics/world.rs"]
mod tests;
