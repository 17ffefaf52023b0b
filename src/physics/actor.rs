use std::time::Instant;

use rapier2d::prelude::ImpulseJointHandle;

use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::FolioResult;

use super::collision::CollisionFilter;
use super::config::ActorConfig;
use super::world::{BallDesc, BodyHandles, SimWorld, SpringDesc};

/// Walking direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward smaller x.
    Left,
    /// Toward larger x.
    Right,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Locomotion state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Locomotion {
    /// Unsupported, or no direction requested.
    Idle,
    /// Striding toward the requested direction.
    Walking,
    /// Flipping the head over to face the requested direction.
    SwitchingPosition,
}

/// Opaque actor handle returned by the bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub(crate) u64);

/// A chain of ball segments (head first) joined by springs, plus a head-to-tail spine.
#[derive(Debug)]
pub struct Actor {
    config: ActorConfig,
    segments: Vec<BodyHandles>,
    joints: Vec<ImpulseJointHandle>,
    direction: Option<Direction>,
    state: Locomotion,
    switch_started: Option<Instant>,
    supported: bool,
}

impl Actor {
    /// Build the chain with its head at `origin`, extending to the right.
    pub(crate) fn spawn(
        world: &mut SimWorld,
        config: ActorConfig,
        origin: Point,
    ) -> FolioResult<Self> {
        config.validate()?;
        let size = config.segment_size;

        let segments: Vec<BodyHandles> = (0..config.segments)
            .map(|i| {
                world.insert_ball(BallDesc {
                    center: Point::new(origin.x + size * i as f64 + size * 0.5, origin.y),
                    radius: size * 0.5,
                    density: config.density,
                    restitution: config.restitution,
                    friction: config.friction,
                    filter: CollisionFilter::ACTOR,
                })
            })
            .collect();

        let link = SpringDesc {
            rest_length: (size + 2.0) * config.floppiness,
            stiffness: config.link_stiffness,
            damping: config.link_damping,
            anchor1: Vec2::new(size * 0.5, 0.0),
            anchor2: Vec2::ZERO,
        };
        let mut joints: Vec<ImpulseJointHandle> = segments
            .windows(2)
            .map(|pair| world.insert_spring(pair[0].body, pair[1].body, link))
            .collect();

        let head = segments[0].body;
        let tail = segments[segments.len() - 1].body;
        joints.push(world.insert_spring(
            head,
            tail,
            SpringDesc {
                rest_length: config.body_length(),
                stiffness: config.spine_stiffness,
                damping: config.spine_damping,
                anchor1: Vec2::ZERO,
                anchor2: Vec2::ZERO,
            },
        ));

        Ok(Self {
            config,
            segments,
            joints,
            direction: None,
            state: Locomotion::Idle,
            switch_started: None,
            supported: false,
        })
    }

    /// Current locomotion state.
    pub fn state(&self) -> Locomotion {
        self.state
    }

    /// Requested direction.
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Request walking in `direction`; `None` lets the actor come to rest.
    pub fn set_direction(&mut self, direction: Option<Direction>) {
        if self.direction != direction {
            self.direction = direction;
            self.switch_started = None;
            if self.state == Locomotion::SwitchingPosition {
                self.state = Locomotion::Walking;
            }
        }
    }

    /// Whether any segment touched collidable scenery on the last update.
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Tuning in effect.
    pub fn config(&self) -> &ActorConfig {
        &self.config
    }

    pub(crate) fn segments(&self) -> &[BodyHandles] {
        &self.segments
    }

    fn head(&self) -> BodyHandles {
        self.segments[0]
    }

    fn tail(&self) -> BodyHandles {
        self.segments[self.segments.len() - 1]
    }

    fn belly(&self) -> BodyHandles {
        self.segments[(self.segments.len() - 1) / 2]
    }

    fn x_of(world: &SimWorld, h: BodyHandles) -> Option<f64> {
        world.position(h.body).map(|(p, _)| p.x)
    }

    /// Head on the opposite side of the tail from `dir`.
    fn facing_away(&self, world: &SimWorld, dir: Direction) -> bool {
        match (Self::x_of(world, self.head()), Self::x_of(world, self.tail())) {
            (Some(head), Some(tail)) => (head - tail) * dir.sign() < 0.0,
            _ => false,
        }
    }

    fn head_passed_belly(&self, world: &SimWorld, dir: Direction) -> bool {
        match (Self::x_of(world, self.head()), Self::x_of(world, self.belly())) {
            (Some(head), Some(belly)) => {
                (head - belly) * dir.sign() > self.config.segment_size * 3.0
            }
            _ => false,
        }
    }

    /// Advance the locomotion state machine by one frame.
    pub(crate) fn update(&mut self, world: &mut SimWorld, now: Instant, supported: bool) {
        self.supported = supported;
        let Some(dir) = self.direction.filter(|_| supported) else {
            if self.state != Locomotion::Idle {
                tracing::debug!(state = ?self.state, supported, "actor going idle");
            }
            self.state = Locomotion::Idle;
            self.switch_started = None;
            return;
        };

        match self.state {
            Locomotion::Idle => self.state = Locomotion::Walking,
            Locomotion::Walking => {
                if self.facing_away(world, dir) {
                    self.state = Locomotion::SwitchingPosition;
                    self.switch_started = Some(now);
                    self.kick(world, dir);
                } else {
                    self.stride(world, dir);
                }
            }
            Locomotion::SwitchingPosition => {
                let started = *self.switch_started.get_or_insert(now);
                let timed_out =
                    now.saturating_duration_since(started) >= self.config.switch_timeout();
                if timed_out || self.head_passed_belly(world, dir) {
                    if timed_out {
                        tracing::debug!("actor switch timed out");
                    }
                    self.state = Locomotion::Walking;
                    self.switch_started = None;
                } else {
                    self.kick(world, dir);
                }
            }
        }
    }

    fn kick(&self, world: &mut SimWorld, dir: Direction) {
        let v = Vec2::new(
            dir.sign() * self.config.kick_speed,
            -self.config.kick_speed * 0.5,
        );
        world.set_linvel(self.head().body, v);
    }

    fn stride(&self, world: &mut SimWorld, dir: Direction) {
        let head = self.head().body;
        let vy = world.linvel(head).map_or(0.0, |v| v.y);
        world.set_linvel(head, Vec2::new(dir.sign() * self.config.stride_speed, vy));

        let n = self.segments.len();
        let center = (n / 2) as f64;
        if center <= 0.0 {
            return;
        }
        for (i, seg) in self.segments.iter().enumerate().skip(1).take(n.saturating_sub(2)) {
            let weight = (center - (i as f64 - center).abs()).max(0.0) / center;
            let vx = world.linvel(seg.body).map_or(0.0, |v| v.x);
            world.set_linvel(seg.body, Vec2::new(vx, -self.config.curl_speed * weight));
        }
    }

    pub(crate) fn remove(self, world: &mut SimWorld) {
        for joint in self.joints {
            world.remove_joint(joint);
        }
        for seg in self.segments {
            world.remove_body(seg.body);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/physics/actor.rs"]
mod tests;
