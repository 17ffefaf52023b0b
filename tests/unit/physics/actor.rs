use std::time::Duration;

use super::*;

fn world() -> SimWorld {
    SimWorld::new(Vec2::new(0.0, 980.0), 1.0 / 60.0, 100.0)
}

fn still_config() -> ActorConfig {
    ActorConfig {
        kick_speed: 0.0,
        ..ActorConfig::default()
    }
}

#[test]
fn spawn_builds_chain_and_spine() {
    let mut w = world();
    let actor = Actor::spawn(&mut w, ActorConfig::default(), Point::new(0.0, 0.0)).unwrap();
    assert_eq!(actor.segment_count(), 8);
    assert_eq!(w.body_count(), 8);
    assert_eq!(actor.joints.len(), 8);
    assert_eq!(w.joint_count(), 8);
    assert_eq!(actor.state(), Locomotion::Idle);
    assert!(!actor.is_supported());
}

#[test]
fn spawn_rejects_invalid_config() {
    let mut w = world();
    let cfg = ActorConfig {
        segments: 1,
        ..ActorConfig::default()
    };
    assert!(Actor::spawn(&mut w, cfg, Point::ZERO).is_err());
    assert_eq!(w.body_count(), 0);
}

#[test]
fn unsupported_actor_stays_idle() {
    let mut w = world();
    let mut actor = Actor::spawn(&mut w, ActorConfig::default(), Point::ZERO).unwrap();
    actor.set_direction(Some(Direction::Left));
    actor.update(&mut w, Instant::now(), false);
    assert_eq!(actor.state(), Locomotion::Idle);
}

#[test]
fn supported_actor_starts_walking() {
    let mut w = world();
    let mut actor = Actor::spawn(&mut w, ActorConfig::default(), Point::ZERO).unwrap();
    let now = Instant::now();

    actor.update(&mut w, now, true);
    assert_eq!(actor.state(), Locomotion::Idle, "no direction requested");

    // Spawned head-left, so walking left needs no switch.
    actor.set_direction(Some(Direction::Left));
    actor.update(&mut w, now, true);
    assert_eq!(actor.state(), Locomotion::Walking);
    actor.update(&mut w, now, true);
    assert_eq!(actor.state(), Locomotion::Walking);
    assert!(w.linvel(actor.segments()[0].body).unwrap().x < 0.0);
}

#[test]
fn losing_support_returns_to_idle() {
    let mut w = world();
    let mut actor = Actor::spawn(&mut w, ActorConfig::default(), Point::ZERO).unwrap();
    let now = Instant::now();
    actor.set_direction(Some(Direction::Left));
    actor.update(&mut w, now, true);
    assert_eq!(actor.state(), Locomotion::Walking);

    actor.update(&mut w, now, false);
    assert_eq!(actor.state(), Locomotion::Idle);
}

#[test]
fn reversing_direction_switches_then_times_out() {
    let mut w = world();
    let mut actor = Actor::spawn(&mut w, still_config(), Point::ZERO).unwrap();
    let t0 = Instant::now();
    actor.set_direction(Some(Direction::Right));

    actor.update(&mut w, t0, true);
    assert_eq!(actor.state(), Locomotion::Walking);
    actor.update(&mut w, t0, true);
    assert_eq!(actor.state(), Locomotion::SwitchingPosition);

    actor.update(&mut w, t0 + Duration::from_millis(2_900), true);
    assert_eq!(actor.state(), Locomotion::SwitchingPosition);

    actor.update(&mut w, t0 + Duration::from_millis(3_000), true);
    assert_eq!(actor.state(), Locomotion::Walking);
}

#[test]
fn changing_direction_mid_switch_resumes_walking() {
    let mut w = world();
    let mut actor = Actor::spawn(&mut w, still_config(), Point::ZERO).unwrap();
    let t0 = Instant::now();
    actor.set_direction(Some(Direction::Right));
    actor.update(&mut w, t0, true);
    actor.update(&mut w, t0, true);
    assert_eq!(actor.state(), Locomotion::SwitchingPosition);

    actor.set_direction(Some(Direction::Left));
    assert_eq!(actor.state(), Locomotion::Walking);
    assert_eq!(actor.direction(), Some(Direction::Left));
}

#[test]
fn remove_clears_bodies_and_joints() {
    let mut w = world();
    let actor = Actor::spawn(&mut w, ActorConfig::default(), Point::ZERO).unwrap();
    actor.remove(&mut w);
    assert_eq!(w.body_count(), 0);
    assert_eq!(w.joint_count(), 0);
}
