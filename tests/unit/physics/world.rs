use super::*;

fn world() -> SimWorld {
    SimWorld::new(Vec2::new(0.0, 980.0), 1.0 / 60.0, 100.0)
}

fn block(center: PagePoint) -> BoxDesc {
    BoxDesc {
        center,
        size: Size::new(100.0, 40.0),
        density: 0.001,
        damping: 4.0,
        filter: CollisionFilter::SCENERY,
    }
}

fn ball(center: PagePoint) -> BallDesc {
    BallDesc {
        center,
        radius: 4.0,
        density: 1.0,
        restitution: 0.2,
        friction: 0.5,
        filter: CollisionFilter::ACTOR,
    }
}

#[test]
fn floating_box_ignores_gravity() {
    let mut w = world();
    let h = w.insert_floating_box(block(PagePoint::new(50.0, 20.0)));
    for _ in 0..30 {
        w.step();
    }
    let (p, angle) = w.position(h.body).unwrap();
    assert!((p.x - 50.0).abs() < 1e-3);
    assert!((p.y - 20.0).abs() < 1e-3);
    assert!(angle.abs() < 1e-6);
}

#[test]
fn ball_falls_under_gravity() {
    let mut w = world();
    let h = w.insert_ball(ball(PagePoint::new(0.0, 0.0)));
    for _ in 0..10 {
        w.step();
    }
    let (p, _) = w.position(h.body).unwrap();
    assert!(p.y > 1.0);
    assert!(w.linvel(h.body).unwrap().y > 0.0);
}

#[test]
fn disabled_body_stays_put() {
    let mut w = world();
    let h = w.insert_ball(ball(PagePoint::new(0.0, 0.0)));
    w.set_enabled(h.body, false);
    assert!(!w.is_enabled(h.body));
    for _ in 0..10 {
        w.step();
    }
    let (p, _) = w.position(h.body).unwrap();
    assert_eq!(p.y, 0.0);

    w.set_enabled(h.body, true);
    assert!(w.is_enabled(h.body));
}

#[test]
fn filters_are_readable_and_writable() {
    let mut w = world();
    let h = w.insert_floating_box(block(PagePoint::new(0.0, 0.0)));
    assert_eq!(w.filter(h.collider), Some(CollisionFilter::SCENERY));
    w.set_filter(h.collider, CollisionFilter::SCENERY_PASSIVE);
    assert_eq!(w.filter(h.collider), Some(CollisionFilter::SCENERY_PASSIVE));
}

#[test]
fn removal_drops_body_and_collider() {
    let mut w = world();
    let h = w.insert_floating_box(block(PagePoint::new(0.0, 0.0)));
    assert_eq!(w.body_count(), 1);
    w.remove_body(h.body);
    assert_eq!(w.body_count(), 0);
    assert!(w.position(h.body).is_none());
    assert!(w.filter(h.collider).is_none());
}

#[test]
fn distance_between_separated_shapes() {
    let mut w = world();
    let a = w.insert_fixed_box(block(PagePoint::new(50.0, 20.0)));
    let b = w.insert_ball(ball(PagePoint::new(50.0, -14.0)));
    // Box top edge at y=0, ball bottom at y=-10.
    let d = w.distance(a.collider, b.collider).unwrap();
    assert!((d - 10.0).abs() < 1e-3, "distance was {d}");
}

#[test]
fn teleport_resets_motion() {
    let mut w = world();
    let h = w.insert_floating_box(block(PagePoint::new(0.0, 0.0)));
    w.set_velocity(h.body, Vec2::new(100.0, 0.0), 1.0);
    w.step();
    w.teleport(h.body, PagePoint::new(10.0, 10.0));
    let (p, angle) = w.position(h.body).unwrap();
    assert_eq!((p.x, p.y), (10.0, 10.0));
    assert_eq!(angle, 0.0);
    assert_eq!(w.linvel(h.body).unwrap(), Vec2::ZERO);
}

#[test]
fn reshape_moves_and_resizes_fixed_box() {
    let mut w = world();
    let h = w.insert_fixed_box(block(PagePoint::new(50.0, 20.0)));
    assert_eq!(w.box_rect(h), Some(Rect::new(0.0, 0.0, 100.0, 40.0)));

    w.reshape_fixed_box(h, PagePoint::new(200.0, 100.0), Size::new(400.0, 20.0));
    assert_eq!(w.box_rect(h), Some(Rect::new(0.0, 90.0, 400.0, 110.0)));

    let b = w.insert_ball(ball(PagePoint::new(0.0, 0.0)));
    assert_eq!(w.box_rect(b), None);
}
