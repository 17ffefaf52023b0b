use super::*;

fn cand(x: f64, y: f64, side: Side, position: usize) -> Candidate {
    Candidate {
        x,
        y,
        side,
        position,
        queue_idx: position,
        source_idx: 0,
    }
}

#[test]
fn unknown_keys_are_ignored() {
    let keys = resolve_order(&["y".to_string(), "depth".to_string(), "x".to_string()]);
    assert_eq!(keys, vec![OrderKey::Y, OrderKey::X]);
}

#[test]
fn empty_or_invalid_order_falls_back_to_default() {
    assert_eq!(resolve_order(&[]), DEFAULT_ORDER.to_vec());
    assert_eq!(
        resolve_order(&["nope".to_string()]),
        DEFAULT_ORDER.to_vec()
    );
}

#[test]
fn duplicate_keys_collapse() {
    let keys = resolve_order(&[
        "parentPosition".to_string(),
        "parent_position".to_string(),
    ]);
    assert_eq!(keys, vec![OrderKey::ParentPosition]);
}

#[test]
fn default_order_prefers_declaration_then_y_then_side() {
    let cands = vec![
        cand(0.0, 50.0, Side::Bottom, 1),
        cand(50.0, 0.0, Side::Right, 2),
        cand(50.0, 50.0, Side::Right, 1),
    ];
    let best = select(&DEFAULT_ORDER, &cands).unwrap();
    assert_eq!(best, &cands[2]);

    let by_y = select(&[OrderKey::Y, OrderKey::ParentPosition], &cands).unwrap();
    assert_eq!(by_y, &cands[1]);
}

#[test]
fn full_ties_keep_generation_order() {
    let cands = vec![
        cand(10.0, 0.0, Side::Left, 0),
        cand(10.0, 0.0, Side::Left, 0),
    ];
    let best = select(&DEFAULT_ORDER, &cands).unwrap();
    assert!(std::ptr::eq(best, &cands[0]));
}

#[test]
fn side_ranks_match_priority() {
    assert!(Side::Right.rank() < Side::Bottom.rank());
    assert!(Side::Bottom.rank() < Side::Left.rank());
}
