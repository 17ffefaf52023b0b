use super::*;
use crate::packer::block::BlockId;

fn packer(width: f64, height: f64) -> Packer {
    Packer::new(width, height, PackerOptions::default()).unwrap()
}

fn xy(p: &Position) -> (f64, f64) {
    (p.x, p.y)
}

#[test]
fn first_block_lands_at_origin() {
    let mut p = packer(150.0, 400.0);
    let out = p.set_blocks(&[Block::new(100.0, 50.0, 1)]).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(xy(&out[0]), (0.0, 0.0));
    assert_eq!(out[0].source_id, None);
    assert_eq!(out[0].parent_position, None);
}

#[test]
fn right_side_wins_when_it_fits() {
    let mut p = packer(100.0, 200.0);
    let out = p
        .set_blocks(&[
            Block::new(50.0, 50.0, "a"),
            Block::new(50.0, 50.0, "b"),
            Block::new(50.0, 50.0, "c"),
        ])
        .unwrap();
    assert_eq!(xy(&out[1]), (50.0, 0.0));
    assert_eq!(out[1].parent_position, Some(Side::Right));
    assert_eq!(out[1].source_id, Some(BlockId::from("a")));

    // Right of "a" is taken, so the candidate is relaxed below "b".
    assert_eq!(xy(&out[2]), (50.0, 50.0));
    assert_eq!(out[2].parent_position, Some(Side::Right));
}

#[test]
fn malformed_block_mid_queue_halts() {
    let mut p = packer(150.0, 400.0);
    let out = p
        .set_blocks(&[
            Block::new(50.0, 50.0, 1),
            Block::new(0.0, 50.0, 2),
            Block::new(50.0, 50.0, 3),
        ])
        .unwrap();
    assert_eq!(out.len(), 1);
    assert!(!p.is_complete());
}

#[test]
fn height_bound_terminates_early() {
    let blocks: Vec<Block> = (0..4).map(|i| Block::new(100.0, 60.0, i)).collect();

    let mut bounded = packer(100.0, 100.0);
    assert_eq!(bounded.set_blocks(&blocks).unwrap().len(), 1);

    let mut growing = Packer::new(
        100.0,
        100.0,
        PackerOptions {
            auto_resize: Some(AutoResize::Height),
            ..PackerOptions::default()
        },
    )
    .unwrap();
    let out = growing.set_blocks(&blocks).unwrap();
    let ys: Vec<f64> = out.iter().map(|p| p.y).collect();
    assert_eq!(ys, vec![0.0, 60.0, 120.0, 180.0]);
    assert_eq!(growing.content_height(), 240.0);
}

#[test]
fn too_wide_block_is_left_unplaced() {
    let mut p = packer(100.0, 400.0);
    let out = p
        .set_blocks(&[Block::new(50.0, 50.0, 1), Block::new(120.0, 50.0, 2)])
        .unwrap();
    assert_eq!(out.len(), 1);
}

#[test]
fn strict_policy_rejects_duplicate_ids() {
    let mut p = packer(200.0, 200.0);
    let err = p
        .set_blocks(&[Block::new(50.0, 50.0, "x"), Block::new(50.0, 50.0, "x")])
        .unwrap_err();
    assert!(matches!(err, FolioError::DuplicateId { .. }));
    assert_eq!(p.block_count(), 0);

    p.set_blocks(&[Block::new(50.0, 50.0, "x")]).unwrap();
    assert!(p.add_block(Block::new(10.0, 10.0, "x")).is_err());
    assert_eq!(p.block_count(), 1);
}

#[test]
fn lenient_policy_places_duplicates_independently() {
    let mut p = Packer::new(
        200.0,
        200.0,
        PackerOptions {
            id_policy: IdPolicy::Lenient,
            ..PackerOptions::default()
        },
    )
    .unwrap();
    let out = p
        .set_blocks(&[Block::new(50.0, 50.0, "x"), Block::new(50.0, 50.0, "x")])
        .unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(xy(&out[1]), (50.0, 0.0));
}

#[test]
fn anonymous_blocks_take_their_index() {
    let mut p = packer(200.0, 200.0);
    let out = p
        .set_blocks(&[Block::anonymous(50.0, 50.0), Block::anonymous(50.0, 50.0)])
        .unwrap();
    assert_eq!(out[0].id, BlockId::Index(0));
    assert_eq!(out[1].id, BlockId::Index(1));
}

#[test]
fn add_block_keeps_existing_placements() {
    let mut p = packer(150.0, 400.0);
    p.set_blocks(&[Block::new(100.0, 50.0, "a"), Block::new(50.0, 50.0, "b")])
        .unwrap();
    let before = p.positions().to_vec();

    let out = p.add_block(Block::new(150.0, 30.0, "c")).unwrap().to_vec();
    assert_eq!(&out[..2], &before[..]);
    assert_eq!(xy(&out[2]), (0.0, 50.0));
    assert!(p.is_complete());
}

#[test]
fn add_block_retries_leftovers() {
    let mut p = packer(100.0, 100.0);
    p.set_blocks(&[Block::new(100.0, 60.0, 0), Block::new(100.0, 60.0, 1)])
        .unwrap();
    assert_eq!(p.positions().len(), 1);

    // The new block fits below block 0; block 1 still does not.
    let out = p.add_block(Block::new(100.0, 40.0, 2)).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[1].id, BlockId::Index(2));
    assert_eq!(xy(&out[1]), (0.0, 60.0));

    let out = p.set_dimensions(100.0, 200.0).unwrap();
    assert_eq!(out.len(), 3);
}

#[test]
fn invalid_dimensions_are_rejected_and_keep_layout() {
    let mut p = packer(100.0, 100.0);
    p.set_blocks(&[Block::new(50.0, 50.0, 0)]).unwrap();
    let before = p.positions().to_vec();

    let err = p.set_dimensions(f64::NAN, 100.0).unwrap_err();
    assert!(matches!(err, FolioError::Validation(_)));
    assert!(p.set_dimensions(100.0, -1.0).is_err());
    assert_eq!(p.positions(), before.as_slice());

    // A valid but too-narrow container is not an error; nothing fits.
    assert!(p.set_dimensions(10.0, 100.0).unwrap().is_empty());
    assert_eq!(p.set_dimensions(100.0, 100.0).unwrap().len(), 1);
}

#[test]
fn zero_cache_window_is_rejected() {
    let err = Packer::new(
        10.0,
        10.0,
        PackerOptions {
            cache_window: Some(0),
            ..PackerOptions::default()
        },
    )
    .unwrap_err();
    assert!(err.to_string().contains("cache_window"));
}

#[test]
fn configured_order_is_resolved() {
    let p = Packer::new(
        10.0,
        10.0,
        PackerOptions {
            order: vec!["y".to_string(), "bogus".to_string(), "x".to_string()],
            ..PackerOptions::default()
        },
    )
    .unwrap();
    assert_eq!(p.order(), &[OrderKey::Y, OrderKey::X]);
}

#[test]
fn position_json_uses_camel_case() {
    let pos = Position {
        x: 1.0,
        y: 2.0,
        width: 3.0,
        height: 4.0,
        id: BlockId::from("b"),
        source_id: Some(BlockId::Index(0)),
        parent_position: Some(Side::Bottom),
    };
    let json = serde_json::to_value(&pos).unwrap();
    assert_eq!(json["sourceId"], 0);
    assert_eq!(json["parentPosition"], "bottom");
    assert_eq!(json["id"], "b");
}
