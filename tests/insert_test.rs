//! Insertion fixup scenarios on seeded trees.

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};

use rbtrace::domain::{verify, Color, Document, RedBlackTree};
use rbtrace::util::testing::{black, init_test_setup, nil, red};

fn seeded(doc: Value) -> RedBlackTree<i64> {
    RedBlackTree::from_document(Document::from_value(&doc).expect("valid fixture"))
}

fn leaf(value: i64) -> Value {
    json!({"value": value, "color": "red", "left": null, "right": null})
}

fn black_leaf(value: i64) -> Value {
    json!({"value": value, "color": "black", "left": null, "right": null})
}

#[test]
fn given_empty_tree_when_insert_then_single_black_root() {
    init_test_setup();
    let mut tree = RedBlackTree::new();

    tree.insert(10_i64);

    assert_eq!(
        tree.to_document().to_value(),
        json!({"value": 10, "color": "black", "left": null, "right": null})
    );
}

#[test]
fn given_black_root_when_insert_smaller_then_red_left_child_without_rebalancing() {
    let mut tree = seeded(black_leaf(10));

    tree.insert(5);

    assert_eq!(tree.to_document(), black(10, red(5, nil(), nil()), nil()));
}

#[test]
fn given_red_left_child_when_insert_inner_grandchild_then_double_rotation() {
    let mut tree = seeded(json!({"value": 10, "color": "black", "left": leaf(5), "right": null}));

    tree.insert(7);

    assert_eq!(
        tree.to_document(),
        black(7, red(5, nil(), nil()), red(10, nil(), nil()))
    );
    assert_eq!(verify(&tree), Ok(2));
}

#[rstest]
#[case::red_uncle(
    black(10, black(5, red(3, nil(), nil()), red(7, nil(), nil())), black(15, nil(), nil())),
    1,
    black(10, red(5, black(3, red(1, nil(), nil()), nil()), black(7, nil(), nil())), black(15, nil(), nil()))
)]
#[case::red_siblings(
    black(5, red(3, nil(), nil()), red(7, nil(), nil())),
    1,
    black(5, black(3, red(1, nil(), nil()), nil()), black(7, nil(), nil()))
)]
#[case::right_left(
    black(10, nil(), red(15, nil(), nil())),
    12,
    black(12, red(10, nil(), nil()), red(15, nil(), nil()))
)]
#[case::right_right(
    black(10, nil(), red(15, nil(), nil())),
    20,
    black(15, red(10, nil(), nil()), red(20, nil(), nil()))
)]
#[case::left_left(
    black(10, red(5, nil(), nil()), nil()),
    1,
    black(5, red(1, nil(), nil()), red(10, nil(), nil()))
)]
fn given_seeded_tree_when_insert_then_expected_shape(
    #[case] seed: Document<i64>,
    #[case] value: i64,
    #[case] expected: Document<i64>,
) {
    let mut tree = RedBlackTree::from_document(seed);

    tree.insert(value);

    assert_eq!(tree.to_document(), expected);
    assert!(verify(&tree).is_ok());
}

// Seeds below keep 2 under 3's right side, so only the shape is asserted.
#[test]
fn given_red_uncle_chain_when_insert_then_grandparent_line_rotation_moves_root() {
    let mut tree = RedBlackTree::from_document(black(
        10,
        red(5, black(3, red(1, nil(), nil()), red(2, nil(), nil())), black(7, nil(), nil())),
        black(15, nil(), nil()),
    ));

    tree.insert(0);

    assert_eq!(
        tree.to_document(),
        black(
            5,
            red(3, black(1, red(0, nil(), nil()), nil()), black(2, nil(), nil())),
            red(10, black(7, nil(), nil()), black(15, nil(), nil())),
        )
    );
}

#[test]
fn given_full_subtrees_when_insert_then_inner_subtree_moves_with_rotation() {
    let mut tree = RedBlackTree::from_document(black(
        10,
        red(
            5,
            black(3, red(1, nil(), nil()), red(2, nil(), nil())),
            black(7, red(6, nil(), nil()), red(8, nil(), nil())),
        ),
        black(15, red(14, nil(), nil()), red(16, nil(), nil())),
    ));

    tree.insert(0);

    assert_eq!(
        tree.to_document(),
        black(
            5,
            red(3, black(1, red(0, nil(), nil()), nil()), black(2, nil(), nil())),
            red(
                10,
                black(7, red(6, nil(), nil()), red(8, nil(), nil())),
                black(15, red(14, nil(), nil()), red(16, nil(), nil())),
            ),
        )
    );
}

#[test]
fn given_ascending_inserts_when_done_then_balanced_shape() {
    let tree: RedBlackTree<i64> = (1..=7).collect();

    assert_eq!(
        tree.to_document(),
        black(
            2,
            black(1, nil(), nil()),
            red(
                4,
                black(3, nil(), nil()),
                black(6, red(5, nil(), nil()), red(7, nil(), nil())),
            ),
        )
    );
    assert_eq!(tree.height(), 4);
    assert_eq!(tree.black_height(), 2);
}

#[test]
fn given_present_value_when_insert_then_no_op() {
    let mut tree: RedBlackTree<i64> = [8, 4, 12, 2, 6].into_iter().collect();
    let before = tree.to_document();

    tree.insert(6);

    assert_eq!(tree.to_document(), before);
    assert_eq!(tree.len(), 5);
    assert_eq!(tree.find(&6).map(|n| n.color()), Some(Color::Red));
}
