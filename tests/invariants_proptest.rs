//! Property tests: red-black invariants over arbitrary operation sequences.

use std::collections::BTreeSet;

use proptest::prelude::*;

use rbtrace::domain::{verify, Document, RedBlackTree};

#[derive(Debug, Clone)]
enum Op {
    Insert(i16),
    Remove(i16),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (-64i16..64).prop_map(Op::Insert),
        2 => (-64i16..64).prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn invariants_hold_after_every_operation(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut tree = RedBlackTree::new();
        let mut model = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(v) => {
                    tree.insert(v);
                    model.insert(v);
                }
                Op::Remove(v) => {
                    prop_assert_eq!(tree.remove(&v), model.remove(&v));
                }
            }
            prop_assert!(verify(&tree).is_ok(), "{:?}", verify(&tree));
        }

        let expected: Vec<&i16> = model.iter().collect();
        prop_assert_eq!(tree.in_order(), expected);
        prop_assert_eq!(tree.len(), model.len());
    }

    #[test]
    fn height_stays_within_red_black_bound(values in prop::collection::btree_set(any::<i32>(), 1..300)) {
        let tree: RedBlackTree<i32> = values.iter().copied().collect();
        let n = values.len() as f64;
        let bound = 2.0 * (n + 1.0).log2();
        prop_assert!(tree.height() as f64 <= bound);
    }

    #[test]
    fn document_round_trip_is_identity(values in prop::collection::vec(any::<i64>(), 0..100)) {
        let tree: RedBlackTree<i64> = values.into_iter().collect();
        let doc = tree.to_document();

        let json = doc.to_json_string(false).unwrap();
        let parsed: Document<i64> = Document::from_json_str(&json).unwrap();
        let rebuilt = RedBlackTree::from_document(parsed);

        prop_assert_eq!(rebuilt.to_document(), doc);
    }

    #[test]
    fn duplicate_insert_leaves_document_unchanged(values in prop::collection::vec(-50i32..50, 1..60), pick in any::<prop::sample::Index>()) {
        let mut tree: RedBlackTree<i32> = values.iter().copied().collect();
        let before = tree.to_document();

        tree.insert(values[pick.index(values.len())]);

        prop_assert_eq!(tree.to_document(), before);
    }
}
