use std::collections::{BTreeSet, HashSet};

use ordered_tree::OrderedTree;
use quickcheck::quickcheck;

fn tree_of(xs: &[i8]) -> OrderedTree<i8> {
    xs.iter().copied().collect()
}

quickcheck! {
    fn contains(xs: Vec<i8>) -> bool {
        let tree = tree_of(&xs);

        xs.iter().all(|x| tree.find(x).get() == Some(x))
    }

    fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
        let tree = tree_of(&xs);
        let added: HashSet<_> = xs.into_iter().collect();
        let nots: HashSet<_> = nots.into_iter().collect();
        let mut nots = nots.difference(&added);

        nots.all(|x| tree.find(x).is_end())
    }

    fn duplicates_leave_len_alone(xs: Vec<i8>) -> bool {
        let mut tree = tree_of(&xs);
        let len = tree.len();
        for x in &xs {
            if tree.insert(*x).get() != Some(x) {
                return false;
            }
        }

        tree.len() == len && len == xs.iter().collect::<BTreeSet<_>>().len()
    }

    fn inorder_is_sorted_and_deduplicated(xs: Vec<i8>) -> bool {
        let tree = tree_of(&xs);
        let mut expected = String::new();
        for x in xs.iter().collect::<BTreeSet<_>>() {
            expected.push_str(&format!("{} ", x));
        }

        let mut sink = String::new();
        tree.traverse_inorder(&mut sink).is_ok() && sink == expected
    }

    fn preorder_rebuilds_the_same_shape(xs: Vec<i8>) -> bool {
        let tree = tree_of(&xs);
        let mut preorder = String::new();
        if tree.traverse_preorder(&mut preorder).is_err() {
            return false;
        }

        // Inserting keys in pre-order reproduces the tree exactly.
        let keys: Vec<i8> = preorder.split_whitespace().map(|k| k.parse().unwrap()).collect();
        let rebuilt = tree_of(&keys);
        let mut again = String::new();
        rebuilt.traverse_preorder(&mut again).is_ok()
            && again == preorder
            && rebuilt.height() == tree.height()
    }

    fn min_greater_than_matches_btree_set(xs: Vec<i8>, probe: i8) -> bool {
        let tree = tree_of(&xs);
        let set: BTreeSet<_> = xs.into_iter().collect();

        tree.min_greater_than(&probe).get() == set.iter().find(|x| **x > probe)
    }

    fn copies_are_independent(xs: Vec<i8>, extra: Vec<i8>) -> bool {
        let mut original = tree_of(&xs);
        let copy = original.clone();
        let snapshot: Vec<i8> = copy.iter().copied().collect();

        original.extend(extra.iter().copied());
        if let Some(key) = original.begin_mut().get_mut() {
            *key = key.wrapping_add(1);
        }

        copy.iter().copied().eq(snapshot) && copy.check_sorting_invariant()
    }

    fn cursor_walk_matches_iter(xs: Vec<i8>) -> bool {
        let tree = tree_of(&xs);
        let mut cursor = tree.begin();
        let mut walked: Vec<&i8> = Vec::new();
        for _ in 0..tree.len() {
            walked.extend(cursor.get());
            cursor.move_next();
        }

        cursor == tree.end() && tree.iter().eq(walked)
    }
}
