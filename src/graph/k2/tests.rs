//! Tests for the k2-tree container and its edge iterator.

use super::*;
use crate::GhostToken;
use std::collections::BTreeSet;

fn edge_set(edges: &[Edge]) -> BTreeSet<(usize, usize)> {
    edges.iter().map(|&e| e.into()).collect()
}

#[test]
fn small_graph_round_trip() {
    GhostToken::new(|token| {
        let input = [(0, 1), (1, 3), (3, 0)];
        let tree = K2Tree::<2>::from_edges(&token, 4, &input).unwrap();

        assert_eq!(tree.height(), 2);
        assert_eq!(tree.size(), 4);
        assert_eq!(tree.internal_bits().to_string(), "1110");
        assert_eq!(tree.leaf_bits().to_string(), "010000010010");

        let edges = tree.collect_edges().unwrap();
        assert_eq!(edges, vec![Edge::new(0, 1), Edge::new(1, 3), Edge::new(3, 0)]);
        assert_eq!(edge_set(&edges), input.into_iter().collect());
    });
}

#[test]
fn single_level_diagonal() {
    GhostToken::new(|token| {
        let input = [(0, 0), (1, 1), (2, 2), (3, 3)];
        let tree = K2Tree::<4>::with_height(&token, 1, &input).unwrap();

        assert!(tree.internal_bits().is_empty());
        assert_eq!(tree.leaf_bits().len(), 16);

        let edges = tree.collect_edges().unwrap();
        assert_eq!(edges.len(), 4);
        assert_eq!(edge_set(&edges), input.into_iter().collect());
    });
}

#[test]
fn empty_graph_is_immediately_ended() {
    GhostToken::new(|token| {
        let tree = K2Tree::<2>::with_height(&token, 3, &[]).unwrap();
        assert_eq!(tree.size(), 8);
        assert!(tree.leaf_bits().is_empty());

        let it = tree.edges();
        assert!(it.is_end());
        assert_eq!(it, tree.edge_end());
        assert_eq!(it.current(), Edge::sentinel(8));
        assert_eq!(tree.edges().count(), 0);
    });
}

#[test]
fn dereference_has_no_side_effects() {
    GhostToken::new(|token| {
        let tree = K2Tree::<2>::from_edges(&token, 8, &[(2, 5), (2, 6), (7, 7)]).unwrap();
        let mut it = tree.edges();

        let first = it.current();
        assert_eq!(first, it.current());
        assert_eq!(first, it.current());
        assert_eq!(first, Edge::new(2, 5));

        it.advance().unwrap();
        assert_eq!(it.current(), Edge::new(2, 6));
        assert_eq!(it.current(), Edge::new(2, 6));
    });
}

#[test]
fn cursor_protocol_reaches_end_sentinel() {
    GhostToken::new(|token| {
        let input = [(0, 3), (3, 0), (3, 3)];
        let tree = K2Tree::<2>::from_edges(&token, 4, &input).unwrap();

        let end = tree.edge_end();
        let mut it = tree.edges();
        let mut seen = Vec::new();
        while it != end {
            seen.push(it.current());
            it.advance().unwrap();
        }
        assert_eq!(seen.len(), 3);
        assert!(it.is_end());
        assert_eq!(it.current(), Edge::sentinel(4));

        // Advancing past the end stays put.
        it.advance().unwrap();
        assert_eq!(it, end);
    });
}

#[test]
fn end_twin_shares_the_view() {
    GhostToken::new(|token| {
        let tree = K2Tree::<2>::from_edges(&token, 4, &[(1, 1)]).unwrap();
        let it = tree.edges();
        let end = it.end();

        assert!(end.is_end());
        assert_ne!(it, end);
        assert!(it.same_source(&end));
        assert!(it.same_source(&tree.edge_end()));
    });
}

#[test]
fn equality_is_value_based() {
    GhostToken::new(|token| {
        let a = K2Tree::<2>::from_edges(&token, 4, &[(1, 2)]).unwrap();
        let b = K2Tree::<2>::from_edges(&token, 4, &[(1, 2), (3, 3)]).unwrap();

        let ia = a.edges();
        let ib = b.edges();
        assert_eq!(ia, ib);
        assert!(!ia.same_source(&ib));
    });
}

#[test]
fn resumes_inside_one_row_band_at_depth() {
    GhostToken::new(|token| {
        // Several hits under the same row-band, three levels deep.
        let input = [(5, 0), (5, 1), (5, 3), (5, 4), (5, 7), (6, 2)];
        let tree = K2Tree::<2>::with_height(&token, 3, &input).unwrap();

        let edges = tree.collect_edges().unwrap();
        let expected: Vec<Edge> = input.iter().map(|&e| e.into()).collect();
        assert_eq!(edges, expected);
    });
}

#[test]
fn post_increment_yields_previous_edge() {
    GhostToken::new(|token| {
        let tree = K2Tree::<3>::from_edges(&token, 9, &[(0, 8), (4, 4)]).unwrap();
        let mut it = tree.edges();

        assert_eq!(it.next(), Some(Ok(Edge::new(0, 8))));
        assert_eq!(it.current(), Edge::new(4, 4));
        assert_eq!(it.next(), Some(Ok(Edge::new(4, 4))));
        assert!(it.is_end());
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    });
}

#[test]
fn swap_exchanges_positions() {
    GhostToken::new(|token| {
        let tree = K2Tree::<2>::from_edges(&token, 4, &[(0, 0), (2, 1)]).unwrap();
        let mut a = tree.edges();
        let mut b = tree.edges();
        b.advance().unwrap();

        core::mem::swap(&mut a, &mut b);
        assert_eq!(a.current(), Edge::new(2, 1));
        assert_eq!(b.current(), Edge::new(0, 0));
    });
}

#[test]
fn has_edge_matches_input() {
    GhostToken::new(|token| {
        let input = [(0, 7), (3, 3), (6, 1)];
        let tree = K2Tree::<2>::from_edges(&token, 8, &input).unwrap();

        for row in 0..8 {
            for col in 0..8 {
                let expected = input.contains(&(row, col));
                assert_eq!(tree.has_edge(row, col).unwrap(), expected, "cell ({row}, {col})");
            }
        }
        assert!(!tree.has_edge(8, 0).unwrap());
        assert!(!tree.has_edge(0, 100).unwrap());
    });
}

#[test]
fn neighbors_of_one_row() {
    GhostToken::new(|token| {
        let adjacency = vec![vec![1, 2], vec![], vec![0, 3, 4], vec![4]];
        let tree = K2Tree::<2>::from_adjacency(&token, &adjacency).unwrap();
        assert_eq!(tree.size(), 8);

        let row2: Vec<usize> = tree.neighbors(2).collect::<Result<_>>().unwrap();
        assert_eq!(row2, vec![0, 3, 4]);
        assert_eq!(tree.neighbors(1).count(), 0);
        assert_eq!(tree.neighbors(99).count(), 0);
    });
}

#[test]
fn starting_at_skips_earlier_rows() {
    GhostToken::new(|token| {
        let tree = K2Tree::<2>::from_edges(&token, 8, &[(0, 1), (4, 2), (7, 0)]).unwrap();
        let it = EdgeIter::<2>::starting_at(tree.view(), 3);
        assert_eq!(it.current(), Edge::new(4, 2));
        assert_eq!(it.count(), 2);
    });
}

#[test]
fn duplicate_edges_collapse() {
    GhostToken::new(|token| {
        let tree = K2Tree::<2>::from_edges(&token, 4, &[(1, 1), (1, 1), (0, 2)]).unwrap();
        assert_eq!(tree.edge_count(), 2);
        assert_eq!(tree.edges().count(), 2);
    });
}

#[test]
fn out_of_bounds_edge_is_rejected() {
    GhostToken::new(|token| {
        let err = K2Tree::<2>::with_height(&token, 2, &[(0, 4)]).unwrap_err();
        assert_eq!(err, K2Error::EdgeOutOfBounds { row: 0, col: 4, size: 4 });
    });
}

#[test]
fn zero_height_is_rejected() {
    GhostToken::new(|token| {
        let err = K2Tree::<2>::with_height(&token, 0, &[]).unwrap_err();
        assert_eq!(err, K2Error::InvalidHeight { height: 0 });

        let err = K2Tree::<2>::with_height(&token, 200, &[]).unwrap_err();
        assert_eq!(err, K2Error::InvalidHeight { height: 200 });
    });
}

#[test]
fn truncated_leaves_fail_fast() {
    GhostToken::new(|token| {
        let tree = K2Tree::<2>::from_edges(&token, 4, &[(0, 1), (1, 3), (3, 0)]).unwrap();

        // Drop the last leaf block: (3, 0) now points past the end of L.
        let leaves: BitVec = tree.leaf_bits().iter().take(8).collect();
        let view = K2View::from_parts(&token, tree.internal_bits(), &leaves, &tree.rank, 2);

        let mut it = EdgeIter::<2>::try_new(view).unwrap();
        assert_eq!(it.current(), Edge::new(0, 1));
        it.advance().unwrap();
        assert_eq!(it.current(), Edge::new(1, 3));

        let err = it.advance().unwrap_err();
        assert!(matches!(err, K2Error::StructuralInconsistency { position: 12, .. }));
        assert!(it.is_end());

        let collected: Vec<_> = EdgeIter::<2>::new(view).collect();
        assert_eq!(collected.len(), 3);
        assert!(collected[..2].iter().all(Result::is_ok));
        assert!(collected[2].is_err());
    });
}

#[test]
fn internal_node_at_leaf_depth_is_reported() {
    GhostToken::new(|token| {
        // Height 1 must not have a T at all.
        let internal: BitVec = [true, false, false, false].into_iter().collect();
        let leaves: BitVec = [true, false, false, false].into_iter().collect();
        let rank = RankIndex::new(&internal);
        let view = K2View::from_parts(&token, &internal, &leaves, &rank, 1);

        let err = EdgeIter::<2>::try_new(view).unwrap_err();
        assert!(matches!(err, K2Error::StructuralInconsistency { position: 0, .. }));
    });
}

#[test]
fn from_parts_validates_shape() {
    GhostToken::new(|token| {
        let tree = K2Tree::<2>::from_edges(&token, 8, &[(0, 1), (5, 6)]).unwrap();
        let rebuilt = K2Tree::<2>::from_parts(&token, tree.parts()).unwrap();
        assert_eq!(rebuilt.collect_edges().unwrap(), tree.collect_edges().unwrap());

        let mut short = tree.parts();
        short.leaves = short.leaves.iter().skip(1).collect();
        assert!(matches!(
            K2Tree::<2>::from_parts(&token, short),
            Err(K2Error::StructuralInconsistency { .. })
        ));

        let mut tall = tree.parts();
        tall.height = 4;
        assert!(matches!(
            K2Tree::<2>::from_parts(&token, tall),
            Err(K2Error::StructuralInconsistency { .. })
        ));
    });
}

#[test]
fn display_dumps_container() {
    GhostToken::new(|token| {
        let tree = K2Tree::<2>::from_edges(&token, 4, &[(0, 1)]).unwrap();
        let it = tree.edges();
        let dump = it.to_string();
        assert!(dump.contains("ptr (0, 1)"));
        assert!(dump.contains("T 1000"));
        assert!(dump.contains("L 0100"));
        assert!(!dump.contains("END NODE"));
        assert!(it.end().to_string().contains("END NODE"));
    });
}

#[test]
fn sentinel_factory_does_not_search() {
    GhostToken::new(|token| {
        let tree = K2Tree::<2>::from_edges(&token, 4, &[(2, 2)]).unwrap();
        let end = EdgeIter::<2>::sentinel(tree.view()).unwrap();
        assert_eq!(end.current(), Edge::sentinel(4));
        assert_eq!(end, tree.edge_end());
    });
}

#[test]
fn empty_single_level_parts_are_accepted() {
    GhostToken::new(|token| {
        let parts = K2Parts {
            height: 1,
            internal: BitVec::new(),
            leaves: BitVec::new(),
        };
        let tree = K2Tree::<2>::from_parts(&token, parts).unwrap();

        assert_eq!(tree.size(), 2);
        assert_eq!(tree.edge_count(), 0);
        assert!(tree.edges().is_end());
        assert!(!tree.has_edge(1, 1).unwrap());
        assert_eq!(tree.neighbors(0).count(), 0);

        let odd = K2Parts {
            height: 1,
            internal: BitVec::new(),
            leaves: [true, false].into_iter().collect(),
        };
        assert!(matches!(
            K2Tree::<2>::from_parts(&token, odd),
            Err(K2Error::StructuralInconsistency { position: 0, .. })
        ));
    });
}

#[test]
fn short_internal_sequence_is_reported() {
    GhostToken::new(|token| {
        // Height 3 with only the root level of T: the first descent lands in L
        // one level too early.
        let internal: BitVec = [true, false, false, false].into_iter().collect();
        let leaves: BitVec = [true, false, false, false].into_iter().collect();
        let rank = RankIndex::new(&internal);
        let view = K2View::from_parts(&token, &internal, &leaves, &rank, 3);

        let err = EdgeIter::<2>::try_new(view).unwrap_err();
        assert!(matches!(err, K2Error::StructuralInconsistency { position: 4, .. }));
        assert!(err.to_string().contains("leaf layer reached above the deepest level"));

        let mut it = EdgeIter::<2>::new(view);
        assert!(it.is_end());
        assert!(matches!(it.next(), Some(Err(K2Error::StructuralInconsistency { position: 4, .. }))));
        assert_eq!(it.next(), None);
    });
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "rank index does not cover T")]
fn mismatched_rank_panics_in_debug_builds() {
    GhostToken::new(|token| {
        let internal: BitVec = [true, false, false, false].into_iter().collect();
        let other: BitVec = [true, true].into_iter().collect();
        let leaves: BitVec = [true, false, false, false].into_iter().collect();
        let rank = RankIndex::new(&other);
        let _ = K2View::from_parts(&token, &internal, &leaves, &rank, 2);
    });
}
