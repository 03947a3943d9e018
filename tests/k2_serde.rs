use k2tree::{Edge, GhostToken, K2Parts, K2Tree};

#[test]
fn parts_round_trip_through_json() {
    GhostToken::new(|token| {
        let tree = K2Tree::<2>::from_edges(&token, 16, &[(0, 15), (3, 3), (9, 4), (15, 0)]).unwrap();

        let json = serde_json::to_string(&tree.parts()).unwrap();
        let parts: K2Parts = serde_json::from_str(&json).unwrap();
        assert_eq!(parts, tree.parts());

        let restored = K2Tree::<2>::from_parts(&token, parts).unwrap();
        assert_eq!(restored.collect_edges().unwrap(), tree.collect_edges().unwrap());
    });
}

#[test]
fn edge_serializes_as_named_coordinates() {
    let json = serde_json::to_value(Edge::new(2, 5)).unwrap();
    assert_eq!(json, serde_json::json!({ "row": 2, "col": 5 }));
}
