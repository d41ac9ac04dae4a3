use step_forest::{HeapKind, OperationKind, TraversalKind};
use step_forest_session::{Session, SessionConfig, SessionError, TreeKind};

#[test]
fn session_tree_kind_parse_matrix() {
    let cases = [
        ("binary", TreeKind::Binary),
        ("BST", TreeKind::Binary),
        ("heap", TreeKind::Heap),
        (" avl ", TreeKind::Avl),
        ("red-black", TreeKind::Redblack),
        ("rbt", TreeKind::Redblack),
    ];
    for (input, expected) in cases {
        assert_eq!(input.parse::<TreeKind>().unwrap(), expected, "{input}");
    }
    assert!(matches!(
        "splay".parse::<TreeKind>(),
        Err(SessionError::UnknownTree(name)) if name == "splay"
    ));
}

#[test]
fn session_insert_many_logs_one_operation_per_value() {
    let mut session = Session::default();
    let steps = session.insert_many(TreeKind::Binary, &[5, 3, 8, 1]).unwrap();
    assert_eq!(steps.len(), 4);
    assert_eq!(session.operations().len(), 4);
    assert!(session
        .operations()
        .iter()
        .all(|op| op.kind == OperationKind::Insert && op.tree == TreeKind::Binary));
    assert_eq!(
        session.operations().iter().map(|op| op.value).collect::<Vec<_>>(),
        vec![Some(5), Some(3), Some(8), Some(1)]
    );
    assert_eq!(session.binary().values(), vec![1, 3, 5, 8]);
}

#[test]
fn session_rejects_out_of_range_without_side_effects() {
    let mut session = Session::default();
    let err = session
        .insert_many(TreeKind::Avl, &[10, 20, 500])
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::OutOfRange {
            value: 500,
            min: 0,
            max: 100
        }
    ));
    assert!(session.avl().is_empty());
    assert!(session.operations().is_empty());

    assert!(session.insert(TreeKind::Heap, -1).is_err());
    assert!(session.search(TreeKind::Binary, 101).is_err());
    assert!(session.operations().is_empty());
}

#[test]
fn session_unbounded_config_accepts_any_value() {
    let config = SessionConfig::from_json_str(r#"{ "value_bounds": null }"#).unwrap();
    let mut session = Session::new(config);
    session.insert(TreeKind::Redblack, -1_000).unwrap();
    session.insert(TreeKind::Redblack, 1_000).unwrap();
    assert_eq!(session.red_black().values(), vec![-1_000, 1_000]);
}

#[test]
fn session_steps_of_filters_by_operation() {
    let mut session = Session::default();
    session.insert_many(TreeKind::Avl, &[10, 20, 30]).unwrap();
    let search = session.search(TreeKind::Avl, 30).unwrap();
    session.remove(TreeKind::Avl, 10).unwrap();

    assert_eq!(session.steps_of(OperationKind::Search), search);
    assert!(session
        .steps_of(OperationKind::Remove)
        .iter()
        .all(|s| s.kind == OperationKind::Remove));
    let total: usize = session.operations().iter().map(|op| op.steps.len()).sum();
    assert_eq!(session.all_steps().len(), total);
    assert!(session.steps_of(OperationKind::Sort).is_empty());
}

#[test]
fn session_traverse_defaults_and_parses() {
    let mut session = Session::default();
    session.insert_many(TreeKind::Binary, &[5, 3, 8]).unwrap();

    let inorder = session.traverse(TreeKind::Binary, None).unwrap();
    assert_eq!(inorder.order, vec![3, 5, 8]);

    let preorder = session
        .traverse(TreeKind::Binary, Some("pre-order"))
        .unwrap();
    assert_eq!(preorder.order, vec![5, 3, 8]);

    assert!(matches!(
        session.traverse(TreeKind::Binary, Some("zigzag")),
        Err(SessionError::Parse(_))
    ));
    assert_eq!(session.steps_of(OperationKind::Traverse).len(), 6);
}

#[test]
fn session_default_traversal_comes_from_config() {
    let config = SessionConfig::from_json_str(r#"{ "default_traversal": "postorder" }"#).unwrap();
    assert_eq!(config.default_traversal, TraversalKind::Postorder);
    let mut session = Session::new(config);
    session.insert_many(TreeKind::Avl, &[2, 1, 3]).unwrap();
    let traversal = session.traverse(TreeKind::Avl, None).unwrap();
    assert_eq!(traversal.order, vec![1, 3, 2]);
}

#[test]
fn session_heap_remove_ignores_the_value() {
    let mut session = Session::default();
    session.insert_many(TreeKind::Heap, &[5, 3, 8, 1]).unwrap();
    session.remove(TreeKind::Heap, 9_999).unwrap();
    assert_eq!(session.heap().extracted(), &[1]);
    let last = session.operations().last().unwrap();
    assert_eq!(last.kind, OperationKind::Remove);
    assert_eq!(last.value, None);
}

#[test]
fn session_sort_and_heap_kind_switch() {
    let mut session = Session::default();
    session.insert_many(TreeKind::Heap, &[5, 3, 8, 1]).unwrap();
    let steps = session.sort();
    assert_eq!(
        steps.last().and_then(|s| s.sorted_elements.clone()),
        Some(vec![1, 3, 5, 8])
    );
    assert_eq!(session.heap().items(), &[1, 3, 8, 5]);

    session.set_heap_kind(HeapKind::Max);
    assert!(session.heap().is_empty());
    assert_eq!(session.config().heap_kind, HeapKind::Max);
    session.insert_many(TreeKind::Heap, &[5, 3, 8, 1]).unwrap();
    assert_eq!(session.heap().peek(), Some(8));
}

#[test]
fn session_clear_resets_everything() {
    let mut session = Session::default();
    for tree in TreeKind::ALL {
        session.insert_many(tree, &[4, 2, 6]).unwrap();
        assert!(session.tree(tree).is_some(), "{tree}");
    }
    session.clear();
    assert!(session.operations().is_empty());
    assert!(session.all_steps().is_empty());
    for tree in TreeKind::ALL {
        assert!(session.tree(tree).is_none(), "{tree}");
    }
}

#[test]
fn session_operations_serialize_with_type_tag() {
    let mut session = Session::default();
    session.insert(TreeKind::Redblack, 7).unwrap();
    let json = serde_json::to_value(session.operations()).unwrap();
    assert_eq!(json[0]["tree"], "redblack");
    assert_eq!(json[0]["type"], "insert");
    assert_eq!(json[0]["value"], 7);
    assert_eq!(json[0]["steps"][0]["tree"]["color"], "black");
}
