use step_forest::{
    AvlTree, BalanceMeta, Direction, ImbalanceCase, OperationKind, RemoveCase, Severity, Step,
    StepMeta, Value,
};

fn seeded(values: &[Value]) -> AvlTree {
    let mut tree = AvlTree::new();
    for &v in values {
        tree.insert(v);
    }
    tree
}

fn rotations(steps: &[Step]) -> Vec<(Direction, Value, Value)> {
    steps
        .iter()
        .filter_map(|s| s.rotation_meta())
        .map(|m| (m.rotation, m.pivot, m.promoted))
        .collect()
}

fn imbalances(steps: &[Step]) -> Vec<ImbalanceCase> {
    steps
        .iter()
        .filter_map(|s| match &s.metadata {
            Some(StepMeta::Balance(BalanceMeta {
                imbalance: Some(case),
                ..
            })) => Some(*case),
            _ => None,
        })
        .collect()
}

#[test]
fn avl_right_right_matrix() {
    let mut tree = seeded(&[10, 20]);
    let steps = tree.insert(30);
    assert_eq!(rotations(&steps), vec![(Direction::Left, 10, 20)]);
    assert_eq!(imbalances(&steps), vec![ImbalanceCase::RightRight]);
    assert_eq!(tree.root_value(), Some(20));

    let root = tree.tree().unwrap();
    assert_eq!(root.balance_factor, Some(0));
    assert_eq!(root.height, Some(1));
    assert_eq!(root.left().map(|n| n.value), Some(10));
    assert_eq!(root.right().map(|n| n.value), Some(30));
    tree.assert_valid().unwrap();
}

#[test]
fn avl_rotation_case_matrix() {
    let cases: &[(&[Value], ImbalanceCase, Vec<(Direction, Value, Value)>)] = &[
        (
            &[30, 20, 10],
            ImbalanceCase::LeftLeft,
            vec![(Direction::Right, 30, 20)],
        ),
        (
            &[10, 20, 30],
            ImbalanceCase::RightRight,
            vec![(Direction::Left, 10, 20)],
        ),
        (
            &[30, 10, 20],
            ImbalanceCase::LeftRight,
            vec![(Direction::Left, 10, 20), (Direction::Right, 30, 20)],
        ),
        (
            &[10, 30, 20],
            ImbalanceCase::RightLeft,
            vec![(Direction::Right, 30, 20), (Direction::Left, 10, 20)],
        ),
    ];
    for (input, case, expected) in cases {
        let (last, head) = input.split_last().unwrap();
        let mut tree = seeded(head);
        let steps = tree.insert(*last);
        assert_eq!(imbalances(&steps), vec![*case], "{input:?}");
        assert_eq!(&rotations(&steps), expected, "{input:?}");
        assert_eq!(tree.root_value(), Some(20));
        tree.assert_valid().unwrap();
    }
}

#[test]
fn avl_ascending_run_stays_balanced() {
    let tree = seeded(&(1..=15).collect::<Vec<_>>());
    assert_eq!(tree.values(), (1..=15).collect::<Vec<_>>());
    assert_eq!(tree.root_value(), Some(8));
    assert_eq!(tree.tree().unwrap().depth(), 3);
    tree.assert_valid().unwrap();
}

#[test]
fn avl_duplicate_is_a_single_info_step() {
    let mut tree = seeded(&[10, 20]);
    let steps = tree.insert(20);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].metadata, Some(StepMeta::Duplicate { value: 20 }));
    assert_eq!(steps[0].severity, Severity::Info);
    assert_eq!(tree.len(), 2);
}

#[test]
fn avl_insert_ends_with_completion_step() {
    let mut tree = seeded(&[10]);
    let steps = tree.insert(5);
    assert!(steps.len() >= 3);
    assert!(steps.iter().all(|s| s.kind == OperationKind::Insert));
    let last = steps.last().unwrap();
    assert!(last.description.contains("inserted successfully"));
    let snap = last.tree.as_ref().unwrap();
    assert_eq!(snap.balance_factor, Some(1));
    assert_eq!(snap.left().and_then(|n| n.height), Some(0));
}

#[test]
fn avl_remove_case_matrix() {
    let cases: &[(&[Value], Value, RemoveCase)] = &[
        (&[20, 10, 30], 10, RemoveCase::Leaf),
        (&[20, 10, 30, 40], 30, RemoveCase::SingleChild),
        (&[20, 10, 30, 25, 40], 20, RemoveCase::TwoChildren),
    ];
    for (input, target, case) in cases {
        let mut tree = seeded(input);
        let steps = tree.remove(*target);
        let seen: Vec<_> = steps
            .iter()
            .filter_map(|s| s.remove_meta())
            .map(|m| m.case)
            .collect();
        assert!(seen.contains(case), "{input:?} remove {target}: {seen:?}");
        assert_eq!(seen.first(), Some(&RemoveCase::Found));
        assert_eq!(seen.last(), Some(&RemoveCase::Complete));
        assert!(!tree.values().contains(target));
        tree.assert_valid().unwrap();
    }
}

#[test]
fn avl_remove_rebalances_the_root() {
    let mut tree = seeded(&[20, 10, 30, 40]);
    let steps = tree.remove(10);
    assert_eq!(rotations(&steps), vec![(Direction::Left, 20, 30)]);
    assert_eq!(tree.root_value(), Some(30));
    assert_eq!(tree.values(), vec![20, 30, 40]);
    tree.assert_valid().unwrap();
}

#[test]
fn avl_remove_missing_value_warns() {
    let mut tree = seeded(&[1, 2, 3]);
    let steps = tree.remove(9);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].severity, Severity::Warning);
    assert_eq!(tree.len(), 3);
}

#[test]
fn avl_search_reports_balance_factors() {
    let mut tree = seeded(&[20, 10, 30, 5]);
    let steps = tree.search(5);
    let visits: Vec<_> = steps
        .iter()
        .filter_map(|s| s.search_meta())
        .filter(|m| m.found.is_none())
        .map(|m| m.balance_factor)
        .collect();
    assert_eq!(visits, vec![Some(1), Some(1), Some(0)]);
    let last = steps.last().unwrap().search_meta().unwrap();
    assert_eq!(last.found, Some(true));
    assert_eq!(last.complexity, "O(log n) guaranteed");
}

#[test]
fn avl_earlier_snapshots_survive_rotations() {
    let mut tree = AvlTree::new();
    tree.insert(10);
    let second = tree.insert(20);
    tree.insert(30);
    let snap = second.last().unwrap().tree.as_ref().unwrap();
    assert_eq!(snap.value, 10);
    assert_eq!(snap.right().map(|n| n.value), Some(20));
    assert_eq!(tree.root_value(), Some(20));
}
