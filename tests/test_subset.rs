mod common;

use common::{dataset, dataset_for, four_taxon_tree};
use tipmatch::error::ReconcileError;
use tipmatch::{reconcile, subset_complete};

#[test]
fn test_drops_incomplete_rows() {
    let data = dataset(&[
        ("Kea", Some(0.9), Some("alpine")),
        ("Kaka", None, Some("forest")),
        ("Kakapo", Some(2.2), Some("forest")),
        ("Kiwi", Some(2.5), None),
        ("Takahe", Some(2.7), Some("alpine")),
        ("Pukeko", Some(1.0), Some("wetland")),
        ("Weka", None, None),
        ("Tui", Some(0.1), Some("forest")),
        ("Moa", Some(230.0), Some("forest")),
        ("Kokako", None, Some("forest")),
    ]);

    let result = subset_complete(&data, &["mass"]).unwrap();
    assert_eq!(result.dataset.num_rows(), 7);
    assert_eq!(result.rows_dropped(), 3);
    assert_eq!(result.dropped_keys, vec!["Kaka", "Weka", "Kokako"]);
    assert_eq!(
        result.dataset.keys().unwrap(),
        vec!["Kea", "Kakapo", "Kiwi", "Takahe", "Pukeko", "Tui", "Moa"]
    );

    // Missing values in other columns only count when required
    let both = subset_complete(&data, &["mass", "habitat"]).unwrap();
    assert_eq!(both.dataset.num_rows(), 6);
    assert_eq!(both.dropped_keys, vec!["Kaka", "Kiwi", "Weka", "Kokako"]);
}

#[test]
fn test_complete_dataset_unchanged() {
    let data = dataset_for(&["A", "B", "C"]);
    let result = subset_complete(&data, &["mass", "habitat"]).unwrap();
    assert_eq!(result.rows_dropped(), 0);
    assert_eq!(result.dataset, data);
}

#[test]
fn test_no_required_columns_keeps_all() {
    let data = dataset(&[("A", None, None), ("B", None, None)]);
    let none: [&str; 0] = [];
    let result = subset_complete(&data, &none).unwrap();
    assert_eq!(result.dataset.num_rows(), 2);
}

#[test]
fn test_unknown_required_column() {
    let data = dataset_for(&["A"]);
    assert!(matches!(
        subset_complete(&data, &["mass", "wingspan"]),
        Err(ReconcileError::UnknownColumn { column, .. }) if column == "wingspan"
    ));
}

#[test]
fn test_subset_after_reconcile_then_reconcile_again() {
    let tree = four_taxon_tree();
    let data = dataset(&[
        ("A", Some(1.0), None),
        ("B", None, None),
        ("C", Some(3.0), None),
        ("D", Some(4.0), None),
    ]);

    let (_, pair) = reconcile(&tree, &data, "species").unwrap();
    let complete = subset_complete(&pair.dataset, &["mass"]).unwrap();
    assert_eq!(complete.dropped_keys, vec!["B"]);
    // The tree is untouched until reconciled against the smaller dataset
    assert_eq!(pair.tree.num_leaves(), 4);

    let (report, narrowed) = reconcile(&pair.tree, &complete.dataset, "species").unwrap();
    assert!(report.tree_not_data.contains("B"));
    assert_eq!(narrowed.tree.leaf_labels(), vec!["A", "C", "D"]);
}
