mod common;

use common::{dataset, dataset_for, four_taxon_tree};
use serde_json::Value;
use tipmatch::artifact::Artifact;
use tipmatch::{check_tree, reconcile, subset_complete};

#[test]
fn test_mismatch_display_and_json() {
    let tree = four_taxon_tree();
    let data = dataset_for(&["A", "B", "C", "E"]);
    let (report, _) = reconcile(&tree, &data, "species").unwrap();
    let artifact = Artifact::from(report);

    assert_eq!(artifact.kind(), "mismatch");
    assert_eq!(
        artifact.display(),
        "In tree, not in data (1): D\nIn data, not in tree (1): E\n"
    );

    let json: Value = serde_json::from_str(&artifact.to_json().unwrap()).unwrap();
    assert_eq!(json["kind"], "mismatch");
    assert_eq!(json["value"]["tree_not_data"], serde_json::json!(["D"]));
    assert_eq!(json["value"]["data_not_tree"], serde_json::json!(["E"]));
}

#[test]
fn test_empty_mismatch_display() {
    let tree = four_taxon_tree();
    let (report, _) = reconcile(&tree, &dataset_for(&["A", "B", "C", "D"]), "species").unwrap();
    let text = Artifact::Mismatch(report).display();
    assert!(text.contains("(0): none"));
}

#[test]
fn test_tree_json_embeds_newick() {
    let artifact = Artifact::from(four_taxon_tree());
    assert!(artifact.display().starts_with("Tree with 4 leaves"));

    let json: Value = serde_json::from_str(&artifact.to_json().unwrap()).unwrap();
    assert_eq!(json["kind"], "tree");
    assert_eq!(json["value"]["num_leaves"], 4);
    assert_eq!(json["value"]["newick"], "((A:1,B:1):1,(C:1.5,D:1.5):0.5);");
    assert!(json["value"]["name"].is_null());
}

#[test]
fn test_health_json() {
    let artifact = Artifact::from(check_tree(&four_taxon_tree()));
    assert!(artifact.display().contains("binary: true"));

    let json: Value = serde_json::from_str(&artifact.to_json().unwrap()).unwrap();
    assert_eq!(json["kind"], "health");
    assert_eq!(json["value"]["is_binary"], true);
    assert_eq!(json["value"]["is_rooted"], true);
    assert_eq!(json["value"]["is_ultrametric"], true);
    assert_eq!(json["value"]["num_leaves"], 4);
}

#[test]
fn test_dataset_json_keeps_missing_as_null() {
    let data = dataset(&[("Kea", Some(0.9), None), ("Kaka", None, Some("forest"))]);
    let artifact = Artifact::from(data);
    assert!(artifact.display().contains("Kea\t0.9\tNA"));

    let json: Value = serde_json::from_str(&artifact.to_json().unwrap()).unwrap();
    assert_eq!(json["kind"], "dataset");
    assert_eq!(json["value"]["rows"][0], serde_json::json!(["Kea", 0.9, null]));
    assert_eq!(json["value"]["rows"][1], serde_json::json!(["Kaka", null, "forest"]));
}

#[test]
fn test_complete_cases_display() {
    let data = dataset(&[("Kea", Some(0.9), None), ("Kaka", None, None)]);
    let cases = subset_complete(&data, &["mass"]).unwrap();
    let text = Artifact::from(cases).display();
    assert!(text.ends_with("Dropped 1 incomplete rows: Kaka\n"));
}
