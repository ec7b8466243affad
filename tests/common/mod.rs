#![allow(dead_code)]

use tipmatch::model::{CellValue, Dataset, PhyloTree, PhyloTreeBuilder, TreeBuilder, VertexIndex};

/// Nested description of a tree: leaves with label and branch length,
/// inner vertices with children and branch length.
pub enum Shape {
    Leaf(&'static str, f64),
    Node(Vec<Shape>, f64),
}

pub fn leaf(label: &'static str, length: f64) -> Shape {
    Shape::Leaf(label, length)
}

pub fn node(children: Vec<Shape>, length: f64) -> Shape {
    Shape::Node(children, length)
}

/// Builds a tree whose root has the given children and no stem.
pub fn build(children: Vec<Shape>) -> PhyloTree {
    let mut builder = PhyloTreeBuilder::new();
    builder.init_next(children.len());
    let indices: Vec<VertexIndex> = children
        .into_iter()
        .map(|child| add_shape(&mut builder, child))
        .collect();
    builder.add_root(indices, None);
    builder.finish_tree().unwrap()
}

fn add_shape(builder: &mut PhyloTreeBuilder, shape: Shape) -> VertexIndex {
    match shape {
        Shape::Leaf(label, length) => builder.add_leaf(Some(length), label.to_string()),
        Shape::Node(children, length) => {
            let indices: Vec<VertexIndex> = children
                .into_iter()
                .map(|child| add_shape(builder, child))
                .collect();
            builder.add_internal(indices, Some(length))
        }
    }
}

/// ((A:1,B:1):1,(C:1.5,D:1.5):0.5); ultrametric with height 2
pub fn four_taxon_tree() -> PhyloTree {
    build(vec![
        node(vec![leaf("A", 1.0), leaf("B", 1.0)], 1.0),
        node(vec![leaf("C", 1.5), leaf("D", 1.5)], 0.5),
    ])
}

/// Dataset with columns `species`, `mass`, `habitat` and the given rows.
pub fn dataset(rows: &[(&str, Option<f64>, Option<&str>)]) -> Dataset {
    let columns = vec!["species".to_string(), "mass".to_string(), "habitat".to_string()];
    let mut data = Dataset::new(columns, "species").unwrap();
    for &(key, mass, habitat) in rows {
        data.push_row(vec![
            Some(CellValue::from(key)),
            mass.map(CellValue::Float),
            habitat.map(CellValue::from),
        ])
        .unwrap();
    }
    data
}

/// Dataset with only complete rows for the given keys.
pub fn dataset_for(keys: &[&str]) -> Dataset {
    let rows: Vec<(&str, Option<f64>, Option<&str>)> = keys
        .iter()
        .enumerate()
        .map(|(i, &k)| (k, Some(i as f64 + 1.0), Some("forest")))
        .collect();
    dataset(&rows)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
