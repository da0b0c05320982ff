use super::*;

fn spec(name: &str, deps: &[&str]) -> TableSpec {
    TableSpec {
        name: name.to_string(),
        source_query: format!("SELECT * FROM bronze.{name}"),
        primary_key: "id".to_string(),
        rules: vec![],
        depends_on: deps.iter().map(|d| d.to_string()).collect(),
    }
}

#[test]
fn test_valid_dag_passes_validation() {
    let tables = vec![
        spec("customers", &[]),
        spec("restaurants", &[]),
        spec("orders", &["customers", "restaurants"]),
        spec("order_items", &["orders"]),
    ];

    TableDag::build(&tables).unwrap().validate().unwrap();
}

#[test]
fn test_unknown_dependency_rejected() {
    let tables = vec![spec("orders", &["customers"])];

    let result = TableDag::build(&tables);
    assert!(matches!(
        result.unwrap_err(),
        CoreError::UnknownDependency { .. }
    ));
}

#[test]
fn test_circular_dependency_detected() {
    let tables = vec![spec("a", &["b"]), spec("b", &["a"])];

    let dag = TableDag::build(&tables).unwrap();
    let err = dag.validate().unwrap_err();
    assert!(matches!(err, CoreError::CircularDependency { .. }));
    assert!(err.to_string().contains("->"));
}

#[test]
fn test_contains() {
    let tables = vec![spec("customers", &[])];
    let dag = TableDag::build(&tables).unwrap();
    assert!(dag.contains("customers"));
    assert!(!dag.contains("gold_summary"));
}
