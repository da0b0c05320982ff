use super::*;

fn table(name: &str, deps: &[&str]) -> TableSpec {
    TableSpec {
        name: name.to_string(),
        source_query: format!(r#"SELECT * FROM bronze."{name}""#),
        primary_key: "id".to_string(),
        rules: vec![QualityRule::new(r#""id" IS NULL"#, "Missing ID")],
        depends_on: deps.iter().map(|d| d.to_string()).collect(),
    }
}

fn pipeline(tables: Vec<TableSpec>) -> PipelineSpec {
    PipelineSpec {
        name: "test".to_string(),
        tables,
    }
}

#[test]
fn test_valid_pipeline() {
    let spec = pipeline(vec![
        table("customers", &[]),
        table("orders", &["customers"]),
    ]);
    spec.validate().unwrap();
    assert_eq!(spec.table_names(), vec!["customers", "orders"]);
}

#[test]
fn test_empty_primary_key_rejected() {
    let mut t = table("customers", &[]);
    t.primary_key = "  ".to_string();
    let err = pipeline(vec![t]).validate().unwrap_err();
    assert!(matches!(err, CoreError::InvalidSpec { .. }));
}

#[test]
fn test_empty_rule_reason_rejected() {
    let mut t = table("customers", &[]);
    t.rules.push(QualityRule::new(r#""email" NOT LIKE '%@%'"#, ""));
    let err = pipeline(vec![t]).validate().unwrap_err();
    assert!(matches!(err, CoreError::InvalidSpec { .. }));
}

#[test]
fn test_duplicate_table_rejected() {
    let err = pipeline(vec![table("orders", &[]), table("orders", &[])])
        .validate()
        .unwrap_err();
    assert!(matches!(err, CoreError::DuplicateTable { .. }));
}

#[test]
fn test_unknown_dependency_rejected() {
    let err = pipeline(vec![table("orders", &["customers"])])
        .validate()
        .unwrap_err();
    assert!(matches!(err, CoreError::UnknownDependency { .. }));
}

#[test]
fn test_dependency_scheduled_after_dependent_rejected() {
    let err = pipeline(vec![
        table("orders", &["customers"]),
        table("customers", &[]),
    ])
    .validate()
    .unwrap_err();
    assert!(matches!(err, CoreError::OrderViolation { .. }));
}

#[test]
fn test_yaml_round_trip() {
    let yaml = r#"
name: food_delivery
tables:
  - name: customers
    source_query: SELECT * FROM bronze."Customers"
    primary_key: Customer_id
    rules:
      - predicate: '"Customer_id" IS NULL'
        reason: Missing Customer ID
  - name: orders
    source_query: SELECT * FROM bronze."Orders"
    primary_key: Order_id
    depends_on: [customers]
"#;
    let spec: PipelineSpec = serde_yaml::from_str(yaml).unwrap();
    spec.validate().unwrap();
    assert_eq!(spec.tables.len(), 2);
    assert_eq!(spec.tables[0].rules[0].reason, "Missing Customer ID");
    assert_eq!(spec.tables[1].depends_on, vec!["customers".to_string()]);
}

#[test]
fn test_unknown_yaml_field_rejected() {
    let yaml = r#"
name: food_delivery
tables:
  - name: customers
    source_query: SELECT 1
    primary_key: id
    sourceQuery: nope
"#;
    assert!(serde_yaml::from_str::<PipelineSpec>(yaml).is_err());
}

#[test]
fn test_load_missing_file() {
    let err = PipelineSpec::load(std::path::Path::new("/nonexistent/pipeline.yml")).unwrap_err();
    assert!(matches!(err, CoreError::SpecNotFound { .. }));
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.yml");
    std::fs::write(
        &path,
        r#"
name: mini
tables:
  - name: customers
    source_query: SELECT 1 AS id
    primary_key: id
"#,
    )
    .unwrap();

    let spec = PipelineSpec::load(&path).unwrap();
    assert_eq!(spec.name, "mini");
    assert_eq!(spec.tables.len(), 1);
}
