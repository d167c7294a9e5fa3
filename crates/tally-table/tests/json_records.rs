use pretty_assertions::assert_eq;
use serde_json::json;
use tally_table::{JsonImportError, Table};

#[test]
fn parses_an_array_of_flat_records() {
    let input = r#"[{"r": "r1","c1":11,"c2":12},{"r":"r2","c1":21,"c2":22}]"#;
    let table = Table::parse_json(input, "r").unwrap();

    assert_eq!(table.get("r1", "c1"), Some(&json!(11)));
    assert_eq!(table.get("r1", "c2"), Some(&json!(12)));
    assert_eq!(table.get("r2", "c1"), Some(&json!(21)));
    assert_eq!(table.get("r2", "c2"), Some(&json!(22)));
}

#[test]
fn titles_the_table_with_the_row_key_field_and_has_no_default() {
    let table = Table::parse_json(r#"[{"id":"a","v":1}]"#, "id").unwrap();
    assert_eq!(table.title(), "id");
    assert_eq!(table.default_value(), None);

    // Without a default, registered-but-empty coordinates read as no value.
    let table = Table::parse_json(r#"[{"id":"a","v":1},{"id":"b","w":2}]"#, "id").unwrap();
    assert_eq!(table.get("a", "w"), None);
}

#[test]
fn registers_columns_in_first_seen_field_order() {
    let input = r#"[{"r":"a","x":1,"z":2},{"r":"b","y":3,"x":4}]"#;
    let table = Table::parse_json(input, "r").unwrap();
    assert_eq!(table.cols().collect::<Vec<_>>(), ["x", "z", "y"]);
    assert_eq!(table.rows().collect::<Vec<_>>(), ["a", "b"]);
}

#[test]
fn renders_non_string_row_keys_as_json_literals() {
    let table = Table::parse_json(r#"[{"r":5,"c":1}]"#, "r").unwrap();
    assert_eq!(table.get("5", "c"), Some(&json!(1)));
}

#[test]
fn keeps_arbitrary_json_values_in_cells() {
    let input = r#"[{"r":"r1","name":"ada","tags":["a","b"]}]"#;
    let table = Table::parse_json(input, "r").unwrap();
    assert_eq!(table.get("r1", "name"), Some(&json!("ada")));
    assert_eq!(table.get("r1", "tags"), Some(&json!(["a", "b"])));
}

#[test]
fn rejects_a_record_without_the_row_key_field() {
    let input = r#"[{"r":"r1","c":1},{"c":2}]"#;
    let err = Table::parse_json(input, "r").unwrap_err();
    assert!(matches!(
        err,
        JsonImportError::MissingRowKey { record: 1, ref field } if field == "r"
    ));
}

#[test]
fn rejects_malformed_json() {
    let err = Table::parse_json("not json", "r").unwrap_err();
    assert!(matches!(err, JsonImportError::Json(_)));
}

#[test]
fn rejects_records_that_are_not_flat_objects() {
    let err = Table::parse_json(r#"[1, 2]"#, "r").unwrap_err();
    assert!(matches!(err, JsonImportError::Json(_)));
}

#[test]
fn imported_tables_render_missing_cells_as_null_in_csv() {
    let input = r#"[{"r":"r1","c1":1},{"r":"r2","c2":2}]"#;
    let table = Table::parse_json(input, "r").unwrap();
    assert_eq!(table.to_csv(), "r,c1,c2\nr1,1,null\nr2,null,2\n");
}

#[test]
fn imported_string_cells_render_as_json_string_literals() {
    let table = Table::parse_json(r#"[{"r":"r1","name":"ada"}]"#, "r").unwrap();
    assert_eq!(table.to_csv(), "r,name\nr1,\"ada\"\n");
}
