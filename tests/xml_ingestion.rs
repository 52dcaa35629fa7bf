use tabular_preview::ingestion::xml::{ingest_xml_from_bytes, ingest_xml_from_str};
use tabular_preview::types::{DataType, Value};
use tabular_preview::ErrorKind;

const PEOPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<people>
  <person id="1">
    <name>Ada</name>
    <score>98.5</score>
  </person>
  <person id="2">
    <name>Grace</name>
    <active>true</active>
  </person>
</people>
"#;

#[test]
fn root_children_become_rows() {
    let ds = ingest_xml_from_str(PEOPLE).unwrap();

    assert_eq!(ds.row_count(), 2);
    assert_eq!(
        ds.schema.field_names().collect::<Vec<_>>(),
        vec!["id", "name", "score", "active"]
    );
    assert_eq!(ds.rows[0][0], Value::Int64(1));
    assert_eq!(ds.rows[1][1], Value::Utf8("Grace".to_string()));
}

#[test]
fn missing_children_are_null_and_types_are_inferred() {
    let ds = ingest_xml_from_str(PEOPLE).unwrap();
    assert_eq!(ds.schema.fields[2].data_type, DataType::Float64);
    assert_eq!(ds.rows[1][2], Value::Null);
    assert_eq!(ds.schema.fields[3].data_type, DataType::Bool);
    assert_eq!(ds.rows[0][3], Value::Null);
}

#[test]
fn leaf_rows_use_their_tag_as_column() {
    let ds = ingest_xml_from_str("<values><v>1</v><v>2</v></values>").unwrap();
    assert_eq!(ds.schema.field_names().collect::<Vec<_>>(), vec!["v"]);
    assert_eq!(ds.rows[1][0], Value::Int64(2));
}

#[test]
fn doctype_with_internal_subset_is_accepted() {
    let input = r#"<?xml version="1.0"?>
<!DOCTYPE people [
  <!ELEMENT people (person*)>
  <!ELEMENT person (name)>
  <!ELEMENT name (#PCDATA)>
  <!ENTITY lab "Analytical Engine">
]>
<people>
  <person><name>Ada of the &lab;</name></person>
  <person><name>Grace</name></person>
</people>"#;

    let ds = ingest_xml_from_str(input).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.rows[0][0], Value::Utf8("Ada of the Analytical Engine".to_string()));
}

#[test]
fn root_without_children_is_unsupported_shape() {
    let err = ingest_xml_from_str("<empty>just text</empty>").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedShape);
}

#[test]
fn malformed_xml_is_a_parse_failure() {
    let err = ingest_xml_from_bytes(b"<people><person></people>").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseFailure);
}
