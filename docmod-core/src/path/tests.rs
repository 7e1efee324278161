//! Tests for the document path parser.

use super::*;

fn field(name: &str) -> PathSegment {
    PathSegment::Field(name.to_string())
}

#[test]
fn test_single_field() {
    let path = DocumentPath::parse("name").unwrap();
    assert_eq!(path.segments(), &[field("name")]);
}

#[test]
fn test_nested_fields() {
    let path = DocumentPath::parse("address.city.zip").unwrap();
    assert_eq!(
        path.segments(),
        &[field("address"), field("city"), field("zip")]
    );
}

#[test]
fn test_field_with_index() {
    let path = DocumentPath::parse("items[2].price").unwrap();
    assert_eq!(
        path.segments(),
        &[field("items"), PathSegment::Index(2), field("price")]
    );
}

#[test]
fn test_chained_indices() {
    let path = DocumentPath::parse("matrix[1][0]").unwrap();
    assert_eq!(
        path.segments(),
        &[field("matrix"), PathSegment::Index(1), PathSegment::Index(0)]
    );
}

#[test]
fn test_bare_index_segments() {
    let path = DocumentPath::parse("[0].id").unwrap();
    assert_eq!(path.segments(), &[PathSegment::Index(0), field("id")]);

    let path = DocumentPath::parse("a.[3]").unwrap();
    assert_eq!(path.segments(), &[field("a"), PathSegment::Index(3)]);
}

#[test]
fn test_root_marker_is_stripped() {
    assert_eq!(
        DocumentPath::parse("$.a.b").unwrap(),
        DocumentPath::parse("a.b").unwrap()
    );
    assert_eq!(
        DocumentPath::parse("$[4]").unwrap(),
        DocumentPath::parse("[4]").unwrap()
    );
}

#[test]
fn test_quoted_field_names() {
    let path = DocumentPath::parse("`first name`.x").unwrap();
    assert_eq!(path.segments(), &[field("first name"), field("x")]);
    assert_eq!(path.to_string(), "$.`first name`.x");
}

#[test]
fn test_identifiers_with_digits_and_underscores() {
    let path = DocumentPath::parse("_meta.field_2").unwrap();
    assert_eq!(path.segments(), &[field("_meta"), field("field_2")]);
}

#[test]
fn test_empty_path_rejected_without_opt_in() {
    assert!(matches!(
        DocumentPath::parse(""),
        Err(ModifyError::EmptyPathNotAllowed(_))
    ));
    assert!(matches!(
        DocumentPath::parse("$"),
        Err(ModifyError::EmptyPathNotAllowed(_))
    ));
}

#[test]
fn test_empty_path_allowed_with_opt_in() {
    assert!(DocumentPath::parse_allowing_root("").unwrap().is_root());
    assert!(DocumentPath::parse_allowing_root("$").unwrap().is_root());
}

#[test]
fn test_malformed_paths() {
    let bad = [
        "a.",
        "a..b",
        ".a",
        "$.",
        "$a",
        "a[",
        "a[]",
        "a[x]",
        "a[1",
        "a]",
        "a[-1]",
        "a[1.5]",
        "a b",
        " a",
        "a.*",
        "a[*]",
        "1abc",
        "a[99999999999]",
        "`open",
        "a`b`",
    ];

    for text in bad {
        let result = DocumentPath::parse_allowing_root(text);
        assert!(
            matches!(result, Err(ModifyError::InvalidPathSyntax(_))),
            "expected InvalidPathSyntax for {:?}, got {:?}",
            text,
            result
        );
    }
}

#[test]
fn test_error_reports_position() {
    let err = DocumentPath::parse("a..b").unwrap_err();
    assert!(err.to_string().contains("position 2"), "{}", err);
}

#[test]
fn test_canonical_display() {
    let cases = [
        ("name", "$.name"),
        ("$.a.b", "$.a.b"),
        ("items[2].price", "$.items[2].price"),
        ("[0][1]", "$[0][1]"),
        ("a.[3]", "$.a[3]"),
        ("`123`", "$.`123`"),
    ];
    for (input, expected) in cases {
        assert_eq!(DocumentPath::parse(input).unwrap().to_string(), expected);
    }
    assert_eq!(DocumentPath::root().to_string(), "$");
}

#[test]
fn test_round_trip_is_stable() {
    let inputs = [
        "name",
        "$.a.b",
        "items[2].price",
        "[0].id",
        "m[1][0]",
        "`first name`.x",
        "`tick``tock`",
        "_x.y_1[7]",
    ];
    for input in inputs {
        let parsed = DocumentPath::parse(input).unwrap();
        let reparsed = DocumentPath::parse(&parsed.to_string()).unwrap();
        assert_eq!(parsed, reparsed, "round trip changed {:?}", input);
    }
}

#[test]
fn test_programmatic_names_round_trip() {
    let path = DocumentPath::root()
        .child_field("weird`name")
        .child_field("with space")
        .child_index(3);
    let reparsed = DocumentPath::parse(&path.to_string()).unwrap();
    assert_eq!(path, reparsed);
}

#[test]
fn test_empty_field_name_round_trip() {
    let path = DocumentPath::root().child_field("").child_field("a");
    assert_eq!(path.to_string(), "$.``.a");

    let reparsed = DocumentPath::parse(&path.to_string()).unwrap();
    assert_eq!(reparsed, path);
    assert_eq!(
        DocumentPath::parse("``").unwrap().segments(),
        &[PathSegment::Field(String::new())]
    );
}

#[test]
fn test_parent_and_prefix() {
    let path = DocumentPath::parse("a.b[1]").unwrap();
    assert!(path.ends_with_index());
    let parent = path.parent().unwrap();
    assert_eq!(parent.to_string(), "$.a.b");
    assert!(path.starts_with(&parent));
    assert!(path.starts_with(&DocumentPath::root()));
    assert!(!parent.starts_with(&path));
    assert!(DocumentPath::root().parent().is_none());
}

#[test]
fn test_serde_uses_canonical_text() {
    let path = DocumentPath::parse("tags[0]").unwrap();
    let json = serde_json::to_value(&path).unwrap();
    assert_eq!(json, serde_json::json!("$.tags[0]"));

    let back: DocumentPath = serde_json::from_value(json).unwrap();
    assert_eq!(back, path);

    let bad: Result<DocumentPath, _> = serde_json::from_value(serde_json::json!("a..b"));
    assert!(bad.is_err());
}
