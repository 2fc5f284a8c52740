//! End-to-end flows: locate, parse, edit, rebuild.

use proplist_edit::{
    Delimiter, EditSet, ListKind, NewEntry, SerializationContext, ValueKind, build_text,
};
use proplist_parse::{
    Error, LocateError, ParseError, ScanError, parse_entries, parse_object_at, parse_tag_at,
};
use proptest::prelude::*;

#[test]
fn parse_mixed_attribute_list() {
    let text = "<Button name=\"Hello\" enabled disabled={false} {...rest}>";
    let list = parse_tag_at(text, 10).unwrap();
    assert_eq!(list.entries.len(), 4);
    assert_eq!(list.entries[0].name(), Some("name"));
    assert_eq!(list.entries[0].value.as_ref().unwrap().text, "Hello");
    assert!(list.entries[1].value.is_none(), "implicit true");
    assert_eq!(list.entries[2].value.as_ref().unwrap().text, "false");
    assert!(list.entries[3].label.is_spread);
}

#[test]
fn parse_object_with_comment() {
    let text = "{ a: 1, // note\n b: 'x' }";
    let list = parse_object_at(text, 3).unwrap();
    assert_eq!(list.entries.len(), 2);
    assert!(
        list.entries[1].label.trivia.pre.contains("// note"),
        "comment rides along as the next entry's leading trivia"
    );
}

#[test]
fn unterminated_string_aborts_everything() {
    let text = "<T name=\"unterminated";
    // the document index hits the open string before entry parsing
    // starts, so the cursor-level call surfaces it as a locate error
    match parse_tag_at(text, 3) {
        Err(Error::Locate(LocateError::Scan(ScanError::UnterminatedString { start, quote }))) => {
            assert_eq!(start, 8);
            assert_eq!(quote, '"');
        }
        other => panic!("expected unterminated string, got {other:?}"),
    }
    // the entry parser itself reports the same class of failure
    assert!(matches!(
        parse_entries(text, 2, ListKind::Tag),
        Err(ParseError::Scan(ScanError::UnterminatedString { .. }))
    ));
}

#[test]
fn add_property_reuses_quote_convention() {
    let source = "const styles = { a: 1, // note\n b: 'x' };";
    let cursor = source.find("a:").unwrap();
    let list = parse_object_at(source, cursor).unwrap();
    let ctx = SerializationContext::for_list(&list);

    let mut edits = EditSet::new();
    edits.add(NewEntry::named("color").with_value("#fff"));
    let built = build_text(source, &list, &edits, &ctx);

    // single quotes are correct here: new strings follow the quote
    // convention already present in the list (`'x'` above), not a
    // fixed double-quote default
    assert_eq!(
        built.text,
        "const styles = { a: 1, // note\n b: 'x', color: '#fff' };"
    );
    assert_eq!(built.cursor_offset, built.text.len() - 1, "cursor sits before the trailing `;`");
}

#[test]
fn full_session_patch_and_add() {
    let source = "render() {\n  return <Card title=\"Old\" raised>{body}</Card>;\n}";
    let cursor = source.find("raised").unwrap();
    let list = parse_tag_at(source, cursor).unwrap();
    assert_eq!(list.owner_name.as_deref(), Some("Card"));

    let ctx = SerializationContext::for_list(&list);
    let mut edits = EditSet::new();
    let (title_idx, _) = list.entry_named("title").unwrap();
    edits.set_value(title_idx, "New");
    edits.add(NewEntry::named("elevation").with_kind(ValueKind::Number));

    let built = build_text(source, &list, &edits, &ctx);
    assert_eq!(
        built.text,
        "render() {\n  return <Card title=\"New\" raised elevation={0}>{body}</Card>;\n}"
    );
    assert_eq!(&built.text[built.cursor_offset..], "{body}</Card>;\n}");
}

#[test]
fn rebuild_is_idempotent_after_edit() {
    let source = "{ pad: 4, label: \"hi\" }";
    let list = parse_object_at(source, 3).unwrap();
    let mut edits = EditSet::new();
    edits.set_value(0, "8");
    let once = build_text(source, &list, &edits, &SerializationContext::default());

    // re-parsing the rebuilt text and applying no edits changes nothing
    let list = parse_object_at(&once.text, 3).unwrap();
    let again = build_text(&once.text, &list, &EditSet::new(), &SerializationContext::default());
    assert_eq!(again.text, once.text);
    assert_eq!(once.text, "{ pad: 8, label: \"hi\" }");
}

#[test]
fn deep_nesting_round_trips() {
    let mut value = String::from("x");
    for _ in 0..20 {
        value = format!("{{ v: {value} }}");
    }
    let source = format!("{{ deep: {value}, tail: \"t\" }}");
    let list = parse_object_at(&source, 3).unwrap();
    assert_eq!(list.named_entries().count(), 2);
    let built = build_text(&source, &list, &EditSet::new(), &SerializationContext::default());
    assert_eq!(built.text, source);
}

#[test]
fn explicit_delimiter_wins() {
    let source = "<T mode=\"a\">";
    let list = parse_tag_at(source, 3).unwrap();
    let mut edits = EditSet::new();
    edits.set_delimited_value(0, "compute()", Delimiter::Computed);
    let built = build_text(source, &list, &edits, &SerializationContext::default());
    assert_eq!(built.text, "<T mode={compute()}>");
}

fn attr_name() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9]{0,8}"
}

fn attr_value() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 .#-]{0,12}".prop_map(|s| format!("\"{s}\"")),
        "[0-9]{1,4}".prop_map(|s| format!("{{{s}}}")),
        Just("{() => null}".to_string()),
    ]
}

proptest! {
    #[test]
    fn generated_attribute_lists_round_trip(
        attrs in prop::collection::vec((attr_name(), attr_value()), 0..8)
    ) {
        let mut source = String::from("<Widget");
        for (name, value) in &attrs {
            source.push(' ');
            source.push_str(name);
            source.push('=');
            source.push_str(value);
        }
        source.push('>');

        let list = parse_tag_at(&source, 1).unwrap();
        let built = build_text(
            &source,
            &list,
            &EditSet::new(),
            &SerializationContext::default(),
        );
        prop_assert_eq!(&built.text, &source);
        prop_assert_eq!(list.named_entries().count(), attrs.len());
    }

    #[test]
    fn escaped_quotes_never_break_the_parse(
        inner in "[a-z \\\\\"]{0,12}"
    ) {
        let escaped = inner.replace('\\', "\\\\").replace('"', "\\\"");
        let source = format!("{{ msg: \"{escaped}\" }}");
        let list = parse_entries(&source, 1, ListKind::ObjectLiteral).unwrap();
        let msg = list.entry_named("msg").unwrap().1;
        prop_assert_eq!(msg.value.as_ref().unwrap().text.as_str(), escaped.as_str());
        let built = build_text(
            &source,
            &list,
            &EditSet::new(),
            &SerializationContext::default(),
        );
        prop_assert_eq!(&built.text, &source);
    }
}
