use indexmap::IndexMap;
use series_prep::api::{
    TOKEN_SIZE, TOKEN_Y, TOKEN_Y_ERROR, TOKEN_Y_PERCENT, TextFormatter, TextTemplate, TokenBag,
};
use series_prep::core::CellValue;

fn bag(entries: &[(&str, &str)]) -> TokenBag {
    let mut bag = TokenBag::new();
    for (token, value) in entries {
        bag.insert(*token, *value);
    }
    bag
}

#[test]
fn pie_default_shows_percent_then_value() {
    let formatter = TextFormatter::new("", true);
    let text = formatter.render(&bag(&[(TOKEN_Y, "30"), (TOKEN_Y_PERCENT, "30.0%")]));
    assert_eq!(text, "30.0% (30)");
}

#[test]
fn series_default_is_plain_value() {
    let formatter = TextFormatter::new("", false);
    assert_eq!(formatter.render(&bag(&[(TOKEN_Y, "12")])), "12");
}

#[test]
fn series_default_applies_error_percent_and_size_in_order() {
    let formatter = TextFormatter::new("", false);
    let text = formatter.render(&bag(&[
        (TOKEN_Y, "10"),
        (TOKEN_Y_ERROR, "1.5"),
        (TOKEN_Y_PERCENT, "25%"),
        (TOKEN_SIZE, "3"),
    ]));
    assert_eq!(text, "25% (10 \u{00B1} 1.5): 3");
}

#[test]
fn braced_and_bare_tokens_are_substituted() {
    let template = TextTemplate::compile("{{ @@name }} at {{@@x}}: @@y");
    let text = template.render(&bag(&[("@@name", "Revenue"), ("@@x", "Q1"), ("@@y", "1,200")]));
    assert_eq!(text, "Revenue at Q1: 1,200");
}

#[test]
fn raw_fields_are_addressed_by_column_name() {
    let template = TextTemplate::compile("{{ region }} / {{ owner_id }}");
    let mut tokens = TokenBag::new();
    let mut raw = IndexMap::new();
    raw.insert("region".to_owned(), CellValue::text("EU"));
    raw.insert("owner_id".to_owned(), CellValue::number(7.0));
    tokens.extend_raw(&raw);

    assert_eq!(template.render(&tokens), "EU / 7");
}

#[test]
fn unknown_tokens_are_left_literal() {
    let template = TextTemplate::compile("{{ nope }} and @@nothing and {{ @@y }}");
    let text = template.render(&bag(&[(TOKEN_Y, "5")]));
    assert_eq!(text, "{{ nope }} and @@nothing and 5");
}

#[test]
fn non_empty_template_replaces_default_for_pie() {
    let formatter = TextFormatter::new("@@yPercent", true);
    assert_eq!(formatter.render(&bag(&[(TOKEN_Y_PERCENT, "50%")])), "50%");
}
