//! Display name derivation

use kakeizu::tree::{display_kana_name, display_name, label, Person, UNKNOWN_NAME};

fn named(last: &str, first: &str) -> Person {
    Person::new("p").with_name(last, first)
}

#[test]
fn test_separator_only_between_two_known_parts() {
    assert_eq!(display_name(&named("山田", "")), "山田");
    assert_eq!(display_name(&named("", "太郎")), "太郎");
    assert_eq!(display_name(&named("山田", "太郎")), "山田　太郎");
}

#[test]
fn test_falls_back_to_kana() {
    let person = Person::new("p").with_kana("ヤマダ", "タロウ");
    assert_eq!(display_name(&person), "ヤマダ　タロウ");
    assert_eq!(display_kana_name(&person), "ヤマダ　タロウ");
}

#[test]
fn test_kanji_wins_over_kana() {
    let person = named("", "太郎").with_kana("ヤマダ", "タロウ");
    assert_eq!(display_name(&person), "太郎");
}

#[test]
fn test_unknown_name_is_empty_until_labelled() {
    let person = Person::new("p");
    assert_eq!(display_name(&person), "");
    assert_eq!(label(&person), UNKNOWN_NAME);
    assert_eq!(label(&named("山田", "")), "山田");
}

#[test]
fn test_names_from_json() {
    let json = r#"{"people": [{"id": "p", "lastName": "佐藤", "firstNameKana": "ハナ"}]}"#;
    let tree = kakeizu::tree::Tree::from_json(json).unwrap();
    assert_eq!(display_name(tree.get("p").unwrap()), "佐藤");
    assert_eq!(display_kana_name(tree.get("p").unwrap()), "ハナ");
}
