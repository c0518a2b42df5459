//! Display names
//!
//! Names are rendered family name first, joined by an ideographic space when
//! both parts are known.

use super::Person;

/// Separator between family and given name (U+3000)
pub const NAME_SEPARATOR: char = '\u{3000}';

/// Placeholder shown for a person with no known name at all
pub const UNKNOWN_NAME: &str = "（不明）";

/// Kanji display name, falling back to the kana reading
///
/// Returns an empty string when neither is known; substituting a placeholder
/// is up to the caller (see [`label`]).
pub fn display_name(person: &Person) -> String {
    if person.last_name.is_empty() && person.first_name.is_empty() {
        return display_kana_name(person);
    }
    join_name(&person.last_name, &person.first_name)
}

/// Kana display name, empty when unknown
pub fn display_kana_name(person: &Person) -> String {
    join_name(&person.last_name_kana, &person.first_name_kana)
}

/// Display name or [`UNKNOWN_NAME`]
pub fn label(person: &Person) -> String {
    let name = display_name(person);
    if name.is_empty() {
        UNKNOWN_NAME.to_string()
    } else {
        name
    }
}

fn join_name(last: &str, first: &str) -> String {
    let mut name = String::with_capacity(last.len() + first.len() + NAME_SEPARATOR.len_utf8());
    name.push_str(last);
    if !last.is_empty() && !first.is_empty() {
        name.push(NAME_SEPARATOR);
    }
    name.push_str(first);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_only_between_two_parts() {
        assert_eq!(display_name(&Person::new("a").with_name("山田", "")), "山田");
        assert_eq!(display_name(&Person::new("b").with_name("", "太郎")), "太郎");
        assert_eq!(
            display_name(&Person::new("c").with_name("山田", "太郎")),
            "山田　太郎"
        );
    }

    #[test]
    fn test_falls_back_to_kana() {
        let person = Person::new("a").with_kana("ヤマダ", "タロウ");
        assert_eq!(display_name(&person), "ヤマダ　タロウ");
    }

    #[test]
    fn test_kanji_wins_over_kana() {
        let person = Person::new("a")
            .with_name("", "花子")
            .with_kana("ヤマダ", "ハナコ");
        assert_eq!(display_name(&person), "花子");
    }

    #[test]
    fn test_unknown_name_is_empty() {
        assert_eq!(display_name(&Person::new("a")), "");
        assert_eq!(display_kana_name(&Person::new("a")), "");
    }

    #[test]
    fn test_label_substitutes_placeholder() {
        assert_eq!(label(&Person::new("a")), UNKNOWN_NAME);
        assert_eq!(label(&Person::new("b").with_name("山田", "")), "山田");
    }
}
