//! Process-wide UI language tag attached to every collector request.

use std::env;
use std::sync::{LazyLock, RwLock};

/// Tag reported when neither the host nor the environment provides one.
pub const DEFAULT_LANGUAGE: &str = "en";

static CURRENT_LANGUAGE: LazyLock<RwLock<String>> =
    LazyLock::new(|| RwLock::new(language_from_env()));

/// Returns the current language tag, e.g. `en-us`.
pub fn current_language() -> String {
    CURRENT_LANGUAGE.read().unwrap().clone()
}

/// Overrides the language tag. Values that do not normalize to a tag reset it to
/// [`DEFAULT_LANGUAGE`].
pub fn set_current_language(tag: &str) {
    let normalized = normalize_language_tag(tag).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    *CURRENT_LANGUAGE.write().unwrap() = normalized;
}

/// Turns POSIX locale names (`en_US.UTF-8`, `de_DE@euro`) and BCP 47 tags (`pt-BR`) into a
/// lowercase, hyphenated short tag. `C`, `POSIX` and blank values yield `None`.
pub fn normalize_language_tag(raw: &str) -> Option<String> {
    let base = raw
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim();
    if base.is_empty() || base.eq_ignore_ascii_case("c") || base.eq_ignore_ascii_case("posix") {
        return None;
    }
    Some(base.replace('_', "-").to_ascii_lowercase())
}

fn language_from_env() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .find_map(|key| env::var(key).ok().and_then(|value| normalize_language_tag(&value)))
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_posix_locale_names() {
        assert_eq!(normalize_language_tag("en_US.UTF-8").as_deref(), Some("en-us"));
        assert_eq!(normalize_language_tag("de_DE@euro").as_deref(), Some("de-de"));
        assert_eq!(normalize_language_tag("pt-BR").as_deref(), Some("pt-br"));
        assert_eq!(normalize_language_tag("fr").as_deref(), Some("fr"));
    }

    #[test]
    fn rejects_neutral_locales() {
        assert_eq!(normalize_language_tag("C"), None);
        assert_eq!(normalize_language_tag("POSIX"), None);
        assert_eq!(normalize_language_tag("C.UTF-8"), None);
        assert_eq!(normalize_language_tag(""), None);
    }

    #[test]
    fn override_is_visible_to_readers() {
        let previous = current_language();
        set_current_language("ja_JP.UTF-8");
        assert_eq!(current_language(), "ja-jp");
        set_current_language("C");
        assert_eq!(current_language(), DEFAULT_LANGUAGE);
        set_current_language(&previous);
    }
}
