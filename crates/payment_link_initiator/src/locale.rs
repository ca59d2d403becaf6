//! Translated strings shown by the initiator itself.

use std::borrow::Cow;

use serde::Deserialize;

/// Strings rendered by the initiator. Every other text belongs to the checkout widget.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translations {
    pub not_allowed: Cow<'static, str>,
}

const DEFAULT_LANGUAGE: &str = "en";

const BUILT_IN: &[(&str, &str)] = &[
    ("en", "You are not allowed to view this content."),
    ("de", "Sie dürfen diesen Inhalt nicht ansehen."),
    ("fr", "Vous n'êtes pas autorisé à voir ce contenu."),
    ("es", "No tienes permiso para ver este contenido."),
    ("it", "Non sei autorizzato a visualizzare questo contenuto."),
    ("nl", "U bent niet gemachtigd om deze inhoud te bekijken."),
    ("pt", "Você não tem permissão para ver este conteúdo."),
];

impl Translations {
    /// Built-in strings for `locale`, falling back from `de-AT` to `de` and then to English.
    pub fn for_locale(locale: Option<&str>) -> Self {
        let requested = locale.map(|locale| locale.trim().replace('_', "-").to_ascii_lowercase());

        let lookup = |tag: &str| {
            BUILT_IN
                .iter()
                .find(|(language, _)| *language == tag)
                .map(|(_, not_allowed)| *not_allowed)
        };

        let not_allowed = requested
            .as_deref()
            .and_then(|tag| {
                lookup(tag).or_else(|| tag.split('-').next().and_then(lookup))
            })
            .or_else(|| lookup(DEFAULT_LANGUAGE))
            .unwrap_or_default();

        Self {
            not_allowed: Cow::Borrowed(not_allowed),
        }
    }
}

impl Default for Translations {
    fn default() -> Self {
        Self::for_locale(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_locale() {
        assert_eq!(
            Translations::for_locale(Some("fr")).not_allowed,
            "Vous n'êtes pas autorisé à voir ce contenu."
        );
    }

    #[test]
    fn test_region_falls_back_to_language() {
        assert_eq!(
            Translations::for_locale(Some("de_AT")).not_allowed,
            Translations::for_locale(Some("de")).not_allowed
        );
        assert_eq!(
            Translations::for_locale(Some("pt-BR")).not_allowed,
            "Você não tem permissão para ver este conteúdo."
        );
    }

    #[test]
    fn test_unknown_or_missing_locale_falls_back_to_english() {
        let english = "You are not allowed to view this content.";
        assert_eq!(Translations::for_locale(Some("xx")).not_allowed, english);
        assert_eq!(Translations::for_locale(None).not_allowed, english);
        assert_eq!(Translations::default().not_allowed, english);
    }
}
