//! Steam language code resolution
//!
//! Maps the stem of a `description/<lang>.md` file to the canonical Steam
//! locale code. Several filename spellings map to the same code; anything
//! unrecognized is skipped by the caller. Codes follow
//! https://partner.steamgames.com/doc/store/localization

use crate::localized::{LocalizedDescription, LocalizedTitle};

/// Map a filename stem (extension already stripped, case-insensitive) to a
/// Steam language code
pub fn steam_language(stem: &str) -> Option<&'static str> {
    let normalized = stem.trim().to_lowercase();
    let code = match normalized.as_str() {
        "zh" | "zh-cn" | "zh_cn" | "zh-hans" | "zh_hans" | "schinese" => "schinese",
        "zh-hant" | "zh_hant" | "zh-tw" | "zh_tw" | "tchinese" => "tchinese",
        "en" | "english" => "english",
        "ja" | "japanese" => "japanese",
        "ko" | "koreana" => "koreana",
        // Steam's Latin American Spanish is the catch-all Spanish here
        "es" | "spanish" | "latam" => "latam",
        // Portuguese ships as Brazilian Portuguese
        "pt" | "pt-br" | "pt_br" | "brazilian" => "brazilian",
        "de" | "german" => "german",
        "fr" | "french" => "french",
        "it" | "italian" => "italian",
        "ru" | "russian" => "russian",
        "pl" | "polish" => "polish",
        "th" | "thai" => "thai",
        "tr" | "turkish" => "turkish",
        "cs" | "czech" => "czech",
        "hu" | "hungarian" => "hungarian",
        "nl" | "dutch" => "dutch",
        "sv" | "swedish" => "swedish",
        "no" | "norwegian" => "norwegian",
        "da" | "danish" => "danish",
        "fi" | "finnish" => "finnish",
        "el" | "greek" => "greek",
        "bg" | "bulgarian" => "bulgarian",
        "ro" | "romanian" => "romanian",
        "uk" | "ukrainian" => "ukrainian",
        "vi" | "vietnamese" => "vietnamese",
        "ar" | "arabic" => "arabic",
        "id" | "indonesian" => "indonesian",
        _ => return None,
    };
    Some(code)
}

/// Select the primary localized description and title
///
/// Priority: english, then schinese, then the first entry in encounter
/// order. A language qualifies when either a description or a title exists
/// for it.
pub fn primary_language_content<'a>(
    descriptions: &'a [LocalizedDescription],
    titles: &'a [LocalizedTitle],
) -> (Option<&'a LocalizedDescription>, Option<&'a LocalizedTitle>) {
    for language in ["english", "schinese"] {
        let description = descriptions.iter().find(|d| d.language == language);
        let title = titles.iter().find(|t| t.language == language);
        if description.is_some() || title.is_some() {
            return (description, title);
        }
    }

    (descriptions.first(), titles.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chinese_aliases() {
        for stem in ["zh", "zh-cn", "zh_cn", "zh-Hans", "ZH_HANS", "schinese"] {
            assert_eq!(steam_language(stem), Some("schinese"), "{stem}");
        }
        for stem in ["zh-hant", "zh-TW", "tchinese"] {
            assert_eq!(steam_language(stem), Some("tchinese"), "{stem}");
        }
    }

    #[test]
    fn test_regional_variants() {
        assert_eq!(steam_language("es"), Some("latam"));
        assert_eq!(steam_language("pt-BR"), Some("brazilian"));
        assert_eq!(steam_language("ko"), Some("koreana"));
    }

    #[test]
    fn test_unrecognized_stem_is_none() {
        assert_eq!(steam_language("klingon"), None);
        assert_eq!(steam_language(""), None);
    }

    #[test]
    fn test_primary_prefers_english_then_schinese() {
        let descriptions = vec![
            LocalizedDescription {
                language: "schinese".to_string(),
                content: "chinese".to_string(),
            },
            LocalizedDescription {
                language: "english".to_string(),
                content: "english".to_string(),
            },
        ];
        let titles = vec![];

        let (description, title) = primary_language_content(&descriptions, &titles);
        assert_eq!(description.map(|d| d.language.as_str()), Some("english"));
        assert!(title.is_none());

        let (description, _) = primary_language_content(&descriptions[..1], &titles);
        assert_eq!(description.map(|d| d.language.as_str()), Some("schinese"));
    }

    #[test]
    fn test_primary_title_alone_qualifies_language() {
        let descriptions = vec![LocalizedDescription {
            language: "german".to_string(),
            content: "deutsch".to_string(),
        }];
        let titles = vec![LocalizedTitle {
            language: "english".to_string(),
            title: "My Mod".to_string(),
        }];

        let (description, title) = primary_language_content(&descriptions, &titles);
        assert!(description.is_none());
        assert_eq!(title.map(|t| t.language.as_str()), Some("english"));
    }

    #[test]
    fn test_primary_falls_back_to_first_entry() {
        let descriptions = vec![
            LocalizedDescription {
                language: "german".to_string(),
                content: "deutsch".to_string(),
            },
            LocalizedDescription {
                language: "french".to_string(),
                content: "français".to_string(),
            },
        ];

        let (description, _) = primary_language_content(&descriptions, &[]);
        assert_eq!(description.map(|d| d.language.as_str()), Some("german"));
    }
}
