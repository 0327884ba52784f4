use std::env;

use crate::MAX_SPELLCHECK_LANGUAGES;

pub(crate) const ENGINE_SPELLCHECK_LANGUAGES: &[&str] = &[
    "af", "bg", "ca", "cs", "cy", "da", "de", "de-DE", "el", "en-AU", "en-CA", "en-GB", "en-US",
    "es", "es-419", "es-ES", "es-MX", "et", "fa", "fo", "fr", "fr-FR", "he", "hi", "hr", "hu",
    "hy", "id", "it", "it-IT", "ko", "lt", "lv", "nb", "nl", "pl", "pt", "pt-BR", "pt-PT", "ro",
    "ru", "sh", "sk", "sl", "sq", "sr", "sv", "ta", "tg", "tr", "uk", "vi",
];

// Request order is kept, duplicates dropped, capped at MAX_SPELLCHECK_LANGUAGES.
pub(crate) fn select_spellcheck_languages<S: AsRef<str>>(
    requested: &[String],
    supported: &[S],
) -> Vec<String> {
    let mut selected: Vec<String> = Vec::new();
    for language in requested {
        if selected.len() == MAX_SPELLCHECK_LANGUAGES {
            break;
        }
        let is_supported = supported
            .iter()
            .any(|candidate| candidate.as_ref() == language.as_str());
        if is_supported && !selected.contains(language) {
            selected.push(language.clone());
        }
    }
    selected
}

pub(crate) fn normalize_locale_tag(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let base = raw.split(['.', '@']).next().unwrap_or_default();
    if base.is_empty() || base.eq_ignore_ascii_case("C") || base.eq_ignore_ascii_case("POSIX") {
        return None;
    }

    let mut parts = base.split(['_', '-']);
    let language = parts.next()?.to_ascii_lowercase();
    match parts.next() {
        Some(region) if !region.is_empty() => {
            Some(format!("{language}-{}", region.to_ascii_uppercase()))
        }
        _ => Some(language),
    }
}

pub(crate) fn system_spellcheck_languages() -> Vec<String> {
    for env_key in ["LC_ALL", "LC_MESSAGES", "LANG"] {
        let Ok(value) = env::var(env_key) else {
            continue;
        };
        let Some(tag) = normalize_locale_tag(&value) else {
            continue;
        };
        let mut languages = vec![tag.clone()];
        if let Some((language, _)) = tag.split_once('-') {
            languages.push(language.to_string());
        }
        return languages;
    }
    vec!["en-US".to_string()]
}

pub(crate) fn effective_spellcheck_languages(requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        return select_spellcheck_languages(
            &system_spellcheck_languages(),
            ENGINE_SPELLCHECK_LANGUAGES,
        );
    }
    select_spellcheck_languages(requested, ENGINE_SPELLCHECK_LANGUAGES)
}

// WebKitGTK takes the whole list; WebView2 and WKWebView only follow the
// document language.
pub(crate) const ENGINE_ACCEPTS_LANGUAGE_LIST: bool = cfg!(target_os = "linux");

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct SpellcheckDelivery<'a> {
    pub(crate) engine: &'a [String],
    pub(crate) unsupported: &'a [String],
}

pub(crate) fn plan_spellcheck_delivery(
    languages: &[String],
    accepts_list: bool,
) -> SpellcheckDelivery<'_> {
    if accepts_list || languages.len() <= 1 {
        return SpellcheckDelivery {
            engine: languages,
            unsupported: &[],
        };
    }
    let (engine, unsupported) = languages.split_at(1);
    SpellcheckDelivery {
        engine,
        unsupported,
    }
}

pub(crate) fn build_apply_script(languages: &[String]) -> Result<String, String> {
    let encoded = serde_json::to_string(languages)
        .map_err(|error| format!("Failed to encode spellcheck languages: {error}"))?;
    Ok(format!(
        "window.__CORDSHELL__ && window.__CORDSHELL__.spellcheck.apply({encoded});"
    ))
}
