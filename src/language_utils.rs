/*!
 * Language utilities for the translation prompt.
 *
 * Users may pass either a language name ("russian") or an ISO 639-1 / 639-3
 * code ("ru", "rus"). Codes are expanded to their English name before they
 * reach the model; anything else is passed through.
 */

use isolang::Language;

/// Look up an ISO 639-1 (2-letter) or ISO 639-3 (3-letter) code
pub fn language_from_code(code: &str) -> Option<Language> {
    let normalized_code = code.trim().to_lowercase();

    match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code),
        3 => Language::from_639_3(&normalized_code),
        _ => None,
    }
}

/// Name of the language to put into the prompt
pub fn prompt_language_name(target: &str) -> String {
    match language_from_code(target) {
        Some(language) => language.to_name().to_string(),
        None => target.trim().to_string(),
    }
}

