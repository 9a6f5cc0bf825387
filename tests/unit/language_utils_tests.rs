/*!
 * Tests for language utilities
 */

use ai_translate::language_utils::{language_from_code, prompt_language_name};

/// Test lookup of 2 and 3 letter codes
#[test]
fn test_language_from_code_withIsoCodes_shouldResolve() {
    assert_eq!(language_from_code("fr").map(|l| l.to_name()), Some("French"));
    assert_eq!(language_from_code("DE").map(|l| l.to_name()), Some("German"));
    assert_eq!(language_from_code("rus").map(|l| l.to_name()), Some("Russian"));
}

/// Test that names and junk are not treated as codes
#[test]
fn test_language_from_code_withNonCodes_shouldReturnNone() {
    assert!(language_from_code("russian").is_none());
    assert!(language_from_code("zz").is_none());
    assert!(language_from_code("").is_none());
}

/// Test the language name used in the prompt
#[test]
fn test_prompt_language_name_shouldExpandCodesAndKeepNames() {
    assert_eq!(prompt_language_name("es"), "Spanish");
    assert_eq!(prompt_language_name("russian"), "russian");
    assert_eq!(prompt_language_name("  Brazilian Portuguese "), "Brazilian Portuguese");
}
