use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for translation API language codes
///
/// Machine-translation services expect uppercase ISO 639-1 codes, optionally
/// with a regional variant ("EN-US", "PT-BR", "ZH-HANS"). Users tend to type
/// whatever their media tools emit, so this module accepts two-letter codes,
/// three-letter ISO 639-3 codes, and mixed case, and normalizes everything
/// to the wire form.
/// Split a user-supplied code into its base language and optional region
fn split_code(code: &str) -> (String, Option<String>) {
    let trimmed = code.trim();
    match trimmed.split_once(['-', '_']) {
        Some((base, region)) if !region.is_empty() => {
            (base.to_lowercase(), Some(region.to_uppercase()))
        }
        _ => (trimmed.to_lowercase(), None),
    }
}

/// Resolve the base part of a language code to an isolang Language
fn resolve_base(base: &str) -> Result<Language> {
    match base.len() {
        2 => Language::from_639_1(base)
            .ok_or_else(|| anyhow!("Unknown ISO 639-1 language code: {}", base)),
        3 => Language::from_639_3(base)
            .ok_or_else(|| anyhow!("Unknown ISO 639-3 language code: {}", base)),
        _ => Err(anyhow!("Invalid language code: {}", base)),
    }
}

/// Normalize a language code to the form translation APIs expect
///
/// Two- and three-letter base codes are accepted; three-letter codes are
/// converted to their two-letter equivalent ("zho" -> "ZH"). A regional
/// suffix is kept and uppercased ("en-us" -> "EN-US"). Three-letter codes
/// without a two-letter equivalent are rejected, since no MT service we
/// target accepts them.
pub fn normalize_to_api_code(code: &str) -> Result<String> {
    let (base, region) = split_code(code);
    if base.is_empty() {
        return Err(anyhow!("Empty language code"));
    }

    let language = resolve_base(&base)?;
    let part1 = language.to_639_1().ok_or_else(|| {
        anyhow!(
            "Language '{}' has no two-letter code usable with the translation API",
            language.to_name()
        )
    })?;

    match region {
        Some(region) => {
            if region.len() < 2 || region.len() > 4 || !region.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(anyhow!("Invalid region in language code: {}", code));
            }
            Ok(format!("{}-{}", part1.to_uppercase(), region))
        }
        None => Ok(part1.to_uppercase()),
    }
}

/// Check if two language codes refer to the same base language
///
/// Regional variants compare equal at the base level: "en-US" matches "en".
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    let base1 = match split_code(code1) {
        (b, _) if !b.is_empty() => b,
        _ => return false,
    };
    let base2 = match split_code(code2) {
        (b, _) if !b.is_empty() => b,
        _ => return false,
    };

    match (resolve_base(&base1), resolve_base(&base2)) {
        (Ok(l1), Ok(l2)) => l1 == l2,
        _ => false,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let (base, _) = split_code(code);
    let language = resolve_base(&base)?;
    Ok(language.to_name().to_string())
}
