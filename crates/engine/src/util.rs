//! Internal helpers for input validation and name normalization.
//!
//! These utilities are **not** part of the public API. They centralize the
//! normalization used for the case-insensitive unique keys of categories and
//! payment methods.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine};

/// Trim and collapse inner whitespace; reject names that end up empty.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }

    let mut out = String::new();
    for token in trimmed.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    Ok(out)
}

/// Case/accent-insensitive key for uniqueness checks.
///
/// NFKD-decomposes, drops combining marks, lowercases, and collapses runs of
/// non-alphanumeric characters into single spaces. "Cartão de Crédito" and
/// "cartao  de credito" map to the same key.
pub(crate) fn normalize_name_key(value: &str) -> ResultEngine<String> {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in value.trim().nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }

    let normalized = out.trim();
    if normalized.is_empty() {
        return Err(EngineError::InvalidName(
            "name must contain at least one alphanumeric character".to_string(),
        ));
    }
    Ok(normalized.to_string())
}

/// Trim optional free text, mapping blank strings to `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_key_folds_case_and_accents() {
        assert_eq!(
            normalize_name_key("Cartão de Crédito").unwrap(),
            "cartao de credito"
        );
        assert_eq!(
            normalize_name_key("  cartao   DE credito ").unwrap(),
            "cartao de credito"
        );
    }

    #[test]
    fn name_key_rejects_empty_input() {
        assert!(normalize_name_key("   ").is_err());
        assert!(normalize_name_key("---").is_err());
    }

    #[test]
    fn required_name_collapses_whitespace() {
        assert_eq!(
            normalize_required_name("  Mercado   do mês ", "category").unwrap(),
            "Mercado do mês"
        );
        assert!(normalize_required_name(" ", "category").is_err());
    }
}
