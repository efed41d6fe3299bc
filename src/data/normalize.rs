use unicode_normalization::UnicodeNormalization;

// ---------------------------------------------------------------------------
// Geographic name folding
// ---------------------------------------------------------------------------

/// Fold a region name into its join key: NFKD-decompose, drop everything
/// outside ASCII (which removes the combining accent marks), lowercase.
///
/// Applied identically to the survey's `Gouvernorat` column and to the map
/// features' name property, so keys from either side are byte-comparable.
/// Pure and locale-independent.
pub fn normalize_name(input: &str) -> String {
    input
        .nfkd()
        .filter(|c| c.is_ascii())
        .collect::<String>()
        .to_ascii_lowercase()
}
