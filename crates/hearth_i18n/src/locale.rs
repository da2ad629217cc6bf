/// Normalize language codes to a canonical-ish form before fetching.
///
/// - Converts `_` to `-` (POSIX locales report `en_US`).
/// - Trims whitespace.
/// - Drops an encoding suffix (`en_US.UTF-8` -> `en-US`).
pub fn normalize_locale(s: &str) -> String {
    let s = s.trim();
    let s = s.split('.').next().unwrap_or(s);
    s.replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_posix_locales() {
        assert_eq!(normalize_locale("en_US"), "en-US");
        assert_eq!(normalize_locale(" eo "), "eo");
        assert_eq!(normalize_locale("pt_BR.UTF-8"), "pt-BR");
        assert_eq!(normalize_locale(""), "");
    }
}
