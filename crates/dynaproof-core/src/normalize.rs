//! Text normalization applied before any answer comparison.

use unicode_normalization::char::{canonical_combining_class, is_combining_mark};
use unicode_normalization::UnicodeNormalization;

/// Case-fold, trim and strip diacritics.
///
/// `"HİPOTENÜŞ"` and `"hipotenus"` normalize to the same string. Turkish
/// dotless `ı` has no decomposition, so it is folded to `i` explicitly.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_diacritic(*c))
        .map(|c| if c == 'ı' { 'i' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Nonspacing marks. Spacing (Mc) and enclosing (Me) marks have combining
/// class 0 and are kept.
fn is_diacritic(c: char) -> bool {
    is_combining_mark(c) && canonical_combining_class(c) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_turkish_diacritics() {
        assert_eq!(normalize("HİPOTENÜŞ"), "hipotenus");
        assert_eq!(normalize("HİPOTENÜŞ"), normalize("hipotenus"));
        assert_eq!(normalize("  Çünkü payda eşitlenir "), "cunku payda esitlenir");
        assert_eq!(normalize("Sayı"), "sayi");
    }

    #[test]
    fn keeps_spacing_and_enclosing_marks() {
        assert_eq!(normalize("a\u{20dd}"), "a\u{20dd}");
        assert_eq!(normalize("\u{915}\u{903}"), "\u{915}\u{903}");
        assert_eq!(normalize("e\u{301}\u{20dd}"), "e\u{20dd}");
    }

    #[test]
    fn idempotent() {
        for input in [
            "",
            "   ",
            "Bölüm ÇIKAR",
            "\u{301} leading mark",
            "ÖĞRENCİ sonuç: -3/4",
            "Σίσυφος",
        ] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn keeps_token_boundaries() {
        assert_eq!(normalize("bu yüzden  sonuç"), "bu yuzden  sonuc");
    }
}
