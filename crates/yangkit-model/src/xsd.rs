//! Translation of XML Schema regular expressions into `regex` syntax.
//!
//! YANG `pattern` arguments follow the XSD dialect: every expression is
//! implicitly anchored, `^` and `$` outside a character class are ordinary
//! characters, and `\p{IsName}` names a Unicode block rather than a script.

use tracing::trace;

/// Unicode blocks addressable through `\p{IsName}`, with their code point ranges.
const BLOCKS: &[(&str, u32, u32)] = &[
    ("BasicLatin", 0x0000, 0x007F),
    ("Latin-1Supplement", 0x0080, 0x00FF),
    ("LatinExtended-A", 0x0100, 0x017F),
    ("LatinExtended-B", 0x0180, 0x024F),
    ("IPAExtensions", 0x0250, 0x02AF),
    ("SpacingModifierLetters", 0x02B0, 0x02FF),
    ("CombiningDiacriticalMarks", 0x0300, 0x036F),
    ("Greek", 0x0370, 0x03FF),
    ("GreekandCoptic", 0x0370, 0x03FF),
    ("Cyrillic", 0x0400, 0x04FF),
    ("CyrillicSupplementary", 0x0500, 0x052F),
    ("Armenian", 0x0530, 0x058F),
    ("Hebrew", 0x0590, 0x05FF),
    ("Arabic", 0x0600, 0x06FF),
    ("Syriac", 0x0700, 0x074F),
    ("Thaana", 0x0780, 0x07BF),
    ("Devanagari", 0x0900, 0x097F),
    ("Bengali", 0x0980, 0x09FF),
    ("Gurmukhi", 0x0A00, 0x0A7F),
    ("Gujarati", 0x0A80, 0x0AFF),
    ("Oriya", 0x0B00, 0x0B7F),
    ("Tamil", 0x0B80, 0x0BFF),
    ("Telugu", 0x0C00, 0x0C7F),
    ("Kannada", 0x0C80, 0x0CFF),
    ("Malayalam", 0x0D00, 0x0D7F),
    ("Sinhala", 0x0D80, 0x0DFF),
    ("Thai", 0x0E00, 0x0E7F),
    ("Lao", 0x0E80, 0x0EFF),
    ("Tibetan", 0x0F00, 0x0FFF),
    ("Myanmar", 0x1000, 0x109F),
    ("Georgian", 0x10A0, 0x10FF),
    ("HangulJamo", 0x1100, 0x11FF),
    ("Ethiopic", 0x1200, 0x137F),
    ("Cherokee", 0x13A0, 0x13FF),
    ("Ogham", 0x1680, 0x169F),
    ("Runic", 0x16A0, 0x16FF),
    ("Khmer", 0x1780, 0x17FF),
    ("Mongolian", 0x1800, 0x18AF),
    ("LatinExtendedAdditional", 0x1E00, 0x1EFF),
    ("GreekExtended", 0x1F00, 0x1FFF),
    ("GeneralPunctuation", 0x2000, 0x206F),
    ("SuperscriptsandSubscripts", 0x2070, 0x209F),
    ("CurrencySymbols", 0x20A0, 0x20CF),
    ("LetterlikeSymbols", 0x2100, 0x214F),
    ("NumberForms", 0x2150, 0x218F),
    ("Arrows", 0x2190, 0x21FF),
    ("MathematicalOperators", 0x2200, 0x22FF),
    ("MiscellaneousTechnical", 0x2300, 0x23FF),
    ("ControlPictures", 0x2400, 0x243F),
    ("EnclosedAlphanumerics", 0x2460, 0x24FF),
    ("BoxDrawing", 0x2500, 0x257F),
    ("BlockElements", 0x2580, 0x259F),
    ("GeometricShapes", 0x25A0, 0x25FF),
    ("MiscellaneousSymbols", 0x2600, 0x26FF),
    ("Dingbats", 0x2700, 0x27BF),
    ("BraillePatterns", 0x2800, 0x28FF),
    ("CJKSymbolsandPunctuation", 0x3000, 0x303F),
    ("Hiragana", 0x3040, 0x309F),
    ("Katakana", 0x30A0, 0x30FF),
    ("Bopomofo", 0x3100, 0x312F),
    ("HangulCompatibilityJamo", 0x3130, 0x318F),
    ("CJKUnifiedIdeographsExtensionA", 0x3400, 0x4DBF),
    ("CJKUnifiedIdeographs", 0x4E00, 0x9FFF),
    ("YiSyllables", 0xA000, 0xA48F),
    ("HangulSyllables", 0xAC00, 0xD7AF),
    ("PrivateUseArea", 0xE000, 0xF8FF),
    ("CJKCompatibilityIdeographs", 0xF900, 0xFAFF),
    ("AlphabeticPresentationForms", 0xFB00, 0xFB4F),
    ("ArabicPresentationForms-A", 0xFB50, 0xFDFF),
    ("HalfwidthandFullwidthForms", 0xFF00, 0xFFEF),
    ("Specials", 0xFFF0, 0xFFFF),
    ("Emoticons", 0x1F600, 0x1F64F),
];

/// Code point range of a named block, if known.
pub fn block_range(name: &str) -> Option<(u32, u32)> {
    BLOCKS
        .iter()
        .find(|(block, _, _)| *block == name)
        .map(|&(_, start, end)| (start, end))
}

/// Rewrites an XSD expression as an anchored `regex` expression.
///
/// Unknown `\p{IsName}` blocks are left untouched, so compiling the result
/// reports them.
pub fn to_regex(xsd: &str) -> String {
    let chars: Vec<char> = xsd.chars().collect();
    let mut out = String::with_capacity(xsd.len() + 8);
    out.push_str("^(?:");

    let mut depth = 0usize;
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '\\' => {
                if let Some((class, consumed)) = block_escape(&chars[i..]) {
                    out.push_str(&class);
                    i += consumed;
                    continue;
                }
                // Copy the escape pair verbatim.
                out.push(ch);
                if let Some(&next) = chars.get(i + 1) {
                    out.push(next);
                    i += 1;
                }
            }
            '[' => {
                depth += 1;
                out.push(ch);
            }
            ']' if depth > 0 => {
                depth -= 1;
                out.push(ch);
            }
            '^' | '$' if depth == 0 => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
        i += 1;
    }

    out.push_str(")$");
    trace!(pattern = xsd, translated = %out, "translated pattern");
    out
}

/// Matches `\p{IsName}` or `\P{IsName}` at the start of `chars`, returning
/// the replacement class and the number of characters consumed.
fn block_escape(chars: &[char]) -> Option<(String, usize)> {
    let negated = match chars.get(1)? {
        'p' => false,
        'P' => true,
        _ => return None,
    };
    if chars.get(2) != Some(&'{') {
        return None;
    }
    let close = chars[3..].iter().position(|&c| c == '}')? + 3;
    let name: String = chars[3..close].iter().collect();
    let (start, end) = block_range(name.strip_prefix("Is")?)?;
    let class = format!(
        "[{}\\x{{{:X}}}-\\x{{{:X}}}]",
        if negated { "^" } else { "" },
        start,
        end
    );
    Some((class, close + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_outside_classes_become_literals() {
        assert_eq!(to_regex("[0-9]+$"), r"^(?:[0-9]+\$)$");
        assert_eq!(to_regex("^abc"), r"^(?:\^abc)$");
        assert_eq!(to_regex("[^a-z$]"), "^(?:[^a-z$])$");
    }

    #[test]
    fn escaped_characters_are_kept() {
        assert_eq!(to_regex(r"a\$b"), r"^(?:a\$b)$");
        assert_eq!(to_regex(r"\[x$"), r"^(?:\[x\$)$");
        assert_eq!(to_regex(r"\d{2}\.\d"), r"^(?:\d{2}\.\d)$");
    }

    #[test]
    fn block_escapes_become_ranges() {
        assert_eq!(to_regex(r"\p{IsBasicLatin}*"), r"^(?:[\x{0}-\x{7F}]*)$");
        assert_eq!(to_regex(r"\P{IsGreek}"), r"^(?:[^\x{370}-\x{3FF}])$");
        assert_eq!(to_regex(r"[\p{IsBasicLatin}]"), r"^(?:[[\x{0}-\x{7F}]])$");
    }

    #[test]
    fn categories_and_unknown_blocks_pass_through() {
        assert_eq!(to_regex(r"\p{L}+"), r"^(?:\p{L}+)$");
        assert_eq!(to_regex(r"\p{IsNoSuchBlock}"), r"^(?:\p{IsNoSuchBlock})$");
        assert_eq!(block_range("Cyrillic"), Some((0x0400, 0x04FF)));
    }
}
