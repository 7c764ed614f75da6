//! Text helpers shared by the catalog and the sheet assembler

/// URL slug of a hymn title: lowercase, apostrophes and commas dropped,
/// whitespace runs collapsed to a single dash. Accented letters are kept.
pub fn slugify(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '\'' | '\u{2019}' | ','))
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Trim every line and drop empty ones, keeping line structure.
pub fn normalize_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert an integer to Roman numerals; 0 yields an empty string.
pub fn to_roman(mut n: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut roman = String::new();
    for &(value, symbol) in TABLE.iter() {
        while n >= value {
            roman.push_str(symbol);
            n -= value;
        }
    }
    roman
}
