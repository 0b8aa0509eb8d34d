//! Fixed substitution table between plain ASCII letters and look-alike
//! accented characters.

pub const ASCII: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Index-aligned with [`ASCII`].
pub const ACCENTED_ASCII: [char; 52] = [
    'â', 'ḃ', 'ć', 'ḋ', 'è', 'ḟ', 'ĝ', 'ḫ', 'í', 'ĵ', 'ǩ', 'ĺ', 'ṁ', 'ń', 'ŏ', 'ṗ', 'ɋ', 'ŕ', 'ś',
    'ṭ', 'ů', 'ṿ', 'ẘ', 'ẋ', 'ẏ', 'ẓ', //
    'Ḁ', 'Ḃ', 'Ḉ', 'Ḋ', 'Ḕ', 'Ḟ', 'Ḡ', 'Ḣ', 'Ḭ', 'Ĵ', 'Ḵ', 'Ļ', 'Ḿ', 'Ŋ', 'Õ', 'Ṕ', 'Ɋ', 'Ŕ', 'Ṡ',
    'Ṯ', 'Ũ', 'Ṽ', 'Ẅ', 'Ẍ', 'Ÿ', 'Ƶ',
];

fn table_index(c: char) -> Option<usize> {
    match c {
        'a'..='z' => Some(c as usize - 'a' as usize),
        'A'..='Z' => Some(26 + c as usize - 'A' as usize),
        _ => None,
    }
}

/// The accented counterpart of `c`, or `None` when `c` is not an ASCII letter.
pub fn accented(c: char) -> Option<char> {
    table_index(c).map(|i| ACCENTED_ASCII[i])
}

/// Accent `c` if the table has an entry for it, otherwise return it as is.
pub fn accent(c: char) -> char {
    accented(c).unwrap_or(c)
}

/// Case-sensitive: only lowercase `a e i o u y` count.
pub fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}
