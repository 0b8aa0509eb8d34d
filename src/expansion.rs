//! Length-dependent expansion ratio and the padding literals built from it.

use crate::ast::{MessageElement, MessageSequence};

/// Bracket glyph at the outer edge of each padding literal.
pub const PADDING_MARKER: &str = "မြ";

pub const PADDING_FILL: char = '·';

/// Expansion ratio for a message of `length` characters.
///
/// Short strings get proportionally more room. The 51..=70 bracket is
/// deliberately higher than 31..=50.
pub fn expand_ratio(length: usize) -> f64 {
    match length {
        0..=10 => 3.0,
        11..=20 => 2.0,
        21..=30 => 1.8,
        31..=50 => 1.6,
        51..=70 => 1.7,
        _ => 1.3,
    }
}

/// `length × ratio`, never below one.
pub fn additional_length(length: usize) -> f64 {
    (length as f64 * expand_ratio(length)).max(1.0)
}

/// Fill characters on each side: a quarter of the additional length, rounded up.
pub fn fill_count(length: usize) -> usize {
    let per_side = additional_length(length) / 2.0;
    (per_side / 2.0).ceil() as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingSide {
    Left,
    Right,
}

/// A fresh padding literal; the marker sits on the outside.
pub fn padding(side: PaddingSide, fill: usize) -> MessageElement {
    let dots: String = std::iter::repeat_n(PADDING_FILL, fill).collect();
    let value = match side {
        PaddingSide::Left => format!("{}{}", PADDING_MARKER, dots),
        PaddingSide::Right => format!("{}{}", dots, PADDING_MARKER),
    };
    MessageElement::Literal { value }
}

/// Wrap `elements` in left and right padding sized for `length` characters.
pub fn pad_sequence(elements: MessageSequence, length: usize) -> MessageSequence {
    let fill = fill_count(length);
    tracing::trace!(
        length,
        ratio = expand_ratio(length),
        fill,
        "padding pseudolocalized message"
    );

    let mut padded = Vec::with_capacity(elements.len() + 2);
    padded.push(padding(PaddingSide::Left, fill));
    padded.extend(elements);
    padded.push(padding(PaddingSide::Right, fill));
    MessageSequence(padded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_breakpoints() {
        let cases = [
            (0, 3.0),
            (10, 3.0),
            (11, 2.0),
            (20, 2.0),
            (21, 1.8),
            (30, 1.8),
            (31, 1.6),
            (50, 1.6),
            (51, 1.7),
            (70, 1.7),
            (71, 1.3),
            (500, 1.3),
        ];
        for (length, ratio) in cases {
            assert_eq!(expand_ratio(length), ratio, "length {}", length);
        }
    }

    #[test]
    fn test_ratio_rises_again_at_51() {
        assert!(expand_ratio(51) > expand_ratio(50));
        assert!(expand_ratio(71) < expand_ratio(70));
    }

    #[test]
    fn test_additional_length_floor() {
        assert_eq!(additional_length(0), 1.0);
        assert_eq!(additional_length(2), 6.0);
    }

    #[test]
    fn test_fill_counts() {
        // ceil(length * ratio / 4)
        assert_eq!(fill_count(0), 1);
        assert_eq!(fill_count(2), 2);
        assert_eq!(fill_count(10), 8);
        assert_eq!(fill_count(11), 6);
        assert_eq!(fill_count(20), 10);
        assert_eq!(fill_count(21), 10);
        assert_eq!(fill_count(30), 14);
        assert_eq!(fill_count(31), 13);
        assert_eq!(fill_count(50), 20);
        assert_eq!(fill_count(51), 22);
        assert_eq!(fill_count(70), 30);
        assert_eq!(fill_count(71), 24);
        assert_eq!(fill_count(75), 25);
    }

    #[test]
    fn test_padding_marker_outside() {
        assert_eq!(
            padding(PaddingSide::Left, 3),
            MessageElement::literal("မြ···")
        );
        assert_eq!(
            padding(PaddingSide::Right, 3),
            MessageElement::literal("···မြ")
        );
        assert_eq!(padding(PaddingSide::Left, 0), MessageElement::literal("မြ"));
    }

    #[test]
    fn test_pad_sequence_wraps_once() {
        let inner = MessageSequence(vec![
            MessageElement::literal("ḫí"),
            MessageElement::argument("name"),
        ]);
        let padded = pad_sequence(inner.clone(), 2);
        assert_eq!(padded.len(), inner.len() + 2);
        assert_eq!(padded.0[1..3], inner.0[..]);
        assert_eq!(padded.first(), Some(&MessageElement::literal("မြ··")));
        assert_eq!(padded.last(), Some(&MessageElement::literal("··မြ")));
    }
}
