//! ISBN-10 / ISBN-13 checksum validation.
//!
//! Input may contain hyphens and spaces anywhere; they are stripped before
//! the checksum is computed, so every grouping of the same digits gives the
//! same answer.

/// Which ISBN standard a well-formed value conforms to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsbnKind {
    Isbn10,
    Isbn13,
}

/// Strip hyphens and spaces and uppercase the remainder.
///
/// This is also the form used for uniqueness lookups.
///
/// ```
/// use orderdesk_core::isbn::normalize;
///
/// assert_eq!(normalize("0-306-40615-x"), "030640615X");
/// assert_eq!(normalize("978 0 306 40615 7"), "9780306406157");
/// ```
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '-' && *c != ' ')
        .flat_map(char::to_uppercase)
        .collect()
}

/// Classify a raw ISBN, returning `None` when the checksum does not hold.
pub fn classify(raw: &str) -> Option<IsbnKind> {
    let clean = normalize(raw);
    let bytes = clean.as_bytes();
    match bytes.len() {
        10 if is_valid_isbn10(bytes) => Some(IsbnKind::Isbn10),
        13 if is_valid_isbn13(bytes) => Some(IsbnKind::Isbn13),
        _ => None,
    }
}

/// Whether `raw` is a valid ISBN-10 or ISBN-13 once hyphens and spaces are removed.
pub fn is_valid(raw: &str) -> bool {
    classify(raw).is_some()
}

/// Check character for the first nine ISBN-10 digits: `'0'..='9'` or `'X'`.
///
/// Returns `None` if the input is not exactly nine ASCII digits.
pub fn isbn10_check_char(first_nine: &str) -> Option<char> {
    let bytes = first_nine.as_bytes();
    if bytes.len() != 9 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let check = weighted_sum_10(bytes) % 11;
    Some(if check == 10 {
        'X'
    } else {
        char::from(b'0' + check as u8)
    })
}

/// Check digit for the first twelve ISBN-13 digits.
///
/// Returns `None` if the input is not exactly twelve ASCII digits.
pub fn isbn13_check_digit(first_twelve: &str) -> Option<char> {
    let bytes = first_twelve.as_bytes();
    if bytes.len() != 12 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(char::from(b'0' + check_digit_13(bytes)))
}

fn is_valid_isbn10(bytes: &[u8]) -> bool {
    let (body, last) = bytes.split_at(9);
    if !body.iter().all(u8::is_ascii_digit) {
        return false;
    }
    let check = weighted_sum_10(body) % 11;
    match last[0] {
        b'X' => check == 10,
        d if d.is_ascii_digit() => u32::from(d - b'0') == check,
        _ => false,
    }
}

fn is_valid_isbn13(bytes: &[u8]) -> bool {
    if !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }
    bytes[12] - b'0' == check_digit_13(&bytes[..12])
}

/// `Σ (i + 1) * digit[i]` over the nine body digits.
fn weighted_sum_10(body: &[u8]) -> u32 {
    body.iter()
        .enumerate()
        .map(|(i, d)| (i as u32 + 1) * u32::from(d - b'0'))
        .sum()
}

/// Alternating 1/3 weights, then `(10 - sum mod 10) mod 10`.
fn check_digit_13(body: &[u8]) -> u8 {
    let sum: u32 = body
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let weight = if i % 2 == 0 { 1 } else { 3 };
            weight * u32::from(d - b'0')
        })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_isbn10() {
        assert_eq!(classify("0306406152"), Some(IsbnKind::Isbn10));
    }

    #[test]
    fn hyphenated_isbn10_matches_plain() {
        assert_eq!(is_valid("0-306-40615-2"), is_valid("0306406152"));
        assert!(is_valid("0-306-40615-2"));
    }

    #[test]
    fn isbn10_with_x_check() {
        // 0-8044-2957-X: sum of weighted body digits is 230, 230 mod 11 = 10.
        assert!(is_valid("0-8044-2957-X"));
        assert!(is_valid("080442957x"));
    }

    #[test]
    fn isbn10_wrong_check_digit() {
        assert!(!is_valid("0306406153"));
    }

    #[test]
    fn isbn10_x_in_body_rejected() {
        assert!(!is_valid("03064X6152"));
    }

    #[test]
    fn isbn10_x_when_check_is_digit_rejected() {
        assert!(!is_valid("030640615X"));
    }

    #[test]
    fn valid_isbn13() {
        assert_eq!(classify("9780306406157"), Some(IsbnKind::Isbn13));
        assert!(is_valid("978-0-306-40615-7"));
    }

    #[test]
    fn isbn13_wrong_check_digit() {
        assert!(!is_valid("9780306406158"));
    }

    #[test]
    fn isbn13_rejects_x() {
        assert!(!is_valid("978030640615X"));
    }

    #[test]
    fn other_lengths_rejected() {
        assert!(!is_valid(""));
        assert!(!is_valid("12345"));
        assert!(!is_valid("12345678901"));
        assert!(!is_valid("97803064061570"));
    }

    #[test]
    fn non_ascii_input_rejected() {
        assert!(!is_valid("０３０６４０６１５２"));
    }

    #[test]
    fn check_helpers_agree_with_validator() {
        assert_eq!(isbn10_check_char("030640615"), Some('2'));
        assert_eq!(isbn10_check_char("080442957"), Some('X'));
        assert_eq!(isbn13_check_digit("978030640615"), Some('7'));
        assert_eq!(isbn10_check_char("03064061"), None);
        assert_eq!(isbn13_check_digit("97803064061a"), None);
    }
}
