//! CPF Validation
//!
//! CPF is the Brazilian individual taxpayer registry number: 11 digits, the
//! last two being check digits computed with a positional-weighted modulo-11
//! scheme. All functions are pure and never fail on malformed input; a bad
//! document simply validates to `false` or passes through unformatted.

/// Strip every non-digit character. Empty input yields an empty string.
pub fn normalize(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validate the two CPF check digits.
///
/// Returns `false` unless the input is exactly 11 digits, and rejects the
/// known-invalid all-identical sequences ("00000000000" through
/// "99999999999") which satisfy the checksum but are not issued.
pub fn validate_checksum(digits: &str) -> bool {
    if digits.len() != 11 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let d: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();

    if d.iter().all(|&x| x == d[0]) {
        return false;
    }

    check_digit(&d[..9], 10) == d[9] && check_digit(&d[..10], 11) == d[10]
}

/// Compute one check digit over `digits` with weights descending from
/// `first_weight` to 2. A remainder of 10 maps to 0.
fn check_digit(digits: &[u32], first_weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .zip((2..=first_weight).rev())
        .map(|(d, w)| d * w)
        .sum();
    let rem = (sum * 10) % 11;
    if rem >= 10 { 0 } else { rem }
}

/// Format as `###.###.###-##`.
///
/// Input is normalized first; digits beyond the eleventh are ignored. Inputs
/// with fewer than 11 digits are returned digits-only, unformatted.
pub fn format(input: &str) -> String {
    let digits = normalize(input);
    if digits.len() < 11 {
        return digits;
    }
    let d = &digits[..11];
    format!("{}.{}.{}-{}", &d[..3], &d[3..6], &d[6..9], &d[9..11])
}

/// Normalize then validate in one step.
pub fn is_valid(input: &str) -> bool {
    validate_checksum(&normalize(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize("529.982.247-25"), "52998224725");
        assert_eq!(normalize("abc 123"), "123");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("..--//"), "");
    }

    #[test]
    fn test_known_valid_cpf() {
        assert!(validate_checksum("52998224725"));
        assert!(is_valid("529.982.247-25"));
        assert!(is_valid("111.444.777-35"));
    }

    #[test]
    fn test_altered_check_digit_rejected() {
        assert!(!validate_checksum("52998224724"));
        assert!(!is_valid("111.444.777-36"));
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(!validate_checksum(""));
        assert!(!validate_checksum("5299822472"));
        assert!(!validate_checksum("529982247250"));
    }

    #[test]
    fn test_rejects_all_identical_sequences() {
        for digit in 0u8..=9 {
            let seq: String = std::iter::repeat_n(char::from(b'0' + digit), 11).collect();
            assert!(!validate_checksum(&seq), "sequence {} must be invalid", seq);
        }
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert!(!validate_checksum("5299822472a"));
    }

    #[test]
    fn test_format() {
        assert_eq!(format("52998224725"), "529.982.247-25");
        assert_eq!(format("529982247259999"), "529.982.247-25");
        assert_eq!(format("529.982.247-25"), "529.982.247-25");
    }

    #[test]
    fn test_format_short_input_passthrough() {
        assert_eq!(format("12345"), "12345");
        assert_eq!(format(""), "");
    }

    #[test]
    fn test_format_normalize_roundtrip() {
        let input = "  529-982-247.25 extra";
        let digits = normalize(input);
        assert_eq!(normalize(&format(&digits)), &digits[..11]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Formatting is lossless on digits: re-normalizing the formatted
            /// output reproduces the input digits truncated to 11.
            #[test]
            fn format_preserves_digits(input in ".*") {
                let digits = normalize(&input);
                let reformatted = normalize(&format(&input));
                if digits.len() >= 11 {
                    prop_assert_eq!(reformatted, &digits[..11]);
                } else {
                    prop_assert_eq!(reformatted, digits);
                }
            }

            /// Validation never panics, whatever the input.
            #[test]
            fn validate_never_panics(input in ".*") {
                let _ = validate_checksum(&input);
                let _ = is_valid(&input);
            }

            /// A valid CPF stays valid through a format/normalize cycle.
            #[test]
            fn valid_cpf_survives_reformat(body in proptest::collection::vec(0u32..10, 9)) {
                let mut digits: String = body.iter().map(|d| char::from(b'0' + *d as u8)).collect();
                let dv1 = check_digit(&body, 10);
                digits.push(char::from(b'0' + dv1 as u8));
                let mut with_dv1: Vec<u32> = body.clone();
                with_dv1.push(dv1);
                let dv2 = check_digit(&with_dv1, 11);
                digits.push(char::from(b'0' + dv2 as u8));

                // All-identical bodies are deliberately rejected
                prop_assume!(!digits.chars().all(|c| c == digits.chars().next().unwrap()));

                prop_assert!(validate_checksum(&digits));
                prop_assert!(is_valid(&format(&digits)));
            }
        }
    }
}
