//! CNPJ Validation
//!
//! CNPJ is the Brazilian entity taxpayer registry number: 14 digits with two
//! modulo-11 check digits. Same contract as the CPF module: pure functions,
//! malformed input validates to `false`.

/// First check digit weights over digits 0..12.
const WEIGHTS_FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
/// Second check digit weights over digits 0..13.
const WEIGHTS_SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Strip every non-digit character. Empty input yields an empty string.
pub fn normalize(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validate the two CNPJ check digits.
///
/// Returns `false` unless the input is exactly 14 digits; all-identical
/// sequences are rejected.
pub fn validate_checksum(digits: &str) -> bool {
    if digits.len() != 14 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let d: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();

    if d.iter().all(|&x| x == d[0]) {
        return false;
    }

    check_digit(&d[..12], &WEIGHTS_FIRST) == d[12]
        && check_digit(&d[..13], &WEIGHTS_SECOND) == d[13]
}

/// Compute one check digit: `11 - sum % 11`, with remainders below 2
/// mapping to 0.
fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let rem = sum % 11;
    if rem < 2 { 0 } else { 11 - rem }
}

/// Format as `##.###.###/####-##`.
///
/// Input is normalized first; digits beyond the fourteenth are ignored.
/// Inputs with fewer than 14 digits are returned digits-only, unformatted.
pub fn format(input: &str) -> String {
    let digits = normalize(input);
    if digits.len() < 14 {
        return digits;
    }
    let d = &digits[..14];
    format!(
        "{}.{}.{}/{}-{}",
        &d[..2],
        &d[2..5],
        &d[5..8],
        &d[8..12],
        &d[12..14]
    )
}

/// Normalize then validate in one step.
pub fn is_valid(input: &str) -> bool {
    validate_checksum(&normalize(input))
}
