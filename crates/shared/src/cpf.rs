//! CPF (Brazilian tax id) checksum validation and formatting.

/// Strips formatting from a CPF, keeping digits only.
#[must_use]
pub fn strip_cpf(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Validates a CPF by its two check digits.
///
/// Accepts formatted (`123.456.789-09`) or bare (`12345678909`) input.
/// Sequences of a single repeated digit pass the checksum but are not
/// valid CPFs, so they are rejected.
#[must_use]
pub fn validate_cpf(input: &str) -> bool {
    let digits = strip_cpf(input);
    if digits.len() != 11 {
        return false;
    }

    let d: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
    if d.windows(2).all(|w| w[0] == w[1]) {
        return false;
    }

    check_digit(&d[..9], 10) == d[9] && check_digit(&d[..10], 11) == d[10]
}

fn check_digit(digits: &[u32], start_weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &digit)| digit * (start_weight - i as u32))
        .sum();
    let check = 11 - (sum % 11);
    if check >= 10 { 0 } else { check }
}

/// Formats a bare CPF as `123.456.789-09`.
///
/// Returns the input unchanged when it does not hold exactly 11 digits.
#[must_use]
pub fn format_cpf(input: &str) -> String {
    let digits = strip_cpf(input);
    if digits.len() != 11 {
        return input.to_string();
    }
    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("529.982.247-25")]
    #[case("52998224725")]
    #[case("111.444.777-35")]
    fn test_valid_cpfs(#[case] cpf: &str) {
        assert!(validate_cpf(cpf));
    }

    #[rstest]
    #[case("529.982.247-26")] // wrong second check digit
    #[case("111.111.111-11")] // repeated digit
    #[case("00000000000")]
    #[case("1234567890")] // 10 digits
    #[case("123456789012")] // 12 digits
    #[case("")]
    #[case("abc.def.ghi-jk")]
    fn test_invalid_cpfs(#[case] cpf: &str) {
        assert!(!validate_cpf(cpf));
    }

    #[test]
    fn test_strip_cpf() {
        assert_eq!(strip_cpf("529.982.247-25"), "52998224725");
        assert_eq!(strip_cpf("(11) 98765-4321"), "11987654321");
    }

    #[test]
    fn test_format_cpf() {
        assert_eq!(format_cpf("52998224725"), "529.982.247-25");
        assert_eq!(format_cpf("123"), "123");
    }
}
