use crate::constants::{APT_DECIMALS, OCTAS_PER_APT};

/// Display value of an octa amount.
pub fn octas_to_apt(octas: u64) -> f64 {
    octas as f64 / OCTAS_PER_APT as f64
}

/// Converts a decimal APT string into octas.
///
/// Digits past the eighth decimal place are dropped. Anything that is not a
/// plain non-negative decimal (empty, signed, exponent, garbage) yields 0.
pub fn parse_apt_amount(raw: &str) -> u64 {
    let trimmed = raw.trim();
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return 0;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return 0;
    }

    let whole_octas = if whole.is_empty() {
        Some(0)
    } else {
        whole
            .parse::<u64>()
            .ok()
            .and_then(|w| w.checked_mul(OCTAS_PER_APT))
    };

    let scale = APT_DECIMALS as usize;
    let mut digits: String = fraction.chars().take(scale).collect();
    while digits.len() < scale {
        digits.push('0');
    }
    let fraction_octas = digits.parse::<u64>().ok();

    match (whole_octas, fraction_octas) {
        (Some(w), Some(f)) => w.checked_add(f).unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_apt_amount_handles_decimals() {
        assert_eq!(parse_apt_amount("1.5"), 150_000_000);
        assert_eq!(parse_apt_amount("0.29"), 29_000_000);
        assert_eq!(parse_apt_amount(".5"), 50_000_000);
        assert_eq!(parse_apt_amount("2"), 200_000_000);
        assert_eq!(parse_apt_amount(" 3. "), 300_000_000);
    }

    #[test]
    fn parse_apt_amount_truncates_extra_precision() {
        assert_eq!(parse_apt_amount("0.123456789"), 12_345_678);
    }

    #[test]
    fn parse_apt_amount_invalid_is_zero() {
        for raw in ["", " ", ".", "abc", "-1", "1e3", "1.2.3", "NaN", "99999999999999999999"] {
            assert_eq!(parse_apt_amount(raw), 0, "input {:?}", raw);
        }
    }

    #[test]
    fn octas_to_apt_divides_by_ten_to_the_eighth() {
        assert!((octas_to_apt(150_000_000) - 1.5).abs() < f64::EPSILON);
        assert_eq!(format!("{}", octas_to_apt(100_000_000)), "1");
    }
}
