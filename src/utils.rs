/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_places() {
        assert_eq!(round_to(1.234_56, 2), 1.23);
        assert_eq!(round_to(1.235_01, 2), 1.24);
        assert_eq!(round_to(7.5, 0), 8.0);
        assert_eq!(round_to(0.0, 2), 0.0);
    }
}
