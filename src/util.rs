pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

/// Sample standard deviation (Bessel-corrected, divides by `n - 1`).
/// Undefined for fewer than two values.
pub fn sample_std_dev(data: &[f64]) -> Option<f64> {
    match (mean(data), data.len()) {
        (Some(data_mean), count) if count > 1 => {
            let variance = data
                .iter()
                .map(|value| {
                    let diff = data_mean - *value;

                    diff * diff
                })
                .sum::<f64>()
                / (count - 1) as f64;

            Some(variance.sqrt())
        }
        _ => None,
    }
}

/// Formats whole seconds as `m:ss`.
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[10., 20., 30., 15., 22.]), Some(19.4));
        assert_eq!(mean(&[40., 38., 42., 39.]), Some(39.75));
    }

    #[test]
    fn test_mean_single_value() {
        assert_eq!(mean(&[42.0]), Some(42.0));
    }

    #[test]
    fn test_mean_empty_slice() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_sample_std_dev() {
        let result = sample_std_dev(&[2., 4., 4., 4., 5., 5., 7., 9.]).unwrap();
        assert!((result - 2.138089935299395).abs() < 1e-12);

        let result = sample_std_dev(&[40., 38., 42., 39.]).unwrap();
        assert!((result - (8.75_f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_sample_std_dev_two_values() {
        // n - 1 == 1, still defined
        assert_eq!(sample_std_dev(&[10., 20.]), Some(50_f64.sqrt()));
    }

    #[test]
    fn test_sample_std_dev_single_value() {
        assert_eq!(sample_std_dev(&[42.0]), None);
    }

    #[test]
    fn test_sample_std_dev_empty_slice() {
        assert_eq!(sample_std_dev(&[]), None);
    }

    #[test]
    fn test_sample_std_dev_identical_values() {
        assert_eq!(sample_std_dev(&[5.0, 5.0, 5.0, 5.0]), Some(0.0));
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(60), "1:00");
        assert_eq!(format_clock(59), "0:59");
        assert_eq!(format_clock(5), "0:05");
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(125), "2:05");
    }
}
