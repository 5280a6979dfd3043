//! Property-based tests for data parsing and result formatting.

use std::path::Path;

use ce_core::data::parse_observations_str;
use ce_core::output::{format_sci, FILE_PRECISION, TABLE_PRECISION};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Line {
    Pair(u64, u64),
    Comment(String),
    Blank,
}

fn line() -> impl Strategy<Value = Line> {
    prop_oneof![
        4 => (any::<u64>(), any::<u64>()).prop_map(|(k, n)| Line::Pair(k, n)),
        1 => "[a-z ]{0,12}".prop_map(Line::Comment),
        1 => Just(Line::Blank),
    ]
}

fn render(lines: &[Line]) -> String {
    lines
        .iter()
        .map(|line| match line {
            Line::Pair(k, n) => format!("  {k}\t {n} \n"),
            Line::Comment(text) => format!("# {text}\n"),
            Line::Blank => "\n".to_string(),
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Every pair comes back in order with its 1-based line number.
    #[test]
    fn pairs_survive_comments_and_blanks(lines in prop::collection::vec(line(), 0..40)) {
        let parsed = parse_observations_str(&render(&lines), Path::new("gen.txt")).unwrap();
        let expected: Vec<(usize, u64, u64)> = lines
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| match line {
                Line::Pair(k, n) => Some((idx + 1, *k, *n)),
                _ => None,
            })
            .collect();
        let actual: Vec<(usize, u64, u64)> =
            parsed.rows.iter().map(|r| (r.line, r.k, r.n)).collect();
        prop_assert_eq!(actual, expected);
        prop_assert!(parsed.skipped.is_empty());
    }

    /// File precision is enough to read back the exact double.
    #[test]
    fn file_precision_round_trips(value in 0.0..=1.0f64) {
        let text = format_sci(value, FILE_PRECISION);
        let parsed: f64 = text.parse().unwrap();
        prop_assert_eq!(parsed, value);
    }

    /// Exponents are signed and at least two digits wide.
    #[test]
    fn exponent_is_signed_and_padded(value in 1e-300..1.0f64) {
        let text = format_sci(value, TABLE_PRECISION);
        let (mantissa, exponent) = text.split_once('e').unwrap();
        prop_assert_eq!(mantissa.len(), 2 + TABLE_PRECISION);
        prop_assert!(exponent.starts_with('-') || exponent.starts_with('+'));
        prop_assert!(exponent.len() >= 3);
    }
}
