//! Label values and the ordering used by sorted group sets.
//!
//! Category labels usually carry a number ("5", "10 m", "-2.5e1"), but nothing
//! guarantees it. Labels are read by their longest numeric prefix, and labels
//! without one get a fixed place in the ordering instead of comparing as
//! "neither less nor greater":
//!
//! - numbers compare numerically in the configured direction (`0 == -0`)
//! - text labels sort after every number, in both directions
//! - text labels compare among themselves ascending by their raw text
//!
//! `Ordering::Equal` from [`LabelKey::rank`] means "belongs to the same group".

use core::cmp::Ordering;

/// Group-level sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            Self::Ascending
        } else {
            Self::Descending
        }
    }

    /// Apply the direction to an ascending comparison result.
    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Ascending => ord,
            Self::Descending => ord.reverse(),
        }
    }
}

/// Sort key derived from a group label.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelKey {
    Number(f64),
    Text(String),
}

impl LabelKey {
    pub fn parse(label: &str) -> Self {
        match parse_leading_number(label) {
            Some(v) => Self::Number(v),
            None => Self::Text(label.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    /// Position of `self` relative to `other` in a group sequence sorted by `direction`.
    pub fn rank(&self, other: &LabelKey, direction: SortDirection) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => {
                // parse_leading_number never yields NaN
                direction.apply(a.partial_cmp(b).unwrap_or(Ordering::Equal))
            }
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
        }
    }
}

/// Parse the longest numeric prefix of `label`, after leading whitespace.
///
/// Accepts an optional sign, then either `Infinity` or digits with an optional
/// fraction and exponent. Returns `None` when no prefix is a number.
pub fn parse_leading_number(label: &str) -> Option<f64> {
    let s = label.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    if s[end..].starts_with("Infinity") {
        let negative = bytes.first() == Some(&b'-');
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn label_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            (-1000i32..1000).prop_map(|v| v.to_string()),
            (-100.0f64..100.0).prop_map(|v| format!("{v:.2} m")),
            "[a-z]{1,6}",
        ]
    }

    proptest! {
        #[test]
        fn rank_is_antisymmetric(a in label_strategy(), b in label_strategy(), asc in any::<bool>()) {
            let dir = SortDirection::from_ascending(asc);
            let ka = LabelKey::parse(&a);
            let kb = LabelKey::parse(&b);
            prop_assert_eq!(ka.rank(&kb, dir), kb.rank(&ka, dir).reverse());
        }

        #[test]
        fn sort_by_rank_is_total(mut labels in prop::collection::vec(label_strategy(), 0..20), asc in any::<bool>()) {
            let dir = SortDirection::from_ascending(asc);
            labels.sort_by(|a, b| LabelKey::parse(a).rank(&LabelKey::parse(b), dir));
            for pair in labels.windows(2) {
                let ord = LabelKey::parse(&pair[0]).rank(&LabelKey::parse(&pair[1]), dir);
                prop_assert_ne!(ord, Ordering::Greater);
            }
        }
    }
}
