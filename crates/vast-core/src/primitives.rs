//! # Validator Primitives
//!
//! Pure predicates over a value and the name of the field it came from.
//! Each returns `Ok(())` or a [`Rejection`] naming the field. None of them
//! know which entity they run for. The engine attributes rejections.
//!
//! `all_of` is the only combinator. It stops at the first failing primitive
//! it wraps. Entity-level aggregation in the engine never short-circuits.

use std::fmt;

use crate::error::Rejection;
use crate::raw::{RawKind, RawValue};

/// A boxed primitive over `T`, suitable for [`all_of`].
pub type Check<T> = Box<dyn Fn(&T, &str) -> Result<(), Rejection> + Send + Sync>;

/// Rejects unless the raw node has exactly the `expected` shape.
pub fn type_of(expected: RawKind) -> impl Fn(&RawValue, &str) -> Result<(), Rejection> {
    move |value, field| {
        let actual = value.kind();
        if actual == expected {
            Ok(())
        } else {
            Err(Rejection::new(
                field,
                format!("'{field}' must be {expected} (got a {actual})"),
            ))
        }
    }
}

/// Rejects unless `value > bound`.
pub fn greater_than<T>(bound: T) -> impl Fn(&T, &str) -> Result<(), Rejection>
where
    T: PartialOrd + fmt::Display,
{
    move |value, field| {
        if *value > bound {
            Ok(())
        } else {
            Err(Rejection::new(
                field,
                format!("'{field}' must be greater than {bound} but got {value}"),
            ))
        }
    }
}

/// Rejects unless `value >= bound`.
pub fn at_least<T>(bound: T) -> impl Fn(&T, &str) -> Result<(), Rejection>
where
    T: PartialOrd + fmt::Display,
{
    move |value, field| {
        if *value >= bound {
            Ok(())
        } else {
            Err(Rejection::new(
                field,
                format!("'{field}' must be at least {bound} but got {value}"),
            ))
        }
    }
}

/// Rejects unless `value` is one of `set`.
pub fn member_of<T>(set: &'static [&'static T]) -> impl Fn(&T, &str) -> Result<(), Rejection>
where
    T: PartialEq + fmt::Debug + ?Sized + 'static,
{
    move |value, field| {
        if set.iter().any(|candidate| *candidate == value) {
            Ok(())
        } else {
            Err(Rejection::new(
                field,
                format!("'{field}' with value {value:?} not found in {set:?}"),
            ))
        }
    }
}

/// Rejects unless `lo <= hi` for a `(lo, hi)` pair.
pub fn ordered_pair<T>() -> impl Fn(&(T, T), &str) -> Result<(), Rejection>
where
    T: PartialOrd + fmt::Display,
{
    |(lo, hi), field| {
        if lo <= hi {
            Ok(())
        } else {
            Err(Rejection::new(
                field,
                format!("'{field}' lower value {lo} is greater than upper value {hi}"),
            ))
        }
    }
}

/// Runs every check in order and stops at the first rejection.
pub fn all_of<T: ?Sized + 'static>(checks: Vec<Check<T>>) -> impl Fn(&T, &str) -> Result<(), Rejection> {
    move |value, field| checks.iter().try_for_each(|check| check(value, field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawMap;

    #[test]
    fn test_type_of() {
        let text = type_of(RawKind::Text);
        assert!(text(&RawValue::from("x"), "id").is_ok());
        let err = text(&RawValue::from(RawMap::new()), "id").unwrap_err();
        assert_eq!(err.field, "id");
        assert!(err.reason.contains("must be text"));
    }

    #[test]
    fn test_greater_than_is_strict() {
        let positive = greater_than(0_i64);
        assert!(positive(&1, "width").is_ok());
        assert!(positive(&0, "width").is_err());
        assert!(positive(&-3, "width").is_err());
    }

    #[test]
    fn test_at_least_is_inclusive() {
        let non_negative = at_least(0_i64);
        assert!(non_negative(&0, "sequence").is_ok());
        assert!(non_negative(&-1, "sequence").is_err());
    }

    #[test]
    fn test_member_of() {
        static DELIVERY: [&str; 2] = ["streaming", "progressive"];
        let check = member_of::<str>(&DELIVERY);
        assert!(check("streaming", "delivery").is_ok());
        let err = check("carrier-pigeon", "delivery").unwrap_err();
        assert!(err.reason.contains("carrier-pigeon"));
    }

    #[test]
    fn test_ordered_pair() {
        let check = ordered_pair::<i64>();
        assert!(check(&(51, 900), "bitrate").is_ok());
        assert!(check(&(900, 900), "bitrate").is_ok());
        let err = check(&(900, 51), "bitrate").unwrap_err();
        assert!(err.reason.contains("900"));
    }

    #[test]
    fn test_all_of_short_circuits() {
        let check = all_of::<i64>(vec![
            Box::new(greater_than(0_i64)),
            Box::new(greater_than(10_i64)),
        ]);
        assert!(check(&11, "duration").is_ok());
        let err = check(&-1, "duration").unwrap_err();
        assert!(err.reason.contains("greater than 0"));
        let err = check(&5, "duration").unwrap_err();
        assert!(err.reason.contains("greater than 10"));
    }
}
