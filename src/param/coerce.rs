use num_traits::NumCast;

use super::{ParamError, ParamKind, ParamValue, value::exact_real};

/// Converts `value` to the declared `kind`, following the module's coercion table.
pub(super) fn to_kind(
    name: &str,
    value: ParamValue,
    kind: ParamKind,
) -> Result<ParamValue, ParamError> {
    let found = value.kind();
    let mismatch = || ParamError::TypeMismatch {
        name: name.to_string(),
        expected: kind,
        found,
    };

    match (kind, value) {
        (ParamKind::Int, ParamValue::LongInt(v)) => {
            <i32 as NumCast>::from(v).map(ParamValue::Int).ok_or_else(mismatch)
        }
        (ParamKind::LongInt, ParamValue::Int(v)) => {
            Ok(ParamValue::LongInt(<i64 as From<i32>>::from(v)))
        }
        (ParamKind::Real, ParamValue::Int(v)) => Ok(ParamValue::Real(<f64 as From<i32>>::from(v))),
        (ParamKind::Real, ParamValue::LongInt(v)) => {
            exact_real(v).map(ParamValue::Real).ok_or_else(mismatch)
        }
        (ParamKind::Char, ParamValue::String(s)) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(ParamValue::Char(c)),
                _ => Err(mismatch()),
            }
        }
        (ParamKind::String, ParamValue::Char(c)) => Ok(ParamValue::String(c.to_string())),
        (kind, value) if value.kind() == kind => Ok(value),
        _ => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coerce(value: impl Into<ParamValue>, kind: ParamKind) -> Result<ParamValue, ParamError> {
        to_kind("p", value.into(), kind)
    }

    #[test]
    fn same_kind_passes_through() {
        assert_eq!(coerce(true, ParamKind::Bool), Ok(ParamValue::Bool(true)));
        assert_eq!(coerce(2.5, ParamKind::Real), Ok(ParamValue::Real(2.5)));
        assert_eq!(coerce("abc", ParamKind::String), Ok(ParamValue::from("abc")));
    }

    #[test]
    fn integers_widen() {
        let widened = coerce(5, ParamKind::LongInt).unwrap();
        assert_eq!(widened.as_long_int(), Some(5));

        let widened = coerce(5, ParamKind::Real).unwrap();
        assert_eq!(widened.as_real(), Some(5.0));

        let widened = coerce(5_i64, ParamKind::Real).unwrap();
        assert_eq!(widened.as_real(), Some(5.0));
    }

    #[test]
    fn long_int_becomes_real_only_when_exact() {
        let limit = 1_i64 << 53;
        let exact = coerce(-limit, ParamKind::Real).unwrap();
        assert_eq!(exact.as_real(), Some(-9_007_199_254_740_992.0));

        let error = coerce(limit + 1, ParamKind::Real).unwrap_err();
        assert!(matches!(
            error,
            ParamError::TypeMismatch {
                expected: ParamKind::Real,
                found: ParamKind::LongInt,
                ..
            }
        ));
        assert!(coerce(i64::MAX, ParamKind::Real).is_err());
    }

    #[test]
    fn long_int_narrows_only_when_it_fits() {
        assert_eq!(coerce(7_i64, ParamKind::Int).unwrap().as_int(), Some(7));

        let error = coerce(i64::MAX, ParamKind::Int).unwrap_err();
        assert!(matches!(
            error,
            ParamError::TypeMismatch {
                expected: ParamKind::Int,
                found: ParamKind::LongInt,
                ..
            }
        ));
    }

    #[test]
    fn characters_and_strings() {
        assert_eq!(coerce("v", ParamKind::Char).unwrap().as_char(), Some('v'));
        assert_eq!(coerce('v', ParamKind::String).unwrap().as_str(), Some("v"));
        assert!(coerce("", ParamKind::Char).is_err());
        assert!(coerce("vv", ParamKind::Char).is_err());
    }

    #[test]
    fn incompatible_kinds_are_rejected() {
        assert!(coerce("1", ParamKind::Int).is_err());
        assert!(coerce(1, ParamKind::String).is_err());
        assert!(coerce(1, ParamKind::Bool).is_err());
        assert!(coerce(true, ParamKind::Int).is_err());
        assert!(coerce(1.0, ParamKind::Int).is_err());
        assert!(coerce(1.0, ParamKind::LongInt).is_err());
        assert!(coerce('a', ParamKind::Real).is_err());
    }
}
