#![forbid(unsafe_code)]

//! Property-based checks for the sample data types.

use formwalk_core::{DataType, Value};
use formwalk_harness::{DateType, IntegerType, StringType};
use proptest::prelude::*;

proptest! {
    #[test]
    fn dates_in_first_28_days_always_parse(y in 1000u32..=9999, m in 1u32..=12, d in 1u32..=28) {
        let text = format!("{y:04}-{m:02}-{d:02}");
        prop_assert_eq!(DateType::new().check(&Value::from(text.as_str())), Ok(Value::Text(text)));
    }

    #[test]
    fn day_32_never_parses(y in 1000u32..=9999, m in 1u32..=12) {
        let text = format!("{y:04}-{m:02}-32");
        prop_assert!(DateType::new().check(&Value::from(text.as_str())).is_err());
    }

    #[test]
    fn integer_bounds_are_inclusive(min in -1000i64..1000, span in 0i64..1000, n in -3000i64..3000) {
        let max = min + span;
        let result = IntegerType::between(min, max).check(&Value::from(n.to_string()));
        prop_assert_eq!(result.is_ok(), (min..=max).contains(&n));
    }

    #[test]
    fn string_max_length_counts_chars(s in "\\PC{0,12}", max in 0usize..12) {
        let result = StringType::max_length(max).check(&Value::from(s.as_str()));
        prop_assert_eq!(result.is_ok(), s.chars().count() <= max);
    }
}
