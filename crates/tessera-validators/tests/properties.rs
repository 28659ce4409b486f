//! Property-based tests for the validators.

use proptest::prelude::*;
use tessera_validators::{array_of, integer, one_of, string_enum, ParameterValidator, ValidatorExt};

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    /// Every integer inside the bounds is returned unchanged.
    #[test]
    fn prop_integer_in_range(min in -1000i64..0, span in 0i64..2000, offset in 0i64..2000) {
        let max = min + span;
        let value = min + offset.min(span);
        let v = integer().min(min).max(max);
        prop_assert_eq!(block_on(v.validate(&value.to_string())).unwrap(), value);
    }

    /// Every integer outside the bounds is rejected.
    #[test]
    fn prop_integer_out_of_range(min in -1000i64..1000, span in 0i64..1000, distance in 1i64..1000) {
        let max = min + span;
        let v = integer().min(min).max(max);
        prop_assert!(block_on(v.validate(&(min - distance).to_string())).is_err());
        prop_assert!(block_on(v.validate(&(max + distance).to_string())).is_err());
    }

    /// Non-numeric input is always rejected.
    #[test]
    fn prop_integer_rejects_letters(raw in "[0-9]*[a-zA-Z. ][0-9a-zA-Z]*") {
        prop_assert!(block_on(integer().validate(&raw)).is_err());
    }

    /// A list validates to its terms in order, duplicates included.
    #[test]
    fn prop_array_preserves_order(values in prop::collection::vec(0i64..100, 1..10)) {
        let raw = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        prop_assert_eq!(block_on(array_of(integer()).validate(&raw)).unwrap(), values);
    }

    /// Escaped commas never split a term.
    #[test]
    fn prop_escaped_comma_is_one_term(left in "[a-z]{1,8}", right in "[a-z]{1,8}") {
        let v = array_of(string_enum([format!("{left},{right}")]));
        let parsed = block_on(v.validate(&format!("{left}\\,{right}"))).unwrap();
        prop_assert_eq!(parsed, vec![format!("{left},{right}")]);
    }

    /// The first validator that accepts the input decides the output.
    #[test]
    fn prop_one_of_first_match(value in 0i64..1000) {
        let v = one_of([
            integer().map(|n| (0, n)).boxed(),
            integer().min(0).map(|n| (1, n)).boxed(),
        ]);
        prop_assert_eq!(block_on(v.validate(&value.to_string())).unwrap(), (0, value));
    }
}
