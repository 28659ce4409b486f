//! # Tessera Validators
//!
//! Validators turn raw parameter strings into typed values and describe the
//! values they accept as a schema fragment, so a single declaration drives
//! both request checking and documentation.
//!
//! | Validator | Output | Type name |
//! |-----------|--------|-----------|
//! | [`string_enum`] | `String` | `'a' \| 'b'` |
//! | [`integer`] | `i64` | `integer` |
//! | [`uuid`] | `String` | `UUID` |
//! | [`date`] | `DateTime<Utc>` | `Date` |
//! | [`regex`] / [`regex_with`] | `String` / mapped | `/pattern/` |
//! | [`array_of`] | `Vec<T>` | `Array<T>` |
//! | [`one_of`] | `T` | `A \| B` |
//!
//! ## Example
//!
//! ```
//! use tessera_validators::{array_of, integer, ParameterValidator};
//!
//! let ids = array_of(integer().min(1));
//! assert_eq!(ids.type_name(), "Array<integer>");
//! ```

#![doc(html_root_url = "https://docs.rs/tessera-validators/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod combinator;
mod scalar;
mod validator;

pub use combinator::{array_of, one_of, split_list, ArrayOf, OneOf};
pub use scalar::{
    date, integer, regex, regex_with, string_enum, uuid, DateValidator, Integer, RegexValidator,
    StringEnum, UuidValidator,
};
pub use validator::{BoxedValidator, Map, ParameterValidator, ValidationResult, ValidatorExt};
