//! Validators built from other validators.

use tessera_core::{BoxFuture, ValidationError};
use tessera_docs::Schema;

use crate::validator::{BoxedValidator, ParameterValidator, ValidationResult};

/// Splits a comma-separated list.
///
/// A comma preceded by a backslash does not split and is unescaped; every
/// term is trimmed. The empty string is the empty list.
pub fn split_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    let mut terms = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    for c in raw.chars() {
        match c {
            ',' if escaped => {
                current.pop();
                current.push(',');
            }
            ',' => terms.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
        escaped = c == '\\';
    }
    terms.push(current);
    terms.iter().map(|term| term.trim().to_string()).collect()
}

/// Validates every term of a comma-separated list with one validator.
///
/// Order is preserved and duplicates are kept.
#[derive(Debug, Clone)]
pub struct ArrayOf<V> {
    inner: V,
}

/// Creates a list validator over `inner`.
pub fn array_of<V: ParameterValidator>(inner: V) -> ArrayOf<V> {
    ArrayOf { inner }
}

impl<V: ParameterValidator> ParameterValidator for ArrayOf<V> {
    type Output = Vec<V::Output>;

    fn type_name(&self) -> String {
        format!("Array<{}>", self.inner.type_name())
    }

    fn schema(&self) -> Schema {
        Schema::string().with_description("Comma-separated list.")
    }

    fn validate<'a>(&'a self, raw: &'a str) -> BoxFuture<'a, ValidationResult<Self::Output>> {
        Box::pin(async move {
            let terms = split_list(raw);
            let mut values = Vec::with_capacity(terms.len());
            for term in &terms {
                let value = self.inner.validate(term).await.map_err(|inner| {
                    ValidationError::new(format!(
                        "Expected array of {} but received: {raw}. {inner}",
                        self.inner.type_name()
                    ))
                })?;
                values.push(value);
            }
            Ok(values)
        })
    }
}

/// Tries several validators in order; the first success wins.
pub struct OneOf<T> {
    validators: Vec<BoxedValidator<T>>,
}

/// Creates a union of validators sharing one output type.
///
/// Validators with different outputs can be aligned first with
/// [`ValidatorExt::map`](crate::ValidatorExt::map).
pub fn one_of<T, I>(validators: I) -> OneOf<T>
where
    I: IntoIterator<Item = BoxedValidator<T>>,
{
    OneOf {
        validators: validators.into_iter().collect(),
    }
}

impl<T: Send + 'static> std::fmt::Debug for OneOf<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneOf")
            .field("type", &self.type_name_inner())
            .finish()
    }
}

impl<T: Send + 'static> OneOf<T> {
    fn type_name_inner(&self) -> String {
        self.validators
            .iter()
            .map(|validator| validator.type_name())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl<T: Send + 'static> ParameterValidator for OneOf<T> {
    type Output = T;

    fn type_name(&self) -> String {
        self.type_name_inner()
    }

    fn schema(&self) -> Schema {
        Schema::any_of(self.validators.iter().map(|v| v.schema()).collect())
    }

    fn validate<'a>(&'a self, raw: &'a str) -> BoxFuture<'a, ValidationResult<T>> {
        Box::pin(async move {
            for validator in &self.validators {
                if let Ok(value) = validator.validate(raw).await {
                    return Ok(value);
                }
            }
            Err(ValidationError::new(format!(
                "Expected {} but received: '{raw}'",
                self.type_name()
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::{integer, string_enum, uuid};
    use crate::validator::ValidatorExt;
    use serde_json::json;

    #[test]
    fn test_split_list() {
        assert!(split_list("").is_empty());
        assert_eq!(split_list("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(split_list(r"a\,b"), vec!["a,b"]);
        assert_eq!(split_list(r"x\,y, z"), vec!["x,y", "z"]);
        assert_eq!(split_list("a,,a"), vec!["a", "", "a"]);
        assert_eq!(split_list(r"a\b"), vec![r"a\b"]);
    }

    #[tokio::test]
    async fn test_array_of_integers() {
        let v = array_of(integer());
        assert_eq!(v.type_name(), "Array<integer>");
        assert_eq!(v.validate("").await.unwrap(), Vec::<i64>::new());
        assert_eq!(v.validate("3, 1,3").await.unwrap(), vec![3, 1, 3]);

        let err = v.validate("1,x").await.unwrap_err();
        assert_eq!(
            err.message(),
            "Expected array of integer but received: 1,x. Expected an integer but received: 'x'"
        );
    }

    #[test]
    fn test_array_schema() {
        let schema = serde_json::to_value(array_of(uuid()).schema()).unwrap();
        assert_eq!(
            schema,
            json!({"type": "string", "description": "Comma-separated list."})
        );
    }

    #[tokio::test]
    async fn test_one_of_first_match_wins() {
        let v = one_of([
            string_enum(["all"]).map(|_| -1_i64).boxed(),
            integer().min(0).boxed(),
        ]);
        assert_eq!(v.type_name(), "'all' | integer");
        assert_eq!(v.validate("ALL").await.unwrap(), -1);
        assert_eq!(v.validate("12").await.unwrap(), 12);

        let err = v.validate("-3").await.unwrap_err();
        assert_eq!(
            err.message(),
            "Expected 'all' | integer but received: '-3'"
        );
    }

    #[tokio::test]
    async fn test_one_of_prefers_declaration_order() {
        let v = one_of([
            integer().map(|n| format!("int:{n}")).boxed(),
            string_enum(["1", "2"]).map(|s| format!("enum:{s}")).boxed(),
        ]);
        assert_eq!(v.validate("1").await.unwrap(), "int:1");
    }

    #[test]
    fn test_one_of_schema() {
        let v = one_of([integer().boxed(), integer().min(5).boxed()]);
        let schema = serde_json::to_value(v.schema()).unwrap();
        assert_eq!(
            schema,
            json!({"anyOf": [{"type": "integer"}, {"type": "integer", "minimum": 5}]})
        );
    }

    #[test]
    fn test_one_of_debug_lists_members() {
        let v = one_of([string_enum(["all"]).map(|_| 0_i64).boxed(), integer().boxed()]);
        assert_eq!(format!("{v:?}"), r#"OneOf { type: "'all' | integer" }"#);
    }
}
