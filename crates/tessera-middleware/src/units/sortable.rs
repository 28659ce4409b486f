//! The `sort` query parameter.
//!
//! The parameter is a comma-separated list of sort terms:
//!
//! ```text
//! <Sorting>[,<Sorting>]*
//! where
//! <Sorting> = [+|-]?<field>
//! ```
//!
//! `+` or no prefix sorts ascending, `-` descending. Only the fields declared
//! on the unit are accepted.

use std::fmt;
use std::future::ready;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use tessera_core::{BoxFuture, DefinitionError, ValidationError};
use tessera_docs::Schema;
use tessera_validators::{array_of, split_list, ParameterValidator, ValidationResult};

use crate::unit::Unit;
use crate::units::query::{query, QueryOptions};

fn field_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\w+(\.\w+)*$").expect("field pattern is valid"))
}

fn term_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([+-])?([\w.]+)$").expect("term pattern is valid"))
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// `+`, or no prefix.
    Asc,
    /// `-`.
    Desc,
}

impl SortDirection {
    /// The prefix character for this direction.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Asc => '+',
            Self::Desc => '-',
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One sort term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sorting {
    /// One of the declared fields.
    pub field: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl Sorting {
    /// Ascending order on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending order on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

impl fmt::Display for Sorting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.direction, self.field)
    }
}

/// Options for [`sortable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortableOptions {
    /// Fields the client may sort by.
    pub fields: Vec<String>,
    /// Sorting used when `sort` is not sent, in the same syntax.
    pub default: String,
}

impl SortableOptions {
    /// Options over `fields` with a default sorting.
    pub fn new<I, S>(fields: I, default: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            default: default.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct SortingValidator {
    fields: Arc<[String]>,
}

impl SortingValidator {
    fn parse(&self, term: &str) -> Option<Sorting> {
        let captures = term_pattern().captures(term)?;
        let field = captures.get(2)?.as_str();
        if !self.fields.iter().any(|f| f == field) {
            return None;
        }
        let direction = match captures.get(1).map(|m| m.as_str()) {
            Some("-") => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        Some(Sorting {
            field: field.to_string(),
            direction,
        })
    }

    fn quoted(&self, separator: &str) -> String {
        self.fields
            .iter()
            .map(|field| format!("'{field}'"))
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn rejection(&self, term: &str) -> ValidationError {
        ValidationError::new(format!(
            "'{term}' is not a valid field. Options are: {}.",
            self.quoted(", ")
        ))
    }
}

impl ParameterValidator for SortingValidator {
    type Output = Sorting;

    fn type_name(&self) -> String {
        format!("Sorting<{}>", self.quoted("|"))
    }

    fn schema(&self) -> Schema {
        Schema::string()
    }

    fn validate<'a>(&'a self, raw: &'a str) -> BoxFuture<'a, ValidationResult<Sorting>> {
        Box::pin(ready(self.parse(raw).ok_or_else(|| self.rejection(raw))))
    }
}

fn describe(fields: &[String]) -> String {
    let listed = fields
        .iter()
        .map(|field| format!("`{field}`"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Comma-separated list of fields to sort the results by.\n\
         Format:\n\
         ```\n\
         <Sorting>[,<Sorting>]*\n\
         where\n\
         <Sorting> = [+|-]?<field>\n\
         ```\n\
         Fields: {listed}"
    )
}

/// Validates the `sort` query parameter and stores a `Vec<Sorting>` under `sort`.
///
/// # Errors
///
/// Returns a [`DefinitionError`] when no field is declared, when a field
/// name is not a dotted sequence of word segments, or when the default does
/// not parse against the declared fields.
///
/// ```
/// use tessera_middleware::{sortable, SortableOptions};
///
/// assert!(sortable(SortableOptions::new(["id", "profile.name"], "+id")).is_ok());
/// assert!(sortable(SortableOptions::new(["id"], "-name")).is_err());
/// ```
pub fn sortable(options: SortableOptions) -> Result<Unit, DefinitionError> {
    let SortableOptions { fields, default } = options;
    if fields.is_empty() {
        return Err(DefinitionError::NoSortFields);
    }
    if let Some(field) = fields.iter().find(|f| !field_pattern().is_match(f)) {
        return Err(DefinitionError::InvalidSortField {
            field: field.clone(),
        });
    }

    let validator = SortingValidator {
        fields: fields.iter().cloned().collect(),
    };
    let default_sorting = split_list(&default)
        .iter()
        .map(|term| {
            validator
                .parse(term)
                .ok_or_else(|| DefinitionError::InvalidSortDefault {
                    value: default.clone(),
                    reason: validator.rejection(term).to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(query(
        "sort",
        array_of(validator),
        QueryOptions {
            default: Some(default_sorting),
            ..QueryOptions::described(describe(&fields))
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use tessera_core::ErrorKind;

    use crate::context::RequestContext;
    use crate::middleware::Next;
    use crate::params::QueryParams;

    fn unit() -> Unit {
        sortable(SortableOptions::new(["id", "name"], "+id")).unwrap()
    }

    async fn sort_of(query: &str) -> Result<Vec<Sorting>, tessera_core::TesseraError> {
        let mut ctx = RequestContext::new(Method::GET, "/users")
            .with_query(QueryParams::parse(query).unwrap());
        unit().process(&mut ctx, Next::end()).await?;
        Ok(ctx.params_mut().take::<Vec<Sorting>>("sort").unwrap_or_default())
    }

    #[tokio::test]
    async fn test_default_when_absent() {
        assert_eq!(sort_of("").await.unwrap(), vec![Sorting::asc("id")]);
    }

    #[tokio::test]
    async fn test_parses_terms_in_order() {
        assert_eq!(
            sort_of("sort=-name,id").await.unwrap(),
            vec![Sorting::desc("name"), Sorting::asc("id")]
        );
        assert_eq!(
            sort_of("sort=%2Bname").await.unwrap(),
            vec![Sorting::asc("name")]
        );
    }

    #[tokio::test]
    async fn test_unknown_field_lists_options() {
        let err = sort_of("sort=unknown").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        let message = err.to_string();
        assert!(message.starts_with("Invalid query parameter 'sort'. Expected array of Sorting<'id'|'name'>"));
        assert!(message.ends_with("'unknown' is not a valid field. Options are: 'id', 'name'."));
    }

    #[tokio::test]
    async fn test_malformed_term_rejected() {
        assert!(sort_of("sort=%2B%2Bid").await.is_err());
        assert!(sort_of("sort=id%20desc").await.is_err());
    }

    #[test]
    fn test_definition_errors() {
        assert_eq!(
            sortable(SortableOptions::new(Vec::<String>::new(), "")).unwrap_err(),
            DefinitionError::NoSortFields
        );
        assert_eq!(
            sortable(SortableOptions::new(["id", "bad field"], "+id")).unwrap_err(),
            DefinitionError::InvalidSortField {
                field: "bad field".to_string()
            }
        );
        assert!(matches!(
            sortable(SortableOptions::new(["id"], "-name")).unwrap_err(),
            DefinitionError::InvalidSortDefault { value, .. } if value == "-name"
        ));
    }

    #[test]
    fn test_dotted_fields_and_multi_term_default() {
        let unit = sortable(SortableOptions::new(["profile.name", "id"], "-profile.name,id"));
        assert!(unit.is_ok());
    }

    #[test]
    fn test_description_lists_fields() {
        let text = describe(&["id".to_string(), "name".to_string()]);
        assert!(text.starts_with("Comma-separated list of fields to sort the results by."));
        assert!(text.ends_with("Fields: `id`, `name`"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Sorting::desc("name").to_string(), "-name");
        assert_eq!(Sorting::asc("id").to_string(), "+id");
    }
}
