//! Documentation contributions.
//!
//! A [`Contribution`] is a function that records part of an operation's
//! description into a draft document. Units carry at most one contribution;
//! the generator applies it once per (path template, method) pair.
//!
//! The free functions in this module build the primitive contributions that
//! higher level units are made of. Combining them with
//! [`Contribution::combine`] yields a single contribution that applies every
//! input in order.

use std::fmt;
use std::sync::Arc;

use crate::openapi::{
    OpenApi, Operation, Parameter, PathItem, ReferenceOr, RequestBody, Response, Schema,
};

/// The drafts a contribution may mutate.
pub struct Definitions<'a> {
    /// The aggregate document, for reusable components.
    pub api: &'a mut OpenApi,
    /// The brace-style path template being described.
    pub path: &'a str,
    /// The path item shared by every method of this template.
    pub item: &'a mut PathItem,
    /// The operation being described.
    pub operation: &'a mut Operation,
}

type ContributionFn = dyn Fn(&mut Definitions<'_>) + Send + Sync;

/// A reusable documentation effect.
#[derive(Clone)]
pub struct Contribution(Arc<ContributionFn>);

impl Contribution {
    /// Wraps a function as a contribution.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Definitions<'_>) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Applies the contribution to the drafts.
    pub fn apply(&self, definitions: &mut Definitions<'_>) {
        (self.0)(definitions);
    }

    /// Combines contributions into one that applies each in iteration order.
    ///
    /// Returns `None` when there is nothing to combine.
    pub fn combine<I>(contributions: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        let mut parts: Vec<Self> = contributions.into_iter().collect();
        match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(Self::new(move |definitions| {
                for part in &parts {
                    part.apply(definitions);
                }
            })),
        }
    }

    /// Chains `next` after `self`.
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        Self::new(move |definitions| {
            self.apply(definitions);
            next.apply(definitions);
        })
    }
}

impl fmt::Debug for Contribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Contribution").finish_non_exhaustive()
    }
}

/// Fields merged into the current operation. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct OperationPatch {
    /// Short summary.
    pub summary: Option<String>,
    /// Full description.
    pub description: Option<String>,
    /// Tags appended to the existing ones.
    pub tags: Vec<String>,
    /// Deprecation flag.
    pub deprecated: Option<bool>,
}

/// Fields merged into an existing path-level parameter.
#[derive(Debug, Clone, Default)]
pub struct ParameterPatch {
    /// Parameter description.
    pub description: Option<String>,
    /// Parameter schema.
    pub schema: Option<Schema>,
}

/// `#/components/parameters/{name}`
#[must_use]
pub fn parameter_ref(name: &str) -> String {
    format!("#/components/parameters/{name}")
}

/// `#/components/responses/{name}`
#[must_use]
pub fn response_ref(name: &str) -> String {
    format!("#/components/responses/{name}")
}

/// `#/components/schemas/{name}`
#[must_use]
pub fn schema_ref(name: &str) -> String {
    format!("#/components/schemas/{name}")
}

/// `#/components/requestBodies/{name}`
#[must_use]
pub fn request_body_ref(name: &str) -> String {
    format!("#/components/requestBodies/{name}")
}

/// Registers a reusable parameter. A later registration of the same name wins.
pub fn add_parameter_component(name: impl Into<String>, parameter: Parameter) -> Contribution {
    let name = name.into();
    Contribution::new(move |defs| {
        defs.api
            .components
            .parameters
            .insert(name.clone(), parameter.clone());
    })
}

/// Registers a reusable response. A later registration of the same name wins.
pub fn add_response_component(name: impl Into<String>, response: Response) -> Contribution {
    let name = name.into();
    Contribution::new(move |defs| {
        defs.api
            .components
            .responses
            .insert(name.clone(), response.clone());
    })
}

/// Registers a reusable schema. A later registration of the same name wins.
pub fn add_schema_component(name: impl Into<String>, schema: Schema) -> Contribution {
    let name = name.into();
    Contribution::new(move |defs| {
        defs.api
            .components
            .schemas
            .insert(name.clone(), schema.clone());
    })
}

/// Registers a reusable request body. A later registration of the same name wins.
pub fn add_request_body_component(name: impl Into<String>, body: RequestBody) -> Contribution {
    let name = name.into();
    Contribution::new(move |defs| {
        defs.api
            .components
            .request_bodies
            .insert(name.clone(), body.clone());
    })
}

/// Appends a parameter to the current operation.
pub fn add_operation_parameter(parameter: ReferenceOr<Parameter>) -> Contribution {
    Contribution::new(move |defs| defs.operation.parameters.push(parameter.clone()))
}

/// Sets the current operation's request body.
pub fn add_operation_request_body(body: ReferenceOr<RequestBody>) -> Contribution {
    Contribution::new(move |defs| defs.operation.request_body = Some(body.clone()))
}

/// Declares a response of the current operation under a status code.
pub fn add_operation_response(
    status: impl Into<String>,
    response: ReferenceOr<Response>,
) -> Contribution {
    let status = status.into();
    Contribution::new(move |defs| {
        defs.operation
            .responses
            .insert(status.clone(), response.clone());
    })
}

/// Merges fields into the current operation.
pub fn update_operation(patch: OperationPatch) -> Contribution {
    Contribution::new(move |defs| {
        let operation = &mut *defs.operation;
        if let Some(summary) = &patch.summary {
            operation.summary = Some(summary.clone());
        }
        if let Some(description) = &patch.description {
            operation.description = Some(description.clone());
        }
        operation.tags.extend(patch.tags.iter().cloned());
        if let Some(deprecated) = patch.deprecated {
            operation.deprecated = deprecated;
        }
    })
}

/// Patches a path-level parameter declared by the route template.
///
/// Templates without a parameter of that name are left untouched.
pub fn update_path_parameter(name: impl Into<String>, patch: ParameterPatch) -> Contribution {
    let name = name.into();
    Contribution::new(move |defs| {
        let Some(parameter) = defs
            .item
            .parameters
            .iter_mut()
            .find(|parameter| parameter.name == name)
        else {
            return;
        };
        if let Some(description) = &patch.description {
            parameter.description = Some(description.clone());
        }
        if let Some(schema) = &patch.schema {
            parameter.schema = Some(schema.clone());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::ParameterIn;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Drafts {
        api: OpenApi,
        item: PathItem,
        operation: Operation,
    }

    impl Drafts {
        fn new() -> Self {
            Self {
                api: OpenApi::skeleton(),
                item: PathItem::with_path_parameters(["userId"]),
                operation: Operation::default(),
            }
        }

        fn apply(&mut self, contribution: &Contribution) {
            let mut defs = Definitions {
                api: &mut self.api,
                path: "/users/{userId}",
                item: &mut self.item,
                operation: &mut self.operation,
            };
            contribution.apply(&mut defs);
        }
    }

    fn query_param(name: &str) -> Parameter {
        Parameter {
            name: name.to_string(),
            location: ParameterIn::Query,
            description: None,
            required: false,
            deprecated: false,
            schema: Some(Schema::integer()),
        }
    }

    #[test]
    fn test_combine_applies_in_order() {
        let combined = Contribution::combine([
            update_operation(OperationPatch {
                description: Some("first".into()),
                ..Default::default()
            }),
            update_operation(OperationPatch {
                description: Some("second".into()),
                ..Default::default()
            }),
        ])
        .unwrap();

        let mut drafts = Drafts::new();
        drafts.apply(&combined);
        assert_eq!(drafts.operation.description.as_deref(), Some("second"));
    }

    #[test]
    fn test_combine_invokes_each_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counting = |calls: &Arc<AtomicUsize>| {
            let calls = Arc::clone(calls);
            Contribution::new(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };
        let combined =
            Contribution::combine([counting(&calls), counting(&calls), counting(&calls)]).unwrap();

        Drafts::new().apply(&combined);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_combine_empty() {
        assert!(Contribution::combine(Vec::new()).is_none());
    }

    #[test]
    fn test_then_is_associative() {
        let tag = |name: &str| {
            update_operation(OperationPatch {
                tags: vec![name.to_string()],
                ..Default::default()
            })
        };
        let left = tag("a").then(tag("b")).then(tag("c"));
        let right = tag("a").then(tag("b").then(tag("c")));

        let mut l = Drafts::new();
        l.apply(&left);
        let mut r = Drafts::new();
        r.apply(&right);
        assert_eq!(l.operation.tags, r.operation.tags);
        assert_eq!(l.operation.tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_components_last_write_wins() {
        let mut drafts = Drafts::new();
        drafts.apply(&add_parameter_component("limit", query_param("limit")));
        let mut replacement = query_param("limit");
        replacement.schema = Some(Schema::string());
        drafts.apply(&add_parameter_component("limit", replacement));

        let stored = &drafts.api.components.parameters["limit"];
        assert_eq!(stored.schema, Some(Schema::string()));
        assert_eq!(drafts.api.components.parameters.len(), 1);
    }

    #[test]
    fn test_operation_parameters_and_responses() {
        let mut drafts = Drafts::new();
        drafts.apply(&add_operation_parameter(ReferenceOr::reference(
            parameter_ref("offset"),
        )));
        drafts.apply(&add_operation_response(
            "200",
            ReferenceOr::Item(Response::new("Successful operation")),
        ));

        assert_eq!(
            drafts.operation.parameters[0].as_reference(),
            Some("#/components/parameters/offset")
        );
        assert!(drafts.operation.responses.contains_key("200"));
    }

    #[test]
    fn test_update_path_parameter() {
        let mut drafts = Drafts::new();
        drafts.apply(&update_path_parameter(
            "userId",
            ParameterPatch {
                description: Some("The user".into()),
                schema: Some(Schema::string().with_format("uuid")),
            },
        ));
        let param = drafts.item.parameter("userId").unwrap();
        assert_eq!(param.description.as_deref(), Some("The user"));
        assert_eq!(
            param.schema.as_ref().and_then(|s| s.format.as_deref()),
            Some("uuid")
        );
    }

    #[test]
    fn test_update_unknown_path_parameter_is_ignored() {
        let mut drafts = Drafts::new();
        let before = drafts.item.clone();
        drafts.apply(&update_path_parameter("postId", ParameterPatch::default()));
        assert_eq!(drafts.item, before);
    }
}
