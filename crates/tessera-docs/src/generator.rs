//! Aggregate document generation.
//!
//! The generator folds every route's contribution over a single draft. Path
//! items are collected in declaration order, so the same route list always
//! serializes to the same bytes.

use std::sync::OnceLock;

use http::Method;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::error::{DocsError, DocsResult};
use crate::metadata::{Contribution, Definitions};
use crate::openapi::{OpenApi, Operation, PathItem};

/// What the generator needs to know about one declared route.
#[derive(Debug, Clone, Copy)]
pub struct RouteDescriptor<'a> {
    /// Methods the route answers to.
    pub methods: &'a [Method],
    /// Colon-style path template, e.g. `/users/:userId`.
    pub path: &'a str,
    /// Operation identifier.
    pub name: Option<&'a str>,
    /// Combined contribution of the route's units.
    pub metadata: Option<&'a Contribution>,
}

fn path_parameter_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r":(\w+)").expect("path parameter pattern is valid"))
}

/// Rewrites `:name` segments to `{name}`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    path_parameter_pattern()
        .replace_all(path, "{$1}")
        .into_owned()
}

/// Names of the `:name` segments of a template, in order.
#[must_use]
pub fn path_parameter_names(path: &str) -> Vec<String> {
    path_parameter_pattern()
        .captures_iter(path)
        .map(|captures| captures[1].to_string())
        .collect()
}

/// Merges `overlay` into `base`.
///
/// Objects merge key by key, arrays are concatenated, anything else is
/// replaced by the overlay.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(base), Value::Array(overlay)) => base.extend(overlay),
        (base, overlay) => *base = overlay,
    }
}

/// Produces the aggregate document for a list of routes.
///
/// `partial` is deep-merged into the skeleton first; `null` means no partial.
///
/// # Errors
///
/// Fails when the partial is not an object, when the merged document does not
/// fit the document model, or when a route uses a method without an operation
/// slot.
pub fn generate_documentation<'a, I>(routes: I, partial: &Value) -> DocsResult<OpenApi>
where
    I: IntoIterator<Item = RouteDescriptor<'a>>,
{
    let mut api = merged_skeleton(partial)?;
    let mut items: IndexMap<String, PathItem> = IndexMap::new();

    for route in routes {
        let path = normalize_path(route.path);
        let item = items
            .entry(path.clone())
            .or_insert_with(|| PathItem::with_path_parameters(path_parameter_names(route.path)));

        for method in route.methods.iter().filter(|m| **m != Method::HEAD) {
            let mut operation = Operation {
                operation_id: route.name.map(str::to_string),
                ..Operation::default()
            };
            if let Some(metadata) = route.metadata {
                let mut definitions = Definitions {
                    api: &mut api,
                    path: &path,
                    item: &mut *item,
                    operation: &mut operation,
                };
                metadata.apply(&mut definitions);
            }
            item.set_operation(method, operation)?;
        }
    }

    tracing::debug!(paths = items.len(), "Generated documentation paths");
    api.paths.extend(items);
    Ok(api)
}

fn merged_skeleton(partial: &Value) -> DocsResult<OpenApi> {
    let mut document = serde_json::to_value(OpenApi::skeleton())?;
    match partial {
        Value::Null => {}
        Value::Object(_) => deep_merge(&mut document, partial.clone()),
        other => {
            return Err(DocsError::InvalidPartial {
                reason: format!("expected an object, found {other}"),
            });
        }
    }
    Ok(serde_json::from_value(document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{update_operation, OperationPatch};
    use serde_json::json;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/users/:userId"), "/users/{userId}");
        assert_eq!(
            normalize_path("/users/:userId/posts/:postId"),
            "/users/{userId}/posts/{postId}"
        );
        assert_eq!(normalize_path("/health"), "/health");
    }

    #[test]
    fn test_path_parameter_names() {
        assert_eq!(
            path_parameter_names("/a/:first/b/:second"),
            vec!["first".to_string(), "second".to_string()]
        );
        assert!(path_parameter_names("/plain").is_empty());
    }

    #[test]
    fn test_deep_merge() {
        let mut base = json!({"info": {"title": "API", "version": "1.0.0"}, "tags": [{"name": "a"}]});
        deep_merge(
            &mut base,
            json!({"info": {"title": "Users"}, "tags": [{"name": "b"}], "x-extra": true}),
        );
        assert_eq!(
            base,
            json!({
                "info": {"title": "Users", "version": "1.0.0"},
                "tags": [{"name": "a"}, {"name": "b"}],
                "x-extra": true
            })
        );
    }

    #[test]
    fn test_skeleton_without_routes() {
        let api = generate_documentation(Vec::new(), &Value::Null).unwrap();
        assert_eq!(api.openapi, "3.0.0");
        assert_eq!(api.info.title, "API");
        assert!(api.paths.is_empty());
    }

    #[test]
    fn test_rejects_non_object_partial() {
        let err = generate_documentation(Vec::new(), &json!([1, 2])).unwrap_err();
        assert!(matches!(err, DocsError::InvalidPartial { .. }));
    }

    #[test]
    fn test_methods_share_path_item_and_head_is_skipped() {
        let describe = update_operation(OperationPatch {
            description: Some("Users".into()),
            ..Default::default()
        });
        let routes = [
            RouteDescriptor {
                methods: &[Method::HEAD, Method::GET],
                path: "/users/:userId",
                name: Some("getUser"),
                metadata: Some(&describe),
            },
            RouteDescriptor {
                methods: &[Method::DELETE],
                path: "/users/:userId",
                name: None,
                metadata: None,
            },
        ];
        let api = generate_documentation(routes, &Value::Null).unwrap();

        assert_eq!(api.paths.len(), 1);
        let item = &api.paths["/users/{userId}"];
        assert!(item.head.is_none());
        let get = item.get.as_ref().unwrap();
        assert_eq!(get.operation_id.as_deref(), Some("getUser"));
        assert_eq!(get.description.as_deref(), Some("Users"));
        assert!(item.delete.as_ref().unwrap().operation_id.is_none());
        assert!(item.parameter("userId").unwrap().required);
    }
}
