//! # Tessera Docs
//!
//! OpenAPI documentation for Tessera routes.
//!
//! This crate provides:
//! - **Document model**: the OpenAPI 3.0 subset needed to describe
//!   operations, parameters, request bodies and responses
//! - **Contributions**: documentation effects attached to middleware units,
//!   combinable in order
//! - **Generation**: folding every route's contribution into one document
//! - **Schema validation**: checking JSON values against schema fragments
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use serde_json::json;
//! use tessera_docs::{
//!     generate_documentation, update_operation, OperationPatch, RouteDescriptor,
//! };
//!
//! let describe = update_operation(OperationPatch {
//!     description: Some("Fetch a user".into()),
//!     ..Default::default()
//! });
//! let routes = [RouteDescriptor {
//!     methods: &[Method::GET],
//!     path: "/users/:userId",
//!     name: Some("getUser"),
//!     metadata: Some(&describe),
//! }];
//!
//! let api = generate_documentation(routes, &json!({"info": {"title": "Users"}})).unwrap();
//! assert!(api.paths.contains_key("/users/{userId}"));
//! ```

#![doc(html_root_url = "https://docs.rs/tessera-docs/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod generator;
mod metadata;
mod openapi;
mod validation;

pub use error::{DocsError, DocsResult};
pub use generator::{
    deep_merge, generate_documentation, normalize_path, path_parameter_names, RouteDescriptor,
};
pub use metadata::{
    add_operation_parameter, add_operation_request_body, add_operation_response,
    add_parameter_component, add_request_body_component, add_response_component,
    add_schema_component, parameter_ref, request_body_ref, response_ref, schema_ref,
    update_operation, update_path_parameter, Contribution, Definitions, OperationPatch,
    ParameterPatch,
};
pub use openapi::{
    Components, Contact, ExternalDocumentation, Info, License, MediaType, OpenApi, Operation,
    Parameter, ParameterIn, PathItem, ReferenceOr, RequestBody, Response, Schema, SchemaType,
    Server, Tag, OPENAPI_VERSION,
};
pub use validation::{SchemaValidation, SchemaValidator};
