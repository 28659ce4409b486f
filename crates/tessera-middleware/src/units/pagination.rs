//! `offset` / `limit` pagination parameters.

use tessera_validators::integer;

use crate::unit::{compose, Unit};
use crate::units::query::{query, QueryOptions};

/// Default `limit` when the request does not send one.
pub const DEFAULT_LIMIT: i64 = 10;

/// Options for [`paginated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationOptions {
    /// Value of `limit` when it is not sent.
    pub limit: i64,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Validates the `offset` and `limit` query parameters.
///
/// Both are non-negative integers stored as `i64`; `offset` defaults to 0.
/// Both are documented once as reusable parameter components.
pub fn paginated(options: PaginationOptions) -> Unit {
    compose([
        query(
            "offset",
            integer().min(0),
            QueryOptions {
                default: Some(0),
                store_as_component: true,
                ..QueryOptions::described("How many items to skip.")
            },
        ),
        query(
            "limit",
            integer().min(0),
            QueryOptions {
                default: Some(options.limit),
                store_as_component: true,
                ..QueryOptions::described("How many items to return at most.")
            },
        ),
    ])
}
