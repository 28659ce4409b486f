//! Operation description units.

use tessera_docs::{update_operation, OperationPatch};

use crate::unit::Unit;

/// Sets the operation description.
pub fn description(text: impl Into<String>) -> Unit {
    Unit::metadata_only(update_operation(OperationPatch {
        description: Some(text.into()),
        ..Default::default()
    }))
}

/// Sets the operation summary.
pub fn summary(text: impl Into<String>) -> Unit {
    Unit::metadata_only(update_operation(OperationPatch {
        summary: Some(text.into()),
        ..Default::default()
    }))
}

/// Appends tags to the operation.
pub fn tags<I, S>(tags: I) -> Unit
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Unit::metadata_only(update_operation(OperationPatch {
        tags: tags.into_iter().map(Into::into).collect(),
        ..Default::default()
    }))
}
