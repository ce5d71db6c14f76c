//! Error types for the styling context

use crate::ids::DirectiveId;

/// Errors surfaced at the public boundary of a styling context.
///
/// Structural misuse that the trusted update path tolerates (declaring bindings
/// after the context is locked, re-declaring a directive) stays a silent no-op
/// and never produces one of these.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StylingError {
    /// The directive was never registered on this element
    #[error("directive {directive:?} has not been allocated to the element's style/class bindings")]
    UnregisteredDirective { directive: Option<DirectiveId> },

    /// The directive is registered but never declared any single bindings
    #[error("directive at registry index {directive_index} has not declared any style/class bindings")]
    BindingsNotDeclared { directive_index: usize },

    /// Index or binding offset beyond what the context holds
    #[error("index {index} is out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The context has no element to render onto
    #[error("styling context has no element allocated")]
    ElementNotAllocated,

    /// A single/multi pair no longer points back at itself
    #[error("entry {index} is not linked back from its counterpart")]
    BrokenLink { index: usize },
}

pub type Result<T> = core::result::Result<T, StylingError>;
