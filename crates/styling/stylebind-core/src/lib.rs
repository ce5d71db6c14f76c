//! Stylebind Core (engine-agnostic)
//!
//! Per-element styling contexts that merge class and style bindings coming
//! from a template and any number of directives, resolve conflicts by
//! directive priority, and flush only what changed to a [`Renderer`].
//!
//! Typical flow: build a template context from static attributes, declare each
//! directive's single bindings with
//! [`StylingContext::update_context_with_bindings`], [`StylingContext::alloc`]
//! a copy per element, then per tick write values with
//! [`StylingContext::update_style_prop`] / [`StylingContext::update_class_prop`] /
//! [`StylingContext::update_styling_map`] and flush with
//! [`StylingContext::render_styling`].

pub mod attrs;
pub mod bindings;
pub mod config;
pub mod context;
pub mod error;
pub mod flags;
pub mod ids;
pub mod initial;
pub mod offsets;
pub mod player;
pub mod registry;
pub mod render;
pub mod sanitize;
pub mod summary;
pub mod update;
pub mod value;

// Re-exports for consumers (adapters)
pub use attrs::{AttrMarker, StaticAttr};
pub use config::Config;
pub use context::{is_animation_prop, Entry, StylingContext};
pub use error::{Result, StylingError};
pub use flags::{EntryFlags, MasterFlags};
pub use ids::{DirectiveId, ElementId};
pub use initial::InitialStylingValues;
pub use player::{
    bind_player_factory, BindingType, BoundPlayerFactory, BuildOutcome, ClassAndStylePlayerBuilder,
    CorePlayerHandler, Player, PlayerBuilder, PlayerFactory, PlayerHandler, PlayerRef,
};
pub use registry::{DirectiveRecord, DirectiveRegistry};
pub use render::{BindingStore, Renderer};
pub use sanitize::{DefaultStyleSanitizer, StyleSanitizer};
pub use summary::{compare_summaries, EntrySummary, FlagSummary};
pub use value::{ClassesValue, MapInput, PropInput, StylesValue, Value};
