//! The styling context: one per element, holding every style/class binding
//! contributed by the template and its directives.
//!
//! Entries are kept in a single vector split into four zones:
//!
//! ```text
//! [ single styles | single classes | multi styles | multi classes ]
//!                                   ^ multi_start
//! ```
//!
//! Single entries are created once when bindings are declared and never move
//! afterwards except to make room for later declarations. Every single entry is
//! linked to a multi entry of the same name and vice versa; map bindings add,
//! reorder and clear multi entries as their keys change.

use std::fmt;
use std::rc::Rc;

use crate::attrs::{static_styling, StaticAttr, StaticStyling};
use crate::config::Config;
use crate::error::{Result, StylingError};
use crate::flags::{EntryFlags, MasterFlags};
use crate::ids::{DirectiveId, ElementId};
use crate::initial::InitialStylingValues;
use crate::offsets::SinglePropOffsets;
use crate::player::{PlayerBuilder, PlayerContext, PlayerHandler, PlayerRef};
use crate::registry::DirectiveRegistry;
use crate::sanitize::StyleSanitizer;
use crate::value::{ClassesValue, StylesValue, Value};

/// One style property or class name tracked by a context.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Entry {
    pub(crate) flags: EntryFlags,
    pub(crate) prop: String,
    pub(crate) value: Value,
    pub(crate) initial_index: Option<usize>,
    /// Linked entry in the other region (single <-> multi).
    pub(crate) counterpart: Option<usize>,
    pub(crate) directive_index: usize,
    pub(crate) player_builder_index: usize,
}

impl Entry {
    pub fn flags(&self) -> EntryFlags {
        self.flags
    }

    pub fn prop(&self) -> &str {
        &self.prop
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn initial_index(&self) -> Option<usize> {
        self.initial_index
    }

    pub fn counterpart(&self) -> Option<usize> {
        self.counterpart
    }

    pub fn directive_index(&self) -> usize {
        self.directive_index
    }

    pub fn player_builder_index(&self) -> usize {
        self.player_builder_index
    }

    pub fn is_class(&self) -> bool {
        self.flags.is_class()
    }

    pub fn is_dirty(&self) -> bool {
        self.flags.is_dirty()
    }
}

pub struct StylingContext {
    pub(crate) master: MasterFlags,
    pub(crate) multi_start: usize,
    pub(crate) directives: DirectiveRegistry,
    pub(crate) initial_styles: InitialStylingValues,
    pub(crate) initial_classes: InitialStylingValues,
    pub(crate) single_prop_offsets: SinglePropOffsets,
    pub(crate) element: Option<ElementId>,
    pub(crate) cached_class_value: ClassesValue,
    pub(crate) cached_style_value: StylesValue,
    pub(crate) player_context: Option<PlayerContext>,
    pub(crate) entries: Vec<Entry>,
    pub(crate) config: Config,
}

impl fmt::Debug for StylingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StylingContext")
            .field("master", &self.master)
            .field("multi_start", &self.multi_start)
            .field("directives", &self.directives)
            .field("element", &self.element)
            .field("entries", &self.entries)
            .field("player_context", &self.player_context)
            .finish_non_exhaustive()
    }
}

impl StylingContext {
    /// Empty context with only the template registered.
    pub fn new(config: Config, sanitizer: Option<Rc<dyn StyleSanitizer>>) -> Self {
        Self {
            master: MasterFlags::empty(),
            multi_start: 0,
            directives: DirectiveRegistry::new(sanitizer, config.directive_capacity),
            initial_styles: InitialStylingValues::with_capacity(config.initial_value_capacity),
            initial_classes: InitialStylingValues::with_capacity(config.initial_value_capacity),
            single_prop_offsets: SinglePropOffsets::default(),
            element: None,
            cached_class_value: ClassesValue::Null,
            cached_style_value: StylesValue::Null,
            player_context: None,
            entries: Vec::with_capacity(config.entry_capacity),
            config,
        }
    }

    /// Template context seeded with the element's static classes and styles.
    pub fn from_static_attrs(
        config: Config,
        attrs: &[StaticAttr],
        sanitizer: Option<Rc<dyn StyleSanitizer>>,
    ) -> Self {
        let mut ctx = Self::new(config, sanitizer);
        for item in static_styling(attrs) {
            match item {
                StaticStyling::Class(name) => {
                    ctx.initial_classes.push(name, Value::Bool(true));
                }
                StaticStyling::Style(prop, value) => {
                    ctx.initial_styles.push(prop, Value::text(value));
                }
            }
        }
        ctx
    }

    /// Per-element copy of a template context, bound to `element`.
    ///
    /// The copy is locked against further binding declarations. Players never
    /// carry over: the copy starts without a player context.
    pub fn alloc(&self, element: Option<ElementId>) -> Self {
        Self {
            master: self.master | MasterFlags::BINDING_ALLOCATION_LOCKED,
            multi_start: self.multi_start,
            directives: self.directives.clone(),
            initial_styles: self.initial_styles.clone(),
            initial_classes: self.initial_classes.clone(),
            single_prop_offsets: self.single_prop_offsets.clone(),
            element,
            cached_class_value: self.cached_class_value.clone(),
            cached_style_value: self.cached_style_value.clone(),
            player_context: None,
            entries: self.entries.clone(),
            config: self.config.clone(),
        }
    }

    /// Registers `directive` and merges its static attributes (e.g. host
    /// attributes) into the initial tables. Existing non-empty initial values win.
    ///
    /// Registering here fixes the directive's priority ahead of any directive
    /// that declares bindings later. A directive that is already registered is
    /// skipped, so patching twice has no effect.
    pub fn patch_static_attrs(&mut self, attrs: &[StaticAttr], directive: Option<DirectiveId>) {
        if self.directives.register(directive).is_none() {
            log::debug!("static attrs for {directive:?} already patched");
            return;
        }
        for item in static_styling(attrs) {
            match item {
                StaticStyling::Class(name) => self.initial_classes.patch(name, Value::Bool(true)),
                StaticStyling::Style(prop, value) => {
                    self.initial_styles.patch(prop, Value::text(value))
                }
            }
        }
    }

    // ----- accessors -----

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Result<&Entry> {
        self.entries.get(index).ok_or(StylingError::IndexOutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    pub fn multi_start(&self) -> usize {
        self.multi_start
    }

    pub fn master_flags(&self) -> MasterFlags {
        self.master
    }

    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    pub fn directives(&self) -> &DirectiveRegistry {
        &self.directives
    }

    pub fn initial_styles(&self) -> &InitialStylingValues {
        &self.initial_styles
    }

    pub fn initial_classes(&self) -> &InitialStylingValues {
        &self.initial_classes
    }

    pub fn single_prop_offsets(&self) -> &SinglePropOffsets {
        &self.single_prop_offsets
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_context_dirty(&self) -> bool {
        self.master.contains(MasterFlags::DIRTY)
    }

    pub fn is_directive_dirty(&self, directive: Option<DirectiveId>) -> Result<bool> {
        let index = self.directive_index(directive)?;
        Ok(self.directives.is_dirty(index))
    }

    pub fn is_binding_allocation_locked(&self) -> bool {
        self.master.contains(MasterFlags::BINDING_ALLOCATION_LOCKED)
    }

    /// Stops further binding declarations. [`StylingContext::alloc`] does this
    /// for every per-element copy.
    pub fn lock_binding_allocation(&mut self) {
        self.master.insert(MasterFlags::BINDING_ALLOCATION_LOCKED);
    }

    pub fn limit_to_single_classes(&self) -> bool {
        self.master
            .contains(MasterFlags::ONLY_PROCESS_SINGLE_CLASSES)
    }

    /// Whether the context holds any binding or static styling at all.
    pub fn has_styling(&self) -> bool {
        !self.entries.is_empty() || !self.initial_styles.is_empty() || !self.initial_classes.is_empty()
    }

    /// Current value of single binding `offset` declared by `directive`.
    pub fn single_value(
        &self,
        offset: usize,
        is_class: bool,
        directive: Option<DirectiveId>,
    ) -> Result<&Value> {
        let directive_index = self.directive_index(directive)?;
        let index = self.resolve_single_prop_index(directive_index, offset, is_class)?;
        Ok(&self.entries[index].value)
    }

    /// Current value of a multi entry by name.
    pub fn multi_value(&self, prop: &str, is_class: bool) -> Option<&Value> {
        self.entries[self.multi_start..]
            .iter()
            .find(|e| e.prop == prop && e.is_class() == is_class)
            .map(|e| &e.value)
    }

    /// Class attribute value derived from the initial classes, cached on first use.
    pub fn initial_class_name_value(&mut self) -> &str {
        if !matches!(self.cached_class_value, ClassesValue::Names(_)) {
            let names = self
                .initial_classes
                .iter()
                .filter(|(_, v)| v.is_truthy())
                .map(|(name, _)| name)
                .collect::<Vec<_>>()
                .join(" ");
            self.cached_class_value = ClassesValue::Names(names);
        }
        match &self.cached_class_value {
            ClassesValue::Names(s) => s,
            _ => "",
        }
    }

    /// Checks that every single entry and its multi counterpart point at each other.
    pub fn verify_links(&self) -> Result<()> {
        for (index, entry) in self.entries.iter().enumerate() {
            let Some(other) = entry.counterpart else {
                if index < self.multi_start {
                    return Err(StylingError::BrokenLink { index });
                }
                continue;
            };
            let back = self.entries.get(other).and_then(|e| e.counterpart);
            let same_side = (index < self.multi_start) == (other < self.multi_start);
            if back != Some(index) || same_side || self.entries[other].prop != entry.prop {
                return Err(StylingError::BrokenLink { index });
            }
        }
        Ok(())
    }

    // ----- players -----

    pub(crate) fn player_context_mut(&mut self) -> &mut PlayerContext {
        let capacity = self.config.player_slot_capacity;
        self.player_context
            .get_or_insert_with(|| PlayerContext::new(capacity))
    }

    /// Adds a free-standing player to the element and queues it.
    pub fn add_player(&mut self, handler: &mut dyn PlayerHandler, player: PlayerRef) -> bool {
        let element = self.element;
        self.player_context_mut()
            .add_player(handler, element, Some(player), None)
    }

    /// Live players attached to the element.
    pub fn players(&self) -> Vec<PlayerRef> {
        self.player_context
            .as_ref()
            .map(PlayerContext::players)
            .unwrap_or_default()
    }

    pub(crate) fn has_player_builder_changed(&self, has_builder: bool, slot: usize) -> bool {
        if has_builder {
            return true;
        }
        self.player_context
            .as_ref()
            .is_some_and(|pc| pc.has_builder(slot))
    }

    pub(crate) fn set_player_builder(
        &mut self,
        builder: Option<Box<dyn PlayerBuilder>>,
        slot: usize,
    ) -> usize {
        self.player_context_mut().set_builder(builder, slot)
    }

    // ----- internal helpers -----

    pub(crate) fn directive_index(&self, directive: Option<DirectiveId>) -> Result<usize> {
        self.directives
            .index_of(directive)
            .ok_or(StylingError::UnregisteredDirective { directive })
    }

    pub(crate) fn resolve_single_prop_index(
        &self,
        directive_index: usize,
        offset: usize,
        is_class: bool,
    ) -> Result<usize> {
        let block = self
            .directives
            .get(directive_index)
            .and_then(|r| r.single_prop_block)
            .ok_or(StylingError::BindingsNotDeclared { directive_index })?;
        self.single_prop_offsets
            .single_prop_index(block, offset, is_class)
            .ok_or(StylingError::IndexOutOfRange {
                index: offset,
                len: self.single_prop_offsets.block_len(block, is_class),
            })
    }

    pub(crate) fn set_context_dirty(&mut self, dirty: bool) {
        self.master.set(MasterFlags::DIRTY, dirty);
    }

    pub(crate) fn set_player_builders_dirty(&mut self) {
        self.master.insert(MasterFlags::PLAYER_BUILDERS_DIRTY);
    }

    pub(crate) fn set_entry_dirty(&mut self, index: usize, dirty: bool) {
        debug_assert!(index < self.entries.len());
        self.entries[index].flags.set(EntryFlags::DIRTY, dirty);
    }

    pub(crate) fn set_owner(&mut self, index: usize, player_builder_index: usize, directive_index: usize) {
        let entry = &mut self.entries[index];
        entry.player_builder_index = player_builder_index;
        entry.directive_index = directive_index;
    }

    pub(crate) fn initial_value(&self, entry: &Entry) -> &Value {
        if entry.is_class() {
            self.initial_classes.value_at(entry.initial_index)
        } else {
            self.initial_styles.value_at(entry.initial_index)
        }
    }

    /// Flags and initial-table row for a newly tracked name.
    pub(crate) fn prepare_initial_flags(
        &self,
        prop: &str,
        is_class: bool,
        sanitizer: Option<&dyn StyleSanitizer>,
    ) -> (EntryFlags, Option<usize>) {
        let mut flags = EntryFlags::empty();
        let initial_index = if is_class {
            flags.insert(EntryFlags::CLASS);
            self.initial_classes.index_of(prop)
        } else {
            if sanitizer.is_some_and(|s| s.needs_sanitization(prop)) {
                flags.insert(EntryFlags::SANITIZE);
            }
            self.initial_styles.index_of(prop)
        };
        (flags, initial_index)
    }
}

/// Animation bindings (`@trigger`) are not styling and never reach a context.
pub fn is_animation_prop(name: &str) -> bool {
    name.starts_with('@')
}
