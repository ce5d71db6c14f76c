//! Writing binding values into the context.
//!
//! Nothing here touches the renderer: updates only store values and mark
//! entries dirty. See `render` for the flush.

use std::rc::Rc;

use crate::context::{Entry, StylingContext};
use crate::error::Result;
use crate::flags::EntryFlags;
use crate::ids::{DirectiveId, ElementId};
use crate::player::{
    BindingType, ClassAndStylePlayerBuilder, PlayerBuilder, PlayerFactory, CLASS_MAP_PLAYER_SLOT,
    STYLE_MAP_PLAYER_SLOT,
};
use crate::value::{
    allow_value_change, has_value_changed, value_exists, ClassesValue, MapInput, PropInput,
    StylesValue, Value,
};

fn split_input<T>(
    input: MapInput<T>,
    element: Option<ElementId>,
    binding_type: BindingType,
) -> (Option<T>, Option<Box<dyn PlayerBuilder>>) {
    match input {
        MapInput::NoChange => (None, None),
        MapInput::Value(v) => (Some(v), None),
        MapInput::Bound(bound) => (
            Some(bound.value),
            Some(new_builder(bound.factory, element, binding_type)),
        ),
    }
}

fn new_builder(
    factory: Rc<dyn PlayerFactory>,
    element: Option<ElementId>,
    binding_type: BindingType,
) -> Box<dyn PlayerBuilder> {
    Box::new(ClassAndStylePlayerBuilder::new(factory, element, binding_type))
}

/// Names and values of the class map input, flattened in input order.
fn class_items(value: &ClassesValue) -> Vec<(String, Value)> {
    match value {
        ClassesValue::Null => Vec::new(),
        ClassesValue::Names(names) => names
            .split_whitespace()
            .map(|n| (n.to_string(), Value::Bool(true)))
            .collect(),
        ClassesValue::Map(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
    }
}

impl StylingContext {
    /// Applies the map-based `[class]` and `[style]` inputs of `directive`.
    ///
    /// Multi entries are diffed against the new keys in order: matching names
    /// are compared in place, names found further on are swapped into position,
    /// unknown names are inserted, and names no longer present are cleared.
    /// Keys beyond the existing entries are appended.
    pub fn update_styling_map(
        &mut self,
        classes: MapInput<ClassesValue>,
        styles: MapInput<StylesValue>,
        directive: Option<DirectiveId>,
    ) -> Result<()> {
        let directive_index = self.directive_index(directive)?;
        let element = self.element;

        let (classes_value, classes_builder) = split_input(classes, element, BindingType::Class);
        let (styles_value, styles_builder) = split_input(styles, element, BindingType::Style);

        let ignore_all_class_updates = self.limit_to_single_classes()
            || classes_value
                .as_ref()
                .map_or(true, |v| v.same_input(&self.cached_class_value));
        let ignore_all_style_updates = styles_value
            .as_ref()
            .map_or(true, |v| v.same_input(&self.cached_style_value));
        if ignore_all_class_updates && ignore_all_style_updates {
            return Ok(());
        }

        if let Some(v) = classes_value.clone() {
            self.cached_class_value = v;
        }
        if let Some(v) = styles_value {
            self.cached_style_value = v;
        }

        let mut player_builders_dirty = false;
        let classes_player_index = if classes_builder.is_some() {
            CLASS_MAP_PLAYER_SLOT
        } else {
            0
        };
        if self.has_player_builder_changed(classes_builder.is_some(), CLASS_MAP_PLAYER_SLOT) {
            self.set_player_builder(classes_builder, CLASS_MAP_PLAYER_SLOT);
            player_builders_dirty = true;
        }
        let styles_player_index = if styles_builder.is_some() {
            STYLE_MAP_PLAYER_SLOT
        } else {
            0
        };
        if self.has_player_builder_changed(styles_builder.is_some(), STYLE_MAP_PLAYER_SLOT) {
            self.set_player_builder(styles_builder, STYLE_MAP_PLAYER_SLOT);
            player_builders_dirty = true;
        }

        // styles keep their slots in the walk even when unchanged so classes line up behind them
        let mut items: Vec<(String, Value, bool)> = self
            .cached_style_value
            .props()
            .map(|p| (p.to_string(), self.cached_style_value.get(p), false))
            .collect();
        let classes_start = items.len();
        if let (Some(v), false) = (&classes_value, ignore_all_class_updates) {
            items.extend(class_items(v).into_iter().map(|(p, v)| (p, v, true)));
        }
        let prop_limit = items.len();

        let sanitizer = self.directives.style_sanitizer(directive_index).cloned();
        let should_process = |is_class: bool| {
            if is_class {
                !ignore_all_class_updates
            } else {
                !ignore_all_style_updates
            }
        };

        let mut dirty = false;
        let mut ctx_index = self.multi_start;
        let mut prop_index = 0;

        // aligned walk over existing multi entries
        while ctx_index < self.entries.len() && prop_index < prop_limit {
            let (new_prop, new_value, is_class) = (
                items[prop_index].0.as_str(),
                &items[prop_index].1,
                items[prop_index].2,
            );
            if should_process(is_class) {
                let player_index = if is_class {
                    classes_player_index
                } else {
                    styles_player_index
                };
                let entry = &self.entries[ctx_index];
                if entry.prop == new_prop && entry.is_class() == is_class {
                    let changed = has_value_changed(entry.flags, &entry.value, new_value);
                    let was_set = !entry.value.is_null();
                    self.set_owner(ctx_index, player_index, directive_index);
                    if changed {
                        let differs_from_initial = has_value_changed(
                            self.entries[ctx_index].flags,
                            self.initial_value(&self.entries[ctx_index]),
                            new_value,
                        );
                        self.entries[ctx_index].value = new_value.clone();
                        player_builders_dirty |= player_index > 0;
                        if was_set || differs_from_initial {
                            self.set_entry_dirty(ctx_index, true);
                            dirty = true;
                        }
                    }
                } else if let Some(found) = self.find_entry_position_by_prop(new_prop, is_class, ctx_index) {
                    self.swap_multi_entries(ctx_index, found);
                    let entry = &self.entries[ctx_index];
                    if has_value_changed(entry.flags, &entry.value, new_value) {
                        let was_set = !entry.value.is_null();
                        let differs_from_initial =
                            has_value_changed(entry.flags, self.initial_value(entry), new_value);
                        self.entries[ctx_index].value = new_value.clone();
                        self.set_owner(ctx_index, player_index, directive_index);
                        if was_set || differs_from_initial {
                            self.set_entry_dirty(ctx_index, true);
                            player_builders_dirty |= player_index > 0;
                            dirty = true;
                        }
                    }
                } else {
                    let (flags, initial_index) =
                        self.prepare_initial_flags(new_prop, is_class, sanitizer.as_deref());
                    player_builders_dirty |= player_index > 0;
                    self.insert_new_multi_property(
                        ctx_index,
                        Entry {
                            flags: flags | EntryFlags::DIRTY,
                            prop: new_prop.to_string(),
                            value: new_value.clone(),
                            initial_index,
                            counterpart: None,
                            directive_index,
                            player_builder_index: player_index,
                        },
                    );
                    dirty = true;
                }
            }
            ctx_index += 1;
            prop_index += 1;
        }

        // whatever is left was removed from the maps
        while ctx_index < self.entries.len() {
            let entry = &self.entries[ctx_index];
            let is_class = entry.is_class();
            if should_process(is_class) && value_exists(&entry.value, is_class) {
                let player_index = if is_class {
                    classes_player_index
                } else {
                    styles_player_index
                };
                self.entries[ctx_index].value = if is_class {
                    Value::Bool(false)
                } else {
                    Value::Null
                };
                self.set_owner(ctx_index, player_index, directive_index);
                self.set_entry_dirty(ctx_index, true);
                dirty = true;
            }
            ctx_index += 1;
        }

        // keys past the end of the context
        while prop_index < prop_limit {
            let (new_prop, new_value, is_class) = (
                items[prop_index].0.as_str(),
                &items[prop_index].1,
                items[prop_index].2,
            );
            if should_process(is_class) {
                let player_index = if is_class {
                    classes_player_index
                } else {
                    styles_player_index
                };
                let (flags, initial_index) =
                    self.prepare_initial_flags(new_prop, is_class, sanitizer.as_deref());
                player_builders_dirty |= player_index > 0;
                self.entries.push(Entry {
                    flags: flags | EntryFlags::DIRTY,
                    prop: new_prop.to_string(),
                    value: new_value.clone(),
                    initial_index,
                    counterpart: None,
                    directive_index,
                    player_builder_index: player_index,
                });
                dirty = true;
            }
            prop_index += 1;
        }

        if dirty {
            self.set_context_dirty(true);
            self.directives.set_dirty(directive_index, true);
        }
        if player_builders_dirty {
            self.set_player_builders_dirty();
        }
        log::trace!(
            "map update for directive #{directive_index}: {} styles, {} classes, dirty={dirty}",
            classes_start,
            prop_limit - classes_start
        );
        Ok(())
    }

    /// Writes the class binding at `offset` of `directive`.
    pub fn update_class_prop(
        &mut self,
        offset: usize,
        input: impl Into<PropInput>,
        directive: Option<DirectiveId>,
    ) -> Result<()> {
        self.update_single_styling_value(offset, input.into(), true, directive)
    }

    /// Writes the style binding at `offset` of `directive`.
    pub fn update_style_prop(
        &mut self,
        offset: usize,
        input: impl Into<PropInput>,
        directive: Option<DirectiveId>,
    ) -> Result<()> {
        self.update_single_styling_value(offset, input.into(), false, directive)
    }

    fn update_single_styling_value(
        &mut self,
        offset: usize,
        input: PropInput,
        is_class_based: bool,
        directive: Option<DirectiveId>,
    ) -> Result<()> {
        let directive_index = self.directive_index(directive)?;
        let single_index = self.resolve_single_prop_index(directive_index, offset, is_class_based)?;

        let (value, factory) = match input {
            PropInput::Value(v) => (v, None),
            PropInput::Bound(bound) => (bound.value, Some(bound.factory)),
        };

        let entry = &self.entries[single_index];
        let curr_flags = entry.flags;
        let curr_directive = entry.directive_index;
        let curr_player_index = entry.player_builder_index;
        if !has_value_changed(curr_flags, &entry.value, &value)
            || !allow_value_change(&entry.value, &value, curr_directive, directive_index)
        {
            return Ok(());
        }

        let is_class = curr_flags.is_class();
        let builder = factory.map(|f| {
            let binding_type = if is_class {
                BindingType::Class
            } else {
                BindingType::Style
            };
            new_builder(f, self.element, binding_type)
        });
        let has_builder = builder.is_some();

        let mut player_builders_dirty = false;
        let mut player_index = if has_builder { curr_player_index } else { 0 };
        if self.has_player_builder_changed(has_builder, curr_player_index) {
            let slot = self.set_player_builder(builder, curr_player_index);
            player_index = if has_builder { slot } else { 0 };
            player_builders_dirty = true;
        }

        if player_builders_dirty || curr_directive != directive_index {
            self.set_owner(single_index, player_index, directive_index);
        }
        if curr_directive != directive_index {
            let prop = &self.entries[single_index].prop;
            let sanitize = !is_class
                && self
                    .directives
                    .style_sanitizer(directive_index)
                    .is_some_and(|s| s.needs_sanitization(prop));
            self.entries[single_index]
                .flags
                .set(EntryFlags::SANITIZE, sanitize);
        }

        let multi_index = self.entries[single_index].counterpart;
        debug_assert!(multi_index.is_some(), "single entry without a multi counterpart");
        let value_for_multi = multi_index
            .map(|i| self.entries[i].value.clone())
            .unwrap_or_default();
        // a single write only dirties the pair when the visible value can change
        let changes_output =
            !value_for_multi.is_truthy() || has_value_changed(curr_flags, &value_for_multi, &value);
        let single_dirty = !(
            !value_exists(&value, is_class) && value_exists(&value_for_multi, is_class)
        );
        self.entries[single_index].value = value;

        if changes_output {
            if let Some(multi) = multi_index {
                self.set_entry_dirty(multi, !single_dirty);
            }
            self.set_entry_dirty(single_index, single_dirty);
            self.directives.set_dirty(directive_index, true);
            self.set_context_dirty(true);
        }
        if player_builders_dirty {
            self.set_player_builders_dirty();
        }
        Ok(())
    }

    /// Position of the multi entry named `prop` at or after `start`.
    fn find_entry_position_by_prop(&self, prop: &str, is_class: bool, start: usize) -> Option<usize> {
        self.entries[start..]
            .iter()
            .position(|e| e.prop == prop && e.is_class() == is_class)
            .map(|i| i + start)
    }

    /// Swaps two multi entries and re-points their single counterparts.
    fn swap_multi_entries(&mut self, a: usize, b: usize) {
        debug_assert!(a >= self.multi_start && b >= self.multi_start);
        self.entries.swap(a, b);
        for index in [a, b] {
            if let Some(single) = self.entries[index].counterpart {
                self.entries[single].counterpart = Some(index);
            }
        }
    }

    /// Inserts a multi entry at `index` and re-points singles of the entries it displaced.
    fn insert_new_multi_property(&mut self, index: usize, entry: Entry) {
        let shifts = index < self.entries.len();
        log::debug!("inserting map entry `{}` at {index}", entry.prop);
        self.entries.insert(index, entry);
        if shifts {
            self.update_single_pointer_values(index + 1);
        }
    }

    fn update_single_pointer_values(&mut self, start: usize) {
        for index in start..self.entries.len() {
            if let Some(single) = self.entries[index].counterpart {
                self.entries[single].counterpart = Some(index);
            }
        }
    }
}
