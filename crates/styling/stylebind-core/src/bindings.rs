//! Declaring single bindings: growing the context layout for a directive.

use std::rc::Rc;

use crate::context::{Entry, StylingContext};
use crate::flags::MasterFlags;
use crate::ids::DirectiveId;
use crate::offsets::OffsetBlock;
use crate::sanitize::StyleSanitizer;
use crate::value::Value;

impl StylingContext {
    /// Declares the single style and class bindings of `directive`.
    ///
    /// Names already declared by an earlier directive share that entry. New
    /// names get a single entry and a linked multi entry; every existing pointer
    /// is shifted so the zones stay contiguous. Does nothing once the context is
    /// locked or when the directive already declared its bindings.
    pub fn update_context_with_bindings(
        &mut self,
        directive: Option<DirectiveId>,
        class_bindings: &[&str],
        style_bindings: &[&str],
        sanitizer: Option<Rc<dyn StyleSanitizer>>,
        only_process_single_classes: bool,
    ) {
        if self.is_binding_allocation_locked() {
            log::warn!("binding allocation is locked; ignoring bindings for {directive:?}");
            return;
        }

        let next_block = self.single_prop_offsets.block_count();
        let Some(directive_index) =
            self.directives
                .find_or_patch(directive, sanitizer.clone(), next_block)
        else {
            log::debug!("bindings for {directive:?} already declared");
            return;
        };

        let total_current_styles = self.single_prop_offsets.styles_count();
        let total_current_classes = self.single_prop_offsets.classes_count();

        let mut single_classes_start = total_current_styles;
        let mut multi_styles_start = single_classes_start + total_current_classes;
        let mut multi_classes_start = multi_styles_start + total_current_styles;

        // resolve every name to its single entry, reserving positions for new ones
        let mut block = OffsetBlock::default();
        let mut insertion_offset = 0;
        let mut new_styles: Vec<&str> = Vec::new();
        for &name in style_bindings {
            let index = match self.find_single(name, 0, single_classes_start) {
                Some(i) => i,
                None => {
                    let i = single_classes_start + insertion_offset;
                    insertion_offset += 1;
                    new_styles.push(name);
                    i
                }
            };
            block.styles.push(index);
        }

        let mut new_classes: Vec<&str> = Vec::new();
        for &name in class_bindings {
            let index = match self.find_single(name, single_classes_start, multi_styles_start) {
                Some(i) => i + new_styles.len(),
                None => {
                    let i = multi_styles_start + insertion_offset;
                    insertion_offset += 1;
                    new_classes.push(name);
                    i
                }
            };
            block.classes.push(index);
        }

        if !new_styles.is_empty() {
            self.single_prop_offsets
                .shift_class_indices(new_styles.len());
        }

        // shift links of existing entries to where their counterpart will end up
        let total_new = new_styles.len() + new_classes.len();
        for (i, entry) in self.entries.iter_mut().enumerate() {
            let is_multi = i >= multi_styles_start;
            let is_class = i
                >= if is_multi {
                    multi_classes_start
                } else {
                    single_classes_start
                };
            let shift_for_styles = if is_class { new_styles.len() } else { 0 };
            if let Some(c) = entry.counterpart.as_mut() {
                *c += if is_multi {
                    shift_for_styles
                } else {
                    total_new + shift_for_styles
                };
            }
        }

        // open space: styles at the end of each style zone, classes at the end of each class zone
        let n = new_styles.len();
        if n > 0 {
            self.entries
                .splice(multi_classes_start..multi_classes_start, blank_entries(n));
            self.entries
                .splice(single_classes_start..single_classes_start, blank_entries(n));
            single_classes_start += n;
            multi_styles_start += n;
            multi_classes_start += 2 * n;
        }
        let m = new_classes.len();
        if m > 0 {
            let multi_classes_end = multi_classes_start + total_current_classes;
            self.entries
                .splice(multi_classes_end..multi_classes_end, blank_entries(m));
            self.entries
                .splice(multi_styles_start..multi_styles_start, blank_entries(m));
            multi_styles_start += m;
            multi_classes_start += m;
        }

        let new_names = new_styles
            .iter()
            .map(|&name| (name, false))
            .chain(new_classes.iter().map(|&name| (name, true)));
        for (i, (name, is_class)) in new_names.enumerate() {
            let (single_index, multi_index) = if is_class {
                let adjusted = i - n;
                (
                    single_classes_start + total_current_classes + adjusted,
                    multi_classes_start + total_current_classes + adjusted,
                )
            } else {
                (total_current_styles + i, multi_styles_start + total_current_styles + i)
            };

            let (flags, initial_index) =
                self.prepare_initial_flags(name, is_class, sanitizer.as_deref());
            let initial_index = Some(initial_index.unwrap_or_else(|| {
                // placeholder so the row can be filled by later static attrs
                let table = if is_class {
                    &mut self.initial_classes
                } else {
                    &mut self.initial_styles
                };
                table.push(name, if is_class { Value::Bool(false) } else { Value::Null })
            }));

            let entry = Entry {
                flags,
                prop: name.to_string(),
                value: Value::Null,
                initial_index,
                counterpart: Some(multi_index),
                directive_index,
                player_builder_index: 0,
            };
            self.entries[multi_index] = Entry {
                counterpart: Some(single_index),
                ..entry.clone()
            };
            self.entries[single_index] = entry;
        }

        self.single_prop_offsets.push_block(block, n, m);
        self.multi_start = multi_styles_start;
        self.master = if only_process_single_classes {
            MasterFlags::ONLY_PROCESS_SINGLE_CLASSES
        } else {
            MasterFlags::empty()
        };

        log::debug!(
            "directive #{directive_index} declared {} styles / {} classes ({n} new styles, {m} new classes)",
            style_bindings.len(),
            class_bindings.len(),
        );
        debug_assert!(self.verify_links().is_ok());
    }

    fn find_single(&self, name: &str, start: usize, end: usize) -> Option<usize> {
        self.entries[start..end]
            .iter()
            .position(|e| e.prop == name)
            .map(|i| i + start)
    }
}

fn blank_entries(n: usize) -> impl Iterator<Item = Entry> {
    std::iter::repeat_with(Entry::default).take(n)
}
