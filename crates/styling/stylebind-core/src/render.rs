//! Flushing dirty entries to a renderer, binding stores and player builders.

use hashbrown::HashMap;
use indexmap::IndexMap;
use std::borrow::Cow;

use crate::context::StylingContext;
use crate::error::{Result, StylingError};
use crate::flags::{EntryFlags, MasterFlags};
use crate::ids::{DirectiveId, ElementId};
use crate::player::{PlayerBuilder, PlayerHandler};
use crate::sanitize::StyleSanitizer;
use crate::value::{value_exists, Value};

/// Element-level style and class operations.
pub trait Renderer {
    fn set_style(&mut self, element: ElementId, prop: &str, value: &str);
    fn remove_style(&mut self, element: ElementId, prop: &str);
    fn add_class(&mut self, element: ElementId, class_name: &str);
    fn remove_class(&mut self, element: ElementId, class_name: &str);
}

/// Receives values instead of the renderer (e.g. host bindings collected for a parent).
pub trait BindingStore {
    fn set_value(&mut self, prop: &str, value: Value);
}

impl BindingStore for HashMap<String, Value> {
    fn set_value(&mut self, prop: &str, value: Value) {
        self.insert(prop.to_string(), value);
    }
}

impl BindingStore for IndexMap<String, Value> {
    fn set_value(&mut self, prop: &str, value: Value) {
        self.insert(prop.to_string(), value);
    }
}

fn reborrow<'s>(store: &'s mut Option<&mut dyn BindingStore>) -> Option<&'s mut dyn BindingStore> {
    match store {
        Some(s) => Some(&mut **s),
        None => None,
    }
}

/// Writes one style value to whichever sink is active.
///
/// A store or builder takes the value instead of the renderer; a falsy value
/// removes the property.
pub fn set_style(
    element: ElementId,
    prop: &str,
    value: &Value,
    renderer: &mut dyn Renderer,
    sanitizer: Option<&dyn StyleSanitizer>,
    store: Option<&mut dyn BindingStore>,
    builder: Option<&mut dyn PlayerBuilder>,
) {
    let value: Cow<'_, Value> = match sanitizer {
        Some(s) if value.is_truthy() => {
            Cow::Owned(Value::Text(s.sanitize(prop, &value.to_css_string())))
        }
        _ => Cow::Borrowed(value),
    };
    if store.is_some() || builder.is_some() {
        if let Some(store) = store {
            store.set_value(prop, value.clone().into_owned());
        }
        if let Some(builder) = builder {
            builder.set_value(prop, value.into_owned());
        }
    } else if value.is_truthy() {
        renderer.set_style(element, prop, &value.to_css_string());
    } else {
        renderer.remove_style(element, prop);
    }
}

/// Toggles one class on whichever sink is active.
pub fn set_class(
    element: ElementId,
    class_name: &str,
    add: bool,
    renderer: &mut dyn Renderer,
    store: Option<&mut dyn BindingStore>,
    builder: Option<&mut dyn PlayerBuilder>,
) {
    if store.is_some() || builder.is_some() {
        if let Some(store) = store {
            store.set_value(class_name, Value::Bool(add));
        }
        if let Some(builder) = builder {
            builder.set_value(class_name, Value::Bool(add));
        }
    } else if add {
        renderer.add_class(element, class_name);
    } else {
        renderer.remove_class(element, class_name);
    }
}

impl StylingContext {
    /// Renders every dirty entry owned by `directive`.
    ///
    /// Runs only when both the context and the directive are dirty. Entries
    /// owned by other directives stay dirty for their own pass. Single entries
    /// win over their multi counterpart; a style with no value at all falls
    /// back to its initial value. On the first render falsy values are skipped.
    ///
    /// Returns the number of players queued with `handler`.
    pub fn render_styling(
        &mut self,
        renderer: &mut dyn Renderer,
        handler: &mut dyn PlayerHandler,
        is_first_render: bool,
        mut classes_store: Option<&mut dyn BindingStore>,
        mut styles_store: Option<&mut dyn BindingStore>,
        directive: Option<DirectiveId>,
    ) -> Result<usize> {
        let target = self.directive_index(directive)?;
        if !(self.is_context_dirty() && self.directives.is_dirty(target)) {
            return Ok(0);
        }
        let element = self.element.ok_or(StylingError::ElementNotAllocated)?;
        let flush_player_builders = self.master.contains(MasterFlags::PLAYER_BUILDERS_DIRTY);
        let multi_start = self.multi_start;

        let Self {
            entries,
            directives,
            initial_styles,
            player_context,
            ..
        } = self;

        let mut rendered = 0;
        let mut still_dirty = false;
        for i in 0..entries.len() {
            let entry = &entries[i];
            if !entry.is_dirty() {
                continue;
            }
            if entry.directive_index != target {
                still_dirty = true;
                continue;
            }

            let is_class = entry.is_class();
            let mut value_to_apply = &entry.value;
            if i < multi_start && !value_exists(value_to_apply, is_class) {
                if let Some(multi) = entry.counterpart {
                    value_to_apply = &entries[multi].value;
                }
            }
            // an unset class is removed; an unset style falls back to its initial value
            if !is_class && !value_exists(value_to_apply, is_class) {
                value_to_apply = initial_styles.value_at(entry.initial_index);
            }

            if !is_first_render || value_to_apply.is_truthy() {
                let builder = player_context
                    .as_mut()
                    .and_then(|pc| pc.builder_mut(entry.player_builder_index));
                if is_class {
                    set_class(
                        element,
                        &entry.prop,
                        value_to_apply.is_truthy(),
                        renderer,
                        reborrow(&mut classes_store),
                        builder,
                    );
                } else {
                    let sanitizer = if entry.flags.needs_sanitization() {
                        directives.style_sanitizer(entry.directive_index)
                    } else {
                        None
                    };
                    set_style(
                        element,
                        &entry.prop,
                        value_to_apply,
                        renderer,
                        sanitizer.map(|s| &**s),
                        reborrow(&mut styles_store),
                        builder,
                    );
                }
                log::trace!("flushed {} on {element}", entry.prop);
                rendered += 1;
            }
            entries[i].flags.remove(EntryFlags::DIRTY);
        }

        let mut players_queued = 0;
        if flush_player_builders {
            if let Some(pc) = player_context.as_mut() {
                players_queued = pc.flush_builders(handler, Some(element), is_first_render);
            }
            self.master.remove(MasterFlags::PLAYER_BUILDERS_DIRTY);
        }

        self.directives.set_dirty(target, false);
        self.set_context_dirty(still_dirty);
        log::debug!(
            "rendered {rendered} entries on {element} for directive #{target}, {players_queued} players queued, still dirty: {still_dirty}"
        );
        Ok(players_queued)
    }

    /// Writes the initial classes and styles straight to the renderer.
    pub fn render_initial_styles_and_classes(&self, renderer: &mut dyn Renderer) -> Result<()> {
        let element = self.element.ok_or(StylingError::ElementNotAllocated)?;
        for (name, value) in self.initial_classes.iter() {
            if value.is_truthy() {
                renderer.add_class(element, name);
            }
        }
        for (prop, value) in self.initial_styles.iter() {
            if value.is_truthy() {
                renderer.set_style(element, prop, &value.to_css_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::player::CorePlayerHandler;
    use crate::value::StylesValue;

    #[derive(Default)]
    struct Log(Vec<String>);

    impl Renderer for Log {
        fn set_style(&mut self, _e: ElementId, prop: &str, value: &str) {
            self.0.push(format!("style {prop}={value}"));
        }
        fn remove_style(&mut self, _e: ElementId, prop: &str) {
            self.0.push(format!("unstyle {prop}"));
        }
        fn add_class(&mut self, _e: ElementId, class_name: &str) {
            self.0.push(format!("add {class_name}"));
        }
        fn remove_class(&mut self, _e: ElementId, class_name: &str) {
            self.0.push(format!("remove {class_name}"));
        }
    }

    fn element_ctx(classes: &[&str], styles: &[&str]) -> StylingContext {
        let mut template = StylingContext::new(Config::default(), None);
        template.update_context_with_bindings(None, classes, styles, None, false);
        template.alloc(Some(ElementId(1)))
    }

    #[test]
    fn renders_dirty_entries_once() {
        let mut ctx = element_ctx(&["on"], &["width"]);
        ctx.update_style_prop(0, "10px", None).unwrap();
        ctx.update_class_prop(0, true, None).unwrap();

        let mut r = Log::default();
        let mut h = CorePlayerHandler::new();
        ctx.render_styling(&mut r, &mut h, false, None, None, None)
            .unwrap();
        assert_eq!(r.0, vec!["style width=10px", "add on"]);
        assert!(!ctx.is_context_dirty());

        ctx.render_styling(&mut r, &mut h, false, None, None, None)
            .unwrap();
        assert_eq!(r.0.len(), 2);
    }

    #[test]
    fn stores_take_values_instead_of_renderer() {
        let mut ctx = element_ctx(&["on"], &["width"]);
        ctx.update_style_prop(0, "10px", None).unwrap();
        ctx.update_class_prop(0, true, None).unwrap();

        let mut classes: HashMap<String, Value> = HashMap::new();
        let mut styles: IndexMap<String, Value> = IndexMap::new();
        let mut r = Log::default();
        ctx.render_styling(
            &mut r,
            &mut CorePlayerHandler::new(),
            false,
            Some(&mut classes),
            Some(&mut styles),
            None,
        )
        .unwrap();
        assert!(r.0.is_empty());
        assert_eq!(classes.get("on"), Some(&Value::Bool(true)));
        assert_eq!(styles.get("width"), Some(&Value::text("10px")));
    }

    #[test]
    fn first_render_skips_falsy_values() {
        let mut template = StylingContext::new(Config::default(), None);
        template.update_context_with_bindings(None, &[], &[], None, false);
        let mut ctx = template.alloc(Some(ElementId(1)));
        ctx.update_styling_map(
            crate::value::MapInput::NoChange,
            StylesValue::map([("width", Value::text("1px")), ("height", Value::text(""))]).into(),
            None,
        )
        .unwrap();
        let mut r = Log::default();
        ctx.render_styling(&mut r, &mut CorePlayerHandler::new(), true, None, None, None)
            .unwrap();
        assert_eq!(r.0, vec!["style width=1px"]);
        assert!(ctx.entries().iter().all(|e| !e.is_dirty()));
    }

    #[test]
    fn template_context_cannot_render() {
        let mut ctx = StylingContext::new(Config::default(), None);
        ctx.update_context_with_bindings(None, &[], &["width"], None, false);
        ctx.update_style_prop(0, "1px", None).unwrap();
        let mut r = Log::default();
        assert_eq!(
            ctx.render_styling(&mut r, &mut CorePlayerHandler::new(), false, None, None, None),
            Err(StylingError::ElementNotAllocated)
        );
        assert_eq!(
            ctx.render_initial_styles_and_classes(&mut r),
            Err(StylingError::ElementNotAllocated)
        );
    }
}
