mod common;

use common::RecordingRenderer;
use stylebind_core::{
    AttrMarker, Config, CorePlayerHandler, DefaultStyleSanitizer, DirectiveId, ElementId,
    EntryFlags, StaticAttr, StyleSanitizer, StylingContext, Value,
};
use std::rc::Rc;

/// Template plus `n` directives that all bind `width`.
fn shared_width(n: u32) -> StylingContext {
    let mut template = StylingContext::new(Config::default(), None);
    template.update_context_with_bindings(None, &[], &["width"], None, false);
    for d in 1..=n {
        template.update_context_with_bindings(Some(DirectiveId(d)), &[], &["width"], None, false);
    }
    template.alloc(Some(ElementId(1)))
}

fn dir(i: u32) -> Option<DirectiveId> {
    if i == 0 {
        None
    } else {
        Some(DirectiveId(i))
    }
}

#[test]
fn higher_priority_directive_keeps_the_value_in_any_order() {
    let orders: [[u32; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    for order in orders {
        let mut ctx = shared_width(2);
        for d in order {
            ctx.update_style_prop(0, format!("{d}px"), dir(d)).unwrap();
        }
        assert_eq!(
            ctx.single_value(0, false, None).unwrap(),
            &Value::text("0px"),
            "order {order:?}"
        );
        assert_eq!(ctx.entries()[0].directive_index(), 0);
    }
}

#[test]
fn lower_priority_directive_cannot_clear_anothers_value() {
    let mut ctx = shared_width(1);
    ctx.update_style_prop(0, "5px", dir(1)).unwrap();
    ctx.update_style_prop(0, Value::Null, None).unwrap();
    assert_eq!(ctx.single_value(0, false, None).unwrap(), &Value::text("5px"));

    ctx.update_style_prop(0, Value::Null, dir(1)).unwrap();
    assert_eq!(ctx.single_value(0, false, None).unwrap(), &Value::Null);
}

#[test]
fn owner_change_refreshes_sanitize_flag() {
    let mut template = StylingContext::new(Config::default(), None);
    template.update_context_with_bindings(None, &[], &["background-image"], None, false);
    let sanitizer: Rc<dyn StyleSanitizer> = Rc::new(DefaultStyleSanitizer);
    template.update_context_with_bindings(
        dir(1),
        &[],
        &["background-image"],
        Some(sanitizer),
        false,
    );
    let mut ctx = template.alloc(Some(ElementId(1)));
    assert!(!ctx.entries()[0].flags().contains(EntryFlags::SANITIZE));

    ctx.update_style_prop(0, "url(javascript:void(0))", dir(1))
        .unwrap();
    assert!(ctx.entries()[0].flags().contains(EntryFlags::SANITIZE));

    let mut r = RecordingRenderer::default();
    ctx.render_styling(&mut r, &mut CorePlayerHandler::new(), false, None, None, dir(1))
        .unwrap();
    assert_eq!(r.take(), vec!["style background-image=unsafe"]);
}

#[test]
fn host_attrs_fix_priority_before_bindings_are_declared() {
    let mut template = StylingContext::new(Config::default(), None);
    let host: Vec<StaticAttr> = vec![AttrMarker::Classes.into(), "host".into()];
    template.patch_static_attrs(&host, dir(1));
    template.update_context_with_bindings(dir(2), &[], &["width"], None, false);
    template.update_context_with_bindings(dir(1), &[], &["width"], None, false);
    assert_eq!(template.directives().index_of(dir(1)), Some(1));
    assert_eq!(template.directives().index_of(dir(2)), Some(2));
    assert!(template.directives().get(1).unwrap().is_linked());

    let mut ctx = template.alloc(Some(ElementId(1)));
    ctx.update_style_prop(0, "2px", dir(2)).unwrap();
    ctx.update_style_prop(0, "1px", dir(1)).unwrap();
    ctx.update_style_prop(0, "3px", dir(2)).unwrap();
    assert_eq!(ctx.single_value(0, false, dir(1)).unwrap(), &Value::text("1px"));
    assert_eq!(ctx.entries()[0].directive_index(), 1);

    let mut r = RecordingRenderer::default();
    ctx.render_initial_styles_and_classes(&mut r).unwrap();
    assert_eq!(r.take(), vec!["add host"]);
}
