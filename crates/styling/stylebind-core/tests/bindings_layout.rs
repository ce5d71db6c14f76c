mod common;

use std::collections::HashSet;

use stylebind_core::{Config, DirectiveId, StylingContext};

fn declare(ctx: &mut StylingContext, directive: Option<DirectiveId>, classes: &[&str], styles: &[&str]) {
    ctx.update_context_with_bindings(directive, classes, styles, None, false);
}

#[test]
fn every_declared_binding_resolves_to_a_linked_slot() {
    let mut ctx = StylingContext::new(Config::default(), None);
    declare(&mut ctx, None, &["a", "b"], &["width", "height", "color"]);
    declare(&mut ctx, Some(DirectiveId(1)), &["b", "c"], &["color", "opacity"]);
    declare(&mut ctx, Some(DirectiveId(2)), &["d"], &[]);

    ctx.verify_links().expect("links");
    let offsets = ctx.single_prop_offsets();
    assert_eq!(offsets.styles_count(), 4);
    assert_eq!(offsets.classes_count(), 4);
    assert_eq!(ctx.multi_start(), 8);
    assert_eq!(ctx.entries().len(), 16);

    let mut seen = HashSet::new();
    for block in 0..offsets.block_count() {
        for is_class in [false, true] {
            for offset in 0..offsets.block_len(block, is_class) {
                let index = offsets
                    .single_prop_index(block, offset, is_class)
                    .expect("declared offset");
                let entry = &ctx.entries()[index];
                assert_eq!(entry.is_class(), is_class);
                let multi = entry.counterpart().expect("single is linked");
                assert!(multi >= ctx.multi_start());
                assert_eq!(ctx.entries()[multi].prop(), entry.prop());
                seen.insert(index);
            }
        }
    }
    // shared names resolve to the same slot
    assert_eq!(seen.len(), 8);
}

#[test]
fn declaring_same_directive_twice_keeps_size() {
    let mut ctx = StylingContext::new(Config::default(), None);
    declare(&mut ctx, Some(DirectiveId(4)), &["x"], &["width"]);
    let len = ctx.entries().len();
    let blocks = ctx.single_prop_offsets().block_count();
    declare(&mut ctx, Some(DirectiveId(4)), &["x"], &["width"]);
    assert_eq!(ctx.entries().len(), len);
    assert_eq!(ctx.single_prop_offsets().block_count(), blocks);
}

#[test]
fn zones_stay_contiguous_after_interleaved_declarations() {
    let mut ctx = StylingContext::new(Config::default(), None);
    declare(&mut ctx, None, &["c1"], &["s1"]);
    declare(&mut ctx, Some(DirectiveId(1)), &["c2"], &[]);
    declare(&mut ctx, Some(DirectiveId(2)), &[], &["s2"]);
    declare(&mut ctx, Some(DirectiveId(3)), &["c3"], &["s3"]);

    let kinds: Vec<(bool, bool)> = ctx
        .entries()
        .iter()
        .enumerate()
        .map(|(i, e)| (i >= ctx.multi_start(), e.is_class()))
        .collect();
    let mut sorted = kinds.clone();
    sorted.sort();
    assert_eq!(kinds, sorted, "zones must be styles then classes, single then multi");

    let names: Vec<&str> = ctx.entries().iter().map(|e| e.prop()).collect();
    assert_eq!(
        names,
        vec!["s1", "s2", "s3", "c1", "c2", "c3", "s1", "s2", "s3", "c1", "c2", "c3"]
    );
    ctx.verify_links().expect("links");
}

#[test]
fn allocation_is_locked_per_element() {
    let template = common::element_with(&["x"], &["width"]);
    let mut ctx = template.alloc(None);
    assert!(ctx.is_binding_allocation_locked());
    declare(&mut ctx, Some(DirectiveId(9)), &["late"], &[]);
    assert_eq!(ctx.entries().len(), 4);
    assert_eq!(ctx.directives().index_of(Some(DirectiveId(9))), None);
}
