#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use hashbrown::HashMap;
use serde::Deserialize;
use stylebind_core::{
    BindingType, ClassesValue, Config, DefaultStyleSanitizer, DirectiveId, ElementId, Player,
    PlayerFactory, PlayerRef, Renderer, StaticAttr, StyleSanitizer, StylesValue, StylingContext,
    Value,
};

/// Renderer that records every call as a short string.
#[derive(Default)]
pub struct RecordingRenderer {
    pub calls: Vec<String>,
}

impl RecordingRenderer {
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.calls)
    }
}

impl Renderer for RecordingRenderer {
    fn set_style(&mut self, _element: ElementId, prop: &str, value: &str) {
        self.calls.push(format!("style {prop}={value}"));
    }
    fn remove_style(&mut self, _element: ElementId, prop: &str) {
        self.calls.push(format!("unstyle {prop}"));
    }
    fn add_class(&mut self, _element: ElementId, class_name: &str) {
        self.calls.push(format!("add {class_name}"));
    }
    fn remove_class(&mut self, _element: ElementId, class_name: &str) {
        self.calls.push(format!("remove {class_name}"));
    }
}

#[derive(Default)]
pub struct MockPlayer {
    pub id: usize,
    pub values: HashMap<String, Value>,
    destroyed: Cell<bool>,
    played: Cell<bool>,
}

impl MockPlayer {
    pub fn played(&self) -> bool {
        self.played.get()
    }
}

impl Player for MockPlayer {
    fn play(&self) {
        self.played.set(true);
    }
    fn destroy(&self) {
        self.destroyed.set(true);
    }
    fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }
}

/// Factory that builds a `MockPlayer` per call and keeps every one it built.
#[derive(Default)]
pub struct MockFactory {
    pub built: RefCell<Vec<Rc<MockPlayer>>>,
    pub calls: RefCell<Vec<(BindingType, bool)>>,
    /// When set, the factory declines to build.
    pub decline: Cell<bool>,
}

impl PlayerFactory for MockFactory {
    fn build(
        &self,
        _element: Option<ElementId>,
        binding_type: BindingType,
        values: &HashMap<String, Value>,
        is_first_render: bool,
        _current: Option<&PlayerRef>,
    ) -> Option<PlayerRef> {
        self.calls.borrow_mut().push((binding_type, is_first_render));
        if self.decline.get() {
            return None;
        }
        let player = Rc::new(MockPlayer {
            id: self.built.borrow().len(),
            values: values.clone(),
            ..MockPlayer::default()
        });
        self.built.borrow_mut().push(Rc::clone(&player));
        Some(player)
    }
}

#[derive(Debug, Deserialize)]
pub struct DirectiveFixture {
    pub directive: Option<DirectiveId>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub styles: Vec<String>,
    #[serde(default)]
    pub sanitize: bool,
    #[serde(default)]
    pub only_single_classes: bool,
}

#[derive(Debug, Deserialize)]
pub struct ElementFixture {
    #[serde(default)]
    pub static_attrs: Vec<StaticAttr>,
    pub directives: Vec<DirectiveFixture>,
}

impl ElementFixture {
    pub fn load(name: &str) -> Self {
        stylebind_test_fixtures::elements::load(name).expect("element fixture should load")
    }

    /// Template context with every directive's bindings declared.
    pub fn template(&self) -> StylingContext {
        let mut ctx = StylingContext::from_static_attrs(Config::default(), &self.static_attrs, None);
        for d in &self.directives {
            let classes: Vec<&str> = d.classes.iter().map(String::as_str).collect();
            let styles: Vec<&str> = d.styles.iter().map(String::as_str).collect();
            let sanitizer: Option<Rc<dyn StyleSanitizer>> = if d.sanitize {
                Some(Rc::new(DefaultStyleSanitizer))
            } else {
                None
            };
            ctx.update_context_with_bindings(
                d.directive,
                &classes,
                &styles,
                sanitizer,
                d.only_single_classes,
            );
        }
        ctx
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    StyleProp {
        #[serde(default)]
        directive: Option<DirectiveId>,
        offset: usize,
        value: Value,
    },
    ClassProp {
        #[serde(default)]
        directive: Option<DirectiveId>,
        offset: usize,
        value: Value,
    },
    StylesMap {
        #[serde(default)]
        directive: Option<DirectiveId>,
        value: StylesValue,
    },
    ClassesMap {
        #[serde(default)]
        directive: Option<DirectiveId>,
        value: ClassesValue,
    },
    Render {
        #[serde(default)]
        directive: Option<DirectiveId>,
        #[serde(default)]
        first: bool,
        expect: Vec<String>,
    },
    RenderInitial {
        expect: Vec<String>,
    },
}

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub steps: Vec<Step>,
}

/// Small template with the given template-level bindings, allocated to element 1.
pub fn element_with(classes: &[&str], styles: &[&str]) -> StylingContext {
    let mut template = StylingContext::new(Config::default(), None);
    template.update_context_with_bindings(None, classes, styles, None, false);
    template.alloc(Some(ElementId(1)))
}
