//! Players: animation-like objects produced from styling changes.
//!
//! A binding may carry a [`PlayerFactory`]. Instead of writing straight to the
//! renderer, changed values are then collected by a [`PlayerBuilder`] and, on
//! render, turned into a player that is queued with the [`PlayerHandler`].
//!
//! Builders live in slots of a [`PlayerContext`]. Slot `1` belongs to the class
//! map binding and slot `2` to the style map binding; single property bindings
//! get slots appended after those. Slot `0` means "no builder".

use hashbrown::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ids::ElementId;
use crate::value::Value;

/// Slot of the class map binding's builder.
pub const CLASS_MAP_PLAYER_SLOT: usize = 1;
/// Slot of the style map binding's builder.
pub const STYLE_MAP_PLAYER_SLOT: usize = 2;

pub trait Player {
    fn play(&self) {}
    fn destroy(&self);
    fn is_destroyed(&self) -> bool;
}

pub type PlayerRef = Rc<dyn Player>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BindingType {
    Unset,
    Class,
    Style,
}

/// Builds a player from the values collected for one binding.
pub trait PlayerFactory {
    fn build(
        &self,
        element: Option<ElementId>,
        binding_type: BindingType,
        values: &HashMap<String, Value>,
        is_first_render: bool,
        current: Option<&PlayerRef>,
    ) -> Option<PlayerRef>;
}

/// A binding value paired with the factory that should animate it.
pub struct BoundPlayerFactory<T> {
    pub factory: Rc<dyn PlayerFactory>,
    pub value: T,
}

impl<T: Clone> Clone for BoundPlayerFactory<T> {
    fn clone(&self) -> Self {
        Self {
            factory: Rc::clone(&self.factory),
            value: self.value.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for BoundPlayerFactory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundPlayerFactory")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

pub fn bind_player_factory<T>(factory: Rc<dyn PlayerFactory>, value: T) -> BoundPlayerFactory<T> {
    BoundPlayerFactory { factory, value }
}

/// What a builder produced when asked for a player.
pub enum BuildOutcome {
    /// Nothing changed; keep whatever player is running.
    Unchanged,
    /// The factory declined; the running player should be stopped.
    Cleared,
    Built(PlayerRef),
}

pub trait PlayerBuilder {
    fn set_value(&mut self, prop: &str, value: Value);
    fn build_player(&mut self, current: Option<&PlayerRef>, is_first_render: bool)
        -> BuildOutcome;
}

/// Receives newly built players. The host decides when to start them.
pub trait PlayerHandler {
    fn queue_player(&mut self, player: PlayerRef, element: Option<ElementId>);
    fn flush_players(&mut self);
}

/// Handler that keeps queued players until flushed, then plays them in order.
#[derive(Default)]
pub struct CorePlayerHandler {
    queue: Vec<PlayerRef>,
}

impl CorePlayerHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}

impl PlayerHandler for CorePlayerHandler {
    fn queue_player(&mut self, player: PlayerRef, _element: Option<ElementId>) {
        self.queue.push(player);
    }

    fn flush_players(&mut self) {
        for player in self.queue.drain(..) {
            player.play();
        }
    }
}

/// Builder used for both map and single bindings: gathers changed values and
/// hands them to the factory once per render.
pub struct ClassAndStylePlayerBuilder {
    factory: Rc<dyn PlayerFactory>,
    element: Option<ElementId>,
    binding_type: BindingType,
    values: HashMap<String, Value>,
    dirty: bool,
}

impl ClassAndStylePlayerBuilder {
    pub fn new(
        factory: Rc<dyn PlayerFactory>,
        element: Option<ElementId>,
        binding_type: BindingType,
    ) -> Self {
        Self {
            factory,
            element,
            binding_type,
            values: HashMap::new(),
            dirty: false,
        }
    }
}

impl PlayerBuilder for ClassAndStylePlayerBuilder {
    fn set_value(&mut self, prop: &str, value: Value) {
        if self.values.get(prop) != Some(&value) {
            self.values.insert(prop.to_string(), value);
            self.dirty = true;
        }
    }

    fn build_player(
        &mut self,
        current: Option<&PlayerRef>,
        is_first_render: bool,
    ) -> BuildOutcome {
        if !self.dirty {
            return BuildOutcome::Unchanged;
        }
        let player = self.factory.build(
            self.element,
            self.binding_type,
            &self.values,
            is_first_render,
            current,
        );
        self.values.clear();
        self.dirty = false;
        match player {
            Some(p) => BuildOutcome::Built(p),
            None => BuildOutcome::Cleared,
        }
    }
}

fn same_player(a: &PlayerRef, b: &PlayerRef) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

#[derive(Default)]
struct BuilderSlot {
    builder: Option<Box<dyn PlayerBuilder>>,
    player: Option<PlayerRef>,
}

/// Builder slots plus players that were added directly to the element.
#[derive(Default)]
pub struct PlayerContext {
    slots: Vec<BuilderSlot>,
    players: Vec<PlayerRef>,
}

impl fmt::Debug for PlayerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerContext")
            .field("slots", &self.slots.len())
            .field("players", &self.players.len())
            .finish()
    }
}

impl PlayerContext {
    /// A context with the two map slots reserved.
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity.max(STYLE_MAP_PLAYER_SLOT));
        slots.push(BuilderSlot::default());
        slots.push(BuilderSlot::default());
        Self {
            slots,
            players: Vec::new(),
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn has_builder(&self, slot: usize) -> bool {
        slot > 0
            && self
                .slots
                .get(slot - 1)
                .is_some_and(|s| s.builder.is_some())
    }

    /// Stores `builder` in `slot`, or in a fresh slot when `slot` is 0. Returns the slot used.
    pub(crate) fn set_builder(
        &mut self,
        builder: Option<Box<dyn PlayerBuilder>>,
        slot: usize,
    ) -> usize {
        match self.slots.get_mut(slot.wrapping_sub(1)) {
            Some(s) if slot > 0 => {
                s.builder = builder;
                slot
            }
            _ => {
                self.slots.push(BuilderSlot {
                    builder,
                    player: None,
                });
                self.slots.len()
            }
        }
    }

    pub(crate) fn builder_mut(&mut self, slot: usize) -> Option<&mut dyn PlayerBuilder> {
        if slot == 0 {
            return None;
        }
        match self.slots.get_mut(slot - 1) {
            Some(BuilderSlot {
                builder: Some(b), ..
            }) => Some(b.as_mut()),
            _ => None,
        }
    }

    /// Records `player` (in `slot` when given) and queues it. Returns whether a player was queued.
    pub(crate) fn add_player(
        &mut self,
        handler: &mut dyn PlayerHandler,
        element: Option<ElementId>,
        player: Option<PlayerRef>,
        slot: Option<usize>,
    ) -> bool {
        let Some(player) = player else {
            return false;
        };
        match slot.and_then(|s| s.checked_sub(1)).and_then(|i| self.slots.get_mut(i)) {
            Some(s) => s.player = Some(Rc::clone(&player)),
            None => self.players.push(Rc::clone(&player)),
        }
        handler.queue_player(player, element);
        true
    }

    /// Asks every builder for a player, queues what was built and destroys what
    /// it replaces. Returns the number of players queued.
    pub(crate) fn flush_builders(
        &mut self,
        handler: &mut dyn PlayerHandler,
        element: Option<ElementId>,
        is_first_render: bool,
    ) -> usize {
        let mut queued = 0;
        for index in 0..self.slots.len() {
            let old = self.slots[index].player.clone();
            let outcome = match self.slots[index].builder.as_mut() {
                Some(builder) => builder.build_player(old.as_ref(), is_first_render),
                None if old.is_some() => BuildOutcome::Cleared,
                None => continue,
            };
            match outcome {
                BuildOutcome::Unchanged => continue,
                BuildOutcome::Built(player) if old.as_ref().is_some_and(|o| same_player(o, &player)) => {
                    continue
                }
                BuildOutcome::Cleared => self.slots[index].player = None,
                BuildOutcome::Built(player) => {
                    if self.add_player(handler, element, Some(player), Some(index + 1)) {
                        queued += 1;
                    }
                }
            }
            if let Some(old) = old {
                old.destroy();
            }
        }
        queued
    }

    /// Live players: slot players first, then the ones added directly.
    pub fn players(&self) -> Vec<PlayerRef> {
        self.slots
            .iter()
            .filter_map(|s| s.player.as_ref())
            .chain(self.players.iter())
            .filter(|p| !p.is_destroyed())
            .cloned()
            .collect()
    }
}
