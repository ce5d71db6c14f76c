//! Bit flags stored on entries and on the context itself.

use bitflags::bitflags;

bitflags! {
    /// Per-entry state bits.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EntryFlags: u8 {
        /// Value changed since the last render.
        const DIRTY = 0b0000_0001;
        /// Entry is a class toggle rather than a style property.
        const CLASS = 0b0000_0010;
        /// Style values for this entry go through the sanitizer before reaching the renderer.
        const SANITIZE = 0b0000_0100;
    }
}

bitflags! {
    /// Context-wide state bits (the "master" flag).
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MasterFlags: u8 {
        /// At least one entry is waiting to be rendered.
        const DIRTY = 0b0000_0001;
        /// A player builder changed and must be flushed on the next render.
        const PLAYER_BUILDERS_DIRTY = 0b0000_1000;
        /// Map-based class input is ignored; only single class bindings apply.
        const ONLY_PROCESS_SINGLE_CLASSES = 0b0001_0000;
        /// No further bindings may be declared.
        const BINDING_ALLOCATION_LOCKED = 0b0010_0000;
    }
}

impl EntryFlags {
    #[inline]
    pub fn is_class(self) -> bool {
        self.contains(EntryFlags::CLASS)
    }

    #[inline]
    pub fn is_dirty(self) -> bool {
        self.contains(EntryFlags::DIRTY)
    }

    #[inline]
    pub fn needs_sanitization(self) -> bool {
        self.contains(EntryFlags::SANITIZE)
    }
}
