//! Directives that contribute styling to an element, in priority order.

use std::fmt;
use std::rc::Rc;

use crate::ids::DirectiveId;
use crate::sanitize::StyleSanitizer;

/// One registered directive. Index 0 of the registry is always the template.
#[derive(Clone)]
pub struct DirectiveRecord {
    pub(crate) directive: Option<DirectiveId>,
    /// Block of single-binding positions this directive declared, once linked.
    pub(crate) single_prop_block: Option<usize>,
    pub(crate) dirty: bool,
    pub(crate) sanitizer: Option<Rc<dyn StyleSanitizer>>,
}

impl fmt::Debug for DirectiveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectiveRecord")
            .field("directive", &self.directive)
            .field("single_prop_block", &self.single_prop_block)
            .field("dirty", &self.dirty)
            .field("sanitizer", &self.sanitizer.is_some())
            .finish()
    }
}

impl DirectiveRecord {
    pub fn directive(&self) -> Option<DirectiveId> {
        self.directive
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_linked(&self) -> bool {
        self.single_prop_block.is_some()
    }
}

/// Registry position is priority: lower index wins conflicting writes.
#[derive(Clone, Debug)]
pub struct DirectiveRegistry {
    records: Vec<DirectiveRecord>,
}

impl DirectiveRegistry {
    pub fn new(sanitizer: Option<Rc<dyn StyleSanitizer>>, capacity: usize) -> Self {
        let mut records = Vec::with_capacity(capacity.max(1));
        records.push(DirectiveRecord {
            directive: None,
            single_prop_block: None,
            dirty: false,
            sanitizer,
        });
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn index_of(&self, directive: Option<DirectiveId>) -> Option<usize> {
        self.records.iter().position(|r| r.directive == directive)
    }

    pub fn get(&self, index: usize) -> Option<&DirectiveRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DirectiveRecord> {
        self.records.iter()
    }

    /// Appends an unlinked record for `directive` so it takes its priority slot
    /// before declaring bindings. Returns `None` when it is already registered.
    pub(crate) fn register(&mut self, directive: Option<DirectiveId>) -> Option<usize> {
        if self.index_of(directive).is_some() {
            return None;
        }
        self.records.push(DirectiveRecord {
            directive,
            single_prop_block: None,
            dirty: false,
            sanitizer: None,
        });
        Some(self.records.len() - 1)
    }

    /// Registers `directive` (or links an existing, unlinked record) to the
    /// offsets block `next_block`. Returns `None` when it is already linked.
    pub(crate) fn find_or_patch(
        &mut self,
        directive: Option<DirectiveId>,
        sanitizer: Option<Rc<dyn StyleSanitizer>>,
        next_block: usize,
    ) -> Option<usize> {
        match self.index_of(directive) {
            Some(index) => {
                let record = &mut self.records[index];
                if record.single_prop_block.is_some() {
                    return None;
                }
                record.single_prop_block = Some(next_block);
                if sanitizer.is_some() {
                    record.sanitizer = sanitizer;
                }
                Some(index)
            }
            None => {
                self.records.push(DirectiveRecord {
                    directive,
                    single_prop_block: Some(next_block),
                    dirty: false,
                    sanitizer,
                });
                Some(self.records.len() - 1)
            }
        }
    }

    /// The directive's own sanitizer, falling back to the template's.
    pub fn style_sanitizer(&self, index: usize) -> Option<&Rc<dyn StyleSanitizer>> {
        self.records
            .get(index)
            .and_then(|r| r.sanitizer.as_ref())
            .or_else(|| self.records[0].sanitizer.as_ref())
    }

    pub(crate) fn is_dirty(&self, index: usize) -> bool {
        self.records.get(index).is_some_and(|r| r.dirty)
    }

    pub(crate) fn set_dirty(&mut self, index: usize, dirty: bool) {
        if let Some(r) = self.records.get_mut(index) {
            r.dirty = dirty;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::DefaultStyleSanitizer;

    #[test]
    fn template_is_first_and_unlinked() {
        let r = DirectiveRegistry::new(None, 4);
        assert_eq!(r.len(), 1);
        assert_eq!(r.index_of(None), Some(0));
        assert!(!r.get(0).unwrap().is_linked());
    }

    #[test]
    fn linking_twice_is_a_no_op() {
        let mut r = DirectiveRegistry::new(None, 4);
        assert_eq!(r.find_or_patch(None, None, 0), Some(0));
        assert_eq!(r.find_or_patch(None, None, 1), None);
        assert_eq!(r.find_or_patch(Some(DirectiveId(7)), None, 1), Some(1));
        assert_eq!(r.find_or_patch(Some(DirectiveId(7)), None, 2), None);
        assert_eq!(r.get(1).unwrap().single_prop_block, Some(1));
    }

    #[test]
    fn registered_directive_is_linked_in_place() {
        let s: Rc<dyn StyleSanitizer> = Rc::new(DefaultStyleSanitizer);
        let mut r = DirectiveRegistry::new(None, 4);
        assert_eq!(r.register(Some(DirectiveId(3))), Some(1));
        assert_eq!(r.register(Some(DirectiveId(3))), None);
        assert_eq!(r.register(None), None);
        assert!(!r.get(1).unwrap().is_linked());

        assert_eq!(r.find_or_patch(Some(DirectiveId(5)), None, 0), Some(2));
        assert_eq!(r.find_or_patch(Some(DirectiveId(3)), Some(s), 1), Some(1));
        assert_eq!(r.get(1).unwrap().single_prop_block, Some(1));
        assert!(r.get(1).unwrap().sanitizer.is_some());
    }

    #[test]
    fn sanitizer_falls_back_to_template() {
        let s: Rc<dyn StyleSanitizer> = Rc::new(DefaultStyleSanitizer);
        let mut r = DirectiveRegistry::new(Some(s), 2);
        r.find_or_patch(Some(DirectiveId(1)), None, 0);
        assert!(r.style_sanitizer(1).is_some());

        let mut bare = DirectiveRegistry::new(None, 2);
        bare.find_or_patch(Some(DirectiveId(1)), None, 0);
        assert!(bare.style_sanitizer(1).is_none());
    }
}
