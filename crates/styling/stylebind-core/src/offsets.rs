//! Per-directive lookup from a binding's declaration offset to its single entry.

use serde::{Deserialize, Serialize};

/// Entry positions of one directive's single bindings, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetBlock {
    pub styles: Vec<usize>,
    pub classes: Vec<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinglePropOffsets {
    styles_count: usize,
    classes_count: usize,
    blocks: Vec<OffsetBlock>,
}

impl SinglePropOffsets {
    /// Distinct single style entries across all directives.
    pub fn styles_count(&self) -> usize {
        self.styles_count
    }

    /// Distinct single class entries across all directives.
    pub fn classes_count(&self) -> usize {
        self.classes_count
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block(&self, index: usize) -> Option<&OffsetBlock> {
        self.blocks.get(index)
    }

    /// Entry position of binding `offset` in `block`.
    pub fn single_prop_index(&self, block: usize, offset: usize, is_class: bool) -> Option<usize> {
        let b = self.blocks.get(block)?;
        if is_class {
            b.classes.get(offset).copied()
        } else {
            b.styles.get(offset).copied()
        }
    }

    /// Number of bindings declared in `block`.
    pub fn block_len(&self, block: usize, is_class: bool) -> usize {
        self.blocks
            .get(block)
            .map_or(0, |b| if is_class { b.classes.len() } else { b.styles.len() })
    }

    /// New single styles push every existing class entry further back.
    pub(crate) fn shift_class_indices(&mut self, by: usize) {
        for block in &mut self.blocks {
            for index in &mut block.classes {
                *index += by;
            }
        }
    }

    pub(crate) fn push_block(&mut self, block: OffsetBlock, new_styles: usize, new_classes: usize) {
        self.styles_count += new_styles;
        self.classes_count += new_classes;
        self.blocks.push(block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifting_touches_classes_only() {
        let mut o = SinglePropOffsets::default();
        o.push_block(
            OffsetBlock {
                styles: vec![0],
                classes: vec![1],
            },
            1,
            1,
        );
        o.shift_class_indices(2);
        assert_eq!(o.single_prop_index(0, 0, false), Some(0));
        assert_eq!(o.single_prop_index(0, 0, true), Some(3));
        assert_eq!(o.single_prop_index(0, 1, true), None);
        assert_eq!(o.single_prop_index(3, 0, true), None);
        assert_eq!((o.styles_count(), o.classes_count()), (1, 1));
    }
}
