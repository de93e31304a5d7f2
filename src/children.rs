//! The ordered list of attached elements, as seen by the host.

use crate::element::ElementId;
use core::slice;
use thiserror::Error;

/// Errors from indexed operations on [`Children`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChildrenError {
    #[error("child index {index} out of range (len {len})")]
    OutOfRange { index: usize, len: usize },
}

/// Ordered children of a column layout: the primary content first, then the overflow columns in
/// chain order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Children {
    ids: Vec<ElementId>,
}

impl Children {
    pub fn new() -> Children {
        Children::default()
    }

    /// Appends a child.
    pub fn push(&mut self, id: ElementId) {
        self.ids.push(id);
    }

    pub fn get(&self, index: usize) -> Option<ElementId> {
        self.ids.get(index).copied()
    }

    /// Removes the child at `index`, shifting all later children down by one.
    pub fn remove(&mut self, index: usize) -> Result<ElementId, ChildrenError> {
        if index < self.ids.len() {
            Ok(self.ids.remove(index))
        } else {
            Err(ChildrenError::OutOfRange {
                index,
                len: self.ids.len(),
            })
        }
    }

    /// Removes every child from `len` onwards.
    pub fn truncate(&mut self, len: usize) {
        self.ids.truncate(len);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, ElementId> {
        self.ids.iter()
    }
}

impl<'a> IntoIterator for &'a Children {
    type Item = &'a ElementId;
    type IntoIter = slice::Iter<'a, ElementId>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[test]
fn test_children_remove() {
    let a = ElementId::new();
    let b = ElementId::new();
    let c = ElementId::new();

    let mut children = Children::new();
    children.push(a);
    children.push(b);
    children.push(c);

    assert_eq!(children.remove(1), Ok(b));
    assert_eq!(children.get(1), Some(c), "later children should shift down");
    assert_eq!(
        children.remove(5),
        Err(ChildrenError::OutOfRange { index: 5, len: 2 })
    );

    children.truncate(1);
    assert_eq!(children.iter().copied().collect::<Vec<_>>(), vec![a]);

    children.clear();
    assert!(children.is_empty());
}
