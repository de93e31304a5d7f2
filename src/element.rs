//! Flow elements: the primary content and the overflow columns that continue it.

use cgmath::Vector2;
use core::fmt;
use parking_lot::Mutex;
use std::sync::Arc;
use uuid::Uuid;

/// A unique identifier for an element in a column layout.
///
/// (this is just a UUID)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u32, u16, u16, [u8; 8]);

impl ElementId {
    pub(crate) fn new() -> ElementId {
        let uuid = Uuid::new_v4();
        let (a, b, c, d) = uuid.as_fields();
        ElementId(a, b, c, *d)
    }
}

/// A caller-owned element the layout only holds a reference to.
pub type Shared<T> = Arc<Mutex<T>>;

/// Wraps an element for sharing with a layout.
pub fn shared<T>(element: T) -> Shared<T> {
    Arc::new(Mutex::new(element))
}

/// Something that lays out a run of content and may not fit all of it.
///
/// Primary content and overflow columns both implement this; an overflow column is measured
/// with the cursor its predecessor reported as overflow, so a chain of them shows one
/// continuous run of content.
pub trait Flow: fmt::Debug {
    /// Position in the content where unshown content resumes.
    type Cursor: Clone + fmt::Debug;

    /// Measures the element.
    ///
    /// - `available`: the space this element may take up. Components may be infinite.
    /// - `from`: where to start laying out content; `None` for the primary content.
    fn measure(&mut self, available: Vector2<f64>, from: Option<Self::Cursor>);

    /// The size computed by the last `measure`.
    fn desired_size(&self) -> Vector2<f64>;

    /// Where the content that did not fit during the last `measure` begins, if any.
    fn overflow(&self) -> Option<Self::Cursor>;

    /// Returns true if the last `measure` left content unshown.
    fn has_overflow(&self) -> bool {
        self.overflow().is_some()
    }

    /// Sets the element that receives this element’s overflow.
    fn set_overflow_target(&mut self, target: Option<ElementId>);
}

/// Creates overflow columns on demand.
pub trait ColumnTemplate<K>: Send + Sync {
    /// Creates a new, unmeasured column.
    fn instantiate(&self) -> K;
}

impl<K, F> ColumnTemplate<K> for F
where
    F: Fn() -> K + Send + Sync,
{
    fn instantiate(&self) -> K {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_ids_are_unique() {
        let a = ElementId::new();
        let b = ElementId::new();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn closures_are_templates() {
        let template = || 42usize;
        let template: &dyn ColumnTemplate<usize> = &template;
        assert_eq!(template.instantiate(), 42);
    }
}
