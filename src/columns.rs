//! The overflow column layout.

use crate::children::Children;
use crate::config::Config;
use crate::element::{ColumnTemplate, ElementId, Flow, Shared};
use crate::host::{Invalidation, Invalidator};
use crate::rect::Rect;
use cgmath::{Point2, Vector2, Zero};
use core::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// An overflow column owned by the layout.
struct Column<K> {
    id: ElementId,
    element: K,
}

/// Where a child was placed by [`RichTextColumns::arrange`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub id: ElementId,
    pub bounds: Rect,
}

/// Result of an arrange pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    /// Size taken up by all children.
    pub size: Vector2<f64>,

    /// Child bounds, in child order.
    pub placements: Vec<Placement>,
}

impl Arrangement {
    /// Returns the child whose bounds contain the point.
    pub fn child_at(&self, point: Point2<f64>) -> Option<ElementId> {
        self.placements
            .iter()
            .find(|placement| placement.bounds.contains(point))
            .map(|placement| placement.id)
    }
}

/// Lays out a primary content element followed by as many overflow columns as it takes to show
/// the rest of its content, side by side.
///
/// Columns are created from the column template when needed and kept around between passes;
/// when fewer are needed, the surplus is dropped. The content itself is only borrowed.
///
/// Both [`measure`](Self::measure) and [`arrange`](Self::arrange) lock the content, so neither
/// may be called while the caller is holding the content’s lock. The lock is not held while
/// columns are created or measured, so templates and columns may lock the content themselves.
pub struct RichTextColumns<C, K> {
    config: Config,
    content: Option<Shared<C>>,
    content_id: ElementId,
    template: Option<Arc<dyn ColumnTemplate<K>>>,
    /// The overflow chain. `None` until the first measure pass with content.
    columns: Option<Vec<Column<K>>>,
    children: Children,
    desired_size: Vector2<f64>,
    invalidator: Option<Invalidator>,
}

impl<C, K> RichTextColumns<C, K>
where
    C: Flow,
    K: Flow<Cursor = C::Cursor>,
{
    pub fn new() -> RichTextColumns<C, K> {
        RichTextColumns::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> RichTextColumns<C, K> {
        RichTextColumns {
            config,
            content: None,
            content_id: ElementId::new(),
            template: None,
            columns: None,
            children: Children::new(),
            desired_size: Vector2::zero(),
            invalidator: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The primary content.
    pub fn content(&self) -> Option<&Shared<C>> {
        self.content.as_ref()
    }

    /// Replaces the primary content. Resets the layout.
    pub fn set_content(&mut self, content: Option<Shared<C>>) {
        let changed = match (&self.content, &content) {
            (Some(a), Some(b)) => !Arc::ptr_eq(a, b),
            (None, None) => false,
            _ => true,
        };
        self.reset_layout(changed);
        self.content = content;
        self.content_id = ElementId::new();
    }

    /// The id the primary content is attached under.
    pub fn content_id(&self) -> ElementId {
        self.content_id
    }

    pub fn column_template(&self) -> Option<&Arc<dyn ColumnTemplate<K>>> {
        self.template.as_ref()
    }

    /// Replaces the column template. Resets the layout.
    pub fn set_column_template(&mut self, template: Option<Arc<dyn ColumnTemplate<K>>>) {
        let changed = match (&self.template, &template) {
            (Some(a), Some(b)) => !Arc::ptr_eq(a, b),
            (None, None) => false,
            _ => true,
        };
        self.reset_layout(changed);
        self.template = template;
    }

    /// Sets where invalidation notices are sent.
    pub fn set_invalidator(&mut self, invalidator: Option<Invalidator>) {
        self.invalidator = invalidator;
    }

    /// All attached children: the content first, then the overflow columns in chain order.
    pub fn children(&self) -> &Children {
        &self.children
    }

    /// Number of overflow columns currently in the chain.
    pub fn column_count(&self) -> usize {
        self.columns.as_ref().map_or(0, Vec::len)
    }

    /// Returns the overflow column at `index` in the chain.
    pub fn column(&self, index: usize) -> Option<&K> {
        self.columns
            .as_ref()
            .and_then(|columns| columns.get(index))
            .map(|column| &column.element)
    }

    /// Iterates over the overflow columns in chain order.
    pub fn columns(&self) -> impl Iterator<Item = (ElementId, &K)> + '_ {
        self.columns
            .iter()
            .flat_map(|columns| columns.iter())
            .map(|column| (column.id, &column.element))
    }

    /// The size computed by the last measure pass.
    pub fn desired_size(&self) -> Vector2<f64> {
        self.desired_size
    }

    /// Returns true once a measure pass has attached the content.
    pub fn is_built(&self) -> bool {
        self.columns.is_some()
    }

    /// Drops the overflow chain and detaches all children.
    ///
    /// The next measure pass rebuilds everything from scratch.
    pub fn reset(&mut self) {
        self.reset_layout(false);
    }

    /// Resets, notifying the host if anything was built or `changed` is set.
    fn reset_layout(&mut self, changed: bool) {
        let was_built = match self.columns.take() {
            Some(columns) => {
                if let Some(content) = &self.content {
                    content.lock().set_overflow_target(None);
                }
                debug!(columns = columns.len(), "resetting column layout");
                true
            }
            None => false,
        };
        self.children.clear();
        self.desired_size = Vector2::zero();
        if was_built || changed {
            self.notify(Invalidation::Reset);
        }
    }

    /// Measure pass.
    ///
    /// Measures the content against the available size, then adds (or reuses) overflow columns
    /// to the right of it for as long as the last element still overflows and there is width
    /// left. Columns that are no longer needed are removed.
    ///
    /// Negative (or NaN) components are treated as zero; an infinite width means no limit.
    pub fn measure(&mut self, available: Vector2<f64>) -> Vector2<f64> {
        let available = clamp_size(available);

        let content = match &self.content {
            Some(content) => Arc::clone(content),
            None => {
                self.desired_size = Vector2::zero();
                return self.desired_size;
            }
        };

        if self.columns.is_none() {
            self.children.clear();
            self.children.push(self.content_id);
            self.columns = Some(Vec::new());
        }
        let columns = match self.columns.as_mut() {
            Some(columns) => columns,
            None => return self.desired_size,
        };

        let (content_size, mut overflow) = {
            let mut content = content.lock();
            content.measure(available, None);
            (content.desired_size(), content.overflow())
        };
        let mut width = content_size.x;
        let mut height = content_size.y;
        let mut used = 0;

        loop {
            let from = match &overflow {
                Some(from) if width < available.x => from.clone(),
                _ => break,
            };
            let template = match &self.template {
                Some(template) => template,
                None => break,
            };
            if used >= self.config.max_columns {
                warn!(
                    max_columns = self.config.max_columns,
                    "column limit reached with content left over"
                );
                break;
            }

            if used == columns.len() {
                let column = Column {
                    id: ElementId::new(),
                    element: template.instantiate(),
                };
                self.children.push(column.id);
                columns.push(column);
            }

            let target = Some(columns[used].id);
            if used == 0 {
                content.lock().set_overflow_target(target);
            } else {
                columns[used - 1].element.set_overflow_target(target);
            }

            let column = &mut columns[used].element;
            column.measure(Vector2::new(available.x - width, available.y), Some(from));
            let size = column.desired_size();
            width += size.x;
            height = height.max(size.y);
            overflow = column.overflow();
            used += 1;

            trace!(index = used - 1, width = size.x, height = size.y, "measured column");
        }

        let trimmed = columns.len().saturating_sub(used);
        if trimmed > 0 {
            if used == 0 {
                content.lock().set_overflow_target(None);
            } else {
                columns[used - 1].element.set_overflow_target(None);
            }
            columns.truncate(used);
            self.children.truncate(1 + used);
        }

        debug!(
            columns = used,
            trimmed,
            width,
            height,
            overflow = overflow.is_some(),
            "measured column layout"
        );

        self.desired_size = Vector2::new(width, height);
        self.desired_size
    }

    /// Arrange pass.
    ///
    /// Places children left to right at their desired widths, each as tall as `final_size`.
    /// Does not change the children or the chain.
    pub fn arrange(&self, final_size: Vector2<f64>) -> Arrangement {
        let final_size = clamp_size(final_size);
        let mut max_height: f64 = 0.;
        let mut placements = Vec::with_capacity(self.children.len());

        for (index, id) in self.children.iter().enumerate() {
            let desired = match self.child_desired_size(index) {
                Some(size) => size,
                None => continue,
            };
            let x = placements
                .last()
                .map_or(0., |placement: &Placement| placement.bounds.max_x());
            let bounds = Rect::new(Point2::new(x, 0.), Vector2::new(desired.x, final_size.y));
            placements.push(Placement { id: *id, bounds });
            max_height = max_height.max(desired.y);
        }

        let width = placements
            .last()
            .map_or(0., |placement: &Placement| placement.bounds.max_x());
        Arrangement {
            size: Vector2::new(width, max_height),
            placements,
        }
    }

    fn child_desired_size(&self, index: usize) -> Option<Vector2<f64>> {
        if index == 0 {
            self.content
                .as_ref()
                .map(|content| content.lock().desired_size())
        } else {
            self.column(index - 1).map(|column| column.desired_size())
        }
    }

    fn notify(&self, invalidation: Invalidation) {
        if let Some(invalidator) = &self.invalidator {
            if invalidator.send(invalidation).is_err() {
                debug!("host is gone; dropping invalidation");
            }
        }
    }
}

impl<C, K> Default for RichTextColumns<C, K>
where
    C: Flow,
    K: Flow<Cursor = C::Cursor>,
{
    fn default() -> Self {
        RichTextColumns::new()
    }
}

struct DebugifyOption<'a, T>(&'a Option<T>);
impl<'a, T> fmt::Debug for DebugifyOption<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_some() {
            write!(f, "Some(..)")
        } else {
            write!(f, "None")
        }
    }
}

impl<C: fmt::Debug, K: fmt::Debug> fmt::Debug for RichTextColumns<C, K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RichTextColumns")
            .field("config", &self.config)
            .field("content", &self.content)
            .field("template", &DebugifyOption(&self.template))
            .field("columns", &self.columns.as_ref().map(Vec::len))
            .field("children", &self.children)
            .field("desired_size", &self.desired_size)
            .finish()
    }
}

fn clamp_size(size: Vector2<f64>) -> Vector2<f64> {
    // f64::max returns the non-NaN operand
    Vector2::new(size.x.max(0.), size.y.max(0.))
}
