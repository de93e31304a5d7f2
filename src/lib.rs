//! Multi-column text layout.
//!
//! # Conceptual overview
//! A [`RichTextColumns`] layout shows one piece of content (the primary element) and, to the right
//! of it, as many overflow columns as it takes to show whatever did not fit. Columns are made on
//! demand from a column template, so the layout reveals exactly as many columns as are needed to
//! either use up the available width or run out of content.
//!
//! ## Elements
//! Anything that implements [`Flow`] can take part: it is measured against an available size,
//! reports the size it would like, and says where its unshown content begins (if anywhere). An
//! overflow column is measured starting from where its predecessor stopped, which is how the
//! content continues from one column to the next. The primary content is owned by the caller and
//! shared with the layout; overflow columns belong to the layout.
//!
//! ## Layout
//! Layout happens in two passes, as in most UI toolkits: a measure pass, which builds (or trims)
//! the column chain and computes the total size, followed by an arrange pass, which places every
//! child left to right. The arrange pass never changes the chain.
//!
//! Replacing the content or the column template resets the layout, discarding all columns; the
//! next measure pass starts from scratch.
//!
//! ## Coordinate System
//! The origin is at the top left corner of the layout. The y-axis is oriented such that positive
//! y points down.
//!
//! ## Hosts
//! A [`Host`] owns a layout and runs both passes whenever something invalidates it: resets, a
//! change in available size, or an explicit request through an [`Invalidator`].

pub mod children;
mod columns;
mod config;
mod element;
mod host;
mod rect;
pub mod text;

pub use children::{Children, ChildrenError};
pub use columns::{Arrangement, Placement, RichTextColumns};
pub use config::Config;
pub use element::{shared, ColumnTemplate, ElementId, Flow, Shared};
pub use host::{Host, HostError, Invalidation, Invalidator};
pub use rect::Rect;
