//! Drives layout passes for a column layout.

use crate::columns::{Arrangement, RichTextColumns};
use crate::element::Flow;
use cgmath::Vector2;
use crossbeam::channel::{self, Receiver, Sender, TryRecvError};
use thiserror::Error;
use tracing::debug;

/// Reasons a layout needs a new pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// The content or the column template was replaced.
    Reset,
    /// The content changed in a way that may change its size.
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("host has been dropped")]
    Disconnected,
}

/// Requests layout passes from a [`Host`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Invalidator {
    sender: Sender<Invalidation>,
}

impl Invalidator {
    pub fn send(&self, invalidation: Invalidation) -> Result<(), HostError> {
        self.sender
            .send(invalidation)
            .map_err(|_| HostError::Disconnected)
    }

    /// Requests a new pass because the content changed.
    pub fn invalidate(&self) -> Result<(), HostError> {
        self.send(Invalidation::Content)
    }
}

/// Owns a column layout and runs measure and arrange passes whenever it is invalidated.
#[derive(Debug)]
pub struct Host<C, K> {
    pub columns: RichTextColumns<C, K>,
    available: Vector2<f64>,
    needs_layout: bool,
    arrangement: Option<Arrangement>,
    sender: Sender<Invalidation>,
    recv: Receiver<Invalidation>,
}

impl<C, K> Host<C, K>
where
    C: Flow,
    K: Flow<Cursor = C::Cursor>,
{
    /// Creates a new Host.
    ///
    /// Layout won’t be performed until you call `poll`.
    pub fn new(mut columns: RichTextColumns<C, K>, available: Vector2<f64>) -> Host<C, K> {
        let (sender, recv) = channel::unbounded();
        columns.set_invalidator(Some(Invalidator {
            sender: sender.clone(),
        }));

        Host {
            columns,
            available,
            needs_layout: true,
            arrangement: None,
            sender,
            recv,
        }
    }

    /// Returns a handle that schedules a new pass when used.
    pub fn invalidator(&self) -> Invalidator {
        Invalidator {
            sender: self.sender.clone(),
        }
    }

    pub fn available(&self) -> Vector2<f64> {
        self.available
    }

    /// Changes the available size and schedules a new pass.
    pub fn resize(&mut self, available: Vector2<f64>) {
        if self.available != available {
            self.available = available;
            self.needs_layout = true;
        }
    }

    /// The result of the most recent pass.
    pub fn arrangement(&self) -> Option<&Arrangement> {
        self.arrangement.as_ref()
    }

    /// Receives all invalidations from the queue and lays out again if there were any.
    ///
    /// Returns true if a pass was performed.
    pub fn poll(&mut self) -> bool {
        loop {
            match self.recv.try_recv() {
                Ok(invalidation) => {
                    debug!(?invalidation, "layout invalidated");
                    self.needs_layout = true;
                }
                Err(TryRecvError::Empty) => break,
                // we hold a sender ourselves
                Err(TryRecvError::Disconnected) => break,
            }
        }

        if !self.needs_layout {
            return false;
        }
        self.needs_layout = false;

        let size = self.columns.measure(self.available);
        self.arrangement = Some(self.columns.arrange(size));
        true
    }
}

#[test]
fn test_host_poll() {
    use crate::element::{shared, ElementId};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Block(f64);
    impl Flow for Block {
        type Cursor = ();
        fn measure(&mut self, _: Vector2<f64>, _: Option<()>) {}
        fn desired_size(&self) -> Vector2<f64> {
            Vector2::new(self.0, self.0)
        }
        fn overflow(&self) -> Option<()> {
            None
        }
        fn set_overflow_target(&mut self, _: Option<ElementId>) {}
    }

    let mut host: Host<Block, Block> =
        Host::new(RichTextColumns::new(), Vector2::new(100., 100.));
    assert!(host.poll(), "first poll should always lay out");
    assert_eq!(host.arrangement().map(|a| a.size), Some(Vector2::new(0., 0.)));
    assert!(!host.poll(), "nothing changed");

    let content = shared(Block(20.));
    host.columns.set_content(Some(Arc::clone(&content)));
    assert!(host.poll(), "replacing content should invalidate");
    assert_eq!(host.arrangement().map(|a| a.size), Some(Vector2::new(20., 20.)));

    content.lock().0 = 30.;
    let invalidator = host.invalidator();
    invalidator.invalidate().expect("host is alive");
    assert!(host.poll());
    assert_eq!(host.arrangement().map(|a| a.size), Some(Vector2::new(30., 30.)));

    host.resize(Vector2::new(100., 100.));
    assert!(!host.poll(), "same size should not schedule a pass");

    drop(host);
    assert_eq!(invalidator.invalidate(), Err(HostError::Disconnected));
}

#[test]
fn test_host_ignores_resets_that_change_nothing() {
    use crate::element::{shared, ElementId};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Block;
    impl Flow for Block {
        type Cursor = ();
        fn measure(&mut self, _: Vector2<f64>, _: Option<()>) {}
        fn desired_size(&self) -> Vector2<f64> {
            Vector2::new(10., 10.)
        }
        fn overflow(&self) -> Option<()> {
            None
        }
        fn set_overflow_target(&mut self, _: Option<ElementId>) {}
    }

    let mut host: Host<Block, Block> = Host::new(RichTextColumns::new(), Vector2::new(50., 50.));
    assert!(host.poll());

    for _ in 0..10 {
        host.columns.set_column_template(None);
        host.columns.set_content(None);
        host.columns.reset();
    }
    assert_eq!(host.recv.len(), 0, "nothing was built or replaced");
    assert!(!host.poll());

    let content = shared(Block);
    host.columns.set_content(Some(Arc::clone(&content)));
    assert_eq!(host.recv.len(), 1);
    assert!(host.poll());

    // built now, so even the same content resets
    host.columns.set_content(Some(Arc::clone(&content)));
    assert_eq!(host.recv.len(), 1);
    host.columns.reset();
    assert_eq!(host.recv.len(), 1, "already reset");
    assert!(host.poll());
}
