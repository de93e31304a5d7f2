use cgmath::{Point2, Vector2};
use flowcols::{shared, ColumnTemplate, ElementId, Flow, RichTextColumns, Shared};
use std::sync::Arc;

/// Primary content that needs `pages` more columns to show everything.
#[derive(Debug)]
struct Content {
    pages: Option<usize>,
    size: Vector2<f64>,
    target: Option<ElementId>,
    measured: usize,
}

impl Flow for Content {
    type Cursor = usize;

    fn measure(&mut self, _: Vector2<f64>, from: Option<usize>) {
        assert_eq!(from, None, "content is always measured from the start");
        self.measured += 1;
    }
    fn desired_size(&self) -> Vector2<f64> {
        self.size
    }
    fn overflow(&self) -> Option<usize> {
        self.pages.filter(|pages| *pages > 0)
    }
    fn set_overflow_target(&mut self, target: Option<ElementId>) {
        self.target = target;
    }
}

/// A column that shows one page and passes the rest on.
#[derive(Debug)]
struct Page {
    size: Vector2<f64>,
    available: Option<Vector2<f64>>,
    left: Option<usize>,
    target: Option<ElementId>,
}

impl Flow for Page {
    type Cursor = usize;

    fn measure(&mut self, available: Vector2<f64>, from: Option<usize>) {
        self.available = Some(available);
        self.left = from.map(|pages| pages.saturating_sub(1));
    }
    fn desired_size(&self) -> Vector2<f64> {
        self.size
    }
    fn overflow(&self) -> Option<usize> {
        self.left.filter(|pages| *pages > 0)
    }
    fn set_overflow_target(&mut self, target: Option<ElementId>) {
        self.target = target;
    }
}

fn content(pages: Option<usize>, width: f64, height: f64) -> Shared<Content> {
    shared(Content {
        pages,
        size: Vector2::new(width, height),
        target: None,
        measured: 0,
    })
}

fn pages(width: f64, height: f64) -> Arc<dyn ColumnTemplate<Page>> {
    Arc::new(move || Page {
        size: Vector2::new(width, height),
        available: None,
        left: None,
        target: None,
    })
}

fn layout(
    content: &Shared<Content>,
    template: Option<Arc<dyn ColumnTemplate<Page>>>,
) -> RichTextColumns<Content, Page> {
    let mut columns = RichTextColumns::new();
    columns.set_content(Some(Arc::clone(content)));
    columns.set_column_template(template);
    columns
}

fn child_ids(columns: &RichTextColumns<Content, Page>) -> Vec<ElementId> {
    columns.children().iter().copied().collect()
}

#[test]
fn no_content_measures_to_zero() {
    let mut columns: RichTextColumns<Content, Page> = RichTextColumns::new();
    columns.set_column_template(Some(pages(10., 10.)));

    for available in &[
        Vector2::new(0., 0.),
        Vector2::new(300., 200.),
        Vector2::new(f64::INFINITY, f64::INFINITY),
    ] {
        assert_eq!(columns.measure(*available), Vector2::new(0., 0.));
        assert!(columns.children().is_empty());
        assert!(!columns.is_built());
    }
    assert_eq!(columns.arrange(Vector2::new(300., 200.)).placements, vec![]);
}

#[test]
fn missing_template_caps_at_content() {
    let content = content(Some(usize::MAX), 40., 30.);
    let mut columns = layout(&content, None);

    for _ in 0..3 {
        assert_eq!(columns.measure(Vector2::new(500., 100.)), Vector2::new(40., 30.));
        assert_eq!(columns.children().len(), 1);
        assert_eq!(columns.column_count(), 0);
    }
    assert_eq!(content.lock().measured, 3);
    assert_eq!(content.lock().target, None);
}

#[test]
fn growth_converges_under_stable_inputs() {
    let content = content(Some(3), 40., 30.);
    let mut columns = layout(&content, Some(pages(20., 50.)));

    let size = columns.measure(Vector2::new(500., 100.));
    assert_eq!(size, Vector2::new(100., 50.));
    assert_eq!(columns.column_count(), 3);
    let first = child_ids(&columns);
    assert_eq!(first.len(), 4);

    for _ in 0..4 {
        assert_eq!(columns.measure(Vector2::new(500., 100.)), size);
        assert_eq!(child_ids(&columns), first, "columns should be reused");
    }

    // each link points at the next child
    assert_eq!(content.lock().target, Some(first[1]));
    let targets: Vec<_> = columns.columns().map(|(_, page)| page.target).collect();
    assert_eq!(targets, vec![Some(first[2]), Some(first[3]), None]);
    let ids: Vec<_> = columns.columns().map(|(id, _)| id).collect();
    assert_eq!(ids, first[1..].to_vec());
}

#[test]
fn columns_get_remaining_width() {
    let content = content(Some(2), 40., 30.);
    let mut columns = layout(&content, Some(pages(25., 30.)));
    columns.measure(Vector2::new(100., 70.));

    let available: Vec<_> = columns.columns().map(|(_, page)| page.available).collect();
    assert_eq!(
        available,
        vec![Some(Vector2::new(60., 70.)), Some(Vector2::new(35., 70.))]
    );
}

#[test]
fn width_bounds_growth() {
    let content = content(Some(usize::MAX), 50., 30.);
    let mut columns = layout(&content, Some(pages(200., 30.)));

    let size = columns.measure(Vector2::new(100., 100.));
    assert_eq!(columns.column_count(), 1);
    assert_eq!(columns.children().len(), 2);
    assert_eq!(size, Vector2::new(250., 30.));
    assert!(columns.column(0).map_or(false, |page| page.has_overflow()));
}

#[test]
fn content_filling_the_width_gets_no_columns() {
    let content = content(Some(usize::MAX), 100., 30.);
    let mut columns = layout(&content, Some(pages(10., 30.)));
    assert_eq!(columns.measure(Vector2::new(100., 100.)), Vector2::new(100., 30.));
    assert_eq!(columns.column_count(), 0);
}

#[test]
fn infinite_width_stops_at_column_limit() {
    let content = content(Some(usize::MAX), 10., 10.);
    let mut columns = RichTextColumns::with_config(flowcols::Config::default().with_max_columns(8));
    columns.set_content(Some(Arc::clone(&content)));
    columns.set_column_template(Some(pages(10., 10.)));

    let size = columns.measure(Vector2::new(f64::INFINITY, 10.));
    assert_eq!(columns.column_count(), 8);
    assert_eq!(size, Vector2::new(90., 10.));
}

#[test]
fn shrinks_on_remeasure() {
    let content = content(Some(4), 40., 30.);
    let mut columns = layout(&content, Some(pages(20., 30.)));
    columns.measure(Vector2::new(500., 100.));
    let before = child_ids(&columns);
    assert_eq!(before.len(), 5);

    content.lock().pages = Some(2);
    let size = columns.measure(Vector2::new(500., 100.));
    assert_eq!(size, Vector2::new(80., 30.));
    assert_eq!(columns.column_count(), 2);
    assert_eq!(child_ids(&columns), before[..3].to_vec());
    assert_eq!(columns.column(1).and_then(|page| page.target), None);
    assert_eq!(columns.column(0).and_then(|page| page.target), Some(before[2]));

    // growing again makes new columns after the kept ones
    content.lock().pages = Some(3);
    columns.measure(Vector2::new(500., 100.));
    let after = child_ids(&columns);
    assert_eq!(after[..3], before[..3]);
    assert_ne!(after[3], before[3]);
    assert_eq!(columns.column(1).and_then(|page| page.target), Some(after[3]));
}

#[test]
fn shrinking_to_no_columns_clears_content_link() {
    let content = content(Some(2), 40., 30.);
    let mut columns = layout(&content, Some(pages(20., 30.)));
    columns.measure(Vector2::new(500., 100.));
    assert!(content.lock().target.is_some());

    content.lock().pages = None;
    assert_eq!(columns.measure(Vector2::new(500., 100.)), Vector2::new(40., 30.));
    assert_eq!(columns.column_count(), 0);
    assert_eq!(child_ids(&columns), vec![columns.content_id()]);
    assert_eq!(content.lock().target, None);
}

#[test]
fn arrange_is_read_only() {
    let content = content(Some(3), 40., 30.);
    let mut columns = layout(&content, Some(pages(20., 50.)));
    let measured = columns.measure(Vector2::new(500., 100.));
    let children = child_ids(&columns);

    let arrangement = columns.arrange(Vector2::new(500., 80.));
    assert_eq!(arrangement.size, measured);

    let total: f64 = arrangement.placements.iter().map(|p| p.bounds.size.x).sum();
    assert_eq!(total, measured.x);
    let mut x = 0.;
    for (placement, id) in arrangement.placements.iter().zip(&children) {
        assert_eq!(placement.id, *id);
        assert_eq!(placement.bounds.origin, Point2::new(x, 0.));
        assert_eq!(placement.bounds.size.y, 80.);
        x += placement.bounds.size.x;
    }

    assert_eq!(columns.arrange(Vector2::new(500., 80.)), arrangement);
    assert_eq!(child_ids(&columns), children);
    assert_eq!(columns.column_count(), 3);
}

#[test]
fn reset_clears_state() {
    let first = content(Some(3), 40., 30.);
    let mut columns = layout(&first, Some(pages(20., 30.)));
    columns.measure(Vector2::new(500., 100.));
    assert_eq!(columns.children().len(), 4);

    let second = content(Some(1), 60., 30.);
    columns.set_content(Some(Arc::clone(&second)));
    assert!(columns.children().is_empty());
    assert_eq!(columns.column_count(), 0);
    assert!(!columns.is_built());
    assert_eq!(first.lock().target, None, "old content should be unlinked");

    assert_eq!(columns.measure(Vector2::new(500., 100.)), Vector2::new(80., 30.));
    let children = child_ids(&columns);
    assert_eq!(children.len(), 2);
    assert_eq!(children[0], columns.content_id());

    columns.set_column_template(Some(pages(30., 30.)));
    assert!(columns.children().is_empty());
    assert_eq!(columns.measure(Vector2::new(500., 100.)), Vector2::new(90., 30.));
    assert_ne!(child_ids(&columns)[1], children[1], "columns should be rebuilt");
}
