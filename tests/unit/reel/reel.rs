use super::*;
use crate::core::style::{Color, Mod};
use crate::surface::test::{FailPoint, SurfaceOp, TestSurface};

struct Fixed(u16);

impl TabletContent for Fixed {
    fn content_rows(&self, _max_hint: u16) -> u16 {
        self.0
    }

    fn render(
        &mut self,
        _frame: &mut TabletFrame<'_>,
        _req: RenderRequest,
    ) -> Result<(), SurfaceError> {
        Ok(())
    }
}

fn fixed(rows: u16) -> Box<dyn TabletContent> {
    Box::new(Fixed(rows))
}

fn reel_on(s: &mut TestSurface, opts: ReelOptions) -> Reel {
    let parent = s.create_region(Rect::new(0, 0, 20, 12)).unwrap();
    Reel::create(s, parent, opts).unwrap()
}

fn chain_of(s: &mut TestSurface, reel: &mut Reel, n: usize) -> Vec<TabletId> {
    let mut ids = Vec::new();
    let mut last = None;
    for _ in 0..n {
        let id = reel.insert_tablet(s, fixed(2), last, None).unwrap();
        ids.push(id);
        last = Some(id);
    }
    ids
}

#[test]
fn circular_without_infinite_scroll_is_rejected() {
    let opts = ReelOptions {
        circular: true,
        ..ReelOptions::default()
    };
    let mut s = TestSurface::new(20, 12);
    let parent = s.create_region(Rect::new(0, 0, 20, 12)).unwrap();
    assert!(matches!(
        Reel::create(&mut s, parent, opts),
        Err(ReelError::InvalidOptions(_))
    ));
}

#[test]
fn out_of_domain_masks_are_rejected() {
    let opts = ReelOptions {
        tablet_border_mask: Edges::from_bits(0b10_0000),
        ..ReelOptions::default()
    };
    let mut s = TestSurface::new(20, 12);
    let parent = s.create_region(Rect::new(0, 0, 20, 12)).unwrap();
    assert!(matches!(
        Reel::create(&mut s, parent, opts),
        Err(ReelError::InvalidOptions(_))
    ));
}

#[test]
fn insets_leaving_no_area_fail_creation() {
    let opts = ReelOptions {
        left_cols: 10,
        right_cols: 10,
        ..ReelOptions::default()
    };
    let mut s = TestSurface::new(20, 12);
    let parent = s.create_region(Rect::new(0, 0, 20, 12)).unwrap();
    assert!(matches!(
        Reel::create(&mut s, parent, opts),
        Err(ReelError::InsufficientArea)
    ));
}

#[test]
fn an_undersized_viewport_draws_nothing() {
    let opts = ReelOptions {
        min_rows: 20,
        ..ReelOptions::default()
    };
    let mut s = TestSurface::new(20, 12);
    let mut reel = reel_on(&mut s, opts);
    assert_eq!(s.draw_op_count(), 0);

    reel.insert_tablet(&mut s, fixed(2), None, None).unwrap();
    assert_eq!(s.draw_op_count(), 0);
    assert_eq!(reel.tablet_count(), 1);
}

#[test]
fn an_insertion_survives_a_failed_redraw() {
    let mut s = TestSurface::new(20, 12);
    let mut reel = reel_on(&mut s, ReelOptions::default());
    s.fail_next(FailPoint::Flush);
    let err = reel
        .insert_tablet(&mut s, fixed(2), None, None)
        .unwrap_err();
    assert!(matches!(err, ReelError::Surface(_)));
    assert_eq!(reel.tablet_count(), 1);
    assert!(reel.focused().is_some());

    // The next redraw repairs the frame.
    reel.redraw(&mut s).unwrap();
}

#[test]
fn rejected_insertions_leave_the_collection_alone() {
    let mut s = TestSurface::new(20, 12);
    let mut reel = reel_on(&mut s, ReelOptions::default());
    let ids = chain_of(&mut s, &mut reel, 3);
    let err = reel
        .insert_tablet(&mut s, fixed(2), Some(ids[0]), Some(ids[2]))
        .unwrap_err();
    assert!(matches!(err, ReelError::Rejected));
    assert_eq!(reel.tablet_count(), 3);
}

#[test]
fn removal_moves_the_focus_to_the_successor() {
    let mut s = TestSurface::new(20, 12);
    let mut reel = reel_on(&mut s, ReelOptions::default());
    let ids = chain_of(&mut s, &mut reel, 3);
    assert_eq!(reel.focused(), Some(ids[0]));

    reel.remove_focused(&mut s).unwrap();
    assert_eq!(reel.focused(), Some(ids[1]));
    reel.remove_tablet(&mut s, ids[2]).unwrap();
    assert_eq!(reel.focused(), Some(ids[1]));
    reel.remove_focused(&mut s).unwrap();
    assert_eq!(reel.focused(), None);
    assert!(matches!(
        reel.remove_focused(&mut s),
        Err(ReelError::Empty)
    ));
}

#[test]
fn removing_a_stale_handle_reports_not_found() {
    let mut s = TestSurface::new(20, 12);
    let mut reel = reel_on(&mut s, ReelOptions::default());
    let ids = chain_of(&mut s, &mut reel, 2);
    reel.remove_tablet(&mut s, ids[0]).unwrap();
    assert!(matches!(
        reel.remove_tablet(&mut s, ids[0]),
        Err(ReelError::NotFound)
    ));
}

#[test]
fn navigation_saturates_at_the_chain_end() {
    let mut s = TestSurface::new(20, 12);
    let mut reel = reel_on(&mut s, ReelOptions::default());
    let ids = chain_of(&mut s, &mut reel, 3);
    reel.navigate(&mut s, Direction::Next, 10).unwrap();
    assert_eq!(reel.focused(), Some(ids[2]));
    reel.navigate(&mut s, Direction::Prev, 10).unwrap();
    assert_eq!(reel.focused(), Some(ids[0]));
}

#[test]
fn circular_navigation_wraps() {
    let opts = ReelOptions {
        infinite_scroll: true,
        circular: true,
        ..ReelOptions::default()
    };
    let mut s = TestSurface::new(20, 12);
    let mut reel = reel_on(&mut s, opts);
    let ids = chain_of(&mut s, &mut reel, 3);
    reel.navigate(&mut s, Direction::Prev, 1).unwrap();
    assert_eq!(reel.focused(), Some(ids[2]));
    reel.navigate(&mut s, Direction::Next, 4).unwrap();
    assert_eq!(reel.focused(), Some(ids[0]));
}

#[test]
fn navigating_a_lone_tablet_touches_nothing() {
    let mut s = TestSurface::new(20, 12);
    let mut reel = reel_on(&mut s, ReelOptions::default());
    let ids = chain_of(&mut s, &mut reel, 1);
    s.clear_ops();
    reel.navigate(&mut s, Direction::Next, 1).unwrap();
    assert!(s.ops().is_empty());
    assert_eq!(reel.focused(), Some(ids[0]));
}

#[test]
fn navigating_an_empty_reel_is_fine() {
    let mut s = TestSurface::new(20, 12);
    let mut reel = reel_on(&mut s, ReelOptions::default());
    reel.navigate(&mut s, Direction::Next, 1).unwrap();
    assert_eq!(reel.focused(), None);
}

#[test]
fn page_navigation_skips_the_fully_visible_tablets() {
    let mut s = TestSurface::new(20, 12);
    let mut reel = reel_on(&mut s, ReelOptions::default());
    // Two tablets fit whole, the third is clipped, so a page is two.
    let ids = chain_of(&mut s, &mut reel, 3);
    reel.navigate_page(&mut s, Direction::Next).unwrap();
    assert_eq!(reel.focused(), Some(ids[2]));
}

#[test]
fn redraws_reuse_tablet_regions() {
    let mut s = TestSurface::new(20, 12);
    let mut reel = reel_on(&mut s, ReelOptions::default());
    chain_of(&mut s, &mut reel, 2);
    s.clear_ops();
    reel.navigate(&mut s, Direction::Next, 1).unwrap();
    assert!(!s
        .ops()
        .iter()
        .any(|op| matches!(op, SurfaceOp::CreateRegion { .. })));
}

#[test]
fn a_failed_move_restores_the_viewport() {
    let mut s = TestSurface::new(40, 20);
    let parent = s.create_region(Rect::new(0, 0, 20, 12)).unwrap();
    let mut reel = Reel::create(&mut s, parent, ReelOptions::default()).unwrap();
    chain_of(&mut s, &mut reel, 2);

    s.fail_next(FailPoint::MoveRegion);
    let err = reel.move_to(&mut s, 5, 5).unwrap_err();
    assert!(matches!(err, ReelError::Surface(_)));
    assert_eq!(
        s.region_bounds(reel.viewport).unwrap(),
        Rect::new(0, 0, 20, 12)
    );
}

#[test]
fn a_successful_move_relocates_the_viewport() {
    let mut s = TestSurface::new(40, 20);
    let parent = s.create_region(Rect::new(0, 0, 20, 12)).unwrap();
    let mut reel = Reel::create(&mut s, parent, ReelOptions::default()).unwrap();
    chain_of(&mut s, &mut reel, 1);

    reel.move_to(&mut s, 5, 5).unwrap();
    assert_eq!(
        s.region_bounds(reel.viewport).unwrap(),
        Rect::new(5, 5, 20, 12)
    );
}

#[test]
fn the_focused_frame_overlays_the_base_style() {
    let opts = ReelOptions {
        tablet_border_style: Style::default().fg(Color::Indexed(4)),
        focused_border_style: Style::default().add_mod(Mod::BOLD),
        ..ReelOptions::default()
    };
    let mut s = TestSurface::new(20, 12);
    let mut reel = reel_on(&mut s, opts);
    chain_of(&mut s, &mut reel, 2);

    // Focused tablet's corner keeps the base color and gains the overlay.
    let focused = s.screen().cell(1, 1).unwrap().style;
    assert_eq!(focused.fg, Some(Color::Indexed(4)));
    assert!(focused.mods.contains(Mod::BOLD));

    let other = s.screen().cell(1, 5).unwrap().style;
    assert_eq!(other.fg, Some(Color::Indexed(4)));
    assert!(!other.mods.contains(Mod::BOLD));
}

#[test]
fn destroy_releases_every_region() {
    let mut s = TestSurface::new(20, 12);
    let mut reel = reel_on(&mut s, ReelOptions::default());
    chain_of(&mut s, &mut reel, 2);
    s.clear_ops();
    reel.destroy(&mut s).unwrap();
    let destroys = s
        .ops()
        .iter()
        .filter(|op| matches!(op, SurfaceOp::DestroyRegion))
        .count();
    assert_eq!(destroys, 3);
}

#[test]
fn destroy_keeps_releasing_after_a_failure() {
    let mut s = TestSurface::new(20, 12);
    let mut reel = reel_on(&mut s, ReelOptions::default());
    chain_of(&mut s, &mut reel, 2);
    s.clear_ops();

    s.fail_next(FailPoint::DestroyRegion);
    let err = reel.destroy(&mut s).unwrap_err();
    assert!(matches!(err, ReelError::Surface(_)));

    // The failure is reported, but every region was still attempted.
    let destroys = s
        .ops()
        .iter()
        .filter(|op| matches!(op, SurfaceOp::DestroyRegion))
        .count();
    assert_eq!(destroys, 3);
}
