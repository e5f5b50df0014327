use super::*;
use crate::reel::tablet::{RenderRequest, TabletContent, TabletFrame};
use crate::surface::SurfaceError;

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

fn store_with(circular: bool, heights: &[u16]) -> (TabletStore, Vec<TabletId>) {
    let mut store = TabletStore::new(circular);
    let mut ids = Vec::new();
    let mut last = None;
    for &h in heights {
        let id = store.insert(Box::new(Fixed(h)), last, None).unwrap();
        ids.push(id);
        last = Some(id);
    }
    (store, ids)
}

fn params(rows: u16) -> LayoutParams {
    LayoutParams {
        rows,
        cols: 20,
        frame_rows: 2,
    }
}

fn rows_of(p: &Placement) -> (u16, u16) {
    (p.rect.y, p.rect.y + p.rect.h)
}

#[test]
fn empty_store_yields_no_placements() {
    let store = TabletStore::new(false);
    assert!(arrange(&store, &params(10), Anchor::Top).is_empty());
}

#[test]
fn zero_area_yields_no_placements() {
    let (store, _) = store_with(false, &[2]);
    assert!(arrange(&store, &params(0), Anchor::Top).is_empty());
    let flat = LayoutParams {
        rows: 10,
        cols: 0,
        frame_rows: 2,
    };
    assert!(arrange(&store, &flat, Anchor::Top).is_empty());
}

#[test]
fn a_lone_tablet_fills_from_the_top() {
    let (store, ids) = store_with(false, &[2]);
    let plan = arrange(&store, &params(10), Anchor::Top);
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].tablet, ids[0]);
    assert_eq!(plan[0].rect, Rect::new(0, 0, 20, 4));
    assert_eq!(plan[0].clip, Clip::None);
    assert_eq!(plan[0].cut, 0);
}

#[test]
fn the_window_pulls_up_when_everything_fits() {
    let (mut store, ids) = store_with(false, &[2, 2]);
    store.set_focus(ids[1]);
    let plan = arrange(&store, &params(10), Anchor::Row(6));
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[0].tablet, ids[0]);
    assert_eq!(rows_of(&plan[0]), (0, 4));
    assert_eq!(plan[1].tablet, ids[1]);
    assert_eq!(rows_of(&plan[1]), (4, 8));
    assert!(plan.iter().all(|p| p.clip == Clip::None));
}

#[test]
fn the_anchor_row_is_preserved_when_content_is_plentiful() {
    let (mut store, ids) = store_with(false, &[2, 2, 2, 2, 2]);
    store.set_focus(ids[2]);
    let plan = arrange(&store, &params(10), Anchor::Row(3));

    assert_eq!(plan.len(), 3);
    assert_eq!(plan[0].tablet, ids[1]);
    assert_eq!(rows_of(&plan[0]), (0, 3));
    assert_eq!(plan[0].clip, Clip::Tail);
    assert_eq!(plan[0].cut, 1);

    assert_eq!(plan[1].tablet, ids[2]);
    assert_eq!(rows_of(&plan[1]), (3, 7));
    assert_eq!(plan[1].clip, Clip::None);

    assert_eq!(plan[2].tablet, ids[3]);
    assert_eq!(rows_of(&plan[2]), (7, 10));
    assert_eq!(plan[2].clip, Clip::Head);
    assert_eq!(plan[2].cut, 1);
}

#[test]
fn the_window_bottom_aligns_at_the_chain_end() {
    let (mut store, ids) = store_with(false, &[2, 2, 2]);
    store.set_focus(ids[2]);
    let plan = arrange(&store, &params(10), Anchor::Row(0));

    assert_eq!(plan.len(), 3);
    assert_eq!(plan[0].tablet, ids[0]);
    assert_eq!(rows_of(&plan[0]), (0, 2));
    assert_eq!(plan[0].clip, Clip::Tail);
    assert_eq!(plan[0].cut, 2);
    assert_eq!(rows_of(&plan[1]), (2, 6));
    assert_eq!(plan[2].tablet, ids[2]);
    assert_eq!(rows_of(&plan[2]), (6, 10));
}

#[test]
fn the_anchor_clamps_so_the_focus_stays_whole() {
    let (mut store, ids) = store_with(false, &[6, 6]);
    store.set_focus(ids[1]);
    let plan = arrange(&store, &params(10), Anchor::Row(9));

    let focus = plan.iter().find(|p| p.tablet == ids[1]).unwrap();
    assert_eq!(rows_of(focus), (2, 10));
    assert_eq!(focus.clip, Clip::None);
    let prev = plan.iter().find(|p| p.tablet == ids[0]).unwrap();
    assert_eq!(rows_of(prev), (0, 2));
    assert_eq!(prev.clip, Clip::Tail);
    assert_eq!(prev.cut, 6);
}

#[test]
fn a_ring_shorter_than_the_viewport_terminates() {
    let (store, ids) = store_with(true, &[2, 2]);
    let plan = arrange(&store, &params(20), Anchor::Top);
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[0].tablet, ids[0]);
    assert_eq!(rows_of(&plan[0]), (0, 4));
    assert_eq!(plan[1].tablet, ids[1]);
    assert_eq!(rows_of(&plan[1]), (4, 8));

    let (lone, lone_ids) = store_with(true, &[2]);
    let plan = arrange(&lone, &params(20), Anchor::Top);
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].tablet, lone_ids[0]);
}

#[test]
fn no_tablet_is_placed_twice() {
    let (store, _) = store_with(true, &[1, 1, 1]);
    let plan = arrange(&store, &params(30), Anchor::Top);
    let mut seen = FxHashSet::default();
    assert!(plan.iter().all(|p| seen.insert(p.tablet)));
    assert_eq!(plan.len(), 3);
}

#[test]
fn zero_content_still_occupies_a_row() {
    let (store, _) = store_with(false, &[0]);
    let frameless = LayoutParams {
        rows: 10,
        cols: 20,
        frame_rows: 0,
    };
    let plan = arrange(&store, &frameless, Anchor::Top);
    assert_eq!(plan[0].rect.h, 1);
}

#[test]
fn an_oversized_tablet_clips_at_the_bottom() {
    let (store, _) = store_with(false, &[30]);
    let plan = arrange(&store, &params(10), Anchor::Top);
    assert_eq!(plan.len(), 1);
    assert_eq!(rows_of(&plan[0]), (0, 10));
    // Content plus frame is 32 rows; 10 are placed, so 22 are hidden
    // below and the tablet reads as head-showing.
    assert_eq!(plan[0].clip, Clip::Head);
    assert_eq!(plan[0].cut, 22);
}

#[test]
fn a_short_chain_never_wraps_or_repeats() {
    let (store, _) = store_with(false, &[1, 1, 1]);
    let plan = arrange(&store, &params(30), Anchor::Top);
    assert_eq!(plan.len(), 3);
    let mut seen = FxHashSet::default();
    assert!(plan.iter().all(|p| seen.insert(p.tablet)));
    for pair in plan.windows(2) {
        assert_eq!(pair[1].rect.y, pair[0].rect.y + pair[0].rect.h);
    }
}
