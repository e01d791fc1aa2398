use super::*;

fn assert_covers(plan: &RowPlan, rect: Rect) {
    assert!(!plan.is_empty());
    assert_eq!(plan[0].min_row, rect.y);
    assert_eq!(plan[plan.len() - 1].max_row, rect.bottom());
    for pair in plan.windows(2) {
        assert_eq!(pair[0].max_row, pair[1].min_row);
    }
    for r in plan {
        assert!(r.len() >= 1);
    }
    let total: usize = plan.iter().map(|r| r.len()).sum();
    assert_eq!(total, rect.height as usize);
}

#[test]
fn ranges_are_disjoint_and_cover_the_rect() {
    for height in [1u32, 2, 7, 16, 33, 100] {
        for concurrency in [1usize, 2, 3, 8, 64] {
            let rect = Rect::new(0, 5, 10, height);
            let plan = partition_rows(rect, concurrency, 1);
            assert_covers(&plan, rect);
            assert!(plan.len() <= concurrency);
        }
    }
}

#[test]
fn last_range_absorbs_the_remainder() {
    let plan = partition_rows(Rect::new(0, 0, 4, 10), 3, 1);
    let lens: Vec<usize> = plan.iter().map(|r| r.len()).collect();
    assert_eq!(lens, vec![3, 3, 4]);
}

#[test]
fn min_rows_limits_the_number_of_ranges() {
    let rect = Rect::new(0, 0, 4, 20);
    assert_eq!(partition_rows(rect, 8, 8).len(), 2);
    assert_eq!(partition_rows(rect, 8, 32).len(), 1);
    assert_covers(&partition_rows(rect, 8, 32), rect);
}

#[test]
fn never_more_ranges_than_rows() {
    let rect = Rect::new(0, 2, 4, 3);
    let plan = partition_rows(rect, 16, 1);
    assert_eq!(plan.len(), 3);
    assert_covers(&plan, rect);
}

#[test]
fn empty_rect_has_no_ranges() {
    assert!(partition_rows(Rect::new(0, 0, 4, 0), 4, 1).is_empty());
    assert!(partition_rows(Rect::new(0, 0, 0, 4), 4, 1).is_empty());
}

#[test]
fn zero_concurrency_still_makes_progress() {
    let rect = Rect::new(0, 0, 4, 4);
    assert_covers(&partition_rows(rect, 0, 0), rect);
}
