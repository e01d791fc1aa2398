use super::*;

fn bins(levels: usize) -> HistogramBins {
    let mut b = HistogramBins::default();
    b.try_reset_levels(levels).unwrap();
    b
}

#[test]
fn empty_histogram_has_no_dominant() {
    let b = bins(4);
    assert_eq!(b.levels(), 4);
    assert!(b.dominant().is_none());
}

#[test]
fn dominant_averages_its_bucket() {
    let mut b = bins(3);
    b.add(2, [1.0, 0.5, 0.0, 1.0]);
    b.add(2, [0.5, 0.5, 1.0, 0.0]);
    b.add(0, [0.0, 0.0, 0.0, 1.0]);

    let d = b.dominant().unwrap();
    assert_eq!(d.index, 2);
    assert_eq!(d.count, 2);
    assert_eq!(d.mean_rgb, [0.75, 0.5, 0.5]);
}

#[test]
fn ties_keep_the_bucket_that_reached_the_count_first() {
    let mut b = bins(4);
    b.add(3, [0.9; 4]);
    b.add(1, [0.3; 4]);
    b.add(1, [0.3; 4]);
    b.add(3, [0.9; 4]);
    // Bucket 1 reached two samples first; bucket 3 only ties it.
    assert_eq!(b.dominant().unwrap().index, 1);

    b.add(3, [0.9; 4]);
    assert_eq!(b.dominant().unwrap().index, 3);
}

#[test]
fn clear_resets_counts_and_maximum() {
    let mut b = bins(2);
    b.add(1, [1.0; 4]);
    b.clear();
    assert!(b.dominant().is_none());

    b.add(0, [0.25, 0.25, 0.25, 1.0]);
    let d = b.dominant().unwrap();
    assert_eq!((d.index, d.count), (0, 1));
    assert_eq!(d.mean_rgb, [0.25; 3]);
}

#[test]
fn reset_levels_resizes_and_zeroes() {
    let mut b = bins(8);
    b.add(7, [1.0; 4]);
    b.try_reset_levels(2).unwrap();
    assert_eq!(b.levels(), 2);
    assert!(b.dominant().is_none());
    assert!(b.capacity_bytes() >= HistogramBins::bytes_for_levels(2));
}
