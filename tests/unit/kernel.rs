use super::*;
use crate::buffer::PixelBuffer;
use crate::params::FilterParameters;

const DARK: ColorVec = [0.1, 0.1, 0.1, 1.0];
const MID: ColorVec = [0.5, 0.5, 0.5, 1.0];
const BRIGHT: ColorVec = [0.9, 0.9, 0.9, 1.0];

fn bins(levels: usize) -> HistogramBins {
    let mut b = HistogramBins::default();
    b.try_reset_levels(levels).unwrap();
    b
}

fn grid(cells: [[ColorVec; 3]; 3]) -> PixelBuffer<ColorVec> {
    PixelBuffer::from_fn(3, 3, |x, y| cells[y as usize][x as usize]).unwrap()
}

#[test]
fn tie_goes_to_the_bucket_reached_first_in_scan_order() {
    // Four bright and four dark samples: bright reaches four first.
    let buf = grid([
        [BRIGHT, BRIGHT, DARK],
        [BRIGHT, MID, DARK],
        [BRIGHT, DARK, DARK],
    ]);
    let params = FilterParameters::new(3, 3, 3, 3).unwrap();
    let sampler = NeighborhoodSampler::new(&buf, &params);
    let out = filter_pixel(&sampler, &mut bins(3), 1, 1).unwrap();
    assert_eq!(out, [0.9, 0.9, 0.9, 1.0]);

    // Mirrored: dark now reaches four first.
    let buf = grid([
        [DARK, DARK, BRIGHT],
        [DARK, MID, BRIGHT],
        [DARK, BRIGHT, BRIGHT],
    ]);
    let sampler = NeighborhoodSampler::new(&buf, &params);
    let out = filter_pixel(&sampler, &mut bins(3), 1, 1).unwrap();
    assert_eq!(out, [0.1, 0.1, 0.1, 1.0]);
}

#[test]
fn alpha_comes_from_the_center_pixel() {
    let mut cells = [[BRIGHT; 3]; 3];
    cells[1][1] = [0.9, 0.9, 0.9, 0.25];
    cells[0][0] = [0.9, 0.9, 0.9, 0.0];
    let buf = grid(cells);
    let params = FilterParameters::new(3, 4, 3, 3).unwrap();
    let sampler = NeighborhoodSampler::new(&buf, &params);
    let out = filter_pixel(&sampler, &mut bins(4), 1, 1).unwrap();
    assert_eq!(out[3], 0.25);
}

#[test]
fn filter_range_writes_only_rect_columns() {
    let buf = PixelBuffer::from_fn(4, 3, |x, _| if x < 2 { DARK } else { BRIGHT }).unwrap();
    let params = FilterParameters::new(1, 8, 4, 3).unwrap();
    let sampler = NeighborhoodSampler::new(&buf, &params);

    let rect = Rect::new(1, 1, 2, 2);
    let range = RowRange {
        min_row: 1,
        max_row: 3,
    };
    let sentinel = [0.0, 0.0, 0.0, 0.0];
    let mut out = vec![sentinel; 4 * 2];
    let mut staging = vec![[0.0; 4]; 2];
    let written =
        filter_range(&sampler, rect, range, &mut out, &mut staging, &mut bins(8)).unwrap();

    assert_eq!(written, 4);
    for row in out.chunks_exact(4) {
        assert_eq!(row, &[sentinel, DARK, BRIGHT, sentinel]);
    }
}

#[test]
fn filter_range_rejects_mismatched_scratch() {
    let buf = PixelBuffer::filled(4, 4, MID).unwrap();
    let params = FilterParameters::new(3, 4, 4, 4).unwrap();
    let sampler = NeighborhoodSampler::new(&buf, &params);
    let rect = Rect::from_size(4, 4);
    let range = RowRange {
        min_row: 0,
        max_row: 4,
    };
    let mut out = vec![MID; 16];

    let err = filter_range(
        &sampler,
        rect,
        range,
        &mut out,
        &mut vec![[0.0; 4]; 3],
        &mut bins(4),
    )
    .unwrap_err();
    assert!(matches!(err, FilterError::Worker(_)));

    let err = filter_range(
        &sampler,
        rect,
        range,
        &mut out,
        &mut vec![[0.0; 4]; 4],
        &mut bins(2),
    )
    .unwrap_err();
    assert!(matches!(err, FilterError::Worker(_)));

    let err = filter_range(
        &sampler,
        rect,
        range,
        &mut out[..15],
        &mut vec![[0.0; 4]; 4],
        &mut bins(4),
    )
    .unwrap_err();
    assert!(matches!(err, FilterError::Worker(_)));
}
