use multidimension::{View, Array};

use super::{Grid, Haar};

//----------------------------------------------------------------------

/// Applies an orthonormal decorrelating transform to one row of tiles.
///
/// The transform is equivalent to the following algorithm:
/// - For `b` in `[true, false]`:
///   - Let `low[i]` mean `hs[i][b][false]`
///   - Let `high[i]` mean `hs[i][b][true]`.
///   - For each even `i`, swap `low[i]` with `high[i]`.
///   - Let `ring` be the cyclic concatenation of `low` with the reverse of
///     `high`.
///   - For each even `i`, mix `ring[i]` with `ring[i+1]`.
///   - For each even `i`, mix `ring[i]` with `ring[i-1]`.
///   - Undo the cyclic concatenation.
///   - Undo the swaps.
///
/// In the above, "mix x with y" means rotate the vector `(x, y)` by
/// `atan(1/8)`. Every step is a rotation, so the whole pass is orthonormal
/// and exactly invertible.
///
/// - IS_INVERSE - `true` for the inverse transform.
pub fn smooth<const IS_INVERSE: bool>(hs: &mut [Haar]) {
    let n = hs.len();
    // a = 1.0 / 16.0
    let cos = 0.9980475107000991; // cos(a)
    let sin = 0.0624593178423802; // sin(a)
    let sin = if IS_INVERSE { -sin } else { sin };
    let mut rotate = |x: usize, y: usize, is_x_high: bool| {
        for b in [false, true] {
            let old_x = hs[x][(b, is_x_high)];
            let old_y = hs[y][(b, !is_x_high)];
            hs[x][(b, is_x_high)] = cos * old_x + sin * old_y;
            hs[y][(b, !is_x_high)] = cos * old_y - sin * old_x;
        }
    };
    for start in [0, 1, 1, 0] {
        let mut i = start;
        if i == 0 {
            rotate(i, i, false);
            i += 2;
        }
        while i < n {
            rotate(i-1, i, false);
            rotate(i-1, i, true);
            i += 2;
        }
        if i == n {
            rotate(i-1, i-1, true);
        }
    }
}

fn smooth_columns<const IS_INVERSE: bool>(tiles: Array<Grid, Haar>) -> Array<Grid, Haar> {
    let (height, _) = tiles.size();
    tiles.columns::<usize, usize>().map(|column| {
        let mut column: Array<usize, Haar> = column.map(Haar::transpose).collect();
        smooth::<IS_INVERSE>(column.as_mut());
        column
    }).nested_collect(height)
}

/// Applies [`smooth()`] along both axes of a grid of tiles.
pub fn smooth_grid<const IS_INVERSE: bool>(tiles: Array<Grid, Haar>) -> Array<Grid, Haar> {
    let tiles = smooth_columns::<IS_INVERSE>(tiles);
    let tiles = smooth_columns::<IS_INVERSE>(tiles);
    tiles
}

//----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let mut hs: [Haar; 3] = [
            Haar::new(1.25, 1.0, 2.5, 5.75),
            Haar::new(9.25, 3.0, 4.5, 4.75),
            Haar::new(25.25, 5.0, 8.5, 1.75),
        ];
        let old_hs = hs.clone();
        smooth::<false>(&mut hs);
        smooth::<true>(&mut hs);
        for i in 0..3 {
            for bb in [(false, false), (false, true), (true, false), (true, true)] {
                assert!((hs[i][bb] - old_hs[i][bb]).abs() < 0.00001);
            };
        }
    }

    #[test]
    fn energy_preserved() {
        let mut hs: [Haar; 4] = [
            Haar::new(0.5, -1.0, 2.0, 0.25),
            Haar::new(3.0, 0.0, -0.5, 1.5),
            Haar::new(-2.25, 4.0, 0.75, -1.0),
            Haar::new(1.0, 1.0, 1.0, 1.0),
        ];
        let before: f32 = hs.iter().map(|h| h.energy()).sum();
        smooth::<false>(&mut hs);
        let after: f32 = hs.iter().map(|h| h.energy()).sum();
        assert!((before - after).abs() < 1e-4);
    }

    #[test]
    fn ramp() {
        let mut hs: [Haar; 8] = (0..8).map(|x| {
            let x = x as f32 * 2.0;
            Haar::new(x, x + 1.0, x - 15.0, x - 14.0)
        }).map(Haar::transform).collect::<Vec<_>>().try_into().unwrap();
        smooth::<false>(&mut hs);
        // In the middle of a linear ramp the high coefficients vanish.
        for x in 3..5 {
            let h = &hs[x];
            let x = x as f32 * 4.0;
            assert!((x - 14.0 - h[(false, false)]).abs() < 0.02);
            assert!(h[(false, true)].abs() < 0.02);
            assert!((15.0 - h[(true, false)]).abs() < 0.02);
            assert!(h[(true, true)].abs() < 0.02);
        }
    }
}
