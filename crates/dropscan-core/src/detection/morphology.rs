use ndarray::Array2;

/// Morphological opening with a 3x3 square kernel: `iterations` erosions
/// followed by `iterations` dilations.
///
/// Removes foreground specks narrower than the opened kernel while preserving
/// larger regions. Pixels outside the image never affect the result, so a
/// blob touching the border is not eroded from that side.
pub fn morphological_opening(mask: &Array2<bool>, iterations: usize) -> Array2<bool> {
    let mut result = mask.clone();
    for _ in 0..iterations {
        result = erode(&result);
    }
    for _ in 0..iterations {
        result = dilate(&result);
    }
    result
}

/// Binary erosion: a pixel stays true only if every in-bounds pixel of its
/// 3x3 neighborhood is true.
pub fn erode(mask: &Array2<bool>) -> Array2<bool> {
    let (h, w) = mask.dim();
    let mut result = Array2::from_elem((h, w), false);

    for row in 0..h {
        for col in 0..w {
            if !mask[[row, col]] {
                continue;
            }
            result[[row, col]] = neighbors(row, col, h, w).all(|(r, c)| mask[[r, c]]);
        }
    }

    result
}

/// Binary dilation: a pixel becomes true if any in-bounds pixel of its 3x3
/// neighborhood is true.
pub fn dilate(mask: &Array2<bool>) -> Array2<bool> {
    let (h, w) = mask.dim();
    let mut result = Array2::from_elem((h, w), false);

    for row in 0..h {
        for col in 0..w {
            result[[row, col]] = neighbors(row, col, h, w).any(|(r, c)| mask[[r, c]]);
        }
    }

    result
}

fn neighbors(row: usize, col: usize, h: usize, w: usize) -> impl Iterator<Item = (usize, usize)> {
    let rows = row.saturating_sub(1)..=(row + 1).min(h - 1);
    rows.flat_map(move |r| {
        let cols = col.saturating_sub(1)..=(col + 1).min(w - 1);
        cols.map(move |c| (r, c))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(mask: &Array2<bool>) -> usize {
        mask.iter().filter(|&&v| v).count()
    }

    #[test]
    fn test_opening_removes_speck() {
        let mut mask = Array2::from_elem((20, 20), false);
        mask[[3, 3]] = true;
        mask[[3, 4]] = true;
        for row in 8..16 {
            for col in 8..16 {
                mask[[row, col]] = true;
            }
        }
        let opened = morphological_opening(&mask, 2);
        assert!(!opened[[3, 3]]);
        assert_eq!(count(&opened), 64);
    }

    #[test]
    fn test_opening_keeps_border_blob() {
        let mut mask = Array2::from_elem((12, 12), false);
        for row in 0..8 {
            for col in 0..8 {
                mask[[row, col]] = true;
            }
        }
        let opened = morphological_opening(&mask, 2);
        assert_eq!(opened, mask);
    }

    #[test]
    fn test_zero_iterations_is_identity() {
        let mut mask = Array2::from_elem((5, 5), false);
        mask[[2, 2]] = true;
        assert_eq!(morphological_opening(&mask, 0), mask);
    }
}
