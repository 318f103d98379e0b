//! Star-row rendering for ratings.

pub const FILLED_STAR: char = '★';
pub const EMPTY_STAR: char = '☆';
pub const STAR_SLOTS: usize = 5;

/// Filled and empty slot counts for a (possibly fractional) rating.
///
/// Rounds half away from zero and clamps to `0..=5`; NaN renders as zero.
pub fn star_counts(rating: f64) -> (usize, usize) {
    let filled = if rating.is_nan() {
        0
    } else {
        rating.round().clamp(0.0, STAR_SLOTS as f64) as usize
    };
    (filled, STAR_SLOTS - filled)
}

/// Five glyphs: `★` for each filled slot followed by `☆` for the rest.
pub fn render_stars(rating: f64) -> String {
    let (filled, empty) = star_counts(rating);
    std::iter::repeat(FILLED_STAR)
        .take(filled)
        .chain(std::iter::repeat(EMPTY_STAR).take(empty))
        .collect()
}
