//! Small numeric helpers shared by the scorers and the assignment step.

/// Returns the index and value of the first minimum in `values`.
///
/// Ties resolve to the lowest index, matching a row-major scan. Values are
/// compared with `<`, so inputs are expected to be NaN-free.
pub(crate) fn first_min<T: PartialOrd + Copy>(values: &[T]) -> Option<(usize, T)> {
    let mut best: Option<(usize, T)> = None;
    for (idx, &value) in values.iter().enumerate() {
        match best {
            None => best = Some((idx, value)),
            Some((_, current)) if value < current => best = Some((idx, value)),
            _ => {}
        }
    }
    best
}

/// Integer division rounding towards positive infinity.
pub(crate) fn ceil_div(num: u32, den: u32) -> u32 {
    debug_assert!(den > 0);
    num.div_ceil(den)
}
