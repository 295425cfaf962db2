use std::fmt;

use dunder_core::{DispatchResult, Failure};

/// `start:stop:step` with every bound optional, the key sequences accept
/// besides integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Slice {
    pub start: Option<i64>,
    pub stop: Option<i64>,
    pub step: Option<i64>,
}

impl Slice {
    pub fn new(start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Self {
        Self { start, stop, step }
    }

    /// Clamp the bounds against a sequence of `len` elements.
    ///
    /// Returns `(start, stop, step)` with negative bounds counted from the end
    /// and out of range bounds clipped, the way `slice.indices` does.
    pub fn indices(&self, len: usize) -> DispatchResult<(i64, i64, i64)> {
        let step = self.step.unwrap_or(1);

        if step == 0 {
            return Failure::invalid_arguments("slice step cannot be zero").into();
        }

        let len = i64::try_from(len).unwrap_or(i64::MAX);
        let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };

        let clamp = |bound: Option<i64>, default: i64| match bound {
            None => default,
            Some(n) if n < 0 => n.saturating_add(len).max(lower),
            Some(n) => n.min(upper),
        };

        let (start, stop) = if step < 0 {
            (clamp(self.start, upper), clamp(self.stop, lower))
        } else {
            (clamp(self.start, lower), clamp(self.stop, upper))
        };

        Ok((start, stop, step))
    }

    /// The positions this slice selects from a sequence of `len` elements, in order.
    pub fn positions(&self, len: usize) -> DispatchResult<impl Iterator<Item = usize>> {
        let (start, stop, step) = self.indices(len)?;

        // widened so `i64::MIN` steps and far apart bounds cannot overflow.
        let (start, stop, step) = (start as i128, stop as i128, step as i128);

        let count = match step.signum() {
            1 if stop > start => (stop - start - 1) / step + 1,
            -1 if start > stop => (start - stop - 1) / -step + 1,
            _ => 0,
        };

        Ok((0..count).map(move |k| (start + k * step) as usize))
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |b: Option<i64>| b.map_or_else(|| "None".to_owned(), |n| n.to_string());

        write!(
            f,
            "slice({}, {}, {})",
            bound(self.start),
            bound(self.stop),
            bound(self.step)
        )
    }
}

#[cfg(test)]
mod tests {
    use dunder_core::ErrorKind;

    use super::*;

    fn picked(slice: Slice, len: usize) -> Vec<usize> {
        slice.positions(len).unwrap().collect()
    }

    #[test]
    fn bounds_are_clamped() {
        assert_eq!(picked(Slice::new(Some(0), Some(3), None), 10), [0, 1, 2]);
        assert_eq!(picked(Slice::new(Some(8), Some(100), None), 10), [8, 9]);
        assert_eq!(picked(Slice::new(Some(-2), None, None), 10), [8, 9]);
        assert_eq!(picked(Slice::new(Some(-100), Some(2), None), 10), [0, 1]);
        assert_eq!(picked(Slice::new(Some(0), Some(10), Some(4)), 10), [0, 4, 8]);
        assert!(picked(Slice::new(Some(5), Some(2), None), 10).is_empty());
        assert!(picked(Slice::default(), 0).is_empty());
    }

    #[test]
    fn negative_steps_walk_backwards() {
        assert_eq!(picked(Slice::new(None, None, Some(-1)), 4), [3, 2, 1, 0]);
        assert_eq!(picked(Slice::new(Some(-1), Some(0), Some(-2)), 6), [5, 3, 1]);
        assert_eq!(picked(Slice::new(None, None, Some(i64::MIN)), 3), [2]);
    }

    #[test]
    fn zero_step() {
        let err = Slice::new(None, None, Some(0)).indices(3).unwrap_err();

        assert_eq!(err.kind, ErrorKind::InvalidArguments);
    }

    #[test]
    fn display() {
        assert_eq!(Slice::new(Some(0), Some(10), Some(2)).to_string(), "slice(0, 10, 2)");
        assert_eq!(Slice::default().to_string(), "slice(None, None, None)");
    }
}
