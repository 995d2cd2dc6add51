//! Next/previous targets for column navigation.

/// Columns that the next and previous buttons jump to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavIndexes {
    pub next: usize,
    pub prev: usize,
}

impl NavIndexes {
    /// Compute the targets around `active` in a table of `count` columns.
    ///
    /// Stepping skips the sticky column (`sticky == 0` means none) and wraps at
    /// either end. When the wrapped target lands on the sticky column it moves
    /// one more step in the same direction, so navigation never targets the
    /// sticky column.
    pub fn compute(active: usize, sticky: usize, count: usize) -> Self {
        let next_delta = if active + 1 == sticky { 2 } else { 1 };
        let prev_delta = if active.checked_sub(1) == Some(sticky) {
            2
        } else {
            1
        };

        let mut next = if active + next_delta <= count {
            active + next_delta
        } else {
            1
        };
        if next == sticky {
            next = step_forward(next, count);
        }

        let mut prev = match active.checked_sub(prev_delta) {
            Some(prev) if prev > 0 => prev,
            _ => count,
        };
        if prev == sticky {
            prev = step_back(prev, count);
        }

        Self { next, prev }
    }
}

fn step_forward(index: usize, count: usize) -> usize {
    if index < count {
        index + 1
    } else {
        1
    }
}

fn step_back(index: usize, count: usize) -> usize {
    if index > 1 {
        index - 1
    } else {
        count
    }
}
