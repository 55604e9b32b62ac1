use crate::core::{Sample, Ticks};

/// Iteration budget of [`index_from_timestamp`].
pub const MAX_SEARCH_ITERATIONS: usize = 100;

/// Floor-biased bounded binary search over a timestamp-sorted cell.
///
/// Starting from `[start_index, len - 1]`, the bracket is halved until the
/// midpoint collides with one of its ends, at which point the lower end is
/// returned. An exact timestamp hit returns that index immediately.
///
/// Compatibility notes:
/// - when `timestamp` equals the last sample of the bracket, the lower
///   neighbour is returned, not the exact match;
/// - when the iteration budget runs out the result is `0`, not the best
///   bracket found. The budget is only reachable for astronomically large
///   cells, but callers must not treat `0` as proof that `timestamp` precedes
///   the first sample.
#[must_use]
pub fn index_from_timestamp(samples: &[Sample], timestamp: Ticks, start_index: usize) -> usize {
    let Some(last_index) = samples.len().checked_sub(1) else {
        return 0;
    };

    let mut first = start_index.min(last_index);
    let mut last = last_index;

    for _ in 0..MAX_SEARCH_ITERATIONS {
        let current = first + (last - first) / 2;
        if current == first || current == last {
            return first;
        }

        let current_timestamp = samples[current].timestamp;
        if current_timestamp == timestamp {
            return current;
        }
        if current_timestamp < timestamp {
            first = current;
        } else {
            last = current;
        }
    }

    0
}

/// Lazy consecutive-pair filter over an index range of a cell.
///
/// The first sample of the range is always yielded; every following sample is
/// yielded only when `predicate(current, previous_yielded)` holds. The iterator
/// is consumed as it goes; build a new one to restart.
pub struct FilteredSamples<'a, P>
where
    P: FnMut(&Sample, &Sample) -> bool,
{
    samples: &'a [Sample],
    next: usize,
    end: usize,
    previous: Option<&'a Sample>,
    predicate: P,
}

impl<'a, P> FilteredSamples<'a, P>
where
    P: FnMut(&Sample, &Sample) -> bool,
{
    /// `first_index..=last_index` is clamped to the cell.
    pub fn new(samples: &'a [Sample], first_index: usize, last_index: usize, predicate: P) -> Self {
        let end = last_index.saturating_add(1).min(samples.len());
        Self {
            samples,
            next: first_index.min(end),
            end,
            previous: None,
            predicate,
        }
    }
}

impl<'a, P> Iterator for FilteredSamples<'a, P>
where
    P: FnMut(&Sample, &Sample) -> bool,
{
    type Item = &'a Sample;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.end {
            let current = &self.samples[self.next];
            self.next += 1;

            let keep = match self.previous {
                None => true,
                Some(previous) => (self.predicate)(current, previous),
            };
            if keep {
                self.previous = Some(current);
                return Some(current);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.end - self.next))
    }
}

#[cfg(test)]
mod tests {
    use super::index_from_timestamp;
    use crate::core::Sample;
    use nalgebra::Vector3;

    fn cell(timestamps: &[i64]) -> Vec<Sample> {
        timestamps
            .iter()
            .map(|&t| Sample::at(Vector3::zeros(), t))
            .collect()
    }

    #[test]
    fn empty_and_single_sample_cells_return_zero() {
        assert_eq!(index_from_timestamp(&[], 10, 0), 0);
        assert_eq!(index_from_timestamp(&cell(&[5]), 10, 0), 0);
    }

    #[test]
    fn exact_interior_hit_returns_match() {
        let samples = cell(&[0, 10, 20, 30, 40]);
        assert_eq!(index_from_timestamp(&samples, 20, 0), 2);
    }

    #[test]
    fn last_sample_returns_lower_neighbour() {
        let samples = cell(&[0, 10, 20]);
        assert_eq!(index_from_timestamp(&samples, 20, 0), 1);
    }

    #[test]
    fn start_index_past_the_end_is_clamped() {
        let samples = cell(&[0, 10, 20]);
        assert_eq!(index_from_timestamp(&samples, 5, 99), 2);
    }
}
