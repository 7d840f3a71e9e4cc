use std::collections::VecDeque;

use crate::types::Sample;

/// Sliding window over the sample stream: always exactly `capacity` entries,
/// newest at the back.
pub struct WindowBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl WindowBuffer {
    /// Pre-filled with zero samples so the first frame already has a full window.
    pub fn new(capacity: usize) -> Self {
        let mut samples = VecDeque::with_capacity(capacity + 1);
        samples.resize(capacity, Sample::ZERO);
        Self { samples, capacity }
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Append a drained batch and drop from the head back down to capacity.
    /// Returns how many samples were appended.
    pub fn extend(&mut self, batch: impl IntoIterator<Item = Sample>) -> usize {
        let mut appended = 0;
        for sample in batch {
            self.samples.push_back(sample);
            if self.samples.len() > self.capacity {
                self.samples.pop_front();
            }
            appended += 1;
        }
        appended
    }

    /// The newest `count` samples, oldest first.
    pub fn latest(&self, count: usize) -> impl Iterator<Item = &Sample> + '_ {
        let skip = self.samples.len().saturating_sub(count);
        self.samples.iter().skip(skip)
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_starts_full_of_zeros() {
        let window = WindowBuffer::new(500);
        assert_eq!(window.len(), 500);
        assert!(window.iter().all(|s| *s == Sample::ZERO));
    }

    #[test]
    fn small_burst_lands_at_the_tail() {
        let mut window = WindowBuffer::new(500);
        let pushed = [
            Sample(1.0, 2.0, 3.0),
            Sample(4.0, 5.0, 6.0),
            Sample(7.0, 8.0, 9.0),
        ];
        assert_eq!(window.extend(pushed), 3);
        assert_eq!(window.len(), 500);
        let tail: Vec<Sample> = window.latest(3).copied().collect();
        assert_eq!(tail, pushed);
        assert_eq!(window.iter().nth(496), Some(&Sample::ZERO));
    }

    #[test]
    fn length_is_fixed_for_any_burst_size() {
        let mut window = WindowBuffer::new(64);
        let mut next = 0.0;
        for burst in [0usize, 1, 63, 64, 65, 1000, 0, 7] {
            let batch: Vec<Sample> = (0..burst)
                .map(|_| {
                    next += 1.0;
                    Sample(next, 0.0, 0.0)
                })
                .collect();
            window.extend(batch);
            assert_eq!(window.len(), 64);
        }
    }

    #[test]
    fn oversized_burst_keeps_newest_in_order() {
        let mut window = WindowBuffer::new(10);
        window.extend((0..25).map(|i| Sample(i as f64, 0.0, 0.0)));
        let values: Vec<f64> = window.iter().map(|s| s.0).collect();
        assert_eq!(values, (15..25).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn latest_clamps_to_window() {
        let window = WindowBuffer::new(4);
        assert_eq!(window.latest(10).count(), 4);
        assert_eq!(window.latest(0).count(), 0);
    }
}
