//! One-shot reveal of page sections as they scroll into view.

use crate::constants::REVEAL_VIEWPORT_FRACTION;
use std::time::Duration;

/// True once a section whose top edge sits `section_top` px below the top of
/// the viewport has crossed the reveal line.
#[inline]
pub fn crosses_reveal_line(section_top: f64, viewport_height: f64) -> bool {
    section_top.is_finite()
        && viewport_height > 0.0
        && section_top <= viewport_height * REVEAL_VIEWPORT_FRACTION
}

/// Delay for the `index`-th element of a staggered group.
#[inline]
pub fn stagger_delay(index: usize, step: Duration) -> Duration {
    step.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
}

/// Tracks which sections have been revealed. A section is revealed at most
/// once; scrolling back up does not hide it again.
#[derive(Debug, Default)]
pub struct RevealTracker {
    revealed: Vec<bool>,
}

impl RevealTracker {
    pub fn new(sections: usize) -> Self {
        Self {
            revealed: vec![false; sections],
        }
    }

    /// Feed the current section tops (same order as at construction) and
    /// get back the indices that crossed the reveal line for the first time.
    pub fn update(&mut self, section_tops: &[f64], viewport_height: f64) -> Vec<usize> {
        let mut newly = Vec::new();
        for (i, (done, &top)) in self.revealed.iter_mut().zip(section_tops).enumerate() {
            if !*done && crosses_reveal_line(top, viewport_height) {
                *done = true;
                newly.push(i);
            }
        }
        newly
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    pub fn all_revealed(&self) -> bool {
        self.revealed.iter().all(|r| *r)
    }
}
