//! Cycle-day resolution
//!
//! Counts instructional days from the anchor to a target date, forward or
//! backward, wrapping around the cycle length.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::cycle::closure::ClosureSet;
use crate::cycle::config::Anchor;
use crate::error::RotationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn step(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Forward => date.succ_opt(),
            Self::Backward => date.pred_opt(),
        }
    }

    /// Move one slot around a cycle of `length`, indices 1-based
    const fn advance(self, index: u32, length: u32) -> u32 {
        match self {
            Self::Forward => index % length + 1,
            Self::Backward if index <= 1 => length,
            Self::Backward => index - 1,
        }
    }
}

/// Maps dates to cycle days for a fixed anchor, cycle length and closure set
#[derive(Debug, Clone)]
pub struct CycleResolver<'a> {
    anchor: Anchor,
    length: u32,
    closures: &'a ClosureSet,
}

impl<'a> CycleResolver<'a> {
    /// Create a resolver.
    ///
    /// Fails if `length` is zero or the anchor index is outside `1..=length`.
    pub fn new(anchor: Anchor, length: u32, closures: &'a ClosureSet) -> Result<Self, RotationError> {
        if length == 0 {
            return Err(RotationError::config("cycle length must be at least 1"));
        }
        if !(1..=length).contains(&anchor.cycle_index) {
            return Err(RotationError::config(format!(
                "anchor cycle index {} is outside 1..={length}",
                anchor.cycle_index
            )));
        }
        Ok(Self {
            anchor,
            length,
            closures,
        })
    }

    /// Cycle day for `target`, always in `1..=length`.
    ///
    /// Walks day by day from the anchor. Every instructional day passed takes
    /// one slot. The target always takes a slot too, so a closed target reports
    /// the day it would be if school were in session.
    #[must_use]
    pub fn cycle_index_for(&self, target: NaiveDate) -> u32 {
        let direction = match target.cmp(&self.anchor.date) {
            Ordering::Equal => return self.anchor.cycle_index,
            Ordering::Greater => Direction::Forward,
            Ordering::Less => Direction::Backward,
        };

        let mut index = self.anchor.cycle_index;
        let mut day = self.anchor.date;
        while day != target {
            let Some(next) = direction.step(day) else {
                break;
            };
            day = next;
            if day == target || self.closures.is_instructional(day) {
                index = direction.advance(index, self.length);
            }
        }
        index
    }

    /// Whether `date` is a school day. The anchor date always is.
    #[must_use]
    pub fn is_instructional(&self, date: NaiveDate) -> bool {
        date == self.anchor.date || self.closures.is_instructional(date)
    }

}
