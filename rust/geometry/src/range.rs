// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scalar intervals along a projection axis

/// Closed interval `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfcRange {
    pub start: f64,
    pub end: f64,
}

impl IfcRange {
    /// Interval between two values in any order
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Smallest interval containing every value, `None` for no values
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Self::new(v, v)),
            Some(r) => Some(r.extended(v)),
        })
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    pub fn extended(&self, v: f64) -> Self {
        Self {
            start: self.start.min(v),
            end: self.end.max(v),
        }
    }

    pub fn union(&self, other: &IfcRange) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    #[inline]
    pub fn contains(&self, v: f64, eps: f64) -> bool {
        v >= self.start - eps && v <= self.end + eps
    }

    pub fn overlaps(&self, other: &IfcRange, eps: f64) -> bool {
        self.start <= other.end + eps && other.start <= self.end + eps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_from_values() {
        assert!(IfcRange::from_values(std::iter::empty()).is_none());
        let r = IfcRange::from_values([3.0, -1.0, 2.0]).unwrap();
        assert_eq!(r, IfcRange::new(-1.0, 3.0));
        assert_eq!(r.length(), 4.0);
    }

    #[test]
    fn containment_and_overlap() {
        let r = IfcRange::new(0.0, 1.0);
        assert!(r.contains(1.0 + 1e-7, 1e-6));
        assert!(!r.contains(1.1, 1e-6));
        assert!(r.overlaps(&IfcRange::new(1.0, 2.0), 0.0));
        assert!(!r.overlaps(&IfcRange::new(1.5, 2.0), 1e-6));
        assert_eq!(r.union(&IfcRange::new(-2.0, 0.5)), IfcRange::new(-2.0, 1.0));
    }
}
