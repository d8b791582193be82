use crate::model::OrderLine;
use crate::split::fraction::Fraction;
use serde::Serialize;
use tracing::debug;

/// Figures describing how a trip was split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitReport {
    pub total_usage: Fraction,
    pub total_containers: u64,
    /// `ceil(total_containers / 2)`, the primary bucket's share.
    pub target_containers: u64,
    pub primary_usage: Fraction,
    pub overflow_usage: Fraction,
    pub primary_containers: u64,
    pub overflow_containers: u64,
    /// Units placed in the primary bucket by the assign-by-quota phase.
    pub assigned_by_quota: u64,
    /// Units moved into the primary bucket by the top-up phase.
    pub topped_up: u64,
}

/// The two halves of a split trip. Both lists hold one line per input
/// line, in input order, with matching `order_id`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitOutcome {
    pub primary: Vec<OrderLine>,
    pub overflow: Vec<OrderLine>,
    pub report: SplitReport,
}

/// Split a trip's lines into a primary and an overflow trip with balanced
/// container counts. The primary trip keeps the larger share when the
/// total is odd.
pub fn split_balanced(lines: &[OrderLine]) -> SplitOutcome {
    let mut allocation = Allocation::new(lines);
    allocation.assign_by_quota();
    allocation.top_up_remainder();
    allocation.into_outcome()
}

#[derive(Debug, Clone)]
struct Slot {
    capacity: u64,
    quantity: u64,
    primary: u64,
}

impl Slot {
    fn leftover(&self) -> u64 {
        self.quantity - self.primary
    }
}

/// Working state of a split. Each line's quantity is divided between the
/// primary bucket and the overflow bucket; usage is tracked exactly.
#[derive(Debug, Clone)]
pub struct Allocation<'a> {
    lines: &'a [OrderLine],
    slots: Vec<Slot>,
    total_usage: Fraction,
    /// `ceil(ceil(total_usage) / 2)`, kept exact.
    target: Fraction,
    assigned: Fraction,
    assigned_by_quota: u64,
    topped_up: u64,
}

impl<'a> Allocation<'a> {
    /// Start with everything in the overflow bucket.
    pub fn new(lines: &'a [OrderLine]) -> Self {
        let slots: Vec<Slot> = lines
            .iter()
            .map(|l| Slot {
                capacity: l.effective_capacity(),
                quantity: l.effective_quantity(),
                primary: 0,
            })
            .collect();
        let total_usage: Fraction = slots
            .iter()
            .map(|s| Fraction::usage(s.quantity, s.capacity))
            .sum();
        let target = Fraction::new(total_usage.ceil(), 2).ceil();

        Self {
            lines,
            slots,
            total_usage,
            target: Fraction::from_integer(target),
            assigned: Fraction::zero(),
            assigned_by_quota: 0,
            topped_up: 0,
        }
    }

    pub fn total_containers(&self) -> u64 {
        self.total_usage.ceil_count()
    }

    pub fn target_containers(&self) -> u64 {
        self.target.ceil_count()
    }

    pub fn primary_containers(&self) -> u64 {
        self.assigned.ceil_count()
    }

    pub fn overflow_containers(&self) -> u64 {
        self.overflow_usage().ceil_count()
    }

    fn overflow_usage(&self) -> Fraction {
        self.total_usage.clone() - self.assigned.clone()
    }

    /// The primary bucket holds at least as many containers as the
    /// overflow bucket.
    pub fn is_target_reached(&self) -> bool {
        self.assigned.ceil() >= self.overflow_usage().ceil()
    }

    /// Units per line currently assigned to the primary bucket.
    pub fn primary_quantities(&self) -> Vec<u64> {
        self.slots.iter().map(|s| s.primary).collect()
    }

    /// First phase: walk the lines in order, giving each as many whole
    /// units as fit in the remaining quota `target - assigned`.
    ///
    /// Returns the number of units assigned.
    pub fn assign_by_quota(&mut self) -> u64 {
        let mut moved: u64 = 0;

        for slot in self.slots.iter_mut() {
            if slot.leftover() == 0 {
                continue;
            }
            let quota = self.target.clone() - self.assigned.clone();
            if !quota.is_positive() {
                continue;
            }
            let fits = quota.scale(slot.capacity).floor_count();
            let take = fits.min(slot.leftover());
            slot.primary += take;
            self.assigned += Fraction::usage(take, slot.capacity);
            moved = moved.saturating_add(take);
        }

        self.assigned_by_quota = self.assigned_by_quota.saturating_add(moved);
        debug!(
            units = moved,
            assigned = %self.assigned,
            target = %self.target,
            "assign-by-quota phase done"
        );
        moved
    }

    /// Second phase: whole-unit flooring in the first phase can leave the
    /// primary bucket short of the overflow bucket. Revisit lines in input
    /// order and move the fewest leftover units of each that bring the
    /// primary bucket level, stopping as soon as it is.
    ///
    /// Returns the number of units moved.
    pub fn top_up_remainder(&mut self) -> u64 {
        let mut moved: u64 = 0;

        for idx in 0..self.slots.len() {
            if self.is_target_reached() {
                break;
            }
            let leftover = self.slots[idx].leftover();
            if leftover == 0 {
                continue;
            }
            let k = if self.reached_after(idx, leftover) {
                self.fewest_units_reaching(idx, leftover)
            } else {
                leftover
            };
            self.move_units(idx, k);
            moved = moved.saturating_add(k);
        }

        self.topped_up = self.topped_up.saturating_add(moved);
        debug!(
            units = moved,
            primary = self.primary_containers(),
            overflow = self.overflow_containers(),
            "top-up phase done"
        );
        moved
    }

    fn reached_after(&self, idx: usize, units: u64) -> bool {
        let primary = self.assigned.clone() + Fraction::usage(units, self.slots[idx].capacity);
        let overflow = self.total_usage.clone() - primary.clone();
        primary.ceil() >= overflow.ceil()
    }

    /// Smallest `k` in `1..=upper` with `reached_after(idx, k)`; the
    /// predicate is monotone in `k` and holds at `upper`.
    fn fewest_units_reaching(&self, idx: usize, upper: u64) -> u64 {
        let (mut lo, mut hi) = (1, upper);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.reached_after(idx, mid) {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        lo
    }

    fn move_units(&mut self, idx: usize, units: u64) {
        let slot = &mut self.slots[idx];
        slot.primary += units;
        self.assigned += Fraction::usage(units, slot.capacity);
    }

    pub fn report(&self) -> SplitReport {
        SplitReport {
            total_usage: self.total_usage.clone(),
            total_containers: self.total_containers(),
            target_containers: self.target_containers(),
            primary_usage: self.assigned.clone(),
            overflow_usage: self.overflow_usage(),
            primary_containers: self.primary_containers(),
            overflow_containers: self.overflow_containers(),
            assigned_by_quota: self.assigned_by_quota,
            topped_up: self.topped_up,
        }
    }

    /// Materialize the two line lists.
    pub fn into_outcome(self) -> SplitOutcome {
        let report = self.report();
        let (primary, overflow): (Vec<OrderLine>, Vec<OrderLine>) = self
            .lines
            .iter()
            .zip(&self.slots)
            .map(|(line, slot)| {
                (
                    line.with_quantity(slot.primary),
                    line.with_quantity(slot.leftover()),
                )
            })
            .unzip();

        SplitOutcome {
            primary,
            overflow,
            report,
        }
    }
}
