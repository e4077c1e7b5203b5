//! Slot grid and instant computation.
//!
//! An instant addresses one discrete simulation time slot, counted from the
//! start of a base day at a fixed granularity of `delta_minutes`.

use core::fmt;
use core::num::NonZeroU32;

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::calendar::{checked_day_offset, day_offset};
use crate::{CoreError, CoreResult};

pub const MINUTES_PER_DAY: u32 = 1440;

/// Absolute slot index relative to a base date.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Instant(u64);

impl Instant {
    pub const ZERO: Instant = Instant(0);

    pub fn new(slot: u64) -> Self {
        Self(slot)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Signed number of slots from `self` to `later`.
    pub fn until(self, later: Instant) -> SlotDuration {
        SlotDuration(later.0 as i64 - self.0 as i64)
    }
}

impl fmt::Debug for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instant({})", self.0)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Instant> for u64 {
    fn from(instant: Instant) -> Self {
        instant.0
    }
}

/// Difference between two instants, in slots. Encoded as a plain decimal
/// string when sent as a duration parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct SlotDuration(i64);

impl SlotDuration {
    pub fn new(slots: i64) -> Self {
        Self(slots)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SlotDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Slot granularity of a simulation run.
///
/// `delta_minutes` is expected to divide 1440 but this is not enforced;
/// instants that do not land on a slot boundary are rejected instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u32", into = "u32")
)]
pub struct TimeSlotGrid {
    delta_minutes: NonZeroU32,
}

impl TimeSlotGrid {
    pub fn new(delta_minutes: u32) -> CoreResult<Self> {
        NonZeroU32::new(delta_minutes)
            .map(|delta_minutes| Self { delta_minutes })
            .ok_or(CoreError::InvalidDelta {
                delta: delta_minutes,
            })
    }

    pub fn delta_minutes(&self) -> u32 {
        self.delta_minutes.get()
    }

    /// Whole slots per day. Exact only when [`divides_day`](Self::divides_day) holds.
    pub fn slots_per_day(&self) -> u32 {
        MINUTES_PER_DAY / self.delta_minutes()
    }

    pub fn divides_day(&self) -> bool {
        MINUTES_PER_DAY % self.delta_minutes() == 0
    }

    /// Instant of `hour:minute` on day `day` after the base date.
    ///
    /// Equals `day * (1440 / delta) + (hour * 60 + minute) / delta` whenever
    /// that value is a whole number; any other combination fails with
    /// [`CoreError::InvalidAlignment`].
    pub fn compute_instant(&self, day: i64, hour: u32, minute: u32) -> CoreResult<Instant> {
        if day < 0 {
            return Err(CoreError::InvalidRange {
                what: "day precedes the base date",
                day,
            });
        }
        if hour > 23 || minute > 59 {
            return Err(CoreError::InvalidTime { hour, minute });
        }

        let minutes_of_day = hour * 60 + minute;
        let minutes = day
            .checked_mul(i64::from(MINUTES_PER_DAY))
            .and_then(|m| m.checked_add(i64::from(minutes_of_day)))
            .ok_or(CoreError::InvalidRange {
                what: "day offset overflows the slot index",
                day,
            })?;

        // `day >= 0` was checked above, so the total is non-negative.
        let total = minutes.unsigned_abs();
        let delta = u64::from(self.delta_minutes());
        if !total.is_multiple_of(delta) {
            return Err(CoreError::InvalidAlignment {
                minutes,
                delta: self.delta_minutes(),
            });
        }

        Ok(Instant(total / delta))
    }

    pub fn snap(&self, minute: u32) -> u32 {
        snap_minute(minute, self.delta_minutes())
    }

    /// Instant of the wall-clock moment `at`, counted from `base`.
    pub fn instant_at(&self, base: NaiveDate, at: NaiveDateTime) -> CoreResult<Instant> {
        let day = day_offset(at.date(), base);
        self.compute_instant(day, at.hour(), at.minute())
    }

    /// Slots between two wall-clock moments. `from` is placed on day zero of
    /// its own date; `to` lands on its day offset from that date.
    pub fn duration_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> CoreResult<SlotDuration> {
        let to_day = checked_day_offset(to.date(), from.date())?;
        let from_instant = self.compute_instant(0, from.hour(), from.minute())?;
        let to_instant = self.compute_instant(to_day, to.hour(), to.minute())?;
        Ok(from_instant.until(to_instant))
    }
}

impl TryFrom<u32> for TimeSlotGrid {
    type Error = CoreError;

    fn try_from(delta_minutes: u32) -> Result<Self, Self::Error> {
        Self::new(delta_minutes)
    }
}

impl From<TimeSlotGrid> for u32 {
    fn from(grid: TimeSlotGrid) -> Self {
        grid.delta_minutes()
    }
}

/// Round `minute` to the nearest multiple of `delta` (halves round up).
///
/// Results that would reach the next hour are clamped to the last slot
/// boundary inside the hour, which is `60 - delta` when `delta` divides 60.
/// A `delta` of 0 or 1 leaves the minute untouched.
pub fn snap_minute(minute: u32, delta: u32) -> u32 {
    if delta <= 1 {
        return minute;
    }

    let (m, d) = (u64::from(minute), u64::from(delta));
    let snapped = (2 * m + d) / (2 * d) * d;
    if snapped >= 60 {
        (59 / delta) * delta
    } else {
        snapped as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(delta: u32) -> TimeSlotGrid {
        TimeSlotGrid::new(delta).unwrap()
    }

    #[test]
    fn zero_delta_is_rejected() {
        assert_eq!(
            TimeSlotGrid::new(0),
            Err(CoreError::InvalidDelta { delta: 0 })
        );
    }

    #[test]
    fn hourly_grid_day_two_three_am() {
        assert_eq!(grid(60).compute_instant(2, 3, 0).unwrap().get(), 51);
    }

    #[test]
    fn quarter_hour_grid_forty_five_minutes() {
        assert_eq!(grid(15).compute_instant(0, 0, 45).unwrap().get(), 3);
    }

    #[test]
    fn slots_per_day() {
        assert_eq!(grid(15).slots_per_day(), 96);
        assert!(grid(15).divides_day());
        assert!(!grid(7).divides_day());
    }

    #[test]
    fn misaligned_minute_is_rejected() {
        let err = grid(15).compute_instant(0, 1, 10).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidAlignment {
                minutes: 70,
                delta: 15
            }
        );
    }

    #[test]
    fn non_divisor_delta_accepts_whole_totals_only() {
        // 1440 + 2 = 1442 = 206 * 7
        assert_eq!(grid(7).compute_instant(1, 0, 2).unwrap().get(), 206);
        assert!(grid(7).compute_instant(1, 0, 0).is_err());
    }

    #[test]
    fn negative_day_is_an_invalid_range() {
        assert!(matches!(
            grid(60).compute_instant(-1, 0, 0),
            Err(CoreError::InvalidRange { day: -1, .. })
        ));
    }

    #[test]
    fn out_of_range_clock_values() {
        assert_eq!(
            grid(1).compute_instant(0, 24, 0),
            Err(CoreError::InvalidTime {
                hour: 24,
                minute: 0
            })
        );
        assert!(grid(1).compute_instant(0, 0, 60).is_err());
    }

    #[test]
    fn snap_clamps_inside_the_hour() {
        assert_eq!(snap_minute(58, 15), 45);
        assert_eq!(snap_minute(52, 15), 45);
        assert_eq!(snap_minute(53, 15), 45);
        assert_eq!(snap_minute(7, 15), 0);
        assert_eq!(snap_minute(8, 15), 15);
        assert_eq!(snap_minute(40, 60), 0);
    }

    #[test]
    fn snap_half_rounds_up() {
        assert_eq!(snap_minute(5, 10), 10);
        assert_eq!(snap_minute(15, 10), 20);
    }

    #[test]
    fn snap_is_noop_for_unit_delta() {
        for m in [0_u32, 1, 29, 59] {
            assert_eq!(snap_minute(m, 1), m);
            assert_eq!(snap_minute(m, 0), m);
        }
    }

    #[test]
    fn duration_across_a_day() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(1, 0, 0)
            .unwrap();
        assert_eq!(grid(60).duration_between(from, to).unwrap().get(), 25);
    }

    #[test]
    fn duration_can_be_negative_within_a_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let from = day.and_hms_opt(10, 0, 0).unwrap();
        let to = day.and_hms_opt(8, 0, 0).unwrap();
        assert_eq!(grid(30).duration_between(from, to).unwrap().get(), -4);
    }

    #[test]
    fn instant_at_counts_from_base() {
        let base = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let at = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 30, 0)
            .unwrap();
        // 2024 is a leap year: Feb 28 -> Mar 1 is two days.
        assert_eq!(grid(30).instant_at(base, at).unwrap().get(), 2 * 48 + 1);
    }
}
