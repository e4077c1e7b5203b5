//! Calendar + clock duration builder.
//!
//! Drives the picker flow `date range -> from time -> to time`. Each time is
//! captured in two phases (hour, then minute). Completing the to-time emits
//! the distance between both moments in slots and resets the flow.

use chrono::NaiveDate;

use crate::calendar::checked_day_offset;
use crate::grid::{SlotDuration, TimeSlotGrid};
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderStep {
    AwaitingDateRange,
    AwaitingFromTime,
    AwaitingToTime,
}

impl BuilderStep {
    pub fn label(self) -> &'static str {
        match self {
            BuilderStep::AwaitingDateRange => "awaiting date range",
            BuilderStep::AwaitingFromTime => "awaiting from time",
            BuilderStep::AwaitingToTime => "awaiting to time",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockView {
    Hours,
    Minutes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    DateRange {
        start: Option<NaiveDate>,
    },
    FromTime {
        range: DateRange,
        view: ClockView,
        time: ClockTime,
    },
    ToTime {
        range: DateRange,
        from: ClockTime,
        view: ClockView,
        time: ClockTime,
    },
}

impl State {
    fn initial() -> Self {
        State::DateRange { start: None }
    }

    fn from_time(range: DateRange) -> Self {
        State::FromTime {
            range,
            view: ClockView::Hours,
            time: ClockTime::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InstantBuilder {
    grid: TimeSlotGrid,
    state: State,
}

impl InstantBuilder {
    pub fn new(grid: TimeSlotGrid) -> Self {
        Self {
            grid,
            state: State::initial(),
        }
    }

    pub fn grid(&self) -> TimeSlotGrid {
        self.grid
    }

    pub fn step(&self) -> BuilderStep {
        match self.state {
            State::DateRange { .. } => BuilderStep::AwaitingDateRange,
            State::FromTime { .. } => BuilderStep::AwaitingFromTime,
            State::ToTime { .. } => BuilderStep::AwaitingToTime,
        }
    }

    /// Clock view of the active time phase, `None` while picking dates.
    pub fn clock_view(&self) -> Option<ClockView> {
        match self.state {
            State::DateRange { .. } => None,
            State::FromTime { view, .. } | State::ToTime { view, .. } => Some(view),
        }
    }

    pub fn range(&self) -> Option<DateRange> {
        match self.state {
            State::DateRange { .. } => None,
            State::FromTime { range, .. } | State::ToTime { range, .. } => Some(range),
        }
    }

    pub fn from_time(&self) -> Option<ClockTime> {
        match self.state {
            State::ToTime { from, .. } => Some(from),
            _ => None,
        }
    }

    /// Minute granularity offered by the clock.
    pub fn minute_step(&self) -> u32 {
        self.grid.delta_minutes()
    }

    /// First pick sets the range start, second pick sets the end and moves
    /// to the from-time phase.
    pub fn pick_date(&mut self, date: NaiveDate) -> CoreResult<()> {
        match self.state {
            State::DateRange { start: None } => {
                self.state = State::DateRange { start: Some(date) };
                Ok(())
            }
            State::DateRange { start: Some(start) } => self.set_range(start, date),
            _ => Err(self.unexpected("date")),
        }
    }

    pub fn set_range(&mut self, start: NaiveDate, end: NaiveDate) -> CoreResult<()> {
        if !matches!(self.state, State::DateRange { .. }) {
            return Err(self.unexpected("date range"));
        }
        tracing::debug!(%start, %end, "instant builder range selected");
        self.state = State::from_time(DateRange { start, end });
        Ok(())
    }

    /// Record the hour of the active time and switch the clock to minutes.
    pub fn pick_hour(&mut self, hour: u32) -> CoreResult<()> {
        if hour > 23 {
            return Err(CoreError::InvalidTime { hour, minute: 0 });
        }
        if let State::FromTime { view, time, .. } | State::ToTime { view, time, .. } =
            &mut self.state
        {
            time.hour = hour;
            *view = ClockView::Minutes;
            return Ok(());
        }
        Err(self.unexpected("hour"))
    }

    /// Record the (snapped) minute of the active time.
    ///
    /// Completing the from-time advances to the to-time. Completing the
    /// to-time returns the duration in slots and resets the builder. On
    /// error the builder keeps its state.
    pub fn pick_minute(&mut self, minute: u32) -> CoreResult<Option<SlotDuration>> {
        if minute > 59 {
            return Err(CoreError::InvalidTime { hour: 0, minute });
        }
        let minute = self.grid.snap(minute);

        match self.state {
            State::FromTime {
                range,
                view: ClockView::Minutes,
                time,
            } => {
                let from = ClockTime::new(time.hour, minute);
                tracing::debug!(hour = from.hour, minute = from.minute, "from time selected");
                self.state = State::ToTime {
                    range,
                    from,
                    view: ClockView::Hours,
                    time: ClockTime::default(),
                };
                Ok(None)
            }
            State::ToTime {
                range,
                from,
                view: ClockView::Minutes,
                time,
            } => {
                let to = ClockTime::new(time.hour, minute);
                self.state = State::ToTime {
                    range,
                    from,
                    view: ClockView::Minutes,
                    time: to,
                };

                let duration = self.finalize(range, from, to).inspect_err(|err| {
                    tracing::warn!(%err, "instant builder rejected selection");
                })?;
                tracing::debug!(%duration, "instant builder emitted duration");
                self.state = State::initial();
                Ok(Some(duration))
            }
            _ => Err(self.unexpected("minute")),
        }
    }

    /// Step back one phase. Leaving the from-time phase discards the range.
    pub fn back(&mut self) {
        self.state = match self.state {
            State::DateRange { start } => State::DateRange { start },
            State::FromTime { .. } => State::initial(),
            State::ToTime { range, .. } => State::from_time(range),
        };
    }

    pub fn cancel(&mut self) {
        self.state = State::initial();
    }

    fn finalize(
        &self,
        range: DateRange,
        from: ClockTime,
        to: ClockTime,
    ) -> CoreResult<SlotDuration> {
        let to_day = checked_day_offset(range.end, range.start)?;
        let from_instant = self.grid.compute_instant(0, from.hour, from.minute)?;
        let to_instant = self.grid.compute_instant(to_day, to.hour, to.minute)?;
        Ok(from_instant.until(to_instant))
    }

    fn unexpected(&self, input: &'static str) -> CoreError {
        CoreError::UnexpectedInput {
            step: self.step().label(),
            input,
        }
    }
}
