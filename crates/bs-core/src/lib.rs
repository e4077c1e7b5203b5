//! bs-core: time-slot foundation for bikesim.
//!
//! Contains:
//! - grid (slot granularity, instant computation, minute snapping)
//! - calendar (day offsets between calendar dates)
//! - sets (canonical `a;b;c` integer sets for instants and stations)
//! - scope (station-scoped day parameters)
//! - builder (calendar + clock duration builder)
//! - delta (output delta resolution)
//! - error (shared error types)

pub mod builder;
pub mod calendar;
pub mod delta;
pub mod error;
pub mod grid;
pub mod scope;
pub mod sets;

// Re-exports: nice ergonomics for downstream crates
pub use builder::{BuilderStep, ClockTime, ClockView, DateRange, InstantBuilder};
pub use calendar::{checked_day_offset, dates_inclusive, day_offset};
pub use delta::{effective_output_delta, parse_delta_from_run_id};
pub use error::{CoreError, CoreResult};
pub use grid::{Instant, MINUTES_PER_DAY, SlotDuration, TimeSlotGrid, snap_minute};
pub use scope::{DaysSpec, StationScope};
pub use sets::{CanonicalSet, InstantSet, StationSet, parse_instant_set, parse_station_set};
