use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid slot delta: {delta} minutes (must be positive)")]
    InvalidDelta { delta: u32 },

    #[error("Invalid time of day: {hour:02}:{minute:02}")]
    InvalidTime { hour: u32, minute: u32 },

    #[error("Instant not aligned to slot grid: {minutes} minutes is not a multiple of {delta}")]
    InvalidAlignment { minutes: i64, delta: u32 },

    #[error("Invalid range: {what} (day offset {day})")]
    InvalidRange { what: &'static str, day: i64 },

    #[error("Unexpected input {input} while {step}")]
    UnexpectedInput {
        step: &'static str,
        input: &'static str,
    },
}
