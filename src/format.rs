//! Fixed text renderings for date-time and duration values.
//!
//! Timestamps render as `yyyy-MM-ddTHH:mm:ss.fffffff[+hh:mm]` and durations as
//! `[-][d.]hh:mm:ss[.fffffff]`. Both are lexically sortable within their kind
//! and parse back to the same value.
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, Timelike};
use regex::Regex;
use serde_json::Value;

use crate::source::types::lookup;

lazy_static::lazy_static! {
    /// `[-][d.]hh:mm:ss[.fffffff]`
    static ref TIMESPAN_RE: Regex =
        Regex::new(r"^(-)?(?:(\d+)\.)?(\d{1,2}):(\d{2}):(\d{2})(?:\.(\d{1,7}))?$").unwrap();
    /// `/Date(1700000000000)/`, optionally with a `+hhmm` offset
    static ref LEGACY_DATE_RE: Regex =
        Regex::new(r"^/Date\((-?\d+)(?:([+-])(\d{2})(\d{2}))?\)/$").unwrap();
}

const NANOS_PER_TICK: i64 = 100;
const SECONDS_PER_DAY: i64 = 86_400;

/// A point in time as the upstream source expressed it.
///
/// Values that carried an offset keep it; values without one stay unzoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Offset(DateTime<FixedOffset>),
    Unzoned(NaiveDateTime),
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Offset(dt) => write!(
                f,
                "{}.{:07}{}",
                dt.format("%Y-%m-%dT%H:%M:%S"),
                ticks_of_second(dt.nanosecond()),
                dt.format("%:z")
            ),
            Timestamp::Unzoned(dt) => write!(
                f,
                "{}.{:07}",
                dt.format("%Y-%m-%dT%H:%M:%S"),
                ticks_of_second(dt.nanosecond())
            ),
        }
    }
}

fn ticks_of_second(nanos: u32) -> u32 {
    // leap seconds report nanos past 1e9
    (nanos % 1_000_000_000) / NANOS_PER_TICK as u32
}

/// Parses an upstream timestamp: RFC 3339 with or without offset, or `/Date(ms)/`.
pub fn parse_timestamp(value: &Value) -> Result<Timestamp, String> {
    let Some(text) = value.as_str() else {
        return Err(format!("expected a date-time string, got {value}"));
    };
    let text = text.trim();

    if let Some(caps) = LEGACY_DATE_RE.captures(text) {
        let millis: i64 = caps[1]
            .parse()
            .map_err(|_| format!("date value out of range: {text}"))?;
        let utc = DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| format!("date value out of range: {text}"))?;
        let offset = match (caps.get(2), caps.get(3), caps.get(4)) {
            (Some(sign), Some(hh), Some(mm)) => {
                let secs = hh.as_str().parse::<i32>().unwrap_or(0) * 3600
                    + mm.as_str().parse::<i32>().unwrap_or(0) * 60;
                let secs = if sign.as_str() == "-" { -secs } else { secs };
                FixedOffset::east_opt(secs).ok_or_else(|| format!("invalid offset: {text}"))?
            }
            _ => FixedOffset::east_opt(0).ok_or_else(|| format!("invalid offset: {text}"))?,
        };
        return Ok(Timestamp::Offset(utc.with_timezone(&offset)));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(Timestamp::Offset(dt));
    }

    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map(Timestamp::Unzoned)
        .map_err(|e| format!("unrecognized date-time '{text}': {e}"))
}

/// Parses an upstream duration: seconds, `[-][d.]hh:mm:ss[.fffffff]`, or an
/// object carrying `Ticks` or `TotalSeconds`.
pub fn parse_duration(value: &Value) -> Result<TimeDelta, String> {
    match value {
        Value::Number(_) => seconds_to_delta(value),
        Value::String(text) => parse_timespan(text.trim()),
        Value::Object(_) => {
            if let Some(ticks) = lookup(value, "Ticks") {
                let ticks = ticks
                    .as_i64()
                    .ok_or_else(|| format!("expected integer ticks, got {ticks}"))?;
                ticks
                    .checked_mul(NANOS_PER_TICK)
                    .map(TimeDelta::nanoseconds)
                    .ok_or_else(|| format!("duration out of range: {ticks} ticks"))
            } else if let Some(seconds) = lookup(value, "TotalSeconds") {
                seconds_to_delta(seconds)
            } else {
                Err(format!(
                    "duration object has neither Ticks nor TotalSeconds: {value}"
                ))
            }
        }
        _ => Err(format!("expected a duration, got {value}")),
    }
}

fn seconds_to_delta(value: &Value) -> Result<TimeDelta, String> {
    if let Some(secs) = value.as_i64() {
        return TimeDelta::try_seconds(secs)
            .ok_or_else(|| format!("duration out of range: {secs}s"));
    }
    match value.as_f64() {
        Some(secs) if secs.is_finite() && secs.abs() < 9.2e9 => {
            Ok(TimeDelta::nanoseconds((secs * 1e9).round() as i64))
        }
        _ => Err(format!("expected seconds, got {value}")),
    }
}

fn parse_timespan(text: &str) -> Result<TimeDelta, String> {
    let caps = TIMESPAN_RE
        .captures(text)
        .ok_or_else(|| format!("unrecognized duration '{text}'"))?;

    let number = |idx: usize| -> Result<i64, String> {
        caps.get(idx)
            .map_or(Ok(0), |m| m.as_str().parse::<i64>())
            .map_err(|_| format!("duration out of range: '{text}'"))
    };
    let (days, hours, minutes, seconds) = (number(2)?, number(3)?, number(4)?, number(5)?);
    if hours > 23 || minutes > 59 || seconds > 59 {
        return Err(format!("duration component out of range: '{text}'"));
    }
    let ticks = caps.get(6).map_or(0, |m| {
        // right-pad to seven digits: ".5" is half a second
        format!("{:0<7}", m.as_str()).parse::<i64>().unwrap_or(0)
    });

    let total_secs = days
        .checked_mul(SECONDS_PER_DAY)
        .and_then(|d| d.checked_add(hours * 3600 + minutes * 60 + seconds))
        .ok_or_else(|| format!("duration out of range: '{text}'"))?;
    let delta = TimeDelta::try_seconds(total_secs)
        .and_then(|secs| secs.checked_add(&TimeDelta::nanoseconds(ticks * NANOS_PER_TICK)))
        .ok_or_else(|| format!("duration out of range: '{text}'"))?;

    Ok(if caps.get(1).is_some() { -delta } else { delta })
}

/// Renders a duration as `[-][d.]hh:mm:ss[.fffffff]`.
pub fn format_duration(delta: TimeDelta) -> String {
    let sign = if delta < TimeDelta::zero() { "-" } else { "" };
    let abs = delta.abs();
    let secs = abs.num_seconds();
    let ticks = i64::from(abs.subsec_nanos()) / NANOS_PER_TICK;

    let days = secs / SECONDS_PER_DAY;
    let rem = secs % SECONDS_PER_DAY;
    let mut out = String::from(sign);
    if days > 0 {
        out.push_str(&format!("{days}."));
    }
    out.push_str(&format!(
        "{:02}:{:02}:{:02}",
        rem / 3600,
        rem % 3600 / 60,
        rem % 60
    ));
    if ticks > 0 {
        out.push_str(&format!(".{ticks:07}"));
    }
    out
}
