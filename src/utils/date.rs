use std::sync::{Arc, Mutex};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Utc};

pub const DATE_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";
pub const DISPLAY_DATE_FMT: &str = "%d/%m/%Y";
pub const DISPLAY_DATE_TIME_FMT: &str = "%d/%m/%Y %H:%M";

pub mod serializer {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;
    use crate::utils::date::DATE_FMT;

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        time.format(DATE_FMT).to_string().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let str_time: String = Deserialize::deserialize(deserializer)?;
        let time = NaiveDateTime::parse_from_str(&str_time, DATE_FMT).map_err(D::Error::custom)?;
        Ok(time)
    }
}

// Clock supplies "now" to the circulation rules so sweeps and penalties can be driven in tests.
pub trait Clock: Sync + Send {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

// ManualClock only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        ManualClock { now: Arc::new(Mutex::new(start)) }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }

    pub fn advance_days(&self, days: i64) {
        self.advance(Duration::days(days));
    }

    pub fn set(&self, instant: NaiveDateTime) {
        if let Ok(mut now) = self.now.lock() {
            *now = instant;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

pub fn format_date(date: Option<NaiveDateTime>) -> String {
    date.map(|d| d.format(DISPLAY_DATE_FMT).to_string()).unwrap_or_default()
}

pub fn format_date_time(date: Option<NaiveDateTime>) -> String {
    date.map(|d| d.format(DISPLAY_DATE_TIME_FMT).to_string()).unwrap_or_default()
}

// parse_date reads `dd/mm/yyyy` and yields midnight of that day
pub fn parse_date(text: Option<&str>) -> Option<NaiveDateTime> {
    let text = text?.trim();
    if text.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(text, DISPLAY_DATE_FMT).ok().and_then(|d| d.and_hms_opt(0, 0, 0))
}

// days_between counts whole days from start to end, negative when end precedes start
pub fn days_between(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> i64 {
    match (start, end) {
        (Some(start), Some(end)) => (end - start).num_days(),
        _ => 0,
    }
}

pub fn add_days(date: Option<NaiveDateTime>, days: i64) -> Option<NaiveDateTime> {
    date.map(|d| d + Duration::days(days))
}

pub fn is_past(date: Option<NaiveDateTime>, now: NaiveDateTime) -> bool {
    date.map(|d| d < now).unwrap_or(false)
}

pub fn is_today(date: Option<NaiveDateTime>, now: NaiveDateTime) -> bool {
    date.map(|d| d.date() == now.date()).unwrap_or(false)
}

// is_within_days is true for a date that is not past and at most `days` ahead of now
pub fn is_within_days(date: Option<NaiveDateTime>, days: i64, now: NaiveDateTime) -> bool {
    match date {
        Some(d) => d >= now && d <= now + Duration::days(days),
        None => false,
    }
}

pub fn start_of_day(date: Option<NaiveDateTime>) -> Option<NaiveDateTime> {
    date.and_then(|d| d.date().and_hms_opt(0, 0, 0))
}

pub fn end_of_day(date: Option<NaiveDateTime>) -> Option<NaiveDateTime> {
    date.and_then(|d| d.date().and_hms_milli_opt(23, 59, 59, 999))
}

pub fn current_year() -> i32 {
    Utc::now().year()
}
