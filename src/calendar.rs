use crate::config::EngineConfig;
use crate::job::{Job, ScheduleType};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Upper bound on day-by-day scans, in case no day is ever workable.
const MAX_SCAN_DAYS: u32 = 3660;

/// Daily working window of a job or of a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    pub kind: ScheduleType,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ScheduleWindow {
    pub fn new(kind: ScheduleType, start: NaiveTime, end: NaiveTime) -> Self {
        Self { kind, start, end }
    }

    pub fn round_the_clock() -> Self {
        let (start, end) = Self::full_day_bounds();
        Self::new(ScheduleType::RoundTheClock, start, end)
    }

    pub fn for_job(job: &Job, config: &EngineConfig) -> Self {
        Self::new(job.type_horaire, job.start_time(config), job.end_time(config))
    }

    fn full_day_bounds() -> (NaiveTime, NaiveTime) {
        (
            NaiveTime::MIN,
            NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN),
        )
    }

    /// Start and end of day; round-the-clock windows are 00:00 to 23:59.
    pub fn bounds(&self) -> (NaiveTime, NaiveTime) {
        match self.kind {
            ScheduleType::RoundTheClock => Self::full_day_bounds(),
            _ => (self.start, self.end),
        }
    }

    /// Hours consumed by one working day: 24 round the clock, otherwise the
    /// window length, never less than one hour (an inverted or empty
    /// window still counts as one hour).
    pub fn daily_capacity_hours(&self) -> f64 {
        match self.kind {
            ScheduleType::RoundTheClock => 24.0,
            _ => {
                let start = (self.start.hour() * 60 + self.start.minute()) as f64;
                let end = (self.end.hour() * 60 + self.end.minute()) as f64;
                ((end - start) / 60.0).max(1.0)
            }
        }
    }
}

/// Which dates can absorb work and how many hours each one holds.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkCalendar {
    window: ScheduleWindow,
    non_working_days: HashSet<Weekday>,
    excluded_dates: HashSet<NaiveDate>,
    overrides: HashMap<NaiveDate, ScheduleWindow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCalendarConfig {
    working_days: Vec<Weekday>,
    excluded_dates: Vec<NaiveDate>,
}

impl WorkCalendarConfig {
    pub fn new<I, J>(working_days: I, excluded_dates: J) -> Self
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = NaiveDate>,
    {
        let mut working_days: Vec<Weekday> = working_days.into_iter().collect();
        working_days.sort_by_key(|day| day.num_days_from_monday());
        working_days.dedup();
        let mut excluded_dates: Vec<NaiveDate> = excluded_dates.into_iter().collect();
        excluded_dates.sort();
        excluded_dates.dedup();
        Self {
            working_days,
            excluded_dates,
        }
    }

    pub fn working_days(&self) -> &[Weekday] {
        &self.working_days
    }

    pub fn excluded_dates(&self) -> &[NaiveDate] {
        &self.excluded_dates
    }
}

impl From<&WorkCalendar> for WorkCalendarConfig {
    fn from(calendar: &WorkCalendar) -> Self {
        let working = WorkCalendar::ALL_WEEKDAYS
            .iter()
            .copied()
            .filter(|day| !calendar.non_working_days.contains(day));
        WorkCalendarConfig::new(working, calendar.excluded_dates.iter().copied())
    }
}

impl WorkCalendar {
    const ALL_WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Calendar with the given window; weekends are worked only when
    /// `include_weekends` is set.
    pub fn new(window: ScheduleWindow, include_weekends: bool) -> Self {
        let non_working_days = if include_weekends {
            HashSet::new()
        } else {
            HashSet::from([Weekday::Sat, Weekday::Sun])
        };
        Self {
            window,
            non_working_days,
            excluded_dates: HashSet::new(),
            overrides: HashMap::new(),
        }
    }

    /// Calendar of a job: its window, weekend flag and per-date overrides.
    pub fn for_job(job: &Job, config: &EngineConfig) -> Self {
        let mut calendar = Self::new(ScheduleWindow::for_job(job, config), job.include_weekends);
        for (date, schedule) in &job.daily_schedules {
            match schedule {
                None => calendar.exclude_date(*date),
                Some(daily) => calendar.set_override(
                    *date,
                    ScheduleWindow::new(daily.mode, daily.heure_debut, daily.heure_fin),
                ),
            }
        }
        calendar
    }

    pub fn from_config(window: ScheduleWindow, config: &WorkCalendarConfig) -> Self {
        let mut calendar = Self::new(window, true);
        calendar.set_working_days(config.working_days.iter().copied());
        calendar.excluded_dates = config.excluded_dates.iter().copied().collect();
        calendar
    }

    pub fn to_config(&self) -> WorkCalendarConfig {
        WorkCalendarConfig::from(self)
    }

    pub fn window(&self) -> &ScheduleWindow {
        &self.window
    }

    /// Set custom working days (e.g., Mon-Sat for 6-day weeks)
    pub fn set_working_days<I>(&mut self, days: I)
    where
        I: IntoIterator<Item = Weekday>,
    {
        let working: HashSet<Weekday> = days.into_iter().collect();
        self.non_working_days = Self::ALL_WEEKDAYS
            .iter()
            .copied()
            .filter(|day| !working.contains(day))
            .collect();
    }

    pub fn exclude_date(&mut self, date: NaiveDate) {
        self.overrides.remove(&date);
        self.excluded_dates.insert(date);
    }

    /// Works `date` with its own window, even on a non-working weekday.
    pub fn set_override(&mut self, date: NaiveDate, window: ScheduleWindow) {
        self.excluded_dates.remove(&date);
        self.overrides.insert(date, window);
    }

    pub fn has_override(&self, date: NaiveDate) -> bool {
        self.overrides.contains_key(&date)
    }

    pub fn is_excluded(&self, date: NaiveDate) -> bool {
        self.excluded_dates.contains(&date)
    }

    /// Check if a date can absorb work
    pub fn is_available(&self, date: NaiveDate) -> bool {
        if self.excluded_dates.contains(&date) {
            return false;
        }
        self.overrides.contains_key(&date) || !self.non_working_days.contains(&date.weekday())
    }

    /// Hours one date can absorb; zero when unavailable.
    pub fn capacity_on(&self, date: NaiveDate) -> f64 {
        if !self.is_available(date) {
            return 0.0;
        }
        self.overrides
            .get(&date)
            .unwrap_or(&self.window)
            .daily_capacity_hours()
    }

    /// Find the next available date after a given date
    pub fn next_available(&self, from: NaiveDate) -> NaiveDate {
        let mut current = from + Duration::days(1);
        let mut scanned = 0;
        while !self.is_available(current) && scanned < MAX_SCAN_DAYS {
            current = current + Duration::days(1);
            scanned += 1;
        }
        current
    }

    /// Date on which `duration_hours` of work starting on `start` ends.
    ///
    /// Walks forward one date at a time: unavailable dates are skipped
    /// without consuming hours, a full day's capacity is consumed and the
    /// walk moves on, and a remainder smaller than the day's capacity
    /// finishes on that day. Landing on an unavailable date moves the
    /// result to the next available one (Saturday and Sunday go to Monday
    /// on a Monday-to-Friday calendar). A non-positive or non-finite
    /// duration returns `start` unchanged.
    pub fn end_date(&self, start: NaiveDate, duration_hours: f64) -> NaiveDate {
        if !duration_hours.is_finite() || duration_hours <= 0.0 {
            return start;
        }

        let mut remaining = duration_hours;
        let mut current = start;
        let mut scanned = 0;
        while remaining > 0.0 && scanned < MAX_SCAN_DAYS {
            scanned += 1;
            if !self.is_available(current) {
                current = current + Duration::days(1);
                continue;
            }
            let capacity = self.capacity_on(current);
            if remaining >= capacity {
                remaining -= capacity;
                current = current + Duration::days(1);
            } else {
                break;
            }
        }

        if !self.is_available(current) {
            current = self.next_available(current);
        }
        current
    }

    /// Get all available days in a date range
    pub fn available_days_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut current = start;

        while current <= end {
            if self.is_available(current) {
                days.push(current);
            }
            current = current + Duration::days(1);
        }
        days
    }

    /// Total working hours between two dates, inclusive.
    pub fn capacity_in_range(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        self.available_days_in_range(start, end)
            .into_iter()
            .map(|date| self.capacity_on(date))
            .sum()
    }
}

/// End date of `duration_hours` of work from `start` under `window`,
/// skipping weekends unless `include_weekends` is set.
pub fn end_date(
    start: NaiveDate,
    duration_hours: f64,
    window: &ScheduleWindow,
    include_weekends: bool,
) -> NaiveDate {
    WorkCalendar::new(*window, include_weekends).end_date(start, duration_hours)
}

/// One calendar date inside a job's span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDay {
    pub date: NaiveDate,
    pub is_weekend: bool,
    pub included: bool,
    pub is_explicitly_excluded: bool,
    pub has_custom_schedule: bool,
}

/// Every date from `dateDebut` to `dateFin` with its working status.
pub fn job_days(job: &Job, config: &EngineConfig) -> Vec<JobDay> {
    let Some(interval) = job.date_interval() else {
        return Vec::new();
    };
    let calendar = WorkCalendar::for_job(job, config);
    let mut days = Vec::new();
    let mut current = interval.start;
    while current <= interval.end {
        days.push(JobDay {
            date: current,
            is_weekend: matches!(current.weekday(), Weekday::Sat | Weekday::Sun),
            included: calendar.is_available(current),
            is_explicitly_excluded: calendar.is_excluded(current),
            has_custom_schedule: calendar.has_override(current),
        });
        current = current + Duration::days(1);
    }
    days
}

/// A job's overall date/time range derived from its planned hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpan {
    pub date_debut: NaiveDate,
    pub date_fin: NaiveDate,
    pub heure_debut: NaiveTime,
    pub heure_fin: NaiveTime,
}

/// The job's span: the end date comes from the planned hours when they
/// are set, otherwise from `dateFin` (or the start date).
pub fn job_span(job: &Job, config: &EngineConfig) -> Option<JobSpan> {
    let start = job.date_debut?;
    let calendar = WorkCalendar::for_job(job, config);
    let end = match job.planned_hours {
        Some(hours) if hours.is_finite() && hours > 0.0 => calendar.end_date(start, hours),
        _ => job.date_fin.unwrap_or(start),
    };
    let (heure_debut, heure_fin) = calendar.window().bounds();
    Some(JobSpan {
        date_debut: start,
        date_fin: end.max(start),
        heure_debut,
        heure_fin,
    })
}
