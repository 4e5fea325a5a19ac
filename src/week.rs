use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::error::{Error, Result};
use crate::models::Quest;

/// Titles listed per day before collapsing into "+N more".
pub const MAX_PER_DAY: usize = 3;

#[derive(Debug)]
pub struct WeekDay<'a> {
    pub date: NaiveDate,
    pub quests: Vec<&'a Quest>,
    pub is_today: bool,
}

impl WeekDay<'_> {
    pub fn overflow(&self) -> usize {
        self.quests.len().saturating_sub(MAX_PER_DAY)
    }
}

/// The Sunday on or before `day`.
pub fn start_of_week(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_sunday() as i64)
}

/// Quests due on `date`, compared by UTC calendar day.
pub fn quests_due_on(quests: &[Quest], date: NaiveDate) -> Vec<&Quest> {
    quests
        .iter()
        .filter(|q| q.due_date.map(|d| d.date_naive()) == Some(date))
        .collect()
}

/// Seven days starting on Sunday, `offset` weeks away from the week that
/// contains `today`. Covers the whole board regardless of search and filters.
///
/// Fails with [`Error::InvalidDate`] when the offset leaves chrono's date range.
pub fn week_days(quests: &[Quest], today: NaiveDate, offset: i64) -> Result<Vec<WeekDay<'_>>> {
    let out_of_range = || Error::InvalidDate(format!("{} weeks from {}", offset, today));
    let start = Duration::try_weeks(offset)
        .and_then(|shift| start_of_week(today).checked_add_signed(shift))
        .ok_or_else(out_of_range)?;
    (0..7)
        .map(|i| {
            let date = start
                .checked_add_signed(Duration::days(i))
                .ok_or_else(out_of_range)?;
            Ok(WeekDay {
                date,
                quests: quests_due_on(quests, date),
                is_today: date == today,
            })
        })
        .collect()
}

pub fn week_range_label(days: &[WeekDay<'_>]) -> String {
    match (days.first(), days.last()) {
        (Some(first), Some(last)) => format!(
            "{} - {}",
            first.date.format("%b %-d"),
            last.date.format("%b %-d")
        ),
        _ => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueLabel {
    Overdue,
    Today,
    Tomorrow,
    InDays(i64),
    On(NaiveDate),
}

impl DueLabel {
    pub fn text(&self) -> String {
        match self {
            DueLabel::Overdue => "Overdue".to_string(),
            DueLabel::Today => "Today".to_string(),
            DueLabel::Tomorrow => "Tomorrow".to_string(),
            DueLabel::InDays(n) => format!("{}d", n),
            DueLabel::On(date) => date.format("%b %-d, %Y").to_string(),
        }
    }

    pub fn is_urgent(&self) -> bool {
        matches!(self, DueLabel::Overdue | DueLabel::Today | DueLabel::Tomorrow)
    }
}

/// Days are counted by rounding the remaining time up, so anything due
/// later today or less than a day ago still reads "Today".
pub fn due_label(due: DateTime<Utc>, now: DateTime<Utc>) -> DueLabel {
    let millis = (due - now).num_milliseconds();
    let days = (millis as f64 / 86_400_000.0).ceil() as i64;
    match days {
        d if d < 0 => DueLabel::Overdue,
        0 => DueLabel::Today,
        1 => DueLabel::Tomorrow,
        d if d <= 7 => DueLabel::InDays(d),
        _ => DueLabel::On(due.date_naive()),
    }
}
