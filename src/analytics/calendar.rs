/// Year heatmap grid for a single habit
///
/// The grid is week-major: every week runs Sunday to Saturday, the first week
/// holds January 1 and the last holds December 31 of the target year. Days
/// outside the year pad the first and last week and are marked as such.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::domain::{DomainError, Habit};

const DAYS_PER_WEEK: usize = 7;
/// Extra weeks appended at most when December 31 is missing from the grid
const MAX_EXTRA_WEEKS: usize = 4;

/// Alpha appended to the habit color for completions without a quantity scale
const FIXED_ALPHA: u8 = 0xcc;

/// Month label columns, spaced for a 53-column layout
///
/// These are fixed visual offsets, not the week that contains each month's
/// first day.
const MONTH_LABEL_COLUMNS: [(&str, usize); 12] = [
    ("Jan", 2),
    ("Feb", 6),
    ("Mar", 11),
    ("Apr", 15),
    ("May", 19),
    ("Jun", 23),
    ("Jul", 28),
    ("Aug", 32),
    ("Sep", 37),
    ("Oct", 41),
    ("Nov", 45),
    ("Dec", 50),
];

/// One of four opacity steps for quantity-scaled cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntensityBand {
    Low,
    Medium,
    High,
    Full,
}

impl IntensityBand {
    /// Pick the band for a quantity relative to the habit's largest quantity
    ///
    /// The ratio is clamped to 1 and mapped into 0.6..=1.0 before banding, so
    /// even the smallest logged quantity stays clearly visible.
    pub fn for_ratio(ratio: f64) -> Self {
        let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 1.0 };
        let opacity = 0.6 + ratio * 0.4;

        if opacity < 0.7 {
            IntensityBand::Low
        } else if opacity < 0.8 {
            IntensityBand::Medium
        } else if opacity < 0.9 {
            IntensityBand::High
        } else {
            IntensityBand::Full
        }
    }

    /// Alpha channel value for this band
    pub fn alpha(&self) -> u8 {
        match self {
            IntensityBand::Low => 0xa0,
            IntensityBand::Medium => 0xb0,
            IntensityBand::High => 0xc0,
            IntensityBand::Full => 0xd0,
        }
    }

    /// Share of full opacity this band represents, as a (low, high) range
    pub fn opacity_range(&self) -> (f64, f64) {
        match self {
            IntensityBand::Low => (0.6, 0.7),
            IntensityBand::Medium => (0.7, 0.8),
            IntensityBand::High => (0.8, 0.9),
            IntensityBand::Full => (0.9, 1.0),
        }
    }
}

/// How strongly a completed cell is colored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "band")]
pub enum ColorIntensity {
    /// Single intensity for habits (or completions) without a quantity
    Fixed,
    /// Quantity-scaled intensity
    Scaled(IntensityBand),
}

impl ColorIntensity {
    /// Intensity for a completion of `habit` with the given quantity
    ///
    /// `max_quantity` is the habit's largest logged quantity; it is floored
    /// at 1 to keep the ratio defined.
    pub fn for_completion(habit: &Habit, quantity: Option<f64>, max_quantity: Option<f64>) -> Self {
        match (habit.track_quantity, quantity) {
            (true, Some(q)) => {
                let max = max_quantity.unwrap_or(1.0).max(1.0);
                ColorIntensity::Scaled(IntensityBand::for_ratio(q / max))
            }
            _ => ColorIntensity::Fixed,
        }
    }

    pub fn alpha(&self) -> u8 {
        match self {
            ColorIntensity::Fixed => FIXED_ALPHA,
            ColorIntensity::Scaled(band) => band.alpha(),
        }
    }

    /// Two lowercase hex digits of the alpha channel
    pub fn hex_suffix(&self) -> String {
        format!("{:02x}", self.alpha())
    }

    /// Append this intensity's alpha to a `#rrggbb` color
    pub fn apply(&self, color: &str) -> String {
        format!("{}{}", color, self.hex_suffix())
    }
}

/// A single day in the heatmap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// False for the padding days before January 1 and after December 31
    pub in_current_year: bool,
    pub is_completed: bool,
    pub is_future: bool,
    pub is_today: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    /// Present only for completed cells
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<ColorIntensity>,
}

impl CalendarCell {
    /// Cells outside the year, or in the future, cannot be logged
    pub fn is_interactive(&self) -> bool {
        self.in_current_year && !self.is_future
    }

    /// Hover text for the cell
    ///
    /// Empty for padding days. Otherwise the long date, followed by the
    /// quantity and unit or by "Completed" when the day is logged.
    pub fn tooltip(&self, unit: &str) -> String {
        if !self.in_current_year {
            return String::new();
        }

        let formatted = self.date.format("%A, %B %-d, %Y").to_string();
        if !self.is_completed {
            return formatted;
        }

        match self.quantity.filter(|q| *q != 0.0) {
            Some(quantity) => format!("{} • {} {}", formatted, quantity, unit),
            None => format!("{} • Completed", formatted),
        }
    }
}

/// Seven consecutive days, Sunday first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarWeek {
    pub days: Vec<CalendarCell>,
}

impl CalendarWeek {
    pub fn first_day(&self) -> Option<NaiveDate> {
        self.days.first().map(|c| c.date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.iter().any(|c| c.date == date)
    }
}

/// Label placed above a week column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthLabel {
    pub month: String,
    pub column: usize,
}

/// Full-year heatmap for one habit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarGrid {
    pub year: i32,
    pub weeks: Vec<CalendarWeek>,
    pub month_labels: Vec<MonthLabel>,
}

impl CalendarGrid {
    /// Build the grid for `year` as of the current time
    pub fn build(habit: &Habit, year: i32) -> Result<Self, DomainError> {
        Self::build_at(habit, year, Utc::now())
    }

    /// Build the grid for `year`, judging "today" and "future" against `now`
    pub fn build_at(habit: &Habit, year: i32, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let today = now.date_naive();
        let max_quantity = habit.max_quantity();

        let weeks = calendar_weeks(year)?
            .into_iter()
            .map(|dates| CalendarWeek {
                days: dates
                    .iter()
                    .map(|&date| {
                        let completion = habit.completion_on(date);
                        let quantity = completion.and_then(|c| c.quantity);
                        CalendarCell {
                            date,
                            in_current_year: date.year() == year,
                            is_completed: completion.is_some(),
                            is_future: date > today,
                            is_today: date == today,
                            quantity,
                            intensity: completion
                                .map(|_| ColorIntensity::for_completion(habit, quantity, max_quantity)),
                        }
                    })
                    .collect(),
            })
            .collect();

        Ok(Self {
            year,
            weeks,
            month_labels: month_labels(),
        })
    }

    pub fn week_count(&self) -> usize {
        self.weeks.len()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.weeks.iter().any(|w| w.contains(date))
    }

    /// Look up the cell for a date
    pub fn cell(&self, date: NaiveDate) -> Option<&CalendarCell> {
        self.weeks
            .iter()
            .flat_map(|w| w.days.iter())
            .find(|c| c.date == date)
    }

    /// Number of cells that belong to the target year
    pub fn days_in_year_shown(&self) -> usize {
        self.weeks
            .iter()
            .flat_map(|w| w.days.iter())
            .filter(|c| c.in_current_year)
            .count()
    }

    /// Cell at `(week, weekday)` where weekday 0 is Sunday
    pub fn at(&self, week: usize, weekday: usize) -> Option<&CalendarCell> {
        self.weeks.get(week).and_then(|w| w.days.get(weekday))
    }

    pub fn previous_year(&self) -> i32 {
        self.year - 1
    }

    pub fn next_year(&self) -> i32 {
        self.year + 1
    }

    /// Browsing forward stops at the current year
    pub fn has_next_year(&self, today: NaiveDate) -> bool {
        self.year < today.year()
    }
}

/// Sunday-aligned weeks covering the whole of `year`
///
/// The first week starts on the Sunday on or before January 1 and the last
/// ends on the Saturday on or after December 31.
pub fn calendar_weeks(year: i32) -> Result<Vec<[NaiveDate; DAYS_PER_WEEK]>, DomainError> {
    let out_of_range = || DomainError::InvalidDate(format!("year {} is out of range", year));

    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(out_of_range)?;
    let dec31 = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(out_of_range)?;

    let grid_start = jan1
        .checked_sub_signed(Duration::days(jan1.weekday().num_days_from_sunday() as i64))
        .ok_or_else(out_of_range)?;
    let grid_end = dec31
        .checked_add_signed(Duration::days(6 - dec31.weekday().num_days_from_sunday() as i64))
        .ok_or_else(out_of_range)?;

    let total_weeks = ((grid_end - grid_start).num_days() + 1) as usize / DAYS_PER_WEEK;

    let mut weeks = Vec::with_capacity(total_weeks + 1);
    let mut cursor = grid_start;
    for _ in 0..total_weeks {
        weeks.push(next_week(&mut cursor).ok_or_else(out_of_range)?);
    }

    let has_dec31 = |weeks: &[[NaiveDate; DAYS_PER_WEEK]]| weeks.iter().any(|w| w.contains(&dec31));
    if !has_dec31(&weeks) {
        tracing::warn!("December 31, {} missing from calendar grid, extending", year);
        for _ in 0..MAX_EXTRA_WEEKS {
            weeks.push(next_week(&mut cursor).ok_or_else(out_of_range)?);
            if has_dec31(&weeks) {
                break;
            }
        }
    }

    tracing::debug!(
        "Calendar grid for {}: {} weeks from {} to {}",
        year,
        weeks.len(),
        grid_start,
        weeks.last().map(|w| w[DAYS_PER_WEEK - 1]).unwrap_or(grid_end)
    );

    Ok(weeks)
}

fn next_week(cursor: &mut NaiveDate) -> Option<[NaiveDate; DAYS_PER_WEEK]> {
    let mut week = [*cursor; DAYS_PER_WEEK];
    for (offset, day) in week.iter_mut().enumerate() {
        *day = cursor.checked_add_signed(Duration::days(offset as i64))?;
    }
    *cursor = cursor.checked_add_signed(Duration::days(DAYS_PER_WEEK as i64))?;
    Some(week)
}

/// Month labels at their fixed columns
pub fn month_labels() -> Vec<MonthLabel> {
    MONTH_LABEL_COLUMNS
        .iter()
        .map(|(month, column)| MonthLabel {
            month: month.to_string(),
            column: *column,
        })
        .collect()
}
