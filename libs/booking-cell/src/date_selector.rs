use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Calendar constraints: nothing before today, optionally some weekdays off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateSelector {
    excluded_weekdays: Vec<Weekday>,
}

impl DateSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disable_sunday(self) -> Self {
        self.exclude_weekday(Weekday::Sun)
    }

    pub fn exclude_weekday(mut self, weekday: Weekday) -> Self {
        if !self.excluded_weekdays.contains(&weekday) {
            self.excluded_weekdays.push(weekday);
        }
        self
    }

    pub fn excluded_weekdays(&self) -> &[Weekday] {
        &self.excluded_weekdays
    }

    pub fn is_disabled(&self, date: NaiveDate, today: NaiveDate) -> bool {
        date < today || self.excluded_weekdays.contains(&date.weekday())
    }

    /// `value` when selectable. An excluded weekday moves forward to the next
    /// selectable day; a missing or past value starts the search from today.
    pub fn clamp(&self, value: Option<NaiveDate>, today: NaiveDate) -> NaiveDate {
        let start = match value {
            Some(date) if !self.is_disabled(date, today) => return date,
            Some(date) if date > today => date,
            _ => today,
        };

        (0..7u64)
            .filter_map(|offset| start.checked_add_days(Days::new(offset)))
            .find(|date| !self.is_disabled(*date, today))
            .unwrap_or(start)
    }
}
