//! Calendar annotation logic.
//!
//! Maps exam dates to display markers without rendering anything. A
//! decorator is a (predicate-over-date, rendering-directive) pair evaluated
//! per visible day: the built-ins highlight today and place one colored dot
//! per subject on each exam date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::subject::Subject;

/// Colored dots shown under one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMarker {
    pub date: NaiveDate,
    /// One dot color per subject with an exam on this date.
    pub colors: Vec<u32>,
}

/// Group subjects by exam date into dot markers, ascending by date.
pub fn exam_markers(subjects: &[Subject]) -> Vec<DayMarker> {
    let mut by_date: BTreeMap<NaiveDate, Vec<u32>> = BTreeMap::new();
    for s in subjects {
        by_date.entry(s.exam_date).or_default().push(s.color);
    }
    by_date
        .into_iter()
        .map(|(date, colors)| DayMarker { date, colors })
        .collect()
}

/// Subjects whose exam falls on `date` (the day-tap popup content).
pub fn subjects_on<'a>(subjects: &'a [Subject], date: NaiveDate) -> Vec<&'a Subject> {
    subjects.iter().filter(|s| s.exam_date == date).collect()
}

/// What a decorator asks the presentation layer to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Directive {
    /// Circled background, inverted text.
    Highlight,
    /// One dot per color under the day number.
    Dots { colors: Vec<u32> },
}

/// A (predicate, directive) pair evaluated for every visible day.
pub trait DayDecorator {
    fn should_decorate(&self, day: NaiveDate) -> bool;
    fn directive(&self) -> Directive;
}

/// Highlights the current day.
pub struct TodayDecorator {
    today: NaiveDate,
}

impl TodayDecorator {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl DayDecorator for TodayDecorator {
    fn should_decorate(&self, day: NaiveDate) -> bool {
        day == self.today
    }

    fn directive(&self) -> Directive {
        Directive::Highlight
    }
}

/// Colored dots on a single exam date.
pub struct ExamDecorator {
    date: NaiveDate,
    colors: Vec<u32>,
}

impl ExamDecorator {
    pub fn new(date: NaiveDate, colors: Vec<u32>) -> Self {
        Self { date, colors }
    }
}

impl DayDecorator for ExamDecorator {
    fn should_decorate(&self, day: NaiveDate) -> bool {
        day == self.date
    }

    fn directive(&self) -> Directive {
        Directive::Dots {
            colors: self.colors.clone(),
        }
    }
}

/// The full decorator list for the main calendar: today's highlight plus one
/// exam decorator per marked date.
pub fn decorators(subjects: &[Subject], today: NaiveDate) -> Vec<Box<dyn DayDecorator>> {
    let mut list: Vec<Box<dyn DayDecorator>> = vec![Box::new(TodayDecorator::new(today))];
    for marker in exam_markers(subjects) {
        list.push(Box::new(ExamDecorator::new(marker.date, marker.colors)));
    }
    list
}

/// Evaluate every decorator against one visible day.
pub fn decorate_day(decorators: &[Box<dyn DayDecorator>], day: NaiveDate) -> Vec<Directive> {
    decorators
        .iter()
        .filter(|d| d.should_decorate(day))
        .map(|d| d.directive())
        .collect()
}
