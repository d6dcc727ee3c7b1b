use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::{Datelike, NaiveDate};

use crate::calendar::{self, EventType, ShiftTag, MONTH_NAMES};
use crate::submit::{EventRecord, SubmitRequest, SubmitResult};

pub const MSG_SELECT_AT_LEAST_ONE: &str = "Proszę wybrać przynajmniej jeden dzień.";
pub const MSG_SUBMIT_IN_PROGRESS: &str = "Dodawanie wydarzeń...";
pub const MSG_SUBMIT_PENDING: &str = "Poprzednie wysyłanie jeszcze trwa.";
pub const MSG_ERROR_PREFIX: &str = "Błąd";

/// Message shown in the status line, tagged with its severity so the
/// rendering surface can pick a colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    Error(String),
    Pending(String),
    Success(String),
}

impl Status {
    pub fn message(&self) -> Option<&str> {
        match self {
            Status::Idle => None,
            Status::Error(msg) | Status::Pending(msg) | Status::Success(msg) => Some(msg),
        }
    }
}

/// A single rendered day: its date, cosmetic shift tag and, when the day is
/// part of the current selection, the chosen event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewCell {
    pub date: NaiveDate,
    pub shift: ShiftTag,
    pub marked: Option<EventType>,
}

/// Transient render model of the displayed month. Derived on demand from
/// the planner state, never authoritative.
#[derive(Debug, Clone)]
pub struct CalendarView {
    pub year: i32,
    pub month0: u32,
    pub leading_blanks: u32,
    pub cells: Vec<ViewCell>,
}

#[derive(Debug)]
struct Redirect {
    url: String,
    due: Instant,
}

/// Controller for the interactive selection calendar.
///
/// Owns the full UI-independent state: displayed month, year options,
/// currently armed event type, the per-day selection and the submission
/// status. The rendering surface only ever sees derived views.
#[derive(Debug)]
pub struct Planner {
    year: i32,
    month0: u32,
    year_options: Vec<i32>,
    current_type: EventType,
    selection: BTreeMap<NaiveDate, EventType>,
    cursor: NaiveDate,
    status: Status,
    submitting: bool,
    redirect: Option<Redirect>,
    redirect_delay: Duration,
}

impl Planner {
    /// Starts on the month of `today` with `today ± year_span` as the
    /// initial year options.
    pub fn new(today: NaiveDate, year_span: u32, redirect_delay: Duration) -> Self {
        let year = today.year();
        let span = year_span as i32;

        Planner {
            year,
            month0: today.month0(),
            year_options: (year - span..=year + span).collect(),
            current_type: EventType::Duty,
            selection: BTreeMap::new(),
            cursor: today,
            status: Status::Idle,
            submitting: false,
            redirect: None,
            redirect_delay,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month0 as usize]
    }

    pub fn year_options(&self) -> &[i32] {
        &self.year_options
    }

    pub fn current_type(&self) -> EventType {
        self.current_type
    }

    pub fn set_current_type(&mut self, kind: EventType) {
        self.current_type = kind;
    }

    pub fn cycle_current_type(&mut self) {
        self.current_type = self.current_type.next();
    }

    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    pub fn selection(&self) -> &BTreeMap<NaiveDate, EventType> {
        &self.selection
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Moves the day cursor by `days`, clamped to the displayed month so
    /// that cursor movement never navigates (and never clears) anything.
    pub fn move_cursor(&mut self, days: i64) {
        let grid = calendar::month_grid(self.year, self.month0);
        let first = grid.days.first().map(|c| c.date);
        let last = grid.days.last().map(|c| c.date);

        if let (Some(first), Some(last)) = (first, last) {
            let target = self.cursor + chrono::Duration::days(days);
            self.cursor = target.clamp(first, last);
        }
    }

    /// Displays `(year, month0)`, discarding the whole selection. The map
    /// may never hold a date outside the displayed month.
    pub fn show_month(&mut self, year: i32, month0: u32) {
        self.year = year;
        self.month0 = month0 % 12;
        self.selection.clear();
        self.cursor = NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1).unwrap();
    }

    /// Steps the displayed month by `offset` (−1 or +1) with a year
    /// carry/borrow. A year reached beyond the current options is inserted
    /// at the back when stepping forward, at the front when stepping back.
    /// Unsaved selections are discarded without confirmation.
    pub fn change_month(&mut self, offset: i32) {
        let mut month = self.month0 as i32 + offset;
        let mut year = self.year;

        if month > 11 {
            month = 0;
            year += 1;
        } else if month < 0 {
            month = 11;
            year -= 1;
        }

        if !self.year_options.contains(&year) {
            if offset > 0 {
                self.year_options.push(year);
            } else {
                self.year_options.insert(0, year);
            }
        }

        self.show_month(year, month as u32);
    }

    /// Selection toggle: an unselected day becomes selected with the
    /// currently armed type, a day selected with that same type becomes
    /// unselected, and any other selection is overwritten.
    pub fn toggle(&mut self, date: NaiveDate) {
        match self.selection.get(&date) {
            Some(kind) if *kind == self.current_type => {
                self.selection.remove(&date);
                log::debug!("deselected {}", date);
            }
            _ => {
                self.selection.insert(date, self.current_type);
                log::debug!("selected {} as {}", date, self.current_type.label());
            }
        }
    }

    pub fn toggle_cursor(&mut self) {
        self.toggle(self.cursor);
    }

    pub fn view(&self) -> CalendarView {
        let grid = calendar::month_grid(self.year, self.month0);

        CalendarView {
            year: grid.year,
            month0: grid.month0,
            leading_blanks: grid.leading_blanks,
            cells: grid
                .days
                .iter()
                .map(|cell| ViewCell {
                    date: cell.date,
                    shift: cell.shift,
                    marked: self.selection.get(&cell.date).copied(),
                })
                .collect(),
        }
    }

    /// Validates and opens a submission. Returns the payload to send, or
    /// `None` when nothing may be sent: an empty selection is a user error,
    /// and a second submission is refused while one is in flight.
    pub fn begin_submission(&mut self) -> Option<SubmitRequest> {
        if self.submitting {
            self.status = Status::Pending(MSG_SUBMIT_PENDING.to_owned());
            return None;
        }

        if self.selection.is_empty() {
            self.status = Status::Error(MSG_SELECT_AT_LEAST_ONE.to_owned());
            return None;
        }

        self.submitting = true;
        self.status = Status::Pending(MSG_SUBMIT_IN_PROGRESS.to_owned());

        Some(SubmitRequest {
            events: self
                .selection
                .iter()
                .map(|(date, kind)| EventRecord {
                    date: *date,
                    kind: *kind,
                })
                .collect(),
        })
    }

    /// Closes the submission opened by [`begin_submission`]. On success the
    /// server message is shown and a provided redirect target is armed to
    /// fire after the configured delay; on failure the error is shown and
    /// the selection stays untouched so the user may retry.
    pub fn finish_submission(&mut self, outcome: SubmitResult, now: Instant) {
        self.submitting = false;

        match outcome {
            Ok(response) => {
                log::info!("submission accepted: {}", response.message);
                self.status = Status::Success(response.message);
                if let Some(url) = response.redirect_url {
                    self.redirect = Some(Redirect {
                        url,
                        due: now + self.redirect_delay,
                    });
                }
            }
            Err(error) => {
                log::warn!("submission failed: {}", error);
                self.status = Status::Error(format!("{}: {}", MSG_ERROR_PREFIX, error.detail()));
            }
        }
    }

    /// Releases the armed redirect target once its delay has elapsed.
    pub fn due_redirect(&mut self, now: Instant) -> Option<String> {
        if self.redirect.as_ref().map_or(false, |r| r.due <= now) {
            self.redirect.take().map(|r| r.url)
        } else {
            None
        }
    }
}
