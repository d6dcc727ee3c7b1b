use chrono::{DateTime, Local, NaiveDate};

use unsegen::base::style::*;

use crate::planner::{Planner, Status};

#[derive(Clone, Debug)]
pub enum Mode {
    Normal,
    Menu,
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub header_style: StyleModifier,
    pub header_text_style: TextFormatModifier,
    /// One style per shift cycle label.
    pub shift_styles: [StyleModifier; 3],
    pub marked_text_style: TextFormatModifier,
    pub today_char: Option<char>,
    pub legend_style: StyleModifier,
    pub menu_style: StyleModifier,
    pub status_error_style: StyleModifier,
    pub status_pending_style: StyleModifier,
    pub status_success_style: StyleModifier,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            header_style: StyleModifier::default().fg_color(Color::Yellow),
            header_text_style: TextFormatModifier::default(),
            shift_styles: [
                StyleModifier::default().fg_color(Color::Cyan),
                StyleModifier::default().fg_color(Color::Green),
                StyleModifier::default().fg_color(Color::Magenta),
            ],
            marked_text_style: TextFormatModifier::default().bold(true),
            today_char: Some('*'),
            legend_style: StyleModifier::default(),
            menu_style: StyleModifier::default().fg_color(Color::Blue),
            status_error_style: StyleModifier::default().fg_color(Color::Red),
            status_pending_style: StyleModifier::default().fg_color(Color::Yellow),
            status_success_style: StyleModifier::default().fg_color(Color::Green),
        }
    }
}

impl Theme {
    pub fn status_style(&self, status: &Status) -> StyleModifier {
        match status {
            Status::Idle => StyleModifier::default(),
            Status::Error(_) => self.status_error_style,
            Status::Pending(_) => self.status_pending_style,
            Status::Success(_) => self.status_success_style,
        }
    }
}

pub struct Context {
    pub mode: Mode,
    pub theme: Theme,
    planner: Planner,
    now: DateTime<Local>,
}

impl Context {
    pub fn new(planner: Planner) -> Self {
        Context {
            mode: Mode::Normal,
            theme: Theme::default(),
            planner,
            now: Local::now(),
        }
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    pub fn planner_mut(&mut self) -> &mut Planner {
        &mut self.planner
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    pub fn update(&mut self) {
        self.now = Local::now();
    }
}
