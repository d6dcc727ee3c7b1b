use std::fmt::Display;
use std::fmt::Write;

use unsegen::base::*;
use unsegen::widget::*;

use crate::calendar::DAY_HEADERS;
use crate::planner::{CalendarView, ViewCell};

use super::{Context, Theme};

struct DayCell<'a> {
    cell: &'a ViewCell,
    is_today: bool,
    theme: &'a Theme,
}

impl DayCell<'_> {
    const CELL_HEIGHT: usize = 1;
    const CELL_WIDTH: usize = 4;
}

impl Display for DayCell<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use chrono::Datelike;

        let arg_today = if self.is_today {
            self.theme.today_char.unwrap_or(' ')
        } else {
            ' '
        };

        let arg_marker = match self.cell.marked {
            Some(kind) => kind.marker(),
            None => ' ',
        };

        write!(f, "{}{}{:>2}", arg_today, arg_marker, self.cell.date.day())
    }
}

/// Renders one month as a Monday-first grid: a weekday header row, leading
/// blanks and one cell per day, coloured by shift tag, with the event-type
/// marker when the day is part of the selection.
pub struct MonthPane<'a> {
    view: CalendarView,
    context: &'a Context,
}

impl<'a> MonthPane<'a> {
    const COLUMNS: usize = 7;
    const ROWS: usize = 6;
    const HEADER_ROWS: usize = 1;

    pub fn new(context: &'a Context) -> Self {
        MonthPane {
            view: context.planner().view(),
            context,
        }
    }
}

impl Widget for MonthPane<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::exact(Self::COLUMNS * DayCell::CELL_WIDTH),
            height: RowDemand::exact(Self::HEADER_ROWS + Self::ROWS * DayCell::CELL_HEIGHT),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let theme = &self.context.theme;
        let today = self.context.today();
        let focus = self.context.planner().cursor();

        let mut cursor = Cursor::new(&mut window)
            .wrapping_mode(WrappingMode::Wrap)
            .style_modifier(theme.header_style.format(theme.header_text_style));

        for &head in &DAY_HEADERS {
            write!(
                &mut cursor,
                "{:>width$}",
                &head,
                width = DayCell::CELL_WIDTH
            )
            .unwrap();
        }

        // blanks so day 1 lands in its weekday column
        cursor.set_style_modifier(StyleModifier::default());
        cursor.move_by(
            ColDiff::new((DayCell::CELL_WIDTH * self.view.leading_blanks as usize) as i32),
            RowDiff::new(0),
        );

        for cell in &self.view.cells {
            let mut style = theme.shift_styles[cell.shift.index()];
            if cell.marked.is_some() {
                style = style.format(theme.marked_text_style);
            }
            if cell.date == focus {
                style = style.invert(true);
            }

            cursor.set_style_modifier(style);
            write!(
                &mut cursor,
                "{}",
                DayCell {
                    cell,
                    is_today: cell.date == today,
                    theme,
                }
            )
            .unwrap();
        }
    }
}
