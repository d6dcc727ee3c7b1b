use std::fmt::Write as _;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use unsegen::base::style::StyleModifier;
use unsegen::base::{Cursor, Terminal, Window};
use unsegen::input::{Event as InputEvent, Key};
use unsegen::widget::*;

use crate::calendar::EventType;
use crate::config::Config;
use crate::events::{Dispatcher, Event};
use crate::planner::Planner;
use crate::session;
use crate::submit::Client;

use super::{Context, Mode, MonthPane};

/// Single status or caption line with one style.
struct TextLine {
    text: String,
    style: StyleModifier,
}

impl TextLine {
    fn new(text: String, style: StyleModifier) -> Self {
        TextLine { text, style }
    }
}

impl Widget for TextLine {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(self.text.chars().count()),
            height: RowDemand::exact(1),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let mut cursor = Cursor::new(&mut window).style_modifier(self.style);
        write!(&mut cursor, "{}", self.text).unwrap();
    }
}

pub struct App<'a> {
    config: &'a Config,
    context: Context,
    client: Client,
    redirect: Option<String>,
}

impl<'a> App<'a> {
    pub fn new(config: &'a Config, planner: Planner, client: Client) -> App<'a> {
        App {
            config,
            context: Context::new(planner),
            client,
            redirect: None,
        }
    }

    fn header(&self) -> TextLine {
        let planner = self.context.planner();

        let mut years = String::new();
        for year in planner.year_options() {
            if *year == planner.year() {
                write!(years, " [{}]", year).unwrap();
            } else {
                write!(years, " {}", year).unwrap();
            }
        }

        TextLine::new(
            format!(
                "{} {} |{} | Typ: {}",
                planner.month_name(),
                planner.year(),
                years,
                planner.current_type().label(),
            ),
            self.context.theme.header_style,
        )
    }

    fn legend(&self) -> TextLine {
        let mut text = String::new();
        for (index, kind) in EventType::ALL.iter().enumerate() {
            write!(text, "{}:{} [{}]  ", index + 1, kind.label(), kind.marker()).unwrap();
        }

        TextLine::new(text, self.context.theme.legend_style)
    }

    fn status_bar(&self) -> TextLine {
        let status = self.context.planner().status();

        TextLine::new(
            status.message().unwrap_or("").to_owned(),
            self.context.theme.status_style(status),
        )
    }

    fn as_widget<'w>(&'w self) -> impl Widget + 'w {
        let mut layout = VLayout::new()
            .widget(self.header())
            .widget(MonthPane::new(&self.context))
            .widget(self.legend())
            .widget(self.status_bar());

        if let Mode::Menu = self.context.mode {
            layout = layout
                .widget(TextLine::new(
                    format!("Wyloguj: {}", session::logout_url(&self.config.base_url)),
                    self.context.theme.menu_style,
                ))
                .widget(TextLine::new(
                    "Dowolny klawisz zamyka menu".to_owned(),
                    self.context.theme.menu_style,
                ));
        }

        layout
    }

    fn spawn_submission(&mut self, sink: &mpsc::Sender<Event>) {
        // begin_submission validates and refuses re-entry while in flight
        if let Some(request) = self.context.planner_mut().begin_submission() {
            let client = self.client.clone();
            let tx = sink.clone();
            thread::spawn(move || {
                let outcome = client.submit(&request);
                let _ = tx.send(Event::Submission(outcome));
            });
        }
    }

    fn handle_key(&mut self, key: Key, sink: &mpsc::Sender<Event>, run: &mut bool) {
        if let Mode::Menu = self.context.mode {
            // any input outside the menu closes it
            self.context.mode = Mode::Normal;
            return;
        }

        match key {
            Key::Char('q') => *run = false,
            Key::Char('h') => self.context.planner_mut().move_cursor(-1),
            Key::Char('l') => self.context.planner_mut().move_cursor(1),
            Key::Char('j') => self.context.planner_mut().move_cursor(7),
            Key::Char('k') => self.context.planner_mut().move_cursor(-7),
            Key::Char('n') => self.context.planner_mut().change_month(1),
            Key::Char('p') => self.context.planner_mut().change_month(-1),
            Key::Char('\n') | Key::Char(' ') => self.context.planner_mut().toggle_cursor(),
            Key::Char('\t') => self.context.planner_mut().cycle_current_type(),
            Key::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.context.planner_mut().set_current_type(EventType::ALL[index]);
            }
            Key::Char('s') => self.spawn_submission(sink),
            Key::Char('m') => self.context.mode = Mode::Menu,
            _ => {}
        }
    }

    pub fn run(
        &mut self,
        dispatcher: Dispatcher,
        mut term: Terminal,
    ) -> Result<Option<String>, Box<dyn std::error::Error>> {
        let sink = dispatcher.event_sink();
        let mut run = true;

        while run {
            if let Ok(event) = dispatcher.next() {
                match event {
                    Event::Update => {
                        self.context.update();
                        if let Some(url) =
                            self.context.planner_mut().due_redirect(Instant::now())
                        {
                            self.redirect = Some(url);
                            run = false;
                        }
                    }
                    Event::Submission(outcome) => {
                        self.context
                            .planner_mut()
                            .finish_submission(outcome, Instant::now());
                    }
                    Event::Input(input) => {
                        if input.matches(Key::Esc) {
                            self.context.mode = Mode::Normal;
                        } else if let InputEvent::Key(key) = input.event {
                            self.handle_key(key, &sink, &mut run);
                        }
                    }
                }
            }

            let root = term.create_root_window();
            self.as_widget().draw(root, RenderingHints::new());
            term.present();
        }

        Ok(self.redirect.take())
    }
}
