use crate::help::Help;
use crate::host::Host;
use crate::month::MonthView;
use crate::panel::MonthPanel;
use crate::theme::BASE_STYLE;
use crate::year::YearView;
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use daymask::{
    ChangeDetail, ChangeSource, DateEntry, DisabledPlugin, LoadDetail, PanelLookup, Plugin,
    TapOutcome, TapTarget,
};
use ratatui::{backend::Backend, buffer::Buffer, layout::Rect, widgets::Widget, Terminal};
use std::io::{self, Write};
use time::{Date, Duration};

static HELP_HINT: &str = "Press ? for help";

#[derive(Debug)]
pub(crate) struct App {
    host: Host<DisabledPlugin>,
    panel: MonthPanel,
    cursor: TapTarget,
    selected: Option<Date>,
    pointer_visible: bool,
    view: View,
    state: AppState,
    status: String,
}

impl App {
    /// Attach the plugin and load the month containing `start`
    pub(crate) fn new(mut host: Host<DisabledPlugin>, start: Date) -> App {
        let patch = host.plugin_mut().on_attach();
        let mut detail = LoadDetail {
            date: start,
            checked: Some(start),
        };
        host.plugin_mut().on_load(&mut detail);
        let panel = MonthPanel::containing(start);
        let cursor = panel
            .position_of(start)
            .unwrap_or(TapTarget { week: 0, day: 0 });
        App {
            host,
            panel,
            cursor,
            selected: detail.checked,
            pointer_visible: patch.pointer_visible.unwrap_or(true),
            view: View::Month,
            state: AppState::Calendar,
            status: String::from(HELP_HINT),
        }
    }

    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(&mut *self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the key was invalid or its action was refused
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.move_cursor(-1),
                KeyCode::Char('l') | KeyCode::Right => self.move_cursor(1),
                KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-7),
                KeyCode::Char('j') | KeyCode::Down => self.move_cursor(7),
                KeyCode::Enter | KeyCode::Char(' ') => self.tap(),
                KeyCode::Char('n') | KeyCode::PageDown => self.page(true),
                KeyCode::Char('p') | KeyCode::PageUp => self.page(false),
                KeyCode::Char('d') => self.disable_cursor_day(),
                KeyCode::Char('c') => {
                    self.clear();
                    true
                }
                KeyCode::Char('y') => {
                    self.view = match self.view {
                        View::Month => View::Year(self.panel.year()),
                        View::Year(_) => View::Month,
                    };
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn cursor_day(&self) -> Option<Date> {
        self.panel.day_at(self.cursor.week, self.cursor.day)
    }

    fn move_cursor(&mut self, days: i64) -> bool {
        if self.view != View::Month {
            return false;
        }
        let target = self
            .cursor_day()
            .and_then(|d| d.checked_add(Duration::days(days)))
            .and_then(|d| self.panel.position_of(d));
        match target {
            Some(cursor) => {
                self.cursor = cursor;
                true
            }
            None => false,
        }
    }

    fn tap(&mut self) -> bool {
        if self.view != View::Month {
            return false;
        }
        match self.host.plugin_mut().catch_tap(self.cursor, &self.panel) {
            TapOutcome::Intercept => {
                if let Some(date) = self.cursor_day() {
                    self.status = format!("{date} is disabled");
                }
                false
            }
            TapOutcome::Proceed { pointer_visible } => {
                self.selected = self.cursor_day();
                self.pointer_visible = pointer_visible;
                if let Some(date) = self.selected {
                    self.status = format!("Selected {date}");
                }
                true
            }
        }
    }

    fn page(&mut self, forwards: bool) -> bool {
        match self.view {
            View::Month => {
                let next = if forwards {
                    self.panel.next()
                } else {
                    self.panel.previous()
                };
                let Some(panel) = next else {
                    return false;
                };
                let Some(first) = panel.first_day() else {
                    return false;
                };
                let patch = self.host.plugin_mut().on_change(&ChangeDetail {
                    date: first,
                    source: ChangeSource::Swipe,
                });
                if !patch.cancel {
                    self.selected = Some(first);
                }
                if let Some(visible) = patch.pointer_visible {
                    self.pointer_visible = visible;
                }
                self.cursor = panel
                    .position_of(first)
                    .unwrap_or(TapTarget { week: 0, day: 0 });
                self.panel = panel;
                true
            }
            View::Year(year) => {
                let year = if forwards {
                    year.checked_add(1)
                } else {
                    year.checked_sub(1)
                };
                match year.filter(|&y| Date::from_ordinal_date(y, 1).is_ok()) {
                    Some(y) => {
                        self.view = View::Year(y);
                        true
                    }
                    None => false,
                }
            }
        }
    }

    pub(crate) fn disable(&mut self, entries: Vec<DateEntry>) {
        if entries.is_empty() {
            return;
        }
        self.host.plugin_mut().disable(entries, false);
        self.host.sync();
    }

    fn disable_cursor_day(&mut self) -> bool {
        if self.view != View::Month {
            return false;
        }
        let Some(date) = self.cursor_day() else {
            return false;
        };
        self.host
            .plugin_mut()
            .disable([DateEntry::Point(date)], false);
        self.host.sync();
        self.status = format!("Disabled {date}; {}", self.refresh_summary());
        true
    }

    fn clear(&mut self) {
        self.host.plugin_mut().disable([], true);
        self.host.sync();
        self.status = format!("Enabled every day; {}", self.refresh_summary());
    }

    fn refresh_summary(&self) -> String {
        format!(
            "redrew {} range(s), refreshed {} cached year(s)",
            self.host.redrawn().len(),
            self.host.refreshed_years().len()
        )
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        match self.view {
            View::Month => MonthView {
                panel: &self.panel,
                styler: self.host.plugin(),
                cursor: self.cursor,
                selected: self.selected.filter(|_| self.pointer_visible),
                status: &self.status,
            }
            .render(area, buf),
            View::Year(year) => YearView {
                year,
                marks: self.host.annual_marks(year),
                status: &self.status,
            }
            .render(area, buf),
        }
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum View {
    Month,
    Year(i32),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Quitting,
}
