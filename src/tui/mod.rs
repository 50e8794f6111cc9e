// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Hosts the interaction core in a ratatui + crossterm shell: draws the page view-model, maps
//! keys to controller actions, runs confirmations modally, and performs navigations by building
//! the next page from the session store.

use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    buffer::Buffer,
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::color::Rgb;
use crate::config::Config;
use crate::controller::{
    check_storage, Action, Controller, Navigation, Notice, Outcome, QueryEdit, SelectTarget,
    ShiftDirection, UserPrompt,
};
use crate::i18n::Messages;
use crate::model::{Dataset, ImageId};
use crate::pages::PageSource;
use crate::store::{DiscardStore, SessionStore};
use crate::view::{build_page, GridCell, LabelButton, PageView, ResultsView};

mod palette;

use palette::{ClassPalette, PALETTE_MAX_ROWS};

const FOCUS_COLOR: Color = Color::LightGreen;
const SELECTED_COLOR: Color = Color::Yellow;
const WARNING_COLOR: Color = Color::LightRed;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_BRAND_COLOR: Color = Color::White;
const FOOTER_BRAND: &str = "🅶 🅰 🆂 🅴 🅰 🆁 🅲 🅷 ";
const TILE_HEIGHT: u16 = 6;
const SIDEBAR_WIDTH: u16 = 30;
const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Runs the interactive terminal UI until the user quits.
pub fn run(
    dataset: Dataset,
    config: Config,
    messages: Messages,
    source: Box<dyn PageSource>,
    mut store: SessionStore,
) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;

    {
        let mut prompt = TerminalPrompt::new(&mut terminal, Buffer::empty(Rect::default()));
        if !check_storage(&mut store, messages, &mut prompt) {
            log::warn!("running without session persistence");
        }
    }

    let mut app = App::new(dataset, config, messages, source, store);

    while !app.should_quit {
        let backdrop = terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let mut prompt = TerminalPrompt::new(&mut terminal, backdrop);
                    let outcome = app.handle_key(key, &mut prompt);
                    let notices = prompt.into_notices();
                    for notice in notices {
                        app.set_toast(notice.text);
                    }
                    app.apply(outcome);
                }
                _ => {}
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Grid,
    Query,
    TopClasses,
}

impl Focus {
    /// Next focus in Tab order, skipping panels that are not shown.
    fn cycle(self, query_enabled: bool, has_top_classes: bool) -> Self {
        let mut next = self;
        for _ in 0..3 {
            next = match next {
                Self::Grid => Self::Query,
                Self::Query => Self::TopClasses,
                Self::TopClasses => Self::Grid,
            };
            let shown = match next {
                Self::Grid => true,
                Self::Query => query_enabled,
                Self::TopClasses => has_top_classes,
            };
            if shown {
                return next;
            }
        }
        Self::Grid
    }
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

struct ResultsScreen {
    controller: Controller,
    view: ResultsView,
    focus: Focus,
    cursor: usize,
    context_cursor: usize,
    top_cursor: usize,
    grid_scroll: usize,
    palette: Option<ClassPalette>,
}

impl ResultsScreen {
    fn cell_count(&self) -> usize {
        self.view.rows.iter().map(Vec::len).sum()
    }

    fn cursor_cell(&self) -> Option<&GridCell> {
        self.view.cells().nth(self.cursor)
    }

    fn columns(&self) -> usize {
        self.view.rows.first().map(Vec::len).unwrap_or(1).max(1)
    }

    fn move_cursor(&mut self, d_col: isize, d_row: isize) {
        let count = self.cell_count();
        if count == 0 {
            return;
        }
        let columns = self.columns() as isize;
        let delta = d_row * columns + d_col;
        let next = (self.cursor as isize + delta).clamp(0, count as isize - 1);
        self.cursor = next as usize;
    }

    fn context_ids(&self) -> &[ImageId] {
        self.controller
            .context()
            .map(|window| window.ids.as_slice())
            .unwrap_or_default()
    }

    /// Puts the context cursor on the window center.
    fn reset_context_cursor(&mut self) {
        let center = self.controller.context().map(|window| window.center);
        self.context_cursor = self
            .context_ids()
            .iter()
            .position(|id| Some(*id) == center)
            .unwrap_or(0);
    }
}

enum Screen {
    Results(Box<ResultsScreen>),
    Finished {
        store: SessionStore,
        message: &'static str,
    },
}

impl Screen {
    fn into_store(self) -> SessionStore {
        match self {
            Self::Results(screen) => screen.controller.into_store(),
            Self::Finished { store, .. } => store,
        }
    }
}

pub struct App {
    dataset: Dataset,
    config: Config,
    messages: Messages,
    source: Box<dyn PageSource>,
    screen: Screen,
    toast: Option<Toast>,
    help_scroll: u16,
    should_quit: bool,
}

impl App {
    pub fn new(
        dataset: Dataset,
        config: Config,
        messages: Messages,
        mut source: Box<dyn PageSource>,
        store: SessionStore,
    ) -> Self {
        let screen = open_page(&dataset, &config, messages, source.as_mut(), None, store);
        Self {
            dataset,
            config,
            messages,
            source,
            screen,
            toast: None,
            help_scroll: 0,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    /// Performs what the controller asked for after an action.
    fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Stay => {}
            Outcome::Navigate(navigation) => self.navigate(Some(navigation)),
            Outcome::Reload => self.navigate(None),
        }
    }

    /// Drops the current page and builds the next one from the stored session.
    fn navigate(&mut self, navigation: Option<Navigation>) {
        let placeholder = Screen::Finished {
            store: SessionStore::new(DiscardStore),
            message: "",
        };
        let store = std::mem::replace(&mut self.screen, placeholder).into_store();
        log::info!(
            "navigate {}",
            navigation.as_ref().map(ToString::to_string).unwrap_or_else(|| "reload".to_owned())
        );
        self.help_scroll = 0;
        self.screen = open_page(
            &self.dataset,
            &self.config,
            self.messages,
            self.source.as_mut(),
            navigation.as_ref(),
            store,
        );
    }

    fn handle_key(&mut self, key: KeyEvent, prompt: &mut dyn UserPrompt) -> Outcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Outcome::Stay;
        }

        let screen = match &mut self.screen {
            Screen::Results(screen) => screen,
            Screen::Finished { .. } => {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter) {
                    self.should_quit = true;
                }
                return Outcome::Stay;
            }
        };

        if screen.palette.is_some() {
            return handle_palette_key(screen, &self.dataset, key.code, prompt);
        }

        if screen.controller.help_open() {
            match key.code {
                KeyCode::Esc | KeyCode::Char('?') => {
                    self.help_scroll = 0;
                    return screen.controller.handle(Action::CloseOverlay, prompt);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.help_scroll = self.help_scroll.saturating_add(1)
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.help_scroll = self.help_scroll.saturating_sub(1)
                }
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return Outcome::Stay;
        }

        if ctrl && key.code == KeyCode::Char('s') {
            return screen.controller.handle(Action::SubmitSimilarityQuery, prompt);
        }

        if screen.controller.context().is_some() {
            return handle_context_key(screen, key.code, prompt);
        }

        match screen.focus {
            Focus::Query => handle_query_key(screen, key.code, prompt),
            Focus::TopClasses => handle_top_classes_key(screen, key.code, prompt),
            Focus::Grid => {
                if key.code == KeyCode::Char('q') {
                    self.should_quit = true;
                    return Outcome::Stay;
                }
                handle_grid_key(screen, &self.dataset, key.code, prompt)
            }
        }
    }
}

fn open_page(
    dataset: &Dataset,
    config: &Config,
    messages: Messages,
    source: &mut dyn PageSource,
    navigation: Option<&Navigation>,
    store: SessionStore,
) -> Screen {
    let session = store.load();
    let page = source.page(navigation, &session, dataset);
    match build_page(dataset, &page, &session, config, &messages) {
        PageView::Finished { message } => Screen::Finished { store, message },
        PageView::Results(view) => {
            let controller =
                Controller::new(config.clone(), messages, store, session, page.target());
            Screen::Results(Box::new(ResultsScreen {
                controller,
                view,
                focus: Focus::Grid,
                cursor: 0,
                context_cursor: 0,
                top_cursor: 0,
                grid_scroll: 0,
                palette: None,
            }))
        }
    }
}

fn handle_palette_key(
    screen: &mut ResultsScreen,
    dataset: &Dataset,
    code: KeyCode,
    prompt: &mut dyn UserPrompt,
) -> Outcome {
    let Some(palette) = screen.palette.as_mut() else {
        return Outcome::Stay;
    };
    let catalog = dataset.classes();
    match code {
        KeyCode::Esc => screen.palette = None,
        KeyCode::Enter => {
            let picked = palette.selected().and_then(|class_id| catalog.name(class_id));
            if let Some(name) = picked {
                let action = Action::AddLabelText {
                    text: name.to_owned(),
                    source: None,
                };
                screen.palette = None;
                return screen.controller.handle(action, prompt);
            }
        }
        KeyCode::Down => palette.move_by(1),
        KeyCode::Up => palette.move_by(-1),
        KeyCode::Backspace => palette.pop(catalog),
        KeyCode::Char(ch) => palette.push(ch, catalog),
        _ => {}
    }
    Outcome::Stay
}

fn handle_context_key(
    screen: &mut ResultsScreen,
    code: KeyCode,
    prompt: &mut dyn UserPrompt,
) -> Outcome {
    let count = screen.context_ids().len();
    let focused = screen.context_ids().get(screen.context_cursor).copied();
    match code {
        KeyCode::Esc => return screen.controller.handle(Action::CloseOverlay, prompt),
        KeyCode::Left | KeyCode::Char('h') => {
            screen.context_cursor = screen.context_cursor.saturating_sub(1)
        }
        KeyCode::Right | KeyCode::Char('l') => {
            screen.context_cursor = (screen.context_cursor + 1).min(count.saturating_sub(1))
        }
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('a') => {
            if let Some(id) = focused {
                let modifier = code == KeyCode::Char('a');
                return screen
                    .controller
                    .handle(Action::ContextClick { id, modifier }, prompt);
            }
        }
        KeyCode::Char('<') | KeyCode::Char(',') => {
            screen
                .controller
                .handle(Action::ShiftContext(ShiftDirection::Previous), prompt);
            screen.reset_context_cursor();
        }
        KeyCode::Char('>') | KeyCode::Char('.') => {
            screen
                .controller
                .handle(Action::ShiftContext(ShiftDirection::Next), prompt);
            screen.reset_context_cursor();
        }
        KeyCode::Char('?') => return screen.controller.handle(Action::ShowHelp, prompt),
        _ => {}
    }
    Outcome::Stay
}

fn handle_query_key(
    screen: &mut ResultsScreen,
    code: KeyCode,
    prompt: &mut dyn UserPrompt,
) -> Outcome {
    let edit = match code {
        KeyCode::Enter => return screen.controller.handle(Action::SubmitTextQuery, prompt),
        KeyCode::Esc => {
            screen.focus = Focus::Grid;
            return Outcome::Stay;
        }
        KeyCode::Tab => {
            screen.focus = screen.focus.cycle(true, !screen.view.top_classes.is_empty());
            return Outcome::Stay;
        }
        KeyCode::Left => QueryEdit::Left,
        KeyCode::Right => QueryEdit::Right,
        KeyCode::Home => QueryEdit::Home,
        KeyCode::End => QueryEdit::End,
        KeyCode::Backspace => QueryEdit::Backspace,
        KeyCode::Delete => QueryEdit::Delete,
        KeyCode::Char(ch) => QueryEdit::Insert(ch),
        _ => return Outcome::Stay,
    };
    screen.controller.handle(Action::EditQuery(edit), prompt)
}

fn handle_top_classes_key(
    screen: &mut ResultsScreen,
    code: KeyCode,
    prompt: &mut dyn UserPrompt,
) -> Outcome {
    let count = screen.view.top_classes.len();
    match code {
        KeyCode::Esc => screen.focus = Focus::Grid,
        KeyCode::Tab => {
            let query_enabled = screen.view.search_bar.input_visible;
            screen.focus = screen.focus.cycle(query_enabled, count > 0);
        }
        KeyCode::Left | KeyCode::Char('h') => {
            screen.top_cursor = screen.top_cursor.saturating_sub(1)
        }
        KeyCode::Right | KeyCode::Char('l') => {
            screen.top_cursor = (screen.top_cursor + 1).min(count.saturating_sub(1))
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(label) = screen.view.top_classes.get(screen.top_cursor) {
                let action = Action::AddLabelText {
                    text: label.text.to_string(),
                    source: None,
                };
                return screen.controller.handle(action, prompt);
            }
        }
        _ => {}
    }
    Outcome::Stay
}

fn handle_grid_key(
    screen: &mut ResultsScreen,
    dataset: &Dataset,
    code: KeyCode,
    prompt: &mut dyn UserPrompt,
) -> Outcome {
    let current = screen.cursor_cell().map(|cell| cell.id);
    let bar = &screen.view.search_bar;
    let action = match code {
        KeyCode::Left | KeyCode::Char('h') => {
            screen.move_cursor(-1, 0);
            return Outcome::Stay;
        }
        KeyCode::Right | KeyCode::Char('l') => {
            screen.move_cursor(1, 0);
            return Outcome::Stay;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            screen.move_cursor(0, -1);
            return Outcome::Stay;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            screen.move_cursor(0, 1);
            return Outcome::Stay;
        }
        KeyCode::Tab => {
            let query_enabled = bar.input_visible;
            screen.focus = screen.focus.cycle(query_enabled, !screen.view.top_classes.is_empty());
            return Outcome::Stay;
        }
        KeyCode::Char('/') | KeyCode::Char('i') => {
            if bar.input_visible {
                screen.focus = Focus::Query;
            }
            return Outcome::Stay;
        }
        KeyCode::Char('\\') => {
            screen.palette = Some(ClassPalette::new(dataset.classes()));
            return Outcome::Stay;
        }
        KeyCode::Enter | KeyCode::Char(' ') => match current {
            Some(id) => Action::Select(SelectTarget::Grid(id)),
            None => return Outcome::Stay,
        },
        KeyCode::Char('a') => match current {
            Some(id) => Action::CheckAnswer(id),
            None => return Outcome::Stay,
        },
        KeyCode::Char('+') | KeyCode::Char('-') => match current {
            Some(id) => Action::ToggleMoreLabels(id),
            None => return Outcome::Stay,
        },
        KeyCode::Char(digit @ '1'..='9') => {
            let Some(cell) = screen.cursor_cell() else {
                return Outcome::Stay;
            };
            let expanded = screen.controller.is_expanded(cell.id);
            let nth = digit as usize - '1' as usize;
            match cell.visible_labels(expanded).nth(nth) {
                Some(label) => Action::AddLabelText {
                    text: label.text.to_string(),
                    source: label.source,
                },
                None => return Outcome::Stay,
            }
        }
        KeyCode::Char('s') => Action::SubmitSimilarityQuery,
        KeyCode::Char('b') => Action::SubmitBayesQuery,
        KeyCode::Char('n') => {
            if screen.controller.budget_exhausted() {
                Action::SubmitTextQuery
            } else {
                Action::AdvanceToNextImage
            }
        }
        KeyCode::Char('c') => {
            if !bar.clear_visible {
                return Outcome::Stay;
            }
            Action::ClearQuery
        }
        KeyCode::Char('?') => Action::ShowHelp,
        _ => return Outcome::Stay,
    };

    let outcome = screen.controller.handle(action, prompt);
    if screen.controller.context().is_some() {
        screen.reset_context_cursor();
    }
    outcome
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

    let toast_snapshot = app.toast.as_ref().map(|toast| (toast.message.clone(), toast.expires_at));
    let toast_suffix = match toast_snapshot {
        Some((message, expires_at)) if expires_at > Instant::now() => format!(" | {message}"),
        Some(_) => {
            app.toast = None;
            String::new()
        }
        None => String::new(),
    };

    let screen = match &mut app.screen {
        Screen::Results(screen) => screen,
        Screen::Finished { message, .. } => {
            let block = Block::default()
                .borders(Borders::ALL)
                .title(view_title("Gasearch", 'q', None));
            let paragraph = Paragraph::new(vec![Line::from(""), Line::from(*message)])
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, centered_rect(60, 30, main_area));
            let mut spans = Vec::new();
            push_footer_entry(&mut spans, "quit", "q");
            let status = Paragraph::new(Line::from(spans));
            frame.render_widget(status, status_area);
            return;
        }
    };

    let [search_area, body_area] =
        Layout::vertical([Constraint::Length(4), Constraint::Min(1)]).areas(main_area);
    let (grid_area, sidebar_area) = if stack_sidebar_below(body_area) {
        let [grid, sidebar] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(5)]).areas(body_area);
        (grid, sidebar)
    } else {
        let [grid, sidebar] =
            Layout::horizontal([Constraint::Min(1), Constraint::Length(SIDEBAR_WIDTH)])
                .areas(body_area);
        (grid, sidebar)
    };

    draw_search_bar(frame, screen, search_area);
    draw_grid(frame, screen, grid_area);
    draw_sidebar(frame, screen, &app.config, sidebar_area);

    if screen.controller.context().is_some() {
        draw_context(frame, screen, &app.config, main_area);
    }
    if let Some(palette) = &screen.palette {
        draw_palette(frame, palette, &app.dataset, main_area);
    }

    let status = Paragraph::new(footer_help_line(screen, &toast_suffix));
    frame.render_widget(status, status_area);
    let brand = Paragraph::new(footer_brand_line()).alignment(Alignment::Right);
    frame.render_widget(brand, status_area);

    if screen.controller.help_open() {
        render_help(frame, &mut app.help_scroll, main_area);
    }
}

fn draw_search_bar(frame: &mut Frame<'_>, screen: &ResultsScreen, area: Rect) {
    let bar = &screen.view.search_bar;
    let query_focused = screen.focus == Focus::Query && screen.palette.is_none();
    let title = view_title(bar.primary_label, '/', None);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border_style(query_focused))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [input_area, top_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(inner);

    let query = screen.controller.query();
    let input = if bar.input_visible {
        Line::from(vec![Span::raw("> "), Span::raw(query.as_str().to_owned())])
    } else {
        Line::from(Span::styled(
            format!("[Enter/n] {}", bar.primary_label),
            Style::default().fg(FOOTER_KEY_COLOR),
        ))
    };
    frame.render_widget(Paragraph::new(input), input_area);
    if query_focused && bar.input_visible {
        let cursor_x = input_area
            .x
            .saturating_add(2)
            .saturating_add(query.cursor() as u16)
            .min(input_area.x.saturating_add(input_area.width.saturating_sub(1)));
        frame.set_cursor_position((cursor_x, input_area.y));
    }

    let top_focused = screen.focus == Focus::TopClasses;
    let mut spans = vec![Span::styled(
        format!("{}: ", screen.view.top_classes_title),
        Style::default().fg(FOOTER_LABEL_COLOR),
    )];
    for (idx, label) in screen.view.top_classes.iter().enumerate() {
        let mut style = label_style(label);
        if top_focused && idx == screen.top_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(format!(" {} ", label.text), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), top_area);
}

fn tile_lines(cell: &GridCell, expanded: bool) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        image_caption(&cell.image_path).to_owned(),
        Style::default().fg(Color::Gray),
    ))];
    let mut spans = Vec::new();
    for (idx, label) in cell.visible_labels(expanded).enumerate() {
        if idx < 9 {
            spans.push(Span::styled(
                format!("{}", idx + 1),
                Style::default().fg(FOOTER_KEY_COLOR),
            ));
        }
        spans.push(Span::styled(label.text.to_string(), label_style(label)));
        spans.push(Span::raw(" "));
    }
    if cell.has_more() {
        spans.push(Span::styled(
            format!("[{}]", cell.toggle_glyph(expanded)),
            Style::default().fg(FOOTER_KEY_COLOR),
        ));
    }
    lines.push(Line::from(spans));
    lines
}

fn draw_grid(frame: &mut Frame<'_>, screen: &mut ResultsScreen, area: Rect) {
    let grid_focused = screen.focus == Focus::Grid;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border_style(grid_focused))
        .title(view_title("Results", 'g', None));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = screen.columns();
    let visible_rows = (inner.height / TILE_HEIGHT).max(1) as usize;
    screen.grid_scroll = grid_scroll_for(screen.cursor / columns, screen.grid_scroll, visible_rows);

    let highlighted = screen.controller.selection().highlighted_image_id();
    let row_constraints = vec![Constraint::Length(TILE_HEIGHT); visible_rows];
    let row_areas = Layout::vertical(row_constraints).split(inner);
    let col_constraints = vec![Constraint::Ratio(1, columns as u32); columns];

    let shown_rows = screen.view.rows.iter().skip(screen.grid_scroll).take(visible_rows);
    for (row_offset, row) in shown_rows.enumerate() {
        let cell_areas = Layout::horizontal(col_constraints.clone()).split(row_areas[row_offset]);
        for (col, cell) in row.iter().enumerate() {
            let index = (screen.grid_scroll + row_offset) * columns + col;
            let is_cursor = index == screen.cursor;
            let is_selected = highlighted == Some(cell.id);
            let expanded = screen.controller.is_expanded(cell.id);
            let tile = Paragraph::new(tile_lines(cell, expanded))
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(tile_border_style(is_cursor, is_selected, grid_focused))
                        .title(format!(" {} ", cell.id)),
                );
            frame.render_widget(tile, cell_areas[col]);
        }
    }
}

fn draw_sidebar(frame: &mut Frame<'_>, screen: &ResultsScreen, config: &Config, area: Rect) {
    let target = &screen.view.target;
    let bar = &screen.view.search_bar;
    let mut lines = vec![
        Line::from(Span::styled(
            image_caption(&target.image_path).to_owned(),
            Style::default().fg(SELECTED_COLOR).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Attempts ", Style::default().fg(FOOTER_LABEL_COLOR)),
            Span::raw(attempts_label(bar.attempts_left, config.max_attempts)),
        ]),
    ];
    if let Some(skip) = target.skip_label {
        lines.push(Line::from(vec![
            Span::styled("[n] ", Style::default().fg(FOOTER_KEY_COLOR)),
            Span::raw(skip),
        ]));
    }
    if !screen.controller.query().is_empty() && bar.clear_visible {
        lines.push(Line::from(vec![
            Span::styled("[c] ", Style::default().fg(FOOTER_KEY_COLOR)),
            Span::raw(bar.clear_label),
        ]));
    }
    if !screen.controller.store().is_persistent() {
        lines.push(Line::from(Span::styled(
            "no persistence",
            Style::default().fg(WARNING_COLOR),
        )));
    }

    let block = Block::default().borders(Borders::ALL).title(view_title(target.title, 'n', None));
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

fn draw_context(frame: &mut Frame<'_>, screen: &ResultsScreen, config: &Config, main_area: Rect) {
    let Some(window) = screen.controller.context() else {
        return;
    };
    let area = centered_rect(90, 40, main_area);
    frame.render_widget(Clear, area);

    let shift_visible = screen.view.context_controls.visible(true);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(FOCUS_COLOR))
        .title(view_title("Context", 'c', Some(&window.center.to_string())));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = Vec::new();
    if shift_visible {
        constraints.push(Constraint::Length(3));
    }
    let tiles = window.ids.len();
    constraints.extend(std::iter::repeat(Constraint::Ratio(1, tiles.max(1) as u32)).take(tiles));
    if shift_visible {
        constraints.push(Constraint::Length(3));
    }
    let areas = Layout::horizontal(constraints).split(inner);
    let offset = usize::from(shift_visible);

    if shift_visible {
        let arrow = Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD);
        frame.render_widget(Paragraph::new(Span::styled(" < ", arrow)), areas[0]);
        frame.render_widget(
            Paragraph::new(Span::styled(" > ", arrow)),
            areas[areas.len() - 1],
        );
    }

    for (idx, id) in window.ids.iter().enumerate() {
        let is_cursor = idx == screen.context_cursor;
        let is_center = *id == window.center;
        let mut border = tile_border_style(is_cursor, false, true);
        if is_center {
            border = border.add_modifier(Modifier::BOLD);
        }
        let caption = crate::view::image_path(config, *id);
        let mut lines = vec![Line::from(image_caption(&caption).to_owned())];
        if let Some(record) = screen.view.cell(*id) {
            let labels = record
                .labels
                .iter()
                .filter(|label| !label.hidden)
                .map(|label| Span::styled(format!("{} ", label.text), label_style(label)))
                .collect::<Vec<_>>();
            lines.push(Line::from(labels));
        }
        let tile = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format!(" {id} ")),
        );
        frame.render_widget(tile, areas[idx + offset]);
    }
}

fn draw_palette(frame: &mut Frame<'_>, palette: &ClassPalette, dataset: &Dataset, main_area: Rect) {
    let area = centered_rect(50, 60, main_area);
    frame.render_widget(Clear, area);

    let catalog = dataset.classes();
    let mut lines = vec![Line::from(vec![
        Span::styled("\\ ", Style::default().fg(FOOTER_KEY_COLOR)),
        Span::raw(palette.query().to_owned()),
    ])];
    let start = palette.cursor().saturating_sub(PALETTE_MAX_ROWS - 1);
    for (idx, class_id) in palette.matches().iter().enumerate().skip(start).take(PALETTE_MAX_ROWS) {
        let name = catalog.name(*class_id).unwrap_or_default();
        let percent = catalog.frequency(*class_id);
        let mut style = Style::default();
        if idx == palette.cursor() {
            style = style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(vec![
            Span::styled(format!("{name:<24}"), style),
            Span::styled(format!("{percent:>6.2}%"), Style::default().fg(Color::Gray)),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(FOCUS_COLOR))
        .title(view_title("Classes", '\\', None));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Modal dialogs drawn over the last rendered frame.
struct TerminalPrompt<'a> {
    terminal: &'a mut TerminalSession,
    backdrop: Buffer,
    notices: Vec<Notice>,
}

impl<'a> TerminalPrompt<'a> {
    fn new(terminal: &'a mut TerminalSession, backdrop: Buffer) -> Self {
        Self {
            terminal,
            backdrop,
            notices: Vec::new(),
        }
    }

    fn into_notices(self) -> Vec<Notice> {
        self.notices
    }
}

impl UserPrompt for TerminalPrompt<'_> {
    fn confirm(&mut self, message: &str) -> bool {
        loop {
            let backdrop = &self.backdrop;
            if let Err(err) = self.terminal.draw(|frame| render_confirm(frame, backdrop, message)) {
                log::warn!("cannot draw confirmation: {err}");
                return false;
            }
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => return true,
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => return false,
                    _ => {}
                },
                Ok(_) => {}
                Err(err) => {
                    log::warn!("cannot read confirmation: {err}");
                    return false;
                }
            }
        }
    }

    fn notify(&mut self, notice: Notice) {
        log::info!("notice {:?}", notice.key);
        self.notices.push(notice);
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    /// Draws a frame and returns a copy of it for modal backdrops.
    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<Buffer> {
        let completed = self.terminal.draw(draw_fn)?;
        Ok(completed.buffer.clone())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}

// Extracted panel/footer/help rendering helpers.
include!("chrome.rs");
