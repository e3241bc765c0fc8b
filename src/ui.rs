use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pokedex::{lookup::parse_id, ClientLookup, LoadState, Record, SharedContext};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// Rows moved by PageUp/PageDown
const PAGE_STEP: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// Filterable list with the selection panel
    Search,
    /// Detail route, carrying the raw id segment
    Detail(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the filter line
    Filter,
    /// Typing an id to navigate to
    GoTo,
}

pub struct App {
    pub ctx: SharedContext,
    pub state: TableState,
    pub current_page: Page,
    pub input_mode: InputMode,
    pub id_input: String,
    pub source_label: String,
}

impl App {
    pub fn new(ctx: SharedContext, source_label: impl Into<String>) -> Self {
        let mut app = Self {
            ctx,
            state: TableState::default(),
            current_page: Page::Search,
            input_mode: InputMode::Normal,
            id_input: String::new(),
            source_label: source_label.into(),
        };
        app.reset_highlight();
        app
    }

    /// Apply the outcome of the background catalog fetch
    pub fn on_catalog(&mut self, result: pokedex::Result<Vec<Record>>) {
        self.ctx.complete_load(result);
        self.reset_highlight();
    }

    fn visible_len(&self) -> usize {
        self.ctx.visible().len()
    }

    fn reset_highlight(&mut self) {
        if self.visible_len() > 0 {
            self.state.select(Some(0));
        } else {
            self.state.select(None);
        }
    }

    pub fn highlighted(&self) -> Option<Arc<Record>> {
        let i = self.state.selected()?;
        self.ctx.visible().get(i).map(|r| Arc::clone(*r))
    }

    // ========================================================================
    // Filter
    // ========================================================================

    pub fn push_filter_char(&mut self, c: char) {
        let mut query = self.ctx.filter().to_string();
        query.push(c);
        self.ctx.set_filter(query);
        self.reset_highlight();
    }

    pub fn pop_filter_char(&mut self) {
        let mut query = self.ctx.filter().to_string();
        query.pop();
        self.ctx.set_filter(query);
        self.reset_highlight();
    }

    pub fn clear_filter(&mut self) {
        self.ctx.set_filter("");
        self.reset_highlight();
    }

    // ========================================================================
    // Selection & navigation
    // ========================================================================

    /// "More Information" on the highlighted row
    pub fn select_highlighted(&mut self) {
        if let Some(record) = self.highlighted() {
            self.ctx.select(record);
        }
    }

    pub fn open_selected_detail(&mut self) {
        if let Some(id) = self.ctx.selection().map(|r| r.id) {
            self.current_page = Page::Detail(id.to_string());
        }
    }

    pub fn submit_goto(&mut self) {
        let raw = std::mem::take(&mut self.id_input);
        self.input_mode = InputMode::Normal;
        if !raw.trim().is_empty() {
            self.current_page = Page::Detail(raw);
        }
    }

    pub fn back(&mut self) {
        self.current_page = Page::Search;
    }

    /// Client-path lookup for the detail page; `None` on the search page
    pub fn detail_lookup(&self) -> Option<ClientLookup<Arc<Record>>> {
        match &self.current_page {
            Page::Search => None,
            Page::Detail(raw) => Some(match parse_id(raw) {
                Some(id) => self.ctx.find_by_id(id),
                // Still loading beats a bad id: don't claim absence before data exists
                None if matches!(self.ctx.load_state(), LoadState::Unloaded | LoadState::Loading) => {
                    ClientLookup::Loading
                }
                None => ClientLookup::NotFound,
            }),
        }
    }

    pub fn next(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + PAGE_STEP).min(len - 1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.visible_len() == 0 {
            return;
        }
        let i = self.state.selected().map_or(0, |i| i.saturating_sub(PAGE_STEP));
        self.state.select(Some(i));
    }

    /// Returns true when the session should end
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.input_mode {
            InputMode::Filter => {
                match key.code {
                    KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Normal,
                    KeyCode::Backspace => self.pop_filter_char(),
                    KeyCode::Char(c) => self.push_filter_char(c),
                    KeyCode::Down => self.next(),
                    KeyCode::Up => self.previous(),
                    _ => {}
                }
                false
            }
            InputMode::GoTo => {
                match key.code {
                    KeyCode::Enter => self.submit_goto(),
                    KeyCode::Esc => {
                        self.id_input.clear();
                        self.input_mode = InputMode::Normal;
                    }
                    KeyCode::Backspace => {
                        self.id_input.pop();
                    }
                    KeyCode::Char(c) => self.id_input.push(c),
                    _ => {}
                }
                false
            }
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => true,
                KeyCode::Esc => match self.current_page {
                    Page::Detail(_) => {
                        self.back();
                        false
                    }
                    Page::Search => true,
                },
                KeyCode::Char('g') => {
                    self.input_mode = InputMode::GoTo;
                    false
                }
                KeyCode::Char('/') if self.current_page == Page::Search => {
                    self.input_mode = InputMode::Filter;
                    false
                }
                KeyCode::Char('c') if self.current_page == Page::Search => {
                    self.clear_filter();
                    false
                }
                KeyCode::Enter if self.current_page == Page::Search => {
                    self.select_highlighted();
                    false
                }
                KeyCode::Char('x') => {
                    self.ctx.clear_selection();
                    false
                }
                KeyCode::Char('i') => {
                    self.open_selected_detail();
                    false
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.next();
                    false
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.previous();
                    false
                }
                KeyCode::PageDown => {
                    self.page_down();
                    false
                }
                KeyCode::PageUp => {
                    self.page_up();
                    false
                }
                _ => false,
            },
        }
    }
}

pub fn run_ui(app: &mut App, catalog_rx: oneshot::Receiver<pokedex::Result<Vec<Record>>>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app, catalog_rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    catalog_rx: oneshot::Receiver<pokedex::Result<Vec<Record>>>,
) -> io::Result<()> {
    let mut pending = Some(catalog_rx);

    loop {
        if let Some(rx) = pending.as_mut() {
            match rx.try_recv() {
                Ok(result) => {
                    app.on_catalog(result);
                    pending = None;
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    tracing::error!("catalog loader ended without a result");
                    app.on_catalog(Err(pokedex::CatalogError::Io {
                        path: app.source_label.clone().into(),
                        source: io::Error::new(io::ErrorKind::Interrupted, "loader task ended"),
                    }));
                    pending = None;
                }
            }
        }

        terminal.draw(|f| ui(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with filter line
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page.clone() {
        Page::Search => render_search(f, chunks[1], app),
        Page::Detail(raw) => render_detail_page(f, chunks[1], app, &raw),
    }

    render_status_bar(f, chunks[2], app);
}

fn label_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let filter_style = if app.input_mode == InputMode::Filter {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let spans = vec![
        Span::styled(
            "Pokemon Search",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled("Filter: ", label_style()),
        Span::styled(format!("{}_", app.ctx.filter()), filter_style),
        Span::raw("  |  "),
        Span::styled(
            format!("Catalog: {}", app.ctx.load_state().label()),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

/// Placeholder for a catalog that is not available (yet)
fn render_notice(f: &mut Frame, area: Rect, title: &str, text: String, color: Color) {
    let notice = Paragraph::new(text).style(Style::default().fg(color)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" {} ", title)),
    );
    f.render_widget(notice, area);
}

fn render_search(f: &mut Frame, area: Rect, app: &mut App) {
    match app.ctx.load_state() {
        LoadState::Unloaded | LoadState::Loading => {
            render_notice(f, area, "Pokemon", "Loading data...".to_string(), Color::DarkGray);
            return;
        }
        LoadState::Failed(reason) => {
            let text = format!("Catalog unavailable: {}", reason);
            render_notice(f, area, "Pokemon", text, Color::Red);
            return;
        }
        LoadState::Loaded(_) => {}
    }

    if let Some(selected) = app.ctx.selection().cloned() {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(60), // Record list
                Constraint::Percentage(40), // Selection panel
            ])
            .split(area);

        render_table(f, content_chunks[0], app);
        render_info(f, content_chunks[1], &selected, " Selected ");
    } else {
        render_table(f, area, app);
    }
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Name", "Type"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows: Vec<Row> = app
        .ctx
        .visible()
        .into_iter()
        .map(|record| {
            let name_style = if app.ctx.selection().is_some_and(|s| s.id == record.id) {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(record.english_name().to_string()).style(name_style),
                Cell::from(record.type_label()),
            ])
            .height(1)
        })
        .collect();

    let title = format!(" Pokemon ({}) ", rows.len());

    let table = Table::new(rows, [Constraint::Percentage(50), Constraint::Percentage(50)])
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(title),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

/// Name, types and the stat table of one record
fn render_info(f: &mut Frame, area: Rect, record: &Record, title: &str) {
    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", record.english_name()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Type: ", label_style()),
            Span::raw(record.type_label()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {:<12}", "Attribute"), label_style()),
            Span::styled("Value", label_style()),
        ]),
    ];

    for (key, value) in &record.base {
        content.push(Line::from(vec![
            Span::raw(format!("  {:<12}", key)),
            Span::styled(value.to_string(), Style::default().fg(Color::Green)),
        ]));
    }

    let panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(title.to_string()),
    );

    f.render_widget(panel, area);
}

fn render_detail_page(f: &mut Frame, area: Rect, app: &App, raw_id: &str) {
    let title = format!("Pokemon #{}", raw_id);

    match app.detail_lookup() {
        Some(ClientLookup::Found(record)) => render_info(f, area, &record, &format!(" {} ", title)),
        Some(ClientLookup::NotFound) => {
            let text = format!("No pokemon with id {}", raw_id);
            render_notice(f, area, &title, text, Color::DarkGray);
        }
        Some(ClientLookup::Unavailable) => {
            render_notice(f, area, &title, "Catalog unavailable".to_string(), Color::Red);
        }
        Some(ClientLookup::Loading) | None => {
            render_notice(f, area, &title, "Loading data...".to_string(), Color::DarkGray);
        }
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let spans = match app.input_mode {
        InputMode::GoTo => vec![
            Span::styled(" Go to id: ", label_style()),
            Span::raw(format!("{}_", app.id_input)),
            Span::raw("  "),
            key("Enter"),
            Span::raw(" Open | "),
            key("Esc"),
            Span::raw(" Cancel"),
        ],
        InputMode::Filter => vec![
            Span::raw(" Type to filter | "),
            key("Enter"),
            Span::raw(" Done"),
        ],
        InputMode::Normal => {
            let mut spans = vec![];
            if let Some(selected) = app.ctx.selection() {
                spans.push(Span::styled(
                    format!(" Selected: {} ", selected.english_name()),
                    Style::default().fg(Color::Green),
                ));
                spans.push(Span::raw("|"));
            }
            spans.extend([
                Span::raw(" "),
                key("/"),
                Span::raw(" Filter | "),
                key("Enter"),
                Span::raw(" More Information | "),
                key("i"),
                Span::raw(" Open | "),
                key("g"),
                Span::raw(" Go to id | "),
                key("Esc"),
                Span::raw(" Back | "),
                key("q"),
                Span::raw(" Quit"),
            ]);
            spans
        }
    };

    let status = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::White)));

    f.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pokedex::CatalogStore;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            Record::new(1, "Bulbasaur").with_types(["Grass", "Poison"]).with_stat("HP", 45),
            Record::new(2, "Ivysaur").with_types(["Grass", "Poison"]).with_stat("HP", 60),
            Record::new(4, "Charmander").with_types(["Fire"]).with_stat("HP", 39),
        ]
    }

    fn loaded_app() -> App {
        App::new(SharedContext::new(CatalogStore::preloaded(sample())), "test")
    }

    #[test]
    fn test_loading_then_loaded() {
        let mut ctx = SharedContext::default();
        ctx.begin_load();
        let mut app = App::new(ctx, "test");
        assert!(app.highlighted().is_none());

        app.on_catalog(Ok(sample()));
        assert_eq!(app.highlighted().map(|r| r.id), Some(1));
    }

    #[test]
    fn test_filter_typing_and_selection() {
        let mut app = loaded_app();

        app.handle_key(press(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Filter);
        type_text(&mut app, "IVY");
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.ctx.filter(), "IVY");

        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.ctx.selection().map(|r| r.id), Some(2));

        // Narrowing the filter away from the selection keeps it
        app.handle_key(press(KeyCode::Char('/')));
        app.handle_key(press(KeyCode::Backspace));
        app.handle_key(press(KeyCode::Backspace));
        app.handle_key(press(KeyCode::Backspace));
        type_text(&mut app, "char");
        app.handle_key(press(KeyCode::Esc));
        assert_eq!(app.highlighted().map(|r| r.id), Some(4));
        assert_eq!(app.ctx.selection().map(|r| r.id), Some(2));
    }

    #[test]
    fn test_goto_detail_and_back_keeps_state() {
        let mut app = loaded_app();
        app.ctx.set_filter("saur");
        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Enter));

        app.handle_key(press(KeyCode::Char('g')));
        type_text(&mut app, "4");
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.current_page, Page::Detail("4".to_string()));
        assert_eq!(
            app.detail_lookup().and_then(ClientLookup::found).map(|r| r.id),
            Some(4)
        );

        assert!(!app.handle_key(press(KeyCode::Esc)));
        assert_eq!(app.current_page, Page::Search);
        assert_eq!(app.ctx.filter(), "saur");
        assert_eq!(app.ctx.selection().map(|r| r.id), Some(2));
    }

    #[test]
    fn test_detail_not_found_and_loading() {
        let mut app = loaded_app();
        app.current_page = Page::Detail("999".to_string());
        assert_eq!(app.detail_lookup(), Some(ClientLookup::NotFound));

        app.current_page = Page::Detail("pikachu".to_string());
        assert_eq!(app.detail_lookup(), Some(ClientLookup::NotFound));

        let mut ctx = SharedContext::default();
        ctx.begin_load();
        let mut loading = App::new(ctx, "test");
        loading.current_page = Page::Detail("1".to_string());
        assert_eq!(loading.detail_lookup(), Some(ClientLookup::Loading));
    }

    #[test]
    fn test_open_selected_detail() {
        let mut app = loaded_app();
        app.handle_key(press(KeyCode::Char('i')));
        assert_eq!(app.current_page, Page::Search);

        app.handle_key(press(KeyCode::Enter));
        app.handle_key(press(KeyCode::Char('i')));
        assert_eq!(app.current_page, Page::Detail("1".to_string()));
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = loaded_app();
        app.previous();
        assert_eq!(app.highlighted().map(|r| r.id), Some(4));
        app.next();
        assert_eq!(app.highlighted().map(|r| r.id), Some(1));
        app.page_down();
        assert_eq!(app.highlighted().map(|r| r.id), Some(4));
        app.page_up();
        assert_eq!(app.highlighted().map(|r| r.id), Some(1));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = loaded_app();
        assert!(app.handle_key(press(KeyCode::Char('q'))));
        assert!(app.handle_key(press(KeyCode::Esc)));
    }
}
