//! Main application struct and run loop.
//!
//! [`App`] wires terminal input to the [`Dashboard`] shell, draws it, and
//! runs the store operations: the initial load, and saves in a background
//! task so the UI keeps drawing while a save is in flight.

use std::sync::Arc;
use std::time::Instant;

use divedash_config::{LayoutStore, StoreError, StoreResult};
use divedash_protocol::{Breakpoint, Message};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::{
    dashboard::{Dashboard, Direction, Overlay, Phase, Viewport},
    error::{Result, ShellError},
    event::{InputContext, event_to_message, poll_event},
    layout::{HEADER_HEIGHT, MIN_HEIGHT, MIN_HEIGHT_WITH_HEADER, MIN_WIDTH, STATUS_HEIGHT, visible_rows},
    notice::NoticeLevel,
    terminal::AppTerminal,
    widgets::{
        GridView, StatusLine, render_catalog, render_config_sheet, render_confirm_remove,
        render_grid, render_notices, render_status_bar,
    },
};

/// The main application struct.
///
/// Generic over the [`LayoutStore`] so tests can run against memory.
#[derive(Debug)]
pub struct App<S: LayoutStore + 'static> {
    dashboard: Dashboard,
    store: Arc<S>,
    user: String,
    pending_save: Option<JoinHandle<StoreResult<()>>>,
    should_quit: bool,
    /// Last known terminal area.
    last_area: Rect,
    /// Whether the header was shown in the last render.
    header_visible: bool,
    /// Breakpoint of the last rendered width.
    breakpoint: Breakpoint,
    /// First grid row on screen.
    scroll: u16,
    /// Grid rows that fit on screen in the last render.
    viewport_rows: u16,
}

impl<S: LayoutStore + 'static> App<S> {
    /// Creates an application for a user's dashboard.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use divedash_config::{Config, MemoryLayoutStore};
    /// use divedash_layout::WidgetRegistry;
    /// use divedash_tui::{App, Dashboard};
    ///
    /// let config = Config::default();
    /// let dashboard = Dashboard::loading(Arc::new(WidgetRegistry::builtin()), &config);
    /// let app = App::new(dashboard, Arc::new(MemoryLayoutStore::new()), &config.user);
    /// assert!(!app.should_quit());
    /// ```
    #[must_use]
    pub fn new(dashboard: Dashboard, store: Arc<S>, user: impl Into<String>) -> Self {
        Self {
            dashboard,
            store,
            user: user.into(),
            pending_save: None,
            should_quit: false,
            last_area: Rect::default(),
            header_visible: true,
            breakpoint: Breakpoint::Lg,
            scroll: 0,
            viewport_rows: 0,
        }
    }

    /// Returns the dashboard shell.
    #[must_use]
    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Returns `true` once the user asked to quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Returns `true` while a save task is running.
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.pending_save.is_some()
    }

    /// Returns the first grid row on screen.
    #[must_use]
    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Loads the user's stored dashboard and seeds the shell with it.
    ///
    /// Load failures are not fatal: the shell falls back to the role
    /// default and raises a warning.
    pub async fn load(&mut self) {
        let loaded = self.store.load(&self.user).await;
        self.dashboard.seed(loaded);
    }

    /// Returns which key bindings apply.
    #[must_use]
    pub fn input_context(&self) -> InputContext {
        match self.dashboard.overlay() {
            Some(Overlay::Sheet(sheet)) => InputContext::Sheet {
                text_field: sheet.is_text_field(),
            },
            Some(_) => InputContext::List,
            None => InputContext::Grid,
        }
    }

    /// Updates application state based on a message.
    ///
    /// Rejected actions leave the dashboard unchanged and raise a warning
    /// notice.
    pub fn update(&mut self, msg: Message) {
        if msg.is_terminating() {
            self.should_quit = true;
            return;
        }

        let result = match self.dashboard.overlay() {
            Some(Overlay::Sheet(_)) => self.update_sheet(msg),
            _ if msg.is_sheet() => Ok(()),
            Some(_) => self.update_list(msg),
            None => self.update_grid(msg),
        };
        if let Err(err) = result {
            debug!(error = %err, "Action rejected");
            self.dashboard.notify(NoticeLevel::Warning, err.to_string());
        }
    }

    fn update_grid(&mut self, msg: Message) -> Result<()> {
        if msg.is_layout_edit() && self.dashboard.phase() == Phase::Viewing {
            return Err(ShellError::NotEditing);
        }
        let bp = self.breakpoint;
        match msg {
            Message::NavigateUp => self.navigate(Direction::Up),
            Message::NavigateDown => self.navigate(Direction::Down),
            Message::NavigateLeft => self.navigate(Direction::Left),
            Message::NavigateRight => self.navigate(Direction::Right),
            Message::Scroll { delta } => self.scroll_by(delta),
            Message::Escape => {
                if self.dashboard.phase() == Phase::Editing {
                    self.dashboard.cancel()?;
                } else {
                    self.dashboard.clear_selection();
                }
            }
            Message::Select if self.dashboard.phase() != Phase::Editing => {}
            Message::Select | Message::Configure => {
                let id = self.selected_id()?;
                self.dashboard.open_config(&id)?;
            }
            Message::ToggleEdit => self.dashboard.toggle_edit()?,
            Message::Save => self.start_save()?,
            Message::Undo => {
                if !self.dashboard.undo()? {
                    self.dashboard.notify(NoticeLevel::Info, "Nothing to undo");
                }
            }
            Message::Redo => {
                if !self.dashboard.redo()? {
                    self.dashboard.notify(NoticeLevel::Info, "Nothing to redo");
                }
            }
            Message::Reset => self.dashboard.reset()?,
            Message::OpenCatalog => self.dashboard.open_catalog()?,
            Message::RequestRemove => {
                let id = self.selected_id()?;
                self.dashboard.request_remove(&id)?;
            }
            Message::MoveItem { dx, dy } => {
                self.dashboard.move_selected(bp, dx, dy)?;
                self.scroll_to_selection();
            }
            Message::ResizeItem { dw, dh } => {
                self.dashboard.resize_selected(bp, dw, dh)?;
                self.scroll_to_selection();
            }
            Message::Quit
            | Message::SheetAdjust { .. }
            | Message::SheetInput { .. }
            | Message::SheetBackspace
            | Message::SheetSave => {}
        }
        Ok(())
    }

    fn update_list(&mut self, msg: Message) -> Result<()> {
        match msg {
            Message::NavigateUp => self.dashboard.catalog_navigate(-1),
            Message::NavigateDown => self.dashboard.catalog_navigate(1),
            Message::Escape => self.dashboard.dismiss(),
            Message::Select => match self.dashboard.overlay() {
                Some(Overlay::Catalog { .. }) => {
                    self.dashboard.add_from_catalog()?;
                    self.scroll_to_selection();
                }
                Some(Overlay::ConfirmRemove { .. }) => self.dashboard.confirm_remove()?,
                _ => {}
            },
            _ => {}
        }
        Ok(())
    }

    fn update_sheet(&mut self, msg: Message) -> Result<()> {
        if msg == Message::Escape {
            self.dashboard.dismiss();
            return Ok(());
        }
        if msg == Message::SheetSave {
            return self.dashboard.save_config();
        }
        let Some(sheet) = self.dashboard.sheet_mut() else {
            return Ok(());
        };
        match msg {
            Message::NavigateUp => sheet.navigate(-1),
            Message::NavigateDown => sheet.navigate(1),
            Message::SheetAdjust { delta } => sheet.adjust(delta),
            Message::SheetInput { ch } => sheet.input_char(ch),
            Message::SheetBackspace => sheet.backspace(),
            _ => {}
        }
        Ok(())
    }

    fn selected_id(&self) -> Result<String> {
        self.dashboard
            .selected()
            .map(str::to_string)
            .ok_or(ShellError::NothingSelected)
    }

    fn navigate(&mut self, direction: Direction) {
        self.dashboard.select(self.breakpoint, direction);
        self.scroll_to_selection();
    }

    /// Scrolls the grid, clamped to its height.
    fn scroll_by(&mut self, delta: i16) {
        let max = self
            .dashboard
            .grid_height(self.breakpoint)
            .saturating_sub(self.viewport_rows);
        let next = (i32::from(self.scroll) + i32::from(delta)).clamp(0, i32::from(max));
        self.scroll = u16::try_from(next).unwrap_or(max);
    }

    /// Scrolls just enough to bring the selected tile on screen.
    fn scroll_to_selection(&mut self) {
        let Some(item) = self.dashboard.selected_item(self.breakpoint) else {
            return;
        };
        if item.y < self.scroll {
            self.scroll = item.y;
        } else if self.viewport_rows > 0 && item.bottom() > self.scroll + self.viewport_rows {
            self.scroll = item.bottom().saturating_sub(self.viewport_rows).min(item.y);
        }
    }

    // --- Saving ---

    /// Starts persisting the dashboard in a background task.
    fn start_save(&mut self) -> Result<()> {
        if self.pending_save.is_some() {
            return Err(ShellError::Saving);
        }
        let Some(snapshot) = self.dashboard.begin_save() else {
            return Err(match self.dashboard.phase() {
                Phase::Loading => ShellError::Loading,
                Phase::Saving => ShellError::Saving,
                Phase::Viewing | Phase::Editing => ShellError::NotEditing,
            });
        };

        info!(user = %self.user, "Saving dashboard");
        let store = Arc::clone(&self.store);
        let user = self.user.clone();
        self.pending_save = Some(tokio::spawn(async move {
            store.save(&user, &snapshot).await
        }));
        Ok(())
    }

    /// Completes the pending save if its task has finished.
    pub async fn poll_save(&mut self) {
        if self.pending_save.as_ref().is_some_and(JoinHandle::is_finished) {
            self.flush_save().await;
        }
    }

    /// Waits for the pending save, if any, and completes it.
    pub async fn flush_save(&mut self) {
        let Some(handle) = self.pending_save.take() else {
            return;
        };
        let result = handle.await.unwrap_or_else(|err| {
            Err(StoreError::Unavailable(format!("save task failed: {err}")))
        });
        self.dashboard.finish_save(result);
        self.scroll_by(0);
    }

    // --- Rendering ---

    /// Renders the application UI to the given frame.
    ///
    /// Below the minimum size only a "terminal too small" message is shown.
    /// On short terminals the header is hidden to give the grid its rows.
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.last_area = area;

        if area.height < MIN_HEIGHT || area.width < MIN_WIDTH {
            self.header_visible = false;
            render_terminal_too_small(frame, area);
            return;
        }

        let show_header = area.height >= MIN_HEIGHT_WITH_HEADER;
        self.header_visible = show_header;
        let header_height = if show_header { HEADER_HEIGHT } else { 0 };
        let [header_area, grid_area, status_area] = Layout::vertical([
            Constraint::Length(header_height),
            Constraint::Min(0),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .areas(area);

        if show_header {
            self.render_header(frame, header_area);
        }

        self.breakpoint = Breakpoint::for_width(grid_area.width);
        self.viewport_rows = visible_rows(grid_area.height);
        self.scroll_by(0);
        self.dashboard.observe(
            self.breakpoint,
            Viewport::new(self.scroll, self.viewport_rows),
        );

        self.render_grid_area(frame, grid_area);

        let status = StatusLine {
            phase: self.dashboard.phase(),
            breakpoint: self.breakpoint,
            modified: self.dashboard.is_modified(),
            can_undo: self.dashboard.session().history().can_undo(),
            can_redo: self.dashboard.session().history().can_redo(),
        };
        render_status_bar(status, status_area, frame.buffer_mut());

        let buf = frame.buffer_mut();
        match self.dashboard.overlay() {
            Some(Overlay::Catalog { selected }) => {
                render_catalog(&self.dashboard.catalog(), *selected, area, buf);
            }
            Some(Overlay::ConfirmRemove { id }) => {
                let name = self
                    .dashboard
                    .registry()
                    .lookup(id)
                    .map_or(id.as_str(), |def| def.name);
                render_confirm_remove(name, area, buf);
            }
            Some(Overlay::Sheet(sheet)) => render_config_sheet(sheet, area, buf),
            None => {}
        }

        render_notices(self.dashboard.notices(), grid_area, frame.buffer_mut());
    }

    /// Runs the main application loop.
    ///
    /// Loads the dashboard after the first frame, then polls for events
    /// until the user quits. A save still in flight is awaited before
    /// returning.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal operations fail.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use divedash_config::{Config, MemoryLayoutStore};
    /// use divedash_layout::WidgetRegistry;
    /// use divedash_tui::{App, Dashboard, terminal};
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let config = Config::default();
    ///     let dashboard = Dashboard::loading(Arc::new(WidgetRegistry::builtin()), &config);
    ///     let mut app = App::new(dashboard, Arc::new(MemoryLayoutStore::new()), &config.user);
    ///
    ///     let mut terminal = terminal::setup_terminal()?;
    ///     app.run(&mut terminal).await?;
    ///     terminal::restore_terminal(&mut terminal)?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn run(&mut self, terminal: &mut AppTerminal) -> anyhow::Result<()> {
        terminal.draw(|frame| self.view(frame))?;
        if self.dashboard.phase() == Phase::Loading {
            self.load().await;
        }

        loop {
            self.dashboard.expire_notices(Instant::now());
            self.poll_save().await;

            terminal.draw(|frame| self.view(frame))?;

            if let Some(event) = poll_event()?
                && let Some(msg) = event_to_message(&event, self.input_context())
            {
                self.update(msg);
            }

            if self.should_quit {
                break;
            }
        }

        self.flush_save().await;
        Ok(())
    }

    /// Renders the header bar with title, role and user.
    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let user_width = u16::try_from(self.user.chars().count()).unwrap_or(u16::MAX);
        let [title_area, user_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(user_width + 1)])
                .areas(inner);

        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                "divedash",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - "),
            Span::styled(
                self.dashboard.role().display_name(),
                Style::default().fg(Color::White),
            ),
        ]));
        frame.render_widget(title, title_area);

        let user = Paragraph::new(Span::styled(
            self.user.as_str(),
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Right);
        frame.render_widget(user, user_area);
    }

    /// Renders the grid, or a placeholder while loading or when empty.
    fn render_grid_area(&self, frame: &mut Frame, area: Rect) {
        let placeholder = match self.dashboard.phase() {
            Phase::Loading => Some("Loading dashboard…"),
            _ if self.dashboard.placed(self.breakpoint).is_empty() => {
                Some("No widgets. Press e, then a to add one.")
            }
            _ => None,
        };
        if let Some(text) = placeholder {
            let vertical_offset = area.height.saturating_sub(1) / 2;
            let centered = Rect {
                y: area.y + vertical_offset,
                height: area.height.saturating_sub(vertical_offset),
                ..area
            };
            let paragraph = Paragraph::new(text)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, centered);
            return;
        }

        let tiles = self.dashboard.tiles(self.breakpoint);
        let view = GridView {
            columns: self.breakpoint.columns(),
            scroll: self.scroll,
            selected: self.dashboard.selected(),
            editing: self.dashboard.phase() == Phase::Editing,
        };
        render_grid(&tiles, view, area, frame.buffer_mut());
    }
}

/// Renders a message indicating the terminal is too small.
fn render_terminal_too_small(frame: &mut Frame, area: Rect) {
    let message = format!(
        "Terminal too small ({}×{})\nMinimum: {}×{} (w×h)",
        area.width, area.height, MIN_WIDTH, MIN_HEIGHT
    );

    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .wrap(ratatui::widgets::Wrap { trim: false });

    let vertical_offset = area.height.saturating_sub(2) / 2;
    let centered_area = Rect {
        x: area.x,
        y: area.y + vertical_offset,
        width: area.width,
        height: area.height.saturating_sub(vertical_offset),
    };

    frame.render_widget(paragraph, centered_area);
}
