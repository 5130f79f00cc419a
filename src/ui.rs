use crate::model::{AppState, Priority, Project, Todo};
use crate::storage::save_projects;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::{debug, error};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Alignment, Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Terminal;
use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub fn run(state: AppState, store_path: PathBuf) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let mut app = App::new(state, store_path);
    let result = app.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

struct App {
    state: AppState,
    store_path: PathBuf,
    pane: Pane,
    selected_project: usize,
    selected_todo: usize,
    project_offset: usize,
    todo_offset: usize,
    last_save: Instant,
    status: String,
    mode: Mode,
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Pane {
    Projects,
    Todos,
}

enum Mode {
    Normal,
    NewTodo(TodoForm),
    NewProject(ProjectForm),
    ConfirmDeleteProject { index: usize },
}

struct TodoForm {
    title: FieldValue,
    description: FieldValue,
    due_date: FieldValue,
    notes: FieldValue,
    priority: Priority,
    field: FormField,
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum FormField {
    Title,
    Description,
    DueDate,
    Priority,
    Notes,
}

struct ProjectForm {
    name: FieldValue,
}

#[derive(Clone)]
struct FieldValue {
    value: String,
    cursor: usize,
}

impl FieldValue {
    fn new(value: &str) -> Self {
        FieldValue {
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor = prev_grapheme(self.cursor, &self.value);
    }

    fn move_right(&mut self) {
        if self.cursor >= self.value.len() {
            return;
        }
        self.cursor = next_grapheme(self.cursor, &self.value);
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = prev_grapheme(self.cursor, &self.value);
        self.value.drain(prev..self.cursor);
        self.cursor = prev;
    }

    fn insert_char(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    fn with_caret(&self) -> String {
        let mut text = self.value.clone();
        text.insert_str(self.cursor, "▌");
        text
    }
}

impl App {
    fn new(state: AppState, store_path: PathBuf) -> Self {
        let status = format!(
            "Loaded {} project(s) from {}",
            state.projects.len(),
            store_path.display()
        );
        let selected_project = state.active;
        App {
            state,
            store_path,
            pane: Pane::Projects,
            selected_project,
            selected_todo: 0,
            project_offset: 0,
            todo_offset: 0,
            last_save: Instant::now(),
            status,
            mode: Mode::Normal,
        }
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;
            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key)? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        match self.mode {
            Mode::Normal => self.handle_normal_key(key),
            Mode::NewTodo(_) | Mode::NewProject(_) => self.handle_form_key(key),
            Mode::ConfirmDeleteProject { .. } => self.handle_confirm_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Tab | KeyCode::BackTab => {
                self.pane = match self.pane {
                    Pane::Projects => Pane::Todos,
                    Pane::Todos => Pane::Projects,
                };
            }
            KeyCode::Left | KeyCode::Char('h') => self.pane = Pane::Projects,
            KeyCode::Right | KeyCode::Char('l') => self.pane = Pane::Todos,
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Enter => {
                if self.pane == Pane::Projects {
                    self.activate_selected_project();
                }
            }
            KeyCode::Char('n') => {
                let name = self.state.active_project().name.clone();
                self.mode = Mode::NewTodo(TodoForm::new());
                self.status = format!(
                    "New todo in {} (Tab/Shift-Tab move, Enter save, Esc cancel)",
                    name
                );
            }
            KeyCode::Char('p') => {
                self.mode = Mode::NewProject(ProjectForm::new());
                self.status = "New project (Enter save, Esc cancel)".into();
            }
            KeyCode::Char('d') => match self.pane {
                Pane::Projects => {
                    let index = self
                        .selected_project
                        .min(self.state.projects.len().saturating_sub(1));
                    let name = self.state.projects[index].name.clone();
                    self.mode = Mode::ConfirmDeleteProject { index };
                    self.status =
                        format!("Delete project {}? (y to confirm, n/Esc to cancel)", name);
                }
                Pane::Todos => self.complete_selected_todo(),
            },
            _ => {}
        }
        Ok(false)
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<bool> {
        let mut close_form = false;
        let mut mode = std::mem::replace(&mut self.mode, Mode::Normal);
        match &mut mode {
            Mode::NewTodo(form) => close_form = self.process_todo_form_key(form, key),
            Mode::NewProject(form) => close_form = self.process_project_form_key(form, key),
            Mode::ConfirmDeleteProject { .. } | Mode::Normal => {}
        }
        self.mode = if close_form { Mode::Normal } else { mode };
        Ok(false)
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Result<bool> {
        let index = match self.mode {
            Mode::ConfirmDeleteProject { index } => index,
            _ => return Ok(false),
        };
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                match self.state.delete_project(index) {
                    Ok(removed) => {
                        self.selected_project = self.state.active;
                        self.selected_todo = 0;
                        self.persist(format!("Deleted project {}", removed.name));
                    }
                    Err(err) => self.status = format!("Delete failed: {}", err),
                }
                self.mode = Mode::Normal;
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.status = "Delete canceled".into();
                self.mode = Mode::Normal;
            }
            _ => {}
        }
        Ok(false)
    }

    fn process_todo_form_key(&mut self, form: &mut TodoForm, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.status = "Canceled".into();
                return true;
            }
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.prev_field(),
            KeyCode::Enter => return self.submit_todo_form(form),
            KeyCode::Left => {
                if form.field == FormField::Priority {
                    form.priority = prev_priority(form.priority);
                } else if let Some(field) = form.active_field_mut() {
                    field.move_left();
                }
            }
            KeyCode::Right => {
                if form.field == FormField::Priority {
                    form.priority = next_priority(form.priority);
                } else if let Some(field) = form.active_field_mut() {
                    field.move_right();
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = form.active_field_mut() {
                    field.backspace();
                }
            }
            KeyCode::Char(c) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    if let Some(field) = form.active_field_mut() {
                        field.insert_char(c);
                    }
                }
            }
            _ => {}
        }
        false
    }

    fn process_project_form_key(&mut self, form: &mut ProjectForm, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.status = "Canceled".into();
                return true;
            }
            KeyCode::Enter => return self.submit_project_form(form),
            KeyCode::Left => form.name.move_left(),
            KeyCode::Right => form.name.move_right(),
            KeyCode::Backspace => form.name.backspace(),
            KeyCode::Char(c) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    form.name.insert_char(c);
                }
            }
            _ => {}
        }
        false
    }

    fn submit_todo_form(&mut self, form: &TodoForm) -> bool {
        let created = self.state.create_todo(
            form.title.value.clone(),
            form.description.value.clone(),
            form.due_date.value.clone(),
            form.priority,
            form.notes.value.clone(),
        );
        if !created {
            // a blank title is silently ignored and the form stays open
            return false;
        }
        self.selected_todo = self.state.active_project().todos.len().saturating_sub(1);
        let message = match self.state.active_project().todos.last() {
            Some(todo) => format!("Added todo [{}]", todo.id),
            None => "Added todo".to_string(),
        };
        self.pane = Pane::Todos;
        self.persist(message);
        true
    }

    fn submit_project_form(&mut self, form: &ProjectForm) -> bool {
        self.state.create_project(form.name.value.clone());
        self.selected_project = self.state.active;
        self.selected_todo = 0;
        self.pane = Pane::Projects;
        let message = {
            let project = self.state.active_project();
            format!("Added project [{}] {}", project.id, project.name)
        };
        self.persist(message);
        true
    }

    fn activate_selected_project(&mut self) {
        let index = self.selected_project;
        if self.state.set_active(index).is_ok() {
            self.selected_todo = 0;
            let name = self.state.active_project().name.clone();
            self.persist(format!("Switched to {}", name));
        }
    }

    fn complete_selected_todo(&mut self) {
        let project_index = self.state.active;
        let count = self.state.active_project().todos.len();
        if count == 0 {
            self.status = "No todo selected".into();
            return;
        }
        let index = self.selected_todo.min(count - 1);
        match self.state.delete_todo(project_index, index) {
            Ok(removed) => self.persist(format!("Done: {}", title_text(&removed))),
            Err(err) => self.status = format!("Could not complete: {}", err),
        }
    }

    fn select_prev(&mut self) {
        match self.pane {
            Pane::Projects => {
                if self.selected_project > 0 {
                    self.selected_project -= 1;
                }
            }
            Pane::Todos => {
                if self.selected_todo > 0 {
                    self.selected_todo -= 1;
                }
            }
        }
    }

    fn select_next(&mut self) {
        match self.pane {
            Pane::Projects => {
                if self.selected_project + 1 < self.state.projects.len() {
                    self.selected_project += 1;
                }
            }
            Pane::Todos => {
                if self.selected_todo + 1 < self.state.active_project().todos.len() {
                    self.selected_todo += 1;
                }
            }
        }
    }

    fn current_todo(&self) -> Option<&Todo> {
        self.state.active_project().todos.get(self.selected_todo)
    }

    fn ensure_bounds(&mut self) {
        self.selected_project = self
            .selected_project
            .min(self.state.projects.len().saturating_sub(1));
        let todo_count = self.state.active_project().todos.len();
        self.selected_todo = if todo_count == 0 {
            0
        } else {
            self.selected_todo.min(todo_count - 1)
        };
    }

    fn persist(&mut self, message: impl Into<String>) {
        match save_projects(&self.store_path, &self.state.projects) {
            Ok(()) => {
                debug!("persisted {} project(s)", self.state.projects.len());
                self.last_save = Instant::now();
                self.status = message.into();
            }
            Err(err) => {
                error!("save failed: {err:#}");
                self.status = format!("Save failed (changes kept in memory): {err:#}");
            }
        }
        self.ensure_bounds();
    }

    fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(4),
            ])
            .split(f.size());

        self.draw_header(f, layout[0]);
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(layout[1]);
        let project_offset = self.draw_projects(f, panes[0]);
        let todo_offset = self.draw_todos(f, panes[1]);
        self.project_offset = project_offset;
        self.todo_offset = todo_offset;
        self.draw_footer(f, layout[2]);

        match &self.mode {
            Mode::NewTodo(form) => self.draw_todo_form(f, form),
            Mode::NewProject(form) => self.draw_project_form(f, form),
            Mode::ConfirmDeleteProject { index } => self.draw_confirm(f, *index),
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let active = self.state.active_project();
        let title = Line::from(vec![
            Span::styled(
                "taskpad ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(active.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  •  "),
            Span::styled(
                format!("{} project(s)", self.state.projects.len()),
                Style::default().fg(Color::Green),
            ),
            Span::raw("  •  "),
            Span::styled(
                format!("{}", self.store_path.display()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw("  •  "),
            Span::styled(
                format!("saved {}", format_elapsed(self.last_save)),
                Style::default().fg(Color::Gray),
            ),
        ]);

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(title)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    fn draw_projects(&self, f: &mut ratatui::Frame<'_>, area: Rect) -> usize {
        let focused = self.pane == Pane::Projects;
        let items: Vec<ListItem> = self
            .state
            .projects
            .iter()
            .enumerate()
            .map(|(index, project)| project_item(project, index == self.state.active))
            .collect();
        let mut state = ListState::default();
        let viewport = area.height.saturating_sub(2) as usize;
        let selected = self
            .selected_project
            .min(items.len().saturating_sub(1));
        let offset = adjust_offset(selected, self.project_offset, viewport, 1, items.len());
        *state.offset_mut() = offset;
        if focused && !items.is_empty() {
            state.select(Some(selected));
        }

        let block = Block::default()
            .title(Span::styled(
                format!("Projects ({})", self.state.projects.len()),
                Style::default()
                    .fg(if focused { Color::Cyan } else { Color::Gray })
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused {
                Color::Cyan
            } else {
                Color::DarkGray
            }));
        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(Color::LightCyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );
        f.render_stateful_widget(list, area, &mut state);
        offset
    }

    fn draw_todos(&self, f: &mut ratatui::Frame<'_>, area: Rect) -> usize {
        let focused = self.pane == Pane::Todos;
        let active = self.state.active_project();
        let width = area.width.saturating_sub(2);
        let mut state = ListState::default();
        let viewport = area.height.saturating_sub(2) as usize;
        let selected = self.selected_todo.min(active.todos.len().saturating_sub(1));
        let offset = adjust_offset(selected, self.todo_offset, viewport, 1, active.todos.len());
        *state.offset_mut() = offset;
        if focused && !active.todos.is_empty() {
            state.select(Some(selected));
        }

        let items: Vec<ListItem> = if active.todos.is_empty() {
            vec![ListItem::new("No todos yet")]
        } else {
            active
                .todos
                .iter()
                .map(|todo| todo_item(todo, width))
                .collect()
        };
        let block = Block::default()
            .title(Span::styled(
                format!("Todos: {} ({})", active.name, active.todos.len()),
                Style::default()
                    .fg(if focused { Color::Cyan } else { Color::Gray })
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused {
                Color::Cyan
            } else {
                Color::DarkGray
            }));
        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(Color::LightCyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );
        f.render_stateful_widget(list, area, &mut state);
        offset
    }

    fn draw_footer(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(2)])
            .split(area);

        let help_bar = Paragraph::new(self.footer_help_line())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(help_bar, rows[0]);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);

        let status = Paragraph::new(self.status.clone())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(status, bottom[0]);

        let detail_lines = match self.current_todo() {
            Some(todo) => vec![selected_todo_detail(todo)],
            None => vec![Line::from("No todo selected")],
        };
        let detail = Paragraph::new(detail_lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title("Selected"),
            );
        f.render_widget(detail, bottom[1]);
    }

    fn footer_help_line(&self) -> Line<'static> {
        let mut spans = vec![
            Span::styled("Tab", Style::default().fg(Color::LightCyan)),
            Span::raw(" pane  "),
            Span::styled("↑↓ / j k", Style::default().fg(Color::LightCyan)),
            Span::raw(" browse  "),
        ];
        match self.pane {
            Pane::Projects => spans.extend([
                Span::styled("Enter", Style::default().fg(Color::LightYellow)),
                Span::raw(" activate  "),
                Span::styled("d", Style::default().fg(Color::LightRed)),
                Span::raw(" delete project  "),
            ]),
            Pane::Todos => spans.extend([
                Span::styled("d", Style::default().fg(Color::LightGreen)),
                Span::raw(" done  "),
            ]),
        }
        spans.extend([
            Span::styled("n", Style::default().fg(Color::LightMagenta)),
            Span::raw(" new todo  "),
            Span::styled("p", Style::default().fg(Color::LightMagenta)),
            Span::raw(" new project  "),
            Span::styled("q", Style::default().fg(Color::LightRed)),
            Span::raw(" quit"),
        ]);
        Line::from(spans)
    }

    fn draw_todo_form(&self, f: &mut ratatui::Frame<'_>, form: &TodoForm) {
        let area = centered_rect(70, 60, f.size());
        let fields = vec![
            field_line("Title", &form.title, form.field == FormField::Title),
            field_line(
                "Description",
                &form.description,
                form.field == FormField::Description,
            ),
            field_line("Due Date", &form.due_date, form.field == FormField::DueDate),
            priority_line(form.priority, form.field == FormField::Priority),
            field_line("Notes", &form.notes, form.field == FormField::Notes),
            Line::from(""),
            Line::from(Span::styled(
                "Enter to save • Esc to cancel • Tab/Shift-Tab to move • ←/→ picks priority",
                Style::default().fg(Color::Gray),
            )),
        ];
        let dialog = Paragraph::new(fields)
            .block(
                Block::default()
                    .title(Span::styled(
                        "New Todo",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(Clear, area);
        f.render_widget(dialog, area);
    }

    fn draw_project_form(&self, f: &mut ratatui::Frame<'_>, form: &ProjectForm) {
        let area = centered_rect(60, 30, f.size());
        let fields = vec![
            field_line("Name", &form.name, true),
            Line::from(""),
            Line::from(Span::styled(
                "Enter to save • Esc to cancel",
                Style::default().fg(Color::Gray),
            )),
        ];
        let dialog = Paragraph::new(fields)
            .block(
                Block::default()
                    .title(Span::styled(
                        "New Project",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(Clear, area);
        f.render_widget(dialog, area);
    }

    fn draw_confirm(&self, f: &mut ratatui::Frame<'_>, index: usize) {
        let area = centered_rect(50, 30, f.size());
        let (name, count) = self
            .state
            .projects
            .get(index)
            .map(|p| (p.name.clone(), p.todos.len()))
            .unwrap_or_default();
        let body = vec![
            Line::from(Span::styled(
                format!("Delete project \"{}\" and its {} todo(s)?", name, count),
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press y to confirm, n or Esc to cancel"),
        ];
        let dialog = Paragraph::new(body).alignment(Alignment::Center).block(
            Block::default()
                .title(Span::styled(
                    "Confirm Delete",
                    Style::default()
                        .fg(Color::LightRed)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::LightRed)),
        );
        f.render_widget(Clear, area);
        f.render_widget(dialog, area);
    }
}

impl TodoForm {
    fn new() -> Self {
        TodoForm {
            title: FieldValue::new(""),
            description: FieldValue::new(""),
            due_date: FieldValue::new(""),
            notes: FieldValue::new(""),
            priority: Priority::Low,
            field: FormField::Title,
        }
    }

    fn next_field(&mut self) {
        self.field = match self.field {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::DueDate,
            FormField::DueDate => FormField::Priority,
            FormField::Priority => FormField::Notes,
            FormField::Notes => FormField::Title,
        };
    }

    fn prev_field(&mut self) {
        self.field = match self.field {
            FormField::Title => FormField::Notes,
            FormField::Description => FormField::Title,
            FormField::DueDate => FormField::Description,
            FormField::Priority => FormField::DueDate,
            FormField::Notes => FormField::Priority,
        };
    }

    fn active_field_mut(&mut self) -> Option<&mut FieldValue> {
        match self.field {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Priority => None,
            FormField::Notes => Some(&mut self.notes),
        }
    }
}

impl ProjectForm {
    fn new() -> Self {
        ProjectForm {
            name: FieldValue::new(""),
        }
    }
}

pub(crate) fn title_text(todo: &Todo) -> String {
    if todo.title.is_empty() {
        "No Title".to_string()
    } else {
        todo.title.clone()
    }
}

pub(crate) fn description_text(todo: &Todo) -> String {
    if todo.description.is_empty() {
        "No Description".to_string()
    } else {
        format!("Description: {}", todo.description)
    }
}

pub(crate) fn due_date_text(todo: &Todo) -> String {
    if todo.due_date.is_empty() {
        "No Due Date".to_string()
    } else {
        format!("Due Date: {}", todo.due_date)
    }
}

pub(crate) fn notes_text(todo: &Todo) -> String {
    if todo.notes.is_empty() {
        "No Notes".to_string()
    } else {
        format!("Notes: {}", todo.notes)
    }
}

fn priority_marker(priority: Priority) -> (&'static str, Style) {
    match priority {
        Priority::Low => ("●", Style::default().fg(Color::Green)),
        Priority::Medium => ("●", Style::default().fg(Color::Yellow)),
        Priority::High => ("●", Style::default().fg(Color::Red)),
    }
}

fn next_priority(priority: Priority) -> Priority {
    match priority {
        Priority::Low => Priority::Medium,
        Priority::Medium => Priority::High,
        Priority::High => Priority::Low,
    }
}

fn prev_priority(priority: Priority) -> Priority {
    match priority {
        Priority::Low => Priority::High,
        Priority::Medium => Priority::Low,
        Priority::High => Priority::Medium,
    }
}

fn project_item(project: &Project, is_active: bool) -> ListItem<'static> {
    let mut spans = vec![Span::styled(
        project.name.clone(),
        if is_active {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        },
    )];
    if is_active {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("(active)", Style::default().fg(Color::Green)));
    }
    ListItem::new(Line::from(spans))
}

fn todo_item(todo: &Todo, width: u16) -> ListItem<'static> {
    let inner = width.saturating_sub(4).max(10) as usize;
    let (marker, marker_style) = priority_marker(todo.priority);
    let lines = vec![
        Line::from(vec![
            Span::styled(format!("{} ", marker), marker_style),
            Span::styled(
                format!("[{}] ", todo.id),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                truncate_text(&title_text(todo), inner),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            truncate_text(&description_text(todo), inner),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            truncate_text(&due_date_text(todo), inner),
            Style::default().fg(Color::LightYellow),
        )),
        Line::from(Span::styled(
            truncate_text(&notes_text(todo), inner),
            Style::default().fg(Color::Gray),
        )),
        Line::raw(""),
    ];
    ListItem::new(lines).style(Style::default().fg(Color::Gray))
}

fn selected_todo_detail(todo: &Todo) -> Line<'static> {
    let (marker, marker_style) = priority_marker(todo.priority);
    let spans = vec![
        Span::styled(format!("{} ", marker), marker_style),
        Span::styled(
            title_text(todo),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(due_date_text(todo), Style::default().fg(Color::LightRed)),
        Span::raw("  "),
        Span::styled(
            notes_text(todo),
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
        ),
    ];
    Line::from(spans)
}

fn field_line(label: &str, field: &FieldValue, active: bool) -> Line<'static> {
    let label_style = Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::BOLD | Modifier::DIM);
    let value_style = Style::default().fg(if active { Color::Cyan } else { Color::White });
    let text = if active {
        field.with_caret()
    } else {
        field.value.clone()
    };
    Line::from(vec![
        Span::styled(format!("{}: ", label), label_style),
        Span::styled(text, value_style),
    ])
}

fn priority_line(priority: Priority, active: bool) -> Line<'static> {
    let label_style = Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::BOLD | Modifier::DIM);
    let value_style = Style::default().fg(if active { Color::Cyan } else { Color::White });
    let text = if active {
        format!("< {} >", priority.label())
    } else {
        priority.label().to_string()
    };
    Line::from(vec![
        Span::styled("Priority: ".to_string(), label_style),
        Span::styled(text, value_style),
    ])
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}

fn adjust_offset(
    selected: usize,
    current_offset: usize,
    viewport: usize,
    scrolloff: usize,
    len: usize,
) -> usize {
    if viewport == 0 || len == 0 {
        return 0;
    }
    let max_offset = len.saturating_sub(viewport);
    let margin = scrolloff.min(viewport.saturating_sub(1));
    let mut offset = current_offset.min(max_offset);
    if selected < offset.saturating_add(margin) {
        offset = selected.saturating_sub(margin);
    } else {
        let upper = offset
            .saturating_add(viewport.saturating_sub(1))
            .saturating_sub(margin);
        if selected > upper {
            offset = selected.saturating_add(margin + 1).saturating_sub(viewport);
        }
    }
    offset.min(max_offset)
}

fn truncate_text(text: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    for ch in text.chars() {
        if out.chars().count() >= max.saturating_sub(3) {
            out.push_str("...");
            break;
        }
        out.push(ch);
    }
    if out.chars().count() > max {
        out.truncate(max);
    }
    out
}

fn prev_grapheme(cursor: usize, text: &str) -> usize {
    if cursor == 0 {
        return 0;
    }
    let mut prev = 0;
    for (idx, _) in text.char_indices() {
        if idx >= cursor {
            break;
        }
        prev = idx;
    }
    prev
}

fn next_grapheme(cursor: usize, text: &str) -> usize {
    for (idx, ch) in text.char_indices() {
        if idx > cursor {
            return idx;
        }
        if idx == cursor {
            return cursor + ch.len_utf8();
        }
    }
    text.len()
}

fn format_elapsed(last: Instant) -> String {
    let secs = last.elapsed().as_secs();
    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        description_text, due_date_text, next_priority, notes_text, prev_priority,
        priority_marker, title_text, truncate_text, FieldValue,
    };
    use crate::model::{Priority, Todo};
    use ratatui::prelude::Color;

    fn todo(title: &str, description: &str, due_date: &str, notes: &str) -> Todo {
        Todo {
            id: "abc123".to_string(),
            title: title.to_string(),
            description: description.to_string(),
            due_date: due_date.to_string(),
            priority: Priority::Low,
            notes: notes.to_string(),
        }
    }

    #[test]
    fn title_renders_as_is_or_falls_back() {
        assert_eq!(title_text(&todo("Buy milk", "", "", "")), "Buy milk");
        assert_eq!(title_text(&todo("  padded  ", "", "", "")), "  padded  ");
        assert_eq!(title_text(&todo("", "", "", "")), "No Title");
    }

    #[test]
    fn optional_fields_render_prefixed_or_placeholder() {
        let full = todo("t", "walk the dog", "friday", "leash by door");
        assert_eq!(description_text(&full), "Description: walk the dog");
        assert_eq!(due_date_text(&full), "Due Date: friday");
        assert_eq!(notes_text(&full), "Notes: leash by door");

        let bare = todo("t", "", "", "");
        assert_eq!(description_text(&bare), "No Description");
        assert_eq!(due_date_text(&bare), "No Due Date");
        assert_eq!(notes_text(&bare), "No Notes");
    }

    #[test]
    fn priority_markers_use_distinct_colors() {
        let (low_glyph, low) = priority_marker(Priority::Low);
        let (mid_glyph, mid) = priority_marker(Priority::Medium);
        let (high_glyph, high) = priority_marker(Priority::High);
        assert_eq!(low_glyph, mid_glyph);
        assert_eq!(mid_glyph, high_glyph);
        assert_eq!(low.fg, Some(Color::Green));
        assert_eq!(mid.fg, Some(Color::Yellow));
        assert_eq!(high.fg, Some(Color::Red));
    }

    #[test]
    fn priority_cycling_wraps_in_both_directions() {
        assert_eq!(next_priority(Priority::Low), Priority::Medium);
        assert_eq!(next_priority(Priority::Medium), Priority::High);
        assert_eq!(next_priority(Priority::High), Priority::Low);
        assert_eq!(prev_priority(Priority::Low), Priority::High);
        assert_eq!(prev_priority(next_priority(Priority::Medium)), Priority::Medium);
    }

    #[test]
    fn field_value_edits_at_cursor() {
        let mut field = FieldValue::new("ab");
        assert_eq!(field.with_caret(), "ab▌");
        field.move_left();
        assert_eq!(field.with_caret(), "a▌b");
        field.insert_char('x');
        assert_eq!(field.value, "axb");
        field.backspace();
        assert_eq!(field.value, "ab");
        field.move_right();
        field.backspace();
        assert_eq!(field.value, "a");
    }

    #[test]
    fn truncate_text_keeps_short_strings_and_elides_long_ones() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("", 10), "");
        assert_eq!(truncate_text("anything", 0), "");
        let out = truncate_text("a very long line of text", 10);
        assert!(out.ends_with("..."));
        assert!(out.chars().count() <= 10);
    }
}
