use crate::model::{AppState, Priority, Todo};
use crate::storage::{load_projects, save_projects, store_path};
use crate::ui;
use anyhow::{anyhow, Result};
use log::info;
use std::path::PathBuf;

pub fn list() -> Result<()> {
    let (state, _path) = load_state()?;
    println!("Projects:");
    for (index, project) in state.projects.iter().enumerate() {
        let marker = if index == state.active { "*" } else { " " };
        println!("{} [{}] {}", marker, project.id, project.name);
    }
    let active = state.active_project();
    println!();
    println!("Todos in {}:", active.name);
    if active.todos.is_empty() {
        println!("  (empty)");
    }
    for todo in &active.todos {
        print_todo(todo);
    }
    Ok(())
}

pub fn add(
    title: String,
    description: Option<String>,
    due: Option<String>,
    priority: Option<String>,
    notes: Option<String>,
    project: Option<String>,
) -> Result<()> {
    let (mut state, path) = load_state()?;
    let priority = match priority {
        Some(raw) => Priority::parse(&raw)
            .ok_or_else(|| anyhow!("invalid priority {:?} (use Low, Medium or High)", raw))?,
        None => Priority::Low,
    };
    if let Some(needle) = project {
        let index = resolve_project(&state, &needle)?;
        state.set_active(index)?;
    }
    let created = state.create_todo(
        title,
        description.unwrap_or_default(),
        due.unwrap_or_default(),
        priority,
        notes.unwrap_or_default(),
    );
    if !created {
        return Ok(());
    }
    save_projects(&path, &state.projects)?;
    let active = state.active_project();
    if let Some(todo) = active.todos.last() {
        info!("added todo {} to project {}", todo.id, active.id);
        println!("Added todo [{}] to {}", todo.id, active.name);
    }
    Ok(())
}

pub fn done(todo_id: String) -> Result<()> {
    let (mut state, path) = load_state()?;
    let (project_index, todo_index) = find_todo(&state, &todo_id)
        .ok_or_else(|| anyhow!("no todo with id {}", todo_id))?;
    let removed = state.delete_todo(project_index, todo_index)?;
    save_projects(&path, &state.projects)?;
    info!("completed todo {}", removed.id);
    println!("Done: {}", ui::title_text(&removed));
    Ok(())
}

pub fn project_add(name: String) -> Result<()> {
    let (mut state, path) = load_state()?;
    state.create_project(name);
    save_projects(&path, &state.projects)?;
    let active = state.active_project();
    info!("created project {}", active.id);
    println!("Added project [{}] {}", active.id, active.name);
    Ok(())
}

pub fn project_rm(target: String) -> Result<()> {
    let (mut state, path) = load_state()?;
    let index = resolve_project(&state, &target)?;
    let was_last = state.projects.len() == 1;
    let removed = state.delete_project(index)?;
    save_projects(&path, &state.projects)?;
    info!("deleted project {}", removed.id);
    println!("Deleted project [{}] {}", removed.id, removed.name);
    if was_last {
        println!("Reinstated project {}", state.active_project().name);
    }
    Ok(())
}

pub fn tui() -> Result<()> {
    let (state, path) = load_state()?;
    ui::run(state, path)
}

fn load_state() -> Result<(AppState, PathBuf)> {
    let path = store_path()?;
    let saved = load_projects(&path);
    Ok((AppState::initialize(saved), path))
}

fn resolve_project(state: &AppState, needle: &str) -> Result<usize> {
    state
        .projects
        .iter()
        .position(|p| p.id == needle)
        .or_else(|| state.projects.iter().position(|p| p.name == needle))
        .ok_or_else(|| anyhow!("no project with id or name {:?}", needle))
}

fn find_todo(state: &AppState, todo_id: &str) -> Option<(usize, usize)> {
    state.projects.iter().enumerate().find_map(|(pi, project)| {
        project
            .todos
            .iter()
            .position(|t| t.id == todo_id)
            .map(|ti| (pi, ti))
    })
}

fn print_todo(todo: &Todo) {
    println!(
        "  - [{}] ({}) {}",
        todo.id,
        todo.priority.label(),
        ui::title_text(todo)
    );
    println!("      {}", ui::description_text(todo));
    println!("      {}", ui::due_date_text(todo));
    println!("      {}", ui::notes_text(todo));
}
