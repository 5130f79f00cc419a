use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn parse(input: &str) -> Option<Priority> {
        match input.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Todo {
    #[serde(default = "generate_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "dueDate")]
    pub due_date: String,
    pub priority: Priority,
    pub notes: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Project {
    #[serde(default = "generate_id")]
    pub id: String,
    pub name: String,
    pub todos: Vec<Todo>,
}

#[derive(thiserror::Error, Debug)]
pub enum StateError {
    #[error("no project at index {0}")]
    ProjectOutOfRange(usize),
    #[error("no todo at index {1} in project {0}")]
    TodoOutOfRange(usize, usize),
}

impl Todo {
    pub fn new(
        title: String,
        description: String,
        due_date: String,
        priority: Priority,
        notes: String,
    ) -> Self {
        Todo {
            id: generate_id(),
            title,
            description,
            due_date,
            priority,
            notes,
        }
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Project {
            id: generate_id(),
            name: name.into(),
            todos: Vec::new(),
        }
    }

    pub fn add_todo(&mut self, todo: Todo) {
        self.todos.push(todo);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub projects: Vec<Project>,
    pub active: usize,
}

impl AppState {
    pub fn initialize(saved: Option<Vec<Project>>) -> Self {
        let mut projects = saved.unwrap_or_default();
        if projects.is_empty() {
            projects.push(Project::new("General"));
        }
        AppState {
            projects,
            active: 0,
        }
    }

    pub fn active_project(&self) -> &Project {
        &self.projects[self.active]
    }

    pub fn create_project(&mut self, name: impl Into<String>) -> usize {
        self.projects.push(Project::new(name));
        self.active = self.projects.len() - 1;
        self.active
    }

    pub fn delete_project(&mut self, index: usize) -> Result<Project, StateError> {
        if index >= self.projects.len() {
            return Err(StateError::ProjectOutOfRange(index));
        }
        let removed = self.projects.remove(index);
        if self.projects.is_empty() {
            self.projects.push(Project::new("Default"));
            self.active = 0;
        } else if self.active >= index && self.active > 0 {
            // keeps the same logical project active when something at or
            // before it was removed
            self.active -= 1;
        } else if self.active >= self.projects.len() {
            self.active = self.projects.len() - 1;
        }
        Ok(removed)
    }

    pub fn set_active(&mut self, index: usize) -> Result<(), StateError> {
        if index >= self.projects.len() {
            return Err(StateError::ProjectOutOfRange(index));
        }
        self.active = index;
        Ok(())
    }

    pub fn create_todo(
        &mut self,
        title: String,
        description: String,
        due_date: String,
        priority: Priority,
        notes: String,
    ) -> bool {
        if title.trim().is_empty() {
            return false;
        }
        let todo = Todo::new(title, description, due_date, priority, notes);
        self.projects[self.active].add_todo(todo);
        true
    }

    pub fn delete_todo(
        &mut self,
        project_index: usize,
        todo_index: usize,
    ) -> Result<Todo, StateError> {
        let project = self
            .projects
            .get_mut(project_index)
            .ok_or(StateError::ProjectOutOfRange(project_index))?;
        if todo_index >= project.todos.len() {
            return Err(StateError::TodoOutOfRange(project_index, todo_index));
        }
        Ok(project.todos.remove(todo_index))
    }
}

fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{AppState, Priority, Project, StateError, Todo};

    fn todo(title: &str) -> Todo {
        Todo::new(
            title.to_string(),
            String::new(),
            String::new(),
            Priority::Low,
            String::new(),
        )
    }

    fn state_with(names: &[&str], active: usize) -> AppState {
        AppState {
            projects: names.iter().map(|n| Project::new(*n)).collect(),
            active,
        }
    }

    #[test]
    fn initialize_without_saved_state_creates_general() {
        let state = AppState::initialize(None);
        assert_eq!(state.projects.len(), 1);
        assert_eq!(state.projects[0].name, "General");
        assert!(state.projects[0].todos.is_empty());
        assert_eq!(state.active, 0);
    }

    #[test]
    fn initialize_with_saved_projects_uses_them_and_starts_at_zero() {
        let saved = vec![Project::new("Work"), Project::new("Home")];
        let state = AppState::initialize(Some(saved));
        assert_eq!(state.projects.len(), 2);
        assert_eq!(state.projects[0].name, "Work");
        assert_eq!(state.active, 0);
    }

    #[test]
    fn initialize_with_empty_saved_list_falls_back_to_general() {
        let state = AppState::initialize(Some(Vec::new()));
        assert_eq!(state.projects.len(), 1);
        assert_eq!(state.projects[0].name, "General");
    }

    #[test]
    fn generated_ids_are_six_alphanumeric_chars() {
        let project = Project::new("Work");
        assert_eq!(project.id.len(), 6);
        assert!(project.id.chars().all(|c| c.is_ascii_alphanumeric()));
        let t = todo("milk");
        assert_eq!(t.id.len(), 6);
        assert!(t.id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn create_project_appends_and_becomes_active() {
        let mut state = AppState::initialize(None);
        let index = state.create_project("Work");
        assert_eq!(index, 1);
        assert_eq!(state.active, 1);
        assert_eq!(state.active_project().name, "Work");
        assert!(state.active_project().todos.is_empty());
    }

    #[test]
    fn create_project_accepts_blank_name() {
        let mut state = AppState::initialize(None);
        state.create_project("");
        assert_eq!(state.active_project().name, "");
    }

    #[test]
    fn add_todo_preserves_insertion_order() {
        let mut project = Project::new("Work");
        project.add_todo(todo("first"));
        project.add_todo(todo("second"));
        project.add_todo(todo("third"));
        let titles: Vec<&str> = project.todos.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }

    #[test]
    fn create_todo_appends_to_the_active_project() {
        let mut state = state_with(&["Work", "Home"], 1);
        let created = state.create_todo(
            "Buy milk".to_string(),
            String::new(),
            String::new(),
            Priority::Low,
            String::new(),
        );
        assert!(created);
        assert!(state.projects[0].todos.is_empty());
        assert_eq!(state.projects[1].todos.len(), 1);
        assert_eq!(state.projects[1].todos[0].title, "Buy milk");
    }

    #[test]
    fn create_todo_with_blank_title_changes_nothing() {
        let mut state = AppState::initialize(None);
        for title in ["", "   ", "\t\n"] {
            let created = state.create_todo(
                title.to_string(),
                "desc".to_string(),
                "tomorrow".to_string(),
                Priority::High,
                "note".to_string(),
            );
            assert!(!created);
            assert!(state.active_project().todos.is_empty());
        }
    }

    #[test]
    fn create_todo_stores_title_untrimmed() {
        let mut state = AppState::initialize(None);
        assert!(state.create_todo(
            "  padded  ".to_string(),
            String::new(),
            String::new(),
            Priority::Low,
            String::new(),
        ));
        assert_eq!(state.active_project().todos[0].title, "  padded  ");
    }

    #[test]
    fn todo_count_tracks_creates_minus_deletes_and_keeps_order() {
        let mut state = AppState::initialize(None);
        for title in ["a", "b", "", "c", "d"] {
            state.create_todo(
                title.to_string(),
                String::new(),
                String::new(),
                Priority::Medium,
                String::new(),
            );
        }
        assert_eq!(state.active_project().todos.len(), 4);
        state.delete_todo(0, 1).unwrap();
        assert_eq!(state.active_project().todos.len(), 3);
        let titles: Vec<&str> = state
            .active_project()
            .todos
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, ["a", "c", "d"]);
    }

    #[test]
    fn delete_todo_shifts_following_indices_down() {
        let mut state = AppState::initialize(None);
        for title in ["a", "b", "c"] {
            state.create_todo(
                title.to_string(),
                String::new(),
                String::new(),
                Priority::Low,
                String::new(),
            );
        }
        let removed = state.delete_todo(0, 0).unwrap();
        assert_eq!(removed.title, "a");
        assert_eq!(state.active_project().todos[0].title, "b");
        assert_eq!(state.active_project().todos[1].title, "c");
    }

    #[test]
    fn delete_todo_rejects_out_of_range_indices() {
        let mut state = AppState::initialize(None);
        assert!(matches!(
            state.delete_todo(5, 0),
            Err(StateError::ProjectOutOfRange(5))
        ));
        assert!(matches!(
            state.delete_todo(0, 0),
            Err(StateError::TodoOutOfRange(0, 0))
        ));
    }

    #[test]
    fn set_active_rejects_out_of_range_index() {
        let mut state = AppState::initialize(None);
        assert!(matches!(
            state.set_active(1),
            Err(StateError::ProjectOutOfRange(1))
        ));
        assert!(state.set_active(0).is_ok());
    }

    #[test]
    fn delete_last_project_reinstates_default_as_active() {
        let mut state = AppState::initialize(None);
        state.delete_project(0).unwrap();
        assert_eq!(state.projects.len(), 1);
        assert_eq!(state.projects[0].name, "Default");
        assert!(state.projects[0].todos.is_empty());
        assert_eq!(state.active, 0);
    }

    #[test]
    fn delete_before_active_keeps_same_logical_project_active() {
        let mut state = state_with(&["A", "B", "C"], 2);
        let active_id = state.active_project().id.clone();
        state.delete_project(0).unwrap();
        assert_eq!(state.projects.len(), 2);
        assert_eq!(state.active, 1);
        assert_eq!(state.active_project().id, active_id);
        assert_eq!(state.active_project().name, "C");
    }

    #[test]
    fn delete_active_at_tail_clamps_to_last_index() {
        let mut state = state_with(&["A", "B", "C"], 2);
        state.delete_project(2).unwrap();
        assert_eq!(state.projects.len(), 2);
        assert_eq!(state.active, state.projects.len() - 1);
        assert_eq!(state.active_project().name, "B");
    }

    #[test]
    fn delete_active_mid_list_moves_to_previous_project() {
        let mut state = state_with(&["A", "B", "C"], 1);
        state.delete_project(1).unwrap();
        assert_eq!(state.active, 0);
        assert_eq!(state.active_project().name, "A");
    }

    #[test]
    fn delete_after_active_leaves_active_unchanged() {
        let mut state = state_with(&["A", "B", "C"], 0);
        state.delete_project(2).unwrap();
        assert_eq!(state.active, 0);
        assert_eq!(state.active_project().name, "A");
    }

    #[test]
    fn delete_first_of_two_with_active_first_keeps_index_zero() {
        let mut state = state_with(&["A", "B"], 0);
        state.delete_project(0).unwrap();
        assert_eq!(state.active, 0);
        assert_eq!(state.active_project().name, "B");
    }

    #[test]
    fn delete_project_rejects_out_of_range_index() {
        let mut state = AppState::initialize(None);
        assert!(matches!(
            state.delete_project(3),
            Err(StateError::ProjectOutOfRange(3))
        ));
        assert_eq!(state.projects.len(), 1);
    }

    #[test]
    fn delete_project_destroys_owned_todos() {
        let mut state = state_with(&["A", "B"], 0);
        state.create_todo(
            "task".to_string(),
            String::new(),
            String::new(),
            Priority::Low,
            String::new(),
        );
        let removed = state.delete_project(0).unwrap();
        assert_eq!(removed.todos.len(), 1);
        assert!(state.projects.iter().all(|p| p.todos.is_empty()));
    }

    #[test]
    fn scenario_create_then_done_round() {
        let mut state = AppState {
            projects: Vec::new(),
            active: 0,
        };
        state.create_project("Work");
        assert_eq!(state.active, 0);
        assert_eq!(state.projects.len(), 1);
        assert_eq!(state.projects[0].name, "Work");
        assert!(state.projects[0].todos.is_empty());

        assert!(state.create_todo(
            "Buy milk".to_string(),
            String::new(),
            String::new(),
            Priority::Low,
            String::new(),
        ));
        let t = &state.projects[0].todos[0];
        assert_eq!(t.title, "Buy milk");
        assert_eq!(t.description, "");
        assert_eq!(t.due_date, "");
        assert_eq!(t.priority, Priority::Low);
        assert_eq!(t.notes, "");

        state.delete_todo(0, 0).unwrap();
        assert!(state.projects[0].todos.is_empty());
    }

    #[test]
    fn priority_parse_is_case_insensitive_and_strict() {
        assert_eq!(Priority::parse("low"), Some(Priority::Low));
        assert_eq!(Priority::parse(" MEDIUM "), Some(Priority::Medium));
        assert_eq!(Priority::parse("High"), Some(Priority::High));
        assert_eq!(Priority::parse("urgent"), None);
        assert_eq!(Priority::parse(""), None);
    }

    #[test]
    fn priority_labels_match_wire_values() {
        assert_eq!(Priority::Low.label(), "Low");
        assert_eq!(Priority::Medium.label(), "Medium");
        assert_eq!(Priority::High.label(), "High");
    }
}
