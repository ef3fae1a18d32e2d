use chrono::{DateTime, Local, NaiveDate, Utc};
use tasklist_shared::{Task, TaskDraft, TaskState};

/// One task as drawn in a list.
///
/// Carries every attribute the edit dialog needs, so editing never has to
/// look anything up outside the last render.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendering {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub created_on: DateTime<Utc>,
    pub completed: bool,
}

impl Rendering {
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date,
            created_on: task.created_on,
            completed: task.completed,
        }
    }

    pub fn state(&self) -> TaskState {
        if self.completed {
            TaskState::Completed
        } else {
            TaskState::Pending
        }
    }

    /// Due date in the form the edit dialog reads back.
    pub fn due_attribute(&self) -> String {
        self.due_date.format("%Y-%m-%d").to_string()
    }

    pub fn due_label(&self) -> String {
        self.due_date.format("%a %e %b %Y").to_string()
    }

    pub fn created_label(&self) -> String {
        self.created_on
            .with_timezone(&Local)
            .format("%e %b %Y")
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Title,
    Description,
    DueDate,
}

impl Field {
    pub fn next(self) -> Self {
        match self {
            Field::Title => Field::Description,
            Field::Description => Field::DueDate,
            Field::DueDate => Field::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Field::Title => Field::DueDate,
            Field::Description => Field::Title,
            Field::DueDate => Field::Description,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Description => "Description",
            Field::DueDate => "Due (YYYY-MM-DD)",
        }
    }
}

/// Text inputs shared by the creation form and the edit dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    pub title: String,
    pub description: String,
    pub due_date: String,
}

impl Fields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::DueDate => &self.due_date,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
            Field::DueDate => &mut self.due_date,
        }
    }

    pub fn draft(&self) -> TaskDraft {
        TaskDraft::new(&self.title, &self.description, &self.due_date)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub fields: Fields,
}

impl TaskForm {
    pub fn reset(&mut self) {
        self.fields = Fields::default();
    }

    pub fn draft(&self) -> TaskDraft {
        self.fields.draft()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDialog {
    pub task_id: String,
    pub fields: Fields,
    pub focus: Field,
}

impl EditDialog {
    /// Pre-populate from what the selected rendering exposes.
    pub fn from_rendering(rendering: &Rendering) -> Self {
        Self {
            task_id: rendering.id.clone(),
            fields: Fields {
                title: rendering.title.clone(),
                description: rendering.description.clone(),
                due_date: rendering.due_attribute(),
            },
            focus: Field::Title,
        }
    }

    pub fn draft(&self) -> TaskDraft {
        self.fields.draft()
    }
}

/// Everything on screen that reflects store state or pending user input.
///
/// The two lists are written only by [`ViewState::render`].
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pending: Vec<Rendering>,
    completed: Vec<Rendering>,
    pub form: TaskForm,
    pub edit_dialog: Option<EditDialog>,
    /// Blocking message; swallows input until dismissed.
    pub alert: Option<String>,
}

impl ViewState {
    /// Replace both lists with a projection of `tasks`, in response order.
    pub fn render(&mut self, tasks: &[Task]) {
        self.pending.clear();
        self.completed.clear();
        for task in tasks {
            let rendering = Rendering::from_task(task);
            if task.completed {
                self.completed.push(rendering);
            } else {
                self.pending.push(rendering);
            }
        }
    }

    pub fn pending(&self) -> &[Rendering] {
        &self.pending
    }

    pub fn completed(&self) -> &[Rendering] {
        &self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fake::task;
    use std::collections::HashSet;

    #[test]
    fn routes_by_completion_in_response_order() {
        let mut view = ViewState::default();
        view.render(&[
            task("1", "a", false),
            task("2", "b", true),
            task("3", "c", false),
        ]);

        let pending: Vec<_> = view.pending().iter().map(|r| r.id.as_str()).collect();
        let completed: Vec<_> = view.completed().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(pending, ["1", "3"]);
        assert_eq!(completed, ["2"]);
    }

    #[test]
    fn every_task_rendered_exactly_once() {
        let tasks: Vec<_> = (0..20)
            .map(|i| task(&i.to_string(), "t", i % 3 == 0))
            .collect();
        let mut view = ViewState::default();
        view.render(&tasks);

        let mut seen = HashSet::new();
        for rendering in view.pending().iter().chain(view.completed()) {
            assert!(seen.insert(rendering.id.clone()), "{} rendered twice", rendering.id);
        }
        assert_eq!(seen.len(), tasks.len());
    }

    #[test]
    fn render_replaces_previous_contents() {
        let mut view = ViewState::default();
        view.render(&[task("1", "a", false), task("2", "b", true)]);
        view.render(&[task("3", "c", false)]);

        assert_eq!(view.pending().len(), 1);
        assert_eq!(view.pending()[0].id, "3");
        assert!(view.completed().is_empty());
    }

    #[test]
    fn edit_dialog_round_trips_rendered_attributes() {
        let original = task("7", "Write report", false);
        let dialog = EditDialog::from_rendering(&Rendering::from_task(&original));

        assert_eq!(dialog.task_id, "7");
        let update = dialog.draft().to_update().unwrap();
        assert_eq!(update.title, original.title);
        assert_eq!(update.description, original.description);
        assert_eq!(update.due_date, original.due_date);
    }

    #[test]
    fn field_cycle() {
        assert_eq!(Field::Title.next().next().next(), Field::Title);
        assert_eq!(Field::Title.prev(), Field::DueDate);
    }
}
