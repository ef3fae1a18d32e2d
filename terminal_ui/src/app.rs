use std::io;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::stream::{Stream, StreamExt};
use log::{debug, warn};
use tasklist_shared::{SortKey, TaskAction};

use crate::controller::TaskViewController;
use crate::store::TaskStore;
use crate::view::{Field, Rendering, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Form(Field),
    Pending,
    Completed,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Form(Field::DueDate) => Focus::Pending,
            Focus::Form(field) => Focus::Form(field.next()),
            Focus::Pending => Focus::Completed,
            Focus::Completed => Focus::Form(Field::Title),
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Form(Field::Title) => Focus::Completed,
            Focus::Form(field) => Focus::Form(field.prev()),
            Focus::Pending => Focus::Form(Field::DueDate),
            Focus::Completed => Focus::Pending,
        }
    }
}

/// Something a key asked for that needs the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Create,
    Complete(String),
    Uncomplete(String),
    OpenEdit(String),
    SaveEdit,
    Delete(String),
    CycleSort,
    Refresh,
    Quit,
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

pub struct App<S> {
    controller: TaskViewController<S>,
    pub view: ViewState,
    pub focus: Focus,
    pub pending_selected: usize,
    pub completed_selected: usize,
    sort_keys: Vec<SortKey>,
    sort_index: usize,
    /// Last store failure, shown in the footer until the next action.
    pub status: Option<String>,
    pub busy: bool,
    pub should_quit: bool,
}

impl<S> App<S> {
    pub fn new(controller: TaskViewController<S>, sort_keys: Vec<SortKey>) -> Self {
        let sort_keys = if sort_keys.is_empty() {
            vec![SortKey::Default]
        } else {
            sort_keys
        };
        Self {
            controller,
            view: ViewState::default(),
            focus: Focus::Form(Field::Title),
            pending_selected: 0,
            completed_selected: 0,
            sort_keys,
            sort_index: 0,
            status: None,
            busy: false,
            should_quit: false,
        }
    }

    pub fn sort(&self) -> &SortKey {
        &self.sort_keys[self.sort_index]
    }

    /// Rendering under the cursor in the focused list.
    pub fn selected(&self) -> Option<&Rendering> {
        match self.focus {
            Focus::Pending => self.view.pending().get(self.pending_selected),
            Focus::Completed => self.view.completed().get(self.completed_selected),
            Focus::Form(_) => None,
        }
    }

    /// Map a key press to an intent. Pure input editing and navigation are
    /// applied here directly.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Intent> {
        if is_interrupt(&key) {
            return Some(Intent::Quit);
        }

        if self.view.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.view.alert = None;
            }
            return None;
        }

        if let Some(dialog) = self.view.edit_dialog.as_mut() {
            match key.code {
                KeyCode::Esc => self.view.edit_dialog = None,
                KeyCode::Enter => return Some(Intent::SaveEdit),
                KeyCode::Tab => dialog.focus = dialog.focus.next(),
                KeyCode::BackTab => dialog.focus = dialog.focus.prev(),
                KeyCode::Backspace => {
                    dialog.fields.get_mut(dialog.focus).pop();
                }
                KeyCode::Char(c) => dialog.fields.get_mut(dialog.focus).push(c),
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return None;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Form(field) => self.handle_form_key(field, key.code),
            Focus::Pending | Focus::Completed => self.handle_list_key(key.code),
        }
    }

    fn handle_form_key(&mut self, field: Field, code: KeyCode) -> Option<Intent> {
        match code {
            KeyCode::Enter => return Some(Intent::Create),
            KeyCode::Esc => self.focus = Focus::Pending,
            KeyCode::Backspace => {
                self.view.form.fields.get_mut(field).pop();
            }
            KeyCode::Char(c) => self.view.form.fields.get_mut(field).push(c),
            _ => {}
        }
        None
    }

    fn handle_list_key(&mut self, code: KeyCode) -> Option<Intent> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Some(Intent::Quit),
            KeyCode::Char('s') => return Some(Intent::CycleSort),
            KeyCode::Char('r') => return Some(Intent::Refresh),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            _ => {}
        }

        let action = match code {
            KeyCode::Char('d') => TaskAction::Complete,
            KeyCode::Char('u') => TaskAction::Uncomplete,
            KeyCode::Char('e') => TaskAction::Edit,
            KeyCode::Char('x') | KeyCode::Delete => TaskAction::Delete,
            _ => return None,
        };
        let rendering = self.selected()?;
        if !rendering.state().offers(action) {
            return None;
        }
        let id = rendering.id.clone();
        Some(match action {
            TaskAction::Complete => Intent::Complete(id),
            TaskAction::Uncomplete => Intent::Uncomplete(id),
            TaskAction::Edit => Intent::OpenEdit(id),
            TaskAction::Delete => Intent::Delete(id),
        })
    }

    fn move_selection(&mut self, delta: isize) {
        let (selected, len) = match self.focus {
            Focus::Pending => (&mut self.pending_selected, self.view.pending().len()),
            Focus::Completed => (&mut self.completed_selected, self.view.completed().len()),
            Focus::Form(_) => return,
        };
        if len == 0 {
            *selected = 0;
        } else {
            *selected = selected.saturating_add_signed(delta).min(len - 1);
        }
    }

    fn clamp_selection(&mut self) {
        self.pending_selected = self
            .pending_selected
            .min(self.view.pending().len().saturating_sub(1));
        self.completed_selected = self
            .completed_selected
            .min(self.view.completed().len().saturating_sub(1));
    }
}

impl<S: TaskStore> App<S> {
    /// Run an intent to completion. Store failures have already been logged
    /// by the controller; the view keeps its last good state.
    pub async fn dispatch(&mut self, intent: Intent) {
        self.status = None;
        if intent == Intent::CycleSort {
            self.sort_index = (self.sort_index + 1) % self.sort_keys.len();
        }
        let sort = self.sort().clone();
        let controller = &self.controller;
        let view = &mut self.view;

        let result = match intent {
            Intent::Quit => {
                self.should_quit = true;
                return;
            }
            Intent::Refresh | Intent::CycleSort => controller.refresh(view, &sort).await,
            Intent::Create => {
                let draft = view.form.draft();
                controller.create(view, &draft, &sort).await
            }
            Intent::Complete(id) => controller.complete(view, &id, &sort).await,
            Intent::Uncomplete(id) => controller.uncomplete(view, &id, &sort).await,
            Intent::Delete(id) => controller.delete(view, &id, &sort).await,
            Intent::OpenEdit(id) => {
                let rendering = view.pending().iter().find(|r| r.id == id).cloned();
                if let Some(rendering) = rendering {
                    controller.open_edit(view, &rendering);
                }
                return;
            }
            Intent::SaveEdit => {
                let Some(dialog) = view.edit_dialog.clone() else {
                    return;
                };
                controller
                    .edit(view, &dialog.task_id, &dialog.draft(), &sort)
                    .await
            }
        };

        if let Err(err) = result {
            if err.is_remote() {
                self.status = Some(err.to_string());
            }
        }
        self.clamp_selection();
    }

    /// Like [`App::dispatch`], but keeps reading `events` while the store is
    /// working. Ctrl-C, or the end of input, drops the request and quits.
    /// Any other input arriving meanwhile is discarded.
    pub async fn dispatch_watching<E>(&mut self, intent: Intent, events: &mut E) -> io::Result<()>
    where
        E: Stream<Item = io::Result<Event>> + Unpin,
    {
        let interrupted = {
            let dispatch = self.dispatch(intent);
            tokio::pin!(dispatch);
            loop {
                tokio::select! {
                    () = &mut dispatch => break false,
                    event = events.next() => match event {
                        None => break true,
                        Some(event) => match event? {
                            Event::Key(key) if key.kind == KeyEventKind::Press && is_interrupt(&key) => {
                                break true
                            }
                            other => debug!("input ignored while busy: {other:?}"),
                        },
                    },
                }
            }
        };

        if interrupted {
            warn!("request abandoned, quitting");
            self.should_quit = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fake::{task, Call, FakeStore};
    use reqwest::StatusCode;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App<FakeStore>, text: &str) {
        for c in text.chars() {
            assert_eq!(app.handle_key(key(KeyCode::Char(c))), None);
        }
    }

    async fn loaded(tasks: Vec<tasklist_shared::Task>) -> App<FakeStore> {
        let mut app = App::new(
            TaskViewController::new(FakeStore::with_tasks(tasks)),
            vec![SortKey::Default, SortKey::By("title".into())],
        );
        app.dispatch(Intent::Refresh).await;
        app
    }

    #[tokio::test]
    async fn typing_fills_the_form_and_enter_creates() {
        let mut app = loaded(vec![]).await;
        type_text(&mut app, "T");
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "D");
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "2024-05-01");

        let intent = app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(intent, Intent::Create);
        app.dispatch(intent).await;

        assert_eq!(app.view.pending().len(), 1);
        assert_eq!(app.view.form.fields.title, "");
    }

    #[tokio::test]
    async fn blank_create_raises_alert_that_blocks_input() {
        let mut app = loaded(vec![]).await;
        let intent = app.handle_key(key(KeyCode::Enter)).unwrap();
        app.dispatch(intent).await;

        assert!(app.view.alert.is_some());
        assert_eq!(app.handle_key(key(KeyCode::Char('x'))), None);
        assert_eq!(app.view.form.fields.title, "");

        app.handle_key(key(KeyCode::Enter));
        assert!(app.view.alert.is_none());
    }

    #[tokio::test]
    async fn list_keys_follow_task_state() {
        let mut app = loaded(vec![task("1", "a", false), task("2", "b", true)]).await;

        app.focus = Focus::Pending;
        assert_eq!(app.handle_key(key(KeyCode::Char('d'))), Some(Intent::Complete("1".into())));
        assert_eq!(app.handle_key(key(KeyCode::Char('u'))), None);
        assert_eq!(app.handle_key(key(KeyCode::Char('e'))), Some(Intent::OpenEdit("1".into())));

        app.focus = Focus::Completed;
        assert_eq!(app.handle_key(key(KeyCode::Char('u'))), Some(Intent::Uncomplete("2".into())));
        assert_eq!(app.handle_key(key(KeyCode::Char('e'))), None);
        assert_eq!(app.handle_key(key(KeyCode::Delete)), Some(Intent::Delete("2".into())));
    }

    #[tokio::test]
    async fn edit_dialog_flow() {
        let mut app = loaded(vec![task("1", "Report", false)]).await;
        app.focus = Focus::Pending;

        let intent = app.handle_key(key(KeyCode::Char('e'))).unwrap();
        app.dispatch(intent).await;
        let dialog = app.view.edit_dialog.as_ref().unwrap();
        assert_eq!(dialog.fields.title, "Report");
        assert_eq!(dialog.fields.due_date, "2024-01-01");

        type_text(&mut app, "s");
        let intent = app.handle_key(key(KeyCode::Enter)).unwrap();
        app.dispatch(intent).await;

        assert!(app.view.edit_dialog.is_none());
        assert_eq!(app.view.pending()[0].title, "Reports");
    }

    #[tokio::test]
    async fn cycle_sort_refreshes_with_next_key() {
        let mut app = loaded(vec![task("1", "b", false), task("2", "a", false)]).await;
        app.focus = Focus::Pending;

        let intent = app.handle_key(key(KeyCode::Char('s'))).unwrap();
        app.dispatch(intent).await;

        assert_eq!(app.sort(), &SortKey::By("title".into()));
        assert_eq!(app.view.pending()[0].id, "2");
        assert_eq!(
            app.controller.store().calls().last(),
            Some(&Call::List(SortKey::By("title".into())))
        );
    }

    #[tokio::test]
    async fn store_failure_shows_in_footer_and_keeps_lists() {
        let mut app = loaded(vec![task("42", "a", false)]).await;
        app.focus = Focus::Pending;
        app.controller.store().fail_next(StatusCode::INTERNAL_SERVER_ERROR);

        let intent = app.handle_key(key(KeyCode::Char('x'))).unwrap();
        app.dispatch(intent).await;

        assert!(app.status.is_some());
        assert!(app.view.alert.is_none());
        assert_eq!(app.view.pending().len(), 1);
    }

    #[tokio::test]
    async fn selection_stays_in_bounds() {
        let mut app = loaded(vec![task("1", "a", false), task("2", "b", false)]).await;
        app.focus = Focus::Pending;
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.pending_selected, 1);

        let intent = app.handle_key(key(KeyCode::Char('d'))).unwrap();
        app.dispatch(intent).await;
        assert_eq!(app.pending_selected, 0);
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.pending_selected, 0);
    }

    #[tokio::test]
    async fn ctrl_c_abandons_a_hanging_request() {
        let mut app = loaded(vec![task("1", "a", false)]).await;
        app.controller.store().stall_next();

        let input: Vec<io::Result<Event>> = vec![
            Ok(Event::Key(key(KeyCode::Char('x')))),
            Ok(Event::Resize(120, 40)),
            Ok(Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))),
        ];
        let mut events = futures_util::stream::iter(input).chain(futures_util::stream::pending());
        app.dispatch_watching(Intent::Refresh, &mut events).await.unwrap();

        assert!(app.should_quit);
        assert_eq!(app.view.pending().len(), 1);
        assert_eq!(app.view.form.fields.title, "");
        assert_eq!(app.controller.store().calls().len(), 2);
    }

    #[tokio::test]
    async fn answered_request_does_not_wait_for_input() {
        let mut app = loaded(vec![]).await;
        app.controller.store().fail_next(StatusCode::INTERNAL_SERVER_ERROR);

        let mut events = futures_util::stream::pending::<io::Result<Event>>();
        app.dispatch_watching(Intent::Refresh, &mut events).await.unwrap();

        assert!(!app.should_quit);
        assert!(app.status.is_some());
    }

    #[test]
    fn focus_cycle_covers_form_and_lists() {
        let mut focus = Focus::Form(Field::Title);
        for _ in 0..5 {
            focus = focus.next();
        }
        assert_eq!(focus, Focus::Form(Field::Title));
        assert_eq!(Focus::Pending.prev(), Focus::Form(Field::DueDate));
    }
}
