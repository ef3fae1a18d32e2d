use thiserror::Error;

/// Client-observed state of a task. The store enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    Pending,
    Completed,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskAction {
    Complete,
    Uncomplete,
    Edit,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {action:?} a task that is {from:?}")]
pub struct InvalidTransition {
    pub from: TaskState,
    pub action: TaskAction,
}

impl TaskState {
    /// State after applying `action`.
    ///
    /// Completing a completed task and uncompleting a pending one are valid
    /// no-ops. Nothing leaves `Deleted`.
    pub fn transition(self, action: TaskAction) -> Result<TaskState, InvalidTransition> {
        use TaskAction::*;
        use TaskState::*;

        match (self, action) {
            (Deleted, _) => Err(InvalidTransition { from: self, action }),
            (_, Complete) => Ok(Completed),
            (_, Uncomplete) => Ok(Pending),
            (state, Edit) => Ok(state),
            (_, Delete) => Ok(Deleted),
        }
    }

    /// Actions a list view puts on a task in this state.
    pub fn offers(self, action: TaskAction) -> bool {
        use TaskAction::*;
        use TaskState::*;

        matches!(
            (self, action),
            (Pending, Complete | Edit | Delete) | (Completed, Uncomplete | Delete)
        )
    }
}
