use roster_client::{ApiClient, ClientError};
use roster_core::{StudentId, StudentInput};

use crate::app::App;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LoadList,
    CreateStudent(StudentInput),
    UpdateStudent(StudentId, StudentInput),
    DeleteStudent(StudentId),
}

/// Where a failed action is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureTarget {
    /// Inline, on the form field the message belongs to.
    Form,
    /// Blocking alert modal.
    Alert,
}

impl Action {
    pub fn failure_target(&self) -> FailureTarget {
        match self {
            Action::CreateStudent(_) | Action::UpdateStudent(_, _) => FailureTarget::Form,
            Action::LoadList | Action::DeleteStudent(_) => FailureTarget::Alert,
        }
    }
}

pub fn execute_action(app: &mut App, client: &ApiClient, action: Action) -> Result<(), ClientError> {
    match action {
        Action::LoadList => {
            let records = client.list_students()?;
            app.apply_list(records);
        }
        Action::CreateStudent(input) => {
            let record = client.create_student(&input)?;
            app.finish_save(format!("Created {}", record.full_name), record.id);
        }
        Action::UpdateStudent(id, input) => {
            let record = client.update_student(id, &input)?;
            app.finish_save(format!("Updated {}", record.full_name), record.id);
        }
        Action::DeleteStudent(id) => {
            let message = client.delete_student(id)?;
            app.remove_student(id);
            app.set_status(message);
        }
    }
    Ok(())
}
