use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use roster_core::error::DUPLICATE_RECORD_MESSAGE;
use roster_core::rules::{is_duplicate, validate, NormalizedTriple};
use roster_core::{Field, StudentId, StudentInput, StudentRecord};

use crate::actions::{Action, FailureTarget};

pub const LIST_EMPTY: &str = "No students yet";
pub const LIST_LOADING: &str = "Loading...";
pub const DELETE_PROMPT: &str = "Delete this student? (y/n)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List,
    Form,
    Confirm(ConfirmState),
}

#[derive(Debug, Clone)]
pub struct App {
    pub mode: Mode,
    pub show_help: bool,
    pub should_quit: bool,
    pub api_label: String,
    pub students: Vec<StudentRecord>,
    pub selected: usize,
    pub form: StudentForm,
    pub loading: bool,
    pub status: Option<String>,
    pub alert: Option<String>,
    actions: VecDeque<Action>,
    pub(crate) pending_select: Option<StudentId>,
}

impl App {
    pub fn new(api_label: impl Into<String>) -> Self {
        let mut app = Self {
            mode: Mode::List,
            show_help: false,
            should_quit: false,
            api_label: api_label.into(),
            students: Vec::new(),
            selected: 0,
            form: StudentForm::default(),
            loading: false,
            status: None,
            alert: None,
            actions: VecDeque::new(),
            pending_select: None,
        };
        app.request_refresh();
        app
    }

    pub fn enqueue(&mut self, action: Action) {
        self.actions.push_back(action);
    }

    pub fn next_action(&mut self) -> Option<Action> {
        self.actions.pop_front()
    }

    pub fn request_refresh(&mut self) {
        self.loading = true;
        self.enqueue(Action::LoadList);
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn selected_student(&self) -> Option<&StudentRecord> {
        self.students.get(self.selected)
    }

    pub fn apply_list(&mut self, records: Vec<StudentRecord>) {
        self.loading = false;
        self.students = records;
        if let Some(target) = self.pending_select.take() {
            if let Some(pos) = self.students.iter().position(|item| item.id == target) {
                self.selected = pos;
            }
        }
        self.clamp_selection();
    }

    /// Successful create or update: the form is cleared and the list refetched.
    pub fn finish_save(&mut self, status: String, id: StudentId) {
        self.form.clear();
        if self.mode == Mode::Form {
            self.mode = Mode::List;
        }
        self.set_status(status);
        self.pending_select = Some(id);
        self.request_refresh();
    }

    /// Drops a deleted record without refetching. A form editing that record
    /// is cleared as well.
    pub fn remove_student(&mut self, id: StudentId) {
        self.students.retain(|record| record.id != id);
        self.clamp_selection();
        if self.form.editing == Some(id) {
            self.form.clear();
            if self.mode == Mode::Form {
                self.mode = Mode::List;
            }
        }
    }

    pub fn report_failure(&mut self, target: FailureTarget, message: String) {
        match target {
            FailureTarget::Form => self.form.set_error(FieldError::from_message(message)),
            FailureTarget::Alert => {
                self.loading = false;
                self.alert = Some(message);
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
            return;
        }

        if matches!(
            key,
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }
        ) {
            self.should_quit = true;
            return;
        }

        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alert = None;
            }
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return;
        }

        let mut mode = std::mem::replace(&mut self.mode, Mode::List);
        match &mut mode {
            Mode::List => {
                if let Some(next) = self.handle_list_key(key) {
                    mode = next;
                }
            }
            Mode::Form => {
                if let Some(next) = self.handle_form_key(key) {
                    mode = next;
                }
            }
            Mode::Confirm(state) => {
                if let Some(next) = self.handle_confirm_key(state, key) {
                    mode = next;
                }
            }
        }
        self.mode = mode;
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Option<Mode> {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = self.students.len().saturating_sub(1);
            }
            KeyCode::Char('r') => self.request_refresh(),
            KeyCode::Char('a') => {
                if self.form.editing.is_some() {
                    self.form.clear();
                }
                self.form.focus = 0;
                return Some(Mode::Form);
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                let record = self.selected_student()?.clone();
                self.form.load(&record);
                return Some(Mode::Form);
            }
            KeyCode::Char('d') => {
                let id = self.selected_student()?.id;
                return Some(Mode::Confirm(ConfirmState::delete(id)));
            }
            _ => {}
        }
        None
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Mode> {
        match key.code {
            KeyCode::Esc => {
                self.form.clear();
                return Some(Mode::List);
            }
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_prev(),
            KeyCode::Enter => {
                if self.form.is_save_focus() {
                    self.submit_form();
                } else if self.form.is_cancel_focus() {
                    self.form.clear();
                    return Some(Mode::List);
                } else {
                    self.form.focus_next();
                }
            }
            _ => self.form.apply_input(key),
        }
        None
    }

    fn handle_confirm_key(&mut self, state: &ConfirmState, key: KeyEvent) -> Option<Mode> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.enqueue(Action::DeleteStudent(state.id));
                Some(Mode::List)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Mode::List),
            _ => None,
        }
    }

    /// Runs the local rule set and the duplicate check against the loaded
    /// list; the request is queued only when both pass.
    fn submit_form(&mut self) {
        match self.form.to_action(&self.students) {
            Ok(action) => {
                self.form.error = None;
                self.enqueue(action);
            }
            Err(err) => self.form.set_error(err),
        }
    }

    fn move_selection(&mut self, delta: i32) {
        if self.students.is_empty() {
            self.selected = 0;
            return;
        }
        let len = self.students.len() as i32;
        let next = (self.selected as i32 + delta).clamp(0, len - 1);
        self.selected = next as usize;
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.students.len() {
            self.selected = self.students.len().saturating_sub(1);
        }
    }
}

fn apply_text_input(target: &mut String, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            target.clear();
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            delete_last_word(target);
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            target.push(ch);
        }
        KeyCode::Backspace => {
            target.pop();
        }
        _ => return false,
    }
    true
}

fn delete_last_word(value: &mut String) {
    while value.ends_with(|ch: char| ch.is_whitespace()) {
        value.pop();
    }
    while value.ends_with(|ch: char| !ch.is_whitespace()) {
        value.pop();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    /// Server messages carry no field, so the text decides where they land.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            field: Field::for_message(&message),
            message,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentForm {
    pub(crate) focus: usize,
    pub editing: Option<StudentId>,
    pub full_name: String,
    pub email: String,
    pub course: String,
    pub error: Option<FieldError>,
}

impl StudentForm {
    pub const FIELDS: [Field; 3] = [Field::FullName, Field::Email, Field::Course];

    pub fn load(&mut self, record: &StudentRecord) {
        *self = Self {
            focus: 0,
            editing: Some(record.id),
            full_name: record.full_name.clone(),
            email: record.email.clone(),
            course: record.course.clone(),
            error: None,
        };
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn focused_field(&self) -> Option<Field> {
        Self::FIELDS.get(self.focus).copied()
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::FullName => &self.full_name,
            Field::Email => &self.email,
            Field::Course => &self.course,
        }
    }

    pub fn error_for(&self, field: Field) -> Option<&str> {
        self.error
            .as_ref()
            .filter(|err| err.field == field)
            .map(|err| err.message.as_str())
    }

    pub fn set_error(&mut self, error: FieldError) {
        if let Some(pos) = Self::FIELDS.iter().position(|field| *field == error.field) {
            self.focus = pos;
        }
        self.error = Some(error);
    }

    pub fn focus_next(&mut self) {
        let total = Self::FIELDS.len() + 2;
        self.focus = (self.focus + 1) % total;
    }

    pub fn focus_prev(&mut self) {
        let total = Self::FIELDS.len() + 2;
        if self.focus == 0 {
            self.focus = total - 1;
        } else {
            self.focus -= 1;
        }
    }

    pub fn is_save_focus(&self) -> bool {
        self.focus == Self::FIELDS.len()
    }

    pub fn is_cancel_focus(&self) -> bool {
        self.focus == Self::FIELDS.len() + 1
    }

    /// Edits the focused field. Changing a field clears its error.
    pub fn apply_input(&mut self, key: KeyEvent) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let target = match field {
            Field::FullName => &mut self.full_name,
            Field::Email => &mut self.email,
            Field::Course => &mut self.course,
        };
        if apply_text_input(target, key) && self.error_for(field).is_some() {
            self.error = None;
        }
    }

    pub fn to_input(&self) -> StudentInput {
        StudentInput::new(&self.full_name, &self.email, &self.course)
    }

    pub fn to_action(&self, known: &[StudentRecord]) -> Result<Action, FieldError> {
        let input = self.to_input();
        let fields = validate(&input).map_err(|err| FieldError {
            field: err.field(),
            message: err.to_string(),
        })?;

        let candidate = NormalizedTriple::new(&fields.full_name, &fields.email, &fields.course);
        if is_duplicate(&candidate, known, self.editing) {
            return Err(FieldError::from_message(DUPLICATE_RECORD_MESSAGE));
        }

        Ok(match self.editing {
            Some(id) => Action::UpdateStudent(id, input),
            None => Action::CreateStudent(input),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmState {
    pub message: String,
    pub id: StudentId,
}

impl ConfirmState {
    pub fn delete(id: StudentId) -> Self {
        Self {
            message: DELETE_PROMPT.to_string(),
            id,
        }
    }
}
