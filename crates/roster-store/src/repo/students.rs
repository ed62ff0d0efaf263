use crate::error::{Result, StoreError};
use roster_core::domain::{StudentId, StudentRecord};
use roster_core::dto::StudentInput;
use roster_core::rules::{find_duplicate, validate, NormalizedTriple, StudentFields};
use rusqlite::{ffi, params, Connection};
use std::str::FromStr;

const SELECT_COLUMNS: &str = "SELECT id, full_name, email, course, created_at, updated_at FROM students";

pub struct StudentsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> StudentsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, now_utc: i64, input: &StudentInput) -> Result<StudentRecord> {
        let fields = validate(input)?;
        if self.conn.is_autocommit() {
            let tx = self.conn.unchecked_transaction()?;
            let record = create_inner(&tx, now_utc, fields)?;
            tx.commit()?;
            Ok(record)
        } else {
            create_inner(self.conn, now_utc, fields)
        }
    }

    pub fn get(&self, id: StudentId) -> Result<Option<StudentRecord>> {
        get_inner(self.conn, id)
    }

    /// Every record, newest first.
    pub fn list(&self) -> Result<Vec<StudentRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(student_from_row(row)?);
        }
        Ok(records)
    }

    pub fn list_by_email(&self, email: &str) -> Result<Vec<StudentRecord>> {
        list_by_email_inner(self.conn, email)
    }

    pub fn update(
        &self,
        now_utc: i64,
        id: StudentId,
        input: &StudentInput,
    ) -> Result<StudentRecord> {
        let fields = validate(input)?;
        if self.conn.is_autocommit() {
            let tx = self.conn.unchecked_transaction()?;
            let record = update_inner(&tx, now_utc, id, fields)?;
            tx.commit()?;
            Ok(record)
        } else {
            update_inner(self.conn, now_utc, id, fields)
        }
    }

    pub fn delete(&self, id: StudentId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1;", [id.to_string()])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn create_inner(conn: &Connection, now_utc: i64, fields: StudentFields) -> Result<StudentRecord> {
    ensure_not_duplicate(conn, &fields, None)?;

    let record = StudentRecord {
        id: StudentId::new(),
        full_name: fields.full_name,
        email: fields.email,
        course: fields.course,
        created_at: now_utc,
        updated_at: now_utc,
    };

    conn.execute(
        "INSERT INTO students (id, full_name, email, course, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            record.id.to_string(),
            record.full_name,
            record.email,
            record.course,
            record.created_at,
            record.updated_at,
        ],
    )
    .map_err(|err| map_write_error(err, &record.email))?;

    Ok(record)
}

fn update_inner(
    conn: &Connection,
    now_utc: i64,
    id: StudentId,
    fields: StudentFields,
) -> Result<StudentRecord> {
    let mut record = get_inner(conn, id)?.ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    ensure_not_duplicate(conn, &fields, Some(id))?;

    record.full_name = fields.full_name;
    record.email = fields.email;
    record.course = fields.course;
    record.updated_at = now_utc;

    conn.execute(
        "UPDATE students SET full_name = ?2, email = ?3, course = ?4, updated_at = ?5
         WHERE id = ?1;",
        params![
            record.id.to_string(),
            record.full_name,
            record.email,
            record.course,
            record.updated_at,
        ],
    )
    .map_err(|err| map_write_error(err, &record.email))?;

    Ok(record)
}

/// Rejects the write when another record carries the same normalized triple.
/// Only records sharing the email can match, so the lookup is by email.
fn ensure_not_duplicate(
    conn: &Connection,
    fields: &StudentFields,
    exclude: Option<StudentId>,
) -> Result<()> {
    let candidate = NormalizedTriple::new(&fields.full_name, &fields.email, &fields.course);
    let same_email = list_by_email_inner(conn, &fields.email)?;
    if find_duplicate(&candidate, &same_email, exclude).is_some() {
        return Err(StoreError::DuplicateRecord);
    }
    Ok(())
}

fn get_inner(conn: &Connection, id: StudentId) -> Result<Option<StudentRecord>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        Ok(Some(student_from_row(row)?))
    } else {
        Ok(None)
    }
}

fn list_by_email_inner(conn: &Connection, email: &str) -> Result<Vec<StudentRecord>> {
    let Some(email) = roster_core::domain::normalize_email(email) else {
        return Ok(Vec::new());
    };
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} WHERE email = ?1 ORDER BY created_at DESC, rowid DESC;"
    ))?;
    let mut rows = stmt.query([email])?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        records.push(student_from_row(row)?);
    }
    Ok(records)
}

fn map_write_error(err: rusqlite::Error, email: &str) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::DuplicateEmail(email.to_string())
        }
        _ => StoreError::Sql(err),
    }
}

fn student_from_row(row: &rusqlite::Row<'_>) -> Result<StudentRecord> {
    let id_str: String = row.get(0)?;
    let id = StudentId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str.clone()))?;
    Ok(StudentRecord {
        id,
        full_name: row.get(1)?,
        email: row.get(2)?,
        course: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
