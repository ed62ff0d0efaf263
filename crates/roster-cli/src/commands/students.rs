use crate::commands::{print_json, Context};
use crate::error::{conflict, invalid_input, not_found};
use anyhow::Result;
use clap::Args;
use roster_core::error::{DUPLICATE_RECORD_MESSAGE, NOT_FOUND_MESSAGE};
use roster_core::rules::{find_duplicate, is_duplicate, validate, NormalizedTriple};
use roster_core::time::format_timestamp_datetime;
use roster_core::{MessageDto, StudentId, StudentInput, StudentRecord};
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub course: String,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub course: Option<String>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: String,
}

pub fn add_student(ctx: &Context<'_>, args: AddArgs) -> Result<()> {
    let input = StudentInput::new(args.name, args.email, args.course);
    let fields = validate(&input)?;

    let existing = ctx.client.list_students()?;
    let candidate = NormalizedTriple::new(&fields.full_name, &fields.email, &fields.course);
    if is_duplicate(&candidate, &existing, None) {
        return Err(conflict(DUPLICATE_RECORD_MESSAGE));
    }

    let record = ctx.client.create_student(&input)?;
    if ctx.json {
        print_json(&record)?;
    } else {
        println!("created {} {}", record.id, record.full_name);
    }
    Ok(())
}

pub fn list_students(ctx: &Context<'_>) -> Result<()> {
    let records = ctx.client.list_students()?;
    if ctx.json {
        return print_json(&records);
    }
    if records.is_empty() {
        println!("No students yet");
        return Ok(());
    }
    for record in &records {
        println!(
            "{}  {}  {}  {}  {}",
            record.id,
            record.full_name,
            record.email,
            record.course,
            format_timestamp_datetime(record.created_at)
        );
    }
    Ok(())
}

/// Unspecified fields keep their current values; the server always receives
/// all three.
pub fn edit_student(ctx: &Context<'_>, args: EditArgs) -> Result<()> {
    let id = parse_student_id(&args.id)?;
    let existing = ctx.client.list_students()?;
    let current = find_record(&existing, id)?;

    let input = StudentInput::new(
        args.name.unwrap_or_else(|| current.full_name.clone()),
        args.email.unwrap_or_else(|| current.email.clone()),
        args.course.unwrap_or_else(|| current.course.clone()),
    );
    let fields = validate(&input)?;

    let candidate = NormalizedTriple::new(&fields.full_name, &fields.email, &fields.course);
    if let Some(other) = find_duplicate(&candidate, &existing, Some(id)) {
        debug!(other = %other.id, "duplicate record in fetched list");
        return Err(conflict(DUPLICATE_RECORD_MESSAGE));
    }

    let record = ctx.client.update_student(id, &input)?;
    if ctx.json {
        print_json(&record)?;
    } else {
        println!("updated {} {}", record.id, record.full_name);
    }
    Ok(())
}

pub fn delete_student(ctx: &Context<'_>, args: DeleteArgs) -> Result<()> {
    let id = parse_student_id(&args.id)?;
    let message = ctx.client.delete_student(id)?;
    if ctx.json {
        print_json(&MessageDto::new(message))?;
    } else {
        println!("deleted {id}");
    }
    Ok(())
}

fn parse_student_id(raw: &str) -> Result<StudentId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid_input("student id cannot be empty"));
    }
    StudentId::from_str(trimmed).map_err(|_| invalid_input("invalid student id"))
}

fn find_record(records: &[StudentRecord], id: StudentId) -> Result<&StudentRecord> {
    records
        .iter()
        .find(|record| record.id == id)
        .ok_or_else(|| not_found(NOT_FOUND_MESSAGE))
}
