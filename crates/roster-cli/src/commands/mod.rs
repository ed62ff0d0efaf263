use anyhow::Result;
use roster_client::ApiClient;
use serde::Serialize;
use std::io::{self, Write};

pub mod serve;
pub mod students;
pub mod tui;

pub struct Context<'a> {
    pub client: &'a ApiClient,
    pub json: bool,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
