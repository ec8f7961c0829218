//! Interactive menu loop
//!
//! Reads choices from any `BufRead` and writes prompts to any `Write`, so the
//! binary wires it to stdin/stdout and tests drive it with in-memory buffers.

use std::io::{BufRead, Write};
use std::str::FromStr;
use anyhow::{Context, Result};
use tracing::debug;

use crate::store::TaskStore;
use crate::task::{NewTask, TaskId};

/// How the menu loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellExit {
    /// User chose "save and exit" and the save succeeded
    Saved,
    /// Input ran out; nothing was saved
    EndOfInput,
}

pub struct Shell<'a, R, W> {
    store: &'a mut TaskStore,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(store: &'a mut TaskStore, input: R, output: W) -> Self {
        Self { store, input, output }
    }

    /// Run until the user saves and exits or input ends
    pub fn run(&mut self) -> Result<ShellExit> {
        loop {
            writeln!(self.output, "\nWelcome to the Task Manager!")?;
            writeln!(self.output, "1. Add task")?;
            writeln!(self.output, "2. List tasks")?;
            writeln!(self.output, "3. Complete task")?;
            writeln!(self.output, "4. Remove task")?;
            writeln!(self.output, "5. Save and exit")?;

            let Some(choice) = self.prompt("Choose an option: ")? else {
                debug!("Input closed, leaving menu without saving");
                return Ok(ShellExit::EndOfInput);
            };

            match choice.trim() {
                "1" => self.add_task()?,
                "2" => self.list_tasks()?,
                "3" => self.complete_task()?,
                "4" => self.remove_task()?,
                "5" => match self.store.save() {
                    Ok(()) => {
                        writeln!(self.output, "Tasks saved to {}", self.store.path().display())?;
                        writeln!(self.output, "Leaving the Task Manager. Goodbye!")?;
                        return Ok(ShellExit::Saved);
                    }
                    Err(e) => writeln!(self.output, "Error saving tasks: {}", e)?,
                },
                _ => writeln!(self.output, "Invalid option. Try again.")?,
            }
        }
    }

    fn add_task(&mut self) -> Result<()> {
        writeln!(self.output, "Choose the kind of task to add:")?;
        writeln!(self.output, "1. Simple")?;
        writeln!(self.output, "2. With deadline")?;
        writeln!(self.output, "3. Prioritized")?;
        let Some(kind) = self.prompt("Option: ")? else {
            return Ok(());
        };
        let kind = kind.trim().to_string();
        if !matches!(kind.as_str(), "1" | "2" | "3") {
            writeln!(self.output, "Invalid option.")?;
            return Ok(());
        }

        let Some(description) = self.prompt("Enter the task description: ")? else {
            return Ok(());
        };

        let new_task = match kind.as_str() {
            "1" => NewTask::plain(description),
            "2" => {
                let Some(due) = self.prompt("Enter the deadline (dd/mm/yyyy): ")? else {
                    return Ok(());
                };
                NewTask::deadline(description, due)
            }
            _ => {
                let label = "Enter the priority level (1-5): ";
                let Some(priority) = self.prompt_parsed::<i64>(label)? else {
                    return Ok(());
                };
                NewTask::prioritized(description, priority)
            }
        };

        let label = match &new_task {
            NewTask::Plain { .. } => "Simple",
            NewTask::Deadline { .. } => "Deadline",
            NewTask::Prioritized { .. } => "Prioritized",
        };
        match self.store.add(new_task) {
            Ok(id) => writeln!(self.output, "{} task added with ID: {}", label, id)?,
            Err(e) => writeln!(self.output, "Task not added: {}", e)?,
        }
        Ok(())
    }

    fn list_tasks(&mut self) -> Result<()> {
        if self.store.is_empty() {
            writeln!(self.output, "No tasks registered.")?;
            return Ok(());
        }
        writeln!(self.output, "\n--- Task List ---")?;
        for task in self.store.list() {
            writeln!(self.output, "{}", task)?;
        }
        writeln!(self.output, "-----------------")?;
        Ok(())
    }

    fn complete_task(&mut self) -> Result<()> {
        let label = "Enter the ID of the task to complete: ";
        let Some(id) = self.prompt_parsed::<TaskId>(label)? else {
            return Ok(());
        };
        if self.store.complete(id) {
            writeln!(self.output, "Task with ID {} marked as completed.", id)?;
        } else {
            writeln!(self.output, "Task with ID {} not found.", id)?;
        }
        Ok(())
    }

    fn remove_task(&mut self) -> Result<()> {
        let label = "Enter the ID of the task to remove: ";
        let Some(id) = self.prompt_parsed::<TaskId>(label)? else {
            return Ok(());
        };
        if self.store.remove(id).is_some() {
            writeln!(self.output, "Task with ID {} removed.", id)?;
        } else {
            writeln!(self.output, "Task with ID {} not found.", id)?;
        }
        Ok(())
    }

    /// Print `label` and read one line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    /// Like [`prompt`](Self::prompt) but parses the answer; unparsable input
    /// prints a message and yields `None`.
    fn prompt_parsed<T: FromStr>(&mut self, label: &str) -> Result<Option<T>> {
        let Some(raw) = self.prompt(label)? else {
            return Ok(None);
        };
        match raw.trim().parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                writeln!(self.output, "Invalid number: {:?}", raw.trim())?;
                Ok(None)
            }
        }
    }
}
