//! Line-oriented text format for tasks
//!
//! One task per line, fields joined by `;`:
//!
//! ```text
//! SIMPLE;1;Buy milk;0
//! DEADLINE;2;File taxes;0;15/04/2025
//! PRIORITIZED;3;Fix bug;1;5
//! 4;Legacy task;1
//! ```
//!
//! Free-text fields are written verbatim. A `;` inside a description or due
//! text shifts the field count and the record will not decode.

use crate::error::DecodeError;
use super::model::{Priority, Task, TaskId, TaskKind};

pub const DELIMITER: &str = ";";

pub const SIMPLE_TAG: &str = "SIMPLE";
pub const DEADLINE_TAG: &str = "DEADLINE";
pub const PRIORITIZED_TAG: &str = "PRIORITIZED";

type Decoder = fn(&[&str]) -> Result<Task, DecodeError>;

/// Tagged record decoders, keyed by the leading token
const DECODERS: &[(&str, Decoder)] = &[
    (SIMPLE_TAG, decode_plain),
    (DEADLINE_TAG, decode_deadline),
    (PRIORITIZED_TAG, decode_prioritized),
];

/// Leading tag for a kind; the legacy base shape has none
pub fn tag(kind: &TaskKind) -> Option<&'static str> {
    match kind {
        TaskKind::Base => None,
        TaskKind::Plain => Some(SIMPLE_TAG),
        TaskKind::Deadline { .. } => Some(DEADLINE_TAG),
        TaskKind::Prioritized { .. } => Some(PRIORITIZED_TAG),
    }
}

/// True if `text` would break the record it is written into
pub fn contains_delimiter(text: &str) -> bool {
    text.contains(DELIMITER)
}

/// Encode a task as a single line (without terminator)
pub fn encode(task: &Task) -> String {
    let mut fields: Vec<String> = Vec::with_capacity(5);

    if let Some(tag) = tag(task.kind()) {
        fields.push(tag.to_string());
    }
    fields.push(task.id().to_string());
    fields.push(task.description().to_string());
    fields.push(if task.completed() { "1" } else { "0" }.to_string());

    match task.kind() {
        TaskKind::Deadline { due } => fields.push(due.clone()),
        TaskKind::Prioritized { priority } => fields.push(priority.to_string()),
        TaskKind::Base | TaskKind::Plain => {}
    }

    fields.join(DELIMITER)
}

/// Decode one line. Unknown leading tokens fall back to the untagged base shape.
pub fn decode(line: &str) -> Result<Task, DecodeError> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();

    match DECODERS.iter().find(|(tag, _)| fields.first() == Some(tag)) {
        Some((_, decoder)) => decoder(&fields),
        None => decode_base(&fields),
    }
}

/// Decode one raw line, rejecting bytes that are not UTF-8
pub fn decode_bytes(line: &[u8]) -> Result<Task, DecodeError> {
    decode(std::str::from_utf8(line)?)
}

fn decode_base(fields: &[&str]) -> Result<Task, DecodeError> {
    expect_fields("untagged", fields, 3)?;
    let (id, description, completed) = common_fields(&fields[0..3])?;
    Ok(Task::new(id, description, TaskKind::Base).with_completed(completed))
}

fn decode_plain(fields: &[&str]) -> Result<Task, DecodeError> {
    expect_fields(SIMPLE_TAG, fields, 4)?;
    let (id, description, completed) = common_fields(&fields[1..4])?;
    Ok(Task::new(id, description, TaskKind::Plain).with_completed(completed))
}

fn decode_deadline(fields: &[&str]) -> Result<Task, DecodeError> {
    expect_fields(DEADLINE_TAG, fields, 5)?;
    let (id, description, completed) = common_fields(&fields[1..4])?;
    let kind = TaskKind::Deadline {
        due: fields[4].to_string(),
    };
    Ok(Task::new(id, description, kind).with_completed(completed))
}

fn decode_prioritized(fields: &[&str]) -> Result<Task, DecodeError> {
    expect_fields(PRIORITIZED_TAG, fields, 5)?;
    let (id, description, completed) = common_fields(&fields[1..4])?;
    let raw: i64 = fields[4]
        .parse()
        .map_err(|_| DecodeError::InvalidPriority(fields[4].to_string()))?;
    let kind = TaskKind::Prioritized {
        priority: Priority::clamped(raw),
    };
    Ok(Task::new(id, description, kind).with_completed(completed))
}

fn expect_fields(kind: &'static str, fields: &[&str], expected: usize) -> Result<(), DecodeError> {
    if fields.len() == expected {
        Ok(())
    } else {
        Err(DecodeError::FieldCount {
            kind,
            expected,
            found: fields.len(),
        })
    }
}

/// `[id, description, completed]`
fn common_fields<'a>(fields: &[&'a str]) -> Result<(TaskId, &'a str, bool), DecodeError> {
    let id: TaskId = fields[0].parse()?;
    Ok((id, fields[1], fields[2] == "1"))
}
