//! Task store
//!
//! Owns the ordered task list, hands out ids, and persists to a flat
//! text file through [`crate::task::codec`].

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::task::codec;
use crate::task::{NewTask, Task, TaskId};

/// File name of the task list, resolved against the working directory
pub const DEFAULT_FILE_NAME: &str = "tasks.txt";

/// Written after every record on all platforms; `\r\n` is accepted on load
const LINE_ENDING: &str = "\n";

pub struct TaskStore {
    tasks: Vec<Task>,
    /// `None` once `u32::MAX` has been used
    next_id: Option<TaskId>,
    path: PathBuf,
}

impl TaskStore {
    /// Create an empty store bound to `path`. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            tasks: Vec::new(),
            next_id: Some(TaskId::FIRST),
            path: path.into(),
        }
    }

    /// Store backed by [`DEFAULT_FILE_NAME`] inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Id the next [`add`](Self::add) will assign
    pub fn next_id(&self) -> Option<TaskId> {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in insertion order
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn find_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id() == id)
    }

    /// Append a new task and return its id.
    ///
    /// Fails only when the id space is used up; ids are never reused.
    pub fn add(&mut self, new_task: NewTask) -> Result<TaskId> {
        let id = self.next_id.ok_or(StoreError::IdsExhausted)?;
        self.next_id = id.next();

        let task = new_task.into_task(id);
        debug!("Added task {}: {}", id, task);
        self.tasks.push(task);
        Ok(id)
    }

    /// Mark the first task with `id` as completed. Returns false if absent.
    pub fn complete(&mut self, id: TaskId) -> bool {
        match self.find_mut(id) {
            Some(task) => {
                task.set_completed(true);
                debug!("Completed task {}", id);
                true
            }
            None => false,
        }
    }

    /// Remove the first task with `id`, keeping the order of the rest
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| t.id() == id)?;
        debug!("Removed task {}", id);
        Some(self.tasks.remove(pos))
    }

    /// Write all tasks to the store's file
    pub fn save(&self) -> Result<()> {
        self.save_to(&self.path)
    }

    /// Write all tasks to `path`, one line each in insertion order.
    ///
    /// Content goes to a sibling temp file first and is renamed into place,
    /// so a failed save leaves the previous file intact.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let mut content = String::new();
        for task in &self.tasks {
            warn_on_delimiter(task);
            content.push_str(&codec::encode(task));
            content.push_str(LINE_ENDING);
        }

        let tmp_path = temp_path_for(path);
        write_file(&tmp_path, content.as_bytes()).map_err(|e| StoreError::io(&tmp_path, e))?;
        if let Err(e) = fs::rename(&tmp_path, path) {
            fs::remove_file(&tmp_path).ok();
            return Err(StoreError::io(path, e));
        }

        info!("Saved {} tasks to {:?}", self.tasks.len(), path);
        Ok(())
    }

    /// Load tasks from the store's file
    pub fn load(&mut self) -> Result<usize> {
        let path = self.path.clone();
        self.load_from(&path)
    }

    /// Append every decodable line of `path` to the store.
    ///
    /// A missing file loads nothing. Lines that fail to decode are skipped.
    /// Returns the number of tasks loaded.
    pub fn load_from(&mut self, path: &Path) -> Result<usize> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No task file at {:?}, starting with an empty list", path);
                return Ok(0);
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let mut lines: Vec<&[u8]> = bytes.split(|&b| b == b'\n').collect();
        if lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        let mut loaded = 0;
        for (line_no, line) in lines.into_iter().enumerate() {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            match codec::decode_bytes(line) {
                Ok(task) => {
                    if self.next_id.is_some_and(|next| task.id() >= next) {
                        self.next_id = task.id().next();
                    }
                    self.tasks.push(task);
                    loaded += 1;
                }
                Err(e) => {
                    warn!("Skipping line {} of {:?}: {}", line_no + 1, path, e);
                }
            }
        }

        info!("Loaded {} tasks from {:?}", loaded, path);
        Ok(loaded)
    }
}

fn warn_on_delimiter(task: &Task) {
    let hazard = codec::contains_delimiter(task.description())
        || task.due().is_some_and(codec::contains_delimiter);
    if hazard {
        warn!(
            "Task {} contains '{}' and will not load back from the task file",
            task.id(),
            codec::DELIMITER
        );
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| DEFAULT_FILE_NAME.into());
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
