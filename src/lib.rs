pub mod error;
pub mod shell;
pub mod store;
pub mod task;

pub use error::{DecodeError, StoreError};
pub use shell::{Shell, ShellExit};
pub use store::{TaskStore, DEFAULT_FILE_NAME};
pub use task::{NewTask, Priority, Task, TaskId, TaskKind};
