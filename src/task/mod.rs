mod model;
pub mod codec;

pub use model::{NewTask, Priority, Task, TaskId, TaskKind};
