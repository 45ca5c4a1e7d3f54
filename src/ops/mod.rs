pub mod backend;
pub mod chat;
pub mod compose;
pub mod event_ops;
pub mod inbox_ops;
pub mod task_ops;
