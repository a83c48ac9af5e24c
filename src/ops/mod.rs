pub mod capture_ops;
pub mod list_ops;
pub mod task_ops;
pub mod urgent;
