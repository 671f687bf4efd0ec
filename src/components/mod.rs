//! UI Components
//!
//! Reusable Leptos components.

mod error_banner;
mod new_task_form;
mod session_footer;
mod task_list;
mod task_row;

pub use error_banner::ErrorBanner;
pub use new_task_form::NewTaskForm;
pub use session_footer::SessionFooter;
pub use task_list::TaskList;
pub use task_row::TaskRow;
