//! Core types and pure logic for the Taskz task manager.
//!
//! Everything in this crate is synchronous and free of I/O: the task and user
//! records exchanged with the backend, the dashboard statistics, search and
//! status filtering, and the conversion between wire instants and the local
//! minute-precision values edited in the task form.

pub mod account;
pub mod error;
pub mod filter;
pub mod form;
pub mod model;
pub mod stats;
pub mod wire_time;

pub use account::{greeting, validate_new_password};
pub use error::{FormError, ParseError};
pub use filter::{StatusFilter, filter_tasks};
pub use form::{LOCAL_INPUT_FORMAT, TaskForm, from_local_input, to_local_input};
pub use model::{NewTask, NewUser, Priority, Role, Task, TaskPatch, TaskStatus, User};
pub use stats::{TaskStats, compute_stats, compute_stats_now};
