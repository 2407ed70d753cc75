pub mod todo;
pub mod user;

pub use todo::{EditTodoRequest, Todo};
pub use user::{Credentials, Database, UserRecord};
