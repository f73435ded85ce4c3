pub mod task;
pub mod user;

pub use task::{Task, TaskCreate, TaskPatch, TaskReplace};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, User, UserResponse};
