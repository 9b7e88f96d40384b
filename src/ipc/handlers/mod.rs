pub mod attendance;
pub mod core;
pub mod hod;
pub mod session;
pub mod student;
pub mod teacher;
