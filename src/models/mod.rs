pub mod administrators;
pub mod appointments;
pub mod availabilities;
pub mod departments;
pub mod faculty;
pub mod logins;
pub mod students;
