pub mod discussion;
pub mod feedback;
pub mod roster;
pub mod user;
