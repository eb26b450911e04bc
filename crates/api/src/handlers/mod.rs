pub mod discussions;
pub mod feedback;
pub mod users;
