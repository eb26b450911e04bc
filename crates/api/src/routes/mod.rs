pub mod discussions;
pub mod feedback;
pub mod health;
pub mod users;
