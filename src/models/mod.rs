pub mod feedback;
pub mod question;
