pub mod admin;
pub mod auth;
pub mod medical_records;
pub mod notifications;
pub mod pets;
pub mod posts;
pub mod shops;
pub mod tasks;
