pub mod medical_record;
pub mod pet;
pub mod post;
pub mod shop;
pub mod task;
pub mod user;
