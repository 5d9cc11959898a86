pub mod info;
pub mod register;
