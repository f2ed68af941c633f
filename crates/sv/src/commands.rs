pub mod compare;
pub mod matches;
pub mod validate;
