pub mod add;
pub mod edit;
pub mod expand;
pub mod list;
pub mod mood;
pub mod note;
pub mod schedule;
pub mod week;
