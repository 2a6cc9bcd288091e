// Models module - Database entity representations

pub mod todo;

pub use todo::Todo;
