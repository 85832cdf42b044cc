pub mod help;
pub mod setup;
pub mod staff;
