pub mod property;
pub mod scenarios;
