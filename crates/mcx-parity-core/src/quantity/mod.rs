pub mod converter;
pub mod profiles;
pub mod sheet;
