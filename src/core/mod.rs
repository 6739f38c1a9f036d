pub mod driver;
pub mod relocator;
pub mod selector;
