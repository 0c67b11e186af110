//! Configuration module

mod blog;

pub use blog::BlogConfig;
pub use blog::ErrorPolicy;
