//! Configuration validation

mod dispatch_validators;
mod trait_def;


pub use trait_def::Validate;
