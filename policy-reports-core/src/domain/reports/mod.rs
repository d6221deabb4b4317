//! Policy report domain

pub mod entities;
pub mod errors;
pub mod gateway;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use gateway::*;
pub use value_objects::*;
