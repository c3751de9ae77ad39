pub mod error;
pub mod config;
pub mod common;

pub mod models;
pub mod requests;

// Legal-aid domain modules
pub mod case;
pub mod citizen;
pub mod lawyer;
pub mod media;

pub use error::*;
pub use config::*;
pub use common::*;
pub use models::*;
pub use requests::*;

pub use case::*;
pub use citizen::*;
pub use lawyer::*;
pub use media::*;
