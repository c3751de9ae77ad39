pub mod case;
pub mod citizen;
pub mod evidence;
pub mod group;
pub mod lawyer;
pub mod specialization;
pub mod user;
