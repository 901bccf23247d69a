// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod accommodation;
pub mod booking;
pub mod catalog;
pub mod experience;
pub mod favorite;
pub mod package;
pub mod restaurant;
pub mod testimonial;
pub mod user;
pub mod vehicle;

pub use accommodation::*;
pub use booking::*;
pub use catalog::*;
pub use experience::*;
pub use favorite::*;
pub use package::*;
pub use restaurant::*;
pub use testimonial::*;
pub use user::*;
pub use vehicle::*;
