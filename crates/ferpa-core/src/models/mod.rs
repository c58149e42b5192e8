pub mod comment;
pub mod detection;
pub mod document;
pub mod entity;
pub mod mapping;
pub mod roster;
