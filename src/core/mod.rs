// Core modules implementing the menu model, wire codec, validation, and persistence.
pub mod codec;
pub mod error;
pub mod menu;
pub mod menu_file;
pub mod validate;
