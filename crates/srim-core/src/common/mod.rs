pub mod constants;
pub mod layout;
pub mod text;
