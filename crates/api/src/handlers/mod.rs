pub mod campaign;
pub mod character;
pub mod persona;
