pub mod creator;
