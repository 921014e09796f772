pub mod impl_console;
pub mod impl_noop;
pub mod interface;
