//! Terminal front-end for the Tax Provider console

pub mod console;

pub use console::Console;
