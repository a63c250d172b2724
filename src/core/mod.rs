pub mod ailog;
pub mod api;
pub mod cards;
pub mod terminal;
pub mod watch;
