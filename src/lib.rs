pub mod api;
pub mod cli;
pub mod config;
pub mod flows;
pub mod inventory;
pub mod logging;
pub mod mvi;
pub mod notifications;
pub mod resource;
pub mod session;
pub mod shutdown;
pub mod vial;
pub mod wizard;
