pub mod command;
pub mod export;
pub mod fetch;
pub mod info;
pub mod progress;
