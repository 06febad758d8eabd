pub mod api;
pub mod board;
pub mod cli;
pub mod config;
pub mod filter;
pub mod layout;
pub mod model;
pub mod storage;

pub use board::{BoardController, BoardEvent, ErrorDialog};
pub use config::{ClientConfig, ConfigLoader, ConfigPaths};
pub use layout::{BoardLayout, LayoutRect};
pub use model::{BoardScope, Note};
