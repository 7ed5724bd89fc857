#![warn(clippy::all, rust_2018_idioms)]

mod app;
pub mod catalog;
pub mod config;
pub mod design;
pub mod error;
pub mod export;
pub mod layout;
pub mod length;
pub mod pricing;

pub use app::FrameDesignerApp;
pub use error::{FrameError, Result};
pub use layout::{compute_preview_layout, LayoutRequest, LayoutResult, MatBorders, SizePx};
