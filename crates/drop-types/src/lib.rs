//! Shared types and pure-logic utilities for the drop site.
//! Zero service dependency — usable from the web service and from tests.

mod collection;
mod error;
mod image;

pub use collection::{AssetPointer, Collection, Creator, ImageRef, Slug};
pub use error::ImageRefError;
pub use image::resolve_image_url;
