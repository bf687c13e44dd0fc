//! Page templates: typed view models over the `templates/` directory.

use crate::config::Config;
use crate::error::Error;
use askama::Template;
use drop_types::{resolve_image_url, Collection};

/// Listing page: one card per collection.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub cards: Vec<CollectionCard>,
}

pub struct CollectionCard {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
}

impl CollectionCard {
    pub fn from_collection(config: &Config, c: &Collection) -> Result<Self, Error> {
        Ok(Self {
            slug: c.slug.current.clone(),
            title: c.title.clone(),
            description: c.description.clone(),
            image_url: image_url(config, &c.main_image.asset.reference)?,
        })
    }
}

/// Drop detail page with the mint control.
#[derive(Template)]
#[template(path = "drop.html")]
pub struct DropPage {
    pub title: String,
    pub collection_name: String,
    pub description: String,
    pub slug: String,
    pub creator_name: String,
    pub main_image_url: String,
    pub preview_image_url: String,
}

impl DropPage {
    pub fn from_collection(config: &Config, c: &Collection) -> Result<Self, Error> {
        Ok(Self {
            title: c.title.clone(),
            collection_name: c.collection_name.clone(),
            description: c.description.clone(),
            slug: c.slug.current.clone(),
            creator_name: c.creator.name.clone(),
            main_image_url: image_url(config, &c.main_image.asset.reference)?,
            preview_image_url: image_url(config, &c.preview_image.asset.reference)?,
        })
    }
}

/// Rendered error page (404, 502).
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub status: u16,
    pub message: String,
}

fn image_url(config: &Config, reference: &str) -> Result<String, Error> {
    resolve_image_url(&config.content_project, &config.content_dataset, reference)
        .map_err(|e| Error::Content(e.to_string()))
}
