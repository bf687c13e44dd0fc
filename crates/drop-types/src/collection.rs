//! Content-store projection models.
//!
//! Field names follow the store's document schema; the projection issued by
//! the site is fixed, so these structs are the full read surface.

use serde::{Deserialize, Serialize};

/// One NFT drop collection, maintained externally in the content store.
/// Read-only from the site's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    /// On-chain drop contract address.
    pub address: String,
    #[serde(rename = "nftCollectionName")]
    pub collection_name: String,
    #[serde(rename = "mainImage")]
    pub main_image: ImageRef,
    #[serde(rename = "previewImage")]
    pub preview_image: ImageRef,
    pub slug: Slug,
    pub creator: Creator,
}

/// Collection creator, embedded by reference inside [`Collection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub address: String,
    pub slug: Slug,
}

/// URL-safe identifier wrapper (`{"current": "…"}` in the store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    pub current: String,
}

/// An image field as projected: just the asset pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub asset: AssetPointer,
}

/// Opaque asset reference, e.g. `image-abc123-2000x1000-png`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPointer {
    #[serde(rename = "_ref")]
    pub reference: String,
}
