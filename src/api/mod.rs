use serde::{Deserialize, Serialize};

pub mod search;

#[derive(Serialize, Clone, Debug)]
pub struct SearchRequest {
    pub query_text: String,
    /// Data URL or bare base64; empty when no image is attached.
    pub image_base64: String,
}

/// Product as returned by the search service. Most fields are optional on
/// the wire; `brand` doubles as the shop name.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct SearchProduct {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub shop: Option<String>,
    #[serde(default)]
    pub price: Option<serde_json::Value>,
    #[serde(default, rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub products: Option<Vec<SearchProduct>>,
    #[serde(default)]
    pub detected_styles: Option<Vec<String>>,
}
