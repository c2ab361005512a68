use serde::{Deserialize, Serialize};

pub const COLLECTION: &str = "files";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Branches,
    Brands,
    News,
    Promotions,
    Jobs,
    Documents,
}

impl FileCategory {
    pub const ALL: [FileCategory; 6] = [
        FileCategory::Branches,
        FileCategory::Brands,
        FileCategory::News,
        FileCategory::Promotions,
        FileCategory::Jobs,
        FileCategory::Documents,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FileCategory::Branches => "branches",
            FileCategory::Brands => "brands",
            FileCategory::News => "news",
            FileCategory::Promotions => "promotions",
            FileCategory::Jobs => "jobs",
            FileCategory::Documents => "documents",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

/// Metadata for a binary owned by the media host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: String,
    pub size: u64,
    pub content_type: String,
    pub url: String,
    pub public_id: String,
    pub resource_type: String,
    pub folder: String,
    pub category: FileCategory,
    pub uploaded_by: String,
    /// Square preview served by the media host; images only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}
