//! Categories and the storefront's business profile.

use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Category identifier.
    #[serde(rename = "_id", alias = "id")]
    pub id: CategoryId,
    /// Parent category (None for top-level categories).
    #[serde(default, alias = "parentId")]
    pub parent_id: Option<CategoryId>,
    /// Display name.
    pub name: String,
    /// Category image URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            name: name.into(),
            image_url: None,
        }
    }

    /// Create a subcategory under `parent`.
    pub fn child_of(parent: &Category, id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            parent_id: Some(parent.id.clone()),
            ..Self::new(id, name)
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Ways a shopper can reach the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Phone,
    WhatsApp,
    Facebook,
    Instagram,
    Email,
    Website,
}

impl ChannelKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ChannelKind::Phone => "Phone",
            ChannelKind::WhatsApp => "WhatsApp",
            ChannelKind::Facebook => "Facebook",
            ChannelKind::Instagram => "Instagram",
            ChannelKind::Email => "Email",
            ChannelKind::Website => "Website",
        }
    }
}

/// One contact channel, e.g. a WhatsApp chat link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactChannel {
    pub kind: ChannelKind,
    /// Link or number for the channel.
    pub target: String,
}

/// Branding and contact details supplied by the business profile API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BusinessProfile {
    /// Business name.
    #[serde(default)]
    pub name: String,
    /// Logo URL.
    #[serde(default, alias = "logo")]
    pub logo_url: Option<String>,
    /// Contact channels in display order.
    #[serde(default)]
    pub channels: Vec<ContactChannel>,
}

impl BusinessProfile {
    /// First channel of the given kind.
    pub fn channel(&self, kind: ChannelKind) -> Option<&ContactChannel> {
        self.channels.iter().find(|c| c.kind == kind)
    }
}
