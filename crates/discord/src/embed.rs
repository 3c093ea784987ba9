//! Embed description as submitted by the operator and the webhook payload
//! built from it.

use serde::{Deserialize, Serialize};

/// Named colors accepted in [`EmbedSpec::color`].
pub const PALETTE: &[(&str, u32)] = &[
    ("red", 0xED4245),
    ("green", 0x57F287),
    ("blue", 0x5865F2),
    ("yellow", 0xFEE75C),
    ("purple", 0xEB459E),
    ("orange", 0xF26522),
];

/// Palette "blue", used when the color is absent or unrecognized.
pub const DEFAULT_COLOR: u32 = 0x5865F2;

/// Placeholder for the empty side of a name/value field (zero-width space).
const EMPTY_FIELD: &str = "\u{200b}";

/// Resolve a palette name or `#RRGGBB` literal to an integer color.
pub fn resolve_color(color: Option<&str>) -> u32 {
    let Some(color) = color.map(str::trim).filter(|c| !c.is_empty()) else {
        return DEFAULT_COLOR;
    };
    if let Some(hex) = color.strip_prefix('#') {
        return u32::from_str_radix(hex, 16)
            .ok()
            .filter(|v| hex.len() <= 6 && *v <= 0xFF_FFFF)
            .unwrap_or(DEFAULT_COLOR);
    }
    PALETTE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(color))
        .map_or(DEFAULT_COLOR, |(_, value)| *value)
}

/// One outgoing message, as composed by the operator.
///
/// Blank strings are treated exactly like missing values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmbedSpec {
    pub author_name: Option<String>,
    pub author_icon: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub field_name: Option<String>,
    pub field_value: Option<String>,
    pub embed_image: Option<String>,
    pub footer_text: Option<String>,
    pub footer_icon: Option<String>,
    pub color: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl EmbedSpec {
    /// At least one content-bearing attribute is set. Icons and color alone
    /// do not count.
    pub fn has_content(&self) -> bool {
        [
            &self.author_name,
            &self.title,
            &self.description,
            &self.field_name,
            &self.field_value,
            &self.footer_text,
            &self.embed_image,
        ]
        .into_iter()
        .any(|v| present(v).is_some())
    }

    /// Build the wire embed. Sub-objects appear only when their source data
    /// is present.
    pub fn to_embed(&self) -> Embed {
        let author_name = present(&self.author_name);
        let author_icon = present(&self.author_icon);
        let author = (author_name.is_some() || author_icon.is_some()).then(|| EmbedAuthor {
            name: author_name.map(String::from),
            icon_url: author_icon.map(String::from),
        });

        let field_name = present(&self.field_name);
        let field_value = present(&self.field_value);
        let fields = if field_name.is_some() || field_value.is_some() {
            vec![EmbedField {
                name: field_name.unwrap_or(EMPTY_FIELD).to_string(),
                value: field_value.unwrap_or(EMPTY_FIELD).to_string(),
            }]
        } else {
            Vec::new()
        };

        let footer_text = present(&self.footer_text);
        let footer_icon = present(&self.footer_icon);
        let footer = (footer_text.is_some() || footer_icon.is_some()).then(|| EmbedFooter {
            text: footer_text.map(String::from),
            icon_url: footer_icon.map(String::from),
        });

        Embed {
            color: resolve_color(self.color.as_deref()),
            author,
            title: present(&self.title).map(String::from),
            description: present(&self.description).map(String::from),
            fields,
            image: present(&self.embed_image).map(|url| EmbedImage {
                url: url.to_string(),
            }),
            footer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedAuthor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedImage {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Body of an execute-webhook request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub embeds: Vec<Embed>,
}

impl WebhookPayload {
    pub fn new(username: String, avatar_url: Option<String>, embed: Embed) -> Self {
        Self {
            username,
            avatar_url,
            embeds: vec![embed],
        }
    }
}
