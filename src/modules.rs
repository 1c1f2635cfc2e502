//! Module Model - Tagged Content Blocks
//!
//! A stacker document is an ordered list of modules. Each module carries a
//! stable id and a `type` tag selecting which fields are valid.

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

pub type ModuleId = String;

/// Generate a fresh module id.
pub fn new_module_id() -> ModuleId {
    Uuid::new_v4().to_string()
}

/// Serialized as one flat object: `id`, `type`, then the variant's fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub id: ModuleId,
    pub content: ModuleContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ModuleContent {
    LogoChip {
        logo: ImageRef,
        #[serde(default)]
        label: Option<String>,
    },
    Header {
        heading: String,
        #[serde(default)]
        heading_size: HeadingSize,
        #[serde(default)]
        subheader: Option<String>,
        #[serde(default)]
        cta: Option<Cta>,
    },
    Paragraph {
        #[serde(default)]
        heading: Option<String>,
        body: String,
    },
    ThreeBullets {
        #[serde(default)]
        heading: Option<String>,
        bullets: [String; 3],
    },
    ImageSquare(ImageBlock),
    ImageWide(ImageBlock),
    Divider {
        #[serde(default)]
        style: DividerStyle,
    },
    SimpleCards {
        cards: Vec<Card>,
    },
    ImageCards {
        cards: Vec<ImageCard>,
    },
    Quote {
        quote: String,
        #[serde(default)]
        attribution: Option<String>,
    },
    ThreeStats {
        stats: [Stat; 3],
    },
    OneStat {
        stat: Stat,
        #[serde(default)]
        body: Option<String>,
    },
    Footer {
        text: String,
        #[serde(default)]
        legal: Option<String>,
    },
    /// A tag this engine does not know (newer or corrupted data). Its
    /// fields are carried through untouched so saving never loses them.
    #[serde(skip)]
    Unknown {
        tag: String,
        fields: Map<String, Value>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DividerStyle {
    #[default]
    Line,
    Space,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cta {
    pub label: String,
    pub url: String,
}

/// Reference to an uploaded image plus its framing inside the module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    #[serde(default)]
    pub src: String,
    #[serde(default = "default_pan")]
    pub pan_x: f32,
    #[serde(default = "default_pan")]
    pub pan_y: f32,
    #[serde(default = "default_zoom")]
    pub zoom: f32,
    #[serde(default)]
    pub grayscale: bool,
}

fn default_pan() -> f32 { 50.0 }
fn default_zoom() -> f32 { 1.0 }

impl Default for ImageRef {
    fn default() -> Self {
        Self {
            src: String::new(),
            pan_x: default_pan(),
            pan_y: default_pan(),
            zoom: default_zoom(),
            grayscale: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    #[serde(default)]
    pub image: ImageRef,
    #[serde(default)]
    pub eyebrow: Option<String>,
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub cta: Option<Cta>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageCard {
    #[serde(default)]
    pub image: ImageRef,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

/// The discriminant of a module, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleKind {
    LogoChip,
    Header,
    Paragraph,
    ThreeBullets,
    ImageSquare,
    ImageWide,
    Divider,
    SimpleCards,
    ImageCards,
    Quote,
    ThreeStats,
    OneStat,
    Footer,
}

impl ModuleKind {
    /// Structural kinds: created once with the document, never sortable.
    pub const LOCKED: [ModuleKind; 3] = [ModuleKind::LogoChip, ModuleKind::Header, ModuleKind::Footer];

    pub fn is_locked(self) -> bool {
        Self::LOCKED.contains(&self)
    }

    /// Wire tag, as used in the `type` field.
    pub fn tag(self) -> &'static str {
        match self {
            ModuleKind::LogoChip => "logo-chip",
            ModuleKind::Header => "header",
            ModuleKind::Paragraph => "paragraph",
            ModuleKind::ThreeBullets => "three-bullets",
            ModuleKind::ImageSquare => "image-square",
            ModuleKind::ImageWide => "image-wide",
            ModuleKind::Divider => "divider",
            ModuleKind::SimpleCards => "simple-cards",
            ModuleKind::ImageCards => "image-cards",
            ModuleKind::Quote => "quote",
            ModuleKind::ThreeStats => "three-stats",
            ModuleKind::OneStat => "one-stat",
            ModuleKind::Footer => "footer",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        const ALL: [ModuleKind; 13] = [
            ModuleKind::LogoChip,
            ModuleKind::Header,
            ModuleKind::Paragraph,
            ModuleKind::ThreeBullets,
            ModuleKind::ImageSquare,
            ModuleKind::ImageWide,
            ModuleKind::Divider,
            ModuleKind::SimpleCards,
            ModuleKind::ImageCards,
            ModuleKind::Quote,
            ModuleKind::ThreeStats,
            ModuleKind::OneStat,
            ModuleKind::Footer,
        ];
        ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// Empty payload a freshly added module of this kind starts with.
    pub fn default_content(self) -> ModuleContent {
        match self {
            ModuleKind::LogoChip => ModuleContent::LogoChip {
                logo: ImageRef::default(),
                label: None,
            },
            ModuleKind::Header => ModuleContent::Header {
                heading: String::new(),
                heading_size: HeadingSize::default(),
                subheader: None,
                cta: None,
            },
            ModuleKind::Paragraph => ModuleContent::Paragraph {
                heading: None,
                body: String::new(),
            },
            ModuleKind::ThreeBullets => ModuleContent::ThreeBullets {
                heading: None,
                bullets: Default::default(),
            },
            ModuleKind::ImageSquare => ModuleContent::ImageSquare(ImageBlock::default()),
            ModuleKind::ImageWide => ModuleContent::ImageWide(ImageBlock::default()),
            ModuleKind::Divider => ModuleContent::Divider {
                style: DividerStyle::default(),
            },
            ModuleKind::SimpleCards => ModuleContent::SimpleCards {
                cards: vec![Card::default(); 3],
            },
            ModuleKind::ImageCards => ModuleContent::ImageCards {
                cards: vec![ImageCard::default(); 3],
            },
            ModuleKind::Quote => ModuleContent::Quote {
                quote: String::new(),
                attribution: None,
            },
            ModuleKind::ThreeStats => ModuleContent::ThreeStats {
                stats: Default::default(),
            },
            ModuleKind::OneStat => ModuleContent::OneStat {
                stat: Stat::default(),
                body: None,
            },
            ModuleKind::Footer => ModuleContent::Footer {
                text: String::new(),
                legal: None,
            },
        }
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl ModuleContent {
    /// `None` for unknown tags.
    pub fn kind(&self) -> Option<ModuleKind> {
        let kind = match self {
            ModuleContent::LogoChip { .. } => ModuleKind::LogoChip,
            ModuleContent::Header { .. } => ModuleKind::Header,
            ModuleContent::Paragraph { .. } => ModuleKind::Paragraph,
            ModuleContent::ThreeBullets { .. } => ModuleKind::ThreeBullets,
            ModuleContent::ImageSquare(_) => ModuleKind::ImageSquare,
            ModuleContent::ImageWide(_) => ModuleKind::ImageWide,
            ModuleContent::Divider { .. } => ModuleKind::Divider,
            ModuleContent::SimpleCards { .. } => ModuleKind::SimpleCards,
            ModuleContent::ImageCards { .. } => ModuleKind::ImageCards,
            ModuleContent::Quote { .. } => ModuleKind::Quote,
            ModuleContent::ThreeStats { .. } => ModuleKind::ThreeStats,
            ModuleContent::OneStat { .. } => ModuleKind::OneStat,
            ModuleContent::Footer { .. } => ModuleKind::Footer,
            ModuleContent::Unknown { .. } => return None,
        };
        Some(kind)
    }
}

impl Module {
    /// New module of `kind` with default fields and a fresh id.
    pub fn new(kind: ModuleKind) -> Self {
        Self {
            id: new_module_id(),
            content: kind.default_content(),
        }
    }

    pub fn with_content(id: impl Into<ModuleId>, content: ModuleContent) -> Self {
        Self { id: id.into(), content }
    }

    pub fn kind(&self) -> Option<ModuleKind> {
        self.content.kind()
    }

    pub fn is_locked(&self) -> bool {
        self.kind().is_some_and(ModuleKind::is_locked)
    }
}

impl Serialize for Module {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut object = match &self.content {
            ModuleContent::Unknown { tag, fields } => {
                let mut object = fields.clone();
                object.insert("type".to_string(), Value::String(tag.clone()));
                object
            }
            known => match serde_json::to_value(known).map_err(S::Error::custom)? {
                Value::Object(object) => object,
                other => return Err(S::Error::custom(format!("module content is not an object: {other}"))),
            },
        };
        object.insert("id".to_string(), Value::String(self.id.clone()));
        object.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Module {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut object = Map::<String, Value>::deserialize(deserializer)?;
        let id = match object.remove("id") {
            Some(Value::String(id)) => id,
            Some(_) => return Err(D::Error::custom("module id must be a string")),
            None => return Err(D::Error::missing_field("id")),
        };
        let tag = match object.get("type") {
            Some(Value::String(tag)) => tag.clone(),
            Some(_) => return Err(D::Error::custom("module type must be a string")),
            None => return Err(D::Error::missing_field("type")),
        };

        let content = if ModuleKind::from_tag(&tag).is_some() {
            ModuleContent::deserialize(Value::Object(object)).map_err(D::Error::custom)?
        } else {
            tracing::debug!(%id, %tag, "keeping module of unknown type");
            object.remove("type");
            ModuleContent::Unknown { tag, fields: object }
        };
        Ok(Self { id, content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_module_wire_shape() {
        let module = Module::with_content(
            "m1",
            ModuleContent::Header {
                heading: "Hello".into(),
                heading_size: HeadingSize::Large,
                subheader: None,
                cta: None,
            },
        );
        let value = serde_json::to_value(&module).unwrap();
        assert_eq!(value["id"], "m1");
        assert_eq!(value["type"], "header");
        assert_eq!(value["headingSize"], "large");
    }

    #[test]
    fn test_unknown_type_is_preserved_as_unknown() {
        let module: Module = serde_json::from_value(json!({
            "id": "x",
            "type": "hologram",
            "depth": 3
        }))
        .unwrap();
        assert_eq!(module.id, "x");
        assert_eq!(module.kind(), None);
        assert!(!module.is_locked());
        match &module.content {
            ModuleContent::Unknown { tag, fields } => {
                assert_eq!(tag, "hologram");
                assert_eq!(fields.get("depth"), Some(&json!(3)));
            }
            other => panic!("unexpected content {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_writes_back_unchanged() {
        let raw = json!({"id": "x", "type": "video", "src": "clip.mp4", "loop": true});
        let module: Module = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&module).unwrap(), raw);
    }

    #[test]
    fn test_missing_id_is_an_error() {
        let result = serde_json::from_value::<Module>(json!({"type": "quote", "quote": "hi"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_known_type_round_trips() {
        let module = Module::new(ModuleKind::ImageCards);
        let back: Module = serde_json::from_value(serde_json::to_value(&module).unwrap()).unwrap();
        assert_eq!(back, module);
    }

    #[test]
    fn test_image_defaults_fill_in() {
        let module: Module = serde_json::from_value(json!({
            "id": "img",
            "type": "image-wide",
            "image": { "src": "hero.png" }
        }))
        .unwrap();
        match module.content {
            ModuleContent::ImageWide(block) => {
                assert_eq!(block.image.src, "hero.png");
                assert_eq!(block.image.zoom, 1.0);
                assert!(!block.image.grayscale);
            }
            other => panic!("unexpected content {other:?}"),
        }
    }

    #[test]
    fn test_locked_kinds() {
        assert!(ModuleKind::Header.is_locked());
        assert!(ModuleKind::Footer.is_locked());
        assert!(ModuleKind::LogoChip.is_locked());
        assert!(!ModuleKind::Quote.is_locked());
    }

    #[test]
    fn test_tag_matches_serde() {
        for kind in [ModuleKind::ThreeBullets, ModuleKind::OneStat, ModuleKind::LogoChip] {
            let module = Module::new(kind);
            let value = serde_json::to_value(&module).unwrap();
            assert_eq!(value["type"], kind.tag());
            assert_eq!(ModuleKind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn test_new_modules_get_distinct_ids() {
        let a = Module::new(ModuleKind::Quote);
        let b = Module::new(ModuleKind::Quote);
        assert_ne!(a.id, b.id);
    }
}
