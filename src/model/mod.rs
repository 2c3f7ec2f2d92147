//! # Document Model
//!
//! The input representation for the layout engine: a form document made of
//! pages, each page a [`Group`] of rows. A row holds elements side by side,
//! and an element is either a nested panel (another `Group`) or a content
//! [`Item`] such as a question.
//!
//! The model is read-only to the engine. Text arrives already localized;
//! visibility flags are consumed as given.

use serde::{Deserialize, Serialize};

/// A complete document ready for layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,

    /// Render the document title/description header.
    #[serde(default = "default_true")]
    pub show_title: bool,

    /// Render page and panel titles/descriptions.
    #[serde(default = "default_true")]
    pub show_page_titles: bool,

    /// Prefix item titles with their number.
    #[serde(default = "default_true")]
    pub show_question_numbers: bool,

    /// Optional logo placed around the document title.
    #[serde(default)]
    pub logo: Option<Logo>,

    #[serde(default)]
    pub pages: Vec<Group>,

    /// Paper size and margins.
    #[serde(default)]
    pub page: PageConfig,

    /// Base font size in points.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            show_title: true,
            show_page_titles: true,
            show_question_numbers: true,
            logo: None,
            pages: Vec::new(),
            page: PageConfig::default(),
            font_size: default_font_size(),
        }
    }
}

impl Document {
    /// Pages that take part in layout.
    pub fn visible_pages(&self) -> impl Iterator<Item = &Group> {
        self.pages.iter().filter(|p| p.visible)
    }
}

fn default_true() -> bool {
    true
}

fn default_font_size() -> f64 {
    14.0
}

/// Logo image shown next to, above or below the document title.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Logo {
    /// Image source handed to the backend untouched.
    pub src: String,
    #[serde(default)]
    pub position: LogoPosition,
    /// Width in CSS pixels.
    #[serde(default = "default_logo_size")]
    pub width: f64,
    /// Height in CSS pixels.
    #[serde(default = "default_logo_size")]
    pub height: f64,
}

fn default_logo_size() -> f64 {
    100.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogoPosition {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

/// Configuration for the paper: size and margins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Page size. Defaults to A4.
    #[serde(default = "PageSize::default")]
    pub size: PageSize,

    /// Page margins in points (1/72 inch).
    #[serde(default = "default_margin")]
    pub margin: Edges,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            margin: default_margin(),
        }
    }
}

fn default_margin() -> Edges {
    Edges::uniform(54.0) // ~0.75 inch
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Tabloid => (792.0, 1224.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Edge values (top, right, bottom, left).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

/// A page or a nested panel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Extra left indent for the panel's content, in unit glyph widths.
    #[serde(default)]
    pub inner_indent: u32,
    #[serde(default)]
    pub rows: Vec<Row>,
    /// Render width specifier when the group sits inside a row.
    #[serde(default)]
    pub width: String,
}

impl Group {
    pub fn new(name: &str, rows: Vec<Row>) -> Self {
        Self {
            name: name.to_string(),
            visible: true,
            rows,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

/// One horizontal band of elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Row {
    pub fn new(elements: Vec<Element>) -> Self {
        Self {
            visible: true,
            elements,
        }
    }

    /// Elements that take part in layout, in left-to-right order.
    pub fn visible_elements(&self) -> Vec<&Element> {
        self.elements.iter().filter(|e| e.is_visible()).collect()
    }
}

/// A row member: a nested panel or a leaf content item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Element {
    Panel(Group),
    Question(Item),
}

impl Element {
    pub fn is_visible(&self) -> bool {
        match self {
            Element::Panel(group) => group.visible,
            Element::Question(item) => item.visible,
        }
    }

    /// The render width specifier ("", "auto", "40%", "1/3", "120pt").
    pub fn render_width(&self) -> &str {
        match self {
            Element::Panel(group) => &group.width,
            Element::Question(item) => &item.width,
        }
    }
}

/// Where an item's title and description go relative to its body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TitleLocation {
    #[default]
    Default,
    Top,
    Bottom,
    Left,
    Hidden,
}

/// A leaf content node laid out by the item engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Display number, e.g. "3".
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Left indent in unit glyph widths.
    #[serde(default)]
    pub indent: u32,
    #[serde(default)]
    pub title_location: TitleLocation,
    /// Render width specifier.
    #[serde(default)]
    pub width: String,
    /// Label of the optional free-text elaboration field under the body.
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub body: ItemBody,
}

impl Item {
    pub fn new(name: &str, title: &str, body: ItemBody) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            visible: true,
            body,
            ..Default::default()
        }
    }
}

/// The closed set of item kinds. Each knows how to lay out its body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ItemBody {
    /// Single-line text input.
    #[default]
    Text,
    /// Multi-line text input.
    Comment {
        #[serde(default = "default_comment_rows")]
        rows: u32,
    },
    /// Checkbox (multiple) or radio (single) choice list.
    #[serde(rename_all = "camelCase")]
    Choice {
        #[serde(default)]
        choices: Vec<String>,
        #[serde(default)]
        multiple: bool,
        #[serde(default)]
        has_other: bool,
        #[serde(default = "default_other_text")]
        other_text: String,
    },
    /// Static text.
    Html { text: String },
    /// Nothing but the title.
    Empty,
}

fn default_comment_rows() -> u32 {
    4
}

fn default_other_text() -> String {
    "Other (describe)".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_document_uses_defaults() {
        let doc: Document = serde_json::from_str(r#"{ "pages": [] }"#).unwrap();
        assert!(doc.show_title);
        assert!(doc.show_page_titles);
        assert_eq!(doc.font_size, 14.0);
        assert_eq!(doc.page.margin, Edges::uniform(54.0));
    }

    #[test]
    fn elements_are_tagged() {
        let json = r#"{
            "pages": [{
                "name": "p1",
                "rows": [{
                    "elements": [
                        { "type": "question", "name": "q1", "title": "Name",
                          "titleLocation": "left", "body": { "kind": "text" } },
                        { "type": "panel", "name": "pn", "innerIndent": 2, "visible": false,
                          "rows": [] },
                        { "type": "question", "name": "q2",
                          "body": { "kind": "choice", "choices": ["a", "b"], "hasOther": true } }
                    ]
                }]
            }]
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        let row = &doc.pages[0].rows[0];
        assert_eq!(row.elements.len(), 3);
        assert_eq!(row.visible_elements().len(), 2);
        match &row.elements[0] {
            Element::Question(item) => {
                assert_eq!(item.title_location, TitleLocation::Left);
                assert!(matches!(item.body, ItemBody::Text));
            }
            other => panic!("expected question, got {:?}", other),
        }
        match &row.elements[2] {
            Element::Question(Item {
                body: ItemBody::Choice { has_other, other_text, .. },
                ..
            }) => {
                assert!(*has_other);
                assert_eq!(other_text, "Other (describe)");
            }
            other => panic!("expected choice, got {:?}", other),
        }
    }
}
