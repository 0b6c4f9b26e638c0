// src/notion/types.rs
//! Wire types for the Notion API: pages, property bags, blocks, rich text.
//!
//! Property values and blocks are tagged unions keyed on Notion's `type`
//! field. Unknown kinds deserialize into `Unsupported` so a workspace using
//! newer block/property types never breaks a sync run.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub code: bool,
}

/// One styled run of text. Missing sub-fields degrade to defaults rather
/// than failing the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RichTextRun {
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub annotations: Annotations,
    pub href: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateValue {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// A typed property value from a page's property bag.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichTextRun>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichTextRun>,
    },
    Select {
        select: Option<SelectOption>,
    },
    MultiSelect {
        #[serde(default)]
        multi_select: Vec<SelectOption>,
    },
    Number {
        number: Option<f64>,
    },
    Date {
        date: Option<DateValue>,
    },
    Checkbox {
        #[serde(default)]
        checkbox: bool,
    },
    Url {
        url: Option<String>,
    },
    Email {
        email: Option<String>,
    },
    PhoneNumber {
        phone_number: Option<String>,
    },
    #[serde(other)]
    Unsupported,
}

impl PropertyValue {
    /// Plain text of a title/rich-text property (first run), if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            PropertyValue::Title { title } => title.first().map(|r| r.plain_text.as_str()),
            PropertyValue::RichText { rich_text } => {
                rich_text.first().map(|r| r.plain_text.as_str())
            }
            _ => None,
        }
    }

    pub fn select_name(&self) -> Option<&str> {
        match self {
            PropertyValue::Select { select } => select.as_ref().map(|o| o.name.as_str()),
            _ => None,
        }
    }

    pub fn multi_select_names(&self) -> Vec<String> {
        match self {
            PropertyValue::MultiSelect { multi_select } => {
                multi_select.iter().map(|o| o.name.clone()).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number { number } => *number,
            _ => None,
        }
    }

    pub fn checkbox(&self) -> Option<bool> {
        match self {
            PropertyValue::Checkbox { checkbox } => Some(*checkbox),
            _ => None,
        }
    }

    pub fn date_start(&self) -> Option<&str> {
        match self {
            PropertyValue::Date { date } => {
                date.as_ref().and_then(|d| d.start.as_deref())
            }
            _ => None,
        }
    }

    /// Scalar string kinds: url, email, phone number.
    pub fn scalar_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Url { url } => url.as_deref(),
            PropertyValue::Email { email } => email.as_deref(),
            PropertyValue::PhoneNumber { phone_number } => phone_number.as_deref(),
            _ => None,
        }
    }
}

/// One page returned from a database query.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

impl Page {
    pub fn prop(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Non-empty text of a title/rich-text property. Empty text counts as
    /// absent so callers can chain defaults.
    pub fn text_value(&self, name: &str) -> Option<String> {
        self.prop(name)
            .and_then(|p| p.text())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn select_value(&self, name: &str) -> Option<String> {
        self.prop(name)
            .and_then(|p| p.select_name())
            .map(str::to_string)
    }

    pub fn multi_select_values(&self, name: &str) -> Vec<String> {
        self.prop(name)
            .map(|p| p.multi_select_names())
            .unwrap_or_default()
    }

    pub fn number_value(&self, name: &str) -> Option<f64> {
        self.prop(name).and_then(|p| p.number())
    }

    pub fn checkbox_value(&self, name: &str) -> Option<bool> {
        self.prop(name).and_then(|p| p.checkbox())
    }

    pub fn url_value(&self, name: &str) -> Option<String> {
        self.prop(name)
            .and_then(|p| p.scalar_str())
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RichTextBody {
    #[serde(default)]
    pub rich_text: Vec<RichTextRun>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodeBody {
    #[serde(default)]
    pub rich_text: Vec<RichTextRun>,
    pub language: Option<String>,
}

/// One content block of a page body. Payload fields default so a malformed
/// block degrades to empty text instead of aborting the conversion.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        #[serde(default)]
        paragraph: RichTextBody,
    },
    #[serde(rename = "heading_1")]
    Heading1 {
        #[serde(default)]
        heading_1: RichTextBody,
    },
    #[serde(rename = "heading_2")]
    Heading2 {
        #[serde(default)]
        heading_2: RichTextBody,
    },
    #[serde(rename = "heading_3")]
    Heading3 {
        #[serde(default)]
        heading_3: RichTextBody,
    },
    BulletedListItem {
        #[serde(default)]
        bulleted_list_item: RichTextBody,
    },
    NumberedListItem {
        #[serde(default)]
        numbered_list_item: RichTextBody,
    },
    Quote {
        #[serde(default)]
        quote: RichTextBody,
    },
    Code {
        #[serde(default)]
        code: CodeBody,
    },
    #[serde(other)]
    Unsupported,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_prop(v: serde_json::Value) -> PropertyValue {
        serde_json::from_value(v).expect("property json")
    }

    #[test]
    fn title_and_rich_text_take_first_run() {
        let p = parse_prop(json!({
            "type": "title",
            "title": [
                { "plain_text": "Steve Jobs", "annotations": {} },
                { "plain_text": " (draft)", "annotations": {} }
            ]
        }));
        assert_eq!(p.text(), Some("Steve Jobs"));

        let empty = parse_prop(json!({ "type": "rich_text", "rich_text": [] }));
        assert_eq!(empty.text(), None);
    }

    #[test]
    fn select_and_multi_select_expose_option_labels() {
        let sel = parse_prop(json!({ "type": "select", "select": { "name": "scientist" } }));
        assert_eq!(sel.select_name(), Some("scientist"));

        let none = parse_prop(json!({ "type": "select", "select": null }));
        assert_eq!(none.select_name(), None);

        let multi = parse_prop(json!({
            "type": "multi_select",
            "multi_select": [ { "name": "past tense" }, { "name": "idioms" } ]
        }));
        assert_eq!(multi.multi_select_names(), vec!["past tense", "idioms"]);
    }

    #[test]
    fn unknown_property_kind_becomes_unsupported() {
        let p = parse_prop(json!({ "type": "rollup", "rollup": { "number": 3 } }));
        assert!(matches!(p, PropertyValue::Unsupported));
        assert_eq!(p.text(), None);
        assert_eq!(p.number(), None);
    }

    #[test]
    fn scalar_kinds_pass_through() {
        let num = parse_prop(json!({ "type": "number", "number": 2.0 }));
        assert_eq!(num.number(), Some(2.0));

        let chk = parse_prop(json!({ "type": "checkbox", "checkbox": true }));
        assert_eq!(chk.checkbox(), Some(true));

        let url = parse_prop(json!({ "type": "url", "url": "https://example.com/a.jpg" }));
        assert_eq!(url.scalar_str(), Some("https://example.com/a.jpg"));

        let date = parse_prop(json!({ "type": "date", "date": { "start": "1955-02-24", "end": null } }));
        assert_eq!(date.date_start(), Some("1955-02-24"));
    }

    #[test]
    fn malformed_block_degrades_to_empty_body() {
        // `paragraph` payload missing entirely: body defaults to no runs.
        let b: Block = serde_json::from_value(json!({ "type": "paragraph" })).unwrap();
        match b {
            Block::Paragraph { paragraph } => assert!(paragraph.rich_text.is_empty()),
            other => panic!("unexpected block: {other:?}"),
        }
    }

    #[test]
    fn unknown_block_kind_is_unsupported() {
        let b: Block = serde_json::from_value(json!({
            "type": "child_database",
            "child_database": { "title": "x" }
        }))
        .unwrap();
        assert!(matches!(b, Block::Unsupported));
    }

    #[test]
    fn page_helpers_treat_missing_and_empty_as_absent() {
        let page: Page = serde_json::from_value(json!({
            "id": "p1",
            "properties": {
                "Title": { "type": "title", "title": [ { "plain_text": "" } ] },
                "Published": { "type": "checkbox", "checkbox": false }
            }
        }))
        .unwrap();
        assert_eq!(page.text_value("Title"), None);
        assert_eq!(page.text_value("Nope"), None);
        assert_eq!(page.checkbox_value("Published"), Some(false));
        assert!(page.multi_select_values("Grammar Tags").is_empty());
    }
}
