//! Sections and the contents they hold.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ContentId, SectionId, Timestamp, ValidationError};

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_BODY_LENGTH: usize = 20_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentKind {
    Text,
    Link,
    File,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Text => "TEXT",
            ContentKind::Link => "LINK",
            ContentKind::File => "FILE",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TEXT" => Ok(ContentKind::Text),
            "LINK" => Ok(ContentKind::Link),
            "FILE" => Ok(ContentKind::File),
            other => Err(ValidationError::invalid_format(
                "kind",
                format!("unknown content kind '{}'", other),
            )),
        }
    }
}

/// A piece of course material.
///
/// `visible_from` in the future keeps the content hidden until the
/// visibility job publishes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub id: ContentId,
    pub title: String,
    pub kind: ContentKind,
    pub body: String,
    pub visible: bool,
    pub visible_from: Option<Timestamp>,
}

impl Content {
    /// Whether the content is hidden but scheduled at or before `now`.
    pub fn is_due(&self, now: &Timestamp) -> bool {
        !self.visible && self.visible_from.map_or(false, |from| !from.is_after(now))
    }
}

/// Validated input for a new content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContent {
    title: String,
    kind: ContentKind,
    body: String,
    visible_from: Option<Timestamp>,
}

impl NewContent {
    pub fn new(
        title: &str,
        kind: ContentKind,
        body: &str,
        visible_from: Option<Timestamp>,
    ) -> Result<Self, ValidationError> {
        let title = validate_title(title)?;
        let len = body.chars().count();
        if len > MAX_BODY_LENGTH {
            return Err(ValidationError::out_of_range(
                "body",
                0,
                MAX_BODY_LENGTH as i64,
                len as i64,
            ));
        }
        if kind == ContentKind::Link && !(body.starts_with("http://") || body.starts_with("https://")) {
            return Err(ValidationError::invalid_format("body", "link must be an http(s) URL"));
        }
        Ok(Self {
            title,
            kind,
            body: body.to_string(),
            visible_from,
        })
    }

    /// Materialises the content; it starts hidden only when scheduled after `now`.
    pub fn into_content(self, now: &Timestamp) -> Content {
        let visible = self.visible_from.map_or(true, |from| !from.is_after(now));
        Content {
            id: ContentId::new(),
            title: self.title,
            kind: self.kind,
            body: self.body,
            visible,
            visible_from: self.visible_from,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    pub contents: Vec<Content>,
}

impl Section {
    pub fn new(title: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: SectionId::new(),
            title: validate_title(title)?,
            contents: Vec::new(),
        })
    }
}

pub(crate) fn validate_title(title: &str) -> Result<String, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::empty_field("title"));
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LENGTH {
        return Err(ValidationError::out_of_range(
            "title",
            1,
            MAX_TITLE_LENGTH as i64,
            len as i64,
        ));
    }
    Ok(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unscheduled_content_starts_visible() {
        let now = Timestamp::now();
        let content = NewContent::new("Intro", ContentKind::Text, "Welcome", None)
            .unwrap()
            .into_content(&now);
        assert!(content.visible);
        assert!(!content.is_due(&now));
    }

    #[test]
    fn future_content_starts_hidden_and_becomes_due() {
        let now = Timestamp::now();
        let later = now.plus_secs(3600);
        let content = NewContent::new("Exam", ContentKind::File, "exam.pdf", Some(later))
            .unwrap()
            .into_content(&now);
        assert!(!content.visible);
        assert!(!content.is_due(&now));
        assert!(content.is_due(&later));
    }

    #[test]
    fn past_schedule_is_visible_immediately() {
        let now = Timestamp::now();
        let content = NewContent::new("Notes", ContentKind::Text, "", Some(now.minus_secs(10)))
            .unwrap()
            .into_content(&now);
        assert!(content.visible);
    }

    #[test]
    fn link_body_must_be_a_url() {
        assert!(NewContent::new("Docs", ContentKind::Link, "not a url", None).is_err());
        assert!(NewContent::new("Docs", ContentKind::Link, "https://docs.rs", None).is_ok());
    }

    #[test]
    fn blank_section_title_is_rejected() {
        assert_eq!(
            Section::new("   ").unwrap_err(),
            ValidationError::empty_field("title")
        );
    }

    #[test]
    fn content_kind_round_trips_through_str() {
        for kind in [ContentKind::Text, ContentKind::Link, ContentKind::File] {
            assert_eq!(kind.as_str().parse::<ContentKind>().unwrap(), kind);
        }
        assert!("VIDEO".parse::<ContentKind>().is_err());
    }
}
