//! Recognized text model and card data extraction.
//!
//! The recognizer itself is external; this module only describes the shape
//! of its output and turns it into card candidates.

pub mod extract;

use serde::{Deserialize, Serialize};

pub use extract::{extract_card_data, find_digits_in_text, find_expiry_in_text, ExtractedCardData};

/// OCR output for one frame: the whole transcript plus its block/line/element tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RecognizedText {
    pub text: String,
    pub blocks: Vec<TextBlock>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TextBlock {
    pub text: String,
    pub lines: Vec<TextLine>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TextLine {
    pub text: String,
    pub elements: Vec<TextElement>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TextElement {
    pub text: String,
}

impl RecognizedText {
    /// Builds a flat result from plain segments, each becoming its own block.
    ///
    /// Handy for recognizers that only report lines.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: String::new(),
            blocks: segments
                .into_iter()
                .map(|segment| TextBlock {
                    text: segment.into(),
                    lines: Vec::new(),
                })
                .collect(),
        }
    }

    /// Flattens the tree, most aggregated first.
    ///
    /// Order: whole text, then for each block its text followed by each line's
    /// text and that line's elements. Empty texts are skipped.
    pub fn segments(&self) -> Vec<&str> {
        let mut segments = Vec::new();
        push_non_empty(&mut segments, &self.text);

        for block in &self.blocks {
            push_non_empty(&mut segments, &block.text);
            for line in &block.lines {
                push_non_empty(&mut segments, &line.text);
                for element in &line.elements {
                    push_non_empty(&mut segments, &element.text);
                }
            }
        }

        segments
    }
}

fn push_non_empty<'a>(segments: &mut Vec<&'a str>, text: &'a str) {
    if !text.is_empty() {
        segments.push(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_order_is_coarsest_first() {
        let result = RecognizedText {
            text: "full".into(),
            blocks: vec![
                TextBlock {
                    text: "block one".into(),
                    lines: vec![TextLine {
                        text: "line one".into(),
                        elements: vec![
                            TextElement { text: "line".into() },
                            TextElement { text: "one".into() },
                        ],
                    }],
                },
                TextBlock {
                    text: "block two".into(),
                    lines: Vec::new(),
                },
            ],
        };

        assert_eq!(
            result.segments(),
            vec!["full", "block one", "line one", "line", "one", "block two"]
        );
    }

    #[test]
    fn test_segments_skip_empty_text() {
        let result = RecognizedText {
            text: String::new(),
            blocks: vec![TextBlock {
                text: String::new(),
                lines: vec![TextLine {
                    text: "only line".into(),
                    elements: vec![TextElement { text: String::new() }],
                }],
            }],
        };

        assert_eq!(result.segments(), vec!["only line"]);
    }

    #[test]
    fn test_deserialize_partial_tree() {
        let json = r#"{"text":"4111","blocks":[{"text":"4111","lines":[{"text":"4111"}]}]}"#;
        let result: RecognizedText = serde_json::from_str(json).unwrap();
        assert_eq!(result.blocks[0].lines[0].elements.len(), 0);
        assert_eq!(result.segments().len(), 3);
    }
}
