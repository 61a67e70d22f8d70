//! Block kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The `type` tag of a block.
///
/// Unknown tags are kept verbatim in [`BlockKind::Other`] so documents written
/// by newer editors still load.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockKind {
    Code,
    Sql,
    InputText,
    InputTextarea,
    InputCheckbox,
    InputSelect,
    InputSlider,
    InputFile,
    InputDate,
    InputDateRange,
    Button,
    Visualization,
    BigNumber,
    Image,
    Markdown,
    TextCellP,
    TextCellH1,
    TextCellH2,
    TextCellH3,
    TextCellBullet,
    TextCellTodo,
    TextCellCallout,
    Separator,
    Other(String),
}

impl BlockKind {
    /// Every known kind, in catalog order.
    pub const KNOWN: &'static [BlockKind] = &[
        BlockKind::Code,
        BlockKind::Sql,
        BlockKind::InputText,
        BlockKind::InputTextarea,
        BlockKind::InputCheckbox,
        BlockKind::InputSelect,
        BlockKind::InputSlider,
        BlockKind::InputFile,
        BlockKind::InputDate,
        BlockKind::InputDateRange,
        BlockKind::Button,
        BlockKind::Visualization,
        BlockKind::BigNumber,
        BlockKind::Image,
        BlockKind::Markdown,
        BlockKind::TextCellP,
        BlockKind::TextCellH1,
        BlockKind::TextCellH2,
        BlockKind::TextCellH3,
        BlockKind::TextCellBullet,
        BlockKind::TextCellTodo,
        BlockKind::TextCellCallout,
        BlockKind::Separator,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Code => "code",
            Self::Sql => "sql",
            Self::InputText => "input-text",
            Self::InputTextarea => "input-textarea",
            Self::InputCheckbox => "input-checkbox",
            Self::InputSelect => "input-select",
            Self::InputSlider => "input-slider",
            Self::InputFile => "input-file",
            Self::InputDate => "input-date",
            Self::InputDateRange => "input-date-range",
            Self::Button => "button",
            Self::Visualization => "visualization",
            Self::BigNumber => "big-number",
            Self::Image => "image",
            Self::Markdown => "markdown",
            Self::TextCellP => "text-cell-p",
            Self::TextCellH1 => "text-cell-h1",
            Self::TextCellH2 => "text-cell-h2",
            Self::TextCellH3 => "text-cell-h3",
            Self::TextCellBullet => "text-cell-bullet",
            Self::TextCellTodo => "text-cell-todo",
            Self::TextCellCallout => "text-cell-callout",
            Self::Separator => "separator",
            Self::Other(s) => s.as_str(),
        }
    }

    /// Parse a `type` tag. Never fails.
    pub fn parse(s: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|k| k.as_str() == s)
            .cloned()
            .unwrap_or_else(|| Self::Other(s.to_string()))
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Self::InputText
                | Self::InputTextarea
                | Self::InputCheckbox
                | Self::InputSelect
                | Self::InputSlider
                | Self::InputFile
                | Self::InputDate
                | Self::InputDateRange
        )
    }

    pub fn is_text_cell(&self) -> bool {
        matches!(
            self,
            Self::TextCellP
                | Self::TextCellH1
                | Self::TextCellH2
                | Self::TextCellH3
                | Self::TextCellBullet
                | Self::TextCellTodo
                | Self::TextCellCallout
        )
    }
}

impl From<String> for BlockKind {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<BlockKind> for String {
    fn from(k: BlockKind) -> Self {
        k.as_str().to_string()
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
