//! Block kind registry.
//!
//! Two closed families of kinds exist: those compiled to Python and those
//! rendered as Markdown. Every [`BlockKind`] belongs to at most one family;
//! kinds in neither are reported as unsupported by the compilers.
//!
//! The registry also exposes a deterministic catalog of supported kinds so
//! front ends can list them without compiling anything.

use serde::Serialize;

use deepnote_core::model::BlockKind;

/// Kinds compiled to Python source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeKind {
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
    Visualization,
    Button,
    BigNumber,
}

/// Kinds rendered as Markdown (or inline HTML).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkupKind {
    Markdown,
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    Bullet,
    Todo,
    Callout,
    Separator,
    Image,
}

impl MarkupKind {
    /// Text cells support prefix stripping; markdown, separator and image do not.
    pub fn is_text_cell(&self) -> bool {
        matches!(
            self,
            Self::Paragraph
                | Self::Heading1
                | Self::Heading2
                | Self::Heading3
                | Self::Bullet
                | Self::Todo
                | Self::Callout
        )
    }
}

/// Which compiler family handles a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Code(CodeKind),
    Markup(MarkupKind),
    Unsupported,
}

impl Family {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code(_) => "python",
            Self::Markup(_) => "markdown",
            Self::Unsupported => "unsupported",
        }
    }
}

/// Map a block kind to its compiler family. Total over all kinds.
pub fn classify(kind: &BlockKind) -> Family {
    match kind {
        BlockKind::Code => Family::Code(CodeKind::Code),
        BlockKind::Sql => Family::Code(CodeKind::Sql),
        BlockKind::InputText => Family::Code(CodeKind::InputText),
        BlockKind::InputTextarea => Family::Code(CodeKind::InputTextarea),
        BlockKind::InputCheckbox => Family::Code(CodeKind::InputCheckbox),
        BlockKind::InputSelect => Family::Code(CodeKind::InputSelect),
        BlockKind::InputSlider => Family::Code(CodeKind::InputSlider),
        BlockKind::InputFile => Family::Code(CodeKind::InputFile),
        BlockKind::InputDate => Family::Code(CodeKind::InputDate),
        BlockKind::InputDateRange => Family::Code(CodeKind::InputDateRange),
        BlockKind::Visualization => Family::Code(CodeKind::Visualization),
        BlockKind::Button => Family::Code(CodeKind::Button),
        BlockKind::BigNumber => Family::Code(CodeKind::BigNumber),
        BlockKind::Markdown => Family::Markup(MarkupKind::Markdown),
        BlockKind::TextCellP => Family::Markup(MarkupKind::Paragraph),
        BlockKind::TextCellH1 => Family::Markup(MarkupKind::Heading1),
        BlockKind::TextCellH2 => Family::Markup(MarkupKind::Heading2),
        BlockKind::TextCellH3 => Family::Markup(MarkupKind::Heading3),
        BlockKind::TextCellBullet => Family::Markup(MarkupKind::Bullet),
        BlockKind::TextCellTodo => Family::Markup(MarkupKind::Todo),
        BlockKind::TextCellCallout => Family::Markup(MarkupKind::Callout),
        BlockKind::Separator => Family::Markup(MarkupKind::Separator),
        BlockKind::Image => Family::Markup(MarkupKind::Image),
        BlockKind::Other(_) => Family::Unsupported,
    }
}

/// Catalog entry for one supported kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindSpec {
    pub kind: String,
    pub family: &'static str,
    /// Whether `strip_markdown` applies.
    pub strippable: bool,
    pub description: &'static str,
}

/// Deterministic catalog of every supported kind, in [`BlockKind::KNOWN`] order.
pub fn catalog() -> Vec<KindSpec> {
    BlockKind::KNOWN
        .iter()
        .filter_map(|kind| {
            let family = classify(kind);
            if family == Family::Unsupported {
                return None;
            }
            Some(KindSpec {
                kind: kind.as_str().to_string(),
                family: family.as_str(),
                strippable: matches!(family, Family::Markup(m) if m.is_text_cell()),
                description: describe(kind),
            })
        })
        .collect()
}

fn describe(kind: &BlockKind) -> &'static str {
    match kind {
        BlockKind::Code => "source code with dataframe display preamble",
        BlockKind::Sql => "SQL query executed against an integration",
        BlockKind::InputText => "single-line text variable",
        BlockKind::InputTextarea => "multi-line text variable",
        BlockKind::InputCheckbox => "boolean variable",
        BlockKind::InputSelect => "single or multiple choice variable",
        BlockKind::InputSlider => "numeric variable",
        BlockKind::InputFile => "uploaded file path variable",
        BlockKind::InputDate => "date variable",
        BlockKind::InputDateRange => "absolute or relative date range variable",
        BlockKind::Button => "run trigger or boolean variable",
        BlockKind::Visualization => "chart over a dataframe variable",
        BlockKind::BigNumber => "KPI value with optional comparison",
        BlockKind::Markdown => "raw markdown",
        BlockKind::TextCellP => "paragraph",
        BlockKind::TextCellH1 => "heading level 1",
        BlockKind::TextCellH2 => "heading level 2",
        BlockKind::TextCellH3 => "heading level 3",
        BlockKind::TextCellBullet => "bullet list item",
        BlockKind::TextCellTodo => "checklist item",
        BlockKind::TextCellCallout => "callout",
        BlockKind::Separator => "horizontal rule",
        BlockKind::Image => "image",
        BlockKind::Other(_) => "",
    }
}
