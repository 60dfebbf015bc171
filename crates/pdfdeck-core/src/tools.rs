//! Catalog of the tools this library implements.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PdfDeckError;

/// Tool grouping used in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCategory {
    Organization,
    Editing,
    Ai,
}

impl ToolCategory {
    pub fn title(self) -> &'static str {
        match self {
            ToolCategory::Organization => "Organization",
            ToolCategory::Editing => "Editing",
            ToolCategory::Ai => "AI",
        }
    }
}

/// Every tool the library implements, identified by its slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    MergePdf,
    SplitPdf,
    RemovePages,
    ExtractPages,
    OrganizePages,
    RotatePdf,
    AddPageNumbers,
    AddWatermark,
    ChatWithPdf,
    SummarizePdf,
    TranslatePdf,
    GenerateQuestions,
}

impl ToolKind {
    /// Catalog order: organization, editing, then AI tools.
    pub const ALL: [ToolKind; 12] = [
        ToolKind::MergePdf,
        ToolKind::SplitPdf,
        ToolKind::RemovePages,
        ToolKind::ExtractPages,
        ToolKind::OrganizePages,
        ToolKind::RotatePdf,
        ToolKind::AddPageNumbers,
        ToolKind::AddWatermark,
        ToolKind::ChatWithPdf,
        ToolKind::SummarizePdf,
        ToolKind::TranslatePdf,
        ToolKind::GenerateQuestions,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            ToolKind::MergePdf => "merge-pdf",
            ToolKind::SplitPdf => "split-pdf",
            ToolKind::RemovePages => "remove-pages",
            ToolKind::ExtractPages => "extract-pages",
            ToolKind::OrganizePages => "organize-pages",
            ToolKind::RotatePdf => "rotate-pdf",
            ToolKind::AddPageNumbers => "add-page-numbers",
            ToolKind::AddWatermark => "add-watermark",
            ToolKind::ChatWithPdf => "chat-with-pdf",
            ToolKind::SummarizePdf => "summarize-pdf",
            ToolKind::TranslatePdf => "translate-pdf",
            ToolKind::GenerateQuestions => "generate-questions",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::MergePdf => "Merge PDF",
            ToolKind::SplitPdf => "Split PDF",
            ToolKind::RemovePages => "Remove Pages",
            ToolKind::ExtractPages => "Extract Pages",
            ToolKind::OrganizePages => "Organize Pages",
            ToolKind::RotatePdf => "Rotate PDF",
            ToolKind::AddPageNumbers => "Add Page Numbers",
            ToolKind::AddWatermark => "Add Watermark",
            ToolKind::ChatWithPdf => "Chat with PDF",
            ToolKind::SummarizePdf => "Summarize PDF",
            ToolKind::TranslatePdf => "Translate PDF",
            ToolKind::GenerateQuestions => "Generate Questions",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::MergePdf => "Combine multiple PDF files into a single document",
            ToolKind::SplitPdf => "Split a PDF into multiple documents",
            ToolKind::RemovePages => "Delete specific pages from a PDF document",
            ToolKind::ExtractPages => "Extract specific pages from a PDF document",
            ToolKind::OrganizePages => "Rearrange, rotate, and delete pages within a PDF",
            ToolKind::RotatePdf => "Rotate pages in a PDF document",
            ToolKind::AddPageNumbers => "Add page numbers to a PDF document",
            ToolKind::AddWatermark => "Add text or image watermarks to a PDF",
            ToolKind::ChatWithPdf => "Ask questions about your PDF content",
            ToolKind::SummarizePdf => "Generate concise summaries of PDF documents",
            ToolKind::TranslatePdf => "Translate PDF content to different languages",
            ToolKind::GenerateQuestions => "Generate questions based on PDF content",
        }
    }

    pub fn category(self) -> ToolCategory {
        match self {
            ToolKind::MergePdf
            | ToolKind::SplitPdf
            | ToolKind::RemovePages
            | ToolKind::ExtractPages
            | ToolKind::OrganizePages => ToolCategory::Organization,
            ToolKind::RotatePdf | ToolKind::AddPageNumbers | ToolKind::AddWatermark => {
                ToolCategory::Editing
            }
            ToolKind::ChatWithPdf
            | ToolKind::SummarizePdf
            | ToolKind::TranslatePdf
            | ToolKind::GenerateQuestions => ToolCategory::Ai,
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ToolKind {
    type Err = PdfDeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .iter()
            .copied()
            .find(|tool| tool.slug() == s.trim())
            .ok_or_else(|| {
                PdfDeckError::ValidationError(format!("Unknown tool: {}", s.trim()))
            })
    }
}
