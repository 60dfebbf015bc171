//! Validated option records for the page-set operations.
//!
//! Every operation takes one of these records. `validate()` enforces the
//! structural rules at the API boundary so the engines can assume well-formed
//! input; bounds against a concrete document are checked by the operations
//! themselves. Page numbers are 1-based everywhere.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PdfDeckError;

/// Inclusive 1-based page range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn new(start: u32, end: u32) -> Self {
        PageRange { start, end }
    }

    pub fn validate(&self) -> Result<(), PdfDeckError> {
        if self.start == 0 {
            return Err(PdfDeckError::ValidationError(
                "Page numbers must be >= 1".into(),
            ));
        }
        if self.start > self.end {
            return Err(PdfDeckError::ValidationError(format!(
                "Start {} > end {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// Page numbers covered by the range, in order.
    pub fn pages(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }

    pub fn count(&self) -> u32 {
        self.end - self.start + 1
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for PageRange {
    type Err = PdfDeckError;

    /// Parses `"3-5"` or a single page `"7"` (meaning `7-7`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let range = match s.split_once('-') {
            Some((start, end)) => {
                let start = start.trim().parse::<u32>().map_err(|_| {
                    PdfDeckError::ValidationError(format!("Invalid start: {}", start.trim()))
                })?;
                let end = end.trim().parse::<u32>().map_err(|_| {
                    PdfDeckError::ValidationError(format!("Invalid end: {}", end.trim()))
                })?;
                PageRange::new(start, end)
            }
            None => {
                let page = s.parse::<u32>().map_err(|_| {
                    PdfDeckError::ValidationError(format!("Invalid page: {}", s))
                })?;
                PageRange::new(page, page)
            }
        };
        range.validate()?;
        Ok(range)
    }
}

/// Which pages an operation applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSelection {
    /// Every page of the document.
    All,
    /// An explicit 1-based list, in the given order.
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Resolve to concrete page numbers against a document with
    /// `page_count` pages. Explicit lists keep their order and any repeats.
    pub fn resolve(&self, page_count: u32) -> Result<Vec<u32>, PdfDeckError> {
        match self {
            PageSelection::All => Ok((1..=page_count).collect()),
            PageSelection::Pages(pages) => {
                crate::pages::validate_page_numbers(pages, page_count)?;
                Ok(pages.clone())
            }
        }
    }
}

impl FromStr for PageSelection {
    type Err = PdfDeckError;

    /// Parses `"all"` or a page list like `"1-3, 5, 8-10"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(PageSelection::All)
        } else {
            Ok(PageSelection::Pages(crate::pages::parse_page_list(s)?))
        }
    }
}

/// Page rotation in degrees.
///
/// `R0` exists for organize's rotation map; `RotateOptions` rejects it, so a
/// standalone rotation is always 90, 180, or 270.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum RotationAngle {
    R0,
    R90,
    R180,
    R270,
}

impl RotationAngle {
    pub fn degrees(self) -> i64 {
        match self {
            RotationAngle::R0 => 0,
            RotationAngle::R90 => 90,
            RotationAngle::R180 => 180,
            RotationAngle::R270 => 270,
        }
    }
}

impl From<RotationAngle> for u32 {
    fn from(angle: RotationAngle) -> u32 {
        angle.degrees() as u32
    }
}

impl TryFrom<u32> for RotationAngle {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RotationAngle::R0),
            90 => Ok(RotationAngle::R90),
            180 => Ok(RotationAngle::R180),
            270 => Ok(RotationAngle::R270),
            other => Err(format!(
                "Invalid rotation: {} (must be 0, 90, 180, or 270)",
                other
            )),
        }
    }
}

impl FromStr for RotationAngle {
    type Err = PdfDeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s.trim().parse().map_err(|_| {
            PdfDeckError::ValidationError(format!("Invalid rotation: {}", s.trim()))
        })?;
        RotationAngle::try_from(value).map_err(PdfDeckError::ValidationError)
    }
}

/// Anchor for page-number labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumberPosition {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl FromStr for NumberPosition {
    type Err = PdfDeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "top-left" => Ok(NumberPosition::TopLeft),
            "top-center" => Ok(NumberPosition::TopCenter),
            "top-right" => Ok(NumberPosition::TopRight),
            "bottom-left" => Ok(NumberPosition::BottomLeft),
            "bottom-center" => Ok(NumberPosition::BottomCenter),
            "bottom-right" => Ok(NumberPosition::BottomRight),
            other => Err(PdfDeckError::ValidationError(format!(
                "Invalid position: {} (expected top-left, top-center, top-right, bottom-left, bottom-center, or bottom-right)",
                other
            ))),
        }
    }
}

/// Placement for watermarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl FromStr for WatermarkPosition {
    type Err = PdfDeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "center" => Ok(WatermarkPosition::Center),
            "top-left" => Ok(WatermarkPosition::TopLeft),
            "top-right" => Ok(WatermarkPosition::TopRight),
            "bottom-left" => Ok(WatermarkPosition::BottomLeft),
            "bottom-right" => Ok(WatermarkPosition::BottomRight),
            other => Err(PdfDeckError::ValidationError(format!(
                "Invalid position: {} (expected center, top-left, top-right, bottom-left, or bottom-right)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOptions {
    pub output_file_name: String,
}

impl MergeOptions {
    pub fn validate(&self) -> Result<(), PdfDeckError> {
        if self.output_file_name.is_empty() {
            return Err(PdfDeckError::ValidationError(
                "Output file name required".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitOptions {
    pub ranges: Vec<PageRange>,
    /// One output name per range, in range order.
    pub output_file_names: Vec<String>,
}

impl SplitOptions {
    pub fn validate(&self) -> Result<(), PdfDeckError> {
        if self.ranges.is_empty() {
            return Err(PdfDeckError::ValidationError("No ranges specified".into()));
        }
        if self.output_file_names.len() != self.ranges.len() {
            return Err(PdfDeckError::ValidationError(format!(
                "One output name per range required (got {} names for {} ranges)",
                self.output_file_names.len(),
                self.ranges.len()
            )));
        }
        for range in &self.ranges {
            range.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOptions {
    /// Pages to copy, in output order. Repeats are allowed.
    pub pages: Vec<u32>,
    pub output_file_name: String,
}

impl ExtractOptions {
    pub fn validate(&self) -> Result<(), PdfDeckError> {
        if self.pages.is_empty() {
            return Err(PdfDeckError::ValidationError("No pages specified".into()));
        }
        if self.output_file_name.is_empty() {
            return Err(PdfDeckError::ValidationError(
                "Output file name required".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveOptions {
    pub pages: Vec<u32>,
    pub output_file_name: String,
}

impl RemoveOptions {
    pub fn validate(&self) -> Result<(), PdfDeckError> {
        if self.pages.is_empty() {
            return Err(PdfDeckError::ValidationError("No pages specified".into()));
        }
        if self.output_file_name.is_empty() {
            return Err(PdfDeckError::ValidationError(
                "Output file name required".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizeOptions {
    /// New page sequence; entries may repeat or omit original pages.
    pub page_order: Vec<u32>,
    /// Rotation per original page number, applied to the copied pages.
    /// Pages absent from the map keep their rotation.
    #[serde(default)]
    pub rotations: BTreeMap<u32, RotationAngle>,
    pub output_file_name: String,
}

impl OrganizeOptions {
    pub fn validate(&self) -> Result<(), PdfDeckError> {
        if self.page_order.is_empty() {
            return Err(PdfDeckError::ValidationError(
                "No page order specified".into(),
            ));
        }
        if self.output_file_name.is_empty() {
            return Err(PdfDeckError::ValidationError(
                "Output file name required".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotateOptions {
    pub pages: Vec<u32>,
    pub degrees: RotationAngle,
    pub output_file_name: String,
}

impl RotateOptions {
    pub fn validate(&self) -> Result<(), PdfDeckError> {
        if self.pages.is_empty() {
            return Err(PdfDeckError::ValidationError("No pages specified".into()));
        }
        if self.degrees == RotationAngle::R0 {
            return Err(PdfDeckError::ValidationError(
                "Rotation must be 90, 180, or 270 degrees".into(),
            ));
        }
        if self.output_file_name.is_empty() {
            return Err(PdfDeckError::ValidationError(
                "Output file name required".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageNumberOptions {
    pub position: NumberPosition,
    /// Number assigned to the first page.
    pub start_number: u32,
    /// Label template; `{n}` is the page number, `{total}` the page count.
    pub format: String,
    pub output_file_name: String,
}

impl PageNumberOptions {
    pub fn validate(&self) -> Result<(), PdfDeckError> {
        if self.format.is_empty() {
            return Err(PdfDeckError::ValidationError(
                "Page number format must not be empty".into(),
            ));
        }
        if self.output_file_name.is_empty() {
            return Err(PdfDeckError::ValidationError(
                "Output file name required".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatermarkOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,
    /// 0 (invisible) to 1 (opaque).
    pub opacity: f64,
    pub position: WatermarkPosition,
    /// Counter-clockwise rotation in degrees about the draw origin.
    pub rotation: f64,
    pub pages: PageSelection,
    pub output_file_name: String,
}

impl WatermarkOptions {
    pub fn validate(&self) -> Result<(), PdfDeckError> {
        match (&self.text, &self.image_path) {
            (None, None) => {
                return Err(PdfDeckError::ValidationError(
                    "Watermark requires text or an image".into(),
                ));
            }
            (Some(_), Some(_)) => {
                return Err(PdfDeckError::ValidationError(
                    "Provide either watermark text or an image, not both".into(),
                ));
            }
            (Some(text), None) if text.is_empty() => {
                return Err(PdfDeckError::ValidationError(
                    "Watermark text must not be empty".into(),
                ));
            }
            _ => {}
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(PdfDeckError::ValidationError(format!(
                "Opacity must be between 0 and 1 (got {})",
                self.opacity
            )));
        }
        if !self.rotation.is_finite() {
            return Err(PdfDeckError::ValidationError(
                "Rotation must be a finite angle".into(),
            ));
        }
        if let PageSelection::Pages(pages) = &self.pages {
            if pages.is_empty() {
                return Err(PdfDeckError::ValidationError("No pages specified".into()));
            }
        }
        if self.output_file_name.is_empty() {
            return Err(PdfDeckError::ValidationError(
                "Output file name required".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_range_parses_span_and_single() {
        assert_eq!("3-5".parse::<PageRange>().unwrap(), PageRange::new(3, 5));
        assert_eq!(" 7 ".parse::<PageRange>().unwrap(), PageRange::new(7, 7));
    }

    #[test]
    fn test_page_range_rejects_zero_and_inverted() {
        assert!("0-2".parse::<PageRange>().is_err());
        assert!("5-3".parse::<PageRange>().is_err());
        assert!("x-3".parse::<PageRange>().is_err());
    }

    #[test]
    fn test_page_range_display() {
        assert_eq!(PageRange::new(3, 5).to_string(), "3-5");
        assert_eq!(PageRange::new(7, 7).to_string(), "7");
    }

    #[test]
    fn test_selection_parses_all_and_lists() {
        assert_eq!("all".parse::<PageSelection>().unwrap(), PageSelection::All);
        assert_eq!("ALL".parse::<PageSelection>().unwrap(), PageSelection::All);
        assert_eq!(
            "1-3, 5".parse::<PageSelection>().unwrap(),
            PageSelection::Pages(vec![1, 2, 3, 5])
        );
    }

    #[test]
    fn test_selection_resolves_all() {
        let pages = PageSelection::All.resolve(4).unwrap();
        assert_eq!(pages, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_selection_rejects_out_of_range() {
        let selection = PageSelection::Pages(vec![1, 9]);
        assert!(selection.resolve(4).is_err());
    }

    #[test]
    fn test_rotation_angle_from_number() {
        assert_eq!(RotationAngle::try_from(180).unwrap(), RotationAngle::R180);
        assert!(RotationAngle::try_from(45).is_err());
    }

    #[test]
    fn test_rotation_angle_serializes_as_number() {
        assert_eq!(serde_json::to_string(&RotationAngle::R90).unwrap(), "90");
        let parsed: RotationAngle = serde_json::from_str("270").unwrap();
        assert_eq!(parsed, RotationAngle::R270);
    }

    #[test]
    fn test_positions_use_kebab_case() {
        assert_eq!(
            serde_json::to_string(&NumberPosition::BottomCenter).unwrap(),
            "\"bottom-center\""
        );
        assert_eq!(
            "top-right".parse::<NumberPosition>().unwrap(),
            NumberPosition::TopRight
        );
        assert_eq!(
            "center".parse::<WatermarkPosition>().unwrap(),
            WatermarkPosition::Center
        );
        assert!("middle".parse::<WatermarkPosition>().is_err());
    }

    #[test]
    fn test_split_options_require_matching_names() {
        let options = SplitOptions {
            ranges: vec![PageRange::new(1, 2), PageRange::new(3, 4)],
            output_file_names: vec!["only-one".into()],
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_rotate_options_reject_zero_degrees() {
        let options = RotateOptions {
            pages: vec![1],
            degrees: RotationAngle::R0,
            output_file_name: "rotated".into(),
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_watermark_options_validate_sources() {
        let base = WatermarkOptions {
            text: None,
            image_path: None,
            opacity: 0.5,
            position: WatermarkPosition::Center,
            rotation: 0.0,
            pages: PageSelection::All,
            output_file_name: "watermarked".into(),
        };
        assert!(base.validate().is_err());

        let both = WatermarkOptions {
            text: Some("DRAFT".into()),
            image_path: Some("logo.png".into()),
            ..base.clone()
        };
        assert!(both.validate().is_err());

        let text_only = WatermarkOptions {
            text: Some("DRAFT".into()),
            ..base
        };
        assert!(text_only.validate().is_ok());
    }

    #[test]
    fn test_watermark_options_validate_opacity() {
        let options = WatermarkOptions {
            text: Some("DRAFT".into()),
            image_path: None,
            opacity: 1.5,
            position: WatermarkPosition::Center,
            rotation: 0.0,
            pages: PageSelection::All,
            output_file_name: "watermarked".into(),
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_options_serialize_camel_case() {
        let options = PageNumberOptions {
            position: NumberPosition::BottomCenter,
            start_number: 1,
            format: "Page {n} of {total}".into(),
            output_file_name: "numbered".into(),
        };
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains("\"startNumber\":1"));
        assert!(json.contains("\"outputFileName\":\"numbered\""));
    }
}
