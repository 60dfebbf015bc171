//! Page-number helpers and the page-copy engine.
//!
//! Public page numbers are 1-based. Outputs are built by "construction by
//! whitelist": clone the source document, rewrite the page tree to exactly
//! the requested pages in the requested order, then prune everything that is
//! no longer referenced.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use lopdf::{Document, Object, ObjectId};

use crate::error::PdfDeckError;
use crate::options::PageRange;

/// Check that every number identifies a page of a `page_count`-page document.
pub fn validate_page_numbers(pages: &[u32], page_count: u32) -> Result<(), PdfDeckError> {
    if pages.contains(&0) {
        return Err(PdfDeckError::ValidationError(
            "Page numbers must be >= 1".into(),
        ));
    }
    for &page in pages {
        if page > page_count {
            return Err(PdfDeckError::ValidationError(format!(
                "Page {} does not exist (document has {} pages)",
                page, page_count
            )));
        }
    }
    Ok(())
}

/// Pages that survive removing `removed`, in original order.
pub fn complement(removed: &[u32], page_count: u32) -> Vec<u32> {
    let removed: HashSet<u32> = removed.iter().copied().collect();
    (1..=page_count).filter(|p| !removed.contains(p)).collect()
}

/// Parse a page list like `"1-3, 5, 8-10"` into sorted unique page numbers.
pub fn parse_page_list(input: &str) -> Result<Vec<u32>, PdfDeckError> {
    if input.trim().is_empty() {
        return Err(PdfDeckError::ValidationError("No pages specified".into()));
    }
    let mut pages = BTreeSet::new();
    for segment in input.split(',') {
        let range: PageRange = segment.parse()?;
        pages.extend(range.pages());
    }
    Ok(pages.into_iter().collect())
}

/// Incremental builder for a document made of copied pages.
///
/// Pages are pushed one at a time (so callers can report per-page progress
/// and rotate individual copies); `finish` rewrites the page tree and prunes
/// everything the new tree no longer references.
pub struct PageCopier {
    doc: Document,
    page_map: BTreeMap<u32, ObjectId>,
    used: HashSet<ObjectId>,
    kids: Vec<ObjectId>,
}

impl PageCopier {
    pub fn new(source: &Document) -> Self {
        PageCopier {
            doc: source.clone(),
            page_map: source.get_pages(),
            used: HashSet::new(),
            kids: Vec::new(),
        }
    }

    pub fn page_count(&self) -> u32 {
        self.page_map.len() as u32
    }

    /// Append source page `number` to the output sequence.
    ///
    /// A number pushed more than once gets a duplicated page dictionary;
    /// contents and resources stay shared references.
    pub fn push(&mut self, number: u32) -> Result<(), PdfDeckError> {
        validate_page_numbers(&[number], self.page_count())?;
        let page_id = self.page_map.get(&number).copied().ok_or_else(|| {
            PdfDeckError::OperationError(format!("Page {} not found in page tree", number))
        })?;
        if self.used.insert(page_id) {
            self.kids.push(page_id);
        } else {
            let dict = self
                .doc
                .get_object(page_id)
                .and_then(|o| o.as_dict())
                .map_err(|e| {
                    PdfDeckError::OperationError(format!("Invalid page object: {}", e))
                })?
                .clone();
            let dup_id = self.doc.add_object(Object::Dictionary(dict));
            self.kids.push(dup_id);
        }
        Ok(())
    }

    /// Set the absolute `/Rotate` value on the most recently pushed page.
    pub fn rotate_last(&mut self, degrees: i64) -> Result<(), PdfDeckError> {
        let page_id = self
            .kids
            .last()
            .copied()
            .ok_or_else(|| PdfDeckError::OperationError("No page pushed yet".into()))?;
        set_page_rotation(&mut self.doc, page_id, degrees)
    }

    /// Rewrite the page tree to the pushed sequence and drop orphans.
    pub fn finish(mut self) -> Result<Document, PdfDeckError> {
        if self.kids.is_empty() {
            return Err(PdfDeckError::ValidationError("No pages specified".into()));
        }
        update_page_tree(&mut self.doc, &self.kids)?;
        self.doc.prune_objects();
        self.doc.compress();
        Ok(self.doc)
    }
}

/// Build a new document containing exactly `page_numbers`, in order.
pub fn copy_pages(doc: &Document, page_numbers: &[u32]) -> Result<Document, PdfDeckError> {
    let mut copier = PageCopier::new(doc);
    for &number in page_numbers {
        copier.push(number)?;
    }
    copier.finish()
}

/// Point the catalog's page tree at exactly `page_refs`, in order.
///
/// Flattens the tree: `Kids` lists the pages directly and each page's
/// `Parent` is repointed at the root pages node. Returns the pages node id.
pub(crate) fn update_page_tree(
    doc: &mut Document,
    page_refs: &[ObjectId],
) -> Result<ObjectId, PdfDeckError> {
    let root_obj = doc
        .trailer
        .get(b"Root")
        .map_err(|_| PdfDeckError::OperationError("No Root in trailer".into()))?;
    let catalog_id = root_obj
        .as_reference()
        .map_err(|_| PdfDeckError::OperationError("Root is not a reference".into()))?;
    let catalog = doc
        .objects
        .get(&catalog_id)
        .ok_or_else(|| PdfDeckError::OperationError("Catalog not found".into()))?
        .as_dict()
        .map_err(|_| PdfDeckError::OperationError("Invalid catalog".into()))?;
    let pages_obj = catalog
        .get(b"Pages")
        .map_err(|_| PdfDeckError::OperationError("No Pages in catalog".into()))?;
    let pages_id = pages_obj
        .as_reference()
        .map_err(|_| PdfDeckError::OperationError("Pages is not a reference".into()))?;

    if let Some(Object::Dictionary(ref mut pages_dict)) = doc.objects.get_mut(&pages_id) {
        let kids = page_refs
            .iter()
            .map(|&id| Object::Reference(id))
            .collect::<Vec<_>>();
        pages_dict.set("Kids", Object::Array(kids));
        pages_dict.set("Count", Object::Integer(page_refs.len() as i64));
    } else {
        return Err(PdfDeckError::OperationError(
            "Invalid pages dictionary".into(),
        ));
    }

    for &page_id in page_refs {
        let page_dict = doc
            .get_object_mut(page_id)
            .and_then(|o| o.as_dict_mut())
            .map_err(|e| PdfDeckError::OperationError(format!("Invalid page object: {}", e)))?;
        page_dict.set("Parent", Object::Reference(pages_id));
    }

    Ok(pages_id)
}

/// Set the absolute `/Rotate` value on one page.
pub fn set_page_rotation(
    doc: &mut Document,
    page_id: ObjectId,
    degrees: i64,
) -> Result<(), PdfDeckError> {
    let page_dict = doc
        .get_object_mut(page_id)
        .and_then(|o| o.as_dict_mut())
        .map_err(|e| PdfDeckError::OperationError(format!("Invalid page object: {}", e)))?;
    page_dict.set("Rotate", Object::Integer(degrees));
    Ok(())
}
