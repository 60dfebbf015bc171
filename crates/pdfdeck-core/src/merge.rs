//! PDF merge.
//!
//! Concatenates the pages of every input file, in input order, into one new
//! document. Object IDs of each appended document are offset past the
//! destination's current maximum to avoid collisions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use lopdf::{Object, ObjectId};

use crate::document::{load_document, save_document};
use crate::error::PdfDeckError;
use crate::options::MergeOptions;
use crate::pages::update_page_tree;
use crate::progress::Progress;
use crate::workspace::Workspace;

/// Merge `files` into a single document committed under the options' output
/// name. Progress ticks once per input file.
pub fn merge_pdfs(
    workspace: &Workspace,
    files: &[PathBuf],
    options: &MergeOptions,
    progress: &mut Progress<'_>,
) -> Result<PathBuf, PdfDeckError> {
    run(workspace, files, options, progress).inspect_err(|e| {
        tracing::error!(error = %e, files = files.len(), "merge failed");
    })
}

fn run(
    workspace: &Workspace,
    files: &[PathBuf],
    options: &MergeOptions,
    progress: &mut Progress<'_>,
) -> Result<PathBuf, PdfDeckError> {
    options.validate()?;
    if files.is_empty() {
        return Err(PdfDeckError::ValidationError(
            "No PDF files provided".into(),
        ));
    }

    let mut loaded = Vec::with_capacity(files.len());
    for path in files {
        loaded.push(load_document(path)?);
    }

    progress.start(files.len());

    // First document is the base; the rest are appended with remapped IDs.
    let mut sources = loaded.into_iter();
    let mut dest = sources
        .next()
        .ok_or_else(|| PdfDeckError::ValidationError("No PDF files provided".into()))?;
    let mut dest_max_id = dest.max_id;
    let mut dest_page_refs: Vec<ObjectId> = dest.get_pages().values().copied().collect();
    progress.tick();

    for source in sources {
        let source_pages: Vec<ObjectId> = source.get_pages().values().copied().collect();
        let id_offset = dest_max_id;

        let mut remapped_objects = BTreeMap::new();
        for (old_id, object) in source.objects.into_iter() {
            let new_id = (old_id.0 + id_offset, old_id.1);
            remapped_objects.insert(new_id, remap_object_refs(object, id_offset));
        }
        for (id, object) in remapped_objects {
            dest.objects.insert(id, object);
        }

        for old_page_ref in source_pages {
            dest_page_refs.push((old_page_ref.0 + id_offset, old_page_ref.1));
        }

        dest_max_id = (source.max_id + id_offset).max(dest_max_id);
        progress.tick();
    }

    update_page_tree(&mut dest, &dest_page_refs)?;
    dest.max_id = dest_max_id;
    dest.prune_objects();
    dest.compress();

    let temp = workspace.temp_path("merged", ".pdf")?;
    save_document(&mut dest, &temp)?;
    let output = workspace.commit(&temp, &options.output_file_name)?;
    tracing::info!(files = files.len(), output = %output.display(), "merged PDFs");
    Ok(output)
}

/// Recursively shift every object reference by `offset`.
fn remap_object_refs(obj: Object, offset: u32) -> Object {
    match obj {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(arr) => Object::Array(
            arr.into_iter()
                .map(|o| remap_object_refs(o, offset))
                .collect(),
        ),
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = remap_object_refs(value.clone(), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = remap_object_refs(value.clone(), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::test_pdf::{create_labeled_pdf, create_test_pdf, page_label};
    use lopdf::Document;
    use pretty_assertions::assert_eq;

    fn setup(inputs: &[(&str, Vec<u8>)]) -> (tempfile::TempDir, Workspace, Vec<PathBuf>) {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path().join("storage"));
        let mut paths = Vec::new();
        for (name, bytes) in inputs {
            let path = dir.path().join(name);
            std::fs::write(&path, bytes).unwrap();
            paths.push(path);
        }
        (dir, ws, paths)
    }

    #[test]
    fn test_merge_concatenates_in_input_order() {
        let (_dir, ws, paths) = setup(&[
            ("a.pdf", create_labeled_pdf("A", 2)),
            ("b.pdf", create_labeled_pdf("B", 3)),
        ]);
        let options = MergeOptions {
            output_file_name: "merged".into(),
        };

        let output =
            merge_pdfs(&ws, &paths, &options, &mut Progress::silent()).unwrap();

        let doc = Document::load(&output).unwrap();
        assert_eq!(doc.get_pages().len(), 5);
        assert_eq!(page_label(&doc, 1), "A 1");
        assert_eq!(page_label(&doc, 2), "A 2");
        assert_eq!(page_label(&doc, 3), "B 1");
        assert_eq!(page_label(&doc, 5), "B 3");
    }

    #[test]
    fn test_merge_single_file_copies_it() {
        let (_dir, ws, paths) = setup(&[("only.pdf", create_test_pdf(3))]);
        let options = MergeOptions {
            output_file_name: "merged".into(),
        };

        let output =
            merge_pdfs(&ws, &paths, &options, &mut Progress::silent()).unwrap();

        let doc = Document::load(&output).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_merge_no_files_fails() {
        let (_dir, ws, _) = setup(&[]);
        let options = MergeOptions {
            output_file_name: "merged".into(),
        };
        let result = merge_pdfs(&ws, &[], &options, &mut Progress::silent());
        assert!(matches!(result, Err(PdfDeckError::ValidationError(_))));
    }

    #[test]
    fn test_merge_progress_ends_at_one_hundred() {
        let (_dir, ws, paths) = setup(&[
            ("a.pdf", create_test_pdf(1)),
            ("b.pdf", create_test_pdf(1)),
            ("c.pdf", create_test_pdf(1)),
        ]);
        let options = MergeOptions {
            output_file_name: "merged".into(),
        };

        let mut seen = Vec::new();
        {
            let mut progress = Progress::new(|p| seen.push(p));
            merge_pdfs(&ws, &paths, &options, &mut progress).unwrap();
        }
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(seen.last().copied(), Some(100.0));
    }

    #[test]
    fn test_merge_missing_input_leaves_no_output() {
        let (dir, ws, mut paths) = setup(&[("a.pdf", create_test_pdf(1))]);
        paths.push(dir.path().join("missing.pdf"));
        let options = MergeOptions {
            output_file_name: "merged".into(),
        };

        let result = merge_pdfs(&ws, &paths, &options, &mut Progress::silent());
        assert!(matches!(result, Err(PdfDeckError::LoadError(_))));
        assert!(!ws.root().join("merged.pdf").exists());
    }
}
