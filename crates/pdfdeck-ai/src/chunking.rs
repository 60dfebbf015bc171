//! Text chunking for retrieval prompts.
//!
//! Long extracted text is cut into overlapping chunks so each one fits in
//! a model context window. Cuts prefer a sentence end in the second half
//! of the window, then fall back to the last space or newline, and only
//! then split mid-word. Offsets are measured in characters, not bytes, so
//! a cut never lands inside a multi-byte sequence.

/// Maximum characters per chunk unless the caller picks another size.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Characters repeated from the end of one chunk at the start of the next.
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

/// Split `text` into chunks of at most `max_chunk_size` characters
/// (plus the break character itself), consecutive chunks sharing
/// `overlap` characters. Text that already fits comes back as a single
/// chunk, including empty input.
pub fn chunk_text(text: &str, max_chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chunk_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let mut end = start + max_chunk_size;
        if end < chars.len() {
            // Only cut early in the second half of the window, so chunks
            // never shrink below half the requested size.
            let min_end = start + max_chunk_size / 2;
            if let Some(cut) = last_sentence_break(&chars, min_end, end) {
                end = cut + 1;
            } else if let Some(cut) = last_soft_break(&chars, end) {
                if cut > min_end {
                    end = cut + 1;
                }
            }
        }
        chunks.push(chars[start..end.min(chars.len())].iter().collect());

        // The overlap steps back from the nominal end, which past the
        // final chunk may exceed the text length.
        let mut next = end.saturating_sub(overlap);
        if next == 0 || end <= next {
            next = end;
        }
        start = next;
    }
    chunks
}

/// Last index in `from..=to` holding `.`, `!` or `?` followed by
/// whitespace.
fn last_sentence_break(chars: &[char], from: usize, to: usize) -> Option<usize> {
    let last = chars.len().checked_sub(2)?;
    (from..=to.min(last))
        .rev()
        .find(|&i| matches!(chars[i], '.' | '!' | '?') && chars[i + 1].is_whitespace())
}

/// Last space or newline at or before `to`.
fn last_soft_break(chars: &[char], to: usize) -> Option<usize> {
    let last = chars.len().checked_sub(1)?;
    (0..=to.min(last))
        .rev()
        .find(|&i| chars[i] == ' ' || chars[i] == '\n')
}

/// Prefix every chunk with its document name and position, the form the
/// retrieval prompt expects.
pub fn label_chunks(document_name: &str, chunks: &[String]) -> Vec<String> {
    let total = chunks.len();
    chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| {
            format!(
                "[Document: {}, Chunk: {}/{}]\n{}",
                document_name,
                index + 1,
                total,
                chunk
            )
        })
        .collect()
}
