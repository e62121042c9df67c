//! Character-window text chunker for document ingest.
//!
//! Splits document body text on paragraph boundaries (`\n\n`) first, packing
//! paragraphs greedily up to `chunk_size` characters. A single paragraph
//! larger than `chunk_size` is hard-split into overlapping windows, snapping
//! to the nearest newline/space break and to char boundaries.
//!
//! Guarantees:
//! - Non-blank input yields at least one chunk; blank input yields none.
//! - No chunk exceeds `chunk_size` characters (in bytes of UTF-8 text the
//!   window is measured on byte length with boundary snapping).

/// Split `text` into chunks of at most `chunk_size` bytes with `overlap`
/// bytes of overlap between consecutive hard-split windows.
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if trimmed.len() <= chunk_size {
        return vec![trimmed.to_string()];
    }

    let mut chunks = Vec::new();
    let mut buf = String::new();

    for para in trimmed.split("\n\n") {
        let para = para.trim();
        if para.is_empty() {
            continue;
        }

        let would_be = if buf.is_empty() { para.len() } else { buf.len() + 2 + para.len() };
        if would_be > chunk_size && !buf.is_empty() {
            chunks.push(std::mem::take(&mut buf));
        }

        if para.len() > chunk_size {
            if !buf.is_empty() {
                chunks.push(std::mem::take(&mut buf));
            }
            hard_split(para, chunk_size, overlap, &mut chunks);
            continue;
        }

        if !buf.is_empty() {
            buf.push_str("\n\n");
        }
        buf.push_str(para);
    }

    if !buf.is_empty() {
        chunks.push(buf);
    }

    chunks
}

/// Window an oversized block into `chunk_size` pieces stepping by
/// `chunk_size - overlap`, preferring to break after a newline or space.
fn hard_split(block: &str, chunk_size: usize, overlap: usize, out: &mut Vec<String>) {
    let step = chunk_size.saturating_sub(overlap).max(1);
    let mut start = 0usize;

    while start < block.len() {
        let mut end = snap_back(block, (start + chunk_size).min(block.len()));

        if end < block.len() {
            let window = &block[start..end];
            if let Some(pos) = window.rfind('\n').or_else(|| window.rfind(' ')) {
                // Keep the break character in the left window; skip degenerate
                // zero-length cuts.
                if pos > 0 {
                    end = start + pos + 1;
                }
            }
        }

        let piece = block[start..end].trim();
        if !piece.is_empty() {
            out.push(piece.to_string());
        }

        if end == block.len() {
            break;
        }
        // Step forward, never past the window end, always making progress.
        let next = (start + step).min(end).max(start + 1);
        start = snap_forward(block, next);
    }
}

fn snap_back(s: &str, mut idx: usize) -> usize {
    while idx > 0 && idx < s.len() && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn snap_forward(s: &str, mut idx: usize) -> usize {
    while idx < s.len() && !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx.min(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = split_text("Hello world.", 1000, 200);
        assert_eq!(chunks, vec!["Hello world.".to_string()]);
    }

    #[test]
    fn blank_text_yields_nothing() {
        assert!(split_text("   \n\n  ", 1000, 200).is_empty());
    }

    #[test]
    fn paragraphs_pack_up_to_chunk_size() {
        let a = "a".repeat(400);
        let b = "b".repeat(400);
        let c = "c".repeat(400);
        let text = format!("{a}\n\n{b}\n\n{c}");
        let chunks = split_text(&text, 1000, 200);
        // a+b fit together (802 bytes), c starts a new chunk.
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].contains(&a) && chunks[0].contains(&b));
        assert_eq!(chunks[1], c);
    }

    #[test]
    fn oversized_paragraph_is_windowed_with_overlap() {
        let block = "x".repeat(2500);
        let chunks = split_text(&block, 1000, 200);
        assert!(chunks.len() >= 3);
        for chunk in &chunks {
            assert!(chunk.len() <= 1000);
        }
    }

    #[test]
    fn windows_prefer_space_breaks() {
        let words = std::iter::repeat("word").take(600).collect::<Vec<_>>().join(" ");
        let chunks = split_text(&words, 1000, 200);
        for chunk in &chunks {
            assert!(!chunk.starts_with(' ') && !chunk.ends_with(' '));
        }
    }
}
