//! Bounded text splitting along natural boundaries.
//!
//! [`chunk_text`] cuts a document into ordered [`Chunk`]s no larger than
//! a caller-supplied character bound, preferring paragraph breaks, then
//! sentence breaks, and only hard-cutting when a single run of text has
//! no usable boundary. Concatenating the chunks in index order always
//! reproduces the input exactly.

use serde::{Deserialize, Serialize};

/// A contiguous slice of the source text, the unit of parallel work.
///
/// Produced once per job and immutable afterwards. `index` defines the
/// reassembly order of the transformed output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
}

impl Chunk {
    /// Size of the chunk in characters, the unit the bound is measured in.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Boundary hierarchy: paragraph break, then sentence break, then a hard
/// cut at `max_chars` (on a char boundary, possibly mid-word). Adjacent
/// small segments are packed greedily so chunks stay close to the bound.
/// Deterministic, and lossless: separators remain attached to the
/// preceding segment. Empty input yields an empty sequence.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<Chunk> {
    let max = max_chars.max(1);
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for segment in segments(text, max) {
        let segment_len = segment.chars().count();
        if current_len + segment_len > max && !current.is_empty() {
            chunks.push(Chunk {
                index: chunks.len(),
                text: std::mem::take(&mut current),
            });
            current_len = 0;
        }
        current.push_str(segment);
        current_len += segment_len;
    }

    if !current.is_empty() {
        chunks.push(Chunk {
            index: chunks.len(),
            text: current,
        });
    }

    chunks
}

/// Decompose `text` into ordered segments, each at most `max` chars.
///
/// Paragraphs that fit stay whole; oversized paragraphs are split into
/// sentences; oversized sentences are hard-cut.
fn segments(text: &str, max: usize) -> Vec<&str> {
    let mut out = Vec::new();
    for paragraph in text.split_inclusive("\n\n") {
        if paragraph.chars().count() <= max {
            out.push(paragraph);
            continue;
        }
        for sentence in split_sentences(paragraph) {
            if sentence.chars().count() <= max {
                out.push(sentence);
            } else {
                hard_cut(sentence, max, &mut out);
            }
        }
    }
    out
}

/// Split after sentence terminators. `.`, `!` and `?` only count when
/// followed by whitespace or end of text; a newline always terminates.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut iter = text.char_indices().peekable();

    while let Some((i, c)) = iter.next() {
        let boundary = match c {
            '\n' => true,
            '.' | '!' | '?' => iter
                .peek()
                .map(|&(_, next)| next.is_whitespace())
                .unwrap_or(true),
            _ => false,
        };
        if boundary {
            let end = i + c.len_utf8();
            out.push(&text[start..end]);
            start = end;
        }
    }

    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

/// Cut `text` into pieces of exactly `max` chars (last piece may be
/// shorter), respecting UTF-8 char boundaries.
fn hard_cut<'a>(text: &'a str, max: usize, out: &mut Vec<&'a str>) {
    let mut start = 0;
    let mut count = 0;
    for (i, _) in text.char_indices() {
        if count == max {
            out.push(&text[start..i]);
            start = i;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reassemble(chunks: &[Chunk]) -> String {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(chunk_text("", 100).is_empty());
    }

    #[test]
    fn small_text_is_a_single_chunk() {
        let chunks = chunk_text("Hello world.", 100);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].text, "Hello world.");
    }

    #[test]
    fn chunks_are_lossless_and_bounded() {
        let text = "First paragraph with some text.\n\n\
                    Second paragraph. It has two sentences!\n\n\
                    Third paragraph ends without punctuation";
        for bound in [10, 25, 40, 80, 200] {
            let chunks = chunk_text(text, bound);
            assert_eq!(reassemble(&chunks), text, "lossless at bound {bound}");
            for chunk in &chunks {
                assert!(
                    chunk.char_len() <= bound,
                    "chunk of {} chars exceeds bound {bound}",
                    chunk.char_len()
                );
            }
        }
    }

    #[test]
    fn chunking_is_deterministic() {
        let text = "Some text. More text! A question? And a final line.\n\nNext paragraph.";
        let a = chunk_text(text, 20);
        let b = chunk_text(text, 20);
        assert_eq!(a, b);
    }

    #[test]
    fn indices_are_sequential() {
        let text = "one two three four five six seven eight nine ten";
        let chunks = chunk_text(text, 10);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn paragraph_boundaries_preferred() {
        let text = "Short para one.\n\nShort para two.";
        let chunks = chunk_text(text, 20);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "Short para one.\n\n");
        assert_eq!(chunks[1].text, "Short para two.");
    }

    #[test]
    fn oversized_paragraph_splits_on_sentences() {
        let text = "First sentence here. Second sentence here. Third sentence here.";
        let chunks = chunk_text(text, 25);
        assert_eq!(reassemble(&chunks), text);
        // Each sentence fits the bound, so no chunk is cut mid-sentence.
        for chunk in &chunks {
            assert!(chunk.text.trim_end().ends_with('.'));
        }
    }

    #[test]
    fn unbroken_run_is_force_split() {
        let text = "a".repeat(2500);
        let chunks = chunk_text(&text, 1000);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].char_len(), 1000);
        assert_eq!(chunks[1].char_len(), 1000);
        assert_eq!(chunks[2].char_len(), 500);
        assert_eq!(reassemble(&chunks), text);
    }

    #[test]
    fn ten_thousand_fifty_chars_at_bound_1000_gives_11_chunks() {
        let text = "x".repeat(10_050);
        let chunks = chunk_text(&text, 1000);
        assert_eq!(chunks.len(), 11);
        assert!(chunks[..10].iter().all(|c| c.char_len() == 1000));
        assert_eq!(chunks[10].char_len(), 50);
        assert_eq!(reassemble(&chunks), text);
    }

    #[test]
    fn multibyte_text_cuts_on_char_boundaries() {
        let text = "é".repeat(150);
        let chunks = chunk_text(&text, 100);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].char_len(), 100);
        assert_eq!(chunks[1].char_len(), 50);
        assert_eq!(reassemble(&chunks), text);
    }

    #[test]
    fn abbreviation_period_without_space_is_not_a_boundary() {
        let sentences = split_sentences("Version 1.2 shipped. Done.");
        assert_eq!(sentences, vec!["Version 1.2 shipped.", " Done."]);
    }

    #[test]
    fn zero_bound_is_clamped() {
        let chunks = chunk_text("ab", 0);
        assert_eq!(chunks.len(), 2);
        assert_eq!(reassemble(&chunks), "ab");
    }
}
