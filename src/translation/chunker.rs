/*!
 * Token-bounded document chunking.
 *
 * Splits a document into chunks whose estimated size stays near a token
 * budget, breaking at the coarsest boundary available:
 * paragraph (`"\n\n"`), then line (`"\n"`), then sentence, and only as a
 * last resort at a fixed byte width.
 *
 * Every chunk boundary except the fixed-width fallback sits on whitespace that
 * was present in the input, so joining the chunks back with `"\n\n"` (when the
 * earlier chunk does not already end in a newline) reproduces the document up
 * to whitespace normalization.
 */

use log::debug;

/// Characters per estimated token
pub const CHARS_PER_TOKEN: usize = 4;

/// Fraction of the configured budget actually filled
const SAFETY_MARGIN: f64 = 0.8;

/// Below this many tokens the safety margin is not applied
const MIN_EFFECTIVE_BUDGET: usize = 100;

const PARAGRAPH_SEPARATOR: &str = "\n\n";
const LINE_SEPARATOR: &str = "\n";

/// Crude token estimate: one token per four bytes
pub fn estimate_tokens(text: &str) -> usize {
    text.len() / CHARS_PER_TOKEN
}

/// Running chunk under construction, tracking its own token estimate.
///
/// Joiners are charged one token each, matching how the budget is checked.
#[derive(Debug, Default)]
struct ChunkBuffer {
    text: String,
    tokens: usize,
}

impl ChunkBuffer {
    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether adding `tokens` (plus an optional joiner) would exceed `budget`.
    /// An empty buffer never overflows, so every unit lands somewhere.
    fn would_overflow(&self, tokens: usize, joiner: Option<&str>, budget: usize) -> bool {
        if self.is_empty() {
            return false;
        }
        let joiner_tokens = usize::from(joiner.is_some());
        self.tokens + tokens + joiner_tokens > budget
    }

    fn push(&mut self, unit: &str, tokens: usize, joiner: Option<&str>) {
        if let Some(joiner) = joiner {
            if !self.is_empty() {
                self.text.push_str(joiner);
                self.tokens += 1;
            }
        }
        self.text.push_str(unit);
        self.tokens += tokens;
    }

    /// Move the buffer into `chunks` if it holds anything
    fn flush_into(&mut self, chunks: &mut Vec<String>) {
        if !self.is_empty() {
            chunks.push(std::mem::take(&mut self.text));
        }
        self.tokens = 0;
    }
}

/// Splits text into chunks bounded by an estimated token budget
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    budget_tokens: usize,
}

impl Chunker {
    /// Create a chunker for the given budget in estimated tokens
    pub fn new(budget_tokens: usize) -> Self {
        Self { budget_tokens }
    }

    pub fn budget_tokens(&self) -> usize {
        self.budget_tokens
    }

    /// Budget used while packing: 80% of the configured budget, unless that
    /// drops under 100 tokens. Never zero, so slicing always progresses.
    pub fn effective_budget(&self) -> usize {
        let reduced = (self.budget_tokens as f64 * SAFETY_MARGIN) as usize;
        let budget = if reduced < MIN_EFFECTIVE_BUDGET {
            self.budget_tokens
        } else {
            reduced
        };
        budget.max(1)
    }

    /// Split `text` into an ordered list of chunks
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        if estimate_tokens(text) <= self.budget_tokens {
            return vec![text.to_string()];
        }

        let budget = self.effective_budget();
        debug!(
            "Using effective chunk size of {} tokens (configured: {})",
            budget, self.budget_tokens
        );

        let mut chunks = Vec::new();
        let mut buffer = ChunkBuffer::default();

        for paragraph in text.split(PARAGRAPH_SEPARATOR) {
            let paragraph_tokens = estimate_tokens(paragraph);

            if paragraph_tokens > budget {
                buffer.flush_into(&mut chunks);
                self.split_oversized_paragraph(paragraph, budget, &mut buffer, &mut chunks);
            } else {
                if buffer.would_overflow(paragraph_tokens, Some(PARAGRAPH_SEPARATOR), budget) {
                    buffer.flush_into(&mut chunks);
                }
                buffer.push(paragraph, paragraph_tokens, Some(PARAGRAPH_SEPARATOR));
            }

            // Early flush: a full buffer is emitted even if the next paragraph might fit.
            if buffer.tokens >= budget {
                buffer.flush_into(&mut chunks);
            }
        }

        buffer.flush_into(&mut chunks);

        for (i, chunk) in chunks.iter().enumerate() {
            debug!(
                "Chunk {}: ~{} tokens ({} characters)",
                i + 1,
                estimate_tokens(chunk),
                chunk.len()
            );
        }

        chunks
    }

    /// Break a paragraph that alone exceeds the budget. `buffer` is empty on entry
    /// and may hold the paragraph's tail on return.
    fn split_oversized_paragraph(
        &self,
        paragraph: &str,
        budget: usize,
        buffer: &mut ChunkBuffer,
        chunks: &mut Vec<String>,
    ) {
        let lines: Vec<&str> = paragraph.split(LINE_SEPARATOR).collect();
        if lines.len() > 1 {
            pack(&lines, Some(LINE_SEPARATOR), budget, buffer, chunks);
            return;
        }

        let sentences = split_sentences(paragraph);
        if sentences.len() > 1 {
            pack(&sentences, None, budget, buffer, chunks);
            return;
        }

        chunks.extend(fixed_width_windows(paragraph, budget * CHARS_PER_TOKEN));
    }
}

/// Greedily pack `units` into `buffer`, flushing whenever the next one would overflow
fn pack(units: &[&str], joiner: Option<&str>, budget: usize, buffer: &mut ChunkBuffer, chunks: &mut Vec<String>) {
    for unit in units {
        let tokens = estimate_tokens(unit);
        if buffer.would_overflow(tokens, joiner, budget) {
            buffer.flush_into(chunks);
        }
        buffer.push(unit, tokens, joiner);
    }
}

/// Split a single line into sentences at `". "`, `"! "`, `"? "` and `"; "`.
///
/// Each marker, trailing space included, stays on the sentence it ends, so the
/// pieces concatenate back to the input exactly.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i + 1 < bytes.len() {
        if matches!(bytes[i], b'.' | b'!' | b'?' | b';') && bytes[i + 1] == b' ' {
            sentences.push(&text[start..i + 2]);
            start = i + 2;
            i += 2;
        } else {
            i += 1;
        }
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
}

/// Slice `text` into windows of at most `width` bytes, cut on char boundaries.
/// A window always advances by at least one character.
pub fn fixed_width_windows(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut windows = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + width).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        if end == start {
            end = start + 1;
            while !text.is_char_boundary(end) {
                end += 1;
            }
        }
        windows.push(text[start..end].to_string());
        start = end;
    }

    windows
}
