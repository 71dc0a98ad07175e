/// Paragraph-aware chunking with overlap carry-over.
///
/// Text splits on blank-line boundaries and paragraphs accumulate
/// greedily until the next one would push the buffer past `max_size`
/// characters. The buffer is then emitted and the next buffer starts
/// with the trailing `overlap` characters of the emitted chunk. A
/// paragraph longer than `max_size` closes out the buffered text
/// first, then falls back to word-level accumulation under the same
/// rule, with a single space as separator.
///
/// Chunks never start or end with whitespace, and every chunk stays
/// within `max_size` characters except a chunk holding one word that
/// is itself longer than `max_size`.
pub fn chunk_text(text: &str, max_size: usize, overlap: usize) -> Vec<String> {
    if max_size == 0 {
        return vec![];
    }

    let mut acc = ChunkAccumulator::new(max_size, overlap);

    for para in text.split("\n\n") {
        let para = para.trim();
        if para.is_empty() {
            continue;
        }
        if char_count(para) > max_size {
            acc.flush();
            for word in para.split_whitespace() {
                acc.push(word, " ");
            }
        } else {
            acc.push(para, "\n\n");
        }
    }

    acc.finish()
}

struct ChunkAccumulator {
    max_size: usize,
    overlap: usize,
    chunks: Vec<String>,
    buf: String,
    buf_chars: usize,
    // True while the buffer holds only an overlap seed.
    seeded: bool,
}

impl ChunkAccumulator {
    fn new(max_size: usize, overlap: usize) -> Self {
        Self {
            max_size,
            overlap,
            chunks: Vec::new(),
            buf: String::new(),
            buf_chars: 0,
            seeded: false,
        }
    }

    fn push(&mut self, piece: &str, sep: &str) {
        let piece_chars = char_count(piece);
        let sep_chars = char_count(sep);

        if !self.buf.is_empty() && self.buf_chars + sep_chars + piece_chars > self.max_size {
            // A bare seed is never emitted as its own chunk.
            if !self.seeded {
                self.emit();
            }
            // A seed that cannot fit alongside the next piece is dropped.
            if self.seeded && self.buf_chars + sep_chars + piece_chars > self.max_size {
                self.buf.clear();
                self.buf_chars = 0;
                self.seeded = false;
            }
        }

        if !self.buf.is_empty() {
            self.buf.push_str(sep);
            self.buf_chars += sep_chars;
        }
        self.buf.push_str(piece);
        self.buf_chars += piece_chars;
        self.seeded = false;
    }

    /// Emits any buffered paragraphs so word-level accumulation starts
    /// from a fresh seed instead of extending the previous buffer.
    fn flush(&mut self) {
        if !self.buf.is_empty() && !self.seeded {
            self.emit();
        }
    }

    /// Emits the buffer and reseeds it with the overlap tail, trimmed
    /// so no chunk begins with separator whitespace. No seed when
    /// overlap is 0 or covers the whole chunk.
    fn emit(&mut self) {
        let chunk = std::mem::take(&mut self.buf);
        if self.overlap > 0 && self.buf_chars > self.overlap {
            self.buf = tail_chars(&chunk, self.overlap).trim_start().to_string();
            self.buf_chars = char_count(&self.buf);
            self.seeded = !self.buf.is_empty();
        } else {
            self.buf_chars = 0;
            self.seeded = false;
        }
        self.chunks.push(chunk);
    }

    fn finish(mut self) -> Vec<String> {
        if !self.buf.is_empty() {
            let last = std::mem::take(&mut self.buf);
            self.chunks.push(last);
        }
        self.chunks
    }
}

fn char_count(s: &str) -> usize {
    s.chars().count()
}

/// Last `n` characters of `s`, sliced on a char boundary.
fn tail_chars(s: &str, n: usize) -> String {
    let total = char_count(s);
    if n >= total {
        return s.to_string();
    }
    match s.char_indices().nth(total - n) {
        Some((byte, _)) => s[byte..].to_string(),
        None => s.to_string(),
    }
}
