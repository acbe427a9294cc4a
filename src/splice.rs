//! Positional text editing with a position-preserving source map.
//!
//! Edits are byte-range replacements over the original text plus pure
//! insertions (zero-length ranges). Ranges never overlap: every matched
//! macro call occupies a disjoint range and the insertion point is an
//! import boundary, never inside a removed range. Removals keep the
//! surrounding line intact, so unrelated code sharing a line with a macro
//! call keeps its position.

use sourcemap::{SourceMap, SourceMapBuilder};

#[derive(Debug)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

/// Line/column cursor. Lines are 0-based; columns count UTF-16 code units,
/// the convention source maps use.
#[derive(Debug, Clone, Copy, Default)]
struct Pos {
    line: u32,
    col: u32,
}

impl Pos {
    fn advance(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.col = 0;
            } else {
                self.col += ch.len_utf16() as u32;
            }
        }
    }
}

/// Result of applying the edits: final code plus a map from generated
/// positions back to the original text.
pub struct SpliceOutput {
    pub code: String,
    pub map: SourceMap,
}

pub struct TextSplicer<'a> {
    source: &'a str,
    edits: Vec<Edit>,
}

impl<'a> TextSplicer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            edits: Vec::new(),
        }
    }

    /// Replaces `start..end` with empty text.
    pub fn remove(&mut self, start: usize, end: usize) {
        self.edits.push(Edit {
            start,
            end,
            text: String::new(),
        });
    }

    /// Inserts `text` immediately before the content at `offset`.
    pub fn insert_before(&mut self, offset: usize, text: String) {
        self.edits.push(Edit {
            start: offset,
            end: offset,
            text,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Applies the edits and builds the map. Only retained original text is
    /// mapped; generated text carries no tokens, like upstream splicers.
    pub fn finish(mut self, file: &str) -> SpliceOutput {
        self.edits.sort_by_key(|e| (e.start, e.end));

        let mut builder = SourceMapBuilder::new(Some(file));
        let src_id = builder.add_source(file);
        builder.set_source_contents(src_id, Some(self.source));

        let mut code = String::with_capacity(self.source.len());
        let mut cursor = 0usize;
        let mut dst = Pos::default();
        let mut src = Pos::default();

        for edit in &self.edits {
            let start = edit.start.min(self.source.len());
            let end = edit.end.clamp(start, self.source.len());
            if start < cursor {
                // Overlap would violate the caller invariant; drop the edit
                // rather than corrupt positions.
                debug_assert!(start >= cursor, "overlapping text edits");
                continue;
            }

            copy_retained(
                &self.source[cursor..start],
                &mut code,
                &mut builder,
                &mut dst,
                &mut src,
                file,
            );

            if !edit.text.is_empty() {
                code.push_str(&edit.text);
                dst.advance(&edit.text);
            }
            src.advance(&self.source[start..end]);
            cursor = end;
        }

        copy_retained(
            &self.source[cursor..],
            &mut code,
            &mut builder,
            &mut dst,
            &mut src,
            file,
        );

        SpliceOutput {
            code,
            map: builder.into_sourcemap(),
        }
    }
}

/// Copies one retained chunk, emitting a token at the chunk start and at
/// the start of every following output line.
fn copy_retained(
    chunk: &str,
    code: &mut String,
    builder: &mut SourceMapBuilder,
    dst: &mut Pos,
    src: &mut Pos,
    file: &str,
) {
    let mut need_token = true;
    for ch in chunk.chars() {
        if need_token {
            builder.add(dst.line, dst.col, src.line, src.col, Some(file), None);
            need_token = false;
        }
        code.push(ch);
        if ch == '\n' {
            dst.line += 1;
            dst.col = 0;
            src.line += 1;
            src.col = 0;
            need_token = true;
        } else {
            let width = ch.len_utf16() as u32;
            dst.col += width;
            src.col += width;
        }
    }
}
