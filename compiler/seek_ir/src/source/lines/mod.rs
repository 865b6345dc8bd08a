//! Line/column conversion for byte offsets.
//!
//! [`LineOffsetTable`] pre-computes line starts once per file for
//! O(log L) offset → line lookup. Lines and columns are 1-based; the unit a
//! column counts is chosen by [`ColumnEncoding`].

/// Unit used to count columns within a line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnEncoding {
    /// Columns count bytes.
    Utf8,
    /// Columns count UTF-16 code units (the LSP default).
    Utf16,
    /// Columns count Unicode scalar values.
    #[default]
    Char,
}

impl ColumnEncoding {
    /// Number of column units `ch` occupies.
    #[inline]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "a char encodes to at most 4 bytes"
    )]
    pub fn width(self, ch: char) -> u32 {
        match self {
            ColumnEncoding::Utf8 => ch.len_utf8() as u32,
            ColumnEncoding::Utf16 => ch.len_utf16() as u32,
            ColumnEncoding::Char => 1,
        }
    }
}

/// Pre-computed line offset table.
///
/// `offsets[i]` is the byte offset where line `i + 1` starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineOffsetTable {
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    /// Build a line offset table from source text.
    ///
    /// The caller guarantees the text is at most `u32::MAX` bytes long.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source length is checked against u32::MAX before building"
    )]
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        offsets.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, byte)| byte == b'\n')
                .map(|(i, _)| (i + 1) as u32),
        );
        LineOffsetTable { offsets }
    }

    /// 0-based index of the line containing `offset`.
    #[inline]
    fn line_index(&self, offset: u32) -> usize {
        match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        }
    }

    /// 1-based line number containing `offset`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "line count is bounded by the u32 source length"
    )]
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        self.line_index(offset) as u32 + 1
    }

    /// 1-based (line, column) for `offset`.
    ///
    /// Offsets past the end clamp to the end of the text. An offset inside a
    /// multi-byte character reports the column of that character.
    pub fn offset_to_line_col(
        &self,
        source: &str,
        offset: u32,
        encoding: ColumnEncoding,
    ) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let line_start = self
            .line_start_offset(line)
            .map_or(0, |start| start as usize);
        let offset = (offset as usize).min(source.len());

        let col: u32 = source
            .get(line_start..)
            .unwrap_or_default()
            .char_indices()
            .take_while(|&(i, _)| line_start + i < offset)
            .map(|(_, ch)| encoding.width(ch))
            .sum();

        (line, col + 1)
    }

    /// Byte offset of a 1-based (line, column) position.
    ///
    /// The column may point one past the last character of the line. Returns
    /// `None` for line or column 0, positions past the end of the line, and
    /// columns that land inside a character.
    pub fn line_col_to_offset(
        &self,
        source: &str,
        line: u32,
        column: u32,
        encoding: ColumnEncoding,
    ) -> Option<u32> {
        if line == 0 || column == 0 {
            return None;
        }
        let start = *self.offsets.get((line - 1) as usize)? as usize;
        let end = self
            .offsets
            .get(line as usize)
            .map_or(source.len(), |&next| next as usize - 1);
        let text = source.get(start..end)?;

        let target = column - 1;
        let mut units = 0u32;
        for (i, ch) in text.char_indices() {
            if units == target {
                return u32::try_from(start + i).ok();
            }
            units += encoding.width(ch);
            if units > target {
                return None;
            }
        }
        if units == target {
            u32::try_from(start + text.len()).ok()
        } else {
            None
        }
    }

    /// Byte offset where a 1-based line starts.
    pub fn line_start_offset(&self, line: u32) -> Option<u32> {
        if line == 0 {
            return None;
        }
        self.offsets.get((line - 1) as usize).copied()
    }

    /// Number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }
}
