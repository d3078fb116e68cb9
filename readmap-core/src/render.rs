//! Textual rendering of alignments
//!
//! Debug-style visualization, not a structured record format: each
//! alignment is printed on its own line, padded so that it lines up
//! under the reference printed above it.

/// Render one alignment as a padded line.
///
/// A non-negative offset left-pads the substring with that many spaces;
/// a negative offset trims the first `|offset|` bytes instead.
pub fn render_alignment(sequence: &[u8], ref_offset: isize) -> String {
    if ref_offset >= 0 {
        format!(
            "{}{}",
            " ".repeat(ref_offset as usize),
            String::from_utf8_lossy(sequence)
        )
    } else {
        let trim = (-ref_offset as usize).min(sequence.len());
        String::from_utf8_lossy(&sequence[trim..]).into_owned()
    }
}
