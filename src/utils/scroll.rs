use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Handles scroll arithmetic and width-aware wrapping for the transcript.
pub struct ScrollCalculator;

impl ScrollCalculator {
    /// Largest top offset that still fills the viewport.
    pub fn max_scroll_offset(total_lines: usize, available_height: u16) -> u16 {
        let total = total_lines.min(u16::MAX as usize) as u16;
        total.saturating_sub(available_height)
    }

    /// Smallest change to `current` that makes `line` visible.
    pub fn scroll_into_view(current: u16, line: u16, available_height: u16) -> u16 {
        if available_height == 0 {
            return line;
        }
        if line < current {
            line
        } else if line >= current.saturating_add(available_height) {
            line.saturating_sub(available_height - 1)
        } else {
            current
        }
    }

    /// Word-wrap `text` to `width` display columns.
    ///
    /// Existing line breaks are kept; words wider than the line are split.
    pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
        if width == 0 {
            return text.lines().map(str::to_string).collect();
        }

        let mut out = Vec::new();
        for raw_line in text.split('\n') {
            let mut current = String::new();
            let mut current_width = 0usize;

            for word in raw_line.split_whitespace() {
                let word_width = word.width();
                let gap = usize::from(current_width > 0);

                if current_width + gap + word_width <= width {
                    if gap == 1 {
                        current.push(' ');
                    }
                    current.push_str(word);
                    current_width += gap + word_width;
                    continue;
                }

                if current_width > 0 {
                    out.push(std::mem::take(&mut current));
                    current_width = 0;
                }

                if word_width <= width {
                    current.push_str(word);
                    current_width = word_width;
                    continue;
                }

                // Break an overlong token at the column limit.
                for ch in word.chars() {
                    let ch_width = ch.width().unwrap_or(0);
                    if current_width + ch_width > width && current_width > 0 {
                        out.push(std::mem::take(&mut current));
                        current_width = 0;
                    }
                    current.push(ch);
                    current_width += ch_width;
                }
            }

            out.push(current);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_offset_is_zero_when_content_fits() {
        assert_eq!(ScrollCalculator::max_scroll_offset(5, 10), 0);
        assert_eq!(ScrollCalculator::max_scroll_offset(25, 10), 15);
    }

    #[test]
    fn scroll_into_view_moves_minimally() {
        assert_eq!(ScrollCalculator::scroll_into_view(10, 12, 5), 10);
        assert_eq!(ScrollCalculator::scroll_into_view(10, 4, 5), 4);
        assert_eq!(ScrollCalculator::scroll_into_view(10, 15, 5), 11);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        assert_eq!(
            ScrollCalculator::wrap_text("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn keeps_blank_lines_and_splits_long_words() {
        assert_eq!(
            ScrollCalculator::wrap_text("a\n\nabcdefgh", 3),
            vec!["a", "", "abc", "def", "gh"]
        );
    }

    #[test]
    fn measures_wide_characters() {
        assert_eq!(ScrollCalculator::wrap_text("日本語 ok", 6), vec!["日本語", "ok"]);
    }
}
