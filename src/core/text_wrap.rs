/// Text wrapping and pagination for the dialogue box.
///
/// Widths are raw character counts: the dialogue font is monospaced and
/// nothing here measures rendered glyphs.

/// Greedily wrap `text` into lines of at most `max_line_length` characters.
///
/// Words are never split. A word that would push the current line past
/// the limit starts a new line instead, and a word longer than the limit
/// gets a line of its own. `'\n'` forces a break. The final line is always
/// emitted, so text ending in a newline yields a trailing empty line.
pub fn wrap_lines(text: &str, max_line_length: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;
    let mut word = String::new();
    let mut word_len = 0;

    for c in text.chars() {
        match c {
            '\n' => {
                line.push_str(&word);
                lines.push(std::mem::take(&mut line));
                line_len = 0;
                word.clear();
                word_len = 0;
            }
            ' ' => {
                line.push_str(&word);
                if line_len + word_len >= max_line_length {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                    word.clear();
                    word_len = 0;
                } else {
                    line_len += word_len;
                    word.clear();
                    word.push(' ');
                    word_len = 1;
                }
            }
            _ => {
                if line_len + word_len >= max_line_length {
                    // The pending word moves down; what was committed stays.
                    if !line.is_empty() {
                        lines.push(std::mem::take(&mut line));
                    }
                    line_len = 0;
                    let trimmed = word.trim_start_matches(' ');
                    if trimmed.len() != word.len() {
                        word = trimmed.to_string();
                        word_len = word.chars().count();
                    }
                }
                word.push(c);
                word_len += 1;
            }
        }
    }

    line.push_str(&word);
    lines.push(line);
    lines
}

/// Wrap `text` and group the lines into pages.
///
/// A page holds `max_lines_per_page - 1` lines; the last row of the box is
/// kept free for the "continued" marker. The final page takes whatever is
/// left. Each page is trimmed. Empty text gives one empty page.
pub fn paginate(text: &str, max_line_length: usize, max_lines_per_page: usize) -> Vec<String> {
    let lines = wrap_lines(text, max_line_length);
    let lines_per_page = max_lines_per_page.saturating_sub(1).max(1);

    let mut pages = Vec::new();
    let mut page = String::new();
    let mut line_count = 0;

    for (i, line) in lines.iter().enumerate() {
        page.push_str(line);
        page.push('\n');
        line_count += 1;

        if line_count >= lines_per_page && i != lines.len() - 1 {
            pages.push(page.trim().to_string());
            page.clear();
            line_count = 0;
        }
    }

    if !page.is_empty() || pages.is_empty() {
        pages.push(page.trim().to_string());
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlong_prefix_breaks_at_space() {
        let lines = wrap_lines("abcdefghijklmno pqrstuvwxyz12", 15);
        assert_eq!(lines, vec!["abcdefghijklmno", "pqrstuvwxyz12"]);
    }

    #[test]
    fn word_that_does_not_fit_moves_down() {
        let lines = wrap_lines("hello world foo", 8);
        assert_eq!(lines, vec!["hello", "world", "foo"]);
    }

    #[test]
    fn short_text_is_one_line() {
        assert_eq!(wrap_lines("Hi there.", 28), vec!["Hi there."]);
    }

    #[test]
    fn newline_forces_break() {
        let lines = wrap_lines("one\ntwo three", 28);
        assert_eq!(lines, vec!["one", "two three"]);
    }

    #[test]
    fn paragraph_break_gives_blank_line() {
        let lines = wrap_lines("first.\n\nsecond.", 28);
        assert_eq!(lines, vec!["first.", "", "second."]);
    }

    #[test]
    fn trailing_newline_gives_trailing_empty_line() {
        let lines = wrap_lines("done\n", 28);
        assert_eq!(lines, vec!["done", ""]);
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        assert_eq!(wrap_lines("", 10), vec![""]);
    }

    #[test]
    fn overlong_word_gets_own_line() {
        let lines = wrap_lines("a supercalifragilistic word", 8);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "word"]);
    }

    #[test]
    fn overlong_word_at_start() {
        let lines = wrap_lines("abcdefghijkl mn", 5);
        assert_eq!(lines, vec!["abcdefghijkl", "mn"]);
    }

    #[test]
    fn lines_respect_limit() {
        let text = "This is some test text. Whoop dee doo! It should appear promptly. \
                    Here is some more text. Wheee! This is a thingy.";
        for line in wrap_lines(text, 28) {
            assert!(line.chars().count() <= 28, "line too long: {:?}", line);
        }
    }

    #[test]
    fn counts_characters_not_bytes() {
        let lines = wrap_lines("héé ààà", 4);
        assert_eq!(lines, vec!["héé", "ààà"]);
    }

    #[test]
    fn empty_text_is_one_empty_page() {
        assert_eq!(paginate("", 28, 17), vec![String::new()]);
    }

    #[test]
    fn pages_reserve_a_line() {
        // 1 line per word at width 3, 3 content lines per page.
        let pages = paginate("aaa bbb ccc ddd eee fff ggg", 3, 4);
        assert_eq!(pages, vec!["aaa\nbbb\nccc", "ddd\neee\nfff", "ggg"]);
    }

    #[test]
    fn last_line_never_opens_an_empty_page() {
        let pages = paginate("aaa bbb ccc", 3, 4);
        assert_eq!(pages, vec!["aaa\nbbb\nccc"]);
    }

    #[test]
    fn pages_are_trimmed() {
        let pages = paginate("\nhello\n", 28, 17);
        assert_eq!(pages, vec!["hello"]);
    }
}
