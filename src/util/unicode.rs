use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Ellipsis appended to shortened descriptions
const ELLIPSIS: char = '\u{2026}';

/// Width of a string in terminal cells
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

/// Shorten `s` to at most `max_cells` terminal cells, ending in `…` when
/// anything was cut. Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }

    let budget = max_cells - 1;
    let mut used = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let w = grapheme_width(g);
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push(ELLIPSIS);
    out
}

/// Width of one grapheme cluster. Tabs count as 4.
fn grapheme_width(g: &str) -> usize {
    if g == "\t" {
        return 4;
    }
    UnicodeWidthStr::width(g)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_ascii_and_cjk() {
        assert_eq!(display_width("Buy milk"), 8);
        assert_eq!(display_width("牛乳を買う"), 10);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn width_combining_mark() {
        assert_eq!(display_width("e\u{0301}"), 1);
    }

    #[test]
    fn truncate_fits() {
        assert_eq!(truncate_to_width("Buy milk", 8), "Buy milk");
        assert_eq!(truncate_to_width("Buy milk", 20), "Buy milk");
    }

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_to_width("Buy milk and eggs", 8), "Buy mil…");
    }

    #[test]
    fn truncate_wide_chars_do_not_overflow() {
        // 6 cells available, one reserved for the ellipsis: two CJK chars fit
        assert_eq!(truncate_to_width("牛乳を買う", 6), "牛乳…");
    }

    #[test]
    fn truncate_degenerate_widths() {
        assert_eq!(truncate_to_width("Buy milk", 0), "");
        assert_eq!(truncate_to_width("Buy milk", 1), "…");
    }
}
