/*!
 * Inline style markup handling for subtitle dialogue.
 *
 * SRT dialogue can carry a small set of HTML-style tags (`<i>`, `<b>`, ...).
 * Sending tagged text straight to a translation API tends to come back with
 * the tags mangled or translated, so tagged lines are stripped down to their
 * text content before the request and re-wrapped afterwards.
 */

/// Style tags that appear in SRT dialogue, in match priority order
pub const STYLE_TAGS: [&str; 5] = ["i", "b", "u", "em", "strong"];

/// A dialogue line split into translatable text and its surrounding style tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    /// Text content with every occurrence of the tag removed
    pub content: String,
    /// Opening form of the matched tag ("<i>")
    pub open_tag: String,
    /// Closing form of the matched tag ("</i>")
    pub close_tag: String,
}

impl StyledLine {
    /// Re-wrap translated content in the tag pair removed by [`split_style_tag`]
    pub fn restore(&self, translated: &str) -> String {
        format!("{}{}{}", self.open_tag, translated, self.close_tag)
    }
}

/// True when a line looks like it carries closed inline markup
///
/// The probe is a closing-tag marker rather than a bare `<`, so dialogue like
/// "I <3 you" is left alone.
pub fn has_style_markup(text: &str) -> bool {
    text.contains("</")
}

/// Split a tagged dialogue line into plain content and its style tag
///
/// The first tag from [`STYLE_TAGS`] whose opening form appears in the line
/// wins; every occurrence of that tag, opening and closing, is removed from
/// the content. Returns `None` when no known tag matches, in which case the
/// caller should translate the line verbatim.
pub fn split_style_tag(text: &str) -> Option<StyledLine> {
    for tag in STYLE_TAGS {
        let open_tag = format!("<{}>", tag);
        if text.contains(&open_tag) {
            let close_tag = format!("</{}>", tag);
            let content = text.replace(&open_tag, "").replace(&close_tag, "");
            return Some(StyledLine {
                content,
                open_tag,
                close_tag,
            });
        }
    }
    None
}
