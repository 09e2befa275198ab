//! Text-level removal of comments and dangerous containers.
//!
//! These passes run before the tag scanner so that nothing inside a comment
//! or a `<script>` body can be reinterpreted as markup later.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{SanitizeReport, DANGEROUS_CONTAINERS};

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is valid"));

/// One pattern per container name; the regex engine has no backreferences
/// to pair an opening tag with its own closing tag.
static CONTAINERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DANGEROUS_CONTAINERS
        .iter()
        .map(|name| {
            Regex::new(&format!(r"(?is)<{name}\b[^>]*>.*?</{name}\b[^>]*>"))
                .expect("container pattern is valid")
        })
        .collect()
});

/// Matches a dangerous container opener with no `>` anywhere after it,
/// through the end of the text.
static UNCLOSED_CONTAINER: LazyLock<Regex> = LazyLock::new(|| {
    let names = DANGEROUS_CONTAINERS.join("|");
    Regex::new(&format!(r"(?is)<(?:{names})[^>]*$"))
        .expect("unclosed container pattern is valid")
});

/// Removes comments, then dangerous container spans, each in one pass.
///
/// Comments go first so that a container split by a comment
/// (`<scr<!-- -->ipt>`) is reassembled and then removed. A trailing
/// container opener that never closes is removed along with everything
/// after it.
pub(crate) fn strip_blocks<'a>(input: &'a str, report: &mut SanitizeReport) -> Cow<'a, str> {
    let mut text = Cow::Borrowed(input);

    if let Some(stripped) = remove_all(&COMMENT, &text, &mut report.comments_removed) {
        text = Cow::Owned(stripped);
    }
    for pattern in CONTAINERS.iter().chain([&*UNCLOSED_CONTAINER]) {
        if let Some(stripped) = remove_all(pattern, &text, &mut report.containers_removed) {
            text = Cow::Owned(stripped);
        }
    }

    text
}

fn remove_all(pattern: &Regex, text: &str, removed: &mut usize) -> Option<String> {
    let mut count = 0;
    let replaced = pattern.replace_all(text, |_: &Captures<'_>| {
        count += 1;
        ""
    });
    if count == 0 {
        return None;
    }
    *removed += count;
    Some(replaced.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(input: &str) -> (String, SanitizeReport) {
        let mut report = SanitizeReport::default();
        let out = strip_blocks(input, &mut report).into_owned();
        (out, report)
    }

    #[test]
    fn removes_comments_across_lines() {
        let (out, report) = strip("a<!-- one\ntwo -->b<!---->c");

        assert_eq!(out, "abc");
        assert_eq!(report.comments_removed, 2);
    }

    #[test]
    fn comment_match_is_not_greedy() {
        let (out, _) = strip("<!-- x -->keep<!-- y -->");
        assert_eq!(out, "keep");
    }

    #[test]
    fn unterminated_comment_is_left_alone() {
        let (out, report) = strip("before <!-- never closed");

        assert_eq!(out, "before <!-- never closed");
        assert_eq!(report.comments_removed, 0);
    }

    #[test]
    fn removes_each_dangerous_container_with_body() {
        for name in DANGEROUS_CONTAINERS {
            let input = format!("x<{name} a=\"1\">payload</{name}>y");
            let (out, report) = strip(&input);

            assert_eq!(out, "xy", "{name}");
            assert_eq!(report.containers_removed, 1);
        }
    }

    #[test]
    fn container_match_is_case_insensitive_and_multiline() {
        let input = "<ScRiPt type='text/javascript'>\nalert(1)\n</SCRIPT >after";
        let (out, _) = strip(input);
        assert_eq!(out, "after");
    }

    #[test]
    fn container_match_is_not_greedy() {
        let (out, report) = strip("<style>a</style>keep<style>b</style>");

        assert_eq!(out, "keep");
        assert_eq!(report.containers_removed, 2);
    }

    #[test]
    fn closing_tag_with_trailing_junk_still_closes() {
        let (out, _) = strip("<form>f</form foo=bar>rest");
        assert_eq!(out, "rest");
    }

    #[test]
    fn longer_names_are_not_containers() {
        let (out, report) = strip("<scripted>x</scripted><formula>y</formula>");

        assert_eq!(out, "<scripted>x</scripted><formula>y</formula>");
        assert_eq!(report.containers_removed, 0);
    }

    #[test]
    fn unterminated_container_is_left_for_the_scanner() {
        let (out, _) = strip("<script>alert(1)");
        assert_eq!(out, "<script>alert(1)");
    }

    #[test]
    fn comment_split_container_is_reassembled_and_removed() {
        let (out, report) = strip("<scr<!-- -->ipt>alert(1)</script>ok");

        assert_eq!(out, "ok");
        assert_eq!(report.comments_removed, 1);
        assert_eq!(report.containers_removed, 1);
    }

    #[test]
    fn container_split_container_leaves_plain_tags() {
        // The reassembled `<script>` is left for the scanner, which drops it.
        let (out, report) = strip("<scr<style>x</style>ipt>alert(1)</script>ok");

        assert_eq!(out, "<script>alert(1)</script>ok");
        assert_eq!(report.containers_removed, 1);
    }

    #[test]
    fn unclosed_container_opener_is_removed_to_end() {
        let (out, report) = strip("hi <script src=//evil.example/x.js ");

        assert_eq!(out, "hi ");
        assert_eq!(report.containers_removed, 1);
    }

    #[test]
    fn unclosed_opener_match_is_a_prefix_match() {
        for input in ["a<IFRAME", "a<form\naction=x", "a<scripted x", "a<embed"] {
            let (out, _) = strip(input);
            assert_eq!(out, "a", "{input:?}");
        }
    }

    #[test]
    fn unclosed_opener_hidden_by_comment_is_removed() {
        let (out, _) = strip("x<scr<!-- -->ipt src=y");
        assert_eq!(out, "x");
    }

    #[test]
    fn opener_followed_by_close_bracket_is_left_for_the_scanner() {
        let (out, report) = strip("<script src=x <b>bold</b>");

        assert_eq!(out, "<script src=x <b>bold</b>");
        assert_eq!(report.containers_removed, 0);
    }

    #[test]
    fn nested_comment_openers_are_stripped_in_one_pass() {
        let k = 4;
        let input = format!("{}<!-- -->{}", "<!".repeat(k), "-- -->".repeat(k));
        let (out, report) = strip(&input);

        // One pass removes the innermost comment; the splice is left for the scanner.
        assert_eq!(report.comments_removed, 1);
        assert_eq!(out, format!("{}{}", "<!".repeat(k), "-- -->".repeat(k)));
    }

    #[test]
    fn nested_containers_are_removed() {
        let (out, _) = strip("<iframe><script>x</script></iframe>done");
        assert_eq!(out, "done");
    }

    #[test]
    fn untouched_input_is_borrowed() {
        let mut report = SanitizeReport::default();
        let out = strip_blocks("<b>plain</b>", &mut report);

        assert!(matches!(out, Cow::Borrowed(_)));
    }
}
