//! Shared proptest strategies for unit tests.

use proptest::prelude::*;

/// Markup building blocks: well-formed and broken tags, comments, dangerous
/// containers, and a few bare delimiters.
const FRAGMENTS: &[&str] = &[
    "<b>",
    "</b>",
    "<I>",
    "</i>",
    "<p class=\"note\">",
    "</p>",
    "<br/>",
    "<img src=\"a.png\" onerror=\"alert(1)\"/>",
    "<a href=\"http://x\" onclick=\"evil()\">",
    "</a>",
    "<span title='it\"s'>",
    "<script>",
    "</script>",
    "<SCRIPT type=text/javascript>",
    "<scr",
    "ipt>",
    "<!--",
    "-->",
    "<!-- note -->",
    "<iframe src=\"x\">",
    "</iframe>",
    "<style>",
    "</style>",
    "<object data=x>",
    "<embed src=x>",
    "<form action=x>",
    "</form>",
    "<svg onload=alert(1)>",
    "<zz>",
    "<>",
    "< >",
    "<",
    ">",
    "<div",
    "Hello",
    "alert(1)",
    "&amp;",
    " ",
    "\n",
];

/// One markup fragment or a short run of digits and punctuation.
pub(crate) fn arb_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => prop::sample::select(FRAGMENTS).prop_map(|s| s.to_string()),
        1 => "[0-9 .,!]{0,8}",
    ]
}

/// Concatenation of up to 16 fragments.
pub(crate) fn arb_markup() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_fragment(), 0..16).prop_map(|parts| parts.concat())
}

/// Arbitrary text containing no `<`.
pub(crate) fn arb_text() -> impl Strategy<Value = String> {
    "[^<]{0,64}"
}
