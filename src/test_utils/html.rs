use scraper::Html;

use crate::dom::Element;

/// Parse the outer HTML of `element` as a fragment.
pub(crate) fn parse_fragment(element: &Element) -> Html {
    Html::parse_fragment(&element.outer_html())
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}
