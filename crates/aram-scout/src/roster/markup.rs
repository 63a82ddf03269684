// Named markup queries over a parsed HTML5 document.

use scraper::{ElementRef, Html};

/// Elements that can label a following list.
const TERM_ELEMENTS: &[&str] = &["dt", "h1", "h2", "h3", "h4", "h5", "h6"];

/// First term or heading whose text equals `label` (whitespace normalized,
/// ASCII case-insensitive).
pub fn find_term<'a>(doc: &'a Html, label: &str) -> Option<ElementRef<'a>> {
    let wanted = normalize_ws(label);
    doc.tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| TERM_ELEMENTS.contains(&el.value().name()))
        .find(|el| text_content(*el).eq_ignore_ascii_case(&wanted))
}

/// First `<ol>` that starts after `term` ends, in document order. Lists
/// inside the term itself do not count.
pub fn ordered_list_after<'a>(doc: &'a Html, term: ElementRef<'a>) -> Option<ElementRef<'a>> {
    let term_node = *term;
    let term_nodes = term_node.descendants().count();
    doc.tree
        .root()
        .descendants()
        .skip_while(|node| node.id() != term_node.id())
        .skip(term_nodes)
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "ol")
}

/// Direct `<li>` children of a list. Items of nested lists stay inside their
/// parent item.
pub fn list_items<'a>(list: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    list.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "li")
}

/// First value of `attr` on `item` or any element inside it. Attribute names
/// are matched ASCII case-insensitively; values come back entity-decoded.
pub fn first_attribute<'a>(item: ElementRef<'a>, attr: &str) -> Option<&'a str> {
    let attr = attr.to_ascii_lowercase();
    item.descendants()
        .filter_map(ElementRef::wrap)
        .find_map(|el| el.value().attr(&attr))
}

/// Text of an element with whitespace collapsed.
pub fn text_content(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
