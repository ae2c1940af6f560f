use crate::formatter::{CardDescriptor, HtmlContent};

/// Escape text for use in HTML element content and double-quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render one card as an `<article class="card">` fragment
pub fn card_html(card: &CardDescriptor) -> HtmlContent {
    let language = card
        .language
        .as_deref()
        .map(|language| format!("<span>{}</span>", escape_html(language)))
        .unwrap_or_default();
    let stars = card.stars.as_deref().map(escape_html).unwrap_or_default();
    let forks = card.forks.as_deref().map(escape_html).unwrap_or_default();

    let mut content = String::new();
    content.push_str("<article class=\"card\">\n");
    content.push_str(&format!(
        "  <div class=\"name\">{}</div>\n",
        escape_html(&card.title)
    ));
    content.push_str(&format!(
        "  <div class=\"desc\">{}</div>\n",
        escape_html(&card.description)
    ));
    content.push_str(&format!(
        "  <div class=\"meta\">{} <span>{}</span> <span>{}</span></div>\n",
        language, stars, forks
    ));
    content.push_str(&format!(
        "  <div class=\"links\"><a class=\"btn\" href=\"{}\" target=\"_blank\" rel=\"noreferrer\">View on GitHub</a></div>\n",
        escape_html(&card.url)
    ));
    content.push_str("</article>\n");

    HtmlContent(content)
}

/// Render a card grid, or the placeholder paragraph when `cards` is empty
pub fn cards_html(cards: &[CardDescriptor], empty_message: &str) -> HtmlContent {
    if cards.is_empty() {
        return placeholder_html(empty_message);
    }
    HtmlContent(cards.iter().map(|card| card_html(card).0).collect())
}

/// Paragraph substituted for the card grid when loading fails
pub fn placeholder_html(message: &str) -> HtmlContent {
    HtmlContent(format!("<p class=\"sub\">{}</p>\n", escape_html(message)))
}
