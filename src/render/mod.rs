//! Renders the listing set into the static HTML page.

use crate::filters::ListingSet;
use crate::paapi::Listing;
use chrono::{DateTime, Utc};

/// Page template; `{{name}}` placeholders are filled by [`PageRenderer`].
const TEMPLATE: &str = include_str!("index.html");

/// Row shown when nothing is under the ceiling.
pub const EMPTY_ROW: &str =
    r#"<tr><td colspan="4">No items under the price ceiling right now.</td></tr>"#;

/// Format of the "Last build" stamp.
pub const UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// A rendered HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    html: String,
}

impl RenderedPage {
    pub fn as_str(&self) -> &str {
        &self.html
    }
}

/// Fills the fixed template from a [`ListingSet`].
pub struct PageRenderer {
    title: String,
    description: String,
    partner_tag: String,
}

impl PageRenderer {
    /// `partner_tag` may be empty, in which case links are left as the API gave them.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        partner_tag: impl Into<String>,
    ) -> Self {
        Self { title: title.into(), description: description.into(), partner_tag: partner_tag.into() }
    }

    /// Renders with the current time as the build stamp.
    pub fn render(&self, listings: &ListingSet) -> RenderedPage {
        self.render_at(listings, Utc::now())
    }

    /// Renders with an explicit build stamp. Same input, same bytes.
    pub fn render_at(&self, listings: &ListingSet, updated: DateTime<Utc>) -> RenderedPage {
        let updated = updated.format(UPDATED_FORMAT).to_string();
        let rows = self.rows(listings);

        let html = fill(TEMPLATE, |name| match name {
            "title" => Some(escape_html(&self.title)),
            "description" => Some(escape_html(&self.description)),
            "updated" => Some(escape_html(&updated)),
            "rows" => Some(rows.clone()),
            _ => None,
        });

        RenderedPage { html }
    }

    fn rows(&self, listings: &ListingSet) -> String {
        if listings.is_empty() {
            return EMPTY_ROW.to_string();
        }

        listings.iter().map(|listing| self.row(listing)).collect::<Vec<_>>().join("\n")
    }

    fn row(&self, listing: &Listing) -> String {
        let url = escape_html(&affiliate_url(&listing.url, &self.partner_tag));
        let title = escape_html(&listing.title);
        let price = escape_html(&listing.price.display_amount());

        let img = match &listing.image_url {
            Some(src) => format!(
                r#"<img src="{}" alt="" loading="lazy" width="48" height="48" style="object-fit:contain;">"#,
                escape_html(src)
            ),
            None => String::new(),
        };

        format!(
            concat!(
                "<tr>",
                r#"<td class="img">{img}</td>"#,
                r#"<td class="title"><a href="{url}" rel="nofollow sponsored">{title}</a></td>"#,
                r#"<td class="price">{price}</td>"#,
                r#"<td class="buy"><a class="btn" href="{url}" rel="nofollow sponsored">View on Amazon</a></td>"#,
                "</tr>"
            ),
            img = img,
            url = url,
            title = title,
            price = price
        )
    }
}

/// Replaces each `{{name}}` in one pass, so substituted text is never re-scanned.
/// Unknown placeholders are kept verbatim.
fn fill(template: &str, value: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        match after.find("}}") {
            Some(end) => {
                let name = &after[..end];
                match value(name) {
                    Some(v) => out.push_str(&v),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

/// Escapes text for use in element content and double- or single-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Adds `tag=<partner_tag>` to a product URL unless it already carries one.
pub fn affiliate_url(url: &str, partner_tag: &str) -> String {
    if partner_tag.is_empty() {
        return url.to_string();
    }

    let (base, fragment) = match url.find('#') {
        Some(idx) => url.split_at(idx),
        None => (url, ""),
    };

    let has_tag = base
        .split_once('?')
        .is_some_and(|(_, query)| query.split('&').any(|pair| pair.starts_with("tag=")));
    if has_tag {
        return url.to_string();
    }

    let separator = match base.split_once('?') {
        Some((_, "")) => "",
        Some(_) => "&",
        None => "?",
    };

    format!("{}{}tag={}{}", base, separator, urlencoding::encode(partner_tag), fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterChainBuilder;
    use crate::paapi::{Candidate, Price};
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 6, 5, 0).unwrap()
    }

    fn renderer() -> PageRenderer {
        PageRenderer::new("DJ headphones under $100", "Cheapest first.", "deals-20")
    }

    fn candidate(asin: &str, title: &str, cents: i64, image: Option<&str>) -> Candidate {
        Candidate {
            asin: asin.to_string(),
            title: title.to_string(),
            price: Some(Price {
                amount: Decimal::new(cents, 2),
                currency: "USD".to_string(),
                display: Some(format!("${}", Decimal::new(cents, 2))),
            }),
            url: format!("https://www.amazon.com/dp/{}", asin),
            image_url: image.map(String::from),
        }
    }

    fn set(candidates: Vec<Candidate>) -> ListingSet {
        let chain = FilterChainBuilder::new(Decimal::new(100, 0)).build();
        ListingSet::select(candidates, &chain)
    }

    #[test]
    fn test_render_is_deterministic() {
        let listings = set(vec![
            candidate("B1", "Alpha", 4500, Some("https://img/a.jpg")),
            candidate("B2", "Beta", 9999, None),
        ]);

        let a = renderer().render_at(&listings, stamp());
        let b = renderer().render_at(&listings, stamp());
        assert_eq!(a, b);
        assert!(a.as_str().contains("Last build: 2026-10-18 06:05 UTC"));
    }

    #[test]
    fn test_rows_in_set_order() {
        let listings = set(vec![
            candidate("B2", "Pricier", 9999, None),
            candidate("B1", "Cheaper", 4500, None),
        ]);

        let html = renderer().render_at(&listings, stamp()).as_str().to_string();
        let cheaper = html.find("Cheaper").unwrap();
        let pricier = html.find("Pricier").unwrap();
        assert!(cheaper < pricier);
        assert_eq!(html.matches("<tr><td class=\"img\">").count(), 2);
        assert!(html.contains(r#"<td class="price">$45.00</td>"#));
    }

    #[test]
    fn test_row_contents() {
        let listings = set(vec![candidate("B1", "Alpha", 4500, Some("https://img/a.jpg"))]);
        let html = renderer().render_at(&listings, stamp()).as_str().to_string();

        assert!(html.contains(r#"<img src="https://img/a.jpg""#));
        assert!(html.contains(r#"href="https://www.amazon.com/dp/B1?tag=deals-20" rel="nofollow sponsored">Alpha</a>"#));
        assert!(html.contains("View on Amazon"));
        assert!(!html.contains(EMPTY_ROW));
    }

    #[test]
    fn test_missing_thumbnail_leaves_cell_empty() {
        let listings = set(vec![candidate("B1", "Alpha", 4500, None)]);
        let html = renderer().render_at(&listings, stamp()).as_str().to_string();
        assert!(html.contains(r#"<td class="img"></td>"#));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_empty_set_renders_placeholder_row() {
        let html = renderer().render_at(&ListingSet::default(), stamp()).as_str().to_string();
        assert!(html.contains("<tbody>"));
        assert!(html.contains(EMPTY_ROW));
        assert!(html.contains("</table>"));
    }

    #[test]
    fn test_values_are_escaped() {
        let listings =
            set(vec![candidate("B1", r#"<script>alert("x")</script> & 'co'"#, 4500, None)]);
        let page = PageRenderer::new("A & B <C>", "say \"hi\"", "deals-20");
        let html = page.render_at(&listings, stamp()).as_str().to_string();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#39;co&#39;"));
        assert!(html.contains("<title>A &amp; B &lt;C&gt;</title>"));
        assert!(html.contains(r#"content="say &quot;hi&quot;""#));
    }

    #[test]
    fn test_placeholder_text_in_values_not_expanded() {
        let listings = set(vec![candidate("B1", "{{title}} {{rows}}", 4500, None)]);
        let html = renderer().render_at(&listings, stamp()).as_str().to_string();
        assert!(html.contains(">{{title}} {{rows}}</a>"));
        assert_eq!(html.matches("<title>DJ headphones under $100</title>").count(), 1);
    }

    #[test]
    fn test_no_placeholders_left() {
        let html = renderer().render_at(&ListingSet::default(), stamp()).as_str().to_string();
        assert!(!html.contains("{{"));
        assert!(html.contains("Affiliate disclosure"));
    }

    #[test]
    fn test_fill_unknown_and_unclosed() {
        let out = fill("a {{x}} b {{y}} c {{z", |name| (name == "x").then(|| "X".to_string()));
        assert_eq!(out, "a X b {{y}} c {{z");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn test_affiliate_url() {
        assert_eq!(
            affiliate_url("https://www.amazon.com/dp/B1", "deals-20"),
            "https://www.amazon.com/dp/B1?tag=deals-20"
        );
        assert_eq!(
            affiliate_url("https://www.amazon.com/dp/B1?psc=1", "deals-20"),
            "https://www.amazon.com/dp/B1?psc=1&tag=deals-20"
        );
        assert_eq!(
            affiliate_url("https://www.amazon.com/dp/B1?", "deals-20"),
            "https://www.amazon.com/dp/B1?tag=deals-20"
        );
        assert_eq!(
            affiliate_url("https://www.amazon.com/dp/B1#reviews", "deals-20"),
            "https://www.amazon.com/dp/B1?tag=deals-20#reviews"
        );
    }

    #[test]
    fn test_affiliate_url_existing_tag_kept() {
        let url = "https://www.amazon.com/dp/B1?tag=deals-20&linkCode=osi";
        assert_eq!(affiliate_url(url, "other-20"), url);
    }

    #[test]
    fn test_affiliate_url_encodes_and_skips_empty() {
        assert_eq!(
            affiliate_url("https://www.amazon.com/dp/B1", "a b&c"),
            "https://www.amazon.com/dp/B1?tag=a%20b%26c"
        );
        assert_eq!(affiliate_url("https://www.amazon.com/dp/B1", ""), "https://www.amazon.com/dp/B1");
    }
}
