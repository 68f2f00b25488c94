use super::*;

#[test]
fn renders_common_markdown() {
    let html = render_markdown("## Plan\n\n1. **Sell** VTI\n2. Buy *BND*");
    assert!(html.contains("<h2>Plan</h2>"), "{html}");
    assert!(html.contains("<li><strong>Sell</strong> VTI</li>"), "{html}");
    assert!(html.contains("<em>BND</em>"), "{html}");
}

#[test]
fn renders_tables() {
    let html = render_markdown("| Symbol | Action |\n|---|---|\n| VTI | SELL |\n");
    assert!(html.contains("<table>"), "{html}");
    assert!(html.contains("<td>SELL</td>"), "{html}");
}

#[test]
fn raw_html_from_the_server_is_escaped() {
    let html = render_markdown("Hello <img src=x onerror=alert(1)> there");
    assert!(!html.contains("<img"), "{html}");
    assert!(html.contains("&lt;img"), "{html}");

    let block = render_markdown("<script>alert(1)</script>\n");
    assert!(!block.contains("<script>"), "{block}");
}

#[test]
fn script_links_are_neutralised() {
    let html = render_markdown("[click](javascript:alert(1)) and [docs](https://example.com)");
    assert!(!html.contains("javascript:"), "{html}");
    assert!(html.contains("href=\"#\""), "{html}");
    assert!(html.contains("href=\"https://example.com\""), "{html}");
}

#[test]
fn escapes_html_special_characters() {
    assert_eq!(
        escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
        "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
    );
    assert_eq!(escape_html("plain"), "plain");
}
