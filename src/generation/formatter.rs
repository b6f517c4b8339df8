//! A4 print formatting.
//!
//! Wraps a finished plain-text document in self-contained markup suitable
//! for screen preview or PDF rasterization: A4 page size, print margins,
//! running header and footer carrying the title and policy id. Pure
//! formatting; a final guard keeps placeholder syntax from leaking back in
//! through the title or identifier.

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Titles and identifiers are interpolated into the markup, so any
/// template syntax they carry is removed before embedding.
fn strip_placeholder_syntax(input: &str) -> String {
    input.replace("{{", "").replace("}}", "")
}

/// Wrap the document text in print-ready HTML.
pub fn format_print_document(text: &str, title: &str, policy_id: Option<&str>) -> String {
    let safe_title = escape_html(&strip_placeholder_syntax(title));
    let safe_policy_id = policy_id
        .map(|id| escape_html(&strip_placeholder_syntax(id)))
        .unwrap_or_default();

    let body: String = text
        .split("\n\n")
        .filter(|paragraph| !paragraph.trim().is_empty())
        .map(|paragraph| format!("      <p>{}</p>\n", escape_html(paragraph.trim())))
        .collect();

    let footer_line = if safe_policy_id.is_empty() {
        safe_title.clone()
    } else {
        format!("{} — {}", safe_title, safe_policy_id)
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <style>
    @page {{
      size: A4;
      margin: 25mm 20mm 25mm 20mm;
    }}
    body {{
      font-family: "Times New Roman", Georgia, serif;
      font-size: 11pt;
      line-height: 1.5;
      color: #111;
      max-width: 170mm;
      margin: 0 auto;
    }}
    header {{
      border-bottom: 1px solid #444;
      padding-bottom: 4mm;
      margin-bottom: 8mm;
    }}
    header h1 {{
      font-size: 14pt;
      margin: 0;
    }}
    header .policy-id {{
      font-size: 9pt;
      color: #555;
    }}
    p {{
      margin: 0 0 4mm 0;
      white-space: pre-wrap;
      page-break-inside: avoid;
    }}
    footer {{
      border-top: 1px solid #444;
      margin-top: 8mm;
      padding-top: 2mm;
      font-size: 8pt;
      color: #555;
    }}
    @media print {{
      footer {{
        position: fixed;
        bottom: 0;
        left: 0;
        right: 0;
      }}
    }}
  </style>
</head>
<body>
  <header>
    <h1>{title}</h1>
    <div class="policy-id">{policy_id}</div>
  </header>
  <main>
{body}  </main>
  <footer>{footer}</footer>
</body>
</html>
"#,
        title = safe_title,
        policy_id = safe_policy_id,
        body = body,
        footer = footer_line,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_policy_id_appear() {
        let out = format_print_document("Body text.", "Access Control Policy", Some("HIPAA-ACC-001"));
        assert!(out.contains("<h1>Access Control Policy</h1>"));
        assert!(out.contains("HIPAA-ACC-001"));
        assert!(out.contains("<p>Body text.</p>"));
    }

    #[test]
    fn test_no_policy_id_leaves_footer_title_only() {
        let out = format_print_document("x", "Letter", None);
        assert!(out.contains("<footer>Letter</footer>"));
    }

    #[test]
    fn test_placeholder_syntax_in_title_is_stripped() {
        let out = format_print_document("Body.", "Bad {{TOKEN}} Title", Some("{{ID}}"));
        assert!(!out.contains("{{"));
        assert!(out.contains("Bad TOKEN Title"));
    }

    #[test]
    fn test_html_is_escaped() {
        let out = format_print_document("a < b & c", "T<script>", None);
        assert!(out.contains("a &lt; b &amp; c"));
        assert!(out.contains("T&lt;script&gt;"));
        assert!(!out.contains("<script>"));
    }

    #[test]
    fn test_paragraph_split_on_blank_lines() {
        let out = format_print_document("one\n\ntwo\n\nthree", "T", None);
        assert_eq!(out.matches("<p>").count(), 3);
    }
}
