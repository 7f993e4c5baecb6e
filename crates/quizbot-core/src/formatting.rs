//! Formatting utilities (template Markdown → Telegram HTML).

use regex::Regex;

/// Placeholder replaced with the (escaped) user display name.
pub const NAME_PLACEHOLDER: &str = "{name}";

const NAME_SENTINEL: &str = "\0NAME\0";

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render a greeting template to Telegram HTML.
///
/// The template is a small Markdown subset (`**bold**`, `*italic*` or `__italic__`,
/// `` `code` ``, `[text](url)`). Template text is escaped before conversion and `name` is
/// escaped before it is substituted, so a display name can never add markup.
pub fn render_template(template: &str, name: &str) -> String {
    let marked = template.replace(NAME_PLACEHOLDER, NAME_SENTINEL);
    convert_markdown_to_html(&marked).replace(NAME_SENTINEL, &escape_html(name))
}

/// Convert a minimal markdown subset to Telegram-compatible HTML.
pub fn convert_markdown_to_html(input: &str) -> String {
    let (text, inline_codes) = extract_inline_codes(input);
    let text = escape_html(&text);

    // Line-oriented transforms (avoid cross-line emphasis bugs).
    let mut text = text
        .split('\n')
        .map(|line| {
            let l = replace_delimited(line, "**", "<b>", "</b>");
            let l = replace_delimited(&l, "__", "<i>", "</i>");
            replace_single_star(&l, "<i>", "</i>")
        })
        .collect::<Vec<_>>()
        .join("\n");

    // Links: [text](url) -> <a href="url">text</a>
    let link_re = Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").expect("valid regex");
    text = link_re
        .replace_all(&text, r#"<a href="$2">$1</a>"#)
        .to_string();

    for (i, code) in inline_codes.iter().enumerate() {
        text = text.replace(
            &format!("\0INLINECODE{i}\0"),
            &format!("<code>{}</code>", escape_html(code)),
        );
    }

    text
}

fn extract_inline_codes(input: &str) -> (String, Vec<String>) {
    let mut codes = Vec::new();
    let mut out = String::new();

    let mut i = 0usize;
    while let Some(rel) = input[i..].find('`') {
        let start = i + rel;
        out.push_str(&input[i..start]);

        let content_start = start + 1;
        if let Some(end_rel) = input[content_start..].find('`') {
            let end = content_start + end_rel;
            let idx = codes.len();
            codes.push(input[content_start..end].to_string());
            out.push_str(&format!("\0INLINECODE{idx}\0"));
            i = end + 1;
            continue;
        }

        // Unclosed: append the rest and stop.
        out.push_str(&input[start..]);
        return (out, codes);
    }

    out.push_str(&input[i..]);
    (out, codes)
}

fn replace_delimited(text: &str, delim: &str, open: &str, close: &str) -> String {
    let mut out = String::new();
    let mut i = 0usize;
    while let Some(rel) = text[i..].find(delim) {
        let start = i + rel;
        out.push_str(&text[i..start]);
        let content_start = start + delim.len();
        if let Some(end_rel) = text[content_start..].find(delim) {
            let end = content_start + end_rel;
            out.push_str(open);
            out.push_str(&text[content_start..end]);
            out.push_str(close);
            i = end + delim.len();
            continue;
        }
        out.push_str(&text[start..]);
        return out;
    }
    out.push_str(&text[i..]);
    out
}

/// `*x*` on one line; runs of two or more stars (an unclosed `**`) stay literal.
fn replace_single_star(line: &str, open: &str, close: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let is_single = |k: usize| {
        chars[k] == '*'
            && (k == 0 || chars[k - 1] != '*')
            && chars.get(k + 1).map_or(true, |c| *c != '*')
    };

    let mut out = String::new();
    let mut i = 0usize;
    while i < chars.len() {
        if is_single(i) {
            if let Some(j) = (i + 1..chars.len()).find(|&k| is_single(k)) {
                if j > i + 1 {
                    out.push_str(open);
                    out.extend(&chars[i + 1..j]);
                    out.push_str(close);
                    i = j + 1;
                    continue;
                }
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}
