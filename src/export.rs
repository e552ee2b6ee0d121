//! Result export: highlighting and the HTML report / 结果导出
//!
//! Every term of `matched_terms_set` is wrapped in a highlight span. Terms are
//! tried longest first in a single pass so a short variant never splits a
//! longer one that contains it.

use std::path::Path;

use regex::{Regex, RegexBuilder};

use crate::error::Result;
use crate::extract::strip_timestamps;
use crate::models::SearchRecord;

const HIGHLIGHT_OPEN: &str = r#"<span class="highlight">"#;
const HIGHLIGHT_CLOSE: &str = "</span>";

const STYLE: &str = "body{font-family:sans-serif;margin:1.5em}\
table{border-collapse:collapse;width:100%}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:left;vertical-align:top}\
th{background:#f0f0f0}\
.highlight{background:#ffe066;font-weight:bold}";

/// Escapes HTML entities and drops control characters / HTML 转义
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c if c.is_control() && c != '\n' && c != '\t' => {}
            _ => out.push(c),
        }
    }
    out
}

/// One alternation of the escaped terms, longest first.
fn term_pattern(terms: &[String], case_sensitive: bool) -> Option<Regex> {
    let mut terms: Vec<&str> = terms.iter().map(String::as_str).filter(|t| !t.is_empty()).collect();
    if terms.is_empty() {
        return None;
    }
    terms.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));
    terms.dedup();
    let alternation = terms.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
    match RegexBuilder::new(&alternation).case_insensitive(!case_sensitive).build() {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!("Highlight pattern rejected: {}", e);
            None
        }
    }
}

/// Escapes `text` and wraps every term occurrence in a highlight span / 高亮关键词
pub fn highlight(text: &str, terms: &[String], case_sensitive: bool) -> String {
    let Some(re) = term_pattern(terms, case_sensitive) else {
        return escape_html(text);
    };
    highlight_with(&re, text)
}

fn highlight_with(re: &Regex, text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 32);
    let mut last = 0;
    for m in re.find_iter(text) {
        out.push_str(&escape_html(&text[last..m.start()]));
        out.push_str(HIGHLIGHT_OPEN);
        out.push_str(&escape_html(m.as_str()));
        out.push_str(HIGHLIGHT_CLOSE);
        last = m.end();
    }
    out.push_str(&escape_html(&text[last..]));
    out
}

/// Renders a record as a standalone HTML page with one table row per match / 生成 HTML 报告
pub fn to_html(record: &SearchRecord) -> String {
    let re = term_pattern(&record.matched_terms_set, record.case_sensitive);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n",
        escape_html(&record.raw_keyword),
        STYLE
    ));
    html.push_str(&format!(
        "<h2>{}</h2>\n<p>{} &rarr; {} [{}] &middot; {} matches</p>\n",
        escape_html(&record.raw_keyword),
        escape_html(&record.raw_keyword),
        escape_html(&record.lemma),
        escape_html(record.pos.display_name()),
        record.search_results.len()
    ));
    html.push_str("<table>\n<tr><th>Episode</th><th>Time</th><th>Content</th><th>Line</th><th>File</th></tr>\n");

    for m in &record.search_results {
        // The time axis has its own column; drop inline stamps from the text.
        let content = strip_timestamps(&m.content);
        let content = match &re {
            Some(re) => highlight_with(re, &content),
            None => escape_html(&content),
        };
        let line_no = match m.page {
            Some(page) => format!("{} (p.{})", m.line_no, page),
            None => m.line_no.to_string(),
        };
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&m.episode),
            escape_html(&m.time_axis),
            content.replace('\n', "<br>"),
            line_no,
            escape_html(&m.file_path)
        ));
    }

    html.push_str("</table>\n</body>\n</html>\n");
    html
}

/// Writes the HTML report / 写出 HTML 报告
pub fn write_html(record: &SearchRecord, path: &Path) -> Result<()> {
    std::fs::write(path, to_html(record))?;
    tracing::info!("HTML report written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Line, Match, SearchMode};

    fn terms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_longest_term_first() {
        let out = highlight("나는 속았어요.", &terms(&["속", "속았어요", "속다"]), true);
        assert_eq!(out, r#"나는 <span class="highlight">속았어요</span>."#);
    }

    #[test]
    fn test_every_occurrence_is_wrapped() {
        let out = highlight("병원, 또 병원", &terms(&["병원"]), true);
        assert_eq!(out.matches(HIGHLIGHT_OPEN).count(), 2);
    }

    #[test]
    fn test_escaping() {
        let out = highlight("<b>apple</b> & pie", &terms(&["apple"]), true);
        assert_eq!(
            out,
            r#"&lt;b&gt;<span class="highlight">apple</span>&lt;/b&gt; &amp; pie"#
        );
        // regex metacharacters in terms are literal
        assert!(highlight("a+b", &terms(&["a+b"]), true).contains(HIGHLIGHT_OPEN));
    }

    #[test]
    fn test_case_insensitive_highlight() {
        let out = highlight("He likes Apples.", &terms(&["apples"]), false);
        assert!(out.contains(r#"<span class="highlight">Apples</span>"#));
        assert_eq!(highlight("Apples", &terms(&["apples"]), true), "Apples");
    }

    #[test]
    fn test_quotes_and_control_characters() {
        assert_eq!(escape_html("it's \"x\"\0\u{7}"), "it&#x27;s &quot;x&quot;");
        assert_eq!(escape_html("a\tb\nc"), "a\tb\nc");
    }

    #[test]
    fn test_no_terms() {
        assert_eq!(highlight("a < b", &[], true), "a &lt; b");
    }

    #[test]
    fn test_html_table() {
        let mut record = SearchRecord::empty("병원", SearchMode::KoreanWord);
        record.matched_terms_set = terms(&["병원"]);
        record.search_results.push(Match::from_line(
            Line {
                line_no: 2,
                content: "[00:02:36] 현주 병원 갔잖아".to_string(),
                episode: "# Death's Game S01E02".to_string(),
                time_axis: "[00:02:36]".to_string(),
                file_path: "f.md".to_string(),
                page: None,
            },
            "병원".to_string(),
        ));

        let html = to_html(&record);
        assert_eq!(html.matches("<tr>").count(), 2);
        assert!(html.contains(r#"<td>현주 <span class="highlight">병원</span> 갔잖아</td>"#));
        assert!(html.contains("<td>[00:02:36]</td>"));
        assert!(html.contains("Death&#x27;s Game"));
        assert!(html.contains("<td>2</td>"));
    }

    #[test]
    fn test_write_html() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        write_html(&SearchRecord::empty("x", SearchMode::English), &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("<!DOCTYPE html>"));
    }
}
