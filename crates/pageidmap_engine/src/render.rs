//! Streaming output rendering, one line function per format.

use pageidmap_domain::{ConfigError, MappingResult, OutputFormat, RenderConfig};
use std::collections::VecDeque;
use std::io::Write;
use std::iter::Peekable;

const NGINX_HEADER: &str = "# Nginx rewrite rules for Confluence Cloud migration";
const APACHE_HEADER: &str = "# Apache rewrite rules for Confluence Cloud migration";
const CSV_HEADER: [&str; 2] = ["page_id", "url"];

pub fn render<I>(results: I, config: &RenderConfig) -> Result<Rendered<I::IntoIter>, ConfigError>
where
    I: IntoIterator<Item = MappingResult>,
{
    config.validate()?;
    Ok(Rendered {
        format: config.format,
        domain: config.domain().unwrap_or_default().to_string(),
        results: results.into_iter().peekable(),
        pending: VecDeque::new(),
        stage: Stage::Header,
    })
}

/// Writes each rendered fragment followed by a newline. Returns the number
/// of fragments written.
pub fn write_rendered<L, W>(lines: L, writer: &mut W) -> std::io::Result<usize>
where
    L: IntoIterator<Item = String>,
    W: Write + ?Sized,
{
    let mut written = 0;
    for line in lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Header,
    Body,
    Done,
}

pub struct Rendered<I: Iterator<Item = MappingResult>> {
    format: OutputFormat,
    domain: String,
    results: Peekable<I>,
    pending: VecDeque<String>,
    stage: Stage,
}

impl<I: Iterator<Item = MappingResult>> Rendered<I> {
    fn header(&mut self) -> Vec<String> {
        match self.format {
            OutputFormat::Tsv => Vec::new(),
            OutputFormat::Csv => vec![csv_record(CSV_HEADER)],
            OutputFormat::Json => {
                if self.results.peek().is_none() {
                    self.stage = Stage::Done;
                    vec!["[]".to_string()]
                } else {
                    vec!["[".to_string()]
                }
            }
            OutputFormat::Nginx => vec![
                NGINX_HEADER.to_string(),
                format!("# Target domain: {}", self.domain),
            ],
            OutputFormat::Apache => vec![
                APACHE_HEADER.to_string(),
                format!("# Target domain: {}", self.domain),
                "RewriteEngine On".to_string(),
            ],
        }
    }

    fn footer(&self) -> Option<String> {
        match self.format {
            OutputFormat::Json => Some("]".to_string()),
            _ => None,
        }
    }
}

impl<I: Iterator<Item = MappingResult>> Iterator for Rendered<I> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Some(line);
            }
            match self.stage {
                Stage::Header => {
                    self.stage = Stage::Body;
                    let header = self.header();
                    self.pending.extend(header);
                }
                Stage::Body => match self.results.next() {
                    Some(result) => {
                        let line = match self.format {
                            OutputFormat::Tsv => tsv_line(&result),
                            OutputFormat::Csv => csv_line(&result),
                            OutputFormat::Json => {
                                json_element(&result, self.results.peek().is_some())
                            }
                            OutputFormat::Nginx => nginx_line(&result, &self.domain),
                            OutputFormat::Apache => apache_line(&result, &self.domain),
                        };
                        return Some(line);
                    }
                    None => {
                        self.stage = Stage::Done;
                        let footer = self.footer();
                        self.pending.extend(footer);
                    }
                },
                Stage::Done => return None,
            }
        }
    }
}

pub fn tsv_line(result: &MappingResult) -> String {
    format!("{}\t{}", result.page_id, result.target_path)
}

pub fn csv_line(result: &MappingResult) -> String {
    csv_record([result.page_id.as_str(), result.target_path.as_str()])
}

/// One CSV record without its terminator, quoted only where necessary.
fn csv_record(fields: [&str; 2]) -> String {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer
        .write_record(fields)
        .expect("writing to a Vec cannot fail");
    let mut bytes = writer.into_inner().expect("writing to a Vec cannot fail");
    bytes.pop();
    String::from_utf8(bytes).expect("fields are UTF-8")
}

fn json_element(result: &MappingResult, more: bool) -> String {
    format!(
        "  {{\n    \"page_id\": {},\n    \"url\": {}\n  }}{}",
        json_string(result.page_id.as_str()),
        json_string(&result.target_path),
        if more { "," } else { "" }
    )
}

fn json_string(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

pub fn nginx_line(result: &MappingResult, domain: &str) -> String {
    format!(
        "rewrite ^/pages/viewpage\\.action\\?pageId={}$ https://{}{} permanent;",
        result.page_id, domain, result.target_path
    )
}

pub fn apache_line(result: &MappingResult, domain: &str) -> String {
    format!(
        "RewriteRule ^pages/viewpage\\.action\\?pageId={}$ https://{}{} [R=301,L]",
        result.page_id, domain, result.target_path
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pageidmap_domain::PageId;

    fn result(id: &str, path: &str) -> MappingResult {
        MappingResult {
            page_id: PageId::from(id),
            space_key: "INFO".to_string(),
            target_path: path.to_string(),
        }
    }

    fn render_all(results: Vec<MappingResult>, config: &RenderConfig) -> Vec<String> {
        render(results, config).unwrap().collect()
    }

    #[test]
    fn test_tsv() {
        let lines = render_all(
            vec![result("123", "/wiki/search?text=A%20%26%20B")],
            &RenderConfig::new(OutputFormat::Tsv),
        );
        assert_eq!(lines, vec!["123\t/wiki/search?text=A%20%26%20B"]);
    }

    #[test]
    fn test_tsv_empty_has_no_framing() {
        let lines = render_all(vec![], &RenderConfig::new(OutputFormat::Tsv));
        assert!(lines.is_empty());
    }

    #[test]
    fn test_csv_header_and_rows() {
        let lines = render_all(
            vec![result("1", "/wiki/display/A/x%3F"), result("2", "/wiki/display/A/y%3F")],
            &RenderConfig::new(OutputFormat::Csv),
        );
        assert_eq!(
            lines,
            vec!["page_id,url", "1,/wiki/display/A/x%3F", "2,/wiki/display/A/y%3F"]
        );
    }

    #[test]
    fn test_csv_empty_is_header_only() {
        let lines = render_all(vec![], &RenderConfig::new(OutputFormat::Csv));
        assert_eq!(lines, vec!["page_id,url"]);
    }

    #[test]
    fn test_csv_quoting() {
        assert_eq!(csv_line(&result("1", "/wiki/plain")), "1,/wiki/plain");
        assert_eq!(csv_line(&result("1", "/wiki/a,b")), "1,\"/wiki/a,b\"");
        assert_eq!(csv_line(&result("1", "say \"hi\"")), "1,\"say \"\"hi\"\"\"");
        assert_eq!(csv_line(&result("1", "two\nlines")), "1,\"two\nlines\"");
    }

    #[test]
    fn test_json_empty() {
        let lines = render_all(vec![], &RenderConfig::new(OutputFormat::Json));
        assert_eq!(lines, vec!["[]"]);
    }

    #[test]
    fn test_json_single_element() {
        let text = render_all(
            vec![result("42", "/wiki/display/INFO/%C3%9Cmlauts")],
            &RenderConfig::new(OutputFormat::Json),
        )
        .join("\n");
        assert_eq!(
            text,
            "[\n  {\n    \"page_id\": \"42\",\n    \"url\": \"/wiki/display/INFO/%C3%9Cmlauts\"\n  }\n]"
        );
    }

    #[test]
    fn test_json_multiple_elements_parse() {
        let text = render_all(
            vec![result("1", "/wiki/a"), result("2", "/wiki/b"), result("3", "/wiki/c")],
            &RenderConfig::new(OutputFormat::Json),
        )
        .join("\n");
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[2]["page_id"], "3");
        assert_eq!(parsed[2]["url"], "/wiki/c");
    }

    #[test]
    fn test_json_escapes_strings() {
        let text = render_all(
            vec![result("q\"1", "/wiki/x\\y")],
            &RenderConfig::new(OutputFormat::Json),
        )
        .join("\n");
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["page_id"], "q\"1");
        assert_eq!(parsed[0]["url"], "/wiki/x\\y");
    }

    #[test]
    fn test_nginx() {
        let config = RenderConfig::new(OutputFormat::Nginx).with_target_domain("acme.atlassian.net");
        let lines = render_all(vec![result("789", "/wiki/display/HELP/Title%3F")], &config);
        assert_eq!(
            lines,
            vec![
                "# Nginx rewrite rules for Confluence Cloud migration",
                "# Target domain: acme.atlassian.net",
                "rewrite ^/pages/viewpage\\.action\\?pageId=789$ https://acme.atlassian.net/wiki/display/HELP/Title%3F permanent;",
            ]
        );
    }

    #[test]
    fn test_apache() {
        let config = RenderConfig::new(OutputFormat::Apache).with_target_domain("acme.atlassian.net");
        let lines = render_all(vec![result("789", "/wiki/display/HELP/Title%3F")], &config);
        assert_eq!(
            lines,
            vec![
                "# Apache rewrite rules for Confluence Cloud migration",
                "# Target domain: acme.atlassian.net",
                "RewriteEngine On",
                "RewriteRule ^pages/viewpage\\.action\\?pageId=789$ https://acme.atlassian.net/wiki/display/HELP/Title%3F [R=301,L]",
            ]
        );
    }

    #[test]
    fn test_rule_formats_reject_missing_domain() {
        for format in [OutputFormat::Nginx, OutputFormat::Apache] {
            let err = render(vec![result("1", "/wiki/x")], &RenderConfig::new(format))
                .err()
                .unwrap();
            assert_eq!(err, ConfigError::MissingTargetDomain { format });
        }
    }

    #[test]
    fn test_rejection_happens_before_pulling_results() {
        let mut pulled = false;
        let results = std::iter::from_fn(|| {
            pulled = true;
            None::<MappingResult>
        });
        assert!(render(results, &RenderConfig::new(OutputFormat::Apache)).is_err());
        assert!(!pulled);
    }

    #[test]
    fn test_write_rendered_appends_newlines() {
        let mut out = Vec::new();
        let config = RenderConfig::new(OutputFormat::Tsv);
        let rendered = render(vec![result("1", "/wiki/a"), result("2", "/wiki/b")], &config).unwrap();
        let written = write_rendered(rendered, &mut out).unwrap();
        assert_eq!(written, 2);
        assert_eq!(String::from_utf8(out).unwrap(), "1\t/wiki/a\n2\t/wiki/b\n");
    }
}
