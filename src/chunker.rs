use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

/// Split a document into sections for embedding. Markdown is split at
/// headings with code blocks kept inline; anything else is split on blank
/// lines.
pub fn split_sections(content: &str, markdown: bool) -> Vec<String> {
    if markdown {
        split_markdown(content)
    } else {
        split_plain_text(content)
    }
}

/// Split markdown into heading-delimited sections. Each section starts with
/// its heading text and carries everything up to the next heading.
pub fn split_markdown(content: &str) -> Vec<String> {
    // Initialize parser with all extensions enabled
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(content, options);
    let mut sections: Vec<String> = Vec::new();
    let mut current = String::new();

    for event in parser {
        match event {
            Event::Start(Tag::Heading(..)) => {
                push_section(&mut sections, &current);
                current = String::new();
            }
            Event::End(Tag::Heading(..)) => {
                current.push('\n');
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        current.push('[');
                        current.push_str(&lang);
                        current.push_str("]\n");
                    }
                }
            }
            Event::End(Tag::CodeBlock(_)) => {
                current.push('\n');
            }
            Event::End(Tag::Paragraph) | Event::End(Tag::Item) => {
                current.push('\n');
            }
            Event::Text(text) => {
                current.push_str(&text);
            }
            Event::Code(code) => {
                current.push('`');
                current.push_str(&code);
                current.push('`');
            }
            Event::SoftBreak | Event::HardBreak => {
                current.push('\n');
            }
            _ => {}
        }
    }

    push_section(&mut sections, &current);

    if sections.is_empty() && !content.trim().is_empty() {
        sections.push(content.trim().to_string());
    }
    sections
}

/// Split plain text on runs of blank lines.
pub fn split_plain_text(content: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            push_section(&mut sections, &current);
            current.clear();
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    push_section(&mut sections, &current);

    sections
}

fn push_section(sections: &mut Vec<String>, section: &str) {
    let trimmed = section.trim();
    if !trimmed.is_empty() {
        sections.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_markdown_by_headings() {
        let markdown = r#"# Title
This is a paragraph.

## Section 1
Some text.

```rust
fn main() {
    println!("Hello, world!");
}
```

### Subsection
- List item 1
- List item 2
"#;

        let sections = split_markdown(markdown);
        assert_eq!(sections.len(), 3);
        assert!(sections[0].starts_with("Title"));
        assert!(sections[0].contains("This is a paragraph."));
        assert!(sections[1].contains("[rust]"));
        assert!(sections[1].contains("println!"));
        assert!(sections[2].contains("List item 2"));
    }

    #[test]
    fn test_markdown_without_headings_is_one_section() {
        let sections = split_markdown("just a paragraph with `code` in it");
        assert_eq!(sections.len(), 1);
        assert!(sections[0].contains("`code`"));
    }

    #[test]
    fn test_split_plain_text() {
        let text = "first paragraph\nstill first\n\nsecond paragraph\n\n\nthird";
        let sections = split_plain_text(text);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0], "first paragraph\nstill first");
        assert_eq!(sections[2], "third");
    }

    #[test]
    fn test_empty_input() {
        assert!(split_markdown("").is_empty());
        assert!(split_plain_text("  \n \n").is_empty());
    }
}
