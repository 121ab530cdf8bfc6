//! Block model, text measurement, and pagination.

use persona_core::config::ReportConfig;

/// One layout element of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Document title, underlined.
    Title(String),
    /// Section heading, underlined.
    Heading(String),
    /// Category heading inside the insights section.
    SubHeading(String),
    /// Flowing text, wrapped to the page width.
    Paragraph(String),
    /// A labeled single-line field, e.g. "Age: 25-30".
    Field(String, String),
    /// A bulleted insight point with hanging indent.
    Bullet(String),
    /// The first evidence citation under a bullet.
    Evidence(Evidence),
    /// Full-width horizontal rule.
    Rule,
}

/// How a citation is rendered: URLs become links, anything else a quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evidence {
    Link(String),
    Quote(String),
}

/// Page geometry.
#[derive(Debug, Clone)]
pub struct PageLayout {
    /// Page width in columns.
    pub width: usize,
    /// Content lines per page, excluding the footer.
    pub lines_per_page: usize,
}

impl PageLayout {
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            width: config.page_width.max(20),
            lines_per_page: config.page_lines.max(4),
        }
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::from_config(&ReportConfig::default())
    }
}

/// One finished page: content lines padded to full height plus a footer.
#[derive(Debug, Clone)]
pub struct Page {
    pub lines: Vec<String>,
}

impl Block {
    /// Render the block to lines at the given width.
    fn to_lines(&self, width: usize) -> Vec<String> {
        match self {
            Block::Title(text) => {
                let mut lines = wrap(text, width, "", "");
                let underline_width = lines.iter().map(|l| l.len()).max().unwrap_or(0);
                lines.push("=".repeat(underline_width.min(width)));
                lines.push(String::new());
                lines
            }
            Block::Heading(text) => {
                let mut lines = vec![String::new()];
                let wrapped = wrap(text, width, "", "");
                let underline_width = wrapped.iter().map(|l| l.len()).max().unwrap_or(0);
                lines.extend(wrapped);
                lines.push("-".repeat(underline_width.min(width)));
                lines
            }
            Block::SubHeading(text) => {
                vec![String::new(), text.clone()]
            }
            Block::Paragraph(text) => {
                let mut lines = wrap(text, width, "", "");
                lines.push(String::new());
                lines
            }
            Block::Field(label, value) => wrap(&format!("{}: {}", label, value), width, "", "  "),
            Block::Bullet(text) => wrap(text, width, "* ", "  "),
            Block::Evidence(Evidence::Link(url)) => wrap(url, width, "    ", "    "),
            Block::Evidence(Evidence::Quote(text)) => {
                wrap(&format!("e.g., \"{}\"", text), width, "    ", "    ")
            }
            Block::Rule => vec!["-".repeat(width)],
        }
    }
}

/// Greedy word wrap with a first-line prefix and a continuation indent.
/// Words longer than a line are hard-split.
fn wrap(text: &str, width: usize, prefix: &str, indent: &str) -> Vec<String> {
    let width = width.max(prefix.len() + 1).max(indent.len() + 1);
    let mut lines = Vec::new();
    let mut current = prefix.to_string();
    let mut current_empty = true;

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        loop {
            let available = width.saturating_sub(current.chars().count());
            let word_len = word.chars().count();
            if current_empty && word_len > available {
                // Hard-split a word that cannot fit on an empty line.
                let head: String = word.chars().take(available).collect();
                let tail: String = word.chars().skip(available).collect();
                current.push_str(&head);
                lines.push(current);
                current = indent.to_string();
                word = tail;
                continue;
            }
            if !current_empty && word_len + 1 > available {
                lines.push(current);
                current = indent.to_string();
                current_empty = true;
                continue;
            }
            if !current_empty {
                current.push(' ');
            }
            current.push_str(&word);
            current_empty = false;
            break;
        }
    }

    if text.split_whitespace().next().is_none() {
        return vec![prefix.trim_end().to_string()];
    }
    lines.push(current);
    lines
}

/// Paginate blocks into footered pages.
///
/// A block moves to the next page when the remaining space cannot fit it;
/// a block taller than a whole page flows across pages instead.
pub fn paginate(blocks: &[Block], layout: &PageLayout, username: &str) -> Vec<Page> {
    let mut pages: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for block in blocks {
        let mut lines = block.to_lines(layout.width);

        if current.len() + lines.len() > layout.lines_per_page && !current.is_empty() {
            // Not enough room left; break unless the block flows over a
            // full page anyway.
            if lines.len() <= layout.lines_per_page {
                pages.push(std::mem::take(&mut current));
            }
        }

        while current.len() + lines.len() > layout.lines_per_page {
            let room = layout.lines_per_page - current.len();
            let rest = lines.split_off(room);
            current.extend(lines);
            lines = rest;
            pages.push(std::mem::take(&mut current));
        }
        current.extend(lines);
    }
    if !current.is_empty() {
        pages.push(current);
    }

    let total = pages.len();
    pages
        .into_iter()
        .enumerate()
        .map(|(i, mut lines)| {
            while lines.len() < layout.lines_per_page {
                lines.push(String::new());
            }
            lines.push(footer(layout.width, username, i + 1, total));
            Page { lines }
        })
        .collect()
}

fn footer(width: usize, username: &str, page: usize, total: usize) -> String {
    let left = format!("Persona Report: u/{}", username);
    let right = format!("Page {} of {}", page, total);
    let padding = width.saturating_sub(left.chars().count() + right.chars().count());
    format!("{}{}{}", left, " ".repeat(padding.max(1)), right)
}
