//! Markdown to styled terminal lines
//!
//! Covers what model replies actually use: headings, emphasis, links,
//! nested lists, inline code, fenced code, rules, block quotes.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::theme;

/// Render markdown to lines. Pure.
pub fn render(source: &str) -> Vec<Line<'static>> {
    let theme = theme::current();
    let parser = Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES);

    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut styles: Vec<Style> = vec![Style::default()];
    // One entry per open list: next number for ordered lists
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut in_code_block = false;
    let mut quote_depth = 0usize;

    let flush = |lines: &mut Vec<Line<'static>>, spans: &mut Vec<Span<'static>>, quote_depth: usize| {
        if spans.is_empty() {
            return;
        }
        let mut line = Vec::with_capacity(spans.len() + 1);
        if quote_depth > 0 {
            line.push(Span::styled("│ ".repeat(quote_depth), Style::default().fg(theme.muted)));
        }
        line.append(spans);
        lines.push(Line::from(line));
    };
    let blank = |lines: &mut Vec<Line<'static>>| {
        if lines.last().is_some_and(|l| !l.spans.is_empty()) {
            lines.push(Line::default());
        }
    };

    for event in parser {
        let current = styles.last().copied().unwrap_or_default();
        match event {
            Event::Start(tag) => {
                let style = match tag {
                    Tag::Heading { level, .. } => {
                        let color = match level {
                            HeadingLevel::H1 => theme.accent,
                            HeadingLevel::H2 => theme.user,
                            _ => theme.assistant,
                        };
                        Style::default().fg(color).add_modifier(Modifier::BOLD)
                    }
                    Tag::Strong => current.add_modifier(Modifier::BOLD),
                    Tag::Emphasis => current.add_modifier(Modifier::ITALIC),
                    Tag::Strikethrough => current.add_modifier(Modifier::CROSSED_OUT),
                    Tag::Link { .. } => current.fg(theme.link).add_modifier(Modifier::UNDERLINED),
                    Tag::CodeBlock(_) => {
                        in_code_block = true;
                        Style::default().fg(theme.code)
                    }
                    Tag::BlockQuote { .. } => {
                        quote_depth += 1;
                        current.add_modifier(Modifier::ITALIC)
                    }
                    Tag::List(start) => {
                        flush(&mut lines, &mut spans, quote_depth);
                        lists.push(start);
                        current
                    }
                    Tag::Item => {
                        let indent = "  ".repeat(lists.len().saturating_sub(1));
                        let bullet = match lists.last_mut() {
                            Some(Some(n)) => {
                                let label = format!("{indent}{n}. ");
                                *n += 1;
                                label
                            }
                            _ => format!("{indent}• "),
                        };
                        spans.push(Span::styled(bullet, Style::default().fg(theme.muted)));
                        current
                    }
                    _ => current,
                };
                styles.push(style);
            }
            Event::End(end) => {
                styles.pop();
                match end {
                    TagEnd::Heading(_) | TagEnd::Paragraph => {
                        flush(&mut lines, &mut spans, quote_depth);
                        if lists.is_empty() {
                            blank(&mut lines);
                        }
                    }
                    TagEnd::Item | TagEnd::TableRow | TagEnd::TableHead => {
                        flush(&mut lines, &mut spans, quote_depth);
                    }
                    TagEnd::TableCell => spans.push(Span::styled(" │ ", Style::default().fg(theme.muted))),
                    TagEnd::List { .. } => {
                        flush(&mut lines, &mut spans, quote_depth);
                        lists.pop();
                        if lists.is_empty() {
                            blank(&mut lines);
                        }
                    }
                    TagEnd::CodeBlock => {
                        in_code_block = false;
                        blank(&mut lines);
                    }
                    TagEnd::BlockQuote { .. } => {
                        flush(&mut lines, &mut spans, quote_depth);
                        quote_depth = quote_depth.saturating_sub(1);
                    }
                    _ => {}
                }
            }
            Event::Text(text) if in_code_block => {
                for code_line in text.lines() {
                    lines.push(Line::from(Span::styled(format!("  {code_line}"), current)));
                }
            }
            Event::Text(text) => spans.push(Span::styled(text.into_string(), current)),
            Event::Code(code) => spans.push(Span::styled(
                code.into_string(),
                Style::default().fg(theme.code),
            )),
            Event::SoftBreak => spans.push(Span::raw(" ")),
            Event::HardBreak => flush(&mut lines, &mut spans, quote_depth),
            Event::Rule => {
                flush(&mut lines, &mut spans, quote_depth);
                lines.push(Line::from(Span::styled("─".repeat(24), Style::default().fg(theme.muted))));
            }
            _ => {}
        }
    }
    flush(&mut lines, &mut spans, quote_depth);

    while lines.last().is_some_and(|l| l.spans.is_empty()) {
        lines.pop();
    }
    lines
}
