use std::io::IsTerminal;

use yatra_core::{inline_spans, DisplayBlock, InlineSpan};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

pub fn card(title: &str, blocks: &[DisplayBlock]) -> String {
    let styled = std::io::stdout().is_terminal();
    let mut lines = vec![title.to_string(), "=".repeat(title.chars().count())];

    lines.extend(blocks.iter().map(|block| render_block(block, styled)));
    lines.join("\n")
}

fn render_block(block: &DisplayBlock, styled: bool) -> String {
    match block {
        DisplayBlock::Heading(text) => {
            let text = inline(text, styled);
            format!("\n## {text}")
        }
        DisplayBlock::Subheading(text) => emphasize(text, styled),
        DisplayBlock::Bullet(text) => format!("  • {}", inline(text, styled)),
        DisplayBlock::DayMarker(text) => format!("▶ {}", emphasize(text, styled)),
        DisplayBlock::CostLine(text) => format!("  [cost] {}", inline(text, styled)),
        DisplayBlock::Paragraph(text) => inline(text, styled),
        DisplayBlock::Spacer => String::new(),
    }
}

fn emphasize(text: &str, styled: bool) -> String {
    let plain = inline(text, false);
    if styled {
        format!("{BOLD}{plain}{RESET}")
    } else {
        plain
    }
}

fn inline(text: &str, styled: bool) -> String {
    inline_spans(text)
        .into_iter()
        .map(|span| match span {
            InlineSpan::Plain(text) => text,
            InlineSpan::Bold(text) if styled => format!("{BOLD}{text}{RESET}"),
            InlineSpan::Bold(text) => text,
        })
        .collect()
}
