use std::fmt::Display;

use console::{style, Color, StyledObject};

use crate::providers::gitlab::refs::{classify, RefKind};

fn paint(text: impl Display, color: Color) -> StyledObject<String> {
    style(text.to_string()).fg(color).bright()
}

pub fn warning(text: impl Display) -> StyledObject<String> {
    paint(text, Color::Yellow)
}

pub fn success(text: impl Display) -> StyledObject<String> {
    paint(text, Color::Green)
}

pub fn failure(text: impl Display) -> StyledObject<String> {
    paint(text, Color::Red)
}

pub fn dim(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).dim()
}

pub fn heading(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright().underlined()
}

pub fn banner(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).magenta().bold()
}

/// Tags in magenta, branches in cyan.
pub fn ref_name(ref_: &str) -> StyledObject<String> {
    match classify(ref_) {
        RefKind::Tag => style(ref_.to_string()).magenta(),
        RefKind::Branch => style(ref_.to_string()).cyan(),
    }
}

/// Job or bridge status, colored like the table cells.
pub fn status(status: &str) -> StyledObject<String> {
    match status {
        "success" => success(status),
        "failed" => failure(status),
        "manual" => style(status.to_string()).magenta(),
        "canceled" | "skipped" => dim(status),
        _ => warning(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styled_text_keeps_content() {
        assert_eq!(ref_name("tag:v1").force_styling(false).to_string(), "tag:v1");
        assert_eq!(status("manual").force_styling(false).to_string(), "manual");
    }
}
