//! Transient success/error banner line.

use ratatui::text::{Line, Span};

use plantwall_core::{Banner, BannerKind};

use crate::theme;

/// Styled banner line, or `None` when no banner is up.
pub fn banner_line(banner: Option<&Banner>) -> Option<Line<'static>> {
    let banner = banner?;
    let (icon, style) = match banner.kind {
        BannerKind::Success => ("✓", theme::good()),
        BannerKind::Error => ("✗", theme::bad()),
    };
    Some(Line::from(vec![
        Span::styled(format!("  {icon} "), style),
        Span::styled(banner.text.clone(), style),
        Span::styled("  (x dismiss)", theme::key_hint()),
    ]))
}
