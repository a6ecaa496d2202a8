use crate::types::{Result, Rss2DayOneError};
use std::panic::{self, AssertUnwindSafe};

/// Convert an item's HTML description into markdown.
///
/// The converter has no error channel of its own; a panic inside it is reported
/// as a conversion failure so only the offending item is affected.
pub fn to_markdown(html: &str) -> Result<String> {
    if html.trim().is_empty() {
        return Ok(String::new());
    }

    panic::catch_unwind(AssertUnwindSafe(|| html2md::parse_html(html))).map_err(|cause| {
        let reason = cause
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| cause.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "converter panicked".to_string());
        Rss2DayOneError::Conversion(reason)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_description_converts_to_empty_body() {
        assert_eq!(to_markdown("").unwrap(), "");
        assert_eq!(to_markdown("  \n").unwrap(), "");
    }

    #[test]
    fn image_without_alt_becomes_inline_reference() {
        let md = to_markdown(r#"<p>Look</p><img src="http://test.invalid/a.jpg">"#).unwrap();
        assert!(md.contains("Look"));
        assert!(md.contains("![](http://test.invalid/a.jpg)"));
    }
}
