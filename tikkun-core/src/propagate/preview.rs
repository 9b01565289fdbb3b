//! Side-effect-free previews of a pending replacement

use crate::error::Result;
use crate::matching::WordPattern;
use crate::model::{Paragraph, ParagraphPreview};
use crate::text::SentenceLocator;

/// "page N, paragraph M" with a 1-based paragraph number
pub fn location(paragraph: &Paragraph) -> String {
    format!(
        "page {}, paragraph {}",
        paragraph.page_number,
        paragraph.order_index + 1
    )
}

/// Preview for one paragraph, or `None` when the word does not occur in it
pub fn preview_paragraph(
    pattern: &WordPattern,
    replacement: &str,
    paragraph: &Paragraph,
    locator: &SentenceLocator,
) -> Result<Option<ParagraphPreview>> {
    let content = paragraph.content.as_str();
    let matches = pattern.find(content)?;
    let (Some(first), Some(last)) = (matches.first(), matches.last()) else {
        return Ok(None);
    };

    let span = locator.locate(content, first.start..last.end);
    let after = pattern.replace(content, replacement)?;
    // every replacement lies inside the span, so only its end moves
    let end = (span.end + after.len()).saturating_sub(content.len());
    let preview_after = after
        .get(span.start..end)
        .unwrap_or(after.as_str())
        .to_string();

    Ok(Some(ParagraphPreview {
        id: paragraph.id.clone(),
        location: location(paragraph),
        page_number: paragraph.page_number,
        order_index: paragraph.order_index,
        occurrences: matches.len(),
        preview_before: content[span].to_string(),
        preview_after,
    }))
}
