//! Output generation for the publication list.
//!
//! Two renderings: a JSON data file that the site templates read, and a
//! standalone Markdown publications page with an embedded BibTeX block per
//! paper.

use crate::publication::PublicationRecord;

/// Serializes the records as a pretty-printed JSON array.
///
/// Optional links (`youtube`, `website`) are omitted when absent.
pub fn to_json(records: &[PublicationRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

/// Front matter of the generated publications page.
const FRONT_MATTER: &str = "---\ntitle: Publications\nlayout: home\nnav_order: 2\n---\n";

/// Renders a Markdown publications page.
///
/// # Arguments
///
/// * `records` - The publications, already sorted
///
/// # Returns
///
/// The complete page: front matter, heading, and one list item per record
/// with its BibTeX in a collapsible block.
pub fn render_markdown(records: &[PublicationRecord]) -> String {
    let mut output = String::from(FRONT_MATTER);
    output.push_str("\n# Publications\n\n");

    for record in records {
        output.push_str(&render_item(record));
        output.push('\n');
    }

    output.trim_end().to_string() + "\n"
}

fn render_item(record: &PublicationRecord) -> String {
    let mut line = format!(
        "- {}, *{}*, {}, {} [[PDF]]({})",
        record.authors, record.title, record.venue, record.year, record.pdf
    );
    if let Some(youtube) = &record.youtube {
        line.push_str(&format!(" [[Video]]({})", youtube));
    }
    if let Some(website) = &record.website {
        line.push_str(&format!(" [[Website]]({})", website));
    }

    format!(
        "{}\n  <details>\n    <summary>View BibTeX</summary>\n    <pre><code>\n{}\n    </code></pre>\n  </details>\n",
        line, record.bibtex
    )
}
