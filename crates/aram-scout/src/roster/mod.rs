// Free roster extraction from the wiki page.

pub mod markup;
pub mod names;

use scraper::Html;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::RosterConfig;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("roster page has no term or heading labelled {label:?}")]
    HeadingNotFound { label: String },

    #[error("no ordered list follows the {label:?} heading")]
    ListNotFound { label: String },
}

/// Extract the free roster as canonical champion names.
///
/// Reads the first ordered list after the configured heading. List items
/// without the configured attribute (dividers, notes) are skipped.
pub fn extract_free_roster(
    html: &str,
    config: &RosterConfig,
) -> Result<Vec<String>, ExtractionError> {
    let label = config.heading.as_str();
    let doc = Html::parse_document(html);

    let term = markup::find_term(&doc, label).ok_or_else(|| ExtractionError::HeadingNotFound {
        label: label.to_string(),
    })?;
    let list = markup::ordered_list_after(&doc, term).ok_or_else(|| {
        ExtractionError::ListNotFound {
            label: label.to_string(),
        }
    })?;

    let mut roster = Vec::new();
    for item in markup::list_items(list) {
        match markup::first_attribute(item, &config.item_attribute) {
            Some(raw) if !raw.trim().is_empty() => {
                let name = names::canonical(raw, &config.aliases);
                debug!(raw = %raw, name = %name, "free roster entry");
                roster.push(name);
            }
            _ => debug!("skipping roster item without {}", config.item_attribute),
        }
    }

    if roster.is_empty() {
        warn!("free roster list under {label:?} has no champion entries");
    }

    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn roster_config() -> RosterConfig {
        RosterConfig {
            heading: "ARAM free roster".into(),
            item_attribute: "data-champion".into(),
            aliases: HashMap::new(),
        }
    }

    const PAGE: &str = r#"
<html><body>
<dl><dt>ARAM free roster</dt></dl>
<div class="columntemplate">
<ol>
<li><span class="inline-image champion-icon" data-champion="Lee Sin" data-skin="Original">Lee Sin</span></li>
<li><span class="inline-image champion-icon" data-champion="Kai&#39;Sa">Kai'Sa</span></li>
<li><span class="note">Updated weekly</span></li>
<li><span data-champion="Ahri">Ahri</span></li>
</ol>
</div>
</body></html>
"#;

    #[test]
    fn extracts_and_normalizes_names() {
        let roster = extract_free_roster(PAGE, &roster_config()).unwrap();
        assert_eq!(roster, vec!["LeeSin", "Kaisa", "Ahri"]);
    }

    #[test]
    fn ignores_lists_before_the_heading() {
        let page = format!(
            "<ol><li><span data-champion=\"Teemo\"></span></li></ol>{PAGE}"
        );
        let roster = extract_free_roster(&page, &roster_config()).unwrap();
        assert!(!roster.contains(&"Teemo".to_string()));
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn applies_aliases() {
        let mut config = roster_config();
        config.aliases.insert("LeeSin".into(), "LeeSinAlias".into());
        let roster = extract_free_roster(PAGE, &config).unwrap();
        assert_eq!(roster[0], "LeeSinAlias");
    }

    #[test]
    fn missing_heading_is_an_error() {
        let page = "<dl><dt>Free champion rotation</dt></dl><ol><li><span data-champion=\"Ahri\"></span></li></ol>";
        match extract_free_roster(page, &roster_config()) {
            Err(ExtractionError::HeadingNotFound { label }) => {
                assert_eq!(label, "ARAM free roster");
            }
            other => panic!("expected HeadingNotFound, got {other:?}"),
        }
    }

    #[test]
    fn term_without_end_tag_is_found() {
        let page = "<dl><dt>ARAM free roster<dd>weekly</dl><div><ol><li><span data-champion=\"Ahri\">Ahri</span></li></ol></div>";
        assert_eq!(extract_free_roster(page, &roster_config()).unwrap(), vec!["Ahri"]);

        let page = "<dl><dt>ARAM free roster<dt>Other</dt></dl><ol><li><span data-champion=\"Ahri\"></span></li></ol>";
        assert_eq!(extract_free_roster(page, &roster_config()).unwrap(), vec!["Ahri"]);
    }

    #[test]
    fn missing_list_is_an_error() {
        let page = "<dl><dt>ARAM free roster</dt></dl><p>Coming soon</p>";
        assert!(matches!(
            extract_free_roster(page, &roster_config()),
            Err(ExtractionError::ListNotFound { .. })
        ));
    }

    #[test]
    fn empty_list_yields_empty_roster() {
        let page = "<dl><dt>ARAM free roster</dt></dl><ol><li>TBA</li></ol>";
        assert!(extract_free_roster(page, &roster_config()).unwrap().is_empty());
    }
}
