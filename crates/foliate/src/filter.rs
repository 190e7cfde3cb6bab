//! Running header/footer strip filtering, applied to raw observations before typing.

use crate::config::ProcessingConfig;
use crate::geometry::BoundingBox;

/// A single raw positioned text observation as returned by an [`crate::collaborators::OcrProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub text: String,
    pub bounding_box: BoundingBox,
    pub confidence: f32,
}

/// Drops any observation whose box lies entirely within the configured header or
/// footer strip. A no-op when `enable_header_footer_detection` is false.
pub fn filter_observations(observations: Vec<Observation>, cfg: &ProcessingConfig) -> Vec<Observation> {
    if !cfg.enable_header_footer_detection {
        return observations;
    }
    let [header_lo, header_hi] = cfg.page_header_region;
    let [footer_lo, footer_hi] = cfg.page_footer_region;
    observations
        .into_iter()
        .filter(|obs| {
            !obs.bounding_box.within_y_strip(header_lo, header_hi) && !obs.bounding_box.within_y_strip(footer_lo, footer_hi)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(text: &str, min_y: f32, max_y: f32) -> Observation {
        Observation { text: text.to_string(), bounding_box: BoundingBox::new(0.1, min_y, 0.5, max_y), confidence: 0.95 }
    }

    #[test]
    fn test_drops_header_strip_content() {
        let cfg = ProcessingConfig::default();
        let observations = vec![obs("Running Header", 0.95, 0.98), obs("Body text", 0.4, 0.45)];
        let filtered = filter_observations(observations, &cfg);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].text, "Body text");
    }

    #[test]
    fn test_drops_footer_strip_content() {
        let cfg = ProcessingConfig::default();
        let observations = vec![obs("Page footer", 0.01, 0.03), obs("Body text", 0.4, 0.45)];
        let filtered = filter_observations(observations, &cfg);
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_disabled_filter_is_noop() {
        let mut cfg = ProcessingConfig::default();
        cfg.enable_header_footer_detection = false;
        let observations = vec![obs("Running Header", 0.95, 0.98)];
        let filtered = filter_observations(observations, &cfg);
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_straddling_strip_boundary_is_kept() {
        let cfg = ProcessingConfig::default();
        // Crosses from inside the header strip into body text; not entirely within it.
        let observations = vec![obs("Straddling", 0.85, 0.95)];
        let filtered = filter_observations(observations, &cfg);
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_all_elements_in_strips_commits_zero() {
        let cfg = ProcessingConfig::default();
        let observations = vec![obs("Header", 0.95, 0.98), obs("Footer", 0.01, 0.03)];
        let filtered = filter_observations(observations, &cfg);
        assert!(filtered.is_empty());
    }
}
