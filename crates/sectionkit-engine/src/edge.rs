/// Scroll state reported by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top of the content
    pub offset: f64,
    /// Total height of the content
    pub content_extent: f64,
    /// Height of the visible area
    pub viewport_extent: f64,
}

/// Which edges the current scroll position is within reach of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edges {
    pub top: bool,
    pub bottom: bool,
}

/// Stateless near-edge test. There is no latching: every qualifying
/// scroll update reports the edge again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeDetector {
    pub threshold: f64,
}

impl EdgeDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn evaluate(&self, metrics: ScrollMetrics) -> Edges {
        let max_offset = metrics.content_extent - metrics.viewport_extent - self.threshold;
        Edges {
            top: metrics.offset < self.threshold,
            bottom: metrics.offset > max_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::near_bottom(350.0, false, true)]
    #[case::near_top(50.0, true, false)]
    #[case::middle(200.0, false, false)]
    #[case::exactly_at_bottom_limit(340.0, false, false)]
    #[case::exactly_at_top_limit(60.0, false, false)]
    fn test_edges(#[case] offset: f64, #[case] top: bool, #[case] bottom: bool) {
        let detector = EdgeDetector::new(60.0);
        let metrics = ScrollMetrics {
            offset,
            content_extent: 500.0,
            viewport_extent: 100.0,
        };
        assert_eq!(detector.evaluate(metrics), Edges { top, bottom });
    }

    #[test]
    fn test_short_content_reaches_both_edges() {
        let detector = EdgeDetector::new(60.0);
        let metrics = ScrollMetrics {
            offset: 0.0,
            content_extent: 80.0,
            viewport_extent: 100.0,
        };
        assert_eq!(
            detector.evaluate(metrics),
            Edges {
                top: true,
                bottom: true
            }
        );
    }

    #[test]
    fn test_repeated_updates_keep_firing() {
        let detector = EdgeDetector::new(10.0);
        let metrics = ScrollMetrics {
            offset: 0.0,
            content_extent: 1000.0,
            viewport_extent: 100.0,
        };
        for _ in 0..3 {
            assert!(detector.evaluate(metrics).top);
        }
    }
}
