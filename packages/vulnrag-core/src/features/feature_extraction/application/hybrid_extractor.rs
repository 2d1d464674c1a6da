//! HybridFeatureExtractor - query feature extraction with fallbacks
//!
//! ```text
//! code ─▶ CpgGenerator ─▶ GraphParser ─▶ GraphFeatureExtractor
//!   │          (any failure)
//!   └────────────────────▶ text strategy ─▶ LexicalStrategy
//!                          (runtime failure)
//! ```

use std::time::Duration;
use tracing::{debug, warn};

use crate::features::feature_extraction::domain::{ExtractedFeatures, StrategyKind};
use crate::features::feature_extraction::infrastructure::{
    GraphFeatureExtractor, LexicalStrategy, SyntaxTreeStrategy,
};
use crate::features::feature_extraction::ports::{CpgGenerator, FeatureExtractionStrategy};
use crate::features::graph_parsing::{GraphParser, PropertyGraph};

const DEFAULT_CPG_TIMEOUT: Duration = Duration::from_secs(30);

/// Picks the best available extraction path for a code fragment
pub struct HybridFeatureExtractor {
    graph: GraphFeatureExtractor,
    text: Box<dyn FeatureExtractionStrategy>,
    fallback: LexicalStrategy,
    cpg_timeout: Duration,
}

impl std::fmt::Debug for HybridFeatureExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridFeatureExtractor")
            .field("text_strategy", &self.text.kind())
            .field("cpg_timeout", &self.cpg_timeout)
            .finish()
    }
}

impl HybridFeatureExtractor {
    /// Select the text strategy by capability: the syntax-tree strategy when
    /// the C grammar loads, the lexical strategy otherwise.
    pub fn new() -> Self {
        let text: Box<dyn FeatureExtractionStrategy> = match SyntaxTreeStrategy::new() {
            Ok(strategy) => Box::new(strategy),
            Err(e) => {
                warn!(error = %e, "syntax tree strategy unavailable, using lexical strategy");
                Box::new(LexicalStrategy::new())
            }
        };
        Self::with_text_strategy(text)
    }

    /// Use a specific text strategy
    pub fn with_text_strategy(text: Box<dyn FeatureExtractionStrategy>) -> Self {
        Self {
            graph: GraphFeatureExtractor::new(),
            text,
            fallback: LexicalStrategy::new(),
            cpg_timeout: DEFAULT_CPG_TIMEOUT,
        }
    }

    pub fn with_cpg_timeout(mut self, timeout: Duration) -> Self {
        self.cpg_timeout = timeout;
        self
    }

    pub fn text_strategy(&self) -> StrategyKind {
        self.text.kind()
    }

    /// Features of a parsed graph
    pub fn extract_graph(&self, graph: &PropertyGraph) -> ExtractedFeatures {
        self.graph.extract(graph)
    }

    /// Features from source text; never fails
    pub fn extract_text(&self, code: &str) -> ExtractedFeatures {
        match self.text.extract(code) {
            Ok(features) => features,
            Err(e) => {
                warn!(
                    strategy = %self.text.kind(),
                    error = %e,
                    "text strategy failed, using lexical strategy"
                );
                self.fallback.extract_text(code)
            }
        }
    }

    /// Query features: CPG → graph features when a generator is given,
    /// text features on any failure or an empty graph.
    pub fn extract_query(&self, code: &str, generator: Option<&dyn CpgGenerator>) -> ExtractedFeatures {
        if let Some(generator) = generator {
            match self.graph_features(code, generator) {
                Some(features) => return features,
                None => debug!("falling back to text features"),
            }
        }
        self.extract_text(code)
    }

    fn graph_features(&self, code: &str, generator: &dyn CpgGenerator) -> Option<ExtractedFeatures> {
        let document = match generator.generate(code, self.cpg_timeout) {
            Ok(document) => document,
            Err(e) => {
                warn!(error = %e, "CPG generation failed");
                return None;
            }
        };

        let mut parser = GraphParser::new();
        if !parser.parse(document) {
            return None;
        }
        let graph = parser.graph()?;
        if graph.is_empty() {
            warn!("generated CPG has no vertices");
            return None;
        }
        Some(self.graph.extract(graph))
    }
}

impl Default for HybridFeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}
