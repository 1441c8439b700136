//! Cross-scale matching of two multi-scale descriptor sets.
//!
//! Matching runs in three phases: the interleaved Hamming distance matrix,
//! per-keypoint-pair block scoring, and greedy assignment. The first two are
//! independent per row and run on rayon when the `rayon` feature is enabled
//! and [`MatchConfig::parallel`] is set; assignment is always sequential.

pub(crate) mod aggregate;
pub(crate) mod assign;
pub(crate) mod distance;

pub use aggregate::ScoreMatrices;

use crate::descriptor::{check_detection_scales, DescriptorSet, FeatureSet};
use crate::matrix::Matrix;
use crate::score::{build_scorer, BlockScorer, MaskRegion, MaxCondition, ScorerParams, Strategy};
use crate::trace::{trace_event, trace_span, PhaseClock};
use crate::util::{ScaleMatchError, ScaleMatchResult};

/// Default number of pyramid levels per keypoint.
pub const DEFAULT_LEVELS: usize = 8;

/// Configuration for cross-scale matching.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchConfig {
    /// Pyramid levels per keypoint in both descriptor sets.
    pub n_levels: usize,
    /// Block scoring strategy.
    pub strategy: Strategy,
    /// Kernel half-width `W` for the correlation strategies.
    pub half_width: usize,
    /// Masking region for the correlation strategies.
    pub mask_region: MaskRegion,
    /// Acceptance gate for the global-minimum strategy.
    pub max_condition: MaxCondition,
    /// South-east diagonal refinement for the global-minimum strategy.
    pub south_east_refine: bool,
    /// Run the distance and scoring phases on rayon (requires `rayon`).
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            n_levels: DEFAULT_LEVELS,
            strategy: Strategy::GlobalMin,
            half_width: 0,
            mask_region: MaskRegion::DetectionCross,
            max_condition: MaxCondition::None,
            south_east_refine: false,
            parallel: false,
        }
    }
}

/// One correspondence between keypoint `row` of image 1 and `col` of image 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub row: usize,
    pub col: usize,
    pub distance: u32,
    pub scale1: usize,
    pub scale2: usize,
}

impl Match {
    /// The match as the `(row, col, distance, scale1, scale2)` record.
    pub fn to_record(&self) -> [u64; 5] {
        [
            self.row as u64,
            self.col as u64,
            self.distance as u64,
            self.scale1 as u64,
            self.scale2 as u64,
        ]
    }
}

/// Everything a matching run produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchOutput {
    /// Interleaved `N1 x N2` distance matrix (`H`).
    pub distances: Matrix<u32>,
    /// Per-pair score matrices (`Hs`, `S1`, `S2`).
    pub scores: ScoreMatrices,
    /// Greedy correspondences, ordered by ascending distance.
    pub matches: Vec<Match>,
}

/// Multi-scale descriptor matcher with a fixed configuration.
///
/// The scorer (and its kernel) is built once in [`CrossScaleMatcher::new`];
/// every call allocates its own matrices, so a matcher can be reused and
/// shared across threads.
pub struct CrossScaleMatcher {
    cfg: MatchConfig,
    scorer: Box<dyn BlockScorer>,
}

impl CrossScaleMatcher {
    /// Validates `cfg` and prepares the scorer.
    pub fn new(cfg: MatchConfig) -> ScaleMatchResult<Self> {
        if cfg.n_levels == 0 {
            return Err(ScaleMatchError::InvalidLevels {
                n_levels: cfg.n_levels,
            });
        }
        let scorer = build_scorer(
            cfg.strategy,
            ScorerParams {
                half_width: cfg.half_width,
                mask_region: cfg.mask_region,
                max_condition: cfg.max_condition,
                south_east_refine: cfg.south_east_refine,
            },
        );
        Ok(Self { cfg, scorer })
    }

    /// Returns the matcher configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    fn check_levels(&self, set: &DescriptorSet) -> ScaleMatchResult<()> {
        if set.n_levels() != self.cfg.n_levels {
            return Err(ScaleMatchError::LevelMismatch {
                rows: set.len(),
                n_levels: self.cfg.n_levels,
            });
        }
        Ok(())
    }

    /// Builds the interleaved distance matrix `H`.
    pub fn distance_matrix(&self, d1: &DescriptorSet, d2: &DescriptorSet) -> ScaleMatchResult<Matrix<u32>> {
        self.check_levels(d1)?;
        self.check_levels(d2)?;
        let _span = trace_span!("distance_matrix", rows = d1.len(), cols = d2.len()).entered();
        let clock = PhaseClock::start();

        #[cfg(feature = "rayon")]
        let h = if self.cfg.parallel {
            distance::distance_matrix_par(d1, d2)
        } else {
            distance::distance_matrix(d1, d2)
        };
        #[cfg(not(feature = "rayon"))]
        let h = distance::distance_matrix(d1, d2);

        trace_event!("distance_matrix_done", elapsed_ms = clock.elapsed_ms());
        Ok(h)
    }

    /// Scores every keypoint-pair block of `h`.
    ///
    /// `s1`/`s2` hold one detection level per keypoint. Strategies that do
    /// not use detection levels accept empty slices.
    pub fn score_blocks(&self, h: &Matrix<u32>, s1: &[usize], s2: &[usize]) -> ScaleMatchResult<ScoreMatrices> {
        let n = self.cfg.n_levels;
        if h.rows() % n != 0 {
            return Err(ScaleMatchError::LevelMismatch {
                rows: h.rows(),
                n_levels: n,
            });
        }
        if h.cols() % n != 0 {
            return Err(ScaleMatchError::LevelMismatch {
                rows: h.cols(),
                n_levels: n,
            });
        }
        let (l1, l2) = (h.rows() / n, h.cols() / n);
        if self.scorer.uses_detection_scales() {
            check_detection_scales(s1, l1, n)?;
            check_detection_scales(s2, l2, n)?;
        }

        let _span = trace_span!("score_blocks", strategy = self.cfg.strategy.name(), pairs = l1 * l2).entered();
        let clock = PhaseClock::start();

        #[cfg(feature = "rayon")]
        let scores = if self.cfg.parallel {
            aggregate::score_blocks_par(h, n, self.scorer.as_ref(), s1, s2)?
        } else {
            aggregate::score_blocks(h, n, self.scorer.as_ref(), s1, s2)?
        };
        #[cfg(not(feature = "rayon"))]
        let scores = aggregate::score_blocks(h, n, self.scorer.as_ref(), s1, s2)?;

        trace_event!("score_blocks_done", elapsed_ms = clock.elapsed_ms());
        Ok(scores)
    }

    /// Greedy nearest-neighbour assignment over `scores`.
    pub fn assign(&self, scores: &ScoreMatrices) -> Vec<Match> {
        let _span = trace_span!("assign", cols = scores.scores.cols()).entered();
        let matches = assign::greedy_assign(scores);
        trace_event!("assign_done", matches = matches.len());
        matches
    }

    /// Runs all phases on two descriptor sets and their detection levels.
    pub fn match_sets(
        &self,
        d1: &DescriptorSet,
        s1: &[usize],
        d2: &DescriptorSet,
        s2: &[usize],
    ) -> ScaleMatchResult<MatchOutput> {
        let _span = trace_span!("match_sets", strategy = self.cfg.strategy.name()).entered();
        let clock = PhaseClock::start();

        let distances = self.distance_matrix(d1, d2)?;
        let scores = self.score_blocks(&distances, s1, s2)?;
        let matches = self.assign(&scores);

        trace_event!(
            "match_sets_done",
            matches = matches.len(),
            elapsed_ms = clock.elapsed_ms()
        );
        Ok(MatchOutput {
            distances,
            scores,
            matches,
        })
    }

    /// Runs all phases on two feature sets.
    pub fn match_features(&self, f1: &FeatureSet, f2: &FeatureSet) -> ScaleMatchResult<MatchOutput> {
        self.match_sets(
            f1.descriptors(),
            f1.detection_scales(),
            f2.descriptors(),
            f2.detection_scales(),
        )
    }
}
