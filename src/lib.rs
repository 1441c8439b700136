//! ScaleMatch matches binary ORB-style descriptors computed at every level
//! of an image pyramid.
//!
//! Each keypoint is described at all `n_levels` levels, so comparing two
//! keypoints yields an `n_levels x n_levels` block of Hamming distances
//! rather than a single number. A [`Strategy`] reduces every block to a score
//! and the matched pyramid levels, and a greedy pass turns the score matrix
//! into one-to-one correspondences.
//!
//! ```no_run
//! use scalematch::{CrossScaleMatcher, DescriptorSet, MatchConfig, Strategy};
//!
//! # fn run(d1: DescriptorSet, d2: DescriptorSet) -> scalematch::ScaleMatchResult<()> {
//! let matcher = CrossScaleMatcher::new(MatchConfig {
//!     strategy: Strategy::DiagonalBand,
//!     ..MatchConfig::default()
//! })?;
//! let output = matcher.match_sets(&d1, &[], &d2, &[])?;
//! for m in &output.matches {
//!     println!("{} -> {} ({})", m.row, m.col, m.distance);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Optional features: `rayon` parallelizes the distance and scoring phases,
//! `tracing` emits spans per phase, and `image-io` adds grayscale image
//! loading for extractor front-ends.

pub mod descriptor;
pub mod extract;
pub mod io;
pub mod kernel;
pub mod matrix;
pub mod score;
pub mod search;
mod trace;
pub mod util;

pub use descriptor::{bit_distance, Descriptor, DescriptorSet, FeatureSet, KeypointMeta};
pub use extract::{ExtractParams, FeatureExtractor, GrayFrame};
pub use kernel::{DiagonalKernel, KernelOptions};
pub use matrix::{Block, Matrix};
pub use score::{build_scorer, BlockScore, BlockScorer, MaskRegion, MaxCondition, ScorerParams, Strategy};
pub use search::{CrossScaleMatcher, Match, MatchConfig, MatchOutput, ScoreMatrices, DEFAULT_LEVELS};
pub use util::{ScaleMatchError, ScaleMatchResult};
