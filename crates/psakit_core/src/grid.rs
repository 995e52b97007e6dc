//! Stride arithmetic for the flat draw and output arrays.
//!
//! Draws live in one flat array per quantity (effect, cost) laid out in
//! row-major order over three axes: group, sample and strategy. The order of
//! the inner two axes depends on the consumer, see [`DrawOrder`]. Kernels
//! never look draws up by key; they compute offsets from the strides here.

use serde::{Deserialize, Serialize};

/// Row order of a draw array. The group axis is always outermost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawOrder {
    /// `(group, sample, strategy)`: all strategies of one draw are adjacent.
    /// Used by the whole-population kernels, which reduce across strategies.
    GroupSampleStrategy,
    /// `(group, strategy, sample)`: one strategy's draws are contiguous.
    /// Used by the pairwise engine, which walks samples per strategy.
    GroupStrategySample,
}

/// Row-major strides for the given shape, last dimension varying fastest.
fn compute_strides(shape: &[usize; 3]) -> [usize; 3] {
    let mut strides = [1; 3];
    for i in (0..2).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Dimensions and strides of a balanced draw panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    order: DrawOrder,
    n_groups: usize,
    n_samples: usize,
    n_strategies: usize,
    group_stride: usize,
    sample_stride: usize,
    strategy_stride: usize,
}

impl Layout {
    pub fn new(order: DrawOrder, n_groups: usize, n_samples: usize, n_strategies: usize) -> Self {
        let (group_stride, sample_stride, strategy_stride) = match order {
            DrawOrder::GroupSampleStrategy => {
                let [g, s, j] = compute_strides(&[n_groups, n_samples, n_strategies]);
                (g, s, j)
            }
            DrawOrder::GroupStrategySample => {
                let [g, j, s] = compute_strides(&[n_groups, n_strategies, n_samples]);
                (g, s, j)
            }
        };
        Self {
            order,
            n_groups,
            n_samples,
            n_strategies,
            group_stride,
            sample_stride,
            strategy_stride,
        }
    }

    pub fn order(&self) -> DrawOrder {
        self.order
    }

    pub fn n_groups(&self) -> usize {
        self.n_groups
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn n_strategies(&self) -> usize {
        self.n_strategies
    }

    /// Total number of draws covered by the layout
    pub fn len(&self) -> usize {
        self.n_groups * self.n_samples * self.n_strategies
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat offset of the draw for (group, sample, strategy), all given as ordinal indices
    #[inline]
    pub fn offset(&self, group: usize, sample: usize, strategy: usize) -> usize {
        debug_assert!(group < self.n_groups && sample < self.n_samples);
        debug_assert!(strategy < self.n_strategies);
        group * self.group_stride + sample * self.sample_stride + strategy * self.strategy_stride
    }
}
