//! Fan-out over independent output cells.
//!
//! Every kernel writes into one pre-allocated output array split into
//! fixed-size cells, one per (threshold, group) or (strategy, group). Cells
//! share nothing, so they can be filled in any order; each cell is reduced
//! sequentially, which keeps results identical with or without `parallel`.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Call `fill(cell_index, cell)` for every `cell_len`-sized chunk of `out`
pub(crate) fn for_each_cell<T, F>(out: &mut [T], cell_len: usize, fill: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if cell_len == 0 {
        return;
    }

    #[cfg(feature = "parallel")]
    out.par_chunks_mut(cell_len)
        .enumerate()
        .for_each(|(cell, chunk)| fill(cell, chunk));

    #[cfg(not(feature = "parallel"))]
    out.chunks_mut(cell_len)
        .enumerate()
        .for_each(|(cell, chunk)| fill(cell, chunk));
}
