use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use deskew_image::Image;

/// Controls how resampling loops are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Use the global Rayon thread pool to process destination rows in parallel.
    #[default]
    ParallelRows,
}

/// Apply a function to each pixel of the source image, writing into the destination.
///
/// Both images must have the same size.
pub fn par_iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
{
    let cols = src.cols();
    if cols == 0 {
        return;
    }

    src.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(C1)
                .zip(dst_chunk.chunks_exact_mut(C2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each destination pixel together with its `(x, y)` coordinates.
///
/// Rows are distributed over the thread pool unless the strategy is
/// [`ExecutionStrategy::Serial`].
pub fn iter_rows_indexed<T, const C: usize>(
    dst: &mut Image<T, C>,
    strategy: ExecutionStrategy,
    f: impl Fn(usize, usize, &mut [T]) + Send + Sync,
) where
    T: Send + Sync,
{
    let cols = dst.cols();
    if cols == 0 || C == 0 {
        return;
    }

    let row_op = |(y, row): (usize, &mut [T])| {
        row.chunks_exact_mut(C)
            .enumerate()
            .for_each(|(x, pixel)| f(x, y, pixel));
    };

    match strategy {
        ExecutionStrategy::Serial => dst
            .as_slice_mut()
            .chunks_exact_mut(C * cols)
            .enumerate()
            .for_each(row_op),
        ExecutionStrategy::ParallelRows => dst
            .as_slice_mut()
            .par_chunks_exact_mut(C * cols)
            .enumerate()
            .for_each(row_op),
    }
}
