//! Row-aligned chunking of a pixel buffer and the per-chunk recolor pass.
//!
//! A job splits its source into `workers` contiguous row ranges. The first
//! `workers - 1` chunks get `height / workers` rows each and the last chunk
//! takes whatever is left, so the ranges always cover `0..height` exactly.
//! Chunks share nothing but the read-only [`Palette`]; each one owns its
//! pixel bytes and hands back a new slice of the same length.

use std::num::NonZeroUsize;
use std::ops::Range;

use crate::color::PerceptualColor;
use crate::image::{PixelBuffer, CHANNELS};
use crate::palette::Palette;
use crate::progress::ProgressEvent;

/// Split `height` rows into `workers` contiguous ranges.
///
/// Chunks may be empty when `workers > height`.
///
/// ```
/// use std::num::NonZeroUsize;
/// use oklab_recolor::chunk_rows;
///
/// let rows = chunk_rows(10, NonZeroUsize::new(3).unwrap());
/// assert_eq!(rows, vec![0..3, 3..6, 6..10]);
/// ```
pub fn chunk_rows(height: usize, workers: NonZeroUsize) -> Vec<Range<usize>> {
    let workers = workers.get();
    let rows_per_chunk = height / workers;

    (0..workers)
        .map(|i| {
            let start = i * rows_per_chunk;
            let end = if i == workers - 1 {
                height
            } else {
                (i + 1) * rows_per_chunk
            };
            start..end
        })
        .collect()
}

/// One independent unit of work: a copy of a contiguous run of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkTask {
    /// Position of this chunk in the job, `0..workers`
    pub index: usize,
    /// Byte offset of the first pixel in the source buffer
    pub start: usize,
    /// Byte offset one past the last pixel
    pub end: usize,
    /// RGBA8 bytes of `start..end`
    pub pixels: Vec<u8>,
}

impl ChunkTask {
    /// Cut `source` into one task per row range of [`chunk_rows`].
    pub fn split(source: &PixelBuffer, workers: NonZeroUsize) -> Vec<ChunkTask> {
        let stride = source.stride();
        let bytes = source.as_bytes();

        chunk_rows(source.height(), workers)
            .into_iter()
            .enumerate()
            .map(|(index, rows)| {
                let start = rows.start * stride;
                let end = rows.end * stride;
                ChunkTask {
                    index,
                    start,
                    end,
                    pixels: bytes[start..end].to_vec(),
                }
            })
            .collect()
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len() / CHANNELS
    }
}

/// The recolored bytes of one [`ChunkTask`], same length and order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkResult {
    pub index: usize,
    pub start: usize,
    pub pixels: Vec<u8>,
}

/// Recolor every pixel of `task` to its nearest `palette` entry.
///
/// Alpha bytes are left untouched. `on_progress` is called each time
/// another `interval` pixels are done; a chunk that never reaches the
/// interval reports nothing and is considered complete once its result is
/// returned.
pub fn recolor_chunk<F>(
    task: ChunkTask,
    palette: &Palette,
    interval: NonZeroUsize,
    mut on_progress: F,
) -> ChunkResult
where
    F: FnMut(ProgressEvent),
{
    let ChunkTask {
        index,
        start,
        mut pixels,
        ..
    } = task;
    let total = pixels.len() / CHANNELS;

    for (i, px) in pixels.chunks_exact_mut(CHANNELS).enumerate() {
        recolor_pixel(px, palette);

        let done = i + 1;
        if done % interval.get() == 0 {
            on_progress(ProgressEvent {
                chunk: index,
                done,
                total,
            });
        }
    }

    ChunkResult {
        index,
        start,
        pixels,
    }
}

#[inline]
fn recolor_pixel(px: &mut [u8], palette: &Palette) {
    let sample = PerceptualColor::from_rgb([px[0], px[1], px[2]]);
    let [r, g, b] = palette.output(palette.find_nearest(&sample));
    px[0] = r;
    px[1] = g;
    px[2] = b;
}

/// Recolor a whole buffer on the calling thread, as a single chunk.
///
/// Produces the same bytes as any parallel split of the same buffer.
pub fn recolor_buffer(source: &PixelBuffer, palette: &Palette) -> PixelBuffer {
    let mut out = source.clone();
    for px in out.as_bytes_mut().chunks_exact_mut(CHANNELS) {
        recolor_pixel(px, palette);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_rows_partition_exactly() {
        for height in 0..40 {
            for workers in 1..12 {
                let rows = chunk_rows(height, nz(workers));
                assert_eq!(rows.len(), workers);
                assert_eq!(rows[0].start, 0);
                assert_eq!(rows.last().unwrap().end, height);
                for pair in rows.windows(2) {
                    assert_eq!(pair[0].end, pair[1].start, "gap or overlap");
                }
                let total: usize = rows.iter().map(|r| r.len()).sum();
                assert_eq!(total, height);
            }
        }
    }

    #[test]
    fn test_last_chunk_absorbs_remainder() {
        let rows = chunk_rows(11, nz(4));
        assert_eq!(rows, vec![0..2, 2..4, 4..6, 6..11]);
    }

    #[test]
    fn test_more_workers_than_rows() {
        let rows = chunk_rows(1, nz(8));
        assert_eq!(rows.iter().filter(|r| !r.is_empty()).count(), 1);
        assert_eq!(rows[7], 0..1);
        assert!(rows[..7].iter().all(|r| r.is_empty()));
    }

    #[test]
    fn test_split_offsets_are_byte_offsets() {
        let source = PixelBuffer::filled(3, 5, [9, 9, 9, 255]);
        let tasks = ChunkTask::split(&source, nz(2));
        assert_eq!(tasks.len(), 2);
        assert_eq!((tasks[0].start, tasks[0].end), (0, 24));
        assert_eq!((tasks[1].start, tasks[1].end), (24, 60));
        assert_eq!(tasks[1].pixel_count(), 9);
    }

    #[test]
    fn test_recolor_chunk_keeps_alpha() {
        let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
        let task = ChunkTask {
            index: 3,
            start: 40,
            end: 48,
            pixels: vec![10, 10, 10, 7, 250, 250, 250, 0],
        };
        let result = recolor_chunk(task, &palette, nz(100), |_| {});
        assert_eq!(result.index, 3);
        assert_eq!(result.start, 40);
        assert_eq!(result.pixels, vec![0, 0, 0, 7, 255, 255, 255, 0]);
    }

    #[test]
    fn test_progress_reported_every_interval() {
        let palette = Palette::from_hex(&["#808080"]).unwrap();
        let task = ChunkTask {
            index: 1,
            start: 0,
            end: 7 * 4,
            pixels: vec![0; 7 * 4],
        };
        let mut events = Vec::new();
        recolor_chunk(task, &palette, nz(3), |e| events.push(e));
        assert_eq!(
            events,
            vec![
                ProgressEvent { chunk: 1, done: 3, total: 7 },
                ProgressEvent { chunk: 1, done: 6, total: 7 },
            ]
        );
    }

    #[test]
    fn test_empty_chunk_completes_without_reports() {
        let palette = Palette::from_hex(&["#808080"]).unwrap();
        let task = ChunkTask {
            index: 0,
            start: 0,
            end: 0,
            pixels: Vec::new(),
        };
        let mut reports = 0;
        let result = recolor_chunk(task, &palette, nz(1), |_| reports += 1);
        assert!(result.pixels.is_empty());
        assert_eq!(reports, 0);
    }
}
