//! Per-worker pixel ranges and their progressive visiting order.
//!
//! The frame is cut into one contiguous range of pixel indices per worker.
//! Inside its range a worker visits every `stride`-th pixel, then wraps to
//! the next offset, so early presentations show a coarse image that fills in.

use std::ops::Range;

/// A contiguous run of linear pixel indices `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSpan {
    pub start: usize,
    pub end: usize,
}

impl PixelSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Split `total` pixels into `workers` contiguous spans. The last span takes
/// the remainder. Spans may be empty when there are more workers than pixels.
pub fn split_spans(total: usize, workers: usize) -> Vec<PixelSpan> {
    let workers = workers.max(1);
    let per_worker = total / workers;

    (0..workers)
        .map(|i| {
            let start = i * per_worker;
            let end = if i + 1 == workers { total } else { start + per_worker };
            PixelSpan::new(start, end)
        })
        .collect()
}

/// Visits each pixel of a span exactly once, `stride` apart, over `stride`
/// passes. State survives pauses: a parked worker resumes where it stopped.
#[derive(Debug, Clone)]
pub struct StrideCursor {
    span: PixelSpan,
    stride: usize,
    pass: usize,
    next: usize,
}

impl StrideCursor {
    pub fn new(span: PixelSpan, stride: usize) -> Self {
        Self {
            span,
            stride: stride.max(1),
            pass: 0,
            next: span.start,
        }
    }

    /// Completed passes so far.
    pub fn pass(&self) -> usize {
        self.pass
    }
}

impl Iterator for StrideCursor {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.pass < self.stride {
            if self.next < self.span.end {
                let index = self.next;
                self.next += self.stride;
                return Some(index);
            }
            self.pass += 1;
            self.next = self.span.start + self.pass;
        }
        None
    }
}
