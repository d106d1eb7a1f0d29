// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A fork-join loop over the rows of a frame buffer.
//!
//! Rows are handed out one at a time from a shared queue, so a worker
//! stuck on the expensive rows (the ones crossing the interior of the
//! set, where every sample runs to the iteration limit) doesn't hold
//! the others up.  Each row is a disjoint mutable slice of the buffer:
//! a worker only ever writes the rows it pulled, and the buffer itself
//! needs no lock.  All workers are joined before `for_each_row`
//! returns.

use std::iter::Enumerate;
use std::slice::ChunksMut;
use std::sync::{Arc, Mutex};

use crate::errors::RenderError;

type RowQueue<'a, T> = Arc<Mutex<Enumerate<ChunksMut<'a, T>>>>;

/// Runs `work` over every `width`-long row of `buffer` on `threads`
/// scoped workers.  Each worker calls `init` once, before its first
/// row, and passes the resulting scratch state to every row it
/// processes.  `work` receives the row index and the row itself.
pub fn for_each_row<T, S, I, F>(
    buffer: &mut [T],
    width: usize,
    threads: usize,
    init: I,
    work: F,
) -> Result<(), RenderError>
where
    T: Send,
    I: Fn() -> S + Sync,
    F: Fn(&mut S, usize, &mut [T]) + Sync,
{
    if width == 0 || buffer.is_empty() {
        return Err(RenderError::EmptyFrame {
            width,
            height: buffer.len() / width.max(1),
        });
    }
    let rows = (buffer.len() + width - 1) / width;
    let threads = threads.max(1).min(rows);
    let queue: RowQueue<T> = Arc::new(Mutex::new(buffer.chunks_mut(width).enumerate()));
    let (init, work) = (&init, &work);

    crossbeam::scope(|spawner| {
        for _ in 0..threads {
            let queue = queue.clone();
            spawner.spawn(move |_| {
                let mut scratch = init();
                loop {
                    // A poisoned queue means another worker panicked;
                    // the scope reports that, so just stop.
                    let row = match queue.lock() {
                        Ok(mut queue) => queue.next(),
                        Err(_) => None,
                    };
                    match row {
                        Some((index, row)) => work(&mut scratch, index, row),
                        None => {
                            break;
                        }
                    }
                }
            });
        }
    })
    .map_err(|_| RenderError::WorkerPanic)
}
