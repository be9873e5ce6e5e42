/*
worker.rs

Copyright 2025 Hervé Quatremain

This file is part of Shapefill.

Shapefill is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Shapefill is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Shapefill. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Run a board generation in the background.
//!
//! The generation runs in its own thread and sends its result through a channel of capacity one.
//! The owner polls the channel, waits for it with an optional timeout, or stops the generation.
//! Stopping is cooperative: the search looks at its [`StopHandle`] at every step, gives up, and
//! reports `Ok(None)`.

use async_channel::{Receiver, Sender, TryRecvError};
use log::{debug, warn};
use std::io;
use std::thread;
use std::time::{Duration, Instant};

use super::auto_generation::{AutoGeneration, GeneratedGrid, GenerationError, GenerationParams};
use super::packer::StopHandle;
use crate::config::WORKER_POLL_MS;

/// The search recurses once per placed cell: give the worker room for the largest boards.
const WORKER_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Result sent by the worker thread.
pub type GenerationResult = Result<Option<GeneratedGrid>, GenerationError>;

/// Board generation running in a background thread.
pub struct GenerationWorker {
    /// Receiving end of the result channel.
    receiver: Receiver<GenerationResult>,

    /// Cancellation flag of the running generation.
    stop: StopHandle,

    /// Seed of the random grow moves.
    seed: u64,

    /// Result already received by [`GenerationWorker::try_result`].
    result: Option<GenerationResult>,

    thread: Option<thread::JoinHandle<()>>,
}

impl GenerationWorker {
    /// Start a board generation in a new thread.
    ///
    /// # Errors
    ///
    /// The method returns an error when the thread cannot be created.
    pub fn start(params: GenerationParams, seed: Option<u64>) -> io::Result<Self> {
        let (sender, receiver) = async_channel::bounded::<GenerationResult>(1);
        let mut generation: AutoGeneration = AutoGeneration::new(params, seed);
        let stop: StopHandle = generation.stop_handle();
        let seed: u64 = generation.seed();

        let thread = thread::Builder::new()
            .name("board-generation".to_string())
            .stack_size(WORKER_STACK_SIZE)
            .spawn(move || run(&mut generation, &sender))?;

        debug!("Generation worker started (seed {seed})");
        Ok(Self {
            receiver,
            stop,
            seed,
            result: None,
            thread: Some(thread),
        })
    }

    /// Return the seed of the random grow moves.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Ask the generation to stop. The worker then reports `Ok(None)`, unless it has already
    /// completed.
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Whether the worker has a result ready, or has ended without one.
    pub fn is_finished(&mut self) -> bool {
        self.poll();
        self.result.is_some() || self.thread.is_none()
    }

    /// Return the result of the generation if it is ready, without blocking.
    pub fn try_result(&mut self) -> Option<GenerationResult> {
        self.poll();
        let result: Option<GenerationResult> = self.result.take();
        if result.is_some() {
            self.join();
        }
        result
    }

    /// Wait for the result of the generation.
    ///
    /// With a timeout, the generation is stopped when the timeout expires, and the method then
    /// waits for the worker to acknowledge the stop.
    pub fn wait(mut self, timeout: Option<Duration>) -> GenerationResult {
        let start: Instant = Instant::now();

        if let Some(limit) = timeout {
            loop {
                if let Some(result) = self.try_result() {
                    return result;
                }
                if start.elapsed() >= limit {
                    warn!("Generation timed out after {}s, stopping", limit.as_secs_f32());
                    self.stop();
                    break;
                }
                thread::sleep(Duration::from_millis(WORKER_POLL_MS));
            }
        }

        let result: GenerationResult = match self.result.take() {
            Some(result) => result,
            None => self
                .receiver
                .recv_blocking()
                .unwrap_or(Err(GenerationError::WorkerDisconnected)),
        };
        self.join();
        result
    }

    /// Move a pending result out of the channel.
    fn poll(&mut self) {
        // The result has already been handed over when the thread is joined
        if self.result.is_some() || self.thread.is_none() {
            return;
        }
        match self.receiver.try_recv() {
            Ok(result) => self.result = Some(result),
            Err(TryRecvError::Empty) => (),
            Err(TryRecvError::Closed) => {
                self.result = Some(Err(GenerationError::WorkerDisconnected));
            }
        }
    }

    fn join(&mut self) {
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            warn!("The generation worker panicked");
        }
    }
}

impl Drop for GenerationWorker {
    fn drop(&mut self) {
        // Do not leave an orphan search running
        if self.thread.is_some() {
            self.stop();
        }
    }
}

/// Body of the worker thread.
fn run(generation: &mut AutoGeneration, sender: &Sender<GenerationResult>) {
    let result: GenerationResult = generation.generate();
    if sender.send_blocking(result).is_err() {
        debug!("Generation result dropped: the worker owner is gone");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::topology::GridShape;

    #[test]
    fn worker_returns_a_board() {
        let params = GenerationParams::new(GridShape::Square, 4, 4, 4, 4, 4);
        let worker = GenerationWorker::start(params, Some(11)).unwrap();
        assert_eq!(worker.seed(), 11);

        let grid = worker.wait(None).unwrap().unwrap();
        assert_eq!(grid.shape_sizes(), vec![4, 4, 4, 4]);
    }

    #[test]
    fn worker_reports_errors() {
        let params = GenerationParams::new(GridShape::Square, 3, 3, 5, 2, 9);
        let worker = GenerationWorker::start(params, Some(1)).unwrap();
        assert_eq!(
            worker.wait(Some(Duration::from_secs(30))),
            Err(GenerationError::InfeasibleConstraints)
        );
    }

    #[test]
    fn polling_eventually_returns_the_result() {
        let params = GenerationParams::new(GridShape::Hexagon, 3, 3, 3, 3, 3);
        let mut worker = GenerationWorker::start(params, Some(5)).unwrap();

        let start = Instant::now();
        while !worker.is_finished() {
            assert!(start.elapsed() < Duration::from_secs(30));
            thread::sleep(Duration::from_millis(WORKER_POLL_MS));
        }
        let grid = worker.try_result().unwrap().unwrap().unwrap();
        assert_eq!(grid.shape_sizes(), vec![3, 3, 3]);
        assert!(worker.try_result().is_none());
    }
}
