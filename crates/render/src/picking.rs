//! GPU pick readback
//!
//! The fragment covering the requested pixel writes a [`HitRecord`] into a
//! small storage buffer. Getting it back to the CPU goes through a mappable
//! staging buffer:
//!
//! 1. [`PickReadback::begin`] takes the gate and clears the hit buffer.
//! 2. [`PickReadback::encode_copy`] copies hit buffer to staging after the draw.
//! 3. [`PickReadback::begin_map`] starts the async map once the frame is submitted.
//! 4. [`PickReadback::collect`] runs on later frames; once the map callback
//!    has fired it reads the record, unmaps and opens the gate again.
//!
//! Only one readback is ever in flight. A pick requested while the gate is
//! closed is dropped, not queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use scene::HitResult;
use tracing::{debug, warn};
use wgpu::util::DeviceExt;

use crate::gpu_types::HitRecord;

const HIT_SIZE: u64 = std::mem::size_of::<HitRecord>() as u64;

/// Pending flag guarding the staging buffer.
#[derive(Debug, Default)]
pub struct ReadbackGate {
    pending: AtomicBool,
}

impl ReadbackGate {
    /// Claim the staging buffer. Fails while another readback is pending.
    pub fn try_acquire(&self) -> bool {
        self.pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn release(&self) {
        self.pending.store(false, Ordering::Release);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Stage {
    Idle,
    /// Gate held, copy not yet encoded.
    Requested,
    /// Copy encoded, waiting for submission.
    Copied,
    /// `map_async` issued.
    Mapping,
}

/// Hit buffer, staging buffer and the cached result of the last readback.
pub struct PickReadback {
    hit_buffer: wgpu::Buffer,
    staging: wgpu::Buffer,
    gate: Arc<ReadbackGate>,
    stage: Stage,
    mapped: Arc<Mutex<Option<Result<(), wgpu::BufferAsyncError>>>>,
    latest: HitResult,
    sequence: u64,
}

impl PickReadback {
    pub fn new(device: &wgpu::Device) -> Self {
        let hit_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Pick Hit"),
            contents: bytemuck::bytes_of(&HitRecord::NONE),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC | wgpu::BufferUsages::COPY_DST,
        });
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Pick Staging"),
            size: HIT_SIZE,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            hit_buffer,
            staging,
            gate: Arc::new(ReadbackGate::default()),
            stage: Stage::Idle,
            mapped: Arc::new(Mutex::new(None)),
            latest: HitResult::NONE,
            sequence: 0,
        }
    }

    /// Storage buffer the shader writes the hit into.
    pub fn hit_buffer(&self) -> &wgpu::Buffer {
        &self.hit_buffer
    }

    pub fn gate(&self) -> &ReadbackGate {
        &self.gate
    }

    /// Start a pick for the next submission. Returns `false`, and leaves
    /// everything untouched, while a previous readback is still pending.
    pub fn begin(&mut self, queue: &wgpu::Queue) -> bool {
        if !self.gate.try_acquire() {
            debug!("pick dropped: readback still pending");
            return false;
        }
        queue.write_buffer(&self.hit_buffer, 0, bytemuck::bytes_of(&HitRecord::NONE));
        self.stage = Stage::Requested;
        true
    }

    /// Copy the hit record into the staging buffer. No-op unless [`PickReadback::begin`] succeeded.
    pub fn encode_copy(&mut self, encoder: &mut wgpu::CommandEncoder) -> bool {
        if self.stage != Stage::Requested {
            return false;
        }
        encoder.copy_buffer_to_buffer(&self.hit_buffer, 0, &self.staging, 0, HIT_SIZE);
        self.stage = Stage::Copied;
        true
    }

    /// Ask for the staging buffer to be mapped. Call after the copy was submitted.
    pub fn begin_map(&mut self) {
        if self.stage != Stage::Copied {
            return;
        }
        let mapped = Arc::clone(&self.mapped);
        self.staging.slice(..).map_async(wgpu::MapMode::Read, move |result| {
            *mapped.lock() = Some(result);
        });
        self.stage = Stage::Mapping;
    }

    /// Finish a readback whose map has completed. Never blocks.
    ///
    /// Returns the new hit when one arrived since the last call.
    pub fn collect(&mut self) -> Option<HitResult> {
        if self.stage != Stage::Mapping {
            return None;
        }
        let outcome = self.mapped.lock().take()?;
        self.stage = Stage::Idle;

        let result = match outcome {
            Ok(()) => {
                let record: HitRecord = {
                    let data = self.staging.slice(..).get_mapped_range();
                    bytemuck::pod_read_unaligned(&data)
                };
                self.staging.unmap();
                let hit = HitResult::from(record);
                self.latest = hit;
                self.sequence += 1;
                Some(hit)
            }
            Err(err) => {
                warn!("pick readback failed: {err}");
                None
            }
        };
        self.gate.release();
        result
    }

    /// Wait for the in-flight readback, for headless callers and tests.
    pub fn read_blocking(&mut self, device: &wgpu::Device) -> Option<HitResult> {
        if self.stage != Stage::Mapping {
            return None;
        }
        device.poll(wgpu::Maintain::Wait);
        self.collect()
    }

    /// Result of the most recent completed readback.
    pub fn latest(&self) -> HitResult {
        self.latest
    }

    /// Number of completed readbacks.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn is_pending(&self) -> bool {
        self.gate.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_dropped_until_release() {
        let gate = ReadbackGate::default();
        assert!(gate.try_acquire());
        assert!(!gate.try_acquire());
        assert!(gate.is_pending());
        gate.release();
        assert!(gate.try_acquire());
    }

    #[test]
    fn gate_admits_one_of_many_threads() {
        let gate = Arc::new(ReadbackGate::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gate = Arc::clone(&gate);
                std::thread::spawn(move || gate.try_acquire())
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().expect("thread"))
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
