//! Storage behind the object registry
//!
//! The registry only ever talks to an [`ObjectBuffer`]: write one record,
//! grow, publish the live count. [`GpuObjectBuffer`] is the real storage
//! buffer read by the shader; [`HostObjectBuffer`] keeps the same bytes in
//! memory so the registry can be exercised without an adapter.

use std::sync::Arc;

use tracing::debug;
use wgpu::util::DeviceExt;

use crate::gpu_types::{ObjectRecord, SceneCounts};

/// Bytes per object record.
pub const RECORD_SIZE: u64 = std::mem::size_of::<ObjectRecord>() as u64;

/// Packed, fixed-stride array of object records.
pub trait ObjectBuffer {
    /// Number of records that fit without growing.
    fn capacity(&self) -> usize;

    /// Overwrite the record at `slot`. `slot` must be below [`ObjectBuffer::capacity`].
    fn write_record(&mut self, slot: usize, record: &ObjectRecord);

    /// Reallocate to hold `new_capacity` records, keeping every existing byte.
    fn grow(&mut self, new_capacity: usize);

    /// Publish the number of live records.
    fn set_count(&mut self, count: u32);
}

/// In-memory object buffer with the same layout as the GPU one.
#[derive(Clone, Debug, Default)]
pub struct HostObjectBuffer {
    bytes: Vec<u8>,
    count: u32,
    grow_events: usize,
}

impl HostObjectBuffer {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity * RECORD_SIZE as usize],
            count: 0,
            grow_events: 0,
        }
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Raw bytes of one slot.
    #[must_use]
    pub fn record_bytes(&self, slot: usize) -> &[u8] {
        let stride = RECORD_SIZE as usize;
        &self.bytes[slot * stride..(slot + 1) * stride]
    }

    #[must_use]
    pub fn record(&self, slot: usize) -> ObjectRecord {
        bytemuck::pod_read_unaligned(self.record_bytes(slot))
    }

    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// How many times the buffer has been reallocated.
    #[must_use]
    pub fn grow_events(&self) -> usize {
        self.grow_events
    }
}

impl ObjectBuffer for HostObjectBuffer {
    fn capacity(&self) -> usize {
        self.bytes.len() / RECORD_SIZE as usize
    }

    fn write_record(&mut self, slot: usize, record: &ObjectRecord) {
        let stride = RECORD_SIZE as usize;
        self.bytes[slot * stride..(slot + 1) * stride].copy_from_slice(bytemuck::bytes_of(record));
    }

    fn grow(&mut self, new_capacity: usize) {
        let mut bytes = vec![0; new_capacity * RECORD_SIZE as usize];
        bytes[..self.bytes.len()].copy_from_slice(&self.bytes);
        self.bytes = bytes;
        self.grow_events += 1;
    }

    fn set_count(&mut self, count: u32) {
        self.count = count;
    }
}

/// Object storage buffer on the GPU plus the uniform holding the live count.
pub struct GpuObjectBuffer {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    buffer: wgpu::Buffer,
    counts: wgpu::Buffer,
    capacity: usize,
    generation: u64,
}

impl GpuObjectBuffer {
    #[must_use]
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let buffer = create_storage(&device, capacity);
        let counts = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Object Counts"),
            contents: bytemuck::bytes_of(&SceneCounts::new(0)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            device,
            queue,
            buffer,
            counts,
            capacity,
            generation: 0,
        }
    }

    /// Storage buffer bound at the objects slot of the bind group.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    #[must_use]
    pub fn counts_buffer(&self) -> &wgpu::Buffer {
        &self.counts
    }

    /// Bumped on every reallocation. Bind groups built from an older
    /// generation point at a released buffer and must be rebuilt.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl ObjectBuffer for GpuObjectBuffer {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn write_record(&mut self, slot: usize, record: &ObjectRecord) {
        self.queue
            .write_buffer(&self.buffer, slot as u64 * RECORD_SIZE, bytemuck::bytes_of(record));
    }

    fn grow(&mut self, new_capacity: usize) {
        let grown = create_storage(&self.device, new_capacity);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Object Buffer Grow"),
            });
        encoder.copy_buffer_to_buffer(&self.buffer, 0, &grown, 0, self.buffer.size());
        self.queue.submit(Some(encoder.finish()));

        debug!(
            from = self.capacity,
            to = new_capacity,
            generation = self.generation + 1,
            "object buffer grown"
        );
        // Dropping the old handle releases it once the copy has executed.
        self.buffer = grown;
        self.capacity = new_capacity;
        self.generation += 1;
    }

    fn set_count(&mut self, count: u32) {
        self.queue
            .write_buffer(&self.counts, 0, bytemuck::bytes_of(&SceneCounts::new(count)));
    }
}

fn create_storage(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Objects"),
        size: capacity as u64 * RECORD_SIZE,
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::COPY_SRC,
        mapped_at_creation: false,
    })
}
