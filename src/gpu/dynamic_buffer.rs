//! Growable GPU buffers.
//!
//! Buffers grow 2x when data exceeds capacity and never shrink (GPU buffers
//! cannot be resized in place).

use std::marker::PhantomData;

/// A GPU buffer of `T` items that reallocates when a write outgrows it.
pub struct DynamicBuffer<T> {
    buffer: wgpu::Buffer,
    /// Capacity in items.
    capacity: usize,
    /// Items written by the last `write`.
    count: usize,
    usage: wgpu::BufferUsages,
    label: String,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> DynamicBuffer<T> {
    /// Buffer with room for `capacity` items.
    #[must_use]
    pub fn with_capacity(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: Self::allocate(device, label, capacity, usage),
            capacity,
            count: 0,
            usage,
            label: label.to_owned(),
            _marker: PhantomData,
        }
    }

    fn allocate(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * size_of::<T>()) as u64,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Write `data` from the start of the buffer, growing if necessary.
    ///
    /// Returns `true` if the buffer was reallocated.
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let reallocated = data.len() > self.capacity;
        if reallocated {
            let capacity = grown_capacity(self.capacity, data.len());
            log::debug!(
                "growing '{}' from {} to {capacity} items",
                self.label,
                self.capacity
            );
            self.buffer =
                Self::allocate(device, &self.label, capacity, self.usage);
            self.capacity = capacity;
        }
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
        self.count = data.len();
        reallocated
    }

    /// Underlying wgpu buffer.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Items written by the last write.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Capacity in items.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Next capacity for a buffer of `current` items that must hold `needed`.
fn grown_capacity(current: usize, needed: usize) -> usize {
    (needed * 2).max(current + 16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_at_least_doubles_the_request() {
        assert_eq!(grown_capacity(10, 11), 26);
        assert_eq!(grown_capacity(100, 300), 600);
    }
}
