// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::mem::size_of;

use zerocopy::FromBytes;
use zerocopy::Immutable;
use zerocopy::IntoBytes;

use crate::capabilities;
use crate::object_heap::ObjectKind;
use crate::session::Session;
use crate::status::VaError;
use crate::status::VaResult;
use crate::types::BufferType;
use crate::BufferId;

/// A typed array of `max_num_elements` elements of `element_size` bytes each. The contents are
/// opaque to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectBuffer {
    pub buffer_type: BufferType,
    pub element_size: u32,
    pub max_num_elements: u32,
    pub num_elements: u32,
    store: Vec<u8>,
    mapped: bool,
}

impl ObjectBuffer {
    fn new(buffer_type: BufferType) -> Self {
        Self {
            buffer_type,
            element_size: 0,
            max_num_elements: 0,
            num_elements: 0,
            store: Vec::new(),
            mapped: false,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.store
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferInfo {
    pub buffer_type: BufferType,
    pub element_size: u32,
    pub num_elements: u32,
    pub max_num_elements: u32,
}

impl Session {
    /// Creates an empty buffer. Its store is set up by `set_buffer_data`.
    pub fn create_buffer(&mut self, buffer_type: BufferType) -> VaResult<BufferId> {
        if !capabilities::is_supported_buffer_type(buffer_type) {
            return Err(VaError::UnsupportedBufferType(buffer_type));
        }
        let id = self.buffers.insert(ObjectBuffer::new(buffer_type))?;
        log::debug!("created {:?} buffer {}", buffer_type, id);
        Ok(id)
    }

    /// Creates a buffer and fills it in one step. The buffer is released again if the data
    /// cannot be stored.
    pub fn create_buffer_with_data(
        &mut self,
        buffer_type: BufferType,
        element_size: u32,
        num_elements: u32,
        data: Option<&[u8]>,
    ) -> VaResult<BufferId> {
        let id = self.create_buffer(buffer_type)?;
        if let Err(e) = self.set_buffer_data(id, element_size, num_elements, data) {
            self.buffers.free(id);
            return Err(e);
        }
        Ok(id)
    }

    /// Replaces the store of `buffer` with `num_elements * element_size` bytes, copied from
    /// `data` or zeroed. On failure the previous store is left untouched.
    pub fn set_buffer_data(
        &mut self,
        buffer: BufferId,
        element_size: u32,
        num_elements: u32,
        data: Option<&[u8]>,
    ) -> VaResult<()> {
        self.buffer(buffer)?;

        let size = (element_size as usize)
            .checked_mul(num_elements as usize)
            .ok_or(VaError::AllocationFailed(ObjectKind::Buffer))?;
        if let Some(data) = data {
            if data.len() != size {
                return Err(VaError::DataSizeMismatch { expected: size, actual: data.len() });
            }
        }

        let mut store = Vec::new();
        store.try_reserve_exact(size).map_err(|_| VaError::AllocationFailed(ObjectKind::Buffer))?;
        match data {
            Some(data) => store.extend_from_slice(data),
            None => store.resize(size, 0),
        }

        let object = self.buffer_mut(buffer)?;
        object.store = store;
        object.element_size = element_size;
        object.max_num_elements = num_elements;
        object.num_elements = num_elements;
        Ok(())
    }

    /// Stores `elements` as the contents of `buffer`, one element per item.
    pub fn set_buffer_elements<E: IntoBytes + Immutable>(
        &mut self,
        buffer: BufferId,
        elements: &[E],
    ) -> VaResult<()> {
        let overflow = VaError::AllocationFailed(ObjectKind::Buffer);
        let element_size = u32::try_from(size_of::<E>()).map_err(|_| overflow)?;
        let num_elements = u32::try_from(elements.len()).map_err(|_| overflow)?;
        self.set_buffer_data(buffer, element_size, num_elements, Some(elements.as_bytes()))
    }

    /// Reads back the first `num_elements` elements of `buffer` as `E`.
    pub fn buffer_elements<E: FromBytes>(&self, buffer: BufferId) -> VaResult<Vec<E>> {
        let object = self.buffer(buffer)?;
        let element_size = object.element_size as usize;
        if element_size == 0 || element_size != size_of::<E>() {
            return Err(VaError::DataSizeMismatch {
                expected: element_size,
                actual: size_of::<E>(),
            });
        }

        let len = element_size * object.num_elements as usize;
        object.store[..len]
            .chunks_exact(element_size)
            .map(|chunk| {
                E::read_from_bytes(chunk).map_err(|_| VaError::DataSizeMismatch {
                    expected: element_size,
                    actual: chunk.len(),
                })
            })
            .collect()
    }

    /// Sets how many elements of `buffer` are in use.
    pub fn set_element_count(&mut self, buffer: BufferId, num_elements: u32) -> VaResult<()> {
        let object = self.buffer_mut(buffer)?;
        if num_elements > object.max_num_elements {
            return Err(VaError::ElementCountOutOfRange {
                requested: num_elements,
                max: object.max_num_elements,
            });
        }
        object.num_elements = num_elements;
        Ok(())
    }

    /// Gives direct access to the store of `buffer`. Buffers without a store cannot be mapped.
    pub fn map_buffer(&mut self, buffer: BufferId) -> VaResult<&mut [u8]> {
        let object = self.buffer_mut(buffer)?;
        if object.store.is_empty() {
            return Err(VaError::InvalidBuffer(buffer.raw()));
        }
        object.mapped = true;
        Ok(object.store.as_mut_slice())
    }

    pub fn unmap_buffer(&mut self, buffer: BufferId) -> VaResult<()> {
        let object = self.buffer_mut(buffer)?;
        if !object.mapped {
            log::debug!("unmapping buffer {} that is not mapped", buffer);
        }
        object.mapped = false;
        Ok(())
    }

    pub fn destroy_buffer(&mut self, buffer: BufferId) -> VaResult<()> {
        self.buffer(buffer)?;
        let object = self.buffers.free(buffer);
        log::debug!(
            "destroyed {:?} buffer {} ({} bytes)",
            object.buffer_type,
            buffer,
            object.store.len()
        );
        Ok(())
    }

    pub fn buffer_info(&self, buffer: BufferId) -> VaResult<BufferInfo> {
        let object = self.buffer(buffer)?;
        Ok(BufferInfo {
            buffer_type: object.buffer_type,
            element_size: object.element_size,
            num_elements: object.num_elements,
            max_num_elements: object.max_num_elements,
        })
    }
}
