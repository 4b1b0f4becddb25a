//! Typed uniform buffers

use std::marker::PhantomData;

use wgpu::util::DeviceExt;

/// Uniform buffer holding exactly one `Content`
///
/// The last uploaded bytes are kept on the CPU so per-frame updates with
/// unchanged data never reach the queue.
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    uploaded: Option<Vec<u8>>,
    content_type: PhantomData<Content>,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    const USAGE: wgpu::BufferUsages =
        wgpu::BufferUsages::UNIFORM.union(wgpu::BufferUsages::COPY_DST);

    /// Creates an uninitialized buffer; the first update always uploads
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&buffer_label::<Content>()),
            size: std::mem::size_of::<Content>() as u64,
            usage: Self::USAGE,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            uploaded: None,
            content_type: PhantomData,
        }
    }

    /// Creates a buffer already holding `content`
    pub fn with_content(device: &wgpu::Device, content: &Content) -> Self {
        let bytes = bytemuck::bytes_of(content);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&buffer_label::<Content>()),
            contents: bytes,
            usage: Self::USAGE,
        });

        Self {
            buffer,
            uploaded: Some(bytes.to_vec()),
            content_type: PhantomData,
        }
    }

    /// Writes `content` unless it matches the last upload
    ///
    /// Returns whether a write was queued.
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) -> bool {
        let bytes = bytemuck::bytes_of(&content);
        if self.uploaded.as_deref() == Some(bytes) {
            return false;
        }

        queue.write_buffer(&self.buffer, 0, bytes);
        self.uploaded = Some(bytes.to_vec());
        true
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }
}

/// Debug label from the unqualified content type name
fn buffer_label<Content>() -> String {
    let type_name = std::any::type_name::<Content>();
    let short = type_name.rsplit("::").next().unwrap_or(type_name);
    format!("Uniform<{short}>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C)]
    #[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
    struct Params {
        value: [f32; 4],
    }

    #[test]
    fn test_label_uses_short_type_name() {
        assert_eq!(buffer_label::<Params>(), "Uniform<Params>");
        assert_eq!(buffer_label::<f32>(), "Uniform<f32>");
    }
}
