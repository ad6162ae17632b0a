use bytemuck::{Pod, Zeroable};
use starfield::constants::BACKGROUND_COLOR;
use starfield::surface::{DrawCommand, DrawList};
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::{dpi::PhysicalSize, window::Window};

// --- GPU Data Structures ---

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct GlobalUniforms {
    screen_resolution: [f32; 2],
    _padding: [f32; 2], // Uniform structs are 16-byte aligned
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct QuadVertex {
    corner: [f32; 2],
}

impl QuadVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

const QUAD_VERTICES: &[QuadVertex] = &[
    QuadVertex { corner: [-1.0, -1.0] },
    QuadVertex { corner: [1.0, -1.0] },
    QuadVertex { corner: [1.0, 1.0] },
    QuadVertex { corner: [-1.0, 1.0] },
];
const QUAD_INDICES: &[u16] = &[0, 1, 2, 0, 2, 3];

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct CircleInstance {
    world_position: [f32; 2],
    radius: f32,
    color: [f32; 4],
}

impl CircleInstance {
    fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<CircleInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct LineVertex {
    position: [f32; 2],
    color: [f32; 4],
}

impl LineVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Vertex buffer that grows to the next power of two when a frame outgrows it.
struct GrowableBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    label: &'static str,
}

impl GrowableBuffer {
    fn new<T>(device: &wgpu::Device, label: &'static str, capacity: usize) -> Self {
        Self {
            buffer: Self::allocate::<T>(device, label, capacity),
            capacity,
            label,
        }
    }

    fn allocate<T>(device: &wgpu::Device, label: &'static str, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * std::mem::size_of::<T>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn upload<T: Pod>(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[T]) {
        if data.len() > self.capacity {
            let new_capacity = data.len().next_power_of_two();
            log::debug!(
                "Resizing {} from {} to {} elements",
                self.label,
                self.capacity,
                new_capacity
            );
            self.buffer = Self::allocate::<T>(device, self.label, new_capacity);
            self.capacity = new_capacity;
        }
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
    }

    fn slice<T>(&self, count: usize) -> wgpu::BufferSlice<'_> {
        self.buffer
            .slice(..(count * std::mem::size_of::<T>()) as wgpu::BufferAddress)
    }
}

// --- Renderer ---
pub struct Renderer<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
    circle_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    quad_vertex_buffer: wgpu::Buffer,
    quad_index_buffer: wgpu::Buffer,
    circle_buffer: GrowableBuffer,
    line_buffer: GrowableBuffer,
    circle_data: Vec<CircleInstance>,
    line_data: Vec<LineVertex>,
    global_uniform_buffer: wgpu::Buffer,
    bind_group_globals: wgpu::BindGroup,
}

const INITIAL_CIRCLE_CAPACITY: usize = 256;
const INITIAL_LINE_VERTEX_CAPACITY: usize = 4096;

impl<'a> Renderer<'a> {
    pub async fn new(window: Arc<Window>) -> Result<Self, Box<dyn std::error::Error>> {
        let size = window.inner_size();
        let size = PhysicalSize::new(size.width.max(1), size.height.max(1));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or("failed to find an appropriate adapter")?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or("surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Shader Module"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        // --- Create Buffers ---
        let global_uniforms = GlobalUniforms {
            screen_resolution: [size.width as f32, size.height as f32],
            _padding: [0.0; 2],
        };
        let global_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Global Uniform Buffer"),
            contents: bytemuck::cast_slice(&[global_uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let quad_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Vertex Buffer"),
            contents: bytemuck::cast_slice(QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Index Buffer"),
            contents: bytemuck::cast_slice(QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        let circle_buffer = GrowableBuffer::new::<CircleInstance>(
            &device,
            "Circle Instance Buffer",
            INITIAL_CIRCLE_CAPACITY,
        );
        let line_buffer = GrowableBuffer::new::<LineVertex>(
            &device,
            "Line Vertex Buffer",
            INITIAL_LINE_VERTEX_CAPACITY,
        );

        // --- Bind Groups ---
        let bind_group_layout_globals =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Globals Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<GlobalUniforms>() as _,
                        ),
                    },
                    count: None,
                }],
            });
        let bind_group_globals = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &bind_group_layout_globals,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: global_uniform_buffer.as_entire_binding(),
            }],
        });

        // --- Render Pipelines ---
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particle Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout_globals],
            push_constant_ranges: &[],
        });
        let circle_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            PipelineDesc {
                label: "Circle Pipeline",
                vs_entry: "vs_circle",
                fs_entry: "fs_circle",
                buffers: &[QuadVertex::desc(), CircleInstance::desc()],
                topology: wgpu::PrimitiveTopology::TriangleList,
            },
        );
        // wgpu lines are always one pixel wide; the stroke width is not rasterised.
        let line_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            PipelineDesc {
                label: "Line Pipeline",
                vs_entry: "vs_line",
                fs_entry: "fs_line",
                buffers: &[LineVertex::desc()],
                topology: wgpu::PrimitiveTopology::LineList,
            },
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            circle_pipeline,
            line_pipeline,
            quad_vertex_buffer,
            quad_index_buffer,
            circle_buffer,
            line_buffer,
            circle_data: Vec::with_capacity(INITIAL_CIRCLE_CAPACITY),
            line_data: Vec::with_capacity(INITIAL_LINE_VERTEX_CAPACITY),
            global_uniform_buffer,
            bind_group_globals,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let new_size = PhysicalSize::new(new_size.width.max(1), new_size.height.max(1));
        if new_size != self.size {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);

            let resolution = [new_size.width as f32, new_size.height as f32];
            self.queue.write_buffer(
                &self.global_uniform_buffer,
                0,
                bytemuck::cast_slice(&resolution),
            );
            log::debug!("Renderer resized to {}x{}", new_size.width, new_size.height);
        }
    }

    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Rasterises one recorded frame. Every frame starts from the background
    /// color; partial clears inside the list are not reproduced.
    pub fn render(&mut self, frame: Option<&DrawList>) -> Result<(), wgpu::SurfaceError> {
        let output_texture = self.surface.get_current_texture()?;
        let view = output_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.circle_data.clear();
        self.line_data.clear();
        for command in frame.map(DrawList::commands).unwrap_or_default() {
            match *command {
                DrawCommand::Clear { .. } => {}
                DrawCommand::Circle {
                    center,
                    radius,
                    color,
                } => self.circle_data.push(CircleInstance {
                    world_position: center.to_array(),
                    radius,
                    color: color.to_array(),
                }),
                DrawCommand::Line {
                    from, to, color, ..
                } => {
                    let color = color.to_array();
                    self.line_data.push(LineVertex {
                        position: from.to_array(),
                        color,
                    });
                    self.line_data.push(LineVertex {
                        position: to.to_array(),
                        color,
                    });
                }
            }
        }
        self.circle_buffer
            .upload(&self.device, &self.queue, &self.circle_data);
        self.line_buffer
            .upload(&self.device, &self.queue, &self.line_data);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Particle Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Particle Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            render_pass.set_bind_group(0, &self.bind_group_globals, &[]);

            let circle_count = self.circle_data.len();
            if circle_count > 0 {
                render_pass.set_pipeline(&self.circle_pipeline);
                render_pass.set_vertex_buffer(0, self.quad_vertex_buffer.slice(..));
                render_pass
                    .set_vertex_buffer(1, self.circle_buffer.slice::<CircleInstance>(circle_count));
                render_pass
                    .set_index_buffer(self.quad_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..circle_count as u32);
            }

            let line_vertex_count = self.line_data.len();
            if line_vertex_count > 0 {
                render_pass.set_pipeline(&self.line_pipeline);
                render_pass
                    .set_vertex_buffer(0, self.line_buffer.slice::<LineVertex>(line_vertex_count));
                render_pass.draw(0..line_vertex_count as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output_texture.present();
        Ok(())
    }
}

struct PipelineDesc<'a> {
    label: &'static str,
    vs_entry: &'static str,
    fs_entry: &'static str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    desc: PipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(desc.vs_entry),
            compilation_options: Default::default(),
            buffers: desc.buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(desc.fs_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layouts_match_struct_fields() {
        let line = LineVertex::desc();
        assert_eq!(line.attributes.len(), 2);
        assert_eq!(line.attributes[1].offset, std::mem::size_of::<[f32; 2]>() as u64);
        assert_eq!(line.array_stride, std::mem::size_of::<LineVertex>() as u64);

        let circle = CircleInstance::desc();
        let last = circle.attributes[circle.attributes.len() - 1];
        assert_eq!(
            last.offset + last.format.size(),
            std::mem::size_of::<CircleInstance>() as u64
        );
        assert_eq!(QuadVertex::desc().attributes[0].shader_location, 0);
    }
}
