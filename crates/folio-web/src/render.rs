use fnv::FnvHashMap;
use folio_core::{
    FrameView, LayerHandle, PointMaterial, PointVertex, SceneBackend, SceneError, ViewportSize,
};
use glam::Mat4;
use instant::Instant;
use web_sys as web;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct LayerUniforms {
    mvp: [[f32; 4]; 4],
    color: [f32; 4],
    proj_scale: [f32; 2],
    point_size: f32,
    _pad: f32,
}

const POINT_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32];

struct GpuLayer {
    vertices: wgpu::Buffer,
    count: u32,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    material: PointMaterial,
}

/// WebGPU point-cloud renderer bound to the background canvas.
pub struct GpuBackend {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    layer_bgl: wgpu::BindGroupLayout,
    // Dark theme: glowing points add up. Light theme: ordinary alpha blending.
    additive_pipeline: wgpu::RenderPipeline,
    blended_pipeline: wgpu::RenderPipeline,
    layers: FnvHashMap<u32, GpuLayer>,
    next_layer: u32,
}

impl GpuBackend {
    pub async fn new(canvas: web::HtmlCanvasElement, size: ViewportSize) -> anyhow::Result<Self> {
        let started = Instant::now();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width(),
            height: size.height(),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("points_shader"),
            source: wgpu::ShaderSource::Wgsl(folio_core::POINTS_WGSL.into()),
        });
        let layer_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("points_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("points_pl"),
            bind_group_layouts: &[&layer_bgl],
            push_constant_ranges: &[],
        });
        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::OVER,
        };
        let additive_pipeline =
            make_points_pipeline(&device, &layout, &shader, format, additive, "points_additive");
        let blended_pipeline = make_points_pipeline(
            &device,
            &layout,
            &shader,
            format,
            wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING,
            "points_blended",
        );

        log::info!(
            "[gpu] ready {}x{} format={:?} in {:?}",
            size.width(),
            size.height(),
            format,
            started.elapsed()
        );
        Ok(Self {
            surface,
            device,
            queue,
            config,
            layer_bgl,
            additive_pipeline,
            blended_pipeline,
            layers: FnvHashMap::default(),
            next_layer: 0,
        })
    }

    fn clear_color(frame: &FrameView<'_>) -> wgpu::Color {
        // Deep space for dark, paper white for light; ambient shifts both.
        let (base, scale) = if frame.dark {
            ([0.004, 0.004, 0.016], frame.ambient as f64 * 2.0)
        } else {
            ([0.62, 0.63, 0.66], frame.ambient as f64 / 1.5)
        };
        wgpu::Color {
            r: (base[0] * scale).min(1.0),
            g: (base[1] * scale).min(1.0),
            b: (base[2] * scale).min(1.0),
            a: 1.0,
        }
    }
}

fn make_points_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_points"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<PointVertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &POINT_ATTRS,
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_points"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

impl SceneBackend for GpuBackend {
    fn resize(&mut self, size: ViewportSize) {
        if size.width() == self.config.width && size.height() == self.config.height {
            return;
        }
        self.config.width = size.width();
        self.config.height = size.height();
        self.surface.configure(&self.device, &self.config);
        log::debug!("[gpu] surface {}x{}", size.width(), size.height());
    }

    fn add_point_layer(&mut self, points: &[PointVertex], material: &PointMaterial) -> LayerHandle {
        let id = self.next_layer;
        self.next_layer += 1;
        let vertices = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("points_vertices"),
                contents: bytemuck::cast_slice(points),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let uniforms = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("points_uniforms"),
            size: std::mem::size_of::<LayerUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("points_bg"),
            layout: &self.layer_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });
        self.layers.insert(
            id,
            GpuLayer {
                vertices,
                count: points.len() as u32,
                uniforms,
                bind_group,
                material: *material,
            },
        );
        LayerHandle(id)
    }

    fn update_material(&mut self, layer: LayerHandle, material: &PointMaterial) {
        if let Some(l) = self.layers.get_mut(&layer.0) {
            l.material = *material;
        }
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), SceneError> {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                if matches!(e, wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) {
                    self.surface.configure(&self.device, &self.config);
                }
                return Err(SceneError::Backend(format!("{e}")));
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let view_proj: Mat4 = frame.projection * frame.view;
        let proj_scale = [frame.projection.x_axis.x, frame.projection.y_axis.y];
        for draw in frame.layers {
            let Some(layer) = self.layers.get(&draw.handle.0) else {
                continue;
            };
            let m = layer.material;
            let u = LayerUniforms {
                mvp: (view_proj * draw.model).to_cols_array_2d(),
                color: [m.color[0], m.color[1], m.color[2], draw.opacity.clamp(0.0, 1.0)],
                proj_scale,
                point_size: m.point_size,
                _pad: 0.0,
            };
            self.queue
                .write_buffer(&layer.uniforms, 0, bytemuck::bytes_of(&u));
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("points_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(Self::clear_color(frame)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(if frame.dark {
                &self.additive_pipeline
            } else {
                &self.blended_pipeline
            });
            for draw in frame.layers {
                let Some(layer) = self.layers.get(&draw.handle.0) else {
                    continue;
                };
                if layer.count == 0 {
                    continue;
                }
                rpass.set_bind_group(0, &layer.bind_group, &[]);
                rpass.set_vertex_buffer(0, layer.vertices.slice(..));
                rpass.draw(0..6, 0..layer.count);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }

    fn dispose_layer(&mut self, layer: LayerHandle) {
        if let Some(l) = self.layers.remove(&layer.0) {
            l.vertices.destroy();
            l.uniforms.destroy();
        }
    }

    fn dispose(&mut self) {
        for (_, l) in self.layers.drain() {
            l.vertices.destroy();
            l.uniforms.destroy();
        }
        log::info!("[gpu] resources released");
    }
}
