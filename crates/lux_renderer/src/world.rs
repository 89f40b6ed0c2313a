//! Scene container and the recursive path tracer.

use rand::RngCore;

use crate::error::SceneError;
use crate::hittable::{intersect_all, HitInfo, Primitive, T_MIN};
use crate::renderer::{pixel_rng, quantize};
use crate::sampling::{gen_f32, random_in_unit_disk, random_in_unit_sphere, reflect};
use crate::{Bvh, Camera, Color, Environment, Material, RenderConfig};
use lux_math::{Ray, Vec3};

/// Energy kept by a diffuse bounce.
const DIFFUSE_ENERGY: f32 = 0.5;

/// Everything needed to shade a pixel.
///
/// Bounded primitives go into a BVH; primitives without a box (planes) are
/// tested linearly on every ray.
pub struct World {
    bvh: Option<Bvh>,
    unbounded: Vec<Box<dyn Primitive>>,
    pub camera: Camera,
    pub environment: Environment,
    pub config: RenderConfig,
}

impl World {
    pub fn new(
        primitives: Vec<Box<dyn Primitive>>,
        environment: Environment,
        config: RenderConfig,
        rng: &mut dyn RngCore,
    ) -> Result<Self, SceneError> {
        let (bounded, unbounded): (Vec<_>, Vec<_>) = primitives
            .into_iter()
            .partition(|p| p.bounding_box().is_some());

        let bvh = if bounded.is_empty() {
            None
        } else {
            Some(Bvh::build(bounded, rng)?)
        };

        log::info!(
            "World: {} bounded, {} unbounded primitives",
            bvh.as_ref().map_or(0, Bvh::len),
            unbounded.len()
        );

        Ok(Self {
            bvh,
            unbounded,
            camera: config.camera.into(),
            environment,
            config,
        })
    }

    /// Nearest hit over the whole scene.
    pub fn intersect(&self, ray: &Ray) -> Option<HitInfo<'_>> {
        let bounded = self.bvh.as_ref().and_then(|bvh| bvh.intersect(ray));
        HitInfo::nearest(bounded, intersect_all(&self.unbounded, ray))
    }

    /// Radiance arriving along `ray`, following at most `bounces` diffuse or
    /// metal bounces.
    pub fn ray_color(&self, ray: &Ray, bounces: u32, rng: &mut dyn RngCore) -> Color {
        let Some(hit) = self.intersect(ray) else {
            return self.environment.sample(ray.direction) * self.config.sky_brightness;
        };

        match hit.object.material() {
            Material::None => Color::ZERO,
            Material::DiffuseLight { emission } => *emission,
            Material::Diffuse { texture } => {
                if bounces == 0 {
                    return Color::ZERO;
                }
                let direction = (hit.normal + random_in_unit_sphere(rng))
                    .try_normalize()
                    .unwrap_or(hit.normal);
                let bounced = Ray::new(offset_origin(&hit, direction), direction);

                DIFFUSE_ENERGY
                    * texture.sample(hit.uv, hit.point)
                    * self.ray_color(&bounced, bounces - 1, rng)
            }
            Material::Metal {
                texture,
                reflectiveness,
            } => {
                if bounces == 0 {
                    return Color::ZERO;
                }
                let direction = reflect(ray.direction, hit.normal);
                let bounced = Ray::new(offset_origin(&hit, direction), direction);
                let reflected = self.ray_color(&bounced, bounces - 1, rng);

                texture.sample(hit.uv, hit.point)
                    * (*reflectiveness * reflected + (1.0 - *reflectiveness))
                    * self.self_shadow(hit.normal)
            }
        }
    }

    /// Darkening factor for a metal surface with normal `n`.
    fn self_shadow(&self, n: Vec3) -> f32 {
        let light = Vec3::from(self.config.light_direction).normalize_or_zero();
        let facing = (n.dot(light) + 1.0).clamp(0.0, 1.0);
        1.0 - (1.0 - facing) * self.config.self_shadow_intensity
    }

    /// Camera ray through the continuous screen position `(sx, sy)`, in
    /// pixels from the top-left corner.
    pub fn primary_ray(&self, sx: f32, sy: f32, rng: &mut dyn RngCore) -> Ray {
        let config = &self.config;
        let cam = &self.camera;
        let ox = -(sx / config.width as f32 - 0.5) * config.aspect_ratio() * config.field_of_view;
        let oy = -(sy / config.height as f32 - 0.5) * config.field_of_view;
        let direction = cam.forward() + ox * cam.u() + oy * cam.v();

        if config.lens_radius <= 0.0 {
            return Ray::new(cam.position(), direction);
        }

        // Thin lens: move the origin on the aperture, keep the focus-plane point
        let lens = random_in_unit_disk(rng) * config.lens_radius;
        let offset = cam.u() * lens.x + cam.v() * lens.y;
        Ray::new(
            cam.position() + offset,
            direction - offset / config.focus_distance,
        )
    }

    /// Average linear radiance of pixel `(x, y)` over the jittered sample grid.
    pub fn sample_pixel(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Color {
        let n = self.config.samples_per_pixel_axis.max(1);
        let step = 1.0 / n as f32;
        let mut color = Color::ZERO;

        for i in 0..n {
            for j in 0..n {
                let sx = x as f32 + (i as f32 + gen_f32(rng)) * step;
                let sy = y as f32 + (j as f32 + gen_f32(rng)) * step;
                let ray = self.primary_ray(sx, sy, rng);
                color += self.ray_color(&ray, self.config.max_bounces, rng);
            }
        }

        color / (n * n) as f32
    }

    /// Final 8-bit RGB of pixel `(x, y)`.
    pub fn render_pixel(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> [u8; 3] {
        quantize(self.config.tone_map.apply(self.sample_pixel(x, y, rng)))
    }

    /// `render_pixel` with a random stream derived from `(seed, x, y)`.
    pub fn render_pixel_seeded(&self, x: u32, y: u32, seed: u64) -> [u8; 3] {
        self.render_pixel(x, y, &mut pixel_rng(seed, x, y))
    }
}

/// Start a bounced ray just off the surface, on the side it leaves toward.
#[inline]
fn offset_origin(hit: &HitInfo<'_>, direction: Vec3) -> Vec3 {
    let side = if direction.dot(hit.normal) < 0.0 { -1.0 } else { 1.0 };
    hit.point + hit.normal * (T_MIN * side)
}
