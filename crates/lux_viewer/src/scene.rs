//! Built-in demo scene.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use lux_math::Vec3;
use lux_renderer::{
    Color, Cube, Environment, Material, PolygonMesh, Primitive, RenderConfig, Rotate, Sphere,
    Texture, Triangle, World, YPlane,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Center, radius, color and reflectiveness of the plain spheres.
const SPHERES: [([f32; 3], f32, [f32; 3], f32); 6] = [
    ([3.0, 3.0, 0.0], 3.0, [0.2, 0.3, 0.8], 0.0),
    ([-4.0, 2.0, 0.0], 2.0, [0.2, 0.8, 0.3], 1.0),
    ([1.0, 2.0, 6.0], 2.0, [0.9, 0.9, 0.9], 0.1),
    ([-5.0, 0.75, 3.0], 0.75, [0.2, 0.8, 0.3], 0.3),
    ([-3.0, 1.0, -6.0], 1.0, [0.9, 0.9, 0.9], 0.9),
    ([17.0, 5.0, 8.0], 5.0, [0.2, 0.8, 0.3], 0.0),
];

/// Surface colour plus reflectiveness; zero reflectiveness means diffuse.
fn surface(color: Color, reflectiveness: f32) -> Material {
    if reflectiveness == 0.0 {
        Material::diffuse(color)
    } else {
        Material::metal(color, reflectiveness)
    }
}

/// Ground plane, a ring of diffuse and metal spheres, a couple of boxes and
/// a light. An OBJ mesh, if given, is fitted into a 3 unit box in the middle.
pub fn demo_world(
    config: RenderConfig,
    skybox: Option<&Path>,
    mesh: Option<&Path>,
) -> Result<World> {
    let mut rng = StdRng::seed_from_u64(config.seed);

    let environment = match skybox {
        Some(path) => {
            let image = lux_core::load_rgb_image(path)
                .with_context(|| format!("loading skybox {}", path.display()))?;
            Environment::Image(Arc::new(image))
        }
        None => Environment::Uniform(Color::new(0.7, 0.8, 1.0)),
    };

    let mut primitives: Vec<Box<dyn Primitive>> = vec![
        Box::new(YPlane::new(
            0.0,
            Material::diffuse(Texture::checker(Color::splat(0.8), Color::splat(0.35))),
        )),
        Box::new(Sphere::new(
            Vec3::new(0.0, 2.0, -20.0),
            2.0,
            Material::diffuse(Texture::UvDebug),
        )),
        Box::new(Sphere::new(
            Vec3::new(-2.0, 4.5, -3.0),
            0.5,
            Material::light(Color::splat(4.0)),
        )),
        Box::new(Rotate::y(
            35.0,
            Box::new(Cube::centered(
                Vec3::new(4.0, 0.75, -5.0),
                0.75,
                Material::metal(Color::new(0.9, 0.6, 0.3), 0.6),
            )),
        )),
        Box::new(Rotate::z(
            20.0,
            Box::new(Cube::new(
                Vec3::new(-8.0, 0.0, -3.0),
                Vec3::new(-6.5, 2.5, -2.0),
                Material::diffuse(Color::new(0.8, 0.2, 0.2)),
            )),
        )),
        Box::new(Triangle::from_points(
            Vec3::new(6.0, 0.0, 4.0),
            Vec3::new(9.0, 0.0, 2.0),
            Vec3::new(7.5, 3.0, 3.0),
            Material::diffuse(Color::new(0.9, 0.9, 0.2)),
        )),
    ];

    primitives.extend(SPHERES.iter().map(|&(center, radius, color, reflectiveness)| {
        Box::new(Sphere::new(
            Vec3::from(center),
            radius,
            surface(Color::from(color), reflectiveness),
        )) as Box<dyn Primitive>
    }));

    if let Some(path) = mesh {
        let mesh = PolygonMesh::load(
            path,
            Vec3::new(0.0, 1.5, -4.0),
            3.0,
            Material::diffuse(Color::splat(0.75)),
            &mut rng,
        )
        .with_context(|| format!("loading mesh {}", path.display()))?;
        log::info!(
            "Loaded mesh {} ({} triangles)",
            path.display(),
            mesh.triangle_count()
        );
        primitives.push(Box::new(mesh));
    }

    Ok(World::new(primitives, environment, config, &mut rng)?)
}
