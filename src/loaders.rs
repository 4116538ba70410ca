use crate::camera::Camera;
use crate::light::PointLight;
use crate::material::Material;
use crate::scene::Scene;
use crate::shape::{Primitive, Sphere};
use crate::spectrum::Spectrum;
use crate::{Float, Point3f, Vec3f};
use anyhow::{anyhow, bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// JSON scene description. Everything is optional except that a renderable
/// scene must define at least one camera; materials are referenced by name
/// from the shapes that use them.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneDesc {
    #[serde(default)]
    cameras: Vec<CameraDesc>,
    #[serde(default)]
    materials: Vec<MaterialDesc>,
    #[serde(default)]
    spheres: Vec<SphereDesc>,
    #[serde(default)]
    point_lights: Vec<PointLightDesc>,
    #[serde(default)]
    environment: [Float; 3],
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CameraDesc {
    from: [Float; 3],
    to: [Float; 3],
    #[serde(default = "default_up")]
    up: [Float; 3],
    #[serde(default = "default_yfov")]
    yfov: Float,
    #[serde(default = "default_aspect")]
    aspect: Float,
}

fn default_up() -> [Float; 3] {
    [0.0, 1.0, 0.0]
}

fn default_yfov() -> Float {
    std::f32::consts::FRAC_PI_4
}

fn default_aspect() -> Float {
    16.0 / 9.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MaterialDesc {
    name: String,
    #[serde(default)]
    diffuse: [Float; 3],
    #[serde(default)]
    emission: [Float; 3],
    #[serde(default)]
    transmission: [Float; 3],
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SphereDesc {
    center: [Float; 3],
    radius: Float,
    material: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PointLightDesc {
    position: [Float; 3],
    intensity: [Float; 3],
}

fn point3(a: [Float; 3]) -> Point3f {
    Point3f::new(a[0], a[1], a[2])
}

fn vec3(a: [Float; 3]) -> Vec3f {
    Vec3f::new(a[0], a[1], a[2])
}

pub fn load_scene(path: impl AsRef<Path>) -> anyhow::Result<Scene> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read scene file {}", path.display()))?;
    parse_scene(&text).with_context(|| format!("cannot load scene {}", path.display()))
}

pub fn parse_scene(json: &str) -> anyhow::Result<Scene> {
    let desc: SceneDesc = serde_json::from_str(json)?;
    if desc.cameras.is_empty() {
        bail!("scene defines no cameras");
    }

    let mut material_ids = HashMap::new();
    let mut materials = Vec::with_capacity(desc.materials.len());
    for m in &desc.materials {
        if material_ids.insert(m.name.clone(), materials.len()).is_some() {
            bail!("duplicate material name {:?}", m.name);
        }
        materials.push(Material {
            diffuse: Spectrum(m.diffuse),
            emission: Spectrum(m.emission),
            transmission: Spectrum(m.transmission),
        });
    }

    let primitives = desc
        .spheres
        .iter()
        .map(|s| {
            let material = *material_ids
                .get(&s.material)
                .ok_or_else(|| anyhow!("sphere references undefined material {:?}", s.material))?;
            Ok(Primitive {
                sphere: Sphere {
                    center: point3(s.center),
                    radius: s.radius,
                },
                material,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let lights = desc
        .point_lights
        .iter()
        .map(|l| PointLight {
            position: point3(l.position),
            intensity: Spectrum(l.intensity),
        })
        .collect();

    let cameras = desc
        .cameras
        .iter()
        .map(|c| Camera::look_at(point3(c.from), point3(c.to), vec3(c.up), c.yfov, c.aspect))
        .collect();

    Ok(Scene::new(
        primitives,
        materials,
        lights,
        cameras,
        Spectrum(desc.environment),
    ))
}
