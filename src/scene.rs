use crate::bvh::Bvh;
use crate::camera::Camera;
use crate::light::PointLight;
use crate::material::Material;
use crate::shape::{Primitive, SurfaceHit};
use crate::spectrum::Spectrum;
use crate::Ray;

/// The read-only world shared by every render worker: primitives behind a
/// BVH, their materials, lights, cameras, and a constant environment term
/// that escaping rays pick up. Built once before rendering; never mutated
/// afterwards.
#[derive(Debug)]
pub struct Scene {
    primitives: Vec<Primitive>,
    pub materials: Vec<Material>,
    pub lights: Vec<PointLight>,
    pub cameras: Vec<Camera>,
    pub environment: Spectrum,
    bvh: Bvh,
}

impl Scene {
    pub fn new(
        primitives: Vec<Primitive>,
        materials: Vec<Material>,
        lights: Vec<PointLight>,
        cameras: Vec<Camera>,
        environment: Spectrum,
    ) -> Self {
        debug_assert!(primitives.iter().all(|p| p.material < materials.len()));
        let bvh = Bvh::build(&primitives);
        Self {
            primitives,
            materials,
            lights,
            cameras,
            environment,
            bvh,
        }
    }

    pub fn camera(&self, id: usize) -> Option<&Camera> {
        self.cameras.get(id)
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        self.bvh.intersect(&self.primitives, ray)
    }

    pub fn intersect_test(&self, ray: &Ray) -> bool {
        self.bvh.intersect_test(&self.primitives, ray)
    }

    pub fn material(&self, hit: &SurfaceHit) -> &Material {
        &self.materials[hit.material]
    }
}
