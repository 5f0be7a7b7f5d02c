use std::cell::RefCell;
use std::f32::consts::TAU;
use std::rc::Rc;

use kiss3d::resource::Mesh;
use nalgebra::{Point2, Point3, Vector3};

pub const RING_SEGMENTS: usize = 64;

/// Vertex data for a flat annulus in the xy plane, facing +z.
#[derive(Debug)]
pub struct Annulus {
    pub coords: Vec<Point3<f32>>,
    pub faces: Vec<Point3<u16>>,
    pub uvs: Vec<Point2<f32>>,
}

/// Builds an annulus whose texture wraps around the ring rather than lying
/// flat across it: u runs with the angle, v with the distance from the center
/// (as a fraction of the outer radius). A ring texture is a radial strip, so
/// this is what makes it follow the curve.
pub fn annulus(inner_radius: f32, outer_radius: f32, segments: usize) -> Annulus {
    let segments = segments.max(3);
    let mut coords = Vec::with_capacity(2 * (segments + 1));
    let mut uvs = Vec::with_capacity(2 * (segments + 1));

    // One extra column so the seam gets its own u = 1 vertices
    for i in 0..=segments {
        let u = i as f32 / segments as f32;
        let (sin, cos) = (u * TAU).sin_cos();
        for radius in [inner_radius, outer_radius].iter() {
            coords.push(Point3::new(radius * cos, radius * sin, 0.0));
            uvs.push(Point2::new(u, radius / outer_radius));
        }
    }

    let mut faces = Vec::with_capacity(2 * segments);
    for i in 0..segments {
        let inner = (2 * i) as u16;
        let outer = inner + 1;
        let next_inner = inner + 2;
        let next_outer = inner + 3;
        faces.push(Point3::new(inner, outer, next_outer));
        faces.push(Point3::new(inner, next_outer, next_inner));
    }

    Annulus { coords, faces, uvs }
}

pub fn annulus_mesh(inner_radius: f32, outer_radius: f32, segments: usize) -> Rc<RefCell<Mesh>> {
    let Annulus { coords, faces, uvs } = annulus(inner_radius, outer_radius, segments);
    let normals = vec![Vector3::z(); coords.len()];
    Rc::new(RefCell::new(Mesh::new(
        coords,
        faces,
        Some(normals),
        Some(uvs),
        false,
    )))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_annulus_shape() {
        let ring = annulus(1.4, 2.5, 64);
        assert_eq!(ring.coords.len(), 130);
        assert_eq!(ring.uvs.len(), 130);
        assert_eq!(ring.faces.len(), 128);

        for (p, uv) in ring.coords.iter().zip(ring.uvs.iter()) {
            let r = p.coords.norm();
            assert!(r > 1.39 && r < 2.51);
            assert_eq!(p.z, 0.0);
            assert_relative_eq!(uv.y, r / 2.5, epsilon = 1e-5);
        }

        // Every index refers to an actual vertex
        let max = ring.faces.iter().flat_map(|f| f.iter().copied()).max().unwrap();
        assert_eq!(max as usize, ring.coords.len() - 1);
    }

    #[test]
    fn test_seam_closes() {
        let ring = annulus(1.0, 2.0, 8);
        let first = ring.coords[1];
        let last = ring.coords[ring.coords.len() - 1];
        assert_relative_eq!(first, last, epsilon = 1e-5);
        assert_eq!(ring.uvs[1].x, 0.0);
        assert_eq!(ring.uvs[ring.uvs.len() - 1].x, 1.0);
    }

    #[test]
    fn test_faces_point_up() {
        let ring = annulus(1.0, 2.0, 16);
        for face in ring.faces.iter() {
            let a = ring.coords[face.x as usize];
            let b = ring.coords[face.y as usize];
            let c = ring.coords[face.z as usize];
            assert!((b - a).cross(&(c - a)).z > 0.0);
        }
    }
}
