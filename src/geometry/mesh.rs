//! Triangle meshes
//!
//! Meshes use the column layout of the viewer's plotting library: vertex
//! coordinates in `x`/`y`/`z` and triangle corner indices in `i`/`j`/`k`.
//! Triangles are wound counter-clockwise seen from outside the solid.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Mesh3d {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub i: Vec<usize>,
    pub j: Vec<usize>,
    pub k: Vec<usize>,
}

impl Mesh3d {
    pub fn vertex_count(&self) -> usize {
        self.x.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.i.len()
    }

    fn push_vertex(&mut self, x: f64, y: f64, z: f64) -> usize {
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
        self.x.len() - 1
    }

    fn push_triangle(&mut self, a: usize, b: usize, c: usize) {
        self.i.push(a);
        self.j.push(b);
        self.k.push(c);
    }

    fn push_quad(&mut self, a: usize, b: usize, c: usize, d: usize) {
        self.push_triangle(a, b, c);
        self.push_triangle(a, c, d);
    }

    /// Triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.i
            .iter()
            .zip(&self.j)
            .zip(&self.k)
            .map(|((a, b), c)| [*a, *b, *c])
    }

    pub fn vertex(&self, idx: usize) -> [f64; 3] {
        [self.x[idx], self.y[idx], self.z[idx]]
    }
}

/// Axis-aligned box between two opposite corners: 8 vertices, 12 triangles.
pub fn box_mesh(min: [f64; 3], max: [f64; 3]) -> Mesh3d {
    let (x0, x1) = (min[0].min(max[0]), min[0].max(max[0]));
    let (y0, y1) = (min[1].min(max[1]), min[1].max(max[1]));
    let (z0, z1) = (min[2].min(max[2]), min[2].max(max[2]));

    let mut mesh = Mesh3d::default();
    for z in [z0, z1] {
        mesh.push_vertex(x0, y0, z);
        mesh.push_vertex(x1, y0, z);
        mesh.push_vertex(x1, y1, z);
        mesh.push_vertex(x0, y1, z);
    }

    mesh.push_quad(0, 3, 2, 1); // bottom
    mesh.push_quad(4, 5, 6, 7); // top
    mesh.push_quad(0, 1, 5, 4); // y0
    mesh.push_quad(3, 7, 6, 2); // y1
    mesh.push_quad(0, 4, 7, 3); // x0
    mesh.push_quad(1, 2, 6, 5); // x1
    mesh
}

/// Cross-section of a slab at one station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlabSection {
    pub station_ft: f64,
    pub top_ft: f64,
    pub bottom_ft: f64,
}

/// Sweep a rectangular cross-section of half width `half_width_ft` along
/// the station axis. Produces a closed solid: top, bottom, both side walls
/// and both end caps. Fewer than two sections yield an empty mesh.
pub fn slab_mesh(sections: &[SlabSection], half_width_ft: f64) -> Mesh3d {
    let mut mesh = Mesh3d::default();
    if sections.len() < 2 {
        return mesh;
    }

    let w = half_width_ft.abs();
    for s in sections {
        mesh.push_vertex(s.station_ft, -w, s.top_ft);
        mesh.push_vertex(s.station_ft, w, s.top_ft);
        mesh.push_vertex(s.station_ft, -w, s.bottom_ft);
        mesh.push_vertex(s.station_ft, w, s.bottom_ft);
    }

    // Per section n: 4n top-left, 4n+1 top-right, 4n+2 bottom-left, 4n+3 bottom-right
    let tl = |n: usize| 4 * n;
    let tr = |n: usize| 4 * n + 1;
    let bl = |n: usize| 4 * n + 2;
    let br = |n: usize| 4 * n + 3;

    for n in 0..sections.len() - 1 {
        let m = n + 1;
        mesh.push_quad(tl(n), tl(m), tr(m), tr(n));
        mesh.push_quad(bl(n), br(n), br(m), bl(m));
        mesh.push_quad(tl(n), bl(n), bl(m), tl(m));
        mesh.push_quad(tr(n), tr(m), br(m), br(n));
    }

    let last = sections.len() - 1;
    mesh.push_quad(tl(0), tr(0), br(0), bl(0));
    mesh.push_quad(tl(last), bl(last), br(last), tr(last));
    mesh
}
