use crate::vector::Vector3;

/// Three vertices, in winding order `[v0, v1, v2]`.
#[derive(Clone, Copy, Debug)]
pub struct Triangle {
    pub vertices: [Vector3; 3],
}

impl Triangle {
    pub fn new(v0: Vector3, v1: Vector3, v2: Vector3) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    pub fn v0(&self) -> Vector3 {
        self.vertices[0]
    }

    pub fn v1(&self) -> Vector3 {
        self.vertices[1]
    }

    pub fn v2(&self) -> Vector3 {
        self.vertices[2]
    }

    pub fn area(&self) -> f64 {
        let e1 = self.v1() - self.v0();
        let e2 = self.v2() - self.v0();
        e1.cross(&e2).length() / 2.0
    }
}
