//! Vector and matrix types used by element transforms

use bytemuck::{Pod, Zeroable};

/// 3D vector
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const ONE: Vec3 = Vec3::new(1.0, 1.0, 1.0);
    pub const Z: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len, self.z / len)
        } else {
            Self::ZERO
        }
    }

    /// Component-wise product
    pub fn mul_elem(&self, other: Vec3) -> Vec3 {
        Vec3::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Angle (radians) around an axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    pub angle: f64,
    pub axis: Vec3,
}

impl Rotation {
    pub const fn new(angle: f64, axis: Vec3) -> Self {
        Self { angle, axis }
    }

    /// Rotation in the XY plane, the common case for 2D elements
    pub const fn z(angle: f64) -> Self {
        Self::new(angle, Vec3::Z)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::z(0.0)
    }
}

/// 4x4 transformation matrix (column-major)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4 {
    pub cols: [[f64; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn translation(v: Vec3) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [v.x, v.y, v.z, 1.0],
            ],
        }
    }

    pub fn scale(v: Vec3) -> Self {
        Self {
            cols: [
                [v.x, 0.0, 0.0, 0.0],
                [0.0, v.y, 0.0, 0.0],
                [0.0, 0.0, v.z, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Counter-clockwise rotation by `angle` radians around `axis`.
    ///
    /// The axis is normalized first; a zero-length axis yields the identity.
    pub fn rotation(angle: f64, axis: Vec3) -> Self {
        let n = axis.normalize();
        if n == Vec3::ZERO {
            return Self::IDENTITY;
        }
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (n.x, n.y, n.z);
        Self {
            cols: [
                [t * x * x + c, t * x * y + s * z, t * x * z - s * y, 0.0],
                [t * x * y - s * z, t * y * y + c, t * y * z + s * x, 0.0],
                [t * x * z + s * y, t * y * z - s * x, t * z * z + c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Multiply two matrices (`self * other`, so `other` applies first)
    pub fn mul(&self, other: &Mat4) -> Mat4 {
        let mut result = [[0.0f64; 4]; 4];
        for (i, col) in result.iter_mut().enumerate() {
            for (j, cell) in col.iter_mut().enumerate() {
                for k in 0..4 {
                    *cell += self.cols[k][j] * other.cols[i][k];
                }
            }
        }
        Mat4 { cols: result }
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let c = &self.cols;
        Vec3::new(
            c[0][0] * p.x + c[1][0] * p.y + c[2][0] * p.z + c[3][0],
            c[0][1] * p.x + c[1][1] * p.y + c[2][1] * p.z + c[3][1],
            c[0][2] * p.x + c[1][2] * p.y + c[2][2] * p.z + c[3][2],
        )
    }

    /// Single-precision copy for upload to the GPU
    pub fn to_gpu(&self) -> GpuMatrix {
        let mut cols = [[0.0f32; 4]; 4];
        for (dst, src) in cols.iter_mut().zip(self.cols.iter()) {
            for (d, s) in dst.iter_mut().zip(src.iter()) {
                *d = *s as f32;
            }
        }
        GpuMatrix { cols }
    }

    pub fn approx_eq(&self, other: &Mat4, epsilon: f64) -> bool {
        self.cols
            .iter()
            .flatten()
            .zip(other.cols.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

/// Column-major f32 matrix in the layout GPU APIs expect
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct GpuMatrix {
    pub cols: [[f32; 4]; 4],
}

impl GpuMatrix {
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl From<GpuMatrix> for Mat4 {
    fn from(m: GpuMatrix) -> Self {
        let mut cols = [[0.0f64; 4]; 4];
        for (dst, src) in cols.iter_mut().zip(m.cols.iter()) {
            for (d, s) in dst.iter_mut().zip(src.iter()) {
                *d = *s as f64;
            }
        }
        Mat4 { cols }
    }
}
