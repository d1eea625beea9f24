//! Proxy views
//!
//! Structured accessors over consecutive property slots. Reads come straight
//! from the property store; writes go through
//! [`ElementMut::change_property`], so they animate when a context is active.

use velum_core::{Color, Property, Rotation, Vec3};

use crate::handle::ElementMut;

/// Three consecutive properties viewed as x, y, z
pub struct Vec3View<'h, 'a> {
    handle: &'h mut ElementMut<'a>,
    base: Property,
}

impl<'h, 'a> Vec3View<'h, 'a> {
    pub(crate) fn new(handle: &'h mut ElementMut<'a>, base: Property) -> Self {
        Self { handle, base }
    }

    fn field(&self, n: usize) -> f64 {
        self.handle.property(self.base.offset_by(n))
    }

    fn set_field(&mut self, n: usize, value: f64) -> &mut Self {
        self.handle.change_property(self.base.offset_by(n), value);
        self
    }

    pub fn x(&self) -> f64 {
        self.field(0)
    }

    pub fn y(&self) -> f64 {
        self.field(1)
    }

    pub fn z(&self) -> f64 {
        self.field(2)
    }

    pub fn set_x(&mut self, x: f64) -> &mut Self {
        self.set_field(0, x)
    }

    pub fn set_y(&mut self, y: f64) -> &mut Self {
        self.set_field(1, y)
    }

    pub fn set_z(&mut self, z: f64) -> &mut Self {
        self.set_field(2, z)
    }

    pub fn get(&self) -> Vec3 {
        Vec3::new(self.x(), self.y(), self.z())
    }

    pub fn set(&mut self, v: Vec3) -> &mut Self {
        self.set_x(v.x).set_y(v.y).set_z(v.z)
    }
}

/// The four color channels, with packed `0xRRGGBBAA` conversion
pub struct ColorView<'h, 'a> {
    handle: &'h mut ElementMut<'a>,
}

impl<'h, 'a> ColorView<'h, 'a> {
    pub(crate) fn new(handle: &'h mut ElementMut<'a>) -> Self {
        Self { handle }
    }

    pub fn r(&self) -> f64 {
        self.handle.property(Property::ColorR)
    }

    pub fn g(&self) -> f64 {
        self.handle.property(Property::ColorG)
    }

    pub fn b(&self) -> f64 {
        self.handle.property(Property::ColorB)
    }

    pub fn a(&self) -> f64 {
        self.handle.property(Property::ColorA)
    }

    pub fn set_r(&mut self, r: f64) -> &mut Self {
        self.handle.change_property(Property::ColorR, r);
        self
    }

    pub fn set_g(&mut self, g: f64) -> &mut Self {
        self.handle.change_property(Property::ColorG, g);
        self
    }

    pub fn set_b(&mut self, b: f64) -> &mut Self {
        self.handle.change_property(Property::ColorB, b);
        self
    }

    pub fn set_a(&mut self, a: f64) -> &mut Self {
        self.handle.change_property(Property::ColorA, a);
        self
    }

    pub fn get(&self) -> Color {
        Color::new(self.r(), self.g(), self.b(), self.a())
    }

    pub fn set(&mut self, color: Color) -> &mut Self {
        self.set_r(color.r).set_g(color.g).set_b(color.b).set_a(color.a)
    }

    /// Current channels packed as `0xRRGGBBAA`
    pub fn packed(&self) -> u32 {
        self.get().to_packed_rgba()
    }

    /// Decompose `0xRRGGBBAA` into four channel writes
    pub fn set_packed(&mut self, packed: u32) -> &mut Self {
        self.set(Color::from_packed_rgba(packed))
    }
}

/// Rotation angle plus axis
pub struct RotationView<'h, 'a> {
    handle: &'h mut ElementMut<'a>,
}

impl<'h, 'a> RotationView<'h, 'a> {
    pub(crate) fn new(handle: &'h mut ElementMut<'a>) -> Self {
        Self { handle }
    }

    pub fn angle(&self) -> f64 {
        self.handle.property(Property::RotationAngle)
    }

    pub fn axis(&self) -> Vec3 {
        Vec3::new(
            self.handle.property(Property::RotationX),
            self.handle.property(Property::RotationY),
            self.handle.property(Property::RotationZ),
        )
    }

    pub fn set_angle(&mut self, angle: f64) -> &mut Self {
        self.handle.change_property(Property::RotationAngle, angle);
        self
    }

    pub fn set_axis(&mut self, axis: Vec3) -> &mut Self {
        self.handle.change_property(Property::RotationX, axis.x);
        self.handle.change_property(Property::RotationY, axis.y);
        self.handle.change_property(Property::RotationZ, axis.z);
        self
    }

    pub fn get(&self) -> Rotation {
        Rotation::new(self.angle(), self.axis())
    }

    pub fn set(&mut self, rotation: Rotation) -> &mut Self {
        self.set_angle(rotation.angle).set_axis(rotation.axis)
    }
}
