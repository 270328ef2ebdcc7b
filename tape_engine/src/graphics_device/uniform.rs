/// Uniform values accepted by `GraphicsDevice::set_uniform`

use glam::{IVec2, IVec3, IVec4, Mat3, Mat4, UVec2, UVec3, UVec4, Vec2, Vec3, Vec4};

/// A typed uniform payload
///
/// 8 and 16-bit integers are widened to 32 bits by the device, shading
/// languages having no narrower uniform types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    F32(f32),
    I8(i8),
    I16(i16),
    I32(i32),
    U8(u8),
    U16(u16),
    U32(u32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    IVec2(IVec2),
    IVec3(IVec3),
    IVec4(IVec4),
    UVec2(UVec2),
    UVec3(UVec3),
    UVec4(UVec4),
    Mat3(Mat3),
    Mat4(Mat4),
}

impl UniformValue {
    /// Short type name, e.g. "vec3" or "mat4"
    pub fn type_name(&self) -> &'static str {
        match self {
            UniformValue::F32(_) => "float",
            UniformValue::I8(_) => "i8",
            UniformValue::I16(_) => "i16",
            UniformValue::I32(_) => "int",
            UniformValue::U8(_) => "u8",
            UniformValue::U16(_) => "u16",
            UniformValue::U32(_) => "uint",
            UniformValue::Vec2(_) => "vec2",
            UniformValue::Vec3(_) => "vec3",
            UniformValue::Vec4(_) => "vec4",
            UniformValue::IVec2(_) => "ivec2",
            UniformValue::IVec3(_) => "ivec3",
            UniformValue::IVec4(_) => "ivec4",
            UniformValue::UVec2(_) => "uvec2",
            UniformValue::UVec3(_) => "uvec3",
            UniformValue::UVec4(_) => "uvec4",
            UniformValue::Mat3(_) => "mat3",
            UniformValue::Mat4(_) => "mat4",
        }
    }

    /// Raw upload bytes (column-major for matrices, widened scalars)
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            UniformValue::F32(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::I8(v) => bytemuck::bytes_of(&(*v as i32)).to_vec(),
            UniformValue::I16(v) => bytemuck::bytes_of(&(*v as i32)).to_vec(),
            UniformValue::I32(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::U8(v) => bytemuck::bytes_of(&(*v as u32)).to_vec(),
            UniformValue::U16(v) => bytemuck::bytes_of(&(*v as u32)).to_vec(),
            UniformValue::U32(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::Vec2(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::Vec3(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::Vec4(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::IVec2(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::IVec3(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::IVec4(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::UVec2(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::UVec3(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::UVec4(v) => bytemuck::bytes_of(v).to_vec(),
            UniformValue::Mat3(m) => bytemuck::cast_slice(&m.to_cols_array()).to_vec(),
            UniformValue::Mat4(m) => bytemuck::bytes_of(m).to_vec(),
        }
    }
}

macro_rules! impl_from_uniform {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for UniformValue {
                fn from(value: $ty) -> Self {
                    UniformValue::$variant(value)
                }
            }
        )*
    };
}

impl_from_uniform! {
    f32 => F32,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    IVec2 => IVec2,
    IVec3 => IVec3,
    IVec4 => IVec4,
    UVec2 => UVec2,
    UVec3 => UVec3,
    UVec4 => UVec4,
    Mat3 => Mat3,
    Mat4 => Mat4,
}
