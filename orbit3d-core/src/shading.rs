/// Flat per-triangle shading: ambient term, one directional light and a
/// view-dependent grey rim term that brightens silhouettes.
use nalgebra::Vector3;

use crate::color::{ColorError, Rgb, UnitRgb};
use crate::math::{dot, normalize};

/// Gamma applied to the diffuse term. 1 = no correction, larger values brighten midtones.
pub const DEFAULT_GAMMA: f32 = 1.3;
/// Added to lit channels so a lit face never renders fully black
pub const LIGHT_OFFSET: f32 = 0.06 / 1.06;
/// Exponent of the grey rim term
const RIM_EXPONENT: f32 = 1.2;

/// Material and light parameters, fixed for a render session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderSettings {
    pub material_color: UnitRgb,
    /// Unit vector; see [`ShaderSettings::new`]
    pub light_vector: Vector3<f32>,
    pub light_color: UnitRgb,
    pub ambient_color: UnitRgb,
    pub intensity: f32,
    pub gamma: f32,
}

impl ShaderSettings {
    /// Build settings from hex colors. The light vector is normalized here.
    pub fn new(
        material_color: &str,
        light_vector: Vector3<f32>,
        light_color: &str,
        ambient_color: &str,
        intensity: f32,
    ) -> Result<Self, ColorError> {
        Ok(Self {
            material_color: UnitRgb::from_hex(material_color)?,
            light_vector: normalize(light_vector),
            light_color: UnitRgb::from_hex(light_color)?,
            ambient_color: UnitRgb::from_hex(ambient_color)?,
            intensity,
            gamma: DEFAULT_GAMMA,
        })
    }
}

impl Default for ShaderSettings {
    fn default() -> Self {
        Self {
            material_color: UnitRgb::new(3.0 / 15.0, 6.0 / 15.0, 12.0 / 15.0), // #36C
            light_vector: normalize(Vector3::new(0.5, 0.5, -1.0)),
            light_color: UnitRgb::new(10.0 / 15.0, 10.0 / 15.0, 1.0 / 15.0), // #aa1
            ambient_color: UnitRgb::new(0.0, 0.0, 0.0),
            intensity: 1.5,
            gamma: DEFAULT_GAMMA,
        }
    }
}

/// Color of a triangle with unit normal `face_normal`.
///
/// `facing` is the dot product between the normal and the camera-to-triangle
/// vector: 1 for a face seen head-on, 0 for one seen edge-on. Negative values
/// are treated as 0.
pub fn shade(settings: &ShaderSettings, face_normal: &Vector3<f32>, facing: f32) -> Rgb {
    let material = settings.material_color.channels();
    let ambient = settings.ambient_color.channels();
    let light = settings.light_color.channels();

    let light_angle = dot(&settings.light_vector, face_normal);
    let rim = (settings.material_color.luma() * (1.0 - facing.clamp(0.0, 1.0))).powf(RIM_EXPONENT);

    let channel = |c: usize| {
        let mut value = material[c] * ambient[c];
        if light_angle > 0.0 {
            let diffuse = material[c] * light_angle * light[c] * settings.intensity;
            value += diffuse.powf(1.0 / settings.gamma) + LIGHT_OFFSET;
        }
        value += rim;
        (value * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgb::new(channel(0), channel(1), channel(2))
}
