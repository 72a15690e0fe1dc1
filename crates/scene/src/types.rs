use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Process-unique identifier of a scene object.
///
/// Ids are stable for the object's lifetime and never reused. External code
/// should key everything on the id and never on the object's buffer slot,
/// which changes whenever the registry compacts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Closed set of shapes understood by the ray marcher.
///
/// Each kind reads the object's 3-component scale differently:
///
/// | kind     | x             | y                  | z        |
/// |----------|---------------|--------------------|----------|
/// | Sphere   | radius x      | radius y           | radius z |
/// | Box      | half extent x | half extent y      | half extent z |
/// | Torus    | major radius  | minor radius       | unused   |
/// | Cylinder | radius        | half height        | unused   |
/// | Cone     | base radius   | half height        | unused   |
/// | Capsule  | radius        | half segment length| unused   |
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Sphere,
    Box,
    Torus,
    Cylinder,
    Cone,
    Capsule,
}

impl Primitive {
    pub const ALL: [Primitive; 6] = [
        Primitive::Sphere,
        Primitive::Box,
        Primitive::Torus,
        Primitive::Cylinder,
        Primitive::Cone,
        Primitive::Capsule,
    ];

    /// Code stored in the GPU record. Must match the `PRIM_*` constants in `sdf.wgsl`.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Primitive::Sphere => 0,
            Primitive::Box => 1,
            Primitive::Torus => 2,
            Primitive::Cylinder => 3,
            Primitive::Cone => 4,
            Primitive::Capsule => 5,
        }
    }

    #[must_use]
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Primitive::Sphere),
            1 => Some(Primitive::Box),
            2 => Some(Primitive::Torus),
            3 => Some(Primitive::Cylinder),
            4 => Some(Primitive::Cone),
            5 => Some(Primitive::Capsule),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Primitive::Sphere => "Sphere",
            Primitive::Box => "Box",
            Primitive::Torus => "Torus",
            Primitive::Cylinder => "Cylinder",
            Primitive::Cone => "Cone",
            Primitive::Capsule => "Capsule",
        }
    }

    /// Scale a freshly spawned object of this kind starts with.
    #[must_use]
    pub fn default_scale(self) -> glam::Vec3 {
        match self {
            Primitive::Sphere | Primitive::Box => glam::Vec3::splat(0.5),
            Primitive::Torus => glam::Vec3::new(0.5, 0.2, 0.0),
            Primitive::Cylinder | Primitive::Cone => glam::Vec3::new(0.5, 0.5, 0.0),
            Primitive::Capsule => glam::Vec3::new(0.3, 0.4, 0.0),
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown primitive kind: {0}")]
pub struct ParsePrimitiveError(pub String);

impl FromStr for Primitive {
    type Err = ParsePrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sphere" | "ellipsoid" => Ok(Primitive::Sphere),
            "box" | "cuboid" | "cube" => Ok(Primitive::Box),
            "torus" => Ok(Primitive::Torus),
            "cylinder" => Ok(Primitive::Cylinder),
            "cone" => Ok(Primitive::Cone),
            "capsule" => Ok(Primitive::Capsule),
            _ => Err(ParsePrimitiveError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_for_every_kind() {
        for kind in Primitive::ALL {
            assert_eq!(Primitive::from_code(kind.code()), Some(kind));
        }
        assert_eq!(Primitive::from_code(6), None);
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("Ellipsoid".parse::<Primitive>(), Ok(Primitive::Sphere));
        assert_eq!("CUBOID".parse::<Primitive>(), Ok(Primitive::Box));
        assert!("teapot".parse::<Primitive>().is_err());
    }

    #[test]
    fn object_id_displays_as_hex() {
        assert_eq!(ObjectId(0xab).to_string(), "000000ab");
    }
}
