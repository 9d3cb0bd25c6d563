use derive_more::Display;
use na::{Matrix3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Sensor board mounting rotation, restricted to the 24 axis-aligned proper rotations.
///
/// Discriminants match the flight stack's `SENS_BOARD_ROT` parameter values so the
/// id reported in status messages is the same one a ground station would configure.
/// Rotations are applied as roll, then pitch, then yaw (intrinsic Z-Y-X).
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum Rotation {
    #[default]
    None = 0,
    Yaw90 = 2,
    Yaw180 = 4,
    Yaw270 = 6,
    Roll180 = 8,
    Roll180Yaw90 = 10,
    Pitch180 = 12,
    Roll180Yaw270 = 14,
    Roll90 = 16,
    Roll90Yaw90 = 18,
    Roll270 = 20,
    Roll270Yaw90 = 22,
    Pitch90 = 24,
    Pitch270 = 25,
    Roll90Pitch90 = 28,
    Roll180Pitch90 = 29,
    Roll270Pitch90 = 30,
    Roll90Pitch180 = 31,
    Roll270Pitch180 = 32,
    Roll90Pitch270 = 33,
    Roll180Pitch270 = 34,
    Roll270Pitch270 = 35,
    Roll90Pitch180Yaw90 = 36,
    Roll90Yaw270 = 37,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown or non axis-aligned rotation id {0}")]
pub struct UnknownRotation(pub u8);

impl Rotation {
    #[rustfmt::skip]
    pub const ALL: [Rotation; 24] = [
        Rotation::None, Rotation::Yaw90, Rotation::Yaw180, Rotation::Yaw270,
        Rotation::Roll180, Rotation::Roll180Yaw90, Rotation::Pitch180, Rotation::Roll180Yaw270,
        Rotation::Roll90, Rotation::Roll90Yaw90, Rotation::Roll270, Rotation::Roll270Yaw90,
        Rotation::Pitch90, Rotation::Pitch270, Rotation::Roll90Pitch90, Rotation::Roll180Pitch90,
        Rotation::Roll270Pitch90, Rotation::Roll90Pitch180, Rotation::Roll270Pitch180, Rotation::Roll90Pitch270,
        Rotation::Roll180Pitch270, Rotation::Roll270Pitch270, Rotation::Roll90Pitch180Yaw90, Rotation::Roll90Yaw270,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    /// (roll, pitch, yaw) in degrees
    pub fn euler_degrees(self) -> (f32, f32, f32) {
        use Rotation::*;
        match self {
            None => (0.0, 0.0, 0.0),
            Yaw90 => (0.0, 0.0, 90.0),
            Yaw180 => (0.0, 0.0, 180.0),
            Yaw270 => (0.0, 0.0, 270.0),
            Roll180 => (180.0, 0.0, 0.0),
            Roll180Yaw90 => (180.0, 0.0, 90.0),
            Pitch180 => (0.0, 180.0, 0.0),
            Roll180Yaw270 => (180.0, 0.0, 270.0),
            Roll90 => (90.0, 0.0, 0.0),
            Roll90Yaw90 => (90.0, 0.0, 90.0),
            Roll270 => (270.0, 0.0, 0.0),
            Roll270Yaw90 => (270.0, 0.0, 90.0),
            Pitch90 => (0.0, 90.0, 0.0),
            Pitch270 => (0.0, 270.0, 0.0),
            Roll90Pitch90 => (90.0, 90.0, 0.0),
            Roll180Pitch90 => (180.0, 90.0, 0.0),
            Roll270Pitch90 => (270.0, 90.0, 0.0),
            Roll90Pitch180 => (90.0, 180.0, 0.0),
            Roll270Pitch180 => (270.0, 180.0, 0.0),
            Roll90Pitch270 => (90.0, 270.0, 0.0),
            Roll180Pitch270 => (180.0, 270.0, 0.0),
            Roll270Pitch270 => (270.0, 270.0, 0.0),
            Roll90Pitch180Yaw90 => (90.0, 180.0, 90.0),
            Roll90Yaw270 => (90.0, 0.0, 270.0),
        }
    }

    /// Direction cosine matrix of this rotation.
    ///
    /// Built from the Euler angles, so the entries carry the usual
    /// trigonometric round-off (about 1e-8). Use this on integrals, where
    /// the rotation has to be a linear map; use [`Rotation::rotate_axes`]
    /// on individual samples.
    pub fn dcm(self) -> Matrix3<f32> {
        let (roll, pitch, yaw) = self.euler_degrees();
        Rotation3::from_euler_angles(roll.to_radians(), pitch.to_radians(), yaw.to_radians())
            .into_inner()
    }

    /// Exact axis permutation and sign flip, no arithmetic on the values.
    pub fn rotate_axes(self, v: Vector3<f32>) -> Vector3<f32> {
        use Rotation::*;
        let (x, y, z) = (v.x, v.y, v.z);
        let (rx, ry, rz) = match self {
            None => (x, y, z),
            Yaw90 => (-y, x, z),
            Yaw180 => (-x, -y, z),
            Yaw270 => (y, -x, z),
            Roll180 => (x, -y, -z),
            Roll180Yaw90 => (y, x, -z),
            Pitch180 => (-x, y, -z),
            Roll180Yaw270 => (-y, -x, -z),
            Roll90 => (x, -z, y),
            Roll90Yaw90 => (z, x, y),
            Roll270 => (x, z, -y),
            Roll270Yaw90 => (-z, x, -y),
            Pitch90 => (z, y, -x),
            Pitch270 => (-z, y, x),
            Roll90Pitch90 => (y, -z, -x),
            Roll180Pitch90 => (-z, -y, -x),
            Roll270Pitch90 => (-y, z, -x),
            Roll90Pitch180 => (-x, -z, -y),
            Roll270Pitch180 => (-x, z, y),
            Roll90Pitch270 => (-y, -z, x),
            Roll180Pitch270 => (z, -y, x),
            Roll270Pitch270 => (y, z, x),
            Roll90Pitch180Yaw90 => (z, -x, -y),
            Roll90Yaw270 => (-z, -x, y),
        };
        Vector3::new(rx, ry, rz)
    }
}

impl TryFrom<u8> for Rotation {
    type Error = UnknownRotation;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Rotation::ALL
            .iter()
            .copied()
            .find(|r| r.id() == id)
            .ok_or(UnknownRotation(id))
    }
}

impl From<Rotation> for u8 {
    fn from(r: Rotation) -> Self {
        r.id()
    }
}
