use na::Vector3;

const FILTER_COEFFICIENT: f32 = 0.99;

/// Low-pass filtered vibration and coning metrics, updated once per
/// integration window.
#[derive(Debug, Clone, Default)]
pub struct VibrationEstimator {
    prev_delta_angle: Vector3<f32>,
    vibration_metric: f32,
    coning_vibration: f32,
}

impl VibrationEstimator {
    pub fn update(&mut self, delta_angle: &Vector3<f32>) {
        let difference = (delta_angle - self.prev_delta_angle).norm();
        self.vibration_metric =
            FILTER_COEFFICIENT * self.vibration_metric + (1.0 - FILTER_COEFFICIENT) * difference;

        // Rotation axis drifting between windows shows up as a cross product
        let coning = delta_angle.cross(&self.prev_delta_angle).norm();
        self.coning_vibration =
            FILTER_COEFFICIENT * self.coning_vibration + (1.0 - FILTER_COEFFICIENT) * coning;

        self.prev_delta_angle = *delta_angle;
    }

    pub fn vibration_metric(&self) -> f32 {
        self.vibration_metric
    }

    pub fn coning_vibration(&self) -> f32 {
        self.coning_vibration
    }

    pub fn prev_delta_angle(&self) -> Vector3<f32> {
        self.prev_delta_angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn first_update_measures_against_zero() {
        let mut v = VibrationEstimator::default();
        v.update(&Vector3::new(3.0, 4.0, 0.0));
        assert_relative_eq!(v.vibration_metric(), 0.01 * 5.0, epsilon = 1e-6);
        assert_eq!(v.coning_vibration(), 0.0);
        assert_eq!(v.prev_delta_angle(), Vector3::new(3.0, 4.0, 0.0));
    }

    #[test]
    fn coning_from_changing_axis() {
        let mut v = VibrationEstimator::default();
        v.update(&Vector3::new(1.0, 0.0, 0.0));
        v.update(&Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(v.coning_vibration(), 0.01, epsilon = 1e-6);
        assert!(v.vibration_metric() > 0.0);
    }

    #[test]
    fn constant_motion_decays_towards_zero() {
        let mut v = VibrationEstimator::default();
        let d = Vector3::new(0.01, -0.02, 0.005);
        let mut last = f32::MAX;
        for _ in 0..2_000 {
            v.update(&d);
            assert!(v.vibration_metric() >= 0.0);
            assert!(v.coning_vibration() >= 0.0);
            assert!(v.vibration_metric() <= last);
            last = v.vibration_metric();
        }
        assert!(v.vibration_metric() < 1e-9);
        assert_eq!(v.coning_vibration(), 0.0);
    }
}
