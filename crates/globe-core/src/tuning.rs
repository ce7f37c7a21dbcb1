//! Live tuning: ranged numeric parameters that write straight into
//! [`SceneState`] and the rotation controller.
//!
//! Parameters are derived from the scene once at mount. An edit is clamped to
//! the parameter's range, snapped to its step and written in place; the next
//! frame picks it up because node transforms are derived from the state.

use crate::constants::{
    LIGHT_INTENSITY_RANGE, LIGHT_POSITION_RANGE, MARKER_POSITION_RANGE, SPIN_SPEED_RANGE,
};
use crate::error::TuningError;
use crate::rotation::RotationController;
use crate::scene::{LightKind, SceneState};
use fnv::FnvHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Field a parameter is bound to. Indices refer to `SceneState` vectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TuningTarget {
    LightPosition { light: usize, axis: Axis },
    LightIntensity { light: usize },
    MarkerPosition { marker: usize, axis: Axis },
    SpinSpeed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TuningParam {
    pub key: String,
    pub label: String,
    pub target: TuningTarget,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl TuningParam {
    fn ranged(key: String, label: String, target: TuningTarget, range: (f32, f32, f32)) -> Self {
        Self {
            key,
            label,
            target,
            min: range.0,
            max: range.1,
            step: range.2,
        }
    }

    /// Clamp `value` into `[min, max]` and snap it to the nearest step from `min`.
    pub fn quantize(&self, value: f32) -> f32 {
        let v = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return v;
        }
        let steps = ((v - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }
}

pub struct TuningBridge {
    params: Vec<TuningParam>,
    by_key: FnvHashMap<String, usize>,
    attached: bool,
}

impl TuningBridge {
    /// Derive the parameter set for `state`: position and intensity per point
    /// light, intensity per ambient light, position per marker, and spin speed.
    ///
    /// Marker keys use the marker's index (`marker.<i>.position.<axis>`) since
    /// labels need not be unique; the label only appears in the display text.
    pub fn new(state: &SceneState) -> Self {
        let mut params = Vec::new();
        for (i, light) in state.lights.iter().enumerate() {
            if light.kind == LightKind::Point {
                for axis in Axis::ALL {
                    params.push(TuningParam::ranged(
                        format!("light.{}.position.{}", light.name, axis.name()),
                        format!("{} {}", light.name, axis.name()),
                        TuningTarget::LightPosition { light: i, axis },
                        LIGHT_POSITION_RANGE,
                    ));
                }
            }
            params.push(TuningParam::ranged(
                format!("light.{}.intensity", light.name),
                format!("{} intensity", light.name),
                TuningTarget::LightIntensity { light: i },
                LIGHT_INTENSITY_RANGE,
            ));
        }
        for (i, marker) in state.markers.iter().enumerate() {
            for axis in Axis::ALL {
                params.push(TuningParam::ranged(
                    format!("marker.{}.position.{}", i, axis.name()),
                    format!("{} {}", marker.label, axis.name()),
                    TuningTarget::MarkerPosition { marker: i, axis },
                    MARKER_POSITION_RANGE,
                ));
            }
        }
        params.push(TuningParam::ranged(
            "spin_speed".into(),
            "spin speed".into(),
            TuningTarget::SpinSpeed,
            SPIN_SPEED_RANGE,
        ));

        let by_key = params
            .iter()
            .enumerate()
            .map(|(i, p)| (p.key.clone(), i))
            .collect();
        Self {
            params,
            by_key,
            attached: true,
        }
    }

    pub fn params(&self) -> &[TuningParam] {
        &self.params
    }

    pub fn find(&self, key: &str) -> Option<&TuningParam> {
        self.by_key.get(key).map(|&i| &self.params[i])
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Current value of `key`, as a panel would display it.
    pub fn read(
        &self,
        key: &str,
        state: &SceneState,
        rotation: &RotationController,
    ) -> Result<f32, TuningError> {
        if !self.attached {
            return Err(TuningError::Detached);
        }
        let param = self
            .find(key)
            .ok_or_else(|| TuningError::UnknownParameter(key.to_string()))?;
        let missing = || TuningError::MissingTarget(key.to_string());
        Ok(match param.target {
            TuningTarget::LightPosition { light, axis } => {
                state.lights.get(light).ok_or_else(missing)?.position[axis.index()]
            }
            TuningTarget::LightIntensity { light } => {
                state.lights.get(light).ok_or_else(missing)?.intensity
            }
            TuningTarget::MarkerPosition { marker, axis } => {
                state.markers.get(marker).ok_or_else(missing)?.position[axis.index()]
            }
            TuningTarget::SpinSpeed => rotation.spin_speed,
        })
    }

    /// Write an edit into the scene. Returns the value actually stored.
    pub fn apply(
        &self,
        key: &str,
        value: f32,
        state: &mut SceneState,
        rotation: &mut RotationController,
    ) -> Result<f32, TuningError> {
        if !self.attached {
            return Err(TuningError::Detached);
        }
        let param = self
            .find(key)
            .ok_or_else(|| TuningError::UnknownParameter(key.to_string()))?;
        if !value.is_finite() {
            return Err(TuningError::NotFinite {
                key: key.to_string(),
                value,
            });
        }
        let v = param.quantize(value);
        let missing = || TuningError::MissingTarget(key.to_string());
        match param.target {
            TuningTarget::LightPosition { light, axis } => {
                state.lights.get_mut(light).ok_or_else(missing)?.position[axis.index()] = v;
            }
            TuningTarget::LightIntensity { light } => {
                state.lights.get_mut(light).ok_or_else(missing)?.intensity = v;
            }
            TuningTarget::MarkerPosition { marker, axis } => {
                state.markers.get_mut(marker).ok_or_else(missing)?.position[axis.index()] = v;
            }
            TuningTarget::SpinSpeed => rotation.spin_speed = v,
        }
        log::debug!("[tuning] {} = {}", key, v);
        Ok(v)
    }

    /// Make the bridge inert. Later reads and edits fail with [`TuningError::Detached`].
    pub fn detach(&mut self) {
        if self.attached {
            self.attached = false;
            log::info!("[tuning] detached {} parameters", self.params.len());
        }
    }
}
