use std::fmt;
use std::str::FromStr;

/// The fixed set of uniforms every playground shader can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformName {
    Time,
    Resolution,
    Mouse,
}

impl UniformName {
    pub const ALL: [UniformName; 3] = [Self::Time, Self::Resolution, Self::Mouse];

    /// Identifier used in GLSL source.
    pub fn glsl_name(self) -> &'static str {
        match self {
            Self::Time => "u_time",
            Self::Resolution => "u_resolution",
            Self::Mouse => "u_mouse",
        }
    }

    fn kind(self) -> UniformKind {
        match self {
            Self::Time => UniformKind::Float,
            Self::Resolution | Self::Mouse => UniformKind::Vec2,
        }
    }
}

impl fmt::Display for UniformName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glsl_name())
    }
}

impl FromStr for UniformName {
    type Err = UniformError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.glsl_name() == value)
            .ok_or_else(|| UniformError::Unknown(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    Float,
    Vec2,
}

impl fmt::Display for UniformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float => f.write_str("float"),
            Self::Vec2 => f.write_str("vec2"),
        }
    }
}

/// Typed value written into a uniform slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            Self::Float(_) => UniformKind::Float,
            Self::Vec2(_) => UniformKind::Vec2,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum UniformError {
    #[error("unknown uniform '{0}'")]
    Unknown(String),
    #[error("uniform {name} expects a {expected} value, got {actual}")]
    KindMismatch {
        name: UniformName,
        expected: UniformKind,
        actual: UniformKind,
    },
}

/// Values handed to the renderer for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UniformSnapshot {
    pub time: f32,
    pub resolution: [f32; 2],
    pub mouse: [f32; 2],
}

impl UniformSnapshot {
    pub fn get(&self, name: UniformName) -> UniformValue {
        match name {
            UniformName::Time => UniformValue::Float(self.time),
            UniformName::Resolution => UniformValue::Vec2(self.resolution),
            UniformName::Mouse => UniformValue::Vec2(self.mouse),
        }
    }
}

/// Owner of the uniform values shared by the resize handler, pointer tracker
/// and render loop. The key set is fixed; writes overwrite the whole slot.
#[derive(Debug, Clone, Default)]
pub struct UniformStore {
    values: UniformSnapshot,
}

impl UniformStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites `name` with `value`.
    ///
    /// Writing a value of the wrong kind is a wiring bug; debug builds abort
    /// on it, release builds report it and leave the slot untouched.
    pub fn set(&mut self, name: UniformName, value: UniformValue) -> Result<(), UniformError> {
        let expected = name.kind();
        match (name, value) {
            (UniformName::Time, UniformValue::Float(v)) => self.values.time = v,
            (UniformName::Resolution, UniformValue::Vec2(v)) => self.values.resolution = v,
            (UniformName::Mouse, UniformValue::Vec2(v)) => self.values.mouse = v,
            _ => {
                debug_assert!(
                    false,
                    "uniform {name} written with a {} value",
                    value.kind()
                );
                return Err(UniformError::KindMismatch {
                    name,
                    expected,
                    actual: value.kind(),
                });
            }
        }
        Ok(())
    }

    /// Resolves a GLSL uniform identifier and writes it.
    ///
    /// An unrecognised name is a wiring bug with the same treatment as a kind
    /// mismatch in [`UniformStore::set`].
    pub fn set_by_name(&mut self, name: &str, value: UniformValue) -> Result<(), UniformError> {
        let parsed = match name.parse::<UniformName>() {
            Ok(parsed) => parsed,
            Err(err) => {
                debug_assert!(false, "unknown uniform '{name}'");
                return Err(err);
            }
        };
        self.set(parsed, value)
    }

    pub fn set_time(&mut self, seconds: f32) {
        self.values.time = seconds;
    }

    pub fn set_resolution(&mut self, width: f32, height: f32) {
        self.values.resolution = [width, height];
    }

    pub fn set_mouse(&mut self, x: f32, y: f32) {
        self.values.mouse = [x, y];
    }

    pub fn snapshot(&self) -> UniformSnapshot {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_glsl_names() {
        assert_eq!("u_time".parse::<UniformName>(), Ok(UniformName::Time));
        assert_eq!(
            "u_resolution".parse::<UniformName>(),
            Ok(UniformName::Resolution)
        );
        assert_eq!("u_mouse".parse::<UniformName>(), Ok(UniformName::Mouse));
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(
            "iTime".parse::<UniformName>(),
            Err(UniformError::Unknown("iTime".into()))
        );
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "unknown uniform 'u_tme'"))]
    fn unknown_name_fails_fast() {
        let mut store = UniformStore::new();
        let err = store
            .set_by_name("u_tme", UniformValue::Float(1.0))
            .unwrap_err();
        assert_eq!(err, UniformError::Unknown("u_tme".into()));
        assert_eq!(store.snapshot(), UniformSnapshot::default());
    }

    #[test]
    fn set_overwrites_whole_slot() {
        let mut store = UniformStore::new();
        store
            .set(UniformName::Resolution, UniformValue::Vec2([640.0, 480.0]))
            .unwrap();
        store.set_by_name("u_time", UniformValue::Float(2.5)).unwrap();
        store.set_mouse(3.0, 4.0);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.resolution, [640.0, 480.0]);
        assert_eq!(snapshot.time, 2.5);
        assert_eq!(snapshot.get(UniformName::Mouse), UniformValue::Vec2([3.0, 4.0]));
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "written with a float value"))]
    fn kind_mismatch_fails_fast() {
        let mut store = UniformStore::new();
        let result = store.set(UniformName::Mouse, UniformValue::Float(1.0));
        assert!(matches!(result, Err(UniformError::KindMismatch { .. })));
    }
}
