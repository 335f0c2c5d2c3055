#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct EvalSettings {
    /// Treat every integer operation as its checked variant, failing on overflow instead of
    /// wrapping.
    pub checked_arithmetic: bool,
    /// Nested closure invocations allowed before evaluation fails.
    pub max_call_depth: usize,
}

impl Default for EvalSettings {
    fn default() -> Self {
        Self::wrapping()
    }
}

impl EvalSettings {
    pub fn wrapping() -> Self {
        EvalSettings {
            checked_arithmetic: false,
            max_call_depth: 256,
        }
    }

    pub fn checked() -> Self {
        EvalSettings {
            checked_arithmetic: true,
            ..Self::wrapping()
        }
    }
}
