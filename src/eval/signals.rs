use std::collections::BTreeMap;

/// Value of one visibility signal.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum SignalValue {
    /// Boolean shown / stuck state.
    Flag(bool),
    /// Continuous progress in `[0, 1]`.
    Progress(f64),
}

impl SignalValue {
    /// `true` for a set flag or any progress above zero.
    pub fn is_active(self) -> bool {
        match self {
            Self::Flag(b) => b,
            Self::Progress(p) => p > 0.0,
        }
    }

    pub fn as_progress(self) -> f64 {
        match self {
            Self::Flag(true) => 1.0,
            Self::Flag(false) => 0.0,
            Self::Progress(p) => p,
        }
    }
}

/// Named signal set, recomputed from scratch every tick.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct VisibilitySignals(BTreeMap<String, SignalValue>);

impl VisibilitySignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&mut self, name: &str, value: SignalValue) {
        self.0.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<SignalValue> {
        self.0.get(name).copied()
    }

    /// Whether `name` is active; unknown signals are inactive.
    pub fn is_active(&self, name: &str) -> bool {
        self.get(name).is_some_and(SignalValue::is_active)
    }

    /// Progress of `name`; unknown signals read as 0.
    pub fn progress(&self, name: &str) -> f64 {
        self.get(name).map_or(0.0, SignalValue::as_progress)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SignalValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/signals.rs"]
mod tests;
