use serde::{Deserialize, Serialize};

/// Traffic signal identifier.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SignalId(pub i64);

impl SignalId {
    pub fn new(value: i64) -> Self {
        SignalId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for SignalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SignalId {
    fn from(value: i64) -> Self {
        SignalId(value)
    }
}

/// Snapshot of traffic conditions at one signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalObservation {
    pub signal_id: SignalId,
    /// Vehicles currently queued at the signal.
    pub quantity: u64,
    /// Throughput capacity in vehicles per second. Must be positive.
    pub rate: f64,
}

impl SignalObservation {
    pub fn new(signal_id: impl Into<SignalId>, quantity: u64, rate: f64) -> Self {
        Self {
            signal_id: signal_id.into(),
            quantity,
            rate,
        }
    }
}

/// One allocation round: a cycle budget shared by a set of signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRequest {
    /// Seconds of green time to distribute.
    pub total_cycle_time: f64,
    pub signals: Vec<SignalObservation>,
}

impl CycleRequest {
    pub fn new(total_cycle_time: f64, signals: Vec<SignalObservation>) -> Self {
        Self {
            total_cycle_time,
            signals,
        }
    }
}

/// Green time granted to a single signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalAllocation {
    pub signal_id: SignalId,
    pub allocated_time: f64,
}

/// Allocations in the same order as the request's signals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationResult {
    pub allocations: Vec<SignalAllocation>,
}

impl AllocationResult {
    pub fn total(&self) -> f64 {
        self.allocations.iter().map(|a| a.allocated_time).sum()
    }

    pub fn get(&self, signal_id: SignalId) -> Option<f64> {
        self.allocations
            .iter()
            .find(|a| a.signal_id == signal_id)
            .map(|a| a.allocated_time)
    }

    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }
}

/// Registration input: the raw peak windows of one signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakWindowEntry {
    pub signal_id: SignalId,
    /// Windows formatted as `HH:MM-HH:MM`.
    #[serde(default)]
    pub peak_hours: Vec<String>,
}

impl PeakWindowEntry {
    pub fn new<S: Into<String>>(
        signal_id: impl Into<SignalId>,
        peak_hours: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            signal_id: signal_id.into(),
            peak_hours: peak_hours.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_id_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&SignalId::new(7)).unwrap(), "7");
        let id: SignalId = serde_json::from_str("42").unwrap();
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn test_cycle_request_deserialize() {
        let json = r#"{
            "total_cycle_time": 120.0,
            "signals": [
                {"signal_id": 1, "quantity": 50, "rate": 3.0},
                {"signal_id": 2, "quantity": 30, "rate": 2}
            ]
        }"#;
        let request: CycleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.signals.len(), 2);
        assert_eq!(request.signals[1], SignalObservation::new(2, 30, 2.0));
    }

    #[test]
    fn test_negative_quantity_rejected_by_schema() {
        let json = r#"{"signal_id": 1, "quantity": -5, "rate": 1.0}"#;
        assert!(serde_json::from_str::<SignalObservation>(json).is_err());
    }

    #[test]
    fn test_allocation_result_lookup() {
        let result = AllocationResult {
            allocations: vec![
                SignalAllocation {
                    signal_id: SignalId(1),
                    allocated_time: 75.0,
                },
                SignalAllocation {
                    signal_id: SignalId(2),
                    allocated_time: 45.0,
                },
            ],
        };
        assert_eq!(result.len(), 2);
        assert_eq!(result.get(SignalId(2)), Some(45.0));
        assert_eq!(result.get(SignalId(3)), None);
        assert_eq!(result.total(), 120.0);
    }

    #[test]
    fn test_peak_window_entry_default_hours() {
        let entry: PeakWindowEntry = serde_json::from_str(r#"{"signal_id": 3}"#).unwrap();
        assert!(entry.peak_hours.is_empty());
    }
}
