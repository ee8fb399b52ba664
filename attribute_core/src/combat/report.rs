//! AppliedDamageReport - Outcome of applying one hit to a store

use serde::{Deserialize, Serialize};

/// What one `apply` call did to the target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppliedDamageReport {
    // === Damage ===
    /// InDamage consumed from the store
    pub incoming: f64,
    /// Magnitude after critical/lucky modifiers
    pub magnitude: f64,

    // === Mitigation ===
    /// Scaled damage units absorbed by armor
    pub armor_absorbed: f64,
    /// Damage dealt to health after elemental scaling (may exceed the health lost)
    pub health_damage: f64,

    // === State Changes ===
    pub armor_before: f64,
    pub armor_after: f64,
    pub health_before: f64,
    pub health_after: f64,

    // === Flags ===
    pub is_critical: bool,
    pub is_lucky: bool,
    pub lucky_stacks: u32,
    /// Armor crossed to zero during this hit
    pub armor_depleted: bool,
    /// Health crossed to zero during this hit
    pub is_killing_blow: bool,
}

impl AppliedDamageReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing was applied (zero or negative InDamage)
    pub fn is_empty(&self) -> bool {
        self.magnitude <= 0.0
    }

    pub fn health_change(&self) -> f64 {
        self.health_after - self.health_before
    }

    pub fn armor_change(&self) -> f64 {
        self.armor_after - self.armor_before
    }

    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "No damage".to_string();
        }

        let mut parts = vec![format!("{:.0} damage", self.magnitude)];

        if self.is_critical {
            parts.push("CRIT".to_string());
        }

        if self.is_lucky {
            parts.push(format!("LUCKY x{}", self.lucky_stacks + 1));
        }

        if self.armor_absorbed > 0.0 {
            parts.push(format!("{:.0} absorbed by armor", self.armor_absorbed));
        }

        if self.health_damage > 0.0 {
            parts.push(format!("{:.0} to health", self.health_damage));
        }

        if self.armor_depleted {
            parts.push("armor broken".to_string());
        }

        if self.is_killing_blow {
            parts.push("FATAL".to_string());
        }

        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report() {
        let report = AppliedDamageReport::new();
        assert!(report.is_empty());
        assert_eq!(report.summary(), "No damage");
    }

    #[test]
    fn test_changes() {
        let report = AppliedDamageReport {
            magnitude: 30.0,
            armor_before: 20.0,
            armor_after: 0.0,
            health_before: 65.0,
            health_after: 55.0,
            ..Default::default()
        };
        assert_eq!(report.armor_change(), -20.0);
        assert_eq!(report.health_change(), -10.0);
    }

    #[test]
    fn test_summary() {
        let report = AppliedDamageReport {
            magnitude: 90.0,
            armor_absorbed: 20.0,
            health_damage: 70.0,
            is_critical: true,
            is_lucky: true,
            lucky_stacks: 2,
            armor_depleted: true,
            is_killing_blow: true,
            ..Default::default()
        };

        let summary = report.summary();
        assert!(summary.starts_with("90 damage"));
        assert!(summary.contains("CRIT"));
        assert!(summary.contains("LUCKY x3"));
        assert!(summary.contains("20 absorbed by armor"));
        assert!(summary.contains("armor broken"));
        assert!(summary.contains("FATAL"));
    }
}
