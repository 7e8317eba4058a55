/// Engine-wide configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Starters per lineup, and therefore pairings per fixture.
    pub squad_size: usize,
    /// Default per-pairing match duration in minutes when the creator
    /// does not specify one.
    pub default_duration_minutes: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            squad_size: 5,
            default_duration_minutes: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.squad_size, 5);
        assert_eq!(config.default_duration_minutes, 6);
    }
}
