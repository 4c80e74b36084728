//! Tier report printed by the driver.

use crate::config::{ReportConfig, ReportFormat};
use crate::error::SimdError;
use crate::level::FeatureLevel;
use crate::registry::{self, VectorSpec};
use crate::runtime::RuntimeInfo;
use serde::Serialize;
use std::fmt;

/// Build tier, CPU tier and the vector types available at the build tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub compiled: FeatureLevel,
    pub detected: FeatureLevel,
    pub compatible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_features: Option<Vec<&'static str>>,
    pub vector_types: Vec<VectorSpec>,
}

impl Report {
    pub fn new(info: &RuntimeInfo, config: &ReportConfig) -> Self {
        Report {
            compiled: info.compiled,
            detected: info.detected,
            compatible: info.is_compatible(),
            cpu_features: config.show_cpu_features.then(|| info.features.names()),
            vector_types: registry::available(),
        }
    }

    /// Renders in the configured format.
    pub fn render(&self, format: ReportFormat) -> Result<String, SimdError> {
        match format {
            ReportFormat::Text => Ok(self.to_string()),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "compiled SIMD level: {}", self.compiled)?;
        writeln!(f, "runtime SIMD level:  {}", self.detected)?;
        writeln!(
            f,
            "compatible:          {}",
            if self.compatible { "yes" } else { "no" }
        )?;
        if let Some(features) = &self.cpu_features {
            let list = if features.is_empty() {
                "-".to_string()
            } else {
                features.join(" ")
            };
            writeln!(f, "cpu features:        {}", list)?;
        }
        writeln!(f, "vector types:")?;
        for spec in &self.vector_types {
            let shape = format!("[{}; {}]", spec.element, spec.lanes);
            writeln!(f, "  {:<9} {:<8} {}", shape, spec.native, spec.required)?;
        }
        Ok(())
    }
}
