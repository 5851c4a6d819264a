//! Optimal parameter ranges for a salt-water pool
//!
//! Static reference data; defined once, shared process-wide, never mutated.

use crate::types::Parameter;

/// Optimal [min, max] band plus display metadata for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
    pub icon: &'static str,
}

const PH: ParameterRange = ParameterRange {
    min: 7.2,
    max: 7.6,
    unit: "",
    icon: "🧪",
};
const CONDUCTIVITY: ParameterRange = ParameterRange {
    min: 4000.0,
    max: 8000.0,
    unit: "µS/cm",
    icon: "⚡",
};
const TDS: ParameterRange = ParameterRange {
    min: 2000.0,
    max: 4500.0,
    unit: "ppm",
    icon: "💧",
};
const SALINITY: ParameterRange = ParameterRange {
    min: 2700.0,
    max: 4500.0,
    unit: "ppm",
    icon: "🧂",
};
const ORP: ParameterRange = ParameterRange {
    min: 650.0,
    max: 750.0,
    unit: "mV",
    icon: "🔋",
};
const FAC: ParameterRange = ParameterRange {
    min: 1.0,
    max: 3.0,
    unit: "ppm",
    icon: "🟢",
};
const TEMPERATURE: ParameterRange = ParameterRange {
    min: 22.0,
    max: 32.0,
    unit: "°C",
    icon: "🌡️",
};

/// Range table lookup. Total over the closed parameter set.
pub const fn range_for(parameter: Parameter) -> &'static ParameterRange {
    match parameter {
        Parameter::Ph => &PH,
        Parameter::Conductivity => &CONDUCTIVITY,
        Parameter::Tds => &TDS,
        Parameter::Salinity => &SALINITY,
        Parameter::Orp => &ORP,
        Parameter::Fac => &FAC,
        Parameter::Temperature => &TEMPERATURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_range_is_well_formed() {
        for param in Parameter::ALL {
            let r = range_for(param);
            assert!(
                r.min < r.max,
                "range for {:?} must have min < max, got [{}, {}]",
                param,
                r.min,
                r.max
            );
            assert!(r.min >= 0.0, "ranges are non-negative, {:?} has {}", param, r.min);
        }
    }

    #[test]
    fn test_reference_values() {
        assert_eq!(range_for(Parameter::Ph).min, 7.2);
        assert_eq!(range_for(Parameter::Ph).max, 7.6);
        assert_eq!(range_for(Parameter::Fac).unit, "ppm");
        assert_eq!(range_for(Parameter::Orp).unit, "mV");
    }
}
