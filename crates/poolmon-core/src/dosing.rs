//! Chemical dosing calculator
//!
//! Fixed per-chemical ratios (per 1000 L) for a salt-water pool. Business
//! rejections — wrong chemical for the direction of change, difference too
//! small to act on, undefined pool volume — are ordinary return values,
//! never errors: callers branch on [`DosingOutcome`].

use serde::Serialize;

use crate::types::DosingRecommendation;

/// Chemical product the calculator knows how to dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Chemical {
    PhMinus,
    PhPlus,
    Salt,
    ShockChlorine,
    Algaecide,
    Clarifier,
}

/// Dosing ratio and application data for one chemical.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChemicalSpec {
    /// Product quantity per 1000 L of pool water.
    pub ratio_per_1000l: f64,
    pub unit: &'static str,
    /// Parameter movement one ratio unit produces (differential chemicals).
    pub param_change: f64,
    pub instructions: &'static str,
}

const PH_MINUS: ChemicalSpec = ChemicalSpec {
    ratio_per_1000l: 5.0,
    unit: "g",
    param_change: 0.1,
    instructions: "Diluir en un cubo de agua y verter lentamente en la piscina con la bomba \
                   funcionando. Esperar 2-4 horas antes de medir.",
};
const PH_PLUS: ChemicalSpec = ChemicalSpec {
    ratio_per_1000l: 5.0,
    unit: "g",
    param_change: 0.1,
    instructions: "Disolver completamente en agua tibia antes de añadir. Aplicar con bomba \
                   funcionando. Esperar 4-6 horas antes de medir.",
};
const SALT: ChemicalSpec = ChemicalSpec {
    ratio_per_1000l: 1000.0,
    unit: "g",
    param_change: 1000.0,
    instructions: "Añadir directamente en la piscina con bomba funcionando. La sal tardará \
                   24-48h en disolverse completamente.",
};
const SHOCK_CHLORINE: ChemicalSpec = ChemicalSpec {
    ratio_per_1000l: 15.0,
    unit: "g",
    param_change: 2.0,
    instructions: "Disolver en cubo de agua. Aplicar al atardecer con bomba funcionando. No \
                   bañarse hasta que FAC baje a <3ppm.",
};
const ALGAECIDE: ChemicalSpec = ChemicalSpec {
    ratio_per_1000l: 5.0,
    unit: "ml",
    param_change: 1.0,
    instructions: "Aplicar directamente en la piscina. Para tratamiento intensivo, doblar la \
                   dosis.",
};
const CLARIFIER: ChemicalSpec = ChemicalSpec {
    ratio_per_1000l: 3.0,
    unit: "ml",
    param_change: 1.0,
    instructions: "Aplicar con bomba funcionando. Mantener filtración 24h seguidas. Aspirar \
                   precipitado después de 48h.",
};

impl Chemical {
    /// Ratio table entry for this chemical.
    pub const fn spec(self) -> &'static ChemicalSpec {
        match self {
            Chemical::PhMinus => &PH_MINUS,
            Chemical::PhPlus => &PH_PLUS,
            Chemical::Salt => &SALT,
            Chemical::ShockChlorine => &SHOCK_CHLORINE,
            Chemical::Algaecide => &ALGAECIDE,
            Chemical::Clarifier => &CLARIFIER,
        }
    }

    /// Flat-dose chemicals ignore current/target entirely; shock and the
    /// water-treatment products are applied per volume only.
    pub const fn is_flat_dose(self) -> bool {
        matches!(
            self,
            Chemical::ShockChlorine | Chemical::Algaecide | Chemical::Clarifier
        )
    }

    /// Wire identifier, matching the dosing sheet's chemical ids.
    pub fn name(self) -> &'static str {
        match self {
            Chemical::PhMinus => "ph_minus",
            Chemical::PhPlus => "ph_plus",
            Chemical::Salt => "sal",
            Chemical::ShockChlorine => "cloro_shock",
            Chemical::Algaecide => "alguicida",
            Chemical::Clarifier => "clarificador",
        }
    }

    pub fn from_name(name: &str) -> Option<Chemical> {
        match name {
            "ph_minus" => Some(Chemical::PhMinus),
            "ph_plus" => Some(Chemical::PhPlus),
            "sal" => Some(Chemical::Salt),
            "cloro_shock" => Some(Chemical::ShockChlorine),
            "alguicida" => Some(Chemical::Algaecide),
            "clarificador" => Some(Chemical::Clarifier),
            _ => None,
        }
    }
}

/// Result of a dosing calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DosingOutcome {
    Recommended(DosingRecommendation),
    NotApplicable { reason: &'static str },
}

const REASON_NO_VOLUME: &str = "Primero define el volumen de tu piscina";
const REASON_UNKNOWN_CHEMICAL: &str = "Tipo de químico no reconocido";
const REASON_NO_SALT_NEEDED: &str = "No es necesario añadir sal";
const REASON_PH_AT_TARGET: &str = "El pH ya está en el rango objetivo";
const REASON_USE_PH_PLUS: &str = "Usa pH+ para subir el pH, no pH-";
const REASON_USE_PH_MINUS: &str = "Usa pH- para bajar el pH, no pH+";

/// Minimum pH difference worth correcting.
const PH_MIN_DIFFERENCE: f64 = 0.05;

/// Compute the product quantity needed to move a parameter from `current`
/// to `target` in a pool of `volume_liters`.
///
/// Differential chemicals scale with the requested change; flat-dose
/// chemicals depend on volume alone. Amounts are rounded to 1 decimal.
pub fn dose(
    volume_liters: f64,
    chemical: Chemical,
    current: f64,
    target: f64,
) -> DosingOutcome {
    if volume_liters <= 0.0 {
        return DosingOutcome::NotApplicable {
            reason: REASON_NO_VOLUME,
        };
    }
    let spec = chemical.spec();
    let per_thousand = volume_liters / 1000.0;

    let amount = match chemical {
        Chemical::Salt => {
            let difference = target - current;
            if difference <= 0.0 {
                return DosingOutcome::NotApplicable {
                    reason: REASON_NO_SALT_NEEDED,
                };
            }
            per_thousand * spec.ratio_per_1000l * (difference / spec.param_change)
        }
        Chemical::PhMinus | Chemical::PhPlus => {
            let difference = (target - current).abs();
            if difference < PH_MIN_DIFFERENCE {
                return DosingOutcome::NotApplicable {
                    reason: REASON_PH_AT_TARGET,
                };
            }
            if chemical == Chemical::PhMinus && target >= current {
                return DosingOutcome::NotApplicable {
                    reason: REASON_USE_PH_PLUS,
                };
            }
            if chemical == Chemical::PhPlus && target <= current {
                return DosingOutcome::NotApplicable {
                    reason: REASON_USE_PH_MINUS,
                };
            }
            per_thousand * spec.ratio_per_1000l * (difference / spec.param_change)
        }
        Chemical::ShockChlorine | Chemical::Algaecide | Chemical::Clarifier => {
            per_thousand * spec.ratio_per_1000l
        }
    };

    DosingOutcome::Recommended(DosingRecommendation {
        amount: round1(amount),
        unit: spec.unit,
        instructions: spec.instructions,
    })
}

/// String-id form of [`dose`]; an unrecognized chemical id is a
/// `NotApplicable` outcome, not an error.
pub fn dose_named(volume_liters: f64, chemical: &str, current: f64, target: f64) -> DosingOutcome {
    match Chemical::from_name(chemical) {
        Some(chemical) => dose(volume_liters, chemical, current, target),
        None => DosingOutcome::NotApplicable {
            reason: REASON_UNKNOWN_CHEMICAL,
        },
    }
}

/// Pool volume in liters from dimensions in meters, rounded to whole
/// liters. Non-positive or non-finite dimensions yield 0.0 (volume
/// undefined).
pub fn pool_volume_liters(length_m: f64, width_m: f64, avg_depth_m: f64) -> f64 {
    let dims = [length_m, width_m, avg_depth_m];
    if dims.iter().any(|d| !d.is_finite() || *d <= 0.0) {
        return 0.0;
    }
    (length_m * width_m * avg_depth_m * 1000.0).round()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
