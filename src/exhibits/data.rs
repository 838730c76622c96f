//! Literal tables behind every exhibit
//!
//! Figures are compiled from ENIF 2024 (INEGI–CNBV), Banxico, BCB's Pix
//! management report, FEBRABAN, BBVA Research, MBC and ACI Worldwide/Cebr, as
//! cited in each exhibit's footnote. Tables are plain constants; the only
//! behaviour attached to them is validation.

use super::error::{ExhibitError, Result};

/// Awareness, use and activation of one Mexican instant-payment system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AwarenessUsage {
    pub system: &'static str,
    /// % of adult population that knows the system
    pub awareness_pct: f64,
    /// % of adult population that used it at least once
    pub usage_pct: f64,
    /// Validated accounts / users, millions (activation proxy)
    pub activation_m: f64,
}

pub const ENIF_2024: [AwarenessUsage; 2] = [
    AwarenessUsage {
        system: "CoDi",
        awareness_pct: 38.0,
        usage_pct: 12.8,
        activation_m: 18.6,
    },
    AwarenessUsage {
        system: "DiMo",
        awareness_pct: 18.5,
        usage_pct: 6.8,
        activation_m: 5.28,
    },
];

/// Transaction volumes compared on the same scale (millions of transactions)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransactionGap {
    pub codi_cumulative_m: f64,
    pub codi_label: &'static str,
    pub pix_single_day_m: f64,
    pub pix_label: &'static str,
}

pub const TRANSACTION_GAP: TransactionGap = TransactionGap {
    codi_cumulative_m: 11.9,
    codi_label: "CoDi — acumulado (2019–1T 2024)",
    pix_single_day_m: 276.7,
    pix_label: "Pix — en 1 día (6 jun 2025)",
};

/// Merchant discount rate quoted for one acceptance method
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MdrQuote {
    pub method: &'static str,
    pub pct: f64,
}

pub const MDR_BY_METHOD: [MdrQuote; 3] = [
    MdrQuote {
        method: "Tarjeta (Agregador)",
        pct: 3.55,
    },
    MdrQuote {
        method: "Tarjeta (Banco)",
        pct: 2.50,
    },
    MdrQuote {
        method: "Pix/QR",
        pct: 0.22,
    },
];

/// Low/high bounds of the acceptance cost of one method, in percentage points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostRange {
    pub method: &'static str,
    pub low_pct: f64,
    pub high_pct: f64,
}

pub const ACCEPTANCE_COST_RANGES: [CostRange; 5] = [
    CostRange {
        method: "Efectivo (costos operativos)",
        low_pct: 2.0,
        high_pct: 5.0,
    },
    CostRange {
        method: "Tarjeta (TPV) Débito",
        low_pct: 1.70,
        high_pct: 2.50,
    },
    CostRange {
        method: "Tarjeta (TPV) Crédito",
        low_pct: 1.80,
        high_pct: 2.75,
    },
    CostRange {
        method: "Tarjeta (Agregador)",
        low_pct: 3.5,
        high_pct: 3.6,
    },
    CostRange {
        method: "Modelo Pix (Comercio)",
        low_pct: 0.22,
        high_pct: 0.22,
    },
];

/// SME migrating its card acceptance to instant payments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmeScenario {
    pub monthly_sales_mxn: f64,
    /// Card MDR as a fraction (0.025 = 2.5%)
    pub card_rate: f64,
    /// Instant-payment MDR as a fraction
    pub instant_rate: f64,
}

pub const SME_SCENARIO: SmeScenario = SmeScenario {
    monthly_sales_mxn: 200_000.0,
    card_rate: 0.025,
    instant_rate: 0.0022,
};

/// Savings already realised in Brazil and the 2030 projection (MBC, 2025)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DigitalDividend {
    pub accumulated_usd_bn: f64,
    pub period: &'static str,
    pub projection_year: u16,
    pub projection_brl_bn: f64,
}

pub const DIGITAL_DIVIDEND: DigitalDividend = DigitalDividend {
    accumulated_usd_bn: 21.0,
    period: "2020–jun 2025",
    projection_year: 2030,
    projection_brl_bn: 40.1,
};

/// ACI Worldwide/Cebr projection of Pix's GDP contribution in Brazil
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrazilGdp {
    pub pct_year: u16,
    pub pct_of_gdp: f64,
    pub value_year: u16,
    pub value_brl_bn: f64,
}

pub const BRAZIL_GDP: BrazilGdp = BrazilGdp {
    pct_year: 2026,
    pct_of_gdp: 2.08,
    value_year: 2028,
    value_brl_bn: 280.7,
};

/// Five-year projection for Mexico ("Tabla 4")
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MexicoProjection {
    pub years: [u8; 5],
    /// Annual savings, USD bn
    pub savings_usd_bn: [f64; 5],
    /// Additional GDP growth, %
    pub delta_gdp_pct: [f64; 5],
    /// Cumulative new individuals in the financial system, millions
    pub new_users_m: [f64; 5],
    /// Reduction of the informal economy, % of GDP (negative = shrinking)
    pub informality_delta_pct: [f64; 5],
}

pub const MEXICO_PROJECTION: MexicoProjection = MexicoProjection {
    years: [1, 2, 3, 4, 5],
    savings_usd_bn: [1.5, 3.0, 4.5, 5.5, 6.0],
    delta_gdp_pct: [0.10, 0.20, 0.35, 0.45, 0.50],
    new_users_m: [5.0, 10.0, 14.0, 17.0, 18.0],
    informality_delta_pct: [-0.5, -1.0, -1.8, -2.5, -3.0],
};

/// Active users (millions) by months since launch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdoptionSeries {
    pub label: &'static str,
    pub points: &'static [(f64, f64)],
}

pub const PIX_ADOPTION: AdoptionSeries = AdoptionSeries {
    label: "Pix (Brasil)",
    points: &[(0.0, 0.0), (6.0, 67.0), (12.0, 107.0), (24.0, 133.0), (48.0, 160.5)],
};

pub const CODI_ADOPTION: AdoptionSeries = AdoptionSeries {
    label: "CoDi (México, ≥1 pago)",
    points: &[(0.0, 0.0), (6.0, 0.11), (48.0, 1.6)],
};

/// Pillar status for one country
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PillarStatus {
    Met,
    Partial,
    NotMet,
}

impl PillarStatus {
    /// Index into a status palette (Met / Partial / NotMet order)
    pub fn slot(self) -> usize {
        match self {
            PillarStatus::Met => 0,
            PillarStatus::Partial => 1,
            PillarStatus::NotMet => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PillarStatus::Met => "Cumplido",
            PillarStatus::Partial => "Parcial",
            PillarStatus::NotMet => "No cumplido",
        }
    }

    pub const ALL: [PillarStatus; 3] = [
        PillarStatus::Met,
        PillarStatus::Partial,
        PillarStatus::NotMet,
    ];
}

/// Strategic pillars for mass adoption (BIS fast-payments design groups)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scorecard {
    pub pillars: [&'static str; 5],
    pub countries: [&'static str; 2],
    pub status: [[PillarStatus; 2]; 5],
}

pub const STRATEGIC_SCORECARD: Scorecard = Scorecard {
    pillars: [
        "1) Mandato regulatorio\n(participación y UX obligatoria)",
        "2) UX estandarizada y\nmarca única",
        "3) Modelo de costo pro-escala\n(P2P gratis / comercios bajo costo)",
        "4) Gobernanza centralizada\n(operador de ecosistema)",
        "5) Interoperabilidad y\napertura del ecosistema",
    ],
    countries: ["Brasil (Pix)", "México (CoDi/DiMo)"],
    status: [
        [PillarStatus::Met, PillarStatus::Partial],
        [PillarStatus::Met, PillarStatus::Partial],
        [PillarStatus::Met, PillarStatus::Met],
        [PillarStatus::Met, PillarStatus::Met],
        [PillarStatus::Met, PillarStatus::Partial],
    ],
};

/// All tables an exhibit builder may read
#[derive(Debug, Clone, Copy)]
pub struct Dataset {
    pub enif: [AwarenessUsage; 2],
    pub transaction_gap: TransactionGap,
    pub mdr: [MdrQuote; 3],
    pub cost_ranges: [CostRange; 5],
    pub sme: SmeScenario,
    pub dividend: DigitalDividend,
    pub brazil_gdp: BrazilGdp,
    pub mexico: MexicoProjection,
    pub pix_adoption: AdoptionSeries,
    pub codi_adoption: AdoptionSeries,
    pub scorecard: Scorecard,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            enif: ENIF_2024,
            transaction_gap: TRANSACTION_GAP,
            mdr: MDR_BY_METHOD,
            cost_ranges: ACCEPTANCE_COST_RANGES,
            sme: SME_SCENARIO,
            dividend: DIGITAL_DIVIDEND,
            brazil_gdp: BRAZIL_GDP,
            mexico: MEXICO_PROJECTION,
            pix_adoption: PIX_ADOPTION,
            codi_adoption: CODI_ADOPTION,
            scorecard: STRATEGIC_SCORECARD,
        }
    }
}

fn check_non_negative(table: &'static str, field: &str, values: &[f64]) -> Result<()> {
    for (i, v) in values.iter().enumerate() {
        if !v.is_finite() {
            return Err(ExhibitError::invalid_data(
                table,
                format!("{}[{}] is not finite", field, i),
            ));
        }
        if *v < 0.0 {
            return Err(ExhibitError::invalid_data(
                table,
                format!("{}[{}] = {} is negative", field, i, v),
            ));
        }
    }
    Ok(())
}

fn check_finite(table: &'static str, field: &str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(ExhibitError::invalid_data(
            table,
            format!("{}[{}] is not finite", field, i),
        )),
        None => Ok(()),
    }
}

impl AdoptionSeries {
    /// Months must be strictly increasing; users non-negative
    pub fn validate(&self) -> Result<()> {
        let months: Vec<f64> = self.points.iter().map(|p| p.0).collect();
        let users: Vec<f64> = self.points.iter().map(|p| p.1).collect();
        check_non_negative("ADOPTION_TRAJECTORIES", "months", &months)?;
        check_non_negative("ADOPTION_TRAJECTORIES", "users", &users)?;
        if months.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ExhibitError::invalid_data(
                "ADOPTION_TRAJECTORIES",
                format!("months of '{}' are not strictly increasing", self.label),
            ));
        }
        Ok(())
    }
}

impl CostRange {
    pub fn validate(&self) -> Result<()> {
        check_non_negative("ACCEPTANCE_COST_RANGES", self.method, &[self.low_pct, self.high_pct])?;
        if self.low_pct > self.high_pct {
            return Err(ExhibitError::invalid_data(
                "ACCEPTANCE_COST_RANGES",
                format!(
                    "{}: low {} is above high {}",
                    self.method, self.low_pct, self.high_pct
                ),
            ));
        }
        Ok(())
    }
}

impl Dataset {
    /// Reject NaN, negative quantities and inverted ranges before anything is drawn
    pub fn validate(&self) -> Result<()> {
        for row in &self.enif {
            check_non_negative(
                "ENIF_2024",
                row.system,
                &[row.awareness_pct, row.usage_pct, row.activation_m],
            )?;
            if row.usage_pct > row.awareness_pct {
                return Err(ExhibitError::invalid_data(
                    "ENIF_2024",
                    format!(
                        "{}: usage {}% exceeds awareness {}%",
                        row.system, row.usage_pct, row.awareness_pct
                    ),
                ));
            }
        }

        check_non_negative(
            "TRANSACTION_GAP",
            "volumes",
            &[
                self.transaction_gap.codi_cumulative_m,
                self.transaction_gap.pix_single_day_m,
            ],
        )?;

        let mdr: Vec<f64> = self.mdr.iter().map(|q| q.pct).collect();
        check_non_negative("MDR_BY_METHOD", "pct", &mdr)?;

        for range in &self.cost_ranges {
            range.validate()?;
        }

        check_non_negative(
            "SME_SCENARIO",
            "scenario",
            &[
                self.sme.monthly_sales_mxn,
                self.sme.card_rate,
                self.sme.instant_rate,
            ],
        )?;

        check_non_negative(
            "DIGITAL_DIVIDEND",
            "amounts",
            &[
                self.dividend.accumulated_usd_bn,
                self.dividend.projection_brl_bn,
            ],
        )?;

        check_non_negative(
            "BRAZIL_GDP",
            "values",
            &[self.brazil_gdp.pct_of_gdp, self.brazil_gdp.value_brl_bn],
        )?;

        check_non_negative("MEXICO_PROJECTION", "savings_usd_bn", &self.mexico.savings_usd_bn)?;
        check_non_negative("MEXICO_PROJECTION", "delta_gdp_pct", &self.mexico.delta_gdp_pct)?;
        check_non_negative("MEXICO_PROJECTION", "new_users_m", &self.mexico.new_users_m)?;
        check_finite(
            "MEXICO_PROJECTION",
            "informality_delta_pct",
            &self.mexico.informality_delta_pct,
        )?;

        self.pix_adoption.validate()?;
        self.codi_adoption.validate()?;

        Ok(())
    }
}
